//! Step progression and troubleshooting state machine.
//!
//! A [`StepSession`] is a view over one persisted document: it walks the
//! generated steps forward and backward and hosts the nested "stuck"
//! sub-flow (live capture, troubleshoot call, advice display). It never
//! mutates the stored steps.
//!
//! The capture session acquired on entering stuck mode is owned by the
//! mode itself, so every transition that leaves `Stuck` drops it exactly
//! once. Repeated enter/dismiss cycles cannot leak the device and nothing
//! can release it twice.

use log::warn;

use crate::capture::{CaptureDevice, CaptureSession};
use crate::error::{RepairError, Result};
use crate::models::{RepairDocument, RepairStep};
use crate::provider::AnalysisProvider;
use crate::store::DocumentStore;

/// Generic advice used when the troubleshooting capability fails.
/// Troubleshooting is never fatal and must never block navigation.
pub const FALLBACK_ADVICE: &str = "I'm having trouble analyzing the live feed. \
Please double-check your tools and the instruction text.";

/// Where control goes after a navigation transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Still inside the step machine
    Stay,
    /// `Back` from the first step hands off to the setup stage
    Setup,
    /// `Next` from the last step hands off to the completion stage
    Completion,
}

/// Current sub-state of the session.
enum StepMode {
    Normal,
    Stuck(Box<dyn CaptureSession>),
    StuckResolved { advice: String },
}

/// Discriminant-only view of the mode, for callers and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepModeKind {
    Normal,
    Stuck,
    StuckResolved,
}

/// The step progression state machine over one repair document.
pub struct StepSession {
    document: RepairDocument,
    current_index: usize,
    mode: StepMode,
}

impl StepSession {
    /// Loads the session for a previously persisted document.
    ///
    /// Fails closed: if the document cannot be loaded the machine cannot
    /// initialize and control returns to the entry point of the flow.
    ///
    /// # Errors
    ///
    /// `RepairError::DocumentNotFound` when the store has no such id;
    /// `RepairError::InvalidInput` when the stored document carries no
    /// steps.
    pub async fn load<S>(store: &S, repair_id: &str) -> Result<Self>
    where
        S: DocumentStore + ?Sized,
    {
        let document =
            store
                .get_by_id(repair_id)
                .await?
                .ok_or_else(|| RepairError::DocumentNotFound {
                    id: repair_id.to_string(),
                })?;

        if document.steps().is_empty() {
            return Err(RepairError::InvalidInput {
                field: "steps".to_string(),
                reason: format!("Document '{repair_id}' has no steps to walk"),
            });
        }

        Ok(Self {
            document,
            current_index: 0,
            mode: StepMode::Normal,
        })
    }

    /// The document this session walks.
    pub fn document(&self) -> &RepairDocument {
        &self.document
    }

    /// 0-based index of the current step.
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The step the user is currently on.
    pub fn current_step(&self) -> &RepairStep {
        &self.document.steps()[self.current_index]
    }

    /// True when the current step is the final one.
    pub fn is_last_step(&self) -> bool {
        self.current_index + 1 == self.document.steps().len()
    }

    /// Discriminant of the current mode.
    pub fn mode(&self) -> StepModeKind {
        match self.mode {
            StepMode::Normal => StepModeKind::Normal,
            StepMode::Stuck(_) => StepModeKind::Stuck,
            StepMode::StuckResolved { .. } => StepModeKind::StuckResolved,
        }
    }

    /// Troubleshooting advice, when the stuck flow has produced some.
    pub fn advice(&self) -> Option<&str> {
        match &self.mode {
            StepMode::StuckResolved { advice } => Some(advice),
            _ => None,
        }
    }

    /// Advances to the next step, or out of the machine after the last
    /// one. Clears any stuck state either way.
    pub fn next(&mut self) -> Flow {
        self.clear_stuck();
        if self.is_last_step() {
            Flow::Completion
        } else {
            self.current_index += 1;
            Flow::Stay
        }
    }

    /// Steps backward, or out to the setup stage from index 0. Clears any
    /// stuck state either way.
    pub fn back(&mut self) -> Flow {
        self.clear_stuck();
        if self.current_index == 0 {
            Flow::Setup
        } else {
            self.current_index -= 1;
            Flow::Stay
        }
    }

    /// Enters the stuck sub-flow by acquiring a live capture session.
    ///
    /// # Errors
    ///
    /// Acquisition failure is recoverable: the mode stays `Normal` and the
    /// returned `RepairError::Capture` carries the user-facing reason.
    pub async fn enter_stuck<D>(&mut self, device: &D) -> Result<()>
    where
        D: CaptureDevice + ?Sized,
    {
        match device.acquire().await {
            Ok(session) => {
                self.mode = StepMode::Stuck(session);
                Ok(())
            }
            Err(e) => {
                self.mode = StepMode::Normal;
                Err(e)
            }
        }
    }

    /// Captures a frame and asks the provider for troubleshooting advice.
    ///
    /// Valid only in `Stuck` mode. Always lands in `StuckResolved`: a
    /// failed frame grab or provider call resolves to the generic
    /// [`FALLBACK_ADVICE`] instead of an error. The capture session is
    /// released on the way out.
    ///
    /// # Errors
    ///
    /// `RepairError::InvalidInput` when called outside `Stuck` mode.
    pub async fn submit_stuck_capture<P>(&mut self, provider: &P) -> Result<()>
    where
        P: AnalysisProvider + ?Sized,
    {
        let mut capture = match std::mem::replace(&mut self.mode, StepMode::Normal) {
            StepMode::Stuck(capture) => capture,
            other => {
                self.mode = other;
                return Err(RepairError::InvalidInput {
                    field: "mode".to_string(),
                    reason: "Troubleshooting capture requires an active stuck session"
                        .to_string(),
                });
            }
        };

        let advice = match capture.frame() {
            Ok(frame) => {
                let step = &self.document.steps()[self.current_index];
                match provider
                    .troubleshoot(
                        &frame,
                        self.document.object_name(),
                        self.current_index,
                        &step.instruction,
                    )
                    .await
                {
                    Ok(advice) => advice,
                    Err(e) => {
                        warn!("Troubleshooting failed non-fatally: {e}");
                        FALLBACK_ADVICE.to_string()
                    }
                }
            }
            Err(e) => {
                warn!("Frame capture failed non-fatally: {e}");
                FALLBACK_ADVICE.to_string()
            }
        };

        // `capture` drops here, releasing the device.
        self.mode = StepMode::StuckResolved { advice };
        Ok(())
    }

    /// Leaves the stuck sub-flow, discarding advice and releasing any held
    /// capture session.
    pub fn dismiss_stuck(&mut self) {
        self.clear_stuck();
    }

    fn clear_stuck(&mut self) {
        // Dropping a held capture session releases the device.
        self.mode = StepMode::Normal;
    }
}
