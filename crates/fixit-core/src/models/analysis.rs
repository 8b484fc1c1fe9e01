//! Diagnostic analysis model and validation.

use serde::{Deserialize, Serialize};

use crate::error::{RepairError, Result};

use super::{RepairCategory, RepairStatus, RepairStep, MAX_STEPS, MIN_STEPS};

/// The structured diagnostic result returned by the analysis provider.
///
/// Immutable once produced: the pipeline validates it, renumbers its steps
/// and folds it into a [`RepairDocument`](super::RepairDocument) without
/// further edits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RepairAnalysis {
    /// Safety classification of the proposed repair
    pub status: RepairStatus,

    /// Identified object, including brand/model when visible
    pub object_name: String,

    /// Broad object category
    #[serde(default)]
    pub category: RepairCategory,

    /// Description of the defect or issue
    pub issue_type: String,

    /// Hazard note that the UI must surface before proceeding, when present
    #[serde(default)]
    pub safety_warning: Option<String>,

    /// Whether external tools are required; when true, step 1 is a
    /// tool-gathering step by provider convention
    #[serde(default)]
    pub tools_needed: bool,

    /// Ideal reference framing; doubles as narrative text and as the
    /// grounding description for image generation
    pub ideal_view_instruction: String,

    /// Ordered repair steps, 3 to 5 of them
    pub steps: Vec<RepairStep>,
}

impl RepairAnalysis {
    /// Checks the structural invariants of a freshly produced analysis.
    ///
    /// # Errors
    ///
    /// Returns `RepairError::InvalidInput` when the object name is empty,
    /// the step count falls outside 3-5, or any step lacks instruction text.
    pub fn validate(&self) -> Result<()> {
        if self.object_name.trim().is_empty() {
            return Err(RepairError::InvalidInput {
                field: "objectName".to_string(),
                reason: "Object name must not be empty".to_string(),
            });
        }

        let count = self.steps.len();
        if !(MIN_STEPS..=MAX_STEPS).contains(&count) {
            return Err(RepairError::InvalidInput {
                field: "steps".to_string(),
                reason: format!("Expected {MIN_STEPS}-{MAX_STEPS} steps, got {count}"),
            });
        }

        for step in &self.steps {
            if step.instruction.trim().is_empty() {
                return Err(RepairError::InvalidInput {
                    field: "steps".to_string(),
                    reason: format!("Step {} has no instruction text", step.step_number),
                });
            }
        }

        Ok(())
    }

    /// Renumbers steps `1..=n` in their current order.
    ///
    /// Providers occasionally return duplicated or gapped step numbers;
    /// after this call ordering is stable and `step_number` matches the
    /// position ascending with no gaps.
    pub fn finalize_step_numbers(&mut self) {
        for (idx, step) in self.steps.iter_mut().enumerate() {
            step.step_number = idx as u32 + 1;
        }
    }
}
