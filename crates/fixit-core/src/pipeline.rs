//! The repair blueprint pipeline.
//!
//! Turns one photo plus an optional issue note into a persisted
//! [`RepairDocument`] by sequencing the provider's capabilities:
//!
//! 1. Diagnose: the only hard requirement; any failure aborts with no
//!    document created.
//! 2. Manual lookup: soft; failure degrades to `manual_url = None`.
//! 3. Reference image: soft; failure degrades to no ideal-view image.
//! 4. Per-step images: soft, concurrent fan-out; each request is
//!    individually fault-isolated and all steps survive in order.
//! 5. Assembly and commit: a persist failure is fatal and surfaced
//!    distinctly from a diagnosis failure.
//!
//! Coarse progress is reported on an optional side channel so a caller can
//! render liveness feedback; it is not part of the result contract.

use std::sync::Arc;

use futures::future::join_all;
use log::{debug, info, warn};
use tokio::sync::mpsc::UnboundedSender;

use crate::error::{RepairError, Result};
use crate::models::{Photo, RepairAnalysis, RepairDocument};
use crate::provider::{AnalysisProvider, ImageRequest};
use crate::store::DocumentStore;

/// Target description used for the ideal-view reference render.
const REFERENCE_IMAGE_TARGET: &str = "Overview for setup";

/// The coarse stages the pipeline reports on its progress channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Diagnose,
    ManualLookup,
    ReferenceImage,
    StepImages,
    Commit,
}

impl PipelineStage {
    /// Completion fraction shown when this stage begins.
    pub fn percent(&self) -> u8 {
        match self {
            PipelineStage::Diagnose => 15,
            PipelineStage::ManualLookup => 35,
            PipelineStage::ReferenceImage => 55,
            PipelineStage::StepImages => 75,
            PipelineStage::Commit => 100,
        }
    }

    /// Human-readable stage label.
    pub fn label(&self) -> &'static str {
        match self {
            PipelineStage::Diagnose => "Analyzing object & issue",
            PipelineStage::ManualLookup => "Searching grounded support data",
            PipelineStage::ReferenceImage => "Visualizing your setup",
            PipelineStage::StepImages => "Generating step-by-step visuals",
            PipelineStage::Commit => "Saving blueprint",
        }
    }
}

/// One progress event on the pipeline's side channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub stage: PipelineStage,
    pub percent: u8,
}

/// Orchestrates the analysis provider and document store into a single
/// create-blueprint operation.
pub struct BlueprintPipeline<P, S> {
    provider: Arc<P>,
    store: Arc<S>,
    progress: Option<UnboundedSender<Progress>>,
}

impl<P, S> BlueprintPipeline<P, S>
where
    P: AnalysisProvider,
    S: DocumentStore,
{
    /// Creates a pipeline over the given provider and store.
    pub fn new(provider: Arc<P>, store: Arc<S>) -> Self {
        Self {
            provider,
            store,
            progress: None,
        }
    }

    /// Attaches a progress side channel.
    pub fn with_progress(mut self, sender: UnboundedSender<Progress>) -> Self {
        self.progress = Some(sender);
        self
    }

    fn report(&self, stage: PipelineStage) {
        if let Some(sender) = &self.progress {
            // A dropped receiver just means nobody is watching.
            let _ = sender.send(Progress {
                stage,
                percent: stage.percent(),
            });
        }
    }

    /// Runs the full pipeline: diagnose, enrich, assemble, persist.
    ///
    /// Once started it runs to completion or fatal abort; there is no
    /// external cancellation signal.
    ///
    /// # Errors
    ///
    /// - `RepairError::Diagnosis` when the analysis cannot be produced or
    ///   fails validation. No document exists and the store saw no writes.
    /// - `RepairError::Storage` when the assembled document cannot be
    ///   persisted.
    pub async fn run(&self, photo: &Photo, note: Option<&str>) -> Result<RepairDocument> {
        self.report(PipelineStage::Diagnose);
        let mut analysis = self
            .provider
            .diagnose(photo, note)
            .await
            .map_err(|e| match e {
                err @ RepairError::Diagnosis { .. } => err,
                other => RepairError::diagnosis(other),
            })?;
        analysis.validate().map_err(RepairError::diagnosis)?;
        analysis.finalize_step_numbers();
        info!(
            "Diagnosed '{}' ({}): {} steps",
            analysis.object_name,
            analysis.category.as_str(),
            analysis.steps.len()
        );

        self.report(PipelineStage::ManualLookup);
        let manual_url = match self.provider.find_reference(&analysis.object_name).await {
            Ok(url) => url,
            Err(e) => {
                warn!("Manual lookup failed non-fatally: {e}");
                None
            }
        };

        self.report(PipelineStage::ReferenceImage);
        let ideal_view_image_url = match self
            .provider
            .generate_image(&ImageRequest {
                object_name: &analysis.object_name,
                target_description: REFERENCE_IMAGE_TARGET,
                grounding_description: &analysis.ideal_view_instruction,
                reference_photo: Some(photo),
            })
            .await
        {
            Ok(url) => url,
            Err(e) => {
                warn!("Ideal-view generation failed non-fatally: {e}");
                None
            }
        };

        self.report(PipelineStage::StepImages);
        let step_images = self.generate_step_images(&analysis, photo).await;
        for (step, image_url) in analysis.steps.iter_mut().zip(step_images) {
            step.generated_image_url = image_url;
        }

        self.report(PipelineStage::Commit);
        let mut document = RepairDocument::assemble(analysis, photo.to_data_url());
        document.manual_url = manual_url;
        document.ideal_view_image_url = ideal_view_image_url;

        self.store
            .create(&document)
            .await
            .map_err(|e| match e {
                err @ RepairError::Storage { .. } => err,
                other => RepairError::storage(other),
            })?;
        info!("Persisted repair document {}", document.repair_id);

        Ok(document)
    }

    /// Fans out one image request per step and gathers every settled
    /// result. One step failing never cancels or delays the others; the
    /// output is positionally aligned with the input steps.
    async fn generate_step_images(
        &self,
        analysis: &RepairAnalysis,
        photo: &Photo,
    ) -> Vec<Option<String>> {
        let requests = analysis.steps.iter().map(|step| {
            let provider = Arc::clone(&self.provider);
            let step_number = step.step_number;
            async move {
                let request = ImageRequest {
                    object_name: &analysis.object_name,
                    target_description: &step.instruction,
                    grounding_description: &analysis.ideal_view_instruction,
                    reference_photo: Some(photo),
                };
                match provider.generate_image(&request).await {
                    Ok(url) => {
                        debug!("Step {step_number} image: {}", url.is_some());
                        url
                    }
                    Err(e) => {
                        warn!("Step {step_number} image generation failed: {e}");
                        None
                    }
                }
            }
        });

        join_all(requests).await
    }
}
