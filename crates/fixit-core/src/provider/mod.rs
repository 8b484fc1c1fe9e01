//! Analysis provider contract.
//!
//! The provider is an untrusted, partially-reliable remote capability. The
//! trait only transports results and real errors; the tolerance policy
//! (which failures are fatal, which degrade to absences) lives in the
//! callers: the blueprint pipeline, the step machine and the publish gate.

pub mod http;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{ModerationResult, Photo, RepairAnalysis};

pub use http::{HttpAnalysisProvider, HttpProviderBuilder};

/// A request to render an illustrative image for one repair context.
#[derive(Debug, Clone)]
pub struct ImageRequest<'a> {
    /// Identified object the image should depict
    pub object_name: &'a str,
    /// The action or view to illustrate
    pub target_description: &'a str,
    /// Ideal-view framing used to ground the render
    pub grounding_description: &'a str,
    /// Original user photo, when available, to bias the output toward the
    /// real object
    pub reference_photo: Option<&'a Photo>,
}

/// The AI capability surface the repair flow depends on.
///
/// Failure expectations per capability:
///
/// | Capability       | Expected by callers                        |
/// |------------------|--------------------------------------------|
/// | `diagnose`       | error is fatal to the pipeline             |
/// | `find_reference` | error degrades to "no manual"              |
/// | `generate_image` | error degrades to "no visual"              |
/// | `troubleshoot`   | error degrades to generic fallback advice  |
/// | `moderate`       | error fails open to a safe verdict         |
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    /// Classifies the object and issue in the photo and plans 3-5 repair
    /// steps. The one hard requirement of the whole flow.
    async fn diagnose(&self, photo: &Photo, note: Option<&str>) -> Result<RepairAnalysis>;

    /// Looks up an authoritative manual or support URL for the object.
    async fn find_reference(&self, object_name: &str) -> Result<Option<String>>;

    /// Renders an illustrative image; `Ok(None)` means the provider ran but
    /// produced nothing usable.
    async fn generate_image(&self, request: &ImageRequest<'_>) -> Result<Option<String>>;

    /// Produces troubleshooting advice for a user stuck at a step, based on
    /// a live photo of their current state.
    async fn troubleshoot(
        &self,
        photo: &Photo,
        object_name: &str,
        step_index: usize,
        instruction: &str,
    ) -> Result<String>;

    /// Moderates a photo ahead of public posting.
    async fn moderate(&self, photo: &Photo) -> Result<ModerationResult>;
}
