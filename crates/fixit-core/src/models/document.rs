//! Persisted repair document model.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{RepairAnalysis, RepairStep};

/// The persisted unit of work: a diagnostic analysis enriched with the
/// original photo, optional reference material and sharing state.
///
/// Created once by the blueprint pipeline, read by the step machine, and
/// updated exactly once per publish-gate evaluation. The analysis fields
/// are flattened so the serialized form matches the original camelCase
/// wire format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RepairDocument {
    /// Unique opaque identifier, assigned at creation, immutable
    pub repair_id: String,

    /// Creation time (UTC), immutable
    pub timestamp: Timestamp,

    /// Diagnostic result this document was built from
    #[serde(flatten)]
    pub analysis: RepairAnalysis,

    /// The original input photo as a data URL, immutable
    pub user_photo_url: String,

    /// Generated "ideal setup" reference image, when available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ideal_view_image_url: Option<String>,

    /// External manual/support link; absence is non-fatal
    #[serde(default)]
    pub manual_url: Option<String>,

    /// Public visibility; mutable only by the publish gate
    pub is_public: bool,

    /// User-declared outcome; `None` means ongoing/unspecified
    pub is_successful: Option<bool>,
}

impl RepairDocument {
    /// Assembles a new document from a validated analysis.
    ///
    /// Assigns a fresh id and timestamp and applies the creation defaults:
    /// private visibility and unspecified outcome.
    pub fn assemble(analysis: RepairAnalysis, user_photo_url: String) -> Self {
        Self {
            repair_id: Uuid::new_v4().to_string(),
            timestamp: Timestamp::now(),
            analysis,
            user_photo_url,
            ideal_view_image_url: None,
            manual_url: None,
            is_public: false,
            is_successful: None,
        }
    }

    /// Identified object name, straight from the analysis.
    pub fn object_name(&self) -> &str {
        &self.analysis.object_name
    }

    /// Ordered repair steps.
    pub fn steps(&self) -> &[RepairStep] {
        &self.analysis.steps
    }
}

/// A point-in-time content moderation decision.
///
/// Consumed only by the publish gate; never persisted independently.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModerationResult {
    /// Whether the photo may be shown publicly
    pub safe: bool,

    /// Provider-supplied rejection reason, when given
    #[serde(default)]
    pub reason: Option<String>,
}

impl ModerationResult {
    /// The fail-open verdict used when the moderation service is
    /// unreachable: availability wins over moderation by policy.
    pub fn fail_open() -> Self {
        Self {
            safe: true,
            reason: None,
        }
    }
}
