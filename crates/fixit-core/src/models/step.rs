//! Repair step model definition.

use serde::{Deserialize, Serialize};

/// A single instruction within a repair blueprint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RepairStep {
    /// 1-based position of the step; order-significant
    pub step_number: u32,

    /// Natural-language action text shown to the user
    pub instruction: String,

    /// Scene description used to drive image generation; not user-facing
    pub visual_description: String,

    /// Generated illustration, when the soft generation stage succeeded.
    /// Absence means "unavailable", never an error state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_image_url: Option<String>,
}
