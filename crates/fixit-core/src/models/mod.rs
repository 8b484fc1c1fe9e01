//! Data models for repair analyses and documents.
//!
//! This module contains the core domain types of the Fixit repair system:
//! the diagnostic result produced by the analysis provider, the persisted
//! repair document built on top of it, and the small carrier types (photo
//! payloads, moderation verdicts) exchanged with external collaborators.
//!
//! All types serialize with camelCase keys to stay wire-compatible with the
//! backend's JSON format (`repairId`, `userPhotoUrl`, ...). Display
//! implementations live in [`crate::display`] to keep data structures and
//! presentation concerns separate.

pub mod analysis;
pub mod document;
pub mod photo;
pub mod status;
pub mod step;


// Re-export all public types at the models level
pub use analysis::RepairAnalysis;
pub use document::{ModerationResult, RepairDocument};
pub use photo::Photo;
pub use status::{RepairCategory, RepairStatus};
pub use step::RepairStep;

/// Inclusive bounds on the number of steps a valid analysis may carry.
pub const MIN_STEPS: usize = 3;
/// Upper bound companion to [`MIN_STEPS`].
pub const MAX_STEPS: usize = 5;
