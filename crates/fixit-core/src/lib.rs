//! Core library for the Fixit guided-repair application.
//!
//! This crate turns a single photo of a broken object (plus an optional
//! issue note) into a persisted, shareable repair document, then walks the
//! user through the generated steps and gates publication behind content
//! moderation. It provides:
//!
//! - [`pipeline::BlueprintPipeline`]: sequences the AI provider's
//!   capabilities (diagnose, manual lookup, reference image, per-step
//!   images) tolerating every soft failure, and commits the result to the
//!   document store.
//! - [`session::StepSession`]: the step progression state machine with the
//!   nested "stuck" troubleshooting sub-flow and its scoped live-capture
//!   resource.
//! - [`publish::PublishGate`]: the moderated visibility decision, with a
//!   documented fail-open policy for moderation outages.
//! - [`provider::AnalysisProvider`] / [`store::DocumentStore`] /
//!   [`capture::CaptureDevice`]: the seams to the external collaborators.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use fixit_core::models::Photo;
//! use fixit_core::pipeline::BlueprintPipeline;
//! use fixit_core::provider::HttpProviderBuilder;
//! use fixit_core::store::SqliteStoreBuilder;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = Arc::new(HttpProviderBuilder::new().build()?);
//! let store = Arc::new(SqliteStoreBuilder::new().build().await?);
//!
//! let pipeline = BlueprintPipeline::new(provider, store);
//! let photo = Photo::from_bytes(&std::fs::read("kettle.jpg")?);
//! let document = pipeline.run(&photo, Some("handle wobbles")).await?;
//! println!("Created repair {}", document.repair_id);
//! # Ok(())
//! # }
//! ```

pub mod capture;
pub mod display;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod provider;
pub mod publish;
pub mod session;
pub mod store;

// Re-export commonly used types
pub use capture::{CaptureDevice, CaptureSession, FileCaptureDevice};
pub use display::{DocumentSummaries, LocalDateTime};
pub use error::{RepairError, Result};
pub use models::{
    ModerationResult, Photo, RepairAnalysis, RepairCategory, RepairDocument, RepairStatus,
    RepairStep,
};
pub use pipeline::{BlueprintPipeline, PipelineStage, Progress};
pub use provider::{AnalysisProvider, HttpAnalysisProvider, HttpProviderBuilder, ImageRequest};
pub use publish::{PublishGate, PublishOutcome, Visibility};
pub use session::{Flow, StepModeKind, StepSession, FALLBACK_ADVICE};
pub use store::{DocumentStore, SqliteStore, SqliteStoreBuilder};
