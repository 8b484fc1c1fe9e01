//! The publish gate: final visibility decision for a repair document.
//!
//! Private saves persist unconditionally and never invoke moderation.
//! Public saves moderate the original photo first; an unreachable
//! moderation service **fails open** to a safe verdict, a deliberate
//! availability-over-moderation policy, so transient provider outages
//! never block an action that would succeed as a private save. An active
//! rejection persists nothing and is fully recoverable.

use std::sync::Arc;

use log::{info, warn};

use crate::error::Result;
use crate::models::{Photo, RepairDocument};
use crate::provider::AnalysisProvider;
use crate::store::DocumentStore;

/// Message shown when moderation rejects without giving a reason.
pub const GENERIC_REJECTION_REASON: &str = "This image cannot be posted publicly.";

/// Requested visibility for the finished document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

/// Result of one gate evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum PublishOutcome {
    /// The document was persisted with the requested state.
    Saved(RepairDocument),
    /// Moderation rejected the photo; nothing was persisted. The caller
    /// may retry or fall back to a private save.
    Rejected { reason: String },
}

/// Gates the transition of a document into its terminal, shared state.
pub struct PublishGate<P, S> {
    provider: Arc<P>,
    store: Arc<S>,
}

impl<P, S> PublishGate<P, S>
where
    P: AnalysisProvider,
    S: DocumentStore,
{
    /// Creates a gate over the given provider and store.
    pub fn new(provider: Arc<P>, store: Arc<S>) -> Self {
        Self { provider, store }
    }

    /// Evaluates the gate for one document.
    ///
    /// Merges the user-declared outcome, decides visibility, and performs
    /// exactly one persist on success and zero on rejection.
    ///
    /// # Errors
    ///
    /// Only persistence failures propagate; moderation transport failures
    /// fail open.
    pub async fn finalize(
        &self,
        mut document: RepairDocument,
        is_successful: Option<bool>,
        visibility: Visibility,
    ) -> Result<PublishOutcome> {
        document.is_successful = is_successful;

        if visibility == Visibility::Public {
            let photo = Photo::from_stored_url(&document.user_photo_url);
            let verdict = match self.provider.moderate(&photo).await {
                Ok(verdict) => verdict,
                Err(e) => {
                    // Named policy: fail open when moderation cannot render
                    // a verdict.
                    warn!("Moderation unavailable, failing open: {e}");
                    crate::models::ModerationResult::fail_open()
                }
            };

            if !verdict.safe {
                info!(
                    "Moderation rejected public save of {}",
                    document.repair_id
                );
                return Ok(PublishOutcome::Rejected {
                    reason: verdict
                        .reason
                        .unwrap_or_else(|| GENERIC_REJECTION_REASON.to_string()),
                });
            }
        }

        document.is_public = visibility == Visibility::Public;
        self.store.update(&document).await?;
        info!(
            "Saved {} ({})",
            document.repair_id,
            if document.is_public { "public" } else { "private" }
        );
        Ok(PublishOutcome::Saved(document))
    }
}
