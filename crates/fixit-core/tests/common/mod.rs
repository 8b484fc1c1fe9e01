//! Shared fakes and fixtures for the integration tests.
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tempfile::TempDir;

use fixit_core::capture::{CaptureDevice, CaptureSession};
use fixit_core::error::{RepairError, Result};
use fixit_core::models::{
    ModerationResult, Photo, RepairAnalysis, RepairCategory, RepairDocument, RepairStatus,
    RepairStep,
};
use fixit_core::provider::{AnalysisProvider, ImageRequest};
use fixit_core::store::{DocumentStore, SqliteStore, SqliteStoreBuilder};

/// Builds an analysis with `count` steps, instructions "Step 1"... .
pub fn sample_analysis(count: usize) -> RepairAnalysis {
    RepairAnalysis {
        status: RepairStatus::Ok,
        object_name: "Office chair".to_string(),
        category: RepairCategory::Furniture,
        issue_type: "Backrest wobbles".to_string(),
        safety_warning: None,
        tools_needed: true,
        ideal_view_instruction: "Chair tipped forward, rear bolts visible".to_string(),
        steps: (1..=count)
            .map(|n| RepairStep {
                step_number: n as u32,
                instruction: format!("Step {n}"),
                visual_description: format!("View of step {n}"),
                generated_image_url: None,
            })
            .collect(),
    }
}

pub fn sample_photo() -> Photo {
    Photo::from_bytes(b"\xff\xd8\xff\xe0not-really-a-jpeg")
}

/// Scripted analysis provider: each capability can be told to fail, and
/// every call is counted.
pub struct ScriptedProvider {
    pub analysis: RepairAnalysis,
    pub fail_diagnose: bool,
    pub fail_manual: bool,
    pub manual_url: Option<String>,
    pub fail_reference_image: bool,
    /// Step instructions whose image generation should fail
    pub failing_image_targets: HashSet<String>,
    pub fail_troubleshoot: bool,
    pub advice: String,
    pub fail_moderate: bool,
    pub moderation: ModerationResult,
    pub diagnose_calls: AtomicUsize,
    pub image_calls: AtomicUsize,
    pub troubleshoot_calls: AtomicUsize,
    pub moderate_calls: AtomicUsize,
}

impl Default for ScriptedProvider {
    fn default() -> Self {
        Self {
            analysis: sample_analysis(3),
            fail_diagnose: false,
            fail_manual: false,
            manual_url: Some("https://support.example.com/chair".to_string()),
            fail_reference_image: false,
            failing_image_targets: HashSet::new(),
            fail_troubleshoot: false,
            advice: "Try loosening the bolt a quarter turn first.".to_string(),
            fail_moderate: false,
            moderation: ModerationResult {
                safe: true,
                reason: None,
            },
            diagnose_calls: AtomicUsize::new(0),
            image_calls: AtomicUsize::new(0),
            troubleshoot_calls: AtomicUsize::new(0),
            moderate_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl AnalysisProvider for ScriptedProvider {
    async fn diagnose(&self, _photo: &Photo, _note: Option<&str>) -> Result<RepairAnalysis> {
        self.diagnose_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_diagnose {
            return Err(RepairError::diagnosis("scripted diagnose failure"));
        }
        Ok(self.analysis.clone())
    }

    async fn find_reference(&self, _object_name: &str) -> Result<Option<String>> {
        if self.fail_manual {
            return Err(RepairError::provider("find_reference", "scripted failure"));
        }
        Ok(self.manual_url.clone())
    }

    async fn generate_image(&self, request: &ImageRequest<'_>) -> Result<Option<String>> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        if request.target_description == "Overview for setup" {
            if self.fail_reference_image {
                return Err(RepairError::provider("generate_image", "scripted failure"));
            }
            return Ok(Some("img://ideal-view".to_string()));
        }
        if self.failing_image_targets.contains(request.target_description) {
            return Err(RepairError::provider("generate_image", "scripted failure"));
        }
        Ok(Some(format!("img://{}", request.target_description)))
    }

    async fn troubleshoot(
        &self,
        _photo: &Photo,
        _object_name: &str,
        _step_index: usize,
        _instruction: &str,
    ) -> Result<String> {
        self.troubleshoot_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_troubleshoot {
            return Err(RepairError::provider("troubleshoot", "scripted failure"));
        }
        Ok(self.advice.clone())
    }

    async fn moderate(&self, _photo: &Photo) -> Result<ModerationResult> {
        self.moderate_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_moderate {
            return Err(RepairError::provider("moderate", "scripted failure"));
        }
        Ok(self.moderation.clone())
    }
}

/// Capture device that counts acquisitions and releases.
pub struct CountingCaptureDevice {
    pub fail_acquire: bool,
    pub fail_frame: bool,
    pub acquired: Arc<AtomicUsize>,
    pub released: Arc<AtomicUsize>,
}

impl CountingCaptureDevice {
    pub fn new() -> Self {
        Self {
            fail_acquire: false,
            fail_frame: false,
            acquired: Arc::new(AtomicUsize::new(0)),
            released: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn acquired_count(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn released_count(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CaptureDevice for CountingCaptureDevice {
    async fn acquire(&self) -> Result<Box<dyn CaptureSession>> {
        if self.fail_acquire {
            return Err(RepairError::Capture {
                reason: "camera permission denied".to_string(),
            });
        }
        self.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(CountingSession {
            fail_frame: self.fail_frame,
            released: Arc::clone(&self.released),
        }))
    }
}

struct CountingSession {
    fail_frame: bool,
    released: Arc<AtomicUsize>,
}

impl CaptureSession for CountingSession {
    fn frame(&mut self) -> Result<Photo> {
        if self.fail_frame {
            return Err(RepairError::Capture {
                reason: "frame grab failed".to_string(),
            });
        }
        Ok(sample_photo())
    }
}

impl Drop for CountingSession {
    fn drop(&mut self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

/// Store whose writes always fail, for fatal-persistence scenarios.
pub struct FailingStore;

#[async_trait]
impl DocumentStore for FailingStore {
    async fn create(&self, _document: &RepairDocument) -> Result<()> {
        Err(RepairError::storage("scripted write failure"))
    }

    async fn get_by_id(
        &self,
        _repair_id: &str,
    ) -> Result<Option<RepairDocument>> {
        Ok(None)
    }

    async fn list_all(&self) -> Result<Vec<RepairDocument>> {
        Ok(vec![])
    }

    async fn list_public(&self) -> Result<Vec<RepairDocument>> {
        Ok(vec![])
    }

    async fn update(&self, _document: &RepairDocument) -> Result<()> {
        Err(RepairError::storage("scripted write failure"))
    }

    async fn delete(&self, _repair_id: &str) -> Result<bool> {
        Ok(false)
    }
}

/// Creates a SQLite store backed by a temp directory.
pub async fn temp_store() -> (TempDir, SqliteStore) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let store = SqliteStoreBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .await
        .expect("Failed to create store");
    (temp_dir, store)
}
