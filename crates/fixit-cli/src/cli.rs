//! Command handlers bridging the CLI arguments to the core library.

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use log::debug;

use fixit_core::{
    BlueprintPipeline, DocumentStore, DocumentSummaries, FileCaptureDevice, Flow,
    HttpAnalysisProvider, Photo, Progress, PublishGate, PublishOutcome, RepairError,
    SqliteStore, StepModeKind, StepSession, Visibility,
};

use crate::renderer::TerminalRenderer;

/// CLI handler holding the shared collaborators.
pub struct Cli {
    store: Arc<SqliteStore>,
    provider: Arc<HttpAnalysisProvider>,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(
        store: Arc<SqliteStore>,
        provider: Arc<HttpAnalysisProvider>,
        renderer: TerminalRenderer,
    ) -> Self {
        Self {
            store,
            provider,
            renderer,
        }
    }

    /// Runs the blueprint pipeline over a photo file.
    pub async fn analyze(&self, photo_path: &Path, note: Option<&str>) -> Result<()> {
        let bytes = std::fs::read(photo_path)
            .with_context(|| format!("Failed to read photo {}", photo_path.display()))?;
        let photo = Photo::from_bytes(&bytes);

        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<Progress>();
        let progress_task = tokio::spawn(async move {
            while let Some(progress) = rx.recv().await {
                eprintln!("[{:>3}%] {}...", progress.percent, progress.stage.label());
            }
        });

        // The pipeline owns the sender; scope it so the channel closes and
        // the drain task can finish.
        let result = {
            let pipeline =
                BlueprintPipeline::new(Arc::clone(&self.provider), Arc::clone(&self.store))
                    .with_progress(tx);
            pipeline.run(&photo, note).await
        };
        let _ = progress_task.await;

        let document = match result {
            Ok(document) => document,
            Err(RepairError::Diagnosis { reason }) => {
                debug!("Diagnosis failure: {reason}");
                bail!(
                    "The AI couldn't interpret your photo. \
                     Try again with better lighting or a different angle."
                );
            }
            Err(e) => return Err(e).context("Failed to create the repair blueprint"),
        };

        self.renderer.render(&document.to_string())?;
        self.renderer
            .status(&format!("\nNext: fixit walk {}", document.repair_id));
        Ok(())
    }

    /// Lists all saved repairs as summaries.
    pub async fn list(&self) -> Result<()> {
        let documents = self.store.list_all().await?;
        self.renderer.render("# Your Repairs\n\n")?;
        self.renderer
            .render(&DocumentSummaries(documents).to_string())
    }

    /// Lists publicly shared repairs.
    pub async fn feed(&self) -> Result<()> {
        let documents = self.store.list_public().await?;
        self.renderer.render("# Community Feed\n\n")?;
        self.renderer
            .render(&DocumentSummaries(documents).to_string())
    }

    /// Shows one full repair document.
    pub async fn show(&self, repair_id: &str) -> Result<()> {
        let document = self.store.get_by_id(repair_id)
            .await?
            .ok_or_else(|| anyhow!("No repair found with ID '{repair_id}'"))?;
        self.renderer.render(&document.to_string())
    }

    /// Walks the repair's steps interactively, driving the step machine
    /// from stdin.
    pub async fn walk(&self, repair_id: &str) -> Result<()> {
        let mut session = StepSession::load(self.store.as_ref(), repair_id)
            .await
            .context("Could not load the repair to walk")?;

        if let Some(warning) = &session.document().analysis.safety_warning {
            self.renderer.render(&format!("**⚠ Safety**: {warning}\n\n"))?;
        }

        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();

        loop {
            self.print_step(&session)?;
            print!("> ");
            io::stdout().flush().ok();

            let Some(line) = lines.next() else {
                break;
            };
            let line = line.context("Failed to read input")?;
            let mut parts = line.split_whitespace();

            match parts.next().unwrap_or("") {
                "n" | "next" => {
                    if session.next() == Flow::Completion {
                        self.renderer.status(&format!(
                            "Repair complete! Record the outcome with: \
                             fixit publish {repair_id} --outcome success"
                        ));
                        break;
                    }
                }
                "b" | "back" => {
                    if session.back() == Flow::Setup {
                        self.renderer.status("Back at the setup overview.");
                        break;
                    }
                }
                "s" | "stuck" => {
                    let Some(path) = parts.next() else {
                        self.renderer
                            .status("Usage: s <photo-file> (a photo of where you're stuck)");
                        continue;
                    };
                    let device = FileCaptureDevice::new(path);
                    match session.enter_stuck(&device).await {
                        Ok(()) => {
                            session
                                .submit_stuck_capture(self.provider.as_ref())
                                .await?;
                        }
                        Err(e) => {
                            // Recoverable: stay on the step in normal mode.
                            self.renderer.status(&format!("Troubleshooting needs a readable photo: {e}"));
                        }
                    }
                }
                "d" | "dismiss" => session.dismiss_stuck(),
                "q" | "quit" => break,
                "" => {}
                other => {
                    self.renderer.status(&format!(
                        "Unknown command '{other}'. \
                         Use n(ext), b(ack), s(tuck) <photo>, d(ismiss), q(uit)."
                    ));
                }
            }
        }

        Ok(())
    }

    fn print_step(&self, session: &StepSession) -> Result<()> {
        let step = session.current_step();
        let total = session.document().steps().len();
        self.renderer.render(&format!(
            "\n## Step {} / {total}\n\n{}\n",
            step.step_number, step.instruction
        ))?;
        if step.generated_image_url.is_none() {
            self.renderer.status("(step visualization unavailable)");
        }
        if session.mode() == StepModeKind::StuckResolved {
            if let Some(advice) = session.advice() {
                self.renderer
                    .render(&format!("\n**Expert advice**: {advice}\n"))?;
            }
        }
        Ok(())
    }

    /// Finalizes a repair through the publish gate.
    pub async fn publish(
        &self,
        repair_id: &str,
        is_successful: Option<bool>,
        visibility: Visibility,
    ) -> Result<()> {
        let document = self.store.get_by_id(repair_id)
            .await?
            .ok_or_else(|| anyhow!("No repair found with ID '{repair_id}'"))?;

        let gate = PublishGate::new(Arc::clone(&self.provider), Arc::clone(&self.store));
        match gate.finalize(document, is_successful, visibility).await? {
            PublishOutcome::Saved(saved) => {
                self.renderer.status(&format!(
                    "Saved {} as {}.",
                    saved.repair_id,
                    if saved.is_public {
                        "public. It is now on the feed"
                    } else {
                        "private"
                    }
                ));
                Ok(())
            }
            PublishOutcome::Rejected { reason } => {
                bail!("Not posted publicly: {reason} You can still save it privately.")
            }
        }
    }

    /// Deletes a repair document.
    pub async fn delete(&self, repair_id: &str) -> Result<()> {
        if self.store.delete(repair_id).await? {
            self.renderer.status(&format!("Deleted {repair_id}."));
            Ok(())
        } else {
            bail!("No repair found with ID '{repair_id}'")
        }
    }
}
