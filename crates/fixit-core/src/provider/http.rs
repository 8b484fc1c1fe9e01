//! HTTP implementation of the analysis provider.
//!
//! Talks to the Fixit backend's JSON endpoints (`/gemini/analyze`,
//! `/gemini/manual`, ...), which front the actual generative models. Every
//! request carries a bounded timeout so a hung provider degrades to
//! "feature unavailable" instead of stalling the pipeline.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{RepairError, Result};
use crate::models::{ModerationResult, Photo, RepairAnalysis};

use super::{AnalysisProvider, ImageRequest};

/// Default backend endpoint, matching the development server.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Per-request timeout applied to every capability call.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Analysis provider backed by the Fixit HTTP backend.
pub struct HttpAnalysisProvider {
    client: reqwest::Client,
    base_url: String,
}

/// Builder for creating and configuring [`HttpAnalysisProvider`] instances.
#[derive(Debug, Clone, Default)]
pub struct HttpProviderBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl HttpProviderBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom backend base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Overrides the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the configured provider.
    ///
    /// # Errors
    ///
    /// Returns `RepairError::Configuration` if the HTTP client cannot be
    /// constructed.
    pub fn build(self) -> Result<HttpAnalysisProvider> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()
            .map_err(|e| RepairError::Configuration {
                message: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(HttpAnalysisProvider {
            client,
            base_url: self
                .base_url
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeRequest<'a> {
    photo_base64: &'a str,
    user_text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ManualRequest<'a> {
    object_name: &'a str,
}

#[derive(Deserialize)]
struct ManualResponse {
    url: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StepImageRequest<'a> {
    object_name: &'a str,
    step_description: &'a str,
    ideal_view: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reference_image_base64: Option<&'a str>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StepImageResponse {
    image_url: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TroubleshootRequest<'a> {
    photo_base64: &'a str,
    object_name: &'a str,
    step_index: usize,
    current_step_text: &'a str,
}

#[derive(Deserialize)]
struct TroubleshootResponse {
    advice: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ModerateRequest<'a> {
    photo_base64: &'a str,
}

impl HttpAnalysisProvider {
    /// Issues one JSON POST and decodes the response body.
    async fn post<Req, Resp>(
        &self,
        capability: &'static str,
        path: &str,
        body: &Req,
    ) -> Result<Resp>
    where
        Req: Serialize + Sync,
        Resp: for<'de> Deserialize<'de>,
    {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| RepairError::provider(capability, e))?;

        let response = response
            .error_for_status()
            .map_err(|e| RepairError::provider(capability, e))?;

        response
            .json::<Resp>()
            .await
            .map_err(|e| RepairError::provider(capability, e))
    }
}

#[async_trait]
impl AnalysisProvider for HttpAnalysisProvider {
    async fn diagnose(&self, photo: &Photo, note: Option<&str>) -> Result<RepairAnalysis> {
        let request = AnalyzeRequest {
            photo_base64: photo.as_base64(),
            user_text: note.unwrap_or(""),
        };

        // Transport and decode failures both mean diagnosis could not be
        // produced, which is fatal for the caller.
        let analysis: RepairAnalysis = self
            .post("diagnose", "/gemini/analyze", &request)
            .await
            .map_err(RepairError::diagnosis)?;

        Ok(analysis)
    }

    async fn find_reference(&self, object_name: &str) -> Result<Option<String>> {
        let request = ManualRequest { object_name };
        let response: ManualResponse = self
            .post("find_reference", "/gemini/manual", &request)
            .await?;
        Ok(response.url)
    }

    async fn generate_image(&self, request: &ImageRequest<'_>) -> Result<Option<String>> {
        let body = StepImageRequest {
            object_name: request.object_name,
            step_description: request.target_description,
            ideal_view: request.grounding_description,
            reference_image_base64: request.reference_photo.map(Photo::as_base64),
        };
        let response: StepImageResponse = self
            .post("generate_image", "/gemini/generate-step-image", &body)
            .await?;
        Ok(response.image_url)
    }

    async fn troubleshoot(
        &self,
        photo: &Photo,
        object_name: &str,
        step_index: usize,
        instruction: &str,
    ) -> Result<String> {
        let request = TroubleshootRequest {
            photo_base64: photo.as_base64(),
            object_name,
            step_index,
            current_step_text: instruction,
        };
        let response: TroubleshootResponse = self
            .post("troubleshoot", "/gemini/troubleshoot", &request)
            .await?;
        Ok(response.advice)
    }

    async fn moderate(&self, photo: &Photo) -> Result<ModerationResult> {
        let request = ModerateRequest {
            photo_base64: photo.as_base64(),
        };
        self.post("moderate", "/gemini/moderate", &request).await
    }
}
