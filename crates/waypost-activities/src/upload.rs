//! Single-shot document upload activity
//!
//! Uploads one file to the document management endpoint and completes in
//! the same turn. Unlike [`crate::RunTask`] nothing waits on an external
//! system afterwards, so every failure path still completes the activity:
//! the result slot records what happened and the flow moves on.

use std::path::PathBuf;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::{json, Value};
use waypost_core::{ActivityContext, Result, UploadConfig};

use crate::{Activity, ActivityProfile};

/// Uploads a file to the document store and records the response.
pub struct UploadFile {
    file_path: PathBuf,
    document_type_id: String,
    immediate_mode: bool,
    authorization_token: String,
    client: Client,
    config: UploadConfig,
}

impl UploadFile {
    pub fn new(
        file_path: impl Into<PathBuf>,
        document_type_id: impl Into<String>,
        authorization_token: impl Into<String>,
        client: Client,
        config: UploadConfig,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            document_type_id: document_type_id.into(),
            immediate_mode: false,
            authorization_token: authorization_token.into(),
            client,
            config,
        }
    }

    pub fn with_immediate_mode(mut self, immediate: bool) -> Self {
        self.immediate_mode = immediate;
        self
    }

    fn result_value(response_content: String, document_id: Option<i64>) -> Value {
        json!({
            "responseContent": response_content,
            "documentId": document_id,
        })
    }
}

#[async_trait]
impl Activity for UploadFile {
    fn name(&self) -> &str {
        "upload_file"
    }

    fn profile(&self) -> ActivityProfile {
        ActivityProfile {
            produces_output: true,
            ..ActivityProfile::default()
        }
    }

    async fn execute(&self, ctx: &mut dyn ActivityContext) -> Result<()> {
        let bytes = match tokio::fs::read(&self.file_path).await {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!("File not readable: {}: {}", self.file_path.display(), err);
                ctx.complete();
                return Ok(());
            }
        };

        let file_name = self
            .file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        let form = Form::new()
            .text("document_type_id", self.document_type_id.clone())
            .part("file", Part::bytes(bytes).file_name(file_name))
            .text("immediate_mode", self.immediate_mode.to_string());

        let send = self
            .client
            .post(&self.config.upload_url)
            .header(AUTHORIZATION, format!("Token {}", self.authorization_token))
            .multipart(form)
            .send();

        let cancel = ctx.cancellation();
        let response = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::warn!("Upload of {} cancelled", self.file_path.display());
                ctx.complete();
                return Ok(());
            }
            result = send => result,
        };

        match response {
            Ok(response) if response.status().is_success() => {
                let body = response.text().await.unwrap_or_default();
                let document_id = serde_json::from_str::<Value>(&body)
                    .ok()
                    .and_then(|v| v.get("id").and_then(Value::as_i64));
                tracing::info!(
                    "File uploaded: {} (document id {:?})",
                    self.file_path.display(),
                    document_id
                );
                ctx.set_result(Self::result_value(body, document_id));
            }
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                tracing::error!("File upload failed with status code {}", status);
                ctx.set_result(Self::result_value(body, None));
            }
            Err(err) => {
                tracing::error!("Error uploading file: {}", err);
            }
        }

        ctx.complete();
        Ok(())
    }
}
