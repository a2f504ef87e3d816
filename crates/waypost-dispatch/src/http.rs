//! HTTP webhook dispatcher

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use waypost_core::{DispatchConfig, TaskRequest};

use crate::{DispatchError, TaskDispatcher};

/// Outbound JSON body for the task-start webhook.
///
/// Field names and null-serialized absences are part of the wire contract
/// with the fulfillment system. The shared secret is not in the body; it
/// travels as a query parameter.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TaskRequestBody<'a> {
    task_id: &'a str,
    task_name: &'a str,
    payload: Option<&'a BTreeMap<String, Value>>,
    route_url: Option<&'a str>,
    allowed_roles: Option<&'a [String]>,
    detailed_description: Option<&'a str>,
    notification_name: Option<&'a str>,
    notification_message: Option<&'a str>,
}

impl<'a> TaskRequestBody<'a> {
    fn from_request(request: &'a TaskRequest) -> Self {
        Self {
            task_id: request.task_id.as_str(),
            task_name: &request.task_name,
            payload: request.payload.as_ref(),
            route_url: request.route_url.as_deref(),
            allowed_roles: request.allowed_roles.as_deref(),
            detailed_description: request.detailed_description.as_deref(),
            notification_name: request.notification_name.as_deref(),
            notification_message: request.notification_message.as_deref(),
        }
    }
}

/// Sends task-start notifications to a configured webhook endpoint.
///
/// The client is injected rather than constructed here so a host can share
/// one connection pool across all activities.
#[derive(Debug, Clone)]
pub struct HttpTaskDispatcher {
    client: Client,
    config: DispatchConfig,
}

impl HttpTaskDispatcher {
    pub fn new(client: Client, config: DispatchConfig) -> Self {
        Self { client, config }
    }

    /// Webhook URL for one request, with the shared secret appended as a
    /// `sharedSecret` query parameter when present and non-blank.
    fn webhook_url(&self, request: &TaskRequest) -> Result<Url, DispatchError> {
        let mut url = Url::parse(&self.config.webhook_url)
            .map_err(|e| DispatchError::InvalidUrl(e.to_string()))?;

        if let Some(secret) = request
            .shared_secret
            .as_deref()
            .filter(|s| !s.trim().is_empty())
        {
            url.query_pairs_mut().append_pair("sharedSecret", secret);
        }

        Ok(url)
    }
}

#[async_trait]
impl TaskDispatcher for HttpTaskDispatcher {
    async fn dispatch(
        &self,
        request: &TaskRequest,
        cancel: &CancellationToken,
    ) -> Result<(), DispatchError> {
        let url = self.webhook_url(request)?;
        let body = TaskRequestBody::from_request(request);

        let send = self
            .client
            .post(url)
            .timeout(Duration::from_secs(self.config.request_timeout_secs))
            .json(&body)
            .send();

        let response = tokio::select! {
            _ = cancel.cancelled() => return Err(DispatchError::Cancelled),
            result = send => result?,
        };

        let status = response.status();
        tracing::info!("Webhook response status code: {}", status);

        if !status.is_success() {
            tracing::error!("Webhook request failed with status code {}", status);
            return Err(DispatchError::Status(status));
        }

        Ok(())
    }
}
