use crate::api::response::extract_content;
use crate::api::streaming::{sse_fragments, FragmentStream};
use crate::api::{CompletionTransport, RequestBody};
use crate::error::{R3asonError, Result};
use colored::*;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use tokio::time::Duration;

/// reqwest-backed transport for an OpenAI-compatible chat-completions
/// endpoint.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    stream_timeout: u64,
    request_timeout: u64,
    verbose: bool,
}

impl HttpTransport {
    pub fn new(
        api_key: &str,
        organization: Option<&str>,
        endpoint: impl Into<String>,
        stream_timeout: u64,
        request_timeout: u64,
        verbose: bool,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(|e| {
                R3asonError::Other(format!("Invalid authorization header: {}", e))
            })?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(org) = organization {
            headers.insert(
                "OpenAI-Organization",
                HeaderValue::from_str(org).map_err(|e| {
                    R3asonError::Other(format!("Invalid organization header: {}", e))
                })?,
            );
        }

        let client = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            stream_timeout,
            request_timeout,
            verbose,
        })
    }

    async fn dispatch(
        &self,
        request_body: &RequestBody,
        deadline: Option<Duration>,
    ) -> Result<reqwest::Response> {
        let mut request = self.client.post(&self.endpoint).json(request_body);
        if let Some(deadline) = deadline {
            request = request.timeout(deadline);
        }

        let response = request.send().await?;

        if self.verbose {
            eprintln!(
                "{}",
                format!("[r3ason] Response status: {}", response.status()).dimmed()
            );
        }

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(R3asonError::ApiError {
                status,
                message: error_text,
            });
        }

        Ok(response)
    }
}

impl CompletionTransport for HttpTransport {
    async fn complete(&self, request: &RequestBody) -> Result<String> {
        let deadline = Duration::from_secs(self.request_timeout);
        let response = self.dispatch(request, Some(deadline)).await?;

        let response_text = response.text().await?;
        if self.verbose {
            eprintln!(
                "{}",
                format!("[r3ason] Raw response: {}", response_text).dimmed()
            );
        }

        let response_json: Value = serde_json::from_str(&response_text)?;
        extract_content(&response_json)?
            .ok_or_else(|| R3asonError::Other("No content in response".to_string()))
    }

    async fn open_stream(&self, request: &RequestBody) -> Result<FragmentStream> {
        let response = self.dispatch(request, None).await?;
        Ok(sse_fragments(response, self.stream_timeout, self.verbose))
    }
}
