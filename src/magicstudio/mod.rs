pub mod credentials;

use crate::{
    config::UpstreamConfig,
    error::{RelayError, Result},
    models::UpstreamOutcome,
};
use chrono::Utc;
use reqwest::Client;

pub use credentials::CredentialPair;

/// Upstream error bodies are passed through to the caller truncated to this
/// many characters.
const BODY_SNIPPET_LIMIT: usize = 500;

/// One-shot client for the Magic Studio art-generation endpoint.
///
/// Performs exactly one POST attempt per call and classifies the raw
/// response; the retry policy lives entirely in the orchestrator.
#[derive(Clone)]
pub struct MagicStudioClient {
    client: Client,
    config: UpstreamConfig,
}

impl MagicStudioClient {
    pub fn new(config: UpstreamConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| RelayError::ClientError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &UpstreamConfig {
        &self.config
    }

    /// Sends one generation request with the given credentials and classifies
    /// the response.
    pub async fn attempt(&self, prompt: &str, credentials: &CredentialPair) -> UpstreamOutcome {
        // The upstream expects a fractional epoch-seconds string, refreshed
        // on every attempt.
        let request_timestamp =
            format!("{:.6}", Utc::now().timestamp_micros() as f64 / 1_000_000.0);

        let form = [
            ("prompt", prompt),
            ("output_format", "bytes"),
            ("user_profile_id", ""),
            ("anonymous_user_id", credentials.anonymous_user_id.as_str()),
            ("request_timestamp", request_timestamp.as_str()),
            ("user_is_subscribed", "false"),
            ("client_id", credentials.client_id.as_str()),
        ];

        // The upstream gates on browser-looking headers; missing or
        // mismatched values get the request rejected outright.
        let response = match self
            .client
            .post(&self.config.api_url)
            .header(reqwest::header::USER_AGENT, &self.config.user_agent)
            .header(reqwest::header::ACCEPT, "application/json, text/plain, */*")
            .header(reqwest::header::REFERER, &self.config.referer)
            .header(reqwest::header::ORIGIN, &self.config.origin)
            .form(&form)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) if err.is_timeout() => return UpstreamOutcome::Timeout,
            Err(err) => {
                return UpstreamOutcome::NetworkFailure {
                    detail: err.to_string(),
                }
            }
        };

        let status = response.status().as_u16();

        match status {
            200 => {
                let content_type = response
                    .headers()
                    .get(reqwest::header::CONTENT_TYPE)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("")
                    .to_string();

                let bytes = match response.bytes().await {
                    Ok(bytes) => bytes,
                    Err(err) if err.is_timeout() => return UpstreamOutcome::Timeout,
                    Err(err) => {
                        return UpstreamOutcome::NetworkFailure {
                            detail: err.to_string(),
                        }
                    }
                };

                if !bytes.is_empty() && content_type.contains("image") {
                    UpstreamOutcome::ImageSuccess {
                        bytes: bytes.to_vec(),
                        content_type,
                    }
                } else {
                    UpstreamOutcome::EmptyBody
                }
            }
            422 => UpstreamOutcome::CredentialsRejected,
            _ => {
                let body = response.text().await.unwrap_or_default();
                UpstreamOutcome::UpstreamError {
                    status,
                    body: body.chars().take(BODY_SNIPPET_LIMIT).collect(),
                }
            }
        }
    }
}
