use serde::{Deserialize, Serialize};

/// Prompt field of a POST /api/generate body.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateBody {
    pub prompt: Option<String>,
}

/// Prompt query parameter of a GET /api/generate request.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateQuery {
    pub prompt: Option<String>,
}

/// Classified result of a single upstream attempt.
///
/// Classification happens entirely in the upstream client; the orchestrator
/// only decides whether an outcome terminates the request or earns a retry.
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamOutcome {
    ImageSuccess { bytes: Vec<u8>, content_type: String },
    EmptyBody,
    CredentialsRejected,
    UpstreamError { status: u16, body: String },
    Timeout,
    NetworkFailure { detail: String },
}

impl UpstreamOutcome {
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamOutcome::ImageSuccess { .. } => "image_success",
            UpstreamOutcome::EmptyBody => "empty_body",
            UpstreamOutcome::CredentialsRejected => "credentials_rejected",
            UpstreamOutcome::UpstreamError { .. } => "upstream_error",
            UpstreamOutcome::Timeout => "timeout",
            UpstreamOutcome::NetworkFailure { .. } => "network_failure",
        }
    }
}

/// Final result of one inbound generation request.
///
/// `Image` is only ever produced from `UpstreamOutcome::ImageSuccess`; the
/// bytes are fully buffered before anything is returned to the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationResult {
    Image {
        bytes: Vec<u8>,
        content_type: String,
    },
    Failure {
        status: u16,
        error: String,
        details: Option<String>,
    },
}

impl GenerationResult {
    pub fn failure(status: u16, error: impl Into<String>) -> Self {
        GenerationResult::Failure {
            status,
            error: error.into(),
            details: None,
        }
    }

    pub fn failure_with_details(
        status: u16,
        error: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        GenerationResult::Failure {
            status,
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

/// JSON body returned for every failure response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        ErrorBody {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_kinds() {
        assert_eq!(
            UpstreamOutcome::CredentialsRejected.kind(),
            "credentials_rejected"
        );
        assert_eq!(
            UpstreamOutcome::UpstreamError {
                status: 503,
                body: String::new()
            }
            .kind(),
            "upstream_error"
        );
    }

    #[test]
    fn test_error_body_omits_empty_details() {
        let json = serde_json::to_string(&ErrorBody::new("boom")).unwrap();
        assert_eq!(json, r#"{"error":"boom"}"#);

        let json = serde_json::to_string(&ErrorBody::new("boom").with_details("ctx")).unwrap();
        assert_eq!(json, r#"{"error":"boom","details":"ctx"}"#);
    }
}
