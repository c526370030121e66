use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Faults surfaced by [`PredictionClient`](crate::ai::PredictionClient).
///
/// Nothing here is retried or swallowed by the client; callers branch on
/// [`PredictError::kind`] and decide for themselves.
#[derive(Error, Debug)]
pub enum PredictError {
    #[error("could not reach prediction service: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("prediction service responded with {status}")]
    Service {
        status: StatusCode,
        body: Option<Value>,
    },

    #[error("prediction service returned invalid JSON: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
        body: String,
    },

    #[error("prediction request timed out after {0:?}")]
    Timeout(Duration),

    #[error("prediction request was cancelled")]
    Cancelled,

    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("invalid service URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    Transport,
    Service,
    Decode,
    Timeout,
    Cancelled,
    Config,
}

impl FaultKind {
    /// Whether a caller-initiated retry of the same request can succeed.
    pub fn is_retryable(self) -> bool {
        matches!(self, FaultKind::Transport | FaultKind::Timeout)
    }
}

impl PredictError {
    pub fn kind(&self) -> FaultKind {
        match self {
            PredictError::Transport(_) => FaultKind::Transport,
            PredictError::Service { .. } => FaultKind::Service,
            PredictError::Decode { .. } => FaultKind::Decode,
            PredictError::Timeout(_) => FaultKind::Timeout,
            PredictError::Cancelled => FaultKind::Cancelled,
            PredictError::InvalidUrl(_)
            | PredictError::InvalidConfig(_)
            | PredictError::ClientBuild(_)
            | PredictError::Encode(_) => FaultKind::Config,
        }
    }

    /// Status code of a `Service` fault.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            PredictError::Service { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Decoded error body of a `Service` fault, if the backend sent JSON.
    pub fn service_body(&self) -> Option<&Value> {
        match self {
            PredictError::Service { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// Map a reqwest failure, keeping transport timeouts distinct.
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            PredictError::Timeout(timeout)
        } else {
            PredictError::Transport(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_service_error_display() {
        let error = PredictError::Service {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: Some(json!({"error": "model unavailable"})),
        };
        assert_eq!(
            error.to_string(),
            "prediction service responded with 500 Internal Server Error"
        );
        assert_eq!(error.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert_eq!(
            error.service_body(),
            Some(&json!({"error": "model unavailable"}))
        );
    }

    #[test]
    fn test_decode_error_keeps_body() {
        let source = serde_json::from_str::<Value>("not json").unwrap_err();
        let error = PredictError::Decode {
            source,
            body: "not json".to_string(),
        };
        assert_eq!(error.kind(), FaultKind::Decode);
        assert!(error.to_string().starts_with("prediction service returned invalid JSON"));
        match error {
            PredictError::Decode { body, .. } => assert_eq!(body, "not json"),
            _ => panic!("Expected Decode"),
        }
    }

    #[test]
    fn test_url_error_conversion() {
        let parse_error = url::Url::parse("not a url").unwrap_err();
        let error = PredictError::from(parse_error);
        assert_eq!(error.kind(), FaultKind::Config);
    }

    #[test]
    fn test_client_build_is_config_fault() {
        let build_error = reqwest::Client::new().get("not a url").build().unwrap_err();
        let error = PredictError::ClientBuild(build_error);
        assert_eq!(error.kind(), FaultKind::Config);
        assert!(!error.kind().is_retryable());
    }

    #[test]
    fn test_retryable_kinds() {
        assert!(FaultKind::Transport.is_retryable());
        assert!(FaultKind::Timeout.is_retryable());
        assert!(!FaultKind::Service.is_retryable());
        assert!(!FaultKind::Decode.is_retryable());
        assert!(!FaultKind::Cancelled.is_retryable());
    }

    #[test]
    fn test_cancelled_has_no_status() {
        let error = PredictError::Cancelled;
        assert_eq!(error.kind(), FaultKind::Cancelled);
        assert_eq!(error.status(), None);
        assert!(error.service_body().is_none());
    }
}
