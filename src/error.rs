//! Error types for the Oracle Cloud ESS SDK

use thiserror::Error;

/// Result type alias for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;

/// Main error type for the SDK
#[derive(Error, Debug)]
pub enum SdkError {
    /// The remote service answered with a non-success HTTP status
    #[error("HTTP status {status}: {body}")]
    Transport {
        /// HTTP status code
        status: u16,
        /// Response body, kept for diagnostics
        body: String,
    },

    /// A success response whose body lacks the expected field or shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Polling ran out of attempts while the job was still in progress
    #[error("Request Id: {request_id}, Message: job is still running")]
    Timeout { request_id: String },

    /// The job finished with an `ERROR*` status
    #[error("Request Id: {request_id}, Job Status: {status}")]
    RemoteJob { request_id: String, status: String },

    /// The request never produced a response (connection, TLS, client setup)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// URL parsing errors
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// SOAP envelope could not be written
    #[error("XML error: {0}")]
    Xml(String),
}

impl SdkError {
    /// Create a transport error from status code and body
    pub fn transport(status: u16, body: impl Into<String>) -> Self {
        Self::Transport {
            status,
            body: body.into(),
        }
    }

    /// The ESS request id carried by this error, if any.
    ///
    /// Available for [`SdkError::Timeout`] and [`SdkError::RemoteJob`], so the
    /// caller can keep monitoring the request out-of-band.
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Self::Timeout { request_id } | Self::RemoteJob { request_id, .. } => Some(request_id),
            _ => None,
        }
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Transport { status, .. } if (400..500).contains(status))
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Transport { status, .. } if *status >= 500)
    }
}

impl From<quick_xml::Error> for SdkError {
    fn from(e: quick_xml::Error) -> Self {
        SdkError::Xml(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_is_exposed_for_job_outcomes() {
        let timeout = SdkError::Timeout {
            request_id: "42".to_string(),
        };
        let remote = SdkError::RemoteJob {
            request_id: "43".to_string(),
            status: "ERROR".to_string(),
        };

        assert_eq!(timeout.request_id(), Some("42"));
        assert_eq!(remote.request_id(), Some("43"));
        assert_eq!(SdkError::transport(500, "boom").request_id(), None);
    }

    #[test]
    fn test_transport_status_classification() {
        assert!(SdkError::transport(404, "").is_client_error());
        assert!(!SdkError::transport(404, "").is_server_error());
        assert!(SdkError::transport(503, "").is_server_error());
        assert!(!SdkError::MalformedResponse("x".into()).is_client_error());
    }

    #[test]
    fn test_display_messages() {
        let err = SdkError::RemoteJob {
            request_id: "7".to_string(),
            status: "ERROR_VALIDATION".to_string(),
        };
        assert_eq!(err.to_string(), "Request Id: 7, Job Status: ERROR_VALIDATION");

        let err = SdkError::transport(401, "Unauthorized");
        assert_eq!(err.to_string(), "HTTP status 401: Unauthorized");
    }
}
