//! Error types for the request pipeline

use thiserror::Error;

/// Where an authorization failure was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOrigin {
    /// Envelope `code == 401` inside an otherwise successful response
    Envelope,
    /// Transport status 401
    Status,
}

/// Pipeline error taxonomy
///
/// Every variant has already been surfaced through the toast manager by the
/// time a caller sees it.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Envelope decoded with a code other than the success sentinel
    #[error("{message} (code {code})")]
    Business {
        code: i64,
        message: String,
        data: serde_json::Value,
    },

    /// Session rejected by the server; the session has been cleared
    #[error("{message}")]
    Unauthorized {
        code: i64,
        message: String,
        origin: AuthOrigin,
    },

    /// Network failure, timeout, or non-2xx status
    #[error("{message}")]
    Transport { code: Option<i64>, message: String },

    /// Response body could not be interpreted
    #[error("{message}")]
    Decode { status: u16, message: String },

    /// Session persistence failed
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    /// Request body could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP client could not be built
    #[error("HTTP client setup failed: {0}")]
    Client(#[from] reqwest::Error),
}

impl ApiError {
    /// Best available numeric code: envelope code, else transport status.
    pub fn code(&self) -> Option<i64> {
        match self {
            ApiError::Business { code, .. } | ApiError::Unauthorized { code, .. } => Some(*code),
            ApiError::Transport { code, .. } => *code,
            ApiError::Decode { status, .. } => Some(i64::from(*status)),
            ApiError::Storage(_) | ApiError::Serialization(_) | ApiError::Client(_) => None,
        }
    }

    /// User-facing message, as shown in the error toast.
    pub fn message(&self) -> String {
        match self {
            ApiError::Business { message, .. }
            | ApiError::Unauthorized { message, .. }
            | ApiError::Transport { message, .. }
            | ApiError::Decode { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    /// True when the pipeline has already shown this error in a toast.
    pub fn is_reported(&self) -> bool {
        !matches!(
            self,
            ApiError::Storage(_) | ApiError::Serialization(_) | ApiError::Client(_)
        )
    }

    /// True for failures below the envelope layer (network, status, undecodable body).
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport { .. } | ApiError::Decode { .. })
    }
}

/// Key-value storage error
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_prefers_envelope_code() {
        let err = ApiError::Business {
            code: 1003,
            message: "wrong password".into(),
            data: serde_json::Value::Null,
        };
        assert_eq!(err.code(), Some(1003));
        assert_eq!(err.message(), "wrong password");
        assert!(!err.is_transport());
    }

    #[test]
    fn test_transport_classification() {
        let err = ApiError::Transport {
            code: None,
            message: "connection refused".into(),
        };
        assert!(err.is_transport());
        assert!(!err.is_auth());
        assert_eq!(err.code(), None);

        let decode = ApiError::Decode {
            status: 200,
            message: "Request failed".into(),
        };
        assert!(decode.is_transport());
        assert_eq!(decode.code(), Some(200));
    }

    #[test]
    fn test_storage_errors_are_not_reported() {
        let err = ApiError::from(StoreError::Io(std::io::Error::other("disk full")));
        assert!(!err.is_reported());
        assert!(err.message().contains("disk full"));
    }

    #[test]
    fn test_client_setup_errors_are_not_reported() {
        let build = reqwest::Client::new().get("not a url").build().unwrap_err();
        let err = ApiError::from(build);
        assert!(!err.is_reported());
        assert!(!err.is_transport());
        assert_eq!(err.code(), None);
    }
}
