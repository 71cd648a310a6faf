//! Error codes and their mapping onto HTTP statuses and CLI exit codes.

use std::fmt;

use http::StatusCode;

/// Surface-agnostic error code that maps to an HTTP status and a CLI exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// 400 Bad Request / exit 2
    InvalidInput,
    /// 404 Not Found / exit 1
    NotFound,
    /// 409 Conflict / exit 4
    Conflict,
    /// 500 Internal Server Error / exit 1
    ///
    /// An upstream collaborator (the auth service) failed or answered with garbage.
    Upstream,
    /// 500 Internal Server Error / exit 1
    ///
    /// Writing an artifact to durable storage failed.
    Persistence,
    /// 500 Internal Server Error / exit 1
    Internal,
}

impl ErrorCode {
    /// Convert to HTTP status code
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorCode::InvalidInput => 400,
            ErrorCode::NotFound => 404,
            ErrorCode::Conflict => 409,
            ErrorCode::Upstream | ErrorCode::Persistence | ErrorCode::Internal => 500,
        }
    }

    /// Convert to a typed [`StatusCode`].
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Convert to CLI exit code
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorCode::InvalidInput => 2,
            ErrorCode::Conflict => 4,
            ErrorCode::NotFound
            | ErrorCode::Upstream
            | ErrorCode::Persistence
            | ErrorCode::Internal => 1,
        }
    }

    /// Stable upper-case name, used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::Upstream => "UPSTREAM",
            ErrorCode::Persistence => "PERSISTENCE",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait for converting errors to surface-agnostic error codes.
pub trait IntoErrorCode {
    /// Get the error code for this error
    fn error_code(&self) -> ErrorCode;

    /// Get a human-readable message
    fn message(&self) -> String;
}

impl IntoErrorCode for std::io::Error {
    fn error_code(&self) -> ErrorCode {
        match self.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::NotFound,
            std::io::ErrorKind::InvalidInput | std::io::ErrorKind::InvalidData => {
                ErrorCode::InvalidInput
            }
            _ => ErrorCode::Persistence,
        }
    }

    fn message(&self) -> String {
        self.to_string()
    }
}

impl IntoErrorCode for serde_json::Error {
    fn error_code(&self) -> ErrorCode {
        if self.is_io() {
            ErrorCode::Persistence
        } else {
            ErrorCode::InvalidInput
        }
    }

    fn message(&self) -> String {
        self.to_string()
    }
}

/// JSON body returned by HTTP endpoints when something goes wrong: `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }

    /// Build a response for `err`, replacing its detail with `generic` unless
    /// `expose_detail` is set.
    pub fn from_error<E: IntoErrorCode>(err: &E, expose_detail: bool, generic: &str) -> Self {
        if expose_detail {
            Self::new(err.message())
        } else {
            Self::new(generic)
        }
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.error)
    }
}

impl std::error::Error for ErrorResponse {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_codes() {
        assert_eq!(ErrorCode::NotFound.http_status(), 404);
        assert_eq!(ErrorCode::InvalidInput.http_status(), 400);
        assert_eq!(ErrorCode::Upstream.http_status(), 500);
        assert_eq!(ErrorCode::Persistence.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_exit_codes_are_nonzero() {
        for code in [
            ErrorCode::InvalidInput,
            ErrorCode::NotFound,
            ErrorCode::Conflict,
            ErrorCode::Upstream,
            ErrorCode::Persistence,
            ErrorCode::Internal,
        ] {
            assert_ne!(code.exit_code(), 0, "{code} must fail the process");
        }
        assert_eq!(ErrorCode::Persistence.exit_code(), 1);
    }

    #[test]
    fn test_io_error_mapping() {
        let denied = std::io::Error::from(std::io::ErrorKind::PermissionDenied);
        assert_eq!(denied.error_code(), ErrorCode::Persistence);

        let missing = std::io::Error::from(std::io::ErrorKind::NotFound);
        assert_eq!(missing.error_code(), ErrorCode::NotFound);
    }

    #[test]
    fn test_error_response_hides_detail() {
        let err = std::io::Error::other("disk on fire at /var/secret");
        let hidden = ErrorResponse::from_error(&err, false, "Internal Server Error");
        assert_eq!(hidden.error, "Internal Server Error");

        let shown = ErrorResponse::from_error(&err, true, "Internal Server Error");
        assert!(shown.error.contains("disk on fire"));
    }

    #[test]
    fn test_error_response_shape() {
        let body = serde_json::to_value(ErrorResponse::new("boom")).unwrap();
        assert_eq!(body, serde_json::json!({"error": "boom"}));
    }
}
