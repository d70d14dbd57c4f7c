use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized - the session has been cleared")]
    Unauthorized,

    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for unstructured response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// The two structured error shapes the backend produces: a single message,
/// or a list of field problems.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    errors: Option<Vec<String>>,
}

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            format!(
                "{}... (truncated, {} total bytes)",
                &body[..MAX_ERROR_BODY_LENGTH],
                body.len()
            )
        }
    }

    /// Pull the human-readable message out of a structured error body,
    /// falling back to the truncated raw body.
    fn message_from(body: &str) -> String {
        if let Ok(ErrorBody {
            error: Some(message),
            ..
        }) = serde_json::from_str(body)
        {
            return message;
        }
        Self::truncate_body(body)
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return ApiError::Unauthorized;
        }

        // A structured problem list (e.g. signup field validation) is
        // surfaced verbatim for display
        if status.is_client_error() {
            if let Ok(ErrorBody {
                errors: Some(problems),
                ..
            }) = serde_json::from_str(body)
            {
                if !problems.is_empty() {
                    return ApiError::Validation(problems);
                }
            }
        }

        match status.as_u16() {
            404 => ApiError::NotFound(Self::message_from(body)),
            500..=599 => ApiError::ServerError(Self::message_from(body)),
            _ => ApiError::Rejected(Self::message_from(body)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_401_maps_to_unauthorized_regardless_of_body() {
        let err = ApiError::from_status(StatusCode::UNAUTHORIZED, r#"{"error": "Unauthorized"}"#);
        assert!(matches!(err, ApiError::Unauthorized));

        let err = ApiError::from_status(StatusCode::UNAUTHORIZED, "");
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[test]
    fn test_errors_list_maps_to_validation() {
        let body = r#"{"errors": ["Email has already been taken", "Password confirmation doesn't match Password"]}"#;
        let err = ApiError::from_status(StatusCode::UNPROCESSABLE_ENTITY, body);
        match err {
            ApiError::Validation(problems) => {
                assert_eq!(problems.len(), 2);
                assert_eq!(problems[0], "Email has already been taken");
            }
            other => panic!("Expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_errors_list_falls_through() {
        let err = ApiError::from_status(StatusCode::BAD_REQUEST, r#"{"errors": []}"#);
        assert!(matches!(err, ApiError::Rejected(_)));
    }

    #[test]
    fn test_single_error_string_is_extracted() {
        let err = ApiError::from_status(StatusCode::BAD_REQUEST, r#"{"error": "No ingredients"}"#);
        match err {
            ApiError::Rejected(message) => assert_eq!(message, "No ingredients"),
            other => panic!("Expected Rejected, got {:?}", other),
        }
    }

    #[test]
    fn test_404_maps_to_not_found() {
        let err = ApiError::from_status(StatusCode::NOT_FOUND, r#"{"error": "Recipe not found"}"#);
        match err {
            ApiError::NotFound(message) => assert_eq!(message, "Recipe not found"),
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_5xx_maps_to_server_error_with_raw_body() {
        let err = ApiError::from_status(StatusCode::BAD_GATEWAY, "upstream exploded");
        match err {
            ApiError::ServerError(message) => assert_eq!(message, "upstream exploded"),
            other => panic!("Expected ServerError, got {:?}", other),
        }
    }

    #[test]
    fn test_long_unstructured_body_is_truncated() {
        let body = "x".repeat(2000);
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, &body);
        match err {
            ApiError::ServerError(message) => {
                assert!(message.len() < body.len());
                assert!(message.contains("truncated"));
                assert!(message.contains("2000 total bytes"));
            }
            other => panic!("Expected ServerError, got {:?}", other),
        }
    }
}
