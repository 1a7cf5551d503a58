use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized - token may be expired")]
    Unauthorized,

    #[error("Request failed ({status}): {body}")]
    RequestFailed {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data.
    /// The cut must land on a char boundary; a fixed byte index would
    /// panic on multibyte bodies.
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!(
                "{}... (truncated, {} total bytes)",
                &body[..end],
                body.len()
            )
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            _ => ApiError::RequestFailed {
                status,
                body: Self::truncate_body(body),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status_unauthorized() {
        let err = ApiError::from_status(StatusCode::UNAUTHORIZED, "no token");
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[test]
    fn test_from_status_generic_failure() {
        let err = ApiError::from_status(StatusCode::BAD_REQUEST, "username taken");
        match err {
            ApiError::RequestFailed { status, body } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(body, "username taken");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_truncate_multibyte_body_on_char_boundary() {
        // 200 euro signs are 600 bytes; byte 500 falls inside one
        let body = "€".repeat(200);
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, &body);
        match err {
            ApiError::RequestFailed { body, .. } => {
                assert!(body.contains("truncated"));
                assert!(body.contains("600 total bytes"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_truncate_long_body() {
        let long_body = "x".repeat(2000);
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, &long_body);
        match err {
            ApiError::RequestFailed { body, .. } => {
                assert!(body.len() < 600);
                assert!(body.contains("truncated"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
