use actix_web::{HttpResponse, http::StatusCode};
use derive_more::Display;
use serde_json::json;

/// Uniform error taxonomy for the whole API surface.
///
/// Every handler returns `Result<_, ApiError>`; the payload carried by each
/// variant ends up in the `detail` field of the JSON error body.
#[derive(Debug, Display)]
pub enum ApiError {
    #[display(fmt = "Validation Error")]
    Validation(String),

    #[display(fmt = "Not Found")]
    NotFound(String),

    #[display(fmt = "Conflict")]
    Conflict(String),

    #[display(fmt = "Internal Server Error")]
    Internal(String),
}

impl ApiError {
    fn detail(&self) -> &str {
        match self {
            ApiError::Validation(d)
            | ApiError::NotFound(d)
            | ApiError::Conflict(d)
            | ApiError::Internal(d) => d,
        }
    }
}

impl actix_web::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "success": false,
            "error": self.to_string(),
            "detail": self.detail(),
        }))
    }
}

// Store failures surface once, at the handler boundary. No retries.
impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Internal(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    #[test]
    fn status_codes_follow_the_taxonomy() {
        assert_eq!(
            ApiError::Validation("bad".into()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::NotFound("gone".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Conflict("dup".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn error_label_matches_display() {
        assert_eq!(
            ApiError::Validation("x".into()).to_string(),
            "Validation Error"
        );
        assert_eq!(ApiError::NotFound("x".into()).to_string(), "Not Found");
    }
}
