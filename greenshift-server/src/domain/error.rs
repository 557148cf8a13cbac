use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("Not authorized as a vendor")]
    NotVendor,
    #[error("email already registered")]
    EmailTaken,
    #[error("user not found: {0}")]
    UserNotFound(Uuid),
    #[error("product not found: {0}")]
    ProductNotFound(Uuid),
    #[error("analysis service unavailable")]
    OracleUnavailable,
    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
}

impl ResponseError for DomainError {
    fn status_code(&self) -> StatusCode {
        match self {
            DomainError::Validation(_) => StatusCode::BAD_REQUEST,
            DomainError::Unauthorized(_) | DomainError::NotVendor => StatusCode::UNAUTHORIZED,
            DomainError::EmailTaken => StatusCode::CONFLICT,
            DomainError::UserNotFound(_) | DomainError::ProductNotFound(_) => StatusCode::NOT_FOUND,
            DomainError::OracleUnavailable | DomainError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = self.to_string();
        HttpResponse::build(self.status_code()).json(ErrorBody {
            message: message.as_str(),
        })
    }
}
