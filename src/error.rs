use actix_web::{error::BlockingError, http::StatusCode, HttpResponse, ResponseError};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;
use tracing::{error, warn};

use crate::protocol::SimpleResponse;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("booking {0} is already cancelled")]
    AlreadyCancelled(i32),

    #[error("booking {0} is not scheduled")]
    NotScheduled(i32),

    #[error("slot is not available")]
    SlotUnavailable,

    #[error("slot belongs to another professional")]
    ProviderMismatch,

    #[error("database error: {0}")]
    Database(DieselError),

    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("blocking task failed: {0}")]
    Blocking(#[from] BlockingError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn not_found<S: ToString>(what: S) -> Self {
        Self::NotFound(what.to_string())
    }

    pub fn invalid<S: ToString>(msg: S) -> Self {
        Self::InvalidInput(msg.to_string())
    }
}

impl From<DieselError> for ServiceError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => Self::NotFound("record".to_string()),
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                Self::Conflict(format!("duplicate record: {}", info.message()))
            }
            err => Self::Database(err),
        }
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Conflict(_)
            | ServiceError::AlreadyCancelled(_)
            | ServiceError::NotScheduled(_)
            | ServiceError::SlotUnavailable => StatusCode::CONFLICT,
            ServiceError::InvalidInput(_) | ServiceError::ProviderMismatch => {
                StatusCode::BAD_REQUEST
            }
            ServiceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServiceError::Database(_)
            | ServiceError::Pool(_)
            | ServiceError::Blocking(_)
            | ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let msg = if status.is_server_error() {
            error!(error = %self, "request failed");
            "internal server error".to_string()
        } else {
            warn!(status = status.as_u16(), error = %self, "request rejected");
            self.to_string()
        };

        HttpResponse::build(status).json(SimpleResponse::err(msg))
    }
}
