use actix_web::http::{StatusCode, header};
use actix_web::{HttpResponse, ResponseError};
use derive_more::{Display, Error};
use serde_json::json;

/// Failures a handler can end with. Validation failures are not errors here:
/// they re-render the submitted form (see `forms::FormErrors`).
#[derive(Debug, Display, Error)]
pub enum AppError {
    /// No session, an expired session, or a role outside the capability's set.
    #[display(fmt = "authorization required")]
    Unauthorized,

    #[display(fmt = "{} not found", _0)]
    NotFound(#[error(not(source))] &'static str),

    #[display(fmt = "database error: {}", _0)]
    Database(sqlx::Error),

    #[display(fmt = "internal error: {}", _0)]
    Internal(#[error(not(source))] String),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err)
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::SEE_OTHER,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Unauthorized => HttpResponse::SeeOther()
                .insert_header((header::LOCATION, "/login"))
                .finish(),
            AppError::NotFound(_) => HttpResponse::NotFound().json(json!({
                "message": self.to_string()
            })),
            AppError::Database(e) => {
                tracing::error!(error = %e, "Unhandled database error");
                HttpResponse::InternalServerError().json(json!({
                    "message": "Internal Server Error"
                }))
            }
            AppError::Internal(e) => {
                tracing::error!(error = %e, "Internal error");
                HttpResponse::InternalServerError().json(json!({
                    "message": "Internal Server Error"
                }))
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Turns an id lookup into `Found(record) | NotFound` for handlers.
pub trait OrNotFound<T> {
    fn or_not_found(self, what: &'static str) -> AppResult<T>;
}

impl<T> OrNotFound<T> for Option<T> {
    fn or_not_found(self, what: &'static str) -> AppResult<T> {
        self.ok_or(AppError::NotFound(what))
    }
}
