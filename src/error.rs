use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Failure raised by the services.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Serialize)]
struct ErrorBody {
    status: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

/// Error as it leaves a handler.
#[derive(Debug)]
pub struct HttpError {
    pub status: StatusCode,
    pub message: String,
    pub detail: Option<String>,
}

impl HttpError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            detail: None,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    /// Not-found and validation failures keep their own message; anything else
    /// is reported with `fallback`, plus the raw error when `debug` is on.
    pub fn from_app(err: AppError, fallback: &str, debug: bool) -> Self {
        match err {
            AppError::NotFound(m) => Self::new(StatusCode::NOT_FOUND, m),
            AppError::Validation(m) => Self::new(StatusCode::UNPROCESSABLE_ENTITY, m),
            AppError::Internal(e) => {
                let raw = format!("{e:#}");
                error!(error = %raw, "{}", fallback);
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: fallback.to_string(),
                    detail: debug.then_some(raw),
                }
            }
        }
    }

    pub fn mapper(debug: bool, fallback: &'static str) -> impl Fn(AppError) -> HttpError {
        move |e| HttpError::from_app(e, fallback, debug)
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            status: "error",
            message: self.message,
            detail: self.detail,
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_keeps_its_message() {
        let e = HttpError::from_app(AppError::not_found("Cart item not found."), "Failed.", true);
        assert_eq!(e.status, StatusCode::NOT_FOUND);
        assert_eq!(e.message, "Cart item not found.");
        assert!(e.detail.is_none());
    }

    #[test]
    fn validation_maps_to_422() {
        let e = HttpError::from_app(AppError::validation("bad quantity"), "Failed.", false);
        assert_eq!(e.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(e.message, "bad quantity");
    }

    #[test]
    fn internal_hides_raw_error_unless_debug() {
        let quiet = HttpError::from_app(
            AppError::Internal(anyhow::anyhow!("connection refused")),
            "Failed to add item to cart. Please try again.",
            false,
        );
        assert_eq!(quiet.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(quiet.message, "Failed to add item to cart. Please try again.");
        assert!(quiet.detail.is_none());

        let loud = HttpError::from_app(
            AppError::Internal(anyhow::anyhow!("connection refused")),
            "Failed to add item to cart. Please try again.",
            true,
        );
        assert_eq!(loud.detail.as_deref(), Some("connection refused"));
    }

    #[test]
    fn error_body_shape() {
        let body = ErrorBody {
            status: "error",
            message: "Product not found.".into(),
            detail: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "Product not found.");
        assert!(json.get("detail").is_none());
    }
}
