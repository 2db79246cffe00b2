use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::fmt;

use crate::models::SendResponse;
use crate::validation::ValidationError;

pub const MSG_BAD_REQUEST: &str = "Solicitud inválida.";
pub const MSG_REQUIRED_FIELDS: &str = "Todos los campos marcados son obligatorios.";
pub const MSG_VERIFICATION_FAILED: &str = "Error de verificación de seguridad (reCAPTCHA).";
pub const MSG_DELIVERY_FAILED: &str = "Error al enviar el correo.";
pub const MSG_INTERNAL: &str = "Error interno del servidor.";
pub const MSG_RATE_LIMITED: &str = "Demasiadas solicitudes. Intenta nuevamente en unos segundos.";

/// Application-specific error types.
#[derive(Debug, Clone)]
pub enum AppError {
    /// Request body could not be read as a lead submission.
    BadRequest(String),
    /// Required form fields missing.
    Validation(ValidationError),
    /// The verification service explicitly rejected the token.
    VerificationRejected(Vec<String>),
    /// Too many submissions from the same client; seconds until the next slot.
    RateLimited(u64),
    /// The delivery provider answered with an error.
    DeliveryFailed(String),
    /// Transport or decoding error talking to an external API.
    ExternalApiError(String),
    /// Internal server error.
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Validation(e) => write!(f, "Validation failed: {}", e),
            AppError::VerificationRejected(codes) => {
                write!(f, "Verification rejected: [{}]", codes.join(", "))
            }
            AppError::RateLimited(wait) => write!(f, "Rate limited: retry in {}s", wait),
            AppError::DeliveryFailed(msg) => write!(f, "Delivery failed: {}", msg),
            AppError::ExternalApiError(msg) => write!(f, "External API error: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_)
            | AppError::Validation(_)
            | AppError::VerificationRejected(_) => StatusCode::BAD_REQUEST,
            AppError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::DeliveryFailed(_)
            | AppError::ExternalApiError(_)
            | AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    /// Maps each variant to its status code and the user-facing message.
    /// Server-side failures carry the raw detail in `debug`.
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            AppError::BadRequest(msg) => {
                tracing::warn!("Rejected malformed submission: {}", msg);
                SendResponse::message(MSG_BAD_REQUEST)
            }
            AppError::Validation(e) => {
                tracing::warn!("Rejected incomplete submission: {}", e);
                SendResponse::message(MSG_REQUIRED_FIELDS)
            }
            AppError::VerificationRejected(codes) => {
                tracing::warn!("reCAPTCHA rejected submission: {:?}", codes);
                SendResponse::message(MSG_VERIFICATION_FAILED)
            }
            AppError::RateLimited(wait) => {
                tracing::warn!("Rate limited submission, next slot in {}s", wait);
                SendResponse::message(MSG_RATE_LIMITED)
            }
            AppError::DeliveryFailed(detail) => {
                tracing::error!("Resend Error: {}", detail);
                SendResponse {
                    debug: Some(detail),
                    ..SendResponse::message(MSG_DELIVERY_FAILED)
                }
            }
            AppError::ExternalApiError(detail) | AppError::InternalError(detail) => {
                tracing::error!("Server Error: {}", detail);
                SendResponse {
                    debug: Some(detail),
                    ..SendResponse::message(MSG_INTERNAL)
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::ExternalApiError(err.to_string())
    }
}
