use crate::config::Config;
use crate::errors::AppError;
use crate::models::{LeadSubmission, SendResponse, VerificationOutcome};
use crate::notification::{MailSettings, NotificationMessage};
use crate::recaptcha::RecaptchaClient;
use crate::resend::ResendClient;
use crate::validation::validate_submission;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use std::sync::Arc;

pub const MSG_SENT: &str = "Mensaje enviado con éxito";

/// Shared application state injected into handlers.
///
/// Outbound clients are built once per process; handlers only read them.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Anti-abuse verification client.
    pub recaptcha: RecaptchaClient,
    /// E-mail delivery client.
    pub resend: ResendClient,
    /// Sender and operator inbox for lead notifications.
    pub mail: MailSettings,
}

impl AppState {
    pub fn from_config(config: Config) -> Result<Self, AppError> {
        let recaptcha = RecaptchaClient::from_config(&config)?;
        let resend = ResendClient::from_config(&config)?;
        let mail = MailSettings::from_config(&config);

        Ok(Self {
            config,
            recaptcha,
            resend,
            mail,
        })
    }
}

/// Health check endpoint.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": chrono::Utc::now(),
        })),
    )
}

/// POST /api/send
///
/// Contact form intake.
///
/// Flow:
/// 1. Parse the JSON body (400 when malformed).
/// 2. Validate required fields (400, no outbound call).
/// 3. reCAPTCHA check when a secret and a token are both present
///    (400 on explicit rejection; low scores are only logged).
/// 4. Compose the notification e-mail.
/// 5. Deliver it through Resend (500 on provider error).
///
/// Any transport failure along the way ends in 500.
pub async fn send_lead(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LeadSubmission>, JsonRejection>,
) -> Result<(StatusCode, Json<SendResponse>), AppError> {
    let Json(submission) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    // Step 2: required fields, before any external call
    let lead = validate_submission(&submission)?;
    tracing::info!("📨 Received lead from contact form: service={}", lead.service);

    // Step 3: anti-abuse check (fail-open when unconfigured)
    match state.recaptcha.check(lead.token.as_deref()).await? {
        // check() already warned about the skip reason
        VerificationOutcome::Skipped(_) => {}
        VerificationOutcome::Passed { score } => {
            tracing::debug!("✓ reCAPTCHA passed (score {:?})", score);
        }
        VerificationOutcome::LowScore { score } => {
            tracing::warn!(
                "⚠️  Low reCAPTCHA score {:.2} (threshold {:.2}), delivering anyway",
                score,
                state.config.recaptcha_min_score
            );
        }
        VerificationOutcome::Rejected { error_codes } => {
            return Err(AppError::VerificationRejected(error_codes));
        }
    }

    // Step 4 + 5: compose and deliver
    let message = NotificationMessage::compose(&lead, &state.mail);
    let receipt = state.resend.send(&message).await?;

    tracing::info!("✅ Lead notification sent: {}", receipt.id);

    Ok((
        StatusCode::OK,
        Json(SendResponse {
            message: MSG_SENT.to_string(),
            id: Some(receipt.id),
            debug: None,
        }),
    ))
}
