use crate::config::Config;
use crate::errors::AppError;
use crate::models::{SkipReason, VerificationOutcome, VerificationResult};
use std::time::Duration;

/// Client for the reCAPTCHA `siteverify` endpoint.
#[derive(Clone)]
pub struct RecaptchaClient {
    client: reqwest::Client,
    verify_url: String,
    secret: Option<String>,
    min_score: f64,
}

impl RecaptchaClient {
    /// Creates a new `RecaptchaClient`.
    ///
    /// # Arguments
    ///
    /// * `verify_url` - Full URL of the `siteverify` endpoint.
    /// * `secret` - Server-side secret key; `None` disables verification.
    /// * `min_score` - Scores below this are reported as [`VerificationOutcome::LowScore`].
    /// * `timeout` - Upper bound for a single verification call.
    pub fn new(
        verify_url: String,
        secret: Option<String>,
        min_score: f64,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                AppError::InternalError(format!("Failed to create reCAPTCHA client: {}", e))
            })?;

        Ok(Self {
            client,
            verify_url,
            secret,
            min_score,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Self::new(
            config.recaptcha_verify_url.clone(),
            config.recaptcha_secret.clone(),
            config.recaptcha_min_score,
            config.outbound_timeout(),
        )
    }

    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }

    /// Runs the anti-abuse check for one submission.
    ///
    /// Makes no outbound call when either the secret or the token is absent.
    /// Transport and decoding failures are returned as errors; they are not
    /// treated as a skip.
    pub async fn check(&self, token: Option<&str>) -> Result<VerificationOutcome, AppError> {
        let Some(secret) = self.secret.as_deref() else {
            tracing::warn!("⚠️  reCAPTCHA secret not configured, skipping verification");
            return Ok(VerificationOutcome::Skipped(SkipReason::SecretNotConfigured));
        };
        let Some(token) = token else {
            tracing::warn!("⚠️  Submission without reCAPTCHA token, skipping verification");
            return Ok(VerificationOutcome::Skipped(SkipReason::TokenMissing));
        };

        let result = self.verify(secret, token).await?;
        Ok(assess(&result, self.min_score))
    }

    /// Calls `siteverify` with the given secret and token.
    pub async fn verify(&self, secret: &str, token: &str) -> Result<VerificationResult, AppError> {
        let url = reqwest::Url::parse_with_params(
            &self.verify_url,
            &[("secret", secret), ("response", token)],
        )
        .map_err(|e| AppError::InternalError(format!("Failed to build verify URL: {}", e)))?;

        // Redact secret and token from logs
        tracing::debug!(
            "reCAPTCHA verify: {}?secret=[REDACTED]&response=[REDACTED]",
            self.verify_url
        );

        // The request URL carries the secret; strip it from every error
        let response = self.client.post(url).send().await.map_err(|e| {
            AppError::ExternalApiError(format!("reCAPTCHA request failed: {}", e.without_url()))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::ExternalApiError(format!(
                "reCAPTCHA returned {}: {}",
                status, error_text
            )));
        }

        let result: VerificationResult = response.json().await.map_err(|e| {
            AppError::ExternalApiError(format!(
                "Failed to parse reCAPTCHA response: {}",
                e.without_url()
            ))
        })?;

        tracing::info!(
            "reCAPTCHA answered success={} score={:?} action={:?}",
            result.success,
            result.score,
            result.action
        );
        Ok(result)
    }
}

/// Turns a verification answer into an outcome.
///
/// `success = false` rejects regardless of score. A successful answer with a
/// score below `min_score` is only flagged; a missing score passes.
pub fn assess(result: &VerificationResult, min_score: f64) -> VerificationOutcome {
    if !result.success {
        return VerificationOutcome::Rejected {
            error_codes: result.error_codes.clone(),
        };
    }

    match result.score {
        Some(score) if score < min_score => VerificationOutcome::LowScore { score },
        score => VerificationOutcome::Passed { score },
    }
}
