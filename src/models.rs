use serde::{Deserialize, Serialize};

/// Contact form payload posted by the landing page.
///
/// Every field is optional here; presence is enforced by
/// [`crate::validation::validate_submission`] so that a missing field is a
/// validation error instead of a parse error.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LeadSubmission {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Used as the reply-to address of the notification.
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    /// reCAPTCHA v3 token generated in the browser.
    #[serde(default)]
    pub token: Option<String>,
}

/// A submission that passed validation. Required fields are trimmed and
/// guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedLead {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub service: String,
    /// `None` when the submitter left the field blank.
    pub details: Option<String>,
    pub token: Option<String>,
}

/// Answer of the reCAPTCHA `siteverify` endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VerificationResult {
    pub success: bool,
    /// Present for v3 tokens, in `[0.0, 1.0]`.
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(rename = "error-codes", default)]
    pub error_codes: Vec<String>,
}

/// What the handler should do with a submission after the anti-abuse check.
#[derive(Debug, Clone, PartialEq)]
pub enum VerificationOutcome {
    /// No secret configured or no token supplied.
    Skipped(SkipReason),
    Passed { score: Option<f64> },
    /// Verified but below the configured threshold. Delivered anyway.
    LowScore { score: f64 },
    Rejected { error_codes: Vec<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    SecretNotConfigured,
    TokenMissing,
}

/// Identifier returned by the delivery provider for an accepted e-mail.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DeliveryReceipt {
    pub id: String,
}

/// JSON body returned by `POST /api/send`, for success and failure alike.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SendResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<String>,
}

impl SendResponse {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            id: None,
            debug: None,
        }
    }
}
