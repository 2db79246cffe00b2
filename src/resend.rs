use crate::config::Config;
use crate::errors::AppError;
use crate::models::DeliveryReceipt;
use crate::notification::NotificationMessage;
use serde::Deserialize;
use std::time::Duration;

/// Client for the Resend e-mail API.
///
/// Built once at start-up and shared by every request.
#[derive(Clone)]
pub struct ResendClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

/// Error body returned by Resend on non-2xx answers.
#[derive(Debug, Deserialize)]
struct ResendErrorBody {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl ResendClient {
    /// Creates a new `ResendClient`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the Resend API, without trailing slash.
    /// * `api_key` - API key sent as bearer token.
    /// * `timeout` - Upper bound for a single send call.
    pub fn new(base_url: String, api_key: String, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to create Resend client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Self::new(
            config.resend_base_url.clone(),
            config.resend_api_key.clone(),
            config.outbound_timeout(),
        )
    }

    /// Sends one notification. No retries.
    ///
    /// # Returns
    ///
    /// * `Ok(DeliveryReceipt)` - The provider accepted the e-mail.
    /// * `Err(AppError::DeliveryFailed)` - The provider answered with an error.
    /// * `Err(AppError::ExternalApiError)` - The provider could not be reached
    ///   or its answer could not be read.
    pub async fn send(&self, message: &NotificationMessage) -> Result<DeliveryReceipt, AppError> {
        let url = format!("{}/emails", self.base_url);
        tracing::info!("Sending lead notification to {:?} via Resend", message.to);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(message)
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalApiError(format!("Resend request failed: {}", e.without_url()))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::DeliveryFailed(describe_error(status, &error_text)));
        }

        let receipt: DeliveryReceipt = response.json().await.map_err(|e| {
            AppError::ExternalApiError(format!(
                "Failed to parse Resend response: {}",
                e.without_url()
            ))
        })?;

        tracing::info!("✓ Lead notification accepted by Resend: {}", receipt.id);
        Ok(receipt)
    }
}

fn describe_error(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ResendErrorBody>(body) {
        Ok(ResendErrorBody {
            name: Some(name),
            message: Some(message),
        }) => format!("{} {}: {}", status, name, message),
        Ok(ResendErrorBody {
            message: Some(message),
            ..
        }) => format!("{}: {}", status, message),
        _ => format!("{}: {}", status, body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = ResendClient::new(
            "https://api.resend.com".to_string(),
            "re_test".to_string(),
            Duration::from_secs(5),
        );
        assert!(client.is_ok());
    }

    #[test]
    fn test_describe_structured_error() {
        let detail = describe_error(
            reqwest::StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"statusCode":422,"name":"validation_error","message":"Invalid `from` field."}"#,
        );
        assert_eq!(
            detail,
            "422 Unprocessable Entity validation_error: Invalid `from` field."
        );
    }

    #[test]
    fn test_describe_unstructured_error() {
        let detail = describe_error(reqwest::StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(detail, "502 Bad Gateway: upstream down");
    }
}
