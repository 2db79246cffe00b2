use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 4321;
pub const DEFAULT_RECAPTCHA_VERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";
pub const DEFAULT_RECAPTCHA_MIN_SCORE: f64 = 0.5;
pub const DEFAULT_RESEND_BASE_URL: &str = "https://api.resend.com";
pub const DEFAULT_CONTACT_EMAIL: &str = "contacto@clearhome.cl";
pub const DEFAULT_MAIL_FROM: &str = "ClearHome Web <onboarding@resend.dev>";
pub const DEFAULT_OUTBOUND_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    /// reCAPTCHA secret. `None` disables verification (fail-open).
    pub recaptcha_secret: Option<String>,
    pub recaptcha_verify_url: String,
    /// Scores below this are logged, never rejected.
    pub recaptcha_min_score: f64,
    pub resend_api_key: String,
    pub resend_base_url: String,
    /// Operator inbox that receives the lead notifications.
    pub contact_email: String,
    pub mail_from: String,
    pub outbound_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Blank values are treated as unset and fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let config = Self {
            port: var("PORT")
                .map(|p| p.trim().parse::<u16>())
                .transpose()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?
                .unwrap_or(DEFAULT_PORT),
            recaptcha_secret: var("RECAPTCHA_SECRET_KEY"),
            recaptcha_verify_url: var("RECAPTCHA_VERIFY_URL")
                .map(|url| validate_http_url("RECAPTCHA_VERIFY_URL", url))
                .transpose()?
                .unwrap_or_else(|| DEFAULT_RECAPTCHA_VERIFY_URL.to_string()),
            recaptcha_min_score: var("RECAPTCHA_MIN_SCORE")
                .map(|s| {
                    let score: f64 = s.trim().parse().map_err(|_| {
                        anyhow::anyhow!("RECAPTCHA_MIN_SCORE must be a number between 0.0 and 1.0")
                    })?;
                    if !(0.0..=1.0).contains(&score) {
                        anyhow::bail!("RECAPTCHA_MIN_SCORE must be between 0.0 and 1.0");
                    }
                    Ok(score)
                })
                .transpose()?
                .unwrap_or(DEFAULT_RECAPTCHA_MIN_SCORE),
            resend_api_key: var("RESEND_API_KEY").unwrap_or_default(),
            resend_base_url: var("RESEND_BASE_URL")
                .map(|url| validate_http_url("RESEND_BASE_URL", url))
                .transpose()?
                .unwrap_or_else(|| DEFAULT_RESEND_BASE_URL.to_string()),
            contact_email: var("CONTACT_EMAIL")
                .map(|e| e.trim().to_string())
                .unwrap_or_else(|| DEFAULT_CONTACT_EMAIL.to_string()),
            mail_from: var("MAIL_FROM").unwrap_or_else(|| DEFAULT_MAIL_FROM.to_string()),
            outbound_timeout_secs: var("OUTBOUND_TIMEOUT_SECS")
                .map(|s| match s.trim().parse::<u64>() {
                    Ok(secs) if secs > 0 => Ok(secs),
                    _ => Err(anyhow::anyhow!(
                        "OUTBOUND_TIMEOUT_SECS must be a positive number of seconds"
                    )),
                })
                .transpose()?
                .unwrap_or(DEFAULT_OUTBOUND_TIMEOUT_SECS),
        };

        // Log what was resolved (without sensitive values)
        if config.recaptcha_secret.is_none() {
            tracing::warn!("⚠️  RECAPTCHA_SECRET_KEY not set: submissions will not be verified");
        }
        if config.resend_api_key.is_empty() {
            tracing::warn!("⚠️  RESEND_API_KEY not set: e-mail delivery will be rejected");
        }
        tracing::debug!("reCAPTCHA verify URL: {}", config.recaptcha_verify_url);
        tracing::debug!("Resend base URL: {}", config.resend_base_url);
        tracing::debug!("Lead notifications go to: {}", config.contact_email);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }

    pub fn outbound_timeout(&self) -> Duration {
        Duration::from_secs(self.outbound_timeout_secs)
    }
}

fn validate_http_url(key: &str, raw: String) -> anyhow::Result<String> {
    let parsed = url::Url::parse(raw.trim())
        .map_err(|e| anyhow::anyhow!("{} is not a valid URL: {}", key, e))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        anyhow::bail!("{} must start with http:// or https://", key);
    }
    Ok(raw.trim().trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = load(&[]).unwrap();

        assert_eq!(config.port, DEFAULT_PORT);
        assert!(config.recaptcha_secret.is_none());
        assert_eq!(config.recaptcha_verify_url, DEFAULT_RECAPTCHA_VERIFY_URL);
        assert_eq!(config.recaptcha_min_score, 0.5);
        assert_eq!(config.resend_api_key, "");
        assert_eq!(config.resend_base_url, DEFAULT_RESEND_BASE_URL);
        assert_eq!(config.contact_email, DEFAULT_CONTACT_EMAIL);
        assert_eq!(config.mail_from, DEFAULT_MAIL_FROM);
        assert_eq!(config.outbound_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = load(&[("RECAPTCHA_SECRET_KEY", "   "), ("CONTACT_EMAIL", "")]).unwrap();

        assert!(config.recaptcha_secret.is_none());
        assert_eq!(config.contact_email, DEFAULT_CONTACT_EMAIL);
    }

    #[test]
    fn test_explicit_values_are_used() {
        let config = load(&[
            ("PORT", "8080"),
            ("RECAPTCHA_SECRET_KEY", "secret"),
            ("RECAPTCHA_MIN_SCORE", "0.7"),
            ("RESEND_API_KEY", "re_123"),
            ("RESEND_BASE_URL", "http://localhost:9000/"),
            ("CONTACT_EMAIL", "ventas@clearhome.cl"),
            ("OUTBOUND_TIMEOUT_SECS", "3"),
        ])
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.recaptcha_secret.as_deref(), Some("secret"));
        assert_eq!(config.recaptcha_min_score, 0.7);
        assert_eq!(config.resend_api_key, "re_123");
        assert_eq!(config.resend_base_url, "http://localhost:9000");
        assert_eq!(config.contact_email, "ventas@clearhome.cl");
        assert_eq!(config.outbound_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(load(&[("PORT", "not-a-port")]).is_err());
        assert!(load(&[("RECAPTCHA_MIN_SCORE", "1.5")]).is_err());
        assert!(load(&[("RECAPTCHA_MIN_SCORE", "high")]).is_err());
        assert!(load(&[("RESEND_BASE_URL", "ftp://mail.example.com")]).is_err());
        assert!(load(&[("RECAPTCHA_VERIFY_URL", "not a url")]).is_err());
        assert!(load(&[("OUTBOUND_TIMEOUT_SECS", "0")]).is_err());
    }
}
