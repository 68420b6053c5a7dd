use anyhow::Context;
use serde::Deserialize;

/// SMTP submission credentials for outbound mail.
#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub username: String,
    pub password: String,
    pub sender: String,
}

/// Messaging-provider account used for SMS dispatch.
#[derive(Debug, Clone, Deserialize)]
pub struct SmsConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub weather_api_key: String,
    pub admin_email: String,
    pub admin_password: String,
    pub smtp: SmtpConfig,
    pub sms: SmsConfig,
    pub session_ttl_minutes: i64,
    pub outbound_timeout_secs: u64,
    pub flood_model_path: Option<String>,
}

fn required(name: &str) -> anyhow::Result<String> {
    std::env::var(name).with_context(|| format!("{name} must be set"))
}

impl AppConfig {
    /// Reads configuration from the environment. Secrets have no fallback
    /// values; a missing variable refuses startup.
    pub fn from_env() -> anyhow::Result<Self> {
        let smtp_username = required("SMTP_USERNAME")?;
        let smtp = SmtpConfig {
            host: required("SMTP_HOST")?,
            sender: std::env::var("SMTP_SENDER").unwrap_or_else(|_| smtp_username.clone()),
            username: smtp_username,
            password: required("SMTP_PASSWORD")?,
        };
        let sms = SmsConfig {
            account_sid: required("SMS_ACCOUNT_SID")?,
            auth_token: required("SMS_AUTH_TOKEN")?,
            from_number: required("SMS_FROM_NUMBER")?,
        };
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            weather_api_key: required("WEATHER_API_KEY")?,
            admin_email: required("ADMIN_EMAIL")?.trim().to_lowercase(),
            admin_password: required("ADMIN_PASSWORD")?,
            smtp,
            sms,
            session_ttl_minutes: std::env::var("SESSION_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 12),
            outbound_timeout_secs: std::env::var("OUTBOUND_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(10),
            flood_model_path: std::env::var("FLOOD_MODEL_PATH").ok(),
        })
    }
}
