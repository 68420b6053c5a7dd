use tracing::{error, info, warn};

use crate::notify::mailer::Mailer;
use crate::notify::sms::SmsClient;
use crate::notify::templates;
use crate::weather::WeatherSnapshot;

/// Per-channel results for one individual alert. `None` means the channel
/// was not requested; a requested channel always resolves to a boolean, so
/// "nothing requested, nothing sent" can never read as success.
#[derive(Debug, Clone, Copy, Default)]
pub struct DispatchOutcome {
    pub sms_sent: Option<bool>,
    pub email_sent: Option<bool>,
}

impl DispatchOutcome {
    pub fn any_success(&self) -> bool {
        self.sms_sent == Some(true) || self.email_sent == Some(true)
    }

    /// History label for the channels that actually went out, e.g.
    /// `SMS+Email`.
    pub fn alert_type_label(&self) -> String {
        let mut parts = Vec::new();
        if self.sms_sent == Some(true) {
            parts.push("SMS");
        }
        if self.email_sent == Some(true) {
            parts.push("Email");
        }
        if parts.is_empty() {
            "None".to_string()
        } else {
            parts.join("+")
        }
    }
}

/// Dispatches one alert over the requested channels. Channel failures are
/// logged and reflected in the outcome; they never propagate as errors.
pub async fn dispatch_individual(
    mailer: &dyn Mailer,
    sms: &dyn SmsClient,
    city: &str,
    snapshot: &WeatherSnapshot,
    flood_risk: bool,
    message: &str,
    phone: Option<&str>,
    email: Option<&str>,
) -> DispatchOutcome {
    let mut outcome = DispatchOutcome::default();

    if let Some(phone) = phone {
        outcome.sms_sent = Some(match sms.send(phone, message).await {
            Ok(()) => {
                info!(phone, "alert SMS sent");
                true
            }
            Err(e) => {
                error!(error = %e, phone, "alert SMS failed");
                false
            }
        });
    }

    if let Some(email) = email {
        if email.contains('@') {
            // A flood gets the alert template as-is; the all-clear email
            // wraps the update in a current-conditions report.
            let body = if flood_risk {
                message.to_string()
            } else {
                templates::safe_weather_report(message, snapshot)
            };
            let (subject, html) = templates::alert_email(city, &body);
            outcome.email_sent = Some(match mailer.send_html(email, &subject, &html).await {
                Ok(()) => {
                    info!(email, "alert email sent");
                    true
                }
                Err(e) => {
                    error!(error = %e, email, "alert email failed");
                    false
                }
            });
        } else {
            warn!(email, "invalid alert email address");
            outcome.email_sent = Some(false);
        }
    }

    outcome
}
