use serde::Serialize;
use tracing::{error, warn};

pub mod mailer;
pub mod recipients;
pub mod sms;
pub mod templates;

use mailer::Mailer;
use recipients::Recipient;

/// Tally of a bulk email run. `sent + failed` always equals the number of
/// recipients handed in.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct BulkOutcome {
    pub sent: usize,
    pub failed: usize,
}

/// Sends the alert email to every recipient in turn. A recipient without a
/// plausible email address is counted as failed without a provider call,
/// and one failed send never aborts the rest of the batch.
pub async fn send_bulk_emails(
    mailer: &dyn Mailer,
    recipients: &[Recipient],
    city: &str,
    alert_message: &str,
) -> BulkOutcome {
    let (subject, html) = templates::alert_email(city, alert_message);
    let mut outcome = BulkOutcome::default();

    for recipient in recipients {
        let email = recipient.email.trim();
        if email.is_empty() || !email.contains('@') {
            warn!(name = %recipient.name, "skipping recipient with invalid email");
            outcome.failed += 1;
            continue;
        }
        match mailer.send_html(email, &subject, &html).await {
            Ok(()) => outcome.sent += 1,
            Err(e) => {
                error!(error = %e, email, "bulk alert email failed");
                outcome.failed += 1;
            }
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records delivery attempts; addresses listed in `reject` fail.
    struct RecordingMailer {
        delivered: Mutex<Vec<String>>,
        reject: Vec<String>,
    }

    impl RecordingMailer {
        fn new(reject: &[&str]) -> Self {
            Self {
                delivered: Mutex::new(Vec::new()),
                reject: reject.iter().map(|s| s.to_string()).collect(),
            }
        }
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send_html(&self, to: &str, _subject: &str, _html: &str) -> anyhow::Result<()> {
            if self.reject.iter().any(|r| r == to) {
                anyhow::bail!("mailbox unavailable");
            }
            self.delivered.lock().unwrap().push(to.to_string());
            Ok(())
        }
    }

    fn recipient(name: &str, email: &str) -> Recipient {
        Recipient {
            name: name.into(),
            email: email.into(),
        }
    }

    #[tokio::test]
    async fn invalid_email_counts_as_failure_without_aborting() {
        let mailer = RecordingMailer::new(&[]);
        let recipients = vec![
            recipient("Asha", "asha@example.com"),
            recipient("Broken", "not-an-email"),
            recipient("Ravi", "ravi@example.com"),
        ];
        let outcome = send_bulk_emails(&mailer, &recipients, "Chennai", "take cover").await;
        assert_eq!(outcome.sent, 2);
        assert_eq!(outcome.failed, 1);
        assert_eq!(outcome.sent + outcome.failed, recipients.len());
        assert_eq!(
            *mailer.delivered.lock().unwrap(),
            vec!["asha@example.com", "ravi@example.com"]
        );
    }

    #[tokio::test]
    async fn transport_failure_is_tallied_not_raised() {
        let mailer = RecordingMailer::new(&["ravi@example.com"]);
        let recipients = vec![
            recipient("Asha", "asha@example.com"),
            recipient("Ravi", "ravi@example.com"),
            recipient("Mina", "mina@example.com"),
        ];
        let outcome = send_bulk_emails(&mailer, &recipients, "Pune", "stay alert").await;
        assert_eq!(outcome.sent, 2);
        assert_eq!(outcome.failed, 1);
    }

    #[tokio::test]
    async fn empty_recipient_list_sends_nothing() {
        let mailer = RecordingMailer::new(&[]);
        let outcome = send_bulk_emails(&mailer, &[], "Pune", "stay alert").await;
        assert_eq!(outcome.sent, 0);
        assert_eq!(outcome.failed, 0);
    }
}
