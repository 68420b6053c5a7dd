use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use lettre::{
    message::{Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::debug;

use crate::config::SmtpConfig;

/// Mail submission port (STARTTLS).
const SUBMISSION_PORT: u16 = 587;

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_html(&self, to: &str, subject: &str, html: &str) -> anyhow::Result<()>;
}

/// Authenticated SMTP submission over STARTTLS.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig, timeout: Duration) -> anyhow::Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .context("smtp relay setup")?
            .port(SUBMISSION_PORT)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .timeout(Some(timeout))
            .build();
        let sender = config
            .sender
            .parse::<Mailbox>()
            .context("invalid SMTP sender address")?;
        Ok(Self { transport, sender })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_html(&self, to: &str, subject: &str, html: &str) -> anyhow::Result<()> {
        let recipient = to
            .parse::<Mailbox>()
            .with_context(|| format!("invalid recipient address {to}"))?;
        let message = Message::builder()
            .from(self.sender.clone())
            .to(recipient)
            .subject(subject)
            .multipart(MultiPart::mixed().singlepart(SinglePart::html(html.to_string())))
            .context("build mime message")?;

        self.transport
            .send(message)
            .await
            .context("smtp submission")?;
        debug!(to, subject, "email submitted");
        Ok(())
    }
}
