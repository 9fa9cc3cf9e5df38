use anyhow::Context as _;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::AdminConfig;
use crate::domain::repository::Mailer;
use crate::domain::types::OutgoingEmail;

/// SMTP relay settings.
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// STARTTLS on a plain connection; `false` uses implicit TLS.
    pub starttls: bool,
}

#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(settings: &SmtpSettings, from: &str) -> anyhow::Result<Self> {
        let mut builder = if settings.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
        }
        .context("create SMTP transport")?
        .port(settings.port);

        if let (Some(username), Some(password)) = (&settings.username, &settings.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        let from = from.parse().context("parse sender mailbox")?;
        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    fn build_message(&self, email: &OutgoingEmail) -> anyhow::Result<Message> {
        let to: Mailbox = email.to.parse().context("parse recipient mailbox")?;
        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject.as_str())
            .multipart(MultiPart::alternative_plain_html(
                email.text.clone(),
                email.html.clone(),
            ))
            .context("build email message")
    }
}

impl Mailer for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail) -> anyhow::Result<()> {
        let message = self.build_message(email)?;
        self.transport
            .send(message)
            .await
            .context("send email over SMTP")?;
        Ok(())
    }
}

/// Development mailer: logs the envelope instead of sending.
#[derive(Clone, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    async fn send(&self, email: &OutgoingEmail) -> anyhow::Result<()> {
        // Bodies may carry login codes; only the envelope is logged.
        tracing::info!(to = %email.to, subject = %email.subject, "email not sent: SMTP not configured");
        Ok(())
    }
}

/// Transport selected at startup.
#[derive(Clone)]
pub enum MailTransport {
    Smtp(SmtpMailer),
    Log(LogMailer),
}

impl MailTransport {
    pub fn from_config(config: &AdminConfig) -> anyhow::Result<Self> {
        let Some(host) = config.smtp_host.clone() else {
            tracing::warn!("SMTP_HOST not set; outgoing email will only be logged");
            return Ok(Self::Log(LogMailer));
        };
        let settings = SmtpSettings {
            host,
            port: config.smtp_port,
            username: config.smtp_username.clone(),
            password: config.smtp_password.clone(),
            starttls: config.smtp_starttls,
        };
        Ok(Self::Smtp(SmtpMailer::new(&settings, &config.sender())?))
    }
}

impl Mailer for MailTransport {
    async fn send(&self, email: &OutgoingEmail) -> anyhow::Result<()> {
        match self {
            Self::Smtp(m) => m.send(email).await,
            Self::Log(m) => m.send(email).await,
        }
    }
}
