//! Outgoing transactional email.
//!
//! Services depend on the [`Mailer`] trait only. [`from_config`] picks the SMTP
//! transport when a host is configured and a logging mailer otherwise.

pub mod templates;

use std::sync::Arc;

use async_trait::async_trait;
use configs::SmtpConfig;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use thiserror::Error;
use tracing::{info, instrument};

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid email address: {0}")]
    Address(String),
    #[error("cannot build email: {0}")]
    Build(String),
    #[error("email delivery failed: {0}")]
    Transport(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError>;
}

/// Build the mailer described by `cfg`.
pub fn from_config(cfg: &SmtpConfig) -> Result<Arc<dyn Mailer>, MailError> {
    if cfg.is_enabled() {
        Ok(Arc::new(SmtpMailer::new(cfg)?))
    } else {
        info!("smtp host not configured; emails will be logged only");
        Ok(Arc::new(LogMailer))
    }
}

/// SMTP delivery through lettre's pooled async transport.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(cfg: &SmtpConfig) -> Result<Self, MailError> {
        let from: Mailbox = cfg
            .sender()
            .parse()
            .map_err(|e| MailError::Address(format!("{}: {e}", cfg.sender())))?;
        let relay = if cfg.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&cfg.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&cfg.host)
        };
        let mut builder = relay.map_err(|e| MailError::Transport(e.to_string()))?;
        if let Some(port) = cfg.port {
            builder = builder.port(port);
        }
        if !cfg.username.is_empty() {
            builder = builder.credentials(Credentials::new(cfg.username.clone(), cfg.password.clone()));
        }
        info!(host = %cfg.host, port = ?cfg.port, starttls = cfg.starttls, "smtp mailer ready");
        Ok(Self { transport: builder.build(), from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    #[instrument(skip(self, email), fields(to = %email.to, subject = %email.subject))]
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        let to: Mailbox = email
            .to
            .parse()
            .map_err(|e| MailError::Address(format!("{}: {e}", email.to)))?;
        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject)
            .header(ContentType::TEXT_HTML)
            .body(email.html)
            .map_err(|e| MailError::Build(e.to_string()))?;
        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;
        info!("email sent");
        Ok(())
    }
}

/// Logs instead of delivering. Used when no SMTP host is configured.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        info!(to = %email.to, subject = %email.subject, body = %email.html, "email not sent (smtp disabled)");
        Ok(())
    }
}

/// Test doubles.
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    /// Keeps every email it is asked to send.
    #[derive(Default)]
    pub struct RecordingMailer {
        sent: Mutex<Vec<OutgoingEmail>>,
    }

    impl RecordingMailer {
        pub fn sent(&self) -> Vec<OutgoingEmail> {
            self.sent.lock().map(|v| v.clone()).unwrap_or_default()
        }

        pub fn last_to(&self, to: &str) -> Option<OutgoingEmail> {
            self.sent().into_iter().rev().find(|m| m.to == to)
        }
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
            if let Ok(mut sent) = self.sent.lock() {
                sent.push(email);
            }
            Ok(())
        }
    }

    /// Fails every delivery.
    #[derive(Default)]
    pub struct FailingMailer;

    #[async_trait]
    impl Mailer for FailingMailer {
        async fn send(&self, _email: OutgoingEmail) -> Result<(), MailError> {
            Err(MailError::Transport("connection refused".into()))
        }
    }
}
