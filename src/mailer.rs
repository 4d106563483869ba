// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! SMTP delivery for composed inquiry messages.
//!
//! The dispatcher sends the HTML rendition first and retries exactly once
//! with the plaintext rendition when that fails. The fallback is a format
//! downgrade, not a transient-failure retry; there is no backoff and no
//! second attempt of the same payload. Every transport call runs under a
//! bounded timeout.
//!
//! The transport sits behind the [`MailTransport`] trait so tests can
//! substitute a recording mock for the real SMTP relay.

use crate::composer::ComposedMessage;
use crate::config::MailConfig;
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Mail delivery error types.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid mailbox address {address:?}: {source}")]
    Address {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },

    #[error("failed to build mail message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("mail send timed out after {0:?}")]
    Timeout(Duration),
}

/// Abstraction over the outgoing mail relay.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, message: Message) -> Result<(), MailError>;
}

/// Production transport backed by an async SMTP connection pool.
pub struct SmtpMailTransport {
    inner: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailTransport {
    /// Build the transport from configuration. Credentials are applied only
    /// when both the username and the password are configured.
    pub fn from_config(mail: &MailConfig) -> Result<Self, MailError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::from_url(&mail.smtp_url)?;
        if let (Some(username), Some(password)) = (&mail.username, &mail.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }
        Ok(Self {
            inner: builder.build(),
        })
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send(&self, message: Message) -> Result<(), MailError> {
        self.inner.send(message).await?;
        Ok(())
    }
}

/// How a successful delivery went out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// First attempt, HTML body
    Html,
    /// Second attempt, plaintext body, after the HTML attempt failed
    PlaintextFallback,
}

/// Sends composed messages through a [`MailTransport`].
pub struct MailDispatcher {
    transport: Arc<dyn MailTransport>,
    from: Mailbox,
    timeout: Duration,
}

impl MailDispatcher {
    pub fn new(transport: Arc<dyn MailTransport>, mail: &MailConfig) -> Result<Self, MailError> {
        let from = parse_mailbox(&mail.from_address)?;
        Ok(Self {
            transport,
            from,
            timeout: mail.send_timeout(),
        })
    }

    /// Deliver a composed message.
    ///
    /// Attempts the HTML rendition once; on any failure, attempts the
    /// plaintext rendition once before surfacing the error.
    pub async fn send(&self, composed: &ComposedMessage) -> Result<Delivery, MailError> {
        let html = self.build(composed, ContentType::TEXT_HTML, &composed.html_body)?;
        match self.send_with_timeout(html).await {
            Ok(()) => {
                debug!(subject = %composed.subject, "HTML delivery succeeded");
                Ok(Delivery::Html)
            }
            Err(error) => {
                warn!(%error, subject = %composed.subject, "HTML delivery failed, falling back to plaintext");
                let plain = self.build(composed, ContentType::TEXT_PLAIN, &composed.text_body)?;
                self.send_with_timeout(plain).await?;
                Ok(Delivery::PlaintextFallback)
            }
        }
    }

    fn build(
        &self,
        composed: &ComposedMessage,
        content_type: ContentType,
        body: &str,
    ) -> Result<Message, MailError> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .reply_to(parse_mailbox(&composed.reply_to)?)
            .subject(composed.subject.clone())
            .header(content_type);
        for recipient in &composed.recipients {
            builder = builder.to(parse_mailbox(recipient)?);
        }
        Ok(builder.body(body.to_string())?)
    }

    async fn send_with_timeout(&self, message: Message) -> Result<(), MailError> {
        match tokio::time::timeout(self.timeout, self.transport.send(message)).await {
            Ok(result) => result,
            Err(_) => Err(MailError::Timeout(self.timeout)),
        }
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address.parse().map_err(|source| MailError::Address {
        address: address.to_string(),
        source,
    })
}
