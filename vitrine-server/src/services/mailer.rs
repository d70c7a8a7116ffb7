//! Outbound Mail
//!
//! Fire-and-forget plaintext delivery. Failure surfaces to the caller as
//! a 500-class [`shared::ErrorCode::MailError`]; nothing is retried.

use async_trait::async_trait;
use serde::Serialize;

use shared::{AppError, AppResult};

/// Outbound mail boundary
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()>;
}

/// Development mailer: writes the message to the log instead of sending
///
/// Used whenever `MAIL_RELAY_URL` is not configured (and in tests).
pub struct TracingMailer;

#[async_trait]
impl Mailer for TracingMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        tracing::info!(
            target: "mail",
            to = %to,
            subject = %subject,
            body = %body,
            "Outgoing mail (log only)"
        );
        Ok(())
    }
}

#[derive(Serialize)]
struct RelayMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

/// Production mailer: POSTs the message as JSON to an HTTP mail relay
pub struct HttpRelayMailer {
    client: reqwest::Client,
    endpoint: String,
    from: String,
}

impl HttpRelayMailer {
    pub fn new(endpoint: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            from: from.into(),
        }
    }
}

#[async_trait]
impl Mailer for HttpRelayMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        let message = RelayMessage {
            from: &self.from,
            to,
            subject,
            text: body,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&message)
            .send()
            .await
            .map_err(|e| AppError::mail(format!("Mail relay unreachable: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::mail(format!(
                "Mail relay returned {}",
                response.status()
            )));
        }

        tracing::info!(to = %to, subject = %subject, "Mail relayed");
        Ok(())
    }
}
