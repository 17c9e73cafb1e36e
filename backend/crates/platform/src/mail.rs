//! Outgoing Mail
//!
//! Handlers enqueue [`OutgoingMail`] and return; a separate task owns
//! delivery. The bundled delivery task only logs each message.

use serde::Serialize;
use thiserror::Error;
use tokio::sync::mpsc;

const OUTBOX_CAPACITY: usize = 256;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail outbox is closed")]
    Closed,
}

/// A rendered-later message: template name plus the data it needs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub template: String,
    pub data: serde_json::Value,
}

impl OutgoingMail {
    pub fn new(
        to: impl Into<String>,
        subject: impl Into<String>,
        template: impl Into<String>,
        data: serde_json::Value,
    ) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            template: template.into(),
            data,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Mailer {
    outbox: mpsc::Sender<OutgoingMail>,
}

impl Mailer {
    /// Mailer plus the receiving end of its outbox
    pub fn channel() -> (Self, mpsc::Receiver<OutgoingMail>) {
        let (outbox, receiver) = mpsc::channel(OUTBOX_CAPACITY);
        (Self { outbox }, receiver)
    }

    /// Mailer whose outbox is drained by a background task that logs each message
    pub fn spawn_log_delivery() -> Self {
        let (mailer, mut receiver) = Self::channel();

        tokio::spawn(async move {
            while let Some(mail) = receiver.recv().await {
                tracing::info!(
                    to = %mail.to,
                    subject = %mail.subject,
                    template = %mail.template,
                    "Mail delivered"
                );
            }
            tracing::debug!("Mail outbox closed");
        });

        mailer
    }

    pub async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        self.outbox.send(mail).await.map_err(|_| MailError::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_reaches_receiver() {
        let (mailer, mut receiver) = Mailer::channel();

        let mail = OutgoingMail::new(
            "ada@example.com",
            "Activate your account",
            "activation-mail",
            serde_json::json!({ "activationCode": "1234" }),
        );
        mailer.send(mail.clone()).await.unwrap();

        assert_eq!(receiver.recv().await, Some(mail));
    }

    #[tokio::test]
    async fn test_send_after_close_fails() {
        let (mailer, receiver) = Mailer::channel();
        drop(receiver);

        let result = mailer
            .send(OutgoingMail::new("a@b.c", "s", "t", serde_json::Value::Null))
            .await;
        assert!(matches!(result, Err(MailError::Closed)));
    }
}
