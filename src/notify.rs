//! Outgoing mail, delivered off the request path.
//!
//! Handlers hand a [`Notification`] to the [`Notifier`]; a worker task spawned
//! with [`spawn_worker`] drains the queue into a [`Mailer`]. Delivery failures
//! are logged and dropped, never surfaced to the request that queued them.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};

const WEBHOOK_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl Notification {
    pub fn welcome(to: &str, username: &str) -> Self {
        Self {
            to: to.to_string(),
            subject: "Welcome to SpendWise!".into(),
            body: format!(
                "Hi {},\n\nYour SpendWise account is ready. Start by adding your \
                 income and expenses to see where your money goes.\n",
                username
            ),
        }
    }

    pub fn password_reset(to: &str, link: &str, ttl_minutes: i64) -> Self {
        Self {
            to: to.to_string(),
            subject: "SpendWise password reset".into(),
            body: format!(
                "Use the link below to reset your password. It expires in {} minutes.\n\n{}\n\n\
                 If you did not request this, you can ignore this email.\n",
                ttl_minutes, link
            ),
        }
    }

    pub fn password_changed(to: &str, username: &str) -> Self {
        Self {
            to: to.to_string(),
            subject: "Security alert: your SpendWise password was changed".into(),
            body: format!(
                "Hi {},\n\nThe password for your SpendWise account was just changed. \
                 If this was not you, reset your password immediately.\n",
                username
            ),
        }
    }
}

/// Cloneable handle that queues notifications for the worker.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: UnboundedSender<Notification>,
}

impl Notifier {
    pub fn new(tx: UnboundedSender<Notification>) -> Self {
        Self { tx }
    }

    /// A notifier together with the receiving end of its queue.
    pub fn channel() -> (Self, UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    /// Queue `notification`. Never blocks and never fails the caller.
    pub fn send(&self, notification: Notification) {
        let to = notification.to.clone();
        if self.tx.send(notification).is_err() {
            warn!(to = %to, "Notification worker is gone, dropping message");
        } else {
            debug!(to = %to, "Notification queued");
        }
    }
}

pub enum Mailer {
    /// Writes each message to the log.
    Log,
    /// POSTs each message as JSON to `url`.
    Webhook { client: Client, url: String },
}

impl Mailer {
    pub fn from_webhook(url: Option<&str>) -> AppResult<Self> {
        match url {
            None => Ok(Mailer::Log),
            Some(url) => {
                let client = Client::builder()
                    .timeout(Duration::from_secs(WEBHOOK_TIMEOUT_SECS))
                    .build()
                    .map_err(|e| {
                        AppError::Internal(format!("Failed to create HTTP client: {}", e))
                    })?;
                Ok(Mailer::Webhook {
                    client,
                    url: url.to_string(),
                })
            }
        }
    }

    pub async fn deliver(&self, notification: &Notification) -> AppResult<()> {
        match self {
            Mailer::Log => {
                info!(
                    to = %notification.to,
                    subject = %notification.subject,
                    "Email:\n{}",
                    notification.body
                );
                Ok(())
            }
            Mailer::Webhook { client, url } => {
                let response = client
                    .post(url)
                    .json(notification)
                    .send()
                    .await
                    .map_err(|e| AppError::Internal(format!("Mail webhook failed: {}", e)))?;

                if !response.status().is_success() {
                    return Err(AppError::Internal(format!(
                        "Mail webhook returned {}",
                        response.status()
                    )));
                }
                Ok(())
            }
        }
    }
}

/// Drain `rx` until every [`Notifier`] is dropped.
pub fn spawn_worker(mut rx: UnboundedReceiver<Notification>, mailer: Mailer) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(notification) = rx.recv().await {
            match mailer.deliver(&notification).await {
                Ok(()) => debug!(to = %notification.to, "Notification delivered"),
                Err(e) => warn!(
                    to = %notification.to,
                    subject = %notification.subject,
                    "Failed to deliver notification: {}",
                    e
                ),
            }
        }
        debug!("Notification worker stopped");
    })
}
