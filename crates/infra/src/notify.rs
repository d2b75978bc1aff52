//! Welcome-notification seam.
//!
//! Delivery transport is a collaborator; this crate only defines the contract
//! and in-memory implementations. The temporary credential is generated
//! upstream and passed through as an opaque secret.

use std::sync::RwLock;

use thiserror::Error;

use brigada_identity::User;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotifyError {
    #[error("delivery failed: {0}")]
    Delivery(String),
}

pub trait NotificationSender {
    fn send_welcome(&self, user: &User, temp_password: &str) -> Result<(), NotifyError>;
}

/// A sent welcome message, as captured by the in-memory sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WelcomeMessage {
    pub email: String,
    pub full_name: String,
}

/// Records every message instead of delivering it.
#[derive(Default)]
pub struct InMemoryNotificationSender {
    sent: RwLock<Vec<WelcomeMessage>>,
}

impl InMemoryNotificationSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<WelcomeMessage> {
        match self.sent.read() {
            Ok(sent) => sent.clone(),
            Err(_) => Vec::new(),
        }
    }
}

impl NotificationSender for InMemoryNotificationSender {
    fn send_welcome(&self, user: &User, _temp_password: &str) -> Result<(), NotifyError> {
        let mut sent = self
            .sent
            .write()
            .map_err(|_| NotifyError::Delivery("recorder lock poisoned".to_string()))?;
        sent.push(WelcomeMessage {
            email: user.email().to_string(),
            full_name: user.full_name(),
        });
        Ok(())
    }
}

/// Always fails; used to exercise the registration rollback path.
pub struct FailingNotificationSender;

impl NotificationSender for FailingNotificationSender {
    fn send_welcome(&self, _user: &User, _temp_password: &str) -> Result<(), NotifyError> {
        Err(NotifyError::Delivery("smtp unreachable".to_string()))
    }
}
