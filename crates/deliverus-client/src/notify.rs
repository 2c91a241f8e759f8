//! # Notifications
//!
//! Transient messages shown on top of a screen after an action. The client
//! only builds them; displaying and dismissing is the UI's job.
//!
//! ```text
//! Ok(order)  ──► Notification::order_created()             (success)
//! Err(e)     ──► Notification::order_creation_failed(&e)    (danger)
//! Err(e)     ──► Notification::from(&e)                     (danger)
//! ```

use serde::Serialize;

use crate::error::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Danger,
    Success,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn danger(message: impl Into<String>) -> Self {
        Notification {
            kind: NotificationKind::Danger,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Notification {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Notification {
            kind: NotificationKind::Info,
            message: message.into(),
        }
    }

    pub fn order_created() -> Self {
        Notification::success("Order created")
    }

    pub fn order_updated() -> Self {
        Notification::success("Order updated")
    }

    pub fn order_removed() -> Self {
        Notification::success("Order removed")
    }

    pub fn order_creation_failed(error: &ClientError) -> Self {
        Notification::danger(format!(
            "There were problems while creating order: {}",
            error
        ))
    }

    pub fn order_removal_failed(error: &ClientError) -> Self {
        Notification::danger(format!("Problems while removing order: {}", error))
    }

    pub fn is_error(&self) -> bool {
        self.kind == NotificationKind::Danger
    }
}

/// Any client error becomes a danger notification carrying its message.
impl From<&ClientError> for Notification {
    fn from(error: &ClientError) -> Self {
        Notification::danger(error.to_string())
    }
}

impl From<ClientError> for Notification {
    fn from(error: ClientError) -> Self {
        Notification::from(&error)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
