//! Transient operator notifications.
//!
//! Every failed backend call ends up as one `Notice`; nothing propagates past
//! the operation boundary.

use crate::api::admin_api::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// Message shown to the operator for a short time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    /// Set when the embedding UI must start its sign-in flow.
    pub requires_reauth: bool,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
            requires_reauth: false,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
            requires_reauth: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
            requires_reauth: false,
        }
    }

    /// Converts a backend failure into an operator message.
    ///
    /// Validation details are shown verbatim; transport failures get a
    /// generic message with the cause appended.
    pub fn from_api_error(action: &str, error: &ApiError) -> Self {
        match error {
            ApiError::SessionExpired => Self {
                level: NoticeLevel::Error,
                message: "Session expired. Please sign in again.".to_string(),
                requires_reauth: true,
            },
            ApiError::Validation { detail, .. } => Self::error(detail.clone()),
            ApiError::Timeout => Self::error(format!(
                "{action} failed: the server did not respond in time"
            )),
            other => Self::error(format!("{action} failed: {other}")),
        }
    }
}
