// Status notifications - Messages for the status bar, tagged with severity and source

use crate::library::LibraryError;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationLevel::Info => write!(f, "info"),
            NotificationLevel::Warning => write!(f, "warning"),
            NotificationLevel::Error => write!(f, "error"),
        }
    }
}

/// Which collaborator raised the notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationCategory {
    /// Loading or decoding the current asset
    Asset,
    /// Listing, importing or deleting stored assets
    Library,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub category: NotificationCategory,
    pub message: String,
    /// Creation time, Unix milliseconds
    pub timestamp: u64,
}

impl Notification {
    pub fn new(
        level: NotificationLevel,
        category: NotificationCategory,
        message: impl Into<String>,
    ) -> Self {
        Self {
            level,
            category,
            message: message.into(),
            timestamp: unix_millis(),
        }
    }

    pub fn info(category: NotificationCategory, message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, category, message)
    }

    pub fn error(category: NotificationCategory, message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, category, message)
    }

    /// Status message for a failed library operation.
    /// A missing asset only means the listing was stale.
    pub fn from_library_error(error: &LibraryError) -> Self {
        let level = match error {
            LibraryError::NotFound(_) => NotificationLevel::Warning,
            _ => NotificationLevel::Error,
        };
        Self::new(level, NotificationCategory::Library, error.to_string())
    }

    pub fn age_ms(&self) -> u64 {
        unix_millis().saturating_sub(self.timestamp)
    }

    pub fn is_recent(&self, max_age_ms: u64) -> bool {
        self.age_ms() < max_age_ms
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.level, self.message)
    }
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
