//! User-facing notifications.

use std::time::Duration;

use log::{error, info, warn};

/// Notification level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NoticeLevel {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

/// A notification for the user, shown by whatever toast mechanism the
/// front end has.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Title to display (single line)
    pub title: String,
    /// Optional body text
    pub body: Option<String>,
    /// Notice level (affects styling)
    pub level: NoticeLevel,
}

impl Notice {
    /// Create a simple info notice
    pub fn info(title: impl Into<String>) -> Self {
        Self::with_level(title, NoticeLevel::Info)
    }

    /// Create a success notice
    pub fn success(title: impl Into<String>) -> Self {
        Self::with_level(title, NoticeLevel::Success)
    }

    /// Create a warning notice
    pub fn warning(title: impl Into<String>) -> Self {
        Self::with_level(title, NoticeLevel::Warning)
    }

    /// Create an error notice
    pub fn error(title: impl Into<String>) -> Self {
        Self::with_level(title, NoticeLevel::Error)
    }

    fn with_level(title: impl Into<String>, level: NoticeLevel) -> Self {
        Self {
            title: title.into(),
            body: None,
            level,
        }
    }

    /// Add a body to the notice
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Suggested display time: errors linger longer than confirmations.
    pub fn duration(&self) -> Duration {
        match self.level {
            NoticeLevel::Info | NoticeLevel::Success => Duration::from_secs(3),
            NoticeLevel::Warning => Duration::from_secs(4),
            NoticeLevel::Error => Duration::from_secs(5),
        }
    }
}

/// Shows notices to the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

impl<F> Notifier for F
where
    F: Fn(Notice) + Send + Sync,
{
    fn notify(&self, notice: Notice) {
        self(notice)
    }
}

/// Notifier that writes notices to the log instead of showing them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        let body = notice.body.as_deref().unwrap_or("");
        match notice.level {
            NoticeLevel::Info | NoticeLevel::Success => {
                info!(target: "grid_engine::notify", "{} {}", notice.title, body)
            }
            NoticeLevel::Warning => warn!(target: "grid_engine::notify", "{} {}", notice.title, body),
            NoticeLevel::Error => error!(target: "grid_engine::notify", "{} {}", notice.title, body),
        }
    }
}
