//! Transient notices shown at the bottom of the screen.

use std::collections::VecDeque;
use std::time::Instant;

use crossterm::style::Color;
use grid_engine::notify::{Notice, NoticeLevel};

/// Most toasts on screen at once; older ones are dropped.
const MAX_VISIBLE: usize = 3;

#[derive(Debug, Clone)]
pub struct Toast {
    pub notice: Notice,
    expires_at: Instant,
}

impl Toast {
    pub fn text(&self) -> String {
        match &self.notice.body {
            Some(body) => format!("{}: {}", self.notice.title, body),
            None => self.notice.title.clone(),
        }
    }

    pub fn color(&self) -> Color {
        match self.notice.level {
            NoticeLevel::Info => Color::Grey,
            NoticeLevel::Success => Color::Green,
            NoticeLevel::Warning => Color::Yellow,
            NoticeLevel::Error => Color::Red,
        }
    }
}

/// Queue of toasts, newest last.
#[derive(Debug, Default)]
pub struct Toasts {
    queue: VecDeque<Toast>,
}

impl Toasts {
    pub fn push(&mut self, notice: Notice, now: Instant) {
        let expires_at = now + notice.duration();
        self.queue.push_back(Toast { notice, expires_at });
        while self.queue.len() > MAX_VISIBLE {
            self.queue.pop_front();
        }
    }

    /// Drop expired toasts. Returns true if any were removed.
    pub fn expire(&mut self, now: Instant) -> bool {
        let before = self.queue.len();
        self.queue.retain(|toast| toast.expires_at > now);
        self.queue.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.queue.iter()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_errors_outlive_successes() {
        let now = Instant::now();
        let mut toasts = Toasts::default();
        toasts.push(Notice::success("Order saved"), now);
        toasts.push(Notice::error("Failed to save order"), now);

        assert!(toasts.expire(now + Duration::from_secs(4)));
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts.iter().next().map(|t| t.notice.level), Some(NoticeLevel::Error));

        toasts.expire(now + Duration::from_secs(6));
        assert!(toasts.is_empty());
    }

    #[test]
    fn test_queue_is_bounded() {
        let now = Instant::now();
        let mut toasts = Toasts::default();
        for i in 0..5 {
            toasts.push(Notice::info(format!("n{}", i)), now);
        }
        assert_eq!(toasts.len(), MAX_VISIBLE);
        assert_eq!(toasts.iter().next().map(Toast::text), Some("n2".to_string()));
    }
}
