use std::time::Duration;

use super::Bubble;
use crate::item::ItemId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A transient message shown to the user for `ttl`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub ttl: Duration,
}

impl Notice {
    #[must_use]
    pub fn success(message: String, ttl: Duration) -> Self {
        Self {
            kind: NoticeKind::Success,
            message,
            ttl,
        }
    }

    #[must_use]
    pub fn error(message: String, ttl: Duration) -> Self {
        Self {
            kind: NoticeKind::Error,
            message,
            ttl,
        }
    }
}

/// Presentation layer driven by the [`Controller`](super::Controller).
///
/// Calls are made from async tasks and must not block.
pub trait View: Send + Sync {
    /// Replace everything on screen with `bubbles`.
    fn render(&self, bubbles: &[Bubble]);

    /// Redraw a single bubble in place.
    fn update_bubble(&self, bubble: &Bubble);

    fn pulse(&self, id: ItemId, duration: Duration);

    fn notify(&self, notice: Notice);

    fn close_dialog(&self);

    fn reset_input(&self);
}
