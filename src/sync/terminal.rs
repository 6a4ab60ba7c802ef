//! Plain-text board for the CLI.

use std::io::{self, Write as _};
use std::sync::Mutex;
use std::time::Duration;

use tracing::debug;

use super::{Bubble, Notice, NoticeKind, View};
use crate::item::ItemId;

/// A [`View`] that writes the board to stdout.
///
/// Each bubble becomes one line with a bar whose width follows the bubble
/// size. Dialog calls have nothing to act on in a terminal.
#[derive(Debug, Default)]
pub struct TerminalView {
    board: Mutex<Vec<Bubble>>,
}

/// Pixels per bar cell.
const PX_PER_CELL: u32 = 8;

impl TerminalView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The board as text, one line per bubble.
    #[must_use]
    pub fn format_board(bubbles: &[Bubble]) -> String {
        if bubbles.is_empty() {
            return "No items yet. Add one with `bubble-vote add <NAME>`.\n".to_string();
        }
        let width = bubbles
            .iter()
            .map(|b| b.name.chars().count())
            .max()
            .unwrap_or_default();
        bubbles
            .iter()
            .map(|b| format_line(b, width))
            .collect()
    }

    fn write(text: &str) {
        let mut out = io::stdout().lock();
        if let Err(e) = out.write_all(text.as_bytes()).and_then(|()| out.flush()) {
            debug!("Failed to write to stdout: {e}");
        }
    }

    fn redraw(&self) {
        let text = {
            let board = self
                .board
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            Self::format_board(&board)
        };
        Self::write(&format!("\n{text}"));
    }
}

fn format_line(bubble: &Bubble, width: usize) -> String {
    let cells = usize::try_from(bubble.size_px.div_ceil(PX_PER_CELL)).unwrap_or_default();
    let mark = if bubble.voted_by_me { '*' } else { ' ' };
    format!(
        "{mark} #{id:<4} {name:<width$}  {bar} {label}\n",
        id = bubble.id,
        name = bubble.name,
        bar = "o".repeat(cells),
        label = bubble.label,
    )
}

impl View for TerminalView {
    fn render(&self, bubbles: &[Bubble]) {
        {
            let mut board = self
                .board
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            board.clear();
            board.extend_from_slice(bubbles);
        }
        self.redraw();
    }

    fn update_bubble(&self, bubble: &Bubble) {
        {
            let mut board = self
                .board
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            if let Some(slot) = board.iter_mut().find(|b| b.id == bubble.id) {
                slot.clone_from(bubble);
            }
        }
        self.redraw();
    }

    fn pulse(&self, id: ItemId, duration: Duration) {
        debug!(id, duration_ms = %duration.as_millis(), "Pulse");
    }

    fn notify(&self, notice: Notice) {
        let prefix = match notice.kind {
            NoticeKind::Success => "ok",
            NoticeKind::Error => "error",
        };
        Self::write(&format!("[{prefix}] {}\n", notice.message));
    }

    fn close_dialog(&self) {}

    fn reset_input(&self) {}
}
