//! Client synchronizer: keeps a local, eventually consistent copy of the
//! server's items and turns it into sized bubbles for a [`View`].

mod bubble;
mod controller;
mod scheduler;
mod terminal;
mod view;

pub use bubble::{vote_label, Bubble, BubbleScale};
pub use controller::{AddOutcome, Controller, RefreshOutcome, SyncSettings, VoteOutcome};
pub use scheduler::{Job, Scheduler, TaskHandle, TokioScheduler};
pub use terminal::TerminalView;
pub use view::{Notice, NoticeKind, View};
