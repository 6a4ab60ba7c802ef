//! Error type for item operations.

use thiserror::Error;

use super::ItemId;
use crate::store::StoreError;

/// Errors raised while validating or mutating items.
///
/// The display strings of the user-facing variants are the messages the
/// API returns in its `error` field.
#[derive(Error, Debug)]
pub enum ItemError {
    #[error("Name required")]
    NameRequired,

    #[error("Name must be at most {max} characters")]
    NameTooLong { max: usize },

    #[error("This item is already in the list.")]
    DuplicateName,

    #[error("Item not found: {0}")]
    NotFound(ItemId),

    #[error("You have already voted for this item.")]
    AlreadyVoted(ItemId),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}
