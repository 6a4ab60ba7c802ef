use serde::{Deserialize, Serialize};

/// Server-assigned item identifier.
pub type ItemId = u64;

/// An item as it travels over the wire.
///
/// `voted_by_me` is computed per request for the calling voter; it is absent
/// from create responses and defaults to `false` when decoding them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub votes: u64,
    #[serde(default)]
    pub voted_by_me: bool,
}

/// Body of a successful vote response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteReceipt {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ItemId>,
    pub votes: u64,
}
