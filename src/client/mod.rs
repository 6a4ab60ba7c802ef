//! Client side of the item API.
//!
//! The synchronizer only sees [`ItemApi`]; [`HttpApi`] is the reqwest
//! implementation that talks to a running item service.

mod error;
mod http_api;

pub use error::ClientError;
pub use http_api::HttpApi;

use async_trait::async_trait;

use crate::item::{Item, ItemId, VoteReceipt};

#[async_trait]
pub trait ItemApi: Send + Sync {
    /// Fetch every item, ordered as the server orders them.
    async fn list_items(&self) -> Result<Vec<Item>, ClientError>;

    /// Create an item. `name` is sent as given.
    async fn add_item(&self, name: &str) -> Result<Item, ClientError>;

    /// Cast a vote and return the item's new count.
    async fn vote(&self, id: ItemId) -> Result<VoteReceipt, ClientError>;
}
