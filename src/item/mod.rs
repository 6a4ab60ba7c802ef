//! Item domain: the wire types shared by the server and the client,
//! their error type, and name validation.

mod error;
mod types;
mod validation;

pub use error::ItemError;
pub use types::{Item, ItemId, VoteReceipt};
pub use validation::{name_key, normalize_name, MAX_NAME_LEN};
