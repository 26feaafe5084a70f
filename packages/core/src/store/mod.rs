//! Block Sequence Store
//!
//! - `BlockStore` - Owns the document and every structural mutation of it
//! - `StoreError` - Invariant violations and stale references
//! - `DocumentEvent` - Change notifications for outline/statistics consumers

mod block_store;
pub mod error;
pub mod events;


pub use block_store::{BlockStore, Placement};
pub use error::StoreError;
pub use events::DocumentEvent;
