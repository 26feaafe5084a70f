//! Document change events
//!
//! The store broadcasts one event per successful mutation over a tokio
//! broadcast channel. Consumers such as the outline panel or block statistics
//! subscribe and re-derive their view from the store after each event.
//!
//! # Event Flow
//!
//! 1. `BlockStore` applies a mutation
//! 2. `revision` is incremented and a `DocumentEvent` is sent
//! 3. Subscribers receive the event and re-read the projection they render

use crate::models::{Block, BlockId};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DocumentEvent {
    /// A block was inserted at `index`
    #[serde(rename_all = "camelCase")]
    BlockInserted {
        block: Block,
        index: usize,
        revision: u64,
    },

    /// A block's content was replaced
    #[serde(rename_all = "camelCase")]
    BlockUpdated { block: Block, revision: u64 },

    /// A block was removed from `index`
    #[serde(rename_all = "camelCase")]
    BlockRemoved {
        id: BlockId,
        index: usize,
        revision: u64,
    },
}

impl DocumentEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            DocumentEvent::BlockInserted { .. } => "block:inserted",
            DocumentEvent::BlockUpdated { .. } => "block:updated",
            DocumentEvent::BlockRemoved { .. } => "block:removed",
        }
    }

    pub fn revision(&self) -> u64 {
        match self {
            DocumentEvent::BlockInserted { revision, .. }
            | DocumentEvent::BlockUpdated { revision, .. }
            | DocumentEvent::BlockRemoved { revision, .. } => *revision,
        }
    }

    /// Whether the event can change the outline
    pub fn touches_headings(&self) -> bool {
        match self {
            DocumentEvent::BlockInserted { block, .. } | DocumentEvent::BlockUpdated { block, .. } => {
                block.is_heading()
            }
            // Removal events do not carry the block; assume the worst.
            DocumentEvent::BlockRemoved { .. } => true,
        }
    }
}
