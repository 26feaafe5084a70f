//! Data Models
//!
//! This module contains the core data structures of a Blockdoc document:
//!
//! - `Block` - Typed unit of content (heading, paragraph, list, code, callout)
//! - `Document` - Ordered, non-empty sequence of blocks
//! - `OutlineEntry` / `DocumentStats` - Read-only projections of a document
//!
//! Projections are recomputed from the block sequence on every read.

mod block;
mod document;
pub mod outline;
pub mod seed;

#[cfg(test)]
mod block_test;

pub use block::{
    Block, BlockContent, BlockId, BlockKind, BlockType, BlockValidationError, CalloutVariant,
    HeadingLevel, DEFAULT_CODE_LANGUAGE,
};
pub use document::Document;
pub use outline::{project_outline, DocumentStats, OutlineEntry};
