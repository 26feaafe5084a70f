//! Error types for the block sequence store
//!
//! These errors describe structural edits that would break the document's
//! invariants (unique ids, never empty) or that reference blocks which are no
//! longer in the sequence.

use crate::models::{BlockId, BlockType, BlockValidationError};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// `insert_after` anchor is not in the sequence
    ///
    /// Recovered locally by appending; only reported through
    /// `Placement::Appended { anchor_missing: true }` and logs.
    #[error("Anchor block '{anchor_id}' not found")]
    AnchorNotFound { anchor_id: BlockId },

    /// Referenced block does not exist
    ///
    /// Usually a stale reference, such as a commit for a block that was
    /// removed in the meantime.
    #[error("Block '{id}' not found")]
    BlockNotFound { id: BlockId },

    /// Removing the block would leave the document empty
    #[error("Cannot remove block '{id}': it is the last remaining block")]
    LastBlockRemoval { id: BlockId },

    /// A block with this id is already in the sequence
    #[error("Block '{id}' already exists")]
    DuplicateBlock { id: BlockId },

    /// Text supplied for a list block, or items for a text block
    #[error("Content does not match block '{id}' of type '{block_type}'")]
    ContentMismatch { id: BlockId, block_type: BlockType },

    #[error("Invalid document: {0}")]
    InvalidDocument(#[from] BlockValidationError),
}

impl StoreError {
    pub fn block_not_found(id: &BlockId) -> Self {
        Self::BlockNotFound { id: id.clone() }
    }

    pub fn last_block_removal(id: &BlockId) -> Self {
        Self::LastBlockRemoval { id: id.clone() }
    }

    /// Whether the error comes from referencing a block that is not present
    pub fn is_missing_reference(&self) -> bool {
        matches!(
            self,
            StoreError::BlockNotFound { .. } | StoreError::AnchorNotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_block_removal_message() {
        let err = StoreError::last_block_removal(&BlockId::new("1"));
        assert_eq!(
            err.to_string(),
            "Cannot remove block '1': it is the last remaining block"
        );
        assert!(!err.is_missing_reference());
    }

    #[test]
    fn test_block_not_found_is_missing_reference() {
        let err = StoreError::block_not_found(&BlockId::new("gone"));
        assert_eq!(err.to_string(), "Block 'gone' not found");
        assert!(err.is_missing_reference());
    }

    #[test]
    fn test_content_mismatch_message() {
        let err = StoreError::ContentMismatch {
            id: BlockId::new("10"),
            block_type: BlockType::OrderedList,
        };
        assert_eq!(
            err.to_string(),
            "Content does not match block '10' of type 'ol'"
        );
    }
}
