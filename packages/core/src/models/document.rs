//! Ordered block sequence
//!
//! A `Document` is the ordered list of blocks the editor works on. Insertion
//! order is both display and semantic order; ids are unique and the sequence is
//! never empty.

use crate::models::block::{Block, BlockId, BlockValidationError};
use crate::models::outline::{project_outline, DocumentStats, OutlineEntry};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Block>", into = "Vec<Block>")]
pub struct Document {
    blocks: Vec<Block>,
}

impl Document {
    /// Build a document from seed blocks
    ///
    /// # Errors
    ///
    /// - `BlockValidationError::EmptyDocument` if `blocks` is empty
    /// - `BlockValidationError::EmptyId` if a block has an empty id
    /// - `BlockValidationError::DuplicateId` if two blocks share an id
    pub fn new(blocks: Vec<Block>) -> Result<Self, BlockValidationError> {
        if blocks.is_empty() {
            return Err(BlockValidationError::EmptyDocument);
        }

        let mut seen = HashSet::with_capacity(blocks.len());
        for block in &blocks {
            if block.id().as_str().is_empty() {
                return Err(BlockValidationError::EmptyId);
            }
            if !seen.insert(block.id()) {
                return Err(BlockValidationError::DuplicateId(block.id().to_string()));
            }
        }

        Ok(Self { blocks })
    }

    /// A document holding a single empty paragraph
    pub fn blank() -> Self {
        Self {
            blocks: vec![Block::paragraph("")],
        }
    }

    /// Parse a document from its JSON block array
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always `false` for a validly constructed document
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn get(&self, id: &BlockId) -> Option<&Block> {
        self.blocks.iter().find(|block| block.id() == id)
    }

    pub fn position(&self, id: &BlockId) -> Option<usize> {
        self.blocks.iter().position(|block| block.id() == id)
    }

    pub fn contains(&self, id: &BlockId) -> bool {
        self.position(id).is_some()
    }

    pub fn first(&self) -> Option<&Block> {
        self.blocks.first()
    }

    pub fn last(&self) -> Option<&Block> {
        self.blocks.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    pub fn outline(&self) -> Vec<OutlineEntry> {
        project_outline(&self.blocks)
    }

    pub fn stats(&self) -> DocumentStats {
        DocumentStats::from_blocks(&self.blocks)
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }

    pub(crate) fn blocks_mut(&mut self) -> &mut Vec<Block> {
        &mut self.blocks
    }
}

impl TryFrom<Vec<Block>> for Document {
    type Error = BlockValidationError;

    fn try_from(blocks: Vec<Block>) -> Result<Self, Self::Error> {
        Self::new(blocks)
    }
}

impl From<Document> for Vec<Block> {
    fn from(document: Document) -> Self {
        document.blocks
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}
