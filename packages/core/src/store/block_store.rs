//! Block Sequence Store
//!
//! `BlockStore` owns the document and is its only mutation surface: insertion
//! after an anchor, append, in-place content replacement and removal. Every
//! successful mutation bumps the revision, stamps `modified_at` and broadcasts a
//! [`DocumentEvent`].
//!
//! # Invariants
//!
//! - Block ids are unique within the sequence
//! - The sequence is never empty; removing the last block fails with
//!   `StoreError::LastBlockRemoval` and leaves the document unchanged
//! - Content edits never change a block's type or position
//!
//! # Examples
//!
//! ```rust
//! use blockdoc_core::models::{Block, Document};
//! use blockdoc_core::store::BlockStore;
//!
//! let title = Block::paragraph("Title");
//! let title_id = title.id().clone();
//! let mut store = BlockStore::new(Document::new(vec![title]).unwrap());
//!
//! let body = Block::paragraph("");
//! store.insert_after(&title_id, body).unwrap();
//! assert_eq!(store.len(), 2);
//!
//! // The first block can go, the last one cannot.
//! store.remove(&title_id).unwrap();
//! let remaining = store.blocks()[0].id().clone();
//! assert!(store.remove(&remaining).is_err());
//! ```

use crate::models::{Block, BlockContent, BlockId, Document, DocumentStats, OutlineEntry};
use crate::store::error::StoreError;
use crate::store::events::DocumentEvent;
use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

/// Broadcast channel capacity for document events
const DOCUMENT_EVENT_CHANNEL_CAPACITY: usize = 128;

/// Where an inserted block ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Directly after the requested anchor
    AfterAnchor { index: usize },
    /// At the end of the sequence
    ///
    /// `anchor_missing` is set when an anchor was requested but not found.
    Appended { index: usize, anchor_missing: bool },
}

impl Placement {
    pub fn index(self) -> usize {
        match self {
            Placement::AfterAnchor { index } | Placement::Appended { index, .. } => index,
        }
    }
}

pub struct BlockStore {
    document: Document,
    revision: u64,
    modified_at: DateTime<Utc>,
    event_tx: broadcast::Sender<DocumentEvent>,
}

impl BlockStore {
    pub fn new(document: Document) -> Self {
        let (event_tx, _) = broadcast::channel(DOCUMENT_EVENT_CHANNEL_CAPACITY);
        Self {
            document,
            revision: 0,
            modified_at: Utc::now(),
            event_tx,
        }
    }

    /// Build a store directly from seed blocks
    ///
    /// # Errors
    ///
    /// `StoreError::InvalidDocument` if `blocks` is empty or repeats an id.
    pub fn from_blocks(blocks: Vec<Block>) -> Result<Self, StoreError> {
        Ok(Self::new(Document::new(blocks)?))
    }

    /// Subscribe to document change events
    ///
    /// Only events emitted after subscribing are delivered.
    pub fn subscribe_to_events(&self) -> broadcast::Receiver<DocumentEvent> {
        self.event_tx.subscribe()
    }

    fn emit_event(&self, event: DocumentEvent) {
        let _ = self.event_tx.send(event);
    }

    fn touch(&mut self) -> u64 {
        self.revision += 1;
        self.modified_at = Utc::now();
        self.revision
    }

    fn ensure_unique(&self, block: &Block) -> Result<(), StoreError> {
        if self.document.contains(block.id()) {
            return Err(StoreError::DuplicateBlock {
                id: block.id().clone(),
            });
        }
        Ok(())
    }

    fn insert_at(&mut self, index: usize, block: Block) {
        let event_block = block.clone();
        self.document.blocks_mut().insert(index, block);
        let revision = self.touch();
        tracing::debug!(
            "Inserted block '{}' ({}) at index {} (rev {})",
            event_block.id(),
            event_block.block_type(),
            index,
            revision
        );
        self.emit_event(DocumentEvent::BlockInserted {
            block: event_block,
            index,
            revision,
        });
    }

    /// Insert `block` immediately after the block identified by `anchor_id`
    ///
    /// A missing anchor is not an error: the block is appended and the returned
    /// placement reports `anchor_missing: true`.
    ///
    /// # Errors
    ///
    /// `StoreError::DuplicateBlock` if a block with the same id already exists.
    pub fn insert_after(&mut self, anchor_id: &BlockId, block: Block) -> Result<Placement, StoreError> {
        self.ensure_unique(&block)?;

        match self.document.position(anchor_id) {
            Some(anchor_index) => {
                let index = anchor_index + 1;
                self.insert_at(index, block);
                Ok(Placement::AfterAnchor { index })
            }
            None => {
                let err = StoreError::AnchorNotFound {
                    anchor_id: anchor_id.clone(),
                };
                tracing::warn!("{}; appending block '{}' instead", err, block.id());
                let index = self.document.len();
                self.insert_at(index, block);
                Ok(Placement::Appended {
                    index,
                    anchor_missing: true,
                })
            }
        }
    }

    /// Add `block` at the end of the sequence
    pub fn append(&mut self, block: Block) -> Result<Placement, StoreError> {
        self.ensure_unique(&block)?;
        let index = self.document.len();
        self.insert_at(index, block);
        Ok(Placement::Appended {
            index,
            anchor_missing: false,
        })
    }

    /// Replace the text or items of the block with `id`
    ///
    /// # Errors
    ///
    /// - `StoreError::BlockNotFound` if no block has this id
    /// - `StoreError::ContentMismatch` if the payload shape does not fit the block type
    pub fn update_content(&mut self, id: &BlockId, content: BlockContent) -> Result<(), StoreError> {
        let index = self
            .document
            .position(id)
            .ok_or_else(|| StoreError::block_not_found(id))?;

        let block = &mut self.document.blocks_mut()[index];
        let block_type = block.block_type();
        if !block.replace_content(content) {
            return Err(StoreError::ContentMismatch {
                id: id.clone(),
                block_type,
            });
        }
        let event_block = block.clone();

        let revision = self.touch();
        tracing::debug!("Updated content of block '{}' (rev {})", id, revision);
        self.emit_event(DocumentEvent::BlockUpdated {
            block: event_block,
            revision,
        });
        Ok(())
    }

    /// Remove the block with `id` and return it
    ///
    /// # Errors
    ///
    /// - `StoreError::BlockNotFound` if no block has this id
    /// - `StoreError::LastBlockRemoval` if it is the only block left
    pub fn remove(&mut self, id: &BlockId) -> Result<Block, StoreError> {
        let index = self
            .document
            .position(id)
            .ok_or_else(|| StoreError::block_not_found(id))?;

        if self.document.len() == 1 {
            return Err(StoreError::last_block_removal(id));
        }

        let removed = self.document.blocks_mut().remove(index);
        let revision = self.touch();
        tracing::debug!("Removed block '{}' from index {} (rev {})", id, index, revision);
        self.emit_event(DocumentEvent::BlockRemoved {
            id: id.clone(),
            index,
            revision,
        });
        Ok(removed)
    }

    pub fn get(&self, id: &BlockId) -> Option<&Block> {
        self.document.get(id)
    }

    pub fn contains(&self, id: &BlockId) -> bool {
        self.document.contains(id)
    }

    pub fn position(&self, id: &BlockId) -> Option<usize> {
        self.document.position(id)
    }

    /// Id of the block preceding `id`, if any
    pub fn previous_id(&self, id: &BlockId) -> Option<&BlockId> {
        let index = self.document.position(id)?;
        index
            .checked_sub(1)
            .and_then(|prev| self.document.blocks().get(prev))
            .map(Block::id)
    }

    pub fn len(&self) -> usize {
        self.document.len()
    }

    pub fn is_empty(&self) -> bool {
        self.document.is_empty()
    }

    pub fn blocks(&self) -> &[Block] {
        self.document.blocks()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn outline(&self) -> Vec<OutlineEntry> {
        self.document.outline()
    }

    pub fn stats(&self) -> DocumentStats {
        self.document.stats()
    }

    /// Number of successful mutations since the store was created
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn modified_at(&self) -> DateTime<Utc> {
        self.modified_at
    }
}
