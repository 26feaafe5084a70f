//! Outline and statistics projections
//!
//! Both projections are pure functions of the block sequence and are computed
//! on every read. Nothing here is cached, so an outline can never point at a
//! block that has been removed.

use crate::models::block::{Block, BlockId, BlockKind};
use serde::Serialize;

/// One heading in the document outline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineEntry {
    /// Back-reference to the heading block
    pub id: BlockId,
    pub text: String,
    /// 1, 2 or 3
    pub level: u8,
}

/// Derive the outline: every heading block, in sequence order
pub fn project_outline(blocks: &[Block]) -> Vec<OutlineEntry> {
    blocks
        .iter()
        .filter_map(|block| match block.kind() {
            BlockKind::Heading { level, content } => Some(OutlineEntry {
                id: block.id().clone(),
                text: content.clone(),
                level: level.get(),
            }),
            BlockKind::Paragraph { .. }
            | BlockKind::OrderedList { .. }
            | BlockKind::UnorderedList { .. }
            | BlockKind::Code { .. }
            | BlockKind::Callout { .. } => None,
        })
        .collect()
}

/// Block counts shown alongside the outline
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStats {
    pub blocks: usize,
    pub headings: usize,
    pub code_blocks: usize,
}

impl DocumentStats {
    pub fn from_blocks(blocks: &[Block]) -> Self {
        blocks.iter().fold(
            DocumentStats {
                blocks: blocks.len(),
                ..Default::default()
            },
            |mut stats, block| {
                match block.kind() {
                    BlockKind::Heading { .. } => stats.headings += 1,
                    BlockKind::Code { .. } => stats.code_blocks += 1,
                    BlockKind::Paragraph { .. }
                    | BlockKind::OrderedList { .. }
                    | BlockKind::UnorderedList { .. }
                    | BlockKind::Callout { .. } => {}
                }
                stats
            },
        )
    }
}
