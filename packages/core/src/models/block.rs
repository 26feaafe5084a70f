//! Block Data Structures
//!
//! This module defines the `Block` struct, the unit of editable content in a
//! Blockdoc document, and the closed set of block variants it can hold.
//!
//! # Architecture
//!
//! - **Closed variant set**: `BlockKind` is an exhaustive sum type, so every
//!   consumer (outline, stats, markdown, rendering) is checked at compile time
//!   when a variant is added
//! - **Fixed identity**: a block's `id` and variant never change after creation;
//!   only its text or list items are edited in place
//! - **Flat wire shape**: blocks serialize to `{"id","type","content"|"items",...}`
//!   so seed content written for the web editor loads unchanged
//!
//! # Examples
//!
//! ```rust
//! use blockdoc_core::models::{Block, BlockType, HeadingLevel};
//!
//! let heading = Block::heading(HeadingLevel::Two, "Overview");
//! assert_eq!(heading.block_type(), BlockType::H2);
//! assert_eq!(heading.text(), Some("Overview"));
//!
//! let list = Block::ordered_list(vec!["first".to_string(), "second".to_string()]);
//! assert_eq!(list.items().map(|items| items.len()), Some(2));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Language used when a code block does not declare one
pub const DEFAULT_CODE_LANGUAGE: &str = "plaintext";

/// Validation errors for block and document construction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlockValidationError {
    #[error("Unknown block type: '{0}'")]
    UnknownType(String),

    #[error("Block '{id}' of type '{block_type}' is missing required field '{field}'")]
    MissingField {
        id: String,
        block_type: String,
        field: &'static str,
    },

    #[error("Block id cannot be empty")]
    EmptyId,

    #[error("Invalid heading level: {0} (expected 1, 2 or 3)")]
    InvalidHeadingLevel(u8),

    #[error("Duplicate block id: '{0}'")]
    DuplicateId(String),

    #[error("A document must contain at least one block")]
    EmptyDocument,
}

/// Stable, opaque block identifier
///
/// Blocks created by the editor receive a UUID v4. Seed content may use any
/// non-empty string (the sample document uses `"1"`, `"2"`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    /// Wrap an existing identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for BlockId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Heading depth, limited to the three levels the editor renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HeadingLevel {
    One = 1,
    Two = 2,
    Three = 3,
}

impl HeadingLevel {
    pub fn get(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for HeadingLevel {
    type Error = BlockValidationError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            other => Err(BlockValidationError::InvalidHeadingLevel(other)),
        }
    }
}

/// Visual tone of a callout block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalloutVariant {
    #[default]
    Info,
    Warning,
    Success,
    Error,
}

impl CalloutVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            CalloutVariant::Info => "info",
            CalloutVariant::Warning => "warning",
            CalloutVariant::Success => "success",
            CalloutVariant::Error => "error",
        }
    }
}

impl FromStr for CalloutVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "info" => Ok(Self::Info),
            "warning" => Ok(Self::Warning),
            "success" => Ok(Self::Success),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown callout variant '{}'", other)),
        }
    }
}

/// Variant payloads
///
/// Text-bearing variants carry `content`; list variants carry `items`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    Heading {
        level: HeadingLevel,
        content: String,
    },
    Paragraph {
        content: String,
    },
    OrderedList {
        items: Vec<String>,
    },
    UnorderedList {
        items: Vec<String>,
    },
    Code {
        language: String,
        content: String,
    },
    Callout {
        variant: CalloutVariant,
        content: String,
    },
}

/// Type tag of a block, as it appears in the `type` field on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockType {
    H1,
    H2,
    H3,
    Paragraph,
    OrderedList,
    UnorderedList,
    Code,
    Callout,
}

impl BlockType {
    pub fn tag(self) -> &'static str {
        match self {
            BlockType::H1 => "h1",
            BlockType::H2 => "h2",
            BlockType::H3 => "h3",
            BlockType::Paragraph => "p",
            BlockType::OrderedList => "ol",
            BlockType::UnorderedList => "ul",
            BlockType::Code => "code",
            BlockType::Callout => "callout",
        }
    }

    pub fn heading(level: HeadingLevel) -> Self {
        match level {
            HeadingLevel::One => BlockType::H1,
            HeadingLevel::Two => BlockType::H2,
            HeadingLevel::Three => BlockType::H3,
        }
    }

    /// Heading level for heading types, `None` otherwise
    pub fn heading_level(self) -> Option<HeadingLevel> {
        match self {
            BlockType::H1 => Some(HeadingLevel::One),
            BlockType::H2 => Some(HeadingLevel::Two),
            BlockType::H3 => Some(HeadingLevel::Three),
            BlockType::Paragraph
            | BlockType::OrderedList
            | BlockType::UnorderedList
            | BlockType::Code
            | BlockType::Callout => None,
        }
    }

    pub fn is_list(self) -> bool {
        matches!(self, BlockType::OrderedList | BlockType::UnorderedList)
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for BlockType {
    type Err = BlockValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "h1" => Ok(BlockType::H1),
            "h2" => Ok(BlockType::H2),
            "h3" => Ok(BlockType::H3),
            "p" => Ok(BlockType::Paragraph),
            "ol" => Ok(BlockType::OrderedList),
            "ul" => Ok(BlockType::UnorderedList),
            "code" => Ok(BlockType::Code),
            "callout" => Ok(BlockType::Callout),
            other => Err(BlockValidationError::UnknownType(other.to_string())),
        }
    }
}

/// Replacement payload for an in-place content edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockContent {
    Text(String),
    Items(Vec<String>),
}

impl BlockContent {
    /// Interpret raw editable text for a block of the given type
    ///
    /// List blocks are edited as one item per line; blank lines are dropped.
    pub fn from_text(block_type: BlockType, text: &str) -> Self {
        if block_type.is_list() {
            BlockContent::Items(
                text.lines()
                    .map(str::trim_end)
                    .filter(|line| !line.is_empty())
                    .map(String::from)
                    .collect(),
            )
        } else {
            BlockContent::Text(text.to_string())
        }
    }
}

/// A typed unit of document content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BlockRecord", into = "BlockRecord")]
pub struct Block {
    id: BlockId,
    kind: BlockKind,
}

impl Block {
    /// Create a block with a freshly generated id
    pub fn new(kind: BlockKind) -> Self {
        Self {
            id: BlockId::generate(),
            kind,
        }
    }

    /// Create a block with a caller-supplied id (seed content)
    pub fn with_id(id: impl Into<BlockId>, kind: BlockKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }

    pub fn heading(level: HeadingLevel, content: impl Into<String>) -> Self {
        Self::new(BlockKind::Heading {
            level,
            content: content.into(),
        })
    }

    pub fn paragraph(content: impl Into<String>) -> Self {
        Self::new(BlockKind::Paragraph {
            content: content.into(),
        })
    }

    pub fn code(language: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(BlockKind::Code {
            language: language.into(),
            content: content.into(),
        })
    }

    pub fn callout(variant: CalloutVariant, content: impl Into<String>) -> Self {
        Self::new(BlockKind::Callout {
            variant,
            content: content.into(),
        })
    }

    pub fn ordered_list(items: Vec<String>) -> Self {
        Self::new(BlockKind::OrderedList { items })
    }

    pub fn unordered_list(items: Vec<String>) -> Self {
        Self::new(BlockKind::UnorderedList { items })
    }

    pub fn id(&self) -> &BlockId {
        &self.id
    }

    pub fn kind(&self) -> &BlockKind {
        &self.kind
    }

    pub fn block_type(&self) -> BlockType {
        match &self.kind {
            BlockKind::Heading { level, .. } => BlockType::heading(*level),
            BlockKind::Paragraph { .. } => BlockType::Paragraph,
            BlockKind::OrderedList { .. } => BlockType::OrderedList,
            BlockKind::UnorderedList { .. } => BlockType::UnorderedList,
            BlockKind::Code { .. } => BlockType::Code,
            BlockKind::Callout { .. } => BlockType::Callout,
        }
    }

    /// Text payload of text-bearing variants
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            BlockKind::Heading { content, .. }
            | BlockKind::Paragraph { content }
            | BlockKind::Code { content, .. }
            | BlockKind::Callout { content, .. } => Some(content),
            BlockKind::OrderedList { .. } | BlockKind::UnorderedList { .. } => None,
        }
    }

    /// Item payload of list variants
    pub fn items(&self) -> Option<&[String]> {
        match &self.kind {
            BlockKind::OrderedList { items } | BlockKind::UnorderedList { items } => Some(items),
            BlockKind::Heading { .. }
            | BlockKind::Paragraph { .. }
            | BlockKind::Code { .. }
            | BlockKind::Callout { .. } => None,
        }
    }

    /// Current payload as a `BlockContent`
    pub fn content(&self) -> BlockContent {
        match &self.kind {
            BlockKind::OrderedList { items } | BlockKind::UnorderedList { items } => {
                BlockContent::Items(items.clone())
            }
            BlockKind::Heading { content, .. }
            | BlockKind::Paragraph { content }
            | BlockKind::Code { content, .. }
            | BlockKind::Callout { content, .. } => BlockContent::Text(content.clone()),
        }
    }

    /// Text as shown in the block's editable region (list items joined by newlines)
    pub fn editable_text(&self) -> String {
        match &self.kind {
            BlockKind::OrderedList { items } | BlockKind::UnorderedList { items } => {
                items.join("\n")
            }
            BlockKind::Heading { content, .. }
            | BlockKind::Paragraph { content }
            | BlockKind::Code { content, .. }
            | BlockKind::Callout { content, .. } => content.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match &self.kind {
            BlockKind::OrderedList { items } | BlockKind::UnorderedList { items } => {
                items.iter().all(|item| item.is_empty())
            }
            BlockKind::Heading { content, .. }
            | BlockKind::Paragraph { content }
            | BlockKind::Code { content, .. }
            | BlockKind::Callout { content, .. } => content.is_empty(),
        }
    }

    pub fn is_heading(&self) -> bool {
        matches!(self.kind, BlockKind::Heading { .. })
    }

    /// Whether `content` can replace this block's payload without changing its type
    pub fn accepts(&self, content: &BlockContent) -> bool {
        matches!(
            (&self.kind, content),
            (BlockKind::OrderedList { .. }, BlockContent::Items(_))
                | (BlockKind::UnorderedList { .. }, BlockContent::Items(_))
                | (BlockKind::Heading { .. }, BlockContent::Text(_))
                | (BlockKind::Paragraph { .. }, BlockContent::Text(_))
                | (BlockKind::Code { .. }, BlockContent::Text(_))
                | (BlockKind::Callout { .. }, BlockContent::Text(_))
        )
    }

    /// Replace the payload in place
    ///
    /// Returns `false` (leaving the block untouched) when the payload shape does
    /// not match the variant.
    pub(crate) fn replace_content(&mut self, content: BlockContent) -> bool {
        match (&mut self.kind, content) {
            (BlockKind::OrderedList { items }, BlockContent::Items(new_items))
            | (BlockKind::UnorderedList { items }, BlockContent::Items(new_items)) => {
                *items = new_items;
                true
            }
            (BlockKind::Heading { content, .. }, BlockContent::Text(text))
            | (BlockKind::Paragraph { content }, BlockContent::Text(text))
            | (BlockKind::Code { content, .. }, BlockContent::Text(text))
            | (BlockKind::Callout { content, .. }, BlockContent::Text(text)) => {
                *content = text;
                true
            }
            _ => false,
        }
    }
}

/// Flat serialized shape of a block
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlockRecord {
    id: String,
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    items: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    variant: Option<CalloutVariant>,
}

impl TryFrom<BlockRecord> for Block {
    type Error = BlockValidationError;

    fn try_from(record: BlockRecord) -> Result<Self, Self::Error> {
        if record.id.is_empty() {
            return Err(BlockValidationError::EmptyId);
        }

        let block_type: BlockType = record.block_type.parse()?;
        let missing = |field: &'static str| BlockValidationError::MissingField {
            id: record.id.clone(),
            block_type: record.block_type.clone(),
            field,
        };

        let kind = match block_type {
            BlockType::H1 | BlockType::H2 | BlockType::H3 => BlockKind::Heading {
                level: block_type
                    .heading_level()
                    .unwrap_or(HeadingLevel::One),
                content: record.content.clone().ok_or_else(|| missing("content"))?,
            },
            BlockType::Paragraph => BlockKind::Paragraph {
                content: record.content.clone().ok_or_else(|| missing("content"))?,
            },
            BlockType::OrderedList => BlockKind::OrderedList {
                items: record.items.clone().ok_or_else(|| missing("items"))?,
            },
            BlockType::UnorderedList => BlockKind::UnorderedList {
                items: record.items.clone().ok_or_else(|| missing("items"))?,
            },
            BlockType::Code => BlockKind::Code {
                language: record
                    .language
                    .clone()
                    .unwrap_or_else(|| DEFAULT_CODE_LANGUAGE.to_string()),
                content: record.content.clone().ok_or_else(|| missing("content"))?,
            },
            BlockType::Callout => BlockKind::Callout {
                variant: record.variant.unwrap_or_default(),
                content: record.content.clone().ok_or_else(|| missing("content"))?,
            },
        };

        Ok(Block {
            id: BlockId(record.id),
            kind,
        })
    }
}

impl From<Block> for BlockRecord {
    fn from(block: Block) -> Self {
        let block_type = block.block_type().tag().to_string();
        let mut record = BlockRecord {
            id: block.id.0,
            block_type,
            content: None,
            items: None,
            language: None,
            variant: None,
        };

        match block.kind {
            BlockKind::Heading { content, .. } | BlockKind::Paragraph { content } => {
                record.content = Some(content);
            }
            BlockKind::OrderedList { items } | BlockKind::UnorderedList { items } => {
                record.items = Some(items);
            }
            BlockKind::Code { language, content } => {
                record.language = Some(language);
                record.content = Some(content);
            }
            BlockKind::Callout { variant, content } => {
                record.variant = Some(variant);
                record.content = Some(content);
            }
        }

        record
    }
}
