//! Block insertion menu
//!
//! The menu offers the basic block types. Each item builds a fresh block with
//! variant-appropriate placeholder content.

use crate::config::EditorConfig;
use crate::editor::input::MenuAnchor;
use crate::models::{Block, BlockId, BlockKind};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuItem {
    Text,
    Heading,
    CodeBlock,
    Callout,
}

impl MenuItem {
    /// Items in display order
    pub const ALL: [MenuItem; 4] = [
        MenuItem::Text,
        MenuItem::Heading,
        MenuItem::CodeBlock,
        MenuItem::Callout,
    ];

    pub fn title(self) -> &'static str {
        match self {
            MenuItem::Text => "Text",
            MenuItem::Heading => "Heading",
            MenuItem::CodeBlock => "Code Block",
            MenuItem::Callout => "Callout",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            MenuItem::Text => "Start writing with plain text",
            MenuItem::Heading => "Large, medium, small",
            MenuItem::CodeBlock => "Add code with syntax highlighting",
            MenuItem::Callout => "Make text stand out",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            MenuItem::Text => "",
            MenuItem::Heading => "New Heading",
            MenuItem::CodeBlock => "// Your code here",
            MenuItem::Callout => "Important information",
        }
    }

    /// Build a new block for this item
    pub fn build(self, config: &EditorConfig) -> Block {
        let content = self.placeholder().to_string();
        let kind = match self {
            MenuItem::Text => BlockKind::Paragraph { content },
            MenuItem::Heading => BlockKind::Heading {
                level: config.heading_level(),
                content,
            },
            MenuItem::CodeBlock => BlockKind::Code {
                language: config.code_language.clone(),
                content,
            },
            MenuItem::Callout => BlockKind::Callout {
                variant: config.callout_variant,
                content,
            },
        };
        Block::new(kind)
    }
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for MenuItem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "p" | "paragraph" => Ok(MenuItem::Text),
            "heading" | "h" => Ok(MenuItem::Heading),
            "code" | "code-block" | "codeblock" => Ok(MenuItem::CodeBlock),
            "callout" => Ok(MenuItem::Callout),
            other => Err(format!("unknown menu item '{}'", other)),
        }
    }
}

/// Visibility of the insertion menu
#[derive(Debug, Clone, Default, PartialEq)]
pub enum MenuState {
    #[default]
    Closed,
    Open {
        anchor: MenuAnchor,
        /// Block the menu was opened from with `/`; `None` for the "Add a block" button
        invoked_from: Option<BlockId>,
    },
}

impl MenuState {
    pub fn is_open(&self) -> bool {
        matches!(self, MenuState::Open { .. })
    }

    pub fn anchor(&self) -> Option<MenuAnchor> {
        match self {
            MenuState::Open { anchor, .. } => Some(*anchor),
            MenuState::Closed => None,
        }
    }
}
