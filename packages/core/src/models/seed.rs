//! Sample seed content
//!
//! The "API Documentation v2.1" document the knowledge-update editor opens
//! with. Ids are the short numeric strings the web editor used.

use crate::models::block::{Block, BlockKind, CalloutVariant, HeadingLevel};
use crate::models::document::Document;

fn heading(id: &str, level: HeadingLevel, content: &str) -> Block {
    Block::with_id(
        id,
        BlockKind::Heading {
            level,
            content: content.to_string(),
        },
    )
}

fn paragraph(id: &str, content: &str) -> Block {
    Block::with_id(
        id,
        BlockKind::Paragraph {
            content: content.to_string(),
        },
    )
}

/// Seed document for the knowledge-update editor
pub fn api_documentation() -> Document {
    let blocks = vec![
        heading("1", HeadingLevel::One, "API Documentation v2.1"),
        heading("2", HeadingLevel::Two, "Overview"),
        paragraph(
            "3",
            "This document provides comprehensive guidance for integrating with our REST API endpoints. All endpoints require authentication using OAuth 2.0 or API keys.",
        ),
        heading("4", HeadingLevel::Two, "Authentication"),
        heading("5", HeadingLevel::Three, "API Key Authentication"),
        paragraph("6", "Include your API key in the request header:"),
        Block::with_id(
            "7",
            BlockKind::Code {
                language: "bash".to_string(),
                content: "curl -H \"Authorization: Bearer YOUR_API_KEY\" \\\n  https://api.example.com/v2/resource".to_string(),
            },
        ),
        heading("8", HeadingLevel::Three, "OAuth 2.0 Flow"),
        paragraph("9", "For applications requiring user authentication:"),
        Block::with_id(
            "10",
            BlockKind::OrderedList {
                items: vec![
                    "Redirect users to our authorization endpoint".to_string(),
                    "Exchange authorization code for access token".to_string(),
                    "Include access token in subsequent requests".to_string(),
                ],
            },
        ),
        Block::with_id(
            "11",
            BlockKind::Callout {
                variant: CalloutVariant::Info,
                content: "Note: Rate limit headers are included in all responses".to_string(),
            },
        ),
    ];

    // Ids above are distinct and the list is non-empty.
    Document::new(blocks).unwrap_or_else(|_| Document::blank())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_document_shape() {
        let doc = api_documentation();
        assert_eq!(doc.len(), 11);

        let stats = doc.stats();
        assert_eq!(stats.headings, 5);
        assert_eq!(stats.code_blocks, 1);

        let levels: Vec<u8> = doc.outline().iter().map(|entry| entry.level).collect();
        assert_eq!(levels, vec![1, 2, 2, 3, 3]);
    }
}
