//! Tests for Block and Document

#[cfg(test)]
mod tests {
    use crate::models::{
        Block, BlockContent, BlockId, BlockKind, BlockType, BlockValidationError, CalloutVariant,
        Document, HeadingLevel,
    };
    use serde_json::json;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = Block::paragraph("");
        let b = Block::paragraph("");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_block_type_tags_round_trip_through_from_str() {
        for block_type in [
            BlockType::H1,
            BlockType::H2,
            BlockType::H3,
            BlockType::Paragraph,
            BlockType::OrderedList,
            BlockType::UnorderedList,
            BlockType::Code,
            BlockType::Callout,
        ] {
            assert_eq!(block_type.tag().parse::<BlockType>(), Ok(block_type));
        }
        assert_eq!(
            "quote".parse::<BlockType>(),
            Err(BlockValidationError::UnknownType("quote".to_string()))
        );
    }

    #[test]
    fn test_heading_level_conversion() {
        assert_eq!(HeadingLevel::try_from(2), Ok(HeadingLevel::Two));
        assert_eq!(
            HeadingLevel::try_from(4),
            Err(BlockValidationError::InvalidHeadingLevel(4))
        );
        assert_eq!(BlockType::H3.heading_level(), Some(HeadingLevel::Three));
        assert_eq!(BlockType::Code.heading_level(), None);
    }

    /// Contract test: the flat JSON shape the web editor seeds blocks with.
    #[test]
    fn test_block_serialization_contract() {
        let code = Block::with_id(
            "7",
            BlockKind::Code {
                language: "bash".to_string(),
                content: "ls -la".to_string(),
            },
        );
        assert_eq!(
            serde_json::to_value(&code).unwrap(),
            json!({"id": "7", "type": "code", "language": "bash", "content": "ls -la"})
        );

        let list = Block::with_id(
            "10",
            BlockKind::OrderedList {
                items: vec!["one".to_string(), "two".to_string()],
            },
        );
        assert_eq!(
            serde_json::to_value(&list).unwrap(),
            json!({"id": "10", "type": "ol", "items": ["one", "two"]})
        );

        let callout = Block::with_id(
            "11",
            BlockKind::Callout {
                variant: CalloutVariant::Warning,
                content: "Heads up".to_string(),
            },
        );
        assert_eq!(
            serde_json::to_value(&callout).unwrap(),
            json!({"id": "11", "type": "callout", "variant": "warning", "content": "Heads up"})
        );
    }

    #[test]
    fn test_block_deserialization_defaults() {
        let code: Block =
            serde_json::from_value(json!({"id": "c", "type": "code", "content": "x"})).unwrap();
        assert!(matches!(
            code.kind(),
            BlockKind::Code { language, .. } if language == "plaintext"
        ));

        let callout: Block =
            serde_json::from_value(json!({"id": "k", "type": "callout", "content": "note"}))
                .unwrap();
        assert!(matches!(
            callout.kind(),
            BlockKind::Callout {
                variant: CalloutVariant::Info,
                ..
            }
        ));

        let heading: Block =
            serde_json::from_value(json!({"id": "h", "type": "h2", "content": "Overview"}))
                .unwrap();
        assert_eq!(heading.block_type(), BlockType::H2);
    }

    #[test]
    fn test_block_deserialization_rejects_bad_shapes() {
        let missing_items =
            serde_json::from_value::<Block>(json!({"id": "1", "type": "ul", "content": "x"}));
        let err = missing_items.unwrap_err().to_string();
        assert!(err.contains("missing required field 'items'"), "{}", err);

        let unknown = serde_json::from_value::<Block>(json!({"id": "1", "type": "table"}));
        assert!(unknown.unwrap_err().to_string().contains("Unknown block type"));

        let empty_id =
            serde_json::from_value::<Block>(json!({"id": "", "type": "p", "content": ""}));
        assert!(empty_id.unwrap_err().to_string().contains("cannot be empty"));
    }

    #[test]
    fn test_replace_content_respects_variant() {
        let mut paragraph = Block::paragraph("old");
        assert!(paragraph.replace_content(BlockContent::Text("new".to_string())));
        assert_eq!(paragraph.text(), Some("new"));

        assert!(!paragraph.replace_content(BlockContent::Items(vec!["x".to_string()])));
        assert_eq!(paragraph.text(), Some("new"));
        assert_eq!(paragraph.block_type(), BlockType::Paragraph);

        let mut list = Block::unordered_list(vec![]);
        assert!(list.replace_content(BlockContent::Items(vec!["a".to_string()])));
        assert_eq!(list.items(), Some(&["a".to_string()][..]));
    }

    #[test]
    fn test_content_from_text_splits_list_lines() {
        assert_eq!(
            BlockContent::from_text(BlockType::OrderedList, "first\n\nsecond \n"),
            BlockContent::Items(vec!["first".to_string(), "second".to_string()])
        );
        assert_eq!(
            BlockContent::from_text(BlockType::Paragraph, "a\nb"),
            BlockContent::Text("a\nb".to_string())
        );
    }

    #[test]
    fn test_editable_text_and_emptiness() {
        let list = Block::ordered_list(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(list.editable_text(), "a\nb");
        assert!(!list.is_empty());
        assert!(Block::paragraph("").is_empty());
        assert!(!Block::heading(HeadingLevel::One, "T").is_empty());
    }

    #[test]
    fn test_document_rejects_empty_and_duplicates() {
        assert_eq!(
            Document::new(vec![]),
            Err(BlockValidationError::EmptyDocument)
        );

        let dup = Document::new(vec![
            Block::with_id("1", BlockKind::Paragraph { content: "a".to_string() }),
            Block::with_id("1", BlockKind::Paragraph { content: "b".to_string() }),
        ]);
        assert_eq!(dup, Err(BlockValidationError::DuplicateId("1".to_string())));
    }

    #[test]
    fn test_document_rejects_empty_id() {
        let blocks = vec![
            Block::with_id("1", BlockKind::Paragraph { content: "a".to_string() }),
            Block::with_id("", BlockKind::Paragraph { content: "b".to_string() }),
        ];
        assert_eq!(Document::new(blocks), Err(BlockValidationError::EmptyId));
    }

    #[test]
    fn test_document_json_round_trip_keeps_order() {
        let json = r#"[
            {"id": "1", "type": "h1", "content": "Title"},
            {"id": "2", "type": "p", "content": "Body"},
            {"id": "3", "type": "ul", "items": ["x", "y"]}
        ]"#;
        let doc = Document::from_json(json).unwrap();
        let ids: Vec<&str> = doc.iter().map(|block| block.id().as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);

        let reparsed: Document =
            serde_json::from_str(&serde_json::to_string(&doc).unwrap()).unwrap();
        assert_eq!(reparsed, doc);
    }

    #[test]
    fn test_document_json_rejects_empty_array() {
        assert!(Document::from_json("[]").is_err());
    }

    #[test]
    fn test_document_lookup() {
        let doc = Document::new(vec![
            Block::with_id("a", BlockKind::Paragraph { content: String::new() }),
            Block::with_id("b", BlockKind::Paragraph { content: String::new() }),
        ])
        .unwrap();

        assert_eq!(doc.position(&BlockId::new("b")), Some(1));
        assert!(doc.get(&BlockId::new("z")).is_none());
        assert!(!doc.is_empty());
    }
}
