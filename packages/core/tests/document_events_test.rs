//! Document Event Tests
//!
//! Verifies that editing through the reducer emits exactly one store event per
//! mutation, and that the JSON wire format loads and saves documents unchanged.

#[cfg(test)]
mod document_events_tests {
    use anyhow::Result;
    use blockdoc_core::config::EditorConfig;
    use blockdoc_core::editor::{EditorEvent, EditorState, Key, KeyEvent, MenuItem};
    use blockdoc_core::models::{BlockId, BlockType, Document};
    use blockdoc_core::store::DocumentEvent;
    use serde_json::json;
    use tokio::sync::broadcast::error::TryRecvError;

    fn wire_document() -> serde_json::Value {
        json!([
            {"id": "1", "type": "h1", "content": "Title"},
            {"id": "2", "type": "p", "content": ""},
            {"id": "3", "type": "ul", "items": ["a", "b"]},
            {"id": "4", "type": "code", "language": "bash", "content": "ls"},
            {"id": "5", "type": "callout", "variant": "warning", "content": "Careful"}
        ])
    }

    #[test]
    fn test_wire_document_round_trips() -> Result<()> {
        let document: Document = serde_json::from_value(wire_document())?;
        assert_eq!(document.len(), 5);
        assert_eq!(document.blocks()[2].block_type(), BlockType::UnorderedList);

        assert_eq!(serde_json::to_value(&document)?, wire_document());
        Ok(())
    }

    #[test]
    fn test_wire_document_rejects_duplicates_and_empty() {
        let duplicate = json!([
            {"id": "1", "type": "p", "content": "a"},
            {"id": "1", "type": "p", "content": "b"}
        ]);
        assert!(serde_json::from_value::<Document>(duplicate).is_err());
        assert!(serde_json::from_value::<Document>(json!([])).is_err());
    }

    #[test]
    fn test_reducer_mutations_emit_one_event_each() -> Result<()> {
        let document: Document = serde_json::from_value(wire_document())?;
        let mut state = EditorState::new(document, EditorConfig::default());
        let mut rx = state.store().subscribe_to_events();

        // Enter on the heading inserts a paragraph at index 1.
        state.apply(EditorEvent::Key {
            id: BlockId::new("1"),
            event: KeyEvent::new(Key::Enter),
        })?;
        let inserted = match tokio_test::block_on(rx.recv())? {
            DocumentEvent::BlockInserted { block, index, revision } => {
                assert_eq!(index, 1);
                assert_eq!(revision, 1);
                block
            }
            other => panic!("expected BlockInserted, got {:?}", other),
        };
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));

        // Backspace on the new empty paragraph removes it again.
        state.apply(EditorEvent::Key {
            id: inserted.id().clone(),
            event: KeyEvent::new(Key::Backspace).on_empty(),
        })?;
        let removed = rx.try_recv()?;
        assert_eq!(removed.event_type(), "block:removed");
        assert_eq!(removed.revision(), 2);

        // Typing then blurring produces a single update.
        for text in ["n", "ne", "new"] {
            state.apply(EditorEvent::Input {
                id: BlockId::new("2"),
                text: text.to_string(),
            })?;
        }
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
        state.apply(EditorEvent::Blurred(BlockId::new("2")))?;
        let updated = rx.try_recv()?;
        assert_eq!(updated.event_type(), "block:updated");
        assert!(!updated.touches_headings());
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));

        // Menu heading insert is visible to outline consumers.
        state.apply(EditorEvent::AddBlockRequested {
            anchor: Default::default(),
        })?;
        state.apply(EditorEvent::MenuItemSelected(MenuItem::Heading))?;
        let appended = rx.try_recv()?;
        assert!(appended.touches_headings());
        assert_eq!(state.outline().len(), 2);
        Ok(())
    }

    #[test]
    fn test_rejected_removal_emits_nothing() -> Result<()> {
        let document: Document =
            serde_json::from_value(json!([{"id": "only", "type": "p", "content": ""}]))?;
        let mut state = EditorState::new(document, EditorConfig::default());
        let mut rx = state.store().subscribe_to_events();

        let transition = state.apply(EditorEvent::Key {
            id: BlockId::new("only"),
            event: KeyEvent::new(Key::Backspace).on_empty(),
        })?;

        assert!(transition.rejection.is_some());
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
        Ok(())
    }
}
