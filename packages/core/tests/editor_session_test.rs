//! Editor Session Tests
//!
//! End-to-end tests that drive an `EditorSession` the way a host would:
//! events in, surface calls and debounced store commits out. Timing tests run
//! on a paused tokio clock.

#[cfg(test)]
mod editor_session_tests {
    use anyhow::Result;
    use blockdoc_core::config::EditorConfig;
    use blockdoc_core::editor::{
        CaretPosition, EditorEvent, EditorSession, Key, KeyEvent, MenuItem, RecordingSurface,
        SurfaceCall,
    };
    use blockdoc_core::models::{seed, Block, BlockId, BlockKind, BlockType, Document};
    use tokio::time::{advance, Duration};

    fn session_with(blocks: Vec<Block>) -> Result<EditorSession<RecordingSurface>> {
        Ok(EditorSession::new(
            Document::new(blocks)?,
            EditorConfig::default(),
            RecordingSurface::new(),
        ))
    }

    fn paragraph(id: &str, content: &str) -> Block {
        Block::with_id(
            id,
            BlockKind::Paragraph {
                content: content.to_string(),
            },
        )
    }

    fn type_text(session: &mut EditorSession<RecordingSurface>, id: &str, text: &str) -> Result<()> {
        session.dispatch(EditorEvent::Input {
            id: BlockId::new(id),
            text: text.to_string(),
        })?;
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_commits_once_after_quiet_period() -> Result<()> {
        let mut session = session_with(vec![paragraph("1", "")])?;

        for text in ["H", "He", "Hel", "Hell", "Hello"] {
            type_text(&mut session, "1", text)?;
            advance(Duration::from_millis(100)).await;
        }
        assert_eq!(session.scheduler().pending_count(), 1);
        assert_eq!(session.state().store().revision(), 0);

        let due = session.next_commit().await.expect("commit should fire");
        session.commit(due)?;

        assert_eq!(session.state().store().revision(), 1);
        assert_eq!(session.state().document().blocks()[0].text(), Some("Hello"));
        assert_eq!(session.state().pending_drafts(), 0);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_nothing_commits_before_debounce_elapses() -> Result<()> {
        let mut session = session_with(vec![paragraph("1", "")])?;
        type_text(&mut session, "1", "draft")?;

        advance(Duration::from_millis(499)).await;
        assert_eq!(session.drain_due_commits()?, 0);
        assert_eq!(session.state().document().blocks()[0].text(), Some(""));

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(session.drain_due_commits()?, 1);
        assert_eq!(session.state().document().blocks()[0].text(), Some("draft"));
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_blur_commits_and_cancels_timer() -> Result<()> {
        let mut session = session_with(vec![paragraph("1", "")])?;
        type_text(&mut session, "1", "typed")?;

        session.dispatch(EditorEvent::Blurred(BlockId::new("1")))?;

        assert_eq!(session.state().document().blocks()[0].text(), Some("typed"));
        assert_eq!(session.scheduler().pending_count(), 0);

        advance(Duration::from_secs(1)).await;
        assert_eq!(session.drain_due_commits()?, 0);
        assert_eq!(session.state().store().revision(), 1);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_removed_block_timer_is_cancelled() -> Result<()> {
        let mut session = session_with(vec![paragraph("1", "a"), paragraph("2", "")])?;
        type_text(&mut session, "2", "x")?;

        session.dispatch(EditorEvent::Key {
            id: BlockId::new("2"),
            event: KeyEvent::new(Key::Backspace).on_empty(),
        })?;

        advance(Duration::from_secs(1)).await;
        session.drain_due_commits()?;

        assert_eq!(session.state().document().len(), 1);
        assert!(!session.state().document().contains(&BlockId::new("2")));
        assert_eq!(
            session.surface().last_caret(),
            Some((&BlockId::new("1"), CaretPosition::End))
        );
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_flushes_and_cancels_timers() -> Result<()> {
        let mut session = session_with(vec![paragraph("1", ""), paragraph("2", "")])?;
        type_text(&mut session, "1", "one")?;
        type_text(&mut session, "2", "two")?;
        assert_eq!(session.scheduler().pending_count(), 2);

        session.shutdown()?;

        assert_eq!(session.scheduler().pending_count(), 0);
        let texts: Vec<Option<&str>> = session
            .state()
            .document()
            .iter()
            .map(Block::text)
            .collect();
        assert_eq!(texts, vec![Some("one"), Some("two")]);

        // A second shutdown is a no-op.
        assert!(!session.shutdown()?.handled);
        Ok(())
    }

    #[tokio::test]
    async fn test_enter_focuses_new_paragraph_at_start() -> Result<()> {
        let mut session = EditorSession::new(
            seed::api_documentation(),
            EditorConfig::default(),
            RecordingSurface::new(),
        );

        session.dispatch(EditorEvent::Key {
            id: BlockId::new("3"),
            event: KeyEvent::new(Key::Enter),
        })?;

        let inserted = session.state().document().blocks()[3].clone();
        assert_eq!(inserted.block_type(), BlockType::Paragraph);
        assert_eq!(
            session.surface().calls(),
            &[
                SurfaceCall::Focus(inserted.id().clone()),
                SurfaceCall::SetCaret(inserted.id().clone(), CaretPosition::Start),
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_menu_insert_extends_outline() -> Result<()> {
        let mut session = EditorSession::new(
            seed::api_documentation(),
            EditorConfig::default(),
            RecordingSurface::new(),
        );
        let before = session.state().outline().len();

        session.dispatch(EditorEvent::AddBlockRequested {
            anchor: Default::default(),
        })?;
        session.dispatch(EditorEvent::MenuItemSelected(MenuItem::Heading))?;

        let outline = session.state().outline();
        assert_eq!(outline.len(), before + 1);
        assert_eq!(outline.last().map(|entry| entry.text.as_str()), Some("New Heading"));
        assert_eq!(session.state().stats().blocks, 12);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_publish_delivers_flushed_document() -> Result<()> {
        let mut session = session_with(vec![paragraph("1", "")])?;
        type_text(&mut session, "1", "ready")?;

        session.dispatch(EditorEvent::PublishRequested)?;

        let published = session.surface().published();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].blocks()[0].text(), Some("ready"));
        assert_eq!(session.scheduler().pending_count(), 0);
        Ok(())
    }
}
