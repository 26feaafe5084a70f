//! Keyboard interaction state machine
//!
//! `EditorState` is the single state record of the editor (block store, active
//! block, insertion menu and per-block drafts) and `apply` is its transition
//! function. The reducer never performs side effects itself: focus moves,
//! caret placement, debounce timers and publishing are returned as
//! [`Effect`]s for the host to carry out.
//!
//! # Transitions
//!
//! | State    | Trigger            | Guard                     | Result                                   |
//! |----------|--------------------|---------------------------|------------------------------------------|
//! | Idle     | `/`                | block text empty          | menu opens below the block               |
//! | Idle     | `Enter`            | shift not held            | commit draft, new paragraph after, focus |
//! | Idle     | `Backspace`        | text empty, > 1 block     | focus previous (caret end), remove       |
//! | MenuOpen | item selected      |                           | insert block, menu closes                |
//! | MenuOpen | click outside      |                           | menu closes                              |
//!
//! Any other key is left to the host's text editing.
//!
//! # Drafts
//!
//! `Input` events only touch the block's draft and schedule a commit. The
//! draft reaches the store when the matching `CommitDue` arrives, on blur, on
//! Enter, on publish or on teardown. Each scheduled commit carries the draft's
//! generation, so a late timer for an older draft (or for a removed block) is
//! ignored.

use crate::config::{EditorConfig, MenuInsertion};
use crate::editor::error::EditorError;
use crate::editor::input::{CaretPosition, Key, KeyEvent, MenuAnchor};
use crate::editor::menu::{MenuItem, MenuState};
use crate::models::{Block, BlockContent, BlockId, Document, DocumentStats, OutlineEntry};
use crate::store::{BlockStore, StoreError};
use std::collections::HashMap;
use std::time::Duration;

/// Input to the state machine
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    /// An editable region gained focus
    Focused(BlockId),
    /// An editable region lost focus
    Blurred(BlockId),
    /// The text of a block's editable region changed
    Input { id: BlockId, text: String },
    /// A key was pressed inside a block's editable region
    Key { id: BlockId, event: KeyEvent },
    /// The "Add a block" affordance was clicked
    AddBlockRequested { anchor: MenuAnchor },
    MenuItemSelected(MenuItem),
    /// Click outside the insertion menu
    MenuDismissed,
    /// A heading was picked in the outline panel
    OutlineSelected(BlockId),
    /// A debounce timer fired
    CommitDue { id: BlockId, generation: u64 },
    PublishRequested,
    /// The editor is being unmounted
    Teardown,
}

/// Side effect requested from the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Focus { id: BlockId, caret: CaretPosition },
    ScheduleCommit {
        id: BlockId,
        generation: u64,
        delay: Duration,
    },
    CancelCommit { id: BlockId },
    CancelAllCommits,
    Publish,
}

/// Outcome of applying one event
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transition {
    /// The event was consumed; hosts should suppress their default handling
    pub handled: bool,
    pub effects: Vec<Effect>,
    /// Edit that was refused by an invariant guard (e.g. removing the last block)
    pub rejection: Option<StoreError>,
}

impl Transition {
    fn consumed() -> Self {
        Self {
            handled: true,
            ..Default::default()
        }
    }

    fn passthrough() -> Self {
        Self::default()
    }

    fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Interaction mode derived from the menu state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Idle,
    MenuOpen,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Draft {
    text: String,
    generation: u64,
}

pub struct EditorState {
    store: BlockStore,
    focus: Option<BlockId>,
    menu: MenuState,
    drafts: HashMap<BlockId, Draft>,
    next_generation: u64,
    config: EditorConfig,
    torn_down: bool,
}

impl EditorState {
    pub fn new(document: Document, config: EditorConfig) -> Self {
        Self {
            store: BlockStore::new(document),
            focus: None,
            menu: MenuState::Closed,
            drafts: HashMap::new(),
            next_generation: 0,
            config,
            torn_down: false,
        }
    }

    pub fn store(&self) -> &BlockStore {
        &self.store
    }

    pub fn document(&self) -> &Document {
        self.store.document()
    }

    pub fn outline(&self) -> Vec<OutlineEntry> {
        self.store.outline()
    }

    pub fn stats(&self) -> DocumentStats {
        self.store.stats()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn focus(&self) -> Option<&BlockId> {
        self.focus.as_ref()
    }

    pub fn menu(&self) -> &MenuState {
        &self.menu
    }

    pub fn mode(&self) -> Mode {
        if self.menu.is_open() {
            Mode::MenuOpen
        } else {
            Mode::Idle
        }
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Uncommitted text for `id`, if any
    pub fn draft(&self, id: &BlockId) -> Option<&str> {
        self.drafts.get(id).map(|draft| draft.text.as_str())
    }

    pub fn pending_drafts(&self) -> usize {
        self.drafts.len()
    }

    /// Text currently shown in `id`'s editable region (draft first, then store)
    pub fn visible_text(&self, id: &BlockId) -> Option<String> {
        match self.drafts.get(id) {
            Some(draft) => Some(draft.text.clone()),
            None => self.store.get(id).map(Block::editable_text),
        }
    }

    /// Apply one event and return the effects the host must carry out
    pub fn apply(&mut self, event: EditorEvent) -> Result<Transition, EditorError> {
        if self.torn_down {
            return Err(EditorError::TornDown);
        }

        tracing::trace!("Editor event {:?} in mode {:?}", event, self.mode());

        match event {
            EditorEvent::Focused(id) => self.on_focused(id),
            EditorEvent::Blurred(id) => self.on_blurred(id),
            EditorEvent::Input { id, text } => self.on_input(id, text),
            EditorEvent::Key { id, event } => match self.mode() {
                Mode::Idle => self.on_key(id, event),
                Mode::MenuOpen => Ok(Transition::passthrough()),
            },
            EditorEvent::AddBlockRequested { anchor } => {
                self.menu = MenuState::Open {
                    anchor,
                    invoked_from: None,
                };
                Ok(Transition::consumed())
            }
            EditorEvent::MenuItemSelected(item) => self.on_menu_item(item),
            EditorEvent::MenuDismissed => {
                self.menu = MenuState::Closed;
                Ok(Transition::consumed())
            }
            EditorEvent::OutlineSelected(id) => self.on_outline_selected(id),
            EditorEvent::CommitDue { id, generation } => self.on_commit_due(id, generation),
            EditorEvent::PublishRequested => {
                self.flush_drafts()?;
                Ok(Transition::consumed()
                    .with_effect(Effect::CancelAllCommits)
                    .with_effect(Effect::Publish))
            }
            EditorEvent::Teardown => {
                // Torn down even when a draft could not be flushed.
                let flushed = self.flush_drafts();
                self.torn_down = true;
                self.menu = MenuState::Closed;
                self.focus = None;
                self.drafts.clear();
                flushed?;
                Ok(Transition::consumed().with_effect(Effect::CancelAllCommits))
            }
        }
    }

    /// Handle a reference to a block that is not in the sequence
    fn stale_reference(&self, err: StoreError) -> Result<Transition, EditorError> {
        if self.config.strict_references {
            return Err(err.into());
        }
        tracing::warn!("Ignoring stale block reference: {}", err);
        Ok(Transition::passthrough())
    }

    fn on_focused(&mut self, id: BlockId) -> Result<Transition, EditorError> {
        if !self.store.contains(&id) {
            return self.stale_reference(StoreError::block_not_found(&id));
        }
        self.focus = Some(id);
        Ok(Transition::consumed())
    }

    fn on_blurred(&mut self, id: BlockId) -> Result<Transition, EditorError> {
        if !self.drafts.contains_key(&id) {
            return Ok(Transition::consumed());
        }
        match self.commit_draft(&id) {
            Ok(_) => Ok(Transition::consumed().with_effect(Effect::CancelCommit { id })),
            Err(err) if err.is_missing_reference() => self.stale_reference(err),
            Err(err) => Err(err.into()),
        }
    }

    fn on_input(&mut self, id: BlockId, text: String) -> Result<Transition, EditorError> {
        if !self.store.contains(&id) {
            return self.stale_reference(StoreError::block_not_found(&id));
        }

        self.next_generation += 1;
        let generation = self.next_generation;
        self.drafts.insert(id.clone(), Draft { text, generation });

        Ok(Transition::consumed().with_effect(Effect::ScheduleCommit {
            id,
            generation,
            delay: self.config.debounce(),
        }))
    }

    fn on_commit_due(&mut self, id: BlockId, generation: u64) -> Result<Transition, EditorError> {
        match self.drafts.get(&id) {
            Some(draft) if draft.generation == generation => {}
            _ => {
                tracing::debug!(
                    "Dropping superseded commit for block '{}' (generation {})",
                    id,
                    generation
                );
                return Ok(Transition::passthrough());
            }
        }

        match self.commit_draft(&id) {
            Ok(_) => Ok(Transition::consumed()),
            Err(err) if err.is_missing_reference() => self.stale_reference(err),
            Err(err) => Err(err.into()),
        }
    }

    fn on_key(&mut self, id: BlockId, event: KeyEvent) -> Result<Transition, EditorError> {
        if !self.store.contains(&id) {
            return self.stale_reference(StoreError::block_not_found(&id));
        }
        self.focus = Some(id.clone());

        match event.key {
            Key::Char('/') if event.target.is_empty => {
                self.menu = MenuState::Open {
                    anchor: event.target.rect.menu_anchor(),
                    invoked_from: Some(id),
                };
                Ok(Transition::consumed())
            }
            Key::Enter if !event.shift => self.split_after(id),
            Key::Backspace if event.target.is_empty => self.remove_empty(id),
            _ => Ok(Transition::passthrough()),
        }
    }

    /// Enter: commit the current draft and open a new paragraph after the block
    fn split_after(&mut self, id: BlockId) -> Result<Transition, EditorError> {
        let mut transition = Transition::consumed();
        if self.drafts.contains_key(&id) {
            self.commit_draft(&id)?;
            transition = transition.with_effect(Effect::CancelCommit { id: id.clone() });
        }

        let block = Block::paragraph("");
        let new_id = block.id().clone();
        self.store.insert_after(&id, block)?;
        self.focus = Some(new_id.clone());

        tracing::debug!("Split after block '{}' into new paragraph '{}'", id, new_id);
        Ok(transition.with_effect(Effect::Focus {
            id: new_id,
            caret: CaretPosition::Start,
        }))
    }

    /// Backspace on an empty block: focus the previous block and remove this one
    fn remove_empty(&mut self, id: BlockId) -> Result<Transition, EditorError> {
        if self.store.len() <= 1 {
            let err = StoreError::last_block_removal(&id);
            tracing::warn!("Rejected removal: {}", err);
            return Ok(Transition {
                handled: true,
                effects: Vec::new(),
                rejection: Some(err),
            });
        }

        let previous = self.store.previous_id(&id).cloned();
        let mut transition = Transition::consumed();
        if let Some(prev) = &previous {
            transition = transition.with_effect(Effect::Focus {
                id: prev.clone(),
                caret: CaretPosition::End,
            });
        }

        self.store.remove(&id)?;
        self.drafts.remove(&id);
        if self.focus.as_ref() == Some(&id) {
            self.focus = previous;
        }

        tracing::debug!("Removed empty block '{}'", id);
        Ok(transition.with_effect(Effect::CancelCommit { id }))
    }

    fn on_menu_item(&mut self, item: MenuItem) -> Result<Transition, EditorError> {
        let invoked_from = match std::mem::take(&mut self.menu) {
            MenuState::Open { invoked_from, .. } => invoked_from,
            MenuState::Closed => return Err(EditorError::MenuClosed),
        };

        let block = item.build(&self.config);
        let new_id = block.id().clone();
        let placement = match (self.config.menu_insertion, invoked_from) {
            (MenuInsertion::AfterInvoker, Some(anchor)) => self.store.insert_after(&anchor, block)?,
            _ => self.store.append(block)?,
        };

        tracing::debug!(
            "Inserted {} block '{}' from menu at index {}",
            item,
            new_id,
            placement.index()
        );
        Ok(Transition::consumed())
    }

    fn on_outline_selected(&mut self, id: BlockId) -> Result<Transition, EditorError> {
        if !self.store.contains(&id) {
            return self.stale_reference(StoreError::block_not_found(&id));
        }
        self.focus = Some(id.clone());
        Ok(Transition::consumed().with_effect(Effect::Focus {
            id,
            caret: CaretPosition::Start,
        }))
    }

    /// Move `id`'s draft into the store
    ///
    /// Returns whether the store was mutated; a draft equal to the stored
    /// content is discarded without a mutation.
    fn commit_draft(&mut self, id: &BlockId) -> Result<bool, StoreError> {
        let Some(draft) = self.drafts.remove(id) else {
            return Ok(false);
        };

        let block = self
            .store
            .get(id)
            .ok_or_else(|| StoreError::block_not_found(id))?;
        let content = BlockContent::from_text(block.block_type(), &draft.text);
        if block.content() == content {
            return Ok(false);
        }

        self.store.update_content(id, content)?;
        tracing::debug!("Committed draft for block '{}'", id);
        Ok(true)
    }

    fn flush_drafts(&mut self) -> Result<(), EditorError> {
        let mut ids: Vec<BlockId> = self.drafts.keys().cloned().collect();
        ids.sort_by_key(|id| self.store.position(id));

        for id in ids {
            match self.commit_draft(&id) {
                Ok(_) => {}
                Err(err) if err.is_missing_reference() => {
                    self.stale_reference(err)?;
                }
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }
}
