//! Editor session
//!
//! `EditorSession` wires the pure state machine to the outside world: it
//! applies events to [`EditorState`], drives the [`CommitScheduler`] from the
//! returned effects and forwards focus, caret and publish requests to the host
//! [`EditorSurface`].
//!
//! # Examples
//!
//! ```rust
//! use blockdoc_core::config::EditorConfig;
//! use blockdoc_core::editor::{EditorEvent, EditorSession, Key, KeyEvent, RecordingSurface};
//! use blockdoc_core::models::seed;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = EditorSession::new(
//!     seed::api_documentation(),
//!     EditorConfig::default(),
//!     RecordingSurface::new(),
//! );
//!
//! let first = session.state().document().blocks()[0].id().clone();
//! session.dispatch(EditorEvent::Focused(first.clone()))?;
//! session.dispatch(EditorEvent::Key {
//!     id: first,
//!     event: KeyEvent::new(Key::Enter),
//! })?;
//! assert_eq!(session.state().document().len(), 12);
//!
//! session.shutdown()?;
//! # Ok(())
//! # }
//! ```

use crate::config::EditorConfig;
use crate::editor::debounce::{CommitScheduler, DueCommit};
use crate::editor::error::EditorError;
use crate::editor::state::{EditorEvent, EditorState, Effect, Transition};
use crate::editor::surface::EditorSurface;
use crate::models::Document;
use tokio::sync::mpsc;

pub struct EditorSession<S: EditorSurface> {
    state: EditorState,
    scheduler: CommitScheduler,
    due_rx: mpsc::UnboundedReceiver<DueCommit>,
    surface: S,
}

impl<S: EditorSurface> EditorSession<S> {
    /// Mount an editor over `document`
    pub fn new(document: Document, config: EditorConfig, surface: S) -> Self {
        let (scheduler, due_rx) = CommitScheduler::new();
        tracing::debug!(
            "Mounting editor with {} block(s), debounce {}ms",
            document.len(),
            config.debounce_ms
        );
        Self {
            state: EditorState::new(document, config),
            scheduler,
            due_rx,
            surface,
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn scheduler(&self) -> &CommitScheduler {
        &self.scheduler
    }

    /// Apply `event` and carry out the resulting effects
    pub fn dispatch(&mut self, event: EditorEvent) -> Result<Transition, EditorError> {
        let transition = self.state.apply(event)?;
        for effect in &transition.effects {
            self.perform(effect);
        }
        Ok(transition)
    }

    fn perform(&mut self, effect: &Effect) {
        match effect {
            Effect::Focus { id, caret } => {
                self.surface.focus(id);
                self.surface.set_caret(id, *caret);
            }
            Effect::ScheduleCommit {
                id,
                generation,
                delay,
            } => self.scheduler.schedule(id.clone(), *generation, *delay),
            Effect::CancelCommit { id } => {
                self.scheduler.cancel(id);
            }
            Effect::CancelAllCommits => self.scheduler.cancel_all(),
            Effect::Publish => {
                tracing::info!(
                    "Publishing document ({} blocks)",
                    self.state.document().len()
                );
                self.surface.publish(self.state.document());
            }
        }
    }

    /// Wait for the next debounce timer to fire
    ///
    /// Cancel-safe; intended for use in `tokio::select!` next to the host's
    /// input source.
    pub async fn next_commit(&mut self) -> Option<DueCommit> {
        self.due_rx.recv().await
    }

    /// Apply a fired timer to the state machine
    pub fn commit(&mut self, due: DueCommit) -> Result<Transition, EditorError> {
        self.scheduler.complete(&due);
        if self.state.is_torn_down() {
            return Ok(Transition::default());
        }
        self.dispatch(EditorEvent::CommitDue {
            id: due.id,
            generation: due.generation,
        })
    }

    /// Apply every debounce timer that has already fired, without waiting
    pub fn drain_due_commits(&mut self) -> Result<usize, EditorError> {
        let mut applied = 0;
        while let Ok(due) = self.due_rx.try_recv() {
            self.commit(due)?;
            applied += 1;
        }
        Ok(applied)
    }

    /// Unmount: flush drafts and cancel every pending timer
    pub fn shutdown(&mut self) -> Result<Transition, EditorError> {
        if self.state.is_torn_down() {
            return Ok(Transition::default());
        }
        tracing::debug!("Tearing down editor session");
        let result = self.dispatch(EditorEvent::Teardown);
        if result.is_err() {
            self.scheduler.cancel_all();
        }
        result
    }
}
