//! Blockdoc Core
//!
//! This crate provides the document model, block store and keyboard-driven
//! editing state machine behind the Blockdoc block editor.
//!
//! # Architecture
//!
//! - **Ordered blocks**: a document is an ordered, non-empty sequence of typed blocks
//! - **Derived projections**: the outline and statistics are recomputed from the
//!   sequence on every read and never stored
//! - **Pure reducer**: [`editor::EditorState::apply`] maps events to store
//!   mutations plus effects (focus, caret, timers) for the host to perform
//! - **Debounced commits**: typing is held in per-block drafts and committed after
//!   a quiet period, on blur, or when the editor is torn down
//!
//! # Modules
//!
//! - [`models`] - Blocks, documents, outline and seed content
//! - [`store`] - Mutable block sequence with change events
//! - [`editor`] - Interaction state machine, debounce scheduler and session
//! - [`config`] - Editor configuration
//! - [`utils`] - Markdown import and export

pub mod config;
pub mod editor;
pub mod models;
pub mod store;
pub mod utils;

// Re-export commonly used types
pub use config::{ConfigError, EditorConfig, MenuInsertion};
pub use editor::{EditorError, EditorEvent, EditorSession, EditorState, EditorSurface, Effect};
pub use models::*;
pub use store::{BlockStore, DocumentEvent, StoreError};
