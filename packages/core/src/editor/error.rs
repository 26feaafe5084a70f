//! Error types for the editor state machine

use crate::store::StoreError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    /// Store rejected an edit
    ///
    /// With `strict_references` off, missing-block errors are logged and
    /// swallowed instead of being returned.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// A menu item was selected while the menu was closed
    #[error("Insertion menu is not open")]
    MenuClosed,

    /// The editor was torn down and no longer accepts events
    #[error("Editor has been torn down")]
    TornDown,
}
