//! Block editor interaction layer
//!
//! - `EditorState` - Reducer over key, focus, input and menu events
//! - `CommitScheduler` - Per-block debounce timers
//! - `EditorSession` - Runs the reducer against a host `EditorSurface`
//! - `MenuItem` - Block types offered by the insertion menu

pub mod debounce;
pub mod error;
pub mod input;
pub mod menu;
pub mod session;
pub mod state;
pub mod surface;


pub use debounce::{CommitScheduler, DueCommit};
pub use error::EditorError;
pub use input::{CaretPosition, Key, KeyEvent, KeyTarget, MenuAnchor, TargetRect};
pub use menu::{MenuItem, MenuState};
pub use session::EditorSession;
pub use state::{EditorEvent, EditorState, Effect, Mode, Transition};
pub use surface::{EditorSurface, RecordingSurface, SurfaceCall};
