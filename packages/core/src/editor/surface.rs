//! Rendering-layer capabilities used by the editor
//!
//! The state machine never touches presentation primitives. It asks the host
//! surface to move focus, place the caret and deliver publish intents.

use crate::editor::input::CaretPosition;
use crate::models::{BlockId, Document};

pub trait EditorSurface {
    /// Give keyboard focus to the editable region of `id`
    fn focus(&mut self, id: &BlockId);

    /// Place the caret at the start or end of `id`'s content
    fn set_caret(&mut self, id: &BlockId, position: CaretPosition);

    /// The user asked to publish `document`
    fn publish(&mut self, document: &Document) {
        let _ = document;
    }
}

/// One call received by a [`RecordingSurface`]
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    Focus(BlockId),
    SetCaret(BlockId, CaretPosition),
    Publish(Document),
}

/// Headless surface that records every call
#[derive(Debug, Default)]
pub struct RecordingSurface {
    calls: Vec<SurfaceCall>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    /// Most recently focused block and caret placement
    pub fn last_caret(&self) -> Option<(&BlockId, CaretPosition)> {
        self.calls.iter().rev().find_map(|call| match call {
            SurfaceCall::SetCaret(id, position) => Some((id, *position)),
            SurfaceCall::Focus(_) | SurfaceCall::Publish(_) => None,
        })
    }

    pub fn published(&self) -> Vec<&Document> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                SurfaceCall::Publish(document) => Some(document),
                SurfaceCall::Focus(_) | SurfaceCall::SetCaret(..) => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl EditorSurface for RecordingSurface {
    fn focus(&mut self, id: &BlockId) {
        self.calls.push(SurfaceCall::Focus(id.clone()));
    }

    fn set_caret(&mut self, id: &BlockId, position: CaretPosition) {
        self.calls.push(SurfaceCall::SetCaret(id.clone(), position));
    }

    fn publish(&mut self, document: &Document) {
        self.calls.push(SurfaceCall::Publish(document.clone()));
    }
}
