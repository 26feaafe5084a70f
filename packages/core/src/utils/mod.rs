//! Utility functions for Blockdoc Core

pub mod markdown;

pub use markdown::{from_markdown, to_markdown};
