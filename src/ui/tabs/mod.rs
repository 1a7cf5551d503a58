//! Tab-specific content rendering.

pub mod goals;
pub mod history;
pub mod journal;
pub mod todos;
