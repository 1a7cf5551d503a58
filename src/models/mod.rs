//! Data models for the dashboard's backend resources.
//!
//! This module contains the records the REST API exchanges:
//!
//! - `Goal`: a long-term or short-term goal, split by `GoalType`
//! - `Todo`: a daily todo with a completion flag
//! - `JournalEntry`: the one-line journal, one entry per date
//!
//! Each resource also has its request-body types (`NewGoal`, `TodoPatch`,
//! etc.) matching what the backend serializers accept.

pub mod goal;
pub mod journal;
pub mod todo;

pub use goal::{filter_by_type, Goal, GoalType, NewGoal};
pub use journal::{entry_for, JournalEntry, JournalPatch, NewJournalEntry};
pub use todo::{NewTodo, Todo, TodoPatch};
