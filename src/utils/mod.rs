//! Formatting helpers shared by the UI.

pub mod format;

pub use format::{format_date, format_date_long, truncate_string};
