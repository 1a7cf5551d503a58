//! Session and credential management.
//!
//! This module provides:
//! - `SessionStore`: the session state machine (login, signup, logout)
//! - `CredentialStorage`: durable on-disk storage for the token pair and
//!   the serialized identity
//!
//! Sessions persist across restarts; tokens are never refreshed, so an
//! expired token shows up as a rejected request on the next API call.

pub mod session;
pub mod storage;

pub use session::{SessionStore, TokenPair};
pub use storage::CredentialStorage;
