//! Shared types used across all modules.
//!
//! This module defines the core data structures for changed files, trigger
//! events, session identity, and comments. Other modules import from here
//! rather than reaching into each other's internals.

pub mod change;
pub mod comment;
pub mod event;

pub use change::{ChangeKind, ChangedFile};
pub use comment::Comment;
pub use event::{Action, RequestRef, SessionIdentity, TriggerEvent};
