//! Comment snapshot types.

use serde::{Deserialize, Serialize};

/// A comment already posted on the change request.
///
/// Only the fields the ledger needs: who wrote it and what it says.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    /// Login of the comment author.
    pub author: String,
    /// Raw comment body (Markdown).
    pub body: String,
}

impl Comment {
    pub fn new(author: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            body: body.into(),
        }
    }
}
