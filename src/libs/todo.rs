use serde::{Deserialize, Serialize};

/// A single task as stored on the ledger.
///
/// Tasks carry no identifier of their own: their position in the ledger's
/// sequence is the only handle used to address them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub content: String,
    pub completed: bool,
}

impl Todo {
    pub fn new(content: &str) -> Self {
        Todo {
            content: content.to_string(),
            completed: false,
        }
    }
}
