//! Task ledger contract logic.
//!
//! The ledger is an ordered sequence of [`Todo`] records addressed by their
//! zero-based index. It exposes one read (`get_todos`) and three mutations
//! (`add_todo`, `mark_as_completed`, `delete_todo`). Every mutation either
//! applies completely or fails and leaves the list untouched.
//!
//! ## Deletion
//!
//! Deleting compacts the sequence: every task above the removed index moves
//! down by one, so indices stay dense and zero-based for every reader.
//! Index references held by clients become stale after any deletion or
//! insertion by another actor; callers must re-read the list.
//!
//! ## Usage
//!
//! ```rust
//! use todoledger::libs::ledger::TodoList;
//!
//! let mut list = TodoList::default();
//! list.add_todo("buy milk")?;
//! list.mark_as_completed(0)?;
//! assert!(list.get_todos()[0].completed);
//! list.delete_todo(0)?;
//! assert!(list.is_empty());
//! # Ok::<(), todoledger::libs::ledger::LedgerError>(())
//! ```

use super::todo::Todo;
use std::fmt;
use thiserror::Error;

/// Failures a ledger mutation can produce.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Task content must not be empty")]
    InvalidInput,

    #[error("Index {index} is out of range for a list of {len} tasks")]
    IndexOutOfRange { index: u64, len: usize },
}

pub const GET_TODOS_SIGNATURE: &str = "getTodos()";
pub const ADD_TODO_SIGNATURE: &str = "addTodo(string)";
pub const MARK_AS_COMPLETED_SIGNATURE: &str = "markAsCompleted(uint256)";
pub const DELETE_TODO_SIGNATURE: &str = "deleteTodo(uint256)";

/// A mutation entry point together with its argument.
///
/// `getTodos()` is a pure read and is not represented here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerCall {
    AddTodo(String),
    MarkAsCompleted(u64),
    DeleteTodo(u64),
}

impl LedgerCall {
    /// Solidity signature of the entry point, as used for the selector.
    pub fn signature(&self) -> &'static str {
        match self {
            LedgerCall::AddTodo(_) => ADD_TODO_SIGNATURE,
            LedgerCall::MarkAsCompleted(_) => MARK_AS_COMPLETED_SIGNATURE,
            LedgerCall::DeleteTodo(_) => DELETE_TODO_SIGNATURE,
        }
    }

    /// Bare method name without the argument list.
    pub fn method(&self) -> &'static str {
        match self {
            LedgerCall::AddTodo(_) => "addTodo",
            LedgerCall::MarkAsCompleted(_) => "markAsCompleted",
            LedgerCall::DeleteTodo(_) => "deleteTodo",
        }
    }

    /// Index targeted by the call, if it addresses an existing task.
    pub fn index(&self) -> Option<u64> {
        match self {
            LedgerCall::AddTodo(_) => None,
            LedgerCall::MarkAsCompleted(index) | LedgerCall::DeleteTodo(index) => Some(*index),
        }
    }
}

impl fmt::Display for LedgerCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerCall::AddTodo(content) => write!(f, "addTodo({:?})", content),
            LedgerCall::MarkAsCompleted(index) => write!(f, "markAsCompleted({})", index),
            LedgerCall::DeleteTodo(index) => write!(f, "deleteTodo({})", index),
        }
    }
}

/// Returns `true` when `content` would be rejected by `add_todo`.
pub fn is_blank(content: &str) -> bool {
    content.trim().is_empty()
}

/// The authoritative task sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoList {
    todos: Vec<Todo>,
}

impl TodoList {
    pub fn from_todos(todos: Vec<Todo>) -> Self {
        TodoList { todos }
    }

    /// Full list in index order.
    pub fn get_todos(&self) -> Vec<Todo> {
        self.todos.clone()
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    /// Appends a task with `completed = false`.
    pub fn add_todo(&mut self, content: &str) -> Result<(), LedgerError> {
        if is_blank(content) {
            return Err(LedgerError::InvalidInput);
        }
        self.todos.push(Todo::new(content));
        Ok(())
    }

    /// Marks the task at `index` as completed. Marking twice is a no-op.
    pub fn mark_as_completed(&mut self, index: u64) -> Result<(), LedgerError> {
        let position = self.position(index)?;
        self.todos[position].completed = true;
        Ok(())
    }

    /// Removes the task at `index`; successors shift down by one.
    pub fn delete_todo(&mut self, index: u64) -> Result<(), LedgerError> {
        let position = self.position(index)?;
        self.todos.remove(position);
        Ok(())
    }

    pub fn apply(&mut self, call: &LedgerCall) -> Result<(), LedgerError> {
        match call {
            LedgerCall::AddTodo(content) => self.add_todo(content),
            LedgerCall::MarkAsCompleted(index) => self.mark_as_completed(*index),
            LedgerCall::DeleteTodo(index) => self.delete_todo(*index),
        }
    }

    /// Checks `call` against the current state without applying it.
    pub fn check(&self, call: &LedgerCall) -> Result<(), LedgerError> {
        match call {
            LedgerCall::AddTodo(content) if is_blank(content) => Err(LedgerError::InvalidInput),
            LedgerCall::AddTodo(_) => Ok(()),
            LedgerCall::MarkAsCompleted(index) | LedgerCall::DeleteTodo(index) => self.position(*index).map(|_| ()),
        }
    }

    fn position(&self, index: u64) -> Result<usize, LedgerError> {
        let len = self.todos.len();
        usize::try_from(index)
            .ok()
            .filter(|position| *position < len)
            .ok_or(LedgerError::IndexOutOfRange { index, len })
    }
}
