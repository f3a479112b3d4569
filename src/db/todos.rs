use crate::libs::todo::Todo;
use anyhow::Result;
use rusqlite::{params, Connection};

const SELECT_TODOS: &str = "SELECT content, completed FROM todos ORDER BY position";
const INSERT_TODO: &str = "INSERT INTO todos (position, content, completed) VALUES ((SELECT COUNT(*) FROM todos), ?, FALSE)";
const COMPLETE_TODO: &str = "UPDATE todos SET completed = TRUE WHERE position = ?";
const DELETE_TODO: &str = "DELETE FROM todos WHERE position = ?";
const SHIFT_DOWN: &str = "UPDATE todos SET position = position - 1 WHERE position > ?";

/// Row-level access to the persisted task sequence.
///
/// Borrows a connection so callers can run several statements inside one
/// transaction (`rusqlite::Transaction` derefs to `Connection`).
pub struct Todos<'c> {
    conn: &'c Connection,
}

impl<'c> Todos<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Todos { conn }
    }

    pub fn fetch(&self) -> Result<Vec<Todo>> {
        let mut stmt = self.conn.prepare(SELECT_TODOS)?;
        let todo_iter = stmt.query_map([], |row| {
            Ok(Todo {
                content: row.get(0)?,
                completed: row.get(1)?,
            })
        })?;

        let mut todos = Vec::new();
        for todo_result in todo_iter {
            todos.push(todo_result?);
        }
        Ok(todos)
    }

    /// Appends after the last row.
    pub fn insert(&self, content: &str) -> Result<()> {
        self.conn.execute(INSERT_TODO, params![content])?;
        Ok(())
    }

    /// Returns the number of rows touched (0 when `position` is unused).
    pub fn complete(&self, position: u64) -> Result<usize> {
        Ok(self.conn.execute(COMPLETE_TODO, params![to_sql_position(position)?])?)
    }

    /// Removes the row at `position` and closes the gap.
    pub fn delete(&self, position: u64) -> Result<usize> {
        let position = to_sql_position(position)?;
        let deleted = self.conn.execute(DELETE_TODO, params![position])?;
        if deleted > 0 {
            self.conn.execute(SHIFT_DOWN, params![position])?;
        }
        Ok(deleted)
    }
}

fn to_sql_position(position: u64) -> Result<i64> {
    Ok(i64::try_from(position)?)
}
