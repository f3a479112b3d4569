//! Contract ABI codec for the four ledger entry points.
//!
//! Calldata is the 4-byte selector (first bytes of the Keccak-256 hash of the
//! Solidity signature) followed by 32-byte words:
//!
//! ```text
//! getTodos()                 c33926cb
//! addTodo(string)            95ffebf5  offset, length, utf-8 bytes padded to 32
//! markAsCompleted(uint256)   c0a6026c  index
//! deleteTodo(uint256)        6e3c6738  index
//! ```
//!
//! `getTodos()` returns `(string content, bool completed)[]`: an offset to
//! the array, its length, one offset per element (relative to the first
//! element slot), then each tuple as `offset-to-string, bool, string`.

use crate::libs::ledger::{LedgerCall, ADD_TODO_SIGNATURE, DELETE_TODO_SIGNATURE, GET_TODOS_SIGNATURE, MARK_AS_COMPLETED_SIGNATURE};
use crate::libs::todo::Todo;
use sha3::{Digest, Keccak256};
use thiserror::Error;

pub const WORD: usize = 32;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AbiError {
    #[error("data truncated: need {needed} bytes, have {available}")]
    Truncated { needed: usize, available: usize },

    #[error("value at byte {0} does not fit in 64 bits")]
    Overflow(usize),

    #[error("invalid boolean at byte {0}")]
    InvalidBool(usize),

    #[error("string is not valid utf-8")]
    InvalidUtf8,

    #[error("unknown selector 0x{0}")]
    UnknownSelector(String),

    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

/// First four bytes of the Keccak-256 hash of a Solidity signature.
pub fn function_selector(signature: &str) -> [u8; 4] {
    let hash = Keccak256::digest(signature.as_bytes());
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&hash[..4]);
    selector
}

pub fn encode_get_todos() -> Vec<u8> {
    function_selector(GET_TODOS_SIGNATURE).to_vec()
}

/// Builds the calldata for a mutation.
pub fn encode_call(call: &LedgerCall) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + 4 * WORD);
    data.extend_from_slice(&function_selector(call.signature()));
    match call {
        LedgerCall::AddTodo(content) => {
            data.extend_from_slice(&uint_word(WORD as u64));
            encode_bytes(&mut data, content.as_bytes());
        }
        LedgerCall::MarkAsCompleted(index) | LedgerCall::DeleteTodo(index) => {
            data.extend_from_slice(&uint_word(*index));
        }
    }
    data
}

/// Parses mutation calldata back into a [`LedgerCall`].
pub fn decode_call(data: &[u8]) -> Result<LedgerCall, AbiError> {
    let selector = slice(data, 0, 4)?;
    let args = &data[4..];
    if selector == function_selector(ADD_TODO_SIGNATURE) {
        let offset = read_usize(args, 0)?;
        Ok(LedgerCall::AddTodo(read_string(args, offset)?))
    } else if selector == function_selector(MARK_AS_COMPLETED_SIGNATURE) {
        Ok(LedgerCall::MarkAsCompleted(read_u64(args, 0)?))
    } else if selector == function_selector(DELETE_TODO_SIGNATURE) {
        Ok(LedgerCall::DeleteTodo(read_u64(args, 0)?))
    } else {
        Err(AbiError::UnknownSelector(hex::encode(selector)))
    }
}

/// Encodes a `getTodos()` return value.
pub fn encode_todos(todos: &[Todo]) -> Vec<u8> {
    let mut head = Vec::with_capacity(todos.len() * WORD);
    let mut tail = Vec::new();
    let mut offset = (todos.len() * WORD) as u64;

    for todo in todos {
        head.extend_from_slice(&uint_word(offset));
        let mut tuple = Vec::new();
        tuple.extend_from_slice(&uint_word(2 * WORD as u64));
        tuple.extend_from_slice(&uint_word(todo.completed as u64));
        encode_bytes(&mut tuple, todo.content.as_bytes());
        offset += tuple.len() as u64;
        tail.extend(tuple);
    }

    let mut data = Vec::with_capacity(2 * WORD + head.len() + tail.len());
    data.extend_from_slice(&uint_word(WORD as u64));
    data.extend_from_slice(&uint_word(todos.len() as u64));
    data.extend(head);
    data.extend(tail);
    data
}

/// Decodes a `getTodos()` return value.
pub fn decode_todos(data: &[u8]) -> Result<Vec<Todo>, AbiError> {
    let array = read_usize(data, 0)?;
    let len = read_usize(data, array)?;
    let base = array + WORD;

    // Each element needs at least its offset slot; reject lengths the data cannot hold.
    slice(data, base, len.saturating_mul(WORD))?;

    let mut todos = Vec::with_capacity(len);
    for i in 0..len {
        let tuple = offset_from(base, read_usize(data, base + i * WORD)?)?;
        let content_offset = read_usize(data, tuple)?;
        let completed = read_bool(data, tuple + WORD)?;
        let content = read_string(data, offset_from(tuple, content_offset)?)?;
        todos.push(Todo { content, completed });
    }
    Ok(todos)
}

/// Lowercase hex with a `0x` prefix.
pub fn encode_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Accepts hex with or without the `0x` prefix, in either case.
pub fn decode_hex(value: &str) -> Result<Vec<u8>, AbiError> {
    let digits = value.strip_prefix("0x").unwrap_or(value);
    hex::decode(digits).map_err(|e| AbiError::InvalidHex(format!("{}: {}", value, e)))
}

/// Parses a JSON-RPC quantity such as `0x1b4`.
pub fn parse_quantity(value: &str) -> Result<u64, AbiError> {
    let digits = value.strip_prefix("0x").unwrap_or(value);
    if digits.is_empty() {
        return Ok(0);
    }
    u64::from_str_radix(digits, 16).map_err(|_| AbiError::InvalidHex(value.to_string()))
}

pub fn format_quantity(value: u64) -> String {
    format!("{:#x}", value)
}

fn uint_word(value: u64) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[WORD - 8..].copy_from_slice(&value.to_be_bytes());
    word
}

fn encode_bytes(out: &mut Vec<u8>, bytes: &[u8]) {
    out.extend_from_slice(&uint_word(bytes.len() as u64));
    out.extend_from_slice(bytes);
    let padding = (WORD - bytes.len() % WORD) % WORD;
    out.resize(out.len() + padding, 0);
}

fn slice(data: &[u8], start: usize, len: usize) -> Result<&[u8], AbiError> {
    let end = start.checked_add(len).ok_or(AbiError::Overflow(start))?;
    data.get(start..end).ok_or(AbiError::Truncated {
        needed: end,
        available: data.len(),
    })
}

fn offset_from(base: usize, offset: usize) -> Result<usize, AbiError> {
    base.checked_add(offset).ok_or(AbiError::Overflow(base))
}

fn read_u64(data: &[u8], at: usize) -> Result<u64, AbiError> {
    let word = slice(data, at, WORD)?;
    if word[..WORD - 8].iter().any(|b| *b != 0) {
        return Err(AbiError::Overflow(at));
    }
    let mut tail = [0u8; 8];
    tail.copy_from_slice(&word[WORD - 8..]);
    Ok(u64::from_be_bytes(tail))
}

fn read_usize(data: &[u8], at: usize) -> Result<usize, AbiError> {
    usize::try_from(read_u64(data, at)?).map_err(|_| AbiError::Overflow(at))
}

fn read_bool(data: &[u8], at: usize) -> Result<bool, AbiError> {
    match read_u64(data, at)? {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(AbiError::InvalidBool(at)),
    }
}

fn read_string(data: &[u8], at: usize) -> Result<String, AbiError> {
    let len = read_usize(data, at)?;
    let bytes = slice(data, at + WORD, len)?;
    String::from_utf8(bytes.to_vec()).map_err(|_| AbiError::InvalidUtf8)
}
