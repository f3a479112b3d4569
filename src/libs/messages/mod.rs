//! User-facing messages and the macros that emit them.

pub mod display;
pub mod macros;
pub mod types;

pub use types::Message;
