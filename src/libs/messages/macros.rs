//! Convenience macros for message logging.
//!
//! Every macro takes a [`Message`](super::Message) (or anything `Display`)
//! and emits a `tracing` event at the matching level with an emoji prefix.
//! The library never writes to stdout or stderr itself; formatting and
//! filtering belong to the subscriber, for example the one installed by
//! [`logging::init`](crate::libs::logging::init).
//!
//! `msg_error_anyhow!` and `msg_bail_anyhow!` build `anyhow` errors from
//! messages.
//!
//! ```rust,ignore
//! use todoledger::libs::messages::Message;
//! use todoledger::{msg_error, msg_info};
//!
//! msg_info!(Message::WalletConnecting);
//! msg_error!(Message::WalletAccessDenied);
//! ```

#[macro_export]
macro_rules! msg_success {
    ($msg:expr) => {
        tracing::info!("✅ {}", $msg)
    };
}

#[macro_export]
macro_rules! msg_error {
    ($msg:expr) => {
        tracing::error!("❌ {}", $msg)
    };
}

#[macro_export]
macro_rules! msg_warning {
    ($msg:expr) => {
        tracing::warn!("⚠️ {}", $msg)
    };
}

#[macro_export]
macro_rules! msg_info {
    ($msg:expr) => {
        tracing::info!("ℹ️ {}", $msg)
    };
}

#[macro_export]
macro_rules! msg_debug {
    ($msg:expr) => {
        tracing::debug!("🔍 {}", $msg)
    };
}

#[macro_export]
macro_rules! msg_error_anyhow {
    ($msg:expr) => {
        anyhow::anyhow!("❌ {}", $msg)
    };
}

#[macro_export]
macro_rules! msg_bail_anyhow {
    ($msg:expr) => {
        anyhow::bail!("❌ {}", $msg)
    };
}
