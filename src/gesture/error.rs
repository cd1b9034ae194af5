//! Engine errors

use thiserror::Error;

use super::types::Mode;

/// Fatal errors surfaced to the caller
///
/// Per-event anomalies (orphaned touches, unknown keys, dropped broadcasts)
/// are absorbed by the engine and never show up here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GestureError {
    #[error("container cannot be undefined in {mode} mode")]
    MissingContainer { mode: Mode },

    #[error("hook cannot be undefined in fake mode")]
    MissingHook,

    #[error("a handler is already registered; call off() first")]
    HandlerAlreadyRegistered,
}

/// Reasons a global re-broadcast was dropped
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BroadcastError {
    #[error("broadcast channel is full")]
    Full,

    #[error("broadcast channel has no receiver")]
    Disconnected,
}
