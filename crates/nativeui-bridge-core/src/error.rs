//! Error types for the native UI bridge.

use thiserror::Error;

/// The main error type for bridge operations.
///
/// Failures are always local to the call that produced them. Nothing in the
/// bridge aborts the host process.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// A structural precondition did not hold (no active page, the parent
    /// widget was dropped, and similar).
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Work could not be run on the UI context.
    #[error("UI dispatch failed: {0}")]
    Dispatch(#[from] DispatchError),

    /// The named widget property does not exist on this widget.
    #[error("unknown property '{0}'")]
    UnknownProperty(String),

    /// The named property is write-only.
    #[error("property '{0}' cannot be read")]
    PropertyNotReadable(String),

    /// The named property is read-only.
    #[error("property '{0}' cannot be written")]
    PropertyNotWritable(String),

    /// The bridge configuration is malformed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl BridgeError {
    /// Create an invalid-state error.
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }
}

/// Errors raised by the UI-affine dispatch context.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchError {
    /// The UI context has shut down and no longer accepts work.
    #[error("UI context has stopped")]
    Stopped,

    /// The submitted work panicked while running on the UI thread.
    #[error("work panicked on the UI thread")]
    WorkPanicked,
}

/// A specialized Result type for bridge operations.
pub type Result<T> = std::result::Result<T, BridgeError>;
