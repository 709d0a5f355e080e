//! Error types.
//!
//! Two families live here. [`BindError`] is a contract violation by whoever
//! drives a slot (always a hard failure of the current operation).
//! [`StreamError`] is the payload of an observable's `error` signal and is
//! only ever reported, never propagated up the mount tree.

use thiserror::Error;

pub type BindResult<T> = Result<T, BindError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    /// Multi-slot children must be inserted in order, one past the end.
    #[error("Must insert elements in order: index {index} but current length is {len}")]
    OutOfOrderInsert { index: usize, len: usize },

    #[error("Index {index} out of bounds for multi-slot of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Element tracked at index {index} is not the element being removed")]
    ElementMismatch { index: usize },

    #[error("Multi-slot anchor has already been removed")]
    Detached,
}

impl BindError {
    pub fn out_of_order(index: usize, len: usize) -> Self {
        Self::OutOfOrderInsert { index, len }
    }

    pub fn out_of_bounds(index: usize, len: usize) -> Self {
        Self::IndexOutOfBounds { index, len }
    }
}

/// Error value carried by [`Listener::error`](crate::observable::Listener::error).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct StreamError {
    message: String,
}

impl StreamError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<&str> for StreamError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for StreamError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid render options: {0}")]
    InvalidJson(#[from] serde_json::Error),
}
