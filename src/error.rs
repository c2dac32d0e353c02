// src/error.rs

//! Error types for sprite-core.
//!
//! Failures fall into two families: validation errors, raised before any
//! native call is made when the caller hands us malformed input, and backend
//! errors, raised immediately after the native library reports a failure
//! sentinel (a null handle or a negative status). Backend errors capture the
//! library's last-error text at the moment of failure.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The caller supplied input this operation cannot accept.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// A flat primitive batch whose length is not a multiple of the
    /// per-primitive arity (2 for points, 4 for lines).
    #[error("primitive batch of length {len} is not a multiple of {arity}")]
    InvalidBatch { len: usize, arity: usize },

    /// A required argument was neither passed nor available as a default.
    #[error("missing required argument `{0}`")]
    MissingArgument(&'static str),

    /// The native library reported a failure for an otherwise well-formed
    /// call. `message` is the library's last-error text.
    #[error("{call} failed: {message}")]
    Sdl {
        call: &'static str,
        message: String,
    },

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Builds a backend error for `call`, snapshotting the native library's
    /// last-error text. Call this immediately after detecting a failure
    /// sentinel, before any other native call can overwrite the message.
    pub fn sdl(call: &'static str) -> Self {
        Error::Sdl {
            call,
            message: crate::video::last_error(),
        }
    }

    /// True for errors raised by input validation, before any native call.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::InvalidInput(_)
                | Error::InvalidBatch { .. }
                | Error::MissingArgument(_)
                | Error::Config(_)
        )
    }

    /// True for errors reported by the native library.
    pub fn is_backend(&self) -> bool {
        matches!(self, Error::Sdl { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
