//! Error Types
//!
//! The main error type [`SandboxError`] covers the failure modes of the
//! scene runtime: malformed persisted data and asset decoding problems.
//!
//! Lookups that can simply miss (object by id or name, component by id,
//! asset by id) return `Option` instead of an error — callers are expected
//! to check before dereferencing.

use thiserror::Error;

/// The main error type for the sandbox scene runtime.
#[derive(Error, Debug)]
pub enum SandboxError {
    // ========================================================================
    // Persisted Scene Errors
    // ========================================================================
    /// The scene file is not a JSON object at the top level.
    #[error("Scene file is not a JSON object")]
    NotAnObject,

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    // ========================================================================
    // Asset Errors
    // ========================================================================
    /// Base64 decoding error in a persisted asset blob.
    #[error("Base64 decode error: {0}")]
    Base64Error(#[from] base64::DecodeError),

    /// A persisted asset blob had an unknown tag or was truncated.
    #[error("Malformed asset blob for id {id}")]
    MalformedAsset {
        /// The id under which the blob was stored
        id: u64,
    },
}

/// Alias for `Result<T, SandboxError>`.
pub type Result<T> = std::result::Result<T, SandboxError>;
