//! Error types for the laptop catalog.

/// Main error type for the crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A record with the same identifier is already present in a store.
    #[error("record already exists")]
    AlreadyExists,

    /// The operation was canceled before it completed.
    #[error("operation was canceled")]
    Canceled,

    /// An access token could not be issued or verified.
    #[error("invalid access token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    /// A password could not be hashed or checked.
    #[error("cannot process password: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    /// An underlying file operation failed.
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),

    /// A protobuf payload could not be decoded.
    #[error("cannot decode protobuf message: {0}")]
    Decode(#[from] prost::DecodeError),

    /// A message could not be rendered as JSON.
    #[error("cannot encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
