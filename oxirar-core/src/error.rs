//! Error types for OxiRar operations.
//!
//! A single error enum covers the three fatal conditions the container
//! parser can hit: structural corruption of the byte stream, a newer
//! archive revision than we support, and archives whose headers are
//! encrypted. Every variant that can point at a place in the buffer
//! carries the offending byte offset.

use thiserror::Error;

/// The main error type for OxiRar operations.
#[derive(Debug, Error)]
pub enum OxiRarError {
    /// A read would run past the end of the buffer.
    #[error("buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall {
        /// Number of bytes the read requested.
        needed: usize,
        /// Number of bytes actually remaining.
        available: usize,
    },

    /// Leading bytes match no supported archive signature.
    #[error("invalid signature at offset {offset}: {found:02x?}")]
    InvalidSignature {
        /// Byte offset of the rejected signature (normally 0).
        offset: u64,
        /// The bytes that were found instead.
        found: Vec<u8>,
    },

    /// Structural corruption in the archive.
    #[error("corrupted data at offset {offset}: {message}")]
    CorruptedData {
        /// Byte offset where corruption was detected.
        offset: u64,
        /// Description of the corruption.
        message: String,
    },

    /// A lower-level error raised while decoding one block's body.
    #[error("corrupt block at offset {offset}: {source}")]
    CorruptBlock {
        /// Offset of the block whose body failed to decode.
        offset: u64,
        /// The underlying failure.
        #[source]
        source: Box<OxiRarError>,
    },

    /// The archive uses a newer major revision of the format.
    #[error("unsupported archive version: RAR 5.0 signature at offset {offset}")]
    UnsupportedVersion {
        /// Byte offset of the signature (normally 0).
        offset: u64,
    },

    /// The archive-level headers are encrypted; nothing past the archive
    /// block can be decoded without a password.
    #[error("archive headers are encrypted (archive block at offset {offset})")]
    EncryptedHeaders {
        /// Offset of the archive block carrying the encrypted-headers bit.
        offset: u64,
    },
}

/// Result type alias for OxiRar operations.
pub type Result<T> = std::result::Result<T, OxiRarError>;

/// Coarse classification of an [`OxiRarError`].
///
/// Callers that only need to pick a user-facing message ("corrupt archive",
/// "unsupported version", "password required") can branch on this instead
/// of the full variant set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Structural corruption, truncation, or a bad signature.
    Format,
    /// A newer major revision of the format was detected.
    Version,
    /// The archive headers are encrypted.
    Encrypted,
}

impl OxiRarError {
    /// Create a buffer-underrun error.
    pub fn buffer_too_small(needed: usize, available: usize) -> Self {
        Self::BufferTooSmall { needed, available }
    }

    /// Create an invalid-signature error.
    pub fn invalid_signature(offset: u64, found: impl Into<Vec<u8>>) -> Self {
        Self::InvalidSignature {
            offset,
            found: found.into(),
        }
    }

    /// Create a corrupted-data error.
    pub fn corrupted(offset: u64, message: impl Into<String>) -> Self {
        Self::CorruptedData {
            offset,
            message: message.into(),
        }
    }

    /// Create an unsupported-version error.
    pub fn unsupported_version(offset: u64) -> Self {
        Self::UnsupportedVersion { offset }
    }

    /// Create an encrypted-headers error.
    pub fn encrypted_headers(offset: u64) -> Self {
        Self::EncryptedHeaders { offset }
    }

    /// Attach the enclosing block's offset to an error raised while
    /// decoding the block body.
    ///
    /// Version and encrypted-header errors propagate unchanged, as does an
    /// error that already carries a block offset.
    pub fn in_block(self, offset: u64) -> Self {
        match self {
            e @ (Self::UnsupportedVersion { .. }
            | Self::EncryptedHeaders { .. }
            | Self::CorruptBlock { .. }) => e,
            other => Self::CorruptBlock {
                offset,
                source: Box::new(other),
            },
        }
    }

    /// Classify this error into the three fatal kinds.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedVersion { .. } => ErrorKind::Version,
            Self::EncryptedHeaders { .. } => ErrorKind::Encrypted,
            _ => ErrorKind::Format,
        }
    }

    /// The byte offset this error points at, if it carries one.
    pub fn offset(&self) -> Option<u64> {
        match self {
            Self::BufferTooSmall { .. } => None,
            Self::InvalidSignature { offset, .. }
            | Self::CorruptedData { offset, .. }
            | Self::CorruptBlock { offset, .. }
            | Self::UnsupportedVersion { offset }
            | Self::EncryptedHeaders { offset } => Some(*offset),
        }
    }
}
