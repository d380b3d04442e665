//! # OxiRar Core
//!
//! Core components for the OxiRar archive library.
//!
//! This crate provides the fundamental building blocks for parsing the
//! legacy RAR 4.x container format from an in-memory buffer:
//!
//! - [`cursor`]: bounds-checked little-endian reading with zero-copy views
//! - [`crc`]: CRC-16 (header fields) and CRC-32 (payload) checksums
//! - [`entry`]: format-agnostic archive entry metadata
//! - [`error`]: error types
//!
//! ## Architecture
//!
//! OxiRar is designed as a small layered stack:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L3: Caller                                              │
//! │     entry listing, STORE byte copy, CRC verification    │
//! ├─────────────────────────────────────────────────────────┤
//! │ L2: Container (oxirar-archive)                          │
//! │     signature detection, block walk, file entries       │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: Primitives (this crate)                             │
//! │     ByteCursor, Crc16/Crc32, Entry, errors              │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use oxirar_core::cursor::ByteCursor;
//! use oxirar_core::crc::Crc32;
//!
//! // Read little-endian fields from a buffer
//! let data = [0x34, 0x12, 0xEF, 0xBE, 0xAD, 0xDE];
//! let mut cur = ByteCursor::new(&data);
//! assert_eq!(cur.read_u16().unwrap(), 0x1234);
//! assert_eq!(cur.read_u32().unwrap(), 0xDEADBEEF);
//!
//! // Compute CRC-32
//! assert_eq!(Crc32::compute(b"123456789"), 0xCBF43926);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod crc;
pub mod cursor;
pub mod entry;
pub mod error;

// Re-exports for convenience
pub use crc::{Crc16, Crc32};
pub use cursor::ByteCursor;
pub use entry::{CompressionMethod, Entry, EntryType, FileAttributes};
pub use error::{ErrorKind, OxiRarError, Result};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::crc::{Crc16, Crc32};
    pub use crate::cursor::ByteCursor;
    pub use crate::entry::{CompressionMethod, Entry, EntryType};
    pub use crate::error::{ErrorKind, OxiRarError, Result};
}
