//! # OxiRar Archive
//!
//! RAR 4.x container parsing for OxiRar.
//!
//! This crate decodes the legacy (pre-2013) revision of the RAR container
//! directly from an in-memory byte buffer, with no decompression library:
//!
//! - **Signature detection**: RAR 4.x accepted; RAR 5.0 detected and
//!   rejected with a version error
//! - **Block walk**: one forward linear scan, framed by each block's
//!   declared header size
//! - **File entries**: normalized paths, the bit-packed unicode name
//!   encoding, 64-bit sizes, extraction-eligibility classification
//!
//! Stored (uncompressed) entries are the only extractable kind; the crate
//! reports `data_offset`/`packed_size`/`file_crc` and the caller performs
//! the byte copy. Compressed methods are detected and classified, never
//! decoded. Encrypted archive headers are a hard failure.
//!
//! ## Example
//!
//! ```rust
//! use oxirar_archive::rar4::Rar4Archive;
//!
//! // Signature plus a bare end-of-archive block
//! let mut data = vec![0x52, 0x61, 0x72, 0x21, 0x1A, 0x07, 0x00];
//! data.extend_from_slice(&[0x00, 0x00, 0x7B, 0x00, 0x00, 0x07, 0x00]);
//!
//! let archive = Rar4Archive::open(&data).unwrap();
//! for entry in archive.extractable_files() {
//!     let start = entry.data_offset() as usize;
//!     let payload = &data[start..start + entry.packed_size() as usize];
//!     // verify payload against entry.file_crc(), write it out, ...
//!     let _ = payload;
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod detect;
pub mod rar4;

// Re-exports
pub use detect::ArchiveFormat;
pub use rar4::{
    ArchiveBlock, Block, BlockHeader, EndArchiveBlock, FileBlock, FileEntry, HostOs,
    Rar4Archive,
};
