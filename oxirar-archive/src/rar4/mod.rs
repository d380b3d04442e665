//! RAR 4.x container parsing.
//!
//! [`Rar4Archive`] walks an in-memory archive buffer block by block:
//! signature check, one forward linear scan, then immutable accessors over
//! the collected state. Each block's declared header size, not the body
//! parser's read cursor, drives the walk, so unrecognized or
//! partially-understood blocks are skipped without desynchronizing.
//!
//! Only stored (method 0x30) payloads can be extracted; the parser
//! classifies everything else so callers can report it. Extraction itself
//! stays with the caller: copy `data_offset .. data_offset + packed_size`
//! and verify against `file_crc`.

pub mod block;
pub mod entry;
pub mod filename;

pub use block::{
    ArchiveBlock, Block, BlockHeader, EndArchiveBlock, FileBlock, HostOs,
};
pub use entry::FileEntry;

use oxirar_core::cursor::ByteCursor;
use oxirar_core::error::{OxiRarError, Result};

use crate::detect::{ArchiveFormat, RAR4_MAGIC};

/// A RAR 4.x archive parser over a borrowed byte buffer.
///
/// Construction validates the signature; [`parse`](Self::parse) runs the
/// block scan exactly once. All views handed out (names, salts, payload
/// offsets) refer to the borrowed buffer.
///
/// # Example
///
/// ```
/// use oxirar_archive::rar4::Rar4Archive;
///
/// // Signature plus a bare end-of-archive block
/// let mut data = vec![0x52, 0x61, 0x72, 0x21, 0x1A, 0x07, 0x00];
/// data.extend_from_slice(&[0x00, 0x00, 0x7B, 0x00, 0x00, 0x07, 0x00]);
///
/// let archive = Rar4Archive::open(&data).unwrap();
/// assert!(archive.files().is_empty());
/// assert!(archive.end_header().is_some());
/// ```
#[derive(Debug)]
pub struct Rar4Archive<'a> {
    data: &'a [u8],
    parsed: bool,
    archive: Option<ArchiveBlock>,
    end: Option<EndArchiveBlock>,
    files: Vec<FileEntry<'a>>,
}

impl<'a> Rar4Archive<'a> {
    /// Validate the signature and prepare a parser.
    ///
    /// # Errors
    ///
    /// - buffers under 7 bytes fail as too small
    /// - a RAR 5.0 signature fails with a version error, unconditionally
    /// - any other leading bytes fail as an invalid signature
    pub fn new(data: &'a [u8]) -> Result<Self> {
        if data.len() < RAR4_MAGIC.len() {
            return Err(OxiRarError::buffer_too_small(RAR4_MAGIC.len(), data.len()));
        }
        match ArchiveFormat::from_magic(data) {
            ArchiveFormat::Rar5 => Err(OxiRarError::unsupported_version(0)),
            ArchiveFormat::Rar4 => Ok(Self {
                data,
                parsed: false,
                archive: None,
                end: None,
                files: Vec::new(),
            }),
            ArchiveFormat::Unknown => Err(OxiRarError::invalid_signature(
                0,
                data[..RAR4_MAGIC.len()].to_vec(),
            )),
        }
    }

    /// Validate the signature and run the scan in one step.
    pub fn open(data: &'a [u8]) -> Result<Self> {
        let mut archive = Self::new(data)?;
        archive.parse()?;
        Ok(archive)
    }

    /// Walk the archive's blocks. Idempotent: a second call is a no-op.
    ///
    /// The scan stops at the end-of-archive block or when the buffer is
    /// exhausted, whichever comes first.
    pub fn parse(&mut self) -> Result<()> {
        if self.parsed {
            return Ok(());
        }
        self.parsed = true;

        let mut cur = ByteCursor::new(self.data);
        cur.seek(RAR4_MAGIC.len())?;

        while cur.remaining() > 0 {
            let block_start = cur.position() as u64;

            if cur.remaining() < BlockHeader::SIZE {
                return Err(OxiRarError::corrupted(
                    block_start,
                    format!(
                        "truncated block header: {} bytes remain, need {}",
                        cur.remaining(),
                        BlockHeader::SIZE
                    ),
                ));
            }
            let header = BlockHeader::read(&mut cur)?;
            if (header.header_size as usize) < BlockHeader::SIZE {
                return Err(OxiRarError::corrupted(
                    block_start,
                    format!("declared header size {} below minimum", header.header_size),
                ));
            }

            let mut add_size: u64 = 0;
            if header.has_add_size() {
                add_size = cur
                    .read_u32()
                    .map_err(|e| e.in_block(block_start))? as u64;
            }

            let consumed = cur.position() as u64 - block_start;
            if (header.header_size as u64) < consumed {
                return Err(OxiRarError::corrupted(
                    block_start,
                    format!(
                        "declared header size {} too small for its own fields",
                        header.header_size
                    ),
                ));
            }
            let mut body = cur
                .sub_reader((header.header_size as u64 - consumed) as usize)
                .map_err(|e| e.in_block(block_start))?;

            let data_offset = block_start + header.header_size as u64;
            let block = Block::parse(header, &mut body, data_offset)
                .map_err(|e| e.in_block(block_start))?;

            match block {
                Block::Archive(archive) => {
                    if archive.has_encrypted_headers() {
                        return Err(OxiRarError::encrypted_headers(block_start));
                    }
                    // Archive-level singleton: the first one wins.
                    if self.archive.is_none() {
                        self.archive = Some(archive);
                    }
                }
                Block::File(file) => {
                    // A file block's trailing data is its packed payload.
                    add_size = file.packed_size;
                    if !file.is_directory() {
                        self.files.push(FileEntry::new(file));
                    }
                }
                Block::EndArchive(end) => {
                    self.end = Some(end);
                    return Ok(());
                }
                Block::Marker(_) | Block::Unknown(_) => {}
            }

            let next = block_start + header.header_size as u64 + add_size;
            if next > self.data.len() as u64 {
                return Err(OxiRarError::corrupted(
                    block_start,
                    format!(
                        "block extends past end of buffer: next offset {}, buffer {} bytes",
                        next,
                        self.data.len()
                    ),
                ));
            }
            cur.seek(next as usize)?;
        }
        Ok(())
    }

    /// The archive header block, if one was seen.
    pub fn archive_header(&self) -> Option<&ArchiveBlock> {
        self.archive.as_ref()
    }

    /// The end-of-archive block, if the scan reached one.
    pub fn end_header(&self) -> Option<&EndArchiveBlock> {
        self.end.as_ref()
    }

    /// All non-directory file entries, in archive order.
    pub fn files(&self) -> &[FileEntry<'a>] {
        &self.files
    }

    /// Entries extractable by a plain byte copy.
    pub fn extractable_files(&self) -> Vec<&FileEntry<'a>> {
        self.files.iter().filter(|f| f.can_extract()).collect()
    }

    /// Entries using a compressed method this crate cannot decode.
    pub fn unsupported_files(&self) -> Vec<&FileEntry<'a>> {
        self.files
            .iter()
            .filter(|f| f.has_unsupported_compression())
            .collect()
    }

    /// Entries with encrypted data.
    pub fn encrypted_files(&self) -> Vec<&FileEntry<'a>> {
        self.files.iter().filter(|f| f.is_encrypted()).collect()
    }

    /// Whether the archive is solid.
    pub fn is_solid(&self) -> bool {
        self.archive.as_ref().is_some_and(ArchiveBlock::is_solid)
    }

    /// Whether the archive is part of a multi-volume set.
    pub fn is_multi_volume(&self) -> bool {
        self.archive.as_ref().is_some_and(ArchiveBlock::is_volume)
    }
}
