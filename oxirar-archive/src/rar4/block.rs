//! RAR 4.x block structures.
//!
//! Every unit of the container is a block: a 7-byte common header (CRC-16,
//! type, flags, header size), an optional 4-byte ADD_SIZE field, and a
//! type-specific body bounded by the declared header size. The block
//! hierarchy is a tagged union: dispatch is a single branch on the type
//! byte, and unrecognized types degrade to [`Block::Unknown`] so newer
//! archives can still be walked.

use oxirar_core::cursor::ByteCursor;
use oxirar_core::entry::CompressionMethod;
use oxirar_core::error::Result;
use std::time::SystemTime;

use super::filename;

/// Block type: marker (the signature itself parses as one).
pub const BLOCK_MARKER: u8 = 0x72;
/// Block type: archive header.
pub const BLOCK_ARCHIVE: u8 = 0x73;
/// Block type: file header.
pub const BLOCK_FILE: u8 = 0x74;
/// Block type: end of archive.
pub const BLOCK_END_ARCHIVE: u8 = 0x7B;

/// Generic flag: a 4-byte ADD_SIZE field follows the common header.
///
/// File blocks never carry this field; their packed size *is* the length
/// of the data trailing the header.
pub const FLAG_LONG_BLOCK: u16 = 0x8000;

/// Archive flag: part of a multi-volume set.
pub const ARCH_VOLUME: u16 = 0x0001;
/// Archive flag: an archive comment is present.
pub const ARCH_COMMENT: u16 = 0x0002;
/// Archive flag: the archive is locked against modification.
pub const ARCH_LOCK: u16 = 0x0004;
/// Archive flag: entries share one compression context.
pub const ARCH_SOLID: u16 = 0x0008;
/// Archive flag: volumes use the `.partN.rar` naming scheme.
pub const ARCH_NEW_NAMING: u16 = 0x0010;
/// Archive flag: authenticity information is present.
pub const ARCH_AUTH_INFO: u16 = 0x0020;
/// Archive flag: a recovery record is present.
pub const ARCH_RECOVERY: u16 = 0x0040;
/// Archive flag: block headers are encrypted.
pub const ARCH_ENCRYPTED_HEADERS: u16 = 0x0080;
/// Archive flag: first volume of a set.
pub const ARCH_FIRST_VOLUME: u16 = 0x0100;

/// File flag: the entry continues from the previous volume.
pub const FILE_SPLIT_BEFORE: u16 = 0x0001;
/// File flag: the entry continues in the next volume.
pub const FILE_SPLIT_AFTER: u16 = 0x0002;
/// File flag: the entry's data is encrypted.
pub const FILE_ENCRYPTED: u16 = 0x0004;
/// File flag: a file comment is present.
pub const FILE_COMMENT: u16 = 0x0008;
/// File flag: the entry is solid (uses the previous entries' context).
pub const FILE_SOLID: u16 = 0x0010;
/// Dictionary-size subfield (3 bits). All bits set marks a directory.
pub const FILE_DICT_MASK: u16 = 0x00E0;
/// File flag: 64-bit sizes; high halves follow the fixed fields.
pub const FILE_LARGE: u16 = 0x0100;
/// File flag: the name field carries the bit-packed unicode encoding.
pub const FILE_UNICODE: u16 = 0x0200;
/// File flag: an 8-byte encryption salt follows the name.
pub const FILE_SALT: u16 = 0x0400;
/// File flag: extended time fields fill the rest of the header.
pub const FILE_EXT_TIME: u16 = 0x1000;

/// End flag: another volume follows this one.
pub const END_NEXT_VOLUME: u16 = 0x0001;
/// End flag: an archive data CRC is present.
pub const END_DATA_CRC: u16 = 0x0002;

/// Compression method byte: store (no compression).
pub const METHOD_STORE: u8 = 0x30;
/// Compression method byte: best compression.
pub const METHOD_BEST: u8 = 0x35;

/// The 7-byte header every block starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    /// CRC-16 of the header bytes following this field.
    ///
    /// Not validated during parsing; callers wanting strict verification
    /// can recompute it with [`oxirar_core::crc::Crc16`].
    pub header_crc: u16,
    /// Block type byte.
    pub block_type: u8,
    /// Block flags. Interpretation depends on the block type.
    pub flags: u16,
    /// Declared size of the full header, this field included.
    pub header_size: u16,
}

impl BlockHeader {
    /// Size of the common header in bytes.
    pub const SIZE: usize = 7;

    /// Read the common header fields.
    pub fn read(cur: &mut ByteCursor<'_>) -> Result<Self> {
        let header_crc = cur.read_u16()?;
        let block_type = cur.read_u8()?;
        let flags = cur.read_u16()?;
        let header_size = cur.read_u16()?;
        Ok(Self {
            header_crc,
            block_type,
            flags,
            header_size,
        })
    }

    /// Whether a generic ADD_SIZE field follows this header.
    pub fn has_add_size(&self) -> bool {
        self.flags & FLAG_LONG_BLOCK != 0 && self.block_type != BLOCK_FILE
    }
}

/// Host operating system an entry was archived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOs {
    /// MS-DOS.
    MsDos,
    /// OS/2.
    Os2,
    /// Windows.
    Win32,
    /// Unix.
    Unix,
    /// Classic Mac OS.
    MacOs,
    /// BeOS.
    BeOs,
    /// Unrecognized host byte.
    Unknown(u8),
}

impl HostOs {
    /// Parse the host OS from its raw byte.
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::MsDos,
            1 => Self::Os2,
            2 => Self::Win32,
            3 => Self::Unix,
            4 => Self::MacOs,
            5 => Self::BeOs,
            other => Self::Unknown(other),
        }
    }

    /// Whether attributes from this host are Unix mode bits.
    pub fn is_unix(&self) -> bool {
        matches!(self, Self::Unix | Self::BeOs)
    }
}

impl std::fmt::Display for HostOs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MsDos => write!(f, "MS-DOS"),
            Self::Os2 => write!(f, "OS/2"),
            Self::Win32 => write!(f, "Windows"),
            Self::Unix => write!(f, "Unix"),
            Self::MacOs => write!(f, "Mac OS"),
            Self::BeOs => write!(f, "BeOS"),
            Self::Unknown(raw) => write!(f, "Unknown({})", raw),
        }
    }
}

/// The archive-level header block.
///
/// All archive-wide capabilities live in single bits of the block's own
/// flags field; there is no separate archive-flags field.
#[derive(Debug, Clone)]
pub struct ArchiveBlock {
    /// The common header.
    pub header: BlockHeader,
    /// Reserved field (2 bytes), zero when the header omits it.
    pub reserved1: u16,
    /// Reserved field (4 bytes), zero when the header omits it.
    pub reserved2: u32,
}

impl ArchiveBlock {
    /// Parse the archive block body.
    ///
    /// The reserved fields are read only when the declared header size
    /// leaves room for them.
    pub fn parse(header: BlockHeader, body: &mut ByteCursor<'_>) -> Result<Self> {
        let (reserved1, reserved2) = if body.remaining() >= 6 {
            (body.read_u16()?, body.read_u32()?)
        } else {
            (0, 0)
        };
        Ok(Self {
            header,
            reserved1,
            reserved2,
        })
    }

    /// Part of a multi-volume set.
    pub fn is_volume(&self) -> bool {
        self.header.flags & ARCH_VOLUME != 0
    }

    /// An archive comment is present.
    pub fn has_comment(&self) -> bool {
        self.header.flags & ARCH_COMMENT != 0
    }

    /// The archive is locked.
    pub fn is_locked(&self) -> bool {
        self.header.flags & ARCH_LOCK != 0
    }

    /// Entries share one compression context.
    pub fn is_solid(&self) -> bool {
        self.header.flags & ARCH_SOLID != 0
    }

    /// Volumes use the newer naming scheme.
    pub fn uses_new_naming(&self) -> bool {
        self.header.flags & ARCH_NEW_NAMING != 0
    }

    /// Authenticity information is present.
    pub fn has_auth_info(&self) -> bool {
        self.header.flags & ARCH_AUTH_INFO != 0
    }

    /// A recovery record is present.
    pub fn has_recovery(&self) -> bool {
        self.header.flags & ARCH_RECOVERY != 0
    }

    /// Block headers are encrypted; nothing past this block is readable.
    pub fn has_encrypted_headers(&self) -> bool {
        self.header.flags & ARCH_ENCRYPTED_HEADERS != 0
    }

    /// First volume of a set.
    pub fn is_first_volume(&self) -> bool {
        self.header.flags & ARCH_FIRST_VOLUME != 0
    }
}

/// A file header block.
///
/// Raw byte views (`name_bytes`, `salt`, `ext_time`) borrow from the
/// archive buffer and share its lifetime.
#[derive(Debug, Clone)]
pub struct FileBlock<'a> {
    /// The common header.
    pub header: BlockHeader,
    /// Size of the entry's data as stored, 64-bit.
    pub packed_size: u64,
    /// Uncompressed size, 64-bit.
    pub unpacked_size: u64,
    /// Raw host OS byte.
    pub host_os: u8,
    /// CRC-32 of the uncompressed data.
    pub file_crc: u32,
    /// Packed DOS timestamp (date in the high word, time in the low).
    pub file_time: u32,
    /// Minimum extractor version, tens digit = major.
    pub unpack_version: u8,
    /// Raw compression method byte (0x30 store … 0x35 best).
    pub method: u8,
    /// Host-dependent file attributes.
    pub attributes: u32,
    /// Decoded file name.
    pub name: String,
    /// The raw name field bytes, undecoded.
    pub name_bytes: &'a [u8],
    /// Encryption salt, present with [`FILE_SALT`].
    pub salt: Option<&'a [u8]>,
    /// Raw extended-time bytes, present with [`FILE_EXT_TIME`].
    pub ext_time: Option<&'a [u8]>,
    /// Offset of the entry's data within the archive buffer.
    pub data_offset: u64,
}

impl<'a> FileBlock<'a> {
    /// Parse the file header body (everything after the common header).
    pub fn parse(
        header: BlockHeader,
        body: &mut ByteCursor<'a>,
        data_offset: u64,
    ) -> Result<Self> {
        let packed_low = body.read_u32()?;
        let unpacked_low = body.read_u32()?;
        let host_os = body.read_u8()?;
        let file_crc = body.read_u32()?;
        let file_time = body.read_u32()?;
        let unpack_version = body.read_u8()?;
        let method = body.read_u8()?;
        let name_size = body.read_u16()?;
        let attributes = body.read_u32()?;

        let (packed_high, unpacked_high) = if header.flags & FILE_LARGE != 0 {
            (body.read_u32()?, body.read_u32()?)
        } else {
            (0, 0)
        };

        let name_bytes = body.read_bytes(name_size as usize)?;
        let name = filename::decode(name_bytes, header.flags & FILE_UNICODE != 0);

        let salt = if header.flags & FILE_SALT != 0 {
            Some(body.read_bytes(8)?)
        } else {
            None
        };

        // Extended time fields are kept raw, up to the declared header end.
        let ext_time = if header.flags & FILE_EXT_TIME != 0 {
            Some(body.read_bytes(body.remaining())?)
        } else {
            None
        };

        Ok(Self {
            header,
            packed_size: ((packed_high as u64) << 32) | packed_low as u64,
            unpacked_size: ((unpacked_high as u64) << 32) | unpacked_low as u64,
            host_os,
            file_crc,
            file_time,
            unpack_version,
            method,
            attributes,
            name,
            name_bytes,
            salt,
            ext_time,
            data_offset,
        })
    }

    /// Directory predicate: the 3-bit dictionary subfield fully set.
    pub fn is_directory(&self) -> bool {
        self.header.flags & FILE_DICT_MASK == FILE_DICT_MASK
    }

    /// The entry's data is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.header.flags & FILE_ENCRYPTED != 0
    }

    /// The entry continues from the previous volume.
    pub fn is_split_before(&self) -> bool {
        self.header.flags & FILE_SPLIT_BEFORE != 0
    }

    /// The entry continues in the next volume.
    pub fn is_split_after(&self) -> bool {
        self.header.flags & FILE_SPLIT_AFTER != 0
    }

    /// The entry is solid.
    pub fn is_solid(&self) -> bool {
        self.header.flags & FILE_SOLID != 0
    }

    /// The host OS the entry was archived on.
    pub fn os(&self) -> HostOs {
        HostOs::from_u8(self.host_os)
    }

    /// The compression method.
    pub fn compression_method(&self) -> CompressionMethod {
        CompressionMethod::from_raw(self.method)
    }

    /// Decode the packed DOS timestamp.
    pub fn modified_time(&self) -> Option<SystemTime> {
        dos_datetime_to_systime(self.file_time)
    }
}

/// The end-of-archive block. Its information lives entirely in the
/// common header's flags.
#[derive(Debug, Clone)]
pub struct EndArchiveBlock {
    /// The common header.
    pub header: BlockHeader,
}

impl EndArchiveBlock {
    /// Wrap an already-read common header.
    pub fn new(header: BlockHeader) -> Self {
        Self { header }
    }

    /// Another volume follows this one.
    pub fn next_volume(&self) -> bool {
        self.header.flags & END_NEXT_VOLUME != 0
    }

    /// An archive data CRC is present.
    pub fn data_crc_present(&self) -> bool {
        self.header.flags & END_DATA_CRC != 0
    }
}

/// A parsed block: the closed set of variants the scan dispatches on.
#[derive(Debug, Clone)]
pub enum Block<'a> {
    /// Marker block; no fields beyond the common header.
    Marker(BlockHeader),
    /// Archive header block.
    Archive(ArchiveBlock),
    /// File header block.
    File(FileBlock<'a>),
    /// End-of-archive block.
    EndArchive(EndArchiveBlock),
    /// Unrecognized block type; common header only, skipped by framing.
    Unknown(BlockHeader),
}

impl<'a> Block<'a> {
    /// Parse a block body according to its type byte.
    ///
    /// `body` is bounded to the declared header size, so a malformed body
    /// can never read past its own block.
    pub fn parse(
        header: BlockHeader,
        body: &mut ByteCursor<'a>,
        data_offset: u64,
    ) -> Result<Block<'a>> {
        match header.block_type {
            BLOCK_MARKER => Ok(Block::Marker(header)),
            BLOCK_ARCHIVE => Ok(Block::Archive(ArchiveBlock::parse(header, body)?)),
            BLOCK_FILE => Ok(Block::File(FileBlock::parse(header, body, data_offset)?)),
            BLOCK_END_ARCHIVE => Ok(Block::EndArchive(EndArchiveBlock::new(header))),
            _ => Ok(Block::Unknown(header)),
        }
    }

    /// The common header shared by every variant.
    pub fn header(&self) -> &BlockHeader {
        match self {
            Block::Marker(header) | Block::Unknown(header) => header,
            Block::Archive(block) => &block.header,
            Block::File(block) => &block.header,
            Block::EndArchive(block) => &block.header,
        }
    }
}

/// Convert a packed DOS timestamp (date word, time word) to `SystemTime`.
///
/// Returns `None` for out-of-range field values.
fn dos_datetime_to_systime(dos: u32) -> Option<SystemTime> {
    let date = (dos >> 16) as u16;
    let time = (dos & 0xFFFF) as u16;

    // DOS date: bits 0-4 = day, 5-8 = month, 9-15 = year since 1980
    let day = (date & 0x1F) as u32;
    let month = ((date >> 5) & 0x0F) as u32;
    let year = ((date >> 9) & 0x7F) as u32 + 1980;

    // DOS time: bits 0-4 = seconds/2, 5-10 = minutes, 11-15 = hours
    let seconds = ((time & 0x1F) as u32) * 2;
    let minutes = ((time >> 5) & 0x3F) as u32;
    let hours = ((time >> 11) & 0x1F) as u32;

    if day == 0 || day > 31 || month == 0 || month > 12 {
        return None;
    }
    if hours > 23 || minutes > 59 || seconds > 59 {
        return None;
    }

    let mut days = 0i64;
    for y in 1970..year {
        days += if is_leap_year(y) { 366 } else { 365 };
    }

    let month_days = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];
    days += month_days[month as usize - 1] as i64;
    if month > 2 && is_leap_year(year) {
        days += 1;
    }
    days += (day - 1) as i64;

    let secs = days * 86400 + (hours as i64) * 3600 + (minutes as i64) * 60 + seconds as i64;
    if secs < 0 {
        return None;
    }

    Some(std::time::UNIX_EPOCH + std::time::Duration::from_secs(secs as u64))
}

fn is_leap_year(year: u32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}
