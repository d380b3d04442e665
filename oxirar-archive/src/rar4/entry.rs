//! Derived file-entry view over parsed file blocks.
//!
//! A [`FileEntry`] is created for every non-directory file block, in
//! archive order. It normalizes the stored path, derives the basename and
//! extension, and answers the extraction-eligibility questions a caller
//! has to ask before copying payload bytes.

use oxirar_core::entry::{CompressionMethod, Entry, EntryType, FileAttributes};
use std::time::SystemTime;

use super::block::{FileBlock, METHOD_BEST, METHOD_STORE};

/// A non-directory file block, wrapped with derived path metadata.
#[derive(Debug, Clone)]
pub struct FileEntry<'a> {
    block: FileBlock<'a>,
    path: String,
}

impl<'a> FileEntry<'a> {
    pub(crate) fn new(block: FileBlock<'a>) -> Self {
        let path = block.name.replace('\\', "/");
        Self { block, path }
    }

    /// The underlying file block.
    pub fn block(&self) -> &FileBlock<'a> {
        &self.block
    }

    /// The entry path with separators normalized to forward slashes.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The final path component.
    pub fn basename(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or("")
    }

    /// The lowercase file extension, without the dot.
    ///
    /// Dotfiles and names without a dot have no extension.
    pub fn extension(&self) -> Option<String> {
        match self.basename().rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
                Some(ext.to_ascii_lowercase())
            }
            _ => None,
        }
    }

    /// Size of the stored payload in the archive buffer.
    pub fn packed_size(&self) -> u64 {
        self.block.packed_size
    }

    /// Uncompressed size.
    pub fn unpacked_size(&self) -> u64 {
        self.block.unpacked_size
    }

    /// Offset of the payload within the archive buffer.
    ///
    /// For an extractable entry the caller copies
    /// `data_offset .. data_offset + packed_size`.
    pub fn data_offset(&self) -> u64 {
        self.block.data_offset
    }

    /// CRC-32 of the uncompressed data, for caller-side verification.
    pub fn file_crc(&self) -> u32 {
        self.block.file_crc
    }

    /// The compression method.
    pub fn method(&self) -> CompressionMethod {
        self.block.compression_method()
    }

    /// The entry's data is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.block.is_encrypted()
    }

    /// Whether the payload can be extracted by a plain byte copy:
    /// stored, not encrypted, not a directory.
    pub fn can_extract(&self) -> bool {
        self.block.method == METHOD_STORE
            && !self.block.is_encrypted()
            && !self.block.is_directory()
    }

    /// Whether the entry uses one of the compressed methods this crate
    /// detects but cannot decode.
    pub fn has_unsupported_compression(&self) -> bool {
        (0x31..=METHOD_BEST).contains(&self.block.method) && !self.block.is_directory()
    }

    /// Decoded modification time.
    pub fn modified_time(&self) -> Option<SystemTime> {
        self.block.modified_time()
    }

    /// Convert into the format-agnostic entry record.
    pub fn to_entry(&self) -> Entry {
        let attributes = if self.block.os().is_unix() {
            FileAttributes::from_unix(self.block.attributes)
        } else {
            FileAttributes::from_dos(self.block.attributes)
        };
        Entry {
            name: self.path.clone(),
            entry_type: EntryType::File,
            size: self.block.unpacked_size,
            packed_size: self.block.packed_size,
            method: self.method(),
            modified: self.modified_time(),
            attributes,
            crc32: Some(self.block.file_crc),
            offset: self.block.data_offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rar4::block::{BlockHeader, FILE_ENCRYPTED};

    fn test_block(name: &str, flags: u16, method: u8) -> FileBlock<'static> {
        FileBlock {
            header: BlockHeader {
                header_crc: 0,
                block_type: 0x74,
                flags,
                header_size: 0,
            },
            packed_size: 100,
            unpacked_size: 100,
            host_os: 2,
            file_crc: 0xCAFEBABE,
            file_time: 0x582F63C0,
            unpack_version: 20,
            method,
            attributes: 0x20,
            name: name.to_string(),
            name_bytes: b"",
            salt: None,
            ext_time: None,
            data_offset: 64,
        }
    }

    #[test]
    fn test_path_normalization() {
        let entry = FileEntry::new(test_block("comics\\issue1\\page001.jpg", 0, 0x30));
        assert_eq!(entry.path(), "comics/issue1/page001.jpg");
        assert_eq!(entry.basename(), "page001.jpg");
        assert_eq!(entry.extension().as_deref(), Some("jpg"));
    }

    #[test]
    fn test_extension_rules() {
        let entry = FileEntry::new(test_block("PAGE.JPG", 0, 0x30));
        assert_eq!(entry.extension().as_deref(), Some("jpg"));

        let entry = FileEntry::new(test_block("README", 0, 0x30));
        assert_eq!(entry.extension(), None);

        let entry = FileEntry::new(test_block("dir/.hidden", 0, 0x30));
        assert_eq!(entry.extension(), None);

        let entry = FileEntry::new(test_block("archive.tar.", 0, 0x30));
        assert_eq!(entry.extension(), None);
    }

    #[test]
    fn test_classification_store() {
        let entry = FileEntry::new(test_block("a.txt", 0, 0x30));
        assert!(entry.can_extract());
        assert!(!entry.has_unsupported_compression());
        assert!(!entry.is_encrypted());
    }

    #[test]
    fn test_classification_compressed_methods() {
        for method in 0x31..=0x35u8 {
            let entry = FileEntry::new(test_block("a.txt", 0, method));
            assert!(!entry.can_extract(), "method {:#04x}", method);
            assert!(
                entry.has_unsupported_compression(),
                "method {:#04x}",
                method
            );
        }
    }

    #[test]
    fn test_classification_encrypted() {
        let entry = FileEntry::new(test_block("a.txt", FILE_ENCRYPTED, 0x30));
        assert!(entry.is_encrypted());
        assert!(!entry.can_extract());
        assert!(!entry.has_unsupported_compression());
    }

    #[test]
    fn test_to_entry() {
        let entry = FileEntry::new(test_block("b\\c.png", 0, 0x33)).to_entry();
        assert_eq!(entry.name, "b/c.png");
        assert!(entry.is_file());
        assert_eq!(entry.packed_size, 100);
        assert_eq!(entry.method, CompressionMethod::Normal);
        assert_eq!(entry.crc32, Some(0xCAFEBABE));
        assert_eq!(entry.offset, 64);
        assert_eq!(entry.attributes.dos, Some(0x20));
        assert!(entry.modified.is_some());
    }

    #[test]
    fn test_to_entry_unix_attributes() {
        let mut block = test_block("mode.txt", 0, 0x30);
        block.host_os = 3;
        block.attributes = 0o644;
        let entry = FileEntry::new(block).to_entry();
        assert_eq!(entry.attributes.unix_mode, Some(0o644));
        assert_eq!(entry.attributes.dos, None);
    }
}
