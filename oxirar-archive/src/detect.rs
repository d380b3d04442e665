//! Archive format auto-detection.
//!
//! This module classifies a buffer's leading bytes into the two RAR
//! signature revisions. The 5.0 signature extends the 4.x one by a single
//! byte, so the longer match is tried first.

/// RAR 4.x (v4) signature: `Rar!` 0x1A 0x07 0x00.
pub const RAR4_MAGIC: [u8; 7] = [0x52, 0x61, 0x72, 0x21, 0x1A, 0x07, 0x00];

/// RAR 5.0 (v5) signature: `Rar!` 0x1A 0x07 0x01 0x00.
pub const RAR5_MAGIC: [u8; 8] = [0x52, 0x61, 0x72, 0x21, 0x1A, 0x07, 0x01, 0x00];

/// Known archive signature revisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    /// RAR 4.x (the format parsed by this crate).
    Rar4,
    /// RAR 5.0 (detected, never parsed).
    Rar5,
    /// Anything else.
    Unknown,
}

impl ArchiveFormat {
    /// Detect format from the buffer's leading bytes.
    pub fn from_magic(magic: &[u8]) -> Self {
        // v5 first: its signature is a strict extension of v4's.
        if magic.len() >= RAR5_MAGIC.len() && magic[..RAR5_MAGIC.len()] == RAR5_MAGIC {
            return Self::Rar5;
        }
        if magic.len() >= RAR4_MAGIC.len() && magic[..RAR4_MAGIC.len()] == RAR4_MAGIC {
            return Self::Rar4;
        }
        Self::Unknown
    }
}

impl std::fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Rar4 => "RAR 4.x",
            Self::Rar5 => "RAR 5.0",
            Self::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_rar4() {
        let mut data = RAR4_MAGIC.to_vec();
        data.extend_from_slice(&[0xAA; 16]);
        assert_eq!(ArchiveFormat::from_magic(&data), ArchiveFormat::Rar4);
        // Exactly the signature, nothing after it
        assert_eq!(ArchiveFormat::from_magic(&RAR4_MAGIC), ArchiveFormat::Rar4);
    }

    #[test]
    fn test_detect_rar5_wins_over_rar4_prefix() {
        let mut data = RAR5_MAGIC.to_vec();
        data.extend_from_slice(&[0x00; 8]);
        assert_eq!(ArchiveFormat::from_magic(&data), ArchiveFormat::Rar5);
    }

    #[test]
    fn test_detect_unknown() {
        assert_eq!(
            ArchiveFormat::from_magic(b"PK\x03\x04........"),
            ArchiveFormat::Unknown
        );
        assert_eq!(ArchiveFormat::from_magic(b"Rar!"), ArchiveFormat::Unknown);
        assert_eq!(ArchiveFormat::from_magic(b""), ArchiveFormat::Unknown);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ArchiveFormat::Rar4), "RAR 4.x");
        assert_eq!(format!("{}", ArchiveFormat::Rar5), "RAR 5.0");
    }
}
