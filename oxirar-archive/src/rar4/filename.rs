//! File name decoding.
//!
//! v4 name fields come in two shapes. Without the unicode flag the raw
//! bytes are the name in a single-byte OEM/ANSI encoding. With it, the
//! field holds an ASCII base name, a NUL, and a bit-packed stream that
//! upgrades the base name to UTF-16 code units: a flag byte is consumed
//! two bits at a time (most-significant pair first) and each 2-bit
//! selector chooses how the next code unit is produced. This is not a
//! standard text encoding and is reproduced here operation for operation,
//! including mode 1's reuse of the previously-seen high byte.

use encoding_rs::WINDOWS_1252;

/// Decode a raw name field into a string.
///
/// `unicode` is the file block's unicode flag. Identical input always
/// decodes to the identical string.
pub fn decode(raw: &[u8], unicode: bool) -> String {
    if !unicode {
        return decode_single_byte(raw);
    }
    match raw.iter().position(|&b| b == 0) {
        // No unicode payload after all; the bytes are the whole name.
        None => decode_single_byte(raw),
        Some(nul) if nul + 1 == raw.len() => decode_single_byte(&raw[..nul]),
        Some(nul) => decode_packed(&raw[..nul], &raw[nul + 1..]),
    }
}

/// Single-byte fallback decode (OEM/ANSI names).
fn decode_single_byte(raw: &[u8]) -> String {
    WINDOWS_1252.decode(raw).0.into_owned()
}

/// Base-name code unit at `pos`; positions past the base name read as zero.
fn base_unit(base: &[u8], pos: usize) -> u16 {
    base.get(pos).copied().unwrap_or(0) as u16
}

/// Decode the bit-packed stream following the NUL separator.
fn decode_packed(base: &[u8], enc: &[u8]) -> String {
    let mut units: Vec<u16> = Vec::with_capacity(base.len());
    let mut high_byte: u16 = 0;
    let mut flags: u8 = 0;
    let mut flag_bits: u8 = 0;
    let mut pos = 0usize; // index into enc
    let mut name_pos = 0usize; // output index, doubles as base-name index
    let limit = base.len() * 2;

    while pos < enc.len() && name_pos < limit {
        if flag_bits == 0 {
            flags = enc[pos];
            pos += 1;
            flag_bits = 8;
        }
        let mode = flags >> 6;
        flags <<= 2;
        flag_bits -= 2;

        match mode {
            0 => units.push(base_unit(base, name_pos)),
            1 => units.push((high_byte << 8) | base_unit(base, name_pos)),
            2 => {
                if pos + 2 > enc.len() {
                    break;
                }
                units.push(u16::from_le_bytes([enc[pos], enc[pos + 1]]));
                pos += 2;
            }
            _ => {
                if pos >= enc.len() {
                    break;
                }
                high_byte = enc[pos] as u16;
                pos += 1;
                units.push((high_byte << 8) | base_unit(base, name_pos));
            }
        }
        name_pos += 1;
    }

    String::from_utf16_lossy(&units)
}
