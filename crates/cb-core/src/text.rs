//! Text slot encoding: raw little-endian UTF-16 code units, no terminator.
//! The length always comes from the byte count, never from a NUL search.

use std::mem;

const UNIT: usize = mem::size_of::<u16>();

pub fn encode_utf16le(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(u16::to_le_bytes).collect()
}

/// `byte_len / 2`. A trailing odd byte is not part of the string.
#[inline]
pub fn char_count(data: &[u8]) -> usize {
    data.len() / UNIT
}

pub fn decode_utf16le(data: &[u8]) -> String {
    let units: Vec<u16> = data
        .chunks_exact(UNIT)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16_lossy(&units)
}
