//! Little-endian word helpers over raw memory.
//!
//! Every multi-byte value in the asset files is little-endian. Reads
//! return `None` instead of panicking when the value would extend past the end
//! of the slice.

/// Reads a little-endian 16-bit word at `offset`.
#[must_use]
pub fn read_u16(data: &[u8], offset: usize) -> Option<u16> {
    let end = offset.checked_add(2)?;
    let bytes = data.get(offset..end)?;
    Some(u16::from_le_bytes([bytes[0], bytes[1]]))
}

/// Reinterprets a byte buffer as little-endian 16-bit words. A trailing odd
/// byte is ignored.
#[must_use]
pub fn words_from_le_bytes(data: &[u8]) -> Vec<u16> {
    data.chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}

/// Writes `words` into `dest` as little-endian bytes.
///
/// `dest` must be at least twice as long as `words`.
pub fn write_words_le(words: &[u16], dest: &mut [u8]) {
    for (word, out) in words.iter().zip(dest.chunks_exact_mut(2)) {
        out.copy_from_slice(&word.to_le_bytes());
    }
}
