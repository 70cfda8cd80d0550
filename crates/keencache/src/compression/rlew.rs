//! RLEW: run-length encoding over 16-bit words.
//!
//! A run is the tag word followed by a count word and a value word. Every
//! other word is a literal. The tag itself is stored in the map head file.

use itertools::Itertools as _;

use super::DecodeError;

/// Expands `src` into `dest`, returning the number of source words consumed.
///
/// A run that would extend past the end of `dest` stops decoding early. The
/// rest of `dest` is left untouched.
pub fn expand_into(src: &[u16], dest: &mut [u16], rle_tag: u16) -> Result<usize, DecodeError> {
    let mut read = 0;
    let mut position = 0;
    let next = |read: &mut usize| -> Result<u16, DecodeError> {
        let word = src
            .get(*read)
            .copied()
            .ok_or(DecodeError::UnexpectedEndOfInput { position: *read * 2 })?;
        *read += 1;
        Ok(word)
    };

    while position < dest.len() {
        let value = next(&mut read)?;
        if value == rle_tag {
            let count = usize::from(next(&mut read)?);
            let value = next(&mut read)?;
            if position + count > dest.len() {
                log::warn!(
                    "RLEW run of {count} words at {position} overruns {} word output, stopping",
                    dest.len()
                );
                return Ok(read);
            }
            dest[position..position + count].fill(value);
            position += count;
        } else {
            dest[position] = value;
            position += 1;
        }
    }
    Ok(read)
}

/// Expands `src` into `exp_length` bytes worth of words.
pub fn expand(src: &[u16], exp_length: usize, rle_tag: u16) -> Result<Vec<u16>, DecodeError> {
    let mut dest = vec![0u16; exp_length / 2];
    expand_into(src, &mut dest, rle_tag)?;
    Ok(dest)
}

/// Compresses `src`, emitting a tagged run for any run longer than three
/// words, and for every run of the tag value itself so that it cannot be
/// mistaken for a run header.
#[must_use]
pub fn compress(src: &[u16], rle_tag: u16) -> Vec<u16> {
    let mut dest = Vec::with_capacity(src.len());
    for (count, value) in src.iter().copied().dedup_with_count() {
        if count > 3 || value == rle_tag {
            // Runs longer than a count word can hold are split.
            let mut remaining = count;
            while remaining > 0 {
                let chunk = u16::try_from(remaining).unwrap_or(u16::MAX);
                dest.extend([rle_tag, chunk, value]);
                remaining -= usize::from(chunk);
            }
        } else {
            dest.extend(std::iter::repeat_n(value, count));
        }
    }
    dest
}
