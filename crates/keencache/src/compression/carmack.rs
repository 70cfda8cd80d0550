//! "Carmack" expansion: 16-bit words with near and far back-references.
//!
//! A word whose high byte is [`NEAR_TAG`] or [`FAR_TAG`] starts a run; its low
//! byte is the run length in words. A near run copies from a single-byte
//! distance behind the output cursor, a far run from an absolute word index
//! in the output. A run length of zero escapes a literal word carrying the tag
//! in its high byte, whose low byte follows as a single byte.
//!
//! Runs may overlap the words they produce, so copies go one word at a time in
//! forward order.

use super::DecodeError;

pub const NEAR_TAG: u8 = 0xA7;
pub const FAR_TAG: u8 = 0xA8;

struct ByteSource<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> ByteSource<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    fn read_byte(&mut self) -> Result<u8, DecodeError> {
        let Some(&byte) = self.data.get(self.position) else {
            return Err(DecodeError::UnexpectedEndOfInput {
                position: self.position,
            });
        };
        self.position += 1;
        Ok(byte)
    }

    fn read_word(&mut self) -> Result<u16, DecodeError> {
        let low = self.read_byte()?;
        let high = self.read_byte()?;
        Ok(u16::from_le_bytes([low, high]))
    }
}

fn copy_run(
    dest: &mut [u16],
    source_index: usize,
    position: usize,
    count: usize,
) -> Result<(), DecodeError> {
    if position + count > dest.len() {
        return Err(DecodeError::OutputOverrun {
            position,
            count,
            expected: dest.len(),
        });
    }
    if source_index >= position {
        return Err(DecodeError::InvalidBackReference {
            position,
            source_index,
        });
    }
    for i in 0..count {
        dest[position + i] = dest[source_index + i];
    }
    Ok(())
}

/// Expands `src` until `dest` is full, returning the number of source bytes
/// consumed.
pub fn expand_into(src: &[u8], dest: &mut [u16]) -> Result<usize, DecodeError> {
    let mut input = ByteSource::new(src);
    let mut position = 0;

    while position < dest.len() {
        let word = input.read_word()?;
        let [count, tag] = word.to_le_bytes();
        let count = usize::from(count);

        if tag == NEAR_TAG {
            if count == 0 {
                let low = input.read_byte()?;
                dest[position] = u16::from_le_bytes([low, NEAR_TAG]);
                position += 1;
            } else {
                let distance = usize::from(input.read_byte()?);
                let Some(source_index) = position.checked_sub(distance) else {
                    return Err(DecodeError::InvalidBackReference {
                        position,
                        source_index: distance,
                    });
                };
                copy_run(dest, source_index, position, count)?;
                position += count;
            }
        } else if tag == FAR_TAG {
            if count == 0 {
                let low = input.read_byte()?;
                dest[position] = u16::from_le_bytes([low, FAR_TAG]);
                position += 1;
            } else {
                let source_index = usize::from(input.read_word()?);
                copy_run(dest, source_index, position, count)?;
                position += count;
            }
        } else {
            dest[position] = word;
            position += 1;
        }
    }

    Ok(input.position)
}

/// Expands `src` into `exp_length` bytes worth of words.
///
/// An odd `exp_length` is rounded down to whole words.
pub fn expand(src: &[u8], exp_length: usize) -> Result<Vec<u16>, DecodeError> {
    let mut dest = vec![0u16; exp_length / 2];
    expand_into(src, &mut dest)?;
    Ok(dest)
}
