//! The audio head file: `count + 1` 32-bit offsets into the audio data file.

use crate::utils::mem_reader::{self, MemReader, SliceMemReader};

use super::{AssetKind, IndexError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioIndex {
    starts: Vec<u32>,
}

impl AudioIndex {
    pub fn from_bytes(data: &[u8]) -> mem_reader::Result<Self> {
        let mut reader = SliceMemReader::new(data);
        if data.len() % 4 != 0 || data.is_empty() {
            return Err(reader.create_invalid_data_error(format!(
                "Audio head of {} bytes is not a whole number of 4 byte entries",
                data.len()
            )));
        }
        let mut starts = Vec::with_capacity(data.len() / 4);
        while !reader.is_empty() {
            starts.push(reader.read_u32_le()?);
        }
        Ok(AudioIndex { starts })
    }

    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.starts.len() - 1
    }

    /// Start offset and stored length of `chunk`, or `None` if it is past the
    /// end of the index.
    pub fn span(&self, chunk: usize) -> Result<Option<(u32, u32)>, IndexError> {
        let (Some(&start), Some(&end)) = (self.starts.get(chunk), self.starts.get(chunk + 1))
        else {
            return Ok(None);
        };
        let Some(length) = end.checked_sub(start) else {
            return Err(IndexError::InvalidSpan {
                kind: AssetKind::Audio,
                chunk,
                start,
                end,
            });
        };
        Ok(Some((start, length)))
    }
}
