//! The graphics head file: one 24-bit offset into the data file per chunk.

use crate::utils::mem_reader::{self, MemReader, SliceMemReader};

use super::{AssetKind, IndexError, gfx_info::GfxInfo};

/// Offset value marking a chunk with no data.
pub const SPARSE_CHUNK: u32 = 0x00FF_FFFF;

/// Size of the expanded length stored before prefixed chunks.
pub const LENGTH_PREFIX_SIZE: u32 = 4;

/// Where a chunk's bytes live in the data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSpan {
    start: u32,
    /// Bytes to read, including any length prefix.
    read_length: u32,
    has_length_prefix: bool,
}

impl ChunkSpan {
    #[must_use]
    pub fn start(&self) -> u32 {
        self.start
    }

    #[must_use]
    pub fn read_length(&self) -> u32 {
        self.read_length
    }

    #[must_use]
    pub fn has_length_prefix(&self) -> bool {
        self.has_length_prefix
    }

    /// Length of the Huffman-coded payload after any prefix.
    #[must_use]
    pub fn compressed_length(&self) -> u32 {
        if self.has_length_prefix {
            self.read_length - LENGTH_PREFIX_SIZE
        } else {
            self.read_length
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkIndex {
    // One entry per chunk plus the end-of-data marker.
    starts: Vec<u32>,
}

impl ChunkIndex {
    pub fn from_bytes(data: &[u8]) -> mem_reader::Result<Self> {
        let mut reader = SliceMemReader::new(data);
        if data.len() % 3 != 0 || data.len() < 3 {
            return Err(reader.create_invalid_data_error(format!(
                "Graphics head of {} bytes is not a whole number of 3 byte entries",
                data.len()
            )));
        }
        let mut starts = Vec::with_capacity(data.len() / 3);
        while !reader.is_empty() {
            starts.push(reader.read_u24_le()?);
        }
        Ok(ChunkIndex { starts })
    }

    /// Number of chunks, not counting the end marker.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.starts.len() - 1
    }

    /// The file offset of `chunk`, or `None` for sparse or unknown chunks.
    #[must_use]
    pub fn start(&self, chunk: usize) -> Option<u32> {
        self.starts
            .get(chunk)
            .copied()
            .filter(|&start| start != SPARSE_CHUNK)
    }

    fn next_boundary(&self, chunk: usize) -> Option<u32> {
        self.starts
            .get(chunk + 1..)?
            .iter()
            .copied()
            .find(|&start| start != SPARSE_CHUNK)
    }

    /// Resolves the bytes of `chunk`. `Ok(None)` means the chunk is sparse.
    pub fn span(&self, chunk: usize, info: &GfxInfo) -> Result<Option<ChunkSpan>, IndexError> {
        let Some(start) = self.start(chunk) else {
            return Ok(None);
        };
        let Some(end) = self.next_boundary(chunk) else {
            return Err(IndexError::NoEndBoundary {
                kind: AssetKind::Graphics,
                chunk,
            });
        };
        let has_length_prefix = info.has_length_prefix(chunk);
        let min_length = if has_length_prefix {
            LENGTH_PREFIX_SIZE
        } else {
            0
        };
        match end.checked_sub(start) {
            Some(read_length) if read_length >= min_length => Ok(Some(ChunkSpan {
                start,
                read_length,
                has_length_prefix,
            })),
            _ => Err(IndexError::InvalidSpan {
                kind: AssetKind::Graphics,
                chunk,
                start,
                end,
            }),
        }
    }

    /// Compressed payload length of `chunk`, excluding any length prefix.
    pub fn compressed_length(&self, chunk: usize, info: &GfxInfo) -> Result<Option<u32>, IndexError> {
        Ok(self.span(chunk, info)?.map(|span| span.compressed_length()))
    }
}

#[cfg(test)]
mod tests {
    use datalit::datalit;

    use super::*;

    /// Chunks in `first..end` are 16×16 tiles; everything else is prefixed.
    fn info_with_tiles16(first: u16, end: u16) -> GfxInfo {
        let mut fields = [0u16; 23];
        // Offsets of tiles8, tiles8 masked and tiles16.
        fields[13..16].fill(first);
        // Offsets of tiles16 masked through binaries.
        fields[16..20].fill(end);
        let bytes: Vec<u8> = fields.iter().flat_map(|f| f.to_le_bytes()).collect();
        GfxInfo::from_bytes(&bytes).unwrap()
    }

    fn sparse_index() -> ChunkIndex {
        let data = datalit! {
            0x00, 0x00, 0x00,
            0x64, 0x00, 0x00,
            0xFF, 0xFF, 0xFF,
            0xFA, 0x00, 0x00,
        };
        ChunkIndex::from_bytes(&data).unwrap()
    }

    #[test]
    fn sparse_chunks_have_no_start() {
        let index = sparse_index();
        assert_eq!(index.chunk_count(), 3);
        assert_eq!(index.start(0), Some(0));
        assert_eq!(index.start(1), Some(100));
        assert_eq!(index.start(2), None);
        assert_eq!(index.start(7), None);
    }

    #[test]
    fn length_skips_sparse_neighbours() {
        let index = sparse_index();
        let info = info_with_tiles16(1, 2);
        assert_eq!(index.compressed_length(1, &info).unwrap(), Some(150));
        assert_eq!(index.compressed_length(2, &info).unwrap(), None);
    }

    #[test]
    fn prefixed_chunks_exclude_prefix_from_length() {
        let index = sparse_index();
        let info = info_with_tiles16(1, 2);
        let span = index.span(0, &info).unwrap().unwrap();
        assert!(span.has_length_prefix());
        assert_eq!(span.read_length(), 100);
        assert_eq!(span.compressed_length(), 96);
    }

    #[test]
    fn missing_end_boundary_is_an_error() {
        let data = datalit! {
            0x00, 0x00, 0x00,
            0x10, 0x00, 0x00,
            0xFF, 0xFF, 0xFF,
        };
        let index = ChunkIndex::from_bytes(&data).unwrap();
        let info = GfxInfo::default();
        assert!(matches!(
            index.span(1, &info),
            Err(IndexError::NoEndBoundary { chunk: 1, .. })
        ));
    }

    #[test]
    fn backwards_span_is_an_error() {
        let data = datalit! {
            0x20, 0x00, 0x00,
            0x10, 0x00, 0x00,
        };
        let index = ChunkIndex::from_bytes(&data).unwrap();
        assert!(matches!(
            index.span(0, &GfxInfo::default()),
            Err(IndexError::InvalidSpan {
                start: 0x20,
                end: 0x10,
                ..
            })
        ));
    }

    #[test]
    fn ragged_head_file_is_rejected() {
        assert!(ChunkIndex::from_bytes(&[0, 0, 0, 0]).is_err());
        assert!(ChunkIndex::from_bytes(&[]).is_err());
    }
}
