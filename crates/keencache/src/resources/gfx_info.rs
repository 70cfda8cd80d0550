//! The graphics info file: chunk counts and the chunk id where each chunk
//! category begins.

use crate::utils::mem_reader::{self, MemReader, Parse, SliceMemReader};

use super::IndexError;

/// Size in bytes of the info file structure.
pub const GFX_INFO_SIZE: usize = 23 * 2;

/// The category of a graphics chunk, which decides how its expanded length is
/// found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind {
    /// All 8×8 tiles in a single chunk.
    Tiles8,
    /// All masked 8×8 tiles in a single chunk.
    Tiles8Masked,
    Tile16,
    Tile16Masked,
    Tile32,
    Tile32Masked,
    /// Pictures, sprites, fonts, headers and binaries. These store their
    /// expanded length as a four byte prefix.
    Prefixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GfxInfo {
    num_pics: u16,
    num_pics_masked: u16,
    num_sprites: u16,
    num_tiles8: u16,
    num_tiles8_masked: u16,
    num_tiles16: u16,
    num_tiles16_masked: u16,
    num_tiles32: u16,
    num_tiles32_masked: u16,
    num_binaries: u16,
    off_pics: u16,
    off_pics_masked: u16,
    off_sprites: u16,
    off_tiles8: u16,
    off_tiles8_masked: u16,
    off_tiles16: u16,
    off_tiles16_masked: u16,
    off_tiles32: u16,
    off_tiles32_masked: u16,
    off_binaries: u16,
    hdr_bitmaps: u16,
    hdr_masked: u16,
    hdr_sprites: u16,
}

impl GfxInfo {
    pub fn from_bytes(data: &[u8]) -> mem_reader::Result<Self> {
        Self::parse(&mut SliceMemReader::new(data))
    }

    #[must_use]
    pub fn num_pics(&self) -> u16 {
        self.num_pics
    }

    #[must_use]
    pub fn num_pics_masked(&self) -> u16 {
        self.num_pics_masked
    }

    #[must_use]
    pub fn num_sprites(&self) -> u16 {
        self.num_sprites
    }

    #[must_use]
    pub fn num_tiles8(&self) -> u16 {
        self.num_tiles8
    }

    #[must_use]
    pub fn num_tiles16(&self) -> u16 {
        self.num_tiles16
    }

    #[must_use]
    pub fn num_tiles32(&self) -> u16 {
        self.num_tiles32
    }

    #[must_use]
    pub fn num_binaries(&self) -> u16 {
        self.num_binaries
    }

    #[must_use]
    pub fn off_pics(&self) -> u16 {
        self.off_pics
    }

    #[must_use]
    pub fn off_sprites(&self) -> u16 {
        self.off_sprites
    }

    #[must_use]
    pub fn off_tiles8(&self) -> u16 {
        self.off_tiles8
    }

    #[must_use]
    pub fn off_tiles16(&self) -> u16 {
        self.off_tiles16
    }

    #[must_use]
    pub fn off_binaries(&self) -> u16 {
        self.off_binaries
    }

    /// Chunk holding the picture size table.
    #[must_use]
    pub fn hdr_bitmaps(&self) -> u16 {
        self.hdr_bitmaps
    }

    /// Chunk holding the masked picture size table.
    #[must_use]
    pub fn hdr_masked(&self) -> u16 {
        self.hdr_masked
    }

    /// Chunk holding the sprite table.
    #[must_use]
    pub fn hdr_sprites(&self) -> u16 {
        self.hdr_sprites
    }

    /// Checks that every category offset lies within `chunk_count` chunks and
    /// every header chunk exists.
    pub fn validate(&self, chunk_count: usize) -> Result<(), IndexError> {
        let offsets = [
            ("off_pics", self.off_pics),
            ("off_pics_masked", self.off_pics_masked),
            ("off_sprites", self.off_sprites),
            ("off_tiles8", self.off_tiles8),
            ("off_tiles8_masked", self.off_tiles8_masked),
            ("off_tiles16", self.off_tiles16),
            ("off_tiles16_masked", self.off_tiles16_masked),
            ("off_tiles32", self.off_tiles32),
            ("off_tiles32_masked", self.off_tiles32_masked),
            ("off_binaries", self.off_binaries),
        ];
        let headers = [
            ("hdr_bitmaps", self.hdr_bitmaps),
            ("hdr_masked", self.hdr_masked),
            ("hdr_sprites", self.hdr_sprites),
        ];
        let out_of_range = offsets
            .into_iter()
            .find(|&(_, value)| usize::from(value) > chunk_count)
            .or_else(|| {
                headers
                    .into_iter()
                    .find(|&(_, value)| usize::from(value) >= chunk_count)
            });
        match out_of_range {
            Some((field, value)) => Err(IndexError::InfoOutOfRange {
                field,
                value,
                count: chunk_count,
            }),
            None => Ok(()),
        }
    }

    #[must_use]
    pub fn chunk_kind(&self, chunk: usize) -> ChunkKind {
        let below = |offset: u16| chunk < usize::from(offset);
        if below(self.off_tiles8) || !below(self.off_binaries) {
            ChunkKind::Prefixed
        } else if below(self.off_tiles8_masked) {
            ChunkKind::Tiles8
        } else if below(self.off_tiles16) {
            ChunkKind::Tiles8Masked
        } else if below(self.off_tiles16_masked) {
            ChunkKind::Tile16
        } else if below(self.off_tiles32) {
            ChunkKind::Tile16Masked
        } else if below(self.off_tiles32_masked) {
            ChunkKind::Tile32
        } else {
            ChunkKind::Tile32Masked
        }
    }

    /// The expanded length of a tile chunk, or `None` for chunks that carry a
    /// length prefix.
    #[must_use]
    pub fn fixed_expanded_length(&self, chunk: usize) -> Option<u32> {
        let length = match self.chunk_kind(chunk) {
            ChunkKind::Tiles8 => 32 * u32::from(self.num_tiles8),
            ChunkKind::Tiles8Masked => 40 * u32::from(self.num_tiles8_masked),
            ChunkKind::Tile16 => 128,
            ChunkKind::Tile16Masked => 40 * 4,
            ChunkKind::Tile32 => 32 * 16,
            ChunkKind::Tile32Masked => 40 * 16,
            ChunkKind::Prefixed => return None,
        };
        Some(length)
    }

    #[must_use]
    pub fn has_length_prefix(&self, chunk: usize) -> bool {
        self.chunk_kind(chunk) == ChunkKind::Prefixed
    }
}

impl Parse for GfxInfo {
    fn parse<M: MemReader>(reader: &mut M) -> mem_reader::Result<Self> {
        let mut fields = [0u16; 23];
        for field in &mut fields {
            *field = reader.read_u16_le()?;
        }
        let [
            num_pics,
            num_pics_masked,
            num_sprites,
            num_tiles8,
            num_tiles8_masked,
            num_tiles16,
            num_tiles16_masked,
            num_tiles32,
            num_tiles32_masked,
            num_binaries,
            off_pics,
            off_pics_masked,
            off_sprites,
            off_tiles8,
            off_tiles8_masked,
            off_tiles16,
            off_tiles16_masked,
            off_tiles32,
            off_tiles32_masked,
            off_binaries,
            hdr_bitmaps,
            hdr_masked,
            hdr_sprites,
        ] = fields;
        Ok(GfxInfo {
            num_pics,
            num_pics_masked,
            num_sprites,
            num_tiles8,
            num_tiles8_masked,
            num_tiles16,
            num_tiles16_masked,
            num_tiles32,
            num_tiles32_masked,
            num_binaries,
            off_pics,
            off_pics_masked,
            off_sprites,
            off_tiles8,
            off_tiles8_masked,
            off_tiles16,
            off_tiles16_masked,
            off_tiles32,
            off_tiles32_masked,
            off_binaries,
            hdr_bitmaps,
            hdr_masked,
            hdr_sprites,
        })
    }
}
