//! Picture size tables, stored in the header chunks named by the info file.

use crate::utils::mem_reader::{self, MemReader, Parse, SliceMemReader};

/// Width in bytes (eight pixels each) and height in rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PictureSize {
    width: u16,
    height: u16,
}

impl PictureSize {
    #[must_use]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u16 {
        self.height
    }
}

impl Parse for PictureSize {
    fn parse<M: MemReader>(reader: &mut M) -> mem_reader::Result<Self> {
        let width = reader.read_u16_le()?;
        let height = reader.read_u16_le()?;
        Ok(PictureSize { width, height })
    }
}

/// Parses every whole entry in a decoded picture table chunk.
pub fn parse_picture_table(data: &[u8]) -> mem_reader::Result<Vec<PictureSize>> {
    let mut reader = SliceMemReader::new(data);
    let mut sizes = Vec::with_capacity(data.len() / 4);
    while reader.remaining() >= 4 {
        sizes.push(PictureSize::parse(&mut reader)?);
    }
    Ok(sizes)
}
