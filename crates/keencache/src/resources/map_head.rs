//! The map head file and the per-map headers it points at.

use crate::utils::mem_reader::{self, MemReader, Parse, SliceMemReader};

/// Length of the NUL-padded map name.
pub const MAP_NAME_SIZE: usize = 16;

/// The RLEW tag for map planes plus the offset of every map header in the map
/// data file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapHead {
    rlew_tag: u16,
    header_offsets: Vec<i32>,
}

impl MapHead {
    /// Parses a map head file. The number of maps follows from the file length;
    /// a trailing partial entry is ignored.
    pub fn from_bytes(data: &[u8]) -> mem_reader::Result<Self> {
        Self::parse(&mut SliceMemReader::new(data))
    }

    #[must_use]
    pub fn rlew_tag(&self) -> u16 {
        self.rlew_tag
    }

    #[must_use]
    pub fn map_count(&self) -> usize {
        self.header_offsets.len()
    }

    /// The header offset of `map`, or `None` if the map is unknown or has no
    /// header.
    #[must_use]
    pub fn header_offset(&self, map: usize) -> Option<u32> {
        let offset = *self.header_offsets.get(map)?;
        u32::try_from(offset).ok().filter(|&offset| offset > 0)
    }
}

impl Parse for MapHead {
    fn parse<M: MemReader>(reader: &mut M) -> mem_reader::Result<Self> {
        let rlew_tag = reader.read_u16_le()?;
        let mut header_offsets = Vec::with_capacity(reader.remaining() / 4);
        while reader.remaining() >= 4 {
            header_offsets.push(reader.read_i32_le()?);
        }
        Ok(MapHead {
            rlew_tag,
            header_offsets,
        })
    }
}

/// A map's dimensions, name, and where each of its planes is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapHeader {
    plane_starts: Vec<u32>,
    plane_lengths: Vec<u16>,
    width: u16,
    height: u16,
    name: [u8; MAP_NAME_SIZE],
}

impl MapHeader {
    /// Size of a header with `planes` planes.
    #[must_use]
    pub fn size(planes: usize) -> usize {
        planes * 6 + 4 + MAP_NAME_SIZE
    }

    pub fn parse_with_planes<M: MemReader>(
        reader: &mut M,
        planes: usize,
    ) -> mem_reader::Result<Self> {
        let plane_starts = (0..planes)
            .map(|_| reader.read_u32_le())
            .collect::<mem_reader::Result<Vec<_>>>()?;
        let plane_lengths = (0..planes)
            .map(|_| reader.read_u16_le())
            .collect::<mem_reader::Result<Vec<_>>>()?;
        let width = reader.read_u16_le()?;
        let height = reader.read_u16_le()?;
        let mut name = [0u8; MAP_NAME_SIZE];
        reader.read_exact(&mut name)?;
        Ok(MapHeader {
            plane_starts,
            plane_lengths,
            width,
            height,
            name,
        })
    }

    pub fn from_bytes(data: &[u8], planes: usize) -> mem_reader::Result<Self> {
        Self::parse_with_planes(&mut SliceMemReader::new(data), planes)
    }

    #[must_use]
    pub fn plane_count(&self) -> usize {
        self.plane_starts.len()
    }

    #[must_use]
    pub fn plane_start(&self, plane: usize) -> Option<u32> {
        self.plane_starts.get(plane).copied()
    }

    #[must_use]
    pub fn plane_length(&self, plane: usize) -> Option<u16> {
        self.plane_lengths.get(plane).copied()
    }

    #[must_use]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Bytes in one expanded plane.
    #[must_use]
    pub fn plane_size(&self) -> usize {
        usize::from(self.width) * usize::from(self.height) * 2
    }

    /// The map name up to the first NUL.
    #[must_use]
    pub fn name(&self) -> String {
        let end = self
            .name
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(MAP_NAME_SIZE);
        String::from_utf8_lossy(&self.name[..end]).into_owned()
    }
}
