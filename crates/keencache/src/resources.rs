//! Parsers for the index and header files that locate chunks in the asset
//! data files.

use std::fmt::Display;

pub mod audio_head;
pub mod chunk_index;
pub mod gfx_info;
pub mod map_head;
pub mod picture_table;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Graphics,
    Map,
    Audio,
}

impl Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AssetKind::Graphics => "graphics",
            AssetKind::Map => "map",
            AssetKind::Audio => "audio",
        };
        f.write_str(name)
    }
}

/// A chunk whose byte range cannot be worked out from its index files.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("No end boundary follows {kind} chunk {chunk}")]
    NoEndBoundary { kind: AssetKind, chunk: usize },
    #[error("{kind} chunk {chunk} spans {start}..{end}, which is not a valid range")]
    InvalidSpan {
        kind: AssetKind,
        chunk: usize,
        start: u32,
        end: u32,
    },
    #[error("Graphics info field {field} is {value}, beyond the {count} chunks in the header")]
    InfoOutOfRange {
        field: &'static str,
        value: u16,
        count: usize,
    },
}
