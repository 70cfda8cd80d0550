//! Builders for synthetic asset files, encoded with the test dictionaries.

use std::{io::Cursor, path::Path};

use crate::{
    cache::{AudioCache, GraphicsCache, MapCache, SoundLayout},
    compression::{huffman::HuffmanDictionary, rlew},
    config::CacheConfig,
    errors::CacheError,
    resources::{
        audio_head::AudioIndex, chunk_index::ChunkIndex, gfx_info::GfxInfo, map_head::MapHead,
    },
    utils::data_file::DataFile,
};

use super::{balanced_dictionary, carmack_encode, huffman_encode, words_to_bytes};

fn dictionary_bytes(dict: &HuffmanDictionary) -> Vec<u8> {
    dict.nodes()
        .iter()
        .flat_map(|node| [node.bit_0(), node.bit_1()])
        .flat_map(u16::to_le_bytes)
        .collect()
}

fn push_offset(head: &mut Vec<u8>, offset: u32) {
    head.extend_from_slice(&offset.to_le_bytes()[..3]);
}

fn memory_file(name: &str, data: &[u8]) -> DataFile {
    DataFile::from_reader(name, Cursor::new(data.to_vec()))
}

enum GraphicsChunk {
    Encoded(Vec<u8>),
    Raw(Vec<u8>),
    Sparse,
}

pub(crate) struct GraphicsBuilder {
    info: [u16; 23],
    chunks: Vec<GraphicsChunk>,
}

pub(crate) struct GraphicsAssets {
    pub(crate) dictionary: Vec<u8>,
    pub(crate) head: Vec<u8>,
    pub(crate) info: Vec<u8>,
    pub(crate) data: Vec<u8>,
}

impl GraphicsBuilder {
    /// With all tile offsets at zero, every chunk carries a length prefix.
    pub(crate) fn new() -> Self {
        GraphicsBuilder {
            info: [0; 23],
            chunks: Vec::new(),
        }
    }

    pub(crate) fn chunk(mut self, data: &[u8]) -> Self {
        self.chunks.push(GraphicsChunk::Encoded(data.to_vec()));
        self
    }

    /// A chunk stored exactly as given.
    pub(crate) fn raw_chunk(mut self, data: &[u8]) -> Self {
        self.chunks.push(GraphicsChunk::Raw(data.to_vec()));
        self
    }

    pub(crate) fn sparse(mut self) -> Self {
        self.chunks.push(GraphicsChunk::Sparse);
        self
    }

    /// Makes chunks `first..end` 16×16 tiles.
    pub(crate) fn tile16_range(mut self, first: u16, end: u16) -> Self {
        self.info[13..16].fill(first);
        self.info[16..20].fill(end);
        self
    }

    pub(crate) fn headers(mut self, bitmaps: u16, masked: u16, sprites: u16) -> Self {
        self.info[20..23].copy_from_slice(&[bitmaps, masked, sprites]);
        self
    }

    pub(crate) fn build(self) -> GraphicsAssets {
        let dict = balanced_dictionary();
        let info: Vec<u8> = self.info.iter().flat_map(|v| v.to_le_bytes()).collect();
        let parsed_info = GfxInfo::from_bytes(&info).unwrap();

        let mut head = Vec::new();
        let mut data = Vec::new();
        for (id, chunk) in self.chunks.iter().enumerate() {
            let start = u32::try_from(data.len()).unwrap();
            match chunk {
                GraphicsChunk::Encoded(content) => {
                    push_offset(&mut head, start);
                    if parsed_info.has_length_prefix(id) {
                        let length = u32::try_from(content.len()).unwrap();
                        data.extend_from_slice(&length.to_le_bytes());
                    }
                    data.extend(huffman_encode(&dict, content));
                }
                GraphicsChunk::Raw(content) => {
                    push_offset(&mut head, start);
                    data.extend_from_slice(content);
                }
                GraphicsChunk::Sparse => push_offset(&mut head, 0x00FF_FFFF),
            }
        }
        push_offset(&mut head, u32::try_from(data.len()).unwrap());

        GraphicsAssets {
            dictionary: dictionary_bytes(&dict),
            head,
            info,
            data,
        }
    }
}

impl GraphicsAssets {
    pub(crate) fn try_into_cache(self) -> Result<GraphicsCache, CacheError> {
        GraphicsCache::new(
            HuffmanDictionary::from_bytes(&self.dictionary).unwrap(),
            ChunkIndex::from_bytes(&self.head).unwrap(),
            GfxInfo::from_bytes(&self.info).unwrap(),
            memory_file("graphics", &self.data),
        )
    }

    pub(crate) fn into_cache(self) -> GraphicsCache {
        self.try_into_cache().unwrap()
    }
}

#[derive(Clone)]
pub(crate) struct TestMap {
    name: String,
    width: u16,
    height: u16,
    planes: Vec<Vec<u16>>,
}

impl TestMap {
    /// A map whose tile at `(x, y)` on plane `p` is `p * 1000 + y * width + x`.
    pub(crate) fn numbered(name: &str, width: u16, height: u16, plane_count: u16) -> Self {
        let planes = (0..plane_count)
            .map(|p| {
                (0..width * height)
                    .map(|i| p * 1000 + i)
                    .collect::<Vec<u16>>()
            })
            .collect();
        TestMap {
            name: name.to_string(),
            width,
            height,
            planes,
        }
    }

    /// A 64x64 two-plane map whose planes compress into both kinds of
    /// back-reference.
    ///
    /// Plane 0 is made of eight-tile runs that cycle every five rows, including
    /// tiles that collide with the Carmack tags. Plane 1 has no runs and
    /// repeats every eight rows, too far back for a near reference.
    pub(crate) fn patterned(name: &str) -> Self {
        const CYCLE: [u16; 5] = [0xA700, 0x0001, 0xA812, 0x0003, 0x0004];
        let runs = (0..64 * 64)
            .map(|i| CYCLE[(i % 64 / 8 + i / 64) % 5])
            .collect();
        let rows = (0..64 * 64)
            .map(|i| 2000 + u16::try_from(i % 512).unwrap())
            .collect();
        TestMap {
            name: name.to_string(),
            width: 64,
            height: 64,
            planes: vec![runs, rows],
        }
    }

    /// A map whose header claims `width` by `height` tiles but whose planes
    /// hold nothing.
    pub(crate) fn oversized(name: &str, width: u16, height: u16, plane_count: usize) -> Self {
        TestMap {
            name: name.to_string(),
            width,
            height,
            planes: vec![Vec::new(); plane_count],
        }
    }

    pub(crate) fn tile(&self, plane: usize, x: usize, y: usize) -> u16 {
        self.planes[plane][y * usize::from(self.width) + x]
    }

    pub(crate) fn filled(name: &str, width: u16, height: u16, tiles: &[u16]) -> Self {
        let size = usize::from(width) * usize::from(height);
        TestMap {
            name: name.to_string(),
            width,
            height,
            planes: tiles.iter().map(|&tile| vec![tile; size]).collect(),
        }
    }
}

pub(crate) struct MapBuilder {
    rlew_tag: u16,
    maps: Vec<Option<TestMap>>,
    tile_info: Vec<u8>,
}

pub(crate) struct MapAssets {
    pub(crate) head: Vec<u8>,
    pub(crate) data: Vec<u8>,
    pub(crate) tile_info: Vec<u8>,
}

/// Encodes a plane the way the map editor does: RLEW with the plane size in
/// front, then Carmack with the RLEW size in front.
fn encode_plane(words: &[u16], rlew_tag: u16) -> Vec<u8> {
    let mut rlew_stream = vec![u16::try_from(words.len() * 2).unwrap()];
    rlew_stream.extend(rlew::compress(words, rlew_tag));
    let mut out = u16::try_from(rlew_stream.len() * 2)
        .unwrap()
        .to_le_bytes()
        .to_vec();
    out.extend(carmack_encode(&rlew_stream));
    out
}

impl MapBuilder {
    pub(crate) fn new(rlew_tag: u16) -> Self {
        MapBuilder {
            rlew_tag,
            maps: Vec::new(),
            tile_info: vec![0; 8],
        }
    }

    pub(crate) fn map(mut self, map: TestMap) -> Self {
        self.maps.push(Some(map));
        self
    }

    pub(crate) fn missing(mut self) -> Self {
        self.maps.push(None);
        self
    }

    pub(crate) fn build(self) -> MapAssets {
        let mut head = self.rlew_tag.to_le_bytes().to_vec();
        let mut data = b"TED5v1.0".to_vec();
        for map in &self.maps {
            let Some(map) = map else {
                head.extend_from_slice(&0u32.to_le_bytes());
                continue;
            };
            let mut starts = Vec::new();
            let mut lengths = Vec::new();
            for plane in &map.planes {
                let encoded = encode_plane(plane, self.rlew_tag);
                starts.push(u32::try_from(data.len()).unwrap());
                lengths.push(u16::try_from(encoded.len()).unwrap());
                data.extend(encoded);
            }
            head.extend_from_slice(&u32::try_from(data.len()).unwrap().to_le_bytes());
            for start in starts {
                data.extend_from_slice(&start.to_le_bytes());
            }
            data.extend(words_to_bytes(&lengths));
            data.extend(words_to_bytes(&[map.width, map.height]));
            let mut name = [0u8; 16];
            name[..map.name.len()].copy_from_slice(map.name.as_bytes());
            data.extend_from_slice(&name);
        }
        MapAssets {
            head,
            data,
            tile_info: self.tile_info,
        }
    }
}

impl MapAssets {
    pub(crate) fn into_cache(self, planes: usize) -> MapCache {
        MapCache::new(
            MapHead::from_bytes(&self.head).unwrap(),
            memory_file("maps", &self.data),
            self.tile_info,
            planes,
        )
    }
}

pub(crate) struct AudioBuilder {
    chunks: Vec<Vec<u8>>,
}

pub(crate) struct AudioAssets {
    pub(crate) dictionary: Vec<u8>,
    pub(crate) head: Vec<u8>,
    pub(crate) data: Vec<u8>,
}

impl AudioBuilder {
    pub(crate) fn new() -> Self {
        AudioBuilder { chunks: Vec::new() }
    }

    /// A Huffman-coded chunk with its length prefix. Empty content gives a
    /// zero-length chunk.
    pub(crate) fn chunk(self, content: &[u8]) -> Self {
        if content.is_empty() {
            return self.raw_chunk(&[]);
        }
        let mut stored = u32::try_from(content.len())
            .unwrap()
            .to_le_bytes()
            .to_vec();
        stored.extend(huffman_encode(&balanced_dictionary(), content));
        self.raw_chunk(&stored)
    }

    pub(crate) fn raw_chunk(mut self, stored: &[u8]) -> Self {
        self.chunks.push(stored.to_vec());
        self
    }

    pub(crate) fn build(self) -> AudioAssets {
        let mut head = Vec::new();
        let mut data = Vec::new();
        for chunk in &self.chunks {
            head.extend_from_slice(&u32::try_from(data.len()).unwrap().to_le_bytes());
            data.extend_from_slice(chunk);
        }
        head.extend_from_slice(&u32::try_from(data.len()).unwrap().to_le_bytes());
        AudioAssets {
            dictionary: dictionary_bytes(&balanced_dictionary()),
            head,
            data,
        }
    }
}

impl AudioAssets {
    pub(crate) fn into_cache(self, scratch_size: usize, layout: SoundLayout) -> AudioCache {
        AudioCache::new(
            HuffmanDictionary::from_bytes(&self.dictionary).unwrap(),
            AudioIndex::from_bytes(&self.head).unwrap(),
            memory_file("audio", &self.data),
            scratch_size,
            layout,
        )
    }
}

/// A full set of asset files for one episode.
pub(crate) struct Episode {
    pub(crate) graphics: GraphicsAssets,
    pub(crate) maps: MapAssets,
    pub(crate) audio: AudioAssets,
}

impl Episode {
    /// Writes every file into `dir` under the names `config` gives them.
    pub(crate) fn write_to(&self, dir: &Path, config: &CacheConfig) {
        let files = [
            (&config.graphics.dictionary, &self.graphics.dictionary),
            (&config.graphics.header, &self.graphics.head),
            (&config.graphics.info, &self.graphics.info),
            (&config.graphics.data, &self.graphics.data),
            (&config.maps.head, &self.maps.head),
            (&config.maps.data, &self.maps.data),
            (&config.maps.tile_info, &self.maps.tile_info),
            (&config.audio.dictionary, &self.audio.dictionary),
            (&config.audio.header, &self.audio.head),
            (&config.audio.data, &self.audio.data),
        ];
        for (name, data) in files {
            std::fs::write(dir.join(config.file_name(name)), data).unwrap();
        }
    }
}
