//! The session-wide cache over all three asset files.

use std::path::Path;

use crate::{
    compression::huffman::HuffmanDictionary,
    config::CacheConfig,
    errors::CacheError,
    pool::{Allocator, Handle, MemoryPool},
    resources::picture_table::PictureSize,
    utils::mem_reader::{MemReader, SliceMemReader},
};

pub mod audio;
pub mod graphics;
pub mod levels;
pub mod maps;

pub use audio::{AudioCache, SoundLayout, SoundMode};
pub use graphics::{GraphicsCache, GraphicsStats};
pub use levels::{MAX_LEVEL, ResourceLevels};
pub use maps::MapCache;

/// Residency of a cached chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkState {
    Absent,
    Locked,
    Purgeable,
}

fn state_of<A: Allocator>(pool: &A, handle: Option<Handle>) -> ChunkState {
    match handle.and_then(|handle| pool.purge_level(handle)) {
        None => ChunkState::Absent,
        Some(level) if level.is_purgeable() => ChunkState::Purgeable,
        Some(_) => ChunkState::Locked,
    }
}

/// Expands a chunk that starts with its four byte expanded length.
fn expand_prefixed(dictionary: &HuffmanDictionary, raw: &[u8]) -> Result<Vec<u8>, CacheError> {
    let mut reader = SliceMemReader::new(raw);
    let exp_length = reader.read_u32_le()?;
    let payload = &raw[reader.tell()..];
    Ok(dictionary.expand(payload, exp_length as usize)?)
}

/// Owns the pool and the three caches for one game session.
#[derive(Debug)]
pub struct CacheManager<A: Allocator = MemoryPool> {
    pool: A,
    graphics: GraphicsCache,
    maps: MapCache,
    audio: AudioCache,
}

impl CacheManager<MemoryPool> {
    /// Opens the asset files in `dir` with a pool of `config.pool_capacity`
    /// bytes.
    pub fn startup(dir: &Path, config: &CacheConfig) -> Result<Self, CacheError> {
        Self::startup_with_pool(dir, config, MemoryPool::with_capacity(config.pool_capacity))
    }
}

impl<A: Allocator> CacheManager<A> {
    /// Opens the asset files in `dir` and caches the picture and sprite tables
    /// along with the configured startup chunks.
    pub fn startup_with_pool(dir: &Path, config: &CacheConfig, pool: A) -> Result<Self, CacheError> {
        log::info!("Starting cache in {}", dir.display());
        let graphics = GraphicsCache::open(dir, config)?;
        let maps = MapCache::open(dir, config)?;
        let audio = AudioCache::open(dir, config)?;
        let mut manager = CacheManager {
            pool,
            graphics,
            maps,
            audio,
        };

        let info = *manager.graphics.info();
        let headers = [info.hdr_bitmaps(), info.hdr_masked(), info.hdr_sprites()];
        for chunk in headers.into_iter().map(usize::from) {
            manager.cache_chunk(chunk)?;
        }
        for &chunk in &config.graphics.startup_chunks {
            manager.cache_chunk(chunk)?;
        }
        Ok(manager)
    }

    /// Closes every file and releases the pool.
    pub fn shutdown(self) -> A {
        log::info!(
            "Shutting down cache after decoding {} graphics chunks",
            self.graphics.stats().chunks_decoded
        );
        self.pool
    }

    pub fn pool(&self) -> &A {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut A {
        &mut self.pool
    }

    pub fn graphics(&self) -> &GraphicsCache {
        &self.graphics
    }

    pub fn maps(&self) -> &MapCache {
        &self.maps
    }

    pub fn audio(&self) -> &AudioCache {
        &self.audio
    }

    // Graphics

    pub fn cache_chunk(&mut self, chunk: usize) -> Result<(), CacheError> {
        self.graphics.cache_chunk(&mut self.pool, chunk)
    }

    pub fn mark_chunk(&mut self, chunk: usize) -> Result<(), CacheError> {
        self.graphics.mark_chunk(chunk)
    }

    pub fn clear_marks(&mut self) {
        self.graphics.clear_marks();
    }

    pub fn cache_marks(&mut self) -> Result<usize, CacheError> {
        self.graphics.cache_marks(&mut self.pool)
    }

    pub fn up_level(&mut self) -> Result<(), CacheError> {
        self.graphics.up_level()
    }

    pub fn down_level(&mut self) -> Result<(), CacheError> {
        self.graphics.down_level(&mut self.pool)
    }

    pub fn set_all_purgeable(&mut self) {
        self.graphics.set_all_purgeable(&mut self.pool);
    }

    pub fn chunk(&self, chunk: usize) -> Option<&[u8]> {
        self.graphics.chunk(&self.pool, chunk)
    }

    pub fn chunk_state(&self, chunk: usize) -> ChunkState {
        self.graphics.chunk_state(&self.pool, chunk)
    }

    pub fn picture_sizes(&mut self, header_chunk: usize) -> Result<Vec<PictureSize>, CacheError> {
        self.graphics.picture_sizes(&mut self.pool, header_chunk)
    }

    // Maps

    pub fn cache_map(&mut self, map: usize) -> Result<(), CacheError> {
        self.maps.cache_map(&mut self.pool, map)
    }

    pub fn tile_at(&self, x: usize, y: usize, plane: usize) -> Result<u16, CacheError> {
        self.maps.tile_at(&self.pool, x, y, plane)
    }

    pub fn set_tile(&mut self, x: usize, y: usize, plane: usize, value: u16) -> Result<(), CacheError> {
        self.maps.set_tile(&mut self.pool, x, y, plane, value)
    }

    pub fn tile_info(&self) -> &[u8] {
        self.maps.tile_info()
    }

    // Audio

    pub fn cache_audio_chunk(&mut self, chunk: usize) -> Result<(), CacheError> {
        self.audio.cache_audio_chunk(&mut self.pool, chunk)
    }

    pub fn load_all_sounds(&mut self, mode: SoundMode) -> Result<(), CacheError> {
        self.audio.load_all_sounds(&mut self.pool, mode)
    }

    pub fn sound(&self, chunk: usize) -> Option<&[u8]> {
        self.audio.sound(&self.pool, chunk)
    }
}
