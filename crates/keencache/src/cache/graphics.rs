//! The graphics cache: Huffman-coded chunks kept in the pool according to the
//! resource level marks.

use std::path::Path;

use crate::{
    compression::huffman::HuffmanDictionary,
    config::CacheConfig,
    errors::CacheError,
    pool::{Allocator, Handle, PurgeLevel},
    resources::{
        AssetKind,
        chunk_index::ChunkIndex,
        gfx_info::GfxInfo,
        picture_table::{PictureSize, parse_picture_table},
    },
    utils::{data_file::DataFile, files::load_file},
};

use super::{ChunkState, expand_prefixed, levels::ResourceLevels, state_of};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphicsStats {
    /// Chunks read and decoded from the data file.
    pub chunks_decoded: usize,
    /// Requests for chunks with no data.
    pub sparse_requests: usize,
}

#[derive(Debug)]
pub struct GraphicsCache {
    dictionary: HuffmanDictionary,
    index: ChunkIndex,
    info: GfxInfo,
    data: DataFile,
    chunks: Vec<Option<Handle>>,
    levels: ResourceLevels,
    stats: GraphicsStats,
}

impl GraphicsCache {
    /// Builds the cache, rejecting info that points past the chunk index.
    pub fn new(
        dictionary: HuffmanDictionary,
        index: ChunkIndex,
        info: GfxInfo,
        data: DataFile,
    ) -> Result<Self, CacheError> {
        let chunk_count = index.chunk_count();
        info.validate(chunk_count)?;
        Ok(GraphicsCache {
            dictionary,
            index,
            info,
            data,
            chunks: vec![None; chunk_count],
            levels: ResourceLevels::new(chunk_count),
            stats: GraphicsStats::default(),
        })
    }

    /// Loads the dictionary, head and info files and opens the data file in
    /// `dir`.
    pub fn open(dir: &Path, config: &CacheConfig) -> Result<Self, CacheError> {
        let names = &config.graphics;
        let path = |name: &str| dir.join(config.file_name(name));
        let dictionary = HuffmanDictionary::from_bytes(&load_file(&path(&names.dictionary))?)?;
        let index = ChunkIndex::from_bytes(&load_file(&path(&names.header))?)?;
        let info = GfxInfo::from_bytes(&load_file(&path(&names.info))?)?;
        let data = DataFile::open(&path(&names.data))?;
        log::debug!(
            "Opened {} with {} graphics chunks",
            data.name(),
            index.chunk_count()
        );
        Self::new(dictionary, index, info, data)
    }

    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    #[must_use]
    pub fn info(&self) -> &GfxInfo {
        &self.info
    }

    #[must_use]
    pub fn index(&self) -> &ChunkIndex {
        &self.index
    }

    #[must_use]
    pub fn stats(&self) -> GraphicsStats {
        self.stats
    }

    #[must_use]
    pub fn level(&self) -> usize {
        self.levels.depth()
    }

    fn check_range(&self, chunk: usize) -> Result<(), CacheError> {
        if chunk >= self.chunks.len() {
            return Err(CacheError::ChunkOutOfRange {
                kind: AssetKind::Graphics,
                id: chunk,
                count: self.chunks.len(),
            });
        }
        Ok(())
    }

    fn resident<A: Allocator>(&self, pool: &A, chunk: usize) -> Option<Handle> {
        self.chunks
            .get(chunk)
            .copied()
            .flatten()
            .filter(|&handle| pool.is_resident(handle))
    }

    /// Makes `chunk` resident and locked, loading it if needed.
    ///
    /// Sparse chunks are skipped without error.
    pub fn cache_chunk<A: Allocator>(&mut self, pool: &mut A, chunk: usize) -> Result<(), CacheError> {
        self.check_range(chunk)?;
        if let Some(handle) = self.resident(pool, chunk) {
            log::trace!("Graphics chunk {chunk} already resident");
            pool.set_purge(handle, PurgeLevel::LOCKED);
            return Ok(());
        }

        let Some(span) = self.index.span(chunk, &self.info)? else {
            log::trace!("Graphics chunk {chunk} is sparse, skipping");
            self.stats.sparse_requests += 1;
            return Ok(());
        };
        let raw = self
            .data
            .read_vec_at(u64::from(span.start()), span.read_length() as usize)?;
        let expanded = match self.info.fixed_expanded_length(chunk) {
            Some(length) => self.dictionary.expand(&raw, length as usize)?,
            None => expand_prefixed(&self.dictionary, &raw)?,
        };
        log::debug!(
            "Decoded graphics chunk {chunk}: {} bytes from {}",
            expanded.len(),
            span.compressed_length()
        );
        self.chunks[chunk] = Some(pool.allocate_from(expanded)?);
        self.stats.chunks_decoded += 1;
        Ok(())
    }

    /// Marks `chunk` as needed at the current level without loading it.
    pub fn mark_chunk(&mut self, chunk: usize) -> Result<(), CacheError> {
        self.check_range(chunk)?;
        self.levels.mark(chunk);
        Ok(())
    }

    pub fn clear_marks(&mut self) {
        self.levels.clear();
    }

    /// Locks every chunk needed at the current level, loading the absent
    /// ones, and demotes every other resident chunk to purgeable.
    ///
    /// Returns the number of chunks loaded.
    pub fn cache_marks<A: Allocator>(&mut self, pool: &mut A) -> Result<usize, CacheError> {
        let mut to_load = Vec::new();
        for chunk in 0..self.chunks.len() {
            let resident = self.resident(pool, chunk);
            match (self.levels.is_needed(chunk), resident) {
                (true, Some(handle)) => pool.set_purge(handle, PurgeLevel::LOCKED),
                (true, None) => to_load.push(chunk),
                (false, Some(handle)) => pool.set_purge(handle, PurgeLevel::PURGEABLE),
                (false, None) => {}
            }
        }
        if to_load.is_empty() {
            return Ok(0);
        }

        let decoded_before = self.stats.chunks_decoded;
        for &chunk in &to_load {
            self.cache_chunk(pool, chunk)?;
        }
        let loaded = self.stats.chunks_decoded - decoded_before;
        log::debug!(
            "Cached {loaded} of {} marked graphics chunks at level {}",
            to_load.len(),
            self.levels.depth()
        );
        Ok(loaded)
    }

    pub fn up_level(&mut self) -> Result<(), CacheError> {
        Ok(self.levels.raise()?)
    }

    /// Returns to the enclosing level and re-applies its marks.
    pub fn down_level<A: Allocator>(&mut self, pool: &mut A) -> Result<(), CacheError> {
        self.levels.lower()?;
        self.cache_marks(pool)?;
        Ok(())
    }

    /// Demotes every resident chunk to purgeable.
    pub fn set_all_purgeable<A: Allocator>(&mut self, pool: &mut A) {
        for handle in self.chunks.iter().flatten() {
            pool.set_purge(*handle, PurgeLevel::PURGEABLE);
        }
    }

    /// The decoded bytes of `chunk` if it is resident.
    #[must_use]
    pub fn chunk<'p, A: Allocator>(&self, pool: &'p A, chunk: usize) -> Option<&'p [u8]> {
        pool.get(self.chunks.get(chunk).copied().flatten()?)
    }

    #[must_use]
    pub fn chunk_state<A: Allocator>(&self, pool: &A, chunk: usize) -> ChunkState {
        state_of(pool, self.chunks.get(chunk).copied().flatten())
    }

    /// Caches a picture table chunk and parses its entries.
    pub fn picture_sizes<A: Allocator>(
        &mut self,
        pool: &mut A,
        header_chunk: usize,
    ) -> Result<Vec<PictureSize>, CacheError> {
        self.cache_chunk(pool, header_chunk)?;
        match self.chunk(pool, header_chunk) {
            Some(data) => Ok(parse_picture_table(data)?),
            None => Ok(Vec::new()),
        }
    }
}
