//! The audio cache: Huffman-coded sound chunks and the sound mode switch.

use std::path::Path;

use crate::{
    compression::huffman::HuffmanDictionary,
    config::{AudioConfig, CacheConfig},
    errors::{CacheError, FatalError},
    pool::{Allocator, Handle, PoolError, PurgeLevel},
    resources::{AssetKind, audio_head::AudioIndex},
    utils::{data_file::DataFile, files::load_file},
};

use super::{ChunkState, expand_prefixed, state_of};

/// Which device's sound chunks are loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SoundMode {
    #[default]
    Off,
    PcSpeaker,
    AdLib,
}

/// Where each device's sounds start in the audio chunk list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoundLayout {
    pub pc_start: usize,
    pub adlib_start: usize,
    pub count: usize,
}

impl SoundLayout {
    fn range(&self, mode: SoundMode) -> std::ops::Range<usize> {
        let start = match mode {
            SoundMode::Off => return 0..0,
            SoundMode::PcSpeaker => self.pc_start,
            SoundMode::AdLib => self.adlib_start,
        };
        start..start + self.count
    }
}

impl From<&AudioConfig> for SoundLayout {
    fn from(config: &AudioConfig) -> Self {
        SoundLayout {
            pc_start: config.pc_sounds_start,
            adlib_start: config.adlib_sounds_start,
            count: config.sound_count,
        }
    }
}

#[derive(Debug)]
pub struct AudioCache {
    dictionary: HuffmanDictionary,
    index: AudioIndex,
    data: DataFile,
    chunks: Vec<Option<Handle>>,
    scratch: Vec<u8>,
    layout: SoundLayout,
    mode: SoundMode,
}

impl AudioCache {
    #[must_use]
    pub fn new(
        dictionary: HuffmanDictionary,
        index: AudioIndex,
        data: DataFile,
        scratch_size: usize,
        layout: SoundLayout,
    ) -> Self {
        let chunk_count = index.chunk_count();
        AudioCache {
            dictionary,
            index,
            data,
            chunks: vec![None; chunk_count],
            scratch: vec![0; scratch_size],
            layout,
            mode: SoundMode::Off,
        }
    }

    /// Loads the audio dictionary and head files and opens the audio data file
    /// in `dir`. A missing data file is fatal.
    pub fn open(dir: &Path, config: &CacheConfig) -> Result<Self, CacheError> {
        let names = &config.audio;
        let path = |name: &str| dir.join(config.file_name(name));
        let dictionary = HuffmanDictionary::from_bytes(&load_file(&path(&names.dictionary))?)?;
        let index = AudioIndex::from_bytes(&load_file(&path(&names.header))?)?;
        let data_path = path(&names.data);
        let data = DataFile::open(&data_path).map_err(|source| FatalError::MissingAudioFile {
            path: data_path.clone(),
            source,
        })?;
        log::debug!(
            "Opened {} with {} audio chunks",
            data.name(),
            index.chunk_count()
        );
        Ok(Self::new(
            dictionary,
            index,
            data,
            names.scratch_buffer_size,
            SoundLayout::from(names),
        ))
    }

    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    #[must_use]
    pub fn sound_mode(&self) -> SoundMode {
        self.mode
    }

    fn resident<A: Allocator>(&self, pool: &A, chunk: usize) -> Option<Handle> {
        self.chunks
            .get(chunk)
            .copied()
            .flatten()
            .filter(|&handle| pool.is_resident(handle))
    }

    /// Reads the stored bytes of a chunk, through the scratch buffer when they
    /// fit and a temporary pool block otherwise.
    fn read_and_expand<A: Allocator>(
        &mut self,
        pool: &mut A,
        start: u32,
        length: usize,
    ) -> Result<Vec<u8>, CacheError> {
        if length <= self.scratch.len() {
            let source = &mut self.scratch[..length];
            self.data.read_at(u64::from(start), source)?;
            return expand_prefixed(&self.dictionary, source);
        }

        let temp = pool.allocate(length)?;
        let result = match pool.get_mut(temp) {
            Some(source) => self
                .data
                .read_at(u64::from(start), source)
                .map_err(CacheError::from)
                .and_then(|()| expand_prefixed(&self.dictionary, source)),
            None => Err(PoolError::StaleHandle.into()),
        };
        pool.free(temp);
        result
    }

    /// Makes `chunk` resident and locked, loading it if needed.
    pub fn cache_audio_chunk<A: Allocator>(
        &mut self,
        pool: &mut A,
        chunk: usize,
    ) -> Result<(), CacheError> {
        if chunk >= self.chunks.len() {
            return Err(CacheError::ChunkOutOfRange {
                kind: AssetKind::Audio,
                id: chunk,
                count: self.chunks.len(),
            });
        }
        if let Some(handle) = self.resident(pool, chunk) {
            pool.set_purge(handle, PurgeLevel::LOCKED);
            return Ok(());
        }

        let Some((start, length)) = self.index.span(chunk)? else {
            return Ok(());
        };
        let expanded = if length == 0 {
            Vec::new()
        } else {
            self.read_and_expand(pool, start, length as usize)?
        };
        log::debug!(
            "Decoded audio chunk {chunk}: {} bytes from {length}",
            expanded.len()
        );
        self.chunks[chunk] = Some(pool.allocate_from(expanded)?);
        Ok(())
    }

    /// Switches to `mode`, demoting the previous mode's sounds and caching
    /// the new mode's.
    pub fn load_all_sounds<A: Allocator>(
        &mut self,
        pool: &mut A,
        mode: SoundMode,
    ) -> Result<(), CacheError> {
        for chunk in self.layout.range(self.mode) {
            if let Some(handle) = self.resident(pool, chunk) {
                pool.set_purge(handle, PurgeLevel::PURGEABLE);
            }
        }
        log::debug!("Sound mode {:?} -> {mode:?}", self.mode);
        self.mode = mode;
        for chunk in self.layout.range(mode) {
            self.cache_audio_chunk(pool, chunk)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn sound<'p, A: Allocator>(&self, pool: &'p A, chunk: usize) -> Option<&'p [u8]> {
        pool.get(self.chunks.get(chunk).copied().flatten()?)
    }

    #[must_use]
    pub fn chunk_state<A: Allocator>(&self, pool: &A, chunk: usize) -> ChunkState {
        state_of(pool, self.chunks.get(chunk).copied().flatten())
    }
}
