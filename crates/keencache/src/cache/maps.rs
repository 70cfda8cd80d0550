//! The map cache: one map's planes at a time, expanded through Carmack and
//! RLEW.

use std::path::Path;

use crate::{
    compression::{carmack, rlew},
    config::CacheConfig,
    errors::{CacheError, FatalError},
    pool::{Allocator, Handle, PoolError},
    resources::map_head::{MapHead, MapHeader},
    utils::{
        byte_order::{read_u16, words_from_le_bytes, write_words_le},
        data_file::DataFile,
        files::load_file,
        mem_reader::{MemReader, SliceMemReader},
    },
};

#[derive(Debug)]
pub struct MapCache {
    head: MapHead,
    data: DataFile,
    tile_info: Vec<u8>,
    plane_count: usize,
    headers: Vec<Option<MapHeader>>,
    planes: Vec<Handle>,
    current: Option<usize>,
}

impl MapCache {
    #[must_use]
    pub fn new(head: MapHead, data: DataFile, tile_info: Vec<u8>, plane_count: usize) -> Self {
        let map_count = head.map_count();
        MapCache {
            head,
            data,
            tile_info,
            plane_count,
            headers: vec![None; map_count],
            planes: Vec::new(),
            current: None,
        }
    }

    /// Loads the map head and tile info files and opens the map data file in
    /// `dir`.
    pub fn open(dir: &Path, config: &CacheConfig) -> Result<Self, CacheError> {
        let names = &config.maps;
        let path = |name: &str| dir.join(config.file_name(name));
        let head = MapHead::from_bytes(&load_file(&path(&names.head))?)?;
        let data = DataFile::open(&path(&names.data))?;
        let tile_info = load_file(&path(&names.tile_info))?;
        if tile_info.is_empty() {
            log::warn!("Tile info file {} is empty", names.tile_info);
        }
        log::debug!("Opened {} with {} map slots", data.name(), head.map_count());
        Ok(Self::new(head, data, tile_info, names.planes))
    }

    #[must_use]
    pub fn map_count(&self) -> usize {
        self.head.map_count()
    }

    #[must_use]
    pub fn rlew_tag(&self) -> u16 {
        self.head.rlew_tag()
    }

    #[must_use]
    pub fn tile_info(&self) -> &[u8] {
        &self.tile_info
    }

    #[must_use]
    pub fn plane_count(&self) -> usize {
        self.plane_count
    }

    #[must_use]
    pub fn current_map(&self) -> Option<usize> {
        self.current
    }

    fn current_header(&self) -> Option<&MapHeader> {
        self.headers.get(self.current?)?.as_ref()
    }

    #[must_use]
    pub fn width(&self) -> Option<u16> {
        self.current_header().map(MapHeader::width)
    }

    #[must_use]
    pub fn height(&self) -> Option<u16> {
        self.current_header().map(MapHeader::height)
    }

    #[must_use]
    pub fn map_name(&self) -> Option<String> {
        self.current_header().map(MapHeader::name)
    }

    /// Reads the header of `map`, keeping it for later loads.
    fn load_header(&mut self, map: usize) -> Result<MapHeader, CacheError> {
        let Some(offset) = self.head.header_offset(map) else {
            return Err(FatalError::NoSuchMap { map }.into());
        };
        if let Some(header) = &self.headers[map] {
            return Ok(header.clone());
        }
        let raw = self
            .data
            .read_vec_at(u64::from(offset), MapHeader::size(self.plane_count))?;
        let header = MapHeader::from_bytes(&raw, self.plane_count)?;
        log::debug!(
            "Read header for map {map} \"{}\" ({}x{})",
            header.name(),
            header.width(),
            header.height()
        );
        self.headers[map] = Some(header.clone());
        Ok(header)
    }

    fn free_planes<A: Allocator>(&mut self, pool: &mut A) {
        for handle in self.planes.drain(..) {
            pool.free(handle);
        }
        self.current = None;
    }

    /// Makes `map` the current map, replacing the planes of any previous one.
    ///
    /// A map with no header is fatal.
    pub fn cache_map<A: Allocator>(&mut self, pool: &mut A, map: usize) -> Result<(), CacheError> {
        self.free_planes(pool);
        let header = self.load_header(map)?;

        let mut planes = Vec::with_capacity(self.plane_count);
        for plane in 0..self.plane_count {
            match self.load_plane(pool, &header, plane) {
                Ok(handle) => planes.push(handle),
                Err(e) => {
                    for handle in planes {
                        pool.free(handle);
                    }
                    return Err(e);
                }
            }
        }
        self.planes = planes;
        self.current = Some(map);
        log::debug!("Cached map {map} \"{}\"", header.name());
        Ok(())
    }

    fn load_plane<A: Allocator>(
        &mut self,
        pool: &mut A,
        header: &MapHeader,
        plane: usize,
    ) -> Result<Handle, CacheError> {
        let handle = pool.allocate(header.plane_size())?;
        let words = match self.expand_plane(header, plane) {
            Ok(words) => words,
            Err(e) => {
                pool.free(handle);
                return Err(e);
            }
        };
        let Some(dest) = pool.get_mut(handle) else {
            pool.free(handle);
            return Err(PoolError::StaleHandle.into());
        };
        write_words_le(&words, dest);
        Ok(handle)
    }

    fn expand_plane(&mut self, header: &MapHeader, plane: usize) -> Result<Vec<u16>, CacheError> {
        let start = header.plane_start(plane).unwrap_or_default();
        let length = header.plane_length(plane).unwrap_or_default();
        let compressed = self
            .data
            .read_vec_at(u64::from(start), usize::from(length))?;

        let mut reader = SliceMemReader::new(&compressed);
        let carmack_length = reader.read_u16_le()?;
        let intermediate =
            carmack::expand(&compressed[reader.tell()..], usize::from(carmack_length))?;
        // The intermediate buffer opens with the RLEW expanded length, which
        // always equals the plane size.
        let rlew_source = intermediate.get(1..).unwrap_or_default();
        Ok(rlew::expand(
            rlew_source,
            header.plane_size(),
            self.head.rlew_tag(),
        )?)
    }

    fn tile_offset(&self, x: usize, y: usize, plane: usize) -> Result<(Handle, usize), CacheError> {
        let header = self.current_header().ok_or(CacheError::NoActiveMap)?;
        let width = usize::from(header.width());
        let height = usize::from(header.height());
        match self.planes.get(plane) {
            Some(&handle) if x < width && y < height => Ok((handle, (y * width + x) * 2)),
            _ => Err(CacheError::TileOutOfRange { x, y, plane }),
        }
    }

    /// The tile at `(x, y)` on `plane` of the current map.
    pub fn tile_at<A: Allocator>(
        &self,
        pool: &A,
        x: usize,
        y: usize,
        plane: usize,
    ) -> Result<u16, CacheError> {
        let (handle, offset) = self.tile_offset(x, y, plane)?;
        pool.get(handle)
            .and_then(|data| read_u16(data, offset))
            .ok_or(CacheError::NoActiveMap)
    }

    pub fn set_tile<A: Allocator>(
        &self,
        pool: &mut A,
        x: usize,
        y: usize,
        plane: usize,
        value: u16,
    ) -> Result<(), CacheError> {
        let (handle, offset) = self.tile_offset(x, y, plane)?;
        let data = pool.get_mut(handle).ok_or(CacheError::NoActiveMap)?;
        data[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    /// All tiles of `plane` in row order.
    pub fn plane<A: Allocator>(&self, pool: &A, plane: usize) -> Result<Vec<u16>, CacheError> {
        if self.current_header().is_none() {
            return Err(CacheError::NoActiveMap);
        }
        let handle = self
            .planes
            .get(plane)
            .ok_or(CacheError::TileOutOfRange { x: 0, y: 0, plane })?;
        pool.get(*handle)
            .map(words_from_le_bytes)
            .ok_or(CacheError::NoActiveMap)
    }

    /// Releases the current map's planes.
    pub fn release<A: Allocator>(&mut self, pool: &mut A) {
        self.free_planes(pool);
    }
}
