//! File names and layout constants for one game episode.
//!
//! Every field has a default matching Keen 5, so an empty TOML document is a
//! valid config:
//!
//! ```toml
//! extension = "CK4"
//!
//! [audio]
//! sound-count = 52
//! adlib-sounds-start = 104
//! ```

use std::{io, path::Path};

use serde::{Deserialize, Serialize};

use crate::{pool::DEFAULT_CAPACITY, utils::files::adjust_extension};

fn default_extension() -> String {
    "CK5".to_string()
}

fn default_pool_capacity() -> usize {
    DEFAULT_CAPACITY
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default)]
pub struct GraphicsConfig {
    pub dictionary: String,
    pub header: String,
    pub info: String,
    pub data: String,
    /// Chunks cached at startup after the picture and sprite tables.
    pub startup_chunks: Vec<usize>,
}

impl Default for GraphicsConfig {
    fn default() -> Self {
        GraphicsConfig {
            dictionary: "EGADICT.CK5".to_string(),
            header: "EGAHEAD.CK5".to_string(),
            info: "GFXINFOE.CK5".to_string(),
            data: "EGAGRAPH.CK5".to_string(),
            // The status window and the main font.
            startup_chunks: vec![88, 3],
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default)]
pub struct MapsConfig {
    pub head: String,
    pub data: String,
    pub tile_info: String,
    pub planes: usize,
}

impl Default for MapsConfig {
    fn default() -> Self {
        MapsConfig {
            head: "MAPHEAD.CK5".to_string(),
            data: "GAMEMAPS.CK5".to_string(),
            tile_info: "TILEINFO.CK5".to_string(),
            planes: 3,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default)]
pub struct AudioConfig {
    pub dictionary: String,
    pub header: String,
    pub data: String,
    /// Chunks up to this size are read into a reusable buffer instead of a
    /// temporary allocation.
    pub scratch_buffer_size: usize,
    pub pc_sounds_start: usize,
    pub adlib_sounds_start: usize,
    pub sound_count: usize,
}

impl Default for AudioConfig {
    fn default() -> Self {
        AudioConfig {
            dictionary: "AUDIODCT.CK5".to_string(),
            header: "AUDIOHED.CK5".to_string(),
            data: "AUDIO.CK5".to_string(),
            scratch_buffer_size: 4096,
            pc_sounds_start: 0,
            adlib_sounds_start: 64,
            sound_count: 64,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct CacheConfig {
    /// Episode extension that replaces the last three characters of every
    /// file name.
    #[serde(default = "default_extension")]
    pub extension: String,
    #[serde(default)]
    pub graphics: GraphicsConfig,
    #[serde(default)]
    pub maps: MapsConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    /// Bytes available to the memory pool.
    #[serde(default = "default_pool_capacity")]
    pub pool_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            extension: default_extension(),
            graphics: GraphicsConfig::default(),
            maps: MapsConfig::default(),
            audio: AudioConfig::default(),
            pool_capacity: default_pool_capacity(),
        }
    }
}

impl CacheConfig {
    /// Reads a TOML config file. Syntax and schema errors are reported as
    /// [`io::ErrorKind::InvalidData`].
    pub fn read(path: &Path) -> io::Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_toml(&data)
    }

    pub fn from_toml(data: &str) -> io::Result<Self> {
        toml::from_str(data).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// The on-disk name for `name` under this episode's extension.
    #[must_use]
    pub fn file_name(&self, name: &str) -> String {
        adjust_extension(name, &self.extension)
    }
}
