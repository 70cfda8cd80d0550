//! Cache manager for the graphics, map and audio files of id-engine era
//! tile games.
//!
//! Assets are stored compressed on disk: graphics and sounds with a Huffman
//! coder driven by an external dictionary, maps with "Carmack" back-reference
//! compression layered over RLEW run-length encoding. This crate reads the
//! chunk indexes for those files, decodes chunks on demand, and keeps the
//! decoded buffers in a purgeable memory pool whose retention is driven by a
//! nested stack of resource levels.

pub mod cache;
pub mod compression;
pub mod config;
pub mod errors;
pub mod pool;
pub mod resources;
pub mod utils;

#[cfg(test)]
mod testing;

pub use cache::{CacheManager, ChunkState, SoundMode};
pub use config::CacheConfig;
pub use errors::{CacheError, FatalError};
pub use pool::{Allocator, Handle, MemoryPool, PurgeLevel};
