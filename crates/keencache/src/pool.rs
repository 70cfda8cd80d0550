//! The purgeable memory pool that holds decoded assets.
//!
//! Caches never keep raw references into the pool. They keep a [`Handle`] and
//! resolve it on every access, because the pool may reclaim a purgeable block
//! whenever it needs room. A reclaimed or freed block bumps its slot's
//! generation, so every handle to it stops resolving.

use std::cmp::Reverse;

/// How eagerly a block may be reclaimed. Zero means never.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PurgeLevel(u8);

impl PurgeLevel {
    pub const LOCKED: PurgeLevel = PurgeLevel(0);
    /// The level caches use when demoting a block they no longer need.
    pub const PURGEABLE: PurgeLevel = PurgeLevel(3);

    #[must_use]
    pub const fn new(level: u8) -> Self {
        PurgeLevel(level)
    }

    #[must_use]
    pub fn level(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn is_purgeable(self) -> bool {
        self.0 > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    index: usize,
    generation: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error(
        "Out of memory: requested {requested} bytes with {available} of {capacity} bytes free after purging"
    )]
    OutOfMemory {
        requested: usize,
        available: usize,
        capacity: usize,
    },
    #[error("Pool block was released while still in use")]
    StaleHandle,
}

/// Capacity of [`MemoryPool::default`].
pub const DEFAULT_CAPACITY: usize = 16 * 1024 * 1024;

/// The allocation contract the caches need.
pub trait Allocator {
    /// Allocates a zero-filled, locked block of `size` bytes.
    fn allocate(&mut self, size: usize) -> Result<Handle, PoolError>;

    /// Moves `data` into a new locked block.
    fn allocate_from(&mut self, data: Vec<u8>) -> Result<Handle, PoolError> {
        let handle = self.allocate(data.len())?;
        let Some(block) = self.get_mut(handle) else {
            self.free(handle);
            return Err(PoolError::StaleHandle);
        };
        block.copy_from_slice(&data);
        Ok(handle)
    }

    /// Changes the purge level of a resident block. Stale handles are ignored.
    fn set_purge(&mut self, handle: Handle, level: PurgeLevel);

    /// Releases a block. Stale handles are ignored.
    fn free(&mut self, handle: Handle);

    fn get(&self, handle: Handle) -> Option<&[u8]>;

    fn get_mut(&mut self, handle: Handle) -> Option<&mut [u8]>;

    fn purge_level(&self, handle: Handle) -> Option<PurgeLevel>;

    fn is_resident(&self, handle: Handle) -> bool {
        self.get(handle).is_some()
    }
}

#[derive(Debug)]
struct Block {
    data: Vec<u8>,
    purge: PurgeLevel,
    last_touch: u64,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    block: Option<Block>,
}

/// A bounded pool that reclaims purgeable blocks when an allocation does not
/// fit.
///
/// Victims are chosen by highest purge level first, then least recently
/// allocated or re-leveled.
#[derive(Debug)]
pub struct MemoryPool {
    capacity: usize,
    used: usize,
    slots: Vec<Slot>,
    free_slots: Vec<usize>,
    clock: u64,
}

impl Default for MemoryPool {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl MemoryPool {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        MemoryPool {
            capacity,
            used: 0,
            slots: Vec::new(),
            free_slots: Vec::new(),
            clock: 0,
        }
    }

    /// A pool that never needs to purge.
    #[must_use]
    pub fn unbounded() -> Self {
        Self::with_capacity(usize::MAX)
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes held by live blocks.
    #[must_use]
    pub fn used(&self) -> usize {
        self.used
    }

    #[must_use]
    pub fn live_blocks(&self) -> usize {
        self.slots.iter().filter(|slot| slot.block.is_some()).count()
    }

    /// Reclaims every purgeable block, returning how many were released.
    pub fn purge_all(&mut self) -> usize {
        let victims: Vec<usize> = self
            .slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| {
                slot.block
                    .as_ref()
                    .is_some_and(|block| block.purge.is_purgeable())
            })
            .map(|(index, _)| index)
            .collect();
        for &index in &victims {
            self.release(index);
        }
        if !victims.is_empty() {
            log::debug!("Purged {} blocks", victims.len());
        }
        victims.len()
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn block(&self, handle: Handle) -> Option<&Block> {
        let slot = self.slots.get(handle.index)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.block.as_ref()
    }

    fn block_mut(&mut self, handle: Handle) -> Option<&mut Block> {
        let slot = self.slots.get_mut(handle.index)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.block.as_mut()
    }

    fn release(&mut self, index: usize) {
        let slot = &mut self.slots[index];
        if let Some(block) = slot.block.take() {
            self.used -= block.data.len();
            slot.generation = slot.generation.wrapping_add(1);
            self.free_slots.push(index);
        }
    }

    fn next_victim(&self) -> Option<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| {
                let block = slot.block.as_ref()?;
                block
                    .purge
                    .is_purgeable()
                    .then_some((block.purge, Reverse(block.last_touch), index))
            })
            .max()
            .map(|(_, _, index)| index)
    }

    fn ensure_space(&mut self, size: usize) -> Result<(), PoolError> {
        while self.capacity - self.used < size {
            let Some(victim) = self.next_victim() else {
                return Err(PoolError::OutOfMemory {
                    requested: size,
                    available: self.capacity - self.used,
                    capacity: self.capacity,
                });
            };
            log::trace!("Reclaiming block {victim} to fit {size} bytes");
            self.release(victim);
        }
        Ok(())
    }

    fn insert(&mut self, data: Vec<u8>) -> Result<Handle, PoolError> {
        self.ensure_space(data.len())?;
        let last_touch = self.tick();
        self.used += data.len();
        let block = Block {
            data,
            purge: PurgeLevel::LOCKED,
            last_touch,
        };
        let index = if let Some(index) = self.free_slots.pop() {
            index
        } else {
            self.slots.push(Slot::default());
            self.slots.len() - 1
        };
        let slot = &mut self.slots[index];
        slot.block = Some(block);
        Ok(Handle {
            index,
            generation: slot.generation,
        })
    }
}

impl Allocator for MemoryPool {
    fn allocate(&mut self, size: usize) -> Result<Handle, PoolError> {
        // Check before zero-filling so an impossible request does not allocate.
        self.ensure_space(size)?;
        self.insert(vec![0u8; size])
    }

    fn allocate_from(&mut self, data: Vec<u8>) -> Result<Handle, PoolError> {
        self.insert(data)
    }

    fn set_purge(&mut self, handle: Handle, level: PurgeLevel) {
        let touch = self.tick();
        if let Some(block) = self.block_mut(handle) {
            block.purge = level;
            block.last_touch = touch;
        }
    }

    fn free(&mut self, handle: Handle) {
        if self.block(handle).is_some() {
            self.release(handle.index);
        }
    }

    fn get(&self, handle: Handle) -> Option<&[u8]> {
        self.block(handle).map(|block| &block.data[..])
    }

    fn get_mut(&mut self, handle: Handle) -> Option<&mut [u8]> {
        self.block_mut(handle).map(|block| &mut block.data[..])
    }

    fn purge_level(&self, handle: Handle) -> Option<PurgeLevel> {
        self.block(handle).map(|block| block.purge)
    }
}
