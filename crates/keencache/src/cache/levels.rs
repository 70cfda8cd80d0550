//! The nested resource levels that decide which graphics chunks stay locked.

use crate::errors::FatalError;

/// The deepest level. Needed marks are kept as one bit per level in a byte.
pub const MAX_LEVEL: usize = 7;

#[derive(Debug, Clone)]
pub struct ResourceLevels {
    depth: usize,
    needed: Vec<u8>,
}

impl ResourceLevels {
    #[must_use]
    pub fn new(chunk_count: usize) -> Self {
        ResourceLevels {
            depth: 0,
            needed: vec![0; chunk_count],
        }
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    fn level_bit(&self) -> u8 {
        1 << self.depth
    }

    /// Marks `chunk` as needed at the current level.
    pub fn mark(&mut self, chunk: usize) {
        let bit = self.level_bit();
        if let Some(needed) = self.needed.get_mut(chunk) {
            *needed |= bit;
        }
    }

    #[must_use]
    pub fn is_needed(&self, chunk: usize) -> bool {
        self.needed
            .get(chunk)
            .is_some_and(|needed| needed & self.level_bit() != 0)
    }

    /// Clears the current level's mark on every chunk. Marks made at other
    /// levels are kept.
    pub fn clear(&mut self) {
        let mask = !self.level_bit();
        for needed in &mut self.needed {
            *needed &= mask;
        }
    }

    pub fn raise(&mut self) -> Result<(), FatalError> {
        if self.depth == MAX_LEVEL {
            return Err(FatalError::LevelOverflow { max: MAX_LEVEL });
        }
        self.depth += 1;
        log::debug!("Raised cache level to {}", self.depth);
        Ok(())
    }

    pub fn lower(&mut self) -> Result<(), FatalError> {
        if self.depth == 0 {
            return Err(FatalError::LevelUnderflow);
        }
        self.depth -= 1;
        log::debug!("Lowered cache level to {}", self.depth);
        Ok(())
    }
}
