use crate::arena::Slots;
use crate::BLOCK_MAX;

/// Raw byte buffers keyed by block handle.
///
/// Every write operation is fail-soft: bad handles, indices or values make
/// the call do nothing and report `false`.
#[derive(Debug, Clone)]
pub struct MemoryBlockStore {
    blocks: Slots<Vec<u8>>,
}

impl Default for MemoryBlockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBlockStore {
    pub fn new() -> Self {
        Self {
            blocks: Slots::new(BLOCK_MAX),
        }
    }

    /// Free whatever lives at `handle`, then install a zeroed buffer of
    /// `size` bytes. A size of zero or less leaves the block empty.
    pub fn allocate(&mut self, handle: usize, size: i32) {
        self.blocks.remove(handle);
        let Ok(size) = usize::try_from(size) else {
            return;
        };
        if size == 0 {
            return;
        }
        if self.blocks.insert(handle, vec![0; size]).is_err() {
            log::debug!("allocate: handle {} out of range", handle);
        }
    }

    /// Lowest empty handle at or above `floor`.
    pub fn first_free(&self, floor: usize) -> Option<usize> {
        self.blocks.first_free_from(floor)
    }

    pub fn free(&mut self, handle: usize) {
        self.blocks.remove(handle);
    }

    pub fn clear(&mut self) {
        self.blocks.clear();
    }

    pub fn is_valid(&self, handle: i32) -> bool {
        self.block(handle).is_some()
    }

    /// Contents of an allocated, non-empty block.
    pub fn block(&self, handle: i32) -> Option<&[u8]> {
        self.blocks
            .get(handle)
            .map(Vec::as_slice)
            .filter(|data| !data.is_empty())
    }

    pub fn size(&self, handle: i32) -> usize {
        self.block(handle).map_or(0, <[u8]>::len)
    }

    pub fn fill(&mut self, handle: i32, value: i32) -> bool {
        let Ok(value) = u8::try_from(value) else {
            return false;
        };
        match self.blocks.get_mut(handle) {
            Some(data) => {
                data.fill(value);
                true
            }
            None => false,
        }
    }

    pub fn set(&mut self, handle: i32, index: i32, value: i32) -> bool {
        let Ok(value) = u8::try_from(value) else {
            return false;
        };
        let Ok(index) = usize::try_from(index) else {
            return false;
        };
        match self
            .blocks
            .get_mut(handle)
            .and_then(|data| data.get_mut(index))
        {
            Some(byte) => {
                *byte = value;
                true
            }
            None => false,
        }
    }

    /// Total bytes held by live blocks.
    pub fn allocated_bytes(&self) -> usize {
        self.blocks.iter().map(|(_, data)| data.len()).sum()
    }

    pub fn live_blocks(&self) -> usize {
        self.blocks.iter().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TILE_START, VIDEO};

    #[test]
    fn allocate_zero_fills_and_validates() {
        let mut memory = MemoryBlockStore::new();
        memory.allocate(VIDEO, 64);
        assert!(memory.is_valid(VIDEO as i32));
        assert_eq!(memory.block(VIDEO as i32), Some(&[0u8; 64][..]));

        memory.allocate(5, 0);
        assert!(!memory.is_valid(5));
        memory.allocate(5, -3);
        assert!(!memory.is_valid(5));
    }

    #[test]
    fn out_of_range_handles_are_ignored() {
        let mut memory = MemoryBlockStore::new();
        memory.allocate(BLOCK_MAX, 16);
        assert_eq!(memory.live_blocks(), 0);
        for handle in [-1, BLOCK_MAX as i32, i32::MIN, i32::MAX, 7] {
            assert!(!memory.is_valid(handle));
            assert!(!memory.fill(handle, 1));
            assert!(!memory.set(handle, 0, 1));
        }
    }

    #[test]
    fn fill_and_set_validate_values_and_indices() {
        let mut memory = MemoryBlockStore::new();
        memory.allocate(TILE_START, 8);

        assert!(memory.fill(TILE_START as i32, 255));
        assert!(memory.block(TILE_START as i32).unwrap().iter().all(|&b| b == 255));

        assert!(!memory.fill(TILE_START as i32, 256));
        assert!(!memory.fill(TILE_START as i32, -1));
        assert!(!memory.set(TILE_START as i32, 0, 300));
        assert!(!memory.set(TILE_START as i32, 8, 1));
        assert!(!memory.set(TILE_START as i32, -1, 1));
        assert!(memory.block(TILE_START as i32).unwrap().iter().all(|&b| b == 255));

        assert!(memory.set(TILE_START as i32, 7, 3));
        assert_eq!(memory.block(TILE_START as i32).unwrap()[7], 3);
    }

    #[test]
    fn fill_writes_every_value_in_range() {
        let mut memory = MemoryBlockStore::new();
        memory.allocate(2, 32);
        for value in 0..=255 {
            assert!(memory.fill(2, value));
            assert!(memory.block(2).unwrap().iter().all(|&b| b as i32 == value));
        }
    }

    #[test]
    fn reallocation_does_not_grow_live_memory() {
        let mut memory = MemoryBlockStore::new();
        for round in 0..100 {
            memory.allocate(TILE_START, 64);
            memory.allocate(TILE_START, 64);
            memory.set(TILE_START as i32, round % 64, 9);
            assert_eq!(memory.allocated_bytes(), 64);
            memory.free(TILE_START);
            assert_eq!(memory.allocated_bytes(), 0);
        }
        memory.allocate(TILE_START, 64);
        memory.allocate(TILE_START, 16);
        assert_eq!(memory.allocated_bytes(), 16);
        assert_eq!(memory.live_blocks(), 1);
    }
}
