use log::trace;
use std::ops::{Deref, DerefMut};

/// Reusable byte storage for a single frame in flight.
///
/// Growing the buffer replaces it: nothing written before a growing
/// [`ScratchBuffer::allocate`] survives it.
#[derive(Debug, Default)]
pub struct ScratchBuffer {
    data: Box<[u8]>,
}

impl ScratchBuffer {
    pub fn new() -> Self {
        ScratchBuffer::default()
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Makes sure at least `size` bytes are available, rounding the new
    /// capacity up to a power of two.
    pub fn allocate(&mut self, size: usize) {
        if size <= self.data.len() {
            return;
        }

        let capacity = size.next_power_of_two();
        trace!("Growing scratch buffer {} -> {}.", self.data.len(), capacity);
        self.data = vec![0; capacity].into_boxed_slice();
    }
}

impl Deref for ScratchBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.data
    }
}

impl DerefMut for ScratchBuffer {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}
