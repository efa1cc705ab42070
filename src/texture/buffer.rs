// Owned texture storage
//
// Buffers are allocated fallibly so that an out-of-memory condition becomes a
// reported error instead of an abort. Storage is released when the owning
// value is dropped, on every exit path.

use super::error::{BufferKind, TextureError};

/// Allocation limits applied to every texture buffer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllocationPolicy {
    /// Largest single allocation allowed in bytes (`None` = unlimited)
    pub max_allocation_bytes: Option<u64>,
}

impl AllocationPolicy {
    /// A policy with no ceiling
    pub const UNLIMITED: AllocationPolicy = AllocationPolicy {
        max_allocation_bytes: None,
    };

    /// Allocate a zero-filled vector of `len` elements
    ///
    /// Fails if the request exceeds the ceiling, does not fit the address
    /// space, or the allocator reports out of memory.
    pub fn allocate<T: Copy + Default>(
        &self,
        buffer: BufferKind,
        len: u64,
    ) -> Result<Vec<T>, TextureError> {
        let bytes = len.saturating_mul(std::mem::size_of::<T>() as u64);
        let out_of_memory = || TextureError::OutOfMemory { buffer, bytes };

        if self.max_allocation_bytes.is_some_and(|max| bytes > max) {
            return Err(out_of_memory());
        }

        let len = usize::try_from(len).map_err(|_| out_of_memory())?;
        let mut storage = Vec::new();
        storage.try_reserve_exact(len).map_err(|_| out_of_memory())?;
        storage.resize(len, T::default());
        Ok(storage)
    }
}
