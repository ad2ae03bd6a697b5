//! Chunked bump arena for immutable byte payloads.
//!
//! Payloads are copied into the tail chunk; when it cannot hold the next
//! payload a new chunk is started. Nothing is ever freed individually: the
//! whole arena is released when it is dropped.
//!
//! ## Architecture
//!
//! ```text
//!   chunks: Vec<Vec<u8>>   (each chunk allocated once, never grown)
//!   ┌──────────────────────────────┐ ┌──────────────────────────────┐
//!   │ "main" "printf" "int" ....   │ │ "unsigned long" ...   (free) │
//!   └──────────────────────────────┘ └──────────────────────────────┘
//!     ▲                               ▲
//!     ByteRef { chunk: 0, offset: 4, len: 6 }
//!                                     ByteRef { chunk: 1, offset: 0, len: 13 }
//! ```
//!
//! ## Performance
//! - `alloc_copy`: O(len), amortized one chunk allocation per `chunk_size` bytes
//! - `get`: O(1)

use tracing::trace;

use crate::error::{BcacheError, MAX_PAYLOAD_LEN};

/// Bytes reserved per chunk unless a single payload needs more.
pub const DEFAULT_CHUNK_SIZE: usize = 4064;

/// Location of a payload inside a [`ByteArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ByteRef {
    chunk: usize,
    offset: usize,
    len: u16,
}

impl ByteRef {
    /// Length of the referenced payload.
    pub fn len(self) -> usize {
        usize::from(self.len)
    }

    pub fn is_empty(self) -> bool {
        self.len == 0
    }
}

#[derive(Debug)]
pub struct ByteArena {
    chunks: Vec<Vec<u8>>,
    chunk_size: usize,
    reserved: usize,
    used: usize,
}

impl ByteArena {
    /// Creates an empty arena. No memory is reserved until the first
    /// allocation (or an explicit [`reserve_first_chunk`](Self::reserve_first_chunk)).
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunks: Vec::new(),
            chunk_size: chunk_size.max(1),
            reserved: 0,
            used: 0,
        }
    }

    /// Allocates the initial chunk if the arena has none yet.
    pub fn reserve_first_chunk(&mut self) {
        if self.chunks.is_empty() {
            self.push_chunk(self.chunk_size);
        }
    }

    /// Copies `bytes` into the arena and returns where they live.
    ///
    /// # Errors
    ///
    /// [`BcacheError::PayloadTooLarge`] if `bytes` is longer than
    /// [`MAX_PAYLOAD_LEN`]; nothing is copied.
    pub fn alloc_copy(&mut self, bytes: &[u8]) -> Result<ByteRef, BcacheError> {
        let len = u16::try_from(bytes.len()).map_err(|_| BcacheError::PayloadTooLarge {
            len: bytes.len(),
            max: MAX_PAYLOAD_LEN,
        })?;
        if len == 0 {
            return Ok(ByteRef {
                chunk: 0,
                offset: 0,
                len: 0,
            });
        }
        let need = bytes.len();
        let fits = self
            .chunks
            .last()
            .is_some_and(|chunk| chunk.capacity() - chunk.len() >= need);
        if !fits {
            self.push_chunk(self.chunk_size.max(need));
        }

        let chunk_idx = self.chunks.len() - 1;
        let chunk = &mut self.chunks[chunk_idx];
        let offset = chunk.len();
        chunk.extend_from_slice(bytes);
        self.used += need;

        Ok(ByteRef {
            chunk: chunk_idx,
            offset,
            len,
        })
    }

    /// Returns the payload stored at `at`.
    ///
    /// # Panics
    ///
    /// Panics if `at` was not produced by this arena.
    pub fn get(&self, at: ByteRef) -> &[u8] {
        if at.is_empty() {
            return &[];
        }
        &self.chunks[at.chunk][at.offset..at.offset + at.len()]
    }

    /// Total bytes reserved by all chunks (payload plus unused tail space).
    pub fn memory_used(&self) -> usize {
        self.reserved
    }

    /// Total payload bytes copied in.
    pub fn bytes_stored(&self) -> usize {
        self.used
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    fn push_chunk(&mut self, capacity: usize) {
        let chunk = Vec::with_capacity(capacity);
        self.reserved += chunk.capacity();
        trace!(
            chunk = self.chunks.len(),
            capacity = chunk.capacity(),
            "byte arena chunk allocated"
        );
        self.chunks.push(chunk);
    }
}

impl Default for ByteArena {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}
