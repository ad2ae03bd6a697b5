//! Bucket array and growth policy for the chained hash table.
//!
//! Each bucket holds the head of a singly linked chain; the links themselves
//! live in the owning cache's entry vector and are addressed by index, so
//! resizing relinks entries without moving them.
//!
//! ```text
//!   heads: [ None | Some(4) | None | Some(0) | ... ]
//!                    │               │
//!                    ▼               ▼
//!              entries[4] ─► entries[1]   entries[0] ─► None
//! ```
//!
//! Sizes follow [`PREFERRED_SIZES`], which roughly double and stay clear of
//! powers of two; past the end of the table the size doubles.

/// Ascending bucket counts, each the largest prime below a power of two.
pub const PREFERRED_SIZES: [u64; 23] = [
    1021, 2039, 4093, 8191, 16381, 32749, 65521, 131071, 262139, 524287, 1048573, 2097143,
    4194301, 8388593, 16777213, 33554393, 67108859, 134217689, 268435399, 536870909, 1073741789,
    2147483647, 4294967291,
];

/// Returns the bucket count to grow to from `current`.
///
/// Picks the smallest preferred size strictly greater than `current`; beyond
/// the table (or if that size does not fit `usize`) doubles `current`.
pub fn next_bucket_count(current: usize) -> usize {
    PREFERRED_SIZES
        .iter()
        .find(|&&size| size > current as u64)
        .and_then(|&size| usize::try_from(size).ok())
        .unwrap_or_else(|| current.saturating_mul(2))
}

/// Returns `true` if `count` is a size the growth policy can produce.
pub fn is_legal_bucket_count(count: usize) -> bool {
    if count == 0 {
        return true;
    }
    if PREFERRED_SIZES.iter().any(|&size| size == count as u64) {
        return true;
    }
    // Doubling past the table: some power-of-two multiple of the last entry.
    let last = PREFERRED_SIZES[PREFERRED_SIZES.len() - 1];
    let mut size = last as u128;
    let count = count as u128;
    while size < count {
        size *= 2;
    }
    size == count
}

#[derive(Debug, Default)]
pub struct BucketTable {
    heads: Vec<Option<usize>>,
}

impl BucketTable {
    /// Creates a table with no buckets. The first insert must grow it.
    pub fn new() -> Self {
        Self { heads: Vec::new() }
    }

    /// Creates a table of `len` empty buckets.
    pub fn with_len(len: usize) -> Self {
        Self {
            heads: vec![None; len],
        }
    }

    pub fn len(&self) -> usize {
        self.heads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heads.is_empty()
    }

    /// Bucket index selected by `full_hash`.
    #[inline]
    pub fn index_for(&self, full_hash: u32) -> usize {
        debug_assert!(!self.heads.is_empty());
        full_hash as usize % self.heads.len()
    }

    #[inline]
    pub fn head(&self, bucket: usize) -> Option<usize> {
        self.heads[bucket]
    }

    #[inline]
    pub fn set_head(&mut self, bucket: usize, entry: Option<usize>) {
        self.heads[bucket] = entry;
    }

    /// Bytes taken by the bucket array itself.
    pub fn footprint(&self) -> usize {
        self.heads.len() * std::mem::size_of::<Option<usize>>()
    }

    /// Number of buckets with a non-empty chain.
    pub fn occupied(&self) -> usize {
        self.heads.iter().filter(|head| head.is_some()).count()
    }

    pub fn heads(&self) -> impl Iterator<Item = Option<usize>> + '_ {
        self.heads.iter().copied()
    }
}
