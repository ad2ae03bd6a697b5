//! Content-addressed deduplicating byte cache.
//!
//! A [`Bcache`] takes arbitrary byte strings and keeps exactly one copy of
//! each distinct content. Every insert returns a [`BcacheId`]; two inserts of
//! byte-identical payloads return the same id, so ids can stand in for the
//! content wherever identity comparison is cheaper than a byte compare
//! (interned symbol names, memoised type pairs).
//!
//! ## Architecture
//!
//! ```text
//!   insert(b"printf")
//!        │
//!        ▼
//!   full = hash(bytes) ──► half = full >> 16
//!        │
//!        ▼  full % bucket_count
//!   ┌───────────────────────────────────────────────┐
//!   │ table.heads  [ · | 7 | · | 2 | · | · | 0 ... ]│
//!   └───────────────────────────────────────────────┘
//!                     │       │
//!                     ▼       ▼
//!   entries: Vec<Entry>      Entry { payload: ByteRef, half_hash, next }
//!     [7] ─► [3] ─► None      │
//!     [2] ─► None             ▼
//!                           arena: ByteArena (chunks, never freed singly)
//! ```
//!
//! Chain scan: compare the cached half hash first; only on a match compare
//! length and then content. A half-hash match that fails the full compare is
//! counted as a half hash miss. On a miss the payload is copied into the
//! arena and the new entry is linked at the chain head.
//!
//! ## Growth
//!
//! At the start of an insert, if `unique_count >= bucket_count * threshold`
//! the bucket array grows to the next size from
//! [`PREFERRED_SIZES`](crate::ds::bucket_table::PREFERRED_SIZES). Every entry
//! is re-hashed and relinked; payloads and entries stay where they are. The
//! empty cache has zero buckets, so the first insert performs the initial
//! allocation.
//!
//! ## Example Usage
//!
//! ```
//! use bcache::Bcache;
//!
//! let mut cache = Bcache::new();
//! let (p1, added) = cache.insert(b"abc").unwrap();
//! assert!(added);
//! let (again, added) = cache.insert(b"abc").unwrap();
//! assert!(!added);
//! assert_eq!(p1, again);
//!
//! let (p2, _) = cache.insert(b"abd").unwrap();
//! assert_ne!(p1, p2);
//! assert_eq!(cache.get(p1), Some(&b"abc"[..]));
//! ```
//!
//! ## Performance
//! - `insert`: O(len) expected, plus an amortized O(1) share of each rehash
//! - `get`: O(1)
//! - `stats` / `print_statistics`: O(n log n) (sorts entry sizes and chains)

use std::io::{self, Write};
use std::mem;

use tracing::debug;

use crate::ds::bucket_table::{self, BucketTable};
use crate::ds::byte_arena::{ByteArena, ByteRef, DEFAULT_CHUNK_SIZE};
use crate::error::{BcacheError, InvariantError, MAX_PAYLOAD_LEN};
use crate::hash::{ContentHasher, FxContentHasher, half_hash};
use crate::stats::{BcacheStats, sorted_median};

/// Average chain length at which the bucket array grows.
pub const DEFAULT_CHAIN_LENGTH_THRESHOLD: usize = 5;

/// Stable handle to a stored payload.
///
/// Ids are only meaningful for the cache that issued them. Within that cache
/// two ids are equal exactly when their payloads are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BcacheId(usize);

impl BcacheId {
    /// Position of the entry in insertion order.
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
struct Entry {
    payload: ByteRef,
    half_hash: u16,
    next: Option<usize>,
}

/// Result of walking one hash chain.
struct ChainScan {
    found: Option<usize>,
    half_hash_misses: u64,
}

/// Deduplicating store for byte strings.
#[derive(Debug)]
pub struct Bcache<H = FxContentHasher> {
    hasher: H,
    table: BucketTable,
    entries: Vec<Entry>,
    arena: ByteArena,
    chain_length_threshold: usize,

    unique_count: u64,
    unique_size: u64,
    total_count: u64,
    total_size: u64,
    structure_size: u64,
    expand_count: u64,
    expand_hash_count: u64,
    half_hash_miss_count: u64,
}

impl Bcache<FxContentHasher> {
    /// Creates an empty cache with the default hasher and growth threshold.
    ///
    /// Nothing is allocated until the first insert.
    pub fn new() -> Self {
        Self::with_hasher(FxContentHasher::new())
    }
}

impl Default for Bcache<FxContentHasher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: ContentHasher> Bcache<H> {
    /// Creates an empty cache that hashes and compares with `hasher`.
    pub fn with_hasher(hasher: H) -> Self {
        Self::from_parts(hasher, DEFAULT_CHAIN_LENGTH_THRESHOLD, DEFAULT_CHUNK_SIZE)
    }

    pub(crate) fn from_parts(hasher: H, chain_length_threshold: usize, chunk_size: usize) -> Self {
        Self {
            hasher,
            table: BucketTable::new(),
            entries: Vec::new(),
            arena: ByteArena::new(chunk_size),
            chain_length_threshold,
            unique_count: 0,
            unique_size: 0,
            total_count: 0,
            total_size: 0,
            structure_size: 0,
            expand_count: 0,
            expand_hash_count: 0,
            half_hash_miss_count: 0,
        }
    }

    /// Inserts `bytes`, returning the canonical id and whether it was added.
    ///
    /// `added` is `false` when an identical payload was already stored; the
    /// returned id is then that entry's id and the cache is left unchanged
    /// apart from its counters.
    ///
    /// # Errors
    ///
    /// [`BcacheError::PayloadTooLarge`] if `bytes` is longer than
    /// [`MAX_PAYLOAD_LEN`]. Nothing is recorded in that case.
    pub fn insert(&mut self, bytes: &[u8]) -> Result<(BcacheId, bool), BcacheError> {
        if bytes.len() > MAX_PAYLOAD_LEN {
            return Err(BcacheError::PayloadTooLarge {
                len: bytes.len(),
                max: MAX_PAYLOAD_LEN,
            });
        }

        if self.total_count == 0 {
            self.arena.reserve_first_chunk();
        }

        let grow_at = (self.table.len() as u64).saturating_mul(self.chain_length_threshold as u64);
        if self.unique_count >= grow_at {
            self.expand();
        }

        self.total_count += 1;
        self.total_size += bytes.len() as u64;

        let full_hash = self.hasher.hash_bytes(bytes);
        let half = half_hash(full_hash);
        let bucket = self.table.index_for(full_hash);

        let scan = self.scan_chain(bucket, half, bytes);
        self.half_hash_miss_count += scan.half_hash_misses;
        if let Some(idx) = scan.found {
            return Ok((BcacheId(idx), false));
        }

        let payload = self.arena.alloc_copy(bytes)?;
        let idx = self.entries.len();
        self.entries.push(Entry {
            payload,
            half_hash: half,
            next: self.table.head(bucket),
        });
        self.table.set_head(bucket, Some(idx));

        self.unique_count += 1;
        self.unique_size += bytes.len() as u64;
        self.structure_size += (mem::size_of::<Entry>() + bytes.len()) as u64;

        Ok((BcacheId(idx), true))
    }

    /// Inserts `bytes` and returns only the canonical id.
    pub fn insert_bytes(&mut self, bytes: &[u8]) -> Result<BcacheId, BcacheError> {
        self.insert(bytes).map(|(id, _)| id)
    }

    /// Interns a string. Equal strings share one id.
    pub fn insert_str(&mut self, s: &str) -> Result<BcacheId, BcacheError> {
        self.insert_bytes(s.as_bytes())
    }

    /// Returns the id of `bytes` if it is stored, without recording an insert.
    pub fn find(&self, bytes: &[u8]) -> Option<BcacheId> {
        if self.table.is_empty() || bytes.len() > MAX_PAYLOAD_LEN {
            return None;
        }
        let full_hash = self.hasher.hash_bytes(bytes);
        let bucket = self.table.index_for(full_hash);
        self.scan_chain(bucket, half_hash(full_hash), bytes)
            .found
            .map(BcacheId)
    }

    /// Returns the stored payload for `id`.
    pub fn get(&self, id: BcacheId) -> Option<&[u8]> {
        self.entries
            .get(id.0)
            .map(|entry| self.arena.get(entry.payload))
    }

    /// Returns the stored payload for `id` as a string, if it is valid UTF-8.
    pub fn get_str(&self, id: BcacheId) -> Option<&str> {
        self.get(id).and_then(|bytes| std::str::from_utf8(bytes).ok())
    }

    /// Iterates stored payloads in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (BcacheId, &[u8])> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| (BcacheId(idx), self.arena.get(entry.payload)))
    }

    /// Number of distinct payloads stored.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bytes reserved by the payload arena, 0 before the first insert.
    pub fn memory_used(&self) -> usize {
        if self.total_count == 0 {
            return 0;
        }
        self.arena.memory_used()
    }

    pub fn bucket_count(&self) -> usize {
        self.table.len()
    }

    pub fn chain_length_threshold(&self) -> usize {
        self.chain_length_threshold
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Captures every counter together with entry-size and chain-length
    /// distributions.
    pub fn stats(&self) -> BcacheStats {
        let mut entry_sizes: Vec<usize> = self
            .entries
            .iter()
            .map(|entry| entry.payload.len())
            .collect();
        entry_sizes.sort_unstable();

        let mut chain_lengths: Vec<usize> = self
            .table
            .heads()
            .map(|head| self.chain(head).count())
            .collect();
        chain_lengths.sort_unstable();

        BcacheStats {
            total_count: self.total_count,
            unique_count: self.unique_count,
            total_size: self.total_size,
            unique_size: self.unique_size,
            max_entry_size: entry_sizes.last().copied().unwrap_or(0),
            median_entry_size: sorted_median(&entry_sizes),
            structure_size: self.structure_size,
            memory_used: self.memory_used(),
            bucket_count: self.table.len(),
            occupied_buckets: self.table.occupied(),
            expand_count: self.expand_count,
            expand_hash_count: self.expand_hash_count,
            half_hash_miss_count: self.half_hash_miss_count,
            median_chain_length: sorted_median(&chain_lengths),
            max_chain_length: chain_lengths.last().copied().unwrap_or(0),
        }
    }

    /// Writes the human-readable statistics report for this cache.
    pub fn print_statistics<W: Write>(&self, label: &str, out: &mut W) -> io::Result<()> {
        self.stats().write_report(label, out)
    }

    /// Validates the table against the entries and counters.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.unique_count > self.total_count {
            return Err(InvariantError::new(format!(
                "unique_count {} > total_count {}",
                self.unique_count, self.total_count
            )));
        }
        if self.unique_size > self.total_size {
            return Err(InvariantError::new(format!(
                "unique_size {} > total_size {}",
                self.unique_size, self.total_size
            )));
        }
        if self.unique_count != self.entries.len() as u64 {
            return Err(InvariantError::new(format!(
                "unique_count {} != entries {}",
                self.unique_count,
                self.entries.len()
            )));
        }
        if !bucket_table::is_legal_bucket_count(self.table.len()) {
            return Err(InvariantError::new(format!(
                "bucket count {} is not a growth-policy size",
                self.table.len()
            )));
        }

        let mut linked = 0usize;
        let mut payload_bytes = 0u64;
        for (bucket, head) in self.table.heads().enumerate() {
            for idx in self.chain(head) {
                linked += 1;
                if linked > self.entries.len() {
                    return Err(InvariantError::new(format!(
                        "bucket {} chain is longer than the entry list (cycle?)",
                        bucket
                    )));
                }
                let entry = &self.entries[idx];
                let bytes = self.arena.get(entry.payload);
                let full_hash = self.hasher.hash_bytes(bytes);
                if self.table.index_for(full_hash) != bucket {
                    return Err(InvariantError::new(format!(
                        "entry {} linked in bucket {} but hashes to {}",
                        idx,
                        bucket,
                        self.table.index_for(full_hash)
                    )));
                }
                if half_hash(full_hash) != entry.half_hash {
                    return Err(InvariantError::new(format!(
                        "entry {} caches half hash {:#06x}, content gives {:#06x}",
                        idx,
                        entry.half_hash,
                        half_hash(full_hash)
                    )));
                }
                payload_bytes += bytes.len() as u64;
            }
        }
        if linked != self.entries.len() {
            return Err(InvariantError::new(format!(
                "{} entries reachable from buckets, {} stored",
                linked,
                self.entries.len()
            )));
        }
        if payload_bytes != self.unique_size {
            return Err(InvariantError::new(format!(
                "linked payload bytes {} != unique_size {}",
                payload_bytes, self.unique_size
            )));
        }
        Ok(())
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        if let Err(err) = self.check_invariants() {
            panic!("bcache invariant violated: {}", err);
        }
    }

    fn scan_chain(&self, bucket: usize, half: u16, bytes: &[u8]) -> ChainScan {
        let mut half_hash_misses = 0;
        for idx in self.chain(self.table.head(bucket)) {
            let entry = &self.entries[idx];
            if entry.half_hash != half {
                continue;
            }
            if entry.payload.len() == bytes.len()
                && self
                    .hasher
                    .bytes_equal(self.arena.get(entry.payload), bytes)
            {
                return ChainScan {
                    found: Some(idx),
                    half_hash_misses,
                };
            }
            half_hash_misses += 1;
        }
        ChainScan {
            found: None,
            half_hash_misses,
        }
    }

    fn chain(&self, head: Option<usize>) -> impl Iterator<Item = usize> + '_ {
        std::iter::successors(head, move |&idx| self.entries[idx].next)
    }

    fn expand(&mut self) {
        let old_count = self.table.len();
        let new_count = bucket_table::next_bucket_count(old_count);
        let mut table = BucketTable::with_len(new_count);

        for (idx, entry) in self.entries.iter_mut().enumerate() {
            let full_hash = self.hasher.hash_bytes(self.arena.get(entry.payload));
            let bucket = table.index_for(full_hash);
            entry.next = table.head(bucket);
            table.set_head(bucket, Some(idx));
        }

        self.structure_size -= self.table.footprint() as u64;
        self.structure_size += table.footprint() as u64;
        self.table = table;

        self.expand_count += 1;
        self.expand_hash_count += self.unique_count;
        debug!(
            old_buckets = old_count,
            new_buckets = new_count,
            rehashed = self.unique_count,
            "bcache hash table expanded"
        );
    }
}

#[cfg(feature = "metrics")]
impl<H: ContentHasher> crate::metrics::traits::MetricsSnapshotProvider<BcacheStats> for Bcache<H> {
    fn snapshot(&self) -> BcacheStats {
        self.stats()
    }
}
