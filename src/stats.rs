//! Usage statistics for a [`Bcache`](crate::Bcache).
//!
//! [`BcacheStats`] is a plain snapshot of every counter and derived
//! distribution the cache tracks. [`BcacheStats::write_report`] renders it as
//! the free-text maintenance report; the format is for humans and is not a
//! stable interface.

use std::io::{self, Write};

/// Point-in-time statistics of a cache.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BcacheStats {
    /// Number of insert calls, hits included.
    pub total_count: u64,
    /// Number of distinct entries stored.
    pub unique_count: u64,
    /// Bytes requested across all insert calls.
    pub total_size: u64,
    /// Bytes of distinct entries.
    pub unique_size: u64,

    /// Length of the longest distinct entry.
    pub max_entry_size: usize,
    /// Upper median length of the distinct entries.
    pub median_entry_size: usize,

    /// Payload bytes plus entry headers plus the bucket array.
    pub structure_size: u64,
    /// Bytes reserved by the payload arena.
    pub memory_used: usize,

    /// Buckets in the hash table; zero before the first insert.
    pub bucket_count: usize,
    /// Buckets holding at least one entry.
    pub occupied_buckets: usize,
    /// Times the bucket array was (re)allocated, the lazy first one included.
    pub expand_count: u64,
    /// Entries re-hashed across all expansions.
    pub expand_hash_count: u64,
    /// Half-hash matches whose full hash or bytes then differed.
    pub half_hash_miss_count: u64,

    /// Upper median chain length over all buckets, empty ones included.
    pub median_chain_length: usize,
    /// Entries in the longest chain.
    pub max_chain_length: usize,
}

impl BcacheStats {
    /// Hash computations performed: one per insert plus every rehash.
    pub fn hash_count(&self) -> u64 {
        self.total_count + self.expand_hash_count
    }

    pub fn duplicate_count(&self) -> u64 {
        self.total_count - self.unique_count
    }

    pub fn duplicate_size(&self) -> u64 {
        self.total_size - self.unique_size
    }

    pub fn average_entry_size(&self) -> Option<u64> {
        (self.unique_count > 0).then(|| self.unique_size / self.unique_count)
    }

    pub fn average_chain_length(&self) -> Option<u64> {
        (self.bucket_count > 0).then(|| self.unique_count / self.bucket_count as u64)
    }

    /// Writes the human-readable report under `label`.
    pub fn write_report<W: Write>(&self, label: &str, out: &mut W) -> io::Result<()> {
        writeln!(out, "  Cached '{}' statistics:", label)?;
        writeln!(out, "    Total object count:  {}", self.total_count)?;
        writeln!(out, "    Unique object count: {}", self.unique_count)?;
        write!(out, "    Percentage of duplicates, by count: ")?;
        write_percentage(out, self.duplicate_count() as i128, self.total_count as i128)?;
        writeln!(out)?;

        writeln!(out, "    Total object size:   {}", self.total_size)?;
        writeln!(out, "    Unique object size:  {}", self.unique_size)?;
        write!(out, "    Percentage of duplicates, by size:  ")?;
        write_percentage(out, self.duplicate_size() as i128, self.total_size as i128)?;
        writeln!(out)?;

        writeln!(out, "    Max entry size:     {}", self.max_entry_size)?;
        write!(out, "    Average entry size: ")?;
        match self.average_entry_size() {
            Some(avg) => writeln!(out, "{}", avg)?,
            None => writeln!(out, "(not applicable)")?,
        }
        writeln!(out, "    Median entry size:  {}", self.median_entry_size)?;
        writeln!(out)?;

        writeln!(
            out,
            "    Total memory used by bcache, including overhead: {}",
            self.structure_size
        )?;
        writeln!(out, "    Payload arena memory:       {}", self.memory_used)?;
        write!(out, "    Percentage memory overhead: ")?;
        write_percentage(
            out,
            self.structure_size as i128 - self.unique_size as i128,
            self.unique_size as i128,
        )?;
        write!(out, "    Net memory savings:         ")?;
        write_percentage(
            out,
            self.total_size as i128 - self.structure_size as i128,
            self.total_size as i128,
        )?;
        writeln!(out)?;

        writeln!(out, "    Hash table size:           {:3}", self.bucket_count)?;
        writeln!(out, "    Hash table expands:        {}", self.expand_count)?;
        writeln!(out, "    Hash table hashes:         {}", self.hash_count())?;
        writeln!(out, "    Half hash misses:          {}", self.half_hash_miss_count)?;
        write!(out, "    Hash table population:     ")?;
        write_percentage(out, self.occupied_buckets as i128, self.bucket_count as i128)?;
        writeln!(out, "    Median hash chain length:  {:3}", self.median_chain_length)?;
        write!(out, "    Average hash chain length: ")?;
        match self.average_chain_length() {
            Some(avg) => writeln!(out, "{:3}", avg)?,
            None => writeln!(out, "(not applicable)")?,
        }
        writeln!(out, "    Maximum hash chain length: {:3}", self.max_chain_length)?;
        writeln!(out)
    }
}

/// Integer percentage of `portion` over `total`, `None` when `total <= 0`.
pub fn percentage(portion: i128, total: i128) -> Option<i64> {
    (total > 0).then(|| (portion as f64 * 100.0 / total as f64) as i64)
}

fn write_percentage<W: Write>(out: &mut W, portion: i128, total: i128) -> io::Result<()> {
    match percentage(portion, total) {
        Some(pct) => writeln!(out, "{:3}%", pct),
        None => writeln!(out, "(not applicable)"),
    }
}

/// Median of an already sorted slice (upper median for even lengths), 0 if empty.
pub(crate) fn sorted_median(sorted: &[usize]) -> usize {
    sorted.get(sorted.len() / 2).copied().unwrap_or(0)
}
