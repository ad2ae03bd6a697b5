pub mod bucket_table;
pub mod byte_arena;

pub use bucket_table::{BucketTable, PREFERRED_SIZES, next_bucket_count};
pub use byte_arena::{ByteArena, ByteRef};
