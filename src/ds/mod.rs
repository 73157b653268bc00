pub mod dense_set;
pub mod frequency_buckets;
pub mod handle_arena;
pub mod intrusive_list;

pub use dense_set::DenseSet;
pub use frequency_buckets::{DEFAULT_BUCKET_PREALLOC, FrequencyBuckets};
pub use handle_arena::{Handle, HandleArena};
pub use intrusive_list::{IntrusiveList, IntrusiveListEntryIter, IntrusiveListIter};
