pub use crate::ds::{DenseSet, FrequencyBuckets, Handle, HandleArena, IntrusiveList};

pub use crate::admission::{
    AcceptAll, Admission, AdmissionFilter, KeyPredicate, MaxSize, MinCost, RejectAll,
    ValuePredicate,
};
pub use crate::attributes::Attributes;
pub use crate::config::{AdmissionSpec, EvictionConfig, EvictionConfigBuilder};
pub use crate::coordinator::{EvictionCoordinator, Thresholds};
pub use crate::error::{ConfigError, PolicyError};
pub use crate::policy::clock::ClockPolicy;
pub use crate::policy::fifo::FifoPolicy;
pub use crate::policy::lfu::LfuPolicy;
pub use crate::policy::lifo::LifoPolicy;
pub use crate::policy::lru::LruPolicy;
pub use crate::policy::mru::MruPolicy;
pub use crate::policy::random::RandomPolicy;
pub use crate::policy::{Policy, PolicyKind, ReplacementPolicy};
pub use crate::sync::Locked;
