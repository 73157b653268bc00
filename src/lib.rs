//! evictkit: cache replacement policies over a handle arena, with admission
//! filters and an eviction coordinator.
//!
//! The surrounding cache owns its entries; evictkit only decides which one
//! goes next. A typical write path:
//!
//! ```
//! use evictkit::prelude::*;
//!
//! let config = EvictionConfig::builder()
//!     .policy(PolicyKind::Clock)
//!     .max_size(2)
//!     .build()
//!     .unwrap();
//! let filter = config.admission_filter().unwrap();
//! let mut coordinator = config.build_coordinator::<&str>().unwrap();
//!
//! for key in ["a", "b", "c"] {
//!     let attrs = Attributes::default();
//!     if filter.is_cacheable(&key, &key, &attrs) {
//!         let _handle = coordinator.policy_mut().add(key, attrs);
//!     }
//! }
//! assert_eq!(coordinator.enforce(), vec!["a"]);
//! ```
//!
//! See `DESIGN.md` for the module layout.

pub mod admission;
pub mod attributes;
pub mod config;
pub mod coordinator;
pub mod ds;
pub mod error;
pub mod policy;
pub mod prelude;
pub mod sync;

pub use crate::error::{ConfigError, PolicyError};
