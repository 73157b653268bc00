//! Eviction configuration and factories.
//!
//! [`EvictionConfig`] gathers everything needed to assemble an eviction
//! stack: which policy, how to size it, the coordinator thresholds and the
//! admission filter. It is built through [`EvictionConfigBuilder`], which
//! validates on [`build`](EvictionConfigBuilder::build), and can be
//! (de)serialized with the `serde` feature.
//!
//! ## Fields
//!
//! | Field           | Type            | Default     | Description                         |
//! |-----------------|-----------------|-------------|-------------------------------------|
//! | `policy`        | `PolicyKind`    | `Lru`       | Replacement policy                  |
//! | `capacity_hint` | `usize`         | 0           | Slots to pre-allocate               |
//! | `slot_limit`    | `Option<usize>` | `None`      | Hard limit; `add` refuses beyond it |
//! | `seed`          | `Option<u64>`   | `None`      | Random policy seed                  |
//! | `thresholds`    | `Thresholds`    | unbounded   | Coordinator thresholds              |
//! | `admission`     | `AdmissionSpec` | `AcceptAll` | Admission filter                    |
//!
//! ## Example
//!
//! ```
//! use evictkit::attributes::Attributes;
//! use evictkit::admission::AdmissionFilter;
//! use evictkit::config::{AdmissionSpec, EvictionConfig};
//! use evictkit::policy::{PolicyKind, ReplacementPolicy};
//!
//! let config = EvictionConfig::builder()
//!     .policy(PolicyKind::Lfu)
//!     .max_size(1000)
//!     .preferable_size(900)
//!     .admission(AdmissionSpec::MaxSize(64 * 1024))
//!     .build()
//!     .unwrap();
//!
//! let mut coordinator = config.build_coordinator::<String>().unwrap();
//! let filter = config.admission_filter().unwrap();
//!
//! let attrs = Attributes::new().with_size(512);
//! if filter.is_cacheable(&"key", &"value".to_string(), &attrs) {
//!     coordinator.policy_mut().add("value".to_string(), attrs).unwrap();
//! }
//! assert_eq!(coordinator.policy().kind(), PolicyKind::Lfu);
//! assert_eq!(coordinator.max_size(), 1000);
//! ```
use tracing::debug;

use crate::admission::{AcceptAll, Admission, MaxSize, MinCost, RejectAll};
use crate::coordinator::{EvictionCoordinator, Thresholds};
use crate::error::ConfigError;
use crate::policy::{Policy, PolicyKind};

/// Declarative form of an admission filter.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", content = "limit", rename_all = "snake_case"))]
pub enum AdmissionSpec {
    #[default]
    AcceptAll,
    RejectAll,
    /// Reject elements whose size exceeds the limit.
    MaxSize(u64),
    /// Reject elements whose cost is below the limit.
    MinCost(f64),
}

impl AdmissionSpec {
    /// Builds the filter, validating its parameter.
    pub fn build(self) -> Result<Admission, ConfigError> {
        Ok(match self {
            AdmissionSpec::AcceptAll => Admission::AcceptAll(AcceptAll),
            AdmissionSpec::RejectAll => Admission::RejectAll(RejectAll),
            AdmissionSpec::MaxSize(max) => Admission::MaxSize(MaxSize::new(max)),
            AdmissionSpec::MinCost(min) => Admission::MinCost(MinCost::new(min)?),
        })
    }
}

/// Validated eviction configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EvictionConfig {
    policy: PolicyKind,
    capacity_hint: usize,
    slot_limit: Option<usize>,
    seed: Option<u64>,
    thresholds: Thresholds,
    admission: AdmissionSpec,
}

impl Default for EvictionConfig {
    fn default() -> Self {
        Self {
            policy: PolicyKind::Lru,
            capacity_hint: 0,
            slot_limit: None,
            seed: None,
            thresholds: Thresholds::default(),
            admission: AdmissionSpec::AcceptAll,
        }
    }
}

impl EvictionConfig {
    pub fn builder() -> EvictionConfigBuilder {
        EvictionConfigBuilder::new()
    }

    pub fn policy(&self) -> PolicyKind {
        self.policy
    }

    pub fn capacity_hint(&self) -> usize {
        self.capacity_hint
    }

    pub fn slot_limit(&self) -> Option<usize> {
        self.slot_limit
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    pub fn admission(&self) -> AdmissionSpec {
        self.admission
    }

    /// Re-checks every constraint [`EvictionConfigBuilder::build`] enforces.
    ///
    /// Useful for configurations obtained through deserialization.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.thresholds.validate()?;
        self.admission.build()?;
        if let Some(limit) = self.slot_limit
            && self.capacity_hint > limit
        {
            return Err(ConfigError::new(format!(
                "capacity hint {} exceeds slot limit {limit}",
                self.capacity_hint
            )));
        }
        Ok(())
    }

    /// Creates an empty policy as described by this configuration.
    pub fn build_policy<T>(&self) -> Policy<T> {
        let mut policy = match self.slot_limit {
            Some(limit) => Policy::bounded(self.policy, limit),
            None => Policy::with_capacity(self.policy, self.capacity_hint),
        };
        if let Some(seed) = self.seed {
            policy.reseed(seed);
        }
        debug!(
            policy = %self.policy,
            capacity_hint = self.capacity_hint,
            slot_limit = ?self.slot_limit,
            seeded = self.seed.is_some(),
            "built replacement policy"
        );
        policy
    }

    /// Creates a coordinator around a fresh policy.
    pub fn build_coordinator<T>(&self) -> Result<EvictionCoordinator<Policy<T>>, ConfigError> {
        EvictionCoordinator::try_new(self.build_policy(), self.thresholds)
    }

    pub fn admission_filter(&self) -> Result<Admission, ConfigError> {
        self.admission.build()
    }
}

/// Builder for [`EvictionConfig`].
#[derive(Debug, Clone, Default)]
pub struct EvictionConfigBuilder {
    config: EvictionConfig,
}

impl EvictionConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn policy(mut self, kind: PolicyKind) -> Self {
        self.config.policy = kind;
        self
    }

    /// Number of slots to pre-allocate. Does not limit growth.
    pub fn capacity_hint(mut self, hint: usize) -> Self {
        self.config.capacity_hint = hint;
        self
    }

    /// Hard slot limit. A policy at its limit returns `None` from `add`.
    pub fn slot_limit(mut self, limit: usize) -> Self {
        self.config.slot_limit = Some(limit);
        self
    }

    /// Seed for the random policy. Ignored by the others.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn max_size(mut self, max: usize) -> Self {
        self.config.thresholds.max_size = Some(max);
        self
    }

    pub fn max_volume(mut self, max: u64) -> Self {
        self.config.thresholds.max_volume = Some(max);
        self
    }

    pub fn preferable_size(mut self, preferable: usize) -> Self {
        self.config.thresholds.preferable_size = Some(preferable);
        self
    }

    pub fn preferable_volume(mut self, preferable: u64) -> Self {
        self.config.thresholds.preferable_volume = Some(preferable);
        self
    }

    pub fn thresholds(mut self, thresholds: Thresholds) -> Self {
        self.config.thresholds = thresholds;
        self
    }

    pub fn admission(mut self, admission: AdmissionSpec) -> Self {
        self.config.admission = admission;
        self
    }

    pub fn build(self) -> Result<EvictionConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
