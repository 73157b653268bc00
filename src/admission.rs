//! Admission filters.
//!
//! A filter decides, before an element reaches a policy, whether it should be
//! cached at all. Decisions are pure functions of key, value and
//! [`Attributes`]; filters hold no mutable state.
//!
//! ## Key Components
//!
//! | Filter             | Admits when                          |
//! |--------------------|--------------------------------------|
//! | [`AcceptAll`]      | always                               |
//! | [`RejectAll`]      | never                                |
//! | [`KeyPredicate`]   | the predicate holds for the key      |
//! | [`ValuePredicate`] | the predicate holds for the value    |
//! | [`MaxSize`]        | `attributes.size() <= max`           |
//! | [`MinCost`]        | `attributes.cost() >= min`           |
//!
//! Any `Fn(&K, &V, &Attributes) -> bool` closure is also a filter, which
//! covers combinations:
//!
//! ```
//! use evictkit::admission::{AdmissionFilter, MaxSize, MinCost};
//! use evictkit::attributes::Attributes;
//!
//! let small = MaxSize::new(1024);
//! let worth_it = MinCost::new(0.5).unwrap();
//! let both = |k: &u32, v: &&str, a: &Attributes| {
//!     small.is_cacheable(k, v, a) && worth_it.is_cacheable(k, v, a)
//! };
//!
//! let attrs = Attributes::new().with_size(100).with_cost(0.7);
//! assert!(both.is_cacheable(&1, &"page", &attrs));
//! assert!(!both.is_cacheable(&1, &"page", &attrs.with_size(4096)));
//! ```
use crate::attributes::Attributes;
use crate::error::ConfigError;

/// Decides whether an element may enter the cache.
pub trait AdmissionFilter<K, V> {
    fn is_cacheable(&self, key: &K, value: &V, attributes: &Attributes) -> bool;
}

impl<K, V, F> AdmissionFilter<K, V> for F
where
    F: Fn(&K, &V, &Attributes) -> bool,
{
    #[inline]
    fn is_cacheable(&self, key: &K, value: &V, attributes: &Attributes) -> bool {
        self(key, value, attributes)
    }
}

/// Admits everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AcceptAll;

/// Admits nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RejectAll;

/// Shared accept-all instance.
pub const ACCEPT_ALL: AcceptAll = AcceptAll;

/// Shared reject-all instance.
pub const REJECT_ALL: RejectAll = RejectAll;

impl<K, V> AdmissionFilter<K, V> for AcceptAll {
    #[inline]
    fn is_cacheable(&self, _key: &K, _value: &V, _attributes: &Attributes) -> bool {
        true
    }
}

impl<K, V> AdmissionFilter<K, V> for RejectAll {
    #[inline]
    fn is_cacheable(&self, _key: &K, _value: &V, _attributes: &Attributes) -> bool {
        false
    }
}

/// Admits elements whose key satisfies a predicate.
#[derive(Clone, Copy)]
pub struct KeyPredicate<F>(F);

impl<F> KeyPredicate<F> {
    pub fn new(predicate: F) -> Self {
        Self(predicate)
    }
}

impl<K, V, F> AdmissionFilter<K, V> for KeyPredicate<F>
where
    F: Fn(&K) -> bool,
{
    fn is_cacheable(&self, key: &K, _value: &V, _attributes: &Attributes) -> bool {
        (self.0)(key)
    }
}

impl<F> std::fmt::Debug for KeyPredicate<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPredicate").finish_non_exhaustive()
    }
}

/// Admits elements whose value satisfies a predicate.
#[derive(Clone, Copy)]
pub struct ValuePredicate<F>(F);

impl<F> ValuePredicate<F> {
    pub fn new(predicate: F) -> Self {
        Self(predicate)
    }
}

impl<K, V, F> AdmissionFilter<K, V> for ValuePredicate<F>
where
    F: Fn(&V) -> bool,
{
    fn is_cacheable(&self, _key: &K, value: &V, _attributes: &Attributes) -> bool {
        (self.0)(value)
    }
}

impl<F> std::fmt::Debug for ValuePredicate<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValuePredicate").finish_non_exhaustive()
    }
}

/// Rejects elements larger than a maximum size.
///
/// Elements without an explicit size count as size 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxSize {
    max: u64,
}

impl MaxSize {
    pub const fn new(max: u64) -> Self {
        Self { max }
    }

    pub fn max(&self) -> u64 {
        self.max
    }
}

impl<K, V> AdmissionFilter<K, V> for MaxSize {
    #[inline]
    fn is_cacheable(&self, _key: &K, _value: &V, attributes: &Attributes) -> bool {
        attributes.size() <= self.max
    }
}

/// Rejects elements cheaper to recompute than a minimum cost.
///
/// Elements without an explicit cost count as cost 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinCost {
    min: f64,
}

impl MinCost {
    /// Fails for negative or NaN thresholds.
    pub fn new(min: f64) -> Result<Self, ConfigError> {
        if min.is_nan() || min < 0.0 {
            return Err(ConfigError::new(format!(
                "minimum cost must be a non-negative number, got {min}"
            )));
        }
        Ok(Self { min })
    }

    pub fn min(&self) -> f64 {
        self.min
    }
}

impl<K, V> AdmissionFilter<K, V> for MinCost {
    #[inline]
    fn is_cacheable(&self, _key: &K, _value: &V, attributes: &Attributes) -> bool {
        attributes.cost() >= self.min
    }
}

/// The key- and value-independent filters, selectable at runtime.
///
/// Produced by [`EvictionConfig::admission_filter`](crate::config::EvictionConfig::admission_filter).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Admission {
    AcceptAll(AcceptAll),
    RejectAll(RejectAll),
    MaxSize(MaxSize),
    MinCost(MinCost),
}

impl<K, V> AdmissionFilter<K, V> for Admission {
    fn is_cacheable(&self, key: &K, value: &V, attributes: &Attributes) -> bool {
        match self {
            Admission::AcceptAll(filter) => filter.is_cacheable(key, value, attributes),
            Admission::RejectAll(filter) => filter.is_cacheable(key, value, attributes),
            Admission::MaxSize(filter) => filter.is_cacheable(key, value, attributes),
            Admission::MinCost(filter) => filter.is_cacheable(key, value, attributes),
        }
    }
}
