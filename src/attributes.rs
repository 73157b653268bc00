//! Per-element size and cost.
//!
//! Volume-aware eviction and the size/cost admission filters read these.
//! Unset values fall back to a size of `1` and a cost of `1.0`, so a policy
//! fed only default attributes has `volume() == len()`.
//!
//! ```
//! use evictkit::attributes::Attributes;
//!
//! let attrs = Attributes::new().with_size(4096).with_cost(2.5);
//! assert_eq!(attrs.size(), 4096);
//! assert_eq!(attrs.cost(), 2.5);
//!
//! let default = Attributes::default();
//! assert_eq!(default.size(), 1);
//! assert_eq!(default.cost(), 1.0);
//! ```

/// Size used when an element carries none.
pub const DEFAULT_SIZE: u64 = 1;

/// Cost used when an element carries none.
pub const DEFAULT_COST: f64 = 1.0;

/// Optional size and cost attached to a cached element.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attributes {
    size: Option<u64>,
    cost: Option<f64>,
}

impl Attributes {
    /// Attributes with neither size nor cost set.
    pub const fn new() -> Self {
        Self {
            size: None,
            cost: None,
        }
    }

    pub const fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub const fn with_cost(mut self, cost: f64) -> Self {
        self.cost = Some(cost);
        self
    }

    /// Element size, or [`DEFAULT_SIZE`] when unset.
    #[inline]
    pub fn size(&self) -> u64 {
        self.size.unwrap_or(DEFAULT_SIZE)
    }

    /// Element cost, or [`DEFAULT_COST`] when unset.
    #[inline]
    pub fn cost(&self) -> f64 {
        self.cost.unwrap_or(DEFAULT_COST)
    }

    pub fn raw_size(&self) -> Option<u64> {
        self.size
    }

    pub fn raw_cost(&self) -> Option<f64> {
        self.cost
    }
}
