//! Error types for the evictkit library.
//!
//! ## Key Components
//!
//! - [`PolicyError`]: Returned when a caller hands a policy a handle that does
//!   not address a live element (negative, out of range, or stale).
//! - [`ConfigError`]: Returned when thresholds or filter parameters are
//!   invalid (negative cost, preferable threshold above the maximum, ...).
//!
//! Refusing an element in `add` is *not* an error: policies return `None`
//! and the caller branches on it.
//!
//! ## Example Usage
//!
//! ```
//! use evictkit::error::PolicyError;
//! use evictkit::policy::lru::LruPolicy;
//! use evictkit::policy::ReplacementPolicy;
//! use evictkit::attributes::Attributes;
//!
//! let mut lru = LruPolicy::new();
//! let handle = lru.add("a", Attributes::default()).unwrap();
//! assert_eq!(lru.remove(handle), Ok("a"));
//!
//! // The handle died with its element.
//! assert_eq!(lru.touch(handle), Err(PolicyError::InvalidHandle(handle.index() as i64)));
//! ```

use thiserror::Error;

// ---------------------------------------------------------------------------
// PolicyError
// ---------------------------------------------------------------------------

/// Error returned by policy operations addressed by handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// The handle is negative, out of range, or refers to a slot that has
    /// been freed (and possibly recycled) since the handle was issued.
    ///
    /// Carries the raw slot index the caller supplied.
    #[error("invalid handle {0}: no live element at this slot")]
    InvalidHandle(i64),
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when configuration parameters are invalid.
///
/// Produced at construction time only: by [`EvictionConfigBuilder::build`],
/// [`EvictionCoordinator::try_new`] and parameterized admission filters.
/// Carries a human-readable description of which parameter failed.
///
/// # Example
///
/// ```
/// use evictkit::admission::MinCost;
///
/// let err = MinCost::new(-1.0).unwrap_err();
/// assert!(err.to_string().contains("cost"));
/// ```
///
/// [`EvictionConfigBuilder::build`]: crate::config::EvictionConfigBuilder::build
/// [`EvictionCoordinator::try_new`]: crate::coordinator::EvictionCoordinator::try_new
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- PolicyError ------------------------------------------------------

    #[test]
    fn invalid_handle_display_names_slot() {
        let err = PolicyError::InvalidHandle(7);
        assert_eq!(
            err.to_string(),
            "invalid handle 7: no live element at this slot"
        );
    }

    #[test]
    fn invalid_handle_keeps_negative_index() {
        let err = PolicyError::InvalidHandle(-3);
        assert!(err.to_string().contains("-3"));
    }

    #[test]
    fn policy_error_implements_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<PolicyError>();
    }

    // -- ConfigError ------------------------------------------------------

    #[test]
    fn config_display_shows_message() {
        let err = ConfigError::new("maximum size must not be below preferable size");
        assert_eq!(
            err.to_string(),
            "maximum size must not be below preferable size"
        );
    }

    #[test]
    fn config_message_accessor() {
        let err = ConfigError::new("test");
        assert_eq!(err.message(), "test");
    }

    #[test]
    fn config_clone_and_eq() {
        let a = ConfigError::new("x");
        let b = a.clone();
        assert_eq!(a, b);
    }

    #[test]
    fn config_implements_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<ConfigError>();
    }
}
