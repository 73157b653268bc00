//! Eviction coordinator.
//!
//! Owns a replacement policy plus four thresholds and turns "the cache is too
//! big" into a list of victims. The coordinator never touches the cache's
//! entry store; callers remove whatever it hands back.
//!
//! ## Thresholds
//!
//! ```text
//!   0 ─────────────── preferable ─────────── maximum ──────────► size / volume
//!                         ▲                      ▲
//!                         │                      └── breach: current > maximum
//!                         └── enforce() evicts down to here
//! ```
//!
//! | Threshold           | Unset means                     |
//! |---------------------|---------------------------------|
//! | `max_size`          | `usize::MAX` (never breached)   |
//! | `max_volume`        | `u64::MAX` (never breached)     |
//! | `preferable_size`   | `usize::MAX` (use `max_size`)   |
//! | `preferable_volume` | `u64::MAX` (use `max_volume`)   |
//!
//! Setters take `Option`, with `None` as the unbounded marker. Storing
//! `usize::MAX`/`u64::MAX` directly is equivalent. Every setter validates
//! the resulting thresholds and rejects a preferable value above its
//! maximum with [`ConfigError`], leaving the coordinator unchanged.
//!
//! ## Example Usage
//!
//! ```
//! use evictkit::attributes::Attributes;
//! use evictkit::coordinator::{EvictionCoordinator, Thresholds};
//! use evictkit::policy::ReplacementPolicy;
//! use evictkit::policy::lru::LruPolicy;
//!
//! let thresholds = Thresholds {
//!     max_size: Some(5),
//!     ..Thresholds::default()
//! };
//! let mut coordinator = EvictionCoordinator::try_new(LruPolicy::new(), thresholds).unwrap();
//! for i in 0..9 {
//!     coordinator.policy_mut().add(i, Attributes::default()).unwrap();
//! }
//!
//! assert!(coordinator.is_size_breached(coordinator.policy().len()));
//! let victims = coordinator.evict_to(5, u64::MAX);
//! assert_eq!(victims, vec![0, 1, 2, 3]);
//! assert_eq!(coordinator.policy().len(), 5);
//! ```
use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::policy::ReplacementPolicy;

/// Optional thresholds accepted by [`EvictionCoordinator::try_new`].
///
/// `None` leaves the threshold unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Thresholds {
    pub max_size: Option<usize>,
    pub max_volume: Option<u64>,
    pub preferable_size: Option<usize>,
    pub preferable_volume: Option<u64>,
}

impl Thresholds {
    /// Checks that each preferable threshold does not exceed its maximum.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let (Some(preferable), Some(max)) = (self.preferable_size, self.max_size)
            && preferable > max
        {
            return Err(ConfigError::new(format!(
                "preferable size {preferable} exceeds maximum size {max}"
            )));
        }
        if let (Some(preferable), Some(max)) = (self.preferable_volume, self.max_volume)
            && preferable > max
        {
            return Err(ConfigError::new(format!(
                "preferable volume {preferable} exceeds maximum volume {max}"
            )));
        }
        Ok(())
    }
}

/// Drives a replacement policy against size and volume thresholds.
#[derive(Debug, Clone)]
pub struct EvictionCoordinator<P> {
    policy: P,
    max_size: usize,
    max_volume: u64,
    preferable_size: usize,
    preferable_volume: u64,
}

impl<P> EvictionCoordinator<P> {
    /// Wraps `policy` with every threshold unbounded.
    pub fn new(policy: P) -> Self {
        Self {
            policy,
            max_size: usize::MAX,
            max_volume: u64::MAX,
            preferable_size: usize::MAX,
            preferable_volume: u64::MAX,
        }
    }

    /// Wraps `policy` with validated thresholds.
    pub fn try_new(policy: P, thresholds: Thresholds) -> Result<Self, ConfigError> {
        let mut coordinator = Self::new(policy);
        coordinator.set_thresholds(thresholds)?;
        Ok(coordinator)
    }

    /// Shared access to the wrapped policy.
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Mutable access for `add`, `touch`, `update` and `remove`.
    pub fn policy_mut(&mut self) -> &mut P {
        &mut self.policy
    }

    /// Unwraps the coordinator, returning the policy.
    pub fn into_policy(self) -> P {
        self.policy
    }

    /// Element count above which the size threshold is breached.
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Total size above which the volume threshold is breached.
    pub fn max_volume(&self) -> u64 {
        self.max_volume
    }

    /// Element count [`enforce`](Self::enforce) evicts down to.
    pub fn preferable_size(&self) -> usize {
        self.preferable_size
    }

    /// Total size [`enforce`](Self::enforce) evicts down to.
    pub fn preferable_volume(&self) -> u64 {
        self.preferable_volume
    }

    /// Sets the maximum size; `None` removes the bound.
    ///
    /// Fails, leaving every threshold unchanged, if the preferable size
    /// would end up above the maximum.
    pub fn set_max_size(&mut self, max_size: Option<usize>) -> Result<(), ConfigError> {
        self.set_thresholds(Thresholds {
            max_size,
            ..self.thresholds()
        })
    }

    /// Sets the maximum volume; `None` removes the bound.
    pub fn set_max_volume(&mut self, max_volume: Option<u64>) -> Result<(), ConfigError> {
        self.set_thresholds(Thresholds {
            max_volume,
            ..self.thresholds()
        })
    }

    /// Sets the preferable size; `None` falls back to the maximum.
    pub fn set_preferable_size(
        &mut self,
        preferable_size: Option<usize>,
    ) -> Result<(), ConfigError> {
        self.set_thresholds(Thresholds {
            preferable_size,
            ..self.thresholds()
        })
    }

    /// Sets the preferable volume; `None` falls back to the maximum.
    pub fn set_preferable_volume(
        &mut self,
        preferable_volume: Option<u64>,
    ) -> Result<(), ConfigError> {
        self.set_thresholds(Thresholds {
            preferable_volume,
            ..self.thresholds()
        })
    }

    /// Replaces all four thresholds at once, after validating them.
    ///
    /// Useful when tightening a maximum below the current preferable value,
    /// which the single setters reject one step at a time.
    pub fn set_thresholds(&mut self, thresholds: Thresholds) -> Result<(), ConfigError> {
        thresholds.validate()?;
        self.max_size = thresholds.max_size.unwrap_or(usize::MAX);
        self.max_volume = thresholds.max_volume.unwrap_or(u64::MAX);
        self.preferable_size = thresholds.preferable_size.unwrap_or(usize::MAX);
        self.preferable_volume = thresholds.preferable_volume.unwrap_or(u64::MAX);
        Ok(())
    }

    /// Current thresholds, with unbounded ones reported as `None`.
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            max_size: (self.max_size != usize::MAX).then_some(self.max_size),
            max_volume: (self.max_volume != u64::MAX).then_some(self.max_volume),
            preferable_size: (self.preferable_size != usize::MAX).then_some(self.preferable_size),
            preferable_volume: (self.preferable_volume != u64::MAX)
                .then_some(self.preferable_volume),
        }
    }

    /// Returns `true` if `current` exceeds the maximum size.
    #[inline]
    pub fn is_size_breached(&self, current: usize) -> bool {
        current > self.max_size
    }

    /// Returns `true` if `current` exceeds the maximum volume.
    #[inline]
    pub fn is_volume_breached(&self, current: u64) -> bool {
        current > self.max_volume
    }

    /// Evicts up to `count` elements, fewer if the policy runs dry.
    pub fn evict<T>(&mut self, count: usize) -> Vec<T>
    where
        P: ReplacementPolicy<T>,
    {
        let victims: Vec<T> = std::iter::from_fn(|| self.policy.evict_next())
            .take(count)
            .collect();
        trace!(requested = count, evicted = victims.len(), "evicted by count");
        victims
    }

    /// Evicts until the policy holds at most `target_size` elements and
    /// `target_volume` total size.
    ///
    /// Each victim lowers the size gap by one and the volume gap by its
    /// [`size`](crate::attributes::Attributes::size). Running out of
    /// elements first is not an error; whatever was evicted is returned.
    pub fn evict_to<T>(&mut self, target_size: usize, target_volume: u64) -> Vec<T>
    where
        P: ReplacementPolicy<T>,
    {
        let mut size_diff = self.policy.len() as i128 - target_size as i128;
        let mut volume_diff = i128::from(self.policy.volume()) - i128::from(target_volume);
        let mut victims = Vec::new();

        while size_diff > 0 || volume_diff > 0 {
            let Some((value, attributes)) = self.policy.evict_next_entry() else {
                debug!(size_diff, volume_diff, "policy emptied before reaching eviction target");
                break;
            };
            size_diff -= 1;
            volume_diff -= i128::from(attributes.size());
            victims.push(value);
        }

        debug!(
            target_size,
            target_volume,
            evicted = victims.len(),
            remaining = self.policy.len(),
            "evicted to target"
        );
        victims
    }

    /// Evicts down to the preferable thresholds if either maximum is
    /// breached. Unset preferable thresholds fall back to the maximums.
    pub fn enforce<T>(&mut self) -> Vec<T>
    where
        P: ReplacementPolicy<T>,
    {
        let size = self.policy.len();
        let volume = self.policy.volume();
        if !self.is_size_breached(size) && !self.is_volume_breached(volume) {
            return Vec::new();
        }
        let target_size = if self.preferable_size == usize::MAX {
            self.max_size
        } else {
            self.preferable_size
        };
        let target_volume = if self.preferable_volume == u64::MAX {
            self.max_volume
        } else {
            self.preferable_volume
        };
        self.evict_to(target_size, target_volume)
    }
}
