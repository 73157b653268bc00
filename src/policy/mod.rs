//! # Replacement Policies
//!
//! Every policy stores elements in a handle arena and answers one question:
//! which element goes next. The surrounding cache keeps the returned
//! [`Handle`] beside its own entry and reports accesses back through it.
//!
//! ## Architecture
//!
//! ```text
//!                   ┌──────────────────────────────────────────┐
//!                   │         ReplacementPolicy<T>             │
//!                   │                                          │
//!                   │  add(T, Attributes)      → Option<Handle>│
//!                   │  update(Handle, T, Attr) → Result<T>     │
//!                   │  touch(Handle)           → Result<()>    │
//!                   │  remove(Handle)          → Result<T>     │
//!                   │  evict_next()            → Option<T>     │
//!                   │  peek() / peek_all() / eviction_order()  │
//!                   └────────────────────┬─────────────────────┘
//!                                        │
//!        ┌──────────┬──────────┬─────────┼─────────┬──────────┬──────────┐
//!        ▼          ▼          ▼         ▼         ▼          ▼          ▼
//!      Lru        Mru        Fifo      Lifo      Clock      Random      Lfu
//!        │          │          │         │         │          │          │
//!        └──────────┴────┬─────┴─────────┘         │          │          │
//!                        ▼                         ▼          ▼          ▼
//!                  OrderedCore<T>            IntrusiveList  DenseSet  FrequencyBuckets
//!                  (IntrusiveList)           + clock hand   + SmallRng
//! ```
//!
//! ## Policy Summary
//!
//! | Policy | `touch`              | `evict_next` selects                         |
//! |--------|----------------------|----------------------------------------------|
//! | LRU    | move to MRU end      | least recently added or touched              |
//! | MRU    | move to MRU end      | most recently added or touched               |
//! | FIFO   | no effect            | oldest insertion                             |
//! | LIFO   | no effect            | newest insertion                             |
//! | Clock  | set reference bit    | first unreferenced entry from the hand       |
//! | Random | no effect            | uniformly random live element                |
//! | LFU    | frequency += 1       | lowest frequency, oldest insertion on ties   |
//!
//! ## Dispatch
//!
//! [`Policy<T>`] is a closed enum over the seven variants, chosen once at
//! construction (see [`PolicyKind`]). Code that knows its policy statically
//! can use the concrete types directly; both implement [`ReplacementPolicy`].
//!
//! ```
//! use evictkit::attributes::Attributes;
//! use evictkit::policy::{Policy, PolicyKind, ReplacementPolicy};
//!
//! let mut policy: Policy<&str> = Policy::new(PolicyKind::Lru);
//! let a = policy.add("a", Attributes::default()).unwrap();
//! policy.add("b", Attributes::default()).unwrap();
//! policy.touch(a).unwrap();
//!
//! assert_eq!(policy.peek_all(), vec![&"b", &"a"]);
//! assert_eq!(policy.evict_next(), Some("b"));
//! ```

use std::fmt;
use std::str::FromStr;

use crate::attributes::Attributes;
use crate::ds::Handle;
use crate::error::{ConfigError, PolicyError};

pub mod clock;
pub mod fifo;
pub mod lfu;
pub mod lifo;
pub mod lru;
pub mod mru;
pub mod random;

mod ordered;

use clock::ClockPolicy;
use fifo::FifoPolicy;
use lfu::LfuPolicy;
use lifo::LifoPolicy;
use lru::LruPolicy;
use mru::MruPolicy;
use random::RandomPolicy;

/// Value plus attributes, as stored in every policy's arena.
#[derive(Debug, Clone)]
pub(crate) struct Entry<T> {
    pub(crate) value: T,
    pub(crate) attributes: Attributes,
}

impl<T> Entry<T> {
    pub(crate) fn new(value: T, attributes: Attributes) -> Self {
        Self { value, attributes }
    }

    pub(crate) fn into_parts(self) -> (T, Attributes) {
        (self.value, self.attributes)
    }
}

/// Capability shared by every replacement policy.
///
/// Handles returned by [`add`](Self::add) stay valid through any number of
/// `touch`/`update` calls and die with exactly one successful `remove`,
/// eviction, or `clear`. Every later use yields
/// [`PolicyError::InvalidHandle`].
pub trait ReplacementPolicy<T> {
    /// Starts tracking `value`. `None` means the policy refused it.
    fn add(&mut self, value: T, attributes: Attributes) -> Option<Handle>;

    /// Replaces the value and attributes behind `handle`, keeping its
    /// position, frequency and reference state. Returns the old value.
    fn update(&mut self, handle: Handle, value: T, attributes: Attributes)
    -> Result<T, PolicyError>;

    /// Records an access.
    fn touch(&mut self, handle: Handle) -> Result<(), PolicyError>;

    /// Stops tracking `handle` and returns its value.
    fn remove(&mut self, handle: Handle) -> Result<T, PolicyError>;

    /// Removes the next victim and returns it with its attributes.
    fn evict_next_entry(&mut self) -> Option<(T, Attributes)>;

    /// Removes and returns the next victim, or `None` when empty.
    fn evict_next(&mut self) -> Option<T> {
        self.evict_next_entry().map(|(value, _)| value)
    }

    /// Handles of every live element, next victim first.
    fn eviction_order(&self) -> Vec<Handle>;

    /// The element [`evict_next`](Self::evict_next) would return.
    fn peek(&self) -> Option<&T> {
        let first = self.eviction_order().first().copied()?;
        self.get(first).ok()
    }

    /// Every live element in eviction order.
    fn peek_all(&self) -> Vec<&T> {
        self.eviction_order()
            .into_iter()
            .filter_map(|handle| self.get(handle).ok())
            .collect()
    }

    fn get(&self, handle: Handle) -> Result<&T, PolicyError>;

    fn attributes(&self, handle: Handle) -> Result<Attributes, PolicyError>;

    /// Drops every element; all outstanding handles become invalid.
    fn clear(&mut self);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum of [`Attributes::size`] over live elements.
    fn volume(&self) -> u64;

    fn kind(&self) -> PolicyKind;
}

// ---------------------------------------------------------------------------
// PolicyKind
// ---------------------------------------------------------------------------

/// Names the available replacement policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PolicyKind {
    Lru,
    Mru,
    Fifo,
    Lifo,
    Clock,
    Random,
    Lfu,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 7] = [
        PolicyKind::Lru,
        PolicyKind::Mru,
        PolicyKind::Fifo,
        PolicyKind::Lifo,
        PolicyKind::Clock,
        PolicyKind::Random,
        PolicyKind::Lfu,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            PolicyKind::Lru => "lru",
            PolicyKind::Mru => "mru",
            PolicyKind::Fifo => "fifo",
            PolicyKind::Lifo => "lifo",
            PolicyKind::Clock => "clock",
            PolicyKind::Random => "random",
            PolicyKind::Lfu => "lfu",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyKind {
    type Err = ConfigError;

    /// Parses a policy name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PolicyKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::new(format!("unknown replacement policy: {s:?}")))
    }
}

// ---------------------------------------------------------------------------
// Policy<T>
// ---------------------------------------------------------------------------

/// A replacement policy chosen at runtime.
#[derive(Debug, Clone)]
pub enum Policy<T> {
    Lru(LruPolicy<T>),
    Mru(MruPolicy<T>),
    Fifo(FifoPolicy<T>),
    Lifo(LifoPolicy<T>),
    Clock(ClockPolicy<T>),
    Random(RandomPolicy<T>),
    Lfu(LfuPolicy<T>),
}

macro_rules! dispatch {
    ($self:expr, $p:ident => $body:expr) => {
        match $self {
            Policy::Lru($p) => $body,
            Policy::Mru($p) => $body,
            Policy::Fifo($p) => $body,
            Policy::Lifo($p) => $body,
            Policy::Clock($p) => $body,
            Policy::Random($p) => $body,
            Policy::Lfu($p) => $body,
        }
    };
}

impl<T> Policy<T> {
    /// Creates an empty, unbounded policy of the given kind.
    pub fn new(kind: PolicyKind) -> Self {
        Self::with_capacity(kind, 0)
    }

    /// Creates an empty, unbounded policy with `hint` slots pre-allocated.
    pub fn with_capacity(kind: PolicyKind, hint: usize) -> Self {
        match kind {
            PolicyKind::Lru => Policy::Lru(LruPolicy::with_capacity(hint)),
            PolicyKind::Mru => Policy::Mru(MruPolicy::with_capacity(hint)),
            PolicyKind::Fifo => Policy::Fifo(FifoPolicy::with_capacity(hint)),
            PolicyKind::Lifo => Policy::Lifo(LifoPolicy::with_capacity(hint)),
            PolicyKind::Clock => Policy::Clock(ClockPolicy::with_capacity(hint)),
            PolicyKind::Random => Policy::Random(RandomPolicy::with_capacity(hint)),
            PolicyKind::Lfu => Policy::Lfu(LfuPolicy::with_capacity(hint)),
        }
    }

    /// Creates a policy that refuses `add` once it holds `limit` elements.
    pub fn bounded(kind: PolicyKind, limit: usize) -> Self {
        match kind {
            PolicyKind::Lru => Policy::Lru(LruPolicy::bounded(limit)),
            PolicyKind::Mru => Policy::Mru(MruPolicy::bounded(limit)),
            PolicyKind::Fifo => Policy::Fifo(FifoPolicy::bounded(limit)),
            PolicyKind::Lifo => Policy::Lifo(LifoPolicy::bounded(limit)),
            PolicyKind::Clock => Policy::Clock(ClockPolicy::bounded(limit)),
            PolicyKind::Random => Policy::Random(RandomPolicy::bounded(limit)),
            PolicyKind::Lfu => Policy::Lfu(LfuPolicy::bounded(limit)),
        }
    }

    /// Reseeds the generator of a random policy; no effect on other kinds.
    pub fn reseed(&mut self, seed: u64) {
        if let Policy::Random(random) = self {
            random.reseed(seed);
        }
    }
}

impl<T> ReplacementPolicy<T> for Policy<T> {
    fn add(&mut self, value: T, attributes: Attributes) -> Option<Handle> {
        dispatch!(self, p => p.add(value, attributes))
    }

    fn update(
        &mut self,
        handle: Handle,
        value: T,
        attributes: Attributes,
    ) -> Result<T, PolicyError> {
        dispatch!(self, p => p.update(handle, value, attributes))
    }

    fn touch(&mut self, handle: Handle) -> Result<(), PolicyError> {
        dispatch!(self, p => p.touch(handle))
    }

    fn remove(&mut self, handle: Handle) -> Result<T, PolicyError> {
        dispatch!(self, p => p.remove(handle))
    }

    fn evict_next_entry(&mut self) -> Option<(T, Attributes)> {
        dispatch!(self, p => p.evict_next_entry())
    }

    fn evict_next(&mut self) -> Option<T> {
        dispatch!(self, p => p.evict_next())
    }

    fn eviction_order(&self) -> Vec<Handle> {
        dispatch!(self, p => p.eviction_order())
    }

    fn peek(&self) -> Option<&T> {
        dispatch!(self, p => p.peek())
    }

    fn peek_all(&self) -> Vec<&T> {
        dispatch!(self, p => p.peek_all())
    }

    fn get(&self, handle: Handle) -> Result<&T, PolicyError> {
        dispatch!(self, p => p.get(handle))
    }

    fn attributes(&self, handle: Handle) -> Result<Attributes, PolicyError> {
        dispatch!(self, p => p.attributes(handle))
    }

    fn clear(&mut self) {
        dispatch!(self, p => p.clear())
    }

    fn len(&self) -> usize {
        dispatch!(self, p => p.len())
    }

    fn volume(&self) -> u64 {
        dispatch!(self, p => p.volume())
    }

    fn kind(&self) -> PolicyKind {
        dispatch!(self, p => p.kind())
    }
}

macro_rules! impl_from {
    ($($variant:ident($ty:ident)),* $(,)?) => {
        $(
            impl<T> From<$ty<T>> for Policy<T> {
                fn from(policy: $ty<T>) -> Self {
                    Policy::$variant(policy)
                }
            }
        )*
    };
}

impl_from!(
    Lru(LruPolicy),
    Mru(MruPolicy),
    Fifo(FifoPolicy),
    Lifo(LifoPolicy),
    Clock(ClockPolicy),
    Random(RandomPolicy),
    Lfu(LfuPolicy),
);

#[cfg(test)]
mod tests {
    use super::*;

    // ==============================================
    // PolicyKind
    // ==============================================

    mod policy_kind {
        use super::*;

        #[test]
        fn parses_case_insensitively() {
            assert_eq!("LRU".parse::<PolicyKind>(), Ok(PolicyKind::Lru));
            assert_eq!(" clock ".parse::<PolicyKind>(), Ok(PolicyKind::Clock));
            assert_eq!("Lfu".parse::<PolicyKind>(), Ok(PolicyKind::Lfu));
        }

        #[test]
        fn rejects_unknown_names() {
            let err = "arc".parse::<PolicyKind>().unwrap_err();
            assert!(err.message().contains("arc"));
        }

        #[test]
        fn display_round_trips() {
            for kind in PolicyKind::ALL {
                assert_eq!(kind.to_string().parse::<PolicyKind>(), Ok(kind));
            }
        }
    }

    // ==============================================
    // Policy<T> dispatch
    // ==============================================

    mod dispatch {
        use super::*;

        #[test]
        fn new_builds_requested_kind() {
            for kind in PolicyKind::ALL {
                let policy: Policy<u32> = Policy::new(kind);
                assert_eq!(policy.kind(), kind);
                assert!(policy.is_empty());
            }
        }

        #[test]
        fn every_kind_supports_the_contract() {
            for kind in PolicyKind::ALL {
                let mut policy: Policy<u32> = Policy::new(kind);
                let a = policy.add(1, Attributes::new().with_size(3)).unwrap();
                let b = policy.add(2, Attributes::default()).unwrap();
                assert_eq!(policy.len(), 2);
                assert_eq!(policy.volume(), 4);

                policy.touch(a).unwrap();
                assert_eq!(policy.update(b, 20, Attributes::default()), Ok(2));
                assert_eq!(policy.get(b), Ok(&20));
                assert_eq!(policy.attributes(a).map(|attrs| attrs.size()), Ok(3));

                assert_eq!(policy.peek_all().len(), 2);
                assert_eq!(policy.remove(a), Ok(1));
                assert_eq!(policy.volume(), 1);
                assert_eq!(policy.evict_next(), Some(20));
                assert_eq!(policy.evict_next(), None);
                assert!(policy.touch(a).is_err(), "{kind}");
            }
        }

        #[test]
        fn bounded_refuses_past_limit() {
            for kind in PolicyKind::ALL {
                let mut policy: Policy<u32> = Policy::bounded(kind, 1);
                assert!(policy.add(1, Attributes::default()).is_some());
                assert!(policy.add(2, Attributes::default()).is_none(), "{kind}");
                assert_eq!(policy.len(), 1);

                let mut zero: Policy<u32> = Policy::bounded(kind, 0);
                assert!(zero.add(1, Attributes::default()).is_none());
            }
        }

        #[test]
        fn from_concrete_policy() {
            let policy: Policy<u8> = LruPolicy::new().into();
            assert_eq!(policy.kind(), PolicyKind::Lru);
        }
    }
}
