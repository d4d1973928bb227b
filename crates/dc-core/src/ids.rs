//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  The inner integer is `pub` to allow
//! direct indexing into the registry arena via `id.0 as usize`, but callers
//! should prefer the `.index()` helpers for clarity.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Stable handle of a drone: the host's player/car index.  Also the slot
    /// index in the registry arena.
    pub struct DroneId(u32);
}

/// Team/group tag as reported by the host.  Opaque to the scheduler apart
/// from the field-side helper below.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Team(pub u8);

impl Team {
    pub const BLUE: Team = Team(0);
    pub const ORANGE: Team = Team(1);

    /// `1.0` for blue, `-1.0` for every other team.  Multiply field
    /// coordinates by this to mirror them onto the team's own half.
    #[inline]
    pub fn sign(self) -> f32 {
        if self == Team::BLUE { 1.0 } else { -1.0 }
    }
}

/// Hash set of drone handles used for per-tick bookkeeping.
#[cfg(feature = "fx-hash")]
pub type DroneSet = rustc_hash::FxHashSet<DroneId>;

/// Hash set of drone handles used for per-tick bookkeeping.
#[cfg(not(feature = "fx-hash"))]
pub type DroneSet = std::collections::HashSet<DroneId>;

/// Hash map keyed by drone handle.
#[cfg(feature = "fx-hash")]
pub type DroneMap<V> = rustc_hash::FxHashMap<DroneId, V>;

/// Hash map keyed by drone handle.
#[cfg(not(feature = "fx-hash"))]
pub type DroneMap<V> = std::collections::HashMap<DroneId, V>;
