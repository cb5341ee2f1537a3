//! Artifact identifiers and the per-session allocator that issues them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Identifier shared by every artifact kind.
///
/// Unique across requirements, epics, stories and tasks within one board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactId(u64);

impl ArtifactId {
    /// Wrap a raw value. Only the allocator should mint ids for live records.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The underlying counter value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ArtifactId {
    type Err = ParseIntError;

    /// Accepts `7` as well as the `#7` form shown on cards.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let digits = s.strip_prefix('#').unwrap_or(s);
        digits.parse().map(Self)
    }
}

/// Monotonic id counter owned by a single board session.
///
/// Starts at 1. Mutation goes through `&mut self`, so sharing it across
/// users means putting the owning board behind a lock.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    /// Create an allocator whose first id is 1.
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Return the current counter value and advance it.
    pub fn next_id(&mut self) -> ArtifactId {
        let id = ArtifactId(self.next);
        self.next += 1;
        id
    }

    /// The id the next call to [`next_id`](Self::next_id) will return.
    pub fn peek(&self) -> ArtifactId {
        ArtifactId(self.next)
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_id_is_one() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.next_id().get(), 1);
        assert_eq!(ids.next_id().get(), 2);
    }

    #[test]
    fn test_ids_strictly_increase() {
        let mut ids = IdAllocator::new();
        let issued: Vec<ArtifactId> = (0..500).map(|_| ids.next_id()).collect();
        assert!(issued.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(issued.last().map(|id| id.get()), Some(500));
    }

    #[test]
    fn test_peek_does_not_advance() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.peek(), ArtifactId::from_raw(1));
        assert_eq!(ids.peek(), ArtifactId::from_raw(1));
        assert_eq!(ids.next_id(), ArtifactId::from_raw(1));
        assert_eq!(ids.peek(), ArtifactId::from_raw(2));
    }

    #[test]
    fn test_parse_accepts_hash_prefix() {
        assert_eq!("7".parse::<ArtifactId>().unwrap(), ArtifactId::from_raw(7));
        assert_eq!(" #12 ".parse::<ArtifactId>().unwrap(), ArtifactId::from_raw(12));
        assert!("seven".parse::<ArtifactId>().is_err());
        assert!("#".parse::<ArtifactId>().is_err());
    }

    #[test]
    fn test_id_serde_is_transparent() {
        let json = serde_json::to_string(&ArtifactId::from_raw(3)).unwrap();
        assert_eq!(json, "3");
    }
}
