//! Per-session cache of rendered places
//!
//! Rendered places get a short reference id that travels in the directions
//! button. Resolving the id later recovers the destination without a second
//! search call.

use crate::geo::Coordinates;
use std::collections::HashMap;
use std::fmt;

/// Length of generated short ids
pub const SHORT_ID_LEN: usize = 8;

/// Short reference id carried by a directions button
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShortId(String);

impl ShortId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn from_sequence(seq: u32) -> Self {
        Self(format!("{seq:0width$x}", width = SHORT_ID_LEN))
    }
}

impl From<&str> for ShortId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for ShortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Minimal record needed to build directions to a place
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceRef {
    /// External place identifier
    pub place_id: String,
    pub name: String,
    pub location: Coordinates,
}

/// Short id → place mapping owned by a single session.
///
/// Ids come from a per-session sequence that is never rewound, not even by
/// `clear`, so an id handed out earlier can never resolve to a different
/// place later in the same session.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlaceCache {
    entries: HashMap<ShortId, PlaceRef>,
    next_seq: u32,
}

impl PlaceCache {
    /// Store `place` under a fresh id
    pub fn insert(&mut self, place: PlaceRef) -> ShortId {
        self.next_seq = self.next_seq.wrapping_add(1);
        let id = ShortId::from_sequence(self.next_seq);
        self.entries.insert(id.clone(), place);
        id
    }

    pub fn resolve(&self, id: &ShortId) -> Option<&PlaceRef> {
        self.entries.get(id)
    }

    /// Drop all entries; the id sequence keeps counting
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// An empty cache continuing this cache's id sequence
    pub fn emptied(&self) -> Self {
        Self {
            entries: HashMap::new(),
            next_seq: self.next_seq,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
