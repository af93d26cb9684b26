//! Player identification and the ordered player registry.
//!
//! ## PlayerId
//!
//! Stable identifier handed in by the session layer (a username or
//! connection id). The engine never interprets it.
//!
//! ## PlayerRegistry
//!
//! Insertion-ordered map from `PlayerId` to per-player data. Insertion
//! order is turn order. Backed by a `Vec` plus an id → index table, so
//! lookups are O(1) and iteration is stable across snapshots.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Stable player identifier.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub String);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Insertion-ordered per-player storage.
///
/// ## Example
///
/// ```
/// use blueprint_engine::core::{PlayerId, PlayerRegistry};
///
/// let mut seats: PlayerRegistry<u32> = PlayerRegistry::new();
/// seats.insert(PlayerId::new("ada"), 1);
/// seats.insert(PlayerId::new("bo"), 2);
///
/// assert_eq!(seats.get(&PlayerId::new("bo")), Some(&2));
/// assert_eq!(seats.next_after(&PlayerId::new("bo")), Some(&PlayerId::new("ada")));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerRegistry<T> {
    entries: Vec<(PlayerId, T)>,
    index: FxHashMap<PlayerId, usize>,
}

impl<T> Default for PlayerRegistry<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: FxHashMap::default(),
        }
    }
}

impl<T> PlayerRegistry<T> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered players.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no players are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check if a player is registered.
    #[must_use]
    pub fn contains(&self, id: &PlayerId) -> bool {
        self.index.contains_key(id)
    }

    /// Register a player at the end of the turn order.
    ///
    /// Returns false (and leaves the registry untouched) if the id is taken.
    pub fn insert(&mut self, id: PlayerId, value: T) -> bool {
        if self.index.contains_key(&id) {
            return false;
        }
        self.index.insert(id.clone(), self.entries.len());
        self.entries.push((id, value));
        true
    }

    /// Remove a player, preserving the order of everyone else.
    pub fn remove(&mut self, id: &PlayerId) -> Option<T> {
        let position = self.index.remove(id)?;
        let (_, value) = self.entries.remove(position);
        self.reindex();
        Some(value)
    }

    /// Get a player's data.
    #[must_use]
    pub fn get(&self, id: &PlayerId) -> Option<&T> {
        self.index.get(id).map(|&i| &self.entries[i].1)
    }

    /// Get a player's data mutably.
    pub fn get_mut(&mut self, id: &PlayerId) -> Option<&mut T> {
        match self.index.get(id) {
            Some(&i) => Some(&mut self.entries[i].1),
            None => None,
        }
    }

    /// Position of a player in turn order.
    #[must_use]
    pub fn position(&self, id: &PlayerId) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// The first player in turn order.
    #[must_use]
    pub fn first_id(&self) -> Option<&PlayerId> {
        self.entries.first().map(|(id, _)| id)
    }

    /// The player after `id` in turn order, wrapping around.
    ///
    /// Returns `None` if `id` is not registered.
    #[must_use]
    pub fn next_after(&self, id: &PlayerId) -> Option<&PlayerId> {
        let position = self.position(id)?;
        let next = (position + 1) % self.entries.len();
        Some(&self.entries[next].0)
    }

    /// Iterate over player ids in turn order.
    pub fn ids(&self) -> impl Iterator<Item = &PlayerId> {
        self.entries.iter().map(|(id, _)| id)
    }

    /// Iterate over (id, data) pairs in turn order.
    pub fn iter(&self) -> impl Iterator<Item = (&PlayerId, &T)> {
        self.entries.iter().map(|(id, v)| (id, v))
    }

    /// Iterate mutably over (id, data) pairs in turn order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&PlayerId, &mut T)> {
        self.entries.iter_mut().map(|(id, v)| (&*id, v))
    }

    /// Iterate over player data in turn order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|(_, v)| v)
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (i, (id, _)) in self.entries.iter().enumerate() {
            self.index.insert(id.clone(), i);
        }
    }
}

impl<T: Serialize> Serialize for PlayerRegistry<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for PlayerRegistry<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries: Vec<(PlayerId, T)> = Vec::deserialize(deserializer)?;
        let mut registry = Self {
            entries,
            index: FxHashMap::default(),
        };
        registry.reindex();
        if registry.index.len() != registry.entries.len() {
            return Err(serde::de::Error::custom("duplicate player id in registry"));
        }
        Ok(registry)
    }
}
