//! Snapshot: the full state of all buckets at one instant
//!
//! The snapshot is the unit of persistence. It is serialized whole and
//! overwrites the stored copy on every save; it is never patched.
//!
//! # JSON form
//!
//! An object keyed by bucket name. `_pool` is always present; empty tiers are
//! omitted, so the empty snapshot is `{"_pool":[]}`. When reading, missing
//! buckets are empty and unrecognized keys are skipped.

use super::bucket::Bucket;
use crate::{Error, Result};
use serde::de::{IgnoredAny, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, warn};

/// Ordered identifier sequences for every bucket
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    buckets: [Vec<String>; 7],
}

impl Snapshot {
    /// Empty snapshot (every bucket empty)
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from explicit bucket contents; unspecified buckets stay empty
    pub fn from_buckets<I, S>(buckets: I) -> Self
    where
        I: IntoIterator<Item = (Bucket, Vec<S>)>,
        S: Into<String>,
    {
        let mut snapshot = Self::default();
        for (bucket, ids) in buckets {
            snapshot.buckets[bucket.index()] = ids.into_iter().map(Into::into).collect();
        }
        snapshot
    }

    /// Identifiers in `bucket`, in order
    pub fn bucket(&self, bucket: Bucket) -> &[String] {
        &self.buckets[bucket.index()]
    }

    /// Find the bucket and index currently holding `id`
    pub fn locate(&self, id: &str) -> Option<(Bucket, usize)> {
        Bucket::ALL.into_iter().find_map(|bucket| {
            self.buckets[bucket.index()]
                .iter()
                .position(|item| item == id)
                .map(|index| (bucket, index))
        })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.locate(id).is_some()
    }

    /// Total number of items across all buckets
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }

    /// Every identifier, bucket by bucket in presentation order
    pub fn identifiers(&self) -> impl Iterator<Item = &str> + '_ {
        self.buckets.iter().flatten().map(String::as_str)
    }

    /// Append newly uploaded identifiers to the tail of the pool
    ///
    /// Identifiers already present somewhere are skipped. Returns how many
    /// were added.
    pub fn add_to_pool<I, S>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut added = 0;
        for id in ids {
            let id = id.into();
            if id.is_empty() || self.contains(&id) {
                debug!("Skipping pool insert of {:?}: empty or already placed", id);
                continue;
            }
            self.buckets[Bucket::Pool.index()].push(id);
            added += 1;
        }
        added
    }

    /// Remove `id` from whichever bucket holds it
    pub fn remove(&mut self, id: &str) -> Option<(Bucket, usize)> {
        let (bucket, index) = self.locate(id)?;
        self.buckets[bucket.index()].remove(index);
        Some((bucket, index))
    }

    /// Move `id` into `target` at `index`
    ///
    /// The item is removed from its current bucket first, then inserted at
    /// `min(index, len(target))`; indices past the end append. Returns the
    /// index the item landed at.
    pub fn move_item(&mut self, id: &str, target: Bucket, index: usize) -> Result<usize> {
        let (from, from_index) = self
            .locate(id)
            .ok_or_else(|| Error::NotFound(format!("item {}", id)))?;

        let item = self.buckets[from.index()].remove(from_index);
        let dest = &mut self.buckets[target.index()];
        let at = index.min(dest.len());
        dest.insert(at, item);

        debug!("Moved {} from {}[{}] to {}[{}]", id, from, from_index, target, at);
        Ok(at)
    }

    /// Empty every bucket
    pub fn clear(&mut self) {
        self.buckets.iter_mut().for_each(Vec::clear);
    }

    /// Enforce "each identifier at most once": drop repeat occurrences
    /// (keeping the first in presentation order) and empty identifiers
    ///
    /// Returns the number of entries dropped.
    pub fn normalize(&mut self) -> usize {
        let mut seen = HashSet::new();
        let mut dropped = 0;
        for ids in self.buckets.iter_mut() {
            ids.retain(|id| {
                let keep = !id.is_empty() && seen.insert(id.clone());
                if !keep {
                    dropped += 1;
                }
                keep
            });
        }
        if dropped > 0 {
            warn!("Dropped {} duplicate or empty snapshot entries", dropped);
        }
        dropped
    }
}

impl Serialize for Snapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let present: Vec<Bucket> = Bucket::ALL
            .into_iter()
            .filter(|b| b.is_pool() || !self.bucket(*b).is_empty())
            .collect();

        let mut map = serializer.serialize_map(Some(present.len()))?;
        for bucket in present {
            map.serialize_entry(bucket.name(), self.bucket(bucket))?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Snapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct SnapshotVisitor;

        impl<'de> Visitor<'de> for SnapshotVisitor {
            type Value = Snapshot;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping bucket names to identifier arrays")
            }

            fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> std::result::Result<Snapshot, M::Error> {
                let mut snapshot = Snapshot::default();
                while let Some(key) = access.next_key::<String>()? {
                    match key.parse::<Bucket>() {
                        Ok(bucket) => {
                            snapshot.buckets[bucket.index()] = access.next_value()?;
                        }
                        Err(_) => {
                            debug!("Ignoring unknown bucket {:?} in snapshot", key);
                            access.next_value::<IgnoredAny>()?;
                        }
                    }
                }
                Ok(snapshot)
            }
        }

        deserializer.deserialize_map(SnapshotVisitor)
    }
}
