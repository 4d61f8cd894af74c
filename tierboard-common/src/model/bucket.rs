//! Bucket names: the six tiers plus the unassigned pool

use crate::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Wire name of the unassigned pool
pub const POOL_NAME: &str = "_pool";

/// One of the seven containers an item can live in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Bucket {
    S,
    A,
    B,
    C,
    D,
    F,
    /// Items not yet ranked
    Pool,
}

impl Bucket {
    /// All buckets in presentation order (tiers top to bottom, then the pool)
    pub const ALL: [Bucket; 7] = [
        Bucket::S,
        Bucket::A,
        Bucket::B,
        Bucket::C,
        Bucket::D,
        Bucket::F,
        Bucket::Pool,
    ];

    /// The six ranked tiers
    pub const TIERS: [Bucket; 6] = [
        Bucket::S,
        Bucket::A,
        Bucket::B,
        Bucket::C,
        Bucket::D,
        Bucket::F,
    ];

    /// Name used in the persisted snapshot and on the wire
    pub fn name(self) -> &'static str {
        match self {
            Bucket::S => "S",
            Bucket::A => "A",
            Bucket::B => "B",
            Bucket::C => "C",
            Bucket::D => "D",
            Bucket::F => "F",
            Bucket::Pool => POOL_NAME,
        }
    }

    pub fn is_pool(self) -> bool {
        self == Bucket::Pool
    }

    /// Position of this bucket within [`Bucket::ALL`]
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Bucket {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Bucket::ALL
            .into_iter()
            .find(|b| b.name() == s)
            .ok_or_else(|| Error::UnknownBucket(s.to_string()))
    }
}

impl Serialize for Bucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Bucket {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
