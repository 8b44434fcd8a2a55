//! Strongly-typed identifier value objects.
//!
//! Stories and users are keyed by the unsigned integer identifiers the
//! persistence layer hands out, so these wrap `u64` rather than UUIDs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a story.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoryId(u64);

impl StoryId {
    /// Creates a StoryId from its raw value.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for StoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for StoryId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

impl From<u64> for StoryId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Identifier of the user who owns a story or artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u64);

impl UserId {
    /// Creates a UserId from its raw value.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
