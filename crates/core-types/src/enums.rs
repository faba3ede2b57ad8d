use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of customer that took a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Member,
    Casual,
    Unknown,
}

impl UserType {
    /// Maps a raw, possibly messy category value onto a known variant.
    ///
    /// Whitespace and case are ignored; anything unrecognized becomes `Unknown`.
    pub fn parse_normalized(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "member" => UserType::Member,
            "casual" => UserType::Casual,
            _ => UserType::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Member => "member",
            UserType::Casual => "casual",
            UserType::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BikeType {
    Classic,
    Electric,
    Unknown,
}

impl BikeType {
    pub fn parse_normalized(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "classic" => BikeType::Classic,
            "electric" => BikeType::Electric,
            _ => BikeType::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BikeType::Classic => "classic",
            BikeType::Electric => "electric",
            BikeType::Unknown => "unknown",
        }
    }
}

/// The final state of a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TripStatus {
    Completed,
    Cancelled,
    Unknown,
}

impl TripStatus {
    pub fn parse_normalized(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "completed" => TripStatus::Completed,
            "cancelled" => TripStatus::Cancelled,
            _ => TripStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::Completed => "completed",
            TripStatus::Cancelled => "cancelled",
            TripStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for BikeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
