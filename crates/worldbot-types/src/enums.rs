//! Enumeration types for tracked worlds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

/// Where on a world the warband camp spawned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    /// Dark Warriors' Fortress.
    Dwf,
    /// East Lumbridge Mines.
    Elm,
    /// Reserved Dragonkin Isle.
    Rdi,
    /// Not reported yet.
    #[default]
    #[serde(rename = "unk")]
    Unknown,
}

impl Location {
    /// Every location in rendering order.
    pub const ALL: [Self; 4] = [Self::Dwf, Self::Elm, Self::Rdi, Self::Unknown];

    /// Map a 3-letter chat token to a location.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "dwf" => Some(Self::Dwf),
            "elm" => Some(Self::Elm),
            "rdi" => Some(Self::Rdi),
            "unk" => Some(Self::Unknown),
            _ => None,
        }
    }

    /// The chat token for this location.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Dwf => "dwf",
            Self::Elm => "elm",
            Self::Rdi => "rdi",
            Self::Unknown => "unk",
        }
    }

    /// Heading used for this location in status output.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Dwf => "DWF",
            Self::Elm => "ELM",
            Self::Rdi => "RDI",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Error returned when a string is not a location token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLocation(pub String);

impl fmt::Display for UnknownLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown location: {}", self.0)
    }
}

impl std::error::Error for UnknownLocation {}

impl FromStr for Location {
    type Err = UnknownLocation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Self::from_token(&lowered).ok_or(UnknownLocation(lowered))
    }
}

// ---------------------------------------------------------------------------
// WorldState
// ---------------------------------------------------------------------------

/// Lifecycle of a world during one wave.
///
/// `NoInfo` becomes `Alive` once a death time is known, `Alive` decays to
/// `Dead` when that time passes, and `Dead` is terminal until the wave is
/// reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorldState {
    /// Nobody has reported on this world.
    #[default]
    NoInfo,
    /// The camp is being attacked right now.
    Beaming,
    /// The camp is up with an estimated death time.
    Alive,
    /// The camp is gone.
    Dead,
}

impl fmt::Display for WorldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NoInfo => "uncalled",
            Self::Beaming => "beaming",
            Self::Alive => "active",
            Self::Dead => "dead",
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn location_tokens_roundtrip() {
        for loc in Location::ALL {
            assert_eq!(Location::from_token(loc.token()), Some(loc));
        }
        assert_eq!(Location::from_token("abc"), None);
    }

    #[test]
    fn location_from_str_is_case_insensitive() {
        assert_eq!("ELM".parse::<Location>(), Ok(Location::Elm));
        assert_eq!(" unk ".parse::<Location>(), Ok(Location::Unknown));
        assert!("lumbridge".parse::<Location>().is_err());
    }

    #[test]
    fn defaults_are_unknown_and_no_info() {
        assert_eq!(Location::default(), Location::Unknown);
        assert_eq!(WorldState::default(), WorldState::NoInfo);
    }

    #[test]
    fn state_display_names() {
        assert_eq!(WorldState::NoInfo.to_string(), "uncalled");
        assert_eq!(WorldState::Alive.to_string(), "active");
    }

    #[test]
    fn location_serializes_as_token() {
        let json = serde_json::to_string(&Location::Unknown).unwrap();
        assert_eq!(json, "\"unk\"");
    }
}
