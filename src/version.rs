//! Schema version model
//!
//! Media plan schemas are versioned with a two-component (major.minor)
//! identifier. Any accepted surface form ("2", "2.0", "v2.0", legacy
//! three-part tags with a zero patch) normalizes to the same canonical
//! value.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, SchemaError};

static VERSION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^v?(\d+)(?:\.(\d+))?((?:\.\d+)*)$").expect("valid version pattern"));

/// A normalized two-component schema version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SchemaVersion {
    major: u32,
    minor: u32,
}

impl SchemaVersion {
    /// Create a version from its components.
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Parse version text into the canonical two-component form.
    ///
    /// Accepts a bare major ("2"), major.minor ("2.0"), an optional leading
    /// "v" marker, and legacy three-part tags whose trailing segments are
    /// zero ("v2.0.0"). Anything else is an `InvalidVersionFormat` error.
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(SchemaError::InvalidVersionFormat {
                version: text.to_string(),
                reason: "version string cannot be empty".to_string(),
            });
        }

        let captures = VERSION_PATTERN.captures(trimmed).ok_or_else(|| {
            SchemaError::InvalidVersionFormat {
                version: text.to_string(),
                reason: "expected 'X', 'X.Y' or 'vX.Y' with integer components".to_string(),
            }
        })?;

        let major = parse_component(text, &captures[1])?;
        let minor = match captures.get(2) {
            Some(m) => parse_component(text, m.as_str())?,
            None => 0,
        };

        // Legacy three-part tags are tolerated only when the remainder is
        // zero; "2.0.5" has no faithful two-component form.
        if let Some(rest) = captures.get(3) {
            for segment in rest.as_str().split('.').filter(|s| !s.is_empty()) {
                if parse_component(text, segment)? != 0 {
                    return Err(SchemaError::InvalidVersionFormat {
                        version: text.to_string(),
                        reason: format!(
                            "trailing segment '{}' must be zero in a two-component version",
                            segment
                        ),
                    });
                }
            }
        }

        Ok(Self { major, minor })
    }

    /// Major component.
    pub fn major(&self) -> u32 {
        self.major
    }

    /// Minor component.
    pub fn minor(&self) -> u32 {
        self.minor
    }

    /// True iff both versions share a major component.
    pub fn is_same_major(&self, other: &SchemaVersion) -> bool {
        self.major == other.major
    }
}

fn parse_component(version: &str, segment: &str) -> Result<u32> {
    segment
        .parse::<u32>()
        .map_err(|_| SchemaError::InvalidVersionFormat {
            version: version.to_string(),
            reason: format!("component '{}' is not a valid integer", segment),
        })
}

/// Normalize version text to the canonical two-component form.
pub fn normalize(text: &str) -> Result<SchemaVersion> {
    SchemaVersion::parse(text)
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for SchemaVersion {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl PartialOrd for SchemaVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SchemaVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        // Numeric on (major, minor), never lexicographic on the raw text.
        (self.major, self.minor).cmp(&(other.major, other.minor))
    }
}

impl Serialize for SchemaVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SchemaVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        SchemaVersion::parse(&text).map_err(de::Error::custom)
    }
}
