//! Versions and version ranges
//!
//! A version is a dot-separated list of segments. Each segment has an
//! optional numeric prefix followed by a free-form suffix (`2`, `0rc1`,
//! `beta`). Segments compare numerically first, then by suffix, and missing
//! trailing segments count as `0`, so `1.0 == 1.0.0` and `10.0.0 > 9.0.0`.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("Version string is empty")]
    Empty,

    #[error("Invalid segment '{segment}' in version '{version}'")]
    InvalidSegment { version: String, segment: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Segment {
    number: u64,
    suffix: String,
}

impl Segment {
    const ZERO: Segment = Segment {
        number: 0,
        suffix: String::new(),
    };

    fn parse(version: &str, text: &str) -> Result<Self, VersionError> {
        let invalid = || VersionError::InvalidSegment {
            version: version.to_string(),
            segment: text.to_string(),
        };

        if text.is_empty() || text.chars().any(char::is_whitespace) {
            return Err(invalid());
        }

        let split = text
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(text.len());
        let (digits, suffix) = text.split_at(split);
        let number = if digits.is_empty() {
            0
        } else {
            digits.parse::<u64>().map_err(|_| invalid())?
        };

        Ok(Self {
            number,
            suffix: suffix.to_string(),
        })
    }
}

impl Ord for Segment {
    fn cmp(&self, other: &Self) -> Ordering {
        self.number
            .cmp(&other.number)
            .then_with(|| self.suffix.cmp(&other.suffix))
    }
}

impl PartialOrd for Segment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A parsed component version
///
/// Equality follows the ordering, not the text: `"1.0"` equals `"1.0.0"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    raw: String,
    segments: Vec<Segment>,
}

impl Version {
    pub fn parse(text: &str) -> Result<Self, VersionError> {
        let raw = text.trim();
        if raw.is_empty() {
            return Err(VersionError::Empty);
        }

        let segments = raw
            .split('.')
            .map(|segment| Segment::parse(raw, segment))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// The text this version was parsed from
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let zero = Segment::ZERO;
        let len = self.segments.len().max(other.segments.len());
        for i in 0..len {
            let left = self.segments.get(i).unwrap_or(&zero);
            let right = other.segments.get(i).unwrap_or(&zero);
            match left.cmp(right) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Version {
    type Error = VersionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Version {
    type Error = VersionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Version> for String {
    fn from(version: Version) -> Self {
        version.raw
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// One end of a [`VersionRange`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bound {
    pub version: Version,
    pub inclusive: bool,
}

impl Bound {
    pub fn inclusive(version: Version) -> Self {
        Self {
            version,
            inclusive: true,
        }
    }

    pub fn exclusive(version: Version) -> Self {
        Self {
            version,
            inclusive: false,
        }
    }
}

/// A bare version is an inclusive bound
impl From<Version> for Bound {
    fn from(version: Version) -> Self {
        Self::inclusive(version)
    }
}

/// Accepted versions; an absent bound is unbounded on that side
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRange {
    pub min: Option<Bound>,
    pub max: Option<Bound>,
}

impl VersionRange {
    /// Accept every version
    pub fn any() -> Self {
        Self::default()
    }

    pub fn new(min: Option<Bound>, max: Option<Bound>) -> Self {
        Self { min, max }
    }

    /// `[min, max)`, the usual "compatible until the next major" shape
    pub fn between(min: Version, max: Version) -> Self {
        Self {
            min: Some(Bound::inclusive(min)),
            max: Some(Bound::exclusive(max)),
        }
    }

    /// `[version, version]`
    pub fn exactly(version: Version) -> Self {
        Self {
            min: Some(Bound::inclusive(version.clone())),
            max: Some(Bound::inclusive(version)),
        }
    }

    pub fn at_least(min: impl Into<Bound>) -> Self {
        Self {
            min: Some(min.into()),
            max: None,
        }
    }

    pub fn at_most(max: impl Into<Bound>) -> Self {
        Self {
            min: None,
            max: Some(max.into()),
        }
    }

    pub fn contains(&self, version: &Version) -> bool {
        version_in_range(version, self)
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.min {
            Some(bound) => write!(
                f,
                "{}{}",
                if bound.inclusive { '[' } else { '(' },
                bound.version
            )?,
            None => f.write_str("(*")?,
        }
        f.write_str(", ")?;
        match &self.max {
            Some(bound) => write!(
                f,
                "{}{}",
                bound.version,
                if bound.inclusive { ']' } else { ')' }
            ),
            None => f.write_str("*)"),
        }
    }
}

/// Check `version` against both bounds of `range`
pub fn version_in_range(version: &Version, range: &VersionRange) -> bool {
    let above_min = match &range.min {
        None => true,
        Some(bound) if bound.inclusive => *version >= bound.version,
        Some(bound) => *version > bound.version,
    };
    let below_max = match &range.max {
        None => true,
        Some(bound) if bound.inclusive => *version <= bound.version,
        Some(bound) => *version < bound.version,
    };
    above_min && below_max
}

#[cfg(test)]
mod tests {
    include!("version.test.rs");
}
