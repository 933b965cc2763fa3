use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::{against_out_of_range, against_zero_or_negative, GeneralError};

// ============================================================================
// Shared Value Objects - Grid Geometry and Typed Scalars
// ============================================================================
//
// All of these are validated on construction, including deserialization,
// so an instance always satisfies its invariant.
//
// ============================================================================

/// A point on the delivery grid, both coordinates in `1..=10`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "LocationParts")]
pub struct Location {
    x: i32,
    y: i32,
}

#[derive(Deserialize)]
struct LocationParts {
    x: i32,
    y: i32,
}

impl TryFrom<LocationParts> for Location {
    type Error = GeneralError;

    fn try_from(parts: LocationParts) -> Result<Self, Self::Error> {
        Location::new(parts.x, parts.y)
    }
}

impl Location {
    pub const COORDINATE_MIN: i32 = 1;
    pub const COORDINATE_MAX: i32 = 10;

    pub const MIN: Location = Location {
        x: Self::COORDINATE_MIN,
        y: Self::COORDINATE_MIN,
    };
    pub const MAX: Location = Location {
        x: Self::COORDINATE_MAX,
        y: Self::COORDINATE_MAX,
    };

    /// x is validated before y, so an input with both coordinates out of
    /// range always reports x.
    pub fn new(x: i32, y: i32) -> Result<Self, GeneralError> {
        against_out_of_range(x, Self::COORDINATE_MIN, Self::COORDINATE_MAX, "x")?;
        against_out_of_range(y, Self::COORDINATE_MIN, Self::COORDINATE_MAX, "y")?;
        Ok(Self { x, y })
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    /// Manhattan distance in grid steps
    pub fn distance_to(&self, other: &Location) -> u32 {
        if self == other {
            return 0;
        }
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Order or storage place volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Volume(i32);

impl Volume {
    pub fn new(value: i32) -> Result<Self, GeneralError> {
        against_zero_or_negative(value, "volume")?;
        Ok(Self(value))
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for Volume {
    type Error = GeneralError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Volume::new(value)
    }
}

impl From<Volume> for i32 {
    fn from(volume: Volume) -> Self {
        volume.0
    }
}

/// Courier speed in grid units per time unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Speed(i32);

impl Speed {
    pub fn new(value: i32) -> Result<Self, GeneralError> {
        against_zero_or_negative(value, "speed")?;
        Ok(Self(value))
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for Speed {
    type Error = GeneralError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Speed::new(value)
    }
}

impl From<Speed> for i32 {
    fn from(speed: Speed) -> Self {
        speed.0
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
