// Copyright 2023 Viktor Reusch
//
// This file is part of togpx.
//
// togpx is free software: you can redistribute it and/or modify it
// under the terms of the GNU Affero General Public License as published by the
// Free Software Foundation, either version 3 of the License, or (at your
// option) any later version.
//
// togpx is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or
// FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License
// for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with togpx. If not, see <https://www.gnu.org/licenses/>.

//! Coordinates and timestamps as they appear in the text exports.

use std::fmt;

/// Use single precision for coordinate values, like the historical converter.
pub type CoordValue = f32;

/// Axis a degree/minute value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

/// Hemisphere token following a degree/minute pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hemisphere {
    North,
    South,
    East,
    West,
}

impl Hemisphere {
    /// Parse a single-letter hemisphere token.
    ///
    /// Only the letters valid for `axis` are accepted.
    pub fn parse(token: &str, axis: Axis) -> Option<Self> {
        let hemisphere = match token {
            "N" => Hemisphere::North,
            "S" => Hemisphere::South,
            "E" => Hemisphere::East,
            "W" => Hemisphere::West,
            _ => return None,
        };
        (hemisphere.axis() == axis).then_some(hemisphere)
    }

    /// The axis this hemisphere designates.
    pub fn axis(self) -> Axis {
        match self {
            Hemisphere::North | Hemisphere::South => Axis::Latitude,
            Hemisphere::East | Hemisphere::West => Axis::Longitude,
        }
    }

    /// South and west are negative.
    pub fn is_negative(self) -> bool {
        matches!(self, Hemisphere::South | Hemisphere::West)
    }
}

/// A degree/minute angle with its hemisphere, e.g. `50 39.92140 N`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Angle {
    pub degrees: i32,
    pub minutes: CoordValue,
    pub hemisphere: Hemisphere,
}

impl Angle {
    /// Parse the three tokens of an angle on the given `axis`.
    pub fn parse(degrees: &str, minutes: &str, hemisphere: &str, axis: Axis) -> Option<Self> {
        let minutes: CoordValue = minutes.parse().ok()?;
        if !minutes.is_finite() {
            return None;
        }
        Some(Angle {
            degrees: degrees.parse().ok()?,
            minutes,
            hemisphere: Hemisphere::parse(hemisphere, axis)?,
        })
    }

    /// Unsigned decimal degrees: `degrees + minutes / 60`.
    pub fn magnitude(self) -> CoordValue {
        self.degrees as CoordValue + self.minutes / 60.0
    }

    /// Signed decimal degrees.
    pub fn to_decimal(self) -> CoordValue {
        let value = self.magnitude();
        if self.hemisphere.is_negative() {
            -value
        } else {
            value
        }
    }
}

/// Latitude and longitude angles of one record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude: Angle,
    pub longitude: Angle,
}

impl Position {
    /// Parse six tokens: latitude degrees, minutes, hemisphere followed by
    /// longitude degrees, minutes, hemisphere.
    ///
    /// Returns [`None`] if fewer than six tokens are given or any of them is
    /// malformed.
    pub fn parse(tokens: &[&str]) -> Option<Self> {
        let [lat_deg, lat_min, lat_hem, lng_deg, lng_min, lng_hem, ..] = tokens else {
            return None;
        };
        Some(Position {
            latitude: Angle::parse(lat_deg, lat_min, lat_hem, Axis::Latitude)?,
            longitude: Angle::parse(lng_deg, lng_min, lng_hem, Axis::Longitude)?,
        })
    }
}

/// Date and time tokens joined with `T`, e.g. `2017-05-12T08:57:33Z`.
///
/// The tokens are taken verbatim; no calendar or timezone checks are done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamp(String);

impl Timestamp {
    pub fn new(date: &str, time: &str) -> Self {
        Timestamp(format!("{date}T{time}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A converted point ready for output.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub latitude: CoordValue,
    pub longitude: CoordValue,
    pub time: Option<Timestamp>,
}
