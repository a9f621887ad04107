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

//! Transcoding of route exports.
//!
//! ```text
//! Type = Route
//! CreateTime = 2017-05-13 22:10:12Z
//! ...
//! Type = Mark
//! CreateTime = 2017-05-13 22:19:00Z
//! LatLon = 50 38.11920 N 126 17.97594 W
//! ...
//! ```
//!
//! The `CreateTime` right after `Type = Route` belongs to the route itself and
//! is dropped. Each `LatLon` line is emitted together with the mark's
//! `CreateTime` seen before it.

use log::debug;

use crate::detect::ROUTE_SENTINEL;
use crate::point::{CoordValue, Point, Position, Timestamp};
use crate::{Step, Transcode};

/// Starts a mark within a route.
pub const MARK_SENTINEL: &str = "Type = Mark\r\n";
const TIME_PREFIX: &str = "CreateTime";
const COORD_PREFIX: &str = "LatLon";

/// How route coordinates get their sign.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RouteSigns {
    /// Each axis is signed by its own hemisphere, as for tracks.
    #[default]
    Hemisphere,
    /// Reproduce the output of the historical converter.
    ///
    /// The latitude is negative unless its hemisphere token starts with `N`.
    /// The longitude sign is taken from the latitude token compared against
    /// `E`, so it is practically always negative. In both cases only the
    /// degrees are signed, the minutes are added afterwards. Hemisphere tokens
    /// are not checked at all; degrees are read as decimal integers.
    Legacy,
}

impl RouteSigns {
    /// Convert the six coordinate tokens following `LatLon =`.
    fn coordinates(self, tokens: &[&str]) -> Option<(CoordValue, CoordValue)> {
        match self {
            RouteSigns::Hemisphere => {
                let position = Position::parse(tokens)?;
                Some((
                    position.latitude.to_decimal(),
                    position.longitude.to_decimal(),
                ))
            }
            RouteSigns::Legacy => {
                let [lat_deg, lat_min, ns, lng_deg, lng_min, _ew, ..] = tokens else {
                    return None;
                };
                let lat_sign = legacy_sign(ns, 'N');
                let lng_sign = legacy_sign(ns, 'E');
                Some((
                    legacy_value(lat_deg, lat_min, lat_sign)?,
                    legacy_value(lng_deg, lng_min, lng_sign)?,
                ))
            }
        }
    }
}

fn legacy_sign(token: &str, positive: char) -> CoordValue {
    if token.starts_with(positive) {
        1.0
    } else {
        -1.0
    }
}

fn legacy_value(degrees: &str, minutes: &str, sign: CoordValue) -> Option<CoordValue> {
    let degrees: i32 = degrees.parse().ok()?;
    let minutes: CoordValue = minutes.parse().ok()?;
    Some(degrees as CoordValue * sign + minutes / 60.0)
}

/// State machine for route exports.
///
/// Every route becomes one track with a single segment.
pub(crate) struct RouteTranscoder {
    signs: RouteSigns,
    started: bool,
    ignore_next_time: bool,
    pending_time: Option<Timestamp>,
}

impl RouteTranscoder {
    pub(crate) fn new(signs: RouteSigns) -> Self {
        RouteTranscoder {
            signs,
            started: false,
            ignore_next_time: true,
            pending_time: None,
        }
    }

    fn start_route(&mut self) -> Step {
        self.ignore_next_time = true;
        self.pending_time = None;
        if self.started {
            Step::NextSegment
        } else {
            self.started = true;
            Step::OpenSegment
        }
    }

    fn create_time(&mut self, line: &str) -> Step {
        if self.ignore_next_time {
            self.ignore_next_time = false;
            return Step::Pass;
        }
        match parse_create_time(line) {
            Some(time) => {
                self.pending_time = Some(time);
                Step::Pass
            }
            None => {
                debug!("skipping mark time {:?}", line.trim_end());
                Step::Ignored
            }
        }
    }

    fn lat_lon(&mut self, line: &str) -> Step {
        if !self.started {
            debug!("skipping mark outside of a route");
            return Step::Ignored;
        }
        match parse_lat_lon(line, self.signs) {
            Some((latitude, longitude)) => Step::Point(Point {
                latitude,
                longitude,
                time: self.pending_time.take(),
            }),
            None => {
                debug!("skipping mark position {:?}", line.trim_end());
                Step::Ignored
            }
        }
    }
}

impl Transcode for RouteTranscoder {
    fn step(&mut self, line: &str) -> Step {
        if line == ROUTE_SENTINEL {
            self.start_route()
        } else if line == MARK_SENTINEL {
            self.pending_time = None;
            Step::Pass
        } else if line.starts_with(TIME_PREFIX) {
            self.create_time(line)
        } else if line.starts_with(COORD_PREFIX) {
            self.lat_lon(line)
        } else {
            Step::Pass
        }
    }

    fn finish(&mut self) -> Step {
        if std::mem::take(&mut self.started) {
            Step::CloseSegment
        } else {
            Step::Pass
        }
    }
}

/// Parse `CreateTime = <date> <time>`.
fn parse_create_time(line: &str) -> Option<Timestamp> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let [_, _, date, time, ..] = tokens.as_slice() else {
        return None;
    };
    Some(Timestamp::new(date, time))
}

/// Parse `LatLon = <lat deg> <lat min> <N|S> <lon deg> <lon min> <E|W>`.
fn parse_lat_lon(line: &str, signs: RouteSigns) -> Option<(CoordValue, CoordValue)> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    signs.coordinates(tokens.get(2..)?)
}
