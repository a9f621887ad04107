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

//! Detection of the export type.

use std::io::BufRead;

use log::warn;

use crate::lines::Lines;
use crate::Error;

/// Sentinel line of a track export.
pub const TRACK_SENTINEL: &str = "Type = Track\r\n";
/// Sentinel line of a route export. It also starts every route.
pub const ROUTE_SENTINEL: &str = "Type = Route\r\n";

/// Kind of records contained in an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Track marks inside `TrackMarks = {{ ... }}` blocks.
    Track,
    /// Marks with separate `CreateTime` and `LatLon` lines.
    Route,
}

impl Mode {
    fn from_sentinel(line: &str) -> Option<Self> {
        match line {
            TRACK_SENTINEL => Some(Mode::Track),
            ROUTE_SENTINEL => Some(Mode::Route),
            _ => None,
        }
    }
}

/// Result of [`detect`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Detection {
    /// Mode of the first sentinel line, or [`None`] if there is none.
    pub mode: Option<Mode>,
    /// Both sentinels occur in the export.
    ///
    /// Mixed exports are not supported. The first sentinel wins, but the
    /// output is unlikely to be useful.
    pub mixed: bool,
}

/// Scan `source` for the sentinel lines and determine the export type.
///
/// The stream is consumed. It has to be rewound before it can be passed to
/// [`transcode`](crate::transcode).
pub fn detect(source: impl BufRead) -> Result<Detection, Error> {
    let mut lines = Lines::new(source);
    let mut detection = Detection::default();

    while let Some(line) = lines.next_line()? {
        let Some(found) = Mode::from_sentinel(&line) else {
            continue;
        };
        match detection.mode {
            None => detection.mode = Some(found),
            Some(mode) if mode != found => {
                warn!("export contains both track and route records, using {mode:?} mode");
                detection.mixed = true;
                break;
            }
            Some(_) => {}
        }
    }

    Ok(detection)
}
