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

//! Transcoding of track exports.
//!
//! ```text
//! Type = Track
//! ...
//! TrackMarks = {{
//! 50 39.92140 N 125 56.27690 W 2017-05-12 08:57:33Z
//! ...
//! }}
//! ```

use log::{debug, warn};

use crate::point::{Point, Position, Timestamp};
use crate::{Step, Transcode};

/// Opens a block of track marks.
pub const TRACKMARKS_BEGIN: &str = "TrackMarks = {{\r\n";
/// Closes a block of track marks.
pub const TRACKMARKS_END: &str = "}}\r\n";

/// State machine for track exports.
///
/// Every `TrackMarks` block becomes one track with a single segment.
pub(crate) struct TrackTranscoder {
    inside: bool,
    close_open_segments: bool,
}

impl TrackTranscoder {
    pub(crate) fn new(close_open_segments: bool) -> Self {
        TrackTranscoder {
            inside: false,
            close_open_segments,
        }
    }
}

impl Transcode for TrackTranscoder {
    fn step(&mut self, line: &str) -> Step {
        if !self.inside {
            if line == TRACKMARKS_BEGIN {
                self.inside = true;
                return Step::OpenSegment;
            }
            return Step::Pass;
        }

        if line == TRACKMARKS_END {
            self.inside = false;
            return Step::CloseSegment;
        }
        if line.trim().is_empty() {
            return Step::Pass;
        }
        match parse_track_mark(line) {
            Some(point) => Step::Point(point),
            None => {
                debug!("skipping track mark {:?}", line.trim_end());
                Step::Ignored
            }
        }
    }

    fn finish(&mut self) -> Step {
        if !self.inside {
            return Step::Pass;
        }
        self.inside = false;
        if self.close_open_segments {
            warn!("track marks not terminated, closing the segment");
        } else {
            warn!("track marks not terminated, leaving the segment open");
        }
        Step::Truncated {
            close: self.close_open_segments,
        }
    }
}

/// Parse `<lat deg> <lat min> <N|S> <lon deg> <lon min> <E|W> <date> <time>`.
///
/// Tokens after the eighth are ignored.
fn parse_track_mark(line: &str) -> Option<Point> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let [.., date, time] = tokens.get(..8)? else {
        return None;
    };
    let position = Position::parse(&tokens)?;
    Some(Point {
        latitude: position.latitude.to_decimal(),
        longitude: position.longitude.to_decimal(),
        time: Some(Timestamp::new(date, time)),
    })
}
