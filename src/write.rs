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

//! Fixed GPX fragments and the streaming writer emitting them.

use std::io::Write;

use quick_xml::escape::escape;

use crate::point::Point;
use crate::Error;

/// XML declaration and the `<gpx>` tag with the Garmin namespaces.
const HEADER: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="no" ?>"#,
    "\n",
    r#"<gpx xmlns="http://www.topografix.com/GPX/1/1" "#,
    r#"xmlns:gpxx="http://www.garmin.com/xmlschemas/GpxExtensions/v3" "#,
    r#"xmlns:gpxtpx="http://www.garmin.com/xmlschemas/TrackPointExtension/v1" "#,
    r#"creator="Oregon 400t" version="1.1" "#,
    r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" "#,
    r#"xsi:schemaLocation="http://www.topografix.com/GPX/1/1 http://www.topografix.com/GPX/1/1/gpx.xsd "#,
    r#"http://www.garmin.com/xmlschemas/GpxExtensions/v3 http://www.garmin.com/xmlschemas/GpxExtensionsv3.xsd "#,
    r#"http://www.garmin.com/xmlschemas/TrackPointExtension/v1 http://www.garmin.com/xmlschemas/TrackPointExtensionv1.xsd">"#,
    "\n",
);
const METADATA: &str = r#"<metadata>
    <link href="http://www.garmin.com">
        <text>Garmin International</text>
    </link>
    <time>2009-10-17T22:58:43Z</time>
</metadata>
"#;
const FOOTER: &str = "</gpx>\n";
const SEGMENT_END: &str = "    </trkseg>\n</trk>\n";

/// Writes a GPX document piece by piece.
///
/// Nothing is buffered apart from what the underlying `sink` buffers itself.
pub(crate) struct GpxWriter<W> {
    sink: W,
}

impl<W: Write> GpxWriter<W> {
    pub(crate) fn new(sink: W) -> Self {
        GpxWriter { sink }
    }

    /// Write the XML declaration, the `<gpx>` tag, and the metadata block.
    pub(crate) fn prologue(&mut self) -> Result<(), Error> {
        self.put(HEADER)?;
        self.put(METADATA)
    }

    /// Write the closing `</gpx>` tag and flush the sink.
    pub(crate) fn epilogue(&mut self) -> Result<(), Error> {
        self.put(FOOTER)?;
        self.sink.flush().map_err(Error::Write)
    }

    /// Open a `<trk>` named `name` with a single `<trkseg>`.
    pub(crate) fn open_segment(&mut self, name: &str) -> Result<(), Error> {
        write!(
            self.sink,
            "<trk>\n    <name>{}</name>\n    <trkseg>\n",
            escape(name)
        )
        .map_err(Error::Write)
    }

    pub(crate) fn close_segment(&mut self) -> Result<(), Error> {
        self.put(SEGMENT_END)
    }

    /// Write a `<trkpt>`. The elevation is always zero.
    pub(crate) fn point(&mut self, point: &Point) -> Result<(), Error> {
        write!(
            self.sink,
            "        <trkpt lat=\"{:.6}\" lon=\"{:.6}\">\n            <ele>0</ele>\n",
            point.latitude, point.longitude
        )
        .map_err(Error::Write)?;
        if let Some(ref time) = point.time {
            write!(
                self.sink,
                "            <time>{}</time>\n",
                escape(time.as_str())
            )
            .map_err(Error::Write)?;
        }
        self.put("        </trkpt>\n")
    }

    fn put(&mut self, fragment: &str) -> Result<(), Error> {
        self.sink
            .write_all(fragment.as_bytes())
            .map_err(Error::Write)
    }
}
