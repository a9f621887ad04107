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

//! Library for converting text exports of the Nobeltec Visual Navigation Suite
//! to [GPX](https://www.topografix.com/gpx.asp).
//!
//! Route exports and track exports are supported. Each route and each block of
//! track marks becomes a GPX track with a single segment. A file must contain
//! either routes or tracks; mixed files are not supported.
//!
//! See [`convert`] for information on how to use this library.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Seek, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};
use thiserror::Error;

mod detect;
mod lines;
mod point;
mod route;
mod track;
mod write;

pub use detect::{detect, Detection, Mode, ROUTE_SENTINEL, TRACK_SENTINEL};
pub use route::{RouteSigns, MARK_SENTINEL};
pub use track::{TRACKMARKS_BEGIN, TRACKMARKS_END};

use lines::Lines;
use point::Point;
use route::RouteTranscoder;
use track::TrackTranscoder;
use write::GpxWriter;

/// Name given to every converted track.
pub const DEFAULT_TRACK_NAME: &str = "Example GPX Document";

/// Error returned from the conversion functions.
///
/// Malformed lines in the export are not errors; they are skipped and counted
/// in [`Report::skipped_lines`].
#[derive(Error, Debug)]
pub enum Error {
    /// The text export could not be opened.
    #[error("opening text export file {} failed (error #{}): {source}", .path.display(), os_code(.source))]
    OpenExport { path: PathBuf, source: io::Error },
    /// The GPX file could not be created.
    #[error("opening GPX file {} failed (error #{}): {source}", .path.display(), os_code(.source))]
    CreateGpx { path: PathBuf, source: io::Error },
    /// Reading the text export failed.
    #[error("reading text export failed: {0}")]
    Read(#[source] io::Error),
    /// Writing GPX failed.
    #[error("writing GPX failed: {0}")]
    Write(#[source] io::Error),
}

/// Platform error code of `err`, or 0 if there is none.
fn os_code(err: &io::Error) -> i32 {
    err.raw_os_error().unwrap_or(0)
}

/// Conversion settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Content of the `<name>` tag of every track.
    pub track_name: String,
    /// Close a block of track marks which is still open at the end of the
    /// export. Otherwise, the GPX output misses its closing tags, like the
    /// historical converter's output did.
    pub close_open_segments: bool,
    /// Sign handling of route coordinates.
    pub route_signs: RouteSigns,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            track_name: DEFAULT_TRACK_NAME.to_string(),
            close_open_segments: true,
            route_signs: RouteSigns::default(),
        }
    }
}

/// Summary of a conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Report {
    /// Detected export type, [`None`] for unsupported exports.
    pub mode: Option<Mode>,
    /// Both track and route sentinels were found.
    pub mixed: bool,
    /// Number of `<trk>` elements written.
    pub segments: usize,
    /// Number of `<trkpt>` elements written.
    pub points: usize,
    /// Lines which looked like records but could not be parsed.
    pub skipped_lines: usize,
    /// Blocks of track marks missing their end marker.
    pub truncated_segments: usize,
}

/// Effect of a single export line on the output.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Step {
    /// Nothing to write.
    Pass,
    /// The line should have been a record but could not be parsed.
    Ignored,
    OpenSegment,
    /// Close the current segment and open the next one.
    NextSegment,
    CloseSegment,
    Point(Point),
    /// The export ended inside a segment.
    Truncated { close: bool },
}

/// Line-by-line state machine of one export type.
pub(crate) trait Transcode {
    fn step(&mut self, line: &str) -> Step;
    /// Called once at the end of the export.
    fn finish(&mut self) -> Step;
}

/// Read a text export and write a GPX file.
///
/// The export type is determined with [`detect`], then `source` is rewound and
/// converted with [`transcode`]. A complete GPX file is written to `sink`,
/// even if the export type is not supported. In that case, the GPX file does
/// not contain any tracks and [`Report::mode`] is [`None`].
///
/// If an error occurs, the function returns immediately. The `sink` might have
/// been modified in this case.
///
/// # Example
/// ```
/// # use std::io::Cursor;
/// # use togpx::{convert, Mode, Options};
/// #
/// let source = "Type = Track\r\n\
///               TrackMarks = {{\r\n\
///               50 39.92140 N 125 56.27690 W 2017-05-12 08:57:33Z\r\n\
///               }}\r\n";
/// let mut sink = vec![];
///
/// let report = convert(Cursor::new(source), &mut sink, &Options::default())
///     .expect("conversion failed");
///
/// assert_eq!(report.mode, Some(Mode::Track));
/// assert_eq!(report.points, 1);
/// let gpx = String::from_utf8(sink).expect("GPX data is not valid UTF-8");
/// assert!(gpx.contains(r#"<trkpt lat="50.665356" lon="-125.937950">"#));
/// assert!(gpx.contains("<time>2017-05-12T08:57:33Z</time>"));
/// ```
pub fn convert(
    mut source: impl BufRead + Seek,
    mut sink: impl Write,
    options: &Options,
) -> Result<Report, Error> {
    let detection = detect(&mut source)?;

    let mut writer = GpxWriter::new(&mut sink);
    writer.prologue()?;

    let mut report = match detection.mode {
        Some(mode) => {
            info!("converting {mode:?} export");
            source.rewind().map_err(Error::Read)?;
            transcode_with(&mut source, mode, &mut writer, options)?
        }
        None => {
            warn!("non supported export file, writing GPX without tracks");
            Report::default()
        }
    };
    report.mode = detection.mode;
    report.mixed = detection.mixed;

    writer.epilogue()?;
    info!(
        "wrote {} points in {} tracks, skipped {} lines",
        report.points, report.segments, report.skipped_lines
    );
    Ok(report)
}

/// Convert the text export at `input` to a GPX file at `output`.
///
/// The export is opened before the GPX file is created. If it cannot be
/// opened, `output` is left untouched.
pub fn convert_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: &Options,
) -> Result<Report, Error> {
    let input = input.as_ref();
    let output = output.as_ref();

    let source = File::open(input).map_err(|source| Error::OpenExport {
        path: input.to_path_buf(),
        source,
    })?;
    let sink = File::create(output).map_err(|source| Error::CreateGpx {
        path: output.to_path_buf(),
        source,
    })?;

    convert(BufReader::new(source), BufWriter::new(sink), options)
}

/// Convert the records of an export of type `mode` read from `source`.
///
/// Only the GPX tracks are written to `sink`; the surrounding document is up
/// to the caller. `source` has to start at the beginning of the export.
/// [`Report::mode`] is set to `mode`.
pub fn transcode(
    source: impl BufRead,
    mode: Mode,
    mut sink: impl Write,
    options: &Options,
) -> Result<Report, Error> {
    let mut writer = GpxWriter::new(&mut sink);
    let mut report = transcode_with(source, mode, &mut writer, options)?;
    report.mode = Some(mode);
    sink.flush().map_err(Error::Write)?;
    Ok(report)
}

fn transcode_with<W: Write>(
    source: impl BufRead,
    mode: Mode,
    writer: &mut GpxWriter<W>,
    options: &Options,
) -> Result<Report, Error> {
    match mode {
        Mode::Track => run(
            source,
            TrackTranscoder::new(options.close_open_segments),
            writer,
            options,
        ),
        Mode::Route => run(
            source,
            RouteTranscoder::new(options.route_signs),
            writer,
            options,
        ),
    }
}

/// Feed every line of `source` to `transcoder` and write the resulting steps.
fn run<W: Write>(
    source: impl BufRead,
    mut transcoder: impl Transcode,
    writer: &mut GpxWriter<W>,
    options: &Options,
) -> Result<Report, Error> {
    let mut report = Report::default();
    let mut lines = Lines::new(source);

    while let Some(line) = lines.next_line()? {
        let step = transcoder.step(&line);
        apply(step, writer, options, &mut report)?;
    }
    apply(transcoder.finish(), writer, options, &mut report)?;

    Ok(report)
}

fn apply<W: Write>(
    step: Step,
    writer: &mut GpxWriter<W>,
    options: &Options,
    report: &mut Report,
) -> Result<(), Error> {
    match step {
        Step::Pass => {}
        Step::Ignored => report.skipped_lines += 1,
        Step::OpenSegment => {
            writer.open_segment(&options.track_name)?;
            report.segments += 1;
        }
        Step::NextSegment => {
            writer.close_segment()?;
            writer.open_segment(&options.track_name)?;
            report.segments += 1;
        }
        Step::CloseSegment => writer.close_segment()?,
        Step::Point(point) => {
            writer.point(&point)?;
            report.points += 1;
        }
        Step::Truncated { close } => {
            report.truncated_segments += 1;
            if close {
                writer.close_segment()?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn convert_str(source: &str, options: &Options) -> (Report, String) {
        let mut sink = vec![];
        let report = convert(Cursor::new(source), &mut sink, options).unwrap();
        (report, String::from_utf8(sink).unwrap())
    }

    #[test]
    fn unsupported_export_is_empty_gpx() {
        let (report, gpx) = convert_str("Type = Mark\r\nName = x\r\n", &Options::default());
        assert_eq!(report, Report::default());
        assert!(!gpx.contains("<trk>"));
        assert!(gpx.contains("</metadata>\n</gpx>\n"));
    }

    #[test]
    fn track_before_sentinel_is_converted() {
        let source = "TrackMarks = {{\r\n\
                      1 0.0 N 2 0.0 E 2020-01-01 00:00:00Z\r\n\
                      }}\r\n\
                      Type = Track\r\n";
        let (report, gpx) = convert_str(source, &Options::default());
        assert_eq!(report.points, 1);
        assert_eq!(gpx.matches("<trkpt").count(), 1);
    }

    #[test]
    fn truncated_track_is_closed() {
        let source = "Type = Track\r\nTrackMarks = {{\r\n1 0.0 N 2 0.0 E 2020-01-01 00:00:00Z\r\n";
        let (report, gpx) = convert_str(source, &Options::default());
        assert_eq!(report.truncated_segments, 1);
        assert!(gpx.ends_with("    </trkseg>\n</trk>\n</gpx>\n"));

        let options = Options {
            close_open_segments: false,
            ..Default::default()
        };
        let (report, gpx) = convert_str(source, &options);
        assert_eq!(report.truncated_segments, 1);
        assert!(!gpx.contains("</trkseg>"));
        assert!(gpx.ends_with("        </trkpt>\n</gpx>\n"));
    }

    #[test]
    fn transcode_writes_body_only() {
        let source = "Type = Route\r\nCreateTime = 2017-05-13 22:10:12Z\r\nLatLon = 1 0.0 N 2 0.0 W\r\n";
        let mut sink = vec![];
        let report = transcode(source.as_bytes(), Mode::Route, &mut sink, &Options::default()).unwrap();
        assert_eq!(report.mode, Some(Mode::Route));
        assert_eq!(report.segments, 1);
        assert_eq!(report.points, 1);
        let body = String::from_utf8(sink).unwrap();
        assert!(body.starts_with("<trk>\n"));
        assert!(body.ends_with("</trk>\n"));
        assert!(!body.contains("<gpx"));
        assert!(body.contains(r#"lat="1.000000" lon="-2.000000""#));
    }

    #[test]
    fn custom_track_name() {
        let options = Options {
            track_name: "Desolation Sound".to_string(),
            ..Default::default()
        };
        let (_, gpx) = convert_str("Type = Route\r\n", &options);
        assert!(gpx.contains("<name>Desolation Sound</name>"));
    }

    #[test]
    fn error_messages_carry_os_code() {
        let err = Error::OpenExport {
            path: PathBuf::from("in.txt"),
            source: io::Error::from_raw_os_error(2),
        };
        assert!(err.to_string().starts_with("opening text export file in.txt failed (error #2)"));
    }
}
