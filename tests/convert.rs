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

use std::fs::{self, File};
use std::io::{BufReader, Cursor};
use std::path::Path;

use gpx::{Gpx, GpxVersion};
use togpx::{convert, convert_file, Error, Mode, Options, Report, RouteSigns};

const DATA: &str = "./tests/data/";

fn convert_data(name: &str, options: &Options) -> (Report, String) {
    let source = File::open(Path::new(DATA).join(name)).expect("test data not found");
    let mut sink = vec![];
    let report = convert(BufReader::new(source), &mut sink, options).expect("conversion failed");
    (report, String::from_utf8(sink).expect("GPX data is not valid UTF-8"))
}

fn read_gpx(xml: &str) -> Gpx {
    gpx::read(xml.as_bytes()).expect("output is not valid GPX")
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-5,
        "{actual} is not close to {expected}"
    );
}

#[test]
fn track_export() {
    let (report, xml) = convert_data("track.txt", &Options::default());
    assert_eq!(
        report,
        Report {
            mode: Some(Mode::Track),
            mixed: false,
            segments: 3,
            points: 4,
            skipped_lines: 1,
            truncated_segments: 0,
        }
    );
    assert_eq!(xml.matches("<trk>\n").count(), 3);
    assert_eq!(xml.matches("</trkseg>\n</trk>\n").count(), 3);
    assert!(xml.contains(
        "        <trkpt lat=\"50.665356\" lon=\"-125.937950\">\n\
         \x20           <ele>0</ele>\n\
         \x20           <time>2017-05-12T08:57:33Z</time>\n\
         \x20       </trkpt>\n"
    ));

    let gpx = read_gpx(&xml);
    assert_eq!(gpx.version, GpxVersion::Gpx11);
    assert_eq!(gpx.tracks.len(), 3);
    let counts: Vec<usize> = gpx
        .tracks
        .iter()
        .map(|track| track.segments.iter().map(|s| s.points.len()).sum::<usize>())
        .collect();
    assert_eq!(counts, [3, 0, 1]);
    for track in &gpx.tracks {
        assert_eq!(track.name.as_deref(), Some("Example GPX Document"));
        for waypoint in track.segments.iter().flat_map(|s| &s.points) {
            let point = waypoint.point();
            assert!((-90.0..=90.0).contains(&point.y()));
            assert!((-180.0..=180.0).contains(&point.x()));
            assert_eq!(waypoint.elevation, Some(0.0));
            assert!(waypoint.time.is_some());
        }
    }
}

#[test]
fn route_export() {
    let (report, xml) = convert_data("route.txt", &Options::default());
    assert_eq!(report.mode, Some(Mode::Route));
    assert_eq!(report.segments, 2);
    assert_eq!(report.points, 3);
    assert_eq!(report.skipped_lines, 1);
    // The route's own creation time is never used.
    assert!(!xml.contains("22:10:12Z"));
    assert!(!xml.contains("06:00:00Z"));
    assert!(xml.contains("<time>2017-05-13T22:19:00Z</time>"));
    assert!(xml.contains("<time>2017-05-14T06:05:00Z</time>"));

    let gpx = read_gpx(&xml);
    assert_eq!(gpx.tracks.len(), 2);
    let points = &gpx.tracks[0].segments[0].points;
    assert_eq!(points.len(), 2);
    assert_close(points[0].point().y(), 50.635319);
    assert_close(points[0].point().x(), -126.299599);
    assert_close(points[1].point().y(), 50.63);
    assert_close(points[1].point().x(), -127.155);
    assert_eq!(gpx.tracks[1].segments[0].points.len(), 1);
}

#[test]
fn route_export_with_legacy_signs() {
    let options = Options {
        route_signs: RouteSigns::Legacy,
        ..Default::default()
    };
    let (_, xml) = convert_data("route.txt", &options);
    assert!(xml.contains(r#"<trkpt lat="50.635319" lon="-125.700401">"#));
}

#[test]
fn unsupported_export() {
    let source = "Type = Mark\r\nName = Lonely\r\nLatLon = 50 38.11920 N 126 17.97594 W\r\n";
    let mut sink = vec![];
    let report = convert(Cursor::new(source), &mut sink, &Options::default()).unwrap();
    assert_eq!(report.mode, None);
    assert_eq!(report.points, 0);

    let xml = String::from_utf8(sink).unwrap();
    assert!(!xml.contains("<trk"));
    let gpx = read_gpx(&xml);
    assert!(gpx.tracks.is_empty());
    assert!(gpx.metadata.is_some());
}

#[test]
fn mixed_export_uses_first_sentinel() {
    let source = "Type = Route\r\n\
                  CreateTime = 2017-05-13 22:10:12Z\r\n\
                  LatLon = 50 0.0 N 126 0.0 W\r\n\
                  Type = Track\r\n\
                  TrackMarks = {{\r\n\
                  50 0.0 N 125 0.0 W 2017-05-12 08:57:33Z\r\n\
                  }}\r\n";
    let mut sink = vec![];
    let report = convert(Cursor::new(source), &mut sink, &Options::default()).unwrap();
    assert_eq!(report.mode, Some(Mode::Route));
    assert!(report.mixed);
    assert_eq!(report.points, 1);
}

#[test]
fn converts_files() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("track.gpx");
    let report = convert_file(Path::new(DATA).join("track.txt"), &output, &Options::default()).unwrap();
    assert_eq!(report.points, 4);

    let xml = fs::read_to_string(&output).unwrap();
    assert_eq!(read_gpx(&xml).tracks.len(), 3);
}

#[test]
fn missing_export_leaves_output_alone() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.gpx");
    let err = convert_file(dir.path().join("missing.txt"), &output, &Options::default()).unwrap_err();
    assert!(matches!(err, Error::OpenExport { .. }));
    assert!(!output.exists());
}

#[test]
fn unwritable_output() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("no").join("such").join("dir.gpx");
    let err = convert_file(Path::new(DATA).join("route.txt"), &output, &Options::default()).unwrap_err();
    assert!(matches!(err, Error::CreateGpx { .. }));
}
