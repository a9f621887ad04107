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

//! Command-line interface for the text-export-to-GPX converter.

use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use togpx::{convert_file, Options, RouteSigns, DEFAULT_TRACK_NAME};

/// Convert a Nobeltec Visual Navigation Suite text export to GPX.
///
/// The export must contain either routes or tracks, not both. Fatal errors
/// are reported on standard output, warnings on standard error.
#[derive(Parser, Debug)]
#[command(name = "togpx", version)]
struct Cli {
    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,

    /// Text export file
    input: PathBuf,

    /// GPX file to write
    output: PathBuf,

    /// Name of the converted tracks
    #[arg(long, default_value = DEFAULT_TRACK_NAME)]
    name: String,

    /// Leave track segments open when the export ends inside a TrackMarks block
    #[arg(long)]
    no_close_open: bool,

    /// Compute route coordinate signs like the historical converter
    #[arg(long)]
    legacy_route_signs: bool,
}

impl Cli {
    fn options(&self) -> Options {
        Options {
            track_name: self.name.clone(),
            close_open_segments: !self.no_close_open,
            route_signs: if self.legacy_route_signs {
                RouteSigns::Legacy
            } else {
                RouteSigns::Hemisphere
            },
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => {
            print!("{err}");
            return ExitCode::FAILURE;
        }
    };

    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .target(env_logger::Target::Stderr)
        .init();

    match convert_file(&cli.input, &cli.output, &cli.options()) {
        Ok(report) => {
            if report.mode.is_none() {
                eprintln!("Non supported export file.");
            } else if report.mixed {
                eprintln!("Export contains both routes and tracks, output may be unreliable.");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            println!("{err}");
            ExitCode::FAILURE
        }
    }
}
