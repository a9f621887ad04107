// Copyright 2022, 2023 Viktor Reusch
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

//! This is a WASM wrapper for `togpx`.

use std::io::Cursor;

use togpx::Options;
use wasm_bindgen::{prelude::wasm_bindgen, JsError};

/// This wraps `togpx::convert` for interfacing with JS.
///
/// Default options are used. Unsupported exports yield a GPX file without
/// tracks, like on the command line.
#[wasm_bindgen]
pub fn convert(source: &[u8]) -> Result<Box<[u8]>, JsError> {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    let mut sink = vec![];
    togpx::convert(Cursor::new(source), &mut sink, &Options::default())?;
    Ok(sink.into_boxed_slice())
}
