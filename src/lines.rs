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

//! Line reader keeping the line terminators.
//!
//! The exports use CRLF line endings and the sentinel lines are compared
//! including them, so [`std::io::BufRead::lines`] is not an option.

use std::borrow::Cow;
use std::io::BufRead;

use crate::Error;

pub(crate) struct Lines<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> Lines<R> {
    pub(crate) fn new(reader: R) -> Self {
        Lines {
            reader,
            buf: Vec::new(),
        }
    }

    /// Read the next line including its terminator.
    ///
    /// Invalid UTF-8 is replaced. Returns [`None`] at the end of the stream.
    pub(crate) fn next_line(&mut self) -> Result<Option<Cow<'_, str>>, Error> {
        self.buf.clear();
        let read = self
            .reader
            .read_until(b'\n', &mut self.buf)
            .map_err(Error::Read)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&self.buf)))
    }
}
