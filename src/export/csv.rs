// mailsnap, a Rust library to export unread emails.
// Copyright (C) 2022  soywod <clement.douin@posteo.net>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! CSV export module.
//!
//! Output is UTF-8 with BOM so that spreadsheet applications detect
//! the encoding.

use log::debug;
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
    result,
};
use thiserror::Error;

use crate::ExportTable;

const BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot create export file {1}")]
    CreateFileError(#[source] io::Error, PathBuf),
    #[error("cannot write export table")]
    WriteTableError(#[source] io::Error),
}

pub type Result<T> = result::Result<T, Error>;

/// Writes the given table into a new file at the given path.
pub fn export(table: &ExportTable, path: &Path) -> Result<()> {
    debug!("exporting {} rows to {}", table.len(), path.display());

    let file = File::create(path).map_err(|err| Error::CreateFileError(err, path.to_owned()))?;
    let mut writer = BufWriter::new(file);
    write(table, &mut writer)?;
    writer.flush().map_err(Error::WriteTableError)
}

/// Writes the given table, header first, into the given writer.
pub fn write<W: Write>(table: &ExportTable, writer: &mut W) -> Result<()> {
    writer.write_all(BOM).map_err(Error::WriteTableError)?;

    for line in table.lines() {
        let line = line.map(escape).join(",");
        write!(writer, "{}\r\n", line).map_err(Error::WriteTableError)?;
    }

    Ok(())
}

/// Escapes a value for CSV (RFC 4180).
///
/// Wraps in double quotes if the value contains commas, quotes, or
/// line breaks.
fn escape(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_owned()
    }
}
