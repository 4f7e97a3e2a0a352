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

//! Export table module.

use std::{ops::Deref, slice};

use crate::Record;

/// Represents the header row of the export table.
pub const HEADER: [&str; 4] = ["From", "Date", "Subject", "E-Mail Content"];

/// Represents the rows handed to an export sink, in processing
/// order. The header row is implicit, see [`HEADER`].
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct ExportTable {
    rows: Vec<Record>,
}

impl ExportTable {
    pub fn header(&self) -> [&'static str; 4] {
        HEADER
    }

    pub fn push(&mut self, record: Record) {
        self.rows.push(record)
    }

    /// Returns the header followed by every row.
    pub fn lines(&self) -> impl Iterator<Item = [&str; 4]> {
        std::iter::once(HEADER).chain(self.rows.iter().map(Record::to_row))
    }
}

impl Deref for ExportTable {
    type Target = [Record];

    fn deref(&self) -> &Self::Target {
        &self.rows
    }
}

impl<'a> IntoIterator for &'a ExportTable {
    type Item = &'a Record;
    type IntoIter = slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl FromIterator<Record> for ExportTable {
    fn from_iter<T: IntoIterator<Item = Record>>(iter: T) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_table_has_header_only() {
        let table = ExportTable::default();

        assert!(table.is_empty());
        assert_eq!(vec![HEADER], table.lines().collect::<Vec<_>>());
    }

    #[test]
    fn lines_follow_push_order() {
        let table = ExportTable::from_iter([
            Record {
                subject: "first".into(),
                ..Record::default()
            },
            Record {
                subject: "second".into(),
                ..Record::default()
            },
        ]);

        let subjects: Vec<_> = table.lines().map(|line| line[2]).collect();
        assert_eq!(vec!["Subject", "first", "second"], subjects);
    }
}
