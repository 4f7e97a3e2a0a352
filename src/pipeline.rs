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

//! Pipeline module.
//!
//! This module contains the extraction of unseen emails into an
//! [`ExportTable`].
//!
//! Running the pipeline marks every fetched email as seen on the
//! server. With [`Selection::Range`], this includes the emails that
//! were already seen but sit between the lowest and the highest unseen
//! identifiers.

use log::{debug, info, warn};
use serde::Deserialize;
use std::{iter::Rev, ops::RangeInclusive, vec};

use crate::{
    backend::{Backend, BackendBuilder, Result},
    email, Credentials, ExportTable, Record,
};

/// Represents the way identifiers are picked from the unseen search
/// result.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Selection {
    /// Every identifier between the highest and the lowest unseen
    /// ones, gaps included.
    #[default]
    Range,
    /// Only the unseen identifiers.
    Exact,
}

impl Selection {
    /// Returns the identifiers to process, from the highest to the
    /// lowest. Identifiers are produced lazily.
    pub fn select(&self, mut unseen: Vec<u32>) -> SelectedIds {
        unseen.sort_unstable();
        unseen.dedup();

        let bounds = (unseen.first().copied(), unseen.last().copied());

        match (self, bounds) {
            (Self::Range, (Some(first), Some(last))) => {
                SelectedIds::Range(RangeInclusive::new(first, last).rev())
            }
            _ => SelectedIds::Exact(unseen.into_iter().rev()),
        }
    }
}

/// Iterator over the identifiers picked by a [`Selection`].
#[derive(Debug, Clone)]
pub enum SelectedIds {
    Range(Rev<RangeInclusive<u32>>),
    Exact(Rev<vec::IntoIter<u32>>),
}

impl Iterator for SelectedIds {
    type Item = u32;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Range(ids) => ids.next(),
            Self::Exact(ids) => ids.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Self::Range(ids) => ids.size_hint(),
            Self::Exact(ids) => ids.size_hint(),
        }
    }
}

/// Represents the outcome of a pipeline run.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct Report {
    pub table: ExportTable,
    /// Number of unseen emails found by the search.
    pub unseen: usize,
    /// Identifiers that could not be fetched. An empty row stands for
    /// each of them in the table.
    pub skipped_fetches: Vec<u32>,
    /// Number of email parts that could not be decoded.
    pub skipped_parts: usize,
}

impl Report {
    /// Returns `true` if the mailbox had no unseen email.
    pub fn is_empty(&self) -> bool {
        self.unseen == 0
    }

    /// Returns the number of skipped items.
    pub fn diagnostics(&self) -> usize {
        self.skipped_fetches.len() + self.skipped_parts
    }
}

/// Opens a session on the given mailbox, exports its unseen emails
/// then closes the session.
///
/// The session is closed on every path. A failure to close it after a
/// successful extraction is logged and the report is still returned,
/// since the emails are already marked as seen.
pub fn run<B: BackendBuilder>(
    builder: &B,
    credentials: &Credentials,
    mailbox: &str,
    selection: Selection,
) -> Result<Report> {
    let mut backend = builder.build(credentials, mailbox)?;
    let report = extract(&mut backend, selection);

    if let Err(err) = backend.close() {
        if report.is_ok() {
            warn!("{}", err);
        } else {
            debug!("{}", err);
        }
    }

    report
}

/// Exports the unseen emails of an open session.
pub fn extract<B: Backend>(backend: &mut B, selection: Selection) -> Result<Report> {
    let unseen = backend.search_unseen()?;

    let mut report = Report {
        unseen: unseen.len(),
        ..Report::default()
    };

    if unseen.is_empty() {
        info!("there are no unread emails");
        return Ok(report);
    }

    let ids = selection.select(unseen);
    debug!("processing {} emails", ids.size_hint().0);

    for id in ids {
        let record = match backend.fetch_raw(id) {
            Ok(raw) => {
                let (record, errors) = email::parse_with_errors(&raw);
                report.skipped_parts += errors.len();
                record
            }
            Err(err) if !err.is_fatal() => {
                warn!("skipping email {}: {}", id, err);
                report.skipped_fetches.push(id);
                Record::default()
            }
            Err(err) => return Err(err),
        };

        report.table.push(record);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::Selection;

    fn select(selection: Selection, unseen: Vec<u32>) -> Vec<u32> {
        selection.select(unseen).collect()
    }

    #[test]
    fn range_selection_fills_gaps() {
        assert_eq!(vec![9, 8, 7, 6, 5], select(Selection::Range, vec![5, 7, 9]));
    }

    #[test]
    fn exact_selection_keeps_unseen_only() {
        assert_eq!(vec![9, 7, 5], select(Selection::Exact, vec![7, 5, 9, 7]));
    }

    #[test]
    fn selection_of_nothing() {
        assert!(select(Selection::Range, vec![]).is_empty());
        assert!(select(Selection::Exact, vec![]).is_empty());
    }

    #[test]
    fn single_identifier() {
        assert_eq!(vec![3], select(Selection::Range, vec![3]));
    }

    #[test]
    fn range_selection_is_lazy() {
        let mut ids = Selection::Range.select(vec![1, u32::MAX]);

        assert_eq!(Some(u32::MAX), ids.next());
        assert_eq!(Some(u32::MAX - 1), ids.next());
    }
}
