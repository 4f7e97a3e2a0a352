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

//! Rust library to export unread emails.
//!
//! The library opens a session on a mailbox, fetches every unseen
//! email, extracts its sender, date, subject and plain text body, then
//! hands the result to an export sink as a table.
//!
//! ```no_run
//! use mailsnap::{pipeline, Credentials, ImapBackendBuilder, ImapConfig, Selection};
//!
//! let builder = ImapBackendBuilder::new(ImapConfig::default());
//! let credentials = Credentials::new("user@gmail.com", "password");
//! let report = pipeline::run(&builder, &credentials, "INBOX", Selection::Range).unwrap();
//! mailsnap::export::csv::export(&report.table, "unread.csv".as_ref()).unwrap();
//! ```
//!
//! Fetching an email marks it as seen on the server.

pub(crate) mod process;

pub mod backend;
pub use backend::*;

pub mod config;
pub use config::Config;

pub mod domain;
pub use domain::*;

pub mod export;
pub use export::{ExportTable, HEADER};

pub mod pipeline;
pub use pipeline::{Report, Selection};
