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

//! Backend module.
//!
//! This module exposes the backend traits, which represent an
//! authenticated session on a selected mailbox.

use std::{error, result};
use thiserror::Error;

use crate::Credentials;

pub type BoxedError = Box<dyn error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot connect to mail server {1}")]
    ConnectionError(#[source] BoxedError, String),
    #[error("cannot authenticate to mail server as {1}")]
    AuthError(#[source] BoxedError, String),
    #[error("cannot select mailbox {1}")]
    MailboxError(#[source] BoxedError, String),
    #[error("cannot search unseen emails in mailbox {1}")]
    SearchError(#[source] BoxedError, String),
    #[error("cannot fetch email {1}")]
    FetchError(#[source] BoxedError, u32),
    #[error("cannot fetch email {0}: server returned no content")]
    FetchEmptyError(u32),
    #[error("cannot close session")]
    CloseError(#[source] BoxedError),
}

impl Error {
    /// Returns `true` if the error must abort the whole run. Only the
    /// failure to retrieve one email is recoverable.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::FetchError(..) | Self::FetchEmptyError(_))
    }
}

pub type Result<T> = result::Result<T, Error>;

/// Represents an open session on a selected mailbox.
///
/// Fetching an email through a session marks it as seen on the
/// server. This cannot be undone by the session.
pub trait Backend {
    /// Returns the identifiers of the unseen emails, in ascending
    /// order. No unseen email gives an empty list.
    fn search_unseen(&mut self) -> Result<Vec<u32>>;

    /// Returns the raw content of the email matching the given
    /// identifier.
    fn fetch_raw(&mut self, id: u32) -> Result<Vec<u8>>;

    /// Logs out and releases the connection. Closing an already closed
    /// session does nothing.
    fn close(&mut self) -> Result<()>;
}

/// Opens [`Backend`] sessions.
pub trait BackendBuilder {
    type Backend: Backend;

    /// Connects, authenticates with the given credentials then selects
    /// the given mailbox.
    fn build(&self, credentials: &Credentials, mailbox: &str) -> Result<Self::Backend>;
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::Error;

    fn io_err() -> super::BoxedError {
        io::Error::new(io::ErrorKind::Other, "err").into()
    }

    #[test]
    fn only_fetch_errors_are_recoverable() {
        assert!(!Error::FetchError(io_err(), 1).is_fatal());
        assert!(!Error::FetchEmptyError(1).is_fatal());

        assert!(Error::ConnectionError(io_err(), "localhost".into()).is_fatal());
        assert!(Error::AuthError(io_err(), "alice".into()).is_fatal());
        assert!(Error::MailboxError(io_err(), "INBOX".into()).is_fatal());
        assert!(Error::SearchError(io_err(), "INBOX".into()).is_fatal());
        assert!(Error::CloseError(io_err()).is_fatal());
    }
}
