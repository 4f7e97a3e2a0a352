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

//! IMAP backend module.
//!
//! This module contains the definition of the IMAP backend.

use log::{debug, log_enabled, trace, warn, Level};
use native_tls::{TlsConnector, TlsStream};
use std::{
    io::{self, Read, Write},
    net::TcpStream,
};
use utf7_imap::encode_utf7_imap as encode_utf7;

use crate::{
    backend::{Backend, BackendBuilder, Error, Result},
    Credentials, ImapConfig,
};

pub enum ImapSessionStream {
    Tls(TlsStream<TcpStream>),
    Tcp(TcpStream),
}

impl Read for ImapSessionStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Tls(stream) => stream.read(buf),
            Self::Tcp(stream) => stream.read(buf),
        }
    }
}

impl Write for ImapSessionStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Tls(stream) => stream.write(buf),
            Self::Tcp(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Tls(stream) => stream.flush(),
            Self::Tcp(stream) => stream.flush(),
        }
    }
}

pub type ImapSession = imap::Session<ImapSessionStream>;

/// Returns `true` if the error comes from the connection itself rather
/// than from the command that was sent.
fn is_transport_error(err: &imap::Error) -> bool {
    matches!(
        err,
        imap::Error::Io(_) | imap::Error::ConnectionLost | imap::Error::Bye(_)
    )
}

/// Opens [`ImapBackend`] sessions on the configured IMAP server.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct ImapBackendBuilder {
    config: ImapConfig,
}

impl ImapBackendBuilder {
    pub fn new(config: ImapConfig) -> Self {
        Self { config }
    }

    fn server(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    fn connect(&self) -> Result<imap::Client<ImapSessionStream>> {
        let config = &self.config;
        debug!("connecting to imap server {}", self.server());

        let tls = TlsConnector::builder()
            .danger_accept_invalid_certs(config.insecure())
            .danger_accept_invalid_hostnames(config.insecure())
            .build()
            .map_err(|err| Error::ConnectionError(err.into(), self.server()))?;

        let mut client_builder = imap::ClientBuilder::new(&config.host, config.port);
        if config.starttls() {
            client_builder.starttls();
        }

        if config.ssl() {
            client_builder.connect(|domain, tcp| {
                let stream = TlsConnector::connect(&tls, domain, tcp)?;
                Ok(ImapSessionStream::Tls(stream))
            })
        } else {
            client_builder.connect(|_, tcp| Ok(ImapSessionStream::Tcp(tcp)))
        }
        .map_err(|err| Error::ConnectionError(err.into(), self.server()))
    }
}

impl BackendBuilder for ImapBackendBuilder {
    type Backend = ImapBackend;

    fn build(&self, credentials: &Credentials, mailbox: &str) -> Result<ImapBackend> {
        let client = self.connect()?;

        debug!("login to imap server as {}", credentials.login());
        let mut session = client
            .login(credentials.login(), credentials.passwd())
            .map_err(|(err, _)| {
                if is_transport_error(&err) {
                    Error::ConnectionError(err.into(), self.server())
                } else {
                    Error::AuthError(err.into(), credentials.login().to_owned())
                }
            })?;
        session.debug = log_enabled!(Level::Trace);

        let encoded_mailbox = encode_utf7(mailbox.to_owned());
        debug!("select mailbox {} (utf7 encoded: {})", mailbox, encoded_mailbox);

        if let Err(err) = session.select(&encoded_mailbox) {
            let err = if is_transport_error(&err) {
                Error::ConnectionError(err.into(), self.server())
            } else {
                Error::MailboxError(err.into(), mailbox.to_owned())
            };
            if let Err(err) = session.logout() {
                warn!("cannot logout from imap server: {}", err);
            }
            return Err(err);
        }

        Ok(ImapBackend {
            server: self.server(),
            mailbox: mailbox.to_owned(),
            session: Some(session),
        })
    }
}

/// Represents an authenticated IMAP session on a selected mailbox.
///
/// The session is logged out by [`Backend::close`], or when dropped.
pub struct ImapBackend {
    server: String,
    mailbox: String,
    session: Option<ImapSession>,
}

impl ImapBackend {
    pub fn mailbox(&self) -> &str {
        &self.mailbox
    }

    fn session(&mut self) -> Result<&mut ImapSession> {
        let server = &self.server;
        self.session.as_mut().ok_or_else(|| {
            let err = io::Error::new(io::ErrorKind::NotConnected, "session already closed");
            Error::ConnectionError(err.into(), server.clone())
        })
    }
}

impl Backend for ImapBackend {
    fn search_unseen(&mut self) -> Result<Vec<u32>> {
        let server = self.server.clone();
        let mailbox = self.mailbox.clone();

        let mut seqs: Vec<u32> = self
            .session()?
            .search("UNSEEN")
            .map_err(|err| {
                if is_transport_error(&err) {
                    Error::ConnectionError(err.into(), server)
                } else {
                    Error::SearchError(err.into(), mailbox)
                }
            })?
            .into_iter()
            .collect();
        seqs.sort_unstable();

        debug!("found {} unseen emails", seqs.len());
        trace!("seqs: {:?}", seqs);

        Ok(seqs)
    }

    fn fetch_raw(&mut self, id: u32) -> Result<Vec<u8>> {
        let server = self.server.clone();

        debug!("fetching email {}", id);
        let fetches = self
            .session()?
            .fetch(id.to_string(), "RFC822")
            .map_err(|err| {
                if is_transport_error(&err) {
                    Error::ConnectionError(err.into(), server)
                } else {
                    Error::FetchError(err.into(), id)
                }
            })?;

        let raw = fetches
            .iter()
            .find_map(|fetch| fetch.body())
            .ok_or(Error::FetchEmptyError(id))?;
        trace!("email {} is {} bytes long", id, raw.len());

        Ok(raw.to_vec())
    }

    fn close(&mut self) -> Result<()> {
        if let Some(mut session) = self.session.take() {
            debug!("logout from imap server {}", self.server);
            session
                .logout()
                .map_err(|err| Error::CloseError(err.into()))?;
        }

        Ok(())
    }
}

impl Drop for ImapBackend {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            warn!("cannot close imap session: {}", err);
        }
    }
}
