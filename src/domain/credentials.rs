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

//! Credentials module.
//!
//! This module contains the representation of the static credentials
//! used to authenticate against the mail server.

use secrecy::{ExposeSecret, SecretString};
use std::fmt;

/// Represents the identity and the secret used to log in.
///
/// The secret is never printed: the [`fmt::Debug`] implementation
/// redacts it.
pub struct Credentials {
    login: String,
    passwd: SecretString,
}

impl Credentials {
    pub fn new<L, P>(login: L, passwd: P) -> Self
    where
        L: ToString,
        P: Into<String>,
    {
        Self {
            login: login.to_string(),
            passwd: SecretString::from(passwd.into()),
        }
    }

    pub fn login(&self) -> &str {
        &self.login
    }

    pub fn passwd(&self) -> &str {
        self.passwd.expose_secret()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("passwd", &"[REDACTED]")
            .finish()
    }
}
