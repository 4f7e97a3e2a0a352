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

//! IMAP backend config module.
//!
//! This module contains the representation of the IMAP server
//! settings.

use serde::Deserialize;

pub const DEFAULT_IMAP_HOST: &str = "imap.gmail.com";
pub const DEFAULT_IMAP_PORT: u16 = 993;

/// Represents the IMAP backend configuration.
#[derive(Debug, Clone, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ImapConfig {
    /// Represents the IMAP server host.
    #[serde(default = "default_host")]
    pub host: String,
    /// Represents the IMAP server port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Enables SSL.
    pub ssl: Option<bool>,
    /// Enables StartTLS.
    pub starttls: Option<bool>,
    /// Trusts any certificate.
    pub insecure: Option<bool>,
}

impl Default for ImapConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            ssl: None,
            starttls: None,
            insecure: None,
        }
    }
}

impl ImapConfig {
    /// Gets the SSL IMAP option. SSL is enabled unless disabled.
    pub fn ssl(&self) -> bool {
        self.ssl.unwrap_or(true)
    }

    /// Gets the StartTLS IMAP option.
    pub fn starttls(&self) -> bool {
        self.starttls.unwrap_or_default()
    }

    /// Gets the insecure IMAP option.
    pub fn insecure(&self) -> bool {
        self.insecure.unwrap_or_default()
    }
}

fn default_host() -> String {
    DEFAULT_IMAP_HOST.to_owned()
}

fn default_port() -> u16 {
    DEFAULT_IMAP_PORT
}
