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

//! Config module.
//!
//! This module contains the representation of the user's
//! configuration and the resolution of the credentials.

use log::{debug, trace};
use serde::Deserialize;
use std::{
    env, fs, io,
    path::{Path, PathBuf},
    result,
};
use thiserror::Error;

use crate::{process, Credentials, Selection};

#[cfg(feature = "imap-backend")]
use crate::ImapConfig;

pub const DEFAULT_MAILBOX: &str = "INBOX";
pub const DEFAULT_OUTPUT: &str = "Unread Email Info.csv";
pub const LOGIN_ENV_VAR: &str = "EMAIL_USER";
pub const PASSWD_ENV_VAR: &str = "EMAIL_PASS";

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot read config file {1}")]
    ReadConfigFileError(#[source] io::Error, PathBuf),
    #[error("cannot parse config file {1}")]
    ParseConfigFileError(#[source] toml::de::Error, PathBuf),
    #[error("cannot expand path {1}")]
    ExpandPathError(#[source] shellexpand::LookupError<env::VarError>, String),
    #[error("cannot find login: set it in config or via ${0}")]
    GetLoginError(&'static str),
    #[error("cannot find password: set passwd-cmd in config or ${0}")]
    GetPasswdError(&'static str),
    #[error("cannot get password from command")]
    GetPasswdCmdError(#[source] process::Error),
    #[error("cannot get password: command output is empty")]
    GetPasswdEmptyError,
}

pub type Result<T> = result::Result<T, Error>;

/// Represents the user's configuration.
#[derive(Debug, Default, Clone, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Represents the login used to authenticate. Falls back to
    /// `$EMAIL_USER`.
    pub login: Option<String>,
    /// Represents the command printing the password on its first
    /// line. Falls back to `$EMAIL_PASS`.
    pub passwd_cmd: Option<String>,
    /// Represents the mailbox to export. Defaults to `INBOX`.
    pub mailbox: Option<String>,
    /// Represents the way unseen identifiers are iterated.
    #[serde(default)]
    pub selection: Selection,
    /// Represents the path of the export file.
    pub output: Option<String>,

    #[cfg(feature = "imap-backend")]
    #[serde(default)]
    pub imap: ImapConfig,
}

impl Config {
    /// Returns the default config file path:
    /// `<config dir>/mailsnap/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("mailsnap").join("config.toml"))
    }

    /// Reads the config from the given path, or from the default path.
    /// A missing default file gives the default config.
    pub fn from_opt_path(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::from_path(&expand(path)?),
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_path(&path),
                _ => {
                    debug!("no config file found, using default config");
                    Ok(Self::default())
                }
            },
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        debug!("reading config file {}", path.display());
        let content = fs::read_to_string(path)
            .map_err(|err| Error::ReadConfigFileError(err, path.to_owned()))?;
        let config = toml::from_str(&content)
            .map_err(|err| Error::ParseConfigFileError(err, path.to_owned()))?;
        trace!("config: {:#?}", config);
        Ok(config)
    }

    pub fn mailbox(&self) -> &str {
        self.mailbox.as_deref().unwrap_or(DEFAULT_MAILBOX)
    }

    /// Returns the expanded path of the export file.
    pub fn output(&self) -> Result<PathBuf> {
        expand(self.output.as_deref().unwrap_or(DEFAULT_OUTPUT))
    }

    /// Resolves the credentials from the config, then from the
    /// environment.
    pub fn credentials(&self) -> Result<Credentials> {
        let login = match &self.login {
            Some(login) => login.clone(),
            None => env::var(LOGIN_ENV_VAR).map_err(|_| Error::GetLoginError(LOGIN_ENV_VAR))?,
        };

        let passwd = match &self.passwd_cmd {
            Some(cmd) => process::run(cmd)
                .map_err(Error::GetPasswdCmdError)?
                .lines()
                .next()
                .filter(|line| !line.is_empty())
                .ok_or(Error::GetPasswdEmptyError)?
                .to_owned(),
            None => env::var(PASSWD_ENV_VAR).map_err(|_| Error::GetPasswdError(PASSWD_ENV_VAR))?,
        };

        Ok(Credentials::new(login, passwd))
    }
}

fn expand(path: &str) -> Result<PathBuf> {
    shellexpand::full(path)
        .map(|path| PathBuf::from(path.as_ref()))
        .map_err(|err| Error::ExpandPathError(err, path.to_owned()))
}
