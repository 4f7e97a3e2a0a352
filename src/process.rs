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

//! Process module.
//!
//! This module contains helpers around [`std::process`] used to
//! retrieve secrets from password managers.

use log::debug;
use std::{
    env, io,
    process::{Command, Output, Stdio},
    result, string,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot run command {1:?}")]
    RunCmdError(#[source] io::Error, String),
    #[error("command {0:?} exited with status {1}")]
    CmdStatusError(String, i32),
    #[error("command {0:?} was terminated by a signal")]
    CmdSignalError(String),
    #[error("cannot parse command output")]
    ParseCmdOutputError(#[source] string::FromUtf8Error),
}

pub type Result<T> = result::Result<T, Error>;

/// Runs the given shell command and returns its standard output as a
/// UTF-8 string. Standard error is inherited so that prompts from
/// password managers stay visible.
pub fn run(cmd: &str) -> Result<String> {
    debug!("running command: {}", cmd);

    let output = shell(cmd)
        .stdin(Stdio::inherit())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .output()
        .map_err(|err| Error::RunCmdError(err, cmd.to_owned()))?;

    check_status(cmd, &output)?;

    String::from_utf8(output.stdout).map_err(Error::ParseCmdOutputError)
}

fn shell(cmd: &str) -> Command {
    let windows = cfg!(target_os = "windows")
        && env::var("MSYSTEM")
            .map(|env| !env.starts_with("MINGW"))
            .unwrap_or_default();

    if windows {
        let mut command = Command::new("cmd");
        command.args(["/C", cmd]);
        command
    } else {
        let mut command = Command::new("sh");
        command.arg("-c").arg(cmd);
        command
    }
}

fn check_status(cmd: &str, output: &Output) -> Result<()> {
    if output.status.success() {
        return Ok(());
    }

    match output.status.code() {
        Some(code) => Err(Error::CmdStatusError(cmd.to_owned(), code)),
        None => Err(Error::CmdSignalError(cmd.to_owned())),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn run_returns_stdout() {
        assert_eq!("password\n", run("echo password").unwrap());
    }

    #[test]
    fn run_follows_pipes() {
        assert_eq!("PASSWORD\n", run("echo password | tr a-z A-Z").unwrap());
    }

    #[test]
    fn run_fails_on_non_zero_status() {
        assert!(matches!(
            run("exit 3"),
            Err(Error::CmdStatusError(_, 3))
        ));
    }
}
