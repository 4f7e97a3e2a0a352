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

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, error};
use std::{path::PathBuf, process::ExitCode};

use mailsnap::{export, pipeline, Config, ImapBackendBuilder, Selection};

/// Export unread emails into a spreadsheet.
///
/// Every exported email is marked as read on the server.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    /// Read the configuration from this file.
    #[arg(short, long, value_name = "PATH")]
    config: Option<String>,

    /// Export unread emails from this mailbox.
    #[arg(short, long, value_name = "NAME")]
    mailbox: Option<String>,

    /// Write the export to this file.
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Only fetch the unread emails, not every email between the
    /// oldest and the newest unread ones.
    #[arg(long)]
    exact: bool,

    /// Log what is being done.
    #[arg(short, long)]
    verbose: bool,
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::from_opt_path(cli.config.as_deref())?;

    let mailbox = cli.mailbox.as_deref().unwrap_or_else(|| config.mailbox());
    let selection = if cli.exact {
        Selection::Exact
    } else {
        config.selection
    };
    let output = match cli.output {
        Some(output) => output,
        None => config.output()?,
    };
    debug!("mailbox: {}", mailbox);
    debug!("selection: {:?}", selection);
    debug!("output: {}", output.display());

    let credentials = config.credentials()?;
    let builder = ImapBackendBuilder::new(config.imap.clone());

    let report = pipeline::run(&builder, &credentials, mailbox, selection)
        .with_context(|| format!("cannot export unread emails from {}", mailbox))?;

    export::csv::export(&report.table, &output)?;

    if report.is_empty() {
        println!("There are no unread emails!");
    } else {
        println!(
            "{} unread, {} rows written to {}, {} skipped",
            report.unseen,
            report.table.len(),
            output.display(),
            report.diagnostics(),
        );
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:?}", err);
            ExitCode::FAILURE
        }
    }
}
