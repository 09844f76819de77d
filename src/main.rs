// SPDX-FileCopyrightText: 2025 The hordelink authors
// SPDX-License-Identifier: MIT

use hordelink::{path::default_config_path, Linker, RunConfig, Settings};

use anyhow::{Context, Result};
use clap::Parser;
use std::{path::PathBuf, process::exit};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Clone, Parser)]
#[command(
    about,
    override_usage = "hordelink [options] --git_base <path> [web_dir]",
    version
)]
struct Cli {
    /// Base directory containing all git checkouts.
    #[arg(long = "git_base", value_name = "path")]
    git_base: Option<PathBuf>,

    /// Web-accessible directory to install into.
    #[arg(value_name = "web_dir")]
    web_dir: Option<PathBuf>,

    /// Reduce output to a minimum.
    #[arg(short, long)]
    quiet: bool,

    /// Raise output to a maximum.
    #[arg(short, long)]
    verbose: bool,

    /// Show a diagnostic for every file action.
    #[arg(long)]
    debug: bool,

    /// Just pretend and indicate what would be done rather than
    /// performing the action.
    #[arg(short = 'P', long)]
    pretend: bool,

    /// Avoid colors in the output.
    #[arg(short = 'N', long)]
    nocolor: bool,

    /// Copy files instead of creating symbolic links.
    #[arg(long)]
    copy: bool,

    /// Path to the configuration file.
    #[arg(short, long, value_name = "path")]
    config: Option<PathBuf>,
}

impl Cli {
    fn default_level(&self) -> &'static str {
        if self.quiet {
            "warn"
        } else if self.verbose || self.debug {
            "debug"
        } else {
            "info"
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let layer = fmt::layer()
        .compact()
        .with_ansi(!cli.nocolor)
        .with_target(false)
        .without_time();
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(cli.default_level()))
        .unwrap();
    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .init();

    if let Err(error) = run(cli) {
        error!("{error:?}");
        exit(1);
    }

    exit(0)
}

fn run(cli: Cli) -> Result<()> {
    let settings = match &cli.config {
        // An explicitly given configuration file must be readable.
        Some(path) => Settings::load(path)?,
        None => {
            let path = default_config_path()?;
            if path.is_file() {
                Settings::load(path)?
            } else {
                Settings::default()
            }
        }
    };

    let git_base = cli
        .git_base
        .or(settings.install.git_base)
        .context("no git checkout base directory given (--git_base)")?;
    let web_dir = cli
        .web_dir
        .or(settings.install.web_dir)
        .context("no web directory given")?;

    let config = RunConfig {
        git_base,
        web_dir,
        copy: cli.copy || settings.install.copy,
        dry_run: cli.pretend,
    };

    let report = Linker::new(config).run()?;
    info!(
        "{} file(s) installed, {} skipped, {} failed",
        report.installed, report.skipped, report.failed_entries
    );

    Ok(())
}
