// SPDX-FileCopyrightText: 2025 The hordelink authors
// SPDX-License-Identifier: MIT

//! Framework installation run.
//!
//! Drives one full run over a checkout base: discover package checkouts,
//! parse each package's descriptor, resolve each file entry to a plan,
//! and execute the plans. Failure handling is deliberately layered:
//!
//! - A checkout base that cannot be scanned aborts the run.
//! - A descriptor that cannot be parsed fails that one package.
//! - An entry that cannot be resolved or installed fails that one entry.
//!
//! Package and entry failures are reported through the diagnostic stream
//! and counted in the [`RunReport`], never propagated. A run over a
//! readable checkout base therefore always completes.

pub mod action;
pub mod plan;

use crate::{
    config::RunConfig,
    install::{
        action::execute,
        plan::{resolve, Action, Resolution, LIB_SUBDIR},
    },
    manifest::{self, Manifest},
};

use std::path::Path;
use tracing::{debug, error, info, instrument, warn};

/// Installs framework packages from git checkouts into a web directory.
#[derive(Debug)]
pub struct Linker {
    config: RunConfig,
}

impl Linker {
    /// Construct new linker over one run's configuration.
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    /// Process every package under the checkout base.
    ///
    /// # Errors
    ///
    /// - Return [`InstallError::Manifest`] if the checkout base cannot be
    ///   scanned for packages.
    #[instrument(skip(self), level = "debug")]
    pub fn run(&self) -> Result<RunReport> {
        let lib_dir = self.config.web_dir.join(LIB_SUBDIR);
        info!("source directory: {}", self.config.git_base.display());
        info!("framework destination directory: {}", lib_dir.display());
        info!("horde directory: {}", self.config.web_dir.display());
        info!(
            "create symbolic links: {}",
            if self.config.copy { "no" } else { "yes" }
        );

        let packages = manifest::discover(&self.config.git_base)?;
        match packages.len() {
            1 => info!(
                "package to install: {}",
                packages.keys().next().map(String::as_str).unwrap_or("")
            ),
            count => info!("packages to install: ALL ({count} packages)"),
        }

        let mut report = RunReport::default();
        for (package, checkout) in &packages {
            info!("installing package {package}");
            let manifest = match Manifest::load(checkout) {
                Ok(manifest) => manifest,
                Err(err) => {
                    error!("could not install package {package}: {err}");
                    report.failed_packages += 1;
                    continue;
                }
            };

            self.install_package(&manifest, checkout, &mut report);
        }

        if report.failed_entries > 0 || report.failed_packages > 0 {
            warn!(
                "{} entries and {} packages failed to install",
                report.failed_entries, report.failed_packages
            );
        }

        Ok(report)
    }

    /// Install every file entry of one package's manifest, in order.
    #[instrument(skip(self, manifest, checkout, report), level = "debug")]
    fn install_package(&self, manifest: &Manifest, checkout: &Path, report: &mut RunReport) {
        let action = if self.config.copy {
            Action::Copy
        } else {
            Action::Symlink
        };

        for entry in &manifest.entries {
            match resolve(entry, checkout, &self.config.web_dir, action) {
                Resolution::Install(plan) => match execute(&plan, self.config.dry_run) {
                    Ok(()) => report.installed += 1,
                    Err(err) => {
                        error!("{err}");
                        report.failed_entries += 1;
                    }
                },
                Resolution::Skip(reason) if reason.is_silent() => {
                    debug!("{reason}");
                    report.skipped += 1;
                }
                Resolution::Skip(reason) => {
                    error!("{reason}");
                    report.failed_entries += 1;
                }
            }
        }
    }
}

/// Counters accumulated over one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// Entries installed, or reported under dry-run.
    pub installed: u64,

    /// Entries skipped silently over an unhandled role.
    pub skipped: u64,

    /// Entries that failed to resolve or install.
    pub failed_entries: u64,

    /// Packages whose descriptor could not be parsed.
    pub failed_packages: u64,
}

/// Installation run error types.
#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    /// Package discovery over the checkout base fails.
    #[error(transparent)]
    Manifest(#[from] crate::manifest::ManifestError),
}

/// Friendly result alias :3
pub type Result<T, E = InstallError> = std::result::Result<T, E>;
