// SPDX-FileCopyrightText: 2025 The hordelink authors
// SPDX-License-Identifier: MIT

//! Filesystem execution of install plans.
//!
//! Performs the copy or symlink a plan calls for, with overwrite
//! semantics: a pre-existing destination (dangling symlinks included) is
//! removed first, so re-running against the same inputs converges on the
//! same tree. Under dry-run the would-be action is reported and nothing
//! on disk is touched, not even destination directories.

use crate::install::plan::{Action, InstallPlan};

use std::{fs, path::PathBuf};
use tracing::{debug, info, warn};

/// Execute one install plan.
///
/// # Errors
///
/// - Return [`ActionError::CreateDestDir`] if the destination's parent
///   directory cannot be created.
/// - Return [`ActionError::Copy`] or [`ActionError::Link`] if the
///   configured action fails.
pub fn execute(plan: &InstallPlan, dry_run: bool) -> Result<()> {
    if dry_run {
        info!(
            "{}: {} -> {}",
            plan.action,
            plan.source.display(),
            plan.dest.display()
        );
        return Ok(());
    }

    debug!(
        "{}: {} -> {}",
        plan.action,
        plan.source.display(),
        plan.dest.display()
    );

    if let Some(parent) = plan.dest.parent() {
        mkdirp::mkdirp(parent).map_err(|err| ActionError::CreateDestDir {
            source: err,
            path: parent.to_path_buf(),
        })?;
    }

    // Overwrite semantics: last writer wins. Removal failure is tolerated
    // here, the copy/symlink below then reports the real failure.
    if plan.dest.symlink_metadata().is_ok() {
        if let Err(error) = fs::remove_file(&plan.dest) {
            warn!("cannot remove existing {}: {error}", plan.dest.display());
        }
    }

    match plan.action {
        Action::Copy => {
            fs::copy(&plan.source, &plan.dest).map_err(|err| ActionError::Copy {
                source: err,
                path: plan.source.clone(),
            })?;
        }
        Action::Symlink => {
            symlink(plan).map_err(|err| ActionError::Link {
                source: err,
                path: plan.source.clone(),
            })?;
        }
    }

    Ok(())
}

#[cfg(unix)]
fn symlink(plan: &InstallPlan) -> std::io::Result<()> {
    std::os::unix::fs::symlink(&plan.source, &plan.dest)
}

#[cfg(windows)]
fn symlink(plan: &InstallPlan) -> std::io::Result<()> {
    std::os::windows::fs::symlink_file(&plan.source, &plan.dest)
}

/// Install action error types.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// Destination parent directory cannot be created.
    #[error("failed to create install directory at {:?}", path.display())]
    CreateDestDir {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Source file cannot be copied to its destination.
    #[error("could not copy {:?}", path.display())]
    Copy {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Symbolic link to the source cannot be created.
    #[error("could not link {:?}", path.display())]
    Link {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
}

/// Friendly result alias :3
pub type Result<T, E = ActionError> = std::result::Result<T, E>;
