// SPDX-FileCopyrightText: 2025 The hordelink authors
// SPDX-License-Identifier: MIT

//! Prepare a web-accessible Horde deployment tree from git checkouts.
//!
//! Each checkout under a base directory carries a `package.xml` descriptor
//! whose installation file list says which files belong in the web
//! directory, and where. Hordelink walks those lists and installs every
//! file by symbolic link back into its checkout, or by copy.
//!
//! The pipeline is small and strictly sequential: discover checkouts,
//! parse each descriptor ([`manifest`]), resolve each file entry to a
//! destination and action ([`install::plan`]), then perform or, under
//! dry-run, report the filesystem effect ([`install::action`]).
//! [`Linker`] drives the whole run over one immutable [`RunConfig`].

pub mod config;
pub mod install;
pub mod manifest;
pub mod path;

pub use config::{RunConfig, Settings};
pub use install::{Linker, RunReport};
pub use manifest::{InstallEntry, Manifest, Role};
