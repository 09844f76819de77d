// SPDX-FileCopyrightText: 2025 The hordelink authors
// SPDX-License-Identifier: MIT

//! Package descriptor reading.
//!
//! Every Horde repository checkout carries a PEAR-style `package.xml`
//! descriptor at its top level. The part hordelink cares about is the
//! installation file list: which files of the checkout are meant to be
//! installed, under what role, and with what destination hints.
//!
//! # Descriptor Layout
//!
//! The `<contents>` section holds a single root `<dir name="/">` element
//! which nests further `<dir>` and `<file>` elements. A file's full
//! relative name is the concatenation of its ancestor dir names (the root
//! `/` contributes nothing) with its own `name` attribute. A
//! `baseinstalldir` attribute may sit on a `<dir>`, in which case nested
//! files inherit it, or on a `<file>`, which overrides whatever was
//! inherited.
//!
//! Separately, each `<phprelease><filelist>` section may carry
//! `<install as="..." name="...">` elements that map a file's full relative
//! name to an explicit install-as destination. Multiple `<phprelease>`
//! sections are merged into one mapping.
//!
//! Everything else in the descriptor (dependencies, changelog, release
//! metadata) is ignored.

use quick_xml::DeError;
use serde::Deserialize;
use std::{
    collections::{BTreeMap, HashMap},
    fmt::{Display, Formatter, Result as FmtResult},
    fs::read_to_string,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::debug;

/// File name of the package descriptor inside a checkout.
pub const DESCRIPTOR_FILE: &str = "package.xml";

/// Classification tag of a file entry.
///
/// The descriptor marks every file with a `role` attribute controlling
/// which destination sub-tree it is installed into. Only the `horde` and
/// `php` roles produce installable files; every other tag (`doc`, `test`,
/// `data`, ...) is kept verbatim in [`Role::Other`] and resolves to no
/// destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    /// Application file installed directly under the web directory.
    Horde,

    /// Library file installed under the `libs` sub-tree.
    Php,

    /// Any unrecognized role tag.
    Other(String),
}

impl From<&str> for Role {
    fn from(tag: &str) -> Self {
        match tag {
            "horde" => Self::Horde,
            "php" => Self::Php,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl FromStr for Role {
    type Err = std::convert::Infallible;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        Ok(tag.into())
    }
}

impl Display for Role {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Horde => fmt.write_str("horde"),
            Self::Php => fmt.write_str("php"),
            Self::Other(tag) => fmt.write_str(tag),
        }
    }
}

/// One row of a descriptor's installation file list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallEntry {
    /// Path of the source file relative to its checkout.
    ///
    /// An entry without a name is invalid, and gets reported and skipped
    /// during planning rather than failing the whole manifest.
    pub name: Option<String>,

    /// Role tag controlling destination resolution.
    pub role: Role,

    /// Explicit destination override from the release file list.
    pub install_as: Option<String>,

    /// Destination prefix, only honored for role `php` without an
    /// explicit install-as override.
    pub base_install_dir: Option<String>,
}

/// Parsed package descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    /// Package name as declared by the descriptor.
    pub name: String,

    /// Installation file list in descriptor order.
    pub entries: Vec<InstallEntry>,
}

impl Manifest {
    /// Load and parse the descriptor of one checkout directory.
    ///
    /// # Errors
    ///
    /// - Return [`ManifestError::Read`] if the descriptor file cannot be
    ///   read.
    /// - Return [`ManifestError::Deserialize`] if the descriptor is not
    ///   valid descriptor XML.
    pub fn load(checkout: impl AsRef<Path>) -> Result<Self> {
        let path = checkout.as_ref().join(DESCRIPTOR_FILE);
        let content = read_to_string(&path).map_err(|err| ManifestError::Read {
            source: err,
            path: path.clone(),
        })?;

        content.parse()
    }
}

impl FromStr for Manifest {
    type Err = ManifestError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let raw: RawPackage = quick_xml::de::from_str(data)?;

        let mut install_as = HashMap::new();
        for release in &raw.releases {
            if let Some(filelist) = &release.filelist {
                for install in &filelist.installs {
                    install_as.insert(install.name.clone(), install.as_name.clone());
                }
            }
        }

        let mut entries = Vec::new();
        flatten(&raw.contents.dir, Path::new(""), None, &install_as, &mut entries);

        Ok(Self {
            name: raw.name,
            entries,
        })
    }
}

/// Walk one `<dir>` level of the contents tree, in document order.
fn flatten(
    dir: &RawDir,
    prefix: &Path,
    inherited_base: Option<&str>,
    install_as: &HashMap<String, String>,
    entries: &mut Vec<InstallEntry>,
) {
    // INVARIANT: The root dir is named "/" and contributes no path segment.
    let prefix = match dir.name.trim_matches('/') {
        "" => prefix.to_path_buf(),
        name => prefix.join(name),
    };
    let base = dir.base_install_dir.as_deref().or(inherited_base);

    for file in &dir.files {
        let name = file
            .name
            .as_ref()
            .map(|name| prefix.join(name).to_string_lossy().into_owned());
        let install_as = name.as_ref().and_then(|name| install_as.get(name).cloned());
        let role = match &file.role {
            Some(tag) => Role::from(tag.as_str()),
            None => Role::Other(String::new()),
        };

        entries.push(InstallEntry {
            name,
            role,
            install_as,
            base_install_dir: file.base_install_dir.clone().or(base.map(str::to_owned)),
        });
    }

    for subdir in &dir.dirs {
        flatten(subdir, &prefix, base, install_as, entries);
    }
}

/// Discover package checkouts under a base directory.
///
/// Every direct subdirectory of `git_base` containing a descriptor file is
/// considered a package checkout. The returned mapping is keyed by
/// directory name, sorted, so runs process packages in deterministic
/// order.
///
/// # Errors
///
/// - Return [`ManifestError::Scan`] if the base directory cannot be read.
pub fn discover(git_base: impl AsRef<Path>) -> Result<BTreeMap<String, PathBuf>> {
    let git_base = git_base.as_ref();
    let mut packages = BTreeMap::new();

    let listing = git_base.read_dir().map_err(|err| ManifestError::Scan {
        source: err,
        path: git_base.to_path_buf(),
    })?;

    for entry in listing {
        let entry = entry.map_err(|err| ManifestError::Scan {
            source: err,
            path: git_base.to_path_buf(),
        })?;

        let path = entry.path();
        if !path.is_dir() || !path.join(DESCRIPTOR_FILE).is_file() {
            debug!("not a package checkout: {}", path.display());
            continue;
        }

        packages.insert(entry.file_name().to_string_lossy().into_owned(), path);
    }

    Ok(packages)
}

/// Package descriptor error types.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// Descriptor file cannot be read.
    #[error("failed to read package descriptor at {:?}", path.display())]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Descriptor file is not valid descriptor XML.
    #[error(transparent)]
    Deserialize(#[from] DeError),

    /// Checkout base directory cannot be scanned for packages.
    #[error("failed to scan checkout base at {:?}", path.display())]
    Scan {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
}

/// Friendly result alias :3
pub type Result<T, E = ManifestError> = std::result::Result<T, E>;

#[derive(Debug, Deserialize)]
struct RawPackage {
    name: String,

    contents: RawContents,

    #[serde(rename = "phprelease", default)]
    releases: Vec<RawRelease>,
}

#[derive(Debug, Deserialize)]
struct RawContents {
    dir: RawDir,
}

#[derive(Debug, Deserialize)]
struct RawDir {
    #[serde(rename = "@name")]
    name: String,

    #[serde(rename = "@baseinstalldir")]
    base_install_dir: Option<String>,

    #[serde(rename = "dir", default)]
    dirs: Vec<RawDir>,

    #[serde(rename = "file", default)]
    files: Vec<RawFile>,
}

#[derive(Debug, Deserialize)]
struct RawFile {
    #[serde(rename = "@name")]
    name: Option<String>,

    #[serde(rename = "@role")]
    role: Option<String>,

    #[serde(rename = "@baseinstalldir")]
    base_install_dir: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawRelease {
    filelist: Option<RawFilelist>,
}

#[derive(Debug, Deserialize)]
struct RawFilelist {
    #[serde(rename = "install", default)]
    installs: Vec<RawInstall>,
}

#[derive(Debug, Deserialize)]
struct RawInstall {
    #[serde(rename = "@name")]
    name: String,

    #[serde(rename = "@as")]
    as_name: String,
}
