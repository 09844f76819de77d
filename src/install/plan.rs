// SPDX-FileCopyrightText: 2025 The hordelink authors
// SPDX-License-Identifier: MIT

//! Destination resolution for manifest entries.
//!
//! Maps one [`InstallEntry`] to either a concrete [`InstallPlan`] or a
//! [`SkipReason`]. Resolution is a pure decision except for the source
//! existence check, which canonicalizes the source path on disk.
//!
//! # Resolution Rules
//!
//! With `lib_dir = web_dir/libs`:
//!
//! - Role `horde` requires an install-as override, and installs it
//!   directly under the web directory. Without the override the entry is
//!   reported and skipped.
//! - Role `php` installs under `lib_dir`, preferring the install-as
//!   override, then `base_install_dir/name`, then plain `name`.
//! - Every other role yields no destination and is skipped silently.
//!
//! Descriptor path hints often carry a leading `/` (e.g.
//! `baseinstalldir="/Horde"`). They are always joined as components
//! relative to the destination tree, never as absolute paths.

use crate::manifest::{InstallEntry, Role};

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
};

/// Name of the library sub-tree under the web directory.
pub const LIB_SUBDIR: &str = "libs";

/// Filesystem action applied uniformly to every entry of a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Byte-copy the source file to the destination.
    Copy,

    /// Create a symbolic link at the destination pointing to the source.
    #[default]
    Symlink,
}

impl Display for Action {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Copy => fmt.write_str("COPY"),
            Self::Symlink => fmt.write_str("SYMLINK"),
        }
    }
}

/// Resolved outcome for one installable entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallPlan {
    /// Canonicalized absolute path of the existing source file.
    pub source: PathBuf,

    /// Absolute destination path to create.
    pub dest: PathBuf,

    /// Action to perform at the destination.
    pub action: Action,
}

/// Outcome of resolving one manifest entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Entry resolved to a concrete plan.
    Install(InstallPlan),

    /// Entry yields no plan.
    Skip(SkipReason),
}

/// Why an entry yields no plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Entry carries no name attribute.
    MissingName,

    /// Source file does not exist inside the checkout.
    MissingSource { path: PathBuf },

    /// Role `horde` entry without an install-as override.
    MissingInstallAs { name: String },

    /// Role produces no destination.
    UnhandledRole { role: Role },
}

impl SkipReason {
    /// Whether this skip passes without an error diagnostic.
    ///
    /// Unhandled roles are expected in every descriptor (documentation,
    /// tests, data files); everything else is a defect in the entry.
    pub fn is_silent(&self) -> bool {
        matches!(self, Self::UnhandledRole { .. })
    }
}

impl Display for SkipReason {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::MissingName => fmt.write_str("invalid install entry without a name"),
            Self::MissingSource { path } => write!(
                fmt,
                "install file does not seem to exist: {}",
                path.display()
            ),
            Self::MissingInstallAs { name } => write!(
                fmt,
                "could not determine install directory (role \"horde\") for {name}"
            ),
            Self::UnhandledRole { role } => write!(fmt, "unhandled role \"{role}\""),
        }
    }
}

/// Resolve one manifest entry against a checkout and web directory.
///
/// Source resolution happens before role dispatch: an entry whose source
/// file is missing is skipped no matter what its role says.
pub fn resolve(
    entry: &InstallEntry,
    checkout: impl AsRef<Path>,
    web_dir: impl AsRef<Path>,
    action: Action,
) -> Resolution {
    let web_dir = web_dir.as_ref();

    let Some(name) = &entry.name else {
        return Resolution::Skip(SkipReason::MissingName);
    };

    let source = checkout.as_ref().join(name);
    let source = match source.canonicalize() {
        Ok(path) if path.is_file() => path,
        _ => return Resolution::Skip(SkipReason::MissingSource { path: source }),
    };

    let lib_dir = web_dir.join(LIB_SUBDIR);
    let dest = match &entry.role {
        Role::Horde => match &entry.install_as {
            Some(install_as) => join_relative(web_dir, install_as),
            None => {
                return Resolution::Skip(SkipReason::MissingInstallAs { name: name.clone() });
            }
        },
        Role::Php => match (&entry.install_as, &entry.base_install_dir) {
            (Some(install_as), _) => join_relative(&lib_dir, install_as),
            (None, Some(base)) => join_relative(&join_relative(&lib_dir, base), name),
            (None, None) => join_relative(&lib_dir, name),
        },
        Role::Other(_) => {
            return Resolution::Skip(SkipReason::UnhandledRole {
                role: entry.role.clone(),
            });
        }
    };

    Resolution::Install(InstallPlan {
        source,
        dest,
        action,
    })
}

/// Join a descriptor path hint as a relative component.
///
/// `Path::join` replaces the base when handed an absolute path, which
/// would let a hint like `/Horde` escape the destination tree.
fn join_relative(base: &Path, hint: &str) -> PathBuf {
    match hint.trim_start_matches('/') {
        "" => base.to_path_buf(),
        hint => base.join(hint),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sealed_test::prelude::*;
    use simple_test_case::test_case;
    use std::fs::{create_dir_all, write};

    fn entry(
        name: Option<&str>,
        role: Role,
        install_as: Option<&str>,
        base_install_dir: Option<&str>,
    ) -> InstallEntry {
        InstallEntry {
            name: name.map(Into::into),
            role,
            install_as: install_as.map(Into::into),
            base_install_dir: base_install_dir.map(Into::into),
        }
    }

    fn stage(name: &str) -> anyhow::Result<()> {
        let path = Path::new("checkout").join(name);
        if let Some(parent) = path.parent() {
            create_dir_all(parent)?;
        }
        write(path, "<?php\n")?;
        Ok(())
    }

    #[test_case(
        entry(Some("Cli.php"), Role::Php, None, None),
        "web/libs/Cli.php";
        "php entry installs under libs by name"
    )]
    #[test_case(
        entry(Some("Cli.php"), Role::Php, None, Some("/Horde")),
        "web/libs/Horde/Cli.php";
        "php entry honors base install dir"
    )]
    #[test_case(
        entry(Some("Cli.php"), Role::Php, Some("Horde/Cli.php"), Some("/Ignored")),
        "web/libs/Horde/Cli.php";
        "php install as wins over base install dir"
    )]
    #[test_case(
        entry(Some("templates/foo.html"), Role::Horde, Some("foo.html"), None),
        "web/foo.html";
        "horde entry installs under web dir by install as"
    )]
    #[sealed_test]
    fn resolve_computes_destination(entry: InstallEntry, dest: &str) -> anyhow::Result<()> {
        use pretty_assertions::assert_eq;

        stage(entry.name.as_ref().unwrap())?;

        let result = resolve(&entry, "checkout", "web", Action::Symlink);

        let source = Path::new("checkout")
            .join(entry.name.as_ref().unwrap())
            .canonicalize()?;
        let expect = Resolution::Install(InstallPlan {
            source,
            dest: dest.into(),
            action: Action::Symlink,
        });
        assert_eq!(result, expect);

        Ok(())
    }

    #[sealed_test]
    fn resolve_reports_horde_entry_without_install_as() -> anyhow::Result<()> {
        stage("x.php")?;

        let entry = entry(Some("x.php"), Role::Horde, None, None);
        let result = resolve(&entry, "checkout", "web", Action::Symlink);

        let expect = Resolution::Skip(SkipReason::MissingInstallAs {
            name: "x.php".into(),
        });
        assert_eq!(result, expect);
        assert!(!SkipReason::MissingInstallAs {
            name: "x.php".into()
        }
        .is_silent());

        Ok(())
    }

    #[sealed_test]
    fn resolve_skips_unhandled_role_silently() -> anyhow::Result<()> {
        stage("doc/changelog.yml")?;

        let entry = entry(
            Some("doc/changelog.yml"),
            Role::Other("doc".into()),
            None,
            None,
        );
        let result = resolve(&entry, "checkout", "web", Action::Symlink);

        let expect = Resolution::Skip(SkipReason::UnhandledRole {
            role: Role::Other("doc".into()),
        });
        assert_eq!(result, expect);
        assert!(SkipReason::UnhandledRole {
            role: Role::Other("doc".into())
        }
        .is_silent());

        Ok(())
    }

    #[sealed_test]
    fn resolve_reports_missing_source() {
        let entry = entry(Some("gone.php"), Role::Php, None, None);
        let result = resolve(&entry, "checkout", "web", Action::Symlink);

        let expect = Resolution::Skip(SkipReason::MissingSource {
            path: Path::new("checkout").join("gone.php"),
        });
        assert_eq!(result, expect);
    }

    #[test]
    fn resolve_reports_missing_name() {
        let entry = entry(None, Role::Php, None, None);
        let result = resolve(&entry, "checkout", "web", Action::Copy);
        assert_eq!(result, Resolution::Skip(SkipReason::MissingName));
    }

    #[sealed_test]
    fn resolve_missing_source_wins_over_role_dispatch() -> anyhow::Result<()> {
        create_dir_all("checkout")?;

        // Role "horde" without install-as would also be a skip, but the
        // source check comes first.
        let entry = entry(Some("gone.php"), Role::Horde, None, None);
        let result = resolve(&entry, "checkout", "web", Action::Symlink);

        assert!(matches!(
            result,
            Resolution::Skip(SkipReason::MissingSource { .. })
        ));

        Ok(())
    }

    #[test]
    fn action_displays_like_diagnostics_expect() {
        assert_eq!(Action::Copy.to_string(), "COPY");
        assert_eq!(Action::Symlink.to_string(), "SYMLINK");
    }
}
