// SPDX-FileCopyrightText: 2025 The hordelink authors
// SPDX-License-Identifier: MIT

//! Configuration layout.
//!
//! Specify the layout of the configuration file hordelink reads run
//! defaults from, plus the immutable per-run configuration assembled out
//! of it and the command line. The configuration file only provides
//! defaults; command-line flags always win.

use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Error as FmtError, Formatter, Result as FmtResult},
    fs::read_to_string,
    path::{Path, PathBuf},
    str::FromStr,
};

/// Configuration file layout.
///
/// Everything lives under one `[install]` table so further tables can be
/// added without breaking existing files.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct Settings {
    /// Defaults for the install run.
    pub install: InstallSettings,
}

impl Settings {
    /// Load settings from a configuration file.
    ///
    /// # Errors
    ///
    /// - Return [`ConfigError::Read`] if the file cannot be read.
    /// - Return [`ConfigError::Deserialize`] if the file is not valid
    ///   TOML in the expected layout.
    /// - Return [`ConfigError::ShellExpansion`] if a path value fails to
    ///   expand.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        read_to_string(path.as_ref())
            .map_err(|err| ConfigError::Read {
                source: err,
                path: path.as_ref().to_path_buf(),
            })?
            .parse()
    }
}

impl FromStr for Settings {
    type Err = ConfigError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let mut settings: Settings = toml::de::from_str(data).map_err(ConfigError::Deserialize)?;

        // INVARIANT: Perform shell expansion on path fields.
        settings.install.git_base = settings.install.git_base.map(expand_path).transpose()?;
        settings.install.web_dir = settings.install.web_dir.map(expand_path).transpose()?;

        Ok(settings)
    }
}

impl Display for Settings {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(
            toml::ser::to_string_pretty(self)
                .map_err(ConfigError::Serialize)?
                .as_str(),
        )
    }
}

/// Install run defaults.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct InstallSettings {
    /// Base directory containing all git checkouts.
    pub git_base: Option<PathBuf>,

    /// Web-accessible directory to install into.
    pub web_dir: Option<PathBuf>,

    /// Copy files instead of creating symbolic links.
    #[serde(default)]
    pub copy: bool,
}

/// Immutable configuration of one install run.
///
/// Assembled once out of command line and configuration file, then passed
/// into [`Linker`](crate::install::Linker). Verbosity and color are not
/// part of it, those only shape the diagnostic subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Base directory containing all git checkouts.
    pub git_base: PathBuf,

    /// Web-accessible directory to install into.
    pub web_dir: PathBuf,

    /// Copy files instead of creating symbolic links.
    pub copy: bool,

    /// Report planned actions without performing them.
    pub dry_run: bool,
}

fn expand_path(path: PathBuf) -> Result<PathBuf> {
    Ok(PathBuf::from(
        shellexpand::full(path.to_string_lossy().as_ref())
            .map_err(ConfigError::ShellExpansion)?
            .into_owned(),
    ))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file cannot be read.
    #[error("failed to read configuration file at {:?}", path.display())]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Failed to deserialize configuration.
    #[error(transparent)]
    Deserialize(#[from] toml::de::Error),

    /// Failed to serialize configuration.
    #[error(transparent)]
    Serialize(#[from] toml::ser::Error),

    /// Failed to perform shell expansion on configuration.
    #[error(transparent)]
    ShellExpansion(#[from] shellexpand::LookupError<std::env::VarError>),
}

impl From<ConfigError> for FmtError {
    fn from(_: ConfigError) -> Self {
        FmtError
    }
}

/// Friendly result alias :3
pub type Result<T, E = ConfigError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use sealed_test::prelude::*;

    #[sealed_test(env = [("HORDE_GIT", "/home/blah/src/horde")])]
    fn deserialize_settings() -> anyhow::Result<()> {
        let result: Settings = r#"
            [install]
            git_base = "$HORDE_GIT"
            web_dir = "/var/www/horde"
            copy = true
        "#
        .parse()?;

        let expect = Settings {
            install: InstallSettings {
                git_base: Some("/home/blah/src/horde".into()),
                web_dir: Some("/var/www/horde".into()),
                copy: true,
            },
        };

        assert_eq!(result, expect);

        Ok(())
    }

    #[test]
    fn deserialize_settings_defaults() -> anyhow::Result<()> {
        let result: Settings = "[install]\n".parse()?;

        let expect = Settings {
            install: InstallSettings {
                git_base: None,
                web_dir: None,
                copy: false,
            },
        };

        assert_eq!(result, expect);

        Ok(())
    }

    #[test]
    fn serialize_settings() {
        let result = Settings {
            install: InstallSettings {
                git_base: Some("/home/blah/src/horde".into()),
                web_dir: Some("/var/www/horde".into()),
                copy: false,
            },
        }
        .to_string();

        let expect = indoc! {r#"
            [install]
            git_base = "/home/blah/src/horde"
            web_dir = "/var/www/horde"
            copy = false
        "#};

        assert_eq!(result, expect);
    }

    #[sealed_test]
    fn load_settings_fails_on_missing_file() {
        let result = Settings::load("no/such/config.toml");
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
