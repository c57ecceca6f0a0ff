// Copyright (C) 2025 Paul Hampson
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License version 3 as  published by the
// Free Software Foundation.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE.  See the GNU General Public License for more
// details.
//
// You should have received a copy of the GNU General Public License along with
// this program.  If not, see <https://www.gnu.org/licenses/>.

//! Monitor configuration, loaded once at startup from a TOML file such as:
//!
//! ```toml
//! name = "B451"
//! scale_device = "/dev/ttyUSB0"
//! full_lbs = 4.2
//! empty_lbs = 1.6
//! pct_err = 5
//! ```

use crate::pot_monitor::{LevelsError, PotLevels};
use crate::weight::SessionSettings;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;
const DEFAULT_READ_TIMEOUT_MS: u64 = 250;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl From<LevelsError> for ConfigError {
    fn from(err: LevelsError) -> Self {
        ConfigError::Invalid(err.to_string())
    }
}

/// How to reach the scale. Line settings are fixed by the protocol and live
/// with the serial interface.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleConfig {
    pub device: PathBuf,
    /// Longest wait for any single byte of a reply.
    pub read_timeout: Duration,
    pub session: SessionSettings,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            device: PathBuf::from("/dev/ttyUSB0"),
            read_timeout: Duration::from_millis(DEFAULT_READ_TIMEOUT_MS),
            session: SessionSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PotConfig {
    pub name: String,
    pub levels: PotLevels,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub pot: PotConfig,
    pub scale: ScaleConfig,
    pub poll_interval: Duration,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    name: String,
    scale_device: PathBuf,
    full_lbs: f64,
    empty_lbs: f64,
    pct_err: u32,
    poll_interval_ms: Option<u64>,
    read_timeout_ms: Option<u64>,
    motion_retry_limit: Option<u32>,
    motion_retry_interval_ms: Option<u64>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = text.parse::<Config>()?;
        log::debug!("Loaded configuration from {}: {:?}", path.display(), config);
        Ok(config)
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let file: ConfigFile = toml::from_str(text)?;

        if file.name.trim().is_empty() {
            return Err(ConfigError::Invalid("name is empty".into()));
        }
        if file.scale_device.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("scale_device is empty".into()));
        }
        let levels = PotLevels::new(file.full_lbs, file.empty_lbs, file.pct_err)?;

        let read_timeout =
            Duration::from_millis(file.read_timeout_ms.unwrap_or(DEFAULT_READ_TIMEOUT_MS));
        if read_timeout.is_zero() {
            return Err(ConfigError::Invalid("read_timeout_ms must be positive".into()));
        }

        let defaults = SessionSettings::default();
        let session = SessionSettings {
            motion_retry_limit: file.motion_retry_limit.unwrap_or(defaults.motion_retry_limit),
            motion_retry_interval: file
                .motion_retry_interval_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.motion_retry_interval),
        };

        Ok(Config {
            pot: PotConfig {
                name: file.name,
                levels,
            },
            scale: ScaleConfig {
                device: file.scale_device,
                read_timeout,
                session,
            },
            poll_interval: Duration::from_millis(
                file.poll_interval_ms.unwrap_or(DEFAULT_POLL_INTERVAL_MS),
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MINIMAL: &str = r#"
        name = "B451"
        scale_device = "/dev/ttyUSB0"
        full_lbs = 4.2
        empty_lbs = 1.6
        pct_err = 5
    "#;

    #[test]
    fn minimal_file_uses_defaults() {
        let config: Config = MINIMAL.parse().unwrap();
        assert_eq!(config.pot.name, "B451");
        assert_eq!(config.pot.levels.full_lbs(), 4.2);
        assert_eq!(config.pot.levels.empty_lbs(), 1.6);
        assert_eq!(config.pot.levels.pct_err(), 5);
        assert_eq!(config.scale.device, PathBuf::from("/dev/ttyUSB0"));
        assert_eq!(config.scale.read_timeout, Duration::from_millis(250));
        assert_eq!(config.scale.session, SessionSettings::default());
        assert_eq!(config.poll_interval, Duration::from_secs(1));
    }

    #[test]
    fn optional_settings_are_honoured() {
        let text = format!(
            "{MINIMAL}\npoll_interval_ms = 500\nread_timeout_ms = 100\n\
             motion_retry_limit = 2\nmotion_retry_interval_ms = 0\n"
        );
        let config: Config = text.parse().unwrap();
        assert_eq!(config.poll_interval, Duration::from_millis(500));
        assert_eq!(config.scale.read_timeout, Duration::from_millis(100));
        assert_eq!(config.scale.session.motion_retry_limit, 2);
        assert_eq!(config.scale.session.motion_retry_interval, Duration::ZERO);
    }

    #[test]
    fn missing_field_is_rejected() {
        let text = MINIMAL.replace("pct_err = 5", "");
        assert!(matches!(text.parse::<Config>(), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn unknown_field_is_rejected() {
        let text = format!("{MINIMAL}\nslack_channel = \"#flux\"\n");
        assert!(matches!(text.parse::<Config>(), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn negative_tolerance_is_rejected() {
        let text = MINIMAL.replace("pct_err = 5", "pct_err = -5");
        assert!(matches!(text.parse::<Config>(), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn full_must_exceed_empty() {
        let text = MINIMAL.replace("full_lbs = 4.2", "full_lbs = 1.6");
        assert!(matches!(text.parse::<Config>(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn empty_name_is_rejected() {
        let text = MINIMAL.replace("\"B451\"", "\" \"");
        assert!(matches!(text.parse::<Config>(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn zero_read_timeout_is_rejected() {
        let text = format!("{MINIMAL}\nread_timeout_ms = 0\n");
        assert!(matches!(text.parse::<Config>(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MINIMAL.as_bytes()).unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.pot.name, "B451");
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pot.toml");
        match Config::load(&path) {
            Err(ConfigError::Io { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("unexpected {:?}", other),
        }
    }
}
