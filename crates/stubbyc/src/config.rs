//! `stubby.toml`: project-wide naming and layout settings.
//!
//! ```toml
//! [mock]
//! companion_suffix = "Spy"
//! handle_name = "spy"
//!
//! [mock.recorders]
//! async = "SuspendingRecorder"
//!
//! [format]
//! indent_size = 2
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use stubby_fmt::FormatConfig;
use stubby_gen::MockConfig;
use thiserror::Error;

pub const CONFIG_FILE: &str = "stubby.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StubbyConfig {
    pub mock: MockConfig,
    pub format: FormatConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl StubbyConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// The nearest `stubby.toml` in the directory of `input` or above it.
    pub fn discover(input: &Path) -> Option<PathBuf> {
        let start = input.parent()?;
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILE))
            .find(|candidate| candidate.is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_default() {
        assert_eq!(StubbyConfig::parse("").unwrap(), StubbyConfig::default());
    }

    #[test]
    fn sections_override_defaults() {
        let config = StubbyConfig::parse(
            r#"
[mock]
companion_suffix = "Spy"

[mock.recorders]
failable = "ThrowingRecorder"

[format]
indent_size = 2
"#,
        )
        .unwrap();
        assert_eq!(config.mock.companion_name("Api"), "ApiSpy");
        assert_eq!(config.mock.recorders.failable, "ThrowingRecorder");
        assert_eq!(config.mock.recorders.plain, "Recorder");
        assert_eq!(config.format.indent_size, 2);
        assert_eq!(config.format.max_width, 100);
    }

    #[test]
    fn unknown_section_is_an_error() {
        assert!(StubbyConfig::parse("[package]\nname = \"x\"").is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = StubbyConfig::from_file(Path::new("/nonexistent/stubby.toml")).unwrap_err();
        assert!(err.to_string().starts_with("failed to read /nonexistent/stubby.toml"));
    }
}
