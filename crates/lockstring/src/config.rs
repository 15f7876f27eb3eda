//! # Demo Configuration
//!
//! Loaded once at startup from TOML. Every key has a default, so an empty
//! file is a valid config:
//!
//! ```toml
//! iterations = 200
//! writers = 2
//! readers = 2
//! pause_micros = 50
//! seed = 42
//! words = ["hello", "world"]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DemoError, DemoResult};

/// Parameters of one demo run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemoConfig {
    /// Assignments performed by each writer.
    pub iterations: u32,
    /// Number of writer threads.
    pub writers: usize,
    /// Number of reader threads.
    pub readers: usize,
    /// Pause after each write, in microseconds. Zero means no pause.
    pub pause_micros: u64,
    /// Base seed; writer `i` uses `seed + i`.
    pub seed: u64,
    /// Values the writers choose from. Readers count hits on the first one.
    pub words: Vec<String>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            iterations: 200,
            writers: 2,
            readers: 2,
            pause_micros: 50,
            seed: 42,
            words: vec!["hello".to_owned(), "world".to_owned()],
        }
    }
}

impl DemoConfig {
    /// Parses and validates a config from TOML text.
    ///
    /// # Errors
    ///
    /// `ConfigParse` on malformed TOML or unknown keys, `InvalidConfig` if
    /// validation fails.
    pub fn from_toml_str(text: &str) -> DemoResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a config file.
    ///
    /// # Errors
    ///
    /// `ConfigIo` if the file cannot be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn load(path: impl AsRef<Path>) -> DemoResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| DemoError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Checks that the config can drive a run.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` naming the first bad value.
    pub fn validate(&self) -> DemoResult<()> {
        if self.writers == 0 {
            return Err(DemoError::InvalidConfig("writers must be at least 1".into()));
        }
        if self.readers == 0 {
            return Err(DemoError::InvalidConfig("readers must be at least 1".into()));
        }
        if self.words.is_empty() {
            return Err(DemoError::InvalidConfig("words must not be empty".into()));
        }
        if let Some(word) = self.words.iter().find(|w| w.contains('\0')) {
            return Err(DemoError::InvalidConfig(format!(
                "word {word:?} contains a nul byte"
            )));
        }
        Ok(())
    }

    /// The word readers compare against.
    #[must_use]
    pub fn target(&self) -> &str {
        self.words.first().map_or("", String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = DemoConfig::from_toml_str("").unwrap();
        assert_eq!(config, DemoConfig::default());
        assert_eq!(config.target(), "hello");
    }

    #[test]
    fn test_partial_file() {
        let config = DemoConfig::from_toml_str("writers = 5\nwords = [\"a\", \"b\", \"c\"]").unwrap();
        assert_eq!(config.writers, 5);
        assert_eq!(config.readers, 2);
        assert_eq!(config.words.len(), 3);
        assert_eq!(config.target(), "a");
    }

    #[test]
    fn test_rejects_bad_values() {
        for text in ["writers = 0", "readers = 0", "words = []"] {
            let err = DemoConfig::from_toml_str(text).unwrap_err();
            assert!(matches!(err, DemoError::InvalidConfig(_)), "{text}: {err}");
        }

        let config = DemoConfig {
            words: vec!["ok".into(), "bad\0".into()],
            ..DemoConfig::default()
        };
        assert!(matches!(config.validate(), Err(DemoError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        assert!(matches!(
            DemoConfig::from_toml_str("writers = \"two\""),
            Err(DemoError::ConfigParse(_))
        ));
        assert!(matches!(
            DemoConfig::from_toml_str("unknown_key = 1"),
            Err(DemoError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = DemoConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, DemoError::ConfigIo { .. }));
    }

    #[test]
    fn test_load_bundled_config() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/demo.toml");
        let config = DemoConfig::load(path).unwrap();
        assert_eq!(config.seed, 42);
    }

    #[test]
    fn test_serializes_back() {
        let config = DemoConfig::default();
        let text = toml::to_string(&config).unwrap();
        assert_eq!(DemoConfig::from_toml_str(&text).unwrap(), config);
    }
}
