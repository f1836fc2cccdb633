//! Tunable parameters of a reconstruction pass.
//!
//! The window sizes were tuned against one document layout. They are kept
//! configurable so other layouts can be accommodated from a TOML file
//! without code changes.

use std::path::Path;

use serde::Deserialize;

use crate::ConfigError;

/// Name produced by a font-mapping failure in the source PDFs: the
/// column-header text of the document, reversed and garbled.
pub const CORRUPTED_NAME: &str = "LACIOSN ÓZRA NÓCIAZITCO DE ANTCUE OGDICÓ";

/// Parameters for [`crate::parse_rows`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParserConfig {
    /// How many rows before an orphan episode line are searched for the
    /// identity row it belongs to.
    pub lookback_rows: usize,
    /// Maximum raw-row distance between an open worker's last activity and
    /// an episode line that still associates with it.
    pub lookahead_rows: usize,
    /// How many emitted records stay amendable for retroactive association.
    pub trailing_buffer: usize,
    /// Cell texts that mean "no value" (extraction backends emit these for
    /// empty cells).
    pub missing_sentinels: Vec<String>,
    /// Names that identify corrupted records. Matched exactly.
    pub corrupted_names: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            lookback_rows: 3,
            lookahead_rows: 4,
            trailing_buffer: 5,
            missing_sentinels: vec!["nan".to_owned(), "NaN".to_owned(), "None".to_owned()],
            corrupted_names: vec![CORRUPTED_NAME.to_owned()],
        }
    }
}

impl ParserConfig {
    /// Parses a config from TOML. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] if the document is not valid TOML or a
    /// key has the wrong type.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Reads and parses a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Toml`] if it cannot be parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        log::debug!("Loaded parser config from {}", path.display());
        Ok(config)
    }

    /// Whether `cell` is one of the configured missing-value sentinels.
    #[must_use]
    pub fn is_missing(&self, cell: &str) -> bool {
        self.missing_sentinels.iter().any(|s| s == cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_keeps_defaults() {
        let config = ParserConfig::from_toml_str("").unwrap();
        assert_eq!(config, ParserConfig::default());
    }

    #[test]
    fn toml_overrides_windows() {
        let config =
            ParserConfig::from_toml_str("lookbackRows = 2\nlookaheadRows = 6\n").unwrap();
        assert_eq!(config.lookback_rows, 2);
        assert_eq!(config.lookahead_rows, 6);
        assert_eq!(config.trailing_buffer, 5);
        assert_eq!(config.corrupted_names, vec![CORRUPTED_NAME.to_owned()]);
    }

    #[test]
    fn rejects_wrong_types() {
        assert!(matches!(
            ParserConfig::from_toml_str("lookbackRows = \"three\""),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            ParserConfig::load("/nonexistent/vida_laboral.toml"),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn recognizes_missing_sentinels() {
        let config = ParserConfig::default();
        assert!(config.is_missing("nan"));
        assert!(!config.is_missing("NANA"));
    }
}
