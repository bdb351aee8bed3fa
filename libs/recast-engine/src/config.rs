use serde::Deserialize;

use crate::error::EngineError;
use crate::text::TextOptions;

/// Root configuration, parsed from TOML.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecastConfig {
    /// Delimited text conversion.
    #[serde(default)]
    pub text: TextOptions,
}

impl RecastConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self, EngineError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| EngineError::Config(format!("{path}: {e}")))?;
        Self::parse(&content).map_err(|e| e.with_context(path))
    }

    /// Parse configuration from a TOML string.
    pub fn parse(toml_str: &str) -> Result<Self, EngineError> {
        toml::from_str(toml_str).map_err(|e| EngineError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let cfg = RecastConfig::parse("").unwrap();
        assert_eq!(cfg.text, TextOptions::default());
    }

    #[test]
    fn text_section() {
        let cfg = RecastConfig::parse(
            r#"
            [text]
            delimiter = ","
            structured_segments = true
            "#,
        )
        .unwrap();
        assert_eq!(cfg.text.delimiter, ',');
        assert!(cfg.text.structured_segments);
    }

    #[test]
    fn bad_delimiter_is_config_error() {
        let err = RecastConfig::parse("[text]\ndelimiter = \"ab\"").unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = RecastConfig::load("/no/such/recast.toml").unwrap_err();
        assert!(err.to_string().contains("/no/such/recast.toml"));
    }
}
