//! Configuration loading and parsing

use anyhow::{Context, Result};
use meta_fuzzer::{CodecFactory, FuzzerConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main application configuration (loaded from config.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub fuzzer: FuzzerConfig,
    #[serde(default)]
    pub codecs: CodecFactory,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    /// Number of ObjectMeta records to generate and check
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    /// Inspect the plain merge instead of the safe combination
    #[serde(default)]
    pub unsafe_funcs: bool,
}

fn default_iterations() -> usize {
    100
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            iterations: default_iterations(),
            unsafe_funcs: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    config
        .fuzzer
        .validate()
        .with_context(|| format!("Invalid [fuzzer] section in {:?}", path))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_deserialization() {
        let toml_content = r#"
            [fuzzer]
            seed = 42
            nil_chance = 0.5

            [codecs]
            scheme = "test"

            [output]
            format = "json"
            iterations = 3
        "#;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.fuzzer.seed, Some(42));
        assert_eq!(config.fuzzer.max_elements, 10);
        assert_eq!(config.codecs.scheme, "test");
        assert!(config.codecs.supports("application/json"));
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.output.iterations, 3);
        assert!(!config.output.unsafe_funcs);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.fuzzer, FuzzerConfig::default());
        assert_eq!(config.output.iterations, 100);
    }

    #[test]
    fn test_load_config_rejects_invalid_fuzzer() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[fuzzer]\nmin_elements = 5\nmax_elements = 1").unwrap();
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[output]\nformat = \"text\"\niterations = 7").unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.output.iterations, 7);
    }
}
