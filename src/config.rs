//! Configuration for schema generation
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (schema-gen.toml)
//! - Environment variables (SCHEMA_GEN__*)
//!
//! ## Example config file (schema-gen.toml):
//! ```toml
//! [docs]
//! path = "Unturned_Data/Managed/Assembly-CSharp.xml"
//!
//! [output]
//! format = "pretty"
//! path = "config-schema.json"
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Documentation export settings
    #[serde(default)]
    pub docs: DocsConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Documentation export configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocsConfig {
    /// Path to the XML documentation export; descriptions are omitted without one
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output format (pretty or compact)
    #[serde(default = "default_output_format")]
    pub format: OutputFormat,

    /// Where exported schemas are written
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
}

/// Output format for JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Compact,
}

fn default_output_format() -> OutputFormat {
    OutputFormat::Pretty
}

fn default_output_path() -> PathBuf {
    PathBuf::from("config-schema.json")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_output_format(),
            path: default_output_path(),
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from a specific file
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = [
            "schema-gen.toml",
            ".schema-gen.toml",
            "config/schema-gen.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(config_dir) = directories::ProjectDirs::from("dev", "familiar", "schema-gen") {
            let xdg_config = config_dir.config_dir().join("schema-gen.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // SCHEMA_GEN__DOCS__PATH, SCHEMA_GEN__OUTPUT__FORMAT, ...
        builder = builder.add_source(
            Environment::with_prefix("SCHEMA_GEN")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Output path, resolved against the current directory when relative
    pub fn output_path(&self) -> PathBuf {
        if self.output.path.is_absolute() {
            self.output.path.clone()
        } else {
            std::env::current_dir()
                .unwrap_or_default()
                .join(&self.output.path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GeneratorConfig::default();
        assert!(config.docs.path.is_none());
        assert_eq!(config.output.format, OutputFormat::Pretty);
        assert_eq!(config.output.path, PathBuf::from("config-schema.json"));
    }

    #[test]
    fn test_serialize_config() {
        let config = GeneratorConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[output]"));
        assert!(toml_str.contains("format = \"pretty\""));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            "[docs]\npath = \"Assembly-CSharp.xml\"\n\n[output]\nformat = \"compact\"\n",
        )
        .unwrap();

        let config = GeneratorConfig::load_from(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.docs.path, Some(PathBuf::from("Assembly-CSharp.xml")));
        assert_eq!(config.output.format, OutputFormat::Compact);
        assert_eq!(config.output.path, PathBuf::from("config-schema.json"));
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved.toml");
        let mut config = GeneratorConfig::default();
        config.docs.path = Some(PathBuf::from("docs.xml"));
        config.save(path.to_str().unwrap()).unwrap();

        let loaded = GeneratorConfig::load_from(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(loaded.docs.path, Some(PathBuf::from("docs.xml")));
    }
}
