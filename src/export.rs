//! Schema Export
//!
//! Caller-side persistence of generated schemas. Generation itself never
//! touches the file system; this module writes the text it returns.

use std::fs;
use std::path::{Path, PathBuf};

use crate::checksum::Checksum;
use crate::config::OutputConfig;
use crate::error::Result;
use crate::generator::SchemaGenerator;
use crate::reflect::Describe;

/// Result of writing a schema file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    pub path: PathBuf,
    pub checksum: Checksum,
    /// False when the file already held identical content
    pub changed: bool,
}

/// Write schema text to `path`, creating parent directories.
///
/// The file is left untouched when it already has the same content.
pub fn write_schema(path: impl AsRef<Path>, schema: &str) -> Result<ExportOutcome> {
    let path = path.as_ref();
    let checksum = Checksum::of_text(schema);

    if Checksum::of_file(path).as_ref() == Some(&checksum) {
        tracing::debug!(path = %path.display(), "Schema unchanged");
        return Ok(ExportOutcome {
            path: path.to_path_buf(),
            checksum,
            changed: false,
        });
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, schema)?;
    tracing::info!(path = %path.display(), checksum = %checksum, "Wrote schema");

    Ok(ExportOutcome {
        path: path.to_path_buf(),
        checksum,
        changed: true,
    })
}

/// Generate the schema for `T` and write it as configured
pub fn export_schema<T: Describe>(
    generator: &SchemaGenerator,
    instance: Option<&T>,
    output: &OutputConfig,
) -> Result<ExportOutcome> {
    let schema = generator.generate_value(instance);
    let text = SchemaGenerator::render(&schema, output.format);
    write_schema(&output.path, &text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;

    #[derive(Default)]
    struct Settings {
        enabled: bool,
    }

    crate::describe_struct!(Settings as "Host.Settings" with Settings::default {
        field enabled: bool,
    });

    #[test]
    fn test_write_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/config-schema.json");

        let outcome = write_schema(&path, "{}").unwrap();
        assert!(outcome.changed);
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn test_unchanged_content_is_not_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config-schema.json");

        let first = write_schema(&path, "{\"a\": 1}").unwrap();
        let second = write_schema(&path, "{\"a\": 1}").unwrap();
        assert!(first.changed);
        assert!(!second.changed);
        assert_eq!(first.checksum, second.checksum);

        let third = write_schema(&path, "{\"a\": 2}").unwrap();
        assert!(third.changed);
    }

    #[test]
    fn test_export_uses_configured_format() {
        let dir = tempfile::tempdir().unwrap();
        let output = OutputConfig {
            format: OutputFormat::Compact,
            path: dir.path().join("settings.json"),
        };

        let outcome =
            export_schema::<Settings>(&SchemaGenerator::without_docs(), None, &output).unwrap();
        let written = fs::read_to_string(&outcome.path).unwrap();
        assert!(!written.contains('\n'));

        let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed["properties"]["enabled"]["default"], serde_json::json!(false));
    }
}
