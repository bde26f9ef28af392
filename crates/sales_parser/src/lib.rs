//! Parser for rule sets and pipeline configuration (YAML/TOML formats).
//!
//! Rule sets describe the ordered per-column checks of a validity pass; the
//! pipeline configuration names the source, destination and retry policy of a
//! cleaning run. Both are plain serde documents.
//!
//! # Example
//!
//! ```rust
//! use sales_parser::parse_rules_yaml;
//!
//! let yaml = r#"
//! name: listings
//! columns:
//!   - name: BOROUGH
//!     type: integer
//!     constraint:
//!       type: allowed_values
//!       values: [1, 2, 3, 4, 5]
//!   - name: NEIGHBORHOOD
//!     type: string
//! drop_columns:
//!   - EASE-MENT
//! "#;
//!
//! let rules = parse_rules_yaml(yaml).expect("Failed to parse rule set");
//! assert_eq!(rules.columns.len(), 2);
//! ```

use sales_core::{CoreError, PipelineConfig, RuleSet, ServingConfig};
use serde::de::DeserializeOwned;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading a rule set or configuration file.
#[derive(Debug, Error)]
pub enum ParserError {
    /// YAML parsing or deserialization failed
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml_ng::Error),

    /// TOML parsing or deserialization failed
    #[error("Failed to parse TOML: {0}")]
    TomlError(String),

    /// File I/O error
    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Unsupported file format
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Invalid file extension
    #[error("Invalid or missing file extension")]
    InvalidExtension,

    /// Document parsed but its content is not usable
    #[error(transparent)]
    Invalid(#[from] CoreError),
}

/// Result type alias for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

/// Supported file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// YAML format (.yml, .yaml)
    Yaml,
    /// TOML format (.toml)
    Toml,
}

/// Detect the file format from a path based on its extension.
///
/// # Errors
///
/// Returns `ParserError::InvalidExtension` if the file has no extension.
/// Returns `ParserError::UnsupportedFormat` if the extension is not recognized.
pub fn detect_format(path: &Path) -> Result<FileFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or(ParserError::InvalidExtension)?;

    match extension.to_lowercase().as_str() {
        "yaml" | "yml" => Ok(FileFormat::Yaml),
        "toml" => Ok(FileFormat::Toml),
        other => Err(ParserError::UnsupportedFormat(other.to_string())),
    }
}

fn parse_str<T: DeserializeOwned>(content: &str, format: FileFormat) -> Result<T> {
    match format {
        FileFormat::Yaml => Ok(serde_yaml_ng::from_str(content)?),
        FileFormat::Toml => {
            toml::from_str(content).map_err(|e| ParserError::TomlError(e.to_string()))
        }
    }
}

fn parse_path<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    parse_str(&content, format)
}

/// Parse a rule set from a YAML string and check its definition.
pub fn parse_rules_yaml(content: &str) -> Result<RuleSet> {
    let rules: RuleSet = parse_str(content, FileFormat::Yaml)?;
    rules.validate_definition()?;
    Ok(rules)
}

/// Parse a rule set from a TOML string and check its definition.
///
/// ```rust
/// use sales_parser::parse_rules_toml;
///
/// let toml = r#"
/// name = "prices"
///
/// [[columns]]
/// name = "SALE PRICE"
/// type = "float"
/// constraint = { type = "range", min = 1000.0, max = 100000000.0 }
/// "#;
///
/// let rules = parse_rules_toml(toml).unwrap();
/// assert_eq!(rules.columns[0].name, "SALE PRICE");
/// ```
pub fn parse_rules_toml(content: &str) -> Result<RuleSet> {
    let rules: RuleSet = parse_str(content, FileFormat::Toml)?;
    rules.validate_definition()?;
    Ok(rules)
}

/// Parse a rule set file with automatic format detection.
pub fn parse_rules_file(path: &Path) -> Result<RuleSet> {
    let rules: RuleSet = parse_path(path)?;
    rules.validate_definition()?;
    Ok(rules)
}

/// Parse a pipeline configuration file with automatic format detection.
///
/// ```no_run
/// use sales_parser::parse_config_file;
/// use std::path::Path;
///
/// let config = parse_config_file(Path::new("pipeline.toml")).unwrap();
/// println!("Cleaning {}", config.source.display());
/// ```
pub fn parse_config_file(path: &Path) -> Result<PipelineConfig> {
    let config: PipelineConfig = parse_path(path)?;
    config.validate()?;
    Ok(config)
}

/// Parse a serving configuration file with automatic format detection.
pub fn parse_serving_config_file(path: &Path) -> Result<ServingConfig> {
    let config: ServingConfig = parse_path(path)?;
    config.validate()?;
    Ok(config)
}
