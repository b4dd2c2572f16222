use serde::{Deserialize, Serialize};
use std::default::Default;

use crate::errors::ConfigError;
use crate::language_utils::{LanguageCode, get_language_name};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Alignment settings
    #[serde(default)]
    pub alignment: AlignmentConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Alignment behaviour
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AlignmentConfig {
    /// Split matched values into sentence-level records
    #[serde(default)]
    pub segmentation: bool,

    /// Source language to prefer when a group has several candidates.
    /// English variants are used when unset.
    #[serde(default)]
    pub preferred_source_language: Option<String>,

    /// Merge all pairs with the same source and target language into one file
    #[serde(default)]
    pub combine_by_target_language: bool,

    /// Maximum number of entity decoding passes
    #[serde(default = "default_max_entity_passes")]
    pub max_entity_passes: usize,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            segmentation: false,
            preferred_source_language: None,
            combine_by_target_language: false,
            max_entity_passes: default_max_entity_passes(),
        }
    }
}

impl AlignmentConfig {
    /// Parsed preferred source language, if one is configured and well formed
    pub fn preferred_source(&self) -> Option<LanguageCode> {
        self.preferred_source_language
            .as_deref()
            .and_then(LanguageCode::parse)
    }
}

/// Output file naming and TMX header settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OutputConfig {
    /// Prefix of generated file names
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,

    /// Extension of generated files
    #[serde(default = "default_extension")]
    pub extension: String,

    /// `creationtool` written to the TMX header
    #[serde(default = "default_creation_tool")]
    pub creation_tool: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file_prefix: default_file_prefix(),
            extension: default_extension(),
            creation_tool: default_creation_tool(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching `log` filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_max_entity_passes() -> usize {
    5
}

fn default_file_prefix() -> String {
    "translation_memory".to_string()
}

fn default_extension() -> String {
    "tmx".to_string()
}

fn default_creation_tool() -> String {
    env!("CARGO_PKG_NAME").to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(preferred) = &self.alignment.preferred_source_language {
            if LanguageCode::parse(preferred).is_none() || get_language_name(preferred).is_err() {
                return Err(ConfigError::InvalidLanguage(preferred.clone()));
            }
        }

        if self.alignment.max_entity_passes == 0 {
            return Err(ConfigError::NoEntityPasses);
        }

        if self.output.file_prefix.trim().is_empty() {
            return Err(ConfigError::EmptyPrefix);
        }

        let extension = &self.output.extension;
        if extension.is_empty() || !extension.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ConfigError::InvalidExtension(extension.clone()));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            alignment: AlignmentConfig::default(),
            output: OutputConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
