//! Metadata naming and default settings

use labelmeta_core::metadata::DEFAULT_GENERATE_COUNT;
use serde::{Deserialize, Serialize};

/// Settings shared by the metadata services
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataConfig {
    /// Suffix of the label document next to an asset
    #[serde(default = "default_label_suffix")]
    pub label_suffix: String,

    /// Suffix of the generator document next to an asset
    #[serde(default = "default_generator_suffix")]
    pub generator_suffix: String,

    /// Suffix of the OCR document next to an asset
    #[serde(default = "default_ocr_suffix")]
    pub ocr_suffix: String,

    /// Sample count used when no generator document exists
    #[serde(default = "default_generate_count")]
    pub generate_count: u32,
}

fn default_label_suffix() -> String {
    ".labels.json".to_string()
}

fn default_generator_suffix() -> String {
    ".generators.json".to_string()
}

fn default_ocr_suffix() -> String {
    ".ocr.json".to_string()
}

fn default_generate_count() -> u32 {
    DEFAULT_GENERATE_COUNT
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            label_suffix: default_label_suffix(),
            generator_suffix: default_generator_suffix(),
            ocr_suffix: default_ocr_suffix(),
            generate_count: default_generate_count(),
        }
    }
}

impl MetadataConfig {
    /// Label document name for a decoded asset name
    pub fn label_file(&self, document: &str) -> String {
        format!("{}{}", document, self.label_suffix)
    }

    /// Generator document name for a decoded asset name
    pub fn generator_file(&self, document: &str) -> String {
        format!("{}{}", document, self.generator_suffix)
    }

    /// OCR document name for a decoded asset name
    pub fn ocr_file(&self, document: &str) -> String {
        format!("{}{}", document, self.ocr_suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MetadataConfig::default();
        assert_eq!(config.label_file("a.png"), "a.png.labels.json");
        assert_eq!(config.generator_file("a.png"), "a.png.generators.json");
        assert_eq!(config.ocr_file("a.png"), "a.png.ocr.json");
        assert_eq!(config.generate_count, 40);
    }

    #[test]
    fn test_partial_deserialization_uses_defaults() {
        let config: MetadataConfig =
            serde_json::from_str(r#"{"label_suffix": ".lbl.json"}"#).unwrap();
        assert_eq!(config.label_suffix, ".lbl.json");
        assert_eq!(config.generator_suffix, ".generators.json");
    }
}
