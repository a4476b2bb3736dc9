// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Plugin options: construction-time configuration for the whole pipeline

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::provider::{ConfigError, ProviderConfig};

/// Default prompt template. `{filename}`, `{maxLength}` and `{language}`
/// are substituted per request.
pub const DEFAULT_PROMPT: &str = r#"Generate a short alt text for this image IN {language}. The filename is "{filename}".

Rules:
- Write in {language}
- Keep it short: aim for 5-10 words, max {maxLength} characters
- For logos: just use the company/brand name followed by "logo"
- For icons or decorative images: say "decorative"
- For photos: briefly describe the key subject
- Don't start with "Image of", "Photo of", "Picture of" or translations thereof
- The filename often contains the subject, use it as a strong hint

Respond with ONLY the alt text, nothing else."#;

/// How accepted suggestions reach the document store. Pick one per
/// deployment; the orchestrator never mixes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SaveMode {
    /// Ready suggestions accumulate until an explicit bulk save
    GenerateThenSave,
    /// Every successful generation persists immediately
    AutoSave,
}

fn default_collections() -> Vec<String> {
    vec!["media".to_string()]
}

fn default_prompt() -> String {
    DEFAULT_PROMPT.to_string()
}

fn default_max_length() -> usize {
    80
}

fn default_batch_size() -> usize {
    5
}

fn default_alt_field_name() -> String {
    "alt".to_string()
}

fn default_language() -> String {
    "English".to_string()
}

fn default_save_mode() -> SaveMode {
    SaveMode::GenerateThenSave
}

/// Construction-time options; not runtime-mutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginOptions {
    /// Collection slugs the endpoints serve
    #[serde(default = "default_collections")]
    pub collections: Vec<String>,

    /// Prompt template with {filename}, {maxLength}, {language} placeholders
    #[serde(default = "default_prompt")]
    pub prompt: String,

    /// Operator-supplied extension appended to the prompt after a blank line
    #[serde(default)]
    pub prompt_extension: Option<String>,

    /// Maximum length for generated alt text
    #[serde(default = "default_max_length")]
    pub max_length: usize,

    /// Images processed in parallel per chunk
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Vision backend configuration
    #[serde(default)]
    pub provider: Option<ProviderConfig>,

    /// Deprecated: flat model name, kept for old deployments.
    /// Use `provider.model` instead.
    #[serde(default)]
    pub model: Option<String>,

    /// Field name holding the description
    #[serde(default = "default_alt_field_name")]
    pub alt_field_name: String,

    /// Output language for generated alt texts
    #[serde(default = "default_language")]
    pub language: String,

    /// Save mode for the batch orchestrator
    #[serde(default = "default_save_mode")]
    pub save_mode: SaveMode,

    /// Local storage roots per collection, enabling direct reads
    #[serde(default)]
    pub storage_dirs: HashMap<String, PathBuf>,
}

impl Default for PluginOptions {
    fn default() -> Self {
        Self {
            collections: default_collections(),
            prompt: default_prompt(),
            prompt_extension: None,
            max_length: default_max_length(),
            batch_size: default_batch_size(),
            provider: None,
            model: None,
            alt_field_name: default_alt_field_name(),
            language: default_language(),
            save_mode: default_save_mode(),
            storage_dirs: HashMap::new(),
        }
    }
}

impl PluginOptions {
    /// Resolve the backend configuration: typed config wins, then the
    /// deprecated model string, then the OpenAI default.
    pub fn effective_provider(&self) -> Result<ProviderConfig, ConfigError> {
        if let Some(config) = &self.provider {
            return Ok(config.clone());
        }
        if let Some(model) = &self.model {
            return ProviderConfig::from_legacy_model(model);
        }
        Ok(ProviderConfig::default())
    }

    /// The default collection when a request does not name one
    pub fn default_collection(&self) -> &str {
        self.collections
            .first()
            .map(String::as_str)
            .unwrap_or("media")
    }

    /// Substitute the template placeholders and append the operator's
    /// prompt extension.
    pub fn build_prompt(&self, filename: &str) -> String {
        let name = if filename.is_empty() {
            "unknown"
        } else {
            filename
        };
        let mut prompt = self
            .prompt
            .replace("{filename}", name)
            .replace("{maxLength}", &self.max_length.to_string())
            .replace("{language}", &self.language);
        if let Some(extension) = &self.prompt_extension {
            prompt.push_str("\n\n");
            prompt.push_str(extension);
        }
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = PluginOptions::default();
        assert_eq!(options.collections, vec!["media"]);
        assert_eq!(options.max_length, 80);
        assert_eq!(options.batch_size, 5);
        assert_eq!(options.alt_field_name, "alt");
        assert_eq!(options.language, "English");
        assert_eq!(options.save_mode, SaveMode::GenerateThenSave);
    }

    #[test]
    fn test_build_prompt_substitution() {
        let options = PluginOptions {
            prompt: "Describe {filename} in {language}, max {maxLength} chars".to_string(),
            ..Default::default()
        };
        assert_eq!(
            options.build_prompt("cat.jpg"),
            "Describe cat.jpg in English, max 80 chars"
        );
    }

    #[test]
    fn test_build_prompt_empty_filename() {
        let options = PluginOptions {
            prompt: "file: {filename}".to_string(),
            ..Default::default()
        };
        assert_eq!(options.build_prompt(""), "file: unknown");
    }

    #[test]
    fn test_build_prompt_appends_extension() {
        let options = PluginOptions {
            prompt: "Describe {filename}".to_string(),
            prompt_extension: Some("Mention the brand name.".to_string()),
            ..Default::default()
        };
        assert_eq!(
            options.build_prompt("cat.jpg"),
            "Describe cat.jpg\n\nMention the brand name."
        );
    }

    #[test]
    fn test_effective_provider_typed_wins() {
        let options = PluginOptions {
            provider: Some(ProviderConfig::Google {
                api_key: None,
                model: None,
            }),
            model: Some("claude-sonnet-4-20250514".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            options.effective_provider().unwrap(),
            ProviderConfig::Google { .. }
        ));
    }

    #[test]
    fn test_effective_provider_legacy_model() {
        let options = PluginOptions {
            model: Some("claude-sonnet-4-20250514".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            options.effective_provider().unwrap(),
            ProviderConfig::Anthropic { .. }
        ));
    }

    #[test]
    fn test_effective_provider_default() {
        let options = PluginOptions::default();
        assert!(matches!(
            options.effective_provider().unwrap(),
            ProviderConfig::Openai { .. }
        ));
    }

    #[test]
    fn test_camel_case_deserialization() {
        let json = r#"{
            "collections": ["images"],
            "maxLength": 120,
            "batchSize": 3,
            "altFieldName": "description",
            "saveMode": "auto-save"
        }"#;
        let options: PluginOptions = serde_json::from_str(json).unwrap();
        assert_eq!(options.max_length, 120);
        assert_eq!(options.batch_size, 3);
        assert_eq!(options.alt_field_name, "description");
        assert_eq!(options.save_mode, SaveMode::AutoSave);
    }
}
