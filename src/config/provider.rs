// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision backend selection
//!
//! Steady-state configuration is the tagged enum; the legacy flat
//! model-name string is handled once here, at resolution time.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot infer a vision backend from model '{0}'")]
    UnknownModel(String),
}

/// Backend selection plus credentials/model, resolved once at startup.
/// Unknown `provider` tags are rejected when the configuration is
/// deserialized, before any request is served.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum ProviderConfig {
    Anthropic {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        api_key: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        model: Option<String>,
    },
    Openai {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        api_key: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        model: Option<String>,
    },
    Google {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        api_key: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        model: Option<String>,
    },
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig::Openai {
            api_key: None,
            model: None,
        }
    }
}

impl ProviderConfig {
    /// One-time migration for deployments still configured with the
    /// deprecated flat model string.
    pub fn from_legacy_model(model: &str) -> Result<Self, ConfigError> {
        let lower = model.to_lowercase();
        if lower.starts_with("claude") {
            Ok(ProviderConfig::Anthropic {
                api_key: None,
                model: Some(model.to_string()),
            })
        } else if lower.starts_with("gpt") || lower.starts_with("o1") || lower.starts_with("o3") {
            Ok(ProviderConfig::Openai {
                api_key: None,
                model: Some(model.to_string()),
            })
        } else if lower.starts_with("gemini") {
            Ok(ProviderConfig::Google {
                api_key: None,
                model: Some(model.to_string()),
            })
        } else {
            Err(ConfigError::UnknownModel(model.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_deserialization() {
        let config: ProviderConfig = serde_json::from_str(
            r#"{"provider": "anthropic", "api_key": "sk-x", "model": "claude-sonnet-4-20250514"}"#,
        )
        .unwrap();
        assert_eq!(
            config,
            ProviderConfig::Anthropic {
                api_key: Some("sk-x".to_string()),
                model: Some("claude-sonnet-4-20250514".to_string()),
            }
        );
    }

    #[test]
    fn test_unknown_tag_rejected() {
        let result: Result<ProviderConfig, _> =
            serde_json::from_str(r#"{"provider": "mistral"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_legacy_claude_model() {
        let config = ProviderConfig::from_legacy_model("claude-sonnet-4-20250514").unwrap();
        assert!(matches!(config, ProviderConfig::Anthropic { .. }));
    }

    #[test]
    fn test_legacy_gpt_model() {
        let config = ProviderConfig::from_legacy_model("gpt-4o-mini").unwrap();
        assert!(matches!(
            config,
            ProviderConfig::Openai {
                model: Some(ref m),
                ..
            } if m == "gpt-4o-mini"
        ));
    }

    #[test]
    fn test_legacy_gemini_model() {
        let config = ProviderConfig::from_legacy_model("gemini-1.5-flash").unwrap();
        assert!(matches!(config, ProviderConfig::Google { .. }));
    }

    #[test]
    fn test_legacy_unknown_model_fails_fast() {
        let result = ProviderConfig::from_legacy_model("llama-3-70b");
        assert!(matches!(result, Err(ConfigError::UnknownModel(_))));
    }
}
