//! Serialization context handed to fuzzer-function providers
//!
//! Providers receive a [`CodecFactory`] so that callbacks which need to
//! encode nested objects can do so. The registry and combinator never look
//! inside it; they only thread it through.

use serde::{Deserialize, Serialize};

/// Caller-owned description of the scheme and codecs under test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecFactory {
    /// Name of the type scheme the codecs serve
    #[serde(default = "default_scheme")]
    pub scheme: String,

    /// Media types the factory can encode and decode
    #[serde(default = "default_media_types")]
    pub media_types: Vec<String>,
}

fn default_scheme() -> String {
    "client-go".to_string()
}

fn default_media_types() -> Vec<String> {
    vec![
        "application/json".to_string(),
        "application/yaml".to_string(),
        "application/vnd.kubernetes.protobuf".to_string(),
    ]
}

impl Default for CodecFactory {
    fn default() -> Self {
        Self {
            scheme: default_scheme(),
            media_types: default_media_types(),
        }
    }
}

impl CodecFactory {
    /// Create a codec factory for the named scheme with the default media types
    pub fn new(scheme: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            ..Self::default()
        }
    }

    /// Builder method: replace the supported media types
    pub fn with_media_types(mut self, media_types: Vec<String>) -> Self {
        self.media_types = media_types;
        self
    }

    /// Check whether a media type is supported
    pub fn supports(&self, media_type: &str) -> bool {
        self.media_types.iter().any(|m| m == media_type)
    }
}
