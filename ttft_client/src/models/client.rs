use serde::Deserialize;
use serde_json::Value;
use std::{collections::HashMap, fmt};

use crate::utils;

/// Where and how to reach an OpenAI-compliant chat completions API.
///
/// Headers and query params are sent with every request, and `json` entries
/// are merged into every request body. `${VAR}` references in the base URL,
/// headers, and params are filled in from the environment.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct HttpClientConfig {
    #[serde(deserialize_with = "utils::deserialize_with_envsubst")]
    pub base_url: String,
    pub endpoint: String,
    #[serde(deserialize_with = "utils::deserialize_map_with_envsubst")]
    pub headers: HashMap<String, String>,
    #[serde(deserialize_with = "utils::deserialize_map_with_envsubst")]
    pub params: HashMap<String, String>,
    pub json: HashMap<String, Value>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            endpoint: utils::default_endpoint(),
            headers: HashMap::new(),
            params: HashMap::new(),
            json: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ApiError {
    pub message: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            Some(kind) => write!(f, "{kind}: {}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// APIs report failures that happen after the stream has started as an
/// `error` object in place of a fragment.
#[derive(Debug, Deserialize)]
pub struct ErrorEvent {
    pub error: ApiError,
}
