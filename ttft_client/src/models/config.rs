use serde::Deserialize;
use std::{fs::File, path::Path, path::PathBuf};
use ttft::GenerationRequest;

use crate::{models::client::HttpClientConfig, utils};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no config path given and no user config directory to fall back on")]
    MissingPath,
    #[error("failed to open config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Command line overrides for values in the config file.
#[derive(Default)]
pub struct Args {
    pub config_path: Option<PathBuf>,
    pub model: Option<String>,
    pub system_prompt: Option<String>,
    pub user_prompt: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TtftConfig {
    pub api: HttpClientConfig,
    pub model: String,
    #[serde(default)]
    pub temperature: f32,
    #[serde(default = "utils::default_system_prompt")]
    pub system_prompt: String,
    pub user_prompt: String,
}

impl TtftConfig {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_reader(file).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn with_overrides(mut self, args: Args) -> Self {
        if let Some(model) = args.model {
            self.model = model;
        }
        if let Some(system_prompt) = args.system_prompt {
            self.system_prompt = system_prompt;
        }
        if let Some(user_prompt) = args.user_prompt {
            self.user_prompt = user_prompt;
        }
        self
    }

    pub fn into_parts(self) -> (HttpClientConfig, GenerationRequest) {
        let request = GenerationRequest::from_prompts(
            self.model,
            self.system_prompt,
            self.user_prompt,
            self.temperature,
        );
        (self.api, request)
    }
}

#[cfg(test)]
mod tests {
    use super::{Args, TtftConfig};

    const CONFIG: &str = r#"
    {
        "api": {
            "base_url": "https://example.openai.azure.com/openai/deployments/gpt-4-0125",
            "headers": {"api-key": "not-a-real-key"},
            "params": {"api-version": "2024-02-01"}
        },
        "model": "gpt-4-0125",
        "user_prompt": "Your user prompt"
    }
    "#;

    #[test]
    fn config_with_defaults() {
        let config: TtftConfig = serde_json::from_str(CONFIG).expect("valid config");
        assert_eq!(config.temperature, 0.0);
        assert_eq!(config.system_prompt, "You are a helpful assistant.");
        assert_eq!(config.api.endpoint, "/chat/completions");
        assert_eq!(config.api.headers["api-key"], "not-a-real-key");
        assert_eq!(config.api.params["api-version"], "2024-02-01");

        let (api, request) = config.into_parts();
        assert!(api.base_url.ends_with("/deployments/gpt-4-0125"));
        assert_eq!(request.model(), "gpt-4-0125");
        assert_eq!(request.messages()[0].content, "You are a helpful assistant.");
        assert_eq!(request.messages()[1].content, "Your user prompt");
        assert!(request.is_streaming());
    }

    #[test]
    fn overrides_replace_config_values() {
        let config: TtftConfig = serde_json::from_str(CONFIG).expect("valid config");
        let args = Args {
            model: Some("gpt-4o".to_string()),
            user_prompt: Some("Count to ten.".to_string()),
            ..Default::default()
        };
        let (_, request) = config.with_overrides(args).into_parts();
        assert_eq!(request.model(), "gpt-4o");
        assert_eq!(request.messages()[0].content, "You are a helpful assistant.");
        assert_eq!(request.messages()[1].content, "Count to ten.");
    }

    #[test]
    fn environment_substitution() {
        // Cargo sets the package name in the environment of test binaries.
        let config = r#"
        {
            "api": {
                "base_url": "https://${TTFT_UNSET_VAR}.openai.azure.com/${CARGO_PKG_NAME}",
                "headers": {"x-client": "${CARGO_PKG_NAME}"},
                "params": {"tag": "${CARGO_PKG_NAME}-${TTFT_UNSET_VAR}"},
                "json": {"user": "${CARGO_PKG_NAME}"}
            },
            "model": "${CARGO_PKG_NAME}",
            "user_prompt": "Your user prompt"
        }
        "#;
        let config: TtftConfig = serde_json::from_str(config).expect("valid config");
        let name = env!("CARGO_PKG_NAME");
        assert_eq!(
            config.api.base_url,
            format!("https://${{TTFT_UNSET_VAR}}.openai.azure.com/{name}")
        );
        assert_eq!(config.api.headers["x-client"], name);
        assert_eq!(
            config.api.params["tag"],
            format!("{name}-${{TTFT_UNSET_VAR}}")
        );

        // Only the base URL, headers, and params are substituted.
        assert_eq!(config.api.json["user"], "${CARGO_PKG_NAME}");
        assert_eq!(config.model, "${CARGO_PKG_NAME}");
    }

    #[test]
    fn missing_user_prompt() {
        let config = r#"{"api": {"base_url": "http://localhost"}, "model": "m"}"#;
        assert!(serde_json::from_str::<TtftConfig>(config).is_err());
    }
}
