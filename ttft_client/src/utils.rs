use serde::{Deserialize, Deserializer, de};
use std::{collections::HashMap, path::PathBuf};

pub fn default_endpoint() -> String {
    "/chat/completions".to_string()
}

pub fn default_system_prompt() -> String {
    "You are a helpful assistant.".to_string()
}

/// `TTFT_CONFIG_PATH` if it's set, otherwise `ttft/config.json` in the
/// user's config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dotenvy::var("TTFT_CONFIG_PATH")
        .ok()
        .map(PathBuf::from)
        .or_else(|| dirs_next::config_dir().map(|dir| dir.join("ttft").join("config.json")))
}

/// Environment variables usable for substitution. Variables whose names or
/// values look like templates themselves are left out since envsubst
/// rejects them.
fn substitution_variables(
    variables: impl IntoIterator<Item = (String, String)>,
) -> HashMap<String, String> {
    variables
        .into_iter()
        .filter(|(key, value)| {
            !key.contains(['$', '{', '}']) && !value.contains(['$', '{', '}'])
        })
        .collect()
}

fn environment() -> HashMap<String, String> {
    let variables = std::env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)));
    substitution_variables(variables)
}

pub fn substitute(
    value: String,
    variables: &HashMap<String, String>,
) -> Result<String, envsubst::Error> {
    if !envsubst::is_templated(&value) {
        return Ok(value);
    }
    envsubst::substitute(value, variables)
}

pub fn deserialize_with_envsubst<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    substitute(value, &environment()).map_err(|err| de::Error::custom(format!("{err:?}")))
}

pub fn deserialize_map_with_envsubst<'de, D>(
    deserializer: D,
) -> Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let variables = environment();
    HashMap::<String, String>::deserialize(deserializer)?
        .into_iter()
        .map(|(key, value)| {
            substitute(value, &variables)
                .map(|value| (key, value))
                .map_err(|err| de::Error::custom(format!("{err:?}")))
        })
        .collect()
}
