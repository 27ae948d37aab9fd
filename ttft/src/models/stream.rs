use serde::{Deserialize, Deserializer};

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct TokenUsage {
    pub prompt_tokens: i32,
    pub completion_tokens: i32,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct StreamingDelta {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct StreamingChoice {
    #[serde(default)]
    pub delta: Option<StreamingDelta>,
}

/// One incremental piece of a streamed chat completion.
///
/// Every field is optional on the wire. Some services open the stream with
/// an unidentified fragment that has no choices (e.g. content filter
/// results), and role announcements or finish markers carry a delta without
/// any content.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Fragment {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "choices_with_nulls")]
    pub choices: Vec<StreamingChoice>,
    #[serde(default)]
    pub usage: Option<TokenUsage>,
}

impl Fragment {
    /// Text carried by the first choice's delta, if there is any.
    pub fn content(&self) -> Option<&str> {
        self.choices.first()?.delta.as_ref()?.content.as_deref()
    }

    /// Whether the server assigned this fragment an ID.
    pub fn is_identified(&self) -> bool {
        !self.id.is_empty()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Null choices become empty ones in place so the first choice stays first.
fn choices_with_nulls<'de, D>(deserializer: D) -> Result<Vec<StreamingChoice>, D::Error>
where
    D: Deserializer<'de>,
{
    let choices: Option<Vec<Option<StreamingChoice>>> = Option::deserialize(deserializer)?;
    Ok(choices
        .unwrap_or_default()
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect())
}
