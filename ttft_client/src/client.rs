use futures::{
    StreamExt, TryStreamExt,
    stream::{self, BoxStream},
};
use reqwest::StatusCode;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tokio_util::io::StreamReader;
use tracing::{debug, trace, warn};
use ttft::{CompletionClient, Fragment, GenerationRequest};

use crate::models::client::{ApiError, ErrorEvent, HttpClientConfig};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid client config: {0}")]
    Config(String),
    #[error("failed to serialize request: {0}")]
    RequestJson(serde_json::Error),
    #[error("failed to connect to {url}: {source}")]
    ApiConnection { url: String, source: reqwest::Error },
    #[error("{url} responded with {status}: {body}")]
    ApiStatus {
        url: String,
        status: StatusCode,
        body: String,
    },
    #[error("failed to read response stream: {0}")]
    Stream(#[from] std::io::Error),
    #[error("failed to parse response chunk {data:?}: {source}")]
    ResponseJson {
        data: String,
        source: serde_json::Error,
    },
    #[error("API error mid-stream: {0}")]
    StreamedApiError(ApiError),
}

impl ClientError {
    /// Status code of an unsuccessful response, if the API responded at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::ApiStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Streams chat completions from an OpenAI-compliant API over server-sent
/// events.
#[derive(Clone)]
pub struct HttpCompletionClient {
    config: HttpClientConfig,
    client: reqwest::Client,
}

impl HttpCompletionClient {
    pub fn new(config: HttpClientConfig) -> Result<Self, ClientError> {
        let header_map = reqwest::header::HeaderMap::try_from(&config.headers)
            .map_err(|err| ClientError::Config(err.to_string()))?;
        let client = reqwest::Client::builder()
            .default_headers(header_map)
            .build()
            .map_err(|err| ClientError::Config(err.to_string()))?;
        Ok(Self { config, client })
    }

    pub fn url(&self) -> String {
        let base_url = self.config.base_url.trim_end_matches('/');
        let endpoint = self.config.endpoint.trim_start_matches('/');
        format!("{base_url}/{endpoint}")
    }
}

impl CompletionClient for HttpCompletionClient {
    type Error = ClientError;
    type Stream = BoxStream<'static, Result<Fragment, ClientError>>;

    async fn stream(&self, request: &GenerationRequest) -> Result<Self::Stream, ClientError> {
        let url = self.url();
        let mut body = serde_json::to_value(request).map_err(ClientError::RequestJson)?;
        if let Some(object) = body.as_object_mut() {
            object.extend(self.config.json.clone());
            object.insert("stream".to_string(), Value::Bool(true));
        }

        debug!("posting streaming request to {url}");
        let response = self
            .client
            .post(&url)
            .query(&self.config.params)
            .json(&body)
            .send()
            .await
            .map_err(|source| ClientError::ApiConnection {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|err| format!("{err:?}"));
            return Err(ClientError::ApiStatus { url, status, body });
        }

        let bytes = response.bytes_stream().map_err(std::io::Error::other);
        let lines = StreamReader::new(bytes).lines();
        Ok(fragments(lines).boxed())
    }
}

/// Decode server-sent event lines into fragments. The stream ends on the
/// `[DONE]` sentinel or when the body runs out.
pub fn fragments<R>(lines: Lines<R>) -> impl futures::Stream<Item = Result<Fragment, ClientError>>
where
    R: AsyncBufRead + Unpin,
{
    stream::try_unfold(lines, next_fragment)
}

async fn next_fragment<R>(mut lines: Lines<R>) -> Result<Option<(Fragment, Lines<R>)>, ClientError>
where
    R: AsyncBufRead + Unpin,
{
    while let Some(line) = lines.next_line().await? {
        // Comments, event names, and retry hints don't carry data.
        let Some(data) = line.strip_prefix("data:") else {
            continue;
        };
        match data.trim() {
            "[DONE]" => {
                debug!("stream finished");
                return Ok(None);
            }
            "" => {}
            data => {
                trace!("data: {data}");
                if let Ok(ErrorEvent { error }) = serde_json::from_str::<ErrorEvent>(data) {
                    return Err(ClientError::StreamedApiError(error));
                }
                let fragment = serde_json::from_str::<Fragment>(data).map_err(|source| {
                    ClientError::ResponseJson {
                        data: data.to_string(),
                        source,
                    }
                })?;
                return Ok(Some((fragment, lines)));
            }
        }
    }
    warn!("stream ended without [DONE]");
    Ok(None)
}
