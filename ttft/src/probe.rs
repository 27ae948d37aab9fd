use futures::{Stream, TryStreamExt};
use std::{fmt, future::Future, time::Duration};
use tokio::time::Instant;
use tracing::{debug, trace};

use crate::{
    GenerationRequest,
    models::stream::{Fragment, TokenUsage},
};

/// A streaming chat completion service.
///
/// Submitting a request yields a single-pass stream of fragments in the
/// order they arrive. Failures to submit and failures mid-stream are both
/// terminal for whoever is consuming the stream.
pub trait CompletionClient {
    type Error: std::error::Error;
    type Stream: Stream<Item = Result<Fragment, Self::Error>> + Unpin;

    fn stream(
        &self,
        request: &GenerationRequest,
    ) -> impl Future<Output = Result<Self::Stream, Self::Error>>;
}

/// Latency of one streamed completion along with the text it produced.
#[derive(Clone, Debug, PartialEq)]
pub struct Measurement {
    /// Concatenated fragment content in arrival order.
    pub content: String,
    /// Time from submission to the first fragment with a server-assigned ID.
    /// `None` if no fragment ever had one.
    pub ttft: Option<Duration>,
    /// Time from submission to the end of the stream.
    pub total_time: Duration,
    /// Number of fragments received, with or without content.
    pub fragments: usize,
    /// Most recent token usage reported by the stream, if any.
    pub usage: Option<TokenUsage>,
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ttft = match self.ttft {
            Some(ttft) => ttft.as_secs_f64().to_string(),
            None => "undefined".to_string(),
        };
        write!(
            f,
            "Full conversation received: {}, TTFT: {ttft}, Total Time: {}",
            self.content,
            self.total_time.as_secs_f64()
        )
    }
}

/// Measures TTFT and total response time against a completion client.
pub struct LatencyProbe<C> {
    client: C,
}

impl<C: CompletionClient> LatencyProbe<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Submit `request` and consume its stream to the end. The clock starts
    /// before submission, so TTFT and total time both include the time it
    /// takes the service to accept the request.
    pub async fn measure(&self, request: &GenerationRequest) -> Result<Measurement, C::Error> {
        let start = Instant::now();
        debug!("submitting request for {}", request.model());
        let mut stream = self.client.stream(request).await?;

        let mut fragments = 0;
        let mut content = String::new();
        let mut ttft = None;
        let mut usage = None;
        while let Some(fragment) = stream.try_next().await? {
            if ttft.is_none() && fragment.is_identified() {
                let elapsed = start.elapsed();
                debug!("first token after {elapsed:?} (id={})", fragment.id);
                ttft = Some(elapsed);
            }
            match fragment.content() {
                Some(text) => content.push_str(text),
                None => trace!("fragment {fragments} carries no content"),
            }
            if fragment.usage.is_some() {
                usage = fragment.usage;
            }
            fragments += 1;
        }

        let total_time = start.elapsed();
        debug!("stream ended after {fragments} fragments in {total_time:?}");
        Ok(Measurement {
            content,
            ttft,
            total_time,
            fragments,
            usage,
        })
    }
}
