#![allow(dead_code)]

use axum::Router;
use std::collections::HashMap;
use tokio::net::TcpListener;
use ttft_client::models::client::HttpClientConfig;

pub const API_KEY: &str = "test-key";
pub const API_VERSION: &str = "2024-02-01";
pub const DEPLOYMENT_PATH: &str = "/openai/deployments/gpt-4-0125";

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn spawn_server(router: Router) -> Result<String, Box<dyn std::error::Error>> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let _ = tokio::spawn(async move { axum::serve(listener, router).await });
    Ok(format!("http://{addr}"))
}

/// Client config the way it'd look for an Azure OpenAI deployment.
pub fn azure_config(base_url: &str, api_key: &str) -> HttpClientConfig {
    HttpClientConfig {
        base_url: format!("{base_url}{DEPLOYMENT_PATH}"),
        headers: HashMap::from([("api-key".to_string(), api_key.to_string())]),
        params: HashMap::from([("api-version".to_string(), API_VERSION.to_string())]),
        ..Default::default()
    }
}

/// Frame JSON payloads as server-sent events ending with `[DONE]`.
pub fn sse(payloads: &[&str]) -> String {
    let mut body: String = payloads
        .iter()
        .map(|payload| format!("data: {payload}\n\n"))
        .collect();
    body.push_str("data: [DONE]\n\n");
    body
}
