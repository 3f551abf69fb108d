//! HTTP client for a running receipt server.

use anyhow::{bail, Context, Result};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use rcpt_api::ErrorBody;

pub struct ReceiptClient {
    client: Client,
    base_url: String,
}

impl ReceiptClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        tracing::debug!(%url, "GET");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("cannot reach {url}"))?;
        decode(response).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.url(path);
        tracing::debug!(%url, "POST");
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("cannot reach {url}"))?;
        decode(response).await
    }
}

/// Decode a success body, or turn an error body into an error.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let bytes = response.bytes().await.context("failed to read response body")?;
    if status.is_success() {
        return serde_json::from_slice(&bytes)
            .with_context(|| format!("unexpected response body ({status})"));
    }
    match serde_json::from_slice::<ErrorBody>(&bytes) {
        Ok(ErrorBody {
            error,
            details: Some(details),
        }) => bail!("{error} ({status}): {details}"),
        Ok(ErrorBody { error, .. }) => bail!("{error} ({status})"),
        Err(_) => bail!("server returned {status}"),
    }
}
