// scoring_publisher/src/clients/key_counter.rs

use super::{endpoint_url, ensure_success, read_json, BasicAuthServer};
use crate::error::UpstreamError;
use crate::naming::KeyCounter;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use tracing::instrument;

pub const KEY_COUNTER_PATH: &[&str] = &["api", "v1", "counter"];

#[derive(Clone)]
pub struct KeyCounterClient {
  client: reqwest::Client,
  server: BasicAuthServer,
}

impl KeyCounterClient {
  pub fn new(client: reqwest::Client, server: BasicAuthServer) -> Self {
    Self { client, server }
  }
}

#[async_trait]
impl KeyCounter for KeyCounterClient {
  #[instrument(name = "KeyCounterClient::next_count", skip(self), err(Display))]
  async fn next_count(&self, key: &str) -> Result<u32, UpstreamError> {
    let url = endpoint_url(&self.server.url, &[KEY_COUNTER_PATH, &[key][..]].concat())?;
    let resp = self
      .client
      .post(url)
      .basic_auth(&self.server.username, Some(&self.server.password))
      .header(ACCEPT, "application/json")
      .send()
      .await?;
    let value = read_json(ensure_success(resp).await?).await?;
    value
      .as_u64()
      .and_then(|count| u32::try_from(count).ok())
      .ok_or_else(|| UpstreamError::Malformed(format!("key-counter returned a non-integer: {}", value)))
  }
}
