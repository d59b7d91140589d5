// scoring_publisher/src/clients/mod.rs

//! reqwest implementations of the collaborator traits.
//!
//! Every client receives a fully configured `reqwest::Client` (timeouts,
//! TLS, pooling) from its owner; nothing here mutates a shared client.

pub mod catalog;
pub mod key_counter;
pub mod marketplace;
pub mod runtime_host;

pub use catalog::ModelCatalogClient;
pub use key_counter::KeyCounterClient;
pub use marketplace::MarketplaceClient;
pub use runtime_host::RuntimeHostClient;

use crate::error::UpstreamError;
use reqwest::Url;
use serde_json::Value;
use std::fmt;

/// Server address with basic-auth credentials.
#[derive(Clone)]
pub struct BasicAuthServer {
  pub url: String,
  pub username: String,
  pub password: String,
}

impl BasicAuthServer {
  pub fn new(url: impl Into<String>, username: impl Into<String>, password: impl Into<String>) -> Self {
    Self {
      url: url.into(),
      username: username.into(),
      password: password.into(),
    }
  }
}

impl fmt::Debug for BasicAuthServer {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("BasicAuthServer")
      .field("url", &self.url)
      .field("username", &self.username)
      .field("password", &"[REDACTED]")
      .finish()
  }
}

/// Appends `segments` to the path of `base_url`. Each segment is
/// percent-encoded, so ids and names cannot escape into the query, fragment
/// or another path segment.
pub(crate) fn endpoint_url(base_url: &str, segments: &[&str]) -> Result<Url, UpstreamError> {
  let mut url = Url::parse(base_url).map_err(|e| UpstreamError::InvalidUrl(format!("{} ({})", base_url, e)))?;
  url
    .path_segments_mut()
    .map_err(|_| UpstreamError::InvalidUrl(format!("{} cannot be a base url", base_url)))?
    .pop_if_empty()
    .extend(segments);
  Ok(url)
}

/// Passes 2xx responses through; anything else becomes `UpstreamError::Status` with the body kept.
pub(crate) async fn ensure_success(resp: reqwest::Response) -> Result<reqwest::Response, UpstreamError> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }
  let body = resp.text().await.unwrap_or_default();
  Err(UpstreamError::Status {
    status: status.as_u16(),
    body,
  })
}

/// Reads the body as JSON; a body that does not parse is `Malformed`, not a transport error.
pub(crate) async fn read_json(resp: reqwest::Response) -> Result<Value, UpstreamError> {
  let text = resp.text().await?;
  serde_json::from_str(&text).map_err(|e| UpstreamError::Malformed(format!("invalid JSON ({}): {}", e, text)))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn endpoint_url_encodes_each_segment() {
    let url = endpoint_url("http://host:9000", &["3", "Models.java", "churn#v2?x"]).unwrap();
    assert_eq!(url.as_str(), "http://host:9000/3/Models.java/churn%23v2%3Fx");

    let url = endpoint_url("http://host/api/", &["offerings", "a/b"]).unwrap();
    assert_eq!(url.as_str(), "http://host/api/offerings/a%2Fb");
  }

  #[test]
  fn endpoint_url_rejects_unusable_bases() {
    assert!(matches!(endpoint_url("not a url", &["x"]), Err(UpstreamError::InvalidUrl(_))));
    assert!(matches!(endpoint_url("mailto:ops@example.com", &["x"]), Err(UpstreamError::InvalidUrl(_))));
  }
}
