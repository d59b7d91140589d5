// scoring_publisher_app/src/state.rs

use crate::config::AppConfig;
use crate::errors::Result;
use std::sync::Arc;

/// Shared by the commands. The HTTP client is configured once here and cloned
/// into every collaborator.
#[derive(Clone)]
pub struct AppState {
  pub config: Arc<AppConfig>,
  pub http: reqwest::Client,
}

impl AppState {
  pub fn new(config: Arc<AppConfig>) -> Result<Self> {
    let http = reqwest::Client::builder()
      .timeout(config.http_timeout)
      .user_agent(concat!("scoring-publisher/", env!("CARGO_PKG_VERSION")))
      .build()?;
    Ok(Self { config, http })
  }
}
