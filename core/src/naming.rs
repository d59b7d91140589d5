// scoring_publisher/src/naming.rs

//! Marketplace-safe names for offerings and service instances.

use crate::error::{PublisherError, PublisherResult, UpstreamError};
use crate::model::EngineName;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{event, instrument, Level};

/// Length of the model-id fragment appended to instance names.
const ID_FRAGMENT_LEN: usize = 4;

/// Lower-cases `name`, collapses every run of characters outside `[a-z0-9]`
/// into one `-`, and drops a leading or trailing `-`.
///
/// Idempotent: sanitizing an already clean name returns it unchanged.
pub fn sanitize_name(name: &str) -> String {
  let mut out = String::with_capacity(name.len());
  let mut pending_dash = false;

  for c in name.chars().flat_map(char::to_lowercase) {
    if c.is_ascii_lowercase() || c.is_ascii_digit() {
      if pending_dash && !out.is_empty() {
        out.push('-');
      }
      pending_dash = false;
      out.push(c);
    } else {
      pending_dash = true;
    }
  }
  out
}

/// Same as [`sanitize_name`] for callers holding an optional name.
/// A missing name is a caller bug and fails with `InvalidArgument`.
pub fn try_sanitize_name(name: Option<&str>) -> PublisherResult<String> {
  name
    .map(sanitize_name)
    .ok_or_else(|| PublisherError::InvalidArgument("String to be formatted cannot be null.".to_string()))
}

/// Monotonic counter service keyed by an arbitrary string.
#[async_trait]
pub trait KeyCounter: Send + Sync {
  /// Increments the counter for `key` and returns the new value.
  async fn next_count(&self, key: &str) -> Result<u32, UpstreamError>;
}

/// Produces human-readable instance names that rarely collide.
///
/// Model names are not unique, so the first characters of the model id and a
/// per-key counter are appended. There is no offline fallback: if the counter
/// service is down, naming fails.
#[derive(Clone)]
pub struct EngineNameSupplier {
  counter: Arc<dyn KeyCounter>,
}

impl EngineNameSupplier {
  pub fn new(counter: Arc<dyn KeyCounter>) -> Self {
    Self { counter }
  }

  #[instrument(name = "EngineNameSupplier::generate_name", skip(self), err(Display))]
  pub async fn generate_name(&self, model_name: &str, model_id: &str) -> PublisherResult<EngineName> {
    let sanitized = sanitize_name(model_name);
    if sanitized.is_empty() {
      return Err(PublisherError::InvalidArgument(format!(
        "model name '{}' has no characters usable in an engine name",
        model_name
      )));
    }
    // Counter keys keep the id's case; only the final name is lower-cased.
    let fragment: String = model_id.chars().take(ID_FRAGMENT_LEN).collect();
    let counter_key = format!("{}{}", sanitized, fragment);

    event!(Level::INFO, %counter_key, "Fetching suffix for scoring engine name from key-counter.");
    let count = self
      .counter
      .next_count(&counter_key)
      .await
      .map_err(|source| PublisherError::Fetch {
        resource: format!("key-counter value for '{}'", counter_key),
        source,
      })?;

    Ok(EngineName::new(format_engine_name(&sanitized, count, &fragment)))
  }
}

/// `<name>-se<NNN>-<fragment>`, lower-cased. The suffix is zero-padded to three digits.
fn format_engine_name(sanitized_name: &str, count: u32, fragment: &str) -> String {
  format!("{}-se{:03}-{}", sanitized_name, count, fragment).to_lowercase()
}
