// scoring_publisher/src/publish/readiness.rs

//! Bounded wait for a freshly created offering to become usable.

use crate::error::{PublisherError, PublisherResult};
use crate::marketplace::{parse_offering_state, OfferingsApi};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{event, instrument, Level};

pub const DEFAULT_RETRY_COUNT: u32 = 24;
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_millis(5000);
pub const DEFAULT_DESIRED_STATE: &str = "READY";

/// Polling policy for offering readiness. The defaults give a two minute ceiling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadinessConfig {
  pub retry_count: u32,
  pub retry_interval: Duration,
  /// Compared case-insensitively with the reported state.
  pub desired_state: String,
}

impl Default for ReadinessConfig {
  fn default() -> Self {
    Self {
      retry_count: DEFAULT_RETRY_COUNT,
      retry_interval: DEFAULT_RETRY_INTERVAL,
      desired_state: DEFAULT_DESIRED_STATE.to_string(),
    }
  }
}

/// Polls `get_offering(offering_id)` until the desired state is reported.
///
/// Attempt `k` succeeding means `k` reads and `k - 1` sleeps. A failed read
/// is logged and counts as one attempt. After `retry_count` attempts the wait
/// fails with `OfferingNotReady`; a fired `cancel` token ends it with `Cancelled`.
#[instrument(
  name = "wait_until_ready",
  skip(offerings, config, cancel),
  fields(desired_state = %config.desired_state, retry_count = config.retry_count),
  err(Display)
)]
pub async fn wait_until_ready(
  offerings: &dyn OfferingsApi,
  offering_id: &str,
  config: &ReadinessConfig,
  cancel: &CancellationToken,
) -> PublisherResult<()> {
  let mut last_state: Option<String> = None;

  for attempt in 1..=config.retry_count {
    if attempt > 1 {
      tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(cancelled(offering_id)),
        _ = tokio::time::sleep(config.retry_interval) => {}
      }
    }

    let polled = tokio::select! {
      biased;
      _ = cancel.cancelled() => return Err(cancelled(offering_id)),
      polled = offerings.get_offering(offering_id) => polled,
    };

    match polled.and_then(|document| parse_offering_state(&document)) {
      Ok(state) if state.eq_ignore_ascii_case(&config.desired_state) => {
        event!(Level::INFO, attempt, %state, "Offering reached the desired state.");
        return Ok(());
      }
      Ok(state) => {
        event!(Level::DEBUG, attempt, %state, "Offering not ready yet.");
        last_state = Some(state);
      }
      Err(e) => {
        event!(Level::WARN, attempt, error = %e, "Offering state check failed.");
      }
    }
  }

  Err(PublisherError::OfferingNotReady {
    offering_id: offering_id.to_string(),
    desired_state: config.desired_state.clone(),
    attempts: config.retry_count,
    last_state,
  })
}

fn cancelled(offering_id: &str) -> PublisherError {
  PublisherError::Cancelled {
    during: format!("waiting for offering {} to become ready", offering_id),
  }
}
