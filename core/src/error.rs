// scoring_publisher/src/error.rs

//! Error taxonomy shared by the build and publish pipelines.
//!
//! `UpstreamError` is what every external collaborator returns. It keeps the
//! upstream HTTP status and body so nothing is lost when the pipeline wraps it
//! into a `PublisherError`.

use anyhow::Error as AnyhowError;
use thiserror::Error;

/// Failure reported by an external collaborator (marketplace, catalog, counter, runtime host).
#[derive(Debug, Error)]
pub enum UpstreamError {
  #[error("responded with http status '{status}' and body: {body}")]
  Status { status: u16, body: String },

  #[error("resource not found: {0}")]
  NotFound(String),

  #[error("transport failure: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("unexpected response: {0}")]
  Malformed(String),

  #[error("I/O failure: {0}")]
  Io(#[from] std::io::Error),

  #[error("invalid endpoint url: {0}")]
  InvalidUrl(String),
}

impl UpstreamError {
  /// HTTP status reported upstream, when there was one.
  pub fn status(&self) -> Option<u16> {
    match self {
      UpstreamError::Status { status, .. } => Some(*status),
      UpstreamError::NotFound(_) => Some(404),
      UpstreamError::Transport(err) => err.status().map(|s| s.as_u16()),
      UpstreamError::Malformed(_) | UpstreamError::Io(_) | UpstreamError::InvalidUrl(_) => None,
    }
  }

  /// Response body reported upstream, when there was one.
  pub fn body(&self) -> Option<&str> {
    match self {
      UpstreamError::Status { body, .. } => Some(body.as_str()),
      _ => None,
    }
  }
}

#[derive(Debug, Error)]
pub enum PublisherError {
  #[error("Unable to fetch {resource}: {source}")]
  Fetch {
    resource: String,
    #[source]
    source: UpstreamError,
  },

  #[error("Unable to build scoring engine ({stage}): {source}")]
  Build {
    stage: &'static str,
    #[source]
    source: AnyhowError,
  },

  #[error("Unable to return model offering. Found {count} offerings for model {model_id} and artifact {artifact_id}")]
  DuplicateOffering {
    model_id: String,
    artifact_id: String,
    count: usize,
  },

  #[error("Unable to create scoring engine offering: {source}")]
  OfferingCreation {
    #[source]
    source: UpstreamError,
  },

  #[error("Offering {offering_id} not confirmed in state '{desired_state}' after {attempts} attempts (last state: {last_state:?})")]
  OfferingNotReady {
    offering_id: String,
    desired_state: String,
    attempts: u32,
    last_state: Option<String>,
  },

  #[error("Unable to create service instance '{instance_name}': {source}")]
  Provisioning {
    instance_name: String,
    #[source]
    source: UpstreamError,
  },

  #[error("Operation cancelled while {during}")]
  Cancelled { during: String },

  #[error("Invalid argument: {0}")]
  InvalidArgument(String),

  #[error("Configuration error: {0}")]
  Configuration(String),

  #[error("Handler missing for non-optional step: {step_name}")]
  HandlerMissing { step_name: String },

  #[error("Internal publisher error: {0}")]
  Internal(String),
}

impl PublisherError {
  pub(crate) fn build(stage: &'static str, source: impl Into<AnyhowError>) -> Self {
    PublisherError::Build {
      stage,
      source: source.into(),
    }
  }

  fn upstream(&self) -> Option<&UpstreamError> {
    match self {
      PublisherError::Fetch { source, .. }
      | PublisherError::OfferingCreation { source }
      | PublisherError::Provisioning { source, .. } => Some(source),
      _ => None,
    }
  }

  /// Upstream HTTP status carried by this error, if any.
  pub fn upstream_status(&self) -> Option<u16> {
    self.upstream().and_then(UpstreamError::status)
  }

  /// Upstream response body carried by this error, if any.
  pub fn upstream_body(&self) -> Option<&str> {
    self.upstream().and_then(UpstreamError::body)
  }
}

// Lets handlers written against anyhow use `?` inside pipeline steps.
impl From<AnyhowError> for PublisherError {
  fn from(err: AnyhowError) -> Self {
    match err.downcast::<PublisherError>() {
      Ok(publisher_err) => publisher_err,
      Err(other) => PublisherError::Internal(format!("{:#}", other)),
    }
  }
}

pub type PublisherResult<T, E = PublisherError> = std::result::Result<T, E>;
