// scoring_publisher_app/src/errors.rs

use scoring_publisher::PublisherError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("{source}")]
  Publisher {
    #[from]
    source: PublisherError,
  },

  #[error("HTTP client setup failed: {0}")]
  HttpClient(#[from] reqwest::Error),

  #[error("Output Error: {0}")]
  Output(#[from] std::io::Error),

  #[error("Internal Error: {0}")]
  Internal(String),
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<PublisherError>() {
      Ok(publisher_err) => AppError::Publisher { source: publisher_err },
      Err(other) => AppError::Internal(format!("{:#}", other)),
    }
  }
}

impl AppError {
  /// Process exit code; every publisher failure kind gets its own code.
  pub fn exit_code(&self) -> u8 {
    match self {
      AppError::Config(_) | AppError::HttpClient(_) => 3,
      AppError::Publisher { source } => match source {
        PublisherError::InvalidArgument(_) => 2,
        PublisherError::Configuration(_) => 3,
        PublisherError::Fetch { .. } => 10,
        PublisherError::Build { .. } => 11,
        PublisherError::DuplicateOffering { .. } => 12,
        PublisherError::OfferingCreation { .. } => 13,
        PublisherError::OfferingNotReady { .. } => 14,
        PublisherError::Provisioning { .. } => 15,
        PublisherError::Cancelled { .. } => 130,
        PublisherError::HandlerMissing { .. } | PublisherError::Internal(_) => 1,
      },
      AppError::Output(_) | AppError::Internal(_) => 1,
    }
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
