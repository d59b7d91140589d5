// scoring_publisher_app/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use scoring_publisher::clients::BasicAuthServer;
use scoring_publisher::publish::readiness::{DEFAULT_DESIRED_STATE, DEFAULT_RETRY_COUNT, DEFAULT_RETRY_INTERVAL};
use scoring_publisher::ReadinessConfig;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

fn required(var_name: &str) -> Result<String> {
  optional(var_name).ok_or_else(|| AppError::Config(format!("Missing environment variable '{}'", var_name)))
}

/// Unset and empty variables are both treated as absent.
fn optional(var_name: &str) -> Option<String> {
  env::var(var_name).ok().filter(|value| !value.trim().is_empty())
}

fn parsed<T>(var_name: &str, default: T) -> Result<T>
where
  T: FromStr,
  T::Err: fmt::Display,
{
  match optional(var_name) {
    Some(raw) => raw
      .trim()
      .parse::<T>()
      .map_err(|e| AppError::Config(format!("Invalid {} value '{}': {}", var_name, raw, e))),
    None => Ok(default),
  }
}

/// A credential that never shows up in `Debug` output.
#[derive(Clone)]
pub struct Secret(String);

impl Secret {
  pub fn expose(&self) -> &str {
    &self.0
  }
}

impl fmt::Debug for Secret {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("[REDACTED]")
  }
}

/// Settings every command needs.
#[derive(Debug, Clone)]
pub struct AppConfig {
  pub http_timeout: Duration,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let http_timeout = Duration::from_secs(parsed("HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?);
    if http_timeout.is_zero() {
      return Err(AppError::Config("HTTP_TIMEOUT_SECS must be greater than zero".to_string()));
    }

    tracing::info!(?http_timeout, "Application configuration loaded successfully.");
    Ok(Self { http_timeout })
  }
}

/// Settings of the `build` command.
#[derive(Debug, Clone)]
pub struct BuildConfig {
  pub engine_base_jar: PathBuf,
  pub work_root: Option<PathBuf>,
  pub javac_path: PathBuf,
}

impl BuildConfig {
  pub fn from_env() -> Result<Self> {
    let engine_base_jar = PathBuf::from(required("ENGINE_BASE_JAR_PATH")?);
    if !engine_base_jar.is_file() {
      return Err(AppError::Config(format!(
        "ENGINE_BASE_JAR_PATH '{}' is not a file",
        engine_base_jar.display()
      )));
    }

    Ok(Self {
      engine_base_jar,
      work_root: optional("WORK_ROOT").map(PathBuf::from),
      javac_path: PathBuf::from(optional("JAVAC_PATH").unwrap_or_else(|| "javac".to_string())),
    })
  }
}

/// Settings of the `publish` command.
#[derive(Debug, Clone)]
pub struct PublishConfig {
  pub marketplace_url: String,
  pub marketplace_token: Option<Secret>,
  pub model_catalog_url: String,
  pub model_catalog_token: Secret,
  pub key_counter: BasicAuthServer,
  pub readiness: ReadinessConfig,
}

impl PublishConfig {
  pub fn from_env() -> Result<Self> {
    let readiness = ReadinessConfig {
      retry_count: parsed("OFFERING_CHECK_RETRY_COUNT", DEFAULT_RETRY_COUNT)?,
      retry_interval: Duration::from_millis(parsed(
        "OFFERING_CHECK_RETRY_INTERVAL_MS",
        DEFAULT_RETRY_INTERVAL.as_millis() as u64,
      )?),
      desired_state: optional("OFFERING_CHECK_DESIRED_STATE").unwrap_or_else(|| DEFAULT_DESIRED_STATE.to_string()),
    };
    if readiness.retry_count == 0 {
      return Err(AppError::Config("OFFERING_CHECK_RETRY_COUNT must be at least 1".to_string()));
    }

    Ok(Self {
      marketplace_url: required("MARKETPLACE_URL")?,
      marketplace_token: optional("MARKETPLACE_TOKEN").map(Secret),
      model_catalog_url: required("MODEL_CATALOG_URL")?,
      model_catalog_token: Secret(required("MODEL_CATALOG_TOKEN")?),
      key_counter: BasicAuthServer::new(
        required("KEY_COUNTER_URL")?,
        required("KEY_COUNTER_USER")?,
        required("KEY_COUNTER_PASSWORD")?,
      ),
      readiness,
    })
  }
}
