// scoring_publisher/src/clients/marketplace.rs

use super::{endpoint_url, ensure_success, read_json};
use crate::error::UpstreamError;
use crate::marketplace::binary_offering::{
  BLOB_PART, MANIFEST_FILE_NAME, MANIFEST_PART, OFFERING_FILE_NAME, OFFERING_PART,
};
use crate::marketplace::{BinaryOfferingRequest, OfferingsApi, ServiceInstanceRequest, ServicesApi};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tracing::{event, instrument, Level};

pub const OFFERINGS_PATH: &[&str] = &["api", "v3", "offerings"];
pub const CREATE_OFFERING_PATH: &[&str] = &["api", "v2", "offerings", "binary"];
pub const SERVICES_PATH: &[&str] = &["api", "v3", "services"];

/// Client of the marketplace REST API (offerings and service instances).
#[derive(Clone)]
pub struct MarketplaceClient {
  client: reqwest::Client,
  base_url: String,
  bearer_token: Option<String>,
}

impl MarketplaceClient {
  pub fn new(client: reqwest::Client, base_url: &str) -> Self {
    Self {
      client,
      base_url: base_url.to_string(),
      bearer_token: None,
    }
  }

  pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
    self.bearer_token = Some(token.into());
    self
  }

  fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    match &self.bearer_token {
      Some(token) => builder.bearer_auth(token),
      None => builder,
    }
  }

  async fn get_json(&self, segments: &[&str]) -> Result<Value, UpstreamError> {
    let url = endpoint_url(&self.base_url, segments)?;
    let resp = self.authorized(self.client.get(url.clone())).send().await?;
    let resp = ensure_success(resp).await.inspect_err(|e| {
      event!(Level::ERROR, %url, error = %e, "Marketplace GET failed.");
    })?;
    read_json(resp).await
  }
}

fn json_part(value: &impl serde::Serialize, file_name: &'static str) -> Result<Part, UpstreamError> {
  let bytes = serde_json::to_vec(value).map_err(|e| UpstreamError::Malformed(format!("cannot serialize {}: {}", file_name, e)))?;
  event!(Level::DEBUG, part = file_name, body = %String::from_utf8_lossy(&bytes), "Adding part to request.");
  Ok(Part::bytes(bytes).file_name(file_name).mime_str("application/json")?)
}

#[async_trait]
impl OfferingsApi for MarketplaceClient {
  #[instrument(name = "MarketplaceClient::list_offerings", skip(self), err(Display))]
  async fn list_offerings(&self) -> Result<Value, UpstreamError> {
    self.get_json(OFFERINGS_PATH).await
  }

  #[instrument(
    name = "MarketplaceClient::create_offering",
    skip_all,
    fields(offering_name = %request.offering.name, blob_len = request.blob.len()),
    err(Display)
  )]
  async fn create_offering(&self, request: BinaryOfferingRequest) -> Result<Value, UpstreamError> {
    let blob = Part::bytes(request.blob)
      .file_name(request.blob_file_name)
      .mime_str("application/octet-stream")?;
    let form = Form::new()
      .part(BLOB_PART, blob)
      .part(MANIFEST_PART, json_part(&request.manifest, MANIFEST_FILE_NAME)?)
      .part(OFFERING_PART, json_part(&request.offering, OFFERING_FILE_NAME)?);

    let url = endpoint_url(&self.base_url, CREATE_OFFERING_PATH)?;
    let resp = self.authorized(self.client.post(url)).multipart(form).send().await?;
    read_json(ensure_success(resp).await?).await
  }

  #[instrument(name = "MarketplaceClient::get_offering", skip(self), err(Display))]
  async fn get_offering(&self, offering_id: &str) -> Result<Value, UpstreamError> {
    self.get_json(&[OFFERINGS_PATH, &[offering_id][..]].concat()).await
  }
}

#[async_trait]
impl ServicesApi for MarketplaceClient {
  #[instrument(
    name = "MarketplaceClient::create_service_instance",
    skip_all,
    fields(instance_name = %request.name, offering_id = %request.offering_id),
    err(Display)
  )]
  async fn create_service_instance(&self, request: &ServiceInstanceRequest) -> Result<(), UpstreamError> {
    let url = endpoint_url(&self.base_url, SERVICES_PATH)?;
    let resp = self.authorized(self.client.post(url)).json(request).send().await?;
    let resp = ensure_success(resp).await?;
    let body = resp.text().await.unwrap_or_default();
    event!(Level::DEBUG, %body, "Service creation response body.");
    Ok(())
  }
}
