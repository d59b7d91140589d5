// tests/http_clients_tests.rs

mod common;

use common::http_stub::HttpStub;
use scoring_publisher::clients::{
  BasicAuthServer, KeyCounterClient, MarketplaceClient, ModelCatalogClient, RuntimeHostClient,
};
use scoring_publisher::marketplace::{BinaryOfferingRequest, ServiceInstanceRequest};
use scoring_publisher::{
  ArtifactStore, EngineName, KeyCounter, ModelRuntimeHost, OfferingRecord, OfferingsApi, ScoringEngineData,
  ServicesApi, UpstreamError,
};

const USER_SECRET_BASIC: &str = "Basic dXNlcjpzZWNyZXQ=";

fn http_client() -> reqwest::Client {
  reqwest::Client::builder().no_proxy().build().unwrap()
}

fn server(url: &str) -> BasicAuthServer {
  BasicAuthServer::new(url, "user", "secret")
}

// --- Runtime host ---

#[tokio::test]
async fn model_name_is_sent_as_one_encoded_segment() {
  common::setup_tracing();
  let stub = HttpStub::respond_once(200, "public class Churn {}").await;
  let host = RuntimeHostClient::new(http_client(), server(&stub.base_url));

  let source = host.download_model_source("churn#v2?x").await.unwrap();
  assert_eq!(source, b"public class Churn {}");

  let request = stub.request().await;
  assert_eq!(request.request_line(), "GET /3/Models.java/churn%23v2%3Fx HTTP/1.1");
  assert_eq!(request.header("authorization"), Some(USER_SECRET_BASIC));
}

#[tokio::test]
async fn runtime_library_is_downloaded_with_basic_auth() {
  let stub = HttpStub::respond_once(200, "jar").await;
  let host = RuntimeHostClient::new(http_client(), server(&format!("{}/", stub.base_url)));

  assert_eq!(host.download_runtime_library().await.unwrap(), b"jar");

  let request = stub.request().await;
  assert_eq!(request.request_line(), "GET /3/h2o-genmodel.jar HTTP/1.1");
  assert_eq!(request.header("authorization"), Some(USER_SECRET_BASIC));
}

#[tokio::test]
async fn error_status_keeps_status_and_body() {
  let stub = HttpStub::respond_once(503, "maintenance window").await;
  let host = RuntimeHostClient::new(http_client(), server(&stub.base_url));

  let err = host.download_runtime_library().await.unwrap_err();
  match &err {
    UpstreamError::Status { status, body } => {
      assert_eq!(*status, 503);
      assert_eq!(body, "maintenance window");
    }
    other => panic!("Expected Status error, got {:?}", other),
  }
  assert_eq!(err.status(), Some(503));
  assert_eq!(err.body(), Some("maintenance window"));
  stub.request().await;
}

// --- Model catalog ---

#[tokio::test]
async fn catalog_returns_artifact_bytes_with_bearer_token() {
  let stub = HttpStub::respond_once(200, "engine-bytes").await;
  let catalog = ModelCatalogClient::new(http_client(), &stub.base_url, "catalog-token");

  let bytes = catalog.retrieve_artifact("m 1", "a1").await.unwrap();
  assert_eq!(bytes, b"engine-bytes");

  let request = stub.request().await;
  assert_eq!(request.request_line(), "GET /api/v1/models/m%201/artifacts/a1/file HTTP/1.1");
  assert_eq!(request.header("authorization"), Some("Bearer catalog-token"));
}

#[tokio::test]
async fn catalog_404_is_not_found() {
  let stub = HttpStub::respond_once(404, "no such artifact").await;
  let catalog = ModelCatalogClient::new(http_client(), &stub.base_url, "catalog-token");

  let err = catalog.retrieve_artifact("m1", "a1").await.unwrap_err();
  assert!(
    matches!(&err, UpstreamError::NotFound(msg) if msg.contains("a1") && msg.contains("no such artifact")),
    "{:?}",
    err
  );
  stub.request().await;
}

// --- Key counter ---

#[tokio::test]
async fn counter_posts_key_and_parses_integer() {
  let stub = HttpStub::respond_once(200, "7").await;
  let counter = KeyCounterClient::new(http_client(), server(&stub.base_url));

  assert_eq!(counter.next_count("my-model?ab").await.unwrap(), 7);

  let request = stub.request().await;
  assert_eq!(request.request_line(), "POST /api/v1/counter/my-model%3Fab HTTP/1.1");
  assert_eq!(request.header("authorization"), Some(USER_SECRET_BASIC));
}

#[tokio::test]
async fn counter_non_integer_body_is_malformed() {
  let stub = HttpStub::respond_once(200, "\"seven\"").await;
  let counter = KeyCounterClient::new(http_client(), server(&stub.base_url));

  let err = counter.next_count("key").await.unwrap_err();
  assert!(matches!(err, UpstreamError::Malformed(_)), "{:?}", err);
  stub.request().await;
}

// --- Marketplace ---

#[tokio::test]
async fn create_offering_sends_named_multipart_parts() {
  let stub = HttpStub::respond_once(200, r#"{"id": "o2", "plans": [{"id": "p2"}]}"#).await;
  let marketplace = MarketplaceClient::new(http_client(), &stub.base_url).with_bearer_token("mp-token");
  let data = ScoringEngineData::new("m1", "a1", "churn");

  let created = marketplace
    .create_offering(BinaryOfferingRequest::new(&data, b"jar-bytes".to_vec()))
    .await
    .unwrap();
  assert_eq!(created["id"], "o2");

  let request = stub.request().await;
  assert_eq!(request.request_line(), "POST /api/v2/offerings/binary HTTP/1.1");
  assert_eq!(request.header("authorization"), Some("Bearer mp-token"));
  assert!(request
    .header("content-type")
    .is_some_and(|ct| ct.starts_with("multipart/form-data")));

  let body = request.body_text();
  assert!(body.contains(r#"name="blob"; filename="churn.jar""#), "{}", body);
  assert!(body.contains(r#"name="manifest"; filename="binary_manifest.json""#), "{}", body);
  assert!(body.contains(r#"name="offering"; filename="binary_offering.json""#), "{}", body);
  assert!(body.contains(r#"{"type":"JAVA"}"#), "{}", body);
  assert!(body.contains("jar-bytes"), "{}", body);
}

#[tokio::test]
async fn get_offering_encodes_id_under_base_path() {
  let stub = HttpStub::respond_once(200, r#"{"id": "o/1", "state": "READY"}"#).await;
  let marketplace = MarketplaceClient::new(http_client(), &format!("{}/mp/", stub.base_url));

  let offering = marketplace.get_offering("o/1").await.unwrap();
  assert_eq!(offering["state"], "READY");

  let request = stub.request().await;
  assert_eq!(request.request_line(), "GET /mp/api/v3/offerings/o%2F1 HTTP/1.1");
  assert_eq!(request.header("authorization"), None);
}

#[tokio::test]
async fn offering_list_that_is_not_json_is_malformed() {
  let stub = HttpStub::respond_once(200, "<html>login</html>").await;
  let marketplace = MarketplaceClient::new(http_client(), &stub.base_url);

  let err = marketplace.list_offerings().await.unwrap_err();
  assert!(matches!(err, UpstreamError::Malformed(_)), "{:?}", err);
  assert_eq!(stub.request().await.request_line(), "GET /api/v3/offerings HTTP/1.1");
}

#[tokio::test]
async fn rejected_service_instance_keeps_status_and_body() {
  let stub = HttpStub::respond_once(409, "name already taken").await;
  let marketplace = MarketplaceClient::new(http_client(), &stub.base_url);
  let request = ServiceInstanceRequest::new(
    &EngineName::new("churn-se001-m1"),
    &OfferingRecord::new("o1", "p1"),
    &ScoringEngineData::new("m1", "a1", "churn"),
  );

  let err = marketplace.create_service_instance(&request).await.unwrap_err();
  assert!(
    matches!(&err, UpstreamError::Status { status: 409, body } if body == "name already taken"),
    "{:?}",
    err
  );

  let captured = stub.request().await;
  assert_eq!(captured.request_line(), "POST /api/v3/services HTTP/1.1");
  let sent: serde_json::Value = serde_json::from_slice(&captured.body).unwrap();
  assert_eq!(sent["name"], "churn-se001-m1");
  assert_eq!(sent["type"], "SERVICE");
  assert_eq!(sent["offeringId"], "o1");
}

#[tokio::test]
async fn unusable_base_url_is_rejected_before_sending() {
  let marketplace = MarketplaceClient::new(http_client(), "not a url");
  let err = marketplace.list_offerings().await.unwrap_err();
  assert!(matches!(err, UpstreamError::InvalidUrl(_)), "{:?}", err);
}
