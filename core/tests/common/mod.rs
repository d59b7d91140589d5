// tests/common/mod.rs
#![allow(dead_code)] // Not every test binary uses every fake

pub mod http_stub;

use async_trait::async_trait;
use parking_lot::Mutex;
use scoring_publisher::marketplace::{BinaryOfferingRequest, ServiceInstanceRequest};
use scoring_publisher::{
  ArtifactStore, ContextData, KeyCounter, ModelCompiler, ModelRuntimeHost, OfferingsApi, PipelineControl,
  PublisherError, ServicesApi, UpstreamError,
};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::Level;

// --- Pipeline engine fixtures ---
#[derive(Clone, Debug, Default)]
pub struct TestContext {
  pub counter: i32,
  pub message: String,
  pub steps_executed: Vec<String>,
  pub should_stop_at: Option<String>,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  #[error("Publisher error: {0}")]
  Publisher(String),

  #[error("Test handler failed: {0}")]
  Handler(String),
}

impl From<PublisherError> for TestError {
  fn from(err: PublisherError) -> Self {
    TestError::Publisher(format!("{:?}", err))
  }
}

pub fn create_simple_handler(
  step_name: &'static str,
  message_to_append: &'static str,
) -> scoring_publisher::Handler<TestContext, TestError> {
  Box::new(move |ctx: ContextData<TestContext>| {
    let step_name_owned = step_name.to_string();
    Box::pin(async move {
      let mut guard = ctx.write();
      guard.counter += 1;
      guard.message.push_str(message_to_append);
      guard.steps_executed.push(step_name_owned.clone());
      if guard.should_stop_at.as_deref() == Some(step_name_owned.as_str()) {
        return Ok(PipelineControl::Stop);
      }
      Ok(PipelineControl::Continue)
    })
  })
}

pub fn create_failing_handler(
  step_name: &'static str,
  error_message: &'static str,
) -> scoring_publisher::Handler<TestContext, TestError> {
  Box::new(move |ctx: ContextData<TestContext>| {
    let step_name_owned = step_name.to_string();
    let error_message_owned = error_message.to_string();
    Box::pin(async move {
      ctx.write().steps_executed.push(step_name_owned);
      Err(TestError::Handler(error_message_owned))
    })
  })
}

use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Offering documents ---
pub fn offering_doc(offering_id: &str, plan_id: &str, model_id: &str, artifact_id: &str) -> Value {
  json!({
    "id": offering_id,
    "name": format!("offering-{}", offering_id),
    "state": "READY",
    "metadata": [
      {"key": "MODEL_ID", "value": model_id},
      {"key": "ARTIFACT_ID", "value": artifact_id}
    ],
    "plans": [{"id": plan_id, "name": "free"}]
  })
}

pub fn legacy_offering_doc(offering_id: &str, plan_id: &str, model_id: &str, artifact_id: &str) -> Value {
  json!({
    "entity": {
      "unique_id": offering_id,
      "state": "READY",
      "metadata": [
        {"key": "MODEL_ID", "value": model_id},
        {"key": "ARTIFACT_ID", "value": artifact_id}
      ],
      "service_plans": [{"metadata": {"guid": plan_id}}]
    }
  })
}

fn status_error(failure: &Option<(u16, String)>) -> Option<UpstreamError> {
  failure.as_ref().map(|(status, body)| UpstreamError::Status {
    status: *status,
    body: body.clone(),
  })
}

// --- Marketplace offerings ---
/// One scripted answer of `get_offering`. The last one repeats forever.
#[derive(Debug, Clone)]
pub enum Poll {
  State(&'static str),
  Fail(u16),
}

pub struct FakeOfferings {
  list_document: Mutex<Value>,
  list_failure: Mutex<Option<(u16, String)>>,
  create_response: Mutex<Value>,
  create_failure: Mutex<Option<(u16, String)>>,
  polls: Mutex<VecDeque<Poll>>,
  pub created: Mutex<Vec<BinaryOfferingRequest>>,
  pub list_calls: AtomicUsize,
  pub create_calls: AtomicUsize,
  pub get_calls: AtomicUsize,
}

impl FakeOfferings {
  pub fn with_list(list_document: Value) -> Self {
    Self {
      list_document: Mutex::new(list_document),
      list_failure: Mutex::new(None),
      create_response: Mutex::new(json!({"id": "o2", "plans": [{"id": "p2"}]})),
      create_failure: Mutex::new(None),
      polls: Mutex::new(VecDeque::from(vec![Poll::State("READY")])),
      created: Mutex::new(Vec::new()),
      list_calls: AtomicUsize::new(0),
      create_calls: AtomicUsize::new(0),
      get_calls: AtomicUsize::new(0),
    }
  }

  pub fn empty() -> Self {
    Self::with_list(json!([]))
  }

  pub fn failing_list(self, status: u16, body: &str) -> Self {
    *self.list_failure.lock() = Some((status, body.to_string()));
    self
  }

  pub fn creating(self, response: Value) -> Self {
    *self.create_response.lock() = response;
    self
  }

  pub fn failing_create(self, status: u16, body: &str) -> Self {
    *self.create_failure.lock() = Some((status, body.to_string()));
    self
  }

  pub fn polling(self, polls: Vec<Poll>) -> Self {
    *self.polls.lock() = VecDeque::from(polls);
    self
  }

  pub fn list_count(&self) -> usize {
    self.list_calls.load(Ordering::SeqCst)
  }

  pub fn create_count(&self) -> usize {
    self.create_calls.load(Ordering::SeqCst)
  }

  pub fn get_count(&self) -> usize {
    self.get_calls.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl OfferingsApi for FakeOfferings {
  async fn list_offerings(&self) -> Result<Value, UpstreamError> {
    self.list_calls.fetch_add(1, Ordering::SeqCst);
    if let Some(err) = status_error(&self.list_failure.lock()) {
      return Err(err);
    }
    Ok(self.list_document.lock().clone())
  }

  async fn create_offering(&self, request: BinaryOfferingRequest) -> Result<Value, UpstreamError> {
    self.create_calls.fetch_add(1, Ordering::SeqCst);
    self.created.lock().push(request);
    if let Some(err) = status_error(&self.create_failure.lock()) {
      return Err(err);
    }
    Ok(self.create_response.lock().clone())
  }

  async fn get_offering(&self, offering_id: &str) -> Result<Value, UpstreamError> {
    self.get_calls.fetch_add(1, Ordering::SeqCst);
    let poll = {
      let mut polls = self.polls.lock();
      if polls.len() > 1 {
        polls.pop_front()
      } else {
        polls.front().cloned()
      }
    };
    match poll {
      Some(Poll::State(state)) => Ok(json!({"id": offering_id, "state": state})),
      Some(Poll::Fail(status)) => Err(UpstreamError::Status {
        status,
        body: "temporarily unavailable".to_string(),
      }),
      None => Err(UpstreamError::Malformed("no scripted poll".to_string())),
    }
  }
}

// --- Artifact store ---
pub struct FakeArtifacts {
  artifact: Option<Vec<u8>>,
  pub calls: AtomicUsize,
}

impl FakeArtifacts {
  pub fn with_bytes(bytes: &[u8]) -> Self {
    Self {
      artifact: Some(bytes.to_vec()),
      calls: AtomicUsize::new(0),
    }
  }

  pub fn missing() -> Self {
    Self {
      artifact: None,
      calls: AtomicUsize::new(0),
    }
  }

  pub fn count(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl ArtifactStore for FakeArtifacts {
  async fn retrieve_artifact(&self, model_id: &str, artifact_id: &str) -> Result<Vec<u8>, UpstreamError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    self
      .artifact
      .clone()
      .ok_or_else(|| UpstreamError::NotFound(format!("artifact {} of model {}", artifact_id, model_id)))
  }
}

// --- Services ---
#[derive(Default)]
pub struct FakeServices {
  failure: Option<(u16, String)>,
  pub requests: Mutex<Vec<ServiceInstanceRequest>>,
}

impl FakeServices {
  pub fn failing(status: u16, body: &str) -> Self {
    Self {
      failure: Some((status, body.to_string())),
      requests: Mutex::new(Vec::new()),
    }
  }

  pub fn count(&self) -> usize {
    self.requests.lock().len()
  }
}

#[async_trait]
impl ServicesApi for FakeServices {
  async fn create_service_instance(&self, request: &ServiceInstanceRequest) -> Result<(), UpstreamError> {
    self.requests.lock().push(request.clone());
    match status_error(&self.failure) {
      Some(err) => Err(err),
      None => Ok(()),
    }
  }
}

// --- Key counter ---
pub struct FakeCounter {
  value: Option<u32>,
  pub keys: Mutex<Vec<String>>,
}

impl FakeCounter {
  pub fn returning(value: u32) -> Self {
    Self {
      value: Some(value),
      keys: Mutex::new(Vec::new()),
    }
  }

  pub fn unavailable() -> Self {
    Self {
      value: None,
      keys: Mutex::new(Vec::new()),
    }
  }

  pub fn count(&self) -> usize {
    self.keys.lock().len()
  }
}

#[async_trait]
impl KeyCounter for FakeCounter {
  async fn next_count(&self, key: &str) -> Result<u32, UpstreamError> {
    self.keys.lock().push(key.to_string());
    self.value.ok_or_else(|| UpstreamError::Status {
      status: 503,
      body: "counter down".to_string(),
    })
  }
}

// --- Build collaborators ---
pub const MODEL_SOURCE: &[u8] = b"public class my_model {}";
pub const RUNTIME_LIBRARY: &[u8] = b"PK-not-really-a-jar";

pub struct FakeRuntimeHost {
  source_failure: Option<u16>,
  pub source_calls: AtomicUsize,
  pub library_calls: AtomicUsize,
}

impl FakeRuntimeHost {
  pub fn new() -> Self {
    Self {
      source_failure: None,
      source_calls: AtomicUsize::new(0),
      library_calls: AtomicUsize::new(0),
    }
  }

  pub fn failing_source(status: u16) -> Self {
    Self {
      source_failure: Some(status),
      ..Self::new()
    }
  }
}

#[async_trait]
impl ModelRuntimeHost for FakeRuntimeHost {
  async fn download_model_source(&self, model_name: &str) -> Result<Vec<u8>, UpstreamError> {
    self.source_calls.fetch_add(1, Ordering::SeqCst);
    match self.source_failure {
      Some(status) => Err(UpstreamError::Status {
        status,
        body: format!("no model {}", model_name),
      }),
      None => Ok(MODEL_SOURCE.to_vec()),
    }
  }

  async fn download_runtime_library(&self) -> Result<Vec<u8>, UpstreamError> {
    self.library_calls.fetch_add(1, Ordering::SeqCst);
    Ok(RUNTIME_LIBRARY.to_vec())
  }
}

/// Writes fixed class files instead of running a real compiler.
pub struct FakeCompiler {
  classes: Vec<(&'static str, &'static str)>,
  fail_with: Option<&'static str>,
  pub calls: AtomicUsize,
}

impl FakeCompiler {
  pub fn producing(classes: Vec<(&'static str, &'static str)>) -> Self {
    Self {
      classes,
      fail_with: None,
      calls: AtomicUsize::new(0),
    }
  }

  pub fn failing(message: &'static str) -> Self {
    Self {
      classes: Vec::new(),
      fail_with: Some(message),
      calls: AtomicUsize::new(0),
    }
  }

  pub fn count(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl ModelCompiler for FakeCompiler {
  async fn compile(&self, source_file: &Path, classpath: &Path, output_dir: &Path) -> anyhow::Result<()> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    anyhow::ensure!(source_file.is_file(), "source missing: {}", source_file.display());
    anyhow::ensure!(classpath.is_file(), "classpath missing: {}", classpath.display());
    if let Some(message) = self.fail_with {
      anyhow::bail!("{}", message);
    }
    for (relative, content) in &self.classes {
      let path = output_dir.join(relative);
      if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
      }
      std::fs::write(path, content)?;
    }
    Ok(())
  }
}

// --- Archives ---
pub fn write_zip(path: &Path, entries: &[(&str, &str)]) {
  let file = std::fs::File::create(path).unwrap();
  let mut writer = zip::ZipWriter::new(file);
  for (name, content) in entries {
    writer
      .start_file(name.to_string(), zip::write::SimpleFileOptions::default())
      .unwrap();
    writer.write_all(content.as_bytes()).unwrap();
  }
  writer.finish().unwrap();
}

pub fn zip_entry_names(path: &Path) -> Vec<String> {
  let archive = zip::ZipArchive::new(std::fs::File::open(path).unwrap()).unwrap();
  archive.file_names().map(str::to_string).collect()
}

pub fn zip_entry(path: &Path, name: &str) -> Vec<u8> {
  let mut archive = zip::ZipArchive::new(std::fs::File::open(path).unwrap()).unwrap();
  let mut entry = archive.by_name(name).unwrap();
  let mut out = Vec::new();
  std::io::Read::read_to_end(&mut entry, &mut out).unwrap();
  out
}
