// src/lib.rs

//! Scoring-engine publisher: turns a trained model into a marketplace offering.
//!
//! Two flows:
//!  - build: fetch the model source from the runtime host, compile it, package
//!    the classes and merge them into the base engine archive.
//!  - publish: make sure a single marketplace offering exists for the model
//!    artifact (creating it and waiting for readiness when needed), generate an
//!    instance name, and provision a service instance.
//!
//! The publish flow runs on a small named-step pipeline engine (`pipeline`),
//! with every external system behind an async trait so hosts can swap in
//! their own clients.

pub mod build;
pub mod catalog;
pub mod clients;
pub mod core;
pub mod error;
pub mod marketplace;
pub mod model;
pub mod naming;
pub mod pipeline;
pub mod publish;

// --- Pipeline engine ---
pub use crate::core::context_data::ContextData;
pub use crate::core::control::{PipelineControl, PipelineResult};
pub use crate::core::step::{Handler, SkipCondition, StepDef};
pub use crate::pipeline::definition::Pipeline;

// --- Domain ---
pub use crate::build::{BuiltEngine, EngineBuilder, JavacCompiler, ModelCompiler, ModelRuntimeHost};
pub use crate::catalog::ArtifactStore;
pub use crate::error::{PublisherError, PublisherResult, UpstreamError};
pub use crate::marketplace::{OfferingsApi, ServicesApi};
pub use crate::model::{EngineName, OfferingRecord, ProvisionedInstance, ScoringEngineData};
pub use crate::naming::{sanitize_name, try_sanitize_name, EngineNameSupplier, KeyCounter};
pub use crate::publish::{
  InstanceProvisioner, OfferingResolver, PublishFlow, PublishOptions, PublishOutcome, ReadinessConfig,
};
