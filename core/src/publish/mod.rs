// scoring_publisher/src/publish/mod.rs

//! Publishing a built engine: resolve (or create) the offering, name the
//! engine, provision an instance.

pub mod flow;
pub mod provisioner;
pub mod readiness;
pub mod resolver;

pub use flow::{PublishCtxData, PublishFlow, PublishOptions, PublishOutcome};
pub use provisioner::InstanceProvisioner;
pub use readiness::{wait_until_ready, ReadinessConfig};
pub use resolver::OfferingResolver;
