// scoring_publisher/src/pipeline/mod.rs

//! Named-step pipeline: construction and step-list editing (`definition`),
//! handler registration (`hooks`), and the run loop (`execution`).

pub mod definition;
pub mod execution;
pub mod hooks;

pub use definition::Pipeline;
