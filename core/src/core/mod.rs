// scoring_publisher/src/core/mod.rs

//! Primitives of the step-pipeline engine: shared context, flow signals, step declarations.

pub mod context_data;
pub mod control;
pub mod step;

pub use context_data::ContextData;
pub use control::{PipelineControl, PipelineResult};
pub use step::{Handler, SkipCondition, StepDef};
