//! Retirement projection engine and output schedule

mod engine;
mod schedule;

pub use engine::{ProjectionConfig, ProjectionEngine, ProjectionHorizon};
pub use schedule::{ProjectionResult, ProjectionSummary, ProjectionYear};
