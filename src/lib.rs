//! Retirement Planner - Financial health scoring and retirement projection engine
//!
//! This library provides:
//! - Profile normalization across legacy field-name generations
//! - Country-specific social-insurance contributions, pensions and benefits
//! - Age/risk/horizon-adjusted return assumptions and inflation scenarios
//! - Accumulation projections with sustainable-withdrawal income
//! - Eight-factor financial health scoring with ranked suggestions
//! - Tax-aware portfolio rebalancing analysis

pub mod assumptions;
pub mod math;
pub mod profile;
pub mod projection;
pub mod rebalancing;
pub mod scenario;
pub mod scoring;
pub mod tax;

// Re-export commonly used types
pub use assumptions::{Assumptions, GlidePath, InflationScenario, ReturnModel};
pub use profile::{normalize, CanonicalInputs, FinancialProfile};
pub use projection::{ProjectionConfig, ProjectionEngine, ProjectionResult};
pub use rebalancing::{RebalancingAnalysis, RebalancingAnalyzer};
pub use scenario::ScenarioRunner;
pub use scoring::{HealthReport, HealthScorer, ScoreOptions};
pub use tax::NationalInsurance;
