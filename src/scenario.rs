//! Scenario runner for batch scoring and projections
//!
//! Pre-loads assumptions once, then allows scoring many profiles or
//! projecting one profile across inflation scenarios without re-reading
//! CSV files.

use chrono::NaiveDate;
use std::path::Path;

use crate::assumptions::{Assumptions, AssumptionsError, InflationScenario};
use crate::profile::{normalize, FinancialProfile};
use crate::projection::{ProjectionConfig, ProjectionEngine, ProjectionResult};
use crate::rebalancing::{RebalancingAnalysis, RebalancingAnalyzer};
use crate::scoring::{HealthReport, HealthScorer, ScoreOptions};

/// Pre-loaded scenario runner
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::from_csv()?;
///
/// // Score many profiles against the same tables
/// for profile in &profiles {
///     let report = runner.score(profile, ScoreOptions::default());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    /// Pre-loaded base assumptions
    base_assumptions: Assumptions,
}

impl ScenarioRunner {
    /// Create runner with the built-in 2025 tables
    pub fn new() -> Self {
        Self {
            base_assumptions: Assumptions::default_2025(),
        }
    }

    /// Create runner with CSV overrides from the default data directory
    pub fn from_csv() -> Result<Self, AssumptionsError> {
        Ok(Self {
            base_assumptions: Assumptions::from_csv()?,
        })
    }

    /// Create runner with CSV overrides from a specific directory
    pub fn from_csv_path(path: &Path) -> Result<Self, AssumptionsError> {
        Ok(Self {
            base_assumptions: Assumptions::from_csv_path(path)?,
        })
    }

    /// Create runner with pre-built assumptions
    pub fn with_assumptions(assumptions: Assumptions) -> Self {
        Self {
            base_assumptions: assumptions,
        }
    }

    /// Score a single profile
    pub fn score(&self, profile: &FinancialProfile, options: ScoreOptions) -> HealthReport {
        let scorer = HealthScorer::new(self.base_assumptions.clone(), options);
        scorer.score(profile)
    }

    /// Score multiple profiles with the same options
    pub fn score_batch(
        &self,
        profiles: &[FinancialProfile],
        options: &ScoreOptions,
    ) -> Vec<HealthReport> {
        let scorer = HealthScorer::new(self.base_assumptions.clone(), options.clone());
        profiles.iter().map(|p| scorer.score(p)).collect()
    }

    /// Project a single profile with the given config
    pub fn project(&self, profile: &FinancialProfile, config: ProjectionConfig) -> ProjectionResult {
        let inputs = normalize(profile);
        let returns = self.base_assumptions.glide.adjust(
            &self.base_assumptions.returns,
            inputs.age,
            inputs.years_to_retirement(),
            inputs.risk_tolerance,
        );
        let engine = ProjectionEngine::new(self.base_assumptions.clone(), config);
        engine.project(&inputs, &returns)
    }

    /// Project one profile under every named inflation scenario
    pub fn project_scenarios(
        &self,
        profile: &FinancialProfile,
        base_config: ProjectionConfig,
    ) -> Vec<(InflationScenario, ProjectionResult)> {
        InflationScenario::ALL
            .iter()
            .map(|&scenario| {
                let config = ProjectionConfig {
                    inflation_scenario: scenario,
                    ..base_config.clone()
                };
                (scenario, self.project(profile, config))
            })
            .collect()
    }

    /// Run the rebalancing analyzer on a profile's allocation sets
    ///
    /// Absent allocation sets are treated as empty and surface through the
    /// analysis warnings rather than failing.
    pub fn analyze(&self, profile: &FinancialProfile, as_of: NaiveDate) -> RebalancingAnalysis {
        let inputs = normalize(profile);
        let country = self.base_assumptions.countries.get(&inputs.country).clone();
        let analyzer = RebalancingAnalyzer::new(self.base_assumptions.rebalancing.clone(), country);

        let current = profile.current_allocation.clone().unwrap_or_default();
        let target = profile.target_allocation.clone().unwrap_or_default();

        analyzer.analyze(
            &current,
            &target,
            profile.last_rebalance_date,
            as_of,
            inputs.total_assets(),
            inputs.risk_tolerance,
        )
    }

    /// Get reference to base assumptions for inspection
    pub fn assumptions(&self) -> &Assumptions {
        &self.base_assumptions
    }

    /// Get mutable reference to base assumptions for customization
    pub fn assumptions_mut(&mut self) -> &mut Assumptions {
        &mut self.base_assumptions
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}
