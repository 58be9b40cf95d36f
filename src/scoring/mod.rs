//! Financial health scoring engine
//!
//! Eight weighted factors, each scaled to its weight and summed into a
//! 0-100 total. The scorer is a pure function of the profile snapshot and
//! the injected assumption tables: it normalizes, adjusts returns, projects
//! accumulation and derives every factor fresh on each call.

mod factors;
mod report;

pub use report::{
    FactorDetails, FactorKind, FactorScore, HealthReport, PeerComparison, ScoreStatus,
    Suggestion, SuggestionPriority,
};

use crate::assumptions::{Assumptions, InflationScenario};
use crate::profile::{normalize, FinancialProfile};
use crate::projection::{ProjectionConfig, ProjectionEngine, ProjectionHorizon};

/// Factor weights; the canonical scheme sums to 100
#[derive(Debug, Clone)]
pub struct FactorWeights {
    pub savings_rate: f64,
    pub retirement_readiness: f64,
    pub time_horizon: f64,
    pub risk_alignment: f64,
    pub diversification: f64,
    pub tax_efficiency: f64,
    pub emergency_fund: f64,
    pub debt_management: f64,
}

impl Default for FactorWeights {
    fn default() -> Self {
        Self {
            savings_rate: 25.0,
            retirement_readiness: 20.0,
            time_horizon: 15.0,
            risk_alignment: 12.0,
            diversification: 10.0,
            tax_efficiency: 8.0,
            emergency_fund: 7.0,
            debt_management: 3.0,
        }
    }
}

impl FactorWeights {
    pub fn total(&self) -> f64 {
        self.savings_rate
            + self.retirement_readiness
            + self.time_horizon
            + self.risk_alignment
            + self.diversification
            + self.tax_efficiency
            + self.emergency_fund
            + self.debt_management
    }
}

/// One age band of peer medians
#[derive(Debug, Clone)]
pub struct PeerBand {
    pub min_age: u32,
    /// Inclusive; the last band is open-ended
    pub max_age: u32,
    pub median_savings_rate_pct: f64,
    pub median_emergency_fund_months: f64,
    pub median_total_score: f64,
}

impl PeerBand {
    pub fn label(&self) -> String {
        if self.max_age >= 120 {
            format!("{}+", self.min_age)
        } else {
            format!("{}-{}", self.min_age, self.max_age)
        }
    }
}

/// Benchmarks and weights behind the factor algorithms
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    pub weights: FactorWeights,

    /// Contribution rate earning full savings-rate marks, percent
    pub savings_rate_benchmark_pct: f64,
    /// Retirement goal as a multiple of annual expenses
    pub retirement_goal_expense_multiple: f64,
    /// Years of runway earning full time-horizon marks
    pub time_horizon_benchmark_years: f64,
    /// Equity gap (percentage points) at which risk alignment hits zero
    pub risk_alignment_gap_scale_pp: f64,
    /// Largest-class share that triggers the concentration penalty, percent
    pub concentration_threshold_pct: f64,
    /// Multiplier applied to the diversification score when concentrated
    pub concentration_penalty: f64,
    /// Statutory contribution rates defining the tax-advantaged room, percent
    pub statutory_pension_rate_pct: f64,
    pub statutory_training_fund_rate_pct: f64,
    /// Months of expenses earning full emergency-fund marks
    pub emergency_fund_benchmark_months: f64,
    /// Debt-to-income ratio at which the debt score reaches zero
    pub debt_ratio_ceiling: f64,

    pub peer_bands: Vec<PeerBand>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: FactorWeights::default(),
            savings_rate_benchmark_pct: 20.0,
            retirement_goal_expense_multiple: 20.0,
            time_horizon_benchmark_years: 30.0,
            risk_alignment_gap_scale_pp: 50.0,
            concentration_threshold_pct: 70.0,
            concentration_penalty: 0.5,
            statutory_pension_rate_pct: 17.5,
            statutory_training_fund_rate_pct: 7.5,
            emergency_fund_benchmark_months: 6.0,
            debt_ratio_ceiling: 0.4,
            peer_bands: vec![
                PeerBand { min_age: 18, max_age: 24, median_savings_rate_pct: 8.0, median_emergency_fund_months: 1.5, median_total_score: 48.0 },
                PeerBand { min_age: 25, max_age: 34, median_savings_rate_pct: 12.0, median_emergency_fund_months: 2.5, median_total_score: 55.0 },
                PeerBand { min_age: 35, max_age: 44, median_savings_rate_pct: 15.0, median_emergency_fund_months: 3.5, median_total_score: 61.0 },
                PeerBand { min_age: 45, max_age: 54, median_savings_rate_pct: 18.0, median_emergency_fund_months: 4.0, median_total_score: 64.0 },
                PeerBand { min_age: 55, max_age: 64, median_savings_rate_pct: 20.0, median_emergency_fund_months: 4.5, median_total_score: 66.0 },
                PeerBand { min_age: 65, max_age: 120, median_savings_rate_pct: 16.0, median_emergency_fund_months: 5.0, median_total_score: 63.0 },
            ],
        }
    }
}

impl ScoringConfig {
    fn band_for(&self, age: u32) -> Option<&PeerBand> {
        self.peer_bands
            .iter()
            .find(|b| age >= b.min_age && age <= b.max_age)
    }
}

/// Per-call scoring options
#[derive(Debug, Clone)]
pub struct ScoreOptions {
    /// Include the peer-comparison block
    pub peer_comparison: bool,
    /// Safe withdrawal rate behind the readiness projection, percent
    pub withdrawal_rate_pct: f64,
    /// Scenario for the real-value projection figures
    pub inflation_scenario: InflationScenario,
}

impl Default for ScoreOptions {
    fn default() -> Self {
        Self {
            peer_comparison: true,
            withdrawal_rate_pct: 4.0,
            inflation_scenario: InflationScenario::Moderate,
        }
    }
}

/// The scoring engine
pub struct HealthScorer {
    assumptions: Assumptions,
    options: ScoreOptions,
}

impl HealthScorer {
    pub fn new(assumptions: Assumptions, options: ScoreOptions) -> Self {
        Self {
            assumptions,
            options,
        }
    }

    /// Score one profile. Always produces a report; degenerate inputs
    /// surface as zero-scored factors and diagnostic flags.
    pub fn score(&self, profile: &FinancialProfile) -> HealthReport {
        let inputs = normalize(profile);
        let config = &self.assumptions.scoring;

        let returns = self.assumptions.glide.adjust(
            &self.assumptions.returns,
            inputs.age,
            inputs.years_to_retirement(),
            inputs.risk_tolerance,
        );

        let engine = ProjectionEngine::new(
            self.assumptions.clone(),
            ProjectionConfig {
                horizon: ProjectionHorizon::ToRetirementAge,
                withdrawal_rate_pct: self.options.withdrawal_rate_pct,
                inflation_scenario: self.options.inflation_scenario,
                include_schedule: false,
            },
        );
        let projection = engine.project(&inputs, &returns).summary;

        let country = self.assumptions.countries.get(&inputs.country);

        let factor_scores = vec![
            factors::savings_rate(&inputs, config),
            factors::retirement_readiness(&inputs, config, &projection),
            factors::time_horizon(&inputs, config),
            factors::risk_alignment(&inputs, config),
            factors::diversification(&inputs, config),
            factors::tax_efficiency(&inputs, config, country),
            factors::emergency_fund(&inputs, config),
            factors::debt_management(&inputs, config),
        ];

        let total_score: f64 = factor_scores.iter().map(|f| f.score).sum();
        let suggestions = build_suggestions(&factor_scores);
        let peer_comparison = if self.options.peer_comparison {
            self.peer_block(&factor_scores, inputs.age, total_score)
        } else {
            None
        };

        HealthReport {
            total_score,
            status: ScoreStatus::from_achieved(total_score / 100.0),
            factors: factor_scores,
            suggestions,
            peer_comparison,
            warnings: inputs.warnings.clone(),
            missing_fields: inputs.missing_fields.clone(),
            projection,
            country: inputs.country.clone(),
        }
    }

    fn peer_block(
        &self,
        factors: &[FactorScore],
        age: u32,
        total_score: f64,
    ) -> Option<PeerComparison> {
        let band = self.assumptions.scoring.band_for(age)?;

        let user_savings_rate = factors.iter().find_map(|f| match f.details {
            FactorDetails::SavingsRate { rate_pct, .. } => Some(rate_pct),
            _ => None,
        })?;
        let user_months = factors.iter().find_map(|f| match f.details {
            FactorDetails::EmergencyFund { months_covered, .. } => Some(months_covered),
            _ => None,
        })?;

        Some(PeerComparison {
            age_band: band.label(),
            median_savings_rate_pct: band.median_savings_rate_pct,
            median_emergency_fund_months: band.median_emergency_fund_months,
            median_total_score: band.median_total_score,
            user_savings_rate_pct: user_savings_rate,
            user_emergency_fund_months: user_months,
            user_total_score: total_score,
        })
    }
}

/// Suggestions for every factor under the fair threshold, ranked by the
/// score points they could recover
fn build_suggestions(factors: &[FactorScore]) -> Vec<Suggestion> {
    let mut suggestions: Vec<Suggestion> = factors
        .iter()
        .filter(|f| f.achieved() < ScoreStatus::FAIR_THRESHOLD)
        .map(|f| Suggestion {
            factor: f.factor,
            priority: match f.status {
                ScoreStatus::Poor | ScoreStatus::Critical => SuggestionPriority::High,
                _ => SuggestionPriority::Medium,
            },
            message: suggestion_message(f),
            potential_gain: f.weight - f.score,
        })
        .collect();

    suggestions.sort_by(|a, b| {
        b.potential_gain
            .partial_cmp(&a.potential_gain)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    suggestions
}

fn suggestion_message(factor: &FactorScore) -> String {
    match &factor.details {
        FactorDetails::SavingsRate { rate_pct, benchmark_pct, .. } => format!(
            "Raise monthly retirement contributions: current rate {:.1}% of gross income, benchmark {:.0}%",
            rate_pct, benchmark_pct
        ),
        FactorDetails::RetirementReadiness { coverage_pct, .. } => format!(
            "Projected accumulation covers {:.0}% of the retirement goal; increase contributions or revisit the target",
            coverage_pct
        ),
        FactorDetails::TimeHorizon { years_to_retirement, .. } => format!(
            "Only {} years of planning runway left; consider adjusting the retirement age or savings pace",
            years_to_retirement
        ),
        FactorDetails::RiskAlignment { target_equity_pct, actual_equity_pct, .. } => format!(
            "Equity share {:.0}% is far from the age-implied {:.0}%; rebalance toward the target mix",
            actual_equity_pct, target_equity_pct
        ),
        FactorDetails::Diversification { active_classes, total_classes, .. } => format!(
            "Holdings span {} of {} asset classes; spread savings across more vehicles",
            active_classes, total_classes
        ),
        FactorDetails::TaxEfficiency { pension_utilization_pct, .. } => format!(
            "Only {:.0}% of the tax-advantaged contribution room is used; raise pension/training-fund rates",
            pension_utilization_pct
        ),
        FactorDetails::EmergencyFund { months_covered, benchmark_months } => format!(
            "Emergency fund covers {:.1} months of expenses; build toward {:.0} months",
            months_covered, benchmark_months
        ),
        FactorDetails::DebtManagement { debt_to_income_pct, .. } => format!(
            "Debt service consumes {:.0}% of gross income; prioritize paying it down",
            debt_to_income_pct
        ),
    }
}
