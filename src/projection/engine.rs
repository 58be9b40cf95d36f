//! Core projection engine for retirement accumulation
//!
//! Compounds current balances and monthly contributions forward per asset
//! class at the adjusted net-of-fee return, month by month, emitting a
//! yearly schedule. Sustainable retirement income is the accumulation drawn
//! at the configured safe withdrawal rate, reported nominal and real, and
//! combined with the projected state pension for the replacement ratio.

use std::collections::BTreeMap;

use super::schedule::{ProjectionResult, ProjectionSummary, ProjectionYear};
use crate::assumptions::{real_value, AssetClass, Assumptions, InflationScenario, ReturnAssumptions};
use crate::math::{monthly_rate_from_annual_pct, safe_div};
use crate::profile::CanonicalInputs;
use crate::tax::NationalInsurance;

/// Projection horizon selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectionHorizon {
    /// Project to the profile's target retirement age
    #[default]
    ToRetirementAge,
    /// Fixed number of years
    Years(u32),
}

/// Configuration for a projection run
#[derive(Debug, Clone)]
pub struct ProjectionConfig {
    pub horizon: ProjectionHorizon,

    /// Safe withdrawal rate, percent per year
    pub withdrawal_rate_pct: f64,

    /// Scenario used for real-value output
    pub inflation_scenario: InflationScenario,

    /// Whether to emit the yearly schedule
    pub include_schedule: bool,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            horizon: ProjectionHorizon::ToRetirementAge,
            withdrawal_rate_pct: 4.0,
            inflation_scenario: InflationScenario::Moderate,
            include_schedule: true,
        }
    }
}

/// Main projection engine
pub struct ProjectionEngine {
    assumptions: Assumptions,
    config: ProjectionConfig,
}

impl ProjectionEngine {
    /// Create a new projection engine with given assumptions and config
    pub fn new(assumptions: Assumptions, config: ProjectionConfig) -> Self {
        Self {
            assumptions,
            config,
        }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    fn horizon_years(&self, inputs: &CanonicalInputs) -> u32 {
        match self.config.horizon {
            ProjectionHorizon::ToRetirementAge => inputs.years_to_retirement(),
            ProjectionHorizon::Years(years) => years,
        }
    }

    /// Run the projection for one profile
    pub fn project(
        &self,
        inputs: &CanonicalInputs,
        returns: &ReturnAssumptions,
    ) -> ProjectionResult {
        let horizon_years = self.horizon_years(inputs);
        let inflation_rate = self
            .assumptions
            .inflation
            .rate(self.config.inflation_scenario);

        // Per-class monthly rates at the adjusted return net of fees
        let mut balances: BTreeMap<AssetClass, f64> = BTreeMap::new();
        let mut rates: BTreeMap<AssetClass, f64> = BTreeMap::new();
        for asset in AssetClass::ALL {
            balances.insert(asset, inputs.balance(asset));
            let net_annual = returns.adjusted(asset) - inputs.annual_fee(asset);
            rates.insert(asset, monthly_rate_from_annual_pct(net_annual));
        }

        let mut years = Vec::new();
        let mut total_contributions = 0.0;
        let mut total_growth = 0.0;

        for year in 1..=horizon_years {
            let mut year_contributions = 0.0;
            let mut year_growth = 0.0;

            for _month in 0..12 {
                for asset in AssetClass::ALL {
                    let rate = rates[&asset];
                    let balance = balances[&asset];
                    let growth = balance * rate;
                    let contribution = inputs.monthly_contribution(asset);

                    // Growth on the opening balance, contribution at month end
                    balances.insert(asset, balance + growth + contribution);
                    year_growth += growth;
                    year_contributions += contribution;
                }
            }

            total_contributions += year_contributions;
            total_growth += year_growth;

            if self.config.include_schedule {
                let total: f64 = balances.values().sum();
                years.push(ProjectionYear {
                    year,
                    age: inputs.age + year,
                    contributions: year_contributions,
                    growth: year_growth,
                    pension_balance: balances[&AssetClass::Pension],
                    training_fund_balance: balances[&AssetClass::TrainingFund],
                    personal_portfolio_balance: balances[&AssetClass::PersonalPortfolio],
                    real_estate_balance: balances[&AssetClass::RealEstate],
                    crypto_balance: balances[&AssetClass::Crypto],
                    cash_balance: balances[&AssetClass::Cash],
                    total_balance: total,
                    real_total_balance: real_value(total, inflation_rate, year as f64, true),
                });
            }
        }

        let nominal_accumulation: f64 = balances.values().sum();
        let real_accumulation = real_value(
            nominal_accumulation,
            inflation_rate,
            horizon_years as f64,
            true,
        );

        let monthly_income_nominal =
            nominal_accumulation * self.config.withdrawal_rate_pct / 100.0 / 12.0;
        let monthly_income_real = real_accumulation * self.config.withdrawal_rate_pct / 100.0 / 12.0;

        let country = self.assumptions.countries.get(&inputs.country);
        let state_pension = NationalInsurance::new(country.clone())
            .project_retirement_pension(inputs)
            .pension
            .monthly_amount;

        let combined = monthly_income_nominal + state_pension;

        ProjectionResult {
            years,
            summary: ProjectionSummary {
                horizon_years,
                retirement_age: inputs.age + horizon_years,
                inflation_scenario: self.config.inflation_scenario,
                inflation_rate_pct: inflation_rate,
                withdrawal_rate_pct: self.config.withdrawal_rate_pct,
                total_contributions,
                total_growth,
                nominal_accumulation,
                real_accumulation,
                monthly_income_nominal,
                monthly_income_real,
                projected_state_pension: state_pension,
                combined_monthly_income: combined,
                replacement_ratio_pct: safe_div(
                    combined,
                    inputs.gross_monthly_income,
                    "replacement ratio",
                ) * 100.0,
            },
        }
    }

    /// Years until net savings reach a target amount, at the balance-weighted
    /// adjusted return. 0 when already reached; infinite when the household
    /// saves nothing each month (never negative or NaN).
    pub fn years_to_goal(
        &self,
        inputs: &CanonicalInputs,
        returns: &ReturnAssumptions,
        goal: f64,
    ) -> f64 {
        let current = inputs.total_assets();
        if current >= goal {
            return 0.0;
        }

        let monthly_savings = inputs.net_monthly_savings();
        if monthly_savings <= 0.0 {
            return f64::INFINITY;
        }

        let annual = weighted_return(inputs, returns);
        let i = monthly_rate_from_annual_pct(annual);
        let months = if i <= 0.0 {
            (goal - current) / monthly_savings
        } else {
            // Closed-form annuity solve for n
            let numerator = goal * i + monthly_savings;
            let denominator = current * i + monthly_savings;
            (numerator / denominator).ln() / (1.0 + i).ln()
        };

        months / 12.0
    }
}

/// Balance-weighted average adjusted return across held classes.
/// An empty portfolio falls back to the personal-portfolio return.
fn weighted_return(inputs: &CanonicalInputs, returns: &ReturnAssumptions) -> f64 {
    let total = inputs.total_assets();
    if total <= 0.0 {
        return returns.adjusted(AssetClass::PersonalPortfolio);
    }

    AssetClass::ALL
        .iter()
        .map(|&asset| inputs.balance(asset) * returns.adjusted(asset))
        .sum::<f64>()
        / total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{normalize, FinancialProfile};

    fn engine(config: ProjectionConfig) -> ProjectionEngine {
        ProjectionEngine::new(Assumptions::default_2025(), config)
    }

    fn pension_only_profile() -> CanonicalInputs {
        normalize(&FinancialProfile {
            current_age: Some(40),
            target_retirement_age: Some(50),
            gross_monthly_salary: Some(20_000.0),
            total_monthly_expenses: Some(12_000.0),
            pension_savings: Some(100_000.0),
            pension_contribution_rate: Some(17.5),
            training_fund_contribution_rate: Some(0.0),
            ..Default::default()
        })
    }

    #[test]
    fn test_matches_closed_form_future_value() {
        let engine = engine(ProjectionConfig::default());
        let inputs = pension_only_profile();
        let returns = Assumptions::default_2025().glide.adjust(
            &Assumptions::default_2025().returns,
            inputs.age,
            inputs.years_to_retirement(),
            inputs.risk_tolerance,
        );
        let result = engine.project(&inputs, &returns);

        // Pension is the only funded class; compare against the closed-form
        // FV of balance plus an end-of-month annuity
        let net_annual = returns.adjusted(AssetClass::Pension) - inputs.pension_annual_fee;
        let i = monthly_rate_from_annual_pct(net_annual);
        let n = 120;
        let factor = (1.0 + i).powi(n);
        let pmt = inputs.monthly_contribution(AssetClass::Pension);
        let expected = 100_000.0 * factor + pmt * (factor - 1.0) / i;

        let last = result.years.last().unwrap();
        assert!(
            (last.pension_balance - expected).abs() < 1.0,
            "schedule {} vs closed form {}",
            last.pension_balance,
            expected
        );
        assert_eq!(result.years.len(), 10);
        assert_eq!(last.age, 50);
    }

    #[test]
    fn test_summary_income_and_replacement() {
        let engine = engine(ProjectionConfig::default());
        let inputs = pension_only_profile();
        let assumptions = Assumptions::default_2025();
        let returns = assumptions.glide.adjust(
            &assumptions.returns,
            inputs.age,
            inputs.years_to_retirement(),
            inputs.risk_tolerance,
        );
        let result = engine.project(&inputs, &returns);
        let summary = &result.summary;

        assert!(summary.nominal_accumulation > 100_000.0);
        assert!(summary.real_accumulation < summary.nominal_accumulation);
        assert!(
            (summary.monthly_income_nominal
                - summary.nominal_accumulation * 0.04 / 12.0)
                .abs()
                < 1e-6
        );
        assert!(summary.combined_monthly_income > summary.monthly_income_nominal);
        assert!(summary.replacement_ratio_pct > 0.0);
    }

    #[test]
    fn test_zero_horizon_reports_current_assets() {
        let engine = engine(ProjectionConfig::default());
        let inputs = normalize(&FinancialProfile {
            current_age: Some(70),
            target_retirement_age: Some(67),
            gross_monthly_salary: Some(10_000.0),
            pension_savings: Some(500_000.0),
            ..Default::default()
        });
        let assumptions = Assumptions::default_2025();
        let returns = assumptions.glide.adjust(&assumptions.returns, 70, 0, inputs.risk_tolerance);
        let result = engine.project(&inputs, &returns);

        assert!(result.years.is_empty());
        assert_eq!(result.summary.horizon_years, 0);
        assert!((result.summary.nominal_accumulation - 500_000.0).abs() < 1e-9);
        assert_eq!(result.summary.real_accumulation, result.summary.nominal_accumulation);
    }

    #[test]
    fn test_years_to_goal_edge_cases() {
        let engine = engine(ProjectionConfig::default());
        let assumptions = Assumptions::default_2025();
        let inputs = pension_only_profile();
        let returns = assumptions.glide.adjust(
            &assumptions.returns,
            inputs.age,
            inputs.years_to_retirement(),
            inputs.risk_tolerance,
        );

        // Already reached
        assert_eq!(engine.years_to_goal(&inputs, &returns, 50_000.0), 0.0);

        // Overspending household never reaches the goal
        let broke = normalize(&FinancialProfile {
            current_age: Some(40),
            gross_monthly_salary: Some(10_000.0),
            total_monthly_expenses: Some(11_000.0),
            ..Default::default()
        });
        let years = engine.years_to_goal(&broke, &returns, 1_000_000.0);
        assert!(years.is_infinite() && years > 0.0);

        // Normal case is finite and positive
        let years = engine.years_to_goal(&inputs, &returns, 1_000_000.0);
        assert!(years.is_finite());
        assert!(years > 0.0);
    }

    #[test]
    fn test_fixed_horizon_config() {
        let engine = engine(ProjectionConfig {
            horizon: ProjectionHorizon::Years(5),
            include_schedule: false,
            ..Default::default()
        });
        let inputs = pension_only_profile();
        let assumptions = Assumptions::default_2025();
        let returns = assumptions.glide.adjust(
            &assumptions.returns,
            inputs.age,
            inputs.years_to_retirement(),
            inputs.risk_tolerance,
        );
        let result = engine.project(&inputs, &returns);

        assert!(result.years.is_empty());
        assert_eq!(result.summary.horizon_years, 5);
        assert!(result.summary.nominal_accumulation > 100_000.0);
    }
}
