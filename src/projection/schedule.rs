//! Projection output structures

use serde::Serialize;

use crate::assumptions::{AssetClass, InflationScenario};

/// A single row of projection output for one year
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionYear {
    /// Projection year, 1-indexed
    pub year: u32,
    /// Attained age at the end of the year
    pub age: u32,

    /// Contributions paid in during the year
    pub contributions: f64,
    /// Investment growth credited during the year, net of fees
    pub growth: f64,

    // End-of-year balances
    pub pension_balance: f64,
    pub training_fund_balance: f64,
    pub personal_portfolio_balance: f64,
    pub real_estate_balance: f64,
    pub crypto_balance: f64,
    pub cash_balance: f64,
    pub total_balance: f64,
    /// Total deflated to today's money under the configured scenario
    pub real_total_balance: f64,
}

impl ProjectionYear {
    pub fn balance(&self, asset: AssetClass) -> f64 {
        match asset {
            AssetClass::Pension => self.pension_balance,
            AssetClass::TrainingFund => self.training_fund_balance,
            AssetClass::PersonalPortfolio => self.personal_portfolio_balance,
            AssetClass::RealEstate => self.real_estate_balance,
            AssetClass::Crypto => self.crypto_balance,
            AssetClass::Cash => self.cash_balance,
        }
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionSummary {
    pub horizon_years: u32,
    pub retirement_age: u32,
    pub inflation_scenario: InflationScenario,
    pub inflation_rate_pct: f64,
    pub withdrawal_rate_pct: f64,

    pub total_contributions: f64,
    pub total_growth: f64,
    pub nominal_accumulation: f64,
    pub real_accumulation: f64,

    /// Sustainable monthly drawdown at the withdrawal rate
    pub monthly_income_nominal: f64,
    pub monthly_income_real: f64,
    /// State pension projected by the social-insurance calculator
    pub projected_state_pension: f64,
    /// Drawdown income plus state pension
    pub combined_monthly_income: f64,
    /// Combined income as a percentage of current gross monthly income
    pub replacement_ratio_pct: f64,
}

/// Complete projection result
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    /// Yearly schedule; empty when the schedule was not requested
    pub years: Vec<ProjectionYear>,
    pub summary: ProjectionSummary,
}

impl ProjectionResult {
    /// Balance trajectory for one class across the schedule
    pub fn trajectory(&self, asset: AssetClass) -> Vec<f64> {
        self.years.iter().map(|y| y.balance(asset)).collect()
    }

    /// First year the total balance reaches the given amount
    pub fn first_year_reaching(&self, amount: f64) -> Option<u32> {
        self.years
            .iter()
            .find(|y| y.total_balance >= amount)
            .map(|y| y.year)
    }
}
