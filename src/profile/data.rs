//! Raw financial-profile structures matching the wizard's JSON payload
//!
//! The wire format is camelCase and has accumulated several generations of
//! field names for the same concept. Pure spelling variants are absorbed with
//! `#[serde(alias)]`; genuinely distinct legacy fields are kept as separate
//! options and resolved by the normalizer's ordered fallback chains.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Allocation percentages keyed by a free-form class label ("stocks",
/// "bonds", ...). BTreeMap keeps report output deterministically ordered.
pub type Allocation = BTreeMap<String, f64>;

/// Whether the profile describes one person or a couple
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanningMode {
    #[default]
    Individual,
    Couple,
}

impl PlanningMode {
    pub fn is_couple(&self) -> bool {
        matches!(self, PlanningMode::Couple)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanningMode::Individual => "individual",
            PlanningMode::Couple => "couple",
        }
    }
}

impl FromStr for PlanningMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "individual" | "single" => Ok(PlanningMode::Individual),
            "couple" => Ok(PlanningMode::Couple),
            other => Err(format!("unknown planning mode: {}", other)),
        }
    }
}

/// Self-declared investment risk appetite
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTolerance {
    Conservative,
    #[default]
    Moderate,
    Aggressive,
}

impl RiskTolerance {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTolerance::Conservative => "conservative",
            RiskTolerance::Moderate => "moderate",
            RiskTolerance::Aggressive => "aggressive",
        }
    }
}

impl FromStr for RiskTolerance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "conservative" => Ok(RiskTolerance::Conservative),
            "moderate" => Ok(RiskTolerance::Moderate),
            "aggressive" => Ok(RiskTolerance::Aggressive),
            other => Err(format!("unknown risk tolerance: {}", other)),
        }
    }
}

impl fmt::Display for RiskTolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Monthly expense breakdown by category
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExpenseBreakdown {
    pub housing: Option<f64>,
    pub transportation: Option<f64>,
    pub food: Option<f64>,
    pub insurance: Option<f64>,
    pub education: Option<f64>,
    pub other: Option<f64>,
}

impl ExpenseBreakdown {
    /// Sum of provided categories; None when no category was filled in.
    pub fn total(&self) -> Option<f64> {
        let parts = [
            self.housing,
            self.transportation,
            self.food,
            self.insurance,
            self.education,
            self.other,
        ];
        if parts.iter().all(|p| p.is_none()) {
            return None;
        }
        Some(parts.iter().flatten().sum())
    }
}

/// A raw financial profile as submitted by the planner UI
///
/// Every field is optional: absence is a legitimate state that the
/// normalizer resolves to a documented default, never an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FinancialProfile {
    pub planning_mode: PlanningMode,

    /// Country key into the parameter tables ("israel", "uk", "us", ...)
    pub country: Option<String>,

    pub current_age: Option<u32>,

    #[serde(alias = "retirementAge")]
    pub target_retirement_age: Option<u32>,

    // --- Income (individual mode) ---
    /// Gross monthly salary; "monthlySalary" is an accepted spelling
    #[serde(alias = "monthlySalary")]
    pub gross_monthly_salary: Option<f64>,

    /// Legacy field that predates the gross/net split
    pub current_salary: Option<f64>,

    #[serde(alias = "takeHomeSalary")]
    pub net_monthly_salary: Option<f64>,

    /// Legacy net-salary field
    pub current_net_salary: Option<f64>,

    // --- Additional income (household level in both modes) ---
    pub annual_bonus: Option<f64>,

    #[serde(alias = "annualRsu")]
    pub annual_rsu_value: Option<f64>,

    /// Legacy quarterly vesting figure; normalizer multiplies by 4
    #[serde(alias = "quarterlyRsu")]
    pub quarterly_rsu_value: Option<f64>,

    pub freelance_monthly_income: Option<f64>,
    pub rental_monthly_income: Option<f64>,
    pub dividend_monthly_income: Option<f64>,

    // --- Partner income (couple mode) ---
    pub partner1_salary: Option<f64>,
    pub partner2_salary: Option<f64>,
    pub partner1_net_salary: Option<f64>,
    pub partner2_net_salary: Option<f64>,

    // --- Expenses ---
    pub expenses: Option<ExpenseBreakdown>,

    /// Legacy flat monthly total used before the category breakdown existed
    #[serde(alias = "currentMonthlyExpenses")]
    pub total_monthly_expenses: Option<f64>,

    // --- Balances by asset class (individual mode / household level) ---
    #[serde(alias = "currentPensionSavings")]
    pub pension_savings: Option<f64>,

    /// Legacy field; historically meant the pension accumulation
    pub current_savings: Option<f64>,

    #[serde(alias = "currentTrainingFund", alias = "trainingFundValue")]
    pub training_fund: Option<f64>,

    #[serde(alias = "currentPersonalPortfolio")]
    pub personal_portfolio: Option<f64>,

    /// Legacy portfolio field
    pub current_investments: Option<f64>,

    #[serde(alias = "currentRealEstate")]
    pub real_estate: Option<f64>,

    #[serde(alias = "currentCrypto", alias = "cryptoFiatValue")]
    pub crypto: Option<f64>,

    #[serde(alias = "currentEmergencyFund")]
    pub emergency_fund: Option<f64>,

    /// Legacy cash field
    pub current_bank_account: Option<f64>,

    // --- Partner balances (couple mode) ---
    pub partner1_pension_savings: Option<f64>,
    pub partner2_pension_savings: Option<f64>,
    pub partner1_training_fund: Option<f64>,
    pub partner2_training_fund: Option<f64>,
    pub partner1_personal_portfolio: Option<f64>,
    pub partner2_personal_portfolio: Option<f64>,

    // --- Contribution rates and fees (percent) ---
    #[serde(alias = "pensionDepositRate")]
    pub pension_contribution_rate: Option<f64>,

    #[serde(alias = "trainingFundDepositRate")]
    pub training_fund_contribution_rate: Option<f64>,

    pub pension_management_fee: Option<f64>,
    pub training_fund_management_fee: Option<f64>,

    // --- Planning preferences ---
    pub risk_tolerance: Option<RiskTolerance>,

    /// Target allocation percentages by class label (should sum to 100)
    pub target_allocation: Option<Allocation>,

    /// Current allocation percentages by class label (should sum to 100)
    pub current_allocation: Option<Allocation>,

    pub last_rebalance_date: Option<NaiveDate>,

    #[serde(alias = "monthlyDebtPayment")]
    pub monthly_debt_payments: Option<f64>,
}
