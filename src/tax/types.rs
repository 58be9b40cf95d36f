//! Value types produced by the social-insurance calculators

use serde::Serialize;

/// Employment basis for contribution withholding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EmploymentType {
    #[default]
    Employee,
    SelfEmployed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MaritalStatus {
    #[default]
    Single,
    Married,
    Widowed,
}

/// Insured-person context consumed by the benefit calculators.
/// Built by and used within the tax module only.
#[derive(Debug, Clone)]
pub struct SocialInsuranceProfile {
    /// Months of insurance contributions accumulated
    pub contribution_months: u32,
    /// Personal average monthly insured income (capped at the country
    /// ceiling by the calculators)
    pub average_insured_income: f64,
    pub marital_status: MaritalStatus,
    pub dependent_children: u32,
    /// Current monthly income, input to the income tests
    pub current_monthly_income: f64,
    /// Medical disability degree, percent; 0 when not relevant
    pub disability_degree_pct: f64,
}

impl Default for SocialInsuranceProfile {
    fn default() -> Self {
        Self {
            contribution_months: 0,
            average_insured_income: 0.0,
            marital_status: MaritalStatus::Single,
            dependent_children: 0,
            current_monthly_income: 0.0,
            disability_degree_pct: 0.0,
        }
    }
}

/// One contribution band of a withholding breakdown
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionBand {
    pub from: f64,
    pub to: f64,
    pub rate_pct: f64,
    pub amount: f64,
}

/// Monthly social-insurance withholding breakdown
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionBreakdown {
    pub monthly_income: f64,
    /// Income actually subject to contributions (capped at the ceiling)
    pub insured_income: f64,
    pub bands: Vec<ContributionBand>,
    pub total_monthly: f64,
    /// Total as a percentage of gross monthly income
    pub effective_rate_pct: f64,
    /// Exempt slice above the ceiling; 0 when income is under it
    pub income_above_ceiling: f64,
}

/// Old-age pension entitlement. Ineligibility is a value, not an error.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PensionResult {
    pub eligible: bool,
    pub reason: Option<String>,
    /// Months still needed to qualify; 0 when eligible
    pub shortfall_months: u32,
    /// Accrued pension percentage of the wage base
    pub pension_pct: f64,
    /// Blended national/personal wage base
    pub wage_base: f64,
    pub monthly_amount: f64,
}

impl PensionResult {
    /// Closed result for an insured person short of the minimum months
    pub fn ineligible(reason: String, shortfall_months: u32) -> Self {
        Self {
            eligible: false,
            reason: Some(reason),
            shortfall_months,
            pension_pct: 0.0,
            wage_base: 0.0,
            monthly_amount: 0.0,
        }
    }
}

/// A means-tested flat benefit (income guarantee, senior supplement)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeansTestedBenefit {
    pub nominal_monthly: f64,
    /// Reduction actually applied after flooring
    pub reduction: f64,
    pub monthly_amount: f64,
    pub floor_applied: bool,
}

/// Survivor or disability benefit result
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenefitResult {
    pub eligible: bool,
    pub reason: Option<String>,
    pub shortfall_months: u32,
    /// Base-rate amount before allowances and tests
    pub base_amount: f64,
    pub child_allowance: f64,
    /// Income-test reduction actually applied after flooring
    pub income_reduction: f64,
    pub floor_applied: bool,
    pub monthly_amount: f64,
}

impl BenefitResult {
    pub fn ineligible(reason: String, shortfall_months: u32) -> Self {
        Self {
            eligible: false,
            reason: Some(reason),
            shortfall_months,
            base_amount: 0.0,
            child_allowance: 0.0,
            income_reduction: 0.0,
            floor_applied: false,
            monthly_amount: 0.0,
        }
    }
}

/// Projected state pension at retirement for a current profile
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PensionProjection {
    /// Contribution months projected by retirement age
    pub projected_contribution_months: u32,
    pub pension: PensionResult,
    /// State pension as a percentage of current gross monthly income
    pub replacement_ratio_pct: f64,
}
