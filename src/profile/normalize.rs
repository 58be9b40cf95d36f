//! Profile normalization: legacy alias resolution and safe defaults
//!
//! Raw profiles arrive with several historical names for the same concept and
//! with arbitrary fields missing. Normalization resolves every logical field
//! through an ordered fallback chain, combines partner fields in couple mode,
//! and degrades absences to documented defaults instead of failing. Absences
//! that matter for scoring are recorded in `missing_fields` so a downstream
//! consumer can distinguish "computed zero" from "missing data".

use serde::Serialize;

use super::data::{Allocation, FinancialProfile, PlanningMode, RiskTolerance};
use crate::assumptions::AssetClass;

/// Combined statutory pension contribution rate default (percent).
pub const DEFAULT_PENSION_RATE: f64 = 17.5;

/// Training-fund contribution rate default (percent).
pub const DEFAULT_TRAINING_FUND_RATE: f64 = 7.5;

/// Default target retirement age.
pub const DEFAULT_RETIREMENT_AGE: u32 = 67;

/// Annual management fee defaults on accumulation (percent).
pub const DEFAULT_PENSION_FEE: f64 = 0.5;
pub const DEFAULT_TRAINING_FUND_FEE: f64 = 0.6;

/// Default current age when the profile omits it entirely.
pub const DEFAULT_CURRENT_AGE: u32 = 30;

/// Estimated take-home share of gross salary, used to derive whichever of
/// the gross/net pair is absent when the other is present.
pub const NET_TO_GROSS_RATIO: f64 = 0.75;

/// Allocation percentages must sum to 100 within this tolerance.
pub const ALLOCATION_SUM_TOLERANCE: f64 = 0.5;

/// Country table key used when the profile does not name one.
pub const DEFAULT_COUNTRY: &str = "israel";

/// Which allocation set a validation warning refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AllocationKind {
    Current,
    Target,
}

impl AllocationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AllocationKind::Current => "current",
            AllocationKind::Target => "target",
        }
    }
}

/// Structural problems surfaced alongside the computed result, never fixed up
/// silently. The caller decides whether to block on them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum ValidationWarning {
    /// An allocation set's percentages do not sum to 100 (±tolerance)
    AllocationSumInvalid { set: AllocationKind, sum: f64 },
    /// An allocation entry carries a negative percentage
    AllocationNegativePct { set: AllocationKind, class: String },
    /// A numeric field was negative and has been treated as zero
    NegativeValueZeroed { field: String },
}

/// Check an allocation set for structural validity. Violations are reported,
/// the set itself is left untouched.
pub fn validate_allocation(kind: AllocationKind, allocation: &Allocation) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    for (class, pct) in allocation {
        if *pct < 0.0 {
            warnings.push(ValidationWarning::AllocationNegativePct {
                set: kind,
                class: class.clone(),
            });
        }
    }

    let sum: f64 = allocation.values().sum();
    if (sum - 100.0).abs() > ALLOCATION_SUM_TOLERANCE {
        warnings.push(ValidationWarning::AllocationSumInvalid { set: kind, sum });
    }

    warnings
}

/// Flattened, fully resolved numeric view of a profile
///
/// All legacy aliases are collapsed, couple-mode fields are combined, and
/// every value is a plain non-negative number. This is the input every engine
/// component consumes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalInputs {
    pub mode: PlanningMode,
    pub country: String,
    pub age: u32,
    pub retirement_age: u32,

    /// Combined gross monthly salary (contribution base)
    pub gross_monthly_salary: f64,
    /// Salary plus annualized bonus/RSU and recurring extra income
    pub gross_monthly_income: f64,
    /// Combined net monthly income including recurring extras
    pub net_monthly_income: f64,
    pub monthly_expenses: f64,

    pub pension_balance: f64,
    pub training_fund_balance: f64,
    pub personal_portfolio_balance: f64,
    pub real_estate_balance: f64,
    pub crypto_balance: f64,
    pub cash_balance: f64,

    /// Contribution rates and annual management fees, percent
    pub pension_contribution_rate: f64,
    pub training_fund_contribution_rate: f64,
    pub pension_annual_fee: f64,
    pub training_fund_annual_fee: f64,

    pub risk_tolerance: RiskTolerance,

    pub monthly_debt_payments: f64,
    /// False when the profile carried no debt field at all (neutral score)
    pub has_debt_data: bool,

    /// Logical fields that could not be resolved from any alias
    pub missing_fields: Vec<String>,
    pub warnings: Vec<ValidationWarning>,
}

impl CanonicalInputs {
    pub fn years_to_retirement(&self) -> u32 {
        self.retirement_age.saturating_sub(self.age)
    }

    pub fn total_assets(&self) -> f64 {
        self.pension_balance
            + self.training_fund_balance
            + self.personal_portfolio_balance
            + self.real_estate_balance
            + self.crypto_balance
            + self.cash_balance
    }

    /// Balance held in a given asset class
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

    /// Monthly contribution flowing into a given asset class.
    /// Only pension and training fund receive salary-linked contributions.
    pub fn monthly_contribution(&self, asset: AssetClass) -> f64 {
        match asset {
            AssetClass::Pension => {
                self.gross_monthly_salary * self.pension_contribution_rate / 100.0
            }
            AssetClass::TrainingFund => {
                self.gross_monthly_salary * self.training_fund_contribution_rate / 100.0
            }
            _ => 0.0,
        }
    }

    /// Total monthly retirement contributions across classes
    pub fn total_monthly_contributions(&self) -> f64 {
        self.monthly_contribution(AssetClass::Pension)
            + self.monthly_contribution(AssetClass::TrainingFund)
    }

    /// Annual management fee for a class, percent of accumulation
    pub fn annual_fee(&self, asset: AssetClass) -> f64 {
        match asset {
            AssetClass::Pension => self.pension_annual_fee,
            AssetClass::TrainingFund => self.training_fund_annual_fee,
            _ => 0.0,
        }
    }

    /// Net income minus expenses; negative when the household overspends
    pub fn net_monthly_savings(&self) -> f64 {
        self.net_monthly_income - self.monthly_expenses
    }

    pub fn is_missing(&self, field: &str) -> bool {
        self.missing_fields.iter().any(|f| f == field)
    }
}

/// Ordered-fallback resolver: the declarative alias table of the normalizer.
/// Each call scans a candidate chain, takes the first present value, zeroes
/// negatives (with a warning), and optionally records full absence.
struct FieldResolver {
    missing_fields: Vec<String>,
    warnings: Vec<ValidationWarning>,
}

impl FieldResolver {
    fn new() -> Self {
        Self {
            missing_fields: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// First present candidate wins; absent chains fall back to `default`.
    /// `track_missing` controls whether full absence lands in missing_fields.
    fn resolve(
        &mut self,
        field: &'static str,
        candidates: &[Option<f64>],
        default: f64,
        track_missing: bool,
    ) -> f64 {
        for candidate in candidates {
            if let Some(value) = candidate {
                return self.guard_negative(field, *value);
            }
        }
        if track_missing {
            self.missing_fields.push(field.to_string());
        }
        default
    }

    /// Couple-mode variant: partner chains are resolved independently and
    /// summed. The field counts as missing only when both partners lack it.
    fn resolve_combined(
        &mut self,
        field: &'static str,
        partner1: &[Option<f64>],
        partner2: &[Option<f64>],
        track_missing: bool,
    ) -> f64 {
        let p1 = partner1.iter().flatten().next().copied();
        let p2 = partner2.iter().flatten().next().copied();
        if p1.is_none() && p2.is_none() {
            if track_missing {
                self.missing_fields.push(field.to_string());
            }
            return 0.0;
        }
        let v1 = p1.map_or(0.0, |v| self.guard_negative(field, v));
        let v2 = p2.map_or(0.0, |v| self.guard_negative(field, v));
        v1 + v2
    }

    fn guard_negative(&mut self, field: &'static str, value: f64) -> f64 {
        if value < 0.0 || !value.is_finite() {
            self.warnings.push(ValidationWarning::NegativeValueZeroed {
                field: field.to_string(),
            });
            return 0.0;
        }
        value
    }
}

/// Resolve a raw profile into canonical inputs. Pure, never fails: absent or
/// invalid values degrade to defaults and are flagged, not raised.
pub fn normalize(profile: &FinancialProfile) -> CanonicalInputs {
    let mut r = FieldResolver::new();
    let couple = profile.planning_mode.is_couple();

    // Salary: couple mode reads partner-prefixed fields, individual mode the
    // unprefixed chain. Whichever of gross/net is absent is derived from the
    // other through the take-home ratio before being declared missing.
    let mut gross_salary;
    let mut net_salary;
    if couple {
        gross_salary = r.resolve_combined(
            "grossMonthlyIncome",
            &[profile.partner1_salary],
            &[profile.partner2_salary],
            false,
        );
        net_salary = r.resolve_combined(
            "netMonthlyIncome",
            &[profile.partner1_net_salary],
            &[profile.partner2_net_salary],
            false,
        );
    } else {
        gross_salary = r.resolve(
            "grossMonthlyIncome",
            &[profile.gross_monthly_salary, profile.current_salary],
            0.0,
            false,
        );
        net_salary = r.resolve(
            "netMonthlyIncome",
            &[profile.net_monthly_salary, profile.current_net_salary],
            0.0,
            false,
        );
    }
    if gross_salary <= 0.0 && net_salary > 0.0 {
        gross_salary = net_salary / NET_TO_GROSS_RATIO;
    } else if net_salary <= 0.0 && gross_salary > 0.0 {
        net_salary = gross_salary * NET_TO_GROSS_RATIO;
    } else if gross_salary <= 0.0 && net_salary <= 0.0 {
        r.missing_fields.push("grossMonthlyIncome".to_string());
    }

    // Extra income streams are household-level in both modes.
    let annual_bonus = r.resolve("annualBonus", &[profile.annual_bonus], 0.0, false);
    let annual_rsu = r.resolve(
        "annualRsuValue",
        &[
            profile.annual_rsu_value,
            profile.quarterly_rsu_value.map(|q| q * 4.0),
        ],
        0.0,
        false,
    );
    let freelance = r.resolve(
        "freelanceMonthlyIncome",
        &[profile.freelance_monthly_income],
        0.0,
        false,
    );
    let rental = r.resolve(
        "rentalMonthlyIncome",
        &[profile.rental_monthly_income],
        0.0,
        false,
    );
    let dividends = r.resolve(
        "dividendMonthlyIncome",
        &[profile.dividend_monthly_income],
        0.0,
        false,
    );
    let monthly_extras = annual_bonus / 12.0 + annual_rsu / 12.0 + freelance + rental + dividends;

    // Expenses: category breakdown preferred, legacy flat total as fallback.
    let monthly_expenses = r.resolve(
        "monthlyExpenses",
        &[
            profile.expenses.as_ref().and_then(|e| e.total()),
            profile.total_monthly_expenses,
        ],
        0.0,
        true,
    );

    // Balances. Pension, training fund and portfolio are per-person; real
    // estate, crypto and cash are held at household level in both modes.
    let (pension_balance, training_balance, portfolio_balance) = if couple {
        (
            r.resolve_combined(
                "pensionSavings",
                &[profile.partner1_pension_savings],
                &[profile.partner2_pension_savings],
                false,
            ),
            r.resolve_combined(
                "trainingFund",
                &[profile.partner1_training_fund],
                &[profile.partner2_training_fund],
                false,
            ),
            r.resolve_combined(
                "personalPortfolio",
                &[profile.partner1_personal_portfolio],
                &[profile.partner2_personal_portfolio],
                false,
            ),
        )
    } else {
        (
            r.resolve(
                "pensionSavings",
                &[profile.pension_savings, profile.current_savings],
                0.0,
                false,
            ),
            r.resolve("trainingFund", &[profile.training_fund], 0.0, false),
            r.resolve(
                "personalPortfolio",
                &[profile.personal_portfolio, profile.current_investments],
                0.0,
                false,
            ),
        )
    };
    let real_estate = r.resolve("realEstate", &[profile.real_estate], 0.0, false);
    let crypto = r.resolve("crypto", &[profile.crypto], 0.0, false);
    let cash = r.resolve(
        "emergencyFund",
        &[profile.emergency_fund, profile.current_bank_account],
        0.0,
        false,
    );

    // Rates and fees fall back to the statutory defaults.
    let pension_rate = r.resolve(
        "pensionContributionRate",
        &[profile.pension_contribution_rate],
        DEFAULT_PENSION_RATE,
        false,
    );
    let training_rate = r.resolve(
        "trainingFundContributionRate",
        &[profile.training_fund_contribution_rate],
        DEFAULT_TRAINING_FUND_RATE,
        false,
    );
    let pension_fee = r.resolve(
        "pensionManagementFee",
        &[profile.pension_management_fee],
        DEFAULT_PENSION_FEE,
        false,
    );
    let training_fee = r.resolve(
        "trainingFundManagementFee",
        &[profile.training_fund_management_fee],
        DEFAULT_TRAINING_FUND_FEE,
        false,
    );

    let age = match profile.current_age {
        Some(a) => a,
        None => {
            r.missing_fields.push("currentAge".to_string());
            DEFAULT_CURRENT_AGE
        }
    };
    let retirement_age = profile.target_retirement_age.unwrap_or(DEFAULT_RETIREMENT_AGE);

    let has_debt_data = profile.monthly_debt_payments.is_some();
    let monthly_debt = r.resolve(
        "monthlyDebtPayments",
        &[profile.monthly_debt_payments],
        0.0,
        false,
    );

    // Allocation sets are validated, never renormalized.
    if let Some(allocation) = &profile.target_allocation {
        r.warnings
            .extend(validate_allocation(AllocationKind::Target, allocation));
    }
    if let Some(allocation) = &profile.current_allocation {
        r.warnings
            .extend(validate_allocation(AllocationKind::Current, allocation));
    }

    let country = profile
        .country
        .as_deref()
        .map(|c| c.trim().to_ascii_lowercase())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| DEFAULT_COUNTRY.to_string());

    CanonicalInputs {
        mode: profile.planning_mode,
        country,
        age,
        retirement_age,
        gross_monthly_salary: gross_salary,
        gross_monthly_income: gross_salary + monthly_extras,
        net_monthly_income: net_salary + monthly_extras,
        monthly_expenses,
        pension_balance,
        training_fund_balance: training_balance,
        personal_portfolio_balance: portfolio_balance,
        real_estate_balance: real_estate,
        crypto_balance: crypto,
        cash_balance: cash,
        pension_contribution_rate: pension_rate,
        training_fund_contribution_rate: training_rate,
        pension_annual_fee: pension_fee,
        training_fund_annual_fee: training_fee,
        risk_tolerance: profile.risk_tolerance.unwrap_or_default(),
        monthly_debt_payments: monthly_debt,
        has_debt_data,
        missing_fields: r.missing_fields,
        warnings: r.warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_alias_chain_order() {
        // The current field name wins over the legacy one
        let profile = FinancialProfile {
            gross_monthly_salary: Some(20_000.0),
            current_salary: Some(15_000.0),
            ..Default::default()
        };
        let inputs = normalize(&profile);
        assert_eq!(inputs.gross_monthly_salary, 20_000.0);

        // Legacy field used when the current one is absent
        let legacy_only = FinancialProfile {
            current_salary: Some(15_000.0),
            ..Default::default()
        };
        assert_eq!(normalize(&legacy_only).gross_monthly_salary, 15_000.0);
    }

    #[test]
    fn test_defaults_applied() {
        let inputs = normalize(&FinancialProfile::default());

        assert_eq!(inputs.pension_contribution_rate, DEFAULT_PENSION_RATE);
        assert_eq!(
            inputs.training_fund_contribution_rate,
            DEFAULT_TRAINING_FUND_RATE
        );
        assert_eq!(inputs.retirement_age, DEFAULT_RETIREMENT_AGE);
        assert_eq!(inputs.country, "israel");
        assert_eq!(inputs.risk_tolerance, RiskTolerance::Moderate);
        assert!(inputs.is_missing("grossMonthlyIncome"));
        assert!(inputs.is_missing("monthlyExpenses"));
        assert!(inputs.is_missing("currentAge"));
    }

    #[test]
    fn test_couple_mode_sums_partner_fields() {
        let profile = FinancialProfile {
            planning_mode: PlanningMode::Couple,
            partner1_salary: Some(30_000.0),
            partner2_salary: Some(21_500.0),
            partner1_pension_savings: Some(400_000.0),
            partner2_pension_savings: Some(250_000.0),
            ..Default::default()
        };
        let inputs = normalize(&profile);

        assert_eq!(inputs.gross_monthly_salary, 51_500.0);
        assert_eq!(inputs.pension_balance, 650_000.0);
        assert!(!inputs.is_missing("grossMonthlyIncome"));
    }

    #[test]
    fn test_couple_equals_summed_individual() {
        // Regression guard for the partner field mapping: a couple profile
        // and an individual profile with the arithmetic sums must produce
        // identical canonical income and balances.
        let couple = FinancialProfile {
            planning_mode: PlanningMode::Couple,
            partner1_salary: Some(28_000.0),
            partner2_salary: Some(19_000.0),
            partner1_net_salary: Some(21_000.0),
            partner2_net_salary: Some(14_500.0),
            partner1_training_fund: Some(120_000.0),
            partner2_training_fund: Some(80_000.0),
            total_monthly_expenses: Some(31_000.0),
            ..Default::default()
        };
        let individual = FinancialProfile {
            gross_monthly_salary: Some(47_000.0),
            net_monthly_salary: Some(35_500.0),
            training_fund: Some(200_000.0),
            total_monthly_expenses: Some(31_000.0),
            ..Default::default()
        };

        let a = normalize(&couple);
        let b = normalize(&individual);
        assert_eq!(a.gross_monthly_salary, b.gross_monthly_salary);
        assert_eq!(a.net_monthly_income, b.net_monthly_income);
        assert_eq!(a.training_fund_balance, b.training_fund_balance);
        assert_eq!(a.total_monthly_contributions(), b.total_monthly_contributions());
    }

    #[test]
    fn test_gross_derived_from_net() {
        let profile = FinancialProfile {
            net_monthly_salary: Some(15_000.0),
            total_monthly_expenses: Some(9_000.0),
            current_age: Some(40),
            ..Default::default()
        };
        let inputs = normalize(&profile);

        assert!((inputs.gross_monthly_salary - 20_000.0).abs() < 1e-9);
        assert!(inputs.missing_fields.is_empty());
    }

    #[test]
    fn test_negative_value_zeroed_with_warning() {
        let profile = FinancialProfile {
            gross_monthly_salary: Some(18_000.0),
            crypto: Some(-5_000.0),
            ..Default::default()
        };
        let inputs = normalize(&profile);

        assert_eq!(inputs.crypto_balance, 0.0);
        assert!(inputs.warnings.iter().any(|w| matches!(
            w,
            ValidationWarning::NegativeValueZeroed { field } if field == "crypto"
        )));
    }

    #[test]
    fn test_quarterly_rsu_annualized() {
        let profile = FinancialProfile {
            gross_monthly_salary: Some(30_000.0),
            quarterly_rsu_value: Some(9_000.0),
            ..Default::default()
        };
        let inputs = normalize(&profile);
        // 9,000/quarter = 36,000/year = 3,000/month on top of salary
        assert!((inputs.gross_monthly_income - 33_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_allocation_sum_violation_reported_not_fixed() {
        let mut target = BTreeMap::new();
        target.insert("stocks".to_string(), 70.0);
        target.insert("bonds".to_string(), 40.0);
        target.insert("realEstate".to_string(), 20.0);

        let profile = FinancialProfile {
            target_allocation: Some(target.clone()),
            ..Default::default()
        };
        let inputs = normalize(&profile);

        assert!(inputs.warnings.iter().any(|w| matches!(
            w,
            ValidationWarning::AllocationSumInvalid { set: AllocationKind::Target, sum }
                if (*sum - 130.0).abs() < 1e-9
        )));
        // The profile's allocation is untouched
        assert_eq!(profile.target_allocation.unwrap(), target);
    }

    #[test]
    fn test_debt_absence_is_not_missing_data() {
        let inputs = normalize(&FinancialProfile {
            gross_monthly_salary: Some(20_000.0),
            ..Default::default()
        });
        assert!(!inputs.has_debt_data);
        assert!(!inputs.is_missing("monthlyDebtPayments"));
    }

    #[test]
    fn test_contribution_amounts() {
        let profile = FinancialProfile {
            gross_monthly_salary: Some(20_000.0),
            pension_contribution_rate: Some(17.5),
            training_fund_contribution_rate: Some(7.5),
            ..Default::default()
        };
        let inputs = normalize(&profile);

        assert!((inputs.monthly_contribution(AssetClass::Pension) - 3_500.0).abs() < 1e-9);
        assert!((inputs.monthly_contribution(AssetClass::TrainingFund) - 1_500.0).abs() < 1e-9);
        assert!((inputs.total_monthly_contributions() - 5_000.0).abs() < 1e-9);
        assert_eq!(inputs.monthly_contribution(AssetClass::Crypto), 0.0);
    }
}
