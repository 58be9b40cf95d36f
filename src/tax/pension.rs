//! Old-age pension entitlement and retirement projection
//!
//! Eligibility fails closed: short contribution histories produce
//! `eligible: false` with the month shortfall, never a fabricated amount.
//! The pension percentage comes from the tiered accrual schedule applied to
//! the blended national/personal wage base.

use super::types::{MeansTestedBenefit, PensionProjection, PensionResult, SocialInsuranceProfile};
use super::NationalInsurance;
use crate::math::safe_div;
use crate::profile::CanonicalInputs;

/// Assumed workforce entry age for projecting contribution histories
pub const WORKFORCE_ENTRY_AGE: u32 = 25;

impl NationalInsurance {
    /// Old-age pension entitlement for an insured person
    pub fn calculate_old_age_pension(&self, profile: &SocialInsuranceProfile) -> PensionResult {
        let old_age = &self.params().old_age;

        if profile.contribution_months < old_age.min_insurance_months {
            let shortfall = old_age.min_insurance_months - profile.contribution_months;
            return PensionResult::ineligible(
                format!(
                    "insufficient contribution months: {} of {} required",
                    profile.contribution_months, old_age.min_insurance_months
                ),
                shortfall,
            );
        }

        let pension_pct = old_age.accrual.pension_pct(profile.contribution_months);
        let wage_base = self.wage_base(profile.average_insured_income);

        PensionResult {
            eligible: true,
            reason: None,
            shortfall_months: 0,
            pension_pct,
            wage_base,
            monthly_amount: wage_base * pension_pct / 100.0,
        }
    }

    /// Means-tested income guarantee for a low-income insured person
    pub fn income_guarantee(&self, profile: &SocialInsuranceProfile) -> MeansTestedBenefit {
        let guarantee = &self.params().guarantee;
        self.means_tested_amount(
            guarantee.income_guarantee_monthly,
            profile.current_monthly_income,
        )
    }

    /// Means-tested senior supplement on top of the old-age pension
    pub fn senior_supplement(&self, profile: &SocialInsuranceProfile) -> MeansTestedBenefit {
        let guarantee = &self.params().guarantee;
        self.means_tested_amount(
            guarantee.senior_supplement_monthly,
            profile.current_monthly_income,
        )
    }

    fn means_tested_amount(&self, nominal: f64, monthly_income: f64) -> MeansTestedBenefit {
        let floor = nominal * self.params().guarantee.means_test.floor_fraction;
        let (amount, reduction, floor_applied) =
            self.income_tested(nominal, monthly_income, floor);

        MeansTestedBenefit {
            nominal_monthly: nominal,
            reduction,
            monthly_amount: amount,
            floor_applied,
        }
    }

    /// Project the state pension a working profile will have earned by its
    /// retirement age, assuming an unbroken history from workforce entry.
    pub fn project_retirement_pension(&self, inputs: &CanonicalInputs) -> PensionProjection {
        let projected_months = inputs
            .retirement_age
            .saturating_sub(WORKFORCE_ENTRY_AGE)
            .saturating_mul(12);

        let insured = SocialInsuranceProfile {
            contribution_months: projected_months,
            average_insured_income: inputs.gross_monthly_salary,
            ..Default::default()
        };
        let pension = self.calculate_old_age_pension(&insured);

        PensionProjection {
            projected_contribution_months: projected_months,
            replacement_ratio_pct: safe_div(
                pension.monthly_amount,
                inputs.gross_monthly_income,
                "state pension replacement ratio",
            ) * 100.0,
            pension,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::CountryTables;
    use crate::profile::{normalize, FinancialProfile};

    fn israel() -> NationalInsurance {
        NationalInsurance::new(CountryTables::default_2025().get("israel").clone())
    }

    #[test]
    fn test_short_history_fails_closed() {
        let profile = SocialInsuranceProfile {
            contribution_months: 100,
            average_insured_income: 15_000.0,
            ..Default::default()
        };
        let result = israel().calculate_old_age_pension(&profile);

        assert!(!result.eligible);
        assert_eq!(result.shortfall_months, 20);
        assert_eq!(result.monthly_amount, 0.0);
        assert!(result.reason.is_some());
    }

    #[test]
    fn test_thirty_year_pension() {
        let profile = SocialInsuranceProfile {
            contribution_months: 360,
            average_insured_income: 10_000.0,
            ..Default::default()
        };
        let result = israel().calculate_old_age_pension(&profile);

        assert!(result.eligible);
        assert_eq!(result.pension_pct, 70.0);
        // 0.6 x 13,042 + 0.4 x 10,000 = 11,825.2
        assert!((result.wage_base - 11_825.2).abs() < 1e-9);
        assert!((result.monthly_amount - 11_825.2 * 0.70).abs() < 1e-6);
    }

    #[test]
    fn test_income_guarantee_tapers_to_floor() {
        let ni = israel();

        let poor = SocialInsuranceProfile {
            current_monthly_income: 2_000.0,
            ..Default::default()
        };
        let full = ni.income_guarantee(&poor);
        assert_eq!(full.monthly_amount, 3_228.0);
        assert!(!full.floor_applied);

        let moderate = SocialInsuranceProfile {
            current_monthly_income: 6_000.0,
            ..Default::default()
        };
        let tapered = ni.income_guarantee(&moderate);
        // 1,000 excess at 0.6 taper
        assert!((tapered.monthly_amount - (3_228.0 - 600.0)).abs() < 1e-9);

        let high = SocialInsuranceProfile {
            current_monthly_income: 20_000.0,
            ..Default::default()
        };
        let floored = ni.income_guarantee(&high);
        assert_eq!(floored.monthly_amount, 1_614.0); // 50% floor
        assert!(floored.floor_applied);
    }

    #[test]
    fn test_projected_pension_replacement() {
        let raw = FinancialProfile {
            current_age: Some(35),
            target_retirement_age: Some(67),
            gross_monthly_salary: Some(18_000.0),
            ..Default::default()
        };
        let inputs = normalize(&raw);
        let projection = israel().project_retirement_pension(&inputs);

        // Entry at 25 through 67 is a 42-year history, capped at 80%
        assert_eq!(projection.projected_contribution_months, 504);
        assert!(projection.pension.eligible);
        assert_eq!(projection.pension.pension_pct, 80.0);
        assert!(projection.replacement_ratio_pct > 0.0);
        assert!(projection.replacement_ratio_pct < 100.0);
    }

    #[test]
    fn test_early_retirement_can_miss_eligibility() {
        let raw = FinancialProfile {
            current_age: Some(30),
            target_retirement_age: Some(33),
            gross_monthly_salary: Some(18_000.0),
            ..Default::default()
        };
        let inputs = normalize(&raw);
        let projection = israel().project_retirement_pension(&inputs);

        // 8 projected years of history is under the 120-month minimum
        assert!(!projection.pension.eligible);
        assert_eq!(projection.pension.monthly_amount, 0.0);
        assert_eq!(projection.replacement_ratio_pct, 0.0);
    }
}
