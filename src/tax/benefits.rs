//! Survivor and disability benefits
//!
//! Both follow the same shape: base rate times the blended wage base (scaled
//! by disability degree where relevant), plus per-child allowances, minus an
//! income-tested reduction floored at the protected fraction of the pre-test
//! amount. Short coverage histories fail closed like the old-age pension.

use super::types::{BenefitResult, SocialInsuranceProfile};
use super::NationalInsurance;
use crate::assumptions::BenefitParams;

impl NationalInsurance {
    /// Survivor benefit for the family of a deceased insured person
    pub fn calculate_survivor_benefits(&self, profile: &SocialInsuranceProfile) -> BenefitResult {
        let params = self.params().survivor.clone();
        if profile.contribution_months < params.min_coverage_months {
            return BenefitResult::ineligible(
                format!(
                    "insufficient coverage: {} of {} months required",
                    profile.contribution_months, params.min_coverage_months
                ),
                params.min_coverage_months - profile.contribution_months,
            );
        }

        let base = self.wage_base(profile.average_insured_income) * params.base_rate;
        self.benefit_with_tests(base, profile, &params)
    }

    /// Disability benefit, scaled by the medical disability degree
    pub fn calculate_disability_benefits(&self, profile: &SocialInsuranceProfile) -> BenefitResult {
        let params = self.params().disability.clone();
        let min_degree = self.params().min_disability_degree_pct;

        if profile.disability_degree_pct < min_degree {
            return BenefitResult::ineligible(
                format!(
                    "disability degree {:.0}% below the {:.0}% minimum",
                    profile.disability_degree_pct, min_degree
                ),
                0,
            );
        }
        if profile.contribution_months < params.min_coverage_months {
            return BenefitResult::ineligible(
                format!(
                    "insufficient coverage: {} of {} months required",
                    profile.contribution_months, params.min_coverage_months
                ),
                params.min_coverage_months - profile.contribution_months,
            );
        }

        let base = self.wage_base(profile.average_insured_income)
            * params.base_rate
            * (profile.disability_degree_pct / 100.0);
        self.benefit_with_tests(base, profile, &params)
    }

    /// Shared tail: child allowances, income test, protected floor
    fn benefit_with_tests(
        &self,
        base: f64,
        profile: &SocialInsuranceProfile,
        params: &BenefitParams,
    ) -> BenefitResult {
        let child_allowance =
            base * params.child_allowance_rate * profile.dependent_children as f64;
        let pre_test = base + child_allowance;

        let floor = pre_test * params.protected_floor;
        let (amount, reduction, floor_applied) =
            self.income_tested(pre_test, profile.current_monthly_income, floor);

        BenefitResult {
            eligible: true,
            reason: None,
            shortfall_months: 0,
            base_amount: base,
            child_allowance,
            income_reduction: reduction,
            floor_applied,
            monthly_amount: amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::CountryTables;

    fn israel() -> NationalInsurance {
        NationalInsurance::new(CountryTables::default_2025().get("israel").clone())
    }

    #[test]
    fn test_survivor_short_coverage_fails_closed() {
        let profile = SocialInsuranceProfile {
            contribution_months: 6,
            average_insured_income: 12_000.0,
            ..Default::default()
        };
        let result = israel().calculate_survivor_benefits(&profile);

        assert!(!result.eligible);
        assert_eq!(result.shortfall_months, 6);
        assert_eq!(result.monthly_amount, 0.0);
    }

    #[test]
    fn test_survivor_with_children() {
        let profile = SocialInsuranceProfile {
            contribution_months: 240,
            average_insured_income: 10_000.0,
            dependent_children: 2,
            ..Default::default()
        };
        let result = israel().calculate_survivor_benefits(&profile);

        assert!(result.eligible);
        // Base: 11,825.2 x 0.60
        assert!((result.base_amount - 7_095.12).abs() < 1e-6);
        // Two children at 10% of base each
        assert!((result.child_allowance - 1_419.024).abs() < 1e-6);
        assert!((result.monthly_amount - 8_514.144).abs() < 1e-6);
        assert_eq!(result.income_reduction, 0.0);
    }

    #[test]
    fn test_survivor_income_test_respects_floor() {
        let profile = SocialInsuranceProfile {
            contribution_months: 240,
            average_insured_income: 10_000.0,
            current_monthly_income: 30_000.0,
            ..Default::default()
        };
        let result = israel().calculate_survivor_benefits(&profile);

        // 25,000 excess at 0.6 taper would wipe the benefit; the floor holds
        let pre_test = result.base_amount + result.child_allowance;
        assert!(result.floor_applied);
        assert!((result.monthly_amount - pre_test * 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_disability_degree_gate() {
        let profile = SocialInsuranceProfile {
            contribution_months: 240,
            average_insured_income: 10_000.0,
            disability_degree_pct: 30.0,
            ..Default::default()
        };
        let result = israel().calculate_disability_benefits(&profile);

        assert!(!result.eligible);
        assert_eq!(result.monthly_amount, 0.0);
        assert!(result.reason.as_deref().unwrap_or("").contains("degree"));
    }

    #[test]
    fn test_disability_scaled_by_degree() {
        let full = SocialInsuranceProfile {
            contribution_months: 240,
            average_insured_income: 10_000.0,
            disability_degree_pct: 100.0,
            ..Default::default()
        };
        let half = SocialInsuranceProfile {
            disability_degree_pct: 50.0,
            ..full.clone()
        };

        let ni = israel();
        let full_result = ni.calculate_disability_benefits(&full);
        let half_result = ni.calculate_disability_benefits(&half);

        assert!(full_result.eligible && half_result.eligible);
        assert!((half_result.base_amount - full_result.base_amount * 0.5).abs() < 1e-6);
    }
}
