//! Country-specific social insurance calculators built on the country
//! parameter tables

mod benefits;
mod contributions;
mod pension;
mod types;

pub use pension::WORKFORCE_ENTRY_AGE;
pub use types::{
    BenefitResult, ContributionBand, ContributionBreakdown, EmploymentType, MaritalStatus,
    MeansTestedBenefit, PensionProjection, PensionResult, SocialInsuranceProfile,
};

use crate::assumptions::CountryParams;

/// Social-insurance calculator bound to one country's parameter table
#[derive(Debug, Clone)]
pub struct NationalInsurance {
    params: CountryParams,
}

impl NationalInsurance {
    pub fn new(params: CountryParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &CountryParams {
        &self.params
    }

    /// Blended wage base: national average weighted against the personal
    /// average insured income (capped at the contribution ceiling)
    pub(crate) fn wage_base(&self, personal_average: f64) -> f64 {
        let capped = personal_average
            .min(self.params.contributions.ceiling_monthly)
            .max(0.0);
        self.params.old_age.wage_blend_national * self.params.average_wage_monthly
            + self.params.old_age.wage_blend_personal * capped
    }

    /// Linear income test: reduce `nominal` by the taper on income above the
    /// threshold, never below `floor`. Returns the final amount, the applied
    /// reduction and whether the floor cut in.
    pub(crate) fn income_tested(
        &self,
        nominal: f64,
        monthly_income: f64,
        floor: f64,
    ) -> (f64, f64, bool) {
        let test = &self.params.guarantee.means_test;
        let excess = (monthly_income - test.income_threshold_monthly).max(0.0);
        let raw = nominal - excess * test.taper_rate;
        let amount = raw.max(floor).min(nominal).max(0.0);
        let floor_applied = nominal > 0.0 && raw < floor;
        (amount, nominal - amount, floor_applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::CountryTables;

    #[test]
    fn test_wage_base_blend() {
        let tables = CountryTables::default_2025();
        let ni = NationalInsurance::new(tables.get("israel").clone());

        // 0.6 x 13,042 + 0.4 x 10,000
        let base = ni.wage_base(10_000.0);
        assert!((base - 11_825.2).abs() < 1e-9);

        // Personal average is capped at the ceiling
        let capped = ni.wage_base(1_000_000.0);
        assert!((capped - (0.6 * 13_042.0 + 0.4 * 49_030.0)).abs() < 1e-9);
    }

    #[test]
    fn test_income_test_floor() {
        let tables = CountryTables::default_2025();
        let ni = NationalInsurance::new(tables.get("israel").clone());

        // No income: full amount
        let (amount, reduction, floored) = ni.income_tested(3_228.0, 0.0, 1_614.0);
        assert_eq!(amount, 3_228.0);
        assert_eq!(reduction, 0.0);
        assert!(!floored);

        // High income: tapered down to the floor, not below
        let (amount, reduction, floored) = ni.income_tested(3_228.0, 12_000.0, 1_614.0);
        assert_eq!(amount, 1_614.0);
        assert!((reduction - 1_614.0).abs() < 1e-9);
        assert!(floored);
    }
}
