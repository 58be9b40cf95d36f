//! Country-specific social insurance and tax parameter tables
//!
//! Each supported country carries its contribution bands, old-age pension
//! rules, means-tested guarantee amounts, survivor/disability parameters and
//! statutory savings caps, all in monthly local-currency units. Unknown
//! country codes fall back to the israel table (the canonical revision)
//! with a logged warning instead of failing.

use std::collections::BTreeMap;

/// Country key used when a profile names an unsupported country
pub const FALLBACK_COUNTRY: &str = "israel";

/// Social-insurance contribution bands, monthly amounts
#[derive(Debug, Clone)]
pub struct ContributionBands {
    /// Income below this pays the reduced employee rate
    pub reduced_rate_threshold: f64,
    /// Employee rate on the band below the threshold, percent
    pub employee_reduced_rate_pct: f64,
    /// Employee rate from the threshold up to the ceiling, percent
    pub employee_full_rate_pct: f64,
    /// Single flat combined rate for the self-employed, percent
    pub self_employed_rate_pct: f64,
    /// Insured-income ceiling; income above it is exempt
    pub ceiling_monthly: f64,
}

/// Tiered old-age pension accrual by contribution years
#[derive(Debug, Clone)]
pub struct AccrualSchedule {
    /// (years bound, percent per year) tiers applied in order
    pub tiers: Vec<(u32, f64)>,
    /// Percent per year beyond the last tier bound
    pub beyond_rate: f64,
    /// Hard cap on the accrued percentage
    pub cap_pct: f64,
}

impl AccrualSchedule {
    /// Standard 2/3/2/1 schedule capped at 80%
    pub fn default_tiered() -> Self {
        Self {
            tiers: vec![
                (10, 2.0), // First decade
                (20, 3.0), // Years 11-20
                (30, 2.0), // Years 21-30
            ],
            beyond_rate: 1.0, // Years 31+
            cap_pct: 80.0,
        }
    }

    /// Accrued pension percentage for a contribution history
    pub fn pension_pct(&self, contribution_months: u32) -> f64 {
        let years = contribution_months as f64 / 12.0;
        let mut pct = 0.0;
        let mut prev_bound = 0.0;

        for &(bound, per_year) in &self.tiers {
            let bound = bound as f64;
            if years > prev_bound {
                pct += (years.min(bound) - prev_bound) * per_year;
            }
            prev_bound = bound;
        }
        if years > prev_bound {
            pct += (years - prev_bound) * self.beyond_rate;
        }

        pct.min(self.cap_pct)
    }
}

/// Old-age pension eligibility and wage-base parameters
#[derive(Debug, Clone)]
pub struct OldAgeParams {
    /// Minimum insured months before any entitlement
    pub min_insurance_months: u32,
    pub accrual: AccrualSchedule,
    /// Wage-base blend weights: national average vs personal average
    pub wage_blend_national: f64,
    pub wage_blend_personal: f64,
}

/// Linear means-test parameters shared by the guarantee benefits
#[derive(Debug, Clone)]
pub struct MeansTest {
    /// Monthly income above this starts the reduction
    pub income_threshold_monthly: f64,
    /// Reduction per unit of income above the threshold
    pub taper_rate: f64,
    /// Benefit never falls below this fraction of the nominal amount
    pub floor_fraction: f64,
}

/// Income guarantee and senior supplement amounts
#[derive(Debug, Clone)]
pub struct GuaranteeParams {
    pub income_guarantee_monthly: f64,
    pub senior_supplement_monthly: f64,
    pub means_test: MeansTest,
}

/// Survivor or disability benefit parameters
#[derive(Debug, Clone)]
pub struct BenefitParams {
    /// Fraction of the blended wage base paid as the base benefit
    pub base_rate: f64,
    /// Additional fraction of the base per dependent child
    pub child_allowance_rate: f64,
    /// Minimum insured months for eligibility
    pub min_coverage_months: u32,
    /// Income-tested reduction never cuts below this fraction of
    /// the pre-test amount
    pub protected_floor: f64,
}

/// Full parameter set for one country
#[derive(Debug, Clone)]
pub struct CountryParams {
    pub key: String,
    pub currency: String,
    /// National average monthly wage (wage-base blend input)
    pub average_wage_monthly: f64,
    pub contributions: ContributionBands,
    pub old_age: OldAgeParams,
    pub guarantee: GuaranteeParams,
    pub survivor: BenefitParams,
    pub disability: BenefitParams,
    /// Minimum medical disability degree for any disability benefit, percent
    pub min_disability_degree_pct: f64,
    /// Statutory salary cap for tax-advantaged pension contributions
    pub pension_salary_cap_monthly: f64,
    /// Statutory salary cap for the training fund; 0 where the vehicle
    /// does not exist
    pub training_fund_salary_cap_monthly: f64,
    pub capital_gains_rate_pct: f64,
    pub revision_year: u32,
}

impl CountryParams {
    /// Whether this country has a training-fund vehicle at all
    pub fn supports_training_fund(&self) -> bool {
        self.training_fund_salary_cap_monthly > 0.0
    }

    /// Israel table, 2025 revision (canonical)
    pub fn israel_2025() -> Self {
        Self {
            key: "israel".to_string(),
            currency: "ILS".to_string(),
            average_wage_monthly: 13_042.0,
            contributions: ContributionBands {
                reduced_rate_threshold: 7_825.2, // 60% of average wage
                employee_reduced_rate_pct: 3.5,  // NI + health, reduced band
                employee_full_rate_pct: 12.0,    // NI + health, full band
                self_employed_rate_pct: 11.23,   // Flat combined rate
                ceiling_monthly: 49_030.0,
            },
            old_age: OldAgeParams {
                min_insurance_months: 120,
                accrual: AccrualSchedule::default_tiered(),
                wage_blend_national: 0.6,
                wage_blend_personal: 0.4,
            },
            guarantee: GuaranteeParams {
                income_guarantee_monthly: 3_228.0,
                senior_supplement_monthly: 530.0,
                means_test: MeansTest {
                    income_threshold_monthly: 5_000.0,
                    taper_rate: 0.60,
                    floor_fraction: 0.5,
                },
            },
            survivor: BenefitParams {
                base_rate: 0.60,
                child_allowance_rate: 0.10,
                min_coverage_months: 12,
                protected_floor: 0.5,
            },
            disability: BenefitParams {
                base_rate: 0.70,
                child_allowance_rate: 0.10,
                min_coverage_months: 12,
                protected_floor: 0.5,
            },
            min_disability_degree_pct: 40.0,
            pension_salary_cap_monthly: 9_430.0,       // Tax-benefit ceiling
            training_fund_salary_cap_monthly: 15_712.0, // Statutory cap
            capital_gains_rate_pct: 25.0,
            revision_year: 2025,
        }
    }

    /// United Kingdom table, 2025 revision
    pub fn uk_2025() -> Self {
        Self {
            key: "uk".to_string(),
            currency: "GBP".to_string(),
            average_wage_monthly: 2_950.0,
            contributions: ContributionBands {
                reduced_rate_threshold: 1_048.0, // Primary threshold
                employee_reduced_rate_pct: 0.0,  // Nothing due below it
                employee_full_rate_pct: 8.0,
                self_employed_rate_pct: 6.0,
                ceiling_monthly: 4_189.0, // Upper earnings limit
            },
            old_age: OldAgeParams {
                min_insurance_months: 120, // 10 qualifying years
                accrual: AccrualSchedule::default_tiered(),
                wage_blend_national: 0.6,
                wage_blend_personal: 0.4,
            },
            guarantee: GuaranteeParams {
                income_guarantee_monthly: 945.0, // Pension credit level
                senior_supplement_monthly: 85.0,
                means_test: MeansTest {
                    income_threshold_monthly: 1_400.0,
                    taper_rate: 0.50,
                    floor_fraction: 0.5,
                },
            },
            survivor: BenefitParams {
                base_rate: 0.55,
                child_allowance_rate: 0.08,
                min_coverage_months: 12,
                protected_floor: 0.5,
            },
            disability: BenefitParams {
                base_rate: 0.65,
                child_allowance_rate: 0.08,
                min_coverage_months: 12,
                protected_floor: 0.5,
            },
            min_disability_degree_pct: 40.0,
            pension_salary_cap_monthly: 5_000.0, // Annual allowance / 12
            training_fund_salary_cap_monthly: 0.0, // No such vehicle
            capital_gains_rate_pct: 20.0,
            revision_year: 2025,
        }
    }

    /// United States table, 2025 revision
    pub fn us_2025() -> Self {
        Self {
            key: "us".to_string(),
            currency: "USD".to_string(),
            average_wage_monthly: 5_571.0,
            contributions: ContributionBands {
                reduced_rate_threshold: 0.0, // Single band
                employee_reduced_rate_pct: 0.0,
                employee_full_rate_pct: 7.65, // FICA
                self_employed_rate_pct: 15.3, // SECA
                ceiling_monthly: 14_100.0,    // Wage base / 12
            },
            old_age: OldAgeParams {
                min_insurance_months: 120, // 40 quarters
                accrual: AccrualSchedule::default_tiered(),
                wage_blend_national: 0.6,
                wage_blend_personal: 0.4,
            },
            guarantee: GuaranteeParams {
                income_guarantee_monthly: 943.0, // SSI federal benefit rate
                senior_supplement_monthly: 0.0,  // No separate supplement
                means_test: MeansTest {
                    income_threshold_monthly: 1_971.0,
                    taper_rate: 0.50,
                    floor_fraction: 0.5,
                },
            },
            survivor: BenefitParams {
                base_rate: 0.60,
                child_allowance_rate: 0.08,
                min_coverage_months: 12,
                protected_floor: 0.5,
            },
            disability: BenefitParams {
                base_rate: 0.70,
                child_allowance_rate: 0.08,
                min_coverage_months: 24,
                protected_floor: 0.5,
            },
            min_disability_degree_pct: 40.0,
            pension_salary_cap_monthly: 1_958.0, // 401(k) limit / 12
            training_fund_salary_cap_monthly: 0.0,
            capital_gains_rate_pct: 15.0,
            revision_year: 2025,
        }
    }

    /// Apply a scalar override loaded from CSV. Returns false for
    /// unrecognized parameter names so the loader can report them.
    pub fn set_scalar(&mut self, param: &str, value: f64) -> bool {
        match param {
            "averageWage" => self.average_wage_monthly = value,
            "reducedRateThreshold" => self.contributions.reduced_rate_threshold = value,
            "employeeReducedRate" => self.contributions.employee_reduced_rate_pct = value,
            "employeeFullRate" => self.contributions.employee_full_rate_pct = value,
            "selfEmployedRate" => self.contributions.self_employed_rate_pct = value,
            "contributionCeiling" => self.contributions.ceiling_monthly = value,
            "minInsuranceMonths" => self.old_age.min_insurance_months = value as u32,
            "incomeGuarantee" => self.guarantee.income_guarantee_monthly = value,
            "seniorSupplement" => self.guarantee.senior_supplement_monthly = value,
            "incomeTestThreshold" => self.guarantee.means_test.income_threshold_monthly = value,
            "taperRate" => self.guarantee.means_test.taper_rate = value,
            "pensionSalaryCap" => self.pension_salary_cap_monthly = value,
            "trainingFundSalaryCap" => self.training_fund_salary_cap_monthly = value,
            "capitalGainsRate" => self.capital_gains_rate_pct = value,
            "revisionYear" => self.revision_year = value as u32,
            _ => return false,
        }
        true
    }
}

/// Registry of country tables keyed by lowercase country code
#[derive(Debug, Clone)]
pub struct CountryTables {
    tables: BTreeMap<String, CountryParams>,
    /// Pre-cloned fallback so lookups never fail
    fallback: CountryParams,
}

impl CountryTables {
    /// Create the default 2025 registry (israel, uk, us)
    pub fn default_2025() -> Self {
        let mut tables = BTreeMap::new();
        for params in [
            CountryParams::israel_2025(),
            CountryParams::uk_2025(),
            CountryParams::us_2025(),
        ] {
            tables.insert(params.key.clone(), params);
        }

        Self {
            fallback: CountryParams::israel_2025(),
            tables,
        }
    }

    /// Look up a country; unknown codes fall back with a warning
    pub fn get(&self, code: &str) -> &CountryParams {
        let key = code.trim().to_ascii_lowercase();
        match self.tables.get(&key) {
            Some(params) => params,
            None => {
                log::warn!(
                    "no parameter table for country '{}', using {} table",
                    code,
                    FALLBACK_COUNTRY
                );
                &self.fallback
            }
        }
    }

    /// Mutable access for CSV overrides
    pub fn get_mut(&mut self, code: &str) -> Option<&mut CountryParams> {
        self.tables.get_mut(&code.trim().to_ascii_lowercase())
    }

    pub fn insert(&mut self, params: CountryParams) {
        if params.key == FALLBACK_COUNTRY {
            self.fallback = params.clone();
        }
        self.tables.insert(params.key.clone(), params);
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(|k| k.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accrual_tiers() {
        let accrual = AccrualSchedule::default_tiered();

        assert!((accrual.pension_pct(120) - 20.0).abs() < 1e-10); // 10y
        assert!((accrual.pension_pct(180) - 35.0).abs() < 1e-10); // 15y
        assert!((accrual.pension_pct(240) - 50.0).abs() < 1e-10); // 20y
        assert!((accrual.pension_pct(300) - 60.0).abs() < 1e-10); // 25y
        assert!((accrual.pension_pct(360) - 70.0).abs() < 1e-10); // 30y
        assert!((accrual.pension_pct(420) - 75.0).abs() < 1e-10); // 35y
    }

    #[test]
    fn test_accrual_capped_at_80() {
        let accrual = AccrualSchedule::default_tiered();

        // 45 years would accrue 85% uncapped
        assert_eq!(accrual.pension_pct(540), 80.0);
        assert_eq!(accrual.pension_pct(1200), 80.0);
    }

    #[test]
    fn test_lookup_and_fallback() {
        let tables = CountryTables::default_2025();

        assert_eq!(tables.get("israel").currency, "ILS");
        assert_eq!(tables.get("UK").currency, "GBP");
        assert_eq!(tables.get(" us ").capital_gains_rate_pct, 15.0);

        // Unknown code falls back to the israel table
        let fallback = tables.get("atlantis");
        assert_eq!(fallback.key, "israel");
    }

    #[test]
    fn test_training_fund_support() {
        let tables = CountryTables::default_2025();

        assert!(tables.get("israel").supports_training_fund());
        assert!(!tables.get("uk").supports_training_fund());
        assert!(!tables.get("us").supports_training_fund());
    }

    #[test]
    fn test_scalar_override() {
        let mut params = CountryParams::israel_2025();

        assert!(params.set_scalar("averageWage", 13_500.0));
        assert_eq!(params.average_wage_monthly, 13_500.0);

        assert!(params.set_scalar("capitalGainsRate", 28.0));
        assert_eq!(params.capital_gains_rate_pct, 28.0);

        assert!(!params.set_scalar("notAParam", 1.0));
    }
}
