//! Monthly contribution withholding
//!
//! Employees pay the reduced rate on the band below the reduced-rate
//! threshold and the full rate from there to the ceiling; the self-employed
//! pay one flat combined rate on insured income. Income above the ceiling is
//! exempt and reported, never taxed.

use super::types::{ContributionBand, ContributionBreakdown, EmploymentType};
use super::NationalInsurance;
use crate::math::safe_div;

impl NationalInsurance {
    /// Monthly social-insurance withholding for a gross monthly income
    pub fn calculate_contributions(
        &self,
        monthly_income: f64,
        employment: EmploymentType,
    ) -> ContributionBreakdown {
        let c = &self.params().contributions;
        let income = monthly_income.max(0.0);
        let insured = income.min(c.ceiling_monthly);
        let above_ceiling = (income - c.ceiling_monthly).max(0.0);

        let mut bands = Vec::new();
        match employment {
            EmploymentType::Employee => {
                let reduced_top = c.reduced_rate_threshold.min(insured);
                if reduced_top > 0.0 {
                    bands.push(ContributionBand {
                        from: 0.0,
                        to: reduced_top,
                        rate_pct: c.employee_reduced_rate_pct,
                        amount: reduced_top * c.employee_reduced_rate_pct / 100.0,
                    });
                }
                if insured > c.reduced_rate_threshold {
                    let slice = insured - c.reduced_rate_threshold.max(0.0);
                    bands.push(ContributionBand {
                        from: c.reduced_rate_threshold.max(0.0),
                        to: insured,
                        rate_pct: c.employee_full_rate_pct,
                        amount: slice * c.employee_full_rate_pct / 100.0,
                    });
                }
            }
            EmploymentType::SelfEmployed => {
                if insured > 0.0 {
                    bands.push(ContributionBand {
                        from: 0.0,
                        to: insured,
                        rate_pct: c.self_employed_rate_pct,
                        amount: insured * c.self_employed_rate_pct / 100.0,
                    });
                }
            }
        }

        let total: f64 = bands.iter().map(|b| b.amount).sum();

        ContributionBreakdown {
            monthly_income: income,
            insured_income: insured,
            bands,
            total_monthly: total,
            effective_rate_pct: safe_div(total, income, "contribution effective rate") * 100.0,
            income_above_ceiling: above_ceiling,
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
    fn test_employee_two_bands() {
        let breakdown = israel().calculate_contributions(10_000.0, EmploymentType::Employee);

        assert_eq!(breakdown.bands.len(), 2);
        // Reduced band: 7,825.2 at 3.5%
        assert!((breakdown.bands[0].amount - 273.882).abs() < 1e-6);
        // Full band: 2,174.8 at 12%
        assert!((breakdown.bands[1].amount - 260.976).abs() < 1e-6);
        assert!((breakdown.total_monthly - 534.858).abs() < 1e-6);
        assert!((breakdown.effective_rate_pct - 5.34858).abs() < 1e-5);
        assert_eq!(breakdown.income_above_ceiling, 0.0);
    }

    #[test]
    fn test_employee_below_threshold_pays_reduced_only() {
        let breakdown = israel().calculate_contributions(5_000.0, EmploymentType::Employee);

        assert_eq!(breakdown.bands.len(), 1);
        assert!((breakdown.bands[0].rate_pct - 3.5).abs() < 1e-12);
        assert!((breakdown.total_monthly - 175.0).abs() < 1e-9);
    }

    #[test]
    fn test_income_above_ceiling_exempt() {
        let breakdown = israel().calculate_contributions(60_000.0, EmploymentType::Employee);

        assert_eq!(breakdown.insured_income, 49_030.0);
        assert!((breakdown.income_above_ceiling - 10_970.0).abs() < 1e-9);
        // Reduced 273.882 + full (49,030 - 7,825.2) x 12%
        let expected = 273.882 + (49_030.0 - 7_825.2) * 0.12;
        assert!((breakdown.total_monthly - expected).abs() < 1e-6);
    }

    #[test]
    fn test_self_employed_flat_rate() {
        let breakdown = israel().calculate_contributions(20_000.0, EmploymentType::SelfEmployed);

        assert_eq!(breakdown.bands.len(), 1);
        assert!((breakdown.total_monthly - 20_000.0 * 0.1123).abs() < 1e-6);
        assert!((breakdown.effective_rate_pct - 11.23).abs() < 1e-9);
    }

    #[test]
    fn test_us_single_band_from_zero() {
        let ni = NationalInsurance::new(CountryTables::default_2025().get("us").clone());
        let breakdown = ni.calculate_contributions(8_000.0, EmploymentType::Employee);

        // No reduced band below a zero threshold
        assert_eq!(breakdown.bands.len(), 1);
        assert!((breakdown.total_monthly - 612.0).abs() < 1e-9); // 7.65%
    }

    #[test]
    fn test_zero_income() {
        let breakdown = israel().calculate_contributions(0.0, EmploymentType::Employee);

        assert_eq!(breakdown.total_monthly, 0.0);
        assert_eq!(breakdown.effective_rate_pct, 0.0);
    }
}
