//! The eight factor algorithms
//!
//! Every factor computes an achieved fraction in [0,1], scales it to the
//! factor weight and derives a status from the fraction. Zero or missing
//! denominators go through `safe_div`, so a degenerate profile produces a
//! zero-scored critical factor instead of a failure.

use super::report::{FactorDetails, FactorKind, FactorScore, ScoreStatus};
use super::ScoringConfig;
use crate::assumptions::{AssetClass, CountryParams};
use crate::math::{clamp01, safe_div};
use crate::profile::CanonicalInputs;
use crate::projection::ProjectionSummary;

fn scored(factor: FactorKind, achieved: f64, weight: f64, details: FactorDetails) -> FactorScore {
    let achieved = clamp01(achieved);
    FactorScore {
        factor,
        score: achieved * weight,
        weight,
        status: ScoreStatus::from_achieved(achieved),
        details,
    }
}

/// Contributions as a share of gross income, against the benchmark rate
pub(crate) fn savings_rate(inputs: &CanonicalInputs, config: &ScoringConfig) -> FactorScore {
    let contributions = inputs.total_monthly_contributions();
    let rate_pct = safe_div(
        contributions,
        inputs.gross_monthly_income,
        "savings rate denominator",
    ) * 100.0;
    let achieved = rate_pct / config.savings_rate_benchmark_pct;

    scored(
        FactorKind::SavingsRate,
        achieved,
        config.weights.savings_rate,
        FactorDetails::SavingsRate {
            monthly_contributions: contributions,
            gross_monthly_income: inputs.gross_monthly_income,
            rate_pct,
            benchmark_pct: config.savings_rate_benchmark_pct,
            missing_income: inputs.is_missing("grossMonthlyIncome"),
        },
    )
}

/// Projected accumulation against the retirement goal
/// (a multiple of annual expenses)
pub(crate) fn retirement_readiness(
    inputs: &CanonicalInputs,
    config: &ScoringConfig,
    projection: &ProjectionSummary,
) -> FactorScore {
    let goal = inputs.monthly_expenses * 12.0 * config.retirement_goal_expense_multiple;
    let achieved = clamp01(safe_div(
        projection.nominal_accumulation,
        goal,
        "retirement goal denominator",
    ));

    scored(
        FactorKind::RetirementReadiness,
        achieved,
        config.weights.retirement_readiness,
        FactorDetails::RetirementReadiness {
            projected_accumulation: projection.nominal_accumulation,
            retirement_goal: goal,
            coverage_pct: achieved * 100.0,
        },
    )
}

/// Planning runway: years to retirement against the benchmark horizon
pub(crate) fn time_horizon(inputs: &CanonicalInputs, config: &ScoringConfig) -> FactorScore {
    let years = inputs.years_to_retirement();
    let achieved = years as f64 / config.time_horizon_benchmark_years;

    scored(
        FactorKind::TimeHorizon,
        achieved,
        config.weights.time_horizon,
        FactorDetails::TimeHorizon {
            years_to_retirement: years,
            benchmark_years: config.time_horizon_benchmark_years,
        },
    )
}

/// Actual equity share against the age-implied target split
pub(crate) fn risk_alignment(inputs: &CanonicalInputs, config: &ScoringConfig) -> FactorScore {
    // Classic age rule: equity share of (110 - age), bounded
    let target = (110.0 - inputs.age as f64).clamp(20.0, 90.0);

    let equity: f64 = AssetClass::ALL
        .iter()
        .filter(|a| a.is_equity_like())
        .map(|&a| inputs.balance(a))
        .sum();
    let actual = safe_div(equity, inputs.total_assets(), "equity share denominator") * 100.0;

    let gap = (target - actual).abs();
    let achieved = 1.0 - gap / config.risk_alignment_gap_scale_pp;

    scored(
        FactorKind::RiskAlignment,
        achieved,
        config.weights.risk_alignment,
        FactorDetails::RiskAlignment {
            target_equity_pct: target,
            actual_equity_pct: actual,
            gap_pp: gap,
        },
    )
}

/// Spread across the six tracked classes, with a concentration penalty
pub(crate) fn diversification(inputs: &CanonicalInputs, config: &ScoringConfig) -> FactorScore {
    let total = inputs.total_assets();
    let active = AssetClass::ALL
        .iter()
        .filter(|&&a| inputs.balance(a) > 0.0)
        .count() as u32;

    let largest = AssetClass::ALL
        .iter()
        .map(|&a| inputs.balance(a))
        .fold(0.0, f64::max);
    let largest_share_pct = safe_div(largest, total, "largest share denominator") * 100.0;

    let mut achieved = active as f64 / AssetClass::ALL.len() as f64;
    let concentrated = largest_share_pct > config.concentration_threshold_pct;
    if concentrated {
        achieved *= config.concentration_penalty;
    }

    scored(
        FactorKind::Diversification,
        achieved,
        config.weights.diversification,
        FactorDetails::Diversification {
            active_classes: active,
            total_classes: AssetClass::ALL.len() as u32,
            largest_share_pct,
            concentration_penalty: concentrated,
        },
    )
}

/// Use of the tax-advantaged contribution room (statutory salary caps)
pub(crate) fn tax_efficiency(
    inputs: &CanonicalInputs,
    config: &ScoringConfig,
    country: &CountryParams,
) -> FactorScore {
    let pension_room = inputs
        .gross_monthly_salary
        .min(country.pension_salary_cap_monthly)
        * config.statutory_pension_rate_pct
        / 100.0;
    let pension_util = clamp01(safe_div(
        inputs.monthly_contribution(AssetClass::Pension),
        pension_room,
        "pension room denominator",
    ));

    // Countries without a training-fund vehicle score on pension room alone
    let training_util = if country.supports_training_fund() {
        let room = inputs
            .gross_monthly_salary
            .min(country.training_fund_salary_cap_monthly)
            * config.statutory_training_fund_rate_pct
            / 100.0;
        Some(clamp01(safe_div(
            inputs.monthly_contribution(AssetClass::TrainingFund),
            room,
            "training fund room denominator",
        )))
    } else {
        None
    };

    let achieved = match training_util {
        Some(t) => (pension_util + t) / 2.0,
        None => pension_util,
    };

    scored(
        FactorKind::TaxEfficiency,
        achieved,
        config.weights.tax_efficiency,
        FactorDetails::TaxEfficiency {
            pension_utilization_pct: pension_util * 100.0,
            training_fund_utilization_pct: training_util.map(|t| t * 100.0),
            missing_income: inputs.is_missing("grossMonthlyIncome"),
        },
    )
}

/// Months of expenses covered by liquid cash, against the benchmark
pub(crate) fn emergency_fund(inputs: &CanonicalInputs, config: &ScoringConfig) -> FactorScore {
    let months = safe_div(
        inputs.cash_balance,
        inputs.monthly_expenses,
        "emergency fund denominator",
    );
    let achieved = months / config.emergency_fund_benchmark_months;

    scored(
        FactorKind::EmergencyFund,
        achieved,
        config.weights.emergency_fund,
        FactorDetails::EmergencyFund {
            months_covered: months,
            benchmark_months: config.emergency_fund_benchmark_months,
        },
    )
}

/// Debt service as a share of gross income; no debt data scores full
pub(crate) fn debt_management(inputs: &CanonicalInputs, config: &ScoringConfig) -> FactorScore {
    if !inputs.has_debt_data {
        return scored(
            FactorKind::DebtManagement,
            1.0,
            config.weights.debt_management,
            FactorDetails::DebtManagement {
                debt_to_income_pct: 0.0,
                has_debt_data: false,
            },
        );
    }

    let ratio = safe_div(
        inputs.monthly_debt_payments,
        inputs.gross_monthly_income,
        "debt ratio denominator",
    );
    let achieved = 1.0 - clamp01(ratio / config.debt_ratio_ceiling);

    scored(
        FactorKind::DebtManagement,
        achieved,
        config.weights.debt_management,
        FactorDetails::DebtManagement {
            debt_to_income_pct: ratio * 100.0,
            has_debt_data: true,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{normalize, FinancialProfile};

    fn config() -> ScoringConfig {
        ScoringConfig::default()
    }

    fn inputs(profile: FinancialProfile) -> CanonicalInputs {
        normalize(&profile)
    }

    #[test]
    fn test_savings_rate_benchmark_scaling() {
        // 25% combined contribution rate is above the 20% benchmark
        let full = savings_rate(
            &inputs(FinancialProfile {
                gross_monthly_salary: Some(20_000.0),
                pension_contribution_rate: Some(17.5),
                training_fund_contribution_rate: Some(7.5),
                ..Default::default()
            }),
            &config(),
        );
        assert!((full.score - 25.0).abs() < 1e-9);
        assert_eq!(full.status, ScoreStatus::Excellent);

        // 10% rate is half the benchmark
        let half = savings_rate(
            &inputs(FinancialProfile {
                gross_monthly_salary: Some(20_000.0),
                pension_contribution_rate: Some(10.0),
                training_fund_contribution_rate: Some(0.0),
                ..Default::default()
            }),
            &config(),
        );
        assert!((half.score - 12.5).abs() < 1e-9);
    }

    #[test]
    fn test_zero_income_scores_critical_not_panic() {
        let factor = savings_rate(&inputs(FinancialProfile::default()), &config());

        assert_eq!(factor.score, 0.0);
        assert_eq!(factor.status, ScoreStatus::Critical);
        match factor.details {
            FactorDetails::SavingsRate { missing_income, .. } => assert!(missing_income),
            _ => panic!("wrong details variant"),
        }
    }

    #[test]
    fn test_time_horizon_scaling() {
        let young = time_horizon(
            &inputs(FinancialProfile {
                current_age: Some(30),
                target_retirement_age: Some(67),
                ..Default::default()
            }),
            &config(),
        );
        // 37 years is past the 30-year benchmark
        assert!((young.score - 15.0).abs() < 1e-9);

        let late = time_horizon(
            &inputs(FinancialProfile {
                current_age: Some(58),
                target_retirement_age: Some(67),
                ..Default::default()
            }),
            &config(),
        );
        // 9 of 30 years
        assert!((late.score - 15.0 * 9.0 / 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_risk_alignment_gap() {
        // Age 35: target equity 75%. All assets in pension: actual 0%.
        let misaligned = risk_alignment(
            &inputs(FinancialProfile {
                current_age: Some(35),
                pension_savings: Some(500_000.0),
                ..Default::default()
            }),
            &config(),
        );
        // Gap 75pp exceeds the 50pp scale
        assert_eq!(misaligned.score, 0.0);

        // 75% in equity-like classes matches the target exactly
        let aligned = risk_alignment(
            &inputs(FinancialProfile {
                current_age: Some(35),
                personal_portfolio: Some(75_000.0),
                pension_savings: Some(25_000.0),
                ..Default::default()
            }),
            &config(),
        );
        assert!((aligned.score - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_diversification_counts_and_penalty() {
        // Three active classes, none above 70%
        let spread = diversification(
            &inputs(FinancialProfile {
                pension_savings: Some(100_000.0),
                personal_portfolio: Some(80_000.0),
                emergency_fund: Some(60_000.0),
                ..Default::default()
            }),
            &config(),
        );
        assert!((spread.score - 10.0 * 0.5).abs() < 1e-9);

        // Concentrated: real estate dominates
        let concentrated = diversification(
            &inputs(FinancialProfile {
                real_estate: Some(900_000.0),
                emergency_fund: Some(50_000.0),
                ..Default::default()
            }),
            &config(),
        );
        match concentrated.details {
            FactorDetails::Diversification {
                concentration_penalty,
                largest_share_pct,
                ..
            } => {
                assert!(concentration_penalty);
                assert!(largest_share_pct > 90.0);
            }
            _ => panic!("wrong details variant"),
        }
        // 2/6 halved
        assert!((concentrated.score - 10.0 * (2.0 / 6.0) * 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_tax_efficiency_statutory_room() {
        let country = crate::assumptions::CountryTables::default_2025()
            .get("israel")
            .clone();

        // Full statutory rates use the full room
        let full = tax_efficiency(
            &inputs(FinancialProfile {
                gross_monthly_salary: Some(12_000.0),
                pension_contribution_rate: Some(17.5),
                training_fund_contribution_rate: Some(7.5),
                ..Default::default()
            }),
            &config(),
            &country,
        );
        assert!((full.score - 8.0).abs() < 1e-9);

        // Half the pension rate, no training fund
        let partial = tax_efficiency(
            &inputs(FinancialProfile {
                gross_monthly_salary: Some(8_000.0),
                pension_contribution_rate: Some(8.75),
                training_fund_contribution_rate: Some(0.0),
                ..Default::default()
            }),
            &config(),
            &country,
        );
        assert!((partial.score - 8.0 * 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_tax_efficiency_without_training_fund_vehicle() {
        let country = crate::assumptions::CountryTables::default_2025()
            .get("us")
            .clone();

        let factor = tax_efficiency(
            &inputs(FinancialProfile {
                country: Some("us".to_string()),
                gross_monthly_salary: Some(1_900.0),
                pension_contribution_rate: Some(17.5),
                training_fund_contribution_rate: Some(0.0),
                ..Default::default()
            }),
            &config(),
            &country,
        );

        // Pension utilization alone decides the score
        assert!((factor.score - 8.0).abs() < 1e-9);
        match factor.details {
            FactorDetails::TaxEfficiency {
                training_fund_utilization_pct,
                ..
            } => assert!(training_fund_utilization_pct.is_none()),
            _ => panic!("wrong details variant"),
        }
    }

    #[test]
    fn test_emergency_fund_months() {
        let three_months = emergency_fund(
            &inputs(FinancialProfile {
                total_monthly_expenses: Some(10_000.0),
                emergency_fund: Some(30_000.0),
                ..Default::default()
            }),
            &config(),
        );
        assert!((three_months.score - 3.5).abs() < 1e-9);

        let covered = emergency_fund(
            &inputs(FinancialProfile {
                total_monthly_expenses: Some(10_000.0),
                emergency_fund: Some(90_000.0),
                ..Default::default()
            }),
            &config(),
        );
        assert!((covered.score - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_debt_neutral_when_absent() {
        let factor = debt_management(&inputs(FinancialProfile::default()), &config());

        assert!((factor.score - 3.0).abs() < 1e-9);
        assert_eq!(factor.status, ScoreStatus::Excellent);
    }

    #[test]
    fn test_debt_ratio_scoring() {
        // 20% of gross income on debt service, ceiling 40%
        let factor = debt_management(
            &inputs(FinancialProfile {
                gross_monthly_salary: Some(20_000.0),
                monthly_debt_payments: Some(4_000.0),
                ..Default::default()
            }),
            &config(),
        );
        assert!((factor.score - 1.5).abs() < 1e-9);

        // At or past the ceiling scores zero
        let heavy = debt_management(
            &inputs(FinancialProfile {
                gross_monthly_salary: Some(10_000.0),
                monthly_debt_payments: Some(4_500.0),
                ..Default::default()
            }),
            &config(),
        );
        assert_eq!(heavy.score, 0.0);
    }
}
