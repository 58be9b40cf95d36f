//! Inflation scenarios and real-value adjustment
//!
//! Hosts the named scenario table plus the adjuster math used both standalone
//! and as a post-processing step over projection output: real (deflated)
//! values, Fisher real returns and purchasing-power erosion schedules.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::math::safe_div;

/// Named inflation scenarios
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InflationScenario {
    Optimistic,
    #[default]
    Moderate,
    Pessimistic,
    Historical,
}

impl InflationScenario {
    pub const ALL: [InflationScenario; 4] = [
        InflationScenario::Optimistic,
        InflationScenario::Moderate,
        InflationScenario::Pessimistic,
        InflationScenario::Historical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InflationScenario::Optimistic => "optimistic",
            InflationScenario::Moderate => "moderate",
            InflationScenario::Pessimistic => "pessimistic",
            InflationScenario::Historical => "historical",
        }
    }
}

impl fmt::Display for InflationScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InflationScenario {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "optimistic" => Ok(InflationScenario::Optimistic),
            "moderate" => Ok(InflationScenario::Moderate),
            "pessimistic" => Ok(InflationScenario::Pessimistic),
            "historical" => Ok(InflationScenario::Historical),
            other => Err(format!("unknown inflation scenario: {}", other)),
        }
    }
}

/// Annual inflation rate per scenario, percent
#[derive(Debug, Clone)]
pub struct InflationScenarios {
    pub optimistic: f64,
    pub moderate: f64,
    pub pessimistic: f64,
    pub historical: f64,
}

impl InflationScenarios {
    /// Create the default 2025 scenario table
    pub fn default_2025() -> Self {
        Self {
            optimistic: 1.5,
            moderate: 2.5,
            pessimistic: 4.0,
            historical: 3.1, // Long-run CPI average
        }
    }

    /// Annual rate for a scenario, percent
    pub fn rate(&self, scenario: InflationScenario) -> f64 {
        match scenario {
            InflationScenario::Optimistic => self.optimistic,
            InflationScenario::Moderate => self.moderate,
            InflationScenario::Pessimistic => self.pessimistic,
            InflationScenario::Historical => self.historical,
        }
    }
}

/// Deflate a nominal amount over a number of years.
/// Compound: `nominal / (1+r)^y`; simple: `nominal / (1 + r*y)`.
pub fn real_value(nominal: f64, annual_rate_pct: f64, years: f64, compounding: bool) -> f64 {
    let rate = annual_rate_pct / 100.0;
    let divisor = if compounding {
        (1.0 + rate).powf(years)
    } else {
        1.0 + rate * years
    };
    safe_div(nominal, divisor, "real_value divisor")
}

/// Fisher real return: `((1+nominal)/(1+inflation)) - 1`, in percent
pub fn real_return(nominal_pct: f64, inflation_pct: f64) -> f64 {
    let growth = safe_div(
        1.0 + nominal_pct / 100.0,
        1.0 + inflation_pct / 100.0,
        "real_return divisor",
    );
    (growth - 1.0) * 100.0
}

/// Fraction of purchasing power lost over a horizon, in [0,1)
pub fn purchasing_power_erosion(annual_rate_pct: f64, years: f64) -> f64 {
    1.0 - real_value(1.0, annual_rate_pct, years, true)
}

/// One year of an erosion schedule
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErosionYear {
    pub year: u32,
    /// Real value of the nominal amount at this year
    pub real_value: f64,
    /// Cumulative purchasing power lost, percent
    pub cumulative_erosion_pct: f64,
}

/// Year-by-year real value of a fixed nominal amount
pub fn erosion_schedule(nominal: f64, annual_rate_pct: f64, years: u32) -> Vec<ErosionYear> {
    (1..=years)
        .map(|year| {
            let real = real_value(nominal, annual_rate_pct, year as f64, true);
            ErosionYear {
                year,
                real_value: real,
                cumulative_erosion_pct: purchasing_power_erosion(annual_rate_pct, year as f64)
                    * 100.0,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_year_identity() {
        assert_eq!(real_value(100_000.0, 2.5, 0.0, true), 100_000.0);
        assert_eq!(real_value(100_000.0, 2.5, 0.0, false), 100_000.0);
    }

    #[test]
    fn test_compound_deflation() {
        // 1,000,000 at 2.5% over 20 years
        let real = real_value(1_000_000.0, 2.5, 20.0, true);
        let expected = 1_000_000.0 / 1.025f64.powi(20);
        assert!((real - expected).abs() < 1e-6);
        assert!(real < 1_000_000.0);
    }

    #[test]
    fn test_simple_deflation() {
        let real = real_value(100_000.0, 3.0, 10.0, false);
        assert!((real - 100_000.0 / 1.3).abs() < 1e-6);
    }

    #[test]
    fn test_algebraic_inversion_roundtrip() {
        // Deflating by r then by the algebraic inverse -r/(1+r) recovers
        // the original amount
        let rate = 2.5;
        let inverse = -rate / (1.0 + rate / 100.0);
        let forward = real_value(250_000.0, rate, 15.0, true);
        let back = real_value(forward, inverse, 15.0, true);
        assert!((back - 250_000.0).abs() < 1e-6, "roundtrip drifted: {}", back);
    }

    #[test]
    fn test_fisher_real_return() {
        // 7% nominal under 2.5% inflation
        let real = real_return(7.0, 2.5);
        assert!((real - 4.3902439).abs() < 1e-6);

        // Inflation equal to nominal return leaves zero real growth
        assert!(real_return(3.0, 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_erosion_schedule() {
        let schedule = erosion_schedule(10_000.0, 3.0, 10);
        assert_eq!(schedule.len(), 10);

        // Erosion is monotonic
        for pair in schedule.windows(2) {
            assert!(pair[1].real_value < pair[0].real_value);
            assert!(pair[1].cumulative_erosion_pct > pair[0].cumulative_erosion_pct);
        }

        let last = &schedule[9];
        assert!((last.real_value - 10_000.0 / 1.03f64.powi(10)).abs() < 1e-6);
    }

    #[test]
    fn test_scenario_table() {
        let scenarios = InflationScenarios::default_2025();

        assert_eq!(scenarios.rate(InflationScenario::Optimistic), 1.5);
        assert_eq!(scenarios.rate(InflationScenario::Moderate), 2.5);
        assert_eq!(scenarios.rate(InflationScenario::Pessimistic), 4.0);
        assert_eq!(scenarios.rate(InflationScenario::Historical), 3.1);
        assert_eq!("pessimistic".parse::<InflationScenario>().unwrap(),
            InflationScenario::Pessimistic);
    }
}
