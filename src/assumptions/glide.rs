//! Glide-path return adjustment
//!
//! Base returns are scaled by a combined factor built from three profile
//! attributes (time horizon, age, risk tolerance) and then by a per-class
//! dampener, with the result clamped into the class band. Longer horizons
//! and younger ages keep more of the base return; short horizons shave it.

use serde::Serialize;

use super::returns::{AssetClass, ReturnModel};
use crate::profile::RiskTolerance;

/// One class's fully adjusted return
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustedReturn {
    pub asset: AssetClass,
    /// Base annual return before adjustment, percent
    pub base_return: f64,
    /// Total multiplier applied (combined factor x class dampener)
    pub factor: f64,
    /// Final annual return after band clamping, percent
    pub adjusted_return: f64,
}

/// Adjusted returns for all classes under one profile
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnAssumptions {
    /// Horizon x age x risk multiplier, after clamping
    pub combined_factor: f64,
    pub entries: Vec<AdjustedReturn>,
}

impl ReturnAssumptions {
    pub fn get(&self, asset: AssetClass) -> Option<&AdjustedReturn> {
        self.entries.iter().find(|e| e.asset == asset)
    }

    /// Adjusted annual return for a class, percent
    pub fn adjusted(&self, asset: AssetClass) -> f64 {
        self.get(asset).map_or(0.0, |e| e.adjusted_return)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AdjustedReturn> {
        self.entries.iter()
    }
}

/// Glide-path multiplier tables
#[derive(Debug, Clone)]
pub struct GlidePath {
    /// Bounds on the combined multiplier
    pub min_combined: f64,
    pub max_combined: f64,
    /// Horizon at or below which crypto gets the harder dampener
    pub crypto_short_horizon_years: u32,
}

impl Default for GlidePath {
    fn default() -> Self {
        Self {
            min_combined: 0.5,
            max_combined: 1.3,
            crypto_short_horizon_years: 10,
        }
    }
}

impl GlidePath {
    /// Create the default 2025 glide path
    pub fn default_2025() -> Self {
        Self::default()
    }

    /// Time-horizon multiplier by years to retirement
    pub fn horizon_factor(&self, years_to_retirement: u32) -> f64 {
        match years_to_retirement {
            y if y >= 30 => 1.00, // Full base return
            y if y >= 20 => 0.95,
            y if y >= 10 => 0.90,
            y if y >= 5 => 0.85,
            _ => 0.80, // Near retirement
        }
    }

    /// Age multiplier
    pub fn age_factor(&self, age: u32) -> f64 {
        match age {
            a if a <= 30 => 1.05, // Longest runway
            a if a <= 40 => 1.02,
            a if a <= 50 => 0.98,
            a if a <= 60 => 0.94,
            _ => 0.90,
        }
    }

    /// Risk-tolerance multiplier
    pub fn risk_factor(&self, risk: RiskTolerance) -> f64 {
        match risk {
            RiskTolerance::Conservative => 0.85,
            RiskTolerance::Moderate => 1.00,
            RiskTolerance::Aggressive => 1.15,
        }
    }

    /// Combined multiplier, clamped to the configured bounds
    pub fn combined_factor(&self, age: u32, years_to_retirement: u32, risk: RiskTolerance) -> f64 {
        let raw = self.horizon_factor(years_to_retirement)
            * self.age_factor(age)
            * self.risk_factor(risk);
        raw.clamp(self.min_combined, self.max_combined)
    }

    /// Class-specific dampener applied on top of the combined factor
    pub fn dampener(&self, asset: AssetClass, years_to_retirement: u32) -> f64 {
        match asset {
            AssetClass::Pension => 0.90,       // Regulated, bond-heavier mandate
            AssetClass::TrainingFund => 0.95,  // General track
            AssetClass::PersonalPortfolio => 1.00,
            AssetClass::RealEstate => 0.80,    // Illiquid, appraisal-smoothed
            AssetClass::Crypto => {
                if years_to_retirement > self.crypto_short_horizon_years {
                    1.00
                } else {
                    0.70 // No time to recover a drawdown
                }
            }
            AssetClass::Cash => 1.00,
        }
    }

    /// Adjust base returns for one profile. Every result is clamped back
    /// into its class band.
    pub fn adjust(
        &self,
        returns: &ReturnModel,
        age: u32,
        years_to_retirement: u32,
        risk: RiskTolerance,
    ) -> ReturnAssumptions {
        let combined = self.combined_factor(age, years_to_retirement, risk);

        let entries = returns
            .iter()
            .map(|(asset, band)| {
                let factor = combined * self.dampener(asset, years_to_retirement);
                AdjustedReturn {
                    asset,
                    base_return: band.base,
                    factor,
                    adjusted_return: band.clamp(band.base * factor),
                }
            })
            .collect();

        ReturnAssumptions {
            combined_factor: combined,
            entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizon_steps() {
        let glide = GlidePath::default_2025();

        assert_eq!(glide.horizon_factor(35), 1.00);
        assert_eq!(glide.horizon_factor(30), 1.00);
        assert_eq!(glide.horizon_factor(25), 0.95);
        assert_eq!(glide.horizon_factor(12), 0.90);
        assert_eq!(glide.horizon_factor(7), 0.85);
        assert_eq!(glide.horizon_factor(3), 0.80);
    }

    #[test]
    fn test_age_steps() {
        let glide = GlidePath::default_2025();

        assert_eq!(glide.age_factor(28), 1.05);
        assert_eq!(glide.age_factor(40), 1.02);
        assert_eq!(glide.age_factor(47), 0.98);
        assert_eq!(glide.age_factor(58), 0.94);
        assert_eq!(glide.age_factor(64), 0.90);
    }

    #[test]
    fn test_combined_factor_clamped() {
        let glide = GlidePath::default_2025();

        // 28yo aggressive with 35y horizon: 1.00 * 1.05 * 1.15 = 1.2075
        let high = glide.combined_factor(28, 35, RiskTolerance::Aggressive);
        assert!((high - 1.2075).abs() < 1e-10);
        assert!(high <= glide.max_combined);

        // 64yo conservative with 3y horizon: 0.80 * 0.90 * 0.85 = 0.612
        let low = glide.combined_factor(64, 3, RiskTolerance::Conservative);
        assert!((low - 0.612).abs() < 1e-10);
        assert!(low >= glide.min_combined);
    }

    #[test]
    fn test_crypto_dampener_switches_on_horizon() {
        let glide = GlidePath::default_2025();

        assert_eq!(glide.dampener(AssetClass::Crypto, 25), 1.00);
        assert_eq!(glide.dampener(AssetClass::Crypto, 10), 0.70);
        assert_eq!(glide.dampener(AssetClass::Crypto, 4), 0.70);
    }

    #[test]
    fn test_adjusted_returns_stay_in_band() {
        let glide = GlidePath::default_2025();
        let returns = ReturnModel::default_2025();

        for &(age, years, risk) in &[
            (28u32, 39u32, RiskTolerance::Aggressive),
            (45, 22, RiskTolerance::Moderate),
            (63, 4, RiskTolerance::Conservative),
        ] {
            let adjusted = glide.adjust(&returns, age, years, risk);
            for entry in adjusted.iter() {
                let band = returns.band(entry.asset);
                assert!(
                    entry.adjusted_return >= band.min && entry.adjusted_return <= band.max,
                    "{} out of band: {}",
                    entry.asset,
                    entry.adjusted_return
                );
            }
        }
    }

    #[test]
    fn test_longer_horizon_never_lowers_returns() {
        let glide = GlidePath::default_2025();
        let returns = ReturnModel::default_2025();

        // Same 30yo moderate profile, 5y vs 30y runway
        let short = glide.adjust(&returns, 30, 5, RiskTolerance::Moderate);
        let long = glide.adjust(&returns, 30, 30, RiskTolerance::Moderate);

        for asset in AssetClass::ALL {
            assert!(
                long.adjusted(asset) >= short.adjusted(asset),
                "{} shrank with a longer horizon",
                asset
            );
        }
    }
}
