//! Expected return assumptions by asset class
//!
//! Each tracked asset class carries a base annual return and a plausibility
//! band. Every adjustment downstream (glide path, risk scaling, dampeners)
//! is clamped back into the band, so a profile can never be projected with
//! a return the model considers implausible for that class.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Asset classes tracked by the projection engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssetClass {
    Pension,
    TrainingFund,
    PersonalPortfolio,
    RealEstate,
    Crypto,
    Cash,
}

impl AssetClass {
    /// All classes in canonical order
    pub const ALL: [AssetClass; 6] = [
        AssetClass::Pension,
        AssetClass::TrainingFund,
        AssetClass::PersonalPortfolio,
        AssetClass::RealEstate,
        AssetClass::Crypto,
        AssetClass::Cash,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetClass::Pension => "pension",
            AssetClass::TrainingFund => "trainingFund",
            AssetClass::PersonalPortfolio => "personalPortfolio",
            AssetClass::RealEstate => "realEstate",
            AssetClass::Crypto => "crypto",
            AssetClass::Cash => "cash",
        }
    }

    /// Classes treated as equity-like for risk alignment purposes
    pub fn is_equity_like(&self) -> bool {
        matches!(self, AssetClass::PersonalPortfolio | AssetClass::Crypto)
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "pension" => Ok(AssetClass::Pension),
            "trainingFund" => Ok(AssetClass::TrainingFund),
            "personalPortfolio" => Ok(AssetClass::PersonalPortfolio),
            "realEstate" => Ok(AssetClass::RealEstate),
            "crypto" => Ok(AssetClass::Crypto),
            "cash" => Ok(AssetClass::Cash),
            other => Err(format!("unknown asset class: {}", other)),
        }
    }
}

/// Base annual return and plausibility band for one class, in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnBand {
    pub base: f64,
    pub min: f64,
    pub max: f64,
}

impl ReturnBand {
    pub fn new(base: f64, min: f64, max: f64) -> Self {
        Self { base, min, max }
    }

    /// Clamp an adjusted return back into the band
    pub fn clamp(&self, annual_pct: f64) -> f64 {
        annual_pct.clamp(self.min, self.max)
    }
}

/// Return assumptions for all tracked asset classes
#[derive(Debug, Clone)]
pub struct ReturnModel {
    bands: BTreeMap<AssetClass, ReturnBand>,
}

impl ReturnModel {
    /// Create the default 2025 return model
    pub fn default_2025() -> Self {
        let mut bands = BTreeMap::new();
        bands.insert(AssetClass::Pension, ReturnBand::new(7.0, 3.0, 10.0)); // Diversified pension track
        bands.insert(AssetClass::TrainingFund, ReturnBand::new(6.5, 3.0, 9.0)); // General track
        bands.insert(AssetClass::PersonalPortfolio, ReturnBand::new(8.0, 4.0, 12.0)); // Equity-heavy brokerage
        bands.insert(AssetClass::RealEstate, ReturnBand::new(5.5, 2.0, 8.0)); // Residential appreciation
        bands.insert(AssetClass::Crypto, ReturnBand::new(15.0, 5.0, 25.0)); // High volatility
        bands.insert(AssetClass::Cash, ReturnBand::new(1.5, 0.5, 4.0)); // Deposits / money market

        Self { bands }
    }

    /// Create from loaded CSV data
    pub fn from_loaded(bands: &BTreeMap<AssetClass, ReturnBand>) -> Self {
        let mut model = Self::default_2025();
        for (asset, band) in bands {
            model.bands.insert(*asset, *band);
        }
        model
    }

    /// Band for a given class
    pub fn band(&self, asset: AssetClass) -> ReturnBand {
        // Every class is seeded in the default table
        self.bands
            .get(&asset)
            .copied()
            .unwrap_or(ReturnBand::new(0.0, 0.0, 0.0))
    }

    /// Base annual return for a given class, percent
    pub fn base_return(&self, asset: AssetClass) -> f64 {
        self.band(asset).base
    }

    pub fn iter(&self) -> impl Iterator<Item = (AssetClass, ReturnBand)> + '_ {
        self.bands.iter().map(|(a, b)| (*a, *b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_2025_bands() {
        let model = ReturnModel::default_2025();

        assert_eq!(model.base_return(AssetClass::Pension), 7.0);
        assert_eq!(model.base_return(AssetClass::Crypto), 15.0);
        assert_eq!(model.band(AssetClass::Cash).min, 0.5);
        assert_eq!(model.band(AssetClass::PersonalPortfolio).max, 12.0);
        assert_eq!(model.iter().count(), 6);
    }

    #[test]
    fn test_band_clamp() {
        let band = ReturnBand::new(7.0, 3.0, 10.0);

        assert_eq!(band.clamp(12.5), 10.0);
        assert_eq!(band.clamp(1.0), 3.0);
        assert_eq!(band.clamp(6.2), 6.2);
    }

    #[test]
    fn test_asset_class_roundtrip() {
        for asset in AssetClass::ALL {
            let parsed: AssetClass = asset.as_str().parse().unwrap();
            assert_eq!(parsed, asset);
        }
        assert!("commodities".parse::<AssetClass>().is_err());
    }
}
