//! Assumption tables: returns, glide path, country parameters, inflation
//!
//! All tables are immutable value objects injected into the engine
//! components, so a "current year" revision is just a different
//! `Assumptions` value and every computation stays deterministic.

mod country;
mod glide;
mod inflation;
mod returns;
pub mod loader;

pub use country::{
    AccrualSchedule, BenefitParams, ContributionBands, CountryParams, CountryTables,
    GuaranteeParams, MeansTest, OldAgeParams, FALLBACK_COUNTRY,
};
pub use glide::{AdjustedReturn, GlidePath, ReturnAssumptions};
pub use inflation::{
    erosion_schedule, purchasing_power_erosion, real_return, real_value, ErosionYear,
    InflationScenario, InflationScenarios,
};
pub use loader::{AssumptionsError, LoadedAssumptions};
pub use returns::{AssetClass, ReturnBand, ReturnModel};

use crate::rebalancing::RebalancingConfig;
use crate::scoring::ScoringConfig;
use std::path::Path;

/// Container for the full assumption set
#[derive(Debug, Clone)]
pub struct Assumptions {
    pub returns: ReturnModel,
    pub glide: GlidePath,
    pub countries: CountryTables,
    pub inflation: InflationScenarios,
    pub scoring: ScoringConfig,
    pub rebalancing: RebalancingConfig,
}

impl Assumptions {
    /// Create assumptions with the built-in 2025 revision values
    pub fn default_2025() -> Self {
        Self {
            returns: ReturnModel::default_2025(),
            glide: GlidePath::default_2025(),
            countries: CountryTables::default_2025(),
            inflation: InflationScenarios::default_2025(),
            scoring: ScoringConfig::default(),
            rebalancing: RebalancingConfig::default(),
        }
    }

    /// Load table overrides from CSV files in the default location
    /// (data/assumptions/)
    pub fn from_csv() -> Result<Self, AssumptionsError> {
        Self::from_csv_path(Path::new(loader::DEFAULT_ASSUMPTIONS_PATH))
    }

    /// Load table overrides from CSV files in a specific directory
    pub fn from_csv_path(path: &Path) -> Result<Self, AssumptionsError> {
        let loaded = LoadedAssumptions::load_from(path)?;

        let mut assumptions = Self::default_2025();
        assumptions.returns = ReturnModel::from_loaded(&loaded.return_bands);
        loaded.apply_country_overrides(&mut assumptions.countries);
        Ok(assumptions)
    }
}
