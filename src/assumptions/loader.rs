//! CSV-based assumption overrides
//!
//! Reads table revisions from data/assumptions/: per-class return bands and
//! scalar country-parameter overrides. Anything not present in the files
//! keeps its built-in default, so the CSVs only need to carry what changed
//! in a revision.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;
use thiserror::Error;

use super::country::CountryTables;
use super::returns::{AssetClass, ReturnBand};

/// Default path to the assumptions directory
pub const DEFAULT_ASSUMPTIONS_PATH: &str = "data/assumptions";

/// Errors raised while loading assumption files
#[derive(Debug, Error)]
pub enum AssumptionsError {
    #[error("failed to read assumption file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed assumption CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("bad numeric value: {0}")]
    ParseFloat(#[from] std::num::ParseFloatError),
    #[error("unknown asset class in return_bands.csv: {0}")]
    UnknownAsset(String),
}

/// Load per-class return band overrides from CSV.
/// Columns: Asset, Base, Min, Max (annual percent).
pub fn load_return_bands(path: &Path) -> Result<BTreeMap<AssetClass, ReturnBand>, AssumptionsError> {
    let file = File::open(path.join("return_bands.csv"))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut bands = BTreeMap::new();

    for result in reader.records() {
        let record = result?;
        let asset: AssetClass = record[0]
            .parse()
            .map_err(|_| AssumptionsError::UnknownAsset(record[0].to_string()))?;
        let base: f64 = record[1].parse()?;
        let min: f64 = record[2].parse()?;
        let max: f64 = record[3].parse()?;
        bands.insert(asset, ReturnBand::new(base, min, max));
    }

    Ok(bands)
}

/// One scalar country-parameter override row
#[derive(Debug, Clone)]
pub struct CountryOverride {
    pub country: String,
    pub param: String,
    pub value: f64,
}

/// Load scalar country-parameter overrides from CSV.
/// Columns: Country, Param, Value (long format, one override per row).
pub fn load_country_overrides(path: &Path) -> Result<Vec<CountryOverride>, AssumptionsError> {
    let file = File::open(path.join("country_params.csv"))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut overrides = Vec::new();

    for result in reader.records() {
        let record = result?;
        overrides.push(CountryOverride {
            country: record[0].trim().to_ascii_lowercase(),
            param: record[1].trim().to_string(),
            value: record[2].parse()?,
        });
    }

    Ok(overrides)
}

/// All override data read from the assumptions directory
pub struct LoadedAssumptions {
    pub return_bands: BTreeMap<AssetClass, ReturnBand>,
    pub country_overrides: Vec<CountryOverride>,
}

impl LoadedAssumptions {
    /// Load overrides from the default path
    pub fn load_default() -> Result<Self, AssumptionsError> {
        Self::load_from(Path::new(DEFAULT_ASSUMPTIONS_PATH))
    }

    /// Load overrides from a specific path
    pub fn load_from(path: &Path) -> Result<Self, AssumptionsError> {
        Ok(Self {
            return_bands: load_return_bands(path)?,
            country_overrides: load_country_overrides(path)?,
        })
    }

    /// Apply the country overrides onto a registry. Rows naming unknown
    /// countries or parameters are skipped with a warning, the built-in
    /// table keeps its value.
    pub fn apply_country_overrides(&self, countries: &mut CountryTables) {
        for row in &self.country_overrides {
            match countries.get_mut(&row.country) {
                Some(params) => {
                    if !params.set_scalar(&row.param, row.value) {
                        log::warn!(
                            "ignoring unknown parameter '{}' for country '{}'",
                            row.param,
                            row.country
                        );
                    }
                }
                None => {
                    log::warn!(
                        "ignoring override for unknown country '{}'",
                        row.country
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_default_overrides() {
        let result = LoadedAssumptions::load_default();
        assert!(result.is_ok(), "Failed to load assumptions: {:?}", result.err());

        let loaded = result.unwrap();

        // Return bands cover every tracked class
        assert_eq!(loaded.return_bands.len(), 6);
        let pension = loaded.return_bands[&AssetClass::Pension];
        assert!(pension.min <= pension.base && pension.base <= pension.max);

        // Country override rows present
        assert!(!loaded.country_overrides.is_empty());
    }

    #[test]
    fn test_apply_country_overrides() {
        let loaded = LoadedAssumptions {
            return_bands: BTreeMap::new(),
            country_overrides: vec![
                CountryOverride {
                    country: "israel".to_string(),
                    param: "averageWage".to_string(),
                    value: 13_500.0,
                },
                CountryOverride {
                    country: "israel".to_string(),
                    param: "noSuchParam".to_string(),
                    value: 1.0,
                },
                CountryOverride {
                    country: "atlantis".to_string(),
                    param: "averageWage".to_string(),
                    value: 9_999.0,
                },
            ],
        };

        let mut countries = CountryTables::default_2025();
        loaded.apply_country_overrides(&mut countries);

        assert_eq!(countries.get("israel").average_wage_monthly, 13_500.0);
        // Unknown rows were skipped without touching anything
        assert_eq!(countries.get("uk").average_wage_monthly, 2_950.0);
    }
}
