//! Load profiles from JSON documents and sample_profiles.csv blocks

use super::data::FinancialProfile;
use super::RiskTolerance;
use csv::Reader;
use std::path::Path;
use thiserror::Error;

/// Errors raised while reading profile inputs
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("failed to read profile file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed profile CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid profile JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown risk tolerance: {0}")]
    UnknownRiskTolerance(String),
}

/// One row of a batch scoring block
#[derive(Debug, Clone)]
pub struct BlockProfile {
    pub profile_id: u32,
    pub profile: FinancialProfile,
}

/// Raw CSV row matching sample_profiles.csv columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "ProfileID")]
    profile_id: u32,
    #[serde(rename = "CurrentAge")]
    current_age: u32,
    #[serde(rename = "RetirementAge")]
    retirement_age: Option<u32>,
    #[serde(rename = "Country")]
    country: String,
    #[serde(rename = "GrossMonthlySalary")]
    gross_monthly_salary: Option<f64>,
    #[serde(rename = "NetMonthlySalary")]
    net_monthly_salary: Option<f64>,
    #[serde(rename = "AnnualBonus")]
    annual_bonus: Option<f64>,
    #[serde(rename = "MonthlyExpenses")]
    monthly_expenses: Option<f64>,
    #[serde(rename = "PensionSavings")]
    pension_savings: Option<f64>,
    #[serde(rename = "TrainingFund")]
    training_fund: Option<f64>,
    #[serde(rename = "PersonalPortfolio")]
    personal_portfolio: Option<f64>,
    #[serde(rename = "RealEstate")]
    real_estate: Option<f64>,
    #[serde(rename = "Crypto")]
    crypto: Option<f64>,
    #[serde(rename = "EmergencyFund")]
    emergency_fund: Option<f64>,
    #[serde(rename = "PensionRate")]
    pension_rate: Option<f64>,
    #[serde(rename = "TrainingFundRate")]
    training_fund_rate: Option<f64>,
    #[serde(rename = "RiskTolerance")]
    risk_tolerance: String,
    #[serde(rename = "MonthlyDebtPayments")]
    monthly_debt_payments: Option<f64>,
}

impl CsvRow {
    fn to_block_profile(self) -> Result<BlockProfile, ProfileError> {
        let risk_tolerance = match self.risk_tolerance.parse::<RiskTolerance>() {
            Ok(r) => Some(r),
            Err(_) if self.risk_tolerance.trim().is_empty() => None,
            Err(_) => return Err(ProfileError::UnknownRiskTolerance(self.risk_tolerance)),
        };

        let profile = FinancialProfile {
            country: Some(self.country),
            current_age: Some(self.current_age),
            target_retirement_age: self.retirement_age,
            gross_monthly_salary: self.gross_monthly_salary,
            net_monthly_salary: self.net_monthly_salary,
            annual_bonus: self.annual_bonus,
            total_monthly_expenses: self.monthly_expenses,
            pension_savings: self.pension_savings,
            training_fund: self.training_fund,
            personal_portfolio: self.personal_portfolio,
            real_estate: self.real_estate,
            crypto: self.crypto,
            emergency_fund: self.emergency_fund,
            pension_contribution_rate: self.pension_rate,
            training_fund_contribution_rate: self.training_fund_rate,
            risk_tolerance,
            monthly_debt_payments: self.monthly_debt_payments,
            ..Default::default()
        };

        Ok(BlockProfile {
            profile_id: self.profile_id,
            profile,
        })
    }
}

/// Load all profiles from a CSV block file
pub fn load_block<P: AsRef<Path>>(path: P) -> Result<Vec<BlockProfile>, ProfileError> {
    let mut reader = Reader::from_path(path)?;
    let mut profiles = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        profiles.push(row.to_block_profile()?);
    }

    Ok(profiles)
}

/// Load profiles from any reader (e.g., string buffer, network stream)
pub fn load_block_from_reader<R: std::io::Read>(
    reader: R,
) -> Result<Vec<BlockProfile>, ProfileError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut profiles = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        profiles.push(row.to_block_profile()?);
    }

    Ok(profiles)
}

/// Load profiles from the default sample_profiles.csv location
pub fn load_default_block() -> Result<Vec<BlockProfile>, ProfileError> {
    load_block("data/sample_profiles.csv")
}

/// Load a single profile from a JSON document
pub fn load_profile_json<P: AsRef<Path>>(path: P) -> Result<FinancialProfile, ProfileError> {
    let contents = std::fs::read_to_string(path)?;
    profile_from_json(&contents)
}

/// Parse a profile from a JSON string
pub fn profile_from_json(json: &str) -> Result<FinancialProfile, ProfileError> {
    Ok(serde_json::from_str(json)?)
}
