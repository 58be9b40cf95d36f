//! Health report output structures

use serde::Serialize;
use std::fmt;

use crate::profile::ValidationWarning;
use crate::projection::ProjectionSummary;

/// The eight scored factors, in canonical report order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FactorKind {
    SavingsRate,
    RetirementReadiness,
    TimeHorizon,
    RiskAlignment,
    Diversification,
    TaxEfficiency,
    EmergencyFund,
    DebtManagement,
}

impl FactorKind {
    pub const ALL: [FactorKind; 8] = [
        FactorKind::SavingsRate,
        FactorKind::RetirementReadiness,
        FactorKind::TimeHorizon,
        FactorKind::RiskAlignment,
        FactorKind::Diversification,
        FactorKind::TaxEfficiency,
        FactorKind::EmergencyFund,
        FactorKind::DebtManagement,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FactorKind::SavingsRate => "savingsRate",
            FactorKind::RetirementReadiness => "retirementReadiness",
            FactorKind::TimeHorizon => "timeHorizon",
            FactorKind::RiskAlignment => "riskAlignment",
            FactorKind::Diversification => "diversification",
            FactorKind::TaxEfficiency => "taxEfficiency",
            FactorKind::EmergencyFund => "emergencyFund",
            FactorKind::DebtManagement => "debtManagement",
        }
    }
}

impl fmt::Display for FactorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Qualitative status derived from the achieved fraction of a weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreStatus {
    Excellent,
    Good,
    Fair,
    Poor,
    Critical,
}

impl ScoreStatus {
    /// Achieved fraction below which a factor generates a suggestion
    pub const FAIR_THRESHOLD: f64 = 0.45;

    /// Map an achieved fraction (score/weight) to a status
    pub fn from_achieved(achieved: f64) -> Self {
        if achieved >= 0.85 {
            ScoreStatus::Excellent
        } else if achieved >= 0.65 {
            ScoreStatus::Good
        } else if achieved >= Self::FAIR_THRESHOLD {
            ScoreStatus::Fair
        } else if achieved >= 0.25 {
            ScoreStatus::Poor
        } else {
            ScoreStatus::Critical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreStatus::Excellent => "excellent",
            ScoreStatus::Good => "good",
            ScoreStatus::Fair => "fair",
            ScoreStatus::Poor => "poor",
            ScoreStatus::Critical => "critical",
        }
    }
}

impl fmt::Display for ScoreStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-factor computation detail, one variant per factor
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase", untagged)]
pub enum FactorDetails {
    SavingsRate {
        monthly_contributions: f64,
        gross_monthly_income: f64,
        rate_pct: f64,
        benchmark_pct: f64,
        missing_income: bool,
    },
    RetirementReadiness {
        projected_accumulation: f64,
        retirement_goal: f64,
        coverage_pct: f64,
    },
    TimeHorizon {
        years_to_retirement: u32,
        benchmark_years: f64,
    },
    RiskAlignment {
        target_equity_pct: f64,
        actual_equity_pct: f64,
        gap_pp: f64,
    },
    Diversification {
        active_classes: u32,
        total_classes: u32,
        largest_share_pct: f64,
        concentration_penalty: bool,
    },
    TaxEfficiency {
        pension_utilization_pct: f64,
        training_fund_utilization_pct: Option<f64>,
        missing_income: bool,
    },
    EmergencyFund {
        months_covered: f64,
        benchmark_months: f64,
    },
    DebtManagement {
        debt_to_income_pct: f64,
        has_debt_data: bool,
    },
}

/// One scored factor
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorScore {
    pub factor: FactorKind,
    /// Pre-scaled to the weight: 0 <= score <= weight
    pub score: f64,
    pub weight: f64,
    pub status: ScoreStatus,
    pub details: FactorDetails,
}

impl FactorScore {
    /// Fraction of the weight achieved
    pub fn achieved(&self) -> f64 {
        if self.weight > 0.0 {
            self.score / self.weight
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionPriority {
    High,
    Medium,
}

/// One ranked improvement suggestion
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub factor: FactorKind,
    pub priority: SuggestionPriority,
    pub message: String,
    /// Score points available by bringing the factor to its full weight
    pub potential_gain: f64,
}

/// Age-band peer medians reported next to the user's values
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerComparison {
    pub age_band: String,
    pub median_savings_rate_pct: f64,
    pub median_emergency_fund_months: f64,
    pub median_total_score: f64,
    pub user_savings_rate_pct: f64,
    pub user_emergency_fund_months: f64,
    pub user_total_score: f64,
}

/// Primary scoring output: a fresh value on every call, never mutated
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    /// Weighted total, 0 to 100
    pub total_score: f64,
    pub status: ScoreStatus,
    /// All eight factors in canonical order
    pub factors: Vec<FactorScore>,
    /// Ranked by potential gain, highest first
    pub suggestions: Vec<Suggestion>,
    pub peer_comparison: Option<PeerComparison>,
    /// Structural problems found during normalization
    pub warnings: Vec<ValidationWarning>,
    /// Logical fields that could not be resolved from the profile
    pub missing_fields: Vec<String>,
    /// The projection behind the readiness factor
    pub projection: ProjectionSummary,
    pub country: String,
}

impl HealthReport {
    pub fn factor(&self, kind: FactorKind) -> Option<&FactorScore> {
        self.factors.iter().find(|f| f.factor == kind)
    }
}
