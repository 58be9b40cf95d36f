//! Rebalancing analyzer
//!
//! Compares the current allocation against the target mix, raises threshold
//! and calendar triggers, estimates the capital-gains drag of the required
//! sell-down and weighs the annual benefit of realignment against the one-off
//! cost. The analyzer validates its inputs but never corrects them; a
//! malformed allocation is reported alongside the computed analysis.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::assumptions::CountryParams;
use crate::profile::{validate_allocation, Allocation, AllocationKind, RiskTolerance, ValidationWarning};

/// How badly the portfolio has drifted from its target mix
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    None,
    Low,
    Medium,
    High,
    Critical,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::None => "none",
            Urgency::Low => "low",
            Urgency::Medium => "medium",
            Urgency::High => "high",
            Urgency::Critical => "critical",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final recommendation after weighing benefit against cost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Proceed,
    Consider,
    Defer,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Proceed => "proceed",
            Verdict::Consider => "consider",
            Verdict::Defer => "defer",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A condition that argues for rebalancing now
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum RebalanceTrigger {
    /// A class drifted past the lowest threshold tier
    Threshold { class: String, deviation_pp: f64 },
    /// More months than the risk calendar allows have passed since the
    /// last rebalance
    TimeElapsed {
        months_elapsed: u32,
        calendar_months: u32,
        months_overdue: u32,
    },
}

/// Estimated capital-gains tax on the sell-down leg
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxImpact {
    /// Notional that must be sold to reach the target mix
    pub sell_volume: f64,
    /// Assumed share of the sold notional that is unrealized gain
    pub embedded_gain_ratio: f64,
    pub capital_gains_rate_pct: f64,
    pub estimated_tax: f64,
}

/// One-off cost of the trade versus the annualized benefit of realignment
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBenefit {
    /// Total traded notional, both legs
    pub trade_volume: f64,
    pub trade_cost: f64,
    pub tax_cost: f64,
    pub total_cost: f64,
    /// Expected-return difference between target and current mixes, percent
    pub return_gap_pct: f64,
    /// Annualized charge for carrying an off-target risk profile
    pub drift_penalty: f64,
    pub annual_benefit: f64,
}

/// Full rebalancing assessment for one portfolio snapshot
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RebalancingAnalysis {
    pub as_of: NaiveDate,
    pub portfolio_value: f64,
    /// Structural problems in either allocation set, reported as-is
    pub warnings: Vec<ValidationWarning>,
    /// `target − current` percentage points per allocation class
    pub deviations: BTreeMap<String, f64>,
    pub max_deviation_pp: f64,
    pub urgency: Urgency,
    pub triggers: Vec<RebalanceTrigger>,
    pub tax_impact: TaxImpact,
    pub cost_benefit: CostBenefit,
    pub verdict: Verdict,
}

impl RebalancingAnalysis {
    pub fn has_time_trigger(&self) -> bool {
        self.triggers
            .iter()
            .any(|t| matches!(t, RebalanceTrigger::TimeElapsed { .. }))
    }
}

/// Thresholds, calendars and trade economics behind the analyzer
#[derive(Debug, Clone)]
pub struct RebalancingConfig {
    /// Deviation tiers in percentage points; below the low tier no
    /// threshold trigger fires
    pub low_threshold_pp: f64,
    pub medium_threshold_pp: f64,
    pub high_threshold_pp: f64,
    pub critical_threshold_pp: f64,

    /// Review calendars in months per risk tolerance
    pub aggressive_calendar_months: u32,
    pub moderate_calendar_months: u32,
    pub conservative_calendar_months: u32,

    /// Assumed unrealized-gain share of any sold position
    pub embedded_gain_ratio: f64,
    /// Transaction cost on traded notional, percent
    pub trade_cost_rate_pct: f64,
    /// Annual cost of carrying the worst-drifted fraction, percent
    pub drift_penalty_rate_pct: f64,
    /// Benefit must exceed this multiple of total cost for a clear proceed
    pub proceed_benefit_ratio: f64,

    /// Long-run expected annual return by allocation label, percent.
    /// Keys are lowercase; lookups fold case.
    pub class_returns_pct: BTreeMap<String, f64>,
    /// Return assumed for labels missing from the table, percent
    pub unknown_class_return_pct: f64,
}

impl Default for RebalancingConfig {
    fn default() -> Self {
        let mut class_returns = BTreeMap::new();
        class_returns.insert("stocks".to_string(), 8.0); // broad equity
        class_returns.insert("bonds".to_string(), 3.5); // government/corporate blend
        class_returns.insert("realestate".to_string(), 5.5); // direct holdings and REITs
        class_returns.insert("crypto".to_string(), 15.0); // speculative digital assets
        class_returns.insert("cash".to_string(), 1.5); // deposits and money market
        class_returns.insert("commodities".to_string(), 5.0); // broad commodity basket

        Self {
            low_threshold_pp: 5.0,
            medium_threshold_pp: 8.0,
            high_threshold_pp: 12.0,
            critical_threshold_pp: 20.0,
            aggressive_calendar_months: 3,
            moderate_calendar_months: 6,
            conservative_calendar_months: 12,
            embedded_gain_ratio: 0.30,
            trade_cost_rate_pct: 0.1,
            drift_penalty_rate_pct: 1.0,
            proceed_benefit_ratio: 1.5,
            class_returns_pct: class_returns,
            unknown_class_return_pct: 6.0,
        }
    }
}

impl RebalancingConfig {
    /// Review calendar for a risk tolerance, in months
    pub fn calendar_months(&self, risk: RiskTolerance) -> u32 {
        match risk {
            RiskTolerance::Aggressive => self.aggressive_calendar_months,
            RiskTolerance::Moderate => self.moderate_calendar_months,
            RiskTolerance::Conservative => self.conservative_calendar_months,
        }
    }

    /// Urgency tier for the worst absolute deviation
    pub fn urgency_for(&self, max_deviation_pp: f64) -> Urgency {
        if max_deviation_pp >= self.critical_threshold_pp {
            Urgency::Critical
        } else if max_deviation_pp >= self.high_threshold_pp {
            Urgency::High
        } else if max_deviation_pp >= self.medium_threshold_pp {
            Urgency::Medium
        } else if max_deviation_pp >= self.low_threshold_pp {
            Urgency::Low
        } else {
            Urgency::None
        }
    }

    /// Expected annual return for a free-form allocation label, percent
    pub fn class_return_pct(&self, label: &str) -> f64 {
        self.class_returns_pct
            .get(&label.to_ascii_lowercase())
            .copied()
            .unwrap_or(self.unknown_class_return_pct)
    }
}

/// Whole months elapsed between two dates; an incomplete final month does
/// not count. Returns 0 when `to` is not after `from`.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> u32 {
    if to <= from {
        return 0;
    }
    let mut months =
        (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32;
    if to.day() < from.day() {
        months -= 1;
    }
    months.max(0) as u32
}

/// The rebalancing engine
pub struct RebalancingAnalyzer {
    config: RebalancingConfig,
    country: CountryParams,
}

impl RebalancingAnalyzer {
    pub fn new(config: RebalancingConfig, country: CountryParams) -> Self {
        Self { config, country }
    }

    pub fn config(&self) -> &RebalancingConfig {
        &self.config
    }

    /// Assess one portfolio snapshot against its target mix
    pub fn analyze(
        &self,
        current: &Allocation,
        target: &Allocation,
        last_rebalance: Option<NaiveDate>,
        as_of: NaiveDate,
        portfolio_value: f64,
        risk: RiskTolerance,
    ) -> RebalancingAnalysis {
        let mut warnings = validate_allocation(AllocationKind::Current, current);
        warnings.extend(validate_allocation(AllocationKind::Target, target));

        // Deviations over the union of labels; a class absent from one side
        // counts as zero there
        let mut deviations: BTreeMap<String, f64> = BTreeMap::new();
        for class in current.keys().chain(target.keys()) {
            let held = current.get(class).copied().unwrap_or(0.0);
            let wanted = target.get(class).copied().unwrap_or(0.0);
            deviations.entry(class.clone()).or_insert(wanted - held);
        }

        let max_deviation_pp = deviations
            .values()
            .fold(0.0_f64, |worst, dev| worst.max(dev.abs()));
        let urgency = self.config.urgency_for(max_deviation_pp);

        let mut triggers: Vec<RebalanceTrigger> = deviations
            .iter()
            .filter(|(_, dev)| dev.abs() >= self.config.low_threshold_pp)
            .map(|(class, dev)| RebalanceTrigger::Threshold {
                class: class.clone(),
                deviation_pp: *dev,
            })
            .collect();

        let calendar_months = self.config.calendar_months(risk);
        if let Some(last) = last_rebalance {
            let months_elapsed = months_between(last, as_of);
            if months_elapsed > calendar_months {
                triggers.push(RebalanceTrigger::TimeElapsed {
                    months_elapsed,
                    calendar_months,
                    months_overdue: months_elapsed - calendar_months,
                });
            }
        }

        let tax_impact = self.tax_impact(&deviations, portfolio_value);
        let cost_benefit = self.cost_benefit(
            current,
            target,
            &deviations,
            max_deviation_pp,
            portfolio_value,
            tax_impact.estimated_tax,
        );

        let verdict = if cost_benefit.annual_benefit
            > self.config.proceed_benefit_ratio * cost_benefit.total_cost
            && cost_benefit.annual_benefit > 0.0
        {
            Verdict::Proceed
        } else if cost_benefit.annual_benefit > cost_benefit.total_cost
            && cost_benefit.annual_benefit > 0.0
        {
            Verdict::Consider
        } else {
            Verdict::Defer
        };

        RebalancingAnalysis {
            as_of,
            portfolio_value,
            warnings,
            deviations,
            max_deviation_pp,
            urgency,
            triggers,
            tax_impact,
            cost_benefit,
            verdict,
        }
    }

    /// Capital-gains estimate on the over-allocated classes that must be sold
    fn tax_impact(&self, deviations: &BTreeMap<String, f64>, portfolio_value: f64) -> TaxImpact {
        let sell_fraction: f64 = deviations
            .values()
            .filter(|dev| **dev < 0.0)
            .map(|dev| -dev / 100.0)
            .sum();
        let sell_volume = sell_fraction * portfolio_value;
        let rate = self.country.capital_gains_rate_pct;

        TaxImpact {
            sell_volume,
            embedded_gain_ratio: self.config.embedded_gain_ratio,
            capital_gains_rate_pct: rate,
            estimated_tax: sell_volume * self.config.embedded_gain_ratio * rate / 100.0,
        }
    }

    fn cost_benefit(
        &self,
        current: &Allocation,
        target: &Allocation,
        deviations: &BTreeMap<String, f64>,
        max_deviation_pp: f64,
        portfolio_value: f64,
        tax_cost: f64,
    ) -> CostBenefit {
        let trade_fraction: f64 = deviations.values().map(|dev| dev.abs() / 100.0).sum();
        let trade_volume = trade_fraction * portfolio_value;
        let trade_cost = trade_volume * self.config.trade_cost_rate_pct / 100.0;
        let total_cost = trade_cost + tax_cost;

        let return_gap_pct = self.mix_return_pct(target) - self.mix_return_pct(current);
        let drift_penalty = max_deviation_pp / 100.0 * portfolio_value
            * self.config.drift_penalty_rate_pct
            / 100.0;
        let annual_benefit =
            (return_gap_pct / 100.0 * portfolio_value + drift_penalty).max(0.0);

        CostBenefit {
            trade_volume,
            trade_cost,
            tax_cost,
            total_cost,
            return_gap_pct,
            drift_penalty,
            annual_benefit,
        }
    }

    /// Expected annual return of an allocation mix, percent
    fn mix_return_pct(&self, allocation: &Allocation) -> f64 {
        allocation
            .iter()
            .map(|(class, pct)| pct / 100.0 * self.config.class_return_pct(class))
            .sum()
    }
}
