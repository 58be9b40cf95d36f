//! Guarded arithmetic helpers shared across the engine
//!
//! Every division in the scoring and projection paths goes through
//! [`safe_div`] so a zero-income or zero-expense profile degrades to a
//! zero result instead of producing NaN/Inf that would poison a report.

/// Divide, returning 0.0 when the denominator is zero or non-finite.
///
/// The guarded condition is logged at debug level with the call-site
/// context so malformed profiles can be diagnosed without failing the
/// computation.
pub fn safe_div(numerator: f64, denominator: f64, context: &str) -> f64 {
    if denominator == 0.0 || !denominator.is_finite() {
        log::debug!("guarded division by zero denominator in {}", context);
        return 0.0;
    }
    let result = numerator / denominator;
    if !result.is_finite() {
        log::debug!("guarded non-finite division result in {}", context);
        return 0.0;
    }
    result
}

/// Convert an annual percentage rate to the equivalent monthly rate:
/// (1 + r)^(1/12) - 1
pub fn monthly_rate_from_annual_pct(annual_pct: f64) -> f64 {
    (1.0 + annual_pct / 100.0).powf(1.0 / 12.0) - 1.0
}

/// Compound growth factor for an annual percentage rate over `years`.
pub fn compound_factor(annual_pct: f64, years: f64) -> f64 {
    (1.0 + annual_pct / 100.0).powf(years)
}

/// Clamp a fraction to [0, 1].
pub fn clamp01(value: f64) -> f64 {
    value.max(0.0).min(1.0)
}
