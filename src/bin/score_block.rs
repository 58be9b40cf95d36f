//! Score the entire block from sample_profiles.csv
//!
//! Outputs per-profile factor scores for distribution analysis

use anyhow::Context;
use rayon::prelude::*;
use retirement_planner::assumptions::Assumptions;
use retirement_planner::profile::load_default_block;
use retirement_planner::scoring::{FactorKind, HealthReport, HealthScorer, ScoreOptions, ScoreStatus};
use std::fs::File;
use std::io::Write;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let start = Instant::now();
    println!("Loading profiles from sample_profiles.csv...");

    let block = load_default_block().context("loading sample profiles")?;
    println!("Loaded {} profiles in {:?}", block.len(), start.elapsed());

    let assumptions = Assumptions::default_2025();
    let options = ScoreOptions {
        peer_comparison: false,
        ..Default::default()
    };

    println!("Scoring profiles...");
    let score_start = Instant::now();

    // Score in parallel
    let results: Vec<(u32, HealthReport)> = block
        .par_iter()
        .map(|entry| {
            let scorer = HealthScorer::new(assumptions.clone(), options.clone());
            (entry.profile_id, scorer.score(&entry.profile))
        })
        .collect();

    println!("Scoring complete in {:?}", score_start.elapsed());

    // Write output
    let output_path = "block_scores.csv";
    let mut file = File::create(output_path).context("creating output file")?;

    writeln!(file, "ProfileID,Country,TotalScore,Status,SavingsRate,RetirementReadiness,TimeHorizon,RiskAlignment,Diversification,TaxEfficiency,EmergencyFund,DebtManagement,NominalAccumulation,ReplacementRatioPct,MissingFields")?;

    for (profile_id, report) in &results {
        let factor = |kind: FactorKind| {
            report.factor(kind).map(|f| f.score).unwrap_or(0.0)
        };
        writeln!(
            file,
            "{},{},{:.2},{},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.0},{:.2},{}",
            profile_id,
            report.country,
            report.total_score,
            report.status,
            factor(FactorKind::SavingsRate),
            factor(FactorKind::RetirementReadiness),
            factor(FactorKind::TimeHorizon),
            factor(FactorKind::RiskAlignment),
            factor(FactorKind::Diversification),
            factor(FactorKind::TaxEfficiency),
            factor(FactorKind::EmergencyFund),
            factor(FactorKind::DebtManagement),
            report.projection.nominal_accumulation,
            report.projection.replacement_ratio_pct,
            report.missing_fields.len(),
        )?;
    }

    println!("Output written to {}", output_path);

    // Print distribution stats
    let mut counts = [0usize; 5];
    let mut sum = 0.0;
    let mut min = f64::MAX;
    let mut max = f64::MIN;
    for (_, report) in &results {
        let bucket = match report.status {
            ScoreStatus::Excellent => 0,
            ScoreStatus::Good => 1,
            ScoreStatus::Fair => 2,
            ScoreStatus::Poor => 3,
            ScoreStatus::Critical => 4,
        };
        counts[bucket] += 1;
        sum += report.total_score;
        min = min.min(report.total_score);
        max = max.max(report.total_score);
    }

    println!("\nBlock Summary:");
    println!("  Profiles: {}", results.len());
    println!(
        "  Mean score: {:.1} (min {:.1}, max {:.1})",
        sum / results.len() as f64,
        min,
        max
    );
    println!("  Excellent: {}", counts[0]);
    println!("  Good: {}", counts[1]);
    println!("  Fair: {}", counts[2]);
    println!("  Poor: {}", counts[3]);
    println!("  Critical: {}", counts[4]);

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
