//! Retirement Planner CLI
//!
//! Command-line interface for scoring a financial profile and projecting
//! retirement accumulation

use anyhow::Context;
use clap::Parser;
use retirement_planner::assumptions::InflationScenario;
use retirement_planner::profile::loader::load_profile_json;
use retirement_planner::projection::{ProjectionConfig, ProjectionHorizon, ProjectionResult};
use retirement_planner::scoring::{ScoreOptions, SuggestionPriority};
use retirement_planner::{FinancialProfile, ScenarioRunner};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "retirement-planner",
    version,
    about = "Financial health scoring and retirement projection"
)]
struct Cli {
    /// Profile JSON file; a built-in demo profile is used when omitted
    #[arg(long, value_name = "JSON")]
    profile: Option<PathBuf>,

    /// Override the profile's country key (israel, uk, us)
    #[arg(long)]
    country: Option<String>,

    /// Safe withdrawal rate, percent per year
    #[arg(long, default_value_t = 4.0)]
    withdrawal_rate: f64,

    /// Inflation scenario: optimistic, moderate, pessimistic or historical
    #[arg(long, default_value = "moderate")]
    inflation: String,

    /// Directory with assumption-table override CSVs
    #[arg(long, value_name = "DIR")]
    assumptions: Option<PathBuf>,

    /// Write the yearly projection schedule to this CSV file
    #[arg(long, value_name = "CSV")]
    schedule_out: Option<PathBuf>,

    /// Skip the peer comparison block
    #[arg(long)]
    no_peers: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let scenario: InflationScenario = cli
        .inflation
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    let runner = match &cli.assumptions {
        Some(dir) => ScenarioRunner::from_csv_path(dir)
            .with_context(|| format!("loading assumption tables from {}", dir.display()))?,
        None => ScenarioRunner::new(),
    };

    let mut profile = match &cli.profile {
        Some(path) => load_profile_json(path)
            .with_context(|| format!("loading profile from {}", path.display()))?,
        None => demo_profile(),
    };
    if let Some(country) = &cli.country {
        profile.country = Some(country.clone());
    }

    println!("Retirement Planner v0.1.0");
    println!("=========================\n");

    let report = runner.score(
        &profile,
        ScoreOptions {
            peer_comparison: !cli.no_peers,
            withdrawal_rate_pct: cli.withdrawal_rate,
            inflation_scenario: scenario,
        },
    );

    println!("Profile: {} mode, country {}", profile.planning_mode.as_str(), report.country);
    if let (Some(age), Some(retirement)) = (profile.current_age, profile.target_retirement_age) {
        println!("  Age: {} -> {}", age, retirement);
    }
    println!();

    println!(
        "Financial Health Score: {:.1}/100 ({})",
        report.total_score, report.status
    );
    println!();
    println!("{:<22} {:>8} {:>8} {:>10}", "Factor", "Score", "Weight", "Status");
    println!("{}", "-".repeat(52));
    for factor in &report.factors {
        println!(
            "{:<22} {:>8.1} {:>8.0} {:>10}",
            factor.factor.as_str(),
            factor.score,
            factor.weight,
            factor.status
        );
    }

    if !report.missing_fields.is_empty() {
        println!("\nMissing data: {}", report.missing_fields.join(", "));
    }
    if !report.warnings.is_empty() {
        println!("Validation warnings: {}", report.warnings.len());
    }

    if !report.suggestions.is_empty() {
        println!("\nSuggestions:");
        for suggestion in &report.suggestions {
            let tag = match suggestion.priority {
                SuggestionPriority::High => "high",
                SuggestionPriority::Medium => "medium",
            };
            println!(
                "  [{:>6}] {} (+{:.1} pts)",
                tag, suggestion.message, suggestion.potential_gain
            );
        }
    }

    if let Some(peers) = &report.peer_comparison {
        println!("\nPeer Comparison (age band {}):", peers.age_band);
        println!(
            "  Savings rate: {:.1}% vs median {:.1}%",
            peers.user_savings_rate_pct, peers.median_savings_rate_pct
        );
        println!(
            "  Emergency fund: {:.1} months vs median {:.1}",
            peers.user_emergency_fund_months, peers.median_emergency_fund_months
        );
        println!(
            "  Total score: {:.1} vs median {:.1}",
            peers.user_total_score, peers.median_total_score
        );
    }

    // Full projection with the yearly schedule for milestones and CSV output
    let result = runner.project(
        &profile,
        ProjectionConfig {
            horizon: ProjectionHorizon::ToRetirementAge,
            withdrawal_rate_pct: cli.withdrawal_rate,
            inflation_scenario: scenario,
            include_schedule: true,
        },
    );
    let summary = &result.summary;

    println!(
        "\nProjection to age {} ({} years, {:?} inflation at {:.1}%):",
        summary.retirement_age,
        summary.horizon_years,
        summary.inflation_scenario,
        summary.inflation_rate_pct
    );
    println!("  Total contributions: {:.0}", summary.total_contributions);
    println!("  Total growth: {:.0}", summary.total_growth);
    println!("  Nominal accumulation: {:.0}", summary.nominal_accumulation);
    println!("  Real accumulation: {:.0}", summary.real_accumulation);
    println!(
        "  Monthly income at {:.1}% SWR: {:.0} nominal / {:.0} real",
        summary.withdrawal_rate_pct, summary.monthly_income_nominal, summary.monthly_income_real
    );
    println!("  Projected state pension: {:.0}", summary.projected_state_pension);
    println!(
        "  Combined income: {:.0} ({:.1}% replacement)",
        summary.combined_monthly_income, summary.replacement_ratio_pct
    );

    println!("\nKey Milestones:");
    for &year in &[1usize, 5, 10, 15, 20, 25, 30] {
        if let Some(row) = result.years.get(year - 1) {
            println!(
                "  Year {:>2} (age {}): total={:.0} real={:.0}",
                row.year, row.age, row.total_balance, row.real_total_balance
            );
        }
    }

    if let Some(path) = &cli.schedule_out {
        write_schedule_csv(path, &result)
            .with_context(|| format!("writing schedule to {}", path.display()))?;
        println!("\nFull schedule written to: {}", path.display());
    }

    Ok(())
}

/// Built-in demo profile used when no JSON file is supplied
fn demo_profile() -> FinancialProfile {
    FinancialProfile {
        country: Some("israel".to_string()),
        current_age: Some(35),
        target_retirement_age: Some(67),
        gross_monthly_salary: Some(25_000.0),
        net_monthly_salary: Some(18_500.0),
        total_monthly_expenses: Some(14_000.0),
        pension_savings: Some(350_000.0),
        training_fund: Some(120_000.0),
        personal_portfolio: Some(90_000.0),
        crypto: Some(15_000.0),
        emergency_fund: Some(60_000.0),
        pension_contribution_rate: Some(17.5),
        training_fund_contribution_rate: Some(7.5),
        monthly_debt_payments: Some(2_500.0),
        ..Default::default()
    }
}

fn write_schedule_csv(path: &PathBuf, result: &ProjectionResult) -> anyhow::Result<()> {
    let mut file = File::create(path)?;

    writeln!(
        file,
        "Year,Age,Contributions,Growth,Pension,TrainingFund,PersonalPortfolio,RealEstate,Crypto,Cash,Total,RealTotal"
    )?;
    for row in &result.years {
        writeln!(
            file,
            "{},{},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2}",
            row.year,
            row.age,
            row.contributions,
            row.growth,
            row.pension_balance,
            row.training_fund_balance,
            row.personal_portfolio_balance,
            row.real_estate_balance,
            row.crypto_balance,
            row.cash_balance,
            row.total_balance,
            row.real_total_balance,
        )?;
    }

    Ok(())
}
