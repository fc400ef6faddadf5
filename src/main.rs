// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::Result;
use std::env;
use std::path::{Path, PathBuf};

use rose_report::{
    load_contestants, AnalysisReport, BucketStat, CensusClient, Pipeline, StateIncomeRecord,
    DEFAULT_ACS_YEAR,
};

const DEFAULT_CSV_PATH: &str = "data/bachelorette-contestants.csv";

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() > 1 && args[1] == "report" {
        // Plain-text report mode
        run_report(&csv_path(&args, 2))?;
    } else {
        // UI mode (default)
        run_ui_mode(&csv_path(&args, 1))?;
    }

    Ok(())
}

/// CSV path resolution: positional argument, then the CONTESTANTS_CSV
/// environment variable, then the bundled sample dataset.
fn csv_path(args: &[String], position: usize) -> PathBuf {
    args.get(position)
        .cloned()
        .or_else(|| env::var("CONTESTANTS_CSV").ok())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CSV_PATH))
}

/// Load the CSV, fetch the income table, run the pipeline.
fn build_report(csv_path: &Path) -> Result<AnalysisReport> {
    if !csv_path.exists() {
        eprintln!("❌ Contestant CSV not found: {}", csv_path.display());
        eprintln!("   Pass a path: rose-report report <path/to/contestants.csv>");
        std::process::exit(1);
    }

    println!("📂 Loading contestants from {}...", csv_path.display());
    let contestants = load_contestants(csv_path)?;
    println!("✓ Loaded {} contestants", contestants.len());

    let incomes = fetch_income_table()?;

    let pipeline = Pipeline::new()?;
    let report = pipeline.run(&contestants, &incomes)?;

    Ok(report)
}

/// One Census API call per run. Without a key the run degrades to an
/// income-less report instead of failing; with a key, fetch errors
/// propagate.
fn fetch_income_table() -> Result<Vec<StateIncomeRecord>> {
    match env::var("CENSUS_API_KEY") {
        Ok(key) if !key.is_empty() => {
            let year = env::var("CENSUS_YEAR")
                .ok()
                .and_then(|y| y.parse().ok())
                .unwrap_or(DEFAULT_ACS_YEAR);

            println!("🌐 Fetching median household income (ACS5 {})...", year);
            let snapshot = CensusClient::new(&key).fetch_state_incomes(year)?;
            println!("✓ Income data for {} states", snapshot.records.len());

            Ok(snapshot.records)
        }
        _ => {
            eprintln!("⚠️  CENSUS_API_KEY not set - skipping income enrichment");
            Ok(Vec::new())
        }
    }
}

fn run_report(csv_path: &Path) -> Result<()> {
    println!("🌹 Rose Report - Week-1 Elimination Analysis");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let report = build_report(csv_path)?;

    print_stats_table("Week-1 Elimination Rate by Home State", &report.by_state);
    print_stats_table("Week-1 Elimination Rate by Age Range", &report.by_age);

    if report.by_income.is_empty() {
        println!("\nWeek-1 Elimination Rate by Household Income");
        println!("   (no income data - set CENSUS_API_KEY to enable)");
    } else {
        print_stats_table(
            "Week-1 Elimination Rate by Household Income",
            &report.by_income,
        );
    }

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!(
        "✓ {} contestants analyzed, {} eliminated week 1",
        report.contestants.len(),
        report.week1_eliminations.len()
    );

    Ok(())
}

fn print_stats_table(title: &str, stats: &[BucketStat]) {
    println!("\n{}", title);
    println!(
        "{:<16} {:>6} {:>8} {:>9} {:>9}",
        "Bucket", "Total", "Week 1", "Elim %", "Remain %"
    );
    for stat in stats {
        println!(
            "{:<16} {:>6} {:>8} {:>8.1}% {:>8.1}%",
            stat.label,
            stat.total_count,
            stat.eliminated_week1_count,
            stat.percent_eliminated_week1,
            stat.percent_remaining
        );
    }
}

#[cfg(feature = "tui")]
fn run_ui_mode(csv_path: &Path) -> Result<()> {
    println!("🌹 Loading Rose Report UI...\n");

    let report = build_report(csv_path)?;

    println!("Starting UI... (Press 'q' to quit)\n");

    let mut app = ui::App::new(report);
    ui::run_ui(&mut app)?;

    println!("\n✅ UI closed successfully");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(csv_path: &Path) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or print a plain report: rose-report report {}", csv_path.display());
    std::process::exit(1);
}
