use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use reviewsplit::dates::has_trailing_year;
use reviewsplit::{
    execute_preprocess, execute_split, normalize_date_with_year, parse_review_date,
    read_reviews_file, Period, PreprocessConfig, SplitConfig,
};

#[derive(Parser)]
#[command(name = "reviewsplit")]
#[command(author, version, about = "Review dataset cleaning and period splitting", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Drop incomplete rows and fix dates missing their year
    Preprocess {
        /// Raw reviews CSV (needs date, review_text and rating columns)
        #[arg(short, long, default_value = "merged_reviews.csv")]
        input: PathBuf,

        /// Cleaned output CSV
        #[arg(short, long, default_value = "final.csv")]
        output: PathBuf,

        /// Year appended to dates that do not end in one
        #[arg(long, default_value = "2023")]
        fallback_year: i32,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Split a cleaned CSV into pre-pandemic, pandemic and post-pandemic files
    Split {
        /// Cleaned reviews CSV
        #[arg(short, long, default_value = "final.csv")]
        input: PathBuf,

        /// Directory for the partition files
        #[arg(short = 'd', long, default_value = ".")]
        output_dir: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Preprocess and split in one go
    Run {
        /// Raw reviews CSV
        #[arg(short, long, default_value = "merged_reviews.csv")]
        input: PathBuf,

        /// Cleaned intermediate CSV
        #[arg(long, default_value = "final.csv")]
        cleaned: PathBuf,

        /// Directory for the partition files
        #[arg(short = 'd', long, default_value = ".")]
        output_dir: PathBuf,

        /// Year appended to dates that do not end in one
        #[arg(long, default_value = "2023")]
        fallback_year: i32,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Report what preprocessing and splitting would do, without writing
    Analyze {
        /// Raw reviews CSV
        #[arg(short, long, default_value = "merged_reviews.csv")]
        input: PathBuf,

        /// Year appended to dates that do not end in one
        #[arg(long, default_value = "2023")]
        fallback_year: i32,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Preprocess {
            input,
            output,
            fallback_year,
            verbose,
        } => {
            setup_logging(verbose);
            let config = PreprocessConfig { fallback_year };
            execute_preprocess(&input, &output, &config)
                .context("Preprocessing failed")?;
            Ok(())
        }
        Commands::Split {
            input,
            output_dir,
            verbose,
        } => {
            setup_logging(verbose);
            execute_split(&input, &output_dir, &SplitConfig::default())
                .context("Splitting failed")?;
            Ok(())
        }
        Commands::Run {
            input,
            cleaned,
            output_dir,
            fallback_year,
            verbose,
        } => {
            setup_logging(verbose);
            run_pipeline(input, cleaned, output_dir, fallback_year)
        }
        Commands::Analyze {
            input,
            fallback_year,
            verbose,
        } => {
            setup_logging(verbose);
            analyze_reviews(input, fallback_year)
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn run_pipeline(
    input: PathBuf,
    cleaned: PathBuf,
    output_dir: PathBuf,
    fallback_year: i32,
) -> Result<()> {
    info!("Stage 0: Preprocessing...");
    let preprocess_config = PreprocessConfig { fallback_year };
    let preprocess = execute_preprocess(&input, &cleaned, &preprocess_config)
        .context("Preprocessing failed")?;

    info!("Stage 1: Splitting...");
    let split = execute_split(&cleaned, &output_dir, &SplitConfig::default())
        .context("Splitting failed")?;

    let assigned: usize = split.counts.values().sum();
    info!(
        "Complete: {} of {} source rows assigned to a period ({} dropped, {} unassigned)",
        assigned, preprocess.rows_read, preprocess.rows_dropped, split.rows_unassigned
    );

    Ok(())
}

fn analyze_reviews(input: PathBuf, fallback_year: i32) -> Result<()> {
    info!("Analyzing reviews from {:?}", input);
    let raw = read_reviews_file(&input)?;

    let total = raw.len();
    let complete: Vec<_> = raw.into_iter().filter_map(|r| r.into_complete()).collect();
    let missing = total - complete.len();
    let yearless = complete.iter().filter(|r| !has_trailing_year(&r.date)).count();

    println!("Review Analysis");
    println!("===============");
    println!("Total rows: {}", total);
    println!("Rows with a missing field: {}", missing);
    println!("Dates without a year: {}", yearless);
    println!();

    let windows = SplitConfig::default().windows;
    let mut counts: HashMap<Period, usize> = HashMap::new();
    let mut unparseable = 0;
    let mut outside = 0;

    for record in &complete {
        let normalized = normalize_date_with_year(&record.date, fallback_year);
        let Some(timestamp) = parse_review_date(&normalized) else {
            unparseable += 1;
            continue;
        };
        match windows.iter().find(|w| w.contains(&timestamp)) {
            Some(window) => *counts.entry(window.period).or_insert(0) += 1,
            None => outside += 1,
        }
    }

    println!("Periods");
    println!("-------");
    for period in Period::ALL {
        println!("{}: {} rows", period, counts.get(&period).copied().unwrap_or(0));
    }
    println!("Outside every period: {}", outside);
    println!("Unparseable dates: {}", unparseable);

    Ok(())
}
