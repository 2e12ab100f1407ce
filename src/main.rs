use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use flight_departures::{DepartureCache, DepartureQuery, FlightRecord, FlightStatsSource, Settings};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

#[derive(Parser)]
#[command(name = "departures", about = "FlightStats departures scraper with an hourly disk cache")]
struct Cli {
    /// Cache directory (overrides DEPARTURES_CACHE_DIR)
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Departures for one airport and hour
    Fetch {
        airport: String,
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        /// Skip the cache read and overwrite the cached file
        #[arg(long)]
        no_cache: bool,
        /// Print records as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Fetch every hour of a day, one window at a time
    Sweep {
        airport: String,
        year: i32,
        month: u32,
        day: u32,
        /// First hour (inclusive)
        #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u32).range(0..=23))]
        from: u32,
        /// Last hour (inclusive)
        #[arg(long, default_value_t = 23, value_parser = clap::value_parser!(u32).range(0..=23))]
        to: u32,
        #[arg(long)]
        no_cache: bool,
    },
    /// List cached departure windows
    Cached,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let mut settings = Settings::load().context("Failed to load DEPARTURES_* settings")?;
    if let Some(dir) = cli.cache_dir {
        settings.cache_dir = dir;
    }
    let cache = settings.cache();

    let result = match cli.command {
        Commands::Fetch {
            airport,
            year,
            month,
            day,
            hour,
            no_cache,
            json,
        } => {
            let records = cache
                .get_departures(&airport, year, month, day, hour, !no_cache)
                .with_context(|| format!("Failed to fetch departures for {}", airport))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                print_table(&records);
            }
            Ok(())
        }
        Commands::Sweep {
            airport,
            year,
            month,
            day,
            from,
            to,
            no_cache,
        } => {
            if from > to {
                anyhow::bail!("--from ({}) must not be after --to ({})", from, to);
            }
            DepartureQuery::new(&airport, year, month, day, from)?;
            sweep(&cache, &airport, year, month, day, from..=to, !no_cache)
        }
        Commands::Cached => {
            let windows = cache
                .cached_windows()
                .with_context(|| format!("Failed to read cache dir {}", cache.root().display()))?;
            if windows.is_empty() {
                println!("No cached departures in {}", cache.root().display());
                return Ok(());
            }
            for w in &windows {
                let count = w
                    .records
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "unreadable".into());
                println!("{:<6} {} {:02}:00  {:>10}", w.airport, w.date, w.hour, count);
            }
            println!("\n{} cached windows in {}", windows.len(), cache.root().display());
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }

    result
}

fn sweep(
    cache: &DepartureCache<FlightStatsSource>,
    airport: &str,
    year: i32,
    month: u32,
    day: u32,
    hours: std::ops::RangeInclusive<u32>,
    use_cache: bool,
) -> anyhow::Result<()> {
    let pb = ProgressBar::new(hours.clone().count() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );

    let mut rows = Vec::new();
    for hour in hours {
        pb.set_message(format!("{:02}:00", hour));
        let outcome = cache.get_departures(airport, year, month, day, hour, use_cache);
        if let Err(e) = &outcome {
            warn!("Hour {:02} failed: {}", hour, e);
        }
        rows.push((hour, outcome.map(|r| r.len())));
        pb.inc(1);
    }
    pb.finish_and_clear();

    println!("{:>5} | {:>7}", "Hour", "Flights");
    println!("{}", "-".repeat(16));
    let mut total = 0;
    let mut failed = 0;
    for (hour, outcome) in &rows {
        match outcome {
            Ok(n) => {
                total += n;
                println!("{:>5} | {:>7}", format!("{:02}:00", hour), n);
            }
            Err(e) => {
                failed += 1;
                println!("{:>5} | {:>7}  {}", format!("{:02}:00", hour), "-", e);
            }
        }
    }
    println!(
        "\n{} departures across {} hours ({} failed)",
        total,
        rows.len(),
        failed
    );
    Ok(())
}

fn print_table(records: &[FlightRecord]) {
    if records.is_empty() {
        println!("No departures.");
        return;
    }
    println!(
        "{:<12} | {:<16} | {:<16} | {:<24} | {:<20}",
        "Flight", "Departs", "Arrives", "To", "Airline"
    );
    println!("{}", "-".repeat(100));
    for r in records {
        println!(
            "{:<12} | {:<16} | {:<16} | {:<24} | {:<20}",
            truncate(&r.flight_number, 12),
            r.departure_time.format("%Y-%m-%d %H:%M").to_string(),
            r.arrival_time.format("%Y-%m-%d %H:%M").to_string(),
            truncate(&r.arrival_city, 24),
            truncate(&r.airline, 20),
        );
    }
    println!("\n{} departures", records.len());
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}
