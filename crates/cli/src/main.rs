mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{JsonFileHandler, Record};
use pipeline::ResultHandler;
use scheduler::{PeriodicScheduler, SchedulerOptions, shutdown_channel};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

use crate::config::ServiceConfig;

/// recsys - periodic training and recommendation service
#[derive(Parser)]
#[command(name = "recsys")]
#[command(about = "Retrains a scoring model and publishes top-N recommendations on a schedule", long_about = None)]
struct Cli {
    /// Path to the JSON service config
    #[arg(short, long, default_value = "recsys.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scheduler loop until Ctrl-C
    Run {
        /// Override the training period (hours)
        #[arg(long)]
        training_hours: Option<i64>,

        /// Override the recommending period (hours)
        #[arg(long)]
        recommending_hours: Option<i64>,

        /// Override the local time of day of the first tick ("HH:MM")
        #[arg(long)]
        first_run_at: Option<String>,
    },

    /// Run a single train cycle and exit
    Train,

    /// Run a single recommend cycle with the last dumped model and print the result
    Recommend,
}

/// Writes results to the configured file, optionally echoing them.
struct OutputHandler {
    file: JsonFileHandler,
    echo: bool,
}

impl ResultHandler<Record> for OutputHandler {
    fn name(&self) -> &str {
        self.file.name()
    }

    fn handle(&self, result: &[Record]) -> Result<()> {
        self.file.handle(result)?;
        if self.echo {
            print_recommendations(result);
        }
        Ok(())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = ServiceConfig::load(&cli.config)?;

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Run {
            training_hours,
            recommending_hours,
            first_run_at,
        } => handle_run(config, training_hours, recommending_hours, first_run_at).await?,
        Commands::Train => handle_train(config)?,
        Commands::Recommend => handle_recommend(config)?,
    }

    Ok(())
}

/// Handle the 'run' command
async fn handle_run(
    config: ServiceConfig,
    training_hours: Option<i64>,
    recommending_hours: Option<i64>,
    first_run_at: Option<String>,
) -> Result<()> {
    let mut scheduler_config = config.scheduler.clone();
    if let Some(hours) = training_hours {
        scheduler_config.training_period_hours = hours;
    }
    if let Some(hours) = recommending_hours {
        scheduler_config.recommending_period_hours = hours;
    }
    if first_run_at.is_some() {
        scheduler_config.first_run_time_of_day = first_run_at;
    }
    let options =
        SchedulerOptions::try_from(scheduler_config).context("Invalid scheduler configuration")?;

    let mut pipeline = config.build_pipeline(OutputHandler {
        file: config.output_handler(),
        echo: false,
    });
    if config.model_snapshot.exists() {
        if let Err(e) = pipeline.restore() {
            warn!("Could not restore model snapshot, waiting for first train cycle: {:#}", e);
        }
    }

    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl-C");
            let _ = shutdown_tx.send(true);
        }
    });

    let mut scheduler = PeriodicScheduler::new(pipeline, options);
    let stats = scheduler.run(shutdown_rx).await;

    println!(
        "{} train cycles ({} failed), {} recommend cycles ({} failed)",
        stats.train_runs,
        stats.train_failures.to_string().red(),
        stats.recommend_runs,
        stats.recommend_failures.to_string().red()
    );
    Ok(())
}

/// Handle the 'train' command
fn handle_train(config: ServiceConfig) -> Result<()> {
    let start = Instant::now();
    let mut pipeline = config.build_pipeline(config.output_handler());

    pipeline.train().context("Train cycle failed")?;

    println!(
        "{} Trained and wrote {} in {:?}",
        "✓".green(),
        config.model_snapshot.display(),
        start.elapsed()
    );
    Ok(())
}

/// Handle the 'recommend' command
fn handle_recommend(config: ServiceConfig) -> Result<()> {
    let mut pipeline = config.build_pipeline(OutputHandler {
        file: config.output_handler(),
        echo: true,
    });

    pipeline
        .restore()
        .with_context(|| format!("No usable model at {}", config.model_snapshot.display()))?;
    let delivered = pipeline
        .recommend_preemptively()
        .context("Recommend cycle failed")?;

    println!(
        "{} Wrote {} recommendations to {}",
        "✓".green(),
        delivered,
        config.output.display()
    );
    Ok(())
}

/// Helper function to format and print ranked records
fn print_recommendations(records: &[Record]) {
    println!("{}", "Recommendations:".bold().blue());
    for (idx, record) in records.iter().enumerate() {
        let rank = idx + 1;
        let body = serde_json::to_string(record).unwrap_or_else(|_| "<unprintable>".to_string());
        println!("{}. {}", rank.to_string().green(), body);
    }
}
