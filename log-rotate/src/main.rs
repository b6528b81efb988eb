//! Log Rotate - Main entry point
//!
//! Runs one rotation and exits, or stays resident with `--schedule`.

use anyhow::Result;
use clap::Parser;
use log_rotate::{
    config::Config,
    daemon::{run_blocking, RotationScheduler, ShutdownCoordinator, SignalReloader},
    utils, RotateOptions,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Set the log source path
    #[arg(long, value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Set keyword matching log
    #[arg(long)]
    key: Option<String>,

    /// Set the log backup path
    #[arg(long, value_name = "DIR")]
    bak: Option<PathBuf>,

    /// Set the server pid path
    #[arg(long, value_name = "FILE")]
    pid: Option<PathBuf>,

    /// Backup how many days, 20 days default
    #[arg(long)]
    days: Option<u32>,

    /// Reload signal sent to the server, SIGUSR1 default
    #[arg(long)]
    signal: Option<String>,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Stay resident and rotate on this cron expression (sec min hour day month weekday)
    #[arg(long, value_name = "CRON")]
    schedule: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,
}

impl Args {
    fn rotate_options(&self) -> RotateOptions {
        RotateOptions {
            source_dir: self.dir.clone(),
            backup_dir: self.bak.clone(),
            pid_file: self.pid.clone(),
            keyword: self.key.clone(),
            days: self.days,
            signal: self.signal.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = if let Some(config_path) = &args.config {
        Config::from_file(config_path)?
    } else {
        Config::default()
    };

    // Initialize logging
    if let Some(level) = &args.log_level {
        config.log.level = level.clone();
    }
    utils::logger::init(&config.log)?;

    // Validate everything before the first mutation
    let plan = config.rotate.clone().overlay(args.rotate_options()).validate()?;
    let reloader = SignalReloader::new(plan.signal);

    let Some(cron) = args.schedule.or(config.schedule.cron) else {
        run_blocking(Arc::new(plan), reloader).await?;
        return Ok(());
    };

    tracing::info!(
        "Starting log-rotate v{} (source: {}, backup: {})",
        env!("CARGO_PKG_VERSION"),
        plan.source_dir.display(),
        plan.backup_dir.display()
    );

    let scheduler = RotationScheduler::new(plan, reloader).await?;
    scheduler.schedule(&cron).await?;

    let shutdown = ShutdownCoordinator::new();
    let (signal_result, scheduler_result) = tokio::join!(
        shutdown.wait_for_signal(),
        scheduler.run_until(shutdown.token())
    );

    if let Err(e) = scheduler_result {
        tracing::warn!("Scheduler shutdown error: {}", e);
    }
    tracing::info!("Scheduler stopped");
    signal_result?;

    Ok(())
}
