//! Demo driver for the defersched library
//!
//! Builds a scheduler around a printing callback and drives it through the
//! reference render loop so the commit-cycle behavior can be observed from
//! a terminal.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tracing::{debug, info};

use defersched::cli::{Cli, Command, OutputFormat};
use defersched::{DeferredCallback, RenderLoop, ScheduleHandle, SchedulerConfig};

fn setup_logging(cli_log_level: Option<&str>) -> Result<()> {
    let level = if let Some(s) = cli_log_level {
        match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        }
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.log_level.as_deref()).context("Failed to setup logging")?;

    let config = SchedulerConfig::load(cli.config.as_ref()).context("Failed to load configuration")?;
    debug!(?config, "main: configuration loaded");

    match cli.command {
        Command::Demo {
            entries,
            reschedule,
            format,
        } => cmd_demo(config, entries, reschedule, format),
        Command::Config => {
            let yaml = serde_yaml::to_string(&config).context("Failed to render configuration")?;
            print!("{}", yaml);
            Ok(())
        }
    }
}

fn cmd_demo(
    config: SchedulerConfig,
    entries: usize,
    reschedule: bool,
    format: OutputFormat,
) -> Result<()> {
    info!(entries, reschedule, "demo starting");

    // The callback needs a handle to reschedule through, but handles only
    // exist once the scheduler does; park one in a shared slot.
    let handle_slot: Rc<RefCell<Option<ScheduleHandle<String>>>> = Rc::new(RefCell::new(None));
    let rescheduled = Rc::new(Cell::new(false));

    let slot = Rc::clone(&handle_slot);
    let once = Rc::clone(&rescheduled);
    let mut scheduler = DeferredCallback::with_config(
        move |label: String| {
            println!("{} invoked: {}", "✓".green(), label.cyan());
            if reschedule && !once.get() {
                once.set(true);
                if let Some(handle) = slot.borrow().as_ref() {
                    handle.schedule("encore".to_string());
                }
            }
        },
        config,
    );

    let handle = scheduler.handle();
    *handle_slot.borrow_mut() = Some(handle.clone());

    let mut host = RenderLoop::new();
    host.mount(&scheduler);

    for n in 1..=entries {
        handle.schedule(format!("entry-{n}"));
    }

    let cycles = host
        .run_until_settled(&mut scheduler)
        .context("Render loop failed to settle")?;

    let stats = scheduler.stats();
    match format {
        OutputFormat::Text => {
            println!();
            println!("Cycles: {}", cycles);
            println!("  Scheduled: {}", stats.total_scheduled);
            println!("  Invoked: {}", stats.total_invoked);
            println!("  Peak depth: {}", stats.peak_queue_depth);
        }
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&stats).context("Failed to render stats")?
            );
        }
    }

    Ok(())
}
