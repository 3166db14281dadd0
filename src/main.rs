//! # Dnaclad: Shared-Ancestry Hypotheses from DNA Match Segments
//!
//! ## Usage
//! ```bash
//! # Enumerate hypotheses for every match in an export
//! dnaclad enumerate --matches chromosome_browser.csv --max-depth 8
//!
//! # Group overlapping segments, labelling known groups
//! dnaclad group --matches chromosome_browser.csv --groups groups.csv --out grouped.csv
//!
//! # List segments on chromosome 7 overlapping a range, with span timings
//! dnaclad list --matches chromosome_browser.csv --chromosome 7 --start 1000000 --end 2000000 --profile
//! ```

use std::time::Instant;

use anyhow::Context;

use dnaclad::config::{Command, Config};
use dnaclad::pipelines::listing::run_listing;
use dnaclad::pipelines::{EnumerationPipeline, GroupingPipeline};
use dnaclad::utils::telemetry::{HeartbeatConfig, HeartbeatHandle, Stage, TelemetryBlackboard};
use dnaclad::utils::threading::build_thread_pool;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing: `RUST_LOG` filters events, `--profile` adds span timings
fn init_tracing(profile: bool) {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let span_events = if profile {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_span_events(span_events)
                .with_target(false)
                .with_timer(fmt::time::uptime()),
        )
        .init();
}

fn run() -> anyhow::Result<()> {
    let start = Instant::now();

    let config = Config::parse_and_validate()?;
    init_tracing(config.profile);

    let pool = build_thread_pool(config.threads)?;
    eprintln!("Dnaclad v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("Threads: {}", config.nthreads());

    let telemetry = TelemetryBlackboard::new();
    let heartbeat = if config.heartbeat {
        Some(HeartbeatHandle::spawn(telemetry.clone(), HeartbeatConfig::default())?)
    } else {
        None
    };

    match &config.command {
        Command::Enumerate(args) => {
            let pipeline = EnumerationPipeline::from_args(args, Some(telemetry.clone()))
                .with_context(|| format!("loading {:?}", args.matches))?;
            let report = pool.install(|| pipeline.run())?;
            telemetry.set_stage(Stage::WritingOutput);
            report.write_to(std::io::stdout().lock())?;
        }
        Command::Group(args) => {
            let pipeline = GroupingPipeline::new(args, Some(telemetry.clone()));
            let summary = pool.install(|| pipeline.run())?;
            eprintln!(
                "Groups: {} top-level, {} emitted, {} rows",
                summary.top_level_groups, summary.emitted_groups, summary.rows
            );
        }
        Command::List(args) => {
            run_listing(args, std::io::stdout().lock())
                .with_context(|| format!("listing {}", args.matches.display()))?;
        }
    }

    telemetry.set_stage(Stage::Complete);
    if let Some(heartbeat) = heartbeat {
        heartbeat.shutdown();
    }

    eprintln!("\nCompleted in {:.2}s", start.elapsed().as_secs_f64());
    Ok(())
}
