use std::process::ExitCode;

use chrono::Utc;
use clap::Parser;
use oncal_app::cli::Cli;
use oncal_app::preview::Preview;
use oncal_calendar::{TimeZoneResolver, parse_start};
use oncal_core::config::load_config;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

fn main() -> anyhow::Result<ExitCode> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config()?;

    tracing::debug!(config = ?config, "Configuration loaded");

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping warn");
    }

    let mut resolver = TimeZoneResolver::new();
    let zone = resolver.resolve(
        cli.timezone
            .as_deref()
            .unwrap_or(config.calendar.timezone.as_str()),
    )?;
    let iterations = cli
        .iterations
        .map_or(config.calendar.iterations, usize::from);

    let start = match cli.start.as_deref() {
        Some(text) => parse_start(text, Some(zone), &mut resolver)?.with_timezone(&zone),
        None => Utc::now().with_timezone(&zone),
    };

    tracing::debug!(%start, iterations, zone = %zone.name(), "Previewing expressions");

    let mut status = ExitCode::SUCCESS;
    for (i, expression) in cli.expressions.iter().enumerate() {
        if i > 0 {
            println!();
        }

        match Preview::new(expression, &start, iterations, &mut resolver) {
            Ok(preview) => print!("{preview}"),
            Err(e) => {
                eprintln!("Failed to parse calendar specification '{expression}': {e}");
                status = ExitCode::FAILURE;
            }
        }
    }

    Ok(status)
}
