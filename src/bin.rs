//! Binary entry point for `letschat-notify`.
//!
//! This module provides the command-line interface with options for the
//! configuration file path, logging verbosity and tracing export. It reads
//! one JSON event, renders it and posts it.

use anyhow::Context;
use clap::Parser;
use letschat_notify::{
    prelude::{Config, Event, Res, Void, anyhow, info},
    runtime::Runtime,
};
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::{Protocol, WithExportConfig};
use tokio::io::AsyncReadExt;
use tracing_subscriber::{Layer, fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt};

/// Letschat-notify – announce collaboration events in Let's Chat.
///
/// Configuration can come from `config.toml` or `LETSCHAT_*` environment
/// variables. The event is read as JSON from the given file, or from stdin.
#[derive(Parser, Debug)]
#[command(version, author, about, long_about = None)]
struct Args {
    /// Path of the JSON event; stdin when omitted.
    event: Option<std::path::PathBuf>,
    /// Override the config file path (optional).
    ///
    /// By default, the notifier will look for a config file at
    /// `.hidden/config.toml` in the current directory.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,
    /// Increase log verbosity (-v, -vv, etc.).
    ///
    /// Use multiple times to increase verbosity:
    /// - No flag: INFO level
    /// - -v: DEBUG level
    /// - -vv or more: TRACE level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Export spans over OTLP/HTTP.
    #[arg(long)]
    otlp: bool,
    /// Print the rendered message instead of posting it.
    #[arg(long)]
    dry_run: bool,
}

/// Main entry point for the letschat-notify binary.
///
/// Sets up logging based on verbosity, loads configuration and the event, and
/// runs the pipeline. Exits with an error when the message is not delivered.
#[tokio::main]
async fn main() -> Void {
    let args = Args::parse();

    // Construct the level filter.

    let level = match args.verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let level_filter = tracing_subscriber::filter::LevelFilter::from_level(level);

    // Prepare the log layer.

    let stderr = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .without_time()
        .with_ansi(true)
        .with_level(true)
        .with_file(false)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE);

    // Prepare the otlp layer.

    let otel = if args.otlp {
        let exporter = opentelemetry_otlp::SpanExporter::builder().with_http().with_protocol(Protocol::HttpBinary).build()?;
        let tracer = opentelemetry_sdk::trace::SdkTracerProvider::builder().with_simple_exporter(exporter).build().tracer("letschat-notify");
        Some(tracing_opentelemetry::layer().with_tracer(tracer).boxed())
    } else {
        None
    };

    tracing_subscriber::registry().with(otel).with(level_filter).with(stderr).init();

    let config = Config::load(args.config.as_deref())?;
    let event = read_event(args.event.as_deref()).await?;

    if args.dry_run {
        info!("Dry run, the message is printed instead of posted.");
        let runtime = Runtime::new(config)?;
        match runtime.render(&event)? {
            Some(message) => println!("[{}]\n{}", message.room, message.text),
            None => println!("(suppressed)"),
        }
        return Ok(());
    }

    if !letschat_notify::start(config, event).await? {
        return Err(anyhow!("The message could not be delivered."));
    }

    Ok(())
}

/// Read and parse the event from a file, or from stdin.
async fn read_event(path: Option<&std::path::Path>) -> Res<Event> {
    let raw = match path {
        Some(path) => tokio::fs::read_to_string(path).await.with_context(|| format!("Failed to read event file `{}`", path.display()))?,
        None => {
            let mut raw = String::new();
            tokio::io::stdin().read_to_string(&mut raw).await?;
            raw
        }
    };

    serde_json::from_str(&raw).context("Failed to parse event")
}
