//! CLI entrypoint for phospho
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod commands;

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use commands::{Cli, Command, FeedbackArgs, LogArgs, parse_value};
use phospho_application::{FeedbackRequest, FlushOutcome, LogRequest, LogTransport, TaskLogger};
use phospho_infrastructure::{ConfigLoader, HttpTransport, JsonlTransport};
use std::io::Write;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    let Some(command) = cli.command else {
        bail!("No command given. Use `phospho log` or `phospho feedback`.");
    };

    let file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    file_config.validate()?;
    let config = file_config.into_client_config();

    // === Dependency Injection ===
    let transport: Arc<dyn LogTransport> = match &cli.jsonl {
        Some(path) => Arc::new(
            JsonlTransport::new(path)
                .with_context(|| format!("Failed to open {}", path.display()))?,
        ),
        None => Arc::new(HttpTransport::new(config.base_url.clone())),
    };
    let logger = TaskLogger::new(config, transport);
    info!("Starting phospho client");

    match command {
        Command::Log(args) => run_log(&logger, args)?,
        Command::Feedback(args) => run_feedback(&logger, args).await?,
    }

    // Ship whatever is still queued before the process exits
    match logger.flush().await {
        FlushOutcome::Sent { events } => info!("Shipped {} event(s)", events),
        FlushOutcome::Skipped => {}
        FlushOutcome::Failed => bail!("Failed to ship {} queued event(s)", logger.pending()),
    }

    Ok(())
}

fn run_log(logger: &TaskLogger, args: LogArgs) -> Result<()> {
    let mut request = LogRequest::new(parse_value(&args.input));
    if let Some(task_id) = args.task_id {
        request = request.with_task_id(task_id);
    }
    if let Some(session_id) = args.session_id {
        request = request.with_session_id(session_id);
    }
    for (key, value) in args.fields {
        request = request.with_field(key, value)?;
    }

    if args.stream {
        let chunks: Vec<String> = args
            .output
            .split_inclusive(char::is_whitespace)
            .map(str::to_string)
            .collect();
        let tapped = logger.log_iter(request, chunks)?;
        let task_id = tapped.sink().task_id().clone();

        let mut stdout = std::io::stdout();
        for chunk in tapped {
            print!("{}", chunk);
            stdout.flush()?;
        }
        println!();
        println!("task_id: {}", task_id);
    } else {
        let record = logger.log(request.with_output(parse_value(&args.output)))?;
        println!("{}", serde_json::to_string_pretty(&record)?);
    }
    Ok(())
}

async fn run_feedback(logger: &TaskLogger, args: FeedbackArgs) -> Result<()> {
    let mut request = FeedbackRequest::new(args.task_id);
    if let Some(flag) = args.flag {
        request = request.with_flag(flag);
    }
    if let Some(raw_flag) = args.raw_flag {
        request = request.with_raw_flag(raw_flag);
    }
    if let Some(notes) = args.notes {
        request = request.with_notes(notes);
    }
    if let Some(source) = args.source {
        request = request.with_source(source);
    }

    match logger.submit_feedback(request).await? {
        Some(task) => println!("{}", serde_json::to_string_pretty(&task)?),
        None => bail!("Feedback was not recorded"),
    }
    Ok(())
}
