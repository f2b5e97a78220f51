use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{Arc, mpsc};

use intake_assist::application::ApplicationData;
use intake_assist::config;
use intake_assist::error::AppError;
use intake_assist::suggest::worker::{AssistRequest, AssistResponse, spawn_worker};
use intake_assist::suggest::{SuggestionOrchestrator, accept_review, render_review_text};

/// AI-assisted drafting for the situation section of a support application
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Suggest rewrites for the situation section of a support application"
)]
struct Args {
    /// Application JSON file (if not provided, reads from stdin)
    input: Option<PathBuf>,

    /// Print the full application with the suggestion accepted
    #[arg(long)]
    apply: bool,

    /// Print the suggestion as JSON instead of review text
    #[arg(long, conflicts_with = "apply")]
    json: bool,
}

fn main() -> Result<()> {
    // Writes to /tmp/intake-assist-debug.log at DEBUG level
    #[cfg(debug_assertions)]
    init_debug_log();

    color_eyre::install()?;

    let args = Args::parse();

    let config_result = config::load_config();
    if let Some(warning) = &config_result.warning {
        eprintln!("Warning: {}", warning);
    }

    // Missing credentials are fatal before any input is read
    let orchestrator = Arc::new(SuggestionOrchestrator::from_config(
        &config_result.config.assist,
    )?);

    let data = read_application(args.input.as_deref())?;

    let (request_tx, request_rx) = mpsc::channel();
    let (response_tx, response_rx) = mpsc::channel();
    let worker = spawn_worker(orchestrator, request_rx, response_tx);

    request_tx.send(AssistRequest::Generate {
        data: data.clone(),
        request_id: 1,
    })?;
    drop(request_tx);

    let response = response_rx
        .recv()
        .map_err(|_| eyre!("Suggestion worker stopped without responding"))?;
    if let Err(e) = worker.join() {
        log::error!("Suggestion worker thread panicked: {:?}", e);
    }

    match response {
        AssistResponse::Suggestion {
            result, from_cache, ..
        } => {
            log::debug!("Suggestion received (from_cache={})", from_cache);
            if args.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else if args.apply {
                let accepted = accept_review(&render_review_text(&result), &data.situation);
                for issue in accepted.validate() {
                    eprintln!("Warning: {}: {}", issue.field, issue.message);
                }
                println!(
                    "{}",
                    serde_json::to_string_pretty(&data.with_situation(accepted))?
                );
            } else {
                println!("{}", render_review_text(&result));
            }
            Ok(())
        }
        AssistResponse::Failed { kind, message, .. } => {
            log::debug!("Suggestion failed: {}", kind);
            Err(eyre!("{}", message))
        }
    }
}

/// Read application JSON from `path`, or stdin when absent
fn read_application(path: Option<&Path>) -> Result<ApplicationData, AppError> {
    let json = match path {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    ApplicationData::from_json(&json)
}

#[cfg(debug_assertions)]
fn init_debug_log() {
    use std::io::Write;

    let Ok(log_file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("/tmp/intake-assist-debug.log")
    else {
        return;
    };

    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Debug)
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .format(|buf, record| {
            use std::time::SystemTime;
            let datetime: chrono::DateTime<chrono::Local> = SystemTime::now().into();
            writeln!(
                buf,
                "[{}] [{}] {}",
                datetime.format("%Y-%m-%dT%H:%M:%S%.3f"),
                record.level(),
                record.args()
            )
        })
        .init();

    log::debug!("=== INTAKE-ASSIST DEBUG SESSION STARTED ===");
}
