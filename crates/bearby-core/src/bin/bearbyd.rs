//! bearbyd -- headless Bearby wallet core speaking JSON lines.
//!
//! Usage:
//!
//!   bearbyd [OPTIONS]
//!
//! Options:
//!
//!   --data-dir <PATH>   Data directory (default: ./bearby-data)
//!   --config <PATH>     Load an `AppConfig` JSON file
//!   --memory            Keep everything in memory, nothing on disk
//!
//! Each stdin line is one JSON request, e.g.
//! `{"type":"unlock","payload":{"password":"..."}}`. Each reply is one
//! stdout line, `{"resolve": ...}` or `{"reject": ...}`. Logs go to
//! stderr and honour `RUST_LOG`.

use std::path::PathBuf;
use std::sync::Arc;

use bearby_core::{spawn_core, BackgroundState, CoreHandle, Request, Response};
use bearby_storage::{MemoryStorage, SledStorage, Storage};
use bearby_types::config::AppConfig;
use bearby_types::BearbyError;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

const DEFAULT_DATA_DIR: &str = "bearby-data";
const STORAGE_DIR: &str = "storage";

// ---------------------------------------------------------------------------
// CLI arguments (manual parsing, no clap dependency)
// ---------------------------------------------------------------------------

struct CliArgs {
    data_dir: PathBuf,
    config_path: Option<PathBuf>,
    memory: bool,
}

impl CliArgs {
    fn parse_from_env() -> Self {
        let args: Vec<String> = std::env::args().collect();
        let mut cli = Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            config_path: None,
            memory: false,
        };

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--data-dir" => {
                    i += 1;
                    if let Some(dir) = args.get(i) {
                        cli.data_dir = PathBuf::from(dir);
                    }
                }
                "--config" => {
                    i += 1;
                    cli.config_path = args.get(i).map(PathBuf::from);
                }
                "--memory" => {
                    cli.memory = true;
                }
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                other => {
                    eprintln!("unknown argument: {other}");
                    eprintln!("use --help for usage information");
                    std::process::exit(1);
                }
            }
            i += 1;
        }

        cli
    }
}

fn print_help() {
    eprintln!("bearbyd [--data-dir <PATH>] [--config <PATH>] [--memory]");
}

// ---------------------------------------------------------------------------
// Reply framing
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "lowercase")]
enum Reply {
    Resolve(Response),
    Reject(BearbyError),
}

impl From<Result<Response, BearbyError>> for Reply {
    fn from(outcome: Result<Response, BearbyError>) -> Self {
        match outcome {
            Ok(response) => Self::Resolve(response),
            Err(e) => Self::Reject(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = CliArgs::parse_from_env();

    if let Err(e) = run(cli).await {
        tracing::error!("bearbyd error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: CliArgs) -> Result<(), BearbyError> {
    let config = match &cli.config_path {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    let storage: Arc<dyn Storage> = if cli.memory {
        tracing::info!("using in-memory storage");
        Arc::new(MemoryStorage::new())
    } else {
        let path = cli.data_dir.join(STORAGE_DIR);
        std::fs::create_dir_all(&path).map_err(|e| BearbyError::StorageError {
            reason: format!("failed to create {}: {e}", path.display()),
        })?;
        Arc::new(SledStorage::open(&path)?)
    };

    let mut state = BackgroundState::new(storage, &config)?;
    state.sync()?;

    let (core, task) = spawn_core(state);
    serve_stdio(&core).await?;

    core.shutdown().await?;
    task.await.map_err(|e| BearbyError::StorageError {
        reason: format!("core loop panicked: {e}"),
    })?;
    Ok(())
}

async fn serve_stdio(core: &CoreHandle) -> Result<(), BearbyError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await.map_err(io_error)? {
        if line.trim().is_empty() {
            continue;
        }

        let reply: Reply = match serde_json::from_str::<Request>(&line) {
            Ok(request) => core.request(request).await.into(),
            Err(e) => Reply::Reject(BearbyError::CodecError {
                reason: format!("malformed request: {e}"),
            }),
        };

        let mut out = serde_json::to_vec(&reply).map_err(|e| BearbyError::CodecError {
            reason: format!("failed to encode reply: {e}"),
        })?;
        out.push(b'\n');
        stdout.write_all(&out).await.map_err(io_error)?;
        stdout.flush().await.map_err(io_error)?;
    }

    tracing::info!("stdin closed");
    Ok(())
}

fn io_error(e: std::io::Error) -> BearbyError {
    BearbyError::StorageError {
        reason: format!("stdio failure: {e}"),
    }
}
