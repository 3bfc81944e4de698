// gemconvert - Convert and explain source code with Gemini
// Author: kelexine (https://github.com/kelexine)

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use gemconvert::cli::{read_source, Args, Command};
use gemconvert::config::AppConfig;
use gemconvert::converter::CodeConverter;
use gemconvert::error::OperationError;
use gemconvert::gemini::GeminiClient;
use gemconvert::models::mapping::LANGUAGES;
use gemconvert::preferences::Preferences;
use gemconvert::server::create_router;
use gemconvert::utils::logging;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Phase 1: Load configuration
    let config = match &args.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };

    // Phase 2: Initialize logging
    logging::init(&config.logging)?;

    // Phase 3: Build the runtime sized from config
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.server.workers.max(1))
        .enable_all()
        .build()
        .context("failed to build Tokio runtime")?;

    runtime.block_on(run(args, config))
}

async fn run(args: Args, mut config: AppConfig) -> Result<()> {
    match args.command {
        None => serve(config).await,
        Some(Command::Serve { host, port }) => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            serve(config).await
        }
        Some(Command::Convert { from, to, file }) => {
            let source = read_source(file.as_deref()).context("failed to read source code")?;
            if from != to && source.trim().is_empty() {
                bail!("no source code to convert");
            }
            let converter = build_converter(&config)?;
            let converted = converter
                .convert(&source, &from, &to)
                .await
                .map_err(|e| report(OperationError::convert(e)))?;
            println!("{}", converted);
            Ok(())
        }
        Some(Command::Explain { language, file }) => {
            let source = read_source(file.as_deref()).context("failed to read source code")?;
            if source.trim().is_empty() {
                bail!("no source code to explain");
            }
            let converter = build_converter(&config)?;
            let explanation = converter
                .explain(&source, &language)
                .await
                .map_err(|e| report(OperationError::explain(e)))?;
            println!("{}", explanation);
            Ok(())
        }
        Some(Command::Languages) => {
            for language in LANGUAGES {
                println!("{}", language);
            }
            Ok(())
        }
        Some(Command::InitConfig { force }) => {
            let path = args.config.unwrap_or_else(AppConfig::default_config_path);
            init_config(&path, force)
        }
    }
}

/// Log the full error and hand the user only what is safe to print
fn report(err: OperationError) -> anyhow::Error {
    error!("{:?} failed: {}", err.operation, err.source);
    anyhow!(err.user_message())
}

fn build_converter(config: &AppConfig) -> Result<CodeConverter> {
    let client = Arc::new(GeminiClient::new(&config.gemini)?);
    Ok(CodeConverter::new(client, &config.converter))
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, AppConfig::default().to_toml()?)?;
    println!("Wrote {}", path.display());
    Ok(())
}

async fn serve(config: AppConfig) -> Result<()> {
    info!("Starting gemconvert v{}", env!("CARGO_PKG_VERSION"));

    // Missing API key only warns here; calls fail later
    let gemini_client = Arc::new(GeminiClient::new(&config.gemini)?);
    info!("Using Gemini model {}", config.gemini.model);

    let converter = CodeConverter::new(gemini_client.clone(), &config.converter);
    let preferences = Preferences::open(&config.preferences)?;

    let app = create_router(config.clone(), converter, preferences, Some(gemini_client))?;
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
