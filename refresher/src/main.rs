//! Portainer Stack Refresher - Entry Point
//!
//! Re-pulls images and redeploys Portainer stacks via the Portainer API.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use portainer_refresher::app::run::run;
use portainer_refresher::cli::{CliArgs, ResolvedConfig};
use portainer_refresher::config::settings::{load_settings, Settings};
use portainer_refresher::console::ConsoleReporter;
use portainer_refresher::deploy::progress::{NoProgress, ProgressSink};
use portainer_refresher::logs::init_logging;
use portainer_refresher::utils::version_info;

/// Exit status after Ctrl+C
const EXIT_INTERRUPTED: u8 = 130;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config = match load_config(args).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(config.logs.clone()) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let version = version_info();
    info!(
        "portainer-refresher {} ({}, built {})",
        version.version, version.git_hash, version.build_time
    );

    let reporter = ConsoleReporter::new();
    let progress: &dyn ProgressSink = if config.summary_json {
        &NoProgress
    } else {
        reporter.header(&version.version);
        &reporter
    };
    let summary_json = config.summary_json;

    tokio::select! {
        result = run(config.refresh, progress) => match result {
            Ok(summary) => {
                if summary_json {
                    match serde_json::to_string_pretty(&summary) {
                        Ok(json) => println!("{}", json),
                        Err(e) => error!("Failed to serialize run summary: {}", e),
                    }
                }
                ExitCode::from(summary.exit_code())
            }
            Err(e) => {
                error!("Refresh aborted: {}", e);
                reporter.fatal(&e);
                ExitCode::FAILURE
            }
        },
        _ = await_shutdown_signal() => {
            eprintln!("Interrupted, stopping.");
            ExitCode::from(EXIT_INTERRUPTED)
        }
    }
}

async fn load_config(args: CliArgs) -> anyhow::Result<ResolvedConfig> {
    let settings = match &args.config {
        Some(path) => load_settings(path)
            .await
            .with_context(|| format!("loading {}", path.display()))?,
        None => Settings::default(),
    };

    Ok(args.resolve(settings)?)
}

async fn await_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(sigterm) => sigterm,
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
                return;
            }
        };

        tokio::select! {
            _ = sigterm.recv() => {
                info!("SIGTERM received, shutting down...");
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl+C received, shutting down...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
        info!("Ctrl+C received, shutting down...");
    }
}
