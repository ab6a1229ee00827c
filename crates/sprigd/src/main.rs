//! sprig daemon - scheduled synthetic-commit publisher
//!
//! On each cron fire the daemon publishes 1-8 commits to the configured
//! branch, each rewriting one tracked file with content fetched from the
//! content API. Configuration comes from the environment (`SPRIG_*`, see
//! README), log filtering from `RUST_LOG`. The process runs until
//! SIGINT/SIGTERM.

mod error;
mod publisher;
mod scheduler;
mod service;
#[cfg(test)]
mod test_support;

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use libsprig_core::config;
use libsprig_github::GitHubClient;
use libsprig_poke::PokeClient;

use crate::error::DaemonError;
use crate::publisher::Publisher;
use crate::scheduler::Scheduler;

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("sprigd starting");

    if let Err(e) = run().await {
        error!(error = %e, "fatal startup error");
        std::process::exit(1);
    }

    info!("sprigd stopped");
}

async fn run() -> Result<(), DaemonError> {
    let config = config::load()?;
    info!(
        owner = %config.owner,
        repo = %config.repo,
        branch = %config.branch,
        file = %config.file,
        "configured"
    );

    let github = GitHubClient::new(&config)?;
    let poke = PokeClient::new(&config)?;

    let publisher = Publisher::new(github, poke, config.branch.clone(), config.file.clone());
    let scheduler = Scheduler::new(config.schedule.clone(), publisher);

    tokio::select! {
        _ = scheduler.run() => {
            error!("scheduler stopped unexpectedly");
        }
        _ = shutdown_signal() => {
            info!("received shutdown signal");
        }
    }

    Ok(())
}

/// Resolves on SIGINT or, on unix, SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
