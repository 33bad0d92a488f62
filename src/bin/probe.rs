//! Monitor process: fetch endpoint definitions from the config service and
//! probe them until a termination signal arrives.

use std::io;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use meow::alert::Notifier;
use meow::config::MonitorConfig;
use meow::logfile::{default_log_path, LogFile};
use meow::monitor::Monitor;
use meow::probe::HttpChecker;
use meow::shutdown;
use meow::source::fetch_endpoints;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("meow=info".parse().expect("valid directive")),
        )
        .init();

    let cfg = match MonitorConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    };

    let client = reqwest::Client::new();
    let endpoints = match fetch_endpoints(&client, &cfg.config_url).await {
        Ok(endpoints) => endpoints,
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    };
    tracing::info!("monitoring {} endpoints", endpoints.len());

    let log_path = default_log_path();
    let logfile = match LogFile::create(&log_path) {
        Ok(logfile) => logfile,
        Err(e) => {
            tracing::error!("open log file {}: {e}", log_path.display());
            std::process::exit(1);
        }
    };
    tracing::info!("logging events to {}", log_path.display());

    let checker = match HttpChecker::new(cfg.probe_timeout) {
        Ok(checker) => Arc::new(checker),
        Err(e) => {
            tracing::error!("build http client: {e}");
            std::process::exit(1);
        }
    };
    let notifier = cfg.webhook_url.as_deref().map(Notifier::new);

    let cancel = CancellationToken::new();
    shutdown::spawn_listener(cancel.clone());

    Monitor::new(endpoints, checker, cancel)
        .run(Box::new(io::stderr()), logfile, notifier)
        .await;

    tracing::info!("monitor stopped");
}
