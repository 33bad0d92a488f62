//! Config service process: CSV-backed endpoint storage behind an HTTP CRUD
//! API.

use std::io;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use meow::store::ConfigStore;
use meow::web::Server;

#[derive(Parser, Debug)]
#[command(about = "Endpoint configuration service")]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "0.0.0.0")]
    addr: IpAddr,

    /// Port to listen on.
    #[arg(long, default_value_t = 8000)]
    port: u16,

    /// CSV file storing the configuration.
    #[arg(long, default_value = "config.csv")]
    file: PathBuf,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("meow=info".parse().expect("valid directive")),
        )
        .init();

    let args = Args::parse();

    let store = match ConfigStore::load(&args.file) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    };

    let server = Server::new(Arc::new(store), SocketAddr::from((args.addr, args.port)));
    if let Err(e) = server.start().await {
        tracing::error!("config service: {e}");
        std::process::exit(1);
    }
}
