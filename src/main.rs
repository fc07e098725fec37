use anyhow::Result;
use clap::{arg, command, value_parser};
use repolens::api::{self, AppState};
use repolens::config;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let matches = command!()
        .about("Web backend to visualize a Git repository's commit graph and manage its branches")
        .arg(arg!(--host <HOST> "Address to bind the HTTP server to"))
        .arg(arg!(--port <PORT> "Port to listen on").value_parser(value_parser!(u16)))
        .arg(
            arg!(--limit <COUNT> "Default maximum number of commits per snapshot")
                .value_parser(value_parser!(usize)),
        )
        .arg(arg!(--config <FILE> "Settings file to use instead of the per-user one"))
        .arg(arg!(--log <LEVEL> "Log filter, e.g. 'info' or 'repolens=debug'"))
        .get_matches();

    let filter = matches
        .get_one::<String>("log")
        .cloned()
        .unwrap_or_else(|| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter)))
        .compact()
        .init();

    let mut settings = match matches.get_one::<String>("config") {
        Some(path) => config::load_settings(Path::new(path))?,
        None => config::init_app_settings()?,
    };
    if let Some(host) = matches.get_one::<String>("host") {
        settings.server.host = host.clone();
    }
    if let Some(port) = matches.get_one::<u16>("port") {
        settings.server.port = *port;
    }
    if let Some(limit) = matches.get_one::<usize>("limit") {
        settings.server.commit_limit = *limit;
    }

    info!("starting repolens {}", env!("CARGO_PKG_VERSION"));
    api::serve(Arc::new(AppState { settings })).await
}
