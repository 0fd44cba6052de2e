/// lora-tagger Studio
///
/// Local HTTP backend for preparing an image dataset in place: pad images to
/// a square and downscale them to an exact training resolution.
/// Served by a synchronous tiny_http server.
///
/// Run with:
///   cargo run --bin studio --release -- --addr 127.0.0.1:3000
/// Log verbosity follows `RUST_LOG` (default `info`).

mod config;
mod error;
mod handlers;
mod routes;
mod state;
mod util;

use std::sync::Arc;

use clap::Parser;
use tiny_http::Server;

use config::Config;
use lora_tagger::{DurableWriter, Transformer};
use state::ServerState;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();
    let server = match Server::http(&config.addr) {
        Ok(server) => server,
        Err(e) => {
            log::error!("failed to bind HTTP server on {}: {}", config.addr, e);
            std::process::exit(1);
        }
    };

    let policy = config.retry_policy();
    let shared_state = Arc::new(ServerState::new(Transformer::new(DurableWriter::new(policy))));

    log::info!("lora-tagger studio running on http://{}", config.addr);
    log::info!(
        "writes retry up to {} time(s), {:?} apart",
        policy.max_attempts,
        policy.backoff
    );

    // Each request runs on its own thread, so a write backoff only stalls
    // the request that is retrying.
    for request in server.incoming_requests() {
        let state_clone = shared_state.clone();
        std::thread::spawn(move || {
            routes::dispatch(request, state_clone);
        });
    }
}
