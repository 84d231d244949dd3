//! Local development server for the Options Greeks interactive playground.
//!
//! Serves the static course content under `public/` with CORS and no-cache
//! headers so edited files show up immediately on reload.

use std::path::{Path, PathBuf};
use std::sync::Arc;

mod config;
mod handler;
mod http;
mod logger;
mod server;

use handler::ServeContext;
use server::ShutdownSignal;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;

    pin_working_directory()?;

    // No partial startup: without the content root there is nothing to serve
    let Some(root) = resolve_root(Path::new(&cfg.serve.root)) else {
        logger::log_missing_root(&cfg.serve.root);
        std::process::exit(1);
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(serve(cfg, root))
}

async fn serve(cfg: config::Config, root: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.socket_addr()?;
    let listener = server::bind_listener(addr)?;

    logger::log_server_start(cfg.server.port, &root);

    let shutdown = ShutdownSignal::new();
    server::signal::install(shutdown.clone());

    let ctx = Arc::new(ServeContext { config: cfg, root });
    server::run(listener, ctx, shutdown).await;

    logger::log_server_stop();
    Ok(())
}

/// Pin the working directory to the directory containing the executable,
/// once, so the relative content root resolves to the same place no matter
/// where the server is launched from.
fn pin_working_directory() -> std::io::Result<()> {
    let exe = std::env::current_exe()?;
    if let Some(dir) = exe.parent() {
        std::env::set_current_dir(dir)?;
    }
    Ok(())
}

/// Canonicalized content root, or `None` when it does not exist as a
/// directory
fn resolve_root(root: &Path) -> Option<PathBuf> {
    if root.is_dir() {
        root.canonicalize().ok()
    } else {
        None
    }
}
