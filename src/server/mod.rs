//! Server module
//!
//! Listener construction, the accept loop and shutdown signal plumbing.

pub mod listener;
pub mod signal;

pub use listener::bind_listener;
pub use signal::ShutdownSignal;

use crate::handler::{self, ServeContext};
use crate::logger;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};

/// Accept connections until shutdown is requested.
///
/// Cancellation is an explicit branch of the loop rather than a side effect
/// of signal delivery; in-flight connections are not awaited on exit.
pub async fn run(listener: TcpListener, ctx: Arc<ServeContext>, shutdown: ShutdownSignal) {
    loop {
        tokio::select! {
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, _peer_addr)) => handle_connection(stream, Arc::clone(&ctx)),
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }
            () = shutdown.wait() => break,
        }
    }
}

/// Serve a single connection on a spawned task
fn handle_connection(stream: TcpStream, ctx: Arc<ServeContext>) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);
        let service = service_fn(move |req| handler::handle_request(req, Arc::clone(&ctx)));

        if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
            logger::log_connection_error(&err);
        }
    });
}
