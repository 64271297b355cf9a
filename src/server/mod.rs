// Server module entry point
// Binds the listener and runs the accept loop

mod connection;
mod listener;

use std::sync::Arc;

use crate::config::Config;
use crate::logger;

pub use listener::bind;

/// Bind the configured address and serve requests until the process is
/// externally terminated.
///
/// A bind failure (port in use, permission denied) propagates out and is
/// fatal; accept failures are logged and the loop continues.
pub async fn run(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.socket_addr()?;
    let listener = listener::bind(addr)?;

    logger::log_server_start(&addr, &cfg);

    let cfg = Arc::new(cfg);
    loop {
        match listener.accept().await {
            Ok((stream, peer_addr)) => {
                connection::serve(stream, peer_addr, Arc::clone(&cfg));
            }
            Err(e) => {
                logger::log_error(&format!("Failed to accept connection: {e}"));
            }
        }
    }
}
