// Connection handling module
// Serves a single accepted TCP connection over HTTP/1.1

use std::sync::Arc;
use std::time::Duration;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;

use crate::config::Config;
use crate::handler;
use crate::logger;

/// Serve a single connection in a spawned task.
///
/// Each connection gets its own task; a request failure or client disconnect
/// is contained to that task and never affects the accept loop. The whole
/// connection is bounded by the larger of the configured read/write timeouts.
pub fn serve(
    stream: tokio::net::TcpStream,
    peer_addr: std::net::SocketAddr,
    cfg: Arc<Config>,
) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let timeout_duration = Duration::from_secs(std::cmp::max(
            cfg.performance.read_timeout,
            cfg.performance.write_timeout,
        ));

        let mut builder = http1::Builder::new();
        if cfg.performance.keep_alive_timeout > 0 {
            builder.keep_alive(true);
        }

        let svc_cfg = Arc::clone(&cfg);
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| {
                let cfg = Arc::clone(&svc_cfg);
                async move { handler::handle_request(req, peer_addr, cfg).await }
            }),
        );

        match tokio::time::timeout(timeout_duration, conn).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => logger::log_connection_error(&err),
            Err(_) => {
                logger::log_warning(&format!(
                    "Connection from {peer_addr} timed out after {} seconds",
                    timeout_duration.as_secs()
                ));
            }
        }
    });
}
