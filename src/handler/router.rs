//! Request routing dispatch module
//!
//! Entry point for HTTP request processing. Routing is method-agnostic: every
//! verb is dispatched the same way (a POST for an asset gets the same response
//! as a GET), and HEAD receives the same headers with an empty body.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use chrono::Local;
use http_body_util::Full;
use hyper::body::{Body as _, Bytes};
use hyper::{Method, Request, Response, Version};

use crate::config::Config;
use crate::handler::static_files;
use crate::logger::{self, AccessLogEntry};

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
    pub range_header: Option<String>,
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    peer_addr: SocketAddr,
    cfg: Arc<Config>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();

    let method = req.method().clone();
    let uri = req.uri().clone();
    let version = req.version();
    let is_head = method == Method::HEAD;

    let ctx = RequestContext {
        path: uri.path(),
        is_head,
        if_none_match: header_value(&req, "if-none-match"),
        range_header: header_value(&req, "range"),
    };

    // Root route serves the index document; everything else resolves against
    // the asset root.
    let response = if ctx.path == "/" {
        static_files::serve_index(&ctx, &cfg).await
    } else {
        static_files::serve_path(&ctx, &cfg).await
    };

    if cfg.logging.access_log {
        let entry = AccessLogEntry {
            remote_addr: peer_addr.ip().to_string(),
            time: Local::now(),
            method: method.to_string(),
            path: uri.path().to_string(),
            query: uri.query().map(ToString::to_string),
            http_version: version_label(version).to_string(),
            status: response.status().as_u16(),
            body_bytes: response.body().size_hint().exact().unwrap_or(0),
            referer: header_value(&req, "referer"),
            user_agent: header_value(&req, "user-agent"),
            request_time_us: u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX),
        };
        logger::log_access(&entry, &cfg.logging.access_log_format);
    }

    Ok(response)
}

/// Extract a header as an owned string, skipping non-UTF-8 values
fn header_value(req: &Request<hyper::body::Incoming>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn version_label(version: Version) -> &'static str {
    if version == Version::HTTP_10 {
        "1.0"
    } else if version == Version::HTTP_2 {
        "2"
    } else {
        "1.1"
    }
}
