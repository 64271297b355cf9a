//! A small static asset HTTP server.
//!
//! Binds a TCP port (3000 by default), serves files from a configured asset
//! directory, and returns the index document for the root route. Requests are
//! independent and stateless; the asset directory is fixed at startup and
//! read-only for the lifetime of the process.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
