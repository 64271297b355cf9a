//! Static asset loading module
//!
//! Resolves request paths against the asset root, loads file contents, and
//! builds responses. Path resolution is the security boundary: decoded paths
//! must stay inside the canonical asset root.

use std::io;
use std::path::{Component, Path, PathBuf};

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use percent_encoding::percent_decode_str;
use thiserror::Error;
use tokio::fs;

use crate::config::Config;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime, range, range::RangeOutcome};
use crate::logger;

/// Failure modes of a single asset lookup
#[derive(Debug, Error)]
pub enum AssetError {
    /// The request path does not resolve to a file under the asset root
    #[error("asset not found")]
    NotFound,
    /// The decoded path escaped the asset root
    #[error("path escapes the asset root")]
    Traversal,
    /// The file exists but could not be read
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Serve the index document for the root route
pub async fn serve_index(ctx: &RequestContext<'_>, cfg: &Config) -> Response<Full<Bytes>> {
    let index_path = Path::new(&cfg.assets.root).join(&cfg.assets.index);
    respond(ctx, load_file(&index_path).await)
}

/// Serve an asset resolved from the request path
pub async fn serve_path(ctx: &RequestContext<'_>, cfg: &Config) -> Response<Full<Bytes>> {
    let result = load_asset(&cfg.assets.root, ctx.path, &cfg.assets.index).await;
    respond(ctx, result)
}

/// Map a lookup result onto an HTTP response
///
/// Not-found and traversal both surface as 404; only a genuine read failure
/// on an existing file is a server error.
fn respond(
    ctx: &RequestContext<'_>,
    result: Result<(Vec<u8>, &'static str), AssetError>,
) -> Response<Full<Bytes>> {
    match result {
        Ok((content, content_type)) => build_asset_response(&content, content_type, ctx),
        Err(AssetError::NotFound) => http::build_404_response(),
        Err(AssetError::Traversal) => {
            logger::log_warning(&format!("Path traversal attempt blocked: {}", ctx.path));
            http::build_404_response()
        }
        Err(AssetError::Io(e)) => {
            logger::log_error(&format!("Failed to read asset for '{}': {e}", ctx.path));
            http::build_500_response()
        }
    }
}

/// Resolve `request_path` under `root` and read the file
///
/// Directory paths fall back to the default document (`index`). The resolved
/// path is canonicalized and checked against the canonical root, so neither
/// `..` segments nor symlinks can reach outside the asset directory.
pub async fn load_asset(
    root: &str,
    request_path: &str,
    index: &str,
) -> Result<(Vec<u8>, &'static str), AssetError> {
    let decoded = percent_decode_str(request_path.trim_start_matches('/'))
        .decode_utf8()
        .map_err(|_| AssetError::NotFound)?;
    if decoded.contains('\0') {
        return Err(AssetError::NotFound);
    }

    let relative = Path::new(decoded.as_ref());
    if relative
        .components()
        .any(|c| matches!(c, Component::ParentDir))
    {
        return Err(AssetError::Traversal);
    }

    let root_canonical = canonicalize(Path::new(root)).await?;
    let mut file_path = root_canonical.join(relative);

    if is_dir(&file_path).await {
        file_path = file_path.join(index);
    }

    let file_canonical = canonicalize(&file_path).await?;
    if !file_canonical.starts_with(&root_canonical) {
        return Err(AssetError::Traversal);
    }

    load_file(&file_canonical).await
}

/// Read one file and infer its content type from the extension
pub async fn load_file(path: &Path) -> Result<(Vec<u8>, &'static str), AssetError> {
    let content = fs::read(path).await.map_err(io_to_asset)?;
    let content_type = mime::content_type(path.extension().and_then(|e| e.to_str()));
    Ok((content, content_type))
}

async fn is_dir(path: &Path) -> bool {
    fs::metadata(path).await.is_ok_and(|m| m.is_dir())
}

async fn canonicalize(path: &Path) -> Result<PathBuf, AssetError> {
    fs::canonicalize(path).await.map_err(io_to_asset)
}

fn io_to_asset(e: io::Error) -> AssetError {
    if e.kind() == io::ErrorKind::NotFound {
        AssetError::NotFound
    } else {
        AssetError::Io(e)
    }
}

/// Build the asset response with `ETag` and Range support
fn build_asset_response(
    data: &[u8],
    content_type: &'static str,
    ctx: &RequestContext<'_>,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(data);
    let total_size = data.len();

    // Client already has the current version
    if cache::none_match(ctx.if_none_match.as_deref(), &etag) {
        return http::build_304_response(&etag);
    }

    match range::parse(ctx.range_header.as_deref(), total_size) {
        RangeOutcome::Satisfiable(r) => {
            let start = r.start;
            let end = r.end_position(total_size);
            let body = if ctx.is_head {
                Bytes::new()
            } else {
                Bytes::copy_from_slice(&data[start..=end])
            };
            http::build_partial_response(body, content_type, &etag, start, end, total_size)
        }
        RangeOutcome::Unsatisfiable => http::build_416_response(total_size),
        RangeOutcome::Ignored => {
            let body = if ctx.is_head {
                Bytes::new()
            } else {
                Bytes::copy_from_slice(data)
            };
            http::build_ok_response(body, content_type, &etag, total_size)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as stdfs;

    fn scratch_root(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("asset-server-{}-{name}", std::process::id()));
        let _ = stdfs::remove_dir_all(&dir);
        stdfs::create_dir_all(dir.join("sub")).unwrap();
        stdfs::write(dir.join("index.html"), "<h1>Hello</h1>").unwrap();
        stdfs::write(dir.join("style.css"), "body{color:red}").unwrap();
        stdfs::write(dir.join("sub").join("index.html"), "<p>sub</p>").unwrap();
        dir
    }

    #[tokio::test]
    async fn serves_existing_file_with_inferred_type() {
        let root = scratch_root("file");
        let (content, content_type) = load_asset(root.to_str().unwrap(), "/style.css", "index.html")
            .await
            .unwrap();
        assert_eq!(content, b"body{color:red}");
        assert_eq!(content_type, "text/css");
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let root = scratch_root("missing");
        let err = load_asset(root.to_str().unwrap(), "/missing.js", "index.html")
            .await
            .unwrap_err();
        assert!(matches!(err, AssetError::NotFound));
    }

    #[tokio::test]
    async fn traversal_segments_are_rejected() {
        let root = scratch_root("traversal");
        let err = load_asset(root.to_str().unwrap(), "/../../etc/passwd", "index.html")
            .await
            .unwrap_err();
        assert!(matches!(err, AssetError::Traversal));
    }

    #[tokio::test]
    async fn encoded_traversal_segments_are_rejected() {
        let root = scratch_root("encoded");
        let err = load_asset(root.to_str().unwrap(), "/%2e%2e/%2e%2e/etc/passwd", "index.html")
            .await
            .unwrap_err();
        assert!(matches!(err, AssetError::Traversal));
    }

    #[tokio::test]
    async fn directory_path_resolves_to_default_document() {
        let root = scratch_root("dir");
        let (content, content_type) = load_asset(root.to_str().unwrap(), "/sub", "index.html")
            .await
            .unwrap();
        assert_eq!(content, b"<p>sub</p>");
        assert_eq!(content_type, "text/html; charset=utf-8");
    }

    #[tokio::test]
    async fn percent_encoded_names_are_decoded() {
        let root = scratch_root("decode");
        stdfs::write(root.join("hello world.txt"), "hi").unwrap();
        let (content, _) = load_asset(root.to_str().unwrap(), "/hello%20world.txt", "index.html")
            .await
            .unwrap();
        assert_eq!(content, b"hi");
    }

    #[tokio::test]
    async fn missing_root_is_not_found() {
        let err = load_asset("/no/such/asset/root", "/style.css", "index.html")
            .await
            .unwrap_err();
        assert!(matches!(err, AssetError::NotFound));
    }

    #[tokio::test]
    async fn index_document_loads_as_html() {
        let root = scratch_root("index");
        let (content, content_type) = load_file(&root.join("index.html")).await.unwrap();
        assert_eq!(content, b"<h1>Hello</h1>");
        assert_eq!(content_type, "text/html; charset=utf-8");
    }
}
