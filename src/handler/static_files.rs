//! Static file serving module
//!
//! Serves the public asset directory: file loading, MIME type detection,
//! `ETag` revalidation and index files.

use crate::config::StaticFilesConfig;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime, HttpResponse};
use crate::logger;
use hyper::body::Bytes;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Serve a request path from the static directory, or 404
pub async fn serve(ctx: &RequestContext<'_>, config: &StaticFilesConfig) -> HttpResponse {
    match load_from_directory(&config.dir, ctx.path, &config.index_files).await {
        Some((content, content_type)) => build_static_file_response(
            content,
            content_type,
            ctx.if_none_match.as_deref(),
            ctx.is_head,
        ),
        None => http::build_404_response("404 Not Found"),
    }
}

/// Load static file from directory with index file support
pub async fn load_from_directory(
    static_dir: &str,
    path: &str,
    index_files: &[String],
) -> Option<(Vec<u8>, &'static str)> {
    let decoded = urlencoding::decode(path).ok()?;
    let relative_path = decoded.trim_start_matches('/');

    // Security: the resolved file must stay within static_dir
    let static_dir_canonical = match Path::new(static_dir).canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_debug(&format!(
                "Static directory not found or inaccessible '{static_dir}': {e}"
            ));
            return None;
        }
    };

    let mut file_path = Path::new(static_dir).join(relative_path);

    if file_path.is_dir() {
        file_path = find_index_file(&file_path, index_files)?;
    }

    // File not found is common (404), no need to log at warning level
    let Ok(file_path_canonical) = file_path.canonicalize() else {
        return None;
    };
    if !file_path_canonical.starts_with(&static_dir_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            path,
            file_path_canonical.display()
        ));
        return None;
    }

    let content = match fs::read(&file_path_canonical).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {}",
                file_path.display(),
                e
            ));
            return None;
        }
    };

    Some((content, mime::content_type_for(&file_path)))
}

fn find_index_file(dir: &Path, index_files: &[String]) -> Option<PathBuf> {
    index_files
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Build static file response with `ETag` support
fn build_static_file_response(
    data: Vec<u8>,
    content_type: &str,
    if_none_match: Option<&str>,
    is_head: bool,
) -> HttpResponse {
    let etag = cache::generate_etag(&data);

    // Check if client has cached version
    if cache::check_etag_match(if_none_match, &etag) {
        return http::build_304_response(&etag);
    }

    http::build_cached_response(Bytes::from(data), content_type, &etag, is_head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::StatusCode;

    /// Temporary public directory with a stylesheet, an index page and a
    /// file outside the root
    fn fixture(name: &str) -> (PathBuf, StaticFilesConfig) {
        let base = std::env::temp_dir().join(format!(
            "brand_server_static_{name}_{}",
            std::process::id()
        ));
        let public = base.join("public");
        std::fs::create_dir_all(public.join("docs")).unwrap();
        std::fs::write(public.join("style.css"), "body { margin: 0; }").unwrap();
        std::fs::write(public.join("docs").join("index.html"), "<h1>Docs</h1>").unwrap();
        std::fs::write(base.join("secret.txt"), "top secret").unwrap();

        let config = StaticFilesConfig {
            dir: public.to_string_lossy().to_string(),
            index_files: vec!["index.html".to_string()],
        };
        (base, config)
    }

    fn ctx(path: &str, if_none_match: Option<String>) -> RequestContext<'_> {
        RequestContext {
            path,
            is_head: false,
            if_none_match,
        }
    }

    #[tokio::test]
    async fn test_serves_file_with_type_and_etag() {
        let (base, config) = fixture("file");
        let resp = serve(&ctx("/style.css", None), &config).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["content-type"], "text/css; charset=utf-8");

        let etag = resp.headers()["etag"].to_str().unwrap().to_string();
        let resp = serve(&ctx("/style.css", Some(etag)), &config).await;
        assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);
        let _ = std::fs::remove_dir_all(base);
    }

    #[tokio::test]
    async fn test_directory_index() {
        let (base, config) = fixture("index");
        let loaded = load_from_directory(&config.dir, "/docs/", &config.index_files).await;
        let (content, content_type) = loaded.unwrap();
        assert_eq!(content, b"<h1>Docs</h1>");
        assert_eq!(content_type, "text/html; charset=utf-8");
        let _ = std::fs::remove_dir_all(base);
    }

    #[tokio::test]
    async fn test_traversal_and_missing_are_404() {
        let (base, config) = fixture("traversal");
        let resp = serve(&ctx("/../secret.txt", None), &config).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let resp = serve(&ctx("/%2e%2e/secret.txt", None), &config).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let resp = serve(&ctx("/nope.js", None), &config).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let _ = std::fs::remove_dir_all(base);
    }
}
