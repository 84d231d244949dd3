//! Static file serving module
//!
//! Maps request paths to files under the content root: percent-decoding,
//! traversal rejection, index-file resolution and directory listings.

use crate::http::mime;
use crate::logger;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Outcome of resolving a request path against the content root
#[derive(Debug)]
pub enum Resolved {
    /// An existing, readable file
    File {
        content: Vec<u8>,
        content_type: &'static str,
    },
    /// A directory without an index file, rendered as a listing
    Listing(String),
    NotFound,
}

/// Resolve a request path and load the matching content.
///
/// `root` must be canonicalized; every resolved path is required to stay
/// under it, so symlinks pointing outside the root come back as `NotFound`.
pub async fn serve_path(
    root: &Path,
    request_path: &str,
    index_files: &[String],
    directory_listing: bool,
) -> Resolved {
    let Some(relative) = sanitize_request_path(request_path) else {
        logger::log_warning(&format!("Rejected request path: {request_path}"));
        return Resolved::NotFound;
    };

    let mut file_path = root.join(&relative);

    if file_path.is_dir() {
        match resolve_index(&file_path, index_files) {
            Some(index_path) => file_path = index_path,
            None => {
                if !directory_listing {
                    return Resolved::NotFound;
                }
                let Ok(canonical_dir) = file_path.canonicalize() else {
                    return Resolved::NotFound;
                };
                if !canonical_dir.starts_with(root) {
                    log_traversal_blocked(request_path, &canonical_dir);
                    return Resolved::NotFound;
                }
                return match render_listing(&canonical_dir, request_path).await {
                    Some(html) => Resolved::Listing(html),
                    None => Resolved::NotFound,
                };
            }
        }
    }

    // Not found is common (404), no need to log
    let Ok(canonical) = file_path.canonicalize() else {
        return Resolved::NotFound;
    };
    if !canonical.starts_with(root) {
        log_traversal_blocked(request_path, &canonical);
        return Resolved::NotFound;
    }
    if !canonical.is_file() {
        return Resolved::NotFound;
    }

    let content = match fs::read(&canonical).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {}",
                canonical.display(),
                e
            ));
            return Resolved::NotFound;
        }
    };

    let content_type = mime::get_content_type(canonical.extension().and_then(|e| e.to_str()));

    Resolved::File {
        content,
        content_type,
    }
}

/// Percent-decode a request path and reduce it to a relative path under the
/// root. Returns `None` for paths that cannot be decoded, contain NUL bytes
/// or carry parent-directory segments.
fn sanitize_request_path(request_path: &str) -> Option<String> {
    let decoded = urlencoding::decode(request_path).ok()?;
    if decoded.contains('\0') {
        return None;
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => return None,
            other => segments.push(other),
        }
    }
    Some(segments.join("/"))
}

/// First existing index file inside a directory, in configured order
fn resolve_index(dir: &Path, index_files: &[String]) -> Option<PathBuf> {
    index_files
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Render a directory listing as HTML, entries sorted by name with
/// directories marked by a trailing slash
async fn render_listing(dir: &Path, request_path: &str) -> Option<String> {
    let mut read_dir = fs::read_dir(dir).await.ok()?;
    let mut names: Vec<String> = Vec::new();

    while let Ok(Some(entry)) = read_dir.next_entry().await {
        let name = entry.file_name().to_string_lossy().into_owned();
        let is_dir = entry
            .file_type()
            .await
            .map(|file_type| file_type.is_dir())
            .unwrap_or(false);
        names.push(if is_dir { format!("{name}/") } else { name });
    }
    names.sort();

    let display_path = urlencoding::decode(request_path)
        .map(std::borrow::Cow::into_owned)
        .unwrap_or_else(|_| request_path.to_string());
    let title = escape_html(&display_path);

    let mut html = format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Directory listing for {title}</title>\n</head>\n<body>\n\
         <h1>Directory listing for {title}</h1>\n<hr>\n<ul>\n"
    );
    for name in &names {
        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            encode_href(name),
            escape_html(name)
        ));
    }
    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    Some(html)
}

/// Percent-encode an entry name for use as a link target, keeping the
/// directory marker slash intact
fn encode_href(name: &str) -> String {
    let (stem, slash) = name
        .strip_suffix('/')
        .map_or((name, ""), |stem| (stem, "/"));
    format!("{}{}", urlencoding::encode(stem), slash)
}

/// Escape special characters for HTML text and attribute values
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn log_traversal_blocked(request_path: &str, resolved: &Path) {
    logger::log_warning(&format!(
        "Path traversal attempt blocked: {} -> {}",
        request_path,
        resolved.display()
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_files() -> Vec<String> {
        vec!["index.html".to_string(), "index.htm".to_string()]
    }

    /// Fresh, canonicalized directory under the system temp dir
    fn test_root(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("playground-server-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir.canonicalize().unwrap()
    }

    #[test]
    fn test_sanitize_plain_paths() {
        assert_eq!(sanitize_request_path("/"), Some(String::new()));
        assert_eq!(
            sanitize_request_path("/index.html"),
            Some("index.html".to_string())
        );
        assert_eq!(
            sanitize_request_path("/js/app.js"),
            Some("js/app.js".to_string())
        );
        assert_eq!(
            sanitize_request_path("/lessons/./intro.html"),
            Some("lessons/intro.html".to_string())
        );
    }

    #[test]
    fn test_sanitize_decodes_percent_escapes() {
        assert_eq!(
            sanitize_request_path("/hello%20world.txt"),
            Some("hello world.txt".to_string())
        );
    }

    #[test]
    fn test_sanitize_rejects_traversal() {
        assert_eq!(sanitize_request_path("/../etc/passwd"), None);
        assert_eq!(sanitize_request_path("/a/../../b"), None);
        assert_eq!(sanitize_request_path("/a/%2e%2e/b"), None);
        assert_eq!(sanitize_request_path("/%2e%2e%2fsecret"), None);
    }

    #[test]
    fn test_sanitize_rejects_nul() {
        assert_eq!(sanitize_request_path("/a%00b"), None);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<script>"), "&lt;script&gt;");
        assert_eq!(escape_html("a&b"), "a&amp;b");
        assert_eq!(escape_html("say \"hi\""), "say &quot;hi&quot;");
    }

    #[test]
    fn test_encode_href_keeps_directory_marker() {
        assert_eq!(encode_href("sub dir/"), "sub%20dir/");
        assert_eq!(encode_href("a&b.txt"), "a%26b.txt");
    }

    #[tokio::test]
    async fn test_root_serves_index_file() {
        let root = test_root("root-index");
        std::fs::write(root.join("index.html"), "<h1>greeks</h1>").unwrap();

        match serve_path(&root, "/", &index_files(), true).await {
            Resolved::File {
                content,
                content_type,
            } => {
                assert_eq!(content, b"<h1>greeks</h1>");
                assert_eq!(content_type, "text/html; charset=utf-8");
            }
            other => panic!("expected file, got {other:?}"),
        }
        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn test_file_bytes_served_exactly() {
        let root = test_root("file-bytes");
        std::fs::write(root.join("calculator.js"), "const delta = 0.5;").unwrap();

        match serve_path(&root, "/calculator.js", &index_files(), true).await {
            Resolved::File {
                content,
                content_type,
            } => {
                assert_eq!(content, b"const delta = 0.5;");
                assert_eq!(content_type, "application/javascript");
            }
            other => panic!("expected file, got {other:?}"),
        }
        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let root = test_root("missing");
        assert!(matches!(
            serve_path(&root, "/missing.txt", &index_files(), true).await,
            Resolved::NotFound
        ));
        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn test_traversal_cannot_escape_root() {
        let root = test_root("traversal");
        let secret = root.parent().unwrap().join(format!(
            "playground-server-secret-{}.txt",
            std::process::id()
        ));
        std::fs::write(&secret, "outside").unwrap();

        let name = secret.file_name().unwrap().to_str().unwrap().to_string();
        for path in [
            format!("/../{name}"),
            format!("/%2e%2e/{name}"),
            format!("/..%2f{name}"),
        ] {
            assert!(
                matches!(
                    serve_path(&root, &path, &index_files(), true).await,
                    Resolved::NotFound
                ),
                "escaped root via {path}"
            );
        }

        let _ = std::fs::remove_file(&secret);
        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn test_listing_for_directory_without_index() {
        let root = test_root("listing");
        std::fs::write(root.join("advice.js"), "x").unwrap();
        std::fs::create_dir_all(root.join("lessons")).unwrap();

        match serve_path(&root, "/", &index_files(), true).await {
            Resolved::Listing(html) => {
                assert!(html.contains("Directory listing for /"));
                assert!(html.contains("advice.js"));
                assert!(html.contains("lessons/"));
            }
            other => panic!("expected listing, got {other:?}"),
        }
        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn test_listing_disabled_is_not_found() {
        let root = test_root("listing-off");
        std::fs::write(root.join("advice.js"), "x").unwrap();

        assert!(matches!(
            serve_path(&root, "/", &index_files(), false).await,
            Resolved::NotFound
        ));
        let _ = std::fs::remove_dir_all(&root);
    }
}
