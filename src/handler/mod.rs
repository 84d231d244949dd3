//! Request handler module
//!
//! Entry point for HTTP request processing: method gate, static file
//! dispatch and the development-header injection applied to every response.

pub mod static_files;

use crate::config::Config;
use crate::http::{self, response};
use crate::logger;
use http_body_util::Full;
use hyper::body::{Body as _, Bytes};
use hyper::{Method, Request, Response};
use static_files::Resolved;
use std::convert::Infallible;
use std::path::PathBuf;
use std::sync::Arc;

/// Shared request-handling state, built once at startup
pub struct ServeContext {
    pub config: Config,
    /// Canonicalized content root, the containment boundary for resolution
    pub root: PathBuf,
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    ctx: Arc<ServeContext>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let version = req.version();

    let mut response = route_request(&method, &path, &ctx).await;
    response::apply_dev_headers(&mut response);

    if ctx.config.logging.access_log {
        let body_bytes = response.body().size_hint().exact().unwrap_or(0);
        logger::log_access(
            method.as_str(),
            &path,
            version,
            response.status().as_u16(),
            body_bytes,
        );
    }

    Ok(response)
}

/// Route a request to the matching response, before header injection
async fn route_request(method: &Method, path: &str, ctx: &ServeContext) -> Response<Full<Bytes>> {
    let is_head = *method == Method::HEAD;
    match *method {
        Method::GET | Method::HEAD => {}
        Method::OPTIONS => return http::build_options_response(),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            return http::build_405_response();
        }
    }

    let serve = &ctx.config.serve;
    match static_files::serve_path(&ctx.root, path, &serve.index_files, serve.directory_listing)
        .await
    {
        Resolved::File {
            content,
            content_type,
        } => http::build_file_response(content, content_type, is_head),
        Resolved::Listing(html) => http::build_html_response(html, is_head),
        Resolved::NotFound => http::build_404_response(),
    }
}
