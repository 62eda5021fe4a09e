//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: path parsing, method dispatch,
//! error mapping and per-request logging.

use crate::config::AppState;
use crate::error::RequestError;
use crate::handler::{delete, listing, static_files, upload};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::HeaderMap;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

/// Allowed methods on `/`
const ROOT_METHODS: &str = "GET, HEAD, PUT, POST";
/// Allowed methods on `/{file}`
const FILE_METHODS: &str = "GET, HEAD, PUT, POST, DELETE";

/// Request context handed to the individual operations
pub struct RequestContext<'a> {
    pub method: &'a Method,
    pub path: &'a str,
    pub is_head: bool,
    pub headers: &'a HeaderMap,
}

impl RequestContext<'_> {
    pub fn header(&self, name: impl hyper::header::AsHeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Matched route
#[derive(Debug, PartialEq, Eq)]
enum Route {
    /// `/`
    Root,
    /// `/{file}`, percent-decoded
    File(String),
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let (parts, body) = req.into_parts();
    let ctx = RequestContext {
        method: &parts.method,
        path: parts.uri.path(),
        is_head: parts.method == Method::HEAD,
        headers: &parts.headers,
    };

    let logger = &state.logger;
    logger.debug(
        "Request received",
        &[("method", &ctx.method), ("path", &ctx.path)],
    );

    let response = match dispatch(&ctx, body, &state).await {
        Ok(resp) => resp,
        Err(err) => {
            if matches!(err, RequestError::BadRequest(_) | RequestError::Internal(_)) {
                logger.error(
                    &err.to_string(),
                    &[
                        ("method", &ctx.method),
                        ("path", &ctx.path),
                        ("status", &err.status().as_u16()),
                    ],
                );
            }
            err.into_response()
        }
    };

    logger.debug(
        "Response served",
        &[
            ("method", &ctx.method),
            ("path", &ctx.path),
            ("status", &response.status().as_u16()),
        ],
    );
    Ok(response)
}

/// Route request to one of the file operations
async fn dispatch<B>(
    ctx: &RequestContext<'_>,
    body: B,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, RequestError>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    match parse_route(ctx.path)? {
        Route::Root => match *ctx.method {
            Method::GET | Method::HEAD => listing::list_files(ctx, state).await,
            Method::PUT | Method::POST => upload::upload_form(ctx, body, state).await,
            _ => Err(RequestError::MethodNotAllowed(ROOT_METHODS)),
        },
        Route::File(name) => match *ctx.method {
            Method::GET | Method::HEAD => static_files::serve_file(ctx, &name, state).await,
            Method::PUT | Method::POST => upload::upload_body(ctx, &name, body, state).await,
            Method::DELETE => delete::delete_file(&name, state).await,
            _ => Err(RequestError::MethodNotAllowed(FILE_METHODS)),
        },
    }
}

/// `/` or a single percent-decoded segment; deeper paths do not exist
fn parse_route(path: &str) -> Result<Route, RequestError> {
    let segment = path.strip_prefix('/').unwrap_or(path);
    if segment.is_empty() {
        return Ok(Route::Root);
    }
    if segment.contains('/') {
        return Err(RequestError::NotFound);
    }

    let name = urlencoding::decode(segment)
        .map_err(|e| RequestError::BadRequest(format!("invalid path encoding: {e}")))?;
    Ok(Route::File(name.into_owned()))
}
