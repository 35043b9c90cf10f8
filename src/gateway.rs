//! Public HTTP front end: liveness, cross-origin headers, the plain-HTTP
//! redirect, and the proxy into the internal JSON-RPC server.

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::header::{self, HeaderMap, HeaderValue};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{body::Incoming, Method, Request, Response, StatusCode};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::{TokioExecutor, TokioIo};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

type BoxBody = http_body_util::combinators::BoxBody<Bytes, hyper::Error>;
type ProxyError = Box<dyn std::error::Error + Send + Sync>;

const ALLOWED_METHODS: &str = "GET,HEAD,PUT,PATCH,POST,DELETE";

pub struct GatewayState {
    allowed_origins: Vec<String>,
    rpc_path: String,
    upstream: SocketAddr,
    client: Client<HttpConnector, Full<Bytes>>,
}

impl GatewayState {
    pub fn new(allowed_origins: Vec<String>, rpc_path: String, upstream: SocketAddr) -> Self {
        Self {
            allowed_origins,
            rpc_path,
            upstream,
            client: Client::builder(TokioExecutor::new()).build_http(),
        }
    }

    fn is_allowed_origin(&self, origin: &HeaderValue) -> bool {
        origin
            .to_str()
            .map(|origin| self.allowed_origins.iter().any(|allowed| allowed == origin))
            .unwrap_or(false)
    }
}

/// Accepts connections until the listener fails.
pub async fn serve(listener: TcpListener, state: Arc<GatewayState>) -> std::io::Result<()> {
    loop {
        let (stream, peer) = listener.accept().await?;
        let io = TokioIo::new(stream);
        let state = Arc::clone(&state);

        tokio::task::spawn(async move {
            let service = service_fn(move |req| handle_request(Arc::clone(&state), req));
            if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                error!("Error serving connection from {}: {:?}", peer, err);
            }
        });
    }
}

async fn handle_request(
    state: Arc<GatewayState>,
    req: Request<Incoming>,
) -> Result<Response<BoxBody>, Infallible> {
    debug!("Handling request: {} {}", req.method(), req.uri());

    let origin = req
        .headers()
        .get(header::ORIGIN)
        .filter(|origin| state.is_allowed_origin(origin))
        .cloned();

    let mut response = route(&state, req).await;
    if let Some(origin) = origin {
        apply_cors(response.headers_mut(), origin);
    }
    Ok(response)
}

async fn route(state: &GatewayState, req: Request<Incoming>) -> Response<BoxBody> {
    let path = req.uri().path();

    if req.method() == Method::OPTIONS {
        return preflight(req.headers());
    }

    if path == "/" && (req.method() == Method::GET || req.method() == Method::HEAD) {
        return text(StatusCode::OK, "OK");
    }

    if path == state.rpc_path && req.method() == Method::POST {
        return match proxy_request(state, req).await {
            Ok(response) => response,
            Err(err) => {
                error!("Proxy error: {}", err);
                text(StatusCode::BAD_GATEWAY, format!("Proxy error: {}", err))
            }
        };
    }

    match https_redirect_target(&req) {
        Some(location) => redirect(&location),
        None => text(StatusCode::NOT_FOUND, "Not Found"),
    }
}

async fn proxy_request(
    state: &GatewayState,
    req: Request<Incoming>,
) -> Result<Response<BoxBody>, ProxyError> {
    let upstream_url = format!(
        "http://{}{}",
        state.upstream,
        req.uri().path_and_query().map(|x| x.as_str()).unwrap_or("/")
    );

    let mut upstream_req = Request::builder().method(req.method()).uri(upstream_url);

    // Copy headers (except host)
    for (name, value) in req.headers() {
        if name != header::HOST {
            upstream_req = upstream_req.header(name, value);
        }
    }

    let body_bytes = req.collect().await?.to_bytes();
    let upstream_req = upstream_req.body(Full::new(body_bytes))?;

    let upstream_resp = state.client.request(upstream_req).await?;

    let mut resp_builder = Response::builder().status(upstream_resp.status());
    for (name, value) in upstream_resp.headers() {
        resp_builder = resp_builder.header(name, value);
    }

    let body_bytes = upstream_resp.collect().await?.to_bytes();
    Ok(resp_builder.body(full_body(body_bytes))?)
}

/// `https://<host><path>` for requests that did not arrive over TLS.
fn https_redirect_target<B>(req: &Request<B>) -> Option<String> {
    let forwarded_https = req
        .headers()
        .get("x-forwarded-proto")
        .is_some_and(|proto| proto.as_bytes() == b"https");
    if forwarded_https {
        return None;
    }

    let host = req
        .headers()
        .get(header::HOST)
        .and_then(|host| host.to_str().ok())
        .unwrap_or_default();
    let path = req.uri().path_and_query().map(|x| x.as_str()).unwrap_or("/");
    Some(format!("https://{}{}", host, path))
}

fn apply_cors(headers: &mut HeaderMap, origin: HeaderValue) {
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
    headers.append(header::VARY, HeaderValue::from_static("Origin"));
}

fn preflight(request_headers: &HeaderMap) -> Response<BoxBody> {
    let mut response = Response::new(empty_body());
    *response.status_mut() = StatusCode::NO_CONTENT;

    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    if let Some(requested) = request_headers.get(header::ACCESS_CONTROL_REQUEST_HEADERS) {
        headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, requested.clone());
    }
    response
}

fn redirect(location: &str) -> Response<BoxBody> {
    match HeaderValue::from_str(location) {
        Ok(value) => {
            let mut response = text(StatusCode::FOUND, format!("Found. Redirecting to {}", location));
            response.headers_mut().insert(header::LOCATION, value);
            response
        }
        Err(_) => text(StatusCode::BAD_REQUEST, "Bad Request"),
    }
}

fn text<T: Into<Bytes>>(status: StatusCode, body: T) -> Response<BoxBody> {
    let mut response = Response::new(full_body(body));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}

fn empty_body() -> BoxBody {
    Full::new(Bytes::new())
        .map_err(|never| match never {})
        .boxed()
}

fn full_body<T: Into<Bytes>>(chunk: T) -> BoxBody {
    Full::new(chunk.into())
        .map_err(|never| match never {})
        .boxed()
}

/// Binds the public listener and logs where the catalog is reachable.
pub async fn bind(addr: &str, rpc_path: &str) -> std::io::Result<TcpListener> {
    let listener = TcpListener::bind(addr).await?;
    info!(
        "🚀 Catalog ready at http://{}{}",
        listener.local_addr()?,
        rpc_path
    );
    Ok(listener)
}
