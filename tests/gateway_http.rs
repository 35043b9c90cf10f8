use bytes::Bytes;
use catalog_rpc::{
    config::DEFAULT_ALLOWED_ORIGINS,
    gateway::{self, GatewayState},
    rpc,
    services::ProductService,
};
use http_body_util::{BodyExt, Full};
use hyper::{header, Method, Request, Response, StatusCode};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use jsonrpsee::server::ServerHandle;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_test::assert_ok;

struct TestGateway {
    addr: SocketAddr,
    client: Client<HttpConnector, Full<Bytes>>,
    _rpc: ServerHandle,
}

impl TestGateway {
    async fn start() -> Self {
        let service = assert_ok!(ProductService::new());
        let (rpc_addr, rpc_handle) = assert_ok!(rpc::start(service, "127.0.0.1:0").await);

        let listener = assert_ok!(TcpListener::bind("127.0.0.1:0").await);
        let addr = assert_ok!(listener.local_addr());
        let state = Arc::new(GatewayState::new(
            DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
            "/graphql".to_string(),
            rpc_addr,
        ));
        tokio::spawn(gateway::serve(listener, state));

        Self {
            addr,
            client: Client::builder(TokioExecutor::new()).build_http(),
            _rpc: rpc_handle,
        }
    }

    async fn send(&self, builder: hyper::http::request::Builder, body: &str) -> (Response<()>, String) {
        let request = builder
            .body(Full::new(Bytes::from(body.to_string())))
            .expect("valid request");
        let response = assert_ok!(self.client.request(request).await);
        let (parts, body) = response.into_parts();
        let bytes = assert_ok!(body.collect().await).to_bytes();
        let text = String::from_utf8(bytes.to_vec()).expect("utf-8 body");
        (Response::from_parts(parts, ()), text)
    }

    fn request(&self, method: Method, path: &str) -> hyper::http::request::Builder {
        Request::builder()
            .method(method)
            .uri(format!("http://{}{}", self.addr, path))
    }
}

#[tokio::test]
async fn liveness_check_answers_ok_over_plain_http() {
    let gateway = TestGateway::start().await;
    let (response, body) = gateway.send(gateway.request(Method::GET, "/"), "").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn allowed_origin_gets_cors_headers() {
    let gateway = TestGateway::start().await;
    let (response, _) = gateway
        .send(
            gateway
                .request(Method::GET, "/")
                .header(header::ORIGIN, "http://localhost:3000"),
            "",
        )
        .await;

    let headers = response.headers();
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).map(|v| v.as_bytes()),
        Some(&b"http://localhost:3000"[..])
    );
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).map(|v| v.as_bytes()),
        Some(&b"true"[..])
    );
}

#[tokio::test]
async fn unknown_origin_gets_no_cors_headers() {
    let gateway = TestGateway::start().await;
    let (response, _) = gateway
        .send(
            gateway
                .request(Method::GET, "/")
                .header(header::ORIGIN, "http://evil.com"),
            "",
        )
        .await;

    assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}

#[tokio::test]
async fn preflight_from_allowed_origin() {
    let gateway = TestGateway::start().await;
    let (response, _) = gateway
        .send(
            gateway
                .request(Method::OPTIONS, "/graphql")
                .header(header::ORIGIN, "https://studio.apollographql.com")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type"),
            "",
        )
        .await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let headers = response.headers();
    assert!(headers.get(header::ACCESS_CONTROL_ALLOW_METHODS).is_some());
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).map(|v| v.as_bytes()),
        Some(&b"https://studio.apollographql.com"[..])
    );
}

#[tokio::test]
async fn unknown_path_redirects_to_https_unless_forwarded_over_tls() {
    let gateway = TestGateway::start().await;

    let (response, _) = gateway
        .send(
            gateway
                .request(Method::GET, "/catalog?page=2")
                .header(header::HOST, "shop.example.com"),
            "",
        )
        .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers().get(header::LOCATION).map(|v| v.as_bytes()),
        Some(&b"https://shop.example.com/catalog?page=2"[..])
    );

    let (response, _) = gateway
        .send(
            gateway
                .request(Method::GET, "/catalog")
                .header(header::HOST, "shop.example.com")
                .header("x-forwarded-proto", "https"),
            "",
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn rpc_path_is_proxied_to_the_catalog() {
    let gateway = TestGateway::start().await;
    let (response, body) = gateway
        .send(
            gateway
                .request(Method::POST, "/graphql")
                .header(header::CONTENT_TYPE, "application/json"),
            r#"{"jsonrpc":"2.0","id":1,"method":"product","params":[1]}"#,
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let value: serde_json::Value = assert_ok!(serde_json::from_str(&body));
    assert_eq!(value["result"]["id"], 1);
    assert_eq!(value["result"]["title"], "iPhone 9");
    assert_eq!(
        value["result"]["historicalPrices"].as_array().map(Vec::len),
        Some(30)
    );
}
