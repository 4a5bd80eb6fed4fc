//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use geo_gateway::auth::{TokenKeys, MIN_PASSWORD_COST};
use geo_gateway::config::{GatewayConfig, TestModeConfig};
use geo_gateway::{HttpServer, Shutdown};

pub const API_KEY: &str = "test-api-key";
pub const SECRET_KEY: &str = "test-secret-key";

/// Start a raw TCP backend that answers every connection with `response`.
#[allow(dead_code)]
pub async fn start_mock_backend(response: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let response_str = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    response.len(),
                    response
                );
                let _ = socket.write_all(response_str.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// Read an HTTP/1 message head, up to and including the blank line.
#[allow(dead_code)]
pub async fn read_head<S: AsyncRead + Unpin>(stream: &mut S) -> String {
    let mut head = Vec::new();
    let mut byte = [0u8; 1];
    while !head.ends_with(b"\r\n\r\n") {
        if stream.read(&mut byte).await.unwrap() == 0 {
            break;
        }
        head.push(byte[0]);
    }
    String::from_utf8_lossy(&head).into_owned()
}

/// Start a raw TCP backend that accepts `Upgrade: websocket` with a 101 and
/// then echoes every byte back. Requests without the handshake get a 400.
#[allow(dead_code)]
pub async fn start_upgrade_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let head = read_head(&mut socket).await.to_ascii_lowercase();
                if !(head.contains("upgrade: websocket") && head.contains("connection: upgrade")) {
                    let _ = socket
                        .write_all(b"HTTP/1.1 400 Bad Request\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
                        .await;
                    return;
                }
                let _ = socket
                    .write_all(b"HTTP/1.1 101 Switching Protocols\r\nConnection: Upgrade\r\nUpgrade: websocket\r\n\r\n")
                    .await;

                let (mut reader, mut writer) = socket.split();
                let _ = tokio::io::copy(&mut reader, &mut writer).await;
            });
        }
    });

    addr
}

/// Start an axum backend that echoes the request line and selected headers
/// back as JSON, with a 201 status and a custom header.
#[allow(dead_code)]
pub async fn start_echo_backend() -> SocketAddr {
    async fn echo(request: Request) -> (StatusCode, [(&'static str, &'static str); 1], Json<Value>) {
        let header = |name: &str| {
            request
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let body = serde_json::json!({
            "method": request.method().as_str(),
            "uri": request.uri().to_string(),
            "host": header("host"),
            "x_forwarded_for": header("x-forwarded-for"),
            "x_custom": header("x-custom"),
            "authorization": header("authorization"),
        });
        (StatusCode::CREATED, [("x-backend", "hugo")], Json(body))
    }

    spawn_router(Router::new().fallback(echo)).await
}

/// A request the upstream fixture received.
#[derive(Debug, Clone)]
pub struct Captured {
    pub path: String,
    pub headers: HeaderMap,
    pub body: Value,
}

#[derive(Clone)]
struct FixtureState {
    status: StatusCode,
    search: Value,
    geocode: Value,
    captured: Arc<Mutex<Vec<Captured>>>,
}

/// Programmable stand-in for both geocoding endpoints.
#[allow(dead_code)]
pub struct UpstreamFixture {
    pub addr: SocketAddr,
    captured: Arc<Mutex<Vec<Captured>>>,
}

#[allow(dead_code)]
impl UpstreamFixture {
    pub async fn start(status: StatusCode, search: Value, geocode: Value) -> Self {
        async fn capture(
            State(state): State<FixtureState>,
            request: Request,
            path: &'static str,
        ) -> (StatusCode, Json<Value>) {
            let (parts, body) = request.into_parts();
            let bytes: Bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();
            state.captured.lock().unwrap().push(Captured {
                path: path.to_string(),
                headers: parts.headers,
                body: serde_json::from_slice(&bytes).unwrap_or(Value::Null),
            });

            let body = if path == "/search" { state.search.clone() } else { state.geocode.clone() };
            (state.status, Json(body))
        }

        let captured = Arc::new(Mutex::new(Vec::new()));
        let state = FixtureState {
            status,
            search,
            geocode,
            captured: captured.clone(),
        };

        let router = Router::new()
            .route(
                "/search",
                post(|state: State<FixtureState>, request: Request| capture(state, request, "/search")),
            )
            .route(
                "/geocode",
                post(|state: State<FixtureState>, request: Request| capture(state, request, "/geocode")),
            )
            .with_state(state);

        let addr = spawn_router(router).await;
        Self { addr, captured }
    }

    pub fn ok(search: Value, geocode: Value) -> impl std::future::Future<Output = Self> {
        Self::start(StatusCode::OK, search, geocode)
    }

    pub fn search_url(&self) -> String {
        format!("http://{}/search", self.addr)
    }

    pub fn geocode_url(&self) -> String {
        format!("http://{}/geocode", self.addr)
    }

    pub fn requests(&self) -> Vec<Captured> {
        self.captured.lock().unwrap().clone()
    }
}

/// Serve `router` on an ephemeral loopback port.
pub async fn spawn_router(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

/// Config pointing at local fixtures, with test mode on and cheap hashing.
pub fn test_config(backend: SocketAddr, upstream: &UpstreamFixture) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.backend.address = format!("http://{}", backend);
    config.auth.jwt_secret = "integration-secret".into();
    config.auth.password_cost = MIN_PASSWORD_COST;
    config.geocoding.api_key = API_KEY.into();
    config.geocoding.secret_key = SECRET_KEY.into();
    config.geocoding.system_proxy = false;
    config.geocoding.test_mode = TestModeConfig {
        enabled: true,
        search_url: Some(upstream.search_url()),
        geocode_url: Some(upstream.geocode_url()),
    };
    config.timeouts.upstream_secs = Some(5);
    config
}

/// A running gateway and the handle that stops it.
#[allow(dead_code)]
pub struct RunningGateway {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub task: JoinHandle<Result<(), std::io::Error>>,
    keys: TokenKeys,
}

#[allow(dead_code)]
impl RunningGateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// A valid `Authorization` value signed with the gateway's secret.
    pub fn bearer(&self, login: &str) -> String {
        format!("Bearer {}", self.keys.issue(login).unwrap())
    }

    pub fn keys(&self) -> &TokenKeys {
        &self.keys
    }
}

pub async fn start_gateway(config: GatewayConfig) -> RunningGateway {
    let keys = TokenKeys::from_config(&config.auth).unwrap();
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(config).unwrap();
    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    let task = tokio::spawn(server.run(listener, rx));

    RunningGateway {
        addr,
        shutdown,
        task,
        keys,
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap()
}
