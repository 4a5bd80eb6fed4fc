//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router around the single dispatch handler
//! - Wire up middleware (tracing, request ID, optional timeout)
//! - Classify each request once and hand it to docs, API or backend
//! - Serve until the shutdown signal, then drain

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{Request, State},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceExt;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::GatewayConfig;
use crate::docs::Docs;
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::lifecycle::shutdown;
use crate::lifecycle::startup::{self, StartupError};
use crate::observability::metrics;
use crate::proxy::Forwarder;
use crate::routing::{Classifier, RouteClass};

/// State of the entry handler.
#[derive(Clone)]
pub struct Dispatcher {
    classifier: Arc<Classifier>,
    api: Router,
    forwarder: Forwarder,
    docs: Docs,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Build every component from `config`. Fails if any of them cannot be built.
    pub fn new(config: GatewayConfig) -> Result<Self, StartupError> {
        let components = startup::build(&config)?;

        let dispatcher = Dispatcher {
            classifier: Arc::new(Classifier::default()),
            api: crate::api::router(components.api),
            forwarder: components.forwarder,
            docs: components.docs,
        };

        let router = Self::build_router(&config, dispatcher);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GatewayConfig, dispatcher: Dispatcher) -> Router {
        let mut router = Router::new()
            .route("/", any(dispatch))
            .route("/{*path}", any(dispatch))
            .with_state(dispatcher);

        if let Some(secs) = config.timeouts.request_secs {
            router = router.layer(TimeoutLayer::new(Duration::from_secs(secs)));
        }

        router
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// The fully layered router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown::wait(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Entry handler. Every request lands here exactly once.
async fn dispatch(State(dispatcher): State<Dispatcher>, mut request: Request<Body>) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let class = dispatcher.classifier.classify(&method, request.uri().path());
    request.extensions_mut().insert(class);

    tracing::debug!(
        request_id = %request_id(request.headers()),
        method = %method,
        path = %request.uri().path(),
        route = %class,
        "Dispatching request"
    );

    let response = match class {
        RouteClass::DocsAsset => dispatcher.docs.serve_spec(request).await,
        RouteClass::DocsViewer => dispatcher.docs.viewer(),
        RouteClass::InternalApi => match dispatcher.api.oneshot(request).await {
            Ok(response) => response,
            Err(never) => match never {},
        },
        RouteClass::BackendPassthrough => dispatcher.forwarder.forward(request).await.into_response(),
    };

    metrics::record_request(&method, response.status().as_u16(), class.as_str(), start);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, StatusCode};

    fn server() -> HttpServer {
        let mut config = GatewayConfig::default();
        config.backend.address = "http://127.0.0.1:9".into();
        config.docs.spec_path = "/nonexistent/swagger.json".into();
        HttpServer::new(config).unwrap()
    }

    #[tokio::test]
    async fn every_response_carries_request_id() {
        let response = server()
            .router()
            .oneshot(Request::builder().uri("/api/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn swagger_renders_viewer() {
        let response = server()
            .router()
            .oneshot(Request::builder().uri("/swagger/index.html").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/html"));
    }

    #[tokio::test]
    async fn docs_never_reach_backend_or_api() {
        // Backend is unreachable, so a forward would be 502; the API would be 404 JSON.
        let response = server()
            .router()
            .oneshot(Request::builder().uri("/docs/api/whatever").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn unknown_path_goes_to_backend() {
        let response = server()
            .router()
            .oneshot(Request::builder().uri("/anything-else").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
