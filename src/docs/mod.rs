//! API documentation served by the gateway itself.
//!
//! `/docs*` returns the OpenAPI document from disk. `/swagger*` returns a
//! Swagger UI page that loads it, with a timestamp query to defeat caches.

use std::convert::Infallible;
use std::path::{Path, PathBuf};

use axum::{
    body::Body,
    extract::Request,
    response::{Html, IntoResponse, Response},
};
use chrono::Utc;
use tower::ServiceExt;
use tower_http::services::ServeFile;

const VIEWER_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <script src="//unpkg.com/swagger-ui-dist@3/swagger-ui-standalone-preset.js"></script>
    <script src="//unpkg.com/swagger-ui-dist@3/swagger-ui-bundle.js"></script>
    <link rel="stylesheet" href="//unpkg.com/swagger-ui-dist@3/swagger-ui.css" />
    <style>
        body { margin: 0; }
    </style>
    <title>Swagger</title>
</head>
<body>
    <div id="swagger-ui"></div>
    <script>
        window.onload = function() {
            SwaggerUIBundle({
                url: "/docs/swagger.json?__TIMESTAMP__",
                dom_id: '#swagger-ui',
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIStandalonePreset
                ],
                layout: "StandaloneLayout"
            })
        }
    </script>
</body>
</html>
"#;

/// Serves the local documentation assets.
#[derive(Debug, Clone)]
pub struct Docs {
    spec_path: PathBuf,
}

impl Docs {
    pub fn new(spec_path: impl Into<PathBuf>) -> Self {
        Self {
            spec_path: spec_path.into(),
        }
    }

    pub fn spec_path(&self) -> &Path {
        &self.spec_path
    }

    /// Serve the OpenAPI document whatever the sub-path was.
    pub async fn serve_spec(&self, request: Request<Body>) -> Response {
        let result: Result<_, Infallible> = ServeFile::new(&self.spec_path).oneshot(request).await;
        match result {
            Ok(response) => response.map(Body::new),
            Err(never) => match never {},
        }
    }

    pub fn viewer(&self) -> Response {
        Html(render_viewer(Utc::now().timestamp())).into_response()
    }
}

pub fn render_viewer(timestamp: i64) -> String {
    VIEWER_TEMPLATE.replace("__TIMESTAMP__", &timestamp.to_string())
}
