// Copyright 2025 RustFS Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


use axum::{
    Router,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::context::Context;
use crate::webhook::{handlers, state::AppState};

pub const VALIDATE_PATH: &str = "/validate-asdb-aerospike-com-v1-aerospikecluster";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/readyz", get(ready_check))
        .route(VALIDATE_PATH, post(handlers::validate_cluster))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Starts the webhook HTTP server. TLS is terminated in front of it.
pub async fn run(port: u16, ctx: Context) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Starting AerospikeCluster admission webhook on port {}", port);

    let app = router(AppState::new(ctx));

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Webhook listening on http://{}", addr);
    tracing::info!("  - POST {}", VALIDATE_PATH);
    tracing::info!("  - GET  /healthz");

    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

async fn ready_check() -> impl IntoResponse {
    (StatusCode::OK, "Ready")
}
