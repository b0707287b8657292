// rest/mod.rs — Public REST API server.
//
// Axum HTTP server bridging HTTP calls to the task store. Local only by
// default (127.0.0.1); CORS is permissive so local front-ends can talk to it.
//
// Endpoints:
//   GET    /
//   GET    /api/v1/health
//   GET    /api/v1/tasks
//   POST   /api/v1/tasks
//   GET    /api/v1/tasks/{id}
//   PATCH  /api/v1/tasks/{id}
//   PATCH  /api/v1/tasks/{id}/toggle
//   DELETE /api/v1/tasks/{id}
//   GET    /api/v1/stats

pub mod routes;

use anyhow::Result;
use axum::{
    routing::{get, patch},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::AppContext;

pub async fn start_rest_server(ctx: Arc<AppContext>) -> Result<()> {
    let bind = format!("{}:{}", ctx.config.bind_address, ctx.config.port);
    let addr: SocketAddr = bind.parse()?;

    let router = build_router(ctx);

    info!("REST API listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

pub fn build_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        // Welcome + endpoint index
        .route("/", get(routes::root::index))
        // Health
        .route("/api/v1/health", get(routes::health::health))
        // Tasks
        .route(
            "/api/v1/tasks",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/api/v1/tasks/{id}",
            get(routes::tasks::get_task)
                .patch(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .route("/api/v1/tasks/{id}/toggle", patch(routes::tasks::toggle_task))
        // Stats
        .route("/api/v1/stats", get(routes::tasks::get_stats))
        .layer(CorsLayer::permissive())
        .with_state(ctx)
}
