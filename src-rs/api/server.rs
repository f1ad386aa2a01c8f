use std::net::SocketAddr;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tracing::info;

use crate::api::handlers::{
    handle_create_run, handle_feedback, handle_get_run, handle_health, handle_list_runs, require_token, AppState,
};

/// `/health` stays open; the `/runs` routes sit behind the bearer check.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/runs", get(handle_list_runs).post(handle_create_run))
        .route("/runs/:id", get(handle_get_run))
        .route("/runs/:id/feedback", post(handle_feedback))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_token))
        .route("/health", get(handle_health))
        .with_state(state)
}

pub struct ReviewServer {
    pub port: u16,
    pub state: AppState,
}

impl ReviewServer {
    pub fn new(port: u16, state: AppState) -> Self {
        Self { port, state }
    }

    /// Serves until ctrl-c.
    pub async fn start(&self) -> anyhow::Result<()> {
        let app = router(self.state.clone());
        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        info!(%addr, "review server listening");
        axum::Server::bind(&addr)
            .serve(app.into_make_service())
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
            })
            .await?;
        Ok(())
    }
}
