use axum::{
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use crate::storage::RiceStore;

pub mod routes;

/// Server state
pub struct AppState {
    pub store: RiceStore,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/rices",
            get(routes::list_rices)
                .post(routes::insert_rice)
                .delete(routes::delete_rices),
        )
        .route(
            "/rices/{id}",
            get(routes::get_rice)
                .put(routes::update_rice)
                .delete(routes::delete_rice),
        )
        .route("/stats", get(routes::get_stats))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve the store until ctrl-c, then close it
pub async fn start_server(port: u16, store: RiceStore) -> anyhow::Result<()> {
    let state = Arc::new(AppState { store });
    let app = router(state.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting server on {}", addr);
    println!("🌍 Server running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down server");
        })
        .await?;

    match Arc::try_unwrap(state) {
        Ok(state) => state.store.close()?,
        Err(_) => tracing::warn!("Store still shared at shutdown; closing on drop"),
    }

    Ok(())
}
