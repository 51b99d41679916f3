use axum::{
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use learnquest_core::{Ledger, Repository};

use crate::api::routes::{earn_xp, get_gamification, AppState};

pub async fn run(repo: Arc<dyn Repository>, addr: SocketAddr) -> anyhow::Result<()> {
    let state = Arc::new(AppState {
        ledger: Ledger::new(repo),
    });

    let app = Router::new()
        .route("/gamification/earn-xp", post(earn_xp).get(get_gamification))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    tracing::info!("gamification API listening on {addr}");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
