//! Proxy Server
//!
//! Two stateless proxy endpoints in front of the upstream APIs:
//!
//! - `GET /proxy/metadata?id=<mint>` -> `{"image", "marketCap"}`
//! - `GET /proxy/all-time-high?id=<mint>` -> upstream payload verbatim
//!
//! Missing or malformed id is a 400, any upstream failure a 502 with a
//! generic body.
//! The Solana Tracker key stays on this side of the proxy.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::domain::is_mint_address;
use crate::ports::{GatewayPort, MetadataQuote};
use super::error::GatewayError;

#[derive(Clone)]
pub struct GatewayState {
    upstream: Arc<dyn GatewayPort>,
}

impl GatewayState {
    pub fn new(upstream: Arc<dyn GatewayPort>) -> Self {
        Self { upstream }
    }

    pub fn upstream(&self) -> &dyn GatewayPort {
        self.upstream.as_ref()
    }
}

/// `?id=` (or the legacy `?mint=`)
#[derive(Debug, Deserialize)]
pub struct MintParams {
    #[serde(alias = "mint")]
    pub id: Option<String>,
}

impl MintParams {
    fn required(&self) -> Result<&str, GatewayError> {
        let id = self
            .id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(GatewayError::MissingIdentifier)?;
        if !is_mint_address(id) {
            return Err(GatewayError::InvalidIdentifier);
        }
        Ok(id)
    }
}

pub async fn metadata(
    State(state): State<Arc<GatewayState>>,
    Query(params): Query<MintParams>,
) -> Result<Json<MetadataQuote>, GatewayError> {
    let mint = params.required()?;

    let quote = state.upstream().coin_metadata(mint).await.map_err(|e| {
        tracing::error!("Error fetching pump.fun data for {}: {}", mint, e);
        GatewayError::Upstream(e)
    })?;

    Ok(Json(MetadataQuote {
        image: quote.image,
        market_cap: quote.market_cap,
        description: None,
    }))
}

pub async fn all_time_high(
    State(state): State<Arc<GatewayState>>,
    Query(params): Query<MintParams>,
) -> Result<Json<serde_json::Value>, GatewayError> {
    let mint = params.required()?;

    let payload = state.upstream().all_time_high(mint).await.map_err(|e| {
        tracing::error!("Error fetching Solana Tracker data for {}: {}", mint, e);
        GatewayError::Upstream(e)
    })?;

    Ok(Json(payload))
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

pub fn router(state: Arc<GatewayState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/proxy/metadata", get(metadata))
        .route("/proxy/all-time-high", get(all_time_high))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until Ctrl+C
pub async fn serve(bind: SocketAddr, state: Arc<GatewayState>) -> std::io::Result<()> {
    let listener = TcpListener::bind(bind).await?;
    tracing::info!("Gateway listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("Shutdown signal received");
        })
        .await
}
