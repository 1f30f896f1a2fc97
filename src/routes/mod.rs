//! HTTP surfaces of the two services
//!
//! Each binary builds its router here and injects its state explicitly, so
//! handlers never reach for process globals.

pub mod health;
pub mod historico;
pub mod metrics;
pub mod previsao;

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::api::yahoo::YahooClient;
use crate::forecast::ModelArtifacts;

/// Shared context of the historical-price service
#[derive(Clone)]
pub struct BovespaState {
    pub client: Arc<YahooClient>,
}

impl BovespaState {
    pub fn new(client: YahooClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

/// Shared context of the prediction service.
///
/// `artifacts` is `None` when startup loading failed; the process keeps
/// serving in that degraded state and every handler consults the same
/// accessor as its readiness signal.
#[derive(Clone, Default)]
pub struct PrevisaoState {
    artifacts: Option<Arc<ModelArtifacts>>,
}

impl PrevisaoState {
    pub fn new(artifacts: Option<ModelArtifacts>) -> Self {
        Self {
            artifacts: artifacts.map(Arc::new),
        }
    }

    /// Readiness signal: `Some` exactly when predictions can be served.
    pub fn artifacts(&self) -> Option<&Arc<ModelArtifacts>> {
        self.artifacts.as_ref()
    }
}

/// Router of the historical-price service
pub fn bovespa_router(state: BovespaState) -> Router {
    Router::new()
        .route("/historico_acoes", get(historico::obter_historico))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Router of the prediction service
pub fn previsao_router(state: PrevisaoState) -> Router {
    Router::new()
        .route("/prever/", post(previsao::prever))
        .route("/health", get(health::health))
        .route("/metrics", get(metrics::metricas))
        .route_layer(middleware::from_fn(track_metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Observe method, matched path, status and elapsed time for every request.
async fn track_metrics(req: Request, next: Next) -> Response {
    let inicio = Instant::now();
    let method = req.method().to_string();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let response = next.run(req).await;

    crate::metrics::observar_http(
        &method,
        &path,
        response.status().as_u16(),
        inicio.elapsed().as_secs_f64(),
    );

    response
}
