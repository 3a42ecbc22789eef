//! Axum-based HTTP server.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use voxtube_core::config::TlsConfig;
use voxtube_skill::{SkillRequest, SkillResponse};

use crate::state::GatewayState;

/// Build the gateway router.
pub fn router(state: Arc<GatewayState>) -> Router {
    let app = Router::new()
        .route("/skill", post(skill_handler))
        .route("/health", get(health_handler));

    #[cfg(feature = "metrics")]
    let app = app.route("/metrics", get(metrics_handler));

    app.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Start the gateway and serve until Ctrl-C.
///
/// Serves HTTPS when `gateway.tls` is configured; that requires the `tls`
/// feature.
pub async fn start_gateway(state: Arc<GatewayState>, port: u16) -> anyhow::Result<()> {
    let bind_addr = state.config.gateway_bind();
    let tls = state.config.gateway.as_ref().and_then(|g| g.tls.clone());
    let addr = format!("{bind_addr}:{port}");
    let app = router(state);

    if let Some(tls) = tls {
        return serve_tls(app, &addr, &tls).await;
    }

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Gateway listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

#[cfg(feature = "tls")]
async fn serve_tls(app: Router, addr: &str, tls: &TlsConfig) -> anyhow::Result<()> {
    let rustls = axum_server::tls_rustls::RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path)
        .await?;
    let addr: std::net::SocketAddr = addr.parse()?;

    let handle = axum_server::Handle::new();
    let shutdown = handle.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown.graceful_shutdown(Some(std::time::Duration::from_secs(10)));
    });

    info!("Gateway listening on https://{addr}");
    axum_server::bind_rustls(addr, rustls)
        .handle(handle)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}

#[cfg(not(feature = "tls"))]
async fn serve_tls(_app: Router, _addr: &str, tls: &TlsConfig) -> anyhow::Result<()> {
    anyhow::bail!(
        "gateway.tls is configured ({}) but voxtube-gateway was built without the `tls` feature",
        tls.cert_path
    )
}

async fn skill_handler(
    State(state): State<Arc<GatewayState>>,
    payload: Result<Json<SkillRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Rejected skill request");
            #[cfg(feature = "metrics")]
            crate::metrics::record_rejected();
            return (
                rejection.status(),
                Json(json!({ "error": rejection.body_text() })),
            )
                .into_response();
        }
    };

    let started = Instant::now();
    let action = request.action().label();
    let reply = state.skill.handle(&request).await;
    let elapsed = started.elapsed();
    debug!(action, elapsed_ms = elapsed.as_millis() as u64, "Handled skill request");

    #[cfg(feature = "metrics")]
    {
        crate::metrics::record_request(action, elapsed.as_secs_f64());
        if reply.end_session {
            crate::metrics::record_session_end(action);
        }
    }

    Json(SkillResponse::from(&reply)).into_response()
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(feature = "metrics")]
async fn metrics_handler(State(state): State<Arc<GatewayState>>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => axum::http::StatusCode::NOT_FOUND.into_response(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
