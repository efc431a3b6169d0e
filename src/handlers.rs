// HTTP handlers. The ingestion route is the only one with real work: parse
// the callback body, decode the frame, write one point. Every accepted
// request produces exactly one write attempt and no retries.
use crate::error::IngestError;
use crate::state::AppState;
use crate::uplink::Uplink;
use axum::{body::Bytes, extract::{Extension, Path}, http::{HeaderMap, HeaderValue, header::CONTENT_TYPE}};
use prometheus::{Encoder, Registry, TextEncoder};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub async fn hello_world() -> &'static str {
    "Hello World!"
}

/// `POST /data/{device}/up`
pub async fn ingest(
    Extension(state): Extension<AppState>,
    Path(device): Path<String>,
    body: Bytes,
) -> Result<String, IngestError> {
    state.metrics.uplinks_received.inc();
    debug!(%device, body = %String::from_utf8_lossy(&body), "received uplink");

    let point = match Uplink::from_slice(&body).and_then(|u| u.into_data_point(&device)) {
        Ok(point) => point,
        Err(e) => {
            state.metrics.uplinks_rejected.inc();
            warn!(%device, error = %e, "rejected uplink");
            return Err(e);
        }
    };

    if let Err(e) = state.store.write_point(&point).await {
        state.metrics.write_failures.inc();
        error!(%device, error = %e, "failed to write data point");
        return Err(e.into());
    }
    state.metrics.points_written.inc();
    info!(%device, timestamp_ns = point.timestamp_ns, "wrote data point");

    Ok(format!("Data for device {device} received."))
}

/// Prometheus text exposition of everything in the registry.
pub async fn metrics_handler(Extension(registry): Extension<Arc<Registry>>) -> (HeaderMap, String) {
    let encoder = TextEncoder::new();
    let metric_families = registry.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!(error = %e, "failed to encode metrics");
    }

    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(encoder.format_type()) {
        headers.insert(CONTENT_TYPE, value);
    }
    (headers, String::from_utf8_lossy(&buffer).into_owned())
}
