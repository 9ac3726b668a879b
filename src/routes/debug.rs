use crate::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

/// GET /debug/health - Check if services are working
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    let mut status = json!({
        "status": "ok",
        "checks": {}
    });

    // Catalog
    match state.repo.count().await {
        Ok(count) => {
            status["checks"]["artwork_count"] = json!(count);
        }
        Err(e) => {
            status["checks"]["artwork_count"] = json!({"error": e.to_string()});
            status["status"] = json!("error");
        }
    }

    // Draft store
    let store = state.drafts.store();
    if store.health_check().await {
        let stats = store.get_stats().await;
        status["checks"]["draft_store"] = json!({
            "backend": store.backend_name(),
            "hit_rate": stats.hit_rate,
            "connected": stats.connected,
        });
    } else {
        status["checks"]["draft_store"] = json!({
            "backend": store.backend_name(),
            "error": "unreachable",
        });
        status["status"] = json!("degraded");
    }

    Json(status)
}
