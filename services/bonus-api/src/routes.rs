use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use loyalty_bonus::bonus::{bonus_router, BonusService, RuleSetLoader};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_bonus_routes<L>(service: Arc<BonusService<L>>) -> axum::Router
where
    L: RuleSetLoader + 'static,
{
    bonus_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use loyalty_bonus::bonus::{
        BaseRate, ConditionalRule, InMemoryLoader, RefreshPolicy, RuleSet, RuleSetProvider,
    };
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::Value;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn service() -> Arc<BonusService<InMemoryLoader>> {
        let rules = RuleSet {
            base: BaseRate {
                per_dollars: 10.0,
                bonus: 1.0,
            },
            additional: vec![ConditionalRule {
                name: "Weekend x2".to_string(),
                kind: "weekend".to_string(),
                multiplier: 2.0,
                order: 1,
            }],
        };
        Arc::new(BonusService::new(RuleSetProvider::new(
            InMemoryLoader::new(rules),
            RefreshPolicy::PerEvaluation,
        )))
    }

    fn app_state(ready: bool) -> AppState {
        let recorder = PrometheusBuilder::new().build_recorder();
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(recorder.handle()),
        }
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        serde_json::from_slice(&body).expect("json")
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn readiness_tracks_flag() {
        let pending = readiness_endpoint(Extension(app_state(false)))
            .await
            .into_response();
        assert_eq!(pending.status(), StatusCode::SERVICE_UNAVAILABLE);

        let ready = readiness_endpoint(Extension(app_state(true)))
            .await
            .into_response();
        assert_eq!(ready.status(), StatusCode::OK);
        assert_eq!(json_body(ready).await, json!({ "status": "ready" }));
    }

    #[tokio::test]
    async fn combined_router_serves_bonus_and_health() {
        let router = with_bonus_routes(service()).layer(Extension(app_state(true)));

        let health = router
            .clone()
            .oneshot(
                Request::get("/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        assert_eq!(health.status(), StatusCode::OK);

        let bonus = router
            .oneshot(
                Request::post("/calculate-bonus")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({
                            "transaction_amount": 105,
                            "timestamp": "2024-01-07T09:00:00Z",
                            "customer_status": "normal"
                        })
                        .to_string(),
                    ))
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        assert_eq!(bonus.status(), StatusCode::OK);
        let payload = json_body(bonus).await;
        assert_eq!(payload["total bonus"], json!(20));
    }
}
