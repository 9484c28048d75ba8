use crate::cli::ServeArgs;
use crate::infra::{build_service, AppState};
use crate::routes::with_bonus_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use loyalty_bonus::config::AppConfig;
use loyalty_bonus::error::AppError;
use loyalty_bonus::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(rules) = args.rules.take() {
        config.rules.path = rules;
    }
    if let Some(refresh) = args.refresh.take() {
        config.rules.refresh = refresh;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let bonus_service = build_service(&config.rules)?;

    let app = with_bonus_routes(bonus_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "loyalty bonus service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
