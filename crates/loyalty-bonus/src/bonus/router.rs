use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use tracing::{error, warn};

use super::evaluator::BonusResult;
use super::loader::RuleSetLoader;
use super::service::{BonusRequest, BonusService};
use crate::error::AppError;

/// Router exposing the bonus calculation endpoint.
pub fn bonus_router<L>(service: Arc<BonusService<L>>) -> Router
where
    L: RuleSetLoader + 'static,
{
    Router::new()
        .route("/calculate-bonus", post(calculate_handler::<L>))
        .with_state(service)
}

/// Status codes come from `AppError`'s `IntoResponse`.
pub(crate) async fn calculate_handler<L>(
    State(service): State<Arc<BonusService<L>>>,
    Json(request): Json<BonusRequest>,
) -> Result<Json<BonusResult>, AppError>
where
    L: RuleSetLoader + 'static,
{
    service.calculate(&request).await.map(Json).map_err(|err| {
        if err.is_client_error() {
            warn!(error = %err, "rejected bonus request");
        } else {
            error!(error = %err, "bonus rules unavailable");
        }
        AppError::from(err)
    })
}
