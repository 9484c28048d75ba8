use loyalty_bonus::bonus::{BonusEvaluator, BonusService, JsonFileLoader, RuleSetProvider};
use loyalty_bonus::config::RulesConfig;
use loyalty_bonus::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type FileBonusService = BonusService<JsonFileLoader>;

/// Build the bonus service from configuration, loading the rule file once so
/// a broken file or an unregistered rule type stops startup instead of the
/// first request.
pub(crate) fn build_service(config: &RulesConfig) -> Result<Arc<FileBonusService>, AppError> {
    let provider = RuleSetProvider::new(JsonFileLoader::new(&config.path), config.refresh);
    let initial = provider.reload()?;
    let evaluator = BonusEvaluator::default();
    evaluator.check_kinds(&initial)?;

    info!(
        path = %config.path.display(),
        refresh = %config.refresh,
        rules = initial.additional.len(),
        "bonus rules ready"
    );

    let service =
        BonusService::with_evaluator(provider, evaluator).with_load_timeout(config.load_timeout);
    Ok(Arc::new(service))
}
