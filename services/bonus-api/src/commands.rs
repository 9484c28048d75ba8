use crate::infra::build_service;
use clap::Args;
use loyalty_bonus::bonus::{
    BonusEvaluator, BonusRequest, JsonFileLoader, RefreshPolicy, RuleSetLoader,
};
use loyalty_bonus::config::AppConfig;
use loyalty_bonus::error::AppError;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Rule file to evaluate against (defaults to BONUS_RULES_PATH)
    #[arg(long)]
    pub(crate) rules: Option<PathBuf>,
    /// Transaction amount
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) amount: f64,
    /// ISO-8601 purchase timestamp, e.g. 2024-01-06T10:00:00Z
    #[arg(long)]
    pub(crate) timestamp: String,
    /// Customer status; only "vip" activates VIP rules
    #[arg(long, default_value = "normal")]
    pub(crate) status: String,
}

#[derive(Args, Debug)]
pub(crate) struct CheckRulesArgs {
    /// Rule file to validate (defaults to BONUS_RULES_PATH)
    #[arg(long)]
    pub(crate) rules: Option<PathBuf>,
}

pub(crate) async fn evaluate_once(args: EvaluateArgs) -> Result<(), AppError> {
    let EvaluateArgs {
        rules,
        amount,
        timestamp,
        status,
    } = args;

    let mut config = AppConfig::load()?;
    if let Some(path) = rules {
        config.rules.path = path;
    }
    config.rules.refresh = RefreshPolicy::Startup;

    let service = build_service(&config.rules)?;
    let result = service
        .calculate(&BonusRequest {
            transaction_amount: amount,
            timestamp,
            customer_status: status,
        })
        .await?;

    println!("{}", render_json(&result));
    Ok(())
}

pub(crate) fn check_rules(args: CheckRulesArgs) -> Result<(), AppError> {
    let path = match args.rules {
        Some(path) => path,
        None => AppConfig::load()?.rules.path,
    };

    let loader = JsonFileLoader::new(&path);
    let rules = loader.load()?;

    println!("Rule file: {}", path.display());
    println!(
        "Base rate: {} bonus per {} spent",
        rules.base.bonus, rules.base.per_dollars
    );

    let ordered = rules.ordered_rules();
    if ordered.is_empty() {
        println!("No conditional rules configured.");
    } else {
        println!("Evaluation order:");
    }
    for (index, rule) in ordered.iter().enumerate() {
        println!(
            "  {}. [{}] {} (type: {}, x{})",
            index + 1,
            rule.order,
            rule.name,
            rule.kind,
            rule.multiplier
        );
    }

    BonusEvaluator::default().check_kinds(&rules)?;
    Ok(())
}

fn render_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|err| format!("{{\"error\":\"{err}\"}}"))
}
