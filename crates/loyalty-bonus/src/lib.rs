//! Loyalty bonus engine: rule model, loader contract, and the ordered evaluator.

pub mod bonus;
pub mod config;
pub mod error;
pub mod telemetry;
