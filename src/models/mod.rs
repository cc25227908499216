//! 数据模型

pub mod run_result;
pub mod strategy;

pub use run_result::RunResult;
pub use strategy::{InteractionStrategy, Locator, StrategyCascade};
