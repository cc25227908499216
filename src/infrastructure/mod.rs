//! 基础设施层
//!
//! 持有稀缺资源（Page），只暴露能力

mod ui_driver;

#[cfg(test)]
pub mod fake_driver;

pub use ui_driver::{UiActions, UiDriver};
