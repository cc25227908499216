//! # Auto Post Submit
//!
//! 一个通过页面 UI 自动发布帖子的 Rust 应用程序
//!
//! 目标站点的按钮文案、ARIA 标签和 DOM 结构会随账号状态、语言和灰度实验漂移，
//! 因此核心是一个多策略级联的 UI 交互引擎：登录会话、定位移动靶一样的发帖入口、
//! 提交帖子，并在 UI 漂移时带着诊断截图安全失败。
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露能力
//! - `UiActions` - UI 交互能力 trait，上层只依赖它，不接触 Page
//! - `UiDriver` - 唯一的 page owner，`UiActions` 的真实实现
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，互不感知
//! - `PostRotator` - 队列轮转能力（取队首、追加队尾、整体回写）
//! - `Authenticator` - 登录与检查点识别能力
//! - `ComposerLocator` - 发帖入口策略级联能力
//! - `PostSubmitter` - 输入与发布能力
//! - `Diagnostics` - 失败截图能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一条帖子"的完整发布流程
//! - `PostFlow` - 流程编排（登录 → 定位编辑器 → 发布），失败位点截图
//!
//! ### ④ 编排层（App）
//! - `app.rs` - 预检、浏览器资源的独占获取与保证释放、终态折叠
//!
//! ## 模块结构

pub mod app;
pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::App;
pub use browser::{close_browser, launch_headless_browser};
pub use config::{Config, Credentials};
pub use error::{AppError, AppResult};
pub use infrastructure::{UiActions, UiDriver};
pub use models::{InteractionStrategy, Locator, RunResult, StrategyCascade};
pub use services::{
    Authenticator, ComposerLocator, Diagnostics, FileQueueStore, PostRotator, PostSubmitter,
    QueueStore,
};
pub use workflow::PostFlow;
