//! 应用编排层
//!
//! 负责资源的获取与释放顺序：
//! 1. 预检（凭据、队列）在获取任何浏览器资源之前完成
//! 2. 浏览器会话为本次运行独占，无论成功失败都保证关闭
//! 3. 流水线错误在关闭会话前折叠为诊断截图 + 类型化结果

use std::path::PathBuf;

use tracing::{error, info, warn};

use crate::browser;
use crate::config::{Config, Credentials};
use crate::error::AppError;
use crate::infrastructure::{UiActions, UiDriver};
use crate::models::RunResult;
use crate::services::{Diagnostics, FileQueueStore, PostRotator};
use crate::utils::logging::{log_startup, truncate_text};
use crate::workflow::PostFlow;

/// 应用主结构
pub struct App {
    config: Config,
    credentials: Credentials,
}

impl App {
    /// 创建应用
    pub fn new(config: Config, credentials: Credentials) -> Self {
        Self {
            config,
            credentials,
        }
    }

    /// 运行一次完整的发帖流程
    ///
    /// 所有失败都折叠进 `RunResult`，不向上抛出
    pub async fn run(self) -> RunResult {
        log_startup(&self.config);

        // 队列轮转在启动浏览器之前完成：队列为空时不获取任何浏览器资源。
        // 轮转先于发布提交，发布失败的帖子要等队列轮满一圈才会再次轮到
        let rotator = PostRotator::new(FileQueueStore::new(&self.config.queue_file));
        let text = match rotator.take_next() {
            Ok(Some(text)) => text,
            Ok(None) => {
                warn!("⚠️ 队列中没有待发布的帖子");
                return RunResult::NoWorkAvailable;
            }
            Err(e) => {
                return RunResult::Failed {
                    error: e,
                    artifact: None,
                }
            }
        };
        info!("📝 即将发布: \"{}\"", truncate_text(&text, 100));

        let (browser, page) = match browser::launch_headless_browser(&self.config).await {
            Ok(pair) => pair,
            Err(e) => {
                return RunResult::Failed {
                    error: e,
                    artifact: None,
                }
            }
        };

        let driver = UiDriver::new(page);
        let flow = PostFlow::new(&self.config);
        let outcome = flow.run(&driver, &self.credentials, &text).await;

        let outcome = match outcome {
            Ok(()) => Ok(()),
            Err(e) => {
                let diagnostics = Diagnostics::new(&self.config.artifacts_dir);
                Err(finalize_failure(&diagnostics, &driver, e).await)
            }
        };

        // 无论成功失败都关闭浏览器，截图失败也不影响关闭
        browser::close_browser(browser).await;

        match outcome {
            Ok(()) => {
                info!("🎯 发布成功!");
                RunResult::Posted(text)
            }
            Err((error, artifact)) => {
                error!("🚨 运行失败: {}", error);
                RunResult::Failed { error, artifact }
            }
        }
    }
}

/// 失败且没有位点专属截图时，关闭会话前兜底保存一张 error-final。
/// 每次失败恰好产生一张截图，位点截图和 error-final 不会同时出现
async fn finalize_failure<D: UiActions>(
    diagnostics: &Diagnostics,
    driver: &D,
    error: AppError,
) -> (AppError, Option<PathBuf>) {
    let artifact = match error.artifact() {
        Some(path) => Some(path.to_path_buf()),
        None => match diagnostics.capture(driver, "error-final").await {
            Ok(path) => Some(path),
            Err(capture_err) => {
                warn!("保存 error-final 截图失败: {}", capture_err);
                None
            }
        },
    };
    (error, artifact)
}
