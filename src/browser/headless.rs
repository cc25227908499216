use std::path::Path;

use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, BrowserError};

/// 启动无头浏览器并创建空白页面
pub async fn launch_headless_browser(config: &Config) -> AppResult<(Browser, Page)> {
    info!("🚀 启动无头浏览器...");
    debug!("无头模式: {}, 浏览器路径: {:?}", config.headless, config.chrome_path);

    // 配置浏览器
    let mut builder = BrowserConfig::builder().args(vec![
        "--no-sandbox",            // 禁用沙盒，防止权限问题导致的崩溃
        "--disable-gpu",           // 无头模式禁用 GPU
        "--disable-dev-shm-usage", // 防止共享内存不足
    ]);
    builder = if config.headless {
        builder.new_headless_mode()
    } else {
        builder.with_head()
    };
    if let Some(path) = &config.chrome_path {
        builder = builder.chrome_executable(Path::new(path));
    }
    let browser_config = builder.build().map_err(|e| {
        error!("配置无头浏览器失败: {}", e);
        AppError::Browser(BrowserError::ConfigurationFailed { source: e.into() })
    })?;

    // 启动浏览器
    let (browser, mut handler) = Browser::launch(browser_config).await.map_err(|e| {
        error!("启动无头浏览器失败: {}", e);
        AppError::browser_launch_failed(e)
    })?;
    debug!("无头浏览器启动成功");

    // 在后台处理浏览器事件
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 添加短暂延迟以等待浏览器状态同步
    sleep(tokio::time::Duration::from_millis(300)).await;

    // 创建空白页面
    let page = browser.new_page("about:blank").await.map_err(|e| {
        error!("创建页面失败: {}", e);
        AppError::Browser(BrowserError::PageCreationFailed {
            source: Box::new(e),
        })
    })?;
    debug!("页面创建成功");

    Ok((browser, page))
}

/// 关闭浏览器
///
/// 每次运行结束都必须调用，无论成功或失败；关闭失败只记日志，不再向上传播
pub async fn close_browser(mut browser: Browser) {
    if let Err(e) = browser.close().await {
        warn!("关闭浏览器失败: {}", e);
    }
    if let Err(e) = browser.wait().await {
        warn!("等待浏览器进程退出失败: {}", e);
    }
    debug!("浏览器已关闭");
}
