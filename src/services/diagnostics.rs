//! 诊断截图服务 - 业务能力层
//!
//! 只负责"按失败位点保存整页截图"能力

use std::fs;
use std::path::PathBuf;

use tracing::info;

use crate::error::{AppError, AppResult};
use crate::infrastructure::UiActions;

/// 诊断截图服务
///
/// 职责：
/// - 失败时把整页截图写入输出目录，文件名即失败位点
/// - 目录不存在时按需创建
pub struct Diagnostics {
    dir: PathBuf,
}

impl Diagnostics {
    /// 创建新的诊断截图服务
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// 保存整页截图
    ///
    /// # 参数
    /// - `driver`: 当前 UI 驱动器
    /// - `name`: 失败位点名称（如 blocked-checkpoint / no-editor）
    ///
    /// # 返回
    /// 返回截图文件路径
    pub async fn capture<D: UiActions>(&self, driver: &D, name: &str) -> AppResult<PathBuf> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| AppError::file_write_failed(self.dir.display().to_string(), e))?;

        let file = self.dir.join(format!("{}.png", name));
        driver.screenshot(&file).await?;

        info!(
            "📸 已保存截图: {} ({})",
            file.display(),
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        );
        Ok(file)
    }
}
