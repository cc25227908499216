//! 发帖流程 - 流程层
//!
//! 核心职责：定义"一条帖子"的完整发布流程
//!
//! 流程顺序：
//! 1. 登录（或复用已有会话）
//! 2. 定位并打开发帖编辑器（策略级联）
//! 3. 输入文本并点击发布
//!
//! 任一环节失败即中止，按失败位点保存诊断截图后向上传播类型化错误

use tracing::warn;

use crate::config::{Config, Credentials};
use crate::error::{AppError, AppResult, AuthError, UiError};
use crate::infrastructure::UiActions;
use crate::services::{Authenticator, ComposerLocator, Diagnostics, PostSubmitter};

/// 发帖流程
///
/// - 编排完整的发布流程
/// - 不持有任何资源（page）
/// - 只依赖业务能力（services）
pub struct PostFlow {
    authenticator: Authenticator,
    composer: ComposerLocator,
    submitter: PostSubmitter,
    diagnostics: Diagnostics,
}

impl PostFlow {
    /// 创建新的发帖流程
    pub fn new(config: &Config) -> Self {
        Self {
            authenticator: Authenticator::new(config),
            composer: ComposerLocator::new(config),
            submitter: PostSubmitter::new(config),
            diagnostics: Diagnostics::new(&config.artifacts_dir),
        }
    }

    /// 执行一次完整的发布流程
    pub async fn run<D: UiActions>(
        &self,
        driver: &D,
        credentials: &Credentials,
        text: &str,
    ) -> AppResult<()> {
        if let Err(e) = self.authenticator.login(driver, credentials).await {
            return Err(self.capture_at_failure_site(driver, e).await);
        }

        let editor = match self.composer.open(driver).await {
            Ok(editor) => editor,
            Err(e) => return Err(self.capture_at_failure_site(driver, e).await),
        };

        if let Err(e) = self.submitter.submit(driver, editor, text).await {
            return Err(self.capture_at_failure_site(driver, e).await);
        }

        Ok(())
    }

    /// 按失败位点保存诊断截图，并把路径附加到错误上
    ///
    /// 截图本身失败只记日志，原始错误必须原样向上传播
    async fn capture_at_failure_site<D: UiActions>(&self, driver: &D, error: AppError) -> AppError {
        let label = match &error {
            AppError::Auth(AuthError::Challenge { .. }) => "blocked-checkpoint",
            AppError::Ui(UiError::EditorNotFound { .. }) => "no-editor",
            AppError::Ui(UiError::SubmitButtonNotFound { .. }) => "no-post-button",
            // 其他错误没有专属位点，由顶层统一保存 error-final
            _ => return error,
        };

        match self.diagnostics.capture(driver, label).await {
            Ok(path) => error.with_artifact(path),
            Err(capture_err) => {
                warn!("保存诊断截图失败 ({}): {}", label, capture_err);
                error
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use super::*;
    use crate::infrastructure::fake_driver::FakeDriver;

    fn test_config(tag: &str) -> Config {
        let dir = std::env::temp_dir().join(format!(
            "auto_post_submit_flow_{}_{}",
            tag,
            std::process::id()
        ));
        Config {
            artifacts_dir: dir.display().to_string(),
            ..Config::default()
        }
    }

    fn credentials() -> Credentials {
        Credentials::new("bot@example.com", "secret")
    }

    fn screenshots(calls: &[String]) -> Vec<&String> {
        calls
            .iter()
            .filter(|c| c.starts_with("screenshot:"))
            .collect()
    }

    // 检查点是终态：恰好一张 blocked-checkpoint 截图，之后不碰发帖页
    #[tokio::test]
    async fn test_challenge_halts_with_single_artifact() {
        let config = test_config("challenge");
        let flow = PostFlow::new(&config);
        let driver = FakeDriver::new();
        // 登录页直接被重定向进检查点
        driver.push_url("https://www.linkedin.com/checkpoint/challenge/abc");

        let err = flow
            .run(&driver, &credentials(), "你好")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Auth(AuthError::Challenge { .. })));
        assert!(err
            .artifact()
            .unwrap()
            .ends_with(PathBuf::from("blocked-checkpoint.png")));

        let calls = driver.calls();
        assert_eq!(screenshots(&calls).len(), 1);
        assert!(screenshots(&calls)[0].contains("blocked-checkpoint"));
        // 只进过登录页，发帖页和输入都没有发生
        assert_eq!(calls.iter().filter(|c| c.starts_with("goto:")).count(), 1);
        assert!(!calls.iter().any(|c| c.starts_with("type:")));

        let _ = fs::remove_dir_all(&config.artifacts_dir);
    }

    // 会话有效 + 编辑器和发布按钮都在位：完整流程走通，零截图
    #[tokio::test]
    async fn test_successful_flow_types_and_posts() {
        let config = test_config("success");
        let flow = PostFlow::new(&config);
        let driver = FakeDriver::new();
        driver.push_url("https://www.linkedin.com/feed/");
        driver.add_selector(r#"div[role="textbox"]"#);
        driver.add_pattern("start a post|create a post|^post$");
        driver.add_pattern("^post$");

        flow.run(&driver, &credentials(), "hello world")
            .await
            .unwrap();

        let calls = driver.calls();
        assert!(calls
            .iter()
            .any(|c| c.as_str() == r#"type:div[role="textbox"]:hello world"#));
        assert!(screenshots(&calls).is_empty());

        let _ = fs::remove_dir_all(&config.artifacts_dir);
    }

    // 编辑器候选全部落空：URL 兜底也试过之后，恰好一张 no-editor 截图
    #[tokio::test]
    async fn test_editor_exhaustion_captures_no_editor() {
        let config = test_config("no_editor");
        let flow = PostFlow::new(&config);
        let driver = FakeDriver::new();
        driver.push_url("https://www.linkedin.com/feed/");

        let err = flow
            .run(&driver, &credentials(), "你好")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Ui(UiError::EditorNotFound { .. })));
        assert!(err
            .artifact()
            .unwrap()
            .ends_with(PathBuf::from("no-editor.png")));

        let calls = driver.calls();
        assert_eq!(screenshots(&calls).len(), 1);
        // 登录页 + 发帖页 + URL 兜底重载
        assert_eq!(calls.iter().filter(|c| c.starts_with("goto:")).count(), 3);

        let _ = fs::remove_dir_all(&config.artifacts_dir);
    }
}
