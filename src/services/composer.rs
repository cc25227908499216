//! 发帖入口定位服务 - 业务能力层（核心）
//!
//! 发帖入口的标记不稳定，按三个阶段处理：
//! - 阶段 A: 尽力关闭弹层（Cookie 同意等），没有可关的不算错
//! - 阶段 B: 按优先级级联定位并激活发帖触发器，首个成功者胜出
//! - 阶段 C: 轮询编辑器候选选择器，各自带等待窗口，首个出现者聚焦

use tracing::{debug, info};

use crate::config::Config;
use crate::error::{AppError, AppResult, UiError};
use crate::infrastructure::UiActions;
use crate::models::strategy::{InteractionStrategy, Locator, StrategyCascade};

/// 发帖触发器的可访问名称模式
///
/// 裸词 "post" 必须整词锚定，否则 "Repost" 这类按钮也会被点到
const TRIGGER_NAME_PATTERN: &str = "start a post|create a post|^post$";

/// 弹层关闭按钮的文案候选
const DISMISS_LABELS: [&str; 3] = ["Accept", "I agree", "Got it"];

/// 编辑器候选选择器，按出现概率排序
const EDITOR_CANDIDATES: [&str; 3] = [
    r#"div[role="textbox"]"#,
    r#"[contenteditable="true"][role="textbox"]"#,
    r#"div[contenteditable="true"]"#,
];

/// 发帖入口定位服务
pub struct ComposerLocator {
    composer_url: String,
    trigger_cascade: StrategyCascade,
    nav_timeout_secs: u64,
    editor_wait_secs: u64,
    settle_after_nav_ms: u64,
    settle_after_dismiss_ms: u64,
    settle_after_fallback_ms: u64,
}

impl ComposerLocator {
    /// 创建新的发帖入口定位服务
    pub fn new(config: &Config) -> Self {
        Self {
            composer_url: config.composer_url.clone(),
            trigger_cascade: Self::build_trigger_cascade(),
            nav_timeout_secs: config.nav_timeout_secs,
            editor_wait_secs: config.editor_wait_secs,
            settle_after_nav_ms: config.settle_after_nav_ms,
            settle_after_dismiss_ms: config.settle_after_dismiss_ms,
            settle_after_fallback_ms: config.settle_after_fallback_ms,
        }
    }

    /// 发帖触发器级联：角色匹配最抗改版，排在最前；结构匹配按已知变体排序
    fn build_trigger_cascade() -> StrategyCascade {
        StrategyCascade::new(vec![
            InteractionStrategy::role("可访问角色+名称匹配", TRIGGER_NAME_PATTERN),
            InteractionStrategy::css(
                "aria-label 前缀匹配",
                r#"button[aria-label^="Start a post"]"#,
            ),
            InteractionStrategy::css(
                "aria-label 包含匹配",
                r#"button[aria-label*="Start a post"]"#,
            ),
            InteractionStrategy::css("发帖框触发器类名", "button.share-box-feed-entry__trigger"),
            InteractionStrategy::css("折叠发帖框类名", "div.share-box-feed-entry__closed"),
            InteractionStrategy::css(
                "全局导航创建入口",
                "[data-test-global-nav-create-menu-trigger]",
            ),
        ])
    }

    /// 打开发帖编辑器
    ///
    /// # 返回
    /// 返回已聚焦的编辑器选择器；全部候选落空时返回 `EditorNotFound`
    pub async fn open<D: UiActions>(&self, driver: &D) -> AppResult<&'static str> {
        info!("🏠 正在进入发帖页...");
        driver.goto(&self.composer_url, self.nav_timeout_secs).await?;
        driver.settle(self.settle_after_nav_ms).await;

        self.dismiss_overlays(driver).await?;

        if !self.activate_trigger(driver).await? {
            // 兜底：带打开编辑器参数重新进入发帖页。
            // 这一步本身不确认成功，无论如何都交给阶段 C 判定
            info!("🔁 兜底策略: 带参数重载发帖页");
            driver.goto(&self.composer_url, self.nav_timeout_secs).await?;
            driver.settle(self.settle_after_fallback_ms).await;
        }

        self.locate_editor(driver).await
    }

    /// 阶段 A: 尽力关闭弹层
    ///
    /// 每次尝试只返回是否点到，绝不报错；没有可关的弹层是常态
    async fn dismiss_overlays<D: UiActions>(&self, driver: &D) -> AppResult<()> {
        for label in DISMISS_LABELS {
            if driver.click_button_matching(label).await? {
                info!("➡️ 已关闭弹层: {}", label);
            }
        }
        driver.settle(self.settle_after_dismiss_ms).await;
        Ok(())
    }

    /// 阶段 B: 级联定位并激活发帖触发器
    async fn activate_trigger<D: UiActions>(&self, driver: &D) -> AppResult<bool> {
        let hit = self
            .trigger_cascade
            .try_first(|strategy| async move {
                debug!("尝试发帖触发器策略: {}", strategy.description);
                match strategy.locator {
                    Locator::Role { name_pattern } => {
                        driver.click_button_matching(name_pattern).await
                    }
                    Locator::Css { selector } => driver.click_if_exists(selector).await,
                }
            })
            .await?;

        match hit {
            Some(strategy) => {
                info!("🟢 发帖触发器已激活 ({})", strategy.description);
                Ok(true)
            }
            None => {
                debug!("所有发帖触发器策略均未命中");
                Ok(false)
            }
        }
    }

    /// 阶段 C: 轮询编辑器候选选择器，首个出现者点击聚焦
    async fn locate_editor<D: UiActions>(&self, driver: &D) -> AppResult<&'static str> {
        for selector in EDITOR_CANDIDATES {
            debug!("等待编辑器候选: {}", selector);
            if driver.wait_for_selector(selector, self.editor_wait_secs).await? {
                driver.click(selector).await?;
                info!("✓ 编辑器已聚焦: {}", selector);
                return Ok(selector);
            }
        }

        Err(AppError::Ui(UiError::EditorNotFound { artifact: None }))
    }
}
