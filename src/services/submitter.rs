//! 发布确认服务 - 业务能力层
//!
//! 只负责"输入文本并点击发布"能力

use tracing::{debug, info};

use crate::config::Config;
use crate::error::{AppError, AppResult, UiError};
use crate::infrastructure::UiActions;
use crate::models::strategy::{InteractionStrategy, Locator, StrategyCascade};

/// 发布按钮的可访问名称模式
///
/// 必须整词锚定："Start a post" 和 "Repost" 也包含 post，
/// 子串匹配会在发布按钮之前点到它们
const SUBMIT_NAME_PATTERN: &str = "^post$";

/// 发布确认服务
pub struct PostSubmitter {
    submit_cascade: StrategyCascade,
    type_delay_ms: u64,
    submit_debounce_ms: u64,
    settle_after_post_ms: u64,
}

impl PostSubmitter {
    /// 创建新的发布确认服务
    pub fn new(config: &Config) -> Self {
        Self {
            submit_cascade: Self::build_submit_cascade(),
            type_delay_ms: config.type_delay_ms,
            submit_debounce_ms: config.submit_debounce_ms,
            settle_after_post_ms: config.settle_after_post_ms,
        }
    }

    /// 发布按钮级联：与发帖触发器同理，角色匹配优先
    fn build_submit_cascade() -> StrategyCascade {
        StrategyCascade::new(vec![
            InteractionStrategy::role("可访问角色+名称匹配", SUBMIT_NAME_PATTERN),
            InteractionStrategy::css("aria-label 包含匹配", r#"button[aria-label*="Post"]"#),
            InteractionStrategy::css("发布主操作类名", "button.share-actions__primary-action"),
        ])
    }

    /// 在已聚焦的编辑器中输入文本并点击发布
    ///
    /// 激活发布按钮即视为成功，不轮询服务端的"已发布"确认——
    /// 这是一个已知的弱保证
    pub async fn submit<D: UiActions>(
        &self,
        driver: &D,
        editor: &str,
        text: &str,
    ) -> AppResult<()> {
        info!("✍️ 正在输入帖子内容 ({} 字符)...", text.chars().count());
        driver.type_paced(editor, text, self.type_delay_ms).await?;

        // 先定位，不点击
        let hit = self
            .submit_cascade
            .try_first(|strategy| async move {
                debug!("尝试发布按钮策略: {}", strategy.description);
                match strategy.locator {
                    Locator::Role { name_pattern } => {
                        driver.button_matching_exists(name_pattern).await
                    }
                    Locator::Css { selector } => driver.selector_exists(selector).await,
                }
            })
            .await?;

        let strategy = hit.ok_or(AppError::Ui(UiError::SubmitButtonNotFound {
            artifact: None,
        }))?;

        // 目标 UI 常在输入防抖后才启用发布按钮，点击前等一个防抖窗口
        driver.settle(self.submit_debounce_ms).await;

        let clicked = match strategy.locator {
            Locator::Role { name_pattern } => driver.click_button_matching(name_pattern).await?,
            Locator::Css { selector } => driver.click_if_exists(selector).await?,
        };
        if !clicked {
            // 防抖等待期间按钮消失或被禁用
            return Err(AppError::Ui(UiError::SubmitButtonNotFound {
                artifact: None,
            }));
        }

        info!("🎯 发布按钮已点击 ({})", strategy.description);
        driver.settle(self.settle_after_post_ms).await;
        Ok(())
    }
}
