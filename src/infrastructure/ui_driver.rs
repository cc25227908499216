//! UI 驱动器 - 基础设施层
//!
//! 持有唯一的 page 资源，只暴露页面交互能力

use std::path::Path;
use std::time::Duration;

use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tokio::time::{sleep, timeout, Instant};
use tracing::debug;

use crate::error::{AppError, AppResult, BrowserError};

/// 选择器轮询间隔
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// UI 交互能力
///
/// 业务能力层和流程层只依赖这个 trait，不接触 Page 本身；
/// 测试中用脚本化实现替换真实页面。
/// 所有挂起操作都有显式上限，不会无限阻塞
#[allow(async_fn_in_trait)]
pub trait UiActions {
    /// 导航到指定 URL，受超时上限约束
    async fn goto(&self, url: &str, timeout_secs: u64) -> AppResult<()>;

    /// 等待当前导航完成；超时返回 `Ok(false)`，由调用方决定如何处理
    async fn wait_for_navigation(&self, timeout_secs: u64) -> AppResult<bool>;

    /// 获取当前页面 URL
    async fn current_url(&self) -> AppResult<String>;

    /// 点击指定选择器的元素（元素必须存在）
    async fn click(&self, selector: &str) -> AppResult<()>;

    /// 点击选择器命中的第一个可见、可点击元素；
    /// 元素不存在、不可见或已禁用时返回 `Ok(false)`，不算错误
    async fn click_if_exists(&self, selector: &str) -> AppResult<bool>;

    /// 检查选择器是否命中可见、可点击的元素（不点击）
    async fn selector_exists(&self, selector: &str) -> AppResult<bool>;

    /// 点击可访问名称匹配正则的第一个按钮
    async fn click_button_matching(&self, pattern: &str) -> AppResult<bool>;

    /// 检查是否存在可访问名称匹配正则的按钮（不点击）
    async fn button_matching_exists(&self, pattern: &str) -> AppResult<bool>;

    /// 轮询等待选择器出现；超时仍未出现返回 `Ok(false)`
    async fn wait_for_selector(&self, selector: &str, timeout_secs: u64) -> AppResult<bool>;

    /// 向指定元素填入完整文本（用于登录表单等不要求输入节奏的场景）
    async fn fill(&self, selector: &str, value: &str) -> AppResult<()>;

    /// 逐字符输入文本，模拟人工输入节奏
    async fn type_paced(&self, selector: &str, text: &str, delay_ms: u64) -> AppResult<()>;

    /// 固定时长的稳定等待
    async fn settle(&self, ms: u64);

    /// 保存整页截图到指定路径
    async fn screenshot(&self, path: &Path) -> AppResult<()>;
}

/// UI 驱动器
///
/// 职责：
/// - 持有唯一的 Page 资源
/// - 以 `UiActions` 的形式暴露导航 / 查找 / 点击 / 输入 / 等待能力
/// - 不认识帖子和业务流程
pub struct UiDriver {
    page: Page,
}

impl UiDriver {
    /// 创建新的 UI 驱动器
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// 获取 page 的引用
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// 执行 JS 代码并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> AppResult<JsonValue> {
        let result = self.page.evaluate(js_code.into()).await?;
        let json_value = result.into_value()?;
        Ok(json_value)
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> AppResult<T> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }
}

impl UiActions for UiDriver {
    async fn goto(&self, url: &str, timeout_secs: u64) -> AppResult<()> {
        debug!("导航到: {}", url);
        match timeout(Duration::from_secs(timeout_secs), self.page.goto(url)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(AppError::navigation_failed(url, e)),
            Err(_) => Err(AppError::Browser(BrowserError::NavigationTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            })),
        }
    }

    async fn wait_for_navigation(&self, timeout_secs: u64) -> AppResult<bool> {
        match timeout(
            Duration::from_secs(timeout_secs),
            self.page.wait_for_navigation(),
        )
        .await
        {
            Ok(Ok(_)) => Ok(true),
            Ok(Err(e)) => Err(AppError::from(e)),
            Err(_) => {
                debug!("等待导航完成超时 ({}秒)", timeout_secs);
                Ok(false)
            }
        }
    }

    async fn current_url(&self) -> AppResult<String> {
        let url = self.page.url().await?;
        Ok(url.unwrap_or_default())
    }

    async fn click(&self, selector: &str) -> AppResult<()> {
        let element = self.page.find_element(selector).await?;
        element.click().await?;
        Ok(())
    }

    async fn click_if_exists(&self, selector: &str) -> AppResult<bool> {
        self.eval_as::<bool>(selector_scan_js(selector, true)?).await
    }

    async fn selector_exists(&self, selector: &str) -> AppResult<bool> {
        self.eval_as::<bool>(selector_scan_js(selector, false)?).await
    }

    async fn click_button_matching(&self, pattern: &str) -> AppResult<bool> {
        self.eval_as::<bool>(button_scan_js(pattern, true)?).await
    }

    async fn button_matching_exists(&self, pattern: &str) -> AppResult<bool> {
        self.eval_as::<bool>(button_scan_js(pattern, false)?).await
    }

    async fn wait_for_selector(&self, selector: &str, timeout_secs: u64) -> AppResult<bool> {
        let deadline = Instant::now() + Duration::from_secs(timeout_secs);
        loop {
            if self.selector_exists(selector).await? {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                debug!("等待选择器 {} 超时 ({}秒)", selector, timeout_secs);
                return Ok(false);
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn fill(&self, selector: &str, value: &str) -> AppResult<()> {
        let element = self.page.find_element(selector).await?;
        element.click().await?;
        element.type_str(value).await?;
        Ok(())
    }

    /// 目标 UI 对合并输入事件有兼容性问题，逐字符输入是兼容性要求而非正确性要求
    async fn type_paced(&self, selector: &str, text: &str, delay_ms: u64) -> AppResult<()> {
        let element = self.page.find_element(selector).await?;
        element.click().await?;
        let delay = Duration::from_millis(delay_ms);
        let mut buf = [0u8; 4];
        for ch in text.chars() {
            element.type_str(&*ch.encode_utf8(&mut buf)).await?;
            sleep(delay).await;
        }
        Ok(())
    }

    async fn settle(&self, ms: u64) {
        sleep(Duration::from_millis(ms)).await;
    }

    async fn screenshot(&self, path: &Path) -> AppResult<()> {
        self.page
            .save_screenshot(
                ScreenshotParams::builder()
                    .format(CaptureScreenshotFormat::Png)
                    .full_page(true)
                    .build(),
                path,
            )
            .await?;
        Ok(())
    }
}

// ========== JS 扫描脚本 ==========

/// 单选择器扫描：命中可见、可点击的元素时（可选地点击并）返回 true
///
/// 选择器通过 JSON 字面量注入，避免引号转义问题；
/// 可见性用 getClientRects 判断，position: fixed 的弹层也能正确命中
fn selector_scan_js(selector: &str, do_click: bool) -> AppResult<String> {
    Ok(format!(
        r#"
        (() => {{
            const el = document.querySelector({selector});
            if (!el) return false;
            if (el.getClientRects().length === 0 || el.disabled) return false;
            if ({do_click}) el.click();
            return true;
        }})()
        "#,
        selector = serde_json::to_string(selector)?,
        do_click = do_click,
    ))
}

/// 按钮扫描：可访问名称（aria-label 或可见文本）匹配正则的第一个按钮
fn button_scan_js(pattern: &str, do_click: bool) -> AppResult<String> {
    Ok(format!(
        r#"
        (() => {{
            const re = new RegExp({pattern}, 'i');
            const nodes = document.querySelectorAll('button, [role="button"]');
            for (const el of nodes) {{
                const label = el.getAttribute('aria-label') || '';
                const text = (el.innerText || '').trim();
                if (!re.test(label) && !re.test(text)) continue;
                if (el.getClientRects().length === 0 || el.disabled) continue;
                if ({do_click}) el.click();
                return true;
            }}
            return false;
        }})()
        "#,
        pattern = serde_json::to_string(pattern)?,
        do_click = do_click,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_scan_js_visibility_check() {
        let js = selector_scan_js(r#"button[aria-label="Start a post"]"#, true).unwrap();
        // 固定定位的弹层（offsetParent 为 null）也必须算可见
        assert!(js.contains("getClientRects().length === 0"));
        assert!(!js.contains("offsetParent"));
        // 选择器以 JSON 字面量注入，内部引号被转义
        assert!(js.contains(r#""button[aria-label=\"Start a post\"]""#));
        assert!(js.contains("if (true) el.click();"));
    }

    #[test]
    fn test_selector_scan_js_without_click() {
        let js = selector_scan_js("div.share-box-feed-entry__closed", false).unwrap();
        assert!(js.contains("if (false) el.click();"));
    }

    #[test]
    fn test_button_scan_js_visibility_and_pattern() {
        let js = button_scan_js("start a post|create a post|^post$", true).unwrap();
        assert!(js.contains("getClientRects().length === 0"));
        assert!(!js.contains("offsetParent"));
        assert!(js.contains(r#""start a post|create a post|^post$""#));
        // 忽略大小写
        assert!(js.contains("'i'"));
    }
}
