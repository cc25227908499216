//! 脚本化 UI 驱动器，仅用于测试
//!
//! 预设 URL 序列与命中集合，记录每次交互调用，
//! 让认证 / 定位 / 发布流程可以在没有真实浏览器的情况下走完

use std::cell::RefCell;
use std::collections::{HashSet, VecDeque};
use std::path::Path;

use crate::error::AppResult;

use super::UiActions;

/// 脚本化 UI 驱动器
///
/// - `push_url` 预设 `current_url` 依次返回的 URL（最后一个保持不变）
/// - `add_selector` / `add_pattern` 声明哪些选择器 / 名称模式会命中
/// - `calls()` 返回完整的调用记录，供断言交互顺序与次数
#[derive(Default)]
pub struct FakeDriver {
    calls: RefCell<Vec<String>>,
    url_sequence: RefCell<VecDeque<String>>,
    present_selectors: RefCell<HashSet<String>>,
    matched_patterns: RefCell<HashSet<String>>,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预设下一个 `current_url` 返回值
    pub fn push_url(&self, url: &str) {
        self.url_sequence.borrow_mut().push_back(url.to_string());
    }

    /// 声明选择器命中可见元素
    pub fn add_selector(&self, selector: &str) {
        self.present_selectors
            .borrow_mut()
            .insert(selector.to_string());
    }

    /// 声明名称模式命中可见按钮
    pub fn add_pattern(&self, pattern: &str) {
        self.matched_patterns
            .borrow_mut()
            .insert(pattern.to_string());
    }

    /// 完整调用记录
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }

    fn selector_present(&self, selector: &str) -> bool {
        self.present_selectors.borrow().contains(selector)
    }

    fn pattern_matched(&self, pattern: &str) -> bool {
        self.matched_patterns.borrow().contains(pattern)
    }
}

impl UiActions for FakeDriver {
    async fn goto(&self, url: &str, _timeout_secs: u64) -> AppResult<()> {
        self.record(format!("goto:{}", url));
        Ok(())
    }

    async fn wait_for_navigation(&self, _timeout_secs: u64) -> AppResult<bool> {
        self.record("wait_for_navigation".to_string());
        Ok(true)
    }

    async fn current_url(&self) -> AppResult<String> {
        let mut sequence = self.url_sequence.borrow_mut();
        let url = if sequence.len() > 1 {
            sequence.pop_front().unwrap_or_default()
        } else {
            sequence.front().cloned().unwrap_or_default()
        };
        Ok(url)
    }

    async fn click(&self, selector: &str) -> AppResult<()> {
        self.record(format!("click:{}", selector));
        Ok(())
    }

    async fn click_if_exists(&self, selector: &str) -> AppResult<bool> {
        let hit = self.selector_present(selector);
        if hit {
            self.record(format!("click:{}", selector));
        }
        Ok(hit)
    }

    async fn selector_exists(&self, selector: &str) -> AppResult<bool> {
        Ok(self.selector_present(selector))
    }

    async fn click_button_matching(&self, pattern: &str) -> AppResult<bool> {
        let hit = self.pattern_matched(pattern);
        if hit {
            self.record(format!("click_button:{}", pattern));
        }
        Ok(hit)
    }

    async fn button_matching_exists(&self, pattern: &str) -> AppResult<bool> {
        Ok(self.pattern_matched(pattern))
    }

    async fn wait_for_selector(&self, selector: &str, _timeout_secs: u64) -> AppResult<bool> {
        Ok(self.selector_present(selector))
    }

    // 只记录选择器，不记录值：凭据不进入测试断言输出
    async fn fill(&self, selector: &str, _value: &str) -> AppResult<()> {
        self.record(format!("fill:{}", selector));
        Ok(())
    }

    async fn type_paced(&self, selector: &str, text: &str, _delay_ms: u64) -> AppResult<()> {
        self.record(format!("type:{}:{}", selector, text));
        Ok(())
    }

    // 不真正等待，测试立即推进
    async fn settle(&self, _ms: u64) {}

    async fn screenshot(&self, path: &Path) -> AppResult<()> {
        self.record(format!("screenshot:{}", path.display()));
        Ok(())
    }
}
