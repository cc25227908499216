//! 交互策略模型
//!
//! 目标页面的按钮文案、ARIA 标签和 DOM 结构会随账号状态、语言和灰度实验漂移，
//! 单一选择器随时可能失效。策略按"对标记耦合度从低到高"排成级联，
//! 逐个尝试直到首个成功，最坏延迟受各策略超时之和约束。
//!
//! 每个策略是一个数据值，不做任何运行时类型判断。

use std::future::Future;

use crate::error::AppResult;

/// 定位方式
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Locator {
    /// 按可访问角色 + 名称匹配（对标记改版最不敏感，优先尝试）
    Role { name_pattern: &'static str },
    /// 按 CSS 选择器匹配（属性、类名等结构特征）
    Css { selector: &'static str },
}

/// 单个交互策略：定位表达式 + 人类可读描述
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InteractionStrategy {
    /// 策略描述（用于日志）
    pub description: &'static str,
    /// 定位方式
    pub locator: Locator,
}

impl InteractionStrategy {
    /// 创建角色匹配策略
    pub fn role(description: &'static str, name_pattern: &'static str) -> Self {
        Self {
            description,
            locator: Locator::Role { name_pattern },
        }
    }

    /// 创建 CSS 选择器策略
    pub fn css(description: &'static str, selector: &'static str) -> Self {
        Self {
            description,
            locator: Locator::Css { selector },
        }
    }
}

/// 策略级联：按优先级排序的策略序列，首个成功者胜出
#[derive(Clone, Debug)]
pub struct StrategyCascade {
    strategies: Vec<InteractionStrategy>,
}

impl StrategyCascade {
    pub fn new(strategies: Vec<InteractionStrategy>) -> Self {
        Self { strategies }
    }

    pub fn strategies(&self) -> &[InteractionStrategy] {
        &self.strategies
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// 按顺序尝试每个策略，返回首个成功的策略
    ///
    /// # 参数
    /// - `attempt`: 对单个策略的尝试动作，返回是否命中
    ///
    /// # 返回
    /// - `Ok(Some(strategy))`: 首个命中的策略，后续策略不再尝试
    /// - `Ok(None)`: 所有策略都未命中
    /// - `Err(e)`: 尝试动作本身失败（如脚本执行错误），立即中止级联
    pub async fn try_first<F, Fut>(&self, mut attempt: F) -> AppResult<Option<&InteractionStrategy>>
    where
        F: FnMut(InteractionStrategy) -> Fut,
        Fut: Future<Output = AppResult<bool>>,
    {
        for strategy in &self.strategies {
            if attempt(*strategy).await? {
                return Ok(Some(strategy));
            }
        }
        Ok(None)
    }
}
