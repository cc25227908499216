use std::fmt;

use crate::error::{AppError, AppResult};

/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 登录页 URL
    pub login_url: String,
    /// 发帖页 URL（带打开编辑器的查询参数）
    pub composer_url: String,
    /// 帖子队列文件路径
    pub queue_file: String,
    /// 诊断截图输出目录
    pub artifacts_dir: String,
    /// 是否使用无头模式
    pub headless: bool,
    /// 浏览器可执行文件路径（为空时使用系统默认）
    pub chrome_path: Option<String>,
    // --- 超时与节奏配置 ---
    /// 页面导航超时（秒）
    pub nav_timeout_secs: u64,
    /// 登录表单字段等待超时（秒）
    pub field_wait_secs: u64,
    /// 每个编辑器候选选择器的等待超时（秒）
    pub editor_wait_secs: u64,
    /// 逐字符输入间隔（毫秒）
    pub type_delay_ms: u64,
    /// 进入发帖页后的稳定等待（毫秒）
    pub settle_after_nav_ms: u64,
    /// 弹层关闭尝试后的稳定等待（毫秒）
    pub settle_after_dismiss_ms: u64,
    /// URL 兜底重载后的稳定等待（毫秒）
    pub settle_after_fallback_ms: u64,
    /// 点击发布按钮前的防抖等待（毫秒）
    pub submit_debounce_ms: u64,
    /// 发布后的稳定等待（毫秒）
    pub settle_after_post_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            login_url: "https://www.linkedin.com/login".to_string(),
            composer_url: "https://www.linkedin.com/feed/?shareBox=true".to_string(),
            queue_file: "posts.txt".to_string(),
            artifacts_dir: "artifacts".to_string(),
            headless: true,
            chrome_path: None,
            nav_timeout_secs: 60,
            field_wait_secs: 20,
            editor_wait_secs: 10,
            type_delay_ms: 15,
            settle_after_nav_ms: 3000,
            settle_after_dismiss_ms: 1000,
            settle_after_fallback_ms: 2000,
            submit_debounce_ms: 1200,
            settle_after_post_ms: 2500,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            login_url: std::env::var("LOGIN_URL").unwrap_or(default.login_url),
            composer_url: std::env::var("COMPOSER_URL").unwrap_or(default.composer_url),
            queue_file: std::env::var("QUEUE_FILE").unwrap_or(default.queue_file),
            artifacts_dir: std::env::var("ARTIFACTS_DIR").unwrap_or(default.artifacts_dir),
            headless: std::env::var("HEADLESS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.headless),
            chrome_path: std::env::var("CHROME_PATH").ok(),
            nav_timeout_secs: std::env::var("NAV_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.nav_timeout_secs),
            field_wait_secs: std::env::var("FIELD_WAIT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.field_wait_secs),
            editor_wait_secs: std::env::var("EDITOR_WAIT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.editor_wait_secs),
            type_delay_ms: std::env::var("TYPE_DELAY_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.type_delay_ms),
            settle_after_nav_ms: std::env::var("SETTLE_AFTER_NAV_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.settle_after_nav_ms),
            settle_after_dismiss_ms: std::env::var("SETTLE_AFTER_DISMISS_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.settle_after_dismiss_ms),
            settle_after_fallback_ms: std::env::var("SETTLE_AFTER_FALLBACK_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.settle_after_fallback_ms),
            submit_debounce_ms: std::env::var("SUBMIT_DEBOUNCE_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.submit_debounce_ms),
            settle_after_post_ms: std::env::var("SETTLE_AFTER_POST_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.settle_after_post_ms),
        }
    }
}

/// 登录凭据
///
/// 从环境变量读取，密码不落盘、不打日志
#[derive(Clone)]
pub struct Credentials {
    email: String,
    password: String,
}

impl Credentials {
    /// 环境变量：账号邮箱
    pub const EMAIL_VAR: &'static str = "LINKEDIN_EMAIL";
    /// 环境变量：账号密码
    pub const PASSWORD_VAR: &'static str = "LINKEDIN_PASSWORD";

    /// 直接构造凭据（非环境变量来源，如测试）
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// 从环境变量加载凭据
    ///
    /// 任一变量缺失或为空都是致命配置错误，必须在获取任何浏览器资源之前报告
    pub fn from_env() -> AppResult<Self> {
        let email = std::env::var(Self::EMAIL_VAR)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| AppError::env_var_not_found(Self::EMAIL_VAR))?;
        let password = std::env::var(Self::PASSWORD_VAR)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| AppError::env_var_not_found(Self::PASSWORD_VAR))?;
        Ok(Self { email, password })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

// 手动实现 Debug，凭据内容一律脱敏
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &"***")
            .field("password", &"***")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.headless);
        assert_eq!(config.queue_file, "posts.txt");
        assert_eq!(config.artifacts_dir, "artifacts");
        assert_eq!(config.nav_timeout_secs, 60);
    }

    #[test]
    fn test_credentials_debug_redacted() {
        let credentials = Credentials::new("bot@example.com", "secret");
        let debug = format!("{:?}", credentials);
        assert!(!debug.contains("bot@example.com"));
        assert!(!debug.contains("secret"));
    }
}
