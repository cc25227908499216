//! 会话认证服务 - 业务能力层
//!
//! 只负责"把浏览器会话登录到目标站点"能力

use regex::Regex;
use tracing::{debug, info};

use crate::config::{Config, Credentials};
use crate::error::{AppError, AppResult, AuthError};
use crate::infrastructure::UiActions;

/// 安全验证检查点的 URL 关键词
const CHALLENGE_PATTERN: &str = r"(?i)checkpoint|challenge|verification";

/// 会话认证服务
///
/// 职责：
/// - 导航到登录页；若被重定向走（上次运行的会话还在），直接复用会话
/// - 否则填入凭据并提交，等待页面进入稳定状态
/// - 识别安全验证检查点：终态错误，不做任何绕过尝试
/// - 单次运行内绝不重复提交凭据（半提交的表单再提交有重复动作风险）
pub struct Authenticator {
    login_url: String,
    nav_timeout_secs: u64,
    field_wait_secs: u64,
    challenge_re: Regex,
}

impl Authenticator {
    /// 创建新的认证服务
    pub fn new(config: &Config) -> Self {
        Self {
            login_url: config.login_url.clone(),
            nav_timeout_secs: config.nav_timeout_secs,
            field_wait_secs: config.field_wait_secs,
            challenge_re: Regex::new(CHALLENGE_PATTERN).unwrap(),
        }
    }

    /// 登录到目标站点
    pub async fn login<D: UiActions>(
        &self,
        driver: &D,
        credentials: &Credentials,
    ) -> AppResult<()> {
        info!("🌐 正在打开登录页...");
        driver.goto(&self.login_url, self.nav_timeout_secs).await?;

        let url = driver.current_url().await?;
        if is_login_surface(&url) {
            self.submit_credentials(driver, credentials).await?;
        } else {
            // 登录页被重定向走，说明上次运行的会话还有效
            info!("✓ 检测到已登录会话，跳过凭据提交");
        }

        // 无论是否提交了凭据，都检查是否落在了安全验证检查点上
        let url = driver.current_url().await?;
        if self.is_challenge_url(&url) {
            return Err(AppError::Auth(AuthError::Challenge {
                url,
                artifact: None,
            }));
        }

        info!("✓ 登录完成");
        Ok(())
    }

    /// 填写并提交登录表单（每次运行最多一次）
    async fn submit_credentials<D: UiActions>(
        &self,
        driver: &D,
        credentials: &Credentials,
    ) -> AppResult<()> {
        info!("🔑 正在提交登录凭据...");

        if !driver.wait_for_selector("#username", self.field_wait_secs).await? {
            return Err(AppError::login_failed("登录表单未出现"));
        }
        driver.fill("#username", credentials.email()).await?;
        driver.fill("#password", credentials.password()).await?;

        driver.click(r#"button[type="submit"]"#).await?;
        debug!("已点击登录按钮，等待页面稳定...");

        if !driver.wait_for_navigation(self.nav_timeout_secs).await? {
            return Err(AppError::login_failed(format!(
                "提交凭据后页面在 {} 秒内未进入稳定状态",
                self.nav_timeout_secs
            )));
        }
        Ok(())
    }

    /// 当前 URL 是否命中安全验证检查点
    pub fn is_challenge_url(&self, url: &str) -> bool {
        self.challenge_re.is_match(url)
    }
}

/// 当前 URL 是否仍是登录页（未被重定向走）
pub fn is_login_surface(url: &str) -> bool {
    url.contains("/login")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::fake_driver::FakeDriver;

    fn authenticator() -> Authenticator {
        Authenticator::new(&Config::default())
    }

    fn credentials() -> Credentials {
        Credentials::new("bot@example.com", "secret")
    }

    // 登录页被重定向走说明上次会话还有效，此时绝不触碰登录表单
    #[tokio::test]
    async fn test_resumed_session_skips_credential_submission() {
        let auth = authenticator();
        let driver = FakeDriver::new();
        driver.push_url("https://www.linkedin.com/feed/");

        auth.login(&driver, &credentials()).await.unwrap();

        let calls = driver.calls();
        assert!(calls.iter().any(|c| c.starts_with("goto:")));
        assert!(!calls.iter().any(|c| c.starts_with("fill:")));
        assert!(!calls.iter().any(|c| c.starts_with("click:")));
        assert!(!calls.iter().any(|c| c == "wait_for_navigation"));
    }

    // 提交凭据后落在检查点上：终态错误，且凭据只提交了一次
    #[tokio::test]
    async fn test_challenge_after_submit_is_terminal() {
        let auth = authenticator();
        let driver = FakeDriver::new();
        driver.push_url("https://www.linkedin.com/login");
        driver.push_url("https://www.linkedin.com/checkpoint/challenge/abc");
        driver.add_selector("#username");

        let err = auth.login(&driver, &credentials()).await.unwrap_err();
        assert!(matches!(err, AppError::Auth(AuthError::Challenge { .. })));

        let calls = driver.calls();
        // 用户名 + 密码各填一次，没有重复提交
        assert_eq!(calls.iter().filter(|c| c.starts_with("fill:")).count(), 2);
        assert_eq!(
            calls
                .iter()
                .filter(|c| c.as_str() == r#"click:button[type="submit"]"#)
                .count(),
            1
        );
    }

    #[test]
    fn test_login_surface_detection() {
        assert!(is_login_surface("https://www.linkedin.com/login"));
        assert!(is_login_surface(
            "https://www.linkedin.com/login?trk=guest_homepage"
        ));
        // 重定向到信息流说明已登录
        assert!(!is_login_surface("https://www.linkedin.com/feed/"));
    }

    #[test]
    fn test_challenge_url_detection() {
        let auth = authenticator();
        assert!(auth.is_challenge_url("https://www.linkedin.com/checkpoint/challenge/abc"));
        assert!(auth.is_challenge_url("https://www.linkedin.com/uas/Verification"));
        assert!(auth.is_challenge_url("https://example.com/CHALLENGE"));
        assert!(!auth.is_challenge_url("https://www.linkedin.com/feed/"));
        assert!(!auth.is_challenge_url("https://www.linkedin.com/login"));
    }
}
