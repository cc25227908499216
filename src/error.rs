use std::fmt;
use std::path::{Path, PathBuf};

/// 应用程序错误类型
#[derive(Debug)]
pub enum AppError {
    /// 配置错误
    Config(ConfigError),
    /// 浏览器相关错误
    Browser(BrowserError),
    /// 登录认证错误
    Auth(AuthError),
    /// 页面交互错误
    Ui(UiError),
    /// 文件操作错误
    File(FileError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(e) => write!(f, "配置错误: {}", e),
            AppError::Browser(e) => write!(f, "浏览器错误: {}", e),
            AppError::Auth(e) => write!(f, "认证错误: {}", e),
            AppError::Ui(e) => write!(f, "页面交互错误: {}", e),
            AppError::File(e) => write!(f, "文件错误: {}", e),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(e) => Some(e),
            AppError::Browser(e) => Some(e),
            AppError::Auth(e) => Some(e),
            AppError::Ui(e) => Some(e),
            AppError::File(e) => Some(e),
        }
    }
}

/// 配置错误
#[derive(Debug)]
pub enum ConfigError {
    /// 环境变量不存在
    EnvVarNotFound { var_name: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EnvVarNotFound { var_name } => {
                write!(f, "环境变量 {} 不存在", var_name)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// 浏览器相关错误
#[derive(Debug)]
pub enum BrowserError {
    /// 浏览器配置失败
    ConfigurationFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 启动浏览器失败
    LaunchFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 创建页面失败
    PageCreationFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 导航失败
    NavigationFailed {
        url: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 导航超时
    NavigationTimeout { url: String, secs: u64 },
    /// 执行脚本失败
    ScriptExecutionFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for BrowserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrowserError::ConfigurationFailed { source } => {
                write!(f, "浏览器配置失败: {}", source)
            }
            BrowserError::LaunchFailed { source } => {
                write!(f, "启动浏览器失败: {}", source)
            }
            BrowserError::PageCreationFailed { source } => {
                write!(f, "创建页面失败: {}", source)
            }
            BrowserError::NavigationFailed { url, source } => {
                write!(f, "导航到 {} 失败: {}", url, source)
            }
            BrowserError::NavigationTimeout { url, secs } => {
                write!(f, "导航到 {} 超时 ({}秒)", url, secs)
            }
            BrowserError::ScriptExecutionFailed { source } => {
                write!(f, "执行脚本失败: {}", source)
            }
        }
    }
}

impl std::error::Error for BrowserError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BrowserError::ConfigurationFailed { source }
            | BrowserError::LaunchFailed { source }
            | BrowserError::PageCreationFailed { source }
            | BrowserError::NavigationFailed { source, .. }
            | BrowserError::ScriptExecutionFailed { source } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            BrowserError::NavigationTimeout { .. } => None,
        }
    }
}

/// 登录认证错误
#[derive(Debug)]
pub enum AuthError {
    /// 命中安全验证检查点（checkpoint / challenge / verification）
    ///
    /// 终态错误：自动化无法完成二次验证，需要人工介入
    Challenge {
        url: String,
        artifact: Option<PathBuf>,
    },
    /// 登录失败（可重试整个新的运行）
    LoginFailed { reason: String },
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Challenge { url, .. } => {
                write!(
                    f,
                    "命中安全验证检查点 ({})，请改用 Cookie 登录或为该账号关闭二次验证",
                    url
                )
            }
            AuthError::LoginFailed { reason } => write!(f, "登录失败: {}", reason),
        }
    }
}

impl std::error::Error for AuthError {}

/// 页面交互错误
#[derive(Debug)]
pub enum UiError {
    /// 未找到发帖编辑器（发帖入口级联全部落空）
    EditorNotFound { artifact: Option<PathBuf> },
    /// 未找到发布按钮
    SubmitButtonNotFound { artifact: Option<PathBuf> },
}

impl fmt::Display for UiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UiError::EditorNotFound { .. } => {
                write!(f, "未找到发帖编辑器（发帖入口可能未打开）")
            }
            UiError::SubmitButtonNotFound { .. } => write!(f, "未找到发布按钮"),
        }
    }
}

impl std::error::Error for UiError {}

/// 文件操作错误
#[derive(Debug)]
pub enum FileError {
    /// 读取文件失败
    ReadFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 写入文件失败
    WriteFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileError::ReadFailed { path, source } => {
                write!(f, "读取文件失败 ({}): {}", path, source)
            }
            FileError::WriteFailed { path, source } => {
                write!(f, "写入文件失败 ({}): {}", path, source)
            }
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileError::ReadFailed { source, .. } | FileError::WriteFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
        }
    }
}

// ========== 从常见错误类型转换 ==========

impl From<chromiumoxide::error::CdpError> for AppError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        AppError::Browser(BrowserError::ScriptExecutionFailed {
            source: Box::new(err),
        })
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Browser(BrowserError::ScriptExecutionFailed {
            source: Box::new(err),
        })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建环境变量缺失错误
    pub fn env_var_not_found(var_name: impl Into<String>) -> Self {
        AppError::Config(ConfigError::EnvVarNotFound {
            var_name: var_name.into(),
        })
    }

    /// 创建浏览器启动错误
    pub fn browser_launch_failed(
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        AppError::Browser(BrowserError::LaunchFailed {
            source: source.into(),
        })
    }

    /// 创建导航失败错误
    pub fn navigation_failed(
        url: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Browser(BrowserError::NavigationFailed {
            url: url.into(),
            source: Box::new(source),
        })
    }

    /// 创建登录失败错误
    pub fn login_failed(reason: impl Into<String>) -> Self {
        AppError::Auth(AuthError::LoginFailed {
            reason: reason.into(),
        })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 获取随错误一起保存的诊断截图路径
    pub fn artifact(&self) -> Option<&Path> {
        match self {
            AppError::Auth(AuthError::Challenge { artifact, .. })
            | AppError::Ui(UiError::EditorNotFound { artifact })
            | AppError::Ui(UiError::SubmitButtonNotFound { artifact }) => artifact.as_deref(),
            _ => None,
        }
    }

    /// 为支持诊断截图的错误变体附加截图路径
    pub fn with_artifact(mut self, path: PathBuf) -> Self {
        match &mut self {
            AppError::Auth(AuthError::Challenge { artifact, .. })
            | AppError::Ui(UiError::EditorNotFound { artifact })
            | AppError::Ui(UiError::SubmitButtonNotFound { artifact }) => {
                *artifact = Some(path);
            }
            _ => {}
        }
        self
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
