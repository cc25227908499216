use std::path::PathBuf;

use crate::error::AppError;

/// 单次运行的终态
#[derive(Debug)]
pub enum RunResult {
    /// 发帖成功，携带已发布的文本
    Posted(String),
    /// 队列为空（或全为空行），合法终态，无事可做
    NoWorkAvailable,
    /// 运行失败，携带类型化错误与诊断截图路径
    Failed {
        error: AppError,
        artifact: Option<PathBuf>,
    },
}
