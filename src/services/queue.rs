//! 帖子队列服务 - 业务能力层
//!
//! 只负责"取下一条帖子并轮转队列"能力，不关心流程

use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::error::{AppError, AppResult};

/// 队列存储抽象
///
/// 读全量 / 写全量的契约：持久化永远是整体替换，不做原地修改，
/// 崩溃不会造成条目重复或丢失
pub trait QueueStore {
    fn read_all(&self) -> AppResult<String>;
    fn write_all(&self, contents: &str) -> AppResult<()>;
}

/// 基于单个文本文件的队列存储
///
/// 一行一条帖子，空行忽略；写入时先写临时文件再原子改名
pub struct FileQueueStore {
    path: PathBuf,
}

impl FileQueueStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl QueueStore for FileQueueStore {
    fn read_all(&self) -> AppResult<String> {
        fs::read_to_string(&self.path)
            .map_err(|e| AppError::file_read_failed(self.path.display().to_string(), e))
    }

    fn write_all(&self, contents: &str) -> AppResult<()> {
        let tmp_path = self.path.with_extension("tmp");
        let path_display = self.path.display().to_string();
        fs::write(&tmp_path, contents)
            .map_err(|e| AppError::file_write_failed(path_display.clone(), e))?;
        fs::rename(&tmp_path, &self.path)
            .map_err(|e| AppError::file_write_failed(path_display, e))?;
        Ok(())
    }
}

/// 帖子队列轮转器
///
/// 职责：
/// - 取出队首帖子，并把它追加到队尾后整体回写
/// - 轮转语义保证多次运行下每条帖子都会被轮到（公平性），无需单独的"已用"账本
/// - 自身不持有任何跨调用状态
pub struct PostRotator<S: QueueStore> {
    store: S,
}

impl<S: QueueStore> PostRotator<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// 取下一条帖子
    ///
    /// # 返回
    /// - `Ok(Some(text))`: 队首帖子，队列已轮转并持久化
    /// - `Ok(None)`: 队列为空或全为空行，无事可做
    pub fn take_next(&self) -> AppResult<Option<String>> {
        let raw = self.store.read_all()?;
        let mut posts: Vec<String> = raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        if posts.is_empty() {
            return Ok(None);
        }

        let text = posts.remove(0);
        posts.push(text.clone());
        debug!("队列轮转: 取出 1 条，剩余 {} 条待轮转", posts.len() - 1);

        self.store.write_all(&(posts.join("\n") + "\n"))?;
        Ok(Some(text))
    }
}
