//! 统一错误处理
//!
//! 提供结构化错误类型。选择器本身从不因错误中断页面：
//! DOM 修改失败会被记录并吞掉，只有 CLI 和存储层会把错误向上传递。

use thiserror::Error;

/// KoreaSEL 错误类型
#[derive(Error, Debug)]
pub enum KoreaSelError {
    /// 文件读写错误
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON 序列化错误
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 配置错误
    #[error("configuration error: {0}")]
    Config(String),

    /// 键值存储错误
    #[error("storage error: {0}")]
    Storage(String),

    /// DOM 操作错误
    #[error("DOM error: {0}")]
    Dom(String),

    /// 与内容脚本通信失败
    #[error("messaging error: {0}")]
    Messaging(String),

    /// 输入无效
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl KoreaSelError {
    /// 检查错误是否可以被静默处理
    ///
    /// DOM 和通信错误只影响单个控件或单条消息，不影响整个页面。
    pub fn is_recoverable(&self) -> bool {
        match self {
            KoreaSelError::Dom(_) => true,
            KoreaSelError::Messaging(_) => true,
            KoreaSelError::Storage(_) => true,
            KoreaSelError::Io(_) => false,
            KoreaSelError::Serialization(_) => false,
            KoreaSelError::Config(_) => false,
            KoreaSelError::InvalidInput(_) => false,
        }
    }
}

/// 结果类型别名
pub type KoreaSelResult<T> = Result<T, KoreaSelError>;
