//! # Error 模块
//!
//! 定义 nav-runtime 中使用的错误类型。
//!
//! 运行时本身不会失败：缺失的遮罩层或区域一律静默忽略，
//! 不合格的跳转目标直接交还给浏览器默认行为。唯一可能出错的是配置加载。

use thiserror::Error;

/// 配置错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// JSON 解析失败
    #[error("配置解析失败: {0}")]
    Parse(String),

    /// 配置值不合法
    #[error("配置验证失败: {0}")]
    Validation(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e.to_string())
    }
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
