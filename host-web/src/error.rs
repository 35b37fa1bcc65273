//! # Error 模块
//!
//! 浏览器宿主的错误类型。DOM 调用失败只记录日志，不会抛给页面脚本。

use thiserror::Error;
use wasm_bindgen::JsValue;

/// 宿主错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HostError {
    /// 不在浏览器主线程中运行
    #[error("window 不可用")]
    NoWindow,

    /// 没有文档（例如在 worker 中加载）
    #[error("document 不可用")]
    NoDocument,

    /// DOM 调用抛出异常
    #[error("DOM 调用失败: {0}")]
    Js(String),
}

impl From<JsValue> for HostError {
    fn from(value: JsValue) -> Self {
        Self::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

/// Result 类型别名
pub type HostResult<T> = Result<T, HostError>;
