//! # Input 模块
//!
//! 定义 Host 向 Runtime 传递的页面事件。
//!
//! ## 设计说明
//!
//! - `PageEvent` 是 Host 从浏览器事件中提取的语义化输入
//! - Runtime 不直接处理 DOM 事件，也不知道时间流逝
//! - 定时器由 Host 调度，到期后以 `NavigationDue` / `RecoveryDue` 回传

use serde::{Deserialize, Serialize};

use crate::policy::{Activation, NavigationRequest};
use crate::state::Ticket;

/// Host 向 Runtime 传递的页面事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PageEvent {
    /// 文档解析完成（`DOMContentLoaded`，或脚本执行时文档已就绪）
    DocumentReady,

    /// 页面资源全部加载完成（`load`）
    Load,

    /// 页面变为可见（`pageshow`），`persisted` 表示从往返缓存恢复
    PageShow { persisted: bool },

    /// 页面即将隐藏（`pagehide`）
    PageHide,

    /// 页面即将卸载（`beforeunload`）
    BeforeUnload,

    /// 链接或导航按钮被激活
    Activation(Activation),

    /// 页面脚本主动发起导航（替代改写 `location`）
    NavigateTo(NavigationRequest),

    /// 阻塞策略的延迟导航定时器到期
    NavigationDue {
        ticket: Ticket,
        request: NavigationRequest,
    },

    /// 恢复定时器到期
    RecoveryDue { ticket: Ticket },
}

impl PageEvent {
    /// 创建 `pageshow` 事件
    pub fn page_show(persisted: bool) -> Self {
        Self::PageShow { persisted }
    }

    /// 创建激活事件
    pub fn activation(activation: Activation) -> Self {
        Self::Activation(activation)
    }

    /// 创建编程式导航事件
    pub fn navigate_to(request: NavigationRequest) -> Self {
        Self::NavigateTo(request)
    }
}
