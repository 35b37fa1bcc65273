//! # Command 模块
//!
//! 定义 Runtime 向 Host 发出的所有指令。
//! Command 是 Runtime 与 Host 之间的**唯一通信方式**。
//!
//! ## 设计原则
//!
//! - **声明式**：Command 描述"做什么"，不描述"怎么做"
//! - **有序**：同一批 Command 必须按顺序执行（遮罩总是先于导航显示）
//! - **平台无关**：不包含任何 DOM 类型

use serde::{Deserialize, Serialize};

use crate::policy::{NavigationRequest, OpenMode};
use crate::state::Ticket;

/// Runtime 向 Host 发出的指令
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// 创建遮罩层并注入动画定义（幂等）
    InitializeSurfaces,

    /// 隐藏遮罩并播放入场动画
    PlayEntrance,

    /// 显示遮罩和加载指示器
    ShowOverlay,

    /// 隐藏遮罩和加载指示器
    HideOverlay,

    /// 取消当前激活事件的默认行为
    ///
    /// 只在处理激活事件的同一批 Command 中出现，Host 必须同步执行。
    CancelDefault,

    /// 调度延迟导航，到期后回传 `PageEvent::NavigationDue`
    ScheduleNavigation {
        ticket: Ticket,
        request: NavigationRequest,
        delay_ms: u64,
    },

    /// 调度恢复定时器，到期后回传 `PageEvent::RecoveryDue`
    ScheduleRecovery { ticket: Ticket, delay_ms: u64 },

    /// 当前标签页导航（替换文档）
    Navigate { url: String },

    /// 打开新的辅助窗口
    OpenAuxiliary { url: String },
}

impl Command {
    /// 按打开方式生成导航指令
    pub fn navigation(request: &NavigationRequest) -> Self {
        match request.mode {
            OpenMode::SameTab => Self::Navigate {
                url: request.url.clone(),
            },
            OpenMode::NewTab => Self::OpenAuxiliary {
                url: request.url.clone(),
            },
        }
    }

    /// 是否为真正的导航指令
    pub fn is_navigation(&self) -> bool {
        matches!(self, Self::Navigate { .. } | Self::OpenAuxiliary { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_command_by_mode() {
        assert_eq!(
            Command::navigation(&NavigationRequest::same_tab("/about")),
            Command::Navigate {
                url: "/about".to_string()
            }
        );
        assert_eq!(
            Command::navigation(&NavigationRequest::new_tab("/dashboard")),
            Command::OpenAuxiliary {
                url: "/dashboard".to_string()
            }
        );
        assert!(!Command::ShowOverlay.is_navigation());
    }
}
