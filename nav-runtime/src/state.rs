//! # State 模块
//!
//! 定义页面生命周期阶段和遮罩可见性。
//!
//! ## 设计原则
//!
//! - 生命周期**显式建模**为状态机，而不是散落在各个事件回调里
//! - 状态只存活于当前文档，不持久化

use serde::{Deserialize, Serialize};

/// 定时器票据
///
/// 每次调度定时器都会分配新的票据。回调携带票据返回 Runtime，
/// 票据不再是当前值的回调（页面已从缓存恢复、或已开始新的过渡）直接丢弃。
pub type Ticket = u64;

/// 遮罩层可见性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Visibility {
    /// 透明（元素仍在文档中，便于再次显示）
    #[default]
    Hidden,
    /// 显示在所有内容之上
    Visible,
}

impl Visibility {
    pub fn is_visible(self) -> bool {
        matches!(self, Self::Visible)
    }
}

/// 页面生命周期阶段
///
/// # 状态转换
///
/// ```text
/// Initializing    --DocumentReady/Load/PageShow-->  Idle（首次到达时创建遮罩层）
/// Idle            --合格的激活/编程式导航-->         Transitioning
/// Transitioning   --新标签页打开/恢复超时-->         Idle
/// *               --PageHide/BeforeUnload-->        HiddenForUnload
/// *               --PageShow(重放入场)-->            Idle
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LifecyclePhase {
    /// 脚本已加载，遮罩层尚未创建
    #[default]
    Initializing,
    /// 页面可交互，没有进行中的导航
    Idle,
    /// 导航进行中，遮罩可见，后续激活被去重
    Transitioning,
    /// 页面即将卸载（或进入往返缓存），遮罩可见
    HiddenForUnload,
}

impl LifecyclePhase {
    /// 是否有导航正在进行
    pub fn is_transitioning(self) -> bool {
        matches!(self, Self::Transitioning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(Visibility::default(), Visibility::Hidden);
        assert_eq!(LifecyclePhase::default(), LifecyclePhase::Initializing);
        assert!(!LifecyclePhase::Initializing.is_transitioning());
        assert!(LifecyclePhase::Transitioning.is_transitioning());
    }
}
