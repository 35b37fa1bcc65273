//! # Engine 模块
//!
//! 页面过渡 Runtime 的生命周期状态机。
//!
//! ## 执行模型
//!
//! ```text
//! handle(PageEvent) -> Vec<Command>
//! ```
//!
//! 1. 根据当前阶段决定如何响应事件
//! 2. 更新阶段、遮罩可见性和票据
//! 3. 返回需要 Host 按顺序执行的 Command
//!
//! 激活事件和编程式导航的处理见 [`super::interceptor`]。

use tracing::debug;

use crate::command::Command;
use crate::config::TransitionConfig;
use crate::input::PageEvent;
use crate::policy::{InterceptPolicy, NavigationRequest, OpenMode};
use crate::state::{LifecyclePhase, Ticket, Visibility};

/// 页面过渡 Runtime
///
/// # 使用示例
///
/// ```ignore
/// let mut runtime = NavRuntime::new(config).with_origin("https://example.com");
///
/// // 每个浏览器事件转换为 PageEvent 交给 Runtime
/// for cmd in runtime.handle(PageEvent::DocumentReady) {
///     host.execute(cmd);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct NavRuntime {
    pub(super) config: TransitionConfig,
    /// 当前文档的源，用于判断同源绝对地址
    pub(super) origin: Option<String>,
    pub(super) phase: LifecyclePhase,
    /// 遮罩层是否已创建、入场动画是否已播放
    pub(super) initialized: bool,
    /// 最近一次下发的遮罩可见性（用于去掉重复的显示/隐藏）
    pub(super) overlay: Visibility,
    /// 当前有效的定时器票据
    pub(super) ticket: Ticket,
}

impl NavRuntime {
    /// 创建新的 Runtime 实例
    pub fn new(config: TransitionConfig) -> Self {
        Self {
            config,
            origin: None,
            phase: LifecyclePhase::Initializing,
            initialized: false,
            overlay: Visibility::Hidden,
            ticket: 0,
        }
    }

    /// 设置当前文档的源
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// 核心驱动函数
    ///
    /// 处理一个页面事件，返回 Host 需要按顺序执行的 Command。
    pub fn handle(&mut self, event: PageEvent) -> Vec<Command> {
        let mut commands = Vec::new();

        match event {
            PageEvent::DocumentReady => self.on_ready(&mut commands),
            PageEvent::Load => self.on_load(&mut commands),
            PageEvent::PageShow { persisted } => self.on_page_show(persisted, &mut commands),
            PageEvent::PageHide | PageEvent::BeforeUnload => self.on_unload(&mut commands),
            PageEvent::Activation(activation) => self.on_activation(&activation, &mut commands),
            PageEvent::NavigateTo(request) => self.on_navigate_to(request, &mut commands),
            PageEvent::NavigationDue { ticket, request } => {
                self.on_navigation_due(ticket, request, &mut commands)
            }
            PageEvent::RecoveryDue { ticket } => self.on_recovery_due(ticket, &mut commands),
        }

        commands
    }

    /// 编程式导航
    ///
    /// 页面脚本应调用此方法，而不是直接改写 `location`。
    pub fn navigate_to(&mut self, url: impl Into<String>, mode: OpenMode) -> Vec<Command> {
        let request = NavigationRequest {
            url: url.into(),
            mode,
        };
        self.handle(PageEvent::NavigateTo(request))
    }

    /// 当前生命周期阶段
    pub fn phase(&self) -> LifecyclePhase {
        self.phase
    }

    /// 最近一次下发的遮罩可见性
    pub fn overlay(&self) -> Visibility {
        self.overlay
    }

    /// 遮罩层是否已完成初始化
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// 当前有效的票据
    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }

    pub fn policy(&self) -> InterceptPolicy {
        self.config.policy
    }

    fn on_ready(&mut self, commands: &mut Vec<Command>) {
        if self.initialized {
            debug!(phase = ?self.phase, "重复的 DocumentReady，忽略");
            return;
        }
        self.setup(commands);
    }

    fn on_load(&mut self, commands: &mut Vec<Command>) {
        if !self.initialized {
            self.setup(commands);
            return;
        }

        // 导航进行中不收起遮罩，避免与待执行的导航冲突
        if self.phase.is_transitioning() {
            return;
        }

        if self.overlay.is_visible() {
            self.hide_overlay(commands);
            self.phase = LifecyclePhase::Idle;
        }
    }

    fn on_page_show(&mut self, persisted: bool, commands: &mut Vec<Command>) {
        if !self.initialized {
            self.setup(commands);
            return;
        }

        let replay = match self.config.policy {
            InterceptPolicy::NonBlocking => true,
            InterceptPolicy::Blocking => persisted,
        };
        if !replay {
            debug!("普通 pageshow，不重放入场动画");
            return;
        }

        debug!(persisted, "重放入场动画");
        // 冻结在往返缓存里的定时器恢复后全部作废
        self.ticket += 1;
        self.play_entrance(commands);
    }

    fn on_unload(&mut self, commands: &mut Vec<Command>) {
        self.show_overlay(commands);
        self.phase = LifecyclePhase::HiddenForUnload;
    }

    fn setup(&mut self, commands: &mut Vec<Command>) {
        self.initialized = true;
        commands.push(Command::InitializeSurfaces);
        self.play_entrance(commands);
    }

    fn play_entrance(&mut self, commands: &mut Vec<Command>) {
        // PlayEntrance 自带隐藏遮罩
        commands.push(Command::PlayEntrance);
        self.overlay = Visibility::Hidden;
        self.phase = LifecyclePhase::Idle;
    }

    pub(super) fn show_overlay(&mut self, commands: &mut Vec<Command>) {
        if !self.overlay.is_visible() {
            commands.push(Command::ShowOverlay);
            self.overlay = Visibility::Visible;
        }
    }

    pub(super) fn hide_overlay(&mut self, commands: &mut Vec<Command>) {
        if self.overlay.is_visible() {
            commands.push(Command::HideOverlay);
            self.overlay = Visibility::Hidden;
        }
    }

    pub(super) fn next_ticket(&mut self) -> Ticket {
        self.ticket += 1;
        self.ticket
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_runtime(policy: InterceptPolicy) -> NavRuntime {
        let config = TransitionConfig {
            policy,
            ..TransitionConfig::default()
        };
        let mut runtime = NavRuntime::new(config);
        runtime.handle(PageEvent::DocumentReady);
        runtime
    }

    #[test]
    fn test_runtime_creation() {
        let runtime = NavRuntime::new(TransitionConfig::default());
        assert_eq!(runtime.phase(), LifecyclePhase::Initializing);
        assert!(!runtime.is_initialized());
        assert_eq!(runtime.overlay(), Visibility::Hidden);
        assert_eq!(runtime.ticket(), 0);
    }

    #[test]
    fn test_document_ready_sets_up_once() {
        let mut runtime = NavRuntime::new(TransitionConfig::default());

        let commands = runtime.handle(PageEvent::DocumentReady);
        assert_eq!(
            commands,
            vec![Command::InitializeSurfaces, Command::PlayEntrance]
        );
        assert_eq!(runtime.phase(), LifecyclePhase::Idle);

        assert!(runtime.handle(PageEvent::DocumentReady).is_empty());
    }

    #[test]
    fn test_unload_before_ready_does_not_skip_setup() {
        let mut runtime = NavRuntime::new(TransitionConfig::default());
        runtime.handle(PageEvent::BeforeUnload);
        assert_eq!(runtime.phase(), LifecyclePhase::HiddenForUnload);
        assert!(!runtime.is_initialized());

        // 离开提示被取消，文档继续解析
        let commands = runtime.handle(PageEvent::DocumentReady);
        assert_eq!(
            commands,
            vec![Command::InitializeSurfaces, Command::PlayEntrance]
        );
        assert_eq!(runtime.phase(), LifecyclePhase::Idle);
        assert_eq!(runtime.overlay(), Visibility::Hidden);
    }

    #[test]
    fn test_load_before_ready_performs_setup() {
        let mut runtime = NavRuntime::new(TransitionConfig::default());
        let commands = runtime.handle(PageEvent::Load);
        assert_eq!(
            commands,
            vec![Command::InitializeSurfaces, Command::PlayEntrance]
        );
    }

    #[test]
    fn test_load_after_entrance_has_nothing_to_hide() {
        let mut runtime = ready_runtime(InterceptPolicy::NonBlocking);
        assert!(runtime.handle(PageEvent::Load).is_empty());
    }

    #[test]
    fn test_unload_shows_overlay_once() {
        let mut runtime = ready_runtime(InterceptPolicy::NonBlocking);

        assert_eq!(
            runtime.handle(PageEvent::BeforeUnload),
            vec![Command::ShowOverlay]
        );
        assert!(runtime.handle(PageEvent::PageHide).is_empty());
        assert_eq!(runtime.phase(), LifecyclePhase::HiddenForUnload);
    }

    #[test]
    fn test_load_hides_overlay_after_dismissed_unload() {
        let mut runtime = ready_runtime(InterceptPolicy::NonBlocking);
        runtime.handle(PageEvent::BeforeUnload);

        assert_eq!(runtime.handle(PageEvent::Load), vec![Command::HideOverlay]);
        assert_eq!(runtime.phase(), LifecyclePhase::Idle);
    }

    #[test]
    fn test_page_show_policy_a_always_replays() {
        let mut runtime = ready_runtime(InterceptPolicy::NonBlocking);
        runtime.handle(PageEvent::PageHide);

        assert_eq!(
            runtime.handle(PageEvent::page_show(false)),
            vec![Command::PlayEntrance]
        );
        assert_eq!(runtime.phase(), LifecyclePhase::Idle);
        assert_eq!(runtime.overlay(), Visibility::Hidden);
    }

    #[test]
    fn test_page_show_policy_b_checks_persisted() {
        let mut runtime = ready_runtime(InterceptPolicy::Blocking);

        assert!(runtime.handle(PageEvent::page_show(false)).is_empty());

        runtime.handle(PageEvent::PageHide);
        assert_eq!(
            runtime.handle(PageEvent::page_show(true)),
            vec![Command::PlayEntrance]
        );
        assert_eq!(runtime.phase(), LifecyclePhase::Idle);
    }

    #[test]
    fn test_page_show_invalidates_tickets() {
        let mut runtime = ready_runtime(InterceptPolicy::Blocking);
        let before = runtime.ticket();
        runtime.handle(PageEvent::page_show(true));
        assert!(runtime.ticket() > before);
    }
}
