//! # Interceptor 模块
//!
//! 导航拦截：把合格的激活和编程式导航转换为遮罩 + 导航指令。
//!
//! ## 两种策略
//!
//! ```text
//! 策略 A（非阻塞）  链接:  ShowOverlay                       浏览器原生导航
//!                  按钮:  CancelDefault, ShowOverlay, Navigate
//! 策略 B（阻塞）   CancelDefault, ShowOverlay, ScheduleNavigation
//!                  ... NavigationDue -> Navigate / OpenAuxiliary, HideOverlay
//! ```
//!
//! 同页导航后会调度恢复定时器：文档迟迟没有被替换（例如响应是下载文件）时收起遮罩。

use tracing::{debug, warn};

use super::engine::NavRuntime;
use crate::command::Command;
use crate::policy::{
    self, Activation, ElementKind, Eligibility, InterceptPolicy, NavigationRequest, OpenMode,
    ProgrammaticRoute, SkipReason,
};
use crate::state::{LifecyclePhase, Ticket};

impl NavRuntime {
    pub(super) fn on_activation(&mut self, activation: &Activation, commands: &mut Vec<Command>) {
        // 遮罩层创建之前的点击交给浏览器，阶段保持不变，setup 仍在 DocumentReady 执行
        if !self.initialized {
            debug!(reason = ?SkipReason::NotReady, destination = ?activation.destination, "交给浏览器处理");
            return;
        }

        let request = match policy::evaluate(activation, self.config.policy, self.origin.as_deref())
        {
            Eligibility::Intercept(request) => request,
            Eligibility::Skip(reason) => {
                debug!(?reason, destination = ?activation.destination, "交给浏览器处理");
                return;
            }
        };

        // 策略 A 下的链接由浏览器自己导航
        let native = activation.kind == ElementKind::Anchor
            && self.config.policy == InterceptPolicy::NonBlocking;

        if self.phase.is_transitioning() {
            debug!(url = %request.url, "导航进行中，忽略重复激活");
            if !native {
                commands.push(Command::CancelDefault);
            }
            return;
        }

        if native {
            self.show_overlay(commands);
            self.phase = LifecyclePhase::Transitioning;
            self.schedule_recovery(commands);
            return;
        }

        commands.push(Command::CancelDefault);
        self.start_transition(request, commands);
    }

    pub(super) fn on_navigate_to(&mut self, request: NavigationRequest, commands: &mut Vec<Command>) {
        match policy::route_programmatic(request, &self.config, self.origin.as_deref()) {
            ProgrammaticRoute::Ignore => debug!("空的导航目标，忽略"),
            ProgrammaticRoute::Passthrough(request) | ProgrammaticRoute::Direct(request) => {
                debug!(url = %request.url, "直接导航，不显示遮罩");
                commands.push(Command::navigation(&request));
            }
            ProgrammaticRoute::Transition(request) if !self.initialized => {
                debug!(url = %request.url, "遮罩层尚未创建，直接导航");
                commands.push(Command::navigation(&request));
            }
            ProgrammaticRoute::Transition(request) => {
                if self.phase.is_transitioning() {
                    debug!(url = %request.url, "导航进行中，忽略重复请求");
                    return;
                }
                self.start_transition(request, commands);
            }
        }
    }

    pub(super) fn on_navigation_due(
        &mut self,
        ticket: Ticket,
        request: NavigationRequest,
        commands: &mut Vec<Command>,
    ) {
        if ticket != self.ticket || !self.phase.is_transitioning() {
            debug!(ticket, current = self.ticket, "过期的导航定时器，忽略");
            return;
        }
        self.dispatch(request, commands);
    }

    pub(super) fn on_recovery_due(&mut self, ticket: Ticket, commands: &mut Vec<Command>) {
        let stuck = matches!(
            self.phase,
            LifecyclePhase::Transitioning | LifecyclePhase::HiddenForUnload
        );
        if ticket != self.ticket || !stuck {
            return;
        }

        warn!(
            timeout_ms = self.config.recovery_timeout_ms,
            "导航超时未完成，收起遮罩"
        );
        self.hide_overlay(commands);
        self.phase = LifecyclePhase::Idle;
    }

    /// 显示遮罩，然后按策略立即导航或延迟导航
    fn start_transition(&mut self, request: NavigationRequest, commands: &mut Vec<Command>) {
        self.show_overlay(commands);
        self.phase = LifecyclePhase::Transitioning;

        match self.config.policy {
            InterceptPolicy::NonBlocking => self.dispatch(request, commands),
            InterceptPolicy::Blocking => {
                let ticket = self.next_ticket();
                debug!(url = %request.url, ticket, "调度延迟导航");
                commands.push(Command::ScheduleNavigation {
                    ticket,
                    request,
                    delay_ms: self.config.navigation_delay_ms,
                });
            }
        }
    }

    /// 执行导航
    ///
    /// 同页导航保持遮罩（文档即将被替换）；新标签页打开后收起遮罩。
    fn dispatch(&mut self, request: NavigationRequest, commands: &mut Vec<Command>) {
        commands.push(Command::navigation(&request));

        match request.mode {
            OpenMode::SameTab => self.schedule_recovery(commands),
            OpenMode::NewTab => {
                self.hide_overlay(commands);
                self.phase = LifecyclePhase::Idle;
            }
        }
    }

    fn schedule_recovery(&mut self, commands: &mut Vec<Command>) {
        let delay_ms = self.config.recovery_timeout_ms;
        if delay_ms == 0 {
            return;
        }
        let ticket = self.next_ticket();
        commands.push(Command::ScheduleRecovery { ticket, delay_ms });
    }
}
