//! # Headless 模块
//!
//! 不依赖浏览器的 Host 实现：内存文档 + 虚拟时钟。
//!
//! 用于集成测试和命令行回放，执行链路与浏览器 Host 相同：
//! `PageEvent -> NavRuntime -> Command -> OverlayController`。

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::command::Command;
use crate::config::TransitionConfig;
use crate::input::PageEvent;
use crate::overlay::{EntranceEffect, OverlayController, SurfaceBackend, SurfaceId};
use crate::policy::{NavigationRequest, OpenMode};
use crate::runtime::NavRuntime;

/// 一次区域动画记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionAnimation {
    pub selector: String,
    pub effect: EntranceEffect,
    pub delay_ms: u64,
}

/// 内存文档
///
/// 记录遮罩层的创建次数和透明度、动画定义注入次数、区域动画和根元素 class。
#[derive(Debug, Clone, Default)]
pub struct MemorySurfaces {
    opacities: BTreeMap<SurfaceId, f32>,
    created: BTreeMap<SurfaceId, usize>,
    effects_installs: usize,
    regions: BTreeSet<String>,
    animations: Vec<RegionAnimation>,
    classes: BTreeSet<String>,
}

impl MemorySurfaces {
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建包含指定布局区域的文档
    pub fn with_regions<I, S>(regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            regions: regions.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// 遮罩层透明度，遮罩层不存在时为 `None`
    pub fn opacity(&self, id: SurfaceId) -> Option<f32> {
        self.opacities.get(&id).copied()
    }

    pub fn create_count(&self, id: SurfaceId) -> usize {
        self.created.get(&id).copied().unwrap_or(0)
    }

    pub fn effects_install_count(&self) -> usize {
        self.effects_installs
    }

    pub fn animations(&self) -> &[RegionAnimation] {
        &self.animations
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }
}

impl SurfaceBackend for MemorySurfaces {
    fn has_surface(&self, id: SurfaceId) -> bool {
        self.opacities.contains_key(&id)
    }

    fn create_surface(&mut self, id: SurfaceId) {
        self.opacities.insert(id, 0.0);
        *self.created.entry(id).or_default() += 1;
    }

    fn set_opacity(&mut self, id: SurfaceId, opacity: f32) {
        if let Some(value) = self.opacities.get_mut(&id) {
            *value = opacity;
        }
    }

    fn effects_installed(&self) -> bool {
        self.effects_installs > 0
    }

    fn install_effects(&mut self) {
        self.effects_installs += 1;
    }

    fn has_region(&self, selector: &str) -> bool {
        self.regions.contains(selector)
    }

    fn animate_region(&mut self, selector: &str, effect: EntranceEffect, delay_ms: u64) {
        if self.has_region(selector) {
            self.animations.push(RegionAnimation {
                selector: selector.to_string(),
                effect,
                delay_ms,
            });
        }
    }

    fn mark_entering(&mut self, class: &str) {
        self.classes.insert(class.to_string());
    }
}

/// 一次导航记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationRecord {
    /// 虚拟时钟时间（毫秒）
    pub at_ms: u64,
    pub url: String,
    pub mode: OpenMode,
}

/// 一次分发的结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dispatch {
    /// Runtime 产生的指令（含定时器到期时级联产生的）
    pub commands: Vec<Command>,
    /// 激活事件的默认行为是否被取消
    pub default_cancelled: bool,
}

#[derive(Debug, Clone)]
struct PendingTimer {
    due_ms: u64,
    event: PageEvent,
}

/// 无头 Host
#[derive(Debug)]
pub struct HeadlessHost {
    runtime: NavRuntime,
    overlay: OverlayController<MemorySurfaces>,
    clock_ms: u64,
    timers: Vec<PendingTimer>,
    navigations: Vec<NavigationRecord>,
}

impl HeadlessHost {
    pub fn new(config: TransitionConfig, surfaces: MemorySurfaces) -> Self {
        let overlay = OverlayController::new(surfaces, &config);
        Self {
            runtime: NavRuntime::new(config),
            overlay,
            clock_ms: 0,
            timers: Vec::new(),
            navigations: Vec::new(),
        }
    }

    /// 设置当前文档的源
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.runtime = self.runtime.with_origin(origin);
        self
    }

    /// 分发一个页面事件并执行产生的指令
    pub fn dispatch(&mut self, event: PageEvent) -> Dispatch {
        let commands = self.runtime.handle(event);
        let mut dispatch = Dispatch::default();
        for command in &commands {
            self.execute(command, &mut dispatch);
        }
        dispatch.commands = commands;
        dispatch
    }

    /// 推进虚拟时钟，按到期顺序触发定时器
    pub fn advance(&mut self, ms: u64) -> Vec<Command> {
        let target = self.clock_ms.saturating_add(ms);
        let mut commands = Vec::new();

        loop {
            let next = self
                .timers
                .iter()
                .enumerate()
                .filter(|(_, t)| t.due_ms <= target)
                .min_by_key(|(_, t)| t.due_ms)
                .map(|(i, _)| i);
            let Some(index) = next else {
                break;
            };

            let timer = self.timers.remove(index);
            self.clock_ms = timer.due_ms;
            commands.extend(self.dispatch(timer.event).commands);
        }

        self.clock_ms = target;
        commands
    }

    fn execute(&mut self, command: &Command, dispatch: &mut Dispatch) {
        match command {
            Command::InitializeSurfaces => {
                self.overlay.initialize();
            }
            Command::PlayEntrance => {
                self.overlay.play_entrance();
            }
            Command::ShowOverlay => self.overlay.show(),
            Command::HideOverlay => self.overlay.hide(),
            Command::CancelDefault => dispatch.default_cancelled = true,
            Command::ScheduleNavigation {
                ticket,
                request,
                delay_ms,
            } => self.schedule(
                *delay_ms,
                PageEvent::NavigationDue {
                    ticket: *ticket,
                    request: request.clone(),
                },
            ),
            Command::ScheduleRecovery { ticket, delay_ms } => {
                self.schedule(*delay_ms, PageEvent::RecoveryDue { ticket: *ticket })
            }
            Command::Navigate { url } => self.record(NavigationRequest::same_tab(url.as_str())),
            Command::OpenAuxiliary { url } => self.record(NavigationRequest::new_tab(url.as_str())),
        }
    }

    fn schedule(&mut self, delay_ms: u64, event: PageEvent) {
        self.timers.push(PendingTimer {
            due_ms: self.clock_ms.saturating_add(delay_ms),
            event,
        });
    }

    fn record(&mut self, request: NavigationRequest) {
        self.navigations.push(NavigationRecord {
            at_ms: self.clock_ms,
            url: request.url,
            mode: request.mode,
        });
    }

    pub fn runtime(&self) -> &NavRuntime {
        &self.runtime
    }

    pub fn overlay(&self) -> &OverlayController<MemorySurfaces> {
        &self.overlay
    }

    pub fn surfaces(&self) -> &MemorySurfaces {
        self.overlay.backend()
    }

    pub fn navigations(&self) -> &[NavigationRecord] {
        &self.navigations
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }
}
