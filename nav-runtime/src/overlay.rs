//! # Overlay 模块
//!
//! 过渡遮罩控制器：管理全屏遮罩层和居中的加载指示器，切换它们的透明度，
//! 并在页面可见时播放入场动画。
//!
//! ## 设计说明
//!
//! - 控制器只通过 [`SurfaceBackend`] 接触文档，浏览器和无头环境各自实现
//! - 遮罩层、区域缺失一律静默忽略，调用方不需要检查初始化是否成功
//! - 控制器在启动时创建一次，由 Host 持有，不从任意调用点按 id 查找

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{EntranceConfig, TransitionConfig};
use crate::state::Visibility;

/// 遮罩层标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SurfaceId {
    /// 全屏遮罩
    Overlay,
    /// 加载指示器
    Spinner,
}

impl SurfaceId {
    pub const ALL: [SurfaceId; 2] = [SurfaceId::Overlay, SurfaceId::Spinner];
}

/// 入场动画效果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntranceEffect {
    /// 原地淡入
    FadeIn,
    /// 自下而上滑入
    SlideInUp,
    /// 自上而下滑入
    SlideInDown,
}

impl EntranceEffect {
    /// 对应的关键帧名称
    pub fn keyframes(self) -> &'static str {
        match self {
            Self::FadeIn => "fadeIn",
            Self::SlideInUp => "slideInUp",
            Self::SlideInDown => "slideInDown",
        }
    }
}

/// 文档后端
///
/// 浏览器中由 DOM 实现，测试和命令行中由内存文档实现。
/// 所有方法对缺失的元素都是静默空操作。
pub trait SurfaceBackend {
    /// 遮罩层是否已存在
    fn has_surface(&self, id: SurfaceId) -> bool;

    /// 创建遮罩层（初始透明）
    fn create_surface(&mut self, id: SurfaceId);

    /// 设置遮罩层透明度
    fn set_opacity(&mut self, id: SurfaceId, opacity: f32);

    /// 动画定义（关键帧）是否已注入
    fn effects_installed(&self) -> bool;

    /// 注入动画定义
    fn install_effects(&mut self);

    /// 区域是否存在
    fn has_region(&self, selector: &str) -> bool;

    /// 对区域播放入场动画
    fn animate_region(&mut self, selector: &str, effect: EntranceEffect, delay_ms: u64);

    /// 给页面根元素加上入场 class
    fn mark_entering(&mut self, class: &str);
}

/// 入场动画结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntranceReport {
    /// 实际播放了动画的区域选择器
    pub animated: Vec<String>,
    /// 是否使用了整页淡入
    pub used_fallback: bool,
}

/// 过渡遮罩控制器
pub struct OverlayController<B: SurfaceBackend> {
    backend: B,
    /// 显示时的遮罩透明度
    opacity: f32,
    entrance: EntranceConfig,
    overlay: Visibility,
    spinner: Visibility,
}

impl<B: SurfaceBackend> OverlayController<B> {
    /// 创建控制器（不会立即创建遮罩层，见 [`Self::initialize`]）
    pub fn new(backend: B, config: &TransitionConfig) -> Self {
        Self {
            backend,
            opacity: config.overlay_opacity,
            entrance: config.entrance.clone(),
            overlay: Visibility::Hidden,
            spinner: Visibility::Hidden,
        }
    }

    /// 创建遮罩层并注入动画定义
    ///
    /// 幂等：已存在的遮罩层跳过，动画定义每个页面只注入一次。
    /// 返回本次新建的遮罩层数量。
    pub fn initialize(&mut self) -> usize {
        let mut created = 0;
        for id in SurfaceId::ALL {
            if !self.backend.has_surface(id) {
                self.backend.create_surface(id);
                *self.visibility_mut(id) = Visibility::Hidden;
                created += 1;
            }
        }

        if !self.backend.effects_installed() {
            self.backend.install_effects();
        }

        debug!(created, "遮罩层初始化完成");
        created
    }

    /// 显示遮罩：遮罩半透明，加载指示器完全可见
    pub fn show(&mut self) {
        self.apply(SurfaceId::Overlay, self.opacity, Visibility::Visible);
        self.apply(SurfaceId::Spinner, 1.0, Visibility::Visible);
    }

    /// 隐藏遮罩：两者透明度归零，元素保留以便再次显示
    pub fn hide(&mut self) {
        self.apply(SurfaceId::Overlay, 0.0, Visibility::Hidden);
        self.apply(SurfaceId::Spinner, 0.0, Visibility::Hidden);
    }

    /// 播放入场动画
    ///
    /// 先隐藏遮罩，避免遮住入场动画；具名区域一个都没找到时，
    /// 对备用区域做整页淡入。
    pub fn play_entrance(&mut self) -> EntranceReport {
        self.hide();
        self.backend.mark_entering(&self.entrance.entering_class);

        let mut report = EntranceReport::default();
        for region in &self.entrance.regions {
            if self.backend.has_region(&region.selector) {
                self.backend
                    .animate_region(&region.selector, region.effect, region.delay_ms);
                report.animated.push(region.selector.clone());
            }
        }

        if report.animated.is_empty() {
            let fallback = &self.entrance.fallback;
            if self.backend.has_region(&fallback.selector) {
                self.backend
                    .animate_region(&fallback.selector, fallback.effect, fallback.delay_ms);
                report.animated.push(fallback.selector.clone());
            }
            report.used_fallback = true;
        }

        debug!(animated = ?report.animated, fallback = report.used_fallback, "入场动画");
        report
    }

    /// 遮罩层当前可见性
    pub fn visibility(&self, id: SurfaceId) -> Visibility {
        match id {
            SurfaceId::Overlay => self.overlay,
            SurfaceId::Spinner => self.spinner,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    fn visibility_mut(&mut self, id: SurfaceId) -> &mut Visibility {
        match id {
            SurfaceId::Overlay => &mut self.overlay,
            SurfaceId::Spinner => &mut self.spinner,
        }
    }

    fn apply(&mut self, id: SurfaceId, opacity: f32, visibility: Visibility) {
        if !self.backend.has_surface(id) {
            return;
        }
        self.backend.set_opacity(id, opacity);
        *self.visibility_mut(id) = visibility;
    }
}

impl<B: SurfaceBackend> std::fmt::Debug for OverlayController<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayController")
            .field("overlay", &self.overlay)
            .field("spinner", &self.spinner)
            .field("opacity", &self.opacity)
            .finish()
    }
}
