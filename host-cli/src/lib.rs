//! # Host CLI
//!
//! 无头回放：把一份事件轨迹交给 [`HeadlessHost`]，输出指令序列、导航记录和最终的遮罩状态。
//!
//! ## 轨迹格式
//!
//! ```json
//! {
//!   "regions": [".header", ".sidebar"],
//!   "origin": "https://example.com",
//!   "steps": [
//!     { "Event": "DocumentReady" },
//!     { "Event": { "Activation": { "kind": "Anchor", "destination": "/about" } } },
//!     { "Advance": { "ms": 300 } }
//!   ]
//! }
//! ```

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::Context;
use nav_runtime::{
    Command, HeadlessHost, LifecyclePhase, MemorySurfaces, NavigationRecord, PageEvent,
    RegionAnimation, SurfaceId, TransitionConfig,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 事件轨迹
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    /// 文档中存在的布局区域选择器
    #[serde(default)]
    pub regions: Vec<String>,
    /// 文档的源
    #[serde(default)]
    pub origin: Option<String>,
    pub steps: Vec<Step>,
}

/// 轨迹中的一步
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Step {
    /// 分发一个页面事件
    Event(PageEvent),
    /// 推进虚拟时钟
    Advance { ms: u64 },
}

/// 单步回放结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    pub at_ms: u64,
    pub step: String,
    pub commands: Vec<Command>,
    pub default_cancelled: bool,
}

/// 遮罩层最终状态
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurfaceSnapshot {
    pub overlay_opacity: Option<f32>,
    pub spinner_opacity: Option<f32>,
    pub animations: Vec<RegionAnimation>,
}

/// 完整回放报告
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayReport {
    pub steps: Vec<StepReport>,
    pub navigations: Vec<NavigationRecord>,
    pub phase: LifecyclePhase,
    pub surfaces: SurfaceSnapshot,
}

impl Trace {
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        serde_json::from_str(text).context("轨迹格式无效")
    }
}

/// 读取轨迹文件
pub fn load_trace(path: &Path) -> anyhow::Result<Trace> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("无法读取轨迹文件: {}", path.display()))?;
    Trace::from_json(&text).with_context(|| format!("解析失败: {}", path.display()))
}

/// 读取配置文件；未指定时使用默认配置
pub fn load_config(path: Option<&Path>) -> anyhow::Result<TransitionConfig> {
    let Some(path) = path else {
        return Ok(TransitionConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("无法读取配置文件: {}", path.display()))?;
    TransitionConfig::from_json(&text).with_context(|| format!("配置无效: {}", path.display()))
}

/// 回放轨迹
pub fn replay(trace: &Trace, config: TransitionConfig) -> ReplayReport {
    let surfaces = MemorySurfaces::with_regions(trace.regions.iter().cloned());
    let mut host = HeadlessHost::new(config, surfaces);
    if let Some(origin) = &trace.origin {
        host = host.with_origin(origin.clone());
    }

    let mut steps = Vec::with_capacity(trace.steps.len());
    for step in &trace.steps {
        let at_ms = host.clock_ms();
        let report = match step {
            Step::Event(event) => {
                let dispatch = host.dispatch(event.clone());
                StepReport {
                    at_ms,
                    step: describe_event(event),
                    commands: dispatch.commands,
                    default_cancelled: dispatch.default_cancelled,
                }
            }
            Step::Advance { ms } => StepReport {
                at_ms,
                step: format!("advance {ms}ms"),
                commands: host.advance(*ms),
                default_cancelled: false,
            },
        };
        debug!(step = %report.step, commands = report.commands.len(), "回放");
        steps.push(report);
    }

    let surfaces = host.surfaces();
    ReplayReport {
        steps,
        navigations: host.navigations().to_vec(),
        phase: host.runtime().phase(),
        surfaces: SurfaceSnapshot {
            overlay_opacity: surfaces.opacity(SurfaceId::Overlay),
            spinner_opacity: surfaces.opacity(SurfaceId::Spinner),
            animations: surfaces.animations().to_vec(),
        },
    }
}

fn describe_event(event: &PageEvent) -> String {
    match event {
        PageEvent::Activation(activation) => format!(
            "{:?} {}",
            activation.kind,
            activation.destination.as_deref().unwrap_or("<none>")
        ),
        PageEvent::NavigateTo(request) => format!("navigate_to {} ({:?})", request.url, request.mode),
        other => format!("{other:?}"),
    }
}

/// 渲染为人类可读的文本
pub fn render_text(report: &ReplayReport) -> String {
    let mut out = String::new();

    for (index, step) in report.steps.iter().enumerate() {
        let _ = writeln!(out, "[{index:>3}] t={}ms  {}", step.at_ms, step.step);
        if step.default_cancelled {
            let _ = writeln!(out, "      (默认行为已取消)");
        }
        for command in &step.commands {
            let _ = writeln!(out, "      -> {command:?}");
        }
    }

    let _ = writeln!(out, "\n导航:");
    if report.navigations.is_empty() {
        let _ = writeln!(out, "  (无)");
    }
    for nav in &report.navigations {
        let _ = writeln!(out, "  t={}ms {:?} {}", nav.at_ms, nav.mode, nav.url);
    }

    let fmt_opacity = |value: Option<f32>| match value {
        Some(v) => format!("{v}"),
        None => "-".to_string(),
    };
    let _ = writeln!(out, "\n最终状态: {:?}", report.phase);
    let _ = writeln!(
        out,
        "  遮罩透明度 {} / 加载指示器 {}",
        fmt_opacity(report.surfaces.overlay_opacity),
        fmt_opacity(report.surfaces.spinner_opacity)
    );
    let _ = writeln!(out, "  入场动画 {} 次", report.surfaces.animations.len());

    out
}
