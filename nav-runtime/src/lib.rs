//! # Nav Runtime
//!
//! 页面过渡增强的核心运行时库。
//!
//! ## 架构概述
//!
//! `nav-runtime` 是纯逻辑核心，不依赖 DOM 或任何 IO。
//! 它通过 **命令驱动模式** 与宿主层（Host）通信：
//!
//! ```text
//! Host                          Runtime
//!   │                              │
//!   │──── PageEvent ─────────────►│
//!   │                              │ handle()
//!   │◄─── Vec<Command> ───────────│
//!   │                              │
//! ```
//!
//! 导航生命周期：点击 → 显示遮罩 → 开始导航 → 新文档加载 → 隐藏遮罩 → 入场动画。
//!
//! ## 核心类型
//!
//! - [`Command`]：Runtime 向 Host 发出的指令
//! - [`PageEvent`]：Host 向 Runtime 传递的页面事件
//! - [`LifecyclePhase`]：显式的生命周期状态机
//! - [`OverlayController`]：遮罩层与入场动画控制器
//! - [`TransitionConfig`]：配置
//!
//! ## 使用示例
//!
//! ```ignore
//! use nav_runtime::{NavRuntime, PageEvent, TransitionConfig};
//!
//! let mut runtime = NavRuntime::new(TransitionConfig::default());
//! let mut overlay = OverlayController::new(backend, runtime.config());
//!
//! for cmd in runtime.handle(PageEvent::DocumentReady) {
//!     match cmd {
//!         Command::InitializeSurfaces => { overlay.initialize(); }
//!         Command::PlayEntrance => { overlay.play_entrance(); }
//!         // ...
//!     }
//! }
//! ```
//!
//! ## 模块结构
//!
//! - [`command`]：Command 定义
//! - [`input`]：PageEvent 定义
//! - [`state`]：生命周期阶段与可见性
//! - [`policy`]：拦截资格判定
//! - [`overlay`]：遮罩控制器与文档后端 trait
//! - [`runtime`]：状态机与拦截器
//! - [`headless`]：内存文档与无头 Host
//! - [`config`]：配置
//! - [`error`]：错误类型定义

pub mod command;
pub mod config;
pub mod error;
pub mod headless;
pub mod input;
pub mod overlay;
pub mod policy;
pub mod runtime;
pub mod state;

// 重导出核心类型
pub use command::Command;
pub use config::{EntranceConfig, MarkerConfig, RegionEntrance, SurfaceConfig, TransitionConfig};
pub use error::{ConfigError, ConfigResult};
pub use headless::{Dispatch, HeadlessHost, MemorySurfaces, NavigationRecord, RegionAnimation};
pub use input::PageEvent;
pub use overlay::{EntranceEffect, EntranceReport, OverlayController, SurfaceBackend, SurfaceId};
pub use policy::{
    Activation, DestinationKind, ElementKind, Eligibility, InterceptPolicy, NavigationRequest,
    OpenMode, ProgrammaticRoute, SkipReason, classify_destination, evaluate,
};
pub use runtime::NavRuntime;
pub use state::{LifecyclePhase, Ticket, Visibility};
