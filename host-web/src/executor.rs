//! # Executor 模块
//!
//! 把 Runtime 产生的 [`Command`] 翻译为 DOM 调用。
//!
//! 定时器不在这里调度：执行器只返回 [`Scheduled`]，由宿主决定如何回传到期事件，
//! 这样执行过程中不会持有任何对宿主自身的借用。

use nav_runtime::{Command, OverlayController, PageEvent};
use tracing::{debug, info, warn};
use web_sys::{Event, Window};

use crate::dom::DomSurfaces;

/// 需要宿主调度的定时事件
#[derive(Debug, Clone, PartialEq)]
pub struct Scheduled {
    pub delay_ms: u64,
    pub event: PageEvent,
}

/// Command 执行器
pub struct CommandExecutor {
    window: Window,
    overlay: OverlayController<DomSurfaces>,
}

impl CommandExecutor {
    pub fn new(window: Window, overlay: OverlayController<DomSurfaces>) -> Self {
        Self { window, overlay }
    }

    /// 执行单条指令
    ///
    /// `event` 是触发本批指令的原生事件；`CancelDefault` 只作用于它。
    pub fn execute(&mut self, command: &Command, event: Option<&Event>) -> Option<Scheduled> {
        match command {
            Command::InitializeSurfaces => {
                let created = self.overlay.initialize();
                debug!(created, "遮罩层就绪");
            }
            Command::PlayEntrance => {
                let report = self.overlay.play_entrance();
                debug!(
                    animated = ?report.animated,
                    fallback = report.used_fallback,
                    "播放入场动画"
                );
            }
            Command::ShowOverlay => self.overlay.show(),
            Command::HideOverlay => self.overlay.hide(),
            Command::CancelDefault => match event {
                Some(event) => event.prevent_default(),
                None => warn!("CancelDefault 没有对应的事件"),
            },
            Command::ScheduleNavigation {
                ticket,
                request,
                delay_ms,
            } => {
                return Some(Scheduled {
                    delay_ms: *delay_ms,
                    event: PageEvent::NavigationDue {
                        ticket: *ticket,
                        request: request.clone(),
                    },
                });
            }
            Command::ScheduleRecovery { ticket, delay_ms } => {
                return Some(Scheduled {
                    delay_ms: *delay_ms,
                    event: PageEvent::RecoveryDue { ticket: *ticket },
                });
            }
            Command::Navigate { url } => {
                info!(%url, "导航");
                if let Err(err) = self.window.location().assign(url) {
                    warn!(%url, error = ?err, "导航失败");
                }
            }
            Command::OpenAuxiliary { url } => {
                info!(%url, "新标签页打开");
                match self.window.open_with_url_and_target(url, "_blank") {
                    Ok(Some(_)) => {}
                    Ok(None) => warn!(%url, "新窗口被浏览器拦截"),
                    Err(err) => warn!(%url, error = ?err, "打开新窗口失败"),
                }
            }
        }
        None
    }
}
