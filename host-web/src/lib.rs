//! # Host Web
//!
//! 页面过渡增强的浏览器宿主，编译为 wasm32 后由页面以 ES module 加载。
//!
//! ## 职责
//!
//! - 监听 `click`、`DOMContentLoaded`、`load`、`pageshow`、`pagehide`、`beforeunload`
//! - 把原生事件转换为 [`PageEvent`] 交给 [`NavRuntime`]
//! - 用 web-sys 执行返回的 [`nav_runtime::Command`]，并用 `setTimeout` 调度定时器
//! - 向页面脚本导出 `navigateTo(url, newTab?)`
//!
//! ## 配置
//!
//! ```html
//! <script type="application/json" id="page-transitions-config">
//!   { "policy": "blocking", "navigation_delay_ms": 250 }
//! </script>
//! ```

pub mod dom;
pub mod error;
pub mod events;
pub mod executor;
pub mod logging;
pub mod style;

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use nav_runtime::{
    MarkerConfig, NavRuntime, NavigationRequest, OpenMode, OverlayController, PageEvent,
    TransitionConfig,
};
use tracing::{debug, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Event, Window};

pub use error::{HostError, HostResult};

use dom::DomSurfaces;
use events::Listener;
use executor::{CommandExecutor, Scheduled};

/// 页面内配置脚本的 id
pub const CONFIG_ELEMENT_ID: &str = "page-transitions-config";

thread_local! {
    static HOST: RefCell<Option<Rc<WebHost>>> = const { RefCell::new(None) };
}

/// 浏览器宿主
struct WebHost {
    window: Window,
    runtime: RefCell<NavRuntime>,
    executor: RefCell<CommandExecutor>,
    /// 分发进行中到达的事件（例如导航时同步触发的 `beforeunload`）
    backlog: RefCell<VecDeque<PageEvent>>,
    dispatching: Cell<bool>,
    markers: MarkerConfig,
    listeners: RefCell<Vec<Listener>>,
}

impl WebHost {
    fn new(window: Window, document: Document, config: TransitionConfig) -> Self {
        let origin = window.location().origin().ok();
        let markers = config.markers.clone();
        let surfaces = DomSurfaces::new(document, &config);
        let overlay = OverlayController::new(surfaces, &config);

        let mut runtime = NavRuntime::new(config);
        if let Some(origin) = origin {
            runtime = runtime.with_origin(origin);
        }

        Self {
            executor: RefCell::new(CommandExecutor::new(window.clone(), overlay)),
            window,
            runtime: RefCell::new(runtime),
            backlog: RefCell::new(VecDeque::new()),
            dispatching: Cell::new(false),
            markers,
            listeners: RefCell::new(Vec::new()),
        }
    }

    /// 分发页面事件
    ///
    /// `native` 是对应的原生事件，只有激活事件需要（用于 `CancelDefault`）。
    fn dispatch(self: &Rc<Self>, event: PageEvent, native: Option<&Event>) {
        if self.dispatching.replace(true) {
            debug!(?event, "分发进行中，事件排队");
            self.backlog.borrow_mut().push_back(event);
            return;
        }

        self.run(event, native);
        loop {
            let next = self.backlog.borrow_mut().pop_front();
            let Some(event) = next else {
                break;
            };
            self.run(event, None);
        }

        self.dispatching.set(false);
    }

    fn run(self: &Rc<Self>, event: PageEvent, native: Option<&Event>) {
        let commands = self.runtime.borrow_mut().handle(event);
        let mut executor = self.executor.borrow_mut();
        for command in &commands {
            if let Some(scheduled) = executor.execute(command, native) {
                self.schedule(scheduled);
            }
        }
    }

    fn schedule(self: &Rc<Self>, scheduled: Scheduled) {
        let Scheduled { delay_ms, event } = scheduled;
        let host = Rc::downgrade(self);
        let callback = Closure::once_into_js(move || {
            if let Some(host) = Weak::upgrade(&host) {
                host.dispatch(event, None);
            }
        });

        let timeout = i32::try_from(delay_ms).unwrap_or(i32::MAX);
        if let Err(err) = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), timeout)
        {
            warn!(delay_ms, error = ?err, "定时器调度失败");
        }
    }

    /// 注册全部页面事件监听器
    fn install_listeners(self: &Rc<Self>, document: &Document) -> HostResult<()> {
        let mut listeners = Vec::new();

        let host = Rc::downgrade(self);
        listeners.push(events::listen(document, "click", move |event| {
            let Some(host) = host.upgrade() else {
                return;
            };
            if let Some(activation) = events::activation_from_event(&event, &host.markers) {
                host.dispatch(PageEvent::activation(activation), Some(&event));
            }
        })?);

        let host = Rc::downgrade(self);
        listeners.push(events::listen(document, "DOMContentLoaded", move |_| {
            if let Some(host) = host.upgrade() {
                host.dispatch(PageEvent::DocumentReady, None);
            }
        })?);

        let lifecycle: [(&str, fn(&Event) -> PageEvent); 4] = [
            ("load", |_| PageEvent::Load),
            ("pageshow", |event| PageEvent::page_show(events::is_persisted(event))),
            ("pagehide", |_| PageEvent::PageHide),
            ("beforeunload", |_| PageEvent::BeforeUnload),
        ];
        for (name, convert) in lifecycle {
            let host = Rc::downgrade(self);
            listeners.push(events::listen(&self.window, name, move |event| {
                if let Some(host) = host.upgrade() {
                    host.dispatch(convert(&event), None);
                }
            })?);
        }

        self.listeners.borrow_mut().extend(listeners);
        Ok(())
    }
}

/// 读取页面内配置，缺失时使用默认值
fn read_config(document: &Document) -> (TransitionConfig, Option<String>) {
    let Some(text) = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content())
    else {
        return (TransitionConfig::default(), None);
    };

    match TransitionConfig::from_json(&text) {
        Ok(config) => (config, None),
        Err(err) => (TransitionConfig::default(), Some(err.to_string())),
    }
}

fn boot() -> HostResult<()> {
    let window = web_sys::window().ok_or(HostError::NoWindow)?;
    let document = window.document().ok_or(HostError::NoDocument)?;

    let (config, config_error) = read_config(&document);
    logging::init(&config.log_level);
    if let Some(err) = config_error {
        warn!(error = %err, "页面配置无效，使用默认配置");
    }
    info!(policy = ?config.policy, "页面过渡已启用");

    let host = Rc::new(WebHost::new(window, document.clone(), config));
    host.install_listeners(&document)?;
    HOST.with(|slot| *slot.borrow_mut() = Some(host.clone()));

    // 脚本执行时文档可能已经就绪，此时不会再收到 DOMContentLoaded
    if document.ready_state() != "loading" {
        host.dispatch(PageEvent::DocumentReady, None);
    }
    Ok(())
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(err) = boot() {
        web_sys::console::warn_1(&format!("页面过渡未启用: {err}").into());
    }
}

/// 编程式导航，供页面脚本调用
///
/// 代替直接改写 `location.href`：同源地址走过渡流程，
/// `blob:`/`data:`/`javascript:` 等放行 scheme 直接导航。
#[wasm_bindgen(js_name = navigateTo)]
pub fn navigate_to(url: String, new_tab: Option<bool>) {
    let mode = if new_tab.unwrap_or(false) {
        OpenMode::NewTab
    } else {
        OpenMode::SameTab
    };
    let request = NavigationRequest { url, mode };

    let host = HOST.with(|slot| slot.borrow().clone());
    match host {
        Some(host) => host.dispatch(PageEvent::navigate_to(request), None),
        None => {
            // 宿主未启动时直接导航，保证调用方不丢失跳转
            let Some(window) = web_sys::window() else {
                return;
            };
            let result = match request.mode {
                OpenMode::SameTab => window.location().assign(&request.url),
                OpenMode::NewTab => window
                    .open_with_url_and_target(&request.url, "_blank")
                    .map(|_| ()),
            };
            if let Err(err) = result {
                web_sys::console::warn_1(&err);
            }
        }
    }
}
