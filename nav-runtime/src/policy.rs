//! # Policy 模块
//!
//! 拦截资格判定：决定一次链接/按钮激活交给浏览器原生处理，还是走过渡流程。
//!
//! ## 资格条件
//!
//! 1. 元素是带目标的链接，或带导航标记和目标的按钮
//! 2. 链接没有显式的打开目标（阻塞策略下 `_blank` 走新标签页路径）
//! 3. 元素没有排除标记
//! 4. 目标不是空、不是片段引用、不是外部地址
//! 5. 普通主键点击，且没有被其他处理器取消过

use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::TransitionConfig;

/// 拦截策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterceptPolicy {
    /// 策略 A：不取消默认导航，只同步显示遮罩，历史记录完全交给浏览器
    #[default]
    NonBlocking,
    /// 策略 B：取消默认导航，显示遮罩，延迟后由脚本发起导航
    Blocking,
}

/// 打开方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpenMode {
    /// 当前标签页（替换文档）
    SameTab,
    /// 新的辅助窗口/标签页
    NewTab,
}

impl OpenMode {
    /// 从 `target` 属性解析打开方式
    ///
    /// 空值和 `_self` 为当前页，`_blank` 为新标签页，
    /// 其它具名目标（`_top`、`_parent`、frame 名）返回 `None`。
    pub fn from_target(target: Option<&str>) -> Option<Self> {
        match target.map(str::trim) {
            None | Some("") => Some(Self::SameTab),
            Some(t) if t.eq_ignore_ascii_case("_self") => Some(Self::SameTab),
            Some(t) if t.eq_ignore_ascii_case("_blank") => Some(Self::NewTab),
            Some(_) => None,
        }
    }
}

/// 导航请求
///
/// 每次激活时创建，立即被消费；Runtime 不保存它。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationRequest {
    /// 目标地址（保持作者写的原样）
    pub url: String,
    /// 打开方式
    pub mode: OpenMode,
}

impl NavigationRequest {
    pub fn same_tab(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            mode: OpenMode::SameTab,
        }
    }

    pub fn new_tab(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            mode: OpenMode::NewTab,
        }
    }
}

/// 被激活的元素类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementKind {
    /// `<a href>`
    Anchor,
    /// 带导航标记的 `<button>`
    TriggerButton,
}

/// 一次激活事件的平台无关快照
///
/// Host 从点击事件中提取这些字段，Runtime 只看快照，不接触 DOM。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activation {
    /// 元素类型
    pub kind: ElementKind,
    /// 跳转目标（链接的 `href`，或按钮的导航标记值）
    pub destination: Option<String>,
    /// 打开目标（链接的 `target`，或按钮的打开方式属性）
    #[serde(default)]
    pub target: Option<String>,
    /// 是否带排除标记
    #[serde(default)]
    pub opted_out: bool,
    /// 是否按下了修饰键或使用了非主键
    #[serde(default)]
    pub modified: bool,
    /// 事件是否已被其他处理器取消
    #[serde(default)]
    pub default_prevented: bool,
}

impl Activation {
    /// 创建链接激活
    pub fn anchor(href: impl Into<String>) -> Self {
        Self {
            kind: ElementKind::Anchor,
            destination: Some(href.into()),
            target: None,
            opted_out: false,
            modified: false,
            default_prevented: false,
        }
    }

    /// 创建导航按钮激活
    pub fn trigger_button(destination: impl Into<String>) -> Self {
        Self {
            kind: ElementKind::TriggerButton,
            ..Self::anchor(destination)
        }
    }

    /// 设置打开目标
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// 标记为排除
    pub fn with_opt_out(mut self) -> Self {
        self.opted_out = true;
        self
    }

    /// 标记为带修饰键的点击
    pub fn with_modifier(mut self) -> Self {
        self.modified = true;
        self
    }
}

/// 跳转目标分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationKind {
    /// 空字符串
    Empty,
    /// 片段引用（`#` 开头）
    Fragment,
    /// 外部地址（带 scheme、或协议相对地址，且不同源）
    External,
    /// 站内地址
    Internal,
}

/// 跳过拦截的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// 遮罩层尚未创建（文档仍在解析）
    NotReady,
    /// 事件已被其他处理器取消
    DefaultPrevented,
    /// 带修饰键或非主键点击（浏览器自有语义）
    ModifiedClick,
    /// 带排除标记
    OptedOut,
    /// 没有跳转目标
    NoDestination,
    /// 片段引用
    Fragment,
    /// 外部地址
    External,
    /// 显式打开目标（新窗口或具名 frame）
    ExplicitTarget,
}

/// 资格判定结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Eligibility {
    /// 走过渡流程
    Intercept(NavigationRequest),
    /// 交给浏览器
    Skip(SkipReason),
}

/// 编程式导航的路由结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgrammaticRoute {
    /// 放行 scheme（blob/data 等），直接导航，不显示遮罩
    Passthrough(NavigationRequest),
    /// 不合格的目标（外部地址、片段），直接导航，不显示遮罩
    Direct(NavigationRequest),
    /// 与链接拦截相同的过渡流程
    Transition(NavigationRequest),
    /// 空目标，什么都不做
    Ignore,
}

/// 对跳转目标分类
///
/// `origin` 为当前文档的源（如 `https://example.com`）。
/// 提供时，同源的绝对地址视为站内地址。
pub fn classify_destination(destination: &str, origin: Option<&str>) -> DestinationKind {
    let destination = destination.trim();

    if destination.is_empty() {
        return DestinationKind::Empty;
    }
    if destination.starts_with('#') {
        return DestinationKind::Fragment;
    }

    let absolute = match Url::parse(destination) {
        Ok(url) => Some(url),
        // 协议相对地址：借当前源补全后再比较
        Err(_) if destination.starts_with("//") => origin
            .and_then(|o| Url::parse(o).ok())
            .and_then(|base| base.join(destination).ok()),
        Err(_) => return DestinationKind::Internal,
    };

    match absolute {
        Some(url) if is_same_origin(&url, origin) => DestinationKind::Internal,
        _ => DestinationKind::External,
    }
}

fn is_same_origin(url: &Url, origin: Option<&str>) -> bool {
    let Some(origin) = origin else {
        return false;
    };
    let url_origin = url.origin();
    url_origin.is_tuple() && url_origin.ascii_serialization() == origin.trim_end_matches('/')
}

/// 判定一次激活是否走过渡流程
pub fn evaluate(
    activation: &Activation,
    policy: InterceptPolicy,
    origin: Option<&str>,
) -> Eligibility {
    if activation.default_prevented {
        return Eligibility::Skip(SkipReason::DefaultPrevented);
    }
    if activation.modified {
        return Eligibility::Skip(SkipReason::ModifiedClick);
    }
    if activation.opted_out {
        return Eligibility::Skip(SkipReason::OptedOut);
    }

    let Some(destination) = activation.destination.as_deref() else {
        return Eligibility::Skip(SkipReason::NoDestination);
    };

    match classify_destination(destination, origin) {
        DestinationKind::Empty => return Eligibility::Skip(SkipReason::NoDestination),
        DestinationKind::Fragment => return Eligibility::Skip(SkipReason::Fragment),
        DestinationKind::External => return Eligibility::Skip(SkipReason::External),
        DestinationKind::Internal => {}
    }

    let target = activation.target.as_deref();
    let mode = match (activation.kind, policy) {
        // 按钮没有原生导航，两种策略都接管 `_blank`
        (ElementKind::TriggerButton, _) => match OpenMode::from_target(target) {
            Some(OpenMode::NewTab) => OpenMode::NewTab,
            _ => OpenMode::SameTab,
        },
        (ElementKind::Anchor, InterceptPolicy::NonBlocking) => {
            if target.is_some_and(|t| !t.trim().is_empty()) {
                return Eligibility::Skip(SkipReason::ExplicitTarget);
            }
            OpenMode::SameTab
        }
        (ElementKind::Anchor, InterceptPolicy::Blocking) => match OpenMode::from_target(target) {
            Some(mode) => mode,
            None => return Eligibility::Skip(SkipReason::ExplicitTarget),
        },
    };

    Eligibility::Intercept(NavigationRequest {
        url: destination.trim().to_string(),
        mode,
    })
}

/// 路由编程式导航
pub fn route_programmatic(
    request: NavigationRequest,
    config: &TransitionConfig,
    origin: Option<&str>,
) -> ProgrammaticRoute {
    let passthrough = Url::parse(request.url.trim())
        .ok()
        .is_some_and(|url| config.is_passthrough_scheme(url.scheme()));
    if passthrough {
        return ProgrammaticRoute::Passthrough(request);
    }

    match classify_destination(&request.url, origin) {
        DestinationKind::Empty => ProgrammaticRoute::Ignore,
        DestinationKind::Fragment | DestinationKind::External => ProgrammaticRoute::Direct(request),
        DestinationKind::Internal => ProgrammaticRoute::Transition(request),
    }
}
