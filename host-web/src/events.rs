//! # Events 模块
//!
//! 把浏览器原生事件转换为语义化的 [`nav_runtime::PageEvent`] 输入。
//!
//! 点击在 document 的冒泡阶段处理，元素自身的处理器先执行，
//! 因此已被其他脚本取消的事件能被识别出来并原样放过。

use nav_runtime::{Activation, ElementKind, MarkerConfig};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event, EventTarget, MouseEvent, Node, PageTransitionEvent};

use crate::error::HostResult;

/// 已注册的事件监听器，需要在页面生命周期内保持存活
pub type Listener = Closure<dyn FnMut(Event)>;

/// 在目标上注册监听器
pub fn listen<F>(target: &EventTarget, name: &str, handler: F) -> HostResult<Listener>
where
    F: FnMut(Event) + 'static,
{
    let closure = Listener::new(handler);
    target.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
    Ok(closure)
}

/// 激活元素的选择器：带 `href` 的链接，或带导航标记的按钮
pub fn activation_selector(markers: &MarkerConfig) -> String {
    format!("a[href], button[{}]", markers.trigger)
}

/// 从点击事件中提取激活信息
///
/// 点击不在链接或导航按钮内时返回 `None`。
pub fn activation_from_event(event: &Event, markers: &MarkerConfig) -> Option<Activation> {
    let target = event.target()?;
    let origin = match target.dyn_ref::<Element>() {
        Some(element) => element.clone(),
        // 文本节点
        None => target.dyn_ref::<Node>()?.parent_element()?,
    };
    let element = origin.closest(&activation_selector(markers)).ok()??;

    let mut activation =
        activation_from_attributes(&element.tag_name(), markers, |name| element.get_attribute(name));
    activation.modified = is_modified_click(event);
    activation.default_prevented = event.default_prevented();
    Some(activation)
}

/// 按元素标签和属性构造激活信息
///
/// `attribute` 按属性名返回属性值，属性不存在时返回 `None`。
/// 按钮的导航标记值为空时，改用备用目标属性。
pub fn activation_from_attributes(
    tag_name: &str,
    markers: &MarkerConfig,
    attribute: impl Fn(&str) -> Option<String>,
) -> Activation {
    let kind = if tag_name.eq_ignore_ascii_case("a") {
        ElementKind::Anchor
    } else {
        ElementKind::TriggerButton
    };

    let (destination, target) = match kind {
        ElementKind::Anchor => (attribute("href"), attribute("target")),
        ElementKind::TriggerButton => {
            let destination = attribute(&markers.trigger)
                .filter(|value| !value.trim().is_empty())
                .or_else(|| attribute(&markers.destination));
            (destination, attribute(&markers.open_mode))
        }
    };

    Activation {
        kind,
        destination,
        target,
        opted_out: attribute(&markers.opt_out).is_some(),
        modified: false,
        default_prevented: false,
    }
}

/// 修饰键或非主键点击
fn is_modified_click(event: &Event) -> bool {
    let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
        return false;
    };
    mouse.ctrl_key() || mouse.meta_key() || mouse.shift_key() || mouse.alt_key() || mouse.button() != 0
}

/// `pageshow` 是否来自往返缓存
pub fn is_persisted(event: &Event) -> bool {
    event
        .dyn_ref::<PageTransitionEvent>()
        .is_some_and(PageTransitionEvent::persisted)
}
