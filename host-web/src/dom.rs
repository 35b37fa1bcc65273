//! # Dom 模块
//!
//! 基于 web-sys 的文档后端，实现 [`SurfaceBackend`]。
//!
//! 后端方法不返回错误：DOM 调用失败时记录警告并跳过，页面保持原生行为。

use nav_runtime::{EntranceEffect, SurfaceBackend, SurfaceConfig, SurfaceId, TransitionConfig};
use tracing::warn;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use crate::error::{HostError, HostResult};
use crate::style::{self, EFFECTS_STYLE_ID, OVERLAY_CSS, SPINNER_CSS};

/// 真实文档
pub struct DomSurfaces {
    document: Document,
    surfaces: SurfaceConfig,
    entering_class: String,
}

impl DomSurfaces {
    pub fn new(document: Document, config: &TransitionConfig) -> Self {
        Self {
            document,
            surfaces: config.surfaces.clone(),
            entering_class: config.entrance.entering_class.clone(),
        }
    }

    fn id(&self, id: SurfaceId) -> &str {
        match id {
            SurfaceId::Overlay => &self.surfaces.overlay_id,
            SurfaceId::Spinner => &self.surfaces.spinner_id,
        }
    }

    fn html_element(&self, id: &str) -> Option<HtmlElement> {
        self.document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    }

    /// 遮罩层挂在 body 上；body 尚不存在时挂在根元素上
    fn mount_point(&self) -> HostResult<Element> {
        if let Some(body) = self.document.body() {
            return Ok(body.into());
        }
        self.document.document_element().ok_or(HostError::NoDocument)
    }

    fn try_create(&self, id: SurfaceId) -> HostResult<()> {
        let element = self.document.create_element("div")?;
        element.set_id(self.id(id));
        let css = match id {
            SurfaceId::Overlay => OVERLAY_CSS,
            SurfaceId::Spinner => SPINNER_CSS,
        };
        element.set_attribute("style", css)?;
        self.mount_point()?.append_child(&element)?;
        Ok(())
    }

    fn try_install_effects(&self) -> HostResult<()> {
        let style = self.document.create_element("style")?;
        style.set_id(EFFECTS_STYLE_ID);
        style.set_text_content(Some(&style::effects_css(&self.entering_class)));
        match self.document.head() {
            Some(head) => head.append_child(&style)?,
            None => self.mount_point()?.append_child(&style)?,
        };
        Ok(())
    }

    fn try_animate(&self, selector: &str, effect: EntranceEffect, delay_ms: u64) -> HostResult<()> {
        let Some(element) = self.document.query_selector(selector)? else {
            return Ok(());
        };
        let Ok(element) = element.dyn_into::<HtmlElement>() else {
            return Ok(());
        };
        element
            .style()
            .set_property("animation", &style::entrance_animation(effect, delay_ms))?;
        Ok(())
    }

    fn try_mark_entering(&self, class: &str) -> HostResult<()> {
        let body = self.document.body().ok_or(HostError::NoDocument)?;
        body.class_list().add_1(class)?;
        Ok(())
    }
}

/// 记录 DOM 调用失败
fn report(result: HostResult<()>, action: &str) {
    if let Err(err) = result {
        warn!(action, error = %err, "DOM 操作失败");
    }
}

impl SurfaceBackend for DomSurfaces {
    fn has_surface(&self, id: SurfaceId) -> bool {
        self.document.get_element_by_id(self.id(id)).is_some()
    }

    fn create_surface(&mut self, id: SurfaceId) {
        report(self.try_create(id), "create_surface");
    }

    fn set_opacity(&mut self, id: SurfaceId, opacity: f32) {
        let Some(element) = self.html_element(self.id(id)) else {
            return;
        };
        let result = element
            .style()
            .set_property("opacity", &style::opacity_value(opacity))
            .map_err(HostError::from);
        report(result, "set_opacity");
    }

    fn effects_installed(&self) -> bool {
        self.document.get_element_by_id(EFFECTS_STYLE_ID).is_some()
    }

    fn install_effects(&mut self) {
        report(self.try_install_effects(), "install_effects");
    }

    fn has_region(&self, selector: &str) -> bool {
        matches!(self.document.query_selector(selector), Ok(Some(_)))
    }

    fn animate_region(&mut self, selector: &str, effect: EntranceEffect, delay_ms: u64) {
        report(self.try_animate(selector, effect, delay_ms), "animate_region");
    }

    fn mark_entering(&mut self, class: &str) {
        report(self.try_mark_entering(class), "mark_entering");
    }
}
