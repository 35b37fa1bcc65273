//! # Style 模块
//!
//! 遮罩层、加载指示器和入场动画的样式文本。
//! 样式只是表现层，不属于正确性约定；透明度切换依赖这里的 `transition`。

use nav_runtime::EntranceEffect;

/// 注入的 `<style>` 元素 id
pub const EFFECTS_STYLE_ID: &str = "page-transition-effects";

/// 入场动画时长
const ENTRANCE_DURATION: &str = "0.5s";

pub const OVERLAY_CSS: &str = "position: fixed; top: 0; left: 0; width: 100%; height: 100%; \
    background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); opacity: 0; \
    pointer-events: none; z-index: 99999; \
    transition: opacity 0.4s cubic-bezier(0.4, 0, 0.2, 1);";

pub const SPINNER_CSS: &str = "position: fixed; top: 50%; left: 50%; \
    transform: translate(-50%, -50%); width: 50px; height: 50px; \
    border: 4px solid rgba(255, 255, 255, 0.3); border-top-color: white; \
    border-radius: 50%; animation: spin 1s linear infinite; opacity: 0; \
    pointer-events: none; z-index: 100000; transition: opacity 0.3s ease;";

const KEYFRAMES_CSS: &str = r#"
@keyframes spin {
    to { transform: translate(-50%, -50%) rotate(360deg); }
}

@keyframes fadeIn {
    from { opacity: 0; }
    to { opacity: 1; }
}

@keyframes slideInUp {
    from { opacity: 0; transform: translateY(20px); }
    to { opacity: 1; transform: translateY(0); }
}

@keyframes slideInDown {
    from { opacity: 0; transform: translateY(-20px); }
    to { opacity: 1; transform: translateY(0); }
}
"#;

/// 动画定义样式表，入场 class 由配置决定
pub fn effects_css(entering_class: &str) -> String {
    format!(
        "{KEYFRAMES_CSS}\nbody.{entering_class} {{\n    animation: fadeIn {ENTRANCE_DURATION} ease-out forwards;\n}}\n"
    )
}

/// 生成区域的 `animation` 属性值
///
/// 有延迟的区域使用 `backwards` 填充，保证延迟期间停在起始帧。
pub fn entrance_animation(effect: EntranceEffect, delay_ms: u64) -> String {
    if delay_ms == 0 {
        return format!("{} {ENTRANCE_DURATION} ease-out", effect.keyframes());
    }
    let delay = delay_ms as f64 / 1000.0;
    format!(
        "{} {ENTRANCE_DURATION} ease-out {delay}s backwards",
        effect.keyframes()
    )
}

/// 透明度的 CSS 文本
pub fn opacity_value(opacity: f32) -> String {
    format!("{}", opacity.clamp(0.0, 1.0))
}
