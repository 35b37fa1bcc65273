//! # Config 模块
//!
//! 页面过渡配置，集中管理所有可调项。
//!
//! ## 配置来源
//!
//! - 浏览器：页面内 `<script type="application/json" id="page-transitions-config">`
//! - 命令行：`--config <file>`
//! - 默认值（缺省字段一律回退到默认值；未提供配置时整体使用默认值）

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::overlay::EntranceEffect;
use crate::policy::InterceptPolicy;

/// 页面过渡配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionConfig {
    /// 拦截策略（非阻塞 / 阻塞），二选一，不混用
    #[serde(default)]
    pub policy: InterceptPolicy,

    /// 阻塞策略下，显示遮罩到真正跳转之间的延迟（毫秒）
    #[serde(default = "default_navigation_delay_ms")]
    pub navigation_delay_ms: u64,

    /// 同页跳转后文档迟迟未被替换时，自动收起遮罩的超时（毫秒），0 表示关闭
    #[serde(default = "default_recovery_timeout_ms")]
    pub recovery_timeout_ms: u64,

    /// 遮罩显示时的透明度 (0.0 - 1.0)
    #[serde(default = "default_overlay_opacity")]
    pub overlay_opacity: f32,

    /// 遮罩层与加载指示器的元素 id
    #[serde(default)]
    pub surfaces: SurfaceConfig,

    /// 作者可写在元素上的标记属性
    #[serde(default)]
    pub markers: MarkerConfig,

    /// 入场动画配置
    #[serde(default)]
    pub entrance: EntranceConfig,

    /// 直接放行、不做过渡处理的 URI scheme（小写，不含冒号）
    #[serde(default = "default_passthrough_schemes")]
    pub passthrough_schemes: Vec<String>,

    /// 日志级别（trace/debug/info/warn/error）
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// 遮罩层元素配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceConfig {
    /// 遮罩层 id
    #[serde(default = "default_overlay_id")]
    pub overlay_id: String,

    /// 加载指示器 id
    #[serde(default = "default_spinner_id")]
    pub spinner_id: String,
}

/// 标记属性配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerConfig {
    /// 排除标记：带此属性的链接/按钮不做拦截
    #[serde(default = "default_opt_out_marker")]
    pub opt_out: String,

    /// 导航按钮标记，属性值即跳转目标
    #[serde(default = "default_trigger_marker")]
    pub trigger: String,

    /// 导航按钮的备用目标属性（`trigger` 属性值为空时使用）
    #[serde(default = "default_destination_marker")]
    pub destination: String,

    /// 导航按钮的打开方式属性（`_blank` 表示新标签页）
    #[serde(default = "default_open_mode_marker")]
    pub open_mode: String,
}

/// 单个区域的入场动画
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionEntrance {
    /// CSS 选择器
    pub selector: String,
    /// 动画效果
    pub effect: EntranceEffect,
    /// 动画延迟（毫秒），用于错开各区域
    #[serde(default)]
    pub delay_ms: u64,
}

impl RegionEntrance {
    pub fn new(selector: impl Into<String>, effect: EntranceEffect, delay_ms: u64) -> Self {
        Self {
            selector: selector.into(),
            effect,
            delay_ms,
        }
    }
}

/// 入场动画配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntranceConfig {
    /// 具名布局区域，按顺序错开播放
    #[serde(default = "default_entrance_regions")]
    pub regions: Vec<RegionEntrance>,

    /// 没有找到任何具名区域时使用的整页淡入
    #[serde(default = "default_entrance_fallback")]
    pub fallback: RegionEntrance,

    /// 入场期间加在页面根元素上的 class
    #[serde(default = "default_entering_class")]
    pub entering_class: String,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            policy: InterceptPolicy::default(),
            navigation_delay_ms: default_navigation_delay_ms(),
            recovery_timeout_ms: default_recovery_timeout_ms(),
            overlay_opacity: default_overlay_opacity(),
            surfaces: SurfaceConfig::default(),
            markers: MarkerConfig::default(),
            entrance: EntranceConfig::default(),
            passthrough_schemes: default_passthrough_schemes(),
            log_level: default_log_level(),
        }
    }
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            overlay_id: default_overlay_id(),
            spinner_id: default_spinner_id(),
        }
    }
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            opt_out: default_opt_out_marker(),
            trigger: default_trigger_marker(),
            destination: default_destination_marker(),
            open_mode: default_open_mode_marker(),
        }
    }
}

impl Default for EntranceConfig {
    fn default() -> Self {
        Self {
            regions: default_entrance_regions(),
            fallback: default_entrance_fallback(),
            entering_class: default_entering_class(),
        }
    }
}

// 默认值函数
fn default_navigation_delay_ms() -> u64 {
    300
}

fn default_recovery_timeout_ms() -> u64 {
    8000
}

fn default_overlay_opacity() -> f32 {
    0.7
}

fn default_overlay_id() -> String {
    "page-transition-overlay".to_string()
}

fn default_spinner_id() -> String {
    "page-loading-spinner".to_string()
}

fn default_opt_out_marker() -> String {
    "data-no-transition".to_string()
}

fn default_trigger_marker() -> String {
    "data-navigate".to_string()
}

fn default_destination_marker() -> String {
    "data-href".to_string()
}

fn default_open_mode_marker() -> String {
    "data-target".to_string()
}

fn default_entrance_regions() -> Vec<RegionEntrance> {
    vec![
        RegionEntrance::new(".header", EntranceEffect::SlideInDown, 100),
        RegionEntrance::new(".sidebar", EntranceEffect::SlideInUp, 200),
    ]
}

fn default_entrance_fallback() -> RegionEntrance {
    RegionEntrance::new(".container", EntranceEffect::FadeIn, 0)
}

fn default_entering_class() -> String {
    "page-entering".to_string()
}

fn default_passthrough_schemes() -> Vec<String> {
    vec!["blob".to_string(), "data".to_string(), "javascript".to_string()]
}

fn default_log_level() -> String {
    "info".to_string()
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl TransitionConfig {
    /// 从 JSON 文本解析并验证配置
    pub fn from_json(text: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// 验证配置有效性
    pub fn validate(&self) -> ConfigResult<()> {
        if !(0.0..=1.0).contains(&self.overlay_opacity) {
            return Err(ConfigError::Validation(
                "遮罩透明度必须在 0.0 - 1.0 之间".to_string(),
            ));
        }

        if self.surfaces.overlay_id.is_empty() || self.surfaces.spinner_id.is_empty() {
            return Err(ConfigError::Validation("遮罩层 id 不能为空".to_string()));
        }

        if self.surfaces.overlay_id == self.surfaces.spinner_id {
            return Err(ConfigError::Validation(format!(
                "遮罩层与加载指示器不能共用 id: {}",
                self.surfaces.overlay_id
            )));
        }

        let markers = [
            &self.markers.opt_out,
            &self.markers.trigger,
            &self.markers.destination,
            &self.markers.open_mode,
        ];
        if markers.iter().any(|m| m.is_empty()) {
            return Err(ConfigError::Validation("标记属性名不能为空".to_string()));
        }

        let selectors = self
            .entrance
            .regions
            .iter()
            .chain(std::iter::once(&self.entrance.fallback));
        for region in selectors {
            if region.selector.trim().is_empty() {
                return Err(ConfigError::Validation("入场区域选择器不能为空".to_string()));
            }
        }

        let class = &self.entrance.entering_class;
        if class.is_empty() || class.contains(|c: char| c.is_whitespace() || c == '.') {
            return Err(ConfigError::Validation(format!(
                "入场 class 必须是单个 class 名: {class:?}"
            )));
        }

        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ConfigError::Validation(format!(
                "未知日志级别: {}",
                self.log_level
            )));
        }

        Ok(())
    }

    /// 判断 scheme 是否直接放行
    pub fn is_passthrough_scheme(&self, scheme: &str) -> bool {
        self.passthrough_schemes
            .iter()
            .any(|s| s.eq_ignore_ascii_case(scheme))
    }
}
