//! # 回放集成测试
//!
//! 通过文件读取轨迹和配置，验证完整回放流程。

use std::fs;

use host_cli::{Step, load_config, load_trace, replay};
use nav_runtime::{Command, InterceptPolicy, LifecyclePhase, OpenMode};
use tempfile::TempDir;

const TRACE: &str = r#"{
    "regions": [".header", ".sidebar", ".container"],
    "origin": "https://maps.example.org",
    "steps": [
        { "Event": "DocumentReady" },
        { "Event": "Load" },
        { "Event": { "Activation": { "kind": "Anchor", "destination": "https://maps.example.org/about" } } },
        { "Advance": { "ms": 300 } },
        { "Event": "BeforeUnload" },
        { "Event": "PageHide" },
        { "Event": { "PageShow": { "persisted": true } } }
    ]
}"#;

fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_replay_blocking_trace_from_files() {
    let dir = TempDir::new().unwrap();
    let trace_path = write(&dir, "trace.json", TRACE);
    let config_path = write(
        &dir,
        "config.json",
        r#"{ "policy": "blocking", "navigation_delay_ms": 250 }"#,
    );

    let config = load_config(Some(config_path.as_path())).unwrap();
    assert_eq!(config.policy, InterceptPolicy::Blocking);

    let trace = load_trace(&trace_path).unwrap();
    assert_eq!(trace.steps[3], Step::Advance { ms: 300 });

    let report = replay(&trace, config);

    // 同源绝对地址被拦截
    let click = &report.steps[2];
    assert!(click.default_cancelled);
    assert!(click.commands.contains(&Command::ShowOverlay));

    assert_eq!(report.navigations.len(), 1);
    assert_eq!(report.navigations[0].at_ms, 250);
    assert_eq!(report.navigations[0].mode, OpenMode::SameTab);
    assert_eq!(report.navigations[0].url, "https://maps.example.org/about");

    // 从往返缓存恢复后遮罩收起
    assert_eq!(report.phase, LifecyclePhase::Idle);
    assert_eq!(report.surfaces.overlay_opacity, Some(0.0));
    assert_eq!(report.surfaces.spinner_opacity, Some(0.0));
    assert_eq!(report.surfaces.animations.len(), 4);
}

#[test]
fn test_replay_non_blocking_leaves_anchor_to_browser() {
    let dir = TempDir::new().unwrap();
    let trace_path = write(&dir, "trace.json", TRACE);

    let trace = load_trace(&trace_path).unwrap();
    let report = replay(&trace, load_config(None).unwrap());

    assert!(!report.steps[2].default_cancelled);
    assert_eq!(report.steps[2].commands[0], Command::ShowOverlay);
    assert!(report.navigations.is_empty());
}

#[test]
fn test_invalid_config_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let config_path = write(&dir, "config.json", r#"{ "overlay_opacity": 2.0 }"#);

    let err = load_config(Some(config_path.as_path())).unwrap_err();
    assert!(format!("{err:#}").contains("配置无效"));
}

#[test]
fn test_missing_trace_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let err = load_trace(&dir.path().join("missing.json")).unwrap_err();
    assert!(format!("{err:#}").contains("无法读取轨迹文件"));
}
