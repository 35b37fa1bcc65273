//! # 导航生命周期集成测试
//!
//! 测试 PageEvent → NavRuntime → Command → OverlayController 的完整链路。
//! 使用内存文档和虚拟时钟，不依赖浏览器。

use nav_runtime::{
    Activation, Command, EntranceEffect, HeadlessHost, InterceptPolicy, LifecyclePhase,
    MemorySurfaces, OpenMode, PageEvent, SurfaceId, TransitionConfig,
};

const ORIGIN: &str = "https://maps.example.org";

/// 创建已完成初始化的无头 Host
fn booted_host(policy: InterceptPolicy) -> HeadlessHost {
    let config = TransitionConfig {
        policy,
        ..TransitionConfig::default()
    };
    let surfaces = MemorySurfaces::with_regions([".header", ".sidebar", ".container"]);
    let mut host = HeadlessHost::new(config, surfaces).with_origin(ORIGIN);
    host.dispatch(PageEvent::DocumentReady);
    host.dispatch(PageEvent::Load);
    host
}

fn overlay_opacity(host: &HeadlessHost) -> (Option<f32>, Option<f32>) {
    (
        host.surfaces().opacity(SurfaceId::Overlay),
        host.surfaces().opacity(SurfaceId::Spinner),
    )
}

/// 测试启动流程：创建遮罩层并播放入场动画
#[test]
fn test_boot_sequence() {
    let host = booted_host(InterceptPolicy::NonBlocking);

    assert_eq!(host.runtime().phase(), LifecyclePhase::Idle);
    assert_eq!(overlay_opacity(&host), (Some(0.0), Some(0.0)));
    assert_eq!(host.surfaces().create_count(SurfaceId::Overlay), 1);
    assert!(host.surfaces().has_class("page-entering"));

    let effects: Vec<_> = host
        .surfaces()
        .animations()
        .iter()
        .map(|a| (a.selector.as_str(), a.effect))
        .collect();
    assert_eq!(
        effects,
        vec![
            (".header", EntranceEffect::SlideInDown),
            (".sidebar", EntranceEffect::SlideInUp),
        ]
    );
}

/// 文档解析期间的点击不会阻止遮罩层创建
#[test]
fn test_click_before_document_ready_keeps_setup() {
    for policy in [InterceptPolicy::NonBlocking, InterceptPolicy::Blocking] {
        let config = TransitionConfig {
            policy,
            ..TransitionConfig::default()
        };
        let surfaces = MemorySurfaces::with_regions([".header", ".sidebar"]);
        let mut host = HeadlessHost::new(config, surfaces).with_origin(ORIGIN);

        let button = Activation::trigger_button("/dashboard").with_target("_blank");
        let early = host.dispatch(PageEvent::activation(button));
        assert!(early.commands.is_empty());
        assert!(!early.default_cancelled);
        host.advance(300);
        assert!(host.navigations().is_empty());

        host.dispatch(PageEvent::DocumentReady);
        host.dispatch(PageEvent::Load);
        assert_eq!(host.surfaces().create_count(SurfaceId::Overlay), 1);
        assert_eq!(host.surfaces().animations().len(), 2);
        assert_eq!(overlay_opacity(&host), (Some(0.0), Some(0.0)));

        let dispatch = host.dispatch(PageEvent::activation(Activation::anchor("/about")));
        assert!(dispatch.commands.contains(&Command::ShowOverlay));
        assert_eq!(overlay_opacity(&host), (Some(0.7), Some(1.0)));
    }
}

/// 场景：策略 B 下点击 `<a href="/about">`，约 300ms 后导航
#[test]
fn test_blocking_anchor_navigates_after_delay() {
    let mut host = booted_host(InterceptPolicy::Blocking);

    let dispatch = host.dispatch(PageEvent::activation(Activation::anchor("/about")));
    assert!(dispatch.default_cancelled);
    assert_eq!(overlay_opacity(&host), (Some(0.7), Some(1.0)));
    assert!(host.navigations().is_empty());

    host.advance(299);
    assert!(host.navigations().is_empty());

    host.advance(1);
    let navigations = host.navigations();
    assert_eq!(navigations.len(), 1);
    assert_eq!(navigations[0].url, "/about");
    assert_eq!(navigations[0].mode, OpenMode::SameTab);
    assert_eq!(navigations[0].at_ms, 300);

    // 同页导航不收起遮罩：文档即将被替换
    assert_eq!(overlay_opacity(&host), (Some(0.7), Some(1.0)));
}

/// 场景：策略 A 下点击 `<a href="/about">`，浏览器原生导航，遮罩同步显示
#[test]
fn test_non_blocking_anchor_leaves_navigation_to_browser() {
    let mut host = booted_host(InterceptPolicy::NonBlocking);

    let dispatch = host.dispatch(PageEvent::activation(Activation::anchor("/about")));
    assert!(!dispatch.default_cancelled);
    assert_eq!(dispatch.commands[0], Command::ShowOverlay);
    assert_eq!(overlay_opacity(&host), (Some(0.7), Some(1.0)));
    assert!(host.navigations().is_empty());
}

/// 场景：外部链接和片段链接不做任何处理
#[test]
fn test_external_and_fragment_links_untouched() {
    for policy in [InterceptPolicy::NonBlocking, InterceptPolicy::Blocking] {
        let mut host = booted_host(policy);

        for href in ["https://example.com", "#section2", "#", "//cdn.example.com/x"] {
            let dispatch = host.dispatch(PageEvent::activation(Activation::anchor(href)));
            assert!(dispatch.commands.is_empty(), "{href} should not be intercepted");
            assert!(!dispatch.default_cancelled);
        }

        let dispatch = host.dispatch(PageEvent::activation(
            Activation::anchor("/about").with_opt_out(),
        ));
        assert!(dispatch.commands.is_empty());
        assert_eq!(overlay_opacity(&host), (Some(0.0), Some(0.0)));
    }
}

/// 场景：`<button data-navigate="/dashboard" data-target="_blank">` 打开新标签页后收起遮罩
#[test]
fn test_trigger_button_new_tab_restores_overlay() {
    for policy in [InterceptPolicy::NonBlocking, InterceptPolicy::Blocking] {
        let mut host = booted_host(policy);

        let button = Activation::trigger_button("/dashboard").with_target("_blank");
        let dispatch = host.dispatch(PageEvent::activation(button));
        assert!(dispatch.default_cancelled);

        host.advance(300);

        let navigations = host.navigations();
        assert_eq!(navigations.len(), 1);
        assert_eq!(navigations[0].url, "/dashboard");
        assert_eq!(navigations[0].mode, OpenMode::NewTab);
        assert_eq!(overlay_opacity(&host), (Some(0.0), Some(0.0)));
        assert_eq!(host.runtime().phase(), LifecyclePhase::Idle);
    }
}

/// 遮罩总是先于导航显示
#[test]
fn test_overlay_shown_before_navigation() {
    for policy in [InterceptPolicy::NonBlocking, InterceptPolicy::Blocking] {
        let mut host = booted_host(policy);

        let mut commands = host
            .dispatch(PageEvent::activation(Activation::trigger_button("/regions")))
            .commands;
        commands.extend(host.advance(300));

        let show = commands.iter().position(|c| *c == Command::ShowOverlay);
        let navigate = commands.iter().position(Command::is_navigation);
        assert!(show.is_some() && navigate.is_some());
        assert!(show < navigate, "{commands:?}");
    }
}

/// 场景：从往返缓存恢复，重放入场动画，遮罩最终隐藏
#[test]
fn test_restore_from_history_cache() {
    let mut host = booted_host(InterceptPolicy::Blocking);
    let before = host.surfaces().animations().len();

    host.dispatch(PageEvent::activation(Activation::anchor("/about")));
    host.advance(300);
    host.dispatch(PageEvent::BeforeUnload);
    host.dispatch(PageEvent::PageHide);
    assert_eq!(host.runtime().phase(), LifecyclePhase::HiddenForUnload);

    host.dispatch(PageEvent::page_show(true));

    assert_eq!(host.runtime().phase(), LifecyclePhase::Idle);
    assert_eq!(overlay_opacity(&host), (Some(0.0), Some(0.0)));
    let replayed = &host.surfaces().animations()[before..];
    assert_eq!(replayed.len(), 2);
    assert_eq!(replayed[0].selector, ".header");
    assert_eq!(replayed[1].selector, ".sidebar");

    // 恢复定时器已过期，不会再次收起或触发导航
    host.advance(10_000);
    assert_eq!(host.navigations().len(), 1);
}

/// 连续点击只导航一次
#[test]
fn test_double_click_navigates_once() {
    let mut host = booted_host(InterceptPolicy::Blocking);

    host.dispatch(PageEvent::activation(Activation::anchor("/about")));
    host.advance(100);
    let second = host.dispatch(PageEvent::activation(Activation::anchor("/about")));
    assert!(second.default_cancelled);

    host.advance(1000);
    assert_eq!(host.navigations().len(), 1);
}

/// Load 不会在导航进行中收起遮罩
#[test]
fn test_load_during_pending_navigation_keeps_overlay() {
    let config = TransitionConfig {
        policy: InterceptPolicy::Blocking,
        ..TransitionConfig::default()
    };
    let mut host = HeadlessHost::new(config, MemorySurfaces::new());
    host.dispatch(PageEvent::DocumentReady);
    host.dispatch(PageEvent::activation(Activation::anchor("/about")));

    let dispatch = host.dispatch(PageEvent::Load);
    assert!(dispatch.commands.is_empty());
    assert_eq!(overlay_opacity(&host), (Some(0.7), Some(1.0)));
}

/// 下载链接不会替换文档，遮罩在超时后收起
#[test]
fn test_recovery_after_download_link() {
    let mut host = booted_host(InterceptPolicy::NonBlocking);

    host.dispatch(PageEvent::activation(Activation::anchor("/export/districts.csv")));
    host.dispatch(PageEvent::BeforeUnload);
    assert_eq!(overlay_opacity(&host), (Some(0.7), Some(1.0)));

    host.advance(8000);
    assert_eq!(overlay_opacity(&host), (Some(0.0), Some(0.0)));
    assert_eq!(host.runtime().phase(), LifecyclePhase::Idle);

    // 之后的点击照常工作
    let dispatch = host.dispatch(PageEvent::activation(Activation::anchor("/about")));
    assert_eq!(dispatch.commands[0], Command::ShowOverlay);
}

/// 编程式导航：放行 scheme 不显示遮罩
#[test]
fn test_navigate_to_passthrough_scheme() {
    let mut host = booted_host(InterceptPolicy::Blocking);

    let dispatch = host.dispatch(PageEvent::navigate_to(
        nav_runtime::NavigationRequest::same_tab("data:text/csv,a,b"),
    ));
    assert_eq!(dispatch.commands.len(), 1);
    assert_eq!(overlay_opacity(&host), (Some(0.0), Some(0.0)));
    assert_eq!(host.navigations()[0].url, "data:text/csv,a,b");
}

/// 策略 A 下导航按钮的指令序列
#[test]
fn test_non_blocking_button_command_snapshot() {
    let mut host = booted_host(InterceptPolicy::NonBlocking);

    let dispatch = host.dispatch(PageEvent::activation(Activation::trigger_button(
        "/dashboard",
    )));

    insta::assert_yaml_snapshot!(dispatch.commands, @r"
    - CancelDefault
    - ShowOverlay
    - Navigate:
        url: /dashboard
    - ScheduleRecovery:
        ticket: 1
        delay_ms: 8000
    ");
}
