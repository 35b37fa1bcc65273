//! # Runtime 模块
//!
//! 页面过渡核心，负责生命周期状态机和导航拦截。
//!
//! ## 模块结构
//!
//! - [`engine`]：生命周期状态机与事件分发
//! - [`interceptor`]：激活事件与编程式导航的处理

pub mod engine;
pub mod interceptor;

pub use engine::NavRuntime;
