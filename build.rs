//! # Garage Dashboard - Cargo 构建脚本
//!
//! 仅在启用 `desktop` 特性时调用 `tauri_build::build()`，
//! 生成 Tauri 运行时所需的资源绑定代码（读取 `tauri.conf.json`）。
//! 纯库构建（服务层与测试）不需要 Tauri 的任何构建产物。

fn main() {
    #[cfg(feature = "desktop")]
    tauri_build::build();
}
