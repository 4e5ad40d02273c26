//! # Garage Dashboard - 应用核心初始化模块
//!
//! 汽修厂多角色看板（管理员 / 服务顾问 CV / 技师 KTV）的本地后端。
//! 前端负责页面与表单，本 crate 负责：
//! - 症状分类的加载、浏览、搜索与勾选状态
//! - 客户、车辆、工单、维修任务、技师等集合的本地持久化
//! - 状态徽章的统一映射
//!
//! ## 模块结构
//! - `commands/` - Tauri command 处理函数（IPC 接口层，需启用 `desktop` 特性）
//! - `models/` - 数据模型（对应前端 TypeScript 类型）
//! - `services/` - 核心业务逻辑（分类、选择器、存储、缓存）
//! - `utils/` - 通用工具函数

#[cfg(feature = "desktop")]
mod commands;
pub mod models;
pub mod services;
pub mod utils;

#[cfg(feature = "desktop")]
use services::cache::AppCache;
#[cfg(feature = "desktop")]
use services::store::StoreLock;

// `#[cfg_attr(mobile, tauri::mobile_entry_point)]`：移动端入口标记，
// 桌面端编译时不生效，`run()` 由 `main.rs` 直接调用。
#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
/// Tauri 应用启动函数
///
/// 1. 注册应用全局状态（AppCache：症状分类缓存；StoreLock：本地存储写锁）
/// 2. 注册所有自定义 Tauri commands
/// 3. 在 `setup` 钩子中按配置的日志级别注册日志插件（仅调试构建）
/// 4. 生成应用上下文并启动主事件循环
///
/// # Panics
/// 如果 Tauri 应用启动失败（例如配置文件缺失或窗口创建失败），
/// 将通过 `.expect()` 触发 panic 并输出错误信息。
pub fn run() {
    tauri::Builder::default()
        .manage(AppCache::new())
        .manage(StoreLock::new())
        .invoke_handler(tauri::generate_handler![
            // 设置和配置 commands
            commands::settings::get_data_path,
            commands::settings::read_config,
            commands::settings::save_config,
            // 症状分类 commands
            commands::symptoms::load_symptom_taxonomy,
            commands::symptoms::list_symptom_leaves,
            commands::symptoms::search_symptoms,
            commands::symptoms::search_all_symptoms,
            commands::symptoms::toggle_symptom,
            // 业务集合 commands
            commands::records::read_customers,
            commands::records::save_customers,
            commands::records::read_cars,
            commands::records::save_cars,
            commands::records::read_work_orders,
            commands::records::save_work_orders,
            commands::records::read_repair_tasks,
            commands::records::save_repair_tasks,
            commands::records::read_technicians,
            commands::records::save_technicians,
            // 诊断与派工 commands
            commands::records::attach_diagnosis,
            commands::records::assign_technician,
            commands::records::tasks_for_technician,
            commands::records::work_orders_for_customer,
            commands::records::status_badge,
            // 工单图片 commands
            commands::records::read_image_blob,
            commands::records::save_image_blob,
        ])
        .setup(|app| {
            if cfg!(debug_assertions) {
                let level = match utils::path::get_data_path() {
                    Ok(dir) => tauri::async_runtime::block_on(
                        services::config::read_config_internal(&dir),
                    )
                    .level_filter(),
                    Err(_) => log::LevelFilter::Info,
                };
                app.handle().plugin(
                    tauri_plugin_log::Builder::default()
                        .level(level)
                        .build(),
                )?;
            }
            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
