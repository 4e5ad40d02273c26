//! # 设置和配置 Tauri Commands
//!
//! - `get_data_path` - 获取 `~/.garage-dashboard/` 路径
//! - `read_config` / `save_config` - 读写后端配置

use tauri::State;

use crate::models::settings::AppConfig;
use crate::services::cache::AppCache;
use crate::services::config;
use crate::utils::path;

/// 获取看板数据目录的绝对路径
///
/// # 错误
/// 如果无法确定用户主目录，返回错误信息
#[tauri::command]
pub async fn get_data_path() -> Result<String, String> {
    let path = path::get_data_path()?;
    Ok(path.to_string_lossy().to_string())
}

/// 读取后端配置，文件不存在时返回默认配置
#[tauri::command]
pub async fn read_config() -> Result<AppConfig, String> {
    let data_dir = path::get_data_path()?;
    config::read_config(&data_dir).await
}

/// 保存后端配置
///
/// 症状分类路径可能已改变，保存后清空分类缓存，下次加载时重新读取。
#[tauri::command]
pub async fn save_config(config: AppConfig, cache: State<'_, AppCache>) -> Result<(), String> {
    let data_dir = path::get_data_path()?;
    config::save_config(&data_dir, &config).await?;
    cache.invalidate_taxonomy();
    Ok(())
}
