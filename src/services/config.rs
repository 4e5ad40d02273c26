//! # 配置读写服务
//!
//! `AppConfig` 保存在 `<data_dir>/config.json`。
//! - `read_config` - 给设置页面用，解析失败会报告错误
//! - `read_config_internal` - 给后端内部用，任何失败都静默退回默认配置
//! - `save_config` - 格式化写入，目录不存在时自动创建

use std::path::Path;

use crate::models::settings::AppConfig;
use crate::utils::path;

/// 读取配置文件
///
/// 文件不存在（首次启动）时返回默认配置。
///
/// # 错误
/// 文件存在但无法读取或 JSON 解析失败时返回错误
pub async fn read_config(data_dir: &Path) -> Result<AppConfig, String> {
    let config_path = path::config_file_path(data_dir);

    if !config_path.exists() {
        return Ok(AppConfig::default());
    }

    let content = tokio::fs::read_to_string(&config_path)
        .await
        .map_err(|e| format!("读取配置文件失败: {}", e))?;

    serde_json::from_str(&content).map_err(|e| format!("解析配置文件失败: {}", e))
}

/// 内部函数：读取配置，失败时静默返回默认配置
pub async fn read_config_internal(data_dir: &Path) -> AppConfig {
    match read_config(data_dir).await {
        Ok(config) => config,
        Err(e) => {
            log::warn!("{}，使用默认配置", e);
            AppConfig::default()
        }
    }
}

/// 保存配置文件（带 2 空格缩进）
///
/// # 错误
/// 目录创建失败、序列化失败或文件写入失败时返回错误
pub async fn save_config(data_dir: &Path, config: &AppConfig) -> Result<(), String> {
    if !data_dir.exists() {
        tokio::fs::create_dir_all(data_dir)
            .await
            .map_err(|e| format!("创建数据目录失败: {}", e))?;
    }

    let content = serde_json::to_string_pretty(config)
        .map_err(|e| format!("序列化配置失败: {}", e))?;

    tokio::fs::write(path::config_file_path(data_dir), content)
        .await
        .map_err(|e| format!("写入配置文件失败: {}", e))
}
