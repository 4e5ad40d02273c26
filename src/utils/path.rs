//! # 路径工具函数
//!
//! 提供与文件路径相关的工具函数：
//! - 获取看板数据目录路径（`~/.garage-dashboard/`）
//! - 获取配置文件路径

use std::path::{Path, PathBuf};

/// 数据目录名称（位于用户主目录下）
const DATA_DIR_NAME: &str = ".garage-dashboard";

/// 获取看板数据目录的绝对路径
///
/// 所有集合数据、症状分类资源和配置文件都存放在用户主目录下的
/// `.garage-dashboard` 文件夹中。使用 `dirs` crate 获取跨平台的主目录路径。
///
/// # 错误
/// 如果无法确定用户主目录（如无 HOME 环境变量），返回错误信息。
///
/// # 示例
/// - Windows: `C:\Users\username\.garage-dashboard`
/// - Linux/macOS: `/home/username/.garage-dashboard`
pub fn get_data_path() -> Result<PathBuf, String> {
    let home = dirs::home_dir().ok_or_else(|| "无法获取用户主目录".to_string())?;
    Ok(home.join(DATA_DIR_NAME))
}

/// 配置文件路径：`<data_dir>/config.json`
pub fn config_file_path(data_dir: &Path) -> PathBuf {
    data_dir.join("config.json")
}
