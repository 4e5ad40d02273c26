//! # 应用配置数据模型
//!
//! 定义了看板后端自身的配置（AppConfig），存储在数据目录下的 `config.json`
//! （`~/.garage-dashboard/config.json`）。
//!
//! 对应前端 TypeScript 接口：
//! ```typescript
//! interface AppConfig {
//!   taxonomyPath: string | null;
//!   autoBackupEnabled: boolean;
//!   logLevel: string;
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// 随应用打包的症状分类资源（相对于 Tauri 资源目录，见 `tauri.conf.json` 的 `bundle.resources`）
pub const BUNDLED_TAXONOMY_RESOURCE: &str = "assets/symptoms.json";

/// 看板后端配置
///
/// 所有字段都有默认值，配置文件缺失字段时使用默认值补齐。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    /// 自定义症状分类 JSON 路径；为空时使用随应用打包的资源，相对路径按数据目录解析
    pub taxonomy_path: Option<String>,

    /// 是否在覆写集合前保留一份备份（`backups/<key>_<时间戳>.json`）
    pub auto_backup_enabled: bool,

    /// 日志级别："error" | "warn" | "info" | "debug" | "trace"
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            taxonomy_path: None,
            auto_backup_enabled: false,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// 解析症状分类资源的实际路径
    ///
    /// - 未配置（或为空白）：`resource_dir` 下的打包资源
    /// - 绝对路径：原样返回
    /// - 相对路径：拼接到 `data_dir` 之后
    pub fn resolve_taxonomy_path(&self, data_dir: &Path, resource_dir: &Path) -> PathBuf {
        match self.taxonomy_path.as_deref().map(str::trim) {
            None | Some("") => resource_dir.join(BUNDLED_TAXONOMY_RESOURCE),
            Some(custom) => {
                let configured = Path::new(custom);
                if configured.is_absolute() {
                    configured.to_path_buf()
                } else {
                    data_dir.join(configured)
                }
            }
        }
    }

    /// 将 `log_level` 转换为 `log::LevelFilter`，无法识别时退回 Info
    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level
            .parse()
            .unwrap_or(log::LevelFilter::Info)
    }
}
