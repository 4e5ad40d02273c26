//! # 通用工具模块
//!
//! - `path` - 数据目录与配置文件路径
//! - `time` - UTC 时间戳格式化

pub mod path;
pub mod time;
