//! # 业务逻辑服务模块
//!
//! 包含核心业务逻辑的实现，与 Tauri command 层解耦：
//! - `taxonomy` - 症状分类加载、叶子展开与搜索
//! - `selector` - 单个症状选择器的会话状态（加载、浏览/搜索、勾选、展开）
//! - `cache` - 症状分类的内存缓存与预计算搜索索引
//! - `config` - 后端配置文件读写
//! - `store` - 本地 JSON 集合存储与仓储接口
//! - `workshop` - 工单诊断写入、技师指派等记录操作

pub mod cache;
pub mod config;
pub mod selector;
pub mod store;
pub mod taxonomy;
pub mod workshop;
