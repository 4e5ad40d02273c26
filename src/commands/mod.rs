//! # Tauri Command 处理模块
//!
//! 本模块包含所有注册到 Tauri 的 command 处理函数。
//! 每个子模块对应一个功能域：
//! - `settings` - 数据目录与后端配置
//! - `symptoms` - 症状分类加载、搜索与勾选
//! - `records` - 业务集合读写、诊断写入、派工与状态徽章

pub mod records;
pub mod settings;
pub mod symptoms;
