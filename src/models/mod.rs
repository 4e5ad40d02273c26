//! # 数据模型模块
//!
//! 定义了与前端 TypeScript 类型一一对应的 Rust 数据结构。
//! 所有结构体均派生 `Serialize` / `Deserialize`，用于 Tauri IPC 传输和本地 JSON 文件读写。
//! - `symptom` - 症状分类树与已选症状集合
//! - `workshop` - 客户、车辆、工单、维修任务、技师记录
//! - `badge` - 状态值到徽章的统一映射
//! - `settings` - 后端自身配置

pub mod badge;
pub mod settings;
pub mod symptom;
pub mod workshop;
