//! # 状态徽章映射
//!
//! 看板几乎每个页面都要把状态值映射为"标签 + 颜色"的徽章。
//! 这里用枚举上的穷尽 `match` 表达映射，所有页面共用一个查找函数
//! [`badge_of`]，未知值统一落到 [`UNKNOWN_BADGE`]。
//!
//! 本地存储里的旧数据可能含有任意字符串，[`badge_for_raw`] 先按 serde 规则
//! 解析为枚举，解析失败同样返回默认徽章。

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::models::workshop::{RepairTaskStatus, Role, ServiceCategory, WorkOrderStatus};

/// 徽章色调，前端据此选择配色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Neutral,
    Info,
    Warning,
    Success,
    Danger,
}

/// 徽章：显示文本 + 色调
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub label: &'static str,
    pub tone: Tone,
}

/// 未知或缺失值的默认徽章
pub const UNKNOWN_BADGE: Badge = Badge {
    label: "Không xác định",
    tone: Tone::Neutral,
};

/// 可映射为徽章的值
pub trait Badged {
    fn badge(&self) -> Badge;
}

const fn badge(label: &'static str, tone: Tone) -> Badge {
    Badge { label, tone }
}

impl Badged for Role {
    fn badge(&self) -> Badge {
        match self {
            Role::Admin => badge("Quản trị", Tone::Danger),
            Role::Cv => badge("Cố vấn dịch vụ", Tone::Info),
            Role::Ktv => badge("Kỹ thuật viên", Tone::Success),
        }
    }
}

impl Badged for WorkOrderStatus {
    fn badge(&self) -> Badge {
        match self {
            WorkOrderStatus::Pending => badge("Chờ tiếp nhận", Tone::Neutral),
            WorkOrderStatus::Diagnosing => badge("Đang chẩn đoán", Tone::Info),
            WorkOrderStatus::Quoted => badge("Đã báo giá", Tone::Warning),
            WorkOrderStatus::InProgress => badge("Đang sửa chữa", Tone::Info),
            WorkOrderStatus::Completed => badge("Hoàn thành", Tone::Success),
            WorkOrderStatus::Delivered => badge("Đã giao xe", Tone::Success),
            WorkOrderStatus::Cancelled => badge("Đã hủy", Tone::Danger),
        }
    }
}

impl Badged for RepairTaskStatus {
    fn badge(&self) -> Badge {
        match self {
            RepairTaskStatus::Unassigned => badge("Chưa phân công", Tone::Warning),
            RepairTaskStatus::Assigned => badge("Đã phân công", Tone::Info),
            RepairTaskStatus::InProgress => badge("Đang thực hiện", Tone::Info),
            RepairTaskStatus::Done => badge("Xong", Tone::Success),
        }
    }
}

impl Badged for ServiceCategory {
    fn badge(&self) -> Badge {
        match self {
            ServiceCategory::Cleaning => badge("Vệ sinh", Tone::Neutral),
            ServiceCategory::Mechanical => badge("Cơ khí", Tone::Info),
            ServiceCategory::Electrical => badge("Điện", Tone::Warning),
            ServiceCategory::Painting => badge("Đồng sơn", Tone::Danger),
            ServiceCategory::Cooling => badge("Điều hòa", Tone::Success),
        }
    }
}

/// 通用徽章查找：`None` 返回 [`UNKNOWN_BADGE`]
pub fn badge_of<K: Badged>(key: Option<&K>) -> Badge {
    key.map(Badged::badge).unwrap_or(UNKNOWN_BADGE)
}

/// 从存储中的原始字符串查找徽章
///
/// 按枚举的 serde 名称解析（如 `"in_progress"`），无法识别时返回默认徽章。
pub fn badge_for_raw<K: Badged + DeserializeOwned>(raw: &str) -> Badge {
    let parsed = serde_json::from_value::<K>(serde_json::Value::String(raw.to_string())).ok();
    badge_of(parsed.as_ref())
}
