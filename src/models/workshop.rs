//! # 汽修业务记录数据模型
//!
//! 定义了客户（Customer）、车辆（Car）、工单（WorkOrder）、维修任务（RepairTask）
//! 和技师（Technician）等记录结构体，对应前端 TypeScript 中的同名接口。
//!
//! 这些记录之间是扁平的"外键"式引用（Customer → Car → WorkOrder → RepairTask），
//! 读取时手动查找，没有额外的引用完整性约束。
//! 每类记录作为一个整体集合存放在本地存储中，见 `services::store`。

use serde::{Deserialize, Serialize};

/// 看板用户角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// 管理员
    Admin,
    /// 服务顾问（Cố vấn dịch vụ）：接车、报价
    Cv,
    /// 技师（Kỹ thuật viên）：诊断、维修
    Ktv,
}

/// 工单状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkOrderStatus {
    /// 已接车，等待诊断
    Pending,
    /// 诊断中（已记录症状）
    Diagnosing,
    /// 已报价
    Quoted,
    /// 维修中
    InProgress,
    /// 维修完成
    Completed,
    /// 已交车
    Delivered,
    /// 已取消
    Cancelled,
}

/// 维修任务状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairTaskStatus {
    Unassigned,
    Assigned,
    InProgress,
    Done,
}

/// 维修任务所属的服务类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceCategory {
    /// 清洗
    Cleaning,
    /// 机修
    Mechanical,
    /// 电器
    Electrical,
    /// 钣喷
    Painting,
    /// 空调冷却
    Cooling,
}

/// 客户
///
/// 对应本地存储键 `demo-customers` 中的一条记录。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// 创建时间（ISO 8601）
    pub created_at: String,
}

/// 车辆，通过 `customer_id` 关联到客户
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    pub id: String,
    pub customer_id: String,
    /// 车牌号（如 "51A-123.45"）
    pub license_plate: String,
    pub brand: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vin: Option<String>,
    /// 接车时的里程数（公里）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mileage: Option<u32>,
}

/// 工单：跟踪一辆车从接车到交车的完整服务过程
///
/// `symptoms` 只保存症状名称字符串，来自症状选择器的 `SymptomSelection::names()`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrder {
    pub id: String,
    pub customer_id: String,
    pub car_id: String,
    pub status: WorkOrderStatus,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub notes: String,
    /// 负责接车的服务顾问 ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advisor_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// 维修任务：工单下按服务类别拆分的子项，可指派给技师
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairTask {
    pub id: String,
    pub work_order_id: String,
    pub category: ServiceCategory,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technician_id: Option<String>,
    pub status: RepairTaskStatus,
}

/// 技师
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Technician {
    pub id: String,
    pub name: String,
    pub phone: String,
    /// 擅长的服务类别
    #[serde(default)]
    pub specialties: Vec<ServiceCategory>,
    /// 是否在岗；离职技师保留记录但不可再被指派
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_order_wire_format() {
        let json = r#"{
            "id": "WO-001",
            "customerId": "C-1",
            "carId": "CAR-1",
            "status": "in_progress",
            "createdAt": "2026-01-02T03:04:05.000Z",
            "updatedAt": "2026-01-02T03:04:05.000Z"
        }"#;
        let order: WorkOrder = serde_json::from_str(json).unwrap();
        assert_eq!(order.status, WorkOrderStatus::InProgress);
        assert!(order.symptoms.is_empty());
        assert_eq!(order.notes, "");
        assert!(order.advisor_id.is_none());
    }

    #[test]
    fn test_technician_defaults_to_active() {
        let tech: Technician =
            serde_json::from_str(r#"{"id":"T-1","name":"Minh","phone":"0900","specialties":["cooling"]}"#)
                .unwrap();
        assert!(tech.active);
        assert_eq!(tech.specialties, vec![ServiceCategory::Cooling]);
    }
}
