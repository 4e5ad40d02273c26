//! # 业务记录 Tauri Commands
//!
//! 提供各页面读写业务集合的 command：
//! - `read_*` / `save_*` - 整个集合读出 / 写回（客户、车辆、工单、维修任务、技师）
//! - `attach_diagnosis` - 将症状选择结果写入工单
//! - `assign_technician` / `tasks_for_technician` - 派工与技师任务列表
//! - `work_orders_for_customer` - 客户名下的工单
//! - `status_badge` - 状态值到徽章的统一查找
//! - `read_image_blob` / `save_image_blob` - 工单图片数据（不解析，原样存取）

use tauri::State;

use crate::models::badge::{self, Badge, UNKNOWN_BADGE};
use crate::models::symptom::{SelectedSymptom, SymptomSelection};
use crate::models::workshop::{
    Car, Customer, RepairTask, RepairTaskStatus, Role, ServiceCategory, Technician, WorkOrder,
    WorkOrderStatus,
};
use crate::services::store::{self, LocalStore, Record, Repository, StoreLock};
use crate::services::{config, workshop};
use crate::utils::path;

/// 打开数据目录下的本地存储，共用应用级写锁，备份开关取自配置
async fn open_store(lock: &StoreLock) -> Result<LocalStore, String> {
    let data_dir = path::get_data_path()?;
    let config = config::read_config_internal(&data_dir).await;
    Ok(LocalStore::new(data_dir)
        .with_backups(config.auto_backup_enabled)
        .with_lock(lock.clone()))
}

async fn load<T: Record>(lock: &StoreLock) -> Result<Vec<T>, String> {
    let store = open_store(lock).await?;
    Repository::<T>::new(&store).load_all().await
}

async fn save<T: Record>(lock: &StoreLock, records: Vec<T>) -> Result<(), String> {
    let store = open_store(lock).await?;
    Repository::<T>::new(&store).save_all(&records).await
}

#[tauri::command]
pub async fn read_customers(lock: State<'_, StoreLock>) -> Result<Vec<Customer>, String> {
    load(&lock).await
}

#[tauri::command]
pub async fn save_customers(
    customers: Vec<Customer>,
    lock: State<'_, StoreLock>,
) -> Result<(), String> {
    save(&lock, customers).await
}

#[tauri::command]
pub async fn read_cars(lock: State<'_, StoreLock>) -> Result<Vec<Car>, String> {
    load(&lock).await
}

#[tauri::command]
pub async fn save_cars(
    cars: Vec<Car>,
    lock: State<'_, StoreLock>,
) -> Result<(), String> {
    save(&lock, cars).await
}

#[tauri::command]
pub async fn read_work_orders(lock: State<'_, StoreLock>) -> Result<Vec<WorkOrder>, String> {
    load(&lock).await
}

#[tauri::command]
pub async fn save_work_orders(
    work_orders: Vec<WorkOrder>,
    lock: State<'_, StoreLock>,
) -> Result<(), String> {
    save(&lock, work_orders).await
}

#[tauri::command]
pub async fn read_repair_tasks(lock: State<'_, StoreLock>) -> Result<Vec<RepairTask>, String> {
    load(&lock).await
}

#[tauri::command]
pub async fn save_repair_tasks(
    repair_tasks: Vec<RepairTask>,
    lock: State<'_, StoreLock>,
) -> Result<(), String> {
    save(&lock, repair_tasks).await
}

#[tauri::command]
pub async fn read_technicians(lock: State<'_, StoreLock>) -> Result<Vec<Technician>, String> {
    load(&lock).await
}

#[tauri::command]
pub async fn save_technicians(
    technicians: Vec<Technician>,
    lock: State<'_, StoreLock>,
) -> Result<(), String> {
    save(&lock, technicians).await
}

/// 将症状选择器的已选列表写入工单
///
/// 只持久化症状名称。
///
/// # 参数
/// - `work_order_id` - 目标工单 ID
/// - `selected` - 症状选择器通过变更回调交给表单的已选列表
#[tauri::command]
pub async fn attach_diagnosis(
    work_order_id: String,
    selected: Vec<SelectedSymptom>,
    lock: State<'_, StoreLock>,
) -> Result<WorkOrder, String> {
    let store = open_store(&lock).await?;
    workshop::attach_diagnosis(&store, &work_order_id, &SymptomSelection::from(selected)).await
}

#[tauri::command]
pub async fn assign_technician(
    task_id: String,
    technician_id: String,
    lock: State<'_, StoreLock>,
) -> Result<RepairTask, String> {
    let store = open_store(&lock).await?;
    workshop::assign_technician(&store, &task_id, &technician_id).await
}

#[tauri::command]
pub async fn tasks_for_technician(
    technician_id: String,
    lock: State<'_, StoreLock>,
) -> Result<Vec<RepairTask>, String> {
    let store = open_store(&lock).await?;
    workshop::tasks_for_technician(&store, &technician_id).await
}

#[tauri::command]
pub async fn work_orders_for_customer(
    customer_id: String,
    lock: State<'_, StoreLock>,
) -> Result<Vec<WorkOrder>, String> {
    let store = open_store(&lock).await?;
    workshop::work_orders_for_customer(&store, &customer_id).await
}

/// 查找状态徽章
///
/// # 参数
/// - `kind` - "role" | "work_order" | "repair_task" | "service_category"
/// - `value` - 存储中的原始状态字符串
///
/// 未知的 `kind` 或 `value` 都返回默认徽章。
#[tauri::command]
pub fn status_badge(kind: String, value: String) -> Badge {
    match kind.as_str() {
        "role" => badge::badge_for_raw::<Role>(&value),
        "work_order" => badge::badge_for_raw::<WorkOrderStatus>(&value),
        "repair_task" => badge::badge_for_raw::<RepairTaskStatus>(&value),
        "service_category" => badge::badge_for_raw::<ServiceCategory>(&value),
        _ => UNKNOWN_BADGE,
    }
}

/// 读取工单图片数据，不存在时返回 `None`
#[tauri::command]
pub async fn read_image_blob(
    work_order_id: String,
    lock: State<'_, StoreLock>,
) -> Result<Option<String>, String> {
    let store = open_store(&lock).await?;
    store.read_raw(&store::image_blob_key(&work_order_id)).await
}

/// 保存工单图片数据（前端编码好的文本，原样写入）
#[tauri::command]
pub async fn save_image_blob(
    work_order_id: String,
    content: String,
    lock: State<'_, StoreLock>,
) -> Result<(), String> {
    let store = open_store(&lock).await?;
    store.write_raw(&store::image_blob_key(&work_order_id), &content).await
}
