//! # 工单业务操作
//!
//! 页面层需要的"读全部 → 手动查找 → 写全部"操作集中在这里，
//! 让 command 层保持简单：
//! - `attach_diagnosis` - 把症状选择结果写入工单
//! - `assign_technician` - 给维修任务指派技师
//! - `tasks_for_technician` / `work_orders_for_customer` - 按外键筛选

use crate::models::symptom::SymptomSelection;
use crate::models::workshop::{RepairTask, RepairTaskStatus, Technician, WorkOrder, WorkOrderStatus};
use crate::services::store::{LocalStore, Record, Repository};
use crate::utils::time;

/// 将已选症状写入工单
///
/// 只复制症状名称（`SymptomSelection::names()`），id 和路径不持久化。
/// 仍处于 `Pending` 的工单随之进入 `Diagnosing`。
///
/// # 参数
/// - `store` - 本地存储
/// - `work_order_id` - 目标工单 ID
/// - `selection` - 症状选择器的当前已选集合
///
/// # 返回值
/// 更新后的工单
///
/// # 错误
/// 工单不存在或读写失败时返回错误
pub async fn attach_diagnosis(
    store: &LocalStore,
    work_order_id: &str,
    selection: &SymptomSelection,
) -> Result<WorkOrder, String> {
    let updated = store
        .update_collection(WorkOrder::KEY, |orders: &mut Vec<WorkOrder>| {
            let order = orders
                .iter_mut()
                .find(|o| o.id == work_order_id)
                .ok_or_else(|| format!("未找到工单 '{}'", work_order_id))?;

            order.symptoms = selection.names();
            if order.status == WorkOrderStatus::Pending {
                order.status = WorkOrderStatus::Diagnosing;
            }
            order.updated_at = time::now_iso8601();
            Ok(order.clone())
        })
        .await?;

    log::info!(
        "工单 {} 已记录 {} 个症状",
        work_order_id,
        updated.symptoms.len()
    );
    Ok(updated)
}

/// 给维修任务指派技师
///
/// 读取时手动校验引用：技师必须存在且在岗。
/// 指派后任务状态变为 `Assigned`（已在进行或完成的任务保持原状态）。
///
/// # 错误
/// 任务或技师不存在、技师已停用、读写失败时返回错误
pub async fn assign_technician(
    store: &LocalStore,
    task_id: &str,
    technician_id: &str,
) -> Result<RepairTask, String> {
    let technician = Repository::<Technician>::new(store)
        .find(technician_id)
        .await?
        .ok_or_else(|| format!("未找到技师 '{}'", technician_id))?;
    if !technician.active {
        return Err(format!("技师 '{}' 已停用，不能指派任务", technician.name));
    }

    store
        .update_collection(RepairTask::KEY, |tasks: &mut Vec<RepairTask>| {
            let task = tasks
                .iter_mut()
                .find(|t| t.id == task_id)
                .ok_or_else(|| format!("未找到维修任务 '{}'", task_id))?;

            task.technician_id = Some(technician.id.clone());
            if task.status == RepairTaskStatus::Unassigned {
                task.status = RepairTaskStatus::Assigned;
            }
            Ok(task.clone())
        })
        .await
}

/// 技师（KTV）视角的任务列表
pub async fn tasks_for_technician(
    store: &LocalStore,
    technician_id: &str,
) -> Result<Vec<RepairTask>, String> {
    let tasks = Repository::<RepairTask>::new(store).load_all().await?;
    Ok(tasks
        .into_iter()
        .filter(|t| t.technician_id.as_deref() == Some(technician_id))
        .collect())
}

/// 客户名下的全部工单
pub async fn work_orders_for_customer(
    store: &LocalStore,
    customer_id: &str,
) -> Result<Vec<WorkOrder>, String> {
    let orders = Repository::<WorkOrder>::new(store).load_all().await?;
    Ok(orders
        .into_iter()
        .filter(|o| o.customer_id == customer_id)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::symptom::SelectedSymptom;
    use crate::models::workshop::ServiceCategory;

    fn order(id: &str, customer_id: &str) -> WorkOrder {
        WorkOrder {
            id: id.into(),
            customer_id: customer_id.into(),
            car_id: "CAR-1".into(),
            status: WorkOrderStatus::Pending,
            symptoms: vec![],
            notes: String::new(),
            advisor_id: None,
            created_at: "2026-01-01T00:00:00.000Z".into(),
            updated_at: "2026-01-01T00:00:00.000Z".into(),
        }
    }

    fn task(id: &str) -> RepairTask {
        RepairTask {
            id: id.into(),
            work_order_id: "WO-1".into(),
            category: ServiceCategory::Electrical,
            description: "Kiểm tra đèn pha".into(),
            technician_id: None,
            status: RepairTaskStatus::Unassigned,
        }
    }

    fn technician(id: &str, active: bool) -> Technician {
        Technician {
            id: id.into(),
            name: format!("KTV {}", id),
            phone: "0900000000".into(),
            specialties: vec![ServiceCategory::Electrical],
            active,
        }
    }

    #[tokio::test]
    async fn test_attach_diagnosis_persists_names_only() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        Repository::<WorkOrder>::new(&store)
            .save_all(&[order("WO-1", "C-1"), order("WO-2", "C-1")])
            .await
            .unwrap();

        let selection = SymptomSelection::new().toggled(SelectedSymptom {
            id: 20102,
            name: "Đèn pha bị mờ".into(),
            path: vec!["Hệ thống đèn".into(), "Đèn pha".into(), "Đèn pha bị mờ".into()],
        });
        let updated = attach_diagnosis(&store, "WO-2", &selection).await.unwrap();
        assert_eq!(updated.symptoms, vec!["Đèn pha bị mờ".to_string()]);
        assert_eq!(updated.status, WorkOrderStatus::Diagnosing);

        let stored = Repository::<WorkOrder>::new(&store).find("WO-2").await.unwrap().unwrap();
        assert_eq!(stored, updated);
        let raw = store.read_raw("demo-work-orders").await.unwrap().unwrap();
        assert!(!raw.contains("20102"));
    }

    #[tokio::test]
    async fn test_attach_diagnosis_unknown_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        let result = attach_diagnosis(&store, "WO-404", &SymptomSelection::new()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_assign_technician_checks_references() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        Repository::<RepairTask>::new(&store)
            .save_all(&[task("RT-1"), task("RT-2")])
            .await
            .unwrap();
        Repository::<Technician>::new(&store)
            .save_all(&[technician("T-1", true), technician("T-2", false)])
            .await
            .unwrap();

        let assigned = assign_technician(&store, "RT-1", "T-1").await.unwrap();
        assert_eq!(assigned.technician_id.as_deref(), Some("T-1"));
        assert_eq!(assigned.status, RepairTaskStatus::Assigned);

        assert!(assign_technician(&store, "RT-2", "T-2").await.is_err());
        assert!(assign_technician(&store, "RT-2", "T-404").await.is_err());
        assert!(assign_technician(&store, "RT-404", "T-1").await.is_err());

        let mine = tasks_for_technician(&store, "T-1").await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, "RT-1");
    }

    #[tokio::test]
    async fn test_work_orders_for_customer() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        Repository::<WorkOrder>::new(&store)
            .save_all(&[order("WO-1", "C-1"), order("WO-2", "C-2"), order("WO-3", "C-1")])
            .await
            .unwrap();

        let orders = work_orders_for_customer(&store, "C-1").await.unwrap();
        let ids: Vec<&str> = orders.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["WO-1", "WO-3"]);
    }

    #[tokio::test]
    async fn test_concurrent_diagnoses_are_all_kept() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        let orders: Vec<WorkOrder> = (0..8).map(|i| order(&format!("WO-{}", i), "C-1")).collect();
        Repository::<WorkOrder>::new(&store).save_all(&orders).await.unwrap();

        let mut jobs = tokio::task::JoinSet::new();
        for i in 0..8 {
            let store = store.clone();
            jobs.spawn(async move {
                let selection = SymptomSelection::new().toggled(SelectedSymptom {
                    id: i,
                    name: format!("Triệu chứng {}", i),
                    path: vec![],
                });
                attach_diagnosis(&store, &format!("WO-{}", i), &selection).await
            });
        }
        while let Some(result) = jobs.join_next().await {
            result.unwrap().unwrap();
        }

        let stored = Repository::<WorkOrder>::new(&store).load_all().await.unwrap();
        assert!(stored.iter().all(|o| o.symptoms.len() == 1));
        assert!(stored.iter().all(|o| o.status == WorkOrderStatus::Diagnosing));
    }
}
