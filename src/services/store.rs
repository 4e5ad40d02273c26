//! # 本地存储服务
//!
//! 看板的全部业务数据都以"整个集合读出、整个集合写回"的方式保存，
//! 每个存储键对应数据目录下的一个 JSON 文件（`<root>/<key>.json`），
//! 语义上等同于浏览器 local storage 的 getter/setter：没有索引、没有事务、
//! 没有部分更新，最后一次写入生效。
//!
//! ## 仓储接口
//! 调用方只通过 [`Repository`] 的 `load_all` / `save_all` 及其上的
//! 查找替换辅助方法访问集合。将来换成真正的嵌入式存储时只需替换 [`LocalStore`]。
//!
//! ## 写入安全
//! - 键名经过正则校验，杜绝路径穿越
//! - 每次写入使用独立的临时文件再 rename，读者只会看到完整的旧内容或新内容
//! - 共享同一个 [`StoreLock`] 的实例串行执行写入和"读 → 改 → 写"
//! - 启用备份时，覆写前把旧文件复制到 `<root>/backups/<key>_<毫秒时间戳>_<序号>.json`

use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::{Mutex, MutexGuard};

use crate::models::workshop::{Car, Customer, RepairTask, Technician, WorkOrder};
use crate::utils::time;

/// 存储键名规则：小写字母数字开头，仅含小写字母、数字、`-` 和 `_`
static KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9_-]*$").unwrap());

/// 临时文件与备份文件的进程内序号
static FILE_SEQ: AtomicU64 = AtomicU64::new(0);

fn next_seq() -> u64 {
    FILE_SEQ.fetch_add(1, Ordering::Relaxed)
}

/// 校验存储键名
fn validate_key(key: &str) -> Result<(), String> {
    if KEY_RE.is_match(key) {
        Ok(())
    } else {
        Err(format!("非法的存储键名: '{}'", key))
    }
}

/// 工单图片数据的存储键：`work-order-images-<编码后的 id>`
///
/// 小写字母、数字和 `-` 原样保留，其余每个 UTF-8 字节写成 `_` 加两位小写十六进制，
/// 例如 `WO/1` → `_57_4f_2f1`。`_` 只作转义前缀，不同的工单 ID 不会得到同一个键。
pub fn image_blob_key(work_order_id: &str) -> String {
    let mut encoded = String::with_capacity(work_order_id.len());
    for byte in work_order_id.bytes() {
        if byte.is_ascii_lowercase() || byte.is_ascii_digit() || byte == b'-' {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("_{:02x}", byte));
        }
    }
    format!("work-order-images-{}", encoded)
}

/// 存储写锁
///
/// 通过 Tauri 的 `manage()` 注册为应用状态，每次 command 打开的 [`LocalStore`]
/// 都持有同一把锁，并发 command 的写入因此按顺序执行。
#[derive(Debug, Clone, Default)]
pub struct StoreLock(Arc<Mutex<()>>);

impl StoreLock {
    pub fn new() -> Self {
        Self::default()
    }
}

/// 基于目录的键值存储
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
    backups_enabled: bool,
    lock: StoreLock,
}

impl LocalStore {
    /// 创建存储实例（使用独立的写锁），目录在首次写入时创建
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            backups_enabled: false,
            lock: StoreLock::new(),
        }
    }

    /// 设置是否在覆写前保留备份
    pub fn with_backups(mut self, enabled: bool) -> Self {
        self.backups_enabled = enabled;
        self
    }

    /// 与其他实例共用一把写锁
    pub fn with_lock(mut self, lock: StoreLock) -> Self {
        self.lock = lock;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn blob_path(&self, key: &str) -> Result<PathBuf, String> {
        validate_key(key)?;
        Ok(self.root.join(format!("{}.json", key)))
    }

    async fn lock(&self) -> MutexGuard<'_, ()> {
        self.lock.0.lock().await
    }

    /// 读取整个集合
    ///
    /// # 返回值
    /// 集合中的全部记录；键不存在时返回空数组
    ///
    /// # 错误
    /// 文件无法读取或内容不是合法的记录数组时返回错误。
    /// 损坏的数据不会被当作空集合，避免随后的整体写回覆盖掉原数据。
    pub async fn read_collection<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, String> {
        parse_collection(key, self.read_raw(key).await?)
    }

    /// 整体写回集合（带 2 空格缩进）
    pub async fn write_collection<T: Serialize>(&self, key: &str, records: &[T]) -> Result<(), String> {
        let content = serialize_collection(key, records)?;
        self.write_raw(key, &content).await
    }

    /// 在写锁内完成一次"读全部 → 修改 → 写全部"
    ///
    /// `update` 返回错误时不写回；修改后内容与原文件完全相同时也不写回。
    ///
    /// # 返回值
    /// `update` 的返回值
    pub async fn update_collection<T, R, F>(&self, key: &str, update: F) -> Result<R, String>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut Vec<T>) -> Result<R, String>,
    {
        let _guard = self.lock().await;

        let original = self.read_raw(key).await?;
        let mut records = parse_collection(key, original.clone())?;
        let result = update(&mut records)?;

        let content = serialize_collection(key, &records)?;
        let unchanged = match original.as_deref() {
            Some(original) => original == content,
            None => records.is_empty(),
        };
        if !unchanged {
            self.write_unlocked(key, &content).await?;
        }
        Ok(result)
    }

    /// 读取原始文本，键不存在时返回 `None`
    pub async fn read_raw(&self, key: &str) -> Result<Option<String>, String> {
        let path = self.blob_path(key)?;
        if !path.exists() {
            return Ok(None);
        }
        tokio::fs::read_to_string(&path)
            .await
            .map(Some)
            .map_err(|e| format!("读取存储键 '{}' 失败: {}", key, e))
    }

    /// 写入原始文本（覆盖）
    pub async fn write_raw(&self, key: &str, content: &str) -> Result<(), String> {
        let _guard = self.lock().await;
        self.write_unlocked(key, content).await
    }

    /// 调用方必须已持有写锁
    async fn write_unlocked(&self, key: &str, content: &str) -> Result<(), String> {
        let path = self.blob_path(key)?;

        if !self.root.exists() {
            tokio::fs::create_dir_all(&self.root)
                .await
                .map_err(|e| format!("创建数据目录失败: {}", e))?;
        }

        if self.backups_enabled && path.exists() {
            self.create_backup(key, &path).await?;
        }

        // 临时文件名带进程号和序号，不同写入者互不覆盖
        let tmp_path = self
            .root
            .join(format!(".{}.{}.{}.tmp", key, std::process::id(), next_seq()));
        let written = match tokio::fs::write(&tmp_path, content).await {
            Ok(()) => tokio::fs::rename(&tmp_path, &path)
                .await
                .map_err(|e| format!("替换存储键 '{}' 失败: {}", key, e)),
            Err(e) => Err(format!("写入存储键 '{}' 失败: {}", key, e)),
        };
        if written.is_err() {
            let _ = tokio::fs::remove_file(&tmp_path).await;
        }
        written
    }

    /// 删除键，键不存在时视为成功
    pub async fn remove(&self, key: &str) -> Result<(), String> {
        let path = self.blob_path(key)?;
        let _guard = self.lock().await;
        if !path.exists() {
            return Ok(());
        }
        tokio::fs::remove_file(&path)
            .await
            .map_err(|e| format!("删除存储键 '{}' 失败: {}", key, e))
    }

    /// 覆写前备份：`<root>/backups/<key>_<unix 毫秒>_<序号>.json`
    async fn create_backup(&self, key: &str, path: &Path) -> Result<(), String> {
        let backup_dir = self.root.join("backups");
        if !backup_dir.exists() {
            tokio::fs::create_dir_all(&backup_dir)
                .await
                .map_err(|e| format!("创建备份目录失败: {}", e))?;
        }

        let backup_path = backup_dir.join(format!(
            "{}_{}_{}.json",
            key,
            time::unix_timestamp_millis(),
            next_seq()
        ));
        tokio::fs::copy(path, &backup_path)
            .await
            .map_err(|e| format!("创建备份失败: {}", e))?;

        log::debug!("已备份 '{}' 到 {}", key, backup_path.display());
        Ok(())
    }
}

fn parse_collection<T: DeserializeOwned>(key: &str, content: Option<String>) -> Result<Vec<T>, String> {
    match content {
        Some(content) => serde_json::from_str(&content)
            .map_err(|e| format!("解析集合 '{}' 失败: {}", key, e)),
        None => Ok(vec![]),
    }
}

fn serialize_collection<T: Serialize>(key: &str, records: &[T]) -> Result<String, String> {
    serde_json::to_string_pretty(records).map_err(|e| format!("序列化集合 '{}' 失败: {}", key, e))
}

/// 可存入集合的记录
pub trait Record: Serialize + DeserializeOwned + Clone {
    /// 集合的存储键
    const KEY: &'static str;

    fn id(&self) -> &str;
}

impl Record for Customer {
    const KEY: &'static str = "demo-customers";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Car {
    const KEY: &'static str = "demo-cars";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for WorkOrder {
    const KEY: &'static str = "demo-work-orders";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for RepairTask {
    const KEY: &'static str = "demo-repair-tasks";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Technician {
    const KEY: &'static str = "demo-technicians";

    fn id(&self) -> &str {
        &self.id
    }
}

/// 单个集合的仓储
///
/// 每个操作都是一次完整的"读全部 → 修改 → 写全部"，不做缓存。
pub struct Repository<'a, T: Record> {
    store: &'a LocalStore,
    _record: PhantomData<T>,
}

impl<'a, T: Record> Repository<'a, T> {
    pub fn new(store: &'a LocalStore) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }

    pub async fn load_all(&self) -> Result<Vec<T>, String> {
        self.store.read_collection(T::KEY).await
    }

    pub async fn save_all(&self, records: &[T]) -> Result<(), String> {
        self.store.write_collection(T::KEY, records).await
    }

    /// 按 id 线性查找
    pub async fn find(&self, id: &str) -> Result<Option<T>, String> {
        Ok(self.load_all().await?.into_iter().find(|r| r.id() == id))
    }

    /// 按 id 替换已有记录，不存在则追加到末尾
    ///
    /// # 返回值
    /// 替换了已有记录时返回 true，追加时返回 false
    pub async fn upsert(&self, record: T) -> Result<bool, String> {
        self.store
            .update_collection(T::KEY, |records: &mut Vec<T>| {
                Ok(match records.iter().position(|r| r.id() == record.id()) {
                    Some(pos) => {
                        records[pos] = record;
                        true
                    }
                    None => {
                        records.push(record);
                        false
                    }
                })
            })
            .await
    }

    /// 按 id 删除记录
    ///
    /// # 返回值
    /// 确实删除了记录时返回 true；未找到时不写回并返回 false
    pub async fn remove(&self, id: &str) -> Result<bool, String> {
        self.store
            .update_collection(T::KEY, |records: &mut Vec<T>| {
                let before = records.len();
                records.retain(|r| r.id() != id);
                Ok(records.len() != before)
            })
            .await
    }

    /// 在写锁内按 id 修改一条记录
    ///
    /// # 返回值
    /// 修改后的记录
    ///
    /// # 错误
    /// 记录不存在、`update` 返回错误或读写失败时返回错误，此时不写回
    pub async fn modify<F>(&self, id: &str, update: F) -> Result<T, String>
    where
        F: FnOnce(&mut T) -> Result<(), String>,
    {
        self.store
            .update_collection(T::KEY, |records: &mut Vec<T>| {
                let record = records
                    .iter_mut()
                    .find(|r| r.id() == id)
                    .ok_or_else(|| format!("未找到记录 '{}'", id))?;
                update(record)?;
                Ok(record.clone())
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer(id: &str, name: &str) -> Customer {
        Customer {
            id: id.into(),
            name: name.into(),
            phone: "0901234567".into(),
            email: None,
            address: None,
            created_at: "2026-01-01T00:00:00.000Z".into(),
        }
    }

    #[test]
    fn test_validate_key() {
        assert!(validate_key("demo-customers").is_ok());
        assert!(validate_key("work-order-images-wo_1").is_ok());
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key("Demo").is_err());
        assert!(validate_key("").is_err());
        assert!(validate_key("-leading").is_err());
    }

    #[test]
    fn test_image_blob_key_is_valid() {
        assert_eq!(image_blob_key("wo-7"), "work-order-images-wo-7");
        assert_eq!(image_blob_key("WO/1"), "work-order-images-_57_4f_2f1");
        for id in ["WO/2026 01", "Đơn-1", "", "a_b"] {
            assert!(validate_key(&image_blob_key(id)).is_ok(), "{}", id);
        }
    }

    #[test]
    fn test_image_blob_key_distinct_ids_distinct_keys() {
        let ids = ["WO/1", "WO 1", "wo-1", "WO-1", "wo_1", "wo_2d1", "wo-2d1", "wo1"];
        let keys: std::collections::HashSet<String> = ids.iter().map(|id| image_blob_key(id)).collect();
        assert_eq!(keys.len(), ids.len());
    }

    #[tokio::test]
    async fn test_image_blobs_do_not_overwrite_each_other() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        store.write_raw(&image_blob_key("WO/1"), "image-of-WO/1").await.unwrap();
        store.write_raw(&image_blob_key("wo-1"), "image-of-wo-1").await.unwrap();
        assert_eq!(
            store.read_raw(&image_blob_key("WO/1")).await.unwrap().as_deref(),
            Some("image-of-WO/1")
        );
    }

    #[tokio::test]
    async fn test_missing_collection_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path().join("data"));
        let customers: Vec<Customer> = store.read_collection(Customer::KEY).await.unwrap();
        assert!(customers.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_collection_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        store.write_raw(Customer::KEY, "{not json").await.unwrap();
        let result: Result<Vec<Customer>, String> = store.read_collection(Customer::KEY).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_repository_upsert_find_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        let repo = Repository::<Customer>::new(&store);

        assert!(!repo.upsert(customer("C-1", "Nguyễn Văn An")).await.unwrap());
        assert!(!repo.upsert(customer("C-2", "Trần Thị Bình")).await.unwrap());
        assert!(repo.upsert(customer("C-1", "Nguyễn Văn An (VIP)")).await.unwrap());

        let all = repo.load_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Nguyễn Văn An (VIP)");

        assert_eq!(repo.find("C-2").await.unwrap().map(|c| c.name), Some("Trần Thị Bình".into()));
        assert!(repo.remove("C-2").await.unwrap());
        assert!(!repo.remove("C-2").await.unwrap());

        // 集合不存在时删除不会创建文件
        assert!(!Repository::<Technician>::new(&store).remove("T-1").await.unwrap());
        assert_eq!(store.read_raw(Technician::KEY).await.unwrap(), None);
        assert!(repo.find("C-2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_backup_created_on_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path()).with_backups(true);
        let repo = Repository::<Customer>::new(&store);

        repo.save_all(&[customer("C-1", "A")]).await.unwrap();
        assert!(!dir.path().join("backups").exists());

        repo.save_all(&[customer("C-1", "B")]).await.unwrap();
        let mut entries = std::fs::read_dir(dir.path().join("backups")).unwrap();
        let backup = entries.next().unwrap().unwrap().path();
        let saved: Vec<Customer> =
            serde_json::from_str(&std::fs::read_to_string(backup).unwrap()).unwrap();
        assert_eq!(saved[0].name, "A");
    }

    #[tokio::test]
    async fn test_backups_within_same_second_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path()).with_backups(true);
        for body in ["[1]", "[2]", "[3]", "[4]"] {
            store.write_raw("demo-customers", body).await.unwrap();
        }
        let backups = std::fs::read_dir(dir.path().join("backups")).unwrap().count();
        assert_eq!(backups, 3);
    }

    #[tokio::test]
    async fn test_concurrent_writers_leave_valid_blob() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        let short = "[\"a\"]".to_string();
        let long = serde_json::to_string(&vec!["x".repeat(64); 256]).unwrap();

        for _ in 0..20 {
            let mut writers = tokio::task::JoinSet::new();
            for i in 0..8 {
                let store = store.clone();
                let body = if i % 2 == 0 { short.clone() } else { long.clone() };
                writers.spawn(async move { store.write_raw("demo-customers", &body).await });
            }
            while let Some(result) = writers.join_next().await {
                result.unwrap().unwrap();
            }
            let raw = store.read_raw("demo-customers").await.unwrap().unwrap();
            assert!(raw == short || raw == long);
        }

        // 不留下临时文件
        let leftovers = std::fs::read_dir(dir.path())
            .unwrap()
            .filter(|e| e.as_ref().unwrap().file_name().to_string_lossy().ends_with(".tmp"))
            .count();
        assert_eq!(leftovers, 0);
    }

    #[tokio::test]
    async fn test_concurrent_upserts_are_serialized() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());

        let mut writers = tokio::task::JoinSet::new();
        for i in 0..16 {
            let store = store.clone();
            writers.spawn(async move {
                Repository::<Customer>::new(&store)
                    .upsert(customer(&format!("C-{}", i), "Khách"))
                    .await
            });
        }
        while let Some(result) = writers.join_next().await {
            assert!(!result.unwrap().unwrap());
        }

        let all = Repository::<Customer>::new(&store).load_all().await.unwrap();
        assert_eq!(all.len(), 16);
    }

    #[tokio::test]
    async fn test_shared_lock_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let lock = StoreLock::new();

        let mut writers = tokio::task::JoinSet::new();
        for i in 0..8 {
            let store = LocalStore::new(dir.path()).with_lock(lock.clone());
            writers.spawn(async move {
                Repository::<Customer>::new(&store)
                    .upsert(customer(&format!("C-{}", i), "Khách"))
                    .await
            });
        }
        while let Some(result) = writers.join_next().await {
            result.unwrap().unwrap();
        }

        let store = LocalStore::new(dir.path());
        assert_eq!(Repository::<Customer>::new(&store).load_all().await.unwrap().len(), 8);
    }

    #[tokio::test]
    async fn test_modify_missing_record_does_not_write() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        let repo = Repository::<Customer>::new(&store);
        assert!(repo.modify("C-404", |_| Ok(())).await.is_err());
        assert_eq!(store.read_raw(Customer::KEY).await.unwrap(), None);

        repo.save_all(&[customer("C-1", "A")]).await.unwrap();
        let updated = repo
            .modify("C-1", |c| {
                c.name = "B".into();
                Ok(())
            })
            .await
            .unwrap();
        assert_eq!(updated.name, "B");
        assert_eq!(repo.find("C-1").await.unwrap().unwrap().name, "B");
    }

    #[tokio::test]
    async fn test_raw_blob_roundtrip_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        let key = image_blob_key("WO-7");

        assert_eq!(store.read_raw(&key).await.unwrap(), None);
        store.write_raw(&key, "[\"data:image/png;base64,AAAA\"]").await.unwrap();
        assert!(store.read_raw(&key).await.unwrap().is_some());
        store.remove(&key).await.unwrap();
        assert_eq!(store.read_raw(&key).await.unwrap(), None);
        // 重复删除不报错
        store.remove(&key).await.unwrap();
    }

    #[tokio::test]
    async fn test_invalid_key_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        assert!(store.write_raw("../escape", "x").await.is_err());
        assert!(store.read_raw("../escape").await.is_err());
    }
}
