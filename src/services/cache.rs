//! # 内存缓存管理服务
//!
//! 症状分类资源在一次会话内只需加载一次。`AppCache` 缓存解析后的分类树，
//! 并为每个分类预先构建小写化的搜索条目，前端每次输入搜索词时
//! 不再重新读取文件或重新展开分类树。
//!
//! ## 缓存失效策略
//! 以资源文件路径 + mtime 为准：路径变化或文件被修改时视为失效，重新加载。
//!
//! ## 线程安全
//! 使用 `std::sync::RwLock` 保证多线程安全访问。
//! Tauri 的 command 可能在不同线程上并发执行，RwLock 允许多个读操作并发进行。

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::SystemTime;

use crate::models::symptom::{SelectedSymptom, SymptomNode};
use crate::services::taxonomy::{self, SearchEntry};

/// 预处理后的症状分类
///
/// `entries[i]` 是 `categories[i]` 下全部叶子的搜索条目（先序）。
pub struct TaxonomyIndex {
    pub categories: Vec<SymptomNode>,
    entries: Vec<Vec<SearchEntry>>,
}

impl TaxonomyIndex {
    pub fn build(categories: Vec<SymptomNode>) -> Self {
        let entries = categories.iter().map(taxonomy::index_leaves).collect();
        Self {
            categories,
            entries,
        }
    }

    /// 在指定分类内搜索；分类不存在时返回 `None`
    pub fn search(&self, category_id: u32, term: &str) -> Option<Vec<SelectedSymptom>> {
        let pos = self.categories.iter().position(|c| c.id() == category_id)?;
        Some(taxonomy::filter_entries(&self.entries[pos], term))
    }
}

/// 应用全局缓存状态
///
/// 通过 Tauri 的 `manage()` 方法注册为应用状态，
/// 所有 command 函数可以通过 `State<AppCache>` 参数访问。
pub struct AppCache {
    taxonomy: RwLock<Option<TaxonomyCacheEntry>>,
}

/// 症状分类缓存条目
struct TaxonomyCacheEntry {
    index: Arc<TaxonomyIndex>,
    /// 资源文件路径
    source: PathBuf,
    /// 资源文件的最后修改时间（用于判断缓存是否仍然有效）
    file_mtime: SystemTime,
}

async fn file_mtime(path: &Path) -> SystemTime {
    tokio::fs::metadata(path)
        .await
        .ok()
        .and_then(|m| m.modified().ok())
        .unwrap_or(SystemTime::UNIX_EPOCH)
}

impl AppCache {
    /// 创建新的空缓存实例
    pub fn new() -> Self {
        Self {
            taxonomy: RwLock::new(None),
        }
    }

    /// 获取缓存的症状分类（如果缓存仍然有效）
    ///
    /// # 返回值
    /// - `Some(index)` - 路径一致且文件未被修改
    /// - `None` - 没有缓存、路径不同或文件已变化
    pub async fn get_taxonomy(&self, source: &Path) -> Option<Arc<TaxonomyIndex>> {
        let mtime = file_mtime(source).await;
        let cache = self.taxonomy.read().ok()?;
        let entry = cache.as_ref()?;

        if entry.source == source && mtime == entry.file_mtime {
            Some(Arc::clone(&entry.index))
        } else {
            None
        }
    }

    /// 更新症状分类缓存
    ///
    /// # 返回值
    /// 新构建的索引
    pub async fn set_taxonomy(
        &self,
        source: &Path,
        categories: Vec<SymptomNode>,
    ) -> Arc<TaxonomyIndex> {
        let index = Arc::new(TaxonomyIndex::build(categories));
        let file_mtime = file_mtime(source).await;
        if let Ok(mut cache) = self.taxonomy.write() {
            *cache = Some(TaxonomyCacheEntry {
                index: Arc::clone(&index),
                source: source.to_path_buf(),
                file_mtime,
            });
        }
        index
    }

    /// 使症状分类缓存失效（如配置中的资源路径被修改）
    pub fn invalidate_taxonomy(&self) {
        if let Ok(mut cache) = self.taxonomy.write() {
            *cache = None;
        }
    }

    /// 在缓存的分类上搜索，不检查文件是否变化
    ///
    /// # 返回值
    /// - `Some(symptoms)` - 匹配的症状列表
    /// - `None` - 没有缓存或分类不存在
    pub fn search_in_cache(&self, category_id: u32, term: &str) -> Option<Vec<SelectedSymptom>> {
        let cache = self.taxonomy.read().ok()?;
        cache.as_ref()?.index.search(category_id, term)
    }
}

impl Default for AppCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::taxonomy::tests::sample_taxonomy;

    #[test]
    fn test_index_search_matches_pure_search() {
        let tree = sample_taxonomy();
        let index = TaxonomyIndex::build(tree.clone());
        for category in &tree {
            for term in ["", "đèn", "NHANH", "dầu", "không có"] {
                assert_eq!(
                    index.search(category.id(), term),
                    Some(taxonomy::search(category, term))
                );
            }
        }
        assert_eq!(index.search(999, ""), None);
    }

    #[tokio::test]
    async fn test_cache_hit_and_invalidate() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("symptoms.json");
        std::fs::write(&source, "[]").unwrap();

        let cache = AppCache::new();
        assert!(cache.get_taxonomy(&source).await.is_none());
        assert!(cache.search_in_cache(1, "").is_none());

        cache.set_taxonomy(&source, sample_taxonomy()).await;
        let index = cache.get_taxonomy(&source).await.unwrap();
        assert_eq!(index.categories.len(), 2);
        assert_eq!(cache.search_in_cache(10, "").map(|v| v.len()), Some(2));

        // 其他路径不命中
        assert!(cache.get_taxonomy(&dir.path().join("other.json")).await.is_none());

        cache.invalidate_taxonomy();
        assert!(cache.get_taxonomy(&source).await.is_none());
    }
}
