//! # 症状分类 Tauri Commands
//!
//! 症状选择器组件挂载时调用 `load_symptom_taxonomy`，之后的浏览和搜索
//! 都在已缓存的分类上完成：
//! - `load_symptom_taxonomy` - 加载分类树（失败时返回空列表）
//! - `list_symptom_leaves` - 展开任意节点下的叶子症状
//! - `search_symptoms` / `search_all_symptoms` - 分类内 / 全部分类搜索
//! - `toggle_symptom` - 翻转已选集合中某个症状的成员关系

use std::path::PathBuf;
use std::sync::Arc;

use tauri::{AppHandle, Manager, State};

use crate::models::symptom::{SelectedSymptom, SymptomNode, SymptomSelection};
use crate::services::cache::{AppCache, TaxonomyIndex};
use crate::services::{config, taxonomy};
use crate::utils::path;

/// 确定症状分类资源路径：默认使用随应用打包的资源，配置中可改为自定义文件
async fn taxonomy_source(app: &AppHandle) -> Result<PathBuf, String> {
    let data_dir = path::get_data_path()?;
    let resource_dir = app
        .path()
        .resource_dir()
        .map_err(|e| format!("无法定位应用资源目录: {}", e))?;
    Ok(config::read_config_internal(&data_dir)
        .await
        .resolve_taxonomy_path(&data_dir, &resource_dir))
}

/// 取得症状分类索引：缓存有效时直接返回，否则从资源文件加载
///
/// 任何失败都只记录日志并返回 `None`，调用方按零个分类处理。
async fn taxonomy_index(app: &AppHandle, cache: &AppCache) -> Option<Arc<TaxonomyIndex>> {
    let source = match taxonomy_source(app).await {
        Ok(source) => source,
        Err(e) => {
            log::error!("症状分类加载失败: {}", e);
            return None;
        }
    };

    if let Some(index) = cache.get_taxonomy(&source).await {
        return Some(index);
    }

    match taxonomy::load_taxonomy(&source).await {
        Ok(categories) => {
            log::info!("已加载症状分类 {} 个（{}）", categories.len(), source.display());
            Some(cache.set_taxonomy(&source, categories).await)
        }
        Err(e) => {
            // 失败不缓存，下次挂载时重新读取
            log::error!("症状分类加载失败，选择器将显示为空: {}", e);
            None
        }
    }
}

/// 加载症状分类树
///
/// 资源缺失或损坏时返回空列表而不是错误，症状选择器据此显示为空。
#[tauri::command]
pub async fn load_symptom_taxonomy(
    app: AppHandle,
    cache: State<'_, AppCache>,
) -> Result<Vec<SymptomNode>, String> {
    Ok(taxonomy_index(&app, &cache)
        .await
        .map(|index| index.categories.clone())
        .unwrap_or_default())
}

/// 列出任意节点下的叶子症状，路径从根分类开始
///
/// 节点不存在时返回空列表。
#[tauri::command]
pub async fn list_symptom_leaves(
    node_id: u32,
    app: AppHandle,
    cache: State<'_, AppCache>,
) -> Result<Vec<SelectedSymptom>, String> {
    let Some(index) = taxonomy_index(&app, &cache).await else {
        return Ok(vec![]);
    };
    Ok(taxonomy::find_node(&index.categories, node_id)
        .map(|(node, ancestors)| taxonomy::list_leaves_under(node, &ancestors))
        .unwrap_or_default())
}

/// 在指定分类内搜索症状
///
/// 空搜索词返回该分类全部叶子；分类不存在时返回空列表。
#[tauri::command]
pub async fn search_symptoms(
    category_id: u32,
    term: String,
    app: AppHandle,
    cache: State<'_, AppCache>,
) -> Result<Vec<SelectedSymptom>, String> {
    let Some(index) = taxonomy_index(&app, &cache).await else {
        return Ok(vec![]);
    };
    Ok(index.search(category_id, &term).unwrap_or_default())
}

/// 在全部分类中搜索症状，结果按分类顺序排列
#[tauri::command]
pub async fn search_all_symptoms(
    term: String,
    app: AppHandle,
    cache: State<'_, AppCache>,
) -> Result<Vec<SelectedSymptom>, String> {
    let Some(index) = taxonomy_index(&app, &cache).await else {
        return Ok(vec![]);
    };
    Ok(taxonomy::search_all(&index.categories, &term))
}

/// 翻转症状的选择状态，返回新的已选列表
///
/// 前端无论是勾选还是取消勾选都调用同一个 command，按 id 是否存在决定加入或移除。
#[tauri::command]
pub fn toggle_symptom(
    symptom: SelectedSymptom,
    selected: Vec<SelectedSymptom>,
) -> Vec<SelectedSymptom> {
    SymptomSelection::from(selected).toggled(symptom).into()
}
