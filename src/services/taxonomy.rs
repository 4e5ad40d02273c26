//! # 症状分类服务
//!
//! 提供症状分类树的加载、叶子展开和搜索：
//! - `load_taxonomy` - 从 JSON 资源异步加载分类树
//! - `list_leaves` - 列出某节点下的全部叶子症状（携带完整路径）
//! - `search` - 在某个分类内按名称或路径段做大小写不敏感的子串搜索
//!
//! ## 搜索策略
//! 每个叶子的路径段预先小写化为 [`SearchEntry`]，查询词小写化后用
//! `memchr::memmem::Finder` 在各段上做 SIMD 加速子串匹配。
//! 结果不排序，保持分类树的先序遍历顺序。
//! 同一份 `SearchEntry` 既用于一次性搜索，也被 `AppCache` 缓存复用。

use std::path::Path;

use memchr::memmem::Finder;
use rayon::prelude::*;

use crate::models::symptom::{SelectedSymptom, SymptomNode};

/// 读取并解析症状分类资源
///
/// 资源文件是 `SymptomNode` 数组，没有版本字段，除 JSON 解析外不做额外的结构校验。
/// 失败不重试，资源是随应用打包的静态文件。
///
/// # 参数
/// - `path` - 症状分类 JSON 文件路径
///
/// # 错误
/// 文件不存在、无法读取或 JSON 解析失败时返回错误信息
pub async fn load_taxonomy(path: &Path) -> Result<Vec<SymptomNode>, String> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| format!("读取症状分类文件失败: {}", e))?;

    serde_json::from_str(&content).map_err(|e| format!("解析症状分类文件失败: {}", e))
}

/// 加载症状分类，失败时降级为空列表
///
/// 错误只记录日志，不向上传播：症状选择器显示为零个分类，宿主表单照常可用。
pub async fn load_taxonomy_or_empty(path: &Path) -> Vec<SymptomNode> {
    match load_taxonomy(path).await {
        Ok(categories) => {
            log::info!(
                "已加载症状分类 {} 个（{}）",
                categories.len(),
                path.display()
            );
            categories
        }
        Err(e) => {
            log::error!("症状分类加载失败，选择器将显示为空: {}", e);
            vec![]
        }
    }
}

/// 列出节点下的所有叶子症状
///
/// 路径从 `node` 自身开始。对分类（根节点）调用时即为完整路径。
/// 纯函数，按先序遍历顺序返回。
pub fn list_leaves(node: &SymptomNode) -> Vec<SelectedSymptom> {
    list_leaves_under(node, &[])
}

/// 列出节点下的所有叶子症状，路径以 `ancestors` 为前缀
///
/// 用于对树中间的某个节点展开叶子时保留其祖先路径，
/// `ancestors` 通常来自 [`find_node`]。
pub fn list_leaves_under(node: &SymptomNode, ancestors: &[String]) -> Vec<SelectedSymptom> {
    let mut path = ancestors.to_vec();
    let mut leaves = Vec::new();
    collect_leaves(node, &mut path, &mut leaves);
    leaves
}

fn collect_leaves(node: &SymptomNode, path: &mut Vec<String>, out: &mut Vec<SelectedSymptom>) {
    path.push(node.name().to_string());
    match node {
        SymptomNode::Leaf { id, name } => out.push(SelectedSymptom {
            id: *id,
            name: name.clone(),
            path: path.clone(),
        }),
        SymptomNode::Group { children, .. } => {
            for child in children {
                collect_leaves(child, path, out);
            }
        }
    }
    path.pop();
}

/// 在分类森林中按 id 查找节点
///
/// # 返回值
/// - `Some((node, ancestors))` - 节点及其祖先名称（不含节点自身）
/// - `None` - 未找到
pub fn find_node(categories: &[SymptomNode], id: u32) -> Option<(&SymptomNode, Vec<String>)> {
    let mut ancestors = Vec::new();
    for category in categories {
        if let Some(node) = find_in(category, id, &mut ancestors) {
            return Some((node, ancestors));
        }
    }
    None
}

fn find_in<'a>(
    node: &'a SymptomNode,
    id: u32,
    ancestors: &mut Vec<String>,
) -> Option<&'a SymptomNode> {
    if node.id() == id {
        return Some(node);
    }
    ancestors.push(node.name().to_string());
    for child in node.children() {
        if let Some(found) = find_in(child, id, ancestors) {
            return Some(found);
        }
    }
    ancestors.pop();
    None
}

/// 可搜索的叶子条目：症状本身 + 小写化的路径段
#[derive(Debug, Clone)]
pub struct SearchEntry {
    pub symptom: SelectedSymptom,
    /// `symptom.path` 的小写化版本，最后一段即症状名称
    segments: Vec<String>,
}

impl SearchEntry {
    pub fn new(symptom: SelectedSymptom) -> Self {
        let segments = symptom.path.iter().map(|s| s.to_lowercase()).collect();
        Self { symptom, segments }
    }

    fn matches(&self, finder: &Finder<'_>) -> bool {
        self.segments
            .iter()
            .any(|segment| finder.find(segment.as_bytes()).is_some())
    }
}

/// 为节点下的所有叶子构建搜索条目
pub fn index_leaves(node: &SymptomNode) -> Vec<SearchEntry> {
    list_leaves(node).into_iter().map(SearchEntry::new).collect()
}

/// 按查询词过滤搜索条目
///
/// 查询词为空或只含空白时返回全部条目；否则整词小写化后按子串匹配，不去除空白。
pub fn filter_entries(entries: &[SearchEntry], term: &str) -> Vec<SelectedSymptom> {
    if term.trim().is_empty() {
        return entries.iter().map(|e| e.symptom.clone()).collect();
    }

    let needle = term.to_lowercase();
    let finder = Finder::new(needle.as_bytes());
    entries
        .iter()
        .filter(|e| e.matches(&finder))
        .map(|e| e.symptom.clone())
        .collect()
}

/// 在单个分类内搜索症状
///
/// 大小写不敏感，匹配叶子名称或任一路径段。空查询词返回 `list_leaves(category)`。
pub fn search(category: &SymptomNode, term: &str) -> Vec<SelectedSymptom> {
    filter_entries(&index_leaves(category), term)
}

/// 在所有分类中搜索症状
///
/// 使用 rayon 并行搜索各分类，结果按分类顺序拼接。
pub fn search_all(categories: &[SymptomNode], term: &str) -> Vec<SelectedSymptom> {
    let per_category: Vec<Vec<SelectedSymptom>> = categories
        .par_iter()
        .map(|category| search(category, term))
        .collect();
    per_category.into_iter().flatten().collect()
}
