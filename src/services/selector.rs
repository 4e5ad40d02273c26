//! # 症状选择器状态
//!
//! 一个表单会话内症状选择器的全部内存状态：
//! 加载阶段、当前分类、搜索词、展开的分组以及已选症状集合。
//!
//! ## 状态机
//! ```text
//! Loading ──finish_loading(Ok)──▶ Loaded ──(搜索词为空)──▶ Browsing
//!    │                              └─────(搜索词非空)──▶ Searching
//!    └──finish_loading(Err)──▶ Loaded（零个分类）
//! ```
//! 加载失败只记录日志，选择器停留在空的 Loaded 状态，没有重试。
//! 如果加载永远不完成，选择器就一直处于 Loading。
//!
//! 已选集合变化时通过 `on_change` 回调通知宿主表单，
//! 宿主最终只把症状名称写入工单。

use std::collections::HashSet;

use crate::models::symptom::{SelectedSymptom, SymptomNode, SymptomSelection};
use crate::services::taxonomy;

/// 加载阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorPhase {
    Loading,
    Loaded,
}

/// 浏览模式，由搜索词是否为空决定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorMode {
    Browsing,
    Searching,
}

/// 展开的分组 id 集合，纯视图状态，与选择无关
#[derive(Debug, Clone, Default)]
pub struct ExpansionState {
    expanded: HashSet<u32>,
}

impl ExpansionState {
    pub fn expand(&mut self, id: u32) {
        self.expanded.insert(id);
    }

    pub fn collapse(&mut self, id: u32) {
        self.expanded.remove(&id);
    }

    /// 翻转展开状态，返回翻转后是否展开
    pub fn toggle(&mut self, id: u32) -> bool {
        if self.expanded.remove(&id) {
            false
        } else {
            self.expanded.insert(id);
            true
        }
    }

    pub fn is_expanded(&self, id: u32) -> bool {
        self.expanded.contains(&id)
    }

    pub fn clear(&mut self) {
        self.expanded.clear();
    }
}

/// 宿主表单的变更回调
pub type ChangeCallback = Box<dyn FnMut(&[SelectedSymptom]) + Send>;

/// 症状选择器
pub struct SymptomSelector {
    phase: SelectorPhase,
    categories: Vec<SymptomNode>,
    active_category: Option<u32>,
    search_term: String,
    expansion: ExpansionState,
    selection: SymptomSelection,
    on_change: Option<ChangeCallback>,
}

impl SymptomSelector {
    /// 创建处于 Loading 阶段的空选择器
    pub fn new() -> Self {
        Self {
            phase: SelectorPhase::Loading,
            categories: Vec::new(),
            active_category: None,
            search_term: String::new(),
            expansion: ExpansionState::default(),
            selection: SymptomSelection::new(),
            on_change: None,
        }
    }

    /// 接收分类加载结果
    ///
    /// 成功时保存分类并激活第一个分类；失败时记录错误并以零个分类进入 Loaded。
    /// 已选集合不受影响。
    pub fn finish_loading(&mut self, result: Result<Vec<SymptomNode>, String>) {
        let categories = match result {
            Ok(categories) => categories,
            Err(e) => {
                log::error!("症状分类加载失败，选择器将显示为空: {}", e);
                Vec::new()
            }
        };

        self.active_category = categories.first().map(SymptomNode::id);
        self.categories = categories;
        self.search_term.clear();
        self.expansion.clear();
        self.phase = SelectorPhase::Loaded;
    }

    pub fn phase(&self) -> SelectorPhase {
        self.phase
    }

    pub fn mode(&self) -> SelectorMode {
        if self.search_term.trim().is_empty() {
            SelectorMode::Browsing
        } else {
            SelectorMode::Searching
        }
    }

    pub fn categories(&self) -> &[SymptomNode] {
        &self.categories
    }

    pub fn active_category(&self) -> Option<&SymptomNode> {
        let id = self.active_category?;
        self.categories.iter().find(|c| c.id() == id)
    }

    /// 切换当前分类，同时清空搜索词
    ///
    /// # 返回值
    /// 分类存在时返回 true；不存在时状态不变并返回 false
    pub fn select_category(&mut self, id: u32) -> bool {
        if !self.categories.iter().any(|c| c.id() == id) {
            return false;
        }
        self.active_category = Some(id);
        self.search_term.clear();
        true
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// 当前应显示的症状列表
    ///
    /// 浏览模式下为当前分类的全部叶子，搜索模式下为过滤结果；
    /// 没有激活的分类时为空。
    pub fn visible_symptoms(&self) -> Vec<SelectedSymptom> {
        match self.active_category() {
            Some(category) => taxonomy::search(category, &self.search_term),
            None => Vec::new(),
        }
    }

    /// 注册宿主表单的变更回调，替换之前注册的回调
    pub fn on_change<F>(&mut self, callback: F)
    where
        F: FnMut(&[SelectedSymptom]) + Send + 'static,
    {
        self.on_change = Some(Box::new(callback));
    }

    /// 翻转症状的选择状态并通知宿主
    ///
    /// # 返回值
    /// 调用后该症状是否处于已选状态
    pub fn toggle(&mut self, symptom: SelectedSymptom) -> bool {
        let selected = self.selection.toggle(symptom);
        if let Some(callback) = self.on_change.as_mut() {
            callback(self.selection.as_slice());
        }
        selected
    }

    pub fn is_selected(&self, id: u32) -> bool {
        self.selection.contains(id)
    }

    pub fn selection(&self) -> &SymptomSelection {
        &self.selection
    }

    /// 用已有诊断初始化已选集合（如编辑工单），不触发回调
    pub fn set_selection(&mut self, selection: SymptomSelection) {
        self.selection = selection;
    }

    pub fn expand(&mut self, id: u32) {
        self.expansion.expand(id);
    }

    pub fn collapse(&mut self, id: u32) {
        self.expansion.collapse(id);
    }

    pub fn toggle_expanded(&mut self, id: u32) -> bool {
        self.expansion.toggle(id)
    }

    pub fn is_expanded(&self, id: u32) -> bool {
        self.expansion.is_expanded(id)
    }
}

impl Default for SymptomSelector {
    fn default() -> Self {
        Self::new()
    }
}
