//! # 症状分类数据模型
//!
//! 定义了症状分类树（SymptomNode）、已选症状（SelectedSymptom）
//! 以及表单会话内的已选集合（SymptomSelection）。
//!
//! 症状分类资源是一个静态 JSON 数组，每个节点形如：
//! ```json
//! { "id": 1, "name": "Động cơ", "children": [ ... ] }
//! ```
//! `children` 缺失或为空数组的节点是叶子（可选择的症状），
//! 其余节点只是分组，本身没有选择含义。Rust 端用 `Leaf` / `Group` 两个变体
//! 在类型层面表达这一点，序列化格式与资源文件保持一致。

use serde::{Deserialize, Serialize};

/// 症状分类树节点
///
/// 分类 → 子分组 → 症状 三层结构，但类型本身不限制深度。
/// 树在一次表单会话内只加载一次，之后不再修改。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawSymptomNode", into = "RawSymptomNode")]
pub enum SymptomNode {
    /// 叶子：可选择的具体症状
    Leaf { id: u32, name: String },
    /// 分组：仅用于组织子节点，`children` 保证非空
    Group {
        id: u32,
        name: String,
        children: Vec<SymptomNode>,
    },
}

/// 资源文件中的节点原始形态
///
/// 仅用于 serde 转换，`children: null` 与缺失等价。
#[derive(Serialize, Deserialize)]
struct RawSymptomNode {
    id: u32,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    children: Option<Vec<SymptomNode>>,
}

impl From<RawSymptomNode> for SymptomNode {
    fn from(raw: RawSymptomNode) -> Self {
        match raw.children {
            Some(children) if !children.is_empty() => SymptomNode::Group {
                id: raw.id,
                name: raw.name,
                children,
            },
            _ => SymptomNode::Leaf {
                id: raw.id,
                name: raw.name,
            },
        }
    }
}

impl From<SymptomNode> for RawSymptomNode {
    fn from(node: SymptomNode) -> Self {
        match node {
            SymptomNode::Leaf { id, name } => RawSymptomNode {
                id,
                name,
                children: None,
            },
            SymptomNode::Group { id, name, children } => RawSymptomNode {
                id,
                name,
                children: Some(children),
            },
        }
    }
}

impl SymptomNode {
    pub fn id(&self) -> u32 {
        match self {
            SymptomNode::Leaf { id, .. } | SymptomNode::Group { id, .. } => *id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            SymptomNode::Leaf { name, .. } | SymptomNode::Group { name, .. } => name,
        }
    }

    /// 子节点列表；叶子返回空切片
    pub fn children(&self) -> &[SymptomNode] {
        match self {
            SymptomNode::Leaf { .. } => &[],
            SymptomNode::Group { children, .. } => children,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, SymptomNode::Leaf { .. })
    }
}

/// 已选症状
///
/// 由用户勾选叶子节点产生。`path` 是从根分类到该症状本身的名称序列，
/// 仅用于展示和搜索结果的面包屑；最后一个元素总是 `name`。
///
/// 对应前端 TypeScript 接口：
/// ```typescript
/// interface SelectedSymptom {
///   id: number;
///   name: string;
///   path: string[];
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedSymptom {
    pub id: u32,
    pub name: String,
    pub path: Vec<String>,
}

/// 表单会话内的已选症状集合
///
/// 按勾选顺序保存，以 `id` 判定成员关系。
/// 提交表单时只有 `name` 会被复制进工单（见 [`SymptomSelection::names`]）。
///
/// 相等比较按 id 集合进行而不看顺序，这样对任意集合 `S`
/// 都有 `S.toggled(x).toggled(x) == S`，即使 `x` 原本不在末尾。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<SelectedSymptom>", into = "Vec<SelectedSymptom>")]
pub struct SymptomSelection {
    items: Vec<SelectedSymptom>,
}

impl SymptomSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// 翻转某个症状的成员关系（与单元素集合做对称差）
    ///
    /// 已存在同 id 的症状则移除，否则追加到末尾。
    ///
    /// # 返回值
    /// 调用后该症状是否处于已选状态
    pub fn toggle(&mut self, symptom: SelectedSymptom) -> bool {
        if let Some(pos) = self.items.iter().position(|s| s.id == symptom.id) {
            self.items.remove(pos);
            false
        } else {
            self.items.push(symptom);
            true
        }
    }

    /// `toggle` 的按值版本，返回新集合
    pub fn toggled(mut self, symptom: SelectedSymptom) -> Self {
        self.toggle(symptom);
        self
    }

    pub fn contains(&self, id: u32) -> bool {
        self.items.iter().any(|s| s.id == id)
    }

    pub fn get(&self, id: u32) -> Option<&SelectedSymptom> {
        self.items.iter().find(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SelectedSymptom> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[SelectedSymptom] {
        &self.items
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// 提取症状名称列表（写入工单时唯一持久化的部分）
    pub fn names(&self) -> Vec<String> {
        self.items.iter().map(|s| s.name.clone()).collect()
    }
}

impl PartialEq for SymptomSelection {
    fn eq(&self, other: &Self) -> bool {
        self.items.len() == other.items.len()
            && self.items.iter().all(|s| other.get(s.id) == Some(s))
    }
}

impl Eq for SymptomSelection {}

/// 从前端传入的数组构建集合，重复 id 只保留第一次出现
impl From<Vec<SelectedSymptom>> for SymptomSelection {
    fn from(items: Vec<SelectedSymptom>) -> Self {
        let mut selection = SymptomSelection::new();
        for item in items {
            if !selection.contains(item.id) {
                selection.items.push(item);
            }
        }
        selection
    }
}

impl From<SymptomSelection> for Vec<SelectedSymptom> {
    fn from(selection: SymptomSelection) -> Self {
        selection.items
    }
}
