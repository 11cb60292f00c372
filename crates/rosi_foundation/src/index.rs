// crates/rosi_foundation/src/index.rs

//! 强类型索引与持久标识
//!
//! 根系网格只增不删，编号不会失效。`Idx<K>` 在编译期区分三种编号：
//!
//! - 生长模型节点编号 (`GrowthNodeIndex`)，由外部生长模型分配，单调递增
//! - 网格顶点编号 (`VertexIndex`)，由网格适配器在插入时分配
//! - 网格单元编号 (`ElementIndex`)，叶视图顺序，网格变更后可能重排
//!
//! `PersistentId` 则在网格变更前后保持不变，用于数据迁移。
//!
//! # 示例
//!
//! ```
//! use rosi_foundation::index::{GrowthNodeIndex, VertexIndex};
//!
//! let g = GrowthNodeIndex::from_usize(2);
//! let v = VertexIndex::from_usize(2);
//! assert_eq!(g.as_usize(), v.as_usize());
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// 编号类别，决定调试输出的前缀
pub trait IndexKind {
    /// 前缀，如 `v` 表示顶点
    const PREFIX: &'static str;
}

/// 生长模型节点
#[derive(Debug, Clone, Copy)]
pub enum GrowthNode {}

/// 网格顶点
#[derive(Debug, Clone, Copy)]
pub enum Vertex {}

/// 网格单元（线段）
#[derive(Debug, Clone, Copy)]
pub enum Element {}

impl IndexKind for GrowthNode {
    const PREFIX: &'static str = "g";
}
impl IndexKind for Vertex {
    const PREFIX: &'static str = "v";
}
impl IndexKind for Element {
    const PREFIX: &'static str = "e";
}

/// 按类别区分的编号
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct Idx<K> {
    index: usize,
    #[serde(skip)]
    _kind: PhantomData<fn() -> K>,
}

impl<K> Idx<K> {
    /// 由 usize 创建
    #[inline]
    pub const fn from_usize(index: usize) -> Self {
        Self {
            index,
            _kind: PhantomData,
        }
    }

    /// 转为 usize
    #[inline]
    pub const fn as_usize(self) -> usize {
        self.index
    }
}

impl<K> Copy for Idx<K> {}

impl<K> Clone for Idx<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> PartialEq for Idx<K> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<K> Eq for Idx<K> {}

impl<K> PartialOrd for Idx<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K> Ord for Idx<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.index.cmp(&other.index)
    }
}

impl<K> Hash for Idx<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<K: IndexKind> fmt::Debug for Idx<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", K::PREFIX, self.index)
    }
}

impl<K: IndexKind> fmt::Display for Idx<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", K::PREFIX, self.index)
    }
}

impl<K> From<usize> for Idx<K> {
    fn from(index: usize) -> Self {
        Self::from_usize(index)
    }
}

impl<K> From<Idx<K>> for usize {
    fn from(idx: Idx<K>) -> usize {
        idx.index
    }
}

/// 生长模型节点编号
pub type GrowthNodeIndex = Idx<GrowthNode>;
/// 网格顶点编号
pub type VertexIndex = Idx<Vertex>;
/// 网格单元编号
pub type ElementIndex = Idx<Element>;

// ============================================================================
// 持久标识
// ============================================================================

/// 拓扑持久标识
///
/// 实体创建时分配一次，之后在所有网格变更中保持不变。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersistentId(u64);

impl PersistentId {
    /// 创建
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// 原始值
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PersistentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 持久标识分配器，单调递增
#[derive(Debug, Clone, Default)]
pub struct PersistentIdAllocator {
    next: u64,
}

impl PersistentIdAllocator {
    /// 新分配器，从 0 开始
    pub fn new() -> Self {
        Self::default()
    }

    /// 分配下一个标识
    pub fn allocate(&mut self) -> PersistentId {
        let id = PersistentId(self.next);
        self.next += 1;
        id
    }

    /// 已分配数量
    pub fn allocated(&self) -> u64 {
        self.next
    }
}
