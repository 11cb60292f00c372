// crates/rosi_growth/src/index_map.rs

//! 生长模型节点编号 → 网格顶点编号
//!
//! 只在新顶点插入后追加或覆盖，从不缩短。对 `i < len`，
//! `IndexMap[i]` 是当前有效的顶点编号；对 `i >= len`（本步新节点），
//! 翻译结果为 `i` 本身，因为新节点按生长模型编号插入（插入时会检查）。

use crate::error::{GrowthError, GrowthResult};
use rosi_foundation::{GrowthNodeIndex, VertexIndex};
use rosi_grid::{EntityRef, GridResult, LineGrid};

/// 节点编号映射表
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexMap {
    map: Vec<usize>,
}

impl IndexMap {
    /// 恒等映射（初始网格的顶点编号与生长模型编号一致）
    pub fn identity(n: usize) -> Self {
        Self {
            map: (0..n).collect(),
        }
    }

    /// 条目数
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// 是否为空
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// 翻译节点编号，未知编号原样返回
    #[inline]
    pub fn growth_to_mesh(&self, i: usize) -> usize {
        self.map.get(i).copied().unwrap_or(i)
    }

    /// 带检查的翻译
    pub fn try_get(&self, i: usize) -> GrowthResult<usize> {
        self.map.get(i).copied().ok_or(GrowthError::UnknownNode {
            index: i,
            len: self.map.len(),
        })
    }

    /// 带类型的检查翻译
    pub fn translate(&self, node: GrowthNodeIndex) -> GrowthResult<VertexIndex> {
        self.try_get(node.as_usize()).map(VertexIndex::from_usize)
    }

    /// 映射表切片
    pub fn as_slice(&self) -> &[usize] {
        &self.map
    }

    /// 网格提交后登记新顶点
    ///
    /// 扩展到当前顶点数，并对编号不小于 `old_num_vertices` 的新顶点
    /// 记录 `map[插入序号] = 顶点编号`。
    pub fn update(&mut self, grid: &LineGrid, old_num_vertices: usize) -> GridResult<()> {
        let n = grid.vertex_count();
        if n > self.map.len() {
            let start = self.map.len();
            self.map.extend(start..n);
        }
        for v in old_num_vertices..n {
            let entity = EntityRef::Vertex(v);
            if grid.is_new(entity)? {
                let insertion = grid.growth_insertion_index(entity)?;
                if let Some(slot) = self.map.get_mut(insertion) {
                    *slot = v;
                }
            }
        }
        Ok(())
    }

    /// `map[i] != i` 的条目数
    pub fn mismatch_count(&self) -> usize {
        self.map
            .iter()
            .enumerate()
            .filter(|&(i, &v)| i != v)
            .count()
    }
}
