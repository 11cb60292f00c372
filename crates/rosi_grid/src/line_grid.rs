// crates/rosi_grid/src/line_grid.rs

//! 可生长的一维线网格
//!
//! 网格由顶点和两节点线单元组成，嵌入三维空间。拓扑只增不删。
//!
//! # 生长协议
//!
//! ```text
//! Idle ──insert_vertex/insert_element──▶ Idle (暂存)
//! Idle ──pre_grow──▶ PreGrown ──grow──▶ Grown ──post_grow──▶ Idle
//! ```
//!
//! - 暂存阶段插入的实体在 `grow` 之前不可查询最终拓扑
//! - `grow` 之后到 `post_grow` 之前，新实体的 `is_new` 为真，
//!   并可查询其插入序号 `growth_insertion_index`
//! - 调用顺序错误返回 [`GridError::InvalidPhase`]
//!
//! # 编号
//!
//! 顶点编号始终为插入顺序，旧顶点编号永不改变。单元编号是叶视图顺序：
//! [`LeafOrdering::DepthSorted`] 下每次提交后按单元中心深度重排，
//! 旧单元编号可能改变，因此跨变更的数据必须按 [`PersistentId`] 迁移。

use crate::error::{GridError, GridResult};
use rosi_foundation::index::PersistentIdAllocator;
use rosi_foundation::{BoundingBox, PersistentId, Position};
use serde::{Deserialize, Serialize};
use tracing::trace;

// ============================================================
// 枚举
// ============================================================

/// 生长协议阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GrowPhase {
    /// 空闲，可暂存新实体
    #[default]
    Idle,
    /// 已调用 `pre_grow`
    PreGrown,
    /// 已调用 `grow`，新实体带标记
    Grown,
}

/// 单元叶视图编号策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeafOrdering {
    /// 按插入顺序
    #[default]
    Insertion,
    /// 每次提交后按单元中心深度（自上而下）重排
    DepthSorted,
}

/// 单元类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// 两节点线段
    Line,
}

/// 实体引用
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityRef {
    /// 顶点（顶点编号）
    Vertex(usize),
    /// 单元（叶视图编号）
    Element(usize),
}

impl std::fmt::Display for EntityRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vertex(v) => write!(f, "vertex {v}"),
            Self::Element(e) => write!(f, "element {e}"),
        }
    }
}

// ============================================================
// 内部存储
// ============================================================

#[derive(Debug, Clone)]
struct VertexData {
    position: Position,
    id: PersistentId,
    is_new: bool,
}

#[derive(Debug, Clone)]
struct ElementData {
    vertices: [usize; 2],
    id: PersistentId,
    is_new: bool,
    insertion_index: usize,
}

// ============================================================
// LineGrid
// ============================================================

/// 可生长的一维线网格
#[derive(Debug, Clone)]
pub struct LineGrid {
    vertices: Vec<VertexData>,
    elements: Vec<ElementData>,
    staged_vertices: Vec<Position>,
    staged_elements: Vec<[usize; 2]>,
    phase: GrowPhase,
    ordering: LeafOrdering,
    ids: PersistentIdAllocator,
}

impl Default for LineGrid {
    fn default() -> Self {
        Self::new(LeafOrdering::default())
    }
}

impl LineGrid {
    /// 创建空网格
    pub fn new(ordering: LeafOrdering) -> Self {
        Self {
            vertices: Vec::new(),
            elements: Vec::new(),
            staged_vertices: Vec::new(),
            staged_elements: Vec::new(),
            phase: GrowPhase::Idle,
            ordering,
            ids: PersistentIdAllocator::new(),
        }
    }

    /// 由节点和线段构建初始网格（插入顺序编号）
    pub fn from_segments(nodes: &[Position], segments: &[[usize; 2]]) -> GridResult<Self> {
        Self::from_segments_with_ordering(nodes, segments, LeafOrdering::Insertion)
    }

    /// 由节点和线段构建初始网格
    ///
    /// 初始实体不带 `is_new` 标记。
    pub fn from_segments_with_ordering(
        nodes: &[Position],
        segments: &[[usize; 2]],
        ordering: LeafOrdering,
    ) -> GridResult<Self> {
        let mut grid = Self::new(ordering);
        for &p in nodes {
            grid.insert_vertex(p)?;
        }
        for &seg in segments {
            grid.insert_element(ElementKind::Line, seg)?;
        }
        grid.pre_grow()?;
        grid.grow()?;
        grid.post_grow()?;
        Ok(grid)
    }

    // ------------------------------------------------------------
    // 基本查询
    // ------------------------------------------------------------

    /// 当前协议阶段
    #[inline]
    pub fn phase(&self) -> GrowPhase {
        self.phase
    }

    /// 单元编号策略
    #[inline]
    pub fn ordering(&self) -> LeafOrdering {
        self.ordering
    }

    /// 已提交顶点数
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// 已提交单元数
    #[inline]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// 暂存顶点数
    #[inline]
    pub fn staged_vertex_count(&self) -> usize {
        self.staged_vertices.len()
    }

    /// 暂存单元数
    #[inline]
    pub fn staged_element_count(&self) -> usize {
        self.staged_elements.len()
    }

    /// 顶点位置
    pub fn vertex_position(&self, v: usize) -> GridResult<Position> {
        self.vertex(v).map(|d| d.position)
    }

    /// 顶点持久标识
    pub fn vertex_id(&self, v: usize) -> GridResult<PersistentId> {
        self.vertex(v).map(|d| d.id)
    }

    /// 所有已提交顶点位置（顶点编号顺序）
    pub fn vertex_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.vertices.iter().map(|d| d.position)
    }

    /// 单元两端顶点编号
    pub fn element_vertices(&self, e: usize) -> GridResult<[usize; 2]> {
        self.element(e).map(|d| d.vertices)
    }

    /// 单元持久标识
    pub fn element_id(&self, e: usize) -> GridResult<PersistentId> {
        self.element(e).map(|d| d.id)
    }

    /// 所有已提交单元的持久标识（叶视图顺序）
    pub fn element_ids(&self) -> impl Iterator<Item = PersistentId> + '_ {
        self.elements.iter().map(|d| d.id)
    }

    /// 单元两端点坐标
    pub fn element_endpoints(&self, e: usize) -> GridResult<[Position; 2]> {
        let [a, b] = self.element_vertices(e)?;
        Ok([self.vertices[a].position, self.vertices[b].position])
    }

    /// 单元中心
    pub fn element_center(&self, e: usize) -> GridResult<Position> {
        let [a, b] = self.element_endpoints(e)?;
        Ok((a + b) * 0.5)
    }

    /// 单元长度
    pub fn element_length(&self, e: usize) -> GridResult<f64> {
        let [a, b] = self.element_endpoints(e)?;
        Ok(a.distance(b))
    }

    /// 已提交顶点的包围盒
    pub fn bounding_box(&self) -> BoundingBox {
        let mut bb = BoundingBox::empty();
        for d in &self.vertices {
            bb.extend(d.position);
        }
        bb
    }

    /// 实体是否为本次生长新增
    ///
    /// 暂存实体返回 [`GridError::StagedEntity`]。
    pub fn is_new(&self, entity: EntityRef) -> GridResult<bool> {
        match entity {
            EntityRef::Vertex(v) => self.vertex_checked(v, entity).map(|d| d.is_new),
            EntityRef::Element(e) => self.element_checked(e, entity).map(|d| d.is_new),
        }
    }

    /// 新实体的插入序号
    ///
    /// 顶点的插入序号即 `insert_vertex` 的返回值；单元的插入序号为
    /// 插入顺序中的位置（与叶视图编号无关）。
    pub fn growth_insertion_index(&self, entity: EntityRef) -> GridResult<usize> {
        let (is_new, index) = match entity {
            EntityRef::Vertex(v) => (self.vertex_checked(v, entity)?.is_new, v),
            EntityRef::Element(e) => {
                let d = self.element_checked(e, entity)?;
                (d.is_new, d.insertion_index)
            }
        };
        if is_new {
            Ok(index)
        } else {
            Err(GridError::NotNew {
                entity: entity.to_string(),
            })
        }
    }

    // ------------------------------------------------------------
    // 几何修改（不改变拓扑）
    // ------------------------------------------------------------

    /// 移动已提交顶点
    pub fn set_vertex_position(&mut self, v: usize, position: Position) -> GridResult<()> {
        let len = self.vertices.len();
        let d = self
            .vertices
            .get_mut(v)
            .ok_or(GridError::UnknownVertex { index: v, len })?;
        d.position = position;
        Ok(())
    }

    // ------------------------------------------------------------
    // 生长协议
    // ------------------------------------------------------------

    /// 暂存顶点，返回其将获得的顶点编号
    pub fn insert_vertex(&mut self, position: Position) -> GridResult<usize> {
        self.require_phase("insert_vertex", GrowPhase::Idle)?;
        let index = self.vertices.len() + self.staged_vertices.len();
        self.staged_vertices.push(position);
        Ok(index)
    }

    /// 暂存单元，端点可以是已提交或暂存的顶点
    pub fn insert_element(&mut self, kind: ElementKind, vertices: [usize; 2]) -> GridResult<()> {
        self.require_phase("insert_element", GrowPhase::Idle)?;
        let ElementKind::Line = kind;
        let known = self.vertices.len() + self.staged_vertices.len();
        for &v in &vertices {
            if v >= known {
                return Err(GridError::UnknownVertex { index: v, len: known });
            }
        }
        if vertices[0] == vertices[1] {
            return Err(GridError::DegenerateElement {
                vertex: vertices[0],
            });
        }
        self.staged_elements.push(vertices);
        Ok(())
    }

    /// 生长前准备，返回是否存在暂存实体
    pub fn pre_grow(&mut self) -> GridResult<bool> {
        self.require_phase("pre_grow", GrowPhase::Idle)?;
        self.phase = GrowPhase::PreGrown;
        Ok(!self.staged_vertices.is_empty() || !self.staged_elements.is_empty())
    }

    /// 提交暂存实体，新实体带 `is_new` 标记；返回是否插入了实体
    pub fn grow(&mut self) -> GridResult<bool> {
        self.require_phase("grow", GrowPhase::PreGrown)?;

        let staged_vertices = std::mem::take(&mut self.staged_vertices);
        let staged_elements = std::mem::take(&mut self.staged_elements);
        let changed = !staged_vertices.is_empty() || !staged_elements.is_empty();

        for position in staged_vertices {
            let id = self.ids.allocate();
            self.vertices.push(VertexData {
                position,
                id,
                is_new: true,
            });
        }

        let first_insertion = self.elements.len();
        for (k, vertices) in staged_elements.into_iter().enumerate() {
            let id = self.ids.allocate();
            self.elements.push(ElementData {
                vertices,
                id,
                is_new: true,
                insertion_index: first_insertion + k,
            });
        }

        if changed && self.ordering == LeafOrdering::DepthSorted {
            self.sort_elements_by_depth();
        }

        trace!(
            vertices = self.vertices.len(),
            elements = self.elements.len(),
            "线网格提交完成"
        );
        self.phase = GrowPhase::Grown;
        Ok(changed)
    }

    /// 结束生长，清除 `is_new` 标记
    pub fn post_grow(&mut self) -> GridResult<()> {
        self.require_phase("post_grow", GrowPhase::Grown)?;
        for d in &mut self.vertices {
            d.is_new = false;
        }
        for d in &mut self.elements {
            d.is_new = false;
        }
        self.phase = GrowPhase::Idle;
        Ok(())
    }

    // ------------------------------------------------------------
    // 内部方法
    // ------------------------------------------------------------

    fn require_phase(&self, operation: &'static str, expected: GrowPhase) -> GridResult<()> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(GridError::invalid_phase(operation, expected, self.phase))
        }
    }

    fn vertex(&self, v: usize) -> GridResult<&VertexData> {
        self.vertex_checked(v, EntityRef::Vertex(v))
    }

    fn element(&self, e: usize) -> GridResult<&ElementData> {
        self.element_checked(e, EntityRef::Element(e))
    }

    fn vertex_checked(&self, v: usize, entity: EntityRef) -> GridResult<&VertexData> {
        if let Some(d) = self.vertices.get(v) {
            return Ok(d);
        }
        if v < self.vertices.len() + self.staged_vertices.len() {
            Err(GridError::StagedEntity {
                entity: entity.to_string(),
            })
        } else {
            Err(GridError::UnknownVertex {
                index: v,
                len: self.vertices.len(),
            })
        }
    }

    fn element_checked(&self, e: usize, entity: EntityRef) -> GridResult<&ElementData> {
        if let Some(d) = self.elements.get(e) {
            return Ok(d);
        }
        if e < self.elements.len() + self.staged_elements.len() {
            Err(GridError::StagedEntity {
                entity: entity.to_string(),
            })
        } else {
            Err(GridError::UnknownElement {
                index: e,
                len: self.elements.len(),
            })
        }
    }

    /// 按单元中心 z 降序（浅层在前）重排，同深度按持久标识
    fn sort_elements_by_depth(&mut self) {
        let vertices = &self.vertices;
        let center_z = |d: &ElementData| {
            0.5 * (vertices[d.vertices[0]].position.z + vertices[d.vertices[1]].position.z)
        };
        self.elements
            .sort_by(|a, b| center_z(b).total_cmp(&center_z(a)).then(a.id.cmp(&b.id)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    fn two_node_grid() -> LineGrid {
        LineGrid::from_segments(&[DVec3::ZERO, DVec3::new(0.0, 0.0, -0.01)], &[[0, 1]]).unwrap()
    }

    #[test]
    fn test_from_segments() {
        let grid = two_node_grid();
        assert_eq!(grid.vertex_count(), 2);
        assert_eq!(grid.element_count(), 1);
        assert_eq!(grid.phase(), GrowPhase::Idle);
        assert!(!grid.is_new(EntityRef::Element(0)).unwrap());
        assert!((grid.element_length(0).unwrap() - 0.01).abs() < 1e-15);
    }

    #[test]
    fn test_insert_vertex_returns_consecutive_indices() {
        let mut grid = two_node_grid();
        assert_eq!(grid.insert_vertex(DVec3::new(0.0, 0.0, -0.02)).unwrap(), 2);
        assert_eq!(grid.insert_vertex(DVec3::new(0.0, 0.0, -0.03)).unwrap(), 3);
        assert_eq!(grid.vertex_count(), 2);
        assert_eq!(grid.staged_vertex_count(), 2);
    }

    #[test]
    fn test_grow_protocol_marks_new_entities() {
        let mut grid = two_node_grid();
        let v = grid.insert_vertex(DVec3::new(0.0, 0.0, -0.02)).unwrap();
        grid.insert_element(ElementKind::Line, [1, v]).unwrap();

        assert!(grid.pre_grow().unwrap());
        assert!(grid.grow().unwrap());
        assert!(grid.is_new(EntityRef::Vertex(2)).unwrap());
        assert!(!grid.is_new(EntityRef::Vertex(1)).unwrap());
        assert!(grid.is_new(EntityRef::Element(1)).unwrap());
        assert_eq!(grid.growth_insertion_index(EntityRef::Vertex(2)).unwrap(), 2);
        assert_eq!(grid.growth_insertion_index(EntityRef::Element(1)).unwrap(), 1);
        assert!(matches!(
            grid.growth_insertion_index(EntityRef::Vertex(0)),
            Err(GridError::NotNew { .. })
        ));

        grid.post_grow().unwrap();
        assert!(!grid.is_new(EntityRef::Vertex(2)).unwrap());
        assert_eq!(grid.element_count(), 2);
    }

    #[test]
    fn test_out_of_order_calls_rejected() {
        let mut grid = two_node_grid();
        assert!(matches!(grid.grow(), Err(GridError::InvalidPhase { .. })));
        assert!(matches!(grid.post_grow(), Err(GridError::InvalidPhase { .. })));

        grid.pre_grow().unwrap();
        assert!(matches!(grid.pre_grow(), Err(GridError::InvalidPhase { .. })));
        assert!(matches!(
            grid.insert_vertex(DVec3::ZERO),
            Err(GridError::InvalidPhase { .. })
        ));
        grid.grow().unwrap();
        grid.post_grow().unwrap();
        assert_eq!(grid.phase(), GrowPhase::Idle);
    }

    #[test]
    fn test_staged_entity_query_rejected() {
        let mut grid = two_node_grid();
        let v = grid.insert_vertex(DVec3::new(0.0, 0.0, -0.02)).unwrap();
        assert!(matches!(
            grid.is_new(EntityRef::Vertex(v)),
            Err(GridError::StagedEntity { .. })
        ));
        assert!(matches!(
            grid.vertex_position(v),
            Err(GridError::StagedEntity { .. })
        ));
        assert!(matches!(
            grid.vertex_position(10),
            Err(GridError::UnknownVertex { .. })
        ));
    }

    #[test]
    fn test_insert_element_validation() {
        let mut grid = two_node_grid();
        assert!(matches!(
            grid.insert_element(ElementKind::Line, [1, 5]),
            Err(GridError::UnknownVertex { index: 5, .. })
        ));
        assert!(matches!(
            grid.insert_element(ElementKind::Line, [1, 1]),
            Err(GridError::DegenerateElement { vertex: 1 })
        ));
    }

    #[test]
    fn test_depth_sorted_renumbers_elements() {
        let nodes = [DVec3::ZERO, DVec3::new(0.0, 0.0, -0.01)];
        let mut grid =
            LineGrid::from_segments_with_ordering(&nodes, &[[0, 1]], LeafOrdering::DepthSorted)
                .unwrap();
        let old_id = grid.element_id(0).unwrap();

        // 新单元位于更浅处：排到最前，旧单元编号变为 1
        let v = grid.insert_vertex(DVec3::new(0.0, 0.0, 0.01)).unwrap();
        grid.insert_element(ElementKind::Line, [v, 0]).unwrap();
        grid.pre_grow().unwrap();
        grid.grow().unwrap();

        assert_eq!(grid.element_id(1).unwrap(), old_id);
        assert!(grid.is_new(EntityRef::Element(0)).unwrap());
        assert_eq!(grid.growth_insertion_index(EntityRef::Element(0)).unwrap(), 1);
        grid.post_grow().unwrap();
    }

    #[test]
    fn test_set_vertex_position_and_bbox() {
        let mut grid = two_node_grid();
        grid.set_vertex_position(1, DVec3::new(0.0, 0.0, -0.05)).unwrap();
        let bb = grid.bounding_box();
        assert!((bb.min.z + 0.05).abs() < 1e-15);
        assert!(grid.set_vertex_position(7, DVec3::ZERO).is_err());
    }
}
