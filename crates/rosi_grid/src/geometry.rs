// crates/rosi_grid/src/geometry.rs

//! 线网格几何缓存
//!
//! 缓存每个单元的长度、中心和端点，以及顶点到单元的邻接表。
//! 网格拓扑或顶点位置改变后必须调用 [`GridGeometry::update`]。

use crate::error::GridResult;
use crate::line_grid::LineGrid;
use rosi_foundation::{BoundingBox, Position};

/// 线网格几何缓存
#[derive(Debug, Clone, Default)]
pub struct GridGeometry {
    lengths: Vec<f64>,
    centers: Vec<Position>,
    element_vertices: Vec<[usize; 2]>,
    vertex_elements: Vec<Vec<usize>>,
    bbox: BoundingBox,
}

impl GridGeometry {
    /// 从网格构建
    pub fn new(grid: &LineGrid) -> GridResult<Self> {
        let mut geometry = Self::default();
        geometry.update(grid)?;
        Ok(geometry)
    }

    /// 重新计算全部缓存
    pub fn update(&mut self, grid: &LineGrid) -> GridResult<()> {
        let n = grid.element_count();
        self.lengths.clear();
        self.centers.clear();
        self.element_vertices.clear();
        self.lengths.reserve(n);
        self.centers.reserve(n);
        self.element_vertices.reserve(n);

        self.vertex_elements.clear();
        self.vertex_elements.resize(grid.vertex_count(), Vec::new());

        for e in 0..n {
            let verts = grid.element_vertices(e)?;
            let [a, b] = grid.element_endpoints(e)?;
            self.lengths.push(a.distance(b));
            self.centers.push((a + b) * 0.5);
            self.element_vertices.push(verts);
            for v in verts {
                self.vertex_elements[v].push(e);
            }
        }
        self.bbox = grid.bounding_box();
        Ok(())
    }

    /// 单元数
    #[inline]
    pub fn element_count(&self) -> usize {
        self.lengths.len()
    }

    /// 顶点数
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertex_elements.len()
    }

    /// 单元长度
    #[inline]
    pub fn length(&self, e: usize) -> f64 {
        self.lengths[e]
    }

    /// 单元中心
    #[inline]
    pub fn center(&self, e: usize) -> Position {
        self.centers[e]
    }

    /// 单元端点顶点编号
    #[inline]
    pub fn vertices(&self, e: usize) -> [usize; 2] {
        self.element_vertices[e]
    }

    /// 所有单元长度
    pub fn lengths(&self) -> &[f64] {
        &self.lengths
    }

    /// 所有单元中心
    pub fn centers(&self) -> &[Position] {
        &self.centers
    }

    /// 与顶点相连的单元
    pub fn elements_of_vertex(&self, v: usize) -> &[usize] {
        self.vertex_elements
            .get(v)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// 与单元共享顶点的其他单元（按编号升序，去重）
    pub fn neighbors(&self, e: usize) -> Vec<usize> {
        let mut out: Vec<usize> = self.element_vertices[e]
            .iter()
            .flat_map(|&v| self.elements_of_vertex(v).iter().copied())
            .filter(|&n| n != e)
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    /// 包围盒
    pub fn bounding_box(&self) -> BoundingBox {
        self.bbox
    }

    /// 网格总长度
    pub fn total_length(&self) -> f64 {
        self.lengths.iter().sum()
    }
}
