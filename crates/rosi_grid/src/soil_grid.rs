// crates/rosi_grid/src/soil_grid.rs

//! 三维结构化土壤网格
//!
//! 轴对齐长方体，均匀划分为 `nx × ny × nz` 个单元。
//! 单元编号 `i + nx·(j + ny·k)`，k 从底部开始。

use crate::error::{GridError, GridResult};
use glam::DVec3;
use rosi_foundation::{BoundingBox, Position};
use serde::{Deserialize, Serialize};

/// 结构化土壤网格
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilGrid {
    bbox: BoundingBox,
    cells: [usize; 3],
}

impl SoilGrid {
    /// 创建
    pub fn new(min: Position, max: Position, cells: [usize; 3]) -> GridResult<Self> {
        if cells.iter().any(|&n| n == 0) {
            return Err(GridError::invalid_parameter(format!(
                "土壤网格单元数必须为正: {cells:?}"
            )));
        }
        if !(max.cmpgt(min).all()) {
            return Err(GridError::invalid_parameter(format!(
                "土壤网格范围无效: min={min}, max={max}"
            )));
        }
        Ok(Self {
            bbox: BoundingBox::new(min, max),
            cells,
        })
    }

    /// 单元总数
    #[inline]
    pub fn n_cells(&self) -> usize {
        self.cells[0] * self.cells[1] * self.cells[2]
    }

    /// 各方向单元数
    #[inline]
    pub fn cells(&self) -> [usize; 3] {
        self.cells
    }

    /// 包围盒
    #[inline]
    pub fn bounding_box(&self) -> BoundingBox {
        self.bbox
    }

    /// 单元尺寸
    pub fn spacing(&self) -> DVec3 {
        self.bbox.extent()
            / DVec3::new(
                self.cells[0] as f64,
                self.cells[1] as f64,
                self.cells[2] as f64,
            )
    }

    /// 单元体积
    pub fn cell_volume(&self) -> f64 {
        let h = self.spacing();
        h.x * h.y * h.z
    }

    /// 三维下标转单元编号
    #[inline]
    pub fn linear_index(&self, i: usize, j: usize, k: usize) -> usize {
        i + self.cells[0] * (j + self.cells[1] * k)
    }

    /// 单元中心
    pub fn cell_center(&self, cell: usize) -> GridResult<Position> {
        if cell >= self.n_cells() {
            return Err(GridError::UnknownElement {
                index: cell,
                len: self.n_cells(),
            });
        }
        let [nx, ny, _] = self.cells;
        let i = cell % nx;
        let j = (cell / nx) % ny;
        let k = cell / (nx * ny);
        let h = self.spacing();
        Ok(self.bbox.min + DVec3::new(i as f64 + 0.5, j as f64 + 0.5, k as f64 + 0.5) * h)
    }

    /// 所有单元中心
    pub fn cell_centers(&self) -> Vec<Position> {
        (0..self.n_cells())
            .filter_map(|c| self.cell_center(c).ok())
            .collect()
    }

    /// 定位点所在单元，上边界上的点归入最后一层
    pub fn cell_index(&self, p: Position) -> Option<usize> {
        if !self.bbox.contains(p) {
            return None;
        }
        let rel = (p - self.bbox.min) / self.spacing();
        let clamp = |x: f64, n: usize| (x.floor() as usize).min(n - 1);
        Some(self.linear_index(
            clamp(rel.x, self.cells[0]),
            clamp(rel.y, self.cells[1]),
            clamp(rel.z, self.cells[2]),
        ))
    }

    /// 定位点所在单元，不在网格内时报错
    pub fn locate(&self, p: Position) -> GridResult<usize> {
        self.cell_index(p).ok_or(GridError::OutsideSoil {
            x: p.x,
            y: p.y,
            z: p.z,
        })
    }
}
