// crates/rosi_physics/src/soil_lookup.rs

//! 根系问题使用的土壤压力查询

use crate::timeseries::TimeSeries;
use rosi_foundation::{Position, RosiError, RosiResult};
use rosi_grid::SoilGrid;

/// 土壤压力水头查询
pub trait SoilLookup {
    /// 位置 [m] 处的压力水头 [cm]
    fn value(&self, position: Position) -> f64;

    /// 描述
    fn describe(&self) -> String {
        "soil-lookup".to_string()
    }
}

/// 随深度分段线性变化的压力水头，超出范围取端点值
#[derive(Debug, Clone)]
pub struct DepthTable {
    table: TimeSeries,
}

impl DepthTable {
    /// 由 (z [m], 水头 [cm]) 点对创建，点对顺序任意
    pub fn new(mut points: Vec<(f64, f64)>) -> RosiResult<Self> {
        if points.iter().any(|(z, h)| !z.is_finite() || !h.is_finite()) {
            return Err(RosiError::invalid_input("深度剖面包含非有限值"));
        }
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        Ok(Self {
            table: TimeSeries::from_points(points)?,
        })
    }

    /// 均匀水头
    pub fn uniform(head: f64) -> Self {
        Self {
            table: TimeSeries::constant(head),
        }
    }
}

impl SoilLookup for DepthTable {
    fn value(&self, position: Position) -> f64 {
        self.table.get_value(position.z)
    }

    fn describe(&self) -> String {
        let (lo, hi) = self.table.time_range();
        format!("depth table ({} points, z ∈ [{lo}, {hi}])", self.table.len())
    }
}

/// 由土壤解构造的查询，返回所在土壤单元的水头
pub struct CellLookup {
    grid: SoilGrid,
    heads: Vec<f64>,
    outside: f64,
}

impl CellLookup {
    /// `heads` 为每个土壤单元的水头 [cm]；计算域外返回 `outside`
    pub fn new(grid: SoilGrid, heads: Vec<f64>, outside: f64) -> RosiResult<Self> {
        RosiError::check_size("CellLookup.heads", grid.n_cells(), heads.len())?;
        Ok(Self {
            grid,
            heads,
            outside,
        })
    }
}

impl SoilLookup for CellLookup {
    fn value(&self, position: Position) -> f64 {
        self.grid
            .cell_index(position)
            .map_or(self.outside, |cell| self.heads[cell])
    }

    fn describe(&self) -> String {
        format!("soil cells ({})", self.heads.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    #[test]
    fn test_depth_table() {
        let table = DepthTable::new(vec![(0.0, -100.0), (-1.0, -300.0)]).unwrap();
        assert!((table.value(DVec3::new(0.0, 0.0, -0.5)) + 200.0).abs() < 1e-12);
        assert_eq!(table.value(DVec3::new(0.0, 0.0, 1.0)), -100.0);
        assert_eq!(table.value(DVec3::new(0.0, 0.0, -2.0)), -300.0);
    }

    #[test]
    fn test_duplicate_depth_rejected() {
        assert!(DepthTable::new(vec![(0.0, 1.0), (0.0, 2.0)]).is_err());
    }

    #[test]
    fn test_cell_lookup() {
        let grid = SoilGrid::new(
            DVec3::new(0.0, 0.0, -1.0),
            DVec3::new(1.0, 1.0, 0.0),
            [1, 1, 2],
        )
        .unwrap();
        let lookup = CellLookup::new(grid, vec![-200.0, -100.0], 0.0).unwrap();
        assert_eq!(lookup.value(DVec3::new(0.5, 0.5, -0.75)), -200.0);
        assert_eq!(lookup.value(DVec3::new(0.5, 0.5, -0.25)), -100.0);
        assert_eq!(lookup.value(DVec3::new(5.0, 0.5, -0.25)), 0.0);
    }
}
