// crates/rosi_physics/src/coupling.rs

//! 一维根系与三维土壤的嵌入式耦合
//!
//! 每个根单元在其高斯积分点上生成点源。点源同时属于土壤单元（bulk）
//! 和根单元（low-dim），两侧问题通过点源编号查询对方的主变量。
//! 根系网格每次生长后单元编号都会变化，必须调用 [`EmbeddedCoupling::rebuild`]。

use rosi_foundation::{Position, PrimaryVariables, RosiError, RosiResult};
use rosi_grid::{LineGrid, SoilGrid};
use thiserror::Error;
use tracing::{debug, warn};

// ============================================================
// 点源
// ============================================================

/// 点源
///
/// `quadrature_weight · integration_element` 为该点代表的根长 [m]。
#[derive(Debug, Clone, PartialEq)]
pub struct PointSource {
    id: usize,
    position: Position,
    quadrature_weight: f64,
    integration_element: f64,
}

impl PointSource {
    /// 创建
    pub fn new(id: usize, position: Position, quadrature_weight: f64, integration_element: f64) -> Self {
        Self {
            id,
            position,
            quadrature_weight,
            integration_element,
        }
    }

    /// 编号
    #[inline]
    pub fn id(&self) -> usize {
        self.id
    }

    /// 位置
    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    /// 积分权重
    #[inline]
    pub fn quadrature_weight(&self) -> f64 {
        self.quadrature_weight
    }

    /// 积分单元（根单元长度）
    #[inline]
    pub fn integration_element(&self) -> f64 {
        self.integration_element
    }

    /// 把单位长度的通量换算为点源总量
    #[inline]
    pub fn scale(&self) -> f64 {
        self.quadrature_weight * self.integration_element
    }
}

/// 点源所属的两侧单元
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointSourceData {
    bulk_element_idx: usize,
    low_dim_element_idx: usize,
}

impl PointSourceData {
    /// 创建
    pub fn new(bulk_element_idx: usize, low_dim_element_idx: usize) -> Self {
        Self {
            bulk_element_idx,
            low_dim_element_idx,
        }
    }

    /// 土壤单元编号
    #[inline]
    pub fn bulk_element_idx(&self) -> usize {
        self.bulk_element_idx
    }

    /// 根单元编号
    #[inline]
    pub fn low_dim_element_idx(&self) -> usize {
        self.low_dim_element_idx
    }
}

// ============================================================
// 耦合管理器接口
// ============================================================

/// 耦合管理器
pub trait CouplingManager {
    /// 土壤侧点源
    fn bulk_point_sources(&self) -> &[PointSource];

    /// 根系侧点源
    fn low_dim_point_sources(&self) -> &[PointSource];

    /// 点源所属单元
    fn point_source_data(&self, id: usize) -> RosiResult<&PointSourceData>;

    /// 点源处的土壤主变量
    fn bulk_pri_vars(&self, id: usize) -> RosiResult<&PrimaryVariables>;

    /// 点源处的根系主变量
    fn low_dim_pri_vars(&self, id: usize) -> RosiResult<&PrimaryVariables>;
}

/// 耦合错误
#[derive(Debug, Error)]
pub enum CouplingError {
    /// 点源编号不存在
    #[error("点源 {id} 不存在 (共 {len} 个)")]
    UnknownPointSource { id: usize, len: usize },

    /// 重建后尚未更新解
    #[error("耦合管理器尚未更新解")]
    SolutionNotSet,

    /// 不支持的积分阶数
    #[error("不支持的积分阶数: {0}")]
    IntegrationOrder(usize),
}

impl From<CouplingError> for RosiError {
    fn from(err: CouplingError) -> Self {
        match err {
            CouplingError::UnknownPointSource { id, len } => {
                RosiError::index_out_of_bounds("PointSource", id, len)
            }
            CouplingError::SolutionNotSet => RosiError::internal(err.to_string()),
            CouplingError::IntegrationOrder(_) => RosiError::invalid_input(err.to_string()),
        }
    }
}

// ============================================================
// 高斯积分
// ============================================================

/// [0, 1] 上的高斯-勒让德积分点 (局部坐标, 权重)
///
/// n 点公式精确积分 2n-1 次多项式。
pub fn gauss_points(order: usize) -> RosiResult<Vec<(f64, f64)>> {
    let points = match order {
        1 => vec![(0.5, 1.0)],
        2 | 3 => {
            let d = 0.5 / 3.0_f64.sqrt();
            vec![(0.5 - d, 0.5), (0.5 + d, 0.5)]
        }
        4 | 5 => {
            let d = 0.5 * 0.6_f64.sqrt();
            vec![(0.5 - d, 5.0 / 18.0), (0.5, 8.0 / 18.0), (0.5 + d, 5.0 / 18.0)]
        }
        _ => return Err(CouplingError::IntegrationOrder(order).into()),
    };
    Ok(points)
}

// ============================================================
// 嵌入式耦合
// ============================================================

/// 嵌入式耦合管理器
#[derive(Debug, Clone)]
pub struct EmbeddedCoupling {
    soil: SoilGrid,
    quadrature: Vec<(f64, f64)>,
    sources: Vec<PointSource>,
    data: Vec<PointSourceData>,
    root_elements: usize,
    bulk: Vec<PrimaryVariables>,
    low_dim: Vec<PrimaryVariables>,
    solution_set: bool,
}

impl EmbeddedCoupling {
    /// 创建，尚无点源
    pub fn new(soil: SoilGrid, integration_order: usize) -> RosiResult<Self> {
        Ok(Self {
            soil,
            quadrature: gauss_points(integration_order)?,
            sources: Vec::new(),
            data: Vec::new(),
            root_elements: 0,
            bulk: Vec::new(),
            low_dim: Vec::new(),
            solution_set: false,
        })
    }

    /// 土壤网格
    pub fn soil_grid(&self) -> &SoilGrid {
        &self.soil
    }

    /// 点源数
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// 是否没有点源
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// 按当前根系网格重建点源
    ///
    /// 土壤计算域外的积分点不产生点源。重建后需要重新调用
    /// [`update_solution`](Self::update_solution)。
    pub fn rebuild(&mut self, grid: &LineGrid) -> RosiResult<()> {
        self.sources.clear();
        self.data.clear();
        self.bulk.clear();
        self.low_dim.clear();
        self.solution_set = false;
        self.root_elements = grid.element_count();

        let mut skipped = 0;
        for e in 0..grid.element_count() {
            let [p0, p1] = grid.element_endpoints(e)?;
            let length = p0.distance(p1);
            for &(xi, weight) in &self.quadrature {
                let position = p0.lerp(p1, xi);
                let Some(cell) = self.soil.cell_index(position) else {
                    skipped += 1;
                    continue;
                };
                let id = self.sources.len();
                self.sources.push(PointSource::new(id, position, weight, length));
                self.data.push(PointSourceData::new(cell, e));
            }
        }

        if skipped > 0 {
            warn!("{} 个积分点位于土壤计算域外，未生成点源", skipped);
        }
        debug!(
            "耦合重建: {} 个根单元, {} 个点源",
            self.root_elements,
            self.sources.len()
        );
        Ok(())
    }

    /// 读取当前土壤与根系解
    pub fn update_solution(
        &mut self,
        soil_solution: &[PrimaryVariables],
        root_solution: &[PrimaryVariables],
    ) -> RosiResult<()> {
        RosiError::check_size("soil_solution", self.soil.n_cells(), soil_solution.len())?;
        RosiError::check_size("root_solution", self.root_elements, root_solution.len())?;

        self.bulk = self
            .data
            .iter()
            .map(|d| soil_solution[d.bulk_element_idx].clone())
            .collect();
        self.low_dim = self
            .data
            .iter()
            .map(|d| root_solution[d.low_dim_element_idx].clone())
            .collect();
        self.solution_set = true;
        Ok(())
    }

    fn check_id(&self, id: usize) -> Result<(), CouplingError> {
        if id >= self.sources.len() {
            return Err(CouplingError::UnknownPointSource {
                id,
                len: self.sources.len(),
            });
        }
        if !self.solution_set {
            return Err(CouplingError::SolutionNotSet);
        }
        Ok(())
    }
}

impl CouplingManager for EmbeddedCoupling {
    fn bulk_point_sources(&self) -> &[PointSource] {
        &self.sources
    }

    fn low_dim_point_sources(&self) -> &[PointSource] {
        &self.sources
    }

    fn point_source_data(&self, id: usize) -> RosiResult<&PointSourceData> {
        self.data.get(id).ok_or_else(|| {
            CouplingError::UnknownPointSource {
                id,
                len: self.data.len(),
            }
            .into()
        })
    }

    fn bulk_pri_vars(&self, id: usize) -> RosiResult<&PrimaryVariables> {
        self.check_id(id)?;
        Ok(&self.bulk[id])
    }

    fn low_dim_pri_vars(&self, id: usize) -> RosiResult<&PrimaryVariables> {
        self.check_id(id)?;
        Ok(&self.low_dim[id])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    fn soil() -> SoilGrid {
        SoilGrid::new(DVec3::new(-0.05, -0.05, -0.1), DVec3::new(0.05, 0.05, 0.0), [1, 1, 2])
            .unwrap()
    }

    fn root() -> LineGrid {
        let nodes = [
            DVec3::ZERO,
            DVec3::new(0.0, 0.0, -0.04),
            DVec3::new(0.0, 0.0, -0.08),
        ];
        LineGrid::from_segments(&nodes, &[[0, 1], [1, 2]]).unwrap()
    }

    #[test]
    fn test_gauss_weights_sum_to_one() {
        for order in 1..=5 {
            let sum: f64 = gauss_points(order).unwrap().iter().map(|p| p.1).sum();
            assert!((sum - 1.0).abs() < 1e-14);
        }
        assert!(gauss_points(6).is_err());
        assert!(gauss_points(0).is_err());
    }

    #[test]
    fn test_midpoint_sources() {
        let mut coupling = EmbeddedCoupling::new(soil(), 1).unwrap();
        coupling.rebuild(&root()).unwrap();
        assert_eq!(coupling.len(), 2);

        let s = &coupling.bulk_point_sources()[1];
        assert!((s.position().z + 0.06).abs() < 1e-15);
        assert!((s.scale() - 0.04).abs() < 1e-15);
        let data = coupling.point_source_data(1).unwrap();
        assert_eq!(data.low_dim_element_idx(), 1);
        assert_eq!(data.bulk_element_idx(), 0);
        assert_eq!(coupling.point_source_data(0).unwrap().bulk_element_idx(), 1);
    }

    #[test]
    fn test_pri_vars_require_update() {
        let mut coupling = EmbeddedCoupling::new(soil(), 2).unwrap();
        coupling.rebuild(&root()).unwrap();
        assert_eq!(coupling.len(), 4);
        assert!(coupling.bulk_pri_vars(0).is_err());

        let soil_sol = vec![PrimaryVariables::uniform(1, 1.0), PrimaryVariables::uniform(1, 2.0)];
        let root_sol = vec![PrimaryVariables::uniform(1, 10.0), PrimaryVariables::uniform(1, 20.0)];
        coupling.update_solution(&soil_sol, &root_sol).unwrap();
        assert_eq!(coupling.bulk_pri_vars(0).unwrap().pressure(), 2.0);
        assert_eq!(coupling.low_dim_pri_vars(3).unwrap().pressure(), 20.0);
        assert!(coupling.low_dim_pri_vars(4).is_err());

        assert!(coupling.update_solution(&soil_sol, &root_sol[..1]).is_err());
    }

    #[test]
    fn test_points_outside_soil_skipped() {
        let nodes = [DVec3::new(0.0, 0.0, 0.04), DVec3::ZERO, DVec3::new(0.0, 0.0, -0.04)];
        let grid = LineGrid::from_segments(&nodes, &[[0, 1], [1, 2]]).unwrap();
        let mut coupling = EmbeddedCoupling::new(soil(), 1).unwrap();
        coupling.rebuild(&grid).unwrap();
        assert_eq!(coupling.len(), 1);
        assert_eq!(coupling.point_source_data(0).unwrap().low_dim_element_idx(), 1);
    }
}
