// crates/rosi_physics/src/soil_problem.rs

//! Richards 土壤问题
//!
//! 提供初始条件、上/下边界条件、外部源项和根系点源。
//! 材料定律（Van Genuchten）由外部求解器提供，这里只接收相对渗透率。

use crate::boundary::{BoundaryFluxes, BoundaryKind};
use crate::coupling::PointSource;
use crate::point_source::{exchange, source_integral, CouplingView, ExchangeParams};
use crate::soil_lookup::{DepthTable, SoilLookup};
use crate::timeseries::TimeSeries;
use crate::units::{flux_to_mass, to_head, to_pa, BOUNDARY_EPS, RHO};
use rosi_config::{CouplingConfig, SoilBoundary, SoilConfig};
use rosi_foundation::primary::PRESSURE_IDX;
use rosi_foundation::{Position, PrimaryVariables, RosiError, RosiResult};
use rosi_grid::SoilGrid;
use tracing::{debug, info};

/// 土壤问题
pub struct SoilProblem {
    grid: SoilGrid,
    initial: DepthTable,
    top: SoilBoundary,
    bottom: SoilBoundary,
    conductivity: f64,
    critical_pressure: f64,
    gravity: f64,
    precipitation: Option<TimeSeries>,
    exchange: ExchangeParams,
    source: Option<Vec<f64>>,
    time: f64,
}

impl SoilProblem {
    /// 由配置创建
    pub fn new(config: &SoilConfig, coupling: &CouplingConfig) -> RosiResult<Self> {
        let grid = SoilGrid::new(
            Position::from(config.min),
            Position::from(config.max),
            config.cells,
        )?;
        let precipitation = config
            .precipitation
            .as_ref()
            .map(TimeSeries::from_config)
            .transpose()?;
        if matches!(config.top, SoilBoundary::Atmospheric) && precipitation.is_none() {
            return Err(RosiError::missing_config("soil.precipitation"));
        }
        info!(
            "土壤问题: {} 个单元, 上边界 {}, 下边界 {}",
            grid.n_cells(),
            config.top.name(),
            config.bottom.name()
        );

        Ok(Self {
            grid,
            initial: DepthTable::new(config.initial_head.clone())?,
            top: config.top.clone(),
            bottom: config.bottom.clone(),
            conductivity: config.conductivity,
            critical_pressure: config.critical_pressure,
            gravity: if config.gravity { 1.0 } else { 0.0 },
            precipitation,
            exchange: ExchangeParams {
                krel: coupling.krel,
                transport: coupling.transport.clone(),
                n_components: coupling.n_components(),
            },
            source: None,
            time: 0.0,
        })
    }

    /// 土壤网格
    pub fn grid(&self) -> &SoilGrid {
        &self.grid
    }

    /// 主变量分量数
    pub fn n_components(&self) -> usize {
        self.exchange.n_components
    }

    /// 设置当前模拟时间 [s]
    pub fn set_time(&mut self, t: f64) {
        self.time = t;
    }

    /// 初始压力 [Pa]
    pub fn initial(&self, position: Position) -> f64 {
        to_pa(self.initial.value(position))
    }

    /// 所有单元的初始主变量
    pub fn initial_solution(&self) -> Vec<PrimaryVariables> {
        self.grid
            .cell_centers()
            .into_iter()
            .map(|c| {
                let mut pv = PrimaryVariables::zeros(self.n_components());
                pv[PRESSURE_IDX] = self.initial(c);
                pv
            })
            .collect()
    }

    fn on_upper(&self, p: Position) -> bool {
        self.grid.bounding_box().on_upper_boundary(p, BOUNDARY_EPS)
    }

    fn on_lower(&self, p: Position) -> bool {
        self.grid.bounding_box().on_lower_boundary(p, BOUNDARY_EPS)
    }

    /// 边界面的类型，侧面与内部为无通量 Neumann
    pub fn boundary_kind(&self, face: Position) -> BoundaryKind {
        if self.on_upper(face) {
            BoundaryKind::from(&self.top)
        } else if self.on_lower(face) {
            BoundaryKind::from(&self.bottom)
        } else {
            BoundaryKind::Neumann
        }
    }

    /// Dirichlet 面上的压力 [Pa]
    pub fn dirichlet(&self, face: Position) -> RosiResult<f64> {
        let bc = if self.on_upper(face) {
            &self.top
        } else if self.on_lower(face) {
            &self.bottom
        } else {
            return Err(RosiError::invalid_input(format!("{face} 不在上/下边界上")));
        };
        match bc {
            SoilBoundary::ConstantPressure { value } => Ok(to_pa(*value)),
            other => Err(RosiError::invalid_input(format!(
                "{} 边界没有 Dirichlet 值",
                other.name()
            ))),
        }
    }

    /// Neumann 面上的质量通量 [kg/(m² s)]，负值为流入
    ///
    /// 配置中的通量 [cm/day] 以正值表示入渗。
    ///
    /// `cell_center` 与 `pressure` 为面内侧单元的中心与压力，
    /// `krw` 为该单元的相对渗透率。
    pub fn neumann(
        &self,
        face: Position,
        cell_center: Position,
        pressure: f64,
        krw: f64,
    ) -> RosiResult<f64> {
        let (bc, is_top) = if self.on_upper(face) {
            (&self.top, true)
        } else if self.on_lower(face) {
            (&self.bottom, false)
        } else {
            return Ok(0.0);
        };

        let kc = self.conductivity;
        let h = to_head(pressure);
        let dz = 100.0 * 2.0 * (cell_center.z - face.z).abs();
        let max_in = RHO * kc * ((h - 0.0) / dz - self.gravity);
        let max_out = RHO * krw * kc * ((h - self.critical_pressure) / dz - self.gravity);
        let limit = |f: f64, scale: f64| {
            if f < 0.0 {
                f.max(max_in * scale)
            } else {
                f.min(max_out * scale)
            }
        };

        let f = match bc {
            SoilBoundary::ConstantFlux { value } => limit(-flux_to_mass(*value), 1.0),
            SoilBoundary::ConstantFluxCyl { value } => {
                limit(-flux_to_mass(*value) * face.x, face.x)
            }
            SoilBoundary::Atmospheric if is_top => {
                let series = self
                    .precipitation
                    .as_ref()
                    .ok_or_else(|| RosiError::missing_config("soil.precipitation"))?;
                limit(-flux_to_mass(series.get_value(self.time)), 1.0)
            }
            SoilBoundary::FreeDrainage if !is_top => krw * kc * RHO,
            other => {
                return Err(RosiError::invalid_input(format!(
                    "{} 边界不能作为{}边界的 Neumann 条件",
                    other.name(),
                    if is_top { "上" } else { "下" }
                )))
            }
        };
        Ok(f)
    }

    /// 上/下边界的平均 Neumann 通量，Dirichlet 边界记为 0
    ///
    /// `krw(cell)` 返回单元的相对渗透率。
    pub fn boundary_fluxes<F>(
        &self,
        solution: &[PrimaryVariables],
        krw: F,
    ) -> RosiResult<BoundaryFluxes>
    where
        F: Fn(usize) -> f64,
    {
        RosiError::check_size("soil_solution", self.grid.n_cells(), solution.len())?;
        let [nx, ny, nz] = self.grid.cells();
        let bbox = self.grid.bounding_box();

        let mean = |k: usize, z: f64| -> RosiResult<f64> {
            let mut sum = 0.0;
            let mut count = 0usize;
            for j in 0..ny {
                for i in 0..nx {
                    let cell = self.grid.linear_index(i, j, k);
                    let center = self.grid.cell_center(cell)?;
                    let face = Position::new(center.x, center.y, z);
                    if self.boundary_kind(face).is_dirichlet() {
                        continue;
                    }
                    sum += self.neumann(face, center, solution[cell].pressure(), krw(cell))?;
                    count += 1;
                }
            }
            Ok(if count == 0 { 0.0 } else { sum / count as f64 })
        };

        let fluxes = BoundaryFluxes {
            upper: mean(nz - 1, bbox.max.z)?,
            lower: mean(0, bbox.min.z)?,
        };
        debug!("土壤边界通量: 上 {:e}, 下 {:e}", fluxes.upper, fluxes.lower);
        Ok(fluxes)
    }

    /// 设置每个单元的外部源 [kg/s]，`None` 清除
    pub fn set_source(&mut self, source: Option<Vec<f64>>) -> RosiResult<()> {
        if let Some(s) = &source {
            RosiError::check_size("soil_source", self.grid.n_cells(), s.len())?;
        }
        self.source = source;
        Ok(())
    }

    /// 单元源项 [kg/(m³ s)]
    pub fn source(&self, cell: usize) -> RosiResult<f64> {
        match &self.source {
            Some(s) => {
                RosiError::check_index("SoilCell", cell, s.len())?;
                Ok(s[cell] / self.grid.cell_volume())
            }
            None => Ok(0.0),
        }
    }

    /// 根系点源 [kg/s]，正值表示水进入土壤
    pub fn point_source(
        &self,
        view: Option<CouplingView<'_>>,
        source: &PointSource,
    ) -> RosiResult<PrimaryVariables> {
        exchange(view, &self.exchange, source)
    }

    /// 所有土壤侧点源之和 [kg/s]
    pub fn source_integral(&self, view: CouplingView<'_>) -> RosiResult<PrimaryVariables> {
        source_integral(
            "土壤",
            view.manager.bulk_point_sources(),
            self.n_components(),
            |s| self.point_source(Some(view), s),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    fn config(top: SoilBoundary, bottom: SoilBoundary) -> SoilConfig {
        SoilConfig {
            min: [0.0, 0.0, -1.0],
            max: [1.0, 1.0, 0.0],
            cells: [1, 1, 10],
            initial_head: vec![(-1.0, -200.0), (0.0, -100.0)],
            top,
            bottom,
            conductivity: 1.0e-6,
            ..Default::default()
        }
    }

    fn problem(top: SoilBoundary, bottom: SoilBoundary) -> SoilProblem {
        SoilProblem::new(&config(top, bottom), &CouplingConfig::default()).unwrap()
    }

    const TOP: DVec3 = DVec3::new(0.5, 0.5, 0.0);
    const TOP_CELL: DVec3 = DVec3::new(0.5, 0.5, -0.05);
    const BOTTOM: DVec3 = DVec3::new(0.5, 0.5, -1.0);
    const BOTTOM_CELL: DVec3 = DVec3::new(0.5, 0.5, -0.95);

    #[test]
    fn test_initial_profile() {
        let p = problem(SoilBoundary::ConstantFlux { value: 0.0 }, SoilBoundary::FreeDrainage);
        assert!((to_head(p.initial(DVec3::new(0.5, 0.5, -0.5))) + 150.0).abs() < 1e-9);
        let sol = p.initial_solution();
        assert_eq!(sol.len(), 10);
        assert!(sol[0].pressure() < sol[9].pressure());
    }

    #[test]
    fn test_boundary_kind_query() {
        let p = problem(
            SoilBoundary::ConstantPressure { value: -50.0 },
            SoilBoundary::FreeDrainage,
        );
        assert_eq!(p.boundary_kind(TOP), BoundaryKind::Dirichlet);
        assert_eq!(p.boundary_kind(BOTTOM), BoundaryKind::Neumann);
        assert_eq!(p.boundary_kind(DVec3::new(0.0, 0.5, -0.5)), BoundaryKind::Neumann);
        assert!((p.dirichlet(TOP).unwrap() - to_pa(-50.0)).abs() < 1e-9);
        assert!(p.dirichlet(BOTTOM).is_err());
        assert!(p.neumann(TOP, TOP_CELL, to_pa(-100.0), 1.0).is_err());
    }

    #[test]
    fn test_constant_flux_limited() {
        // 蒸发 1 cm/day，干燥土壤限制到最大蒸发
        let p = problem(SoilBoundary::ConstantFlux { value: -1.0 }, SoilBoundary::FreeDrainage);
        let wet = p.neumann(TOP, TOP_CELL, to_pa(-100.0), 1.0).unwrap();
        assert!((wet - flux_to_mass(1.0)).abs() < 1e-15);
        let dry = p.neumann(TOP, TOP_CELL, to_pa(-1.0e4), 1.0).unwrap();
        assert!(dry <= 0.0);

        // 入渗
        let p = problem(SoilBoundary::ConstantFlux { value: 1.0 }, SoilBoundary::FreeDrainage);
        let inflow = p.neumann(TOP, TOP_CELL, to_pa(-100.0), 1.0).unwrap();
        assert!((inflow + flux_to_mass(1.0)).abs() < 1e-15);
    }

    #[test]
    fn test_free_drainage() {
        let p = problem(SoilBoundary::ConstantFlux { value: 0.0 }, SoilBoundary::FreeDrainage);
        let f = p.neumann(BOTTOM, BOTTOM_CELL, to_pa(-100.0), 0.5).unwrap();
        assert!((f - 0.5 * 1.0e-6 * RHO).abs() < 1e-15);
        assert_eq!(p.neumann(DVec3::new(0.0, 0.5, -0.5), BOTTOM_CELL, 0.0, 1.0).unwrap(), 0.0);
    }

    #[test]
    fn test_atmospheric_follows_time() {
        let mut cfg = config(SoilBoundary::Atmospheric, SoilBoundary::FreeDrainage);
        cfg.precipitation = Some(rosi_config::SeriesConfig {
            points: vec![(0.0, 0.0), (100.0, -2.0)],
            extrapolation: Default::default(),
        });
        let mut p = SoilProblem::new(&cfg, &CouplingConfig::default()).unwrap();
        p.set_time(50.0);
        let f = p.neumann(TOP, TOP_CELL, to_pa(-100.0), 1.0).unwrap();
        assert!((f - flux_to_mass(1.0)).abs() < 1e-15);

        cfg.precipitation = None;
        assert!(SoilProblem::new(&cfg, &CouplingConfig::default()).is_err());
    }

    #[test]
    fn test_boundary_fluxes_skip_dirichlet() {
        let p = problem(
            SoilBoundary::ConstantPressure { value: -50.0 },
            SoilBoundary::FreeDrainage,
        );
        let sol = p.initial_solution();
        let fluxes = p.boundary_fluxes(&sol, |_| 1.0).unwrap();
        assert_eq!(fluxes.upper, 0.0);
        assert!((fluxes.lower - 1.0e-6 * RHO).abs() < 1e-15);
    }

    #[test]
    fn test_external_source() {
        let mut p = problem(SoilBoundary::ConstantFlux { value: 0.0 }, SoilBoundary::FreeDrainage);
        assert_eq!(p.source(0).unwrap(), 0.0);
        p.set_source(Some(vec![1.0; 10])).unwrap();
        assert!((p.source(3).unwrap() - 10.0).abs() < 1e-12);
        assert!(p.set_source(Some(vec![1.0; 3])).is_err());
    }
}
