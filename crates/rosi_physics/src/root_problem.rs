// crates/rosi_physics/src/root_problem.rs

//! 根系木质部问题
//!
//! 一维根系网络上的压力方程：根颈处为给定压力或给定蒸腾，
//! 根尖无通量，沿根的径向交换来自点源（耦合）或土壤查询（非耦合）。
//!
//! 根系解以单元为中心，节点压力取相邻单元的平均。

use crate::boundary::BoundaryKind;
use crate::coupling::PointSource;
use crate::point_source::{exchange, source_integral, CouplingView, ExchangeParams};
use crate::soil_lookup::SoilLookup;
use crate::spatial_params::RootSpatialParams;
use crate::timeseries::TimeSeries;
use crate::units::{to_pa, BOUNDARY_EPS, MU, P_REF, RHO, SECONDS_PER_DAY, TEMPERATURE};
use rosi_config::{CollarConfig, CouplingConfig, RootConfig, SignalConfig};
use rosi_foundation::primary::{FRACTION_IDX, PRESSURE_IDX};
use rosi_foundation::{BoundingBox, Position, PrimaryVariables, RosiError, RosiResult};
use rosi_grid::{GridGeometry, LineGrid};
use std::f64::consts::PI;
use tracing::{debug, info};

// ============================================================
// 根颈通量
// ============================================================

/// 根颈诊断量
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollarDiagnostics {
    /// 实际蒸腾 [kg/s]
    pub actual_transpiration: f64,
    /// 未经限制的蒸腾 [kg/s]
    pub potential_transpiration: f64,
    /// 临界根颈压力允许的最大蒸腾 [kg/s]
    pub max_transpiration: f64,
    /// 是否受临界压力限制
    pub limited: bool,
}

/// 根颈 Neumann 通量
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollarFlux {
    /// 单位截面的质量通量 [kg/(m² s)]，正值为流出
    pub flux: f64,
    /// 根颈面上的诊断量，其他面为 `None`
    pub diagnostics: Option<CollarDiagnostics>,
}

impl CollarFlux {
    /// 无通量
    pub const ZERO: Self = Self {
        flux: 0.0,
        diagnostics: None,
    };

    /// 实际蒸腾 [kg/s]，非根颈面为 0
    pub fn actual_transpiration(&self) -> f64 {
        self.diagnostics.map_or(0.0, |d| d.actual_transpiration)
    }
}

// ============================================================
// 根系问题
// ============================================================

/// 根系问题
pub struct RootProblem {
    params: RootSpatialParams,
    soil: Box<dyn SoilLookup>,
    collar_kind: BoundaryKind,
    collar: TimeSeries,
    critical_pressure: f64,
    signal: Option<SignalConfig>,
    exchange: ExchangeParams,
    time: f64,
}

impl RootProblem {
    /// 由配置、土壤查询与初始根系网格创建
    pub fn new(
        root: &RootConfig,
        collar: &CollarConfig,
        coupling: &CouplingConfig,
        soil: Box<dyn SoilLookup>,
        grid: &LineGrid,
    ) -> RosiResult<Self> {
        let params = RootSpatialParams::new(root, grid)?;
        let n_components = if coupling.transport.is_some() || root.signal.is_some() {
            2
        } else {
            1
        };
        let collar_kind = BoundaryKind::from(collar.mode);
        info!(
            "根系问题: {} 个单元, 根颈 {}, 土壤 {}",
            params.element_count(),
            collar_kind,
            soil.describe()
        );

        Ok(Self {
            params,
            soil,
            collar_kind,
            collar: TimeSeries::from_config(&collar.series)?,
            critical_pressure: to_pa(collar.critical_pressure),
            signal: root.signal.clone(),
            exchange: ExchangeParams {
                krel: coupling.krel,
                transport: coupling.transport.clone(),
                n_components,
            },
            time: 0.0,
        })
    }

    /// 空间参数
    pub fn params(&self) -> &RootSpatialParams {
        &self.params
    }

    /// 空间参数（可变），作为附加数据交给网格生长
    pub fn params_mut(&mut self) -> &mut RootSpatialParams {
        &mut self.params
    }

    /// 主变量分量数
    pub fn n_components(&self) -> usize {
        self.exchange.n_components
    }

    /// 替换土壤查询
    pub fn set_soil(&mut self, soil: Box<dyn SoilLookup>) {
        info!("根系土壤查询: {} -> {}", self.soil.describe(), soil.describe());
        self.soil = soil;
    }

    /// 位置处的土壤压力 [Pa]
    pub fn soil(&self, position: Position) -> f64 {
        to_pa(self.soil.value(position))
    }

    /// 设置当前模拟时间 [s]
    pub fn set_time(&mut self, t: f64) {
        self.time = t;
        self.params.set_time(t);
    }

    /// 当前模拟时间 [s]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// 温度 [K]
    pub fn temperature(&self) -> f64 {
        TEMPERATURE
    }

    /// 当前根颈值：压力模式为 [Pa]，蒸腾模式为 [kg/s]
    pub fn collar_value(&self) -> f64 {
        let v = self.collar.get_value(self.time);
        if self.collar_kind.is_dirichlet() {
            to_pa(v)
        } else {
            v
        }
    }

    // ------------------------------------------------------------
    // 边界条件
    // ------------------------------------------------------------

    /// 边界类型：包围盒顶部为根颈，其余为无通量
    pub fn boundary_kind(&self, position: Position, bbox: &BoundingBox) -> BoundaryKind {
        if bbox.on_upper_boundary(position, BOUNDARY_EPS) {
            self.collar_kind
        } else {
            BoundaryKind::Neumann
        }
    }

    /// 根颈压力 [Pa]
    pub fn dirichlet(&self, position: Position, bbox: &BoundingBox) -> RosiResult<f64> {
        if !self.boundary_kind(position, bbox).is_dirichlet() {
            return Err(RosiError::invalid_input(format!(
                "{position} 处不是 Dirichlet 边界"
            )));
        }
        Ok(self.collar_value())
    }

    /// 单元 `e` 在面 `face` 处的 Neumann 通量
    ///
    /// 根颈蒸腾受临界根颈压力限制：
    /// `maxTrans = ρ/μ · kx · (p - p_crit) / dist`，结果除以截面积 `π r²`。
    pub fn neumann(
        &self,
        geometry: &GridGeometry,
        e: usize,
        face: Position,
        pressure: f64,
    ) -> RosiResult<CollarFlux> {
        if !geometry
            .bounding_box()
            .on_upper_boundary(face, BOUNDARY_EPS)
        {
            return Ok(CollarFlux::ZERO);
        }

        let dist = geometry.center(e).distance(face);
        if !(dist > 0.0) {
            return Err(RosiError::invalid_input(format!(
                "单元 {e} 中心与根颈面重合"
            )));
        }
        let kx = self.params.kx(e)?;

        let max_transpiration = RHO / MU * kx * (pressure - self.critical_pressure) / dist;
        let potential_transpiration = if self.collar_kind.is_dirichlet() {
            RHO / MU * kx * (pressure - self.collar_value()) / dist
        } else {
            self.collar_value()
        };
        let limited = max_transpiration < potential_transpiration;
        let actual = potential_transpiration.min(max_transpiration);
        if limited {
            debug!(
                "根颈蒸腾受限: 潜在 {:e} kg/s, 最大 {:e} kg/s",
                potential_transpiration, max_transpiration
            );
        }

        Ok(CollarFlux {
            flux: actual / self.extrusion_factor(e)?,
            diagnostics: Some(CollarDiagnostics {
                actual_transpiration: actual,
                potential_transpiration,
                max_transpiration,
                limited,
            }),
        })
    }

    /// 根颈处的通量，取位于包围盒顶部的第一个节点及其第一个相邻单元
    pub fn collar_flux(
        &self,
        grid: &LineGrid,
        geometry: &GridGeometry,
        solution: &[PrimaryVariables],
    ) -> RosiResult<CollarFlux> {
        RosiError::check_size("root_solution", grid.element_count(), solution.len())?;
        let bbox = geometry.bounding_box();
        for v in 0..grid.vertex_count() {
            let position = grid.vertex_position(v)?;
            if !bbox.on_upper_boundary(position, BOUNDARY_EPS) {
                continue;
            }
            if let Some(&e) = geometry.elements_of_vertex(v).first() {
                return self.neumann(geometry, e, position, solution[e].pressure());
            }
        }
        Err(RosiError::not_found("根颈节点"))
    }

    // ------------------------------------------------------------
    // 初始条件与几何
    // ------------------------------------------------------------

    /// 初始压力等于土壤压力 [Pa]
    pub fn initial(&self, position: Position) -> f64 {
        self.soil(position)
    }

    /// 所有单元的初始主变量
    pub fn initial_solution(&self, geometry: &GridGeometry) -> Vec<PrimaryVariables> {
        geometry
            .centers()
            .iter()
            .map(|&c| {
                let mut pv = PrimaryVariables::zeros(self.n_components());
                pv[PRESSURE_IDX] = self.initial(c);
                pv
            })
            .collect()
    }

    /// 截面积 `π r²` [m²]
    pub fn extrusion_factor(&self, e: usize) -> RosiResult<f64> {
        let r = self.params.radius(e)?;
        Ok(PI * r * r)
    }

    // ------------------------------------------------------------
    // 通量场
    // ------------------------------------------------------------

    /// 节点压力 [Pa]：相邻单元压力的平均
    pub fn vertex_pressures(
        &self,
        geometry: &GridGeometry,
        solution: &[PrimaryVariables],
    ) -> RosiResult<Vec<f64>> {
        RosiError::check_size("root_solution", geometry.element_count(), solution.len())?;
        Ok((0..geometry.vertex_count())
            .map(|v| {
                let elements = geometry.elements_of_vertex(v);
                if elements.is_empty() {
                    return 0.0;
                }
                elements.iter().map(|&e| solution[e].pressure()).sum::<f64>()
                    / elements.len() as f64
            })
            .collect())
    }

    /// 单元轴向通量 `kx · (p1 - p0) / length`
    pub fn axial_flux(
        &self,
        geometry: &GridGeometry,
        solution: &[PrimaryVariables],
    ) -> RosiResult<Vec<f64>> {
        let pv = self.vertex_pressures(geometry, solution)?;
        (0..geometry.element_count())
            .map(|e| {
                let [v0, v1] = geometry.vertices(e);
                Ok(self.params.kx(e)? * (pv[v1] - pv[v0]) / geometry.length(e))
            })
            .collect()
    }

    /// 单元径向通量 `kr · (p_soil(center) - (p0 + p1) / 2)`
    pub fn radial_flux(
        &self,
        geometry: &GridGeometry,
        solution: &[PrimaryVariables],
    ) -> RosiResult<Vec<f64>> {
        let pv = self.vertex_pressures(geometry, solution)?;
        (0..geometry.element_count())
            .map(|e| {
                let [v0, v1] = geometry.vertices(e);
                let mean = 0.5 * (pv[v0] + pv[v1]);
                Ok(self.params.kr(e)? * (self.soil(geometry.center(e)) - mean))
            })
            .collect()
    }

    /// 第一个单元的轴向与径向通量之和
    pub fn transpiration(
        &self,
        geometry: &GridGeometry,
        solution: &[PrimaryVariables],
    ) -> RosiResult<f64> {
        let axial = self.axial_flux(geometry, solution)?;
        let radial = self.radial_flux(geometry, solution)?;
        match (axial.first(), radial.first()) {
            (Some(a), Some(r)) => Ok(a + r),
            _ => Err(RosiError::invalid_input("根系网格没有单元")),
        }
    }

    /// 对每个单元求值，用于输出
    pub fn vtk_field<F>(&self, f: F) -> RosiResult<Vec<f64>>
    where
        F: Fn(&RootSpatialParams, usize) -> RosiResult<f64>,
    {
        (0..self.params.element_count())
            .map(|e| f(&self.params, e))
            .collect()
    }

    // ------------------------------------------------------------
    // 源项
    // ------------------------------------------------------------

    /// 非耦合时的单元源项 [kg/(m³ s)]
    ///
    /// `kr · 2πa · (p_soil - p) / (πa²) · ρ`
    pub fn source(&self, geometry: &GridGeometry, e: usize, pressure: f64) -> RosiResult<f64> {
        let a = self.params.radius(e)?;
        let kr = self.params.kr(e)?;
        let soil = self.soil(geometry.center(e));
        Ok(kr * 2.0 * PI * a * (soil - pressure) / (PI * a * a) * RHO)
    }

    /// 根系侧点源 [kg/s]，与土壤侧符号相反
    ///
    /// 配置了信号时，第二个分量为根尖信号产率。
    pub fn point_source(
        &self,
        view: Option<CouplingView<'_>>,
        source: &PointSource,
    ) -> RosiResult<PrimaryVariables> {
        let mut values = exchange(view, &self.exchange, source)?.scaled(-1.0);
        if let (Some(view), Some(signal)) = (view, &self.signal) {
            if values.len() > FRACTION_IDX {
                values[FRACTION_IDX] = self.signal(view, signal, source)?;
            }
        }
        Ok(values)
    }

    // 年龄不超过 max_age 的根单元在压力低于阈值时产生信号
    fn signal(
        &self,
        view: CouplingView<'_>,
        signal: &SignalConfig,
        source: &PointSource,
    ) -> RosiResult<f64> {
        let id = source.id();
        let e = view.manager.point_source_data(id)?.low_dim_element_idx();
        if self.params.age(e)? / SECONDS_PER_DAY > signal.max_age {
            return Ok(0.0);
        }
        let p = (view.manager.low_dim_pri_vars(id)?.pressure() - P_REF).abs();
        let p0 = (to_pa(signal.threshold_head) - P_REF).abs();
        if p < p0 {
            return Ok(0.0);
        }
        let rate = signal.rate * (p - p0) * signal.dry_mass * signal.molar_mass.unwrap_or(1.0);
        Ok(rate * source.scale())
    }

    /// 所有根系侧点源之和 [kg/s]
    pub fn source_integral(&self, view: CouplingView<'_>) -> RosiResult<PrimaryVariables> {
        source_integral(
            "根系",
            view.manager.low_dim_point_sources(),
            self.n_components(),
            |s| self.point_source(Some(view), s),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coupling::{CouplingManager, EmbeddedCoupling};
    use crate::soil_lookup::DepthTable;
    use crate::units::{kr_to_si, kx_to_si, to_head};
    use glam::DVec3;
    use rosi_config::{AgeTable, CollarMode, NetworkConfig, OrderParams, SeriesConfig};
    use rosi_grid::SoilGrid;

    fn root_config() -> RootConfig {
        RootConfig {
            orders: vec![OrderParams {
                kr: AgeTable::Constant(86400.0),
                kx: AgeTable::Constant(86400.0),
                radius: AgeTable::Constant(0.05),
            }],
            initial_age: 0.5 * SECONDS_PER_DAY,
            network: NetworkConfig {
                nodes: vec![[0.0, 0.0, 0.0], [0.0, 0.0, -0.01], [0.0, 0.0, -0.02]],
                segments: vec![[0, 1], [1, 2]],
                orders: vec![0, 0],
                creation_times: vec![0.0, 0.0],
            },
            ..Default::default()
        }
    }

    fn grid(config: &RootConfig) -> LineGrid {
        let nodes: Vec<DVec3> = config.network.nodes.iter().map(|&p| DVec3::from(p)).collect();
        LineGrid::from_segments(&nodes, &config.network.segments).unwrap()
    }

    fn collar(mode: CollarMode, value: f64) -> CollarConfig {
        CollarConfig {
            mode,
            series: SeriesConfig::constant(value),
            critical_pressure: -1.0e4,
        }
    }

    fn problem(root: &RootConfig, collar: &CollarConfig) -> (RootProblem, LineGrid, GridGeometry) {
        let g = grid(root);
        let geometry = GridGeometry::new(&g).unwrap();
        let p = RootProblem::new(
            root,
            collar,
            &CouplingConfig::default(),
            Box::new(DepthTable::uniform(-100.0)),
            &g,
        )
        .unwrap();
        (p, g, geometry)
    }

    #[test]
    fn test_boundary_kind_at_collar() {
        let root = root_config();
        let (p, _, geometry) = problem(&root, &collar(CollarMode::Pressure, -1.5e4));
        let bbox = geometry.bounding_box();
        assert_eq!(p.boundary_kind(DVec3::ZERO, &bbox), BoundaryKind::Dirichlet);
        assert_eq!(
            p.boundary_kind(DVec3::new(0.0, 0.0, -0.02), &bbox),
            BoundaryKind::Neumann
        );
        assert!((to_head(p.dirichlet(DVec3::ZERO, &bbox).unwrap()) + 1.5e4).abs() < 1e-6);
        assert!(p.dirichlet(DVec3::new(0.0, 0.0, -0.02), &bbox).is_err());
    }

    #[test]
    fn test_transpiration_not_limited() {
        let root = root_config();
        let (p, g, geometry) = problem(&root, &collar(CollarMode::Transpiration, 5.0e-9));
        let sol = vec![PrimaryVariables::uniform(1, to_pa(-300.0)); 2];
        let flux = p.collar_flux(&g, &geometry, &sol).unwrap();
        let diag = flux.diagnostics.unwrap();
        assert!(!diag.limited);
        assert_eq!(diag.actual_transpiration, 5.0e-9);
        let area = PI * 5.0e-4 * 5.0e-4;
        assert!((flux.flux - 5.0e-9 / area).abs() < 1e-12);
    }

    #[test]
    fn test_collar_clamped_by_critical_pressure() {
        let root = root_config();
        let (p, g, geometry) = problem(&root, &collar(CollarMode::Transpiration, 5.0e-9));
        let sol = vec![PrimaryVariables::uniform(1, to_pa(-1.0e4)); 2];
        let flux = p.collar_flux(&g, &geometry, &sol).unwrap();
        let diag = flux.diagnostics.unwrap();
        assert!(diag.limited);
        assert_eq!(diag.actual_transpiration, 0.0);
        assert_eq!(flux.actual_transpiration(), 0.0);

        // 根颈压力低于临界压力时同样受限
        let (p, g, geometry) = problem(&root, &collar(CollarMode::Pressure, -1.5e4));
        let sol = vec![PrimaryVariables::uniform(1, to_pa(-300.0)); 2];
        let diag = p.collar_flux(&g, &geometry, &sol).unwrap().diagnostics.unwrap();
        assert!(diag.limited);
        assert_eq!(diag.actual_transpiration, diag.max_transpiration);
    }

    #[test]
    fn test_tip_face_has_no_flux() {
        let root = root_config();
        let (p, _, geometry) = problem(&root, &collar(CollarMode::Transpiration, 5.0e-9));
        let flux = p
            .neumann(&geometry, 1, DVec3::new(0.0, 0.0, -0.02), to_pa(-300.0))
            .unwrap();
        assert_eq!(flux, CollarFlux::ZERO);
    }

    #[test]
    fn test_flux_fields() {
        let root = root_config();
        let (p, _, geometry) = problem(&root, &collar(CollarMode::Transpiration, 5.0e-9));
        let sol = vec![
            PrimaryVariables::uniform(1, to_pa(-300.0)),
            PrimaryVariables::uniform(1, to_pa(-400.0)),
        ];
        let kx = kx_to_si(86400.0);
        let kr = kr_to_si(86400.0);

        let pv = p.vertex_pressures(&geometry, &sol).unwrap();
        let [v0, v1] = geometry.vertices(0);
        let expected_axial = kx * (pv[v1] - pv[v0]) / 0.01;
        let axial = p.axial_flux(&geometry, &sol).unwrap();
        assert!((axial[0] - expected_axial).abs() < 1e-18);

        let radial = p.radial_flux(&geometry, &sol).unwrap();
        assert_eq!(radial.len(), 2);
        // 土壤比根系湿，水流入根
        assert!(radial.iter().all(|&r| r > 0.0));
        let mean = 0.5 * (pv[v0] + pv[v1]);
        assert!((radial[0] - kr * (to_pa(-100.0) - mean)).abs() < 1e-9);

        let t = p.transpiration(&geometry, &sol).unwrap();
        assert!((t - (axial[0] + radial[0])).abs() < 1e-12);
    }

    #[test]
    fn test_vtk_field_and_source() {
        let root = root_config();
        let (p, _, geometry) = problem(&root, &collar(CollarMode::Transpiration, 5.0e-9));
        let radius = p.vtk_field(|params, e| params.radius(e)).unwrap();
        assert_eq!(radius.len(), 2);
        assert!((radius[1] - 5.0e-4).abs() < 1e-15);

        let s = p.source(&geometry, 0, to_pa(-100.0)).unwrap();
        assert!(s.abs() < 1e-12);
        assert!(p.source(&geometry, 0, to_pa(-300.0)).unwrap() > 0.0);
        assert!((p.initial(DVec3::new(0.0, 0.0, -0.5)) - to_pa(-100.0)).abs() < 1e-12);
    }

    fn coupled(soil_head: f64, root_head: f64, root: &RootConfig) -> (RootProblem, EmbeddedCoupling) {
        coupled_with_order(soil_head, root_head, root, 1)
    }

    fn coupled_with_order(
        soil_head: f64,
        root_head: f64,
        root: &RootConfig,
        order: usize,
    ) -> (RootProblem, EmbeddedCoupling) {
        let g = grid(root);
        let p = RootProblem::new(
            root,
            &collar(CollarMode::Transpiration, 5.0e-9),
            &CouplingConfig::default(),
            Box::new(DepthTable::uniform(soil_head)),
            &g,
        )
        .unwrap();
        let soil = SoilGrid::new(
            DVec3::new(-0.05, -0.05, -0.1),
            DVec3::new(0.05, 0.05, 0.0),
            [1, 1, 2],
        )
        .unwrap();
        let mut coupling = EmbeddedCoupling::new(soil, order).unwrap();
        coupling.rebuild(&g).unwrap();
        let n = p.n_components();
        coupling
            .update_solution(
                &vec![PrimaryVariables::uniform(n, to_pa(soil_head)); 2],
                &vec![PrimaryVariables::uniform(n, to_pa(root_head)); 2],
            )
            .unwrap();
        (p, coupling)
    }

    #[test]
    fn test_root_side_is_negated() {
        let root = root_config();
        let (p, coupling) = coupled(-100.0, -300.0, &root);
        let view = CouplingView::new(&coupling, p.params());
        let exchange_params = ExchangeParams {
            krel: 1.0,
            transport: None,
            n_components: 1,
        };
        for s in coupling.low_dim_point_sources() {
            let root_side = p.point_source(Some(view), s).unwrap();
            let soil_side = exchange(Some(view), &exchange_params, s).unwrap();
            assert_eq!(root_side.pressure(), -soil_side.pressure());
            // 土壤较湿，根系吸水
            assert!(root_side.pressure() > 0.0);
        }
        let total = p.source_integral(view).unwrap();
        assert!(total.pressure() > 0.0);

        let decoupled = p.point_source(None, &coupling.low_dim_point_sources()[0]).unwrap();
        assert_eq!(decoupled.pressure(), 0.0);
    }

    fn raw_signal(signal: &SignalConfig, root_head: f64) -> f64 {
        signal.rate
            * ((to_pa(root_head) - P_REF).abs() - (to_pa(signal.threshold_head) - P_REF).abs())
            * signal.dry_mass
    }

    #[test]
    fn test_signal_production() {
        let mut root = root_config();
        root.signal = Some(SignalConfig::default());
        let (p, coupling) = coupled(-100.0, -6000.0, &root);
        assert_eq!(p.n_components(), 2);
        let view = CouplingView::new(&coupling, p.params());
        let s = &coupling.low_dim_point_sources()[0];
        let values = p.point_source(Some(view), s).unwrap();
        let expected = raw_signal(&SignalConfig::default(), -6000.0) * s.scale();
        assert!((s.scale() - 0.01).abs() < 1e-15);
        assert!((values[FRACTION_IDX] - expected).abs() < 1e-27);

        // 根系湿于阈值时不产生信号
        let (p, coupling) = coupled(-100.0, -300.0, &root);
        let view = CouplingView::new(&coupling, p.params());
        let values = p
            .point_source(Some(view), &coupling.low_dim_point_sources()[0])
            .unwrap();
        assert_eq!(values[FRACTION_IDX], 0.0);

        // 龄期超过一天不产生信号
        root.initial_age = 2.0 * SECONDS_PER_DAY;
        let (p, coupling) = coupled(-100.0, -6000.0, &root);
        let view = CouplingView::new(&coupling, p.params());
        let values = p
            .point_source(Some(view), &coupling.low_dim_point_sources()[0])
            .unwrap();
        assert_eq!(values[FRACTION_IDX], 0.0);
    }

    #[test]
    fn test_signal_scales_with_weight_and_length() {
        let mut root = root_config();
        root.network.nodes = vec![[0.0, 0.0, 0.0], [0.0, 0.0, -0.02], [0.0, 0.0, -0.04]];
        root.signal = Some(SignalConfig::default());
        let (p, coupling) = coupled_with_order(-100.0, -6000.0, &root, 2);
        let view = CouplingView::new(&coupling, p.params());
        let raw = raw_signal(&SignalConfig::default(), -6000.0);

        let sources = coupling.low_dim_point_sources();
        assert_eq!(sources.len(), 4);
        let mut element_total = 0.0;
        for s in sources.iter().take(2) {
            assert!((s.quadrature_weight() - 0.5).abs() < 1e-15);
            assert!((s.integration_element() - 0.02).abs() < 1e-15);
            let values = p.point_source(Some(view), s).unwrap();
            assert!((values[FRACTION_IDX] - raw * s.scale()).abs() < 1e-27);
            element_total += values[FRACTION_IDX];
        }
        // 单元内各积分点之和等于单位长度产率乘以单元长度
        assert!((element_total - raw * 0.02).abs() < 1e-27);
    }
}
