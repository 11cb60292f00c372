// apps/rosi_cli/src/commands/run.rs

//! 运行模拟命令
//!
//! 每个时间步：推进时间、生长根系并迁移单元数据、重建耦合点源、
//! 用当前土壤解更新根系的土壤查询、计算根颈通量并写入蒸腾记录。
//! 不求解 Richards 方程或木质部方程，解在步与步之间只随生长迁移。

use anyhow::{Context, Result};
use clap::Args;
use glam::DVec3;
use rosi_config::{GrowthModelConfig, SimulationConfig};
use rosi_foundation::PrimaryVariables;
use rosi_grid::{GridGeometry, LineGrid};
use rosi_growth::{GridGrowth, GrowthContext, GrowthModel, LinearTipGrowth, ScriptedGrowth};
use rosi_physics::units::{kg_per_s_to_g_per_day, to_head};
use rosi_physics::{
    CellLookup, CouplingView, DepthTable, EmbeddedCoupling, RootProblem, SoilProblem,
    TranspirationLog,
};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

/// 运行模拟参数
#[derive(Args)]
pub struct RunArgs {
    /// 配置文件路径，缺省时使用默认配置
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 输出目录，覆盖配置
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 模拟结束时间 [s]，覆盖配置
    #[arg(short = 't', long)]
    pub end_time: Option<f64>,

    /// 时间步长 [s]，覆盖配置
    #[arg(long)]
    pub dt: Option<f64>,

    /// 关闭根系生长
    #[arg(long)]
    pub no_growth: bool,
}

/// 执行运行命令
pub fn execute(args: RunArgs) -> Result<()> {
    info!("=== RoSi 模拟启动 ===");
    let config = load_config(&args)?;
    let mut sim = Simulation::new(&config).context("构建模拟失败")?;

    let start = Instant::now();
    let summary = sim.run(&config)?;
    let elapsed = start.elapsed();

    info!("=== 模拟完成 ===");
    info!("总步数: {}", summary.steps);
    info!("根系单元: {}", summary.element_count);
    info!("新增线段: {}", summary.new_segments);
    info!(
        "最后实际蒸腾: {:e} kg/s ({:.6} g/day)",
        summary.last_transpiration,
        kg_per_s_to_g_per_day(summary.last_transpiration)
    );
    info!("计算时间: {:.2} s", elapsed.as_secs_f64());
    Ok(())
}

fn load_config(args: &RunArgs) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::from_file(path)
            .with_context(|| format!("无法加载配置 {}", path.display()))?,
        None => {
            info!("未指定配置文件，使用默认配置");
            SimulationConfig::default()
        }
    };
    if let Some(dir) = &args.output {
        config.output.directory = dir.clone();
    }
    if let Some(t) = args.end_time {
        config.end_time = t;
    }
    if let Some(dt) = args.dt {
        config.dt = dt;
    }
    if args.no_growth {
        config.growth.enabled = false;
    }
    config.validate().context("配置无效")?;
    Ok(config)
}

/// 运行摘要
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// 完成的时间步数
    pub steps: usize,
    /// 结束时根系单元数
    pub element_count: usize,
    /// 累计新增线段数
    pub new_segments: usize,
    /// 最后一步的实际蒸腾 [kg/s]
    pub last_transpiration: f64,
}

struct Growth {
    driver: GridGrowth,
    model: Box<dyn GrowthModel>,
}

/// 模拟状态：网格、问题、耦合与解
pub struct Simulation {
    grid: LineGrid,
    geometry: GridGeometry,
    soil: SoilProblem,
    root: RootProblem,
    coupling: EmbeddedCoupling,
    growth: Option<Growth>,
    coupled: bool,
    soil_solution: Vec<PrimaryVariables>,
    root_solution: Vec<PrimaryVariables>,
}

impl Simulation {
    /// 按配置构建
    pub fn new(config: &SimulationConfig) -> Result<Self> {
        let network = &config.root.network;
        let nodes: Vec<DVec3> = network.nodes.iter().map(|&p| DVec3::from(p)).collect();
        let grid = LineGrid::from_segments_with_ordering(&nodes, &network.segments, config.root.ordering)
            .context("根系网格无效")?;
        let geometry = GridGeometry::new(&grid)?;
        info!(
            "根系网格: {} 节点, {} 单元, 总长 {:.4} m",
            grid.vertex_count(),
            grid.element_count(),
            geometry.total_length()
        );

        let soil = SoilProblem::new(&config.soil, &config.coupling).context("构建土壤问题失败")?;
        let lookup = DepthTable::new(config.soil.initial_head.clone())?;
        let root = RootProblem::new(
            &config.root,
            &config.collar,
            &config.coupling,
            Box::new(lookup),
            &grid,
        )
        .context("构建根系问题失败")?;

        let mut coupling =
            EmbeddedCoupling::new(soil.grid().clone(), config.coupling.integration_order)?;
        coupling.rebuild(&grid)?;

        let growth = if config.growth.enabled {
            let model: Box<dyn GrowthModel> = match &config.growth.model {
                GrowthModelConfig::LinearTip(params) => Box::new(LinearTipGrowth::new(
                    nodes.clone(),
                    &network.segments,
                    params.clone(),
                )?),
                GrowthModelConfig::Scripted { events } => Box::new(ScriptedGrowth::with_events(
                    nodes.clone(),
                    network.segments.clone(),
                    events.iter().cloned(),
                )),
            };
            let driver = GridGrowth::new(
                &grid,
                model.as_ref(),
                config.growth.policy.clone(),
                root.n_components(),
            )?;
            info!("根系生长: 模型 {}", model.name());
            Some(Growth { driver, model })
        } else {
            None
        };

        let soil_solution = soil.initial_solution();
        let root_solution = root.initial_solution(&geometry);

        Ok(Self {
            grid,
            geometry,
            soil,
            root,
            coupling,
            growth,
            coupled: config.coupling.enabled,
            soil_solution,
            root_solution,
        })
    }

    /// 运行到结束时间
    pub fn run(&mut self, config: &SimulationConfig) -> Result<RunSummary> {
        let mut log = if config.output.write_transpiration {
            let path = config.output.transpiration_path();
            Some(TranspirationLog::create(&path).with_context(|| {
                format!("无法创建蒸腾记录 {}", path.display())
            })?)
        } else {
            None
        };

        let mut summary = RunSummary::default();
        let mut t = 0.0;
        for step in 0..config.n_steps() {
            let dt = config.dt.min(config.end_time - t);
            t += dt;
            let (new_segments, transpiration, uptake) = self
                .step(t, dt)
                .with_context(|| format!("第 {} 步 (t = {} s) 失败", step + 1, t))?;

            summary.steps += 1;
            summary.new_segments += new_segments;
            summary.last_transpiration = transpiration;
            if let Some(log) = log.as_mut() {
                log.append(t, &[transpiration, uptake])?;
            }
        }
        if let Some(log) = log.as_mut() {
            log.flush()?;
            info!("蒸腾记录: {} 行 -> {}", log.lines(), log.path().display());
        }
        summary.element_count = self.grid.element_count();
        Ok(summary)
    }

    /// 推进一个时间步，返回 (新增线段数, 实际蒸腾 [kg/s], 根系吸水 [kg/s])
    fn step(&mut self, t: f64, dt: f64) -> Result<(usize, f64, f64)> {
        self.soil.set_time(t);
        self.root.set_time(t);

        let mut new_segments = 0;
        if let Some(growth) = self.growth.as_mut() {
            let soil = &self.soil;
            let soil_solution = &self.soil_solution;
            let medium = |p: DVec3| {
                soil.grid()
                    .cell_index(p)
                    .map_or_else(|| soil.initial(p), |c| soil_solution[c].pressure())
            };
            let ctx = GrowthContext::new(
                &mut self.grid,
                &mut self.geometry,
                growth.model.as_mut(),
                &mut self.root_solution,
            )
            .with_medium(&medium)
            .with_attached(self.root.params_mut());
            let report = growth.driver.grow(ctx, dt)?;
            if report.new_segments > 0 {
                info!("t = {} s: 新增 {} 线段", t, report.new_segments);
            }
            debug!("{}", report);
            new_segments = report.new_segments;
        }
        // 根系按当前土壤解查询土壤压力
        let heads = self.soil_solution.iter().map(|pv| to_head(pv.pressure())).collect();
        let outside = to_head(self.soil.initial(self.grid.bounding_box().min));
        self.root
            .set_soil(Box::new(CellLookup::new(self.soil.grid().clone(), heads, outside)?));

        let uptake = if self.coupled {
            self.coupling.rebuild(&self.grid)?;
            self.coupling
                .update_solution(&self.soil_solution, &self.root_solution)?;
            let view = CouplingView::new(&self.coupling, self.root.params());
            self.soil.source_integral(view)?;
            self.root.source_integral(view)?.pressure()
        } else {
            0.0
        };

        let collar = self
            .root
            .collar_flux(&self.grid, &self.geometry, &self.root_solution)?;
        Ok((new_segments, collar.actual_transpiration(), uptake))
    }

    /// 根系网格
    pub fn grid(&self) -> &LineGrid {
        &self.grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rosi_config::GrowthConfig;
    use rosi_growth::GrowthEvent;

    fn config(dir: &std::path::Path) -> SimulationConfig {
        let mut config = SimulationConfig::default();
        config.end_time = 3.0 * 3600.0;
        config.output.directory = dir.to_path_buf();
        config
    }

    #[test]
    fn test_run_without_growth_writes_log() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let mut sim = Simulation::new(&config).unwrap();
        let summary = sim.run(&config).unwrap();
        assert_eq!(summary.steps, 3);
        assert_eq!(summary.element_count, 1);
        assert!(summary.last_transpiration > 0.0);

        let text = std::fs::read_to_string(config.output.transpiration_path()).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.starts_with("3600, "));
    }

    #[test]
    fn test_run_with_scripted_growth() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(dir.path());
        config.growth = GrowthConfig {
            enabled: true,
            model: GrowthModelConfig::Scripted {
                events: vec![
                    GrowthEvent::grow_from(1, DVec3::new(0.0, 0.0, -0.02), 2),
                    GrowthEvent::grow_from(2, DVec3::new(0.0, 0.0, -0.03), 3),
                ],
            },
            policy: Default::default(),
        };
        let mut sim = Simulation::new(&config).unwrap();
        let summary = sim.run(&config).unwrap();
        assert_eq!(summary.new_segments, 2);
        assert_eq!(sim.grid().element_count(), 3);
    }

    #[test]
    fn test_contract_violation_fails_run() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(dir.path());
        config.growth.enabled = true;
        config.growth.model = GrowthModelConfig::Scripted {
            events: vec![GrowthEvent::grow_from(1, DVec3::new(0.0, 0.0, -0.02), 7)],
        };
        let mut sim = Simulation::new(&config).unwrap();
        assert!(sim.run(&config).is_err());
    }
}
