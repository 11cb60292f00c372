// apps/rosi_cli/src/commands/info.rs

//! 信息显示命令

use anyhow::{Context, Result};
use clap::Args;
use rosi_config::SimulationConfig;
use rosi_physics::units::{G, MU, P_REF, RHO, TEMPERATURE};
use std::path::PathBuf;
use tracing::info;

/// 信息显示参数
#[derive(Args)]
pub struct InfoArgs {
    /// 配置文件路径，显示其解析结果
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 显示默认配置
    #[arg(long)]
    pub defaults: bool,

    /// 以 JSON 输出配置
    #[arg(long)]
    pub json: bool,
}

/// 执行信息命令
pub fn execute(args: InfoArgs) -> Result<()> {
    info!("=== RoSi 信息 ===");

    if let Some(path) = &args.config {
        let config = SimulationConfig::from_file(path)
            .with_context(|| format!("无法加载配置 {}", path.display()))?;
        print_config(&config, args.json)?;
        return Ok(());
    }

    print_system_info();
    if args.defaults {
        println!();
        print_config(&SimulationConfig::default(), args.json)?;
    }
    Ok(())
}

fn print_system_info() {
    println!("=== 系统信息 ===");
    println!("RoSi CLI 版本: {}", env!("CARGO_PKG_VERSION"));
    println!("目标平台: {}", std::env::consts::ARCH);
    println!("操作系统: {}", std::env::consts::OS);

    println!("\n模块:");
    println!("  rosi_foundation  错误类型、索引、几何、主变量");
    println!("  rosi_grid        一维根系线网格、三维土壤网格");
    println!("  rosi_growth      网格生长、编号映射、数据迁移");
    println!("  rosi_physics     土壤/根系问题、点源耦合");
    println!("  rosi_config      JSON 配置");

    println!("\n物理常数:");
    println!("  ρ = {} kg/m³, g = {} m/s², μ = {} Pa s", RHO, G, MU);
    println!("  p_ref = {} Pa, T = {} K", P_REF, TEMPERATURE);
}

fn print_config(config: &SimulationConfig, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(config)?);
        return Ok(());
    }

    println!("=== 配置 ===");
    println!("结束时间: {} s, 时间步长: {} s ({} 步)", config.end_time, config.dt, config.n_steps());
    println!(
        "土壤: {:?} 单元, 上边界 {}, 下边界 {}",
        config.soil.cells,
        config.soil.top.name(),
        config.soil.bottom.name()
    );
    println!(
        "根系: {} 节点, {} 线段, {} 个根级, 初始龄期 {} s",
        config.root.network.nodes.len(),
        config.root.network.segments.len(),
        config.root.orders.len(),
        config.root.initial_age
    );
    println!(
        "根颈: {:?}, 临界压力水头 {} cm",
        config.collar.mode, config.collar.critical_pressure
    );
    println!(
        "耦合: {}, 积分阶数 {}, 溶质 {}",
        if config.coupling.enabled { "开" } else { "关" },
        config.coupling.integration_order,
        if config.coupling.transport.is_some() { "开" } else { "关" }
    );
    println!("生长: {}", if config.growth.enabled { "开" } else { "关" });
    println!("蒸腾记录: {}", config.output.transpiration_path().display());
    Ok(())
}
