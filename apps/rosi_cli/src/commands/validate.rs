// apps/rosi_cli/src/commands/validate.rs

//! 配置验证命令
//!
//! 解析并验证配置文件，另外给出不致命但可疑的设置警告。

use anyhow::{bail, Context, Result};
use clap::Args;
use glam::DVec3;
use rosi_config::{GrowthModelConfig, SimulationConfig};
use rosi_foundation::validation::{ValidationIssue, ValidationReport};
use rosi_foundation::BoundingBox;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// 验证参数
#[derive(Args)]
pub struct ValidateArgs {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 严格模式（警告也视为错误）
    #[arg(long)]
    pub strict: bool,
}

fn passed(report: &ValidationReport, strict: bool) -> bool {
    report.is_valid() && (!strict || !report.has_warnings())
}

/// 执行验证命令
pub fn execute(args: ValidateArgs) -> Result<()> {
    info!("=== RoSi 配置验证 ===");

    let Some(path) = &args.config else {
        println!("用法: rosi_cli validate --config <配置文件> [--strict]");
        return Ok(());
    };

    let mut report = ValidationReport::new();
    validate_config(path, &mut report)?;
    print_report(&report, args.strict)
}

fn validate_config(path: &Path, report: &mut ValidationReport) -> Result<()> {
    println!("\n检查配置文件: {}", path.display());

    if !path.exists() {
        report.add_error(ValidationIssue::new("config", format!("文件不存在: {}", path.display())));
        return Ok(());
    }
    let content = std::fs::read_to_string(path).context("无法读取配置文件")?;

    let config = match SimulationConfig::from_json(&content) {
        Ok(c) => c,
        Err(e) => {
            report.add_error(ValidationIssue::new("config", format!("JSON 解析错误: {e}")));
            return Ok(());
        }
    };
    if let Err(e) = config.validate() {
        report.add_error(ValidationIssue::new("config", e.to_string()));
        return Ok(());
    }
    check_warnings(&config, report);

    println!("  ✓ 配置文件格式有效");
    Ok(())
}

fn check_warnings(config: &SimulationConfig, report: &mut ValidationReport) {
    if config.dt > config.end_time {
        report.add_warning(ValidationIssue::new(
            "dt",
            format!("时间步长 {} s 大于结束时间 {} s", config.dt, config.end_time),
        ));
    }

    let soil = BoundingBox::new(DVec3::from(config.soil.min), DVec3::from(config.soil.max));
    let outside = config
        .root
        .network
        .nodes
        .iter()
        .filter(|&&p| !soil.contains(DVec3::from(p)))
        .count();
    if outside > 0 {
        report.add_warning(ValidationIssue::new(
            "root.network.nodes",
            format!("{outside} 个根系节点位于土壤计算域外，不参与耦合"),
        ));
    }

    if !config.coupling.enabled {
        report.add_warning(ValidationIssue::new("coupling.enabled", "耦合已关闭，点源为零"));
    }

    if config.growth.enabled {
        if let GrowthModelConfig::Scripted { events } = &config.growth.model {
            if events.is_empty() {
                report.add_warning(ValidationIssue::new(
                    "growth.model.events",
                    "已开启生长但事件列表为空",
                ));
            } else if events.len() < config.n_steps() {
                report.add_warning(ValidationIssue::new(
                    "growth.model.events",
                    format!(
                        "事件数 {} 少于时间步数 {}，之后根系不再生长",
                        events.len(),
                        config.n_steps()
                    ),
                ));
            }
        }
    }

    if !config.output.write_transpiration {
        report.add_warning(ValidationIssue::new("output.write_transpiration", "不写蒸腾记录"));
    }
}

fn print_report(report: &ValidationReport, strict: bool) -> Result<()> {
    println!("\n=== 验证结果 ===");

    if report.has_errors() {
        println!("\n错误 ({}):", report.errors.len());
        for err in &report.errors {
            error!("  ✗ {}", err);
            println!("  ✗ {}", err);
        }
    }

    if report.has_warnings() {
        println!("\n警告 ({}):", report.warnings.len());
        for warning in &report.warnings {
            warn!("  ⚠ {}", warning);
            println!("  ⚠ {}", warning);
        }
    }

    if passed(report, strict) {
        println!("\n✓ 验证通过");
        Ok(())
    } else {
        println!("\n✗ 验证失败");
        bail!(
            "验证失败：发现 {} 个错误，{} 个警告",
            report.errors.len(),
            report.warnings.len()
        )
    }
}
