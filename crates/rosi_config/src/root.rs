// crates/rosi_config/src/root.rs

//! 根系与根颈配置

use crate::error::{ConfigError, ConfigResult};
use crate::series::{AgeTable, SeriesConfig};
use rosi_grid::LeafOrdering;
use serde::{Deserialize, Serialize};

/// 单个根级的水力参数
///
/// 单位沿用根系构型输入的惯例：kr [cm/hPa/day]，kx [cm⁴/hPa/day]，半径 [cm]。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderParams {
    /// 径向导水率
    pub kr: AgeTable,
    /// 轴向导水率
    pub kx: AgeTable,
    /// 根半径
    pub radius: AgeTable,
}

impl Default for OrderParams {
    fn default() -> Self {
        Self {
            kr: AgeTable::Constant(1.728e-4),
            kx: AgeTable::Constant(4.32e-2),
            radius: AgeTable::Constant(0.2),
        }
    }
}

/// 初始根系网络
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// 节点坐标 [m]
    pub nodes: Vec<[f64; 3]>,
    /// 线段（节点编号对）
    pub segments: Vec<[usize; 2]>,
    /// 每条线段的根级，缺省为 0
    #[serde(default)]
    pub orders: Vec<i32>,
    /// 每条线段的创建时间 [s]，缺省为 0
    #[serde(default)]
    pub creation_times: Vec<f64>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            nodes: vec![[0.0, 0.0, 0.0], [0.0, 0.0, -0.01]],
            segments: vec![[0, 1]],
            orders: Vec::new(),
            creation_times: Vec::new(),
        }
    }
}

/// 根尖化学信号参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalConfig {
    /// 单位干物质产率 [mol/(kg Pa s)]
    #[serde(default = "default_signal_rate")]
    pub rate: f64,
    /// 开始产生信号的压力水头 [cm]
    #[serde(default = "default_signal_threshold")]
    pub threshold_head: f64,
    /// 根尖干物质 [kg]
    #[serde(default = "default_dry_mass")]
    pub dry_mass: f64,
    /// 摩尔质量 [kg/mol]，给出时以 kg/s 计
    #[serde(default)]
    pub molar_mass: Option<f64>,
    /// 产生信号的最大龄期 [day]
    #[serde(default = "default_max_age")]
    pub max_age: f64,
}

fn default_signal_rate() -> f64 { 3.26e-16 }
fn default_signal_threshold() -> f64 { -4500.0 }
fn default_dry_mass() -> f64 { 1.76e-7 }
fn default_max_age() -> f64 { 1.0 }

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            rate: default_signal_rate(),
            threshold_head: default_signal_threshold(),
            dry_mass: default_dry_mass(),
            molar_mass: None,
            max_age: default_max_age(),
        }
    }
}

/// 根系配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootConfig {
    /// 按根级索引的参数，超出范围的根级使用最后一项
    #[serde(default = "default_orders")]
    pub orders: Vec<OrderParams>,

    /// 模拟开始时根系的龄期 [s]
    #[serde(default = "default_initial_age")]
    pub initial_age: f64,

    /// 初始网络
    #[serde(default)]
    pub network: NetworkConfig,

    /// 单元编号方式
    #[serde(default)]
    pub ordering: LeafOrdering,

    /// 化学信号，缺省不计算
    #[serde(default)]
    pub signal: Option<SignalConfig>,
}

fn default_orders() -> Vec<OrderParams> { vec![OrderParams::default()] }
fn default_initial_age() -> f64 { 14.0 * 86400.0 }

impl Default for RootConfig {
    fn default() -> Self {
        Self {
            orders: default_orders(),
            initial_age: default_initial_age(),
            network: NetworkConfig::default(),
            ordering: LeafOrdering::default(),
            signal: None,
        }
    }
}

impl RootConfig {
    /// 验证
    pub fn validate(&self) -> ConfigResult<()> {
        if self.orders.is_empty() {
            return Err(ConfigError::Missing("root.orders".into()));
        }
        for (i, order) in self.orders.iter().enumerate() {
            order.kr.validate(&format!("root.orders[{i}].kr"))?;
            order.kx.validate(&format!("root.orders[{i}].kx"))?;
            order.radius.validate(&format!("root.orders[{i}].radius"))?;
            if order.radius.points().iter().any(|&(_, r)| r <= 0.0) {
                return Err(ConfigError::invalid(
                    format!("root.orders[{i}].radius"),
                    format!("{:?}", order.radius),
                    "半径必须为正",
                ));
            }
        }

        let network = &self.network;
        if network.segments.is_empty() {
            return Err(ConfigError::Missing("root.network.segments".into()));
        }
        for (i, &[a, b]) in network.segments.iter().enumerate() {
            if a >= network.nodes.len() || b >= network.nodes.len() || a == b {
                return Err(ConfigError::invalid(
                    format!("root.network.segments[{i}]"),
                    format!("[{a}, {b}]"),
                    format!("节点编号无效 (共 {} 个节点)", network.nodes.len()),
                ));
            }
        }
        for (key, len) in [
            ("root.network.orders", network.orders.len()),
            ("root.network.creation_times", network.creation_times.len()),
        ] {
            if len != 0 && len != network.segments.len() {
                return Err(ConfigError::invalid(
                    key,
                    len,
                    format!("长度必须为 0 或线段数 {}", network.segments.len()),
                ));
            }
        }

        if let Some(signal) = &self.signal {
            if signal.rate < 0.0 || signal.dry_mass < 0.0 {
                return Err(ConfigError::invalid(
                    "root.signal",
                    format!("rate={}, dry_mass={}", signal.rate, signal.dry_mass),
                    "不能为负",
                ));
            }
        }
        Ok(())
    }
}

/// 根颈边界类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollarMode {
    /// 给定根颈压力水头 [cm]
    Pressure,
    /// 给定潜在蒸腾 [kg/s]
    #[default]
    Transpiration,
}

/// 根颈边界配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollarConfig {
    /// 边界类型
    #[serde(default)]
    pub mode: CollarMode,

    /// 随时间变化的根颈值
    #[serde(default = "default_collar_series")]
    pub series: SeriesConfig,

    /// 根颈临界压力水头 [cm]
    #[serde(default = "default_collar_critical")]
    pub critical_pressure: f64,
}

fn default_collar_series() -> SeriesConfig { SeriesConfig::constant(5.0e-9) }
fn default_collar_critical() -> f64 { -1.0e4 }

impl Default for CollarConfig {
    fn default() -> Self {
        Self {
            mode: CollarMode::default(),
            series: default_collar_series(),
            critical_pressure: default_collar_critical(),
        }
    }
}

impl CollarConfig {
    /// 验证
    pub fn validate(&self) -> ConfigResult<()> {
        self.series.validate("collar.series")?;
        if !self.critical_pressure.is_finite() {
            return Err(ConfigError::invalid(
                "collar.critical_pressure",
                self.critical_pressure,
                "必须为有限值",
            ));
        }
        Ok(())
    }
}
