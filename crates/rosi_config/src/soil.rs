// crates/rosi_config/src/soil.rs

//! 土壤（Richards 方程）配置

use crate::error::{ConfigError, ConfigResult};
use crate::series::SeriesConfig;
use serde::{Deserialize, Serialize};

/// 土壤上/下边界条件
///
/// 数值单位：压力水头 [cm]，通量 [cm/day]（正值为入渗）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SoilBoundary {
    /// 固定压力水头 [cm]
    ConstantPressure {
        /// 压力水头
        value: f64,
    },
    /// 固定通量 [cm/day]，受最大入渗/蒸发限制
    ConstantFlux {
        /// 通量
        value: f64,
    },
    /// 柱坐标固定通量，按径向坐标加权
    ConstantFluxCyl {
        /// 通量
        value: f64,
    },
    /// 大气边界（降水/蒸发），仅用于上边界
    Atmospheric,
    /// 自由排水，仅用于下边界
    FreeDrainage,
}

impl SoilBoundary {
    /// 是否为强加压力的边界
    pub fn is_dirichlet(&self) -> bool {
        matches!(self, Self::ConstantPressure { .. })
    }

    /// 名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::ConstantPressure { .. } => "constant_pressure",
            Self::ConstantFlux { .. } => "constant_flux",
            Self::ConstantFluxCyl { .. } => "constant_flux_cyl",
            Self::Atmospheric => "atmospheric",
            Self::FreeDrainage => "free_drainage",
        }
    }
}

/// 土壤配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoilConfig {
    /// 计算域最小角点 [m]
    #[serde(default = "default_min")]
    pub min: [f64; 3],

    /// 计算域最大角点 [m]
    #[serde(default = "default_max")]
    pub max: [f64; 3],

    /// 各方向单元数
    #[serde(default = "default_cells")]
    pub cells: [usize; 3],

    /// 初始压力水头剖面 (z [m], 水头 [cm])
    #[serde(default = "default_initial_head")]
    pub initial_head: Vec<(f64, f64)>,

    /// 上边界
    #[serde(default = "default_top")]
    pub top: SoilBoundary,

    /// 下边界
    #[serde(default = "default_bottom")]
    pub bottom: SoilBoundary,

    /// 饱和导水率 [m/s]
    #[serde(default = "default_conductivity")]
    pub conductivity: f64,

    /// 蒸发临界压力水头 [cm]
    #[serde(default = "default_critical_pressure")]
    pub critical_pressure: f64,

    /// 是否考虑重力
    #[serde(default = "default_gravity")]
    pub gravity: bool,

    /// 降水序列 [cm/day]，大气边界需要
    #[serde(default)]
    pub precipitation: Option<SeriesConfig>,
}

fn default_min() -> [f64; 3] { [-0.04, -0.04, -0.2] }
fn default_max() -> [f64; 3] { [0.04, 0.04, 0.0] }
fn default_cells() -> [usize; 3] { [4, 4, 10] }
fn default_initial_head() -> Vec<(f64, f64)> { vec![(-0.2, -300.0), (0.0, -300.0)] }
fn default_top() -> SoilBoundary { SoilBoundary::ConstantFlux { value: 0.0 } }
fn default_bottom() -> SoilBoundary { SoilBoundary::FreeDrainage }
fn default_conductivity() -> f64 { 2.9e-6 }
fn default_critical_pressure() -> f64 { -1.0e4 }
fn default_gravity() -> bool { true }

impl Default for SoilConfig {
    fn default() -> Self {
        Self {
            min: default_min(),
            max: default_max(),
            cells: default_cells(),
            initial_head: default_initial_head(),
            top: default_top(),
            bottom: default_bottom(),
            conductivity: default_conductivity(),
            critical_pressure: default_critical_pressure(),
            gravity: default_gravity(),
            precipitation: None,
        }
    }
}

impl SoilConfig {
    /// 验证
    pub fn validate(&self) -> ConfigResult<()> {
        for d in 0..3 {
            if !(self.max[d] > self.min[d]) {
                return Err(ConfigError::invalid(
                    "soil.max",
                    format!("{:?}", self.max),
                    "最大角点必须大于最小角点",
                ));
            }
            if self.cells[d] == 0 {
                return Err(ConfigError::invalid(
                    "soil.cells",
                    format!("{:?}", self.cells),
                    "单元数必须为正",
                ));
            }
        }
        if self.initial_head.is_empty() {
            return Err(ConfigError::Missing("soil.initial_head".into()));
        }
        if self.conductivity <= 0.0 {
            return Err(ConfigError::invalid(
                "soil.conductivity",
                self.conductivity,
                "导水率必须为正",
            ));
        }
        if matches!(self.top, SoilBoundary::FreeDrainage) {
            return Err(ConfigError::invalid("soil.top", self.top.name(), "上边界不支持自由排水"));
        }
        if matches!(self.bottom, SoilBoundary::Atmospheric) {
            return Err(ConfigError::invalid("soil.bottom", self.bottom.name(), "下边界不支持大气边界"));
        }
        if matches!(self.top, SoilBoundary::Atmospheric) {
            match &self.precipitation {
                Some(series) => series.validate("soil.precipitation")?,
                None => return Err(ConfigError::Missing("soil.precipitation".into())),
            }
        }
        Ok(())
    }
}
