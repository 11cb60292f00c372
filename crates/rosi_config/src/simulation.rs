// crates/rosi_config/src/simulation.rs

//! SimulationConfig - 根-土耦合模拟配置
//!
//! 所有节均带默认值，缺省的 JSON 字段使用默认配置。

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::coupling::{CouplingConfig, GrowthConfig};
use crate::error::ConfigError;
use crate::root::{CollarConfig, RootConfig};
use crate::soil::SoilConfig;

/// 模拟配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// 土壤
    #[serde(default)]
    pub soil: SoilConfig,

    /// 根系
    #[serde(default)]
    pub root: RootConfig,

    /// 根颈边界
    #[serde(default)]
    pub collar: CollarConfig,

    /// 耦合
    #[serde(default)]
    pub coupling: CouplingConfig,

    /// 生长
    #[serde(default)]
    pub growth: GrowthConfig,

    /// 输出
    #[serde(default)]
    pub output: OutputConfig,

    /// 模拟结束时间 [s]
    #[serde(default = "default_end_time")]
    pub end_time: f64,

    /// 时间步长 [s]
    #[serde(default = "default_dt")]
    pub dt: f64,
}

fn default_end_time() -> f64 { 3.0 * 86400.0 }
fn default_dt() -> f64 { 3600.0 }

/// 输出配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// 输出目录
    #[serde(default = "default_output_dir")]
    pub directory: PathBuf,

    /// 实际蒸腾记录文件名
    #[serde(default = "default_transpiration_file")]
    pub transpiration_file: String,

    /// 是否写蒸腾记录
    #[serde(default = "default_write_transpiration")]
    pub write_transpiration: bool,
}

fn default_output_dir() -> PathBuf { PathBuf::from("output") }
fn default_transpiration_file() -> String { "actual_transpiration.csv".to_string() }
fn default_write_transpiration() -> bool { true }

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            transpiration_file: default_transpiration_file(),
            write_transpiration: default_write_transpiration(),
        }
    }
}

impl OutputConfig {
    /// 蒸腾记录文件完整路径
    pub fn transpiration_path(&self) -> PathBuf {
        self.directory.join(&self.transpiration_file)
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            soil: SoilConfig::default(),
            root: RootConfig::default(),
            collar: CollarConfig::default(),
            coupling: CouplingConfig::default(),
            growth: GrowthConfig::default(),
            output: OutputConfig::default(),
            end_time: default_end_time(),
            dt: default_dt(),
        }
    }
}

impl SimulationConfig {
    /// 从文件加载配置并验证
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        let config = Self::from_json(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// 从 JSON 字符串解析（不验证）
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.dt > 0.0) {
            return Err(ConfigError::invalid("dt", self.dt, "时间步长必须为正"));
        }
        if !(self.end_time >= 0.0) {
            return Err(ConfigError::invalid("end_time", self.end_time, "结束时间不能为负"));
        }

        self.soil.validate()?;
        self.root.validate()?;
        self.collar.validate()?;
        self.coupling.validate()?;
        self.growth.validate()?;

        // 根系第二分量只能是溶质或信号之一
        if self.root.signal.is_some() && self.coupling.transport.is_some() {
            return Err(ConfigError::invalid(
                "root.signal",
                "set",
                "不能与 coupling.transport 同时配置",
            ));
        }

        if self.output.write_transpiration && self.output.transpiration_file.is_empty() {
            return Err(ConfigError::Missing("output.transpiration_file".into()));
        }
        Ok(())
    }

    /// 时间步数（最后一步可能不足 `dt`）
    pub fn n_steps(&self) -> usize {
        if self.end_time <= 0.0 {
            return 0;
        }
        (self.end_time / self.dt).ceil() as usize
    }

    /// 根系主变量分量数
    pub fn root_components(&self) -> usize {
        if self.root.signal.is_some() || self.coupling.transport.is_some() {
            2
        } else {
            1
        }
    }

    /// 土壤主变量分量数
    pub fn soil_components(&self) -> usize {
        self.coupling.n_components()
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, content).map_err(ConfigError::Io)?;
        Ok(())
    }
}
