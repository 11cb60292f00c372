// crates/rosi_config/src/lib.rs

//! RoSi Config Layer
//!
//! 模拟配置层。所有配置使用 JSON 序列化，每一节都有默认值，
//! 物理层在构造时按引用读取各节。
//!
//! # 模块概览
//!
//! - [`simulation`]: `SimulationConfig` 总配置与输出配置
//! - [`soil`]: 土壤计算域、初始剖面与边界条件
//! - [`root`]: 根系参数、初始网络、根颈边界与化学信号
//! - [`coupling`]: 点源耦合、溶质交换与生长模型
//! - [`series`]: 时间序列与龄期表
//! - [`error`]: 配置错误类型
//!
//! # 示例
//!
//! ```
//! use rosi_config::SimulationConfig;
//!
//! let config = SimulationConfig::from_json(r#"{"dt": 1800}"#).unwrap();
//! assert!(config.validate().is_ok());
//! assert_eq!(config.dt, 1800.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod coupling;
pub mod error;
pub mod root;
pub mod series;
pub mod simulation;
pub mod soil;

pub use coupling::{CouplingConfig, GrowthConfig, GrowthModelConfig, TransportConfig};
pub use error::{ConfigError, ConfigResult};
pub use root::{CollarConfig, CollarMode, NetworkConfig, OrderParams, RootConfig, SignalConfig};
pub use series::{AgeTable, ExtrapolationMode, SeriesConfig};
pub use simulation::{OutputConfig, SimulationConfig};
pub use soil::{SoilBoundary, SoilConfig};
