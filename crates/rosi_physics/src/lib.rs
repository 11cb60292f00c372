// crates/rosi_physics/src/lib.rs

//! RoSi 物理模块
//!
//! 土壤 Richards 问题、根系木质部问题，以及两者之间的一维-三维点源耦合。
//!
//! # 模块概览
//!
//! - [`coupling`]: 点源、耦合管理器接口与嵌入式实现
//! - [`point_source`]: 径向水流与溶质交换公式
//! - [`soil_problem`]: 土壤问题
//! - [`root_problem`]: 根系问题与根颈边界
//! - [`spatial_params`]: 按根级与龄期的根系参数
//! - [`soil_lookup`]: 根系问题使用的土壤压力查询
//! - [`timeseries`]: 分段线性时间序列
//! - [`transpiration_log`]: 蒸腾 CSV 记录
//!
//! # 符号约定
//!
//! 土壤侧点源为正表示水由根进入土壤，根系侧取相反数。
//!
//! # 示例
//!
//! ```
//! use rosi_physics::units::{to_head, to_pa};
//!
//! let p = to_pa(-300.0);
//! assert!((to_head(p) + 300.0).abs() < 1e-9);
//! ```

pub mod attributes;
pub mod boundary;
pub mod coupling;
pub mod point_source;
pub mod root_problem;
pub mod soil_lookup;
pub mod soil_problem;
pub mod spatial_params;
pub mod timeseries;
pub mod transpiration_log;
pub mod units;

pub use attributes::ElementAttributes;
pub use boundary::{BoundaryFluxes, BoundaryKind};
pub use coupling::{
    gauss_points, CouplingError, CouplingManager, EmbeddedCoupling, PointSource, PointSourceData,
};
pub use point_source::{exchange, radial_mass_flux, solute_flux, CouplingView, ExchangeParams};
pub use root_problem::{CollarDiagnostics, CollarFlux, RootProblem};
pub use soil_lookup::{CellLookup, DepthTable, SoilLookup};
pub use soil_problem::SoilProblem;
pub use spatial_params::RootSpatialParams;
pub use timeseries::{ExtrapolationMode, TimeSeries};
pub use transpiration_log::TranspirationLog;

pub use rosi_config::{CollarMode, SoilBoundary};
