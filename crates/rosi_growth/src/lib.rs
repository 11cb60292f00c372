// crates/rosi_growth/src/lib.rs

//! RoSi 网格生长模块
//!
//! 将外部根系生长模型的增量拓扑变化（新节点、新线段、节点移动）
//! 同步到一维线网格，并在网格变更前后迁移每个单元的解数据。
//!
//! # 核心类型
//!
//! - [`GrowthModel`]: 外部生长模型接口
//! - [`IndexMap`]: 生长模型节点编号 → 网格顶点编号
//! - [`PersistentDataTransfer`]: 按持久标识快照/恢复单元数据
//! - [`NewElementPolicy`]: 新单元初始化策略
//! - [`GridGrowth`]: 生长编排器
//!
//! # 内置生长模型
//!
//! - [`ScriptedGrowth`]: 按预定事件回放，用于测试和基准
//! - [`LinearTipGrowth`]: 根尖按恒定速率直线延伸

pub mod error;
pub mod grid_growth;
pub mod index_map;
pub mod interface;
pub mod policy;
pub mod scripted;
pub mod tip;
pub mod transfer;

pub use error::{GrowthError, GrowthResult};
pub use grid_growth::{GridGrowth, GrowthContext, GrowthReport, GrowthState};
pub use index_map::IndexMap;
pub use interface::GrowthModel;
pub use policy::NewElementPolicy;
pub use scripted::{GrowthEvent, ScriptedGrowth};
pub use tip::{LinearTipGrowth, TipGrowthParams};
pub use transfer::{AttachedData, PersistentDataTransfer};
