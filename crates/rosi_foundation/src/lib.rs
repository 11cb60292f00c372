// crates/rosi_foundation/src/lib.rs

//! RoSi Foundation Layer
//!
//! 根系-土壤耦合模拟的基础层，提供整个工作区共享的基础抽象。
//!
//! # 模块概览
//!
//! - [`index`]: 强类型索引与拓扑持久标识
//! - [`error`]: 统一错误类型
//! - [`geometry`]: 三维位置与包围盒
//! - [`primary`]: 每个自由度的主变量向量
//! - [`validation`]: 运行时验证报告
//!
//! # 示例
//!
//! ```
//! use rosi_foundation::{
//!     index::{ElementIndex, PersistentId},
//!     error::{RosiError, RosiResult},
//!     primary::PrimaryVariables,
//! };
//!
//! let e = ElementIndex::from_usize(3);
//! assert_eq!(e.as_usize(), 3);
//!
//! let id = PersistentId::new(7);
//! assert_eq!(id.raw(), 7);
//!
//! let pv = PrimaryVariables::uniform(2, -1.0e4);
//! assert_eq!(pv.pressure(), -1.0e4);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod geometry;
pub mod index;
pub mod primary;
pub mod validation;

pub use error::{RosiError, RosiResult};
pub use geometry::{BoundingBox, Position};
pub use index::{ElementIndex, GrowthNodeIndex, Idx, PersistentId, PersistentIdAllocator, VertexIndex};
pub use primary::PrimaryVariables;
pub use validation::{ValidationIssue, ValidationReport};
