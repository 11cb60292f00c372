// crates/rosi_grid/src/error.rs

//! 网格错误类型
//!
//! 生长协议误用、非法拓扑输入等错误。
//! 所有错误可转换为 `rosi_foundation::RosiError` 向上传播。

use crate::line_grid::GrowPhase;
use rosi_foundation::RosiError;
use thiserror::Error;

/// 网格模块结果类型
pub type GridResult<T> = Result<T, GridError>;

/// 网格错误枚举
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    /// 生长协议调用顺序错误
    #[error("生长协议错误: {operation} 需要阶段 {expected:?}, 当前 {actual:?}")]
    InvalidPhase {
        operation: &'static str,
        expected: GrowPhase,
        actual: GrowPhase,
    },

    /// 未知顶点
    #[error("未知顶点: {index}, 顶点数 {len}")]
    UnknownVertex { index: usize, len: usize },

    /// 未知单元
    #[error("未知单元: {index}, 单元数 {len}")]
    UnknownElement { index: usize, len: usize },

    /// 退化单元（两端点相同）
    #[error("退化单元: 两端点均为顶点 {vertex}")]
    DegenerateElement { vertex: usize },

    /// 查询了尚未提交的暂存实体
    #[error("实体 {entity} 仍处于暂存状态, 不能查询最终拓扑")]
    StagedEntity { entity: String },

    /// 实体不是本次生长新增的
    #[error("实体 {entity} 不是新增实体, 没有插入序号")]
    NotNew { entity: String },

    /// 点不在土壤网格内
    #[error("点 ({x:.4}, {y:.4}, {z:.4}) 不在土壤网格内")]
    OutsideSoil { x: f64, y: f64, z: f64 },

    /// 网格参数无效
    #[error("网格参数无效: {0}")]
    InvalidParameter(String),
}

impl GridError {
    pub fn invalid_phase(operation: &'static str, expected: GrowPhase, actual: GrowPhase) -> Self {
        Self::InvalidPhase {
            operation,
            expected,
            actual,
        }
    }

    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }
}

/// 转换到 Foundation 层错误
impl From<GridError> for RosiError {
    fn from(err: GridError) -> Self {
        match err {
            GridError::UnknownVertex { index, len } => {
                RosiError::index_out_of_bounds("Vertex", index, len)
            }
            GridError::UnknownElement { index, len } => {
                RosiError::index_out_of_bounds("Element", index, len)
            }
            GridError::InvalidParameter(msg) => RosiError::invalid_input(msg),
            GridError::OutsideSoil { .. } => RosiError::invalid_input(err.to_string()),
            other => RosiError::invalid_mesh(other.to_string()),
        }
    }
}
