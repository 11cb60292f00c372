// crates/rosi_growth/src/error.rs

//! 网格生长错误类型
//!
//! 生长模型与网格之间的契约被破坏时返回的错误均为致命错误，不可重试。
//! 所有错误可转换为 `rosi_foundation::RosiError` 向上传播。

use crate::grid_growth::GrowthState;
use rosi_foundation::{PersistentId, RosiError};
use rosi_grid::GridError;
use thiserror::Error;

/// 生长模块结果类型
pub type GrowthResult<T> = Result<T, GrowthError>;

/// 生长错误枚举
#[derive(Error, Debug)]
pub enum GrowthError {
    /// 生长模型给出的编号与坐标数量不一致，或索引表大小与节点数不一致
    #[error("节点数量不一致: {what}, 期望 {expected}, 实际 {actual}")]
    NodeCountMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// 新顶点的网格编号与生长模型编号不一致
    #[error("节点编号不连续: 生长模型编号 {growth_index}, 网格插入编号 {inserted_index}")]
    InsertionOrderMismatch {
        growth_index: usize,
        inserted_index: usize,
    },

    /// 线段未能全部插入
    #[error("线段未能全部插入: 期望 {expected} 个单元, 实际 {actual}")]
    ElementCountMismatch { expected: usize, actual: usize },

    /// 旧单元在快照中没有数据
    #[error("单元 {element} ({id}) 不是新单元, 但快照中没有其数据")]
    MissingSnapshot { element: usize, id: PersistentId },

    /// 解向量比网格单元数短
    #[error("解向量大小不匹配: 单元数 {elements}, 解向量长度 {solution}")]
    SolutionSizeMismatch { elements: usize, solution: usize },

    /// 顶点查找表已过期
    #[error("顶点查找表已过期: 顶点 {vertex}")]
    StaleVertexMap { vertex: usize },

    /// 未知生长模型节点编号
    #[error("未知生长模型节点: {index}, 已知节点数 {len}")]
    UnknownNode { index: usize, len: usize },

    /// 新单元初始化策略无法执行
    #[error("新单元初始化失败: {0}")]
    Policy(String),

    /// 编排器不在空闲状态
    #[error("生长编排器不在空闲状态: {0:?}")]
    NotIdle(GrowthState),

    /// 带阶段信息的错误
    #[error("生长在阶段 {phase:?} 失败: {source}")]
    InPhase {
        phase: GrowthState,
        #[source]
        source: Box<GrowthError>,
    },

    /// 网格错误
    #[error("网格错误: {0}")]
    Grid(#[from] GridError),

    /// 生长模型或附加数据返回的错误
    #[error("外部错误: {0}")]
    External(#[from] RosiError),
}

impl GrowthError {
    /// 附加阶段信息
    pub fn at(self, phase: GrowthState) -> Self {
        match self {
            already @ Self::InPhase { .. } => already,
            other => Self::InPhase {
                phase,
                source: Box::new(other),
            },
        }
    }

    /// 去掉阶段包装后的原始错误
    pub fn root(&self) -> &GrowthError {
        match self {
            Self::InPhase { source, .. } => source.root(),
            other => other,
        }
    }

    /// 失败阶段（若已附加）
    pub fn phase(&self) -> Option<GrowthState> {
        match self {
            Self::InPhase { phase, .. } => Some(*phase),
            _ => None,
        }
    }

    /// 是否为生长模型与网格之间的契约违反
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self.root(),
            Self::NodeCountMismatch { .. }
                | Self::InsertionOrderMismatch { .. }
                | Self::ElementCountMismatch { .. }
                | Self::MissingSnapshot { .. }
                | Self::SolutionSizeMismatch { .. }
                | Self::StaleVertexMap { .. }
        )
    }

    fn contract_name(&self) -> &'static str {
        match self {
            Self::NodeCountMismatch { .. } => "node_count",
            Self::InsertionOrderMismatch { .. } => "insertion_order",
            Self::ElementCountMismatch { .. } => "element_count",
            Self::MissingSnapshot { .. } => "persistent_snapshot",
            Self::SolutionSizeMismatch { .. } => "solution_size",
            Self::StaleVertexMap { .. } => "vertex_map",
            _ => "growth",
        }
    }
}

/// 转换到 Foundation 层错误
impl From<GrowthError> for RosiError {
    fn from(err: GrowthError) -> Self {
        let message = err.to_string();
        let root = err.root();
        if root.is_contract_violation() {
            return RosiError::contract_violation(root.contract_name(), message);
        }
        match err {
            GrowthError::InPhase { source, .. } => match *source {
                GrowthError::External(inner) => inner,
                GrowthError::Grid(grid) => grid.into(),
                GrowthError::UnknownNode { index, len } => {
                    RosiError::index_out_of_bounds("GrowthNode", index, len)
                }
                _ => RosiError::internal(message),
            },
            GrowthError::External(inner) => inner,
            GrowthError::Grid(grid) => grid.into(),
            GrowthError::UnknownNode { index, len } => {
                RosiError::index_out_of_bounds("GrowthNode", index, len)
            }
            _ => RosiError::internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_classification() {
        let err = GrowthError::InsertionOrderMismatch {
            growth_index: 3,
            inserted_index: 4,
        };
        assert!(err.is_contract_violation());

        let wrapped = err.at(GrowthState::InsertingTopology);
        assert!(wrapped.is_contract_violation());
        assert_eq!(wrapped.phase(), Some(GrowthState::InsertingTopology));
        assert!(wrapped.to_string().contains("InsertingTopology"));

        assert!(!GrowthError::UnknownNode { index: 1, len: 0 }.is_contract_violation());
    }

    #[test]
    fn test_at_does_not_double_wrap() {
        let err = GrowthError::Policy("x".into())
            .at(GrowthState::RestoringData)
            .at(GrowthState::Done);
        assert_eq!(err.phase(), Some(GrowthState::RestoringData));
    }

    #[test]
    fn test_conversion_to_rosi_error() {
        let err: RosiError = GrowthError::ElementCountMismatch {
            expected: 3,
            actual: 2,
        }
        .at(GrowthState::Done)
        .into();
        assert!(err.is_contract_violation());

        let err: RosiError = GrowthError::UnknownNode { index: 7, len: 4 }.into();
        assert!(matches!(err, RosiError::IndexOutOfBounds { index: 7, len: 4, .. }));
    }
}
