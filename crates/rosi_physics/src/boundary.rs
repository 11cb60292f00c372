// crates/rosi_physics/src/boundary.rs

//! 边界类型
//!
//! 边界类型通过查询得到，调用方先查询再决定求值 Dirichlet 值或 Neumann 通量。

use rosi_config::{CollarMode, SoilBoundary};
use serde::{Deserialize, Serialize};

// ============================================================
// 边界类型枚举
// ============================================================

/// 边界类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BoundaryKind {
    /// 给定主变量值
    Dirichlet,
    /// 给定通量，默认无通量
    #[default]
    Neumann,
}

impl BoundaryKind {
    /// 是否为 Dirichlet
    #[inline]
    pub fn is_dirichlet(&self) -> bool {
        matches!(self, Self::Dirichlet)
    }
}

impl From<&SoilBoundary> for BoundaryKind {
    fn from(bc: &SoilBoundary) -> Self {
        if bc.is_dirichlet() {
            Self::Dirichlet
        } else {
            Self::Neumann
        }
    }
}

impl From<CollarMode> for BoundaryKind {
    fn from(mode: CollarMode) -> Self {
        match mode {
            CollarMode::Pressure => Self::Dirichlet,
            CollarMode::Transpiration => Self::Neumann,
        }
    }
}

impl std::fmt::Display for BoundaryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Dirichlet => "Dirichlet",
            Self::Neumann => "Neumann",
        };
        write!(f, "{}", name)
    }
}

/// 计算域上下边界上的平均通量 [kg/(m² s)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundaryFluxes {
    /// 上边界
    pub upper: f64,
    /// 下边界
    pub lower: f64,
}
