// crates/rosi_foundation/src/geometry.rs

//! 三维位置与轴对齐包围盒

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// 三维位置 [m]，z 轴向上
pub type Position = DVec3;

/// 轴对齐包围盒
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// 最小角点
    pub min: Position,
    /// 最大角点
    pub max: Position,
}

impl BoundingBox {
    /// 由两个角点创建
    pub fn new(min: Position, max: Position) -> Self {
        Self { min, max }
    }

    /// 空包围盒，扩展后生效
    pub fn empty() -> Self {
        Self {
            min: DVec3::splat(f64::INFINITY),
            max: DVec3::splat(f64::NEG_INFINITY),
        }
    }

    /// 包含点集的最小包围盒
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Position>) -> Self {
        points.into_iter().fold(Self::empty(), |mut bb, p| {
            bb.extend(*p);
            bb
        })
    }

    /// 扩展以包含点
    pub fn extend(&mut self, p: Position) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// 点是否在盒内（含边界）
    pub fn contains(&self, p: Position) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// 尺寸
    pub fn extent(&self) -> DVec3 {
        self.max - self.min
    }

    /// 点是否位于上边界（z 方向），`eps` 为容差
    pub fn on_upper_boundary(&self, p: Position, eps: f64) -> bool {
        p.z > self.max.z - eps
    }

    /// 点是否位于下边界（z 方向）
    pub fn on_lower_boundary(&self, p: Position, eps: f64) -> bool {
        p.z < self.min.z + eps
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}
