// crates/rosi_foundation/src/primary.rs

//! 主变量向量
//!
//! 每个自由度的一小组数值。约定：
//! - 下标 0：压力 [Pa]
//! - 下标 1：溶质质量/摩尔分数（仅输运模型）

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::ops::{Index, IndexMut};

/// 压力分量下标
pub const PRESSURE_IDX: usize = 0;
/// 溶质分数分量下标
pub const FRACTION_IDX: usize = 1;

/// 主变量向量
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrimaryVariables(SmallVec<[f64; 4]>);

impl PrimaryVariables {
    /// 长度为 `n` 的零向量
    pub fn zeros(n: usize) -> Self {
        Self::uniform(n, 0.0)
    }

    /// 所有分量均为 `value`
    pub fn uniform(n: usize, value: f64) -> Self {
        Self(SmallVec::from_elem(value, n))
    }

    /// 从切片创建
    pub fn from_slice(values: &[f64]) -> Self {
        Self(SmallVec::from_slice(values))
    }

    /// 分量数
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// 是否为空
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 压力分量，空向量返回 0
    #[inline]
    pub fn pressure(&self) -> f64 {
        self.get(PRESSURE_IDX).unwrap_or(0.0)
    }

    /// 溶质分数分量，不存在时返回 0
    #[inline]
    pub fn fraction(&self) -> f64 {
        self.get(FRACTION_IDX).unwrap_or(0.0)
    }

    /// 带边界检查的读取
    #[inline]
    pub fn get(&self, i: usize) -> Option<f64> {
        self.0.get(i).copied()
    }

    /// 切片视图
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// 逐分量缩放
    pub fn scale(&mut self, factor: f64) {
        for v in self.0.iter_mut() {
            *v *= factor;
        }
    }

    /// 缩放后的副本
    pub fn scaled(&self, factor: f64) -> Self {
        let mut out = self.clone();
        out.scale(factor);
        out
    }
}

impl Index<usize> for PrimaryVariables {
    type Output = f64;

    fn index(&self, i: usize) -> &f64 {
        &self.0[i]
    }
}

impl IndexMut<usize> for PrimaryVariables {
    fn index_mut(&mut self, i: usize) -> &mut f64 {
        &mut self.0[i]
    }
}

impl From<Vec<f64>> for PrimaryVariables {
    fn from(values: Vec<f64>) -> Self {
        Self(SmallVec::from_vec(values))
    }
}
