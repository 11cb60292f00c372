// crates/rosi_config/src/series.rs

//! 时间序列与龄期表配置

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};

/// 外推模式
///
/// 查询时间超出数据范围时的处理方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtrapolationMode {
    /// 返回边界值
    #[default]
    Clamp,
    /// 按首/末区间斜率线性外推
    Linear,
    /// 周期性重复
    Cyclic,
}

/// 分段线性时间序列
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesConfig {
    /// (时间 [s], 值) 点对，时间严格递增
    pub points: Vec<(f64, f64)>,
    /// 外推模式
    #[serde(default)]
    pub extrapolation: ExtrapolationMode,
}

impl SeriesConfig {
    /// 常数序列
    pub fn constant(value: f64) -> Self {
        Self {
            points: vec![(0.0, value)],
            extrapolation: ExtrapolationMode::Clamp,
        }
    }

    /// 检查点对非空、有限且时间严格递增
    pub fn validate(&self, key: &str) -> ConfigResult<()> {
        check_points(key, &self.points)
    }
}

/// 随龄期变化的参数，龄期单位为天
///
/// 可写作单个数值或 `[[age, value], ...]` 表。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AgeTable {
    /// 与龄期无关
    Constant(f64),
    /// (龄期 [day], 值) 点对
    Table(Vec<(f64, f64)>),
}

impl AgeTable {
    /// 以 (龄期 [day], 值) 点对表示
    pub fn points(&self) -> Vec<(f64, f64)> {
        match self {
            Self::Constant(v) => vec![(0.0, *v)],
            Self::Table(points) => points.clone(),
        }
    }

    /// 检查表格式，并要求所有值非负
    pub fn validate(&self, key: &str) -> ConfigResult<()> {
        let points = self.points();
        check_points(key, &points)?;
        if let Some(&(_, v)) = points.iter().find(|(_, v)| *v < 0.0) {
            return Err(ConfigError::invalid(key, v, "值不能为负"));
        }
        Ok(())
    }
}

fn check_points(key: &str, points: &[(f64, f64)]) -> ConfigResult<()> {
    if points.is_empty() {
        return Err(ConfigError::Missing(format!("{key}.points")));
    }
    for (i, &(t, v)) in points.iter().enumerate() {
        if !t.is_finite() || !v.is_finite() {
            return Err(ConfigError::invalid(key, format!("({t}, {v})"), "必须为有限值"));
        }
        if i > 0 && t <= points[i - 1].0 {
            return Err(ConfigError::invalid(
                key,
                t,
                format!("时间必须严格递增 (第 {} 个点)", i),
            ));
        }
    }
    Ok(())
}
