// crates/rosi_physics/src/timeseries.rs

//! 分段线性时间序列
//!
//! 根颈压力/蒸腾、降水以及随龄期变化的根参数都用它表示。
//! 查询超出数据范围时按 [`ExtrapolationMode`] 处理。
//!
//! ```
//! use rosi_physics::timeseries::{ExtrapolationMode, TimeSeries};
//!
//! let series = TimeSeries::new(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 0.0])
//!     .unwrap()
//!     .with_extrapolation(ExtrapolationMode::Cyclic);
//! assert!((series.get_value(0.5) - 0.5).abs() < 1e-12);
//! assert!((series.get_value(2.5) - 0.5).abs() < 1e-12);
//! ```

use rosi_config::{AgeTable, SeriesConfig};
use rosi_foundation::{RosiError, RosiResult};
use serde::{Deserialize, Serialize};

pub use rosi_config::ExtrapolationMode;

/// 分段线性序列
///
/// 节点横坐标严格递增且至少有一个节点。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSeries {
    points: Vec<(f64, f64)>,
    extrapolation: ExtrapolationMode,
}

impl TimeSeries {
    /// 从时间和值数组创建
    pub fn new(times: Vec<f64>, values: Vec<f64>) -> RosiResult<Self> {
        RosiError::check_size("TimeSeries.values", times.len(), values.len())?;
        Self::from_points(times.into_iter().zip(values).collect())
    }

    /// 从 (时间, 值) 点对创建
    pub fn from_points(points: Vec<(f64, f64)>) -> RosiResult<Self> {
        if points.is_empty() {
            return Err(RosiError::invalid_input("时间序列不能为空"));
        }
        if let Some(w) = points.windows(2).find(|w| !(w[1].0 > w[0].0)) {
            return Err(RosiError::invalid_input(format!(
                "时间必须严格递增: {} 之后出现 {}",
                w[0].0, w[1].0
            )));
        }
        Ok(Self {
            points,
            extrapolation: ExtrapolationMode::Clamp,
        })
    }

    /// 常数序列
    pub fn constant(value: f64) -> Self {
        Self {
            points: vec![(0.0, value)],
            extrapolation: ExtrapolationMode::Clamp,
        }
    }

    /// 从配置创建
    pub fn from_config(config: &SeriesConfig) -> RosiResult<Self> {
        Ok(Self::from_points(config.points.clone())?.with_extrapolation(config.extrapolation))
    }

    /// 从龄期表创建，值乘以 `scale`
    pub fn from_age_table(table: &AgeTable, scale: f64) -> RosiResult<Self> {
        let points = table.points().into_iter().map(|(a, v)| (a, v * scale)).collect();
        Self::from_points(points)
    }

    /// 设置外推模式
    pub fn with_extrapolation(mut self, mode: ExtrapolationMode) -> Self {
        self.extrapolation = mode;
        self
    }

    pub fn extrapolation_mode(&self) -> ExtrapolationMode {
        self.extrapolation
    }

    /// 首末节点的横坐标
    pub fn time_range(&self) -> (f64, f64) {
        (self.first().0, self.last().0)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// 构造保证非空，恒为 `false`
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// 查询 `t` 时刻的值
    pub fn get_value(&self, t: f64) -> f64 {
        let (start, end) = self.time_range();
        if (start..=end).contains(&t) {
            return self.interpolate(t);
        }
        match self.extrapolation {
            ExtrapolationMode::Clamp if t < start => self.first().1,
            ExtrapolationMode::Clamp => self.last().1,
            ExtrapolationMode::Cyclic => {
                let period = end - start;
                if period < 1e-12 {
                    self.first().1
                } else {
                    self.interpolate(start + (t - start).rem_euclid(period))
                }
            }
            ExtrapolationMode::Linear => match self.points.as_slice() {
                [(_, v)] => *v,
                [a, b, ..] if t < start => along(*a, *b, t),
                [.., a, b] => along(*a, *b, t),
                [] => 0.0,
            },
        }
    }

    fn first(&self) -> (f64, f64) {
        self.points.first().copied().unwrap_or_default()
    }

    fn last(&self) -> (f64, f64) {
        self.points.last().copied().unwrap_or_default()
    }

    // t 位于 [start, end] 内
    fn interpolate(&self, t: f64) -> f64 {
        let i = self.points.partition_point(|&(x, _)| x <= t);
        match (i.checked_sub(1).map(|k| self.points[k]), self.points.get(i)) {
            (Some(a), Some(b)) => along(a, *b, t),
            (Some(a), None) => a.1,
            (None, _) => self.first().1,
        }
    }
}

/// 过 `a`、`b` 两点的直线在 `t` 处的值
fn along(a: (f64, f64), b: (f64, f64), t: f64) -> f64 {
    a.1 + (t - a.0) / (b.0 - a.0) * (b.1 - a.1)
}
