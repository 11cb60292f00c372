// crates/rosi_growth/src/policy.rs

//! 新单元初始化策略

use crate::error::{GrowthError, GrowthResult};
use rosi_foundation::primary::PRESSURE_IDX;
use rosi_foundation::{Position, PrimaryVariables};
use rosi_grid::GridGeometry;
use serde::{Deserialize, Serialize};

/// 周围介质压力查询 [Pa]
pub type MediumFn<'a> = &'a dyn Fn(Position) -> f64;

/// 新单元初始化策略
///
/// 所有策略只设置压力分量，其余分量置零。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NewElementPolicy {
    /// 固定压力 [Pa]
    Constant {
        /// 压力值
        pressure: f64,
    },
    /// 单元中心处的周围介质（土壤）压力
    SurroundingMedium,
    /// 复制中心距离最近的已填充相邻单元，没有时使用 `fallback`
    NearestSurvivingNeighbour {
        /// 无可用相邻单元时的压力
        fallback: f64,
    },
}

impl Default for NewElementPolicy {
    fn default() -> Self {
        Self::Constant { pressure: -1.0e4 }
    }
}

impl NewElementPolicy {
    /// 为新单元 `e` 生成主变量
    pub fn initialize(
        &self,
        e: usize,
        geometry: &GridGeometry,
        filled: &[Option<PrimaryVariables>],
        medium: Option<MediumFn<'_>>,
        n_components: usize,
    ) -> GrowthResult<PrimaryVariables> {
        let pressure_only = |p: f64| {
            let mut pv = PrimaryVariables::zeros(n_components.max(1));
            pv[PRESSURE_IDX] = p;
            pv
        };

        match self {
            Self::Constant { pressure } => Ok(pressure_only(*pressure)),
            Self::SurroundingMedium => {
                let medium = medium.ok_or_else(|| {
                    GrowthError::Policy("surrounding_medium 策略需要介质压力查询".into())
                })?;
                Ok(pressure_only(medium(geometry.center(e))))
            }
            Self::NearestSurvivingNeighbour { fallback } => {
                let center = geometry.center(e);
                let nearest = geometry
                    .neighbors(e)
                    .into_iter()
                    .filter_map(|n| {
                        let value = filled.get(n)?.as_ref()?;
                        Some((geometry.center(n).distance_squared(center), value))
                    })
                    .min_by(|a, b| a.0.total_cmp(&b.0));
                Ok(match nearest {
                    Some((_, value)) => value.clone(),
                    None => pressure_only(*fallback),
                })
            }
        }
    }
}
