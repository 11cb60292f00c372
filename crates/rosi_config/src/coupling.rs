// crates/rosi_config/src/coupling.rs

//! 根-土耦合与生长配置

use crate::error::{ConfigError, ConfigResult};
use rosi_growth::{GrowthEvent, NewElementPolicy, TipGrowthParams};
use serde::{Deserialize, Serialize};

/// 溶质交换参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportConfig {
    /// 分配系数 σ ∈ [0, 1]，1 表示仅被动交换
    #[serde(default = "default_sigma")]
    pub sigma: f64,
    /// 最大吸收速率 Vmax [kg/(m² s)]
    #[serde(default = "default_vmax")]
    pub vmax: f64,
    /// 半饱和常数 Km [kg/m³]
    #[serde(default = "default_km")]
    pub km: f64,
    /// 扩散交换系数 [m/s]
    #[serde(default)]
    pub diffusion: f64,
}

fn default_sigma() -> f64 { 1.0 }
fn default_vmax() -> f64 { 6.2e-11 }
fn default_km() -> f64 { 3.1e-9 }

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            sigma: default_sigma(),
            vmax: default_vmax(),
            km: default_km(),
            diffusion: 0.0,
        }
    }
}

/// 耦合配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouplingConfig {
    /// 是否耦合；关闭时所有点源为零
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// 沿根单元的积分阶数
    #[serde(default = "default_integration_order")]
    pub integration_order: usize,

    /// 土壤相对渗透率
    #[serde(default = "default_krel")]
    pub krel: f64,

    /// 溶质交换，缺省只计算水流
    #[serde(default)]
    pub transport: Option<TransportConfig>,
}

fn default_enabled() -> bool { true }
fn default_integration_order() -> usize { 1 }
fn default_krel() -> f64 { 1.0 }

impl Default for CouplingConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            integration_order: default_integration_order(),
            krel: default_krel(),
            transport: None,
        }
    }
}

impl CouplingConfig {
    /// 每个主变量向量的分量数
    pub fn n_components(&self) -> usize {
        if self.transport.is_some() { 2 } else { 1 }
    }

    /// 验证
    pub fn validate(&self) -> ConfigResult<()> {
        if !(1..=5).contains(&self.integration_order) {
            return Err(ConfigError::invalid(
                "coupling.integration_order",
                self.integration_order,
                "积分阶数必须在 [1, 5] 范围内",
            ));
        }
        if self.krel < 0.0 {
            return Err(ConfigError::invalid("coupling.krel", self.krel, "不能为负"));
        }
        if let Some(t) = &self.transport {
            if !(0.0..=1.0).contains(&t.sigma) {
                return Err(ConfigError::invalid(
                    "coupling.transport.sigma",
                    t.sigma,
                    "分配系数必须在 [0, 1] 范围内",
                ));
            }
            if t.km <= 0.0 || t.vmax < 0.0 || t.diffusion < 0.0 {
                return Err(ConfigError::invalid(
                    "coupling.transport",
                    format!("vmax={}, km={}, diffusion={}", t.vmax, t.km, t.diffusion),
                    "Km 必须为正，Vmax 与扩散系数不能为负",
                ));
            }
        }
        Ok(())
    }
}

/// 生长模型选择
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GrowthModelConfig {
    /// 根尖直线延伸
    LinearTip(TipGrowthParams),
    /// 按事件回放
    Scripted {
        /// 每个时间步一个事件
        events: Vec<GrowthEvent>,
    },
}

impl Default for GrowthModelConfig {
    fn default() -> Self {
        Self::LinearTip(TipGrowthParams::default())
    }
}

/// 生长配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GrowthConfig {
    /// 是否生长
    #[serde(default)]
    pub enabled: bool,

    /// 生长模型
    #[serde(default)]
    pub model: GrowthModelConfig,

    /// 新单元初始化策略
    #[serde(default)]
    pub policy: NewElementPolicy,
}

impl GrowthConfig {
    /// 验证
    pub fn validate(&self) -> ConfigResult<()> {
        if let GrowthModelConfig::LinearTip(params) = &self.model {
            if params.rate < 0.0 || params.max_segment_length <= 0.0 {
                return Err(ConfigError::invalid(
                    "growth.model",
                    format!("rate={}, max_segment_length={}", params.rate, params.max_segment_length),
                    "速率不能为负，最大线段长度必须为正",
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_valid() {
        assert!(CouplingConfig::default().validate().is_ok());
        assert!(GrowthConfig::default().validate().is_ok());
        assert_eq!(CouplingConfig::default().n_components(), 1);
    }

    #[test]
    fn test_sigma_range() {
        let config = CouplingConfig {
            transport: Some(TransportConfig {
                sigma: 1.5,
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_growth_model_serde() {
        let json = r#"{"enabled":true,"model":{"kind":"scripted","events":[]},"policy":{"kind":"surrounding_medium"}}"#;
        let growth: GrowthConfig = serde_json::from_str(json).unwrap();
        assert!(growth.enabled);
        assert_eq!(growth.model, GrowthModelConfig::Scripted { events: vec![] });
        assert_eq!(growth.policy, NewElementPolicy::SurroundingMedium);

        let json = r#"{"model":{"kind":"linear_tip","rate":1e-7}}"#;
        let growth: GrowthConfig = serde_json::from_str(json).unwrap();
        match growth.model {
            GrowthModelConfig::LinearTip(p) => {
                assert!((p.rate - 1e-7).abs() < 1e-20);
                assert!((p.max_segment_length - 5.0e-3).abs() < 1e-15);
            }
            other => panic!("unexpected model {other:?}"),
        }
    }
}
