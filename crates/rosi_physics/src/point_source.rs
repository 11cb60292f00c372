// crates/rosi_physics/src/point_source.rs

//! 点源交换公式
//!
//! 符号约定：正值表示质量由根进入土壤。土壤问题直接使用这些值，
//! 根系问题取相反数。所有单位长度的通量都乘以点源的
//! `quadrature_weight · integration_element` 得到 [kg/s]。

use crate::coupling::{CouplingManager, PointSource};
use crate::spatial_params::RootSpatialParams;
use crate::units::{kg_per_s_to_g_per_day, RHO};
use rosi_config::TransportConfig;
use rosi_foundation::primary::{FRACTION_IDX, PRESSURE_IDX};
use rosi_foundation::{PrimaryVariables, RosiResult};
use std::f64::consts::PI;
use tracing::{info, trace};

/// 耦合视图：耦合管理器与根系参数
#[derive(Clone, Copy)]
pub struct CouplingView<'a> {
    /// 耦合管理器
    pub manager: &'a dyn CouplingManager,
    /// 根系空间参数，按点源的根单元编号查询
    pub root_params: &'a RootSpatialParams,
}

impl<'a> CouplingView<'a> {
    /// 创建
    pub fn new(manager: &'a dyn CouplingManager, root_params: &'a RootSpatialParams) -> Self {
        Self {
            manager,
            root_params,
        }
    }
}

/// 点源交换参数
#[derive(Debug, Clone, Default)]
pub struct ExchangeParams {
    /// 土壤相对渗透率
    pub krel: f64,
    /// 溶质交换，`None` 时只计算水流
    pub transport: Option<TransportConfig>,
    /// 主变量分量数
    pub n_components: usize,
}

/// 单位根长的径向水流 [kg/(m s)]
///
/// `F = 2π r kr krel (p1D - p3D) ρ`
#[inline]
pub fn radial_mass_flux(radius: f64, kr: f64, krel: f64, p_root: f64, p_soil: f64) -> f64 {
    2.0 * PI * radius * kr * krel * (p_root - p_soil) * RHO
}

/// 单位根长的溶质交换 [kg/(m s)]
///
/// 对流项按水流方向迎风取浓度；主动吸收为 Michaelis-Menten 形式；
/// 两者按分配系数 σ 组合。
pub fn solute_flux(
    mass_flux: f64,
    radius: f64,
    c_root: f64,
    c_soil: f64,
    params: &TransportConfig,
) -> f64 {
    let upwind = if mass_flux > 0.0 { c_root } else { c_soil };
    let advective = mass_flux * upwind;
    let diffusive = params.diffusion * 2.0 * PI * radius * (c_root - c_soil) * RHO;
    let active = -2.0 * PI * radius * params.vmax * c_soil * RHO / (params.km + c_soil * RHO);
    params.sigma * (advective + diffusive) + (1.0 - params.sigma) * active
}

/// 土壤侧点源值 [kg/s]
///
/// 没有耦合时各分量均为零。
pub fn exchange(
    view: Option<CouplingView<'_>>,
    params: &ExchangeParams,
    source: &PointSource,
) -> RosiResult<PrimaryVariables> {
    let mut values = PrimaryVariables::zeros(params.n_components.max(1));
    let Some(view) = view else {
        return Ok(values);
    };

    let id = source.id();
    let bulk = view.manager.bulk_pri_vars(id)?;
    let low_dim = view.manager.low_dim_pri_vars(id)?;
    let e = view.manager.point_source_data(id)?.low_dim_element_idx();
    let radius = view.root_params.radius(e)?;
    let kr = view.root_params.kr(e)?;

    let flux = radial_mass_flux(radius, kr, params.krel, low_dim.pressure(), bulk.pressure());
    values[PRESSURE_IDX] = flux * source.scale();

    if let Some(transport) = &params.transport {
        if values.len() > FRACTION_IDX {
            let solute = solute_flux(flux, radius, low_dim.fraction(), bulk.fraction(), transport);
            values[FRACTION_IDX] = solute * source.scale();
        }
    }
    trace!("点源 {}: 根单元 {}, {:?}", id, e, values.as_slice());
    Ok(values)
}

/// 对所有点源求和并记录日志 [kg/s]
pub fn source_integral<F>(
    label: &str,
    sources: &[PointSource],
    n_components: usize,
    mut value: F,
) -> RosiResult<PrimaryVariables>
where
    F: FnMut(&PointSource) -> RosiResult<PrimaryVariables>,
{
    let mut total = PrimaryVariables::zeros(n_components.max(1));
    for source in sources {
        let v = value(source)?;
        for (i, x) in v.as_slice().iter().enumerate().take(total.len()) {
            total[i] += x;
        }
    }
    info!(
        "{} 点源积分: {:e} kg/s ({:.6} g/day)",
        label,
        total.pressure(),
        kg_per_s_to_g_per_day(total.pressure())
    );
    Ok(total)
}
