// crates/rosi_physics/src/units.rs

//! 物理常数与单位换算
//!
//! 压力水头 [cm] 与绝对压力 [Pa] 之间以参考压力 `P_REF` 为零点换算。

/// 水密度 [kg/m³]
pub const RHO: f64 = 1.0e3;
/// 重力加速度 [m/s²]
pub const G: f64 = 9.81;
/// 参考压力 [Pa]
pub const P_REF: f64 = 1.0e5;
/// 水的动力黏度 [Pa s]
pub const MU: f64 = 1.0e-3;
/// 边界判定容差 [m]
pub const BOUNDARY_EPS: f64 = 1.0e-8;
/// 一天的秒数
pub const SECONDS_PER_DAY: f64 = 86400.0;
/// 温度 [K]
pub const TEMPERATURE: f64 = 283.15;

/// 压力水头 [cm] → 压力 [Pa]
#[inline]
pub fn to_pa(head: f64) -> f64 {
    P_REF + head / 100.0 * RHO * G
}

/// 压力 [Pa] → 压力水头 [cm]
#[inline]
pub fn to_head(pressure: f64) -> f64 {
    (pressure - P_REF) * 100.0 / RHO / G
}

/// 径向导水率 [cm/hPa/day] → [m/Pa/s]
#[inline]
pub fn kr_to_si(kr: f64) -> f64 {
    kr * 1.0e-4 / SECONDS_PER_DAY
}

/// 轴向导水率 [cm⁴/hPa/day] → [m⁴/Pa/s]
#[inline]
pub fn kx_to_si(kx: f64) -> f64 {
    kx * 1.0e-10 / SECONDS_PER_DAY
}

/// [cm] → [m]
#[inline]
pub fn cm_to_m(v: f64) -> f64 {
    v * 1.0e-2
}

/// 通量 [cm/day] → 质量通量 [kg/(m² s)]
#[inline]
pub fn flux_to_mass(v: f64) -> f64 {
    v * RHO / SECONDS_PER_DAY / 100.0
}

/// [kg/s] → [g/day]
#[inline]
pub fn kg_per_s_to_g_per_day(v: f64) -> f64 {
    v * SECONDS_PER_DAY * 1000.0
}
