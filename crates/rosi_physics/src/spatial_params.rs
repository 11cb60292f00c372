// crates/rosi_physics/src/spatial_params.rs

//! 根系空间参数
//!
//! 每个根单元保存根级与创建时间，导水率与半径由根级参数表按龄期计算：
//! `age = initial_age - creation_time + time`。
//!
//! 参数随网格生长迁移：旧单元按持久标识保留，新单元继承最近的已填充
//! 相邻单元的根级，创建时间为当前时刻。

use crate::attributes::{ElementAttributes, ATTR_CREATION_TIME, ATTR_ORDER};
use crate::timeseries::TimeSeries;
use crate::units::{cm_to_m, kr_to_si, kx_to_si, SECONDS_PER_DAY};
use rosi_config::RootConfig;
use rosi_foundation::{RosiError, RosiResult};
use rosi_grid::{GridGeometry, LineGrid};
use rosi_growth::{AttachedData, GrowthResult, PersistentDataTransfer};
use std::collections::HashMap;
use tracing::{debug, warn};

/// 单个根级的参数表，龄期单位为天，值为国际单位
#[derive(Debug, Clone)]
struct OrderTables {
    kr: TimeSeries,
    kx: TimeSeries,
    radius: TimeSeries,
}

/// 根系空间参数
#[derive(Debug, Clone)]
pub struct RootSpatialParams {
    attributes: ElementAttributes,
    orders: Vec<OrderTables>,
    initial_age: f64,
    time: f64,
    transfer: PersistentDataTransfer<[f64; 2]>,
}

impl RootSpatialParams {
    /// 由配置与初始网格创建
    ///
    /// 配置中的线段按端点与网格单元对应，因此与单元编号方式无关。
    pub fn new(config: &RootConfig, grid: &LineGrid) -> RosiResult<Self> {
        let orders = config
            .orders
            .iter()
            .map(|o| {
                Ok(OrderTables {
                    kr: TimeSeries::from_age_table(&o.kr, kr_to_si(1.0))?,
                    kx: TimeSeries::from_age_table(&o.kx, kx_to_si(1.0))?,
                    radius: TimeSeries::from_age_table(&o.radius, cm_to_m(1.0))?,
                })
            })
            .collect::<RosiResult<Vec<_>>>()?;
        if orders.is_empty() {
            return Err(RosiError::missing_config("root.orders"));
        }

        let network = &config.network;
        let n = grid.element_count();
        RosiError::check_size("root.network.segments", n, network.segments.len())?;

        let mut by_vertices = HashMap::with_capacity(n);
        for e in 0..n {
            let [a, b] = grid.element_vertices(e)?;
            by_vertices.insert((a.min(b), a.max(b)), e);
        }

        let mut order = vec![0.0; n];
        let mut creation_time = vec![0.0; n];
        for (s, &[a, b]) in network.segments.iter().enumerate() {
            let e = *by_vertices.get(&(a.min(b), a.max(b))).ok_or_else(|| {
                RosiError::invalid_input(format!("线段 {s} [{a}, {b}] 不在根系网格中"))
            })?;
            let raw = network.orders.get(s).copied().unwrap_or(0);
            if raw < 0 {
                warn!("单元 {} 的根级为负 ({})，按根级 0 处理", e, raw);
            }
            order[e] = raw.max(0) as f64;
            creation_time[e] = network.creation_times.get(s).copied().unwrap_or(0.0);
        }

        let mut attributes = ElementAttributes::new(n);
        attributes.set(ATTR_ORDER, order)?;
        attributes.set(ATTR_CREATION_TIME, creation_time)?;

        Ok(Self {
            attributes,
            orders,
            initial_age: config.initial_age,
            time: 0.0,
            transfer: PersistentDataTransfer::new(),
        })
    }

    /// 设置当前模拟时间 [s]，龄期随之变化
    pub fn set_time(&mut self, t: f64) {
        self.time = t;
    }

    /// 当前模拟时间 [s]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// 单元数
    pub fn element_count(&self) -> usize {
        self.attributes.element_count()
    }

    /// 属性存储
    pub fn attributes(&self) -> &ElementAttributes {
        &self.attributes
    }

    /// 根级，从 0 开始
    pub fn order(&self, e: usize) -> RosiResult<usize> {
        Ok(self.attributes.value(ATTR_ORDER, e)? as usize)
    }

    /// 创建时间 [s]
    pub fn creation_time(&self, e: usize) -> RosiResult<f64> {
        self.attributes.value(ATTR_CREATION_TIME, e)
    }

    /// 龄期 [s]
    pub fn age(&self, e: usize) -> RosiResult<f64> {
        Ok(self.initial_age - self.creation_time(e)? + self.time)
    }

    /// 径向导水率 [m/(Pa s)]
    pub fn kr(&self, e: usize) -> RosiResult<f64> {
        let (tables, age) = self.lookup(e)?;
        Ok(tables.kr.get_value(age))
    }

    /// 轴向导水率 [m⁴/(Pa s)]
    pub fn kx(&self, e: usize) -> RosiResult<f64> {
        let (tables, age) = self.lookup(e)?;
        Ok(tables.kx.get_value(age))
    }

    /// 半径 [m]
    pub fn radius(&self, e: usize) -> RosiResult<f64> {
        let (tables, age) = self.lookup(e)?;
        Ok(tables.radius.get_value(age))
    }

    // 超出配置范围的根级使用最后一项
    fn lookup(&self, e: usize) -> RosiResult<(&OrderTables, f64)> {
        let o = self.order(e)?.min(self.orders.len() - 1);
        Ok((&self.orders[o], self.age(e)? / SECONDS_PER_DAY))
    }

    fn packed(&self) -> RosiResult<Vec<[f64; 2]>> {
        let order = self.field(ATTR_ORDER)?;
        let ct = self.field(ATTR_CREATION_TIME)?;
        Ok(order.iter().zip(ct).map(|(&o, &c)| [o, c]).collect())
    }

    fn field(&self, name: &str) -> RosiResult<&[f64]> {
        self.attributes
            .get(name)
            .ok_or_else(|| RosiError::not_found(format!("单元属性 '{name}'")))
    }
}

impl AttachedData for RootSpatialParams {
    fn store(&mut self, grid: &LineGrid) -> GrowthResult<()> {
        let packed = self.packed()?;
        self.transfer.snapshot(grid, &packed)
    }

    fn reconstruct(&mut self, grid: &LineGrid, geometry: &GridGeometry) -> GrowthResult<()> {
        let created = self.initial_age + self.time;
        let mut packed = Vec::new();
        self.transfer.restore(grid, &mut packed, |e, filled| {
            let center = geometry.center(e);
            let order = geometry
                .neighbors(e)
                .into_iter()
                .filter_map(|n| {
                    let [o, _] = filled.get(n)?.as_ref()?;
                    Some((geometry.center(n).distance_squared(center), *o))
                })
                .min_by(|a, b| a.0.total_cmp(&b.0))
                .map_or(0.0, |(_, o)| o);
            debug!("新根单元 {}: 根级 {}", e, order);
            Ok([order, created])
        })?;

        let (order, ct): (Vec<f64>, Vec<f64>) = packed.into_iter().map(|[o, c]| (o, c)).unzip();
        self.attributes = ElementAttributes::new(order.len());
        self.attributes.set(ATTR_ORDER, order)?;
        self.attributes.set(ATTR_CREATION_TIME, ct)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;
    use rosi_config::{AgeTable, NetworkConfig, OrderParams};
    use rosi_grid::LeafOrdering;

    fn config() -> RootConfig {
        RootConfig {
            orders: vec![
                OrderParams::default(),
                OrderParams {
                    kr: AgeTable::Table(vec![(0.0, 0.0), (10.0, 86400.0)]),
                    kx: AgeTable::Constant(86400.0),
                    radius: AgeTable::Constant(0.05),
                },
            ],
            initial_age: 5.0 * SECONDS_PER_DAY,
            network: NetworkConfig {
                nodes: vec![[0.0, 0.0, 0.0], [0.0, 0.0, -0.01], [0.01, 0.0, -0.02]],
                segments: vec![[0, 1], [1, 2]],
                orders: vec![0, 1],
                creation_times: vec![0.0, 3.0 * SECONDS_PER_DAY],
            },
            ..Default::default()
        }
    }

    fn grid(config: &RootConfig, ordering: LeafOrdering) -> LineGrid {
        let nodes: Vec<DVec3> = config.network.nodes.iter().map(|&p| DVec3::from(p)).collect();
        LineGrid::from_segments_with_ordering(&nodes, &config.network.segments, ordering).unwrap()
    }

    #[test]
    fn test_values_and_units() {
        let config = config();
        let params = RootSpatialParams::new(&config, &grid(&config, LeafOrdering::Insertion)).unwrap();
        assert_eq!(params.order(1).unwrap(), 1);
        // 龄期 2 天，kr 表线性插值到 17280 cm/hPa/day
        assert!((params.age(1).unwrap() - 2.0 * SECONDS_PER_DAY).abs() < 1e-9);
        assert!((params.kr(1).unwrap() - kr_to_si(17280.0)).abs() < 1e-18);
        assert!((params.kx(1).unwrap() - 1.0e-10).abs() < 1e-22);
        assert!((params.radius(1).unwrap() - 5.0e-4).abs() < 1e-15);
        assert!((params.radius(0).unwrap() - 2.0e-3).abs() < 1e-15);
    }

    #[test]
    fn test_age_follows_time() {
        let config = config();
        let mut params =
            RootSpatialParams::new(&config, &grid(&config, LeafOrdering::Insertion)).unwrap();
        params.set_time(SECONDS_PER_DAY);
        assert!((params.age(0).unwrap() - 6.0 * SECONDS_PER_DAY).abs() < 1e-9);
    }

    #[test]
    fn test_segments_matched_by_vertices() {
        let config = config();
        let g = grid(&config, LeafOrdering::DepthSorted);
        let params = RootSpatialParams::new(&config, &g).unwrap();
        for e in 0..2 {
            let [a, _] = g.element_vertices(e).unwrap();
            let expected = if a == 0 { 0 } else { 1 };
            assert_eq!(params.order(e).unwrap(), expected);
        }
    }

    #[test]
    fn test_negative_order_clamped() {
        let mut config = config();
        config.network.orders = vec![-2, 7];
        let params = RootSpatialParams::new(&config, &grid(&config, LeafOrdering::Insertion)).unwrap();
        assert_eq!(params.order(0).unwrap(), 0);
        // 超出参数表的根级使用最后一项
        assert!((params.radius(1).unwrap() - 5.0e-4).abs() < 1e-15);
    }

    #[test]
    fn test_out_of_range_element() {
        let config = config();
        let params = RootSpatialParams::new(&config, &grid(&config, LeafOrdering::Insertion)).unwrap();
        assert!(params.kr(2).is_err());
    }
}
