// crates/rosi_growth/src/grid_growth.rs

//! 网格生长编排器
//!
//! 一次 [`GridGrowth::grow`] 依次执行：
//!
//! 1. 记录旧的单元数和顶点数
//! 2. 快照单元数据（解向量与附加数据）
//! 3. 推进生长模型
//! 4. 移动已有节点（只改变几何）
//! 5. 若有新线段：插入新顶点（检查编号连续）、插入新单元、提交网格、
//!    刷新几何缓存、登记新顶点编号、刷新顶点查找表、恢复并初始化数据、
//!    结束生长
//! 6. 检查单元总数
//! 7. 统计编号映射中 `map[i] != i` 的条目
//!
//! 所有失败均为致命错误，错误中带有失败时所处的阶段。

use crate::error::{GrowthError, GrowthResult};
use crate::index_map::IndexMap;
use crate::interface::GrowthModel;
use crate::policy::{MediumFn, NewElementPolicy};
use crate::transfer::{AttachedData, PersistentDataTransfer};
use rosi_foundation::{GrowthNodeIndex, Position, PrimaryVariables, VertexIndex};
use rosi_grid::{ElementKind, GridGeometry, LineGrid, VertexEntityMap};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, error, info};

/// 编排器状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GrowthState {
    /// 空闲
    Idle,
    /// 快照单元数据
    Snapshotting,
    /// 推进生长模型
    Simulating,
    /// 移动已有节点
    UpdatingPositions,
    /// 暂存新顶点和新单元
    InsertingTopology,
    /// 提交网格
    Committing,
    /// 登记新顶点编号
    RemappingIndices,
    /// 恢复并初始化单元数据
    RestoringData,
    /// 收尾检查
    Done,
}

/// 一次生长的借用上下文
///
/// 网格、几何缓存、生长模型和解向量由驱动程序持有，
/// 在一次 `grow` 调用期间以可变借用交给编排器。
pub struct GrowthContext<'a> {
    /// 一维线网格
    pub grid: &'a mut LineGrid,
    /// 几何缓存
    pub geometry: &'a mut GridGeometry,
    /// 生长模型
    pub model: &'a mut dyn GrowthModel,
    /// 每个单元的主变量
    pub solution: &'a mut Vec<PrimaryVariables>,
    /// 周围介质压力，`SurroundingMedium` 策略需要
    pub medium: Option<MediumFn<'a>>,
    /// 随网格迁移的附加数据
    pub attached: Vec<&'a mut dyn AttachedData>,
}

impl<'a> GrowthContext<'a> {
    /// 最小上下文
    pub fn new(
        grid: &'a mut LineGrid,
        geometry: &'a mut GridGeometry,
        model: &'a mut dyn GrowthModel,
        solution: &'a mut Vec<PrimaryVariables>,
    ) -> Self {
        Self {
            grid,
            geometry,
            model,
            solution,
            medium: None,
            attached: Vec::new(),
        }
    }

    /// 设置周围介质压力查询
    pub fn with_medium(mut self, medium: MediumFn<'a>) -> Self {
        self.medium = Some(medium);
        self
    }

    /// 添加附加数据
    pub fn with_attached(mut self, data: &'a mut dyn AttachedData) -> Self {
        self.attached.push(data);
        self
    }
}

/// 一次生长的结果摘要
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrowthReport {
    /// 时间步长 [s]
    pub dt: f64,
    /// 移动的节点数
    pub updated_nodes: usize,
    /// 新增顶点数
    pub new_vertices: usize,
    /// 新增线段数
    pub new_segments: usize,
    /// 编号映射中 `map[i] != i` 的条目数
    pub index_mismatches: usize,
    /// 生长后单元数
    pub element_count: usize,
    /// 生长后顶点数
    pub vertex_count: usize,
}

impl fmt::Display for GrowthReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "dt={:.1}s 移动 {} 节点, 新增 {} 顶点 / {} 线段, 共 {} 单元 / {} 顶点, 映射偏差 {}",
            self.dt,
            self.updated_nodes,
            self.new_vertices,
            self.new_segments,
            self.element_count,
            self.vertex_count,
            self.index_mismatches
        )
    }
}

/// 网格生长编排器
#[derive(Debug)]
pub struct GridGrowth {
    index_map: IndexMap,
    vertex_map: VertexEntityMap,
    transfer: PersistentDataTransfer<PrimaryVariables>,
    policy: NewElementPolicy,
    n_components: usize,
    state: GrowthState,
    steps: usize,
}

impl GridGrowth {
    /// 创建
    ///
    /// 初始网格的顶点编号必须与生长模型节点编号一致。
    pub fn new(
        grid: &LineGrid,
        model: &dyn GrowthModel,
        policy: NewElementPolicy,
        n_components: usize,
    ) -> GrowthResult<Self> {
        if model.node_count() != grid.vertex_count() {
            return Err(GrowthError::NodeCountMismatch {
                what: "初始网格顶点数与生长模型节点数",
                expected: model.node_count(),
                actual: grid.vertex_count(),
            });
        }
        Ok(Self {
            index_map: IndexMap::identity(grid.vertex_count()),
            vertex_map: VertexEntityMap::new(grid)?,
            transfer: PersistentDataTransfer::new(),
            policy,
            n_components,
            state: GrowthState::Idle,
            steps: 0,
        })
    }

    /// 当前状态
    #[inline]
    pub fn state(&self) -> GrowthState {
        self.state
    }

    /// 编号映射表
    #[inline]
    pub fn index_map(&self) -> &IndexMap {
        &self.index_map
    }

    /// 新单元初始化策略
    #[inline]
    pub fn policy(&self) -> &NewElementPolicy {
        &self.policy
    }

    /// 已完成的生长步数
    #[inline]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// 快照是否已清空
    pub fn snapshot_is_empty(&self) -> bool {
        self.transfer.is_empty()
    }

    /// 生长模型节点编号 → 网格顶点编号
    pub fn dune_index(&self, growth_index: usize) -> GrowthResult<usize> {
        self.index_map.try_get(growth_index)
    }

    /// 带类型的编号翻译
    pub fn vertex_of(&self, node: GrowthNodeIndex) -> GrowthResult<VertexIndex> {
        self.index_map.translate(node)
    }

    /// 执行一次生长
    pub fn grow(&mut self, mut ctx: GrowthContext<'_>, dt: f64) -> GrowthResult<GrowthReport> {
        if self.state != GrowthState::Idle {
            return Err(GrowthError::NotIdle(self.state));
        }

        match self.grow_steps(&mut ctx, dt) {
            Ok(report) => {
                self.state = GrowthState::Idle;
                self.steps += 1;
                Ok(report)
            }
            Err(err) => {
                let err = err.at(self.state);
                error!(phase = ?self.state, "网格生长失败: {}", err);
                Err(err)
            }
        }
    }

    fn enter(&mut self, state: GrowthState) {
        self.state = state;
    }

    fn grow_steps(&mut self, ctx: &mut GrowthContext<'_>, dt: f64) -> GrowthResult<GrowthReport> {
        // 1. 旧的单元数和顶点数
        let old_num_segments = ctx.grid.element_count();
        let old_num_vertices = ctx.grid.vertex_count();

        // 2. 快照
        self.enter(GrowthState::Snapshotting);
        self.transfer.snapshot(ctx.grid, ctx.solution)?;
        for data in ctx.attached.iter_mut() {
            data.store(ctx.grid)?;
        }

        // 3. 推进生长模型
        self.enter(GrowthState::Simulating);
        ctx.model.simulate(dt)?;

        // 4. 移动已有节点
        self.enter(GrowthState::UpdatingPositions);
        let updated_indices = ctx.model.updated_node_indices();
        let updated_nodes = ctx.model.updated_nodes();
        if updated_indices.len() != updated_nodes.len() {
            return Err(GrowthError::NodeCountMismatch {
                what: "移动节点编号与坐标",
                expected: updated_indices.len(),
                actual: updated_nodes.len(),
            });
        }
        let updated_count = updated_indices.len();
        for (&i, &position) in updated_indices.iter().zip(updated_nodes) {
            self.move_vertex(ctx.grid, self.index_map.growth_to_mesh(i), position)?;
        }

        // 5. 插入新拓扑
        let new_segments = ctx.model.new_segments().to_vec();
        let mut new_vertices = 0;
        if !new_segments.is_empty() {
            self.enter(GrowthState::InsertingTopology);
            let new_indices = ctx.model.new_node_indices();
            let new_nodes = ctx.model.new_nodes();
            if new_indices.len() != new_nodes.len() {
                return Err(GrowthError::NodeCountMismatch {
                    what: "新节点编号与坐标",
                    expected: new_indices.len(),
                    actual: new_nodes.len(),
                });
            }
            for (&growth_index, &position) in new_indices.iter().zip(new_nodes) {
                let inserted_index = ctx.grid.insert_vertex(position)?;
                if inserted_index != growth_index {
                    return Err(GrowthError::InsertionOrderMismatch {
                        growth_index,
                        inserted_index,
                    });
                }
            }
            new_vertices = new_nodes.len();

            for &[s0, s1] in &new_segments {
                ctx.grid.insert_element(
                    ElementKind::Line,
                    [
                        self.index_map.growth_to_mesh(s0),
                        self.index_map.growth_to_mesh(s1),
                    ],
                )?;
            }

            self.enter(GrowthState::Committing);
            ctx.grid.pre_grow()?;
            ctx.grid.grow()?;
            ctx.geometry.update(ctx.grid)?;

            self.enter(GrowthState::RemappingIndices);
            self.index_map.update(ctx.grid, old_num_vertices)?;
            self.vertex_map.update(ctx.grid)?;

            self.enter(GrowthState::RestoringData);
            let policy = &self.policy;
            let geometry: &GridGeometry = ctx.geometry;
            let medium = ctx.medium;
            let n_components = self.n_components;
            self.transfer.restore(ctx.grid, ctx.solution, |e, filled| {
                policy.initialize(e, geometry, filled, medium, n_components)
            })?;
            for data in ctx.attached.iter_mut() {
                data.reconstruct(ctx.grid, ctx.geometry)?;
            }

            ctx.grid.post_grow()?;
            info!("新增 {} 条线段", new_segments.len());
        } else {
            if updated_count > 0 {
                ctx.geometry.update(ctx.grid)?;
            }
            self.transfer.discard();
            for data in ctx.attached.iter_mut() {
                data.reconstruct(ctx.grid, ctx.geometry)?;
            }
        }

        // 6. 单元总数
        self.enter(GrowthState::Done);
        check_element_count(old_num_segments, new_segments.len(), ctx.grid.element_count())?;
        if self.index_map.len() != ctx.model.node_count() {
            return Err(GrowthError::NodeCountMismatch {
                what: "编号映射表大小与生长模型节点数",
                expected: ctx.model.node_count(),
                actual: self.index_map.len(),
            });
        }

        // 7. 映射偏差诊断
        let index_mismatches = self.index_map.mismatch_count();
        debug!("编号映射: {} 项与网格编号不同", index_mismatches);

        Ok(GrowthReport {
            dt,
            updated_nodes: updated_count,
            new_vertices,
            new_segments: new_segments.len(),
            index_mismatches,
            element_count: ctx.grid.element_count(),
            vertex_count: ctx.grid.vertex_count(),
        })
    }

    fn move_vertex(&self, grid: &mut LineGrid, v: usize, position: Position) -> GrowthResult<()> {
        let actual = grid.vertex_id(v)?;
        if self.vertex_map.entity(v) != Some(actual) {
            return Err(GrowthError::StaleVertexMap { vertex: v });
        }
        grid.set_vertex_position(v, position)?;
        Ok(())
    }
}

/// 生长后单元数必须等于旧单元数加新线段数
///
/// 网格合并或丢弃了插入的单元时返回致命错误。
fn check_element_count(old: usize, added: usize, actual: usize) -> GrowthResult<()> {
    if old + added != actual {
        return Err(GrowthError::ElementCountMismatch {
            expected: old + added,
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scripted::{GrowthEvent, ScriptedGrowth};
    use glam::DVec3;

    fn setup() -> (LineGrid, GridGeometry, ScriptedGrowth, Vec<PrimaryVariables>) {
        let nodes = vec![DVec3::ZERO, DVec3::new(0.0, 0.0, -0.01)];
        let segments = vec![[0, 1]];
        let grid = LineGrid::from_segments(&nodes, &segments).unwrap();
        let geometry = GridGeometry::new(&grid).unwrap();
        let model = ScriptedGrowth::new(nodes, segments);
        let solution = vec![PrimaryVariables::uniform(1, -5000.0)];
        (grid, geometry, model, solution)
    }

    #[test]
    fn test_new_rejects_node_count_mismatch() {
        let (grid, _, _, _) = setup();
        let model = ScriptedGrowth::new(vec![DVec3::ZERO], vec![]);
        let err = GridGrowth::new(&grid, &model, NewElementPolicy::default(), 1).unwrap_err();
        assert!(err.is_contract_violation());
    }

    #[test]
    fn test_step_without_topology_change_drains_snapshot() {
        let (mut grid, mut geometry, mut model, mut solution) = setup();
        model.push_event(GrowthEvent::moved(vec![(1, DVec3::new(0.0, 0.0, -0.02))]));
        let mut growth = GridGrowth::new(&grid, &model, NewElementPolicy::default(), 1).unwrap();

        let ctx = GrowthContext::new(&mut grid, &mut geometry, &mut model, &mut solution);
        let report = growth.grow(ctx, 60.0).unwrap();

        assert_eq!(report.updated_nodes, 1);
        assert_eq!(report.new_segments, 0);
        assert!(growth.snapshot_is_empty());
        assert_eq!(growth.state(), GrowthState::Idle);
        assert!((geometry.length(0) - 0.02).abs() < 1e-15);
        assert_eq!(solution[0].pressure(), -5000.0);
    }

    #[test]
    fn test_insertion_order_mismatch_reports_phase() {
        let (mut grid, mut geometry, mut model, mut solution) = setup();
        // 生长模型声称新节点编号为 5，而网格会分配 2
        model.push_event(GrowthEvent {
            updated: vec![],
            new_nodes: vec![(5, DVec3::new(0.0, 0.0, -0.02))],
            new_segments: vec![[1, 5]],
        });
        let mut growth = GridGrowth::new(&grid, &model, NewElementPolicy::default(), 1).unwrap();

        let ctx = GrowthContext::new(&mut grid, &mut geometry, &mut model, &mut solution);
        let err = growth.grow(ctx, 1.0).unwrap_err();
        assert!(err.is_contract_violation());
        assert_eq!(err.phase(), Some(GrowthState::InsertingTopology));
        assert!(matches!(
            err.root(),
            GrowthError::InsertionOrderMismatch {
                growth_index: 5,
                inserted_index: 2
            }
        ));
    }

    #[test]
    fn test_unknown_updated_node_is_fatal() {
        let (mut grid, mut geometry, mut model, mut solution) = setup();
        model.push_event(GrowthEvent::moved(vec![(7, DVec3::ZERO)]));
        let mut growth = GridGrowth::new(&grid, &model, NewElementPolicy::default(), 1).unwrap();

        let ctx = GrowthContext::new(&mut grid, &mut geometry, &mut model, &mut solution);
        let err = growth.grow(ctx, 1.0).unwrap_err();
        assert_eq!(err.phase(), Some(GrowthState::UpdatingPositions));
        assert!(matches!(err.root(), GrowthError::Grid(_)));
    }

    #[test]
    fn test_short_solution_rejected_before_mutation() {
        let (mut grid, mut geometry, mut model, _) = setup();
        model.push_event(GrowthEvent::grow_from(1, DVec3::new(0.0, 0.0, -0.02), 2));
        let mut growth = GridGrowth::new(&grid, &model, NewElementPolicy::default(), 1).unwrap();

        let mut solution = Vec::new();
        let ctx = GrowthContext::new(&mut grid, &mut geometry, &mut model, &mut solution);
        let err = growth.grow(ctx, 1.0).unwrap_err();
        assert_eq!(err.phase(), Some(GrowthState::Snapshotting));
        assert_eq!(grid.element_count(), 1);
        assert_eq!(growth.state(), GrowthState::Snapshotting);
    }

    #[test]
    fn test_report_display() {
        let report = GrowthReport {
            dt: 3600.0,
            new_segments: 2,
            ..Default::default()
        };
        assert!(report.to_string().contains("2 线段"));
    }

    #[test]
    fn test_element_count_check() {
        assert!(check_element_count(3, 2, 5).is_ok());
        // 网格丢失了一个插入的单元
        let err = check_element_count(3, 2, 4).unwrap_err();
        assert!(err.is_contract_violation());
        assert!(matches!(
            err,
            GrowthError::ElementCountMismatch {
                expected: 5,
                actual: 4
            }
        ));
    }
}
