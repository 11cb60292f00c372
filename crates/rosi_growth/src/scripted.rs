// crates/rosi_growth/src/scripted.rs

//! 按预定事件回放的生长模型
//!
//! 每次 `simulate` 取出一个事件并原样报告，事件用尽后不再变化。
//! 新节点编号由事件给出，不做任何修正，因此可以构造编号错误的场景。

use crate::interface::GrowthModel;
use rosi_foundation::{Position, RosiResult};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// 一步生长事件
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrowthEvent {
    /// 移动的节点 (编号, 新坐标)
    #[serde(default)]
    pub updated: Vec<(usize, Position)>,
    /// 新节点 (编号, 坐标)
    #[serde(default)]
    pub new_nodes: Vec<(usize, Position)>,
    /// 新线段
    #[serde(default)]
    pub new_segments: Vec<[usize; 2]>,
}

impl GrowthEvent {
    /// 只移动节点
    pub fn moved(updated: Vec<(usize, Position)>) -> Self {
        Self {
            updated,
            ..Default::default()
        }
    }

    /// 从 `parent` 长出一个编号为 `index` 的新节点
    pub fn grow_from(parent: usize, position: Position, index: usize) -> Self {
        Self {
            updated: Vec::new(),
            new_nodes: vec![(index, position)],
            new_segments: vec![[parent, index]],
        }
    }
}

/// 事件回放生长模型
#[derive(Debug, Clone, Default)]
pub struct ScriptedGrowth {
    nodes: Vec<Position>,
    segments: Vec<[usize; 2]>,
    events: VecDeque<GrowthEvent>,
    time: f64,

    updated_indices: Vec<usize>,
    updated_positions: Vec<Position>,
    new_indices: Vec<usize>,
    new_positions: Vec<Position>,
    new_segments: Vec<[usize; 2]>,
}

impl ScriptedGrowth {
    /// 以初始根系创建，无事件
    pub fn new(nodes: Vec<Position>, segments: Vec<[usize; 2]>) -> Self {
        Self {
            nodes,
            segments,
            ..Default::default()
        }
    }

    /// 以初始根系和事件序列创建
    pub fn with_events(
        nodes: Vec<Position>,
        segments: Vec<[usize; 2]>,
        events: impl IntoIterator<Item = GrowthEvent>,
    ) -> Self {
        let mut model = Self::new(nodes, segments);
        model.events.extend(events);
        model
    }

    /// 追加事件
    pub fn push_event(&mut self, event: GrowthEvent) {
        self.events.push_back(event);
    }

    /// 剩余事件数
    pub fn remaining(&self) -> usize {
        self.events.len()
    }

    /// 当前全部节点
    pub fn nodes(&self) -> &[Position] {
        &self.nodes
    }

    /// 当前全部线段
    pub fn segments(&self) -> &[[usize; 2]] {
        &self.segments
    }

    /// 累计模拟时间 [s]
    pub fn time(&self) -> f64 {
        self.time
    }

    fn clear_step(&mut self) {
        self.updated_indices.clear();
        self.updated_positions.clear();
        self.new_indices.clear();
        self.new_positions.clear();
        self.new_segments.clear();
    }
}

impl GrowthModel for ScriptedGrowth {
    fn simulate(&mut self, dt: f64) -> RosiResult<()> {
        self.clear_step();
        self.time += dt;
        let Some(event) = self.events.pop_front() else {
            return Ok(());
        };

        for (i, p) in event.updated {
            if let Some(node) = self.nodes.get_mut(i) {
                *node = p;
            }
            self.updated_indices.push(i);
            self.updated_positions.push(p);
        }
        for (i, p) in event.new_nodes {
            self.nodes.push(p);
            self.new_indices.push(i);
            self.new_positions.push(p);
        }
        self.segments.extend_from_slice(&event.new_segments);
        self.new_segments = event.new_segments;
        Ok(())
    }

    fn updated_node_indices(&self) -> &[usize] {
        &self.updated_indices
    }

    fn updated_nodes(&self) -> &[Position] {
        &self.updated_positions
    }

    fn new_node_indices(&self) -> &[usize] {
        &self.new_indices
    }

    fn new_nodes(&self) -> &[Position] {
        &self.new_positions
    }

    fn new_segments(&self) -> &[[usize; 2]] {
        &self.new_segments
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
