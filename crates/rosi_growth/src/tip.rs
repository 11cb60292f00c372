// crates/rosi_growth/src/tip.rs

//! 根尖直线延伸生长模型
//!
//! 每个根尖沿固定方向以恒定速率延伸。根尖节点每步移动；
//! 当根尖所在线段超过最大长度时，根尖节点固定在最大长度处，
//! 在实际根尖位置新建节点和线段。

use crate::interface::GrowthModel;
use rosi_foundation::{Position, RosiError, RosiResult};
use serde::{Deserialize, Serialize};

/// 根尖生长参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TipGrowthParams {
    /// 延伸速率 [m/s]
    #[serde(default = "default_rate")]
    pub rate: f64,
    /// 最大线段长度 [m]
    #[serde(default = "default_max_segment_length")]
    pub max_segment_length: f64,
    /// 单个根尖的最大累计延伸 [m]，`None` 不限
    #[serde(default)]
    pub max_extension: Option<f64>,
}

fn default_rate() -> f64 {
    1.0e-2 / 86400.0
}
fn default_max_segment_length() -> f64 {
    5.0e-3
}

impl Default for TipGrowthParams {
    fn default() -> Self {
        Self {
            rate: default_rate(),
            max_segment_length: default_max_segment_length(),
            max_extension: None,
        }
    }
}

#[derive(Debug, Clone)]
struct Tip {
    base: usize,
    node: usize,
    direction: Position,
    extension: f64,
}

/// 根尖直线延伸模型
#[derive(Debug, Clone)]
pub struct LinearTipGrowth {
    params: TipGrowthParams,
    nodes: Vec<Position>,
    tips: Vec<Tip>,

    updated_indices: Vec<usize>,
    updated_positions: Vec<Position>,
    new_indices: Vec<usize>,
    new_positions: Vec<Position>,
    new_segments: Vec<[usize; 2]>,
}

impl LinearTipGrowth {
    /// 由初始根系创建
    ///
    /// 根尖为只作为线段终点、从不作为线段起点的节点。
    pub fn new(
        nodes: Vec<Position>,
        segments: &[[usize; 2]],
        params: TipGrowthParams,
    ) -> RosiResult<Self> {
        if !(params.rate >= 0.0) || !(params.max_segment_length > 0.0) {
            return Err(RosiError::invalid_input(format!(
                "根尖生长参数无效: rate={}, max_segment_length={}",
                params.rate, params.max_segment_length
            )));
        }

        let mut is_start = vec![false; nodes.len()];
        for &[a, b] in segments {
            RosiError::check_index("GrowthNode", a, nodes.len())?;
            RosiError::check_index("GrowthNode", b, nodes.len())?;
            is_start[a] = true;
        }

        let mut tips = Vec::new();
        for &[base, node] in segments {
            if is_start[node] {
                continue;
            }
            let direction = (nodes[node] - nodes[base]).normalize_or_zero();
            if direction == Position::ZERO {
                continue;
            }
            tips.push(Tip {
                base,
                node,
                direction,
                extension: 0.0,
            });
        }

        Ok(Self {
            params,
            nodes,
            tips,
            updated_indices: Vec::new(),
            updated_positions: Vec::new(),
            new_indices: Vec::new(),
            new_positions: Vec::new(),
            new_segments: Vec::new(),
        })
    }

    /// 根尖数
    pub fn tip_count(&self) -> usize {
        self.tips.len()
    }

    /// 当前全部节点
    pub fn nodes(&self) -> &[Position] {
        &self.nodes
    }
}

impl GrowthModel for LinearTipGrowth {
    fn simulate(&mut self, dt: f64) -> RosiResult<()> {
        self.updated_indices.clear();
        self.updated_positions.clear();
        self.new_indices.clear();
        self.new_positions.clear();
        self.new_segments.clear();

        let max_len = self.params.max_segment_length;
        for tip in &mut self.tips {
            let mut step = self.params.rate * dt;
            if let Some(limit) = self.params.max_extension {
                step = step.min((limit - tip.extension).max(0.0));
            }
            if step <= 0.0 {
                continue;
            }
            tip.extension += step;

            let base = self.nodes[tip.base];
            let target = self.nodes[tip.node] + tip.direction * step;
            if base.distance(target) <= max_len {
                self.nodes[tip.node] = target;
                self.updated_indices.push(tip.node);
                self.updated_positions.push(target);
                continue;
            }

            // 固定旧根尖，在实际根尖处新建节点
            let fixed = base + tip.direction * max_len;
            self.nodes[tip.node] = fixed;
            self.updated_indices.push(tip.node);
            self.updated_positions.push(fixed);

            let index = self.nodes.len();
            self.nodes.push(target);
            self.new_indices.push(index);
            self.new_positions.push(target);
            self.new_segments.push([tip.node, index]);
            tip.base = tip.node;
            tip.node = index;
        }
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
        "linear-tip"
    }
}
