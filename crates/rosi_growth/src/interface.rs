// crates/rosi_growth/src/interface.rs

//! 外部生长模型接口
//!
//! 每次 [`GrowthModel::simulate`] 之后，模型报告本步的增量变化：
//! 移动的节点、新增节点（编号从当前节点数起连续递增）、新增线段。
//! 节点编号由模型分配，从 0 开始单调递增，节点永不删除。

use rosi_foundation::{Position, RosiResult};

/// 根系生长模型
pub trait GrowthModel {
    /// 推进 `dt` 秒
    fn simulate(&mut self, dt: f64) -> RosiResult<()>;

    /// 本步移动的节点编号
    fn updated_node_indices(&self) -> &[usize];

    /// 本步移动节点的新坐标，与 `updated_node_indices` 一一对应
    fn updated_nodes(&self) -> &[Position];

    /// 本步新增节点编号
    fn new_node_indices(&self) -> &[usize];

    /// 本步新增节点坐标
    fn new_nodes(&self) -> &[Position];

    /// 本步新增线段（生长模型节点编号对）
    fn new_segments(&self) -> &[[usize; 2]];

    /// 累计节点数
    fn node_count(&self) -> usize;

    /// 模型名称，用于日志
    fn name(&self) -> &str {
        "growth-model"
    }
}
