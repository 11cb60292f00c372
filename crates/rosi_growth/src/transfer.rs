// crates/rosi_growth/src/transfer.rs

//! 跨网格变更的单元数据迁移
//!
//! 变更前按持久标识快照，变更后按新的叶视图编号恢复。
//! 新单元由调用方提供的初始化函数填充，每个新单元恰好调用一次，
//! 按插入顺序进行，因此初始化函数可以读取已填充的相邻单元。

use crate::error::{GrowthError, GrowthResult};
use rosi_grid::{EntityRef, GridGeometry, LineGrid, PersistentContainer};
use tracing::trace;

/// 随网格生长迁移的附加数据（如根系参数）
pub trait AttachedData {
    /// 网格变更前保存
    fn store(&mut self, grid: &LineGrid) -> GrowthResult<()>;

    /// 网格变更后恢复，并初始化新单元
    fn reconstruct(&mut self, grid: &LineGrid, geometry: &GridGeometry) -> GrowthResult<()>;
}

/// 单元数据迁移器
#[derive(Debug, Clone)]
pub struct PersistentDataTransfer<T> {
    snapshot: PersistentContainer<T>,
}

impl<T> Default for PersistentDataTransfer<T> {
    fn default() -> Self {
        Self {
            snapshot: PersistentContainer::new(),
        }
    }
}

impl<T: Clone> PersistentDataTransfer<T> {
    /// 空迁移器
    pub fn new() -> Self {
        Self::default()
    }

    /// 快照当前每个单元的数据
    ///
    /// 必须在任何拓扑变更之前调用。
    pub fn snapshot(&mut self, grid: &LineGrid, solution: &[T]) -> GrowthResult<()> {
        let n = grid.element_count();
        if solution.len() < n {
            return Err(GrowthError::SolutionSizeMismatch {
                elements: n,
                solution: solution.len(),
            });
        }
        self.snapshot.clear();
        for (e, value) in solution.iter().enumerate().take(n) {
            self.snapshot.insert(grid.element_id(e)?, value.clone());
        }
        trace!(entries = self.snapshot.len(), "单元数据快照完成");
        Ok(())
    }

    /// 恢复旧单元数据并初始化新单元
    ///
    /// `init(e, filled)` 为新单元 `e` 生成数据；`filled` 为当前已填充的
    /// 单元（旧单元与此前已初始化的新单元）。完成后清空快照。
    pub fn restore<F>(
        &mut self,
        grid: &LineGrid,
        solution: &mut Vec<T>,
        mut init: F,
    ) -> GrowthResult<()>
    where
        F: FnMut(usize, &[Option<T>]) -> GrowthResult<T>,
    {
        let n = grid.element_count();
        let mut filled: Vec<Option<T>> = vec![None; n];
        let mut new_elements = Vec::new();

        for (e, slot) in filled.iter_mut().enumerate() {
            let entity = EntityRef::Element(e);
            if grid.is_new(entity)? {
                new_elements.push((grid.growth_insertion_index(entity)?, e));
            } else {
                let id = grid.element_id(e)?;
                let value = self
                    .snapshot
                    .remove(id)
                    .ok_or(GrowthError::MissingSnapshot { element: e, id })?;
                *slot = Some(value);
            }
        }

        new_elements.sort_unstable();
        for (_, e) in new_elements {
            let value = init(e, &filled)?;
            filled[e] = Some(value);
        }

        let restored: Option<Vec<T>> = filled.into_iter().collect();
        *solution = restored.ok_or_else(|| GrowthError::Policy("存在未初始化的单元".into()))?;
        self.snapshot.clear();
        Ok(())
    }

    /// 丢弃快照（本步无拓扑变更）
    pub fn discard(&mut self) {
        self.snapshot.clear();
    }

    /// 快照条目数
    pub fn len(&self) -> usize {
        self.snapshot.len()
    }

    /// 快照是否已清空
    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }
}
