// crates/rosi_grid/src/entity_map.rs

//! 顶点编号 ↔ 顶点实体查找表
//!
//! 生长后需 [`VertexEntityMap::update`]，否则查到的是过期实体。

use crate::error::GridResult;
use crate::line_grid::LineGrid;
use rosi_foundation::PersistentId;
use std::collections::HashMap;

/// 顶点编号到持久标识的双向查找表
#[derive(Debug, Clone, Default)]
pub struct VertexEntityMap {
    entities: Vec<PersistentId>,
    lookup: HashMap<PersistentId, usize>,
}

impl VertexEntityMap {
    /// 从网格构建
    pub fn new(grid: &LineGrid) -> GridResult<Self> {
        let mut map = Self::default();
        map.update(grid)?;
        Ok(map)
    }

    /// 按当前网格重建
    pub fn update(&mut self, grid: &LineGrid) -> GridResult<()> {
        self.entities.clear();
        self.lookup.clear();
        for v in 0..grid.vertex_count() {
            let id = grid.vertex_id(v)?;
            self.entities.push(id);
            self.lookup.insert(id, v);
        }
        Ok(())
    }

    /// 顶点实体
    pub fn entity(&self, v: usize) -> Option<PersistentId> {
        self.entities.get(v).copied()
    }

    /// 实体对应的顶点编号
    pub fn vertex(&self, id: PersistentId) -> Option<usize> {
        self.lookup.get(&id).copied()
    }

    /// 条目数
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_grid::ElementKind;
    use glam::DVec3;

    #[test]
    fn test_update_tracks_new_vertices() {
        let mut grid =
            LineGrid::from_segments(&[DVec3::ZERO, DVec3::new(0.0, 0.0, -0.1)], &[[0, 1]])
                .unwrap();
        let mut map = VertexEntityMap::new(&grid).unwrap();
        assert_eq!(map.len(), 2);

        let v = grid.insert_vertex(DVec3::new(0.0, 0.0, -0.2)).unwrap();
        grid.insert_element(ElementKind::Line, [1, v]).unwrap();
        grid.pre_grow().unwrap();
        grid.grow().unwrap();
        assert_eq!(map.entity(v), None);

        map.update(&grid).unwrap();
        let id = map.entity(v).unwrap();
        assert_eq!(id, grid.vertex_id(v).unwrap());
        assert_eq!(map.vertex(id), Some(v));
        grid.post_grow().unwrap();
    }
}
