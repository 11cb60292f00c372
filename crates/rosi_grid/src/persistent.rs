// crates/rosi_grid/src/persistent.rs

//! 以拓扑持久标识为键的容器
//!
//! 网格变更前按持久标识存入数据，变更后按新的叶视图编号取回。

use rosi_foundation::PersistentId;
use std::collections::HashMap;

/// 持久容器
#[derive(Debug, Clone)]
pub struct PersistentContainer<V> {
    data: HashMap<PersistentId, V>,
}

impl<V> Default for PersistentContainer<V> {
    fn default() -> Self {
        Self {
            data: HashMap::new(),
        }
    }
}

impl<V> PersistentContainer<V> {
    /// 空容器
    pub fn new() -> Self {
        Self::default()
    }

    /// 预留容量的空容器
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: HashMap::with_capacity(capacity),
        }
    }

    /// 存入，返回被覆盖的旧值
    pub fn insert(&mut self, id: PersistentId, value: V) -> Option<V> {
        self.data.insert(id, value)
    }

    /// 读取
    pub fn get(&self, id: PersistentId) -> Option<&V> {
        self.data.get(&id)
    }

    /// 取出
    pub fn remove(&mut self, id: PersistentId) -> Option<V> {
        self.data.remove(&id)
    }

    /// 是否包含
    pub fn contains(&self, id: PersistentId) -> bool {
        self.data.contains_key(&id)
    }

    /// 条目数
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// 清空
    pub fn clear(&mut self) {
        self.data.clear();
    }
}
