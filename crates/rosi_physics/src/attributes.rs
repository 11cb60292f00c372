// crates/rosi_physics/src/attributes.rs

//! 根单元属性存储
//!
//! 为每个根单元附加命名标量场（根级、创建时间等）。
//! 写入时检查长度；网格生长后通过 [`ElementAttributes::resize`] 统一扩展。

use rosi_foundation::{RosiError, RosiResult};
use std::collections::BTreeMap;

/// 根级
pub const ATTR_ORDER: &str = "order";
/// 创建时间 [s]
pub const ATTR_CREATION_TIME: &str = "creation_time";

/// 单元标量属性存储
#[derive(Debug, Clone, Default)]
pub struct ElementAttributes {
    element_count: usize,
    scalars: BTreeMap<String, Vec<f64>>,
}

impl ElementAttributes {
    /// 创建空存储
    pub fn new(element_count: usize) -> Self {
        Self {
            element_count,
            scalars: BTreeMap::new(),
        }
    }

    /// 单元数
    pub fn element_count(&self) -> usize {
        self.element_count
    }

    /// 设置标量场
    ///
    /// # 错误
    /// `values.len() != element_count` 时返回 `SizeMismatch`
    pub fn set(&mut self, name: &str, values: Vec<f64>) -> RosiResult<()> {
        RosiError::check_size("element_scalar", self.element_count, values.len())?;
        self.scalars.insert(name.to_string(), values);
        Ok(())
    }

    /// 获取标量场
    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.scalars.get(name).map(Vec::as_slice)
    }

    /// 获取标量场（可变）
    pub fn get_mut(&mut self, name: &str) -> Option<&mut [f64]> {
        self.scalars.get_mut(name).map(Vec::as_mut_slice)
    }

    /// 读取单个值
    pub fn value(&self, name: &str, e: usize) -> RosiResult<f64> {
        let field = self
            .get(name)
            .ok_or_else(|| RosiError::not_found(format!("单元属性 '{name}'")))?;
        RosiError::check_index("Element", e, field.len())?;
        Ok(field[e])
    }

    /// 是否存在
    pub fn contains(&self, name: &str) -> bool {
        self.scalars.contains_key(name)
    }

    /// 所有字段名（有序）
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.scalars.keys().map(String::as_str)
    }

    /// 改变单元数，新增部分以 `fill` 填充
    pub fn resize(&mut self, element_count: usize, fill: f64) {
        self.element_count = element_count;
        for values in self.scalars.values_mut() {
            values.resize(element_count, fill);
        }
    }
}
