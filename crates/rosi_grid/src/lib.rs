// crates/rosi_grid/src/lib.rs

//! RoSi 网格模块
//!
//! 提供嵌入三维空间的一维根系线网格及其生长协议，以及三维结构化土壤网格。
//!
//! # 核心类型
//!
//! - [`LineGrid`]: 可生长的一维线网格，分阶段插入 + `pre_grow/grow/post_grow`
//! - [`GridGeometry`]: 单元长度、中心、邻接关系的几何缓存
//! - [`VertexEntityMap`]: 顶点编号到持久标识的查找表
//! - [`PersistentContainer`]: 以持久标识为键的容器
//! - [`SoilGrid`]: 三维结构化土壤网格
//!
//! # 示例
//!
//! ```
//! use rosi_grid::{ElementKind, LineGrid};
//! use glam::DVec3;
//!
//! let mut grid = LineGrid::from_segments(
//!     &[DVec3::ZERO, DVec3::new(0.0, 0.0, -0.01)],
//!     &[[0, 1]],
//! ).unwrap();
//!
//! let v = grid.insert_vertex(DVec3::new(0.0, 0.0, -0.02)).unwrap();
//! grid.insert_element(ElementKind::Line, [1, v]).unwrap();
//! grid.pre_grow().unwrap();
//! grid.grow().unwrap();
//! grid.post_grow().unwrap();
//! assert_eq!(grid.element_count(), 2);
//! ```

pub mod entity_map;
pub mod error;
pub mod geometry;
pub mod line_grid;
pub mod persistent;
pub mod soil_grid;

pub use entity_map::VertexEntityMap;
pub use error::{GridError, GridResult};
pub use geometry::GridGeometry;
pub use line_grid::{ElementKind, EntityRef, GrowPhase, LeafOrdering, LineGrid};
pub use persistent::PersistentContainer;
pub use soil_grid::SoilGrid;
