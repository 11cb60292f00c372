// crates/rosi_grid/tests/grow_protocol.rs

//! 多步生长后网格、几何缓存和查找表保持一致

use glam::DVec3;
use rosi_grid::{
    ElementKind, EntityRef, GridGeometry, LeafOrdering, LineGrid, PersistentContainer,
    VertexEntityMap,
};

fn grow_tip(grid: &mut LineGrid, tip: usize, depth: f64) -> usize {
    let v = grid.insert_vertex(DVec3::new(0.0, 0.0, depth)).unwrap();
    grid.insert_element(ElementKind::Line, [tip, v]).unwrap();
    grid.pre_grow().unwrap();
    grid.grow().unwrap();
    v
}

#[test]
fn test_repeated_growth_keeps_caches_consistent() {
    let mut grid = LineGrid::from_segments_with_ordering(
        &[DVec3::ZERO, DVec3::new(0.0, 0.0, -0.01)],
        &[[0, 1]],
        LeafOrdering::DepthSorted,
    )
    .unwrap();
    let mut geometry = GridGeometry::new(&grid).unwrap();
    let mut vertex_map = VertexEntityMap::new(&grid).unwrap();

    let mut tip = 1;
    for step in 1..=5 {
        let depth = -0.01 * (step as f64 + 1.0);
        tip = grow_tip(&mut grid, tip, depth);
        geometry.update(&grid).unwrap();
        vertex_map.update(&grid).unwrap();

        assert!(grid.is_new(EntityRef::Vertex(tip)).unwrap());
        assert_eq!(
            grid.growth_insertion_index(EntityRef::Vertex(tip)).unwrap(),
            tip
        );
        grid.post_grow().unwrap();

        assert_eq!(geometry.element_count(), step + 1);
        assert_eq!(vertex_map.len(), grid.vertex_count());
        assert!((geometry.total_length() - 0.01 * (step as f64 + 1.0)).abs() < 1e-12);
    }

    // 深度排序：叶视图顺序自上而下
    let centers = geometry.centers();
    assert!(centers.windows(2).all(|w| w[0].z >= w[1].z));
}

#[test]
fn test_persistent_container_survives_renumbering() {
    let mut grid = LineGrid::from_segments_with_ordering(
        &[DVec3::ZERO, DVec3::new(0.0, 0.0, -0.01)],
        &[[0, 1]],
        LeafOrdering::DepthSorted,
    )
    .unwrap();

    let mut store = PersistentContainer::new();
    store.insert(grid.element_id(0).unwrap(), 42.0);

    // 在上方生长，旧单元被重排到编号 1
    let v = grid.insert_vertex(DVec3::new(0.0, 0.0, 0.01)).unwrap();
    grid.insert_element(ElementKind::Line, [v, 0]).unwrap();
    grid.pre_grow().unwrap();
    grid.grow().unwrap();

    let old = (0..grid.element_count())
        .find(|&e| !grid.is_new(EntityRef::Element(e)).unwrap())
        .unwrap();
    assert_eq!(old, 1);
    assert_eq!(store.get(grid.element_id(old).unwrap()), Some(&42.0));
    grid.post_grow().unwrap();
}
