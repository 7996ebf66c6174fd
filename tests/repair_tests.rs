mod support;

use bimcsg::{
    RepairOptions, fix_edges, fix_edges_with,
    float_types::DEFAULT_EDGE_ANGLE_DEGREES,
    repair::{edge_map::EdgeMap, is_point_on_segment},
};
use nalgebra::Point3;

use crate::support::{strip_roof_cube, t_junction_cube};

#[test]
fn t_junction_cube_starts_with_six_bad_edges() {
    let cube = t_junction_cube();
    let edge_map = EdgeMap::build(&cube);
    assert_eq!(cube.faces.len(), 7);
    assert_eq!(edge_map.bad_edge_count(), 6);
    assert!(!cube.is_closed());
}

#[test]
fn t_junctions_are_split_into_side_faces() {
    let mut cube = t_junction_cube();
    let edge_map = fix_edges(&mut cube);

    assert_eq!(edge_map.bad_edge_count(), 0);
    assert_eq!(edge_map.split_count(), 2);
    assert_eq!(edge_map.edge_count(), 15);
    assert!(cube.is_manifold);
    assert!(cube.is_closed());

    // the y = 0 face gained the midpoint of its top edge
    let front = &cube.faces[1];
    assert_eq!(front.indices.len(), 5);
    assert!(
        cube.face_points(front)
            .contains(&Point3::new(0.5, 0.0, 1.0))
    );
    assert_eq!(cube.faces[2].indices.len(), 5);
    assert!((cube.volume() - 1.0).abs() < 1e-12);
}

#[test]
fn repair_is_idempotent() {
    let mut cube = t_junction_cube();
    fix_edges(&mut cube);
    let repaired = cube.clone();

    let edge_map = fix_edges(&mut cube);
    assert_eq!(edge_map.split_count(), 0);
    assert_eq!(edge_map.bad_edge_count(), 0);
    assert_eq!(cube, repaired);
}

#[test]
fn many_t_junctions_on_one_edge() {
    let mut cube = strip_roof_cube(40, None);
    assert_eq!(cube.faces.len(), 45);

    let edge_map = fix_edges(&mut cube);
    assert!(cube.is_manifold);
    assert_eq!(edge_map.split_count(), 78);
    assert_eq!(cube.faces[1].indices.len(), 4 + 39);
}

#[test]
fn coarse_pass_catches_lifted_vertex() {
    let mut cube = strip_roof_cube(40, Some((20, 0.002)));
    let lifted = Point3::new(0.5, 0.0, 1.0 + 0.002);

    // too far off the edge line for the first pass alone
    let first_pass_only = RepairOptions {
        second_pass_min_faces: usize::MAX,
        ..RepairOptions::default()
    };
    let mut first = cube.clone();
    let edge_map = fix_edges_with(&mut first, &first_pass_only);
    assert_eq!(edge_map.bad_edge_count(), 3);
    assert!(!first.is_manifold);
    assert!(!first.face_points(&first.faces[1]).contains(&lifted));

    let edge_map = fix_edges(&mut cube);
    assert_eq!(edge_map.bad_edge_count(), 0);
    assert!(cube.is_manifold);
    assert!(cube.face_points(&cube.faces[1]).contains(&lifted));
}

#[test]
fn split_cap_stops_repair() {
    let mut cube = strip_roof_cube(40, None);
    let options = RepairOptions {
        max_split_steps: 5,
        ..RepairOptions::default()
    };
    let edge_map = fix_edges_with(&mut cube, &options);

    assert!(edge_map.split_limit_reached());
    assert_eq!(edge_map.split_count(), 5);
    assert!(edge_map.bad_edge_count() > 0);
    assert!(!cube.is_manifold);
}

#[test]
fn merge_closes_duplicated_vertices() {
    // every face of a cube with its own copy of each corner
    let cube = bimcsg::Geometry::cube(1.0);
    let mut soup = bimcsg::Geometry::new();
    for face in &cube.faces {
        soup.add_face(cube.face_points(face)).unwrap();
    }
    assert_eq!(soup.vertices.len(), 24);
    assert_eq!(EdgeMap::build(&soup).bad_edge_count(), 24);

    let edge_map = fix_edges(&mut soup);
    assert_eq!(soup.vertices.len(), 8);
    assert_eq!(edge_map.edge_count(), 12);
    assert_eq!(edge_map.split_count(), 0);
    assert!(soup.is_manifold);
}

#[test]
fn wireframe_skips_coplanar_seams() {
    let mut cube = t_junction_cube();
    let edge_map = fix_edges(&mut cube);

    // 15 edges, minus the seam between the two coplanar roof halves
    let segments = edge_map.edges_geometry(&cube, DEFAULT_EDGE_ANGLE_DEGREES);
    assert_eq!(segments.len(), 14);
    let seam = [Point3::new(0.5, 0.0, 1.0), Point3::new(0.5, 1.0, 1.0)];
    assert!(
        !segments
            .iter()
            .any(|s| *s == seam || *s == [seam[1], seam[0]])
    );
}

#[test]
fn point_on_segment_tolerance() {
    let a = Point3::new(0.0, 0.0, 1.0);
    let b = Point3::new(1.0, 0.0, 1.0);
    let lifted = Point3::new(0.5, 0.0, 1.002);
    assert!(!is_point_on_segment(&a, &b, &lifted, 1e-6));
    assert!(is_point_on_segment(&a, &b, &lifted, 0.01));
}
