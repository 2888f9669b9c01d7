//! Factory functions for creating test data.
//!
//! Provides convenient helpers to construct point sets, pre-committed shape
//! models and freshly extruded solids used in tests and by the harness.

use shared::{Point3, Shape, ShapeSetDescription};

use crate::extrude::extrude_solid;
use crate::state::ShapeModel;
use crate::viewport::mesh::MeshData;

// ── Point-set factories ─────────────────────────────────────────

/// Axis-aligned square on the ground plane with its corner at the origin.
pub fn square_points(size: f64) -> Vec<Point3> {
    vec![
        Point3::on_ground(0.0, 0.0),
        Point3::on_ground(size, 0.0),
        Point3::on_ground(size, size),
        Point3::on_ground(0.0, size),
    ]
}

/// Right triangle on the ground plane.
pub fn triangle_points(size: f64) -> Vec<Point3> {
    vec![
        Point3::on_ground(0.0, 0.0),
        Point3::on_ground(size, 0.0),
        Point3::on_ground(0.0, size),
    ]
}

/// Axis-aligned rectangle on the ground plane.
pub fn rectangle_points(width: f64, depth: f64) -> Vec<Point3> {
    vec![
        Point3::on_ground(0.0, 0.0),
        Point3::on_ground(width, 0.0),
        Point3::on_ground(width, depth),
        Point3::on_ground(0.0, depth),
    ]
}

// ── Model factories ─────────────────────────────────────────────

/// Shape model with one committed shape built from the given points.
pub fn committed_model(points: Vec<Point3>) -> ShapeModel {
    let mut model = ShapeModel::new();
    for p in points {
        model.add_point(p);
    }
    model.finish_shape();
    model
}

/// Shape model with a single committed square.
pub fn square_model(size: f64) -> ShapeModel {
    committed_model(square_points(size))
}

/// Document wrapping one shape, for CLI and persistence tests.
pub fn single_shape_description(points: Vec<Point3>, height: f64) -> ShapeSetDescription {
    ShapeSetDescription {
        version: 1,
        shapes: vec![Shape { points, height }],
    }
}

// ── Mesh factories ──────────────────────────────────────────────

/// Freshly extruded square solid in local coordinates.
pub fn square_solid(size: f64, depth: f64) -> MeshData {
    extrude_solid(&square_points(size), depth)
        .unwrap_or_else(|e| panic!("fixture extrusion failed: {e}"))
}
