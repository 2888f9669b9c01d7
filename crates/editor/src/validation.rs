//! Mesh validation utilities.
//!
//! `MeshValidator` provides methods to check mesh data integrity:
//! correct stride, in-range indices, AABB dimensions, etc.

use std::collections::HashSet;

use crate::viewport::mesh::MeshData;
use crate::viewport::picking::Aabb;

/// Validator for `MeshData` integrity checks.
pub struct MeshValidator<'a> {
    mesh: &'a MeshData,
}

impl<'a> MeshValidator<'a> {
    /// Create a new validator for the given mesh.
    pub fn new(mesh: &'a MeshData) -> Self {
        Self { mesh }
    }

    /// Number of vertices (vertices buffer length / 3).
    pub fn vertex_count(&self) -> usize {
        self.mesh.vertices.len() / 3
    }

    /// Number of triangles (indices buffer length / 3).
    pub fn triangle_count(&self) -> usize {
        self.mesh.indices.len() / 3
    }

    /// Check that the vertex buffer length is a multiple of 3 (the stride).
    pub fn is_stride_valid(&self) -> bool {
        self.mesh.vertices.len() % 3 == 0
    }

    /// Check that the index buffer length is a multiple of 3.
    pub fn is_index_stride_valid(&self) -> bool {
        self.mesh.indices.len() % 3 == 0
    }

    /// Check that all indices are within the valid vertex range.
    pub fn are_indices_in_range(&self) -> bool {
        let max_idx = self.vertex_count() as u32;
        self.mesh.indices.iter().all(|&i| i < max_idx)
    }

    /// Compute the axis-aligned bounding box of the mesh.
    pub fn aabb(&self) -> Aabb {
        Aabb::from_mesh(self.mesh)
    }

    /// Compute the dimensions (width, height, depth) of the bounding box.
    pub fn dimensions(&self) -> [f32; 3] {
        let aabb = self.aabb();
        [
            aabb.max.x - aabb.min.x,
            aabb.max.y - aabb.min.y,
            aabb.max.z - aabb.min.z,
        ]
    }

    /// Check that the AABB dimensions are approximately equal to `expected`.
    pub fn assert_dimensions_approx(&self, expected: [f32; 3], tolerance: f32) -> bool {
        let dims = self.dimensions();
        (dims[0] - expected[0]).abs() < tolerance
            && (dims[1] - expected[1]).abs() < tolerance
            && (dims[2] - expected[2]).abs() < tolerance
    }

    /// Number of distinct vertex positions, counting bit-identical
    /// duplicates (flat-shading seams) once.
    pub fn distinct_positions(&self) -> usize {
        let mut seen = HashSet::new();
        for i in 0..self.vertex_count() {
            let base = i * 3;
            seen.insert([
                self.mesh.vertices[base].to_bits(),
                self.mesh.vertices[base + 1].to_bits(),
                self.mesh.vertices[base + 2].to_bits(),
            ]);
        }
        seen.len()
    }

    /// Run all validation checks and return a list of error messages.
    /// An empty list means the mesh is valid.
    pub fn validate_all(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.is_stride_valid() {
            errors.push(format!(
                "Vertex buffer length {} is not a multiple of 3",
                self.mesh.vertices.len()
            ));
        }

        if !self.is_index_stride_valid() {
            errors.push(format!(
                "Index buffer length {} is not a multiple of 3",
                self.mesh.indices.len()
            ));
        }

        if !self.are_indices_in_range() {
            let max_idx = self.vertex_count() as u32;
            let out_of_range: Vec<_> = self
                .mesh
                .indices
                .iter()
                .filter(|&&i| i >= max_idx)
                .take(5)
                .collect();
            errors.push(format!(
                "Indices out of range (vertex_count={}): {:?}",
                max_idx, out_of_range
            ));
        }

        errors
    }
}
