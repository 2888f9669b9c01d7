//! Nearest-vertex search and coincident-vertex grouping.
//!
//! An extruded solid duplicates every boundary vertex once per adjoining face
//! (caps and side walls do not share buffer slots). Editing a logical corner
//! must therefore move every duplicate at once or the mesh tears along the
//! seam. Groups are keyed by exact f32 equality: seam duplicates are
//! bit-identical at construction time, and groups are built once per gesture
//! from a fresh buffer read, never recomputed after incremental writes.

use glam::Vec3;

/// Closest vertex to a query point, found by linear scan.
#[derive(Clone, Debug)]
pub struct NearestVertex {
    /// Vertex index (flat buffer slot / 3)
    pub index: usize,
    pub position: Vec3,
    pub distance: f32,
}

/// Scan a stride-3 position buffer for the vertex closest to `query`.
/// Exact distance ties keep the lowest index; picks farther than `max_dist`
/// return None so a click far from any vertex does not silently grab one.
pub fn nearest_vertex(query: Vec3, vertices: &[f32], max_dist: f32) -> Option<NearestVertex> {
    let count = vertices.len() / 3;
    let mut best: Option<NearestVertex> = None;

    for i in 0..count {
        let v = Vec3::new(vertices[i * 3], vertices[i * 3 + 1], vertices[i * 3 + 2]);
        let distance = v.distance(query);
        if best.as_ref().is_none_or(|b| distance < b.distance) {
            best = Some(NearestVertex { index: i, position: v, distance });
        }
    }

    best.filter(|b| b.distance <= max_dist)
}

/// Buffer slots that must move together to keep seam duplicates coincident.
///
/// `x_slots` are flat-buffer offsets of x components equal to the anchor's x;
/// `z_slots` the same for z. A vertex can appear in both groups.
#[derive(Clone, Debug)]
pub struct VertexGroups {
    pub x_slots: Vec<usize>,
    pub z_slots: Vec<usize>,
    /// Selected vertex position at grouping time (mesh-local)
    pub anchor: Vec3,
    /// Vertex index of the selected corner
    pub vertex_index: usize,
}

impl VertexGroups {
    /// Build groups for the picked face: choose the face corner closest to
    /// the hit point (first-seen wins ties, gated by `max_dist`), then scan
    /// the whole buffer for coincident x and z components.
    ///
    /// Returns None when the face or vertex data is unavailable — selection
    /// simply does not activate, which is a no-op rather than an error.
    pub fn for_face(
        vertices: &[f32],
        indices: &[u32],
        face: usize,
        hit: Vec3,
        max_dist: f32,
    ) -> Option<Self> {
        if vertices.is_empty() || face * 3 + 2 >= indices.len() {
            return None;
        }
        let vert_count = vertices.len() / 3;

        let mut best: Option<(f32, usize)> = None;
        for k in 0..3 {
            let idx = indices[face * 3 + k] as usize;
            if idx >= vert_count {
                return None;
            }
            let v = Vec3::new(vertices[idx * 3], vertices[idx * 3 + 1], vertices[idx * 3 + 2]);
            let d = v.distance(hit);
            if best.is_none_or(|(bd, _)| d < bd) {
                best = Some((d, idx));
            }
        }

        let (dist, vertex_index) = best?;
        if dist > max_dist {
            return None;
        }

        let anchor = Vec3::new(
            vertices[vertex_index * 3],
            vertices[vertex_index * 3 + 1],
            vertices[vertex_index * 3 + 2],
        );

        let mut x_slots = Vec::new();
        let mut z_slots = Vec::new();
        for i in 0..vert_count {
            if vertices[i * 3] == anchor.x {
                x_slots.push(i * 3);
            }
            if vertices[i * 3 + 2] == anchor.z {
                z_slots.push(i * 3 + 2);
            }
        }

        Some(Self { x_slots, z_slots, anchor, vertex_index })
    }

    /// Write `new.x` into every x slot and `new.z` into every z slot in one
    /// pass. Out-of-range slots mean the groups were built against a
    /// different buffer; the caller must fail fast and reset rather than
    /// write corrupt data.
    pub fn apply(&self, vertices: &mut [f32], new: Vec3) -> Result<(), String> {
        for &slot in self.x_slots.iter().chain(self.z_slots.iter()) {
            if slot >= vertices.len() {
                return Err(format!(
                    "stale vertex group: slot {slot} out of range for buffer of {}",
                    vertices.len()
                ));
            }
        }
        for &slot in &self.x_slots {
            vertices[slot] = new.x;
        }
        for &slot in &self.z_slots {
            vertices[slot] = new.z;
        }
        Ok(())
    }
}
