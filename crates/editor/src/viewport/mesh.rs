use glam::Vec3;
use shared::Point3;

/// CPU-side mesh data: flat position buffer, 3 floats per vertex.
///
/// The engine never keeps a copy of this across a rebuild — reads go through
/// the geometry provider so indices computed against a disposed buffer can
/// never be applied to a fresh one.
#[derive(Clone, Default)]
pub struct MeshData {
    /// 3 floats per vertex: x, y, z
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Position of vertex `i`. Caller guarantees `i < vertex_count()`.
    pub fn vertex(&self, i: usize) -> Vec3 {
        Vec3::new(
            self.vertices[i * 3],
            self.vertices[i * 3 + 1],
            self.vertices[i * 3 + 2],
        )
    }
}

/// Полилиния для превью рисования: stride 3, точки подряд
pub struct LineMeshData {
    pub vertices: Vec<f32>,
    pub closed: bool,
}

impl LineMeshData {
    pub fn point_count(&self) -> usize {
        self.vertices.len() / 3
    }
}

/// Build the draw-mode preview polyline from the in-progress point sequence.
pub fn polyline(points: &[Point3], closed: bool) -> LineMeshData {
    let mut vertices = Vec::with_capacity(points.len() * 3);
    for p in points {
        vertices.extend_from_slice(&[p.x as f32, p.y as f32, p.z as f32]);
    }
    LineMeshData { vertices, closed }
}

/// Small cube shown at the selected vertex in edit mode (the drag box).
pub fn marker_box(size: f32) -> MeshData {
    let h = size * 0.5;

    let faces: [[Vec3; 4]; 6] = [
        // Front (+Z)
        [Vec3::new(-h, -h, h), Vec3::new(h, -h, h), Vec3::new(h, h, h), Vec3::new(-h, h, h)],
        // Back (-Z)
        [Vec3::new(h, -h, -h), Vec3::new(-h, -h, -h), Vec3::new(-h, h, -h), Vec3::new(h, h, -h)],
        // Right (+X)
        [Vec3::new(h, -h, h), Vec3::new(h, -h, -h), Vec3::new(h, h, -h), Vec3::new(h, h, h)],
        // Left (-X)
        [Vec3::new(-h, -h, -h), Vec3::new(-h, -h, h), Vec3::new(-h, h, h), Vec3::new(-h, h, -h)],
        // Top (+Y)
        [Vec3::new(-h, h, h), Vec3::new(h, h, h), Vec3::new(h, h, -h), Vec3::new(-h, h, -h)],
        // Bottom (-Y)
        [Vec3::new(-h, -h, -h), Vec3::new(h, -h, -h), Vec3::new(h, -h, h), Vec3::new(-h, -h, h)],
    ];

    let mut vertices = Vec::with_capacity(24 * 3);
    let mut indices = Vec::with_capacity(36);

    for quad in &faces {
        let base = (vertices.len() / 3) as u32;
        for v in quad {
            vertices.extend_from_slice(&[v.x, v.y, v.z]);
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    MeshData { vertices, indices }
}
