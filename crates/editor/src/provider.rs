//! Geometry provider boundary.
//!
//! The engine treats the rendering host as an opaque capability: picking,
//! mesh construction and buffer access go through `GeometryProvider`. The
//! crate ships `SoftwareProvider`, a headless implementation used by the
//! harness, the CLI and the tests; a GPU-backed front end would implement
//! the same trait.

use std::collections::HashMap;

use glam::Vec3;
use shared::{MeshId, Point3};

use crate::extrude;
use crate::viewport::camera::ArcBallCamera;
use crate::viewport::mesh::{self, LineMeshData, MeshData};
use crate::viewport::picking::{self, Aabb, Ray};

/// Result of a pick: the surface point, plus mesh and face for mesh hits.
/// Ground-plane hits carry `mesh: None`.
#[derive(Clone, Debug)]
pub struct PickHit {
    pub point: Vec3,
    pub mesh: Option<MeshId>,
    pub face: Option<usize>,
}

/// The narrow interface the engine drives.
///
/// Translating a whole solid (`set_position`) and patching raw vertex data
/// (`write_vertex_buffer`) are deliberately separate operations: translation
/// leaves previously built vertex groups valid, a buffer rebuild does not.
pub trait GeometryProvider {
    /// Ray-cast from the camera through a screen position.
    fn pick(&self, screen: [f32; 2]) -> Option<PickHit>;
    /// Same, with an explicit ray.
    fn pick_along_ray(&self, ray: &Ray) -> Option<PickHit>;

    /// Render the draw-mode preview polyline (replaces the previous one).
    fn create_polygon_outline(&mut self, points: &[Point3], closed: bool);

    /// Triangulate and extrude a polygon into a solid, positioned so it sits
    /// on the ground plane. Does not dispose prior solids — that is the
    /// caller's job.
    fn extrude_solid(&mut self, points: &[Point3], depth: f64) -> Result<MeshId, String>;

    /// Fresh copy of the mesh's position buffer (stride 3).
    fn read_vertex_buffer(&self, mesh: &MeshId) -> Option<Vec<f32>>;
    /// Fresh copy of the mesh's index buffer.
    fn read_index_buffer(&self, mesh: &MeshId) -> Option<Vec<u32>>;
    /// Replace the mesh's position buffer. The length must match.
    fn write_vertex_buffer(&mut self, mesh: &MeshId, vertices: Vec<f32>) -> Result<(), String>;
    /// Recompute bounding data after a buffer write.
    fn refresh_bounds(&mut self, mesh: &MeshId);

    fn dispose_mesh(&mut self, mesh: &MeshId);

    /// World-space position of the mesh (translate-whole, not a rebuild).
    fn position(&self, mesh: &MeshId) -> Option<Vec3>;
    fn set_position(&mut self, mesh: &MeshId, position: Vec3);

    /// Show the drag-box marker at a world position (replaces the previous).
    fn place_marker(&mut self, position: Vec3);
    fn clear_marker(&mut self);
}

struct SceneMesh {
    data: MeshData,
    position: Vec3,
    bounds: Aabb,
}

/// Headless provider: picks against the ground plane and every live mesh.
pub struct SoftwareProvider {
    pub camera: ArcBallCamera,
    pub viewport: [f32; 2],
    /// Half-size of the square drawing surface
    pub ground_extent: f32,
    pub marker_size: f32,
    meshes: HashMap<MeshId, SceneMesh>,
    outline: Option<LineMeshData>,
    marker: Option<Vec3>,
}

impl SoftwareProvider {
    pub fn new() -> Self {
        Self {
            camera: ArcBallCamera::new(),
            viewport: [1280.0, 800.0],
            ground_extent: 5.0,
            marker_size: 0.15,
            meshes: HashMap::new(),
            outline: None,
            marker: None,
        }
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn mesh_data(&self, id: &MeshId) -> Option<&MeshData> {
        self.meshes.get(id).map(|m| &m.data)
    }

    pub fn bounds(&self, id: &MeshId) -> Option<Aabb> {
        self.meshes.get(id).map(|m| m.bounds)
    }

    pub fn outline(&self) -> Option<&LineMeshData> {
        self.outline.as_ref()
    }

    pub fn marker(&self) -> Option<Vec3> {
        self.marker
    }

    /// Current marker mesh, built on demand (render-side convenience).
    pub fn marker_mesh(&self) -> Option<MeshData> {
        self.marker.map(|_| mesh::marker_box(self.marker_size))
    }
}

impl Default for SoftwareProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometryProvider for SoftwareProvider {
    fn pick(&self, screen: [f32; 2]) -> Option<PickHit> {
        let ray = self.camera.screen_ray(screen, self.viewport);
        self.pick_along_ray(&ray)
    }

    fn pick_along_ray(&self, ray: &Ray) -> Option<PickHit> {
        let mut best: Option<(f32, PickHit)> = None;

        if let Some((point, dist)) = picking::ray_ground_plane(ray, self.ground_extent) {
            best = Some((dist, PickHit { point, mesh: None, face: None }));
        }

        for (id, scene_mesh) in &self.meshes {
            // Meshes are only ever translated, so picking in local space is
            // the same as translating the ray.
            let local_ray = Ray {
                origin: ray.origin - scene_mesh.position,
                direction: ray.direction,
            };
            if let Some(hit) = picking::pick_triangle(&local_ray, &scene_mesh.data) {
                if best.as_ref().is_none_or(|(d, _)| hit.distance < *d) {
                    best = Some((
                        hit.distance,
                        PickHit {
                            point: hit.point + scene_mesh.position,
                            mesh: Some(id.clone()),
                            face: Some(hit.triangle_index),
                        },
                    ));
                }
            }
        }

        best.map(|(_, hit)| hit)
    }

    fn create_polygon_outline(&mut self, points: &[Point3], closed: bool) {
        self.outline = Some(mesh::polyline(points, closed));
    }

    fn extrude_solid(&mut self, points: &[Point3], depth: f64) -> Result<MeshId, String> {
        let data = extrude::extrude_solid(points, depth)?;
        let bounds = Aabb::from_mesh(&data);
        let id: MeshId = uuid::Uuid::new_v4().to_string();
        self.meshes.insert(
            id.clone(),
            SceneMesh {
                data,
                // Solid spans local y in [-depth, 0]; lift it onto the ground
                position: Vec3::new(0.0, depth as f32, 0.0),
                bounds,
            },
        );
        Ok(id)
    }

    fn read_vertex_buffer(&self, mesh: &MeshId) -> Option<Vec<f32>> {
        self.meshes.get(mesh).map(|m| m.data.vertices.clone())
    }

    fn read_index_buffer(&self, mesh: &MeshId) -> Option<Vec<u32>> {
        self.meshes.get(mesh).map(|m| m.data.indices.clone())
    }

    fn write_vertex_buffer(&mut self, mesh: &MeshId, vertices: Vec<f32>) -> Result<(), String> {
        let Some(scene_mesh) = self.meshes.get_mut(mesh) else {
            return Err(format!("write to unknown mesh {mesh}"));
        };
        if vertices.len() != scene_mesh.data.vertices.len() {
            return Err(format!(
                "vertex buffer length changed: {} -> {}",
                scene_mesh.data.vertices.len(),
                vertices.len()
            ));
        }
        scene_mesh.data.vertices = vertices;
        Ok(())
    }

    fn refresh_bounds(&mut self, mesh: &MeshId) {
        if let Some(scene_mesh) = self.meshes.get_mut(mesh) {
            scene_mesh.bounds = Aabb::from_mesh(&scene_mesh.data);
        }
    }

    fn dispose_mesh(&mut self, mesh: &MeshId) {
        self.meshes.remove(mesh);
    }

    fn position(&self, mesh: &MeshId) -> Option<Vec3> {
        self.meshes.get(mesh).map(|m| m.position)
    }

    fn set_position(&mut self, mesh: &MeshId, position: Vec3) {
        if let Some(scene_mesh) = self.meshes.get_mut(mesh) {
            scene_mesh.position = position;
        }
    }

    fn place_marker(&mut self, position: Vec3) {
        self.marker = Some(position);
    }

    fn clear_marker(&mut self) {
        self.marker = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::square_points;

    #[test]
    fn test_ground_pick_through_screen() {
        let provider = SoftwareProvider::new();
        let screen = provider
            .camera
            .project(Vec3::new(1.0, 0.0, 1.0), provider.viewport)
            .unwrap();
        let hit = provider.pick(screen).unwrap();
        assert!(hit.mesh.is_none());
        assert!((hit.point - Vec3::new(1.0, 0.0, 1.0)).length() < 1e-2);
    }

    #[test]
    fn test_extruded_solid_sits_on_ground() {
        let mut provider = SoftwareProvider::new();
        let id = provider.extrude_solid(&square_points(2.0), 1.0).unwrap();
        assert_eq!(provider.position(&id), Some(Vec3::new(0.0, 1.0, 0.0)));
        assert_eq!(provider.mesh_count(), 1);
    }

    #[test]
    fn test_solid_occludes_ground() {
        let mut provider = SoftwareProvider::new();
        let id = provider.extrude_solid(&square_points(2.0), 1.0).unwrap();

        // Straight down onto the top cap
        let ray = Ray {
            origin: Vec3::new(1.0, 10.0, 1.0),
            direction: Vec3::new(0.0, -1.0, 0.0),
        };
        let hit = provider.pick_along_ray(&ray).unwrap();
        assert_eq!(hit.mesh.as_ref(), Some(&id));
        assert!(hit.face.is_some());
        assert!((hit.point.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_write_rejects_length_change() {
        let mut provider = SoftwareProvider::new();
        let id = provider.extrude_solid(&square_points(1.0), 1.0).unwrap();
        let verts = provider.read_vertex_buffer(&id).unwrap();
        assert!(provider.write_vertex_buffer(&id, verts[..3].to_vec()).is_err());
        assert!(provider.write_vertex_buffer(&id, verts).is_ok());
    }

    #[test]
    fn test_dispose_removes_mesh() {
        let mut provider = SoftwareProvider::new();
        let id = provider.extrude_solid(&square_points(1.0), 1.0).unwrap();
        provider.dispose_mesh(&id);
        assert_eq!(provider.mesh_count(), 0);
        assert!(provider.read_vertex_buffer(&id).is_none());
    }

    #[test]
    fn test_marker_lifecycle() {
        let mut provider = SoftwareProvider::new();
        assert!(provider.marker_mesh().is_none());
        provider.place_marker(Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(provider.marker(), Some(Vec3::new(1.0, 1.0, 1.0)));
        assert!(provider.marker_mesh().is_some());
        provider.clear_marker();
        assert!(provider.marker().is_none());
    }
}
