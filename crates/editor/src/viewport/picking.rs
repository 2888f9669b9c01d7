use glam::Vec3;

use super::mesh::MeshData;

/// A ray in world space
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

/// Axis-aligned bounding box
#[derive(Clone, Copy)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Compute AABB from MeshData (3 floats per vertex)
    pub fn from_mesh(data: &MeshData) -> Self {
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);

        for i in 0..data.vertex_count() {
            let v = data.vertex(i);
            min = min.min(v);
            max = max.max(v);
        }

        Self { min, max }
    }

    /// Center of the bounding box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

/// Möller-Trumbore ray-triangle intersection algorithm.
/// Returns the distance along the ray if hit, or None if no intersection.
pub fn ray_triangle_intersect(ray: &Ray, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<f32> {
    const EPSILON: f32 = 1e-7;

    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = ray.direction.cross(edge2);
    let a = edge1.dot(h);

    // Ray is parallel to triangle
    if a.abs() < EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(h);

    // Outside triangle (u)
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);

    // Outside triangle (v)
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);

    // Intersection is behind ray origin
    if t > EPSILON {
        Some(t)
    } else {
        None
    }
}

/// Result of picking a triangle in a mesh
#[derive(Clone, Debug)]
pub struct TriangleHit {
    /// Index of the triangle (into mesh.indices / 3)
    pub triangle_index: usize,
    /// Distance from ray origin to hit point
    pub distance: f32,
    /// Hit point along the ray
    pub point: Vec3,
}

/// Find the nearest triangle in a mesh intersected by the ray.
pub fn pick_triangle(ray: &Ray, mesh: &MeshData) -> Option<TriangleHit> {
    let tri_count = mesh.triangle_count();
    let vert_count = mesh.vertex_count();

    let mut best: Option<TriangleHit> = None;

    for tri_idx in 0..tri_count {
        let i0 = mesh.indices[tri_idx * 3] as usize;
        let i1 = mesh.indices[tri_idx * 3 + 1] as usize;
        let i2 = mesh.indices[tri_idx * 3 + 2] as usize;
        if i0 >= vert_count || i1 >= vert_count || i2 >= vert_count {
            continue;
        }

        let v0 = mesh.vertex(i0);
        let v1 = mesh.vertex(i1);
        let v2 = mesh.vertex(i2);

        if let Some(dist) = ray_triangle_intersect(ray, v0, v1, v2) {
            if best.as_ref().is_none_or(|b| dist < b.distance) {
                best = Some(TriangleHit {
                    triangle_index: tri_idx,
                    distance: dist,
                    point: ray.origin + ray.direction * dist,
                });
            }
        }
    }

    best
}

/// Intersect a ray with the ground plane (y = 0).
/// Returns None if the ray is parallel, hits behind the origin, or lands
/// outside the square drawing surface of half-size `extent`.
pub fn ray_ground_plane(ray: &Ray, extent: f32) -> Option<(Vec3, f32)> {
    if ray.direction.y.abs() < 1e-6 {
        return None;
    }

    let t = -ray.origin.y / ray.direction.y;
    if t < 0.0 {
        return None;
    }

    let mut hit = ray.origin + ray.direction * t;
    if hit.x.abs() > extent || hit.z.abs() > extent {
        return None;
    }

    // Picks must never land below the drawing surface
    if hit.y < 0.0 {
        hit.y = 0.0;
    }

    Some((hit, t))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> MeshData {
        MeshData {
            vertices: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            indices: vec![0, 1, 2],
        }
    }

    #[test]
    fn test_ray_triangle_hit() {
        let ray = Ray {
            origin: Vec3::new(0.25, 0.25, -1.0),
            direction: Vec3::Z,
        };
        let d = ray_triangle_intersect(
            &ray,
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        );
        assert!((d.unwrap() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_ray_triangle_miss() {
        let ray = Ray {
            origin: Vec3::new(2.0, 2.0, -1.0),
            direction: Vec3::Z,
        };
        let d = ray_triangle_intersect(
            &ray,
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        );
        assert!(d.is_none());
    }

    #[test]
    fn test_pick_triangle_reports_point() {
        let mesh = unit_triangle();
        let ray = Ray {
            origin: Vec3::new(0.25, 0.25, -2.0),
            direction: Vec3::Z,
        };
        let hit = pick_triangle(&ray, &mesh).unwrap();
        assert_eq!(hit.triangle_index, 0);
        assert!((hit.point - Vec3::new(0.25, 0.25, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_ground_plane_hit_and_extent() {
        let ray = Ray {
            origin: Vec3::new(1.0, 2.0, 1.0),
            direction: Vec3::new(0.0, -1.0, 0.0),
        };
        let (hit, _) = ray_ground_plane(&ray, 5.0).unwrap();
        assert!((hit - Vec3::new(1.0, 0.0, 1.0)).length() < 1e-6);

        let far = Ray {
            origin: Vec3::new(20.0, 2.0, 0.0),
            direction: Vec3::new(0.0, -1.0, 0.0),
        };
        assert!(ray_ground_plane(&far, 5.0).is_none());
    }

    #[test]
    fn test_ground_plane_parallel_ray() {
        let ray = Ray {
            origin: Vec3::new(0.0, 1.0, 0.0),
            direction: Vec3::X,
        };
        assert!(ray_ground_plane(&ray, 5.0).is_none());
    }

    #[test]
    fn test_aabb_from_mesh() {
        let mesh = unit_triangle();
        let aabb = Aabb::from_mesh(&mesh);
        assert_eq!(aabb.min, Vec3::ZERO);
        assert_eq!(aabb.max, Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(aabb.center(), Vec3::new(0.5, 0.5, 0.0));
    }
}
