use shared::Point3;

use crate::viewport::mesh::MeshData;

/// Build an extruded solid from a closed ground polygon.
///
/// The drawn polygon becomes the top cap at local y = 0 and the solid is
/// swept down to local y = -depth; the provider then positions the mesh at
/// (0, depth, 0) so the solid sits on the ground with its top at y = depth.
///
/// Каждая грань несёт собственные вершины (flat shading): крышки и стенки не
/// разделяют слоты буфера, поэтому вдоль швов возникают дубликаты вершин —
/// их согласованность при редактировании обеспечивает `vertex_groups`.
pub fn extrude_solid(points: &[Point3], depth: f64) -> Result<MeshData, String> {
    let n = points.len();
    if n < 3 {
        return Err(format!("need at least 3 points to extrude, got {n}"));
    }
    if depth <= 0.0 {
        return Err(format!("extrusion depth must be positive, got {depth}"));
    }

    let top: Vec<[f32; 3]> = points
        .iter()
        .map(|p| [p.x as f32, 0.0, p.z as f32])
        .collect();
    let bottom: Vec<[f32; 3]> = top
        .iter()
        .map(|p| [p[0], -(depth as f32), p[2]])
        .collect();

    // Signed area in the ground plane decides the winding of both caps.
    let mut area2 = 0.0_f64;
    for i in 0..n {
        let next = (i + 1) % n;
        area2 += points[i].x * points[next].z - points[next].x * points[i].z;
    }
    let ccw = area2 > 0.0;

    let mut vertices: Vec<f32> = Vec::with_capacity(6 * n * 3);
    let mut indices: Vec<u32> = Vec::with_capacity((4 * n - 4) * 3);

    // Top cap (fan triangulation)
    let base = push_ring(&mut vertices, &top);
    for i in 1..(n - 1) {
        if ccw {
            indices.extend_from_slice(&[base, base + i as u32, base + (i + 1) as u32]);
        } else {
            indices.extend_from_slice(&[base, base + (i + 1) as u32, base + i as u32]);
        }
    }

    // Bottom cap (fan triangulation, opposite winding)
    let base = push_ring(&mut vertices, &bottom);
    for i in 1..(n - 1) {
        if ccw {
            indices.extend_from_slice(&[base, base + (i + 1) as u32, base + i as u32]);
        } else {
            indices.extend_from_slice(&[base, base + i as u32, base + (i + 1) as u32]);
        }
    }

    // Side walls, one quad per polygon edge
    for i in 0..n {
        let next = (i + 1) % n;
        let base = (vertices.len() / 3) as u32;
        vertices.extend_from_slice(&top[i]);
        vertices.extend_from_slice(&top[next]);
        vertices.extend_from_slice(&bottom[next]);
        vertices.extend_from_slice(&bottom[i]);

        if ccw {
            indices.extend_from_slice(&[base, base + 2, base + 1]);
            indices.extend_from_slice(&[base, base + 3, base + 2]);
        } else {
            indices.extend_from_slice(&[base, base + 1, base + 2]);
            indices.extend_from_slice(&[base, base + 2, base + 3]);
        }
    }

    Ok(MeshData { vertices, indices })
}

fn push_ring(vertices: &mut Vec<f32>, ring: &[[f32; 3]]) -> u32 {
    let base = (vertices.len() / 3) as u32;
    for p in ring {
        vertices.extend_from_slice(p);
    }
    base
}
