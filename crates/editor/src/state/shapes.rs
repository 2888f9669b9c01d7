//! Authoritative 2D shape data: the polygon being drawn plus the committed
//! shapes. The rendered mesh lives at the geometry provider; the model here
//! is the bookkeeping record kept conceptually in sync with it.

use shared::{Point3, Shape, ShapeSetDescription};

#[derive(Default)]
pub struct ShapeModel {
    shapes: Vec<Shape>,
    /// Points of the shape currently being drawn (at most one at a time)
    drawing_points: Vec<Point3>,
}

impl ShapeModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a point to the in-progress sequence, starting a new sequence
    /// if none is active. Points below the drawing surface are clamped up.
    pub fn add_point(&mut self, point: Point3) {
        let mut p = point;
        if p.y < 0.0 {
            p.y = 0.0;
        }
        self.drawing_points.push(p);
    }

    pub fn drawing_points(&self) -> &[Point3] {
        &self.drawing_points
    }

    /// Commit the in-progress sequence as a new shape when it has more than
    /// two points; otherwise discard it silently. Returns whether a shape
    /// was committed. The committed shape becomes current.
    pub fn finish_shape(&mut self) -> bool {
        if self.drawing_points.len() > 2 {
            let points = std::mem::take(&mut self.drawing_points);
            self.shapes.push(Shape::new(points));
            true
        } else {
            self.drawing_points.clear();
            false
        }
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    pub fn shape(&self, index: usize) -> Option<&Shape> {
        self.shapes.get(index)
    }

    /// The most recently committed shape — the implicit target of
    /// extrude/move/edit.
    pub fn current_shape(&self) -> Option<&Shape> {
        self.shapes.last()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.shapes.len().checked_sub(1)
    }

    /// Points of the current shape, or empty when nothing is committed.
    pub fn current_shape_points(&self) -> &[Point3] {
        self.current_shape().map(|s| s.points.as_slice()).unwrap_or(&[])
    }

    // ── Mutators mirroring mesh-side edits ────────────────────

    /// Set the extrusion height for a committed shape. No-op out of range.
    pub fn set_height(&mut self, index: usize, height: f64) {
        if let Some(shape) = self.shapes.get_mut(index) {
            shape.height = height;
        }
    }

    /// Translate every point of a committed shape. No-op out of range.
    pub fn translate(&mut self, index: usize, offset: [f64; 3]) {
        if let Some(shape) = self.shapes.get_mut(index) {
            for p in &mut shape.points {
                p.x += offset[0];
                p.y += offset[1];
                p.z += offset[2];
            }
        }
    }

    /// Replace a single vertex of a committed shape. No-op out of range.
    pub fn set_vertex(&mut self, index: usize, vertex: usize, position: Point3) {
        if let Some(shape) = self.shapes.get_mut(index) {
            if let Some(p) = shape.points.get_mut(vertex) {
                *p = position;
            }
        }
    }

    // ── Persistence (harness / CLI surface) ───────────────────

    pub fn to_description(&self) -> ShapeSetDescription {
        ShapeSetDescription {
            version: 1,
            shapes: self.shapes.clone(),
        }
    }

    /// Replace all committed shapes; discards any in-progress drawing.
    pub fn load_description(&mut self, description: ShapeSetDescription) {
        self.shapes = description.shapes;
        self.drawing_points.clear();
    }
}
