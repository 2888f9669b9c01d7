//! Integration tests for the interaction state machine.
//!
//! Uses a scripted provider with queued pick results so gestures can be
//! replayed with exact world coordinates, independent of camera math.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use glam::Vec3;
use shapex_editor_lib::extrude;
use shapex_editor_lib::provider::{GeometryProvider, PickHit};
use shapex_editor_lib::state::{
    DrawResult, EditResult, EditSession, EditorSettings, ExtrudeResult, GestureOutcome, Mode,
    MoveResult, PointerButton, ShapeModel,
};
use shapex_editor_lib::viewport::picking::Ray;
use shared::{MeshId, Point3};

/// Provider that answers picks from a queue and keeps a real mesh table,
/// so buffer reads and writes behave like the production provider.
#[derive(Default)]
struct ScriptedProvider {
    hits: RefCell<VecDeque<Option<PickHit>>>,
    meshes: HashMap<MeshId, (Vec<f32>, Vec<u32>, Vec3)>,
    marker: Option<Vec3>,
    outline_calls: Vec<(usize, bool)>,
    disposed: Vec<MeshId>,
    next_id: usize,
}

impl ScriptedProvider {
    fn queue_hit(&mut self, hit: Option<PickHit>) {
        self.hits.borrow_mut().push_back(hit);
    }

    fn queue_ground(&mut self, x: f32, z: f32) {
        self.queue_hit(Some(PickHit {
            point: Vec3::new(x, 0.0, z),
            mesh: None,
            face: None,
        }));
    }

    fn queue_mesh_hit(&mut self, id: &MeshId, point: Vec3, face: usize) {
        self.queue_hit(Some(PickHit {
            point,
            mesh: Some(id.clone()),
            face: Some(face),
        }));
    }

    fn vertices(&self, id: &MeshId) -> &[f32] {
        &self.meshes[id].0
    }

    /// Top-cap face (all corners at local y = 0) containing the given corner
    fn top_face_with_corner(&self, id: &MeshId, corner: Vec3) -> usize {
        let (vertices, indices, _) = &self.meshes[id];
        let is_corner = |vi: u32| {
            let base = vi as usize * 3;
            Vec3::new(vertices[base], vertices[base + 1], vertices[base + 2]) == corner
        };
        let on_top = |vi: u32| vertices[vi as usize * 3 + 1] == 0.0;
        for face in 0..indices.len() / 3 {
            let tri = &indices[face * 3..face * 3 + 3];
            if tri.iter().all(|&vi| on_top(vi)) && tri.iter().any(|&vi| is_corner(vi)) {
                return face;
            }
        }
        panic!("no top face with corner {corner}");
    }
}

impl GeometryProvider for ScriptedProvider {
    fn pick(&self, _screen: [f32; 2]) -> Option<PickHit> {
        self.hits.borrow_mut().pop_front().flatten()
    }

    fn pick_along_ray(&self, _ray: &Ray) -> Option<PickHit> {
        self.hits.borrow_mut().pop_front().flatten()
    }

    fn create_polygon_outline(&mut self, points: &[Point3], closed: bool) {
        self.outline_calls.push((points.len(), closed));
    }

    fn extrude_solid(&mut self, points: &[Point3], depth: f64) -> Result<MeshId, String> {
        let data = extrude::extrude_solid(points, depth)?;
        self.next_id += 1;
        let id = format!("solid-{}", self.next_id);
        self.meshes.insert(
            id.clone(),
            (data.vertices, data.indices, Vec3::new(0.0, depth as f32, 0.0)),
        );
        Ok(id)
    }

    fn read_vertex_buffer(&self, mesh: &MeshId) -> Option<Vec<f32>> {
        self.meshes.get(mesh).map(|m| m.0.clone())
    }

    fn read_index_buffer(&self, mesh: &MeshId) -> Option<Vec<u32>> {
        self.meshes.get(mesh).map(|m| m.1.clone())
    }

    fn write_vertex_buffer(&mut self, mesh: &MeshId, vertices: Vec<f32>) -> Result<(), String> {
        let Some(entry) = self.meshes.get_mut(mesh) else {
            return Err(format!("unknown mesh {mesh}"));
        };
        if vertices.len() != entry.0.len() {
            return Err("length change".to_string());
        }
        entry.0 = vertices;
        Ok(())
    }

    fn refresh_bounds(&mut self, _mesh: &MeshId) {}

    fn dispose_mesh(&mut self, mesh: &MeshId) {
        self.meshes.remove(mesh);
        self.disposed.push(mesh.clone());
    }

    fn position(&self, mesh: &MeshId) -> Option<Vec3> {
        self.meshes.get(mesh).map(|m| m.2)
    }

    fn set_position(&mut self, mesh: &MeshId, position: Vec3) {
        if let Some(entry) = self.meshes.get_mut(mesh) {
            entry.2 = position;
        }
    }

    fn place_marker(&mut self, position: Vec3) {
        self.marker = Some(position);
    }

    fn clear_marker(&mut self) {
        self.marker = None;
    }
}

/// Wrapper that feeds the session from the hit queue
struct Rig {
    session: EditSession,
    shapes: ShapeModel,
    provider: ScriptedProvider,
}

impl Rig {
    fn new() -> Self {
        Self {
            session: EditSession::new(&EditorSettings::default()),
            shapes: ShapeModel::new(),
            provider: ScriptedProvider::default(),
        }
    }

    fn with_square() -> Self {
        let mut rig = Rig::new();
        for p in [(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)] {
            rig.shapes.add_point(Point3::on_ground(p.0, p.1));
        }
        assert!(rig.shapes.finish_shape());
        rig
    }

    /// Committed square, already extruded to a solid
    fn with_solid() -> (Self, MeshId) {
        let mut rig = Rig::with_square();
        let outcome = rig.set_mode(Some(Mode::Extrude));
        let GestureOutcome::Extrude(ExtrudeResult::Extruded { mesh }) = outcome else {
            panic!("extrude failed: {outcome:?}");
        };
        (rig, mesh)
    }

    fn set_mode(&mut self, mode: Option<Mode>) -> GestureOutcome {
        self.session
            .set_mode(mode, &mut self.shapes, &mut self.provider)
    }

    fn down(&mut self, button: PointerButton) -> GestureOutcome {
        // Screen position is irrelevant: the scripted provider answers
        // picks from its queue
        self.session
            .pointer_down(button, [0.0, 0.0], &mut self.shapes, &mut self.provider)
    }

    fn moved(&mut self) -> GestureOutcome {
        self.session
            .pointer_move([0.0, 0.0], &mut self.shapes, &mut self.provider)
    }

    fn up(&mut self) -> GestureOutcome {
        self.session
            .pointer_up(PointerButton::Primary, &mut self.shapes, &mut self.provider)
    }
}

// ── Draw mode ─────────────────────────────────────────────────

#[test]
fn test_draw_adds_points_and_previews() {
    let mut rig = Rig::new();
    rig.set_mode(Some(Mode::Draw));

    for (i, (x, z)) in [(0.0, 0.0), (2.0, 0.0), (2.0, 2.0)].iter().enumerate() {
        rig.provider.queue_ground(*x, *z);
        let outcome = rig.down(PointerButton::Primary);
        assert_eq!(
            outcome,
            GestureOutcome::Draw(DrawResult::PointAdded { count: i + 1 })
        );
    }
    assert_eq!(rig.provider.outline_calls.last(), Some(&(3, false)));

    let outcome = rig.down(PointerButton::Secondary);
    assert_eq!(
        outcome,
        GestureOutcome::Draw(DrawResult::Finished { committed: true })
    );
    assert_eq!(rig.shapes.shape_count(), 1);
    assert_eq!(rig.provider.outline_calls.last(), Some(&(3, true)));
}

#[test]
fn test_draw_two_points_discarded() {
    let mut rig = Rig::new();
    rig.set_mode(Some(Mode::Draw));
    rig.provider.queue_ground(0.0, 0.0);
    rig.down(PointerButton::Primary);
    rig.provider.queue_ground(1.0, 0.0);
    rig.down(PointerButton::Primary);

    let outcome = rig.down(PointerButton::Secondary);
    assert_eq!(
        outcome,
        GestureOutcome::Draw(DrawResult::Finished { committed: false })
    );
    assert_eq!(rig.shapes.shape_count(), 0);
}

#[test]
fn test_draw_pick_miss_is_noop() {
    let mut rig = Rig::new();
    rig.set_mode(Some(Mode::Draw));
    rig.provider.queue_hit(None);
    assert_eq!(rig.down(PointerButton::Primary), GestureOutcome::Ignored);
    assert!(rig.shapes.drawing_points().is_empty());
}

// ── Extrude mode ──────────────────────────────────────────────

#[test]
fn test_extrude_without_shape_is_noop() {
    let mut rig = Rig::new();
    assert_eq!(
        rig.set_mode(Some(Mode::Extrude)),
        GestureOutcome::Extrude(ExtrudeResult::NoShape)
    );
    assert!(rig.session.solid().is_none());
}

#[test]
fn test_extrude_reentry_disposes_and_rebuilds() {
    let (mut rig, first) = Rig::with_solid();
    rig.set_mode(Some(Mode::Move));

    let outcome = rig.set_mode(Some(Mode::Extrude));
    let GestureOutcome::Extrude(ExtrudeResult::Extruded { mesh: second }) = outcome else {
        panic!("expected a rebuilt solid, got {outcome:?}");
    };
    assert_ne!(first, second);
    assert_eq!(rig.provider.disposed, vec![first]);
    assert_eq!(rig.provider.meshes.len(), 1);
}

// ── Move mode ─────────────────────────────────────────────────

#[test]
fn test_move_offset_exactness() {
    let (mut rig, id) = Rig::with_solid();
    rig.set_mode(Some(Mode::Move));

    // Grab the top cap at (0.5, 1.0, 0.5); solid origin is (0, 1, 0)
    let grab = Vec3::new(0.5, 1.0, 0.5);
    rig.provider.queue_mesh_hit(&id, grab, 0);
    let outcome = rig.down(PointerButton::Primary);
    let expected_offset = Vec3::new(0.0, 1.0, 0.0) - grab;
    assert_eq!(
        outcome,
        GestureOutcome::Move(MoveResult::DragStarted { offset: expected_offset })
    );

    // Each drag step lands the origin at pick + captured offset, exactly
    let target = Vec3::new(3.0, 1.0, 2.0);
    rig.provider.queue_mesh_hit(&id, target, 0);
    let outcome = rig.moved();
    assert_eq!(
        outcome,
        GestureOutcome::Move(MoveResult::Dragged { position: target + expected_offset })
    );
    assert_eq!(rig.provider.position(&id), Some(target + expected_offset));

    // Release mirrors the net translation into the shape record
    assert_eq!(rig.up(), GestureOutcome::Move(MoveResult::DragEnded));
    let moved = rig.shapes.current_shape_points()[0];
    let net = target + expected_offset - Vec3::new(0.0, 1.0, 0.0);
    assert!((moved.x - net.x as f64).abs() < 1e-6);
    assert!((moved.z - net.z as f64).abs() < 1e-6);
}

#[test]
fn test_move_requires_grab_on_solid() {
    let (mut rig, _id) = Rig::with_solid();
    rig.set_mode(Some(Mode::Move));

    // Ground hit does not start a drag
    rig.provider.queue_ground(0.5, 0.5);
    assert_eq!(rig.down(PointerButton::Primary), GestureOutcome::Ignored);
    assert!(!rig.session.is_dragging());

    // Neither does a hit on some other mesh
    let other: MeshId = "other".to_string();
    rig.provider
        .queue_mesh_hit(&other, Vec3::new(0.5, 1.0, 0.5), 0);
    assert_eq!(rig.down(PointerButton::Primary), GestureOutcome::Ignored);
    assert!(!rig.session.is_dragging());
}

#[test]
fn test_mode_switch_mid_drag_clears_offset() {
    let (mut rig, id) = Rig::with_solid();
    rig.set_mode(Some(Mode::Move));
    rig.provider.queue_mesh_hit(&id, Vec3::new(0.5, 1.0, 0.5), 0);
    rig.down(PointerButton::Primary);
    assert!(rig.session.is_dragging());

    rig.set_mode(Some(Mode::Edit));
    assert!(!rig.session.is_dragging());
    assert!(rig.session.drag_offset().is_none());

    // A stray move after the switch has no effect
    rig.provider.queue_ground(4.0, 4.0);
    assert_eq!(rig.moved(), GestureOutcome::Ignored);
    assert_eq!(rig.provider.position(&id), Some(Vec3::new(0.0, 1.0, 0.0)));
}

// ── Edit mode ─────────────────────────────────────────────────

#[test]
fn test_edit_select_places_marker() {
    let (mut rig, id) = Rig::with_solid();
    rig.set_mode(Some(Mode::Edit));

    let face = rig
        .provider
        .top_face_with_corner(&id, Vec3::new(2.0, 0.0, 2.0));
    rig.provider
        .queue_mesh_hit(&id, Vec3::new(1.9, 1.0, 1.9), face);
    let outcome = rig.down(PointerButton::Primary);
    assert!(matches!(
        outcome,
        GestureOutcome::Edit(EditResult::VertexSelected { .. })
    ));
    assert!(rig.session.has_selection());
    // Marker sits at the selected corner in world space
    assert_eq!(rig.provider.marker, Some(Vec3::new(2.0, 1.0, 2.0)));
}

#[test]
fn test_edit_moves_all_coincident_slots() {
    let (mut rig, id) = Rig::with_solid();
    rig.set_mode(Some(Mode::Edit));

    let face = rig
        .provider
        .top_face_with_corner(&id, Vec3::new(2.0, 0.0, 2.0));
    rig.provider
        .queue_mesh_hit(&id, Vec3::new(1.9, 1.0, 1.9), face);
    rig.down(PointerButton::Primary);

    let before = rig.provider.vertices(&id).to_vec();

    // Drag the corner out to world (2.5, 1.0, 2.5), i.e. local (2.5, _, 2.5)
    rig.provider
        .queue_mesh_hit(&id, Vec3::new(2.5, 1.0, 2.5), face);
    let outcome = rig.moved();
    assert_eq!(
        outcome,
        GestureOutcome::Edit(EditResult::VertexMoved { position: Vec3::new(2.5, 1.0, 2.5) })
    );

    let after = rig.provider.vertices(&id);
    assert_eq!(before.len(), after.len());
    for i in (0..before.len()).step_by(3) {
        // Every x slot that was 2.0 moved to 2.5, likewise for z; no other
        // component changed, y never changes
        let expect_x = if before[i] == 2.0 { 2.5 } else { before[i] };
        let expect_z = if before[i + 2] == 2.0 { 2.5 } else { before[i + 2] };
        assert_eq!(after[i], expect_x, "x slot {i}");
        assert_eq!(after[i + 1], before[i + 1], "y slot {}", i + 1);
        assert_eq!(after[i + 2], expect_z, "z slot {}", i + 2);
    }

    // The 2D record mirrors the edited corner
    let mirrored = rig.shapes.current_shape_points()[2];
    assert!((mirrored.x - 2.5).abs() < 1e-6);
    assert!((mirrored.z - 2.5).abs() < 1e-6);

    // Release clears both the selection and the marker
    assert_eq!(rig.up(), GestureOutcome::Edit(EditResult::SelectionCleared));
    assert!(!rig.session.has_selection());
    assert!(rig.provider.marker.is_none());
}

#[test]
fn test_edit_far_hit_selects_nothing() {
    let (mut rig, id) = Rig::with_solid();
    rig.set_mode(Some(Mode::Edit));

    // Hit the cap centre-ish but pretend the solid is huge: a point more
    // than the pick radius from every corner of the face selects nothing
    let face = rig
        .provider
        .top_face_with_corner(&id, Vec3::new(2.0, 0.0, 2.0));
    rig.provider
        .queue_mesh_hit(&id, Vec3::new(100.0, 1.0, 100.0), face);
    assert_eq!(rig.down(PointerButton::Primary), GestureOutcome::Ignored);
    assert!(!rig.session.has_selection());
    assert!(rig.provider.marker.is_none());
}
