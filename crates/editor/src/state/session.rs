//! Mode-driven interaction logic: draw, extrude, move, edit.
//!
//! The session owns the per-gesture transient state (drag offset, vertex
//! selection, coincidence groups) and drives the geometry provider and the
//! shape model from pointer events. Switching modes cancels any in-flight
//! gesture atomically, so a stale offset or vertex index can never leak
//! into the next gesture.

use glam::Vec3;
use shared::{MeshId, Point3};

use crate::provider::GeometryProvider;
use crate::state::settings::EditorSettings;
use crate::state::shapes::ShapeModel;
use crate::vertex_groups::VertexGroups;

/// Currently active operation, selected externally (UI button bar)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Draw,
    Extrude,
    Move,
    Edit,
}

impl Mode {
    /// Parse the mode-selection surface: empty or unknown names mean
    /// "no active mode" (all pointer handling detached).
    pub fn from_name(name: &str) -> Option<Mode> {
        match name {
            "draw" => Some(Mode::Draw),
            "extrude" => Some(Mode::Extrude),
            "move" => Some(Mode::Move),
            "edit" => Some(Mode::Edit),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mode::Draw => "Draw",
            Mode::Extrude => "Extrude",
            Mode::Move => "Move",
            Mode::Edit => "Edit Vertices",
        }
    }
}

/// Pointer button, discriminated the way the state machine cares about it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

// ── Per-mode results (no ad-hoc data bags) ───────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum DrawResult {
    PointAdded { count: usize },
    Finished { committed: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExtrudeResult {
    Extruded { mesh: MeshId },
    NoShape,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MoveResult {
    DragStarted { offset: Vec3 },
    Dragged { position: Vec3 },
    DragEnded,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditResult {
    VertexSelected { vertex_index: usize },
    VertexMoved { position: Vec3 },
    SelectionCleared,
}

/// What a pointer event or mode change amounted to. `Ignored` covers every
/// no-op condition: pick miss, wrong button, no active shape, provider
/// failure already logged.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureOutcome {
    Draw(DrawResult),
    Extrude(ExtrudeResult),
    Move(MoveResult),
    Edit(EditResult),
    Ignored,
}

/// Move-mode drag: offset between the solid's origin and the grab point
#[derive(Clone, Copy)]
struct DragState {
    offset: Vec3,
    start_position: Vec3,
}

/// Edit-mode selection: groups built from a fresh buffer read at
/// pointer-down, valid until pointer-up or mode change
struct EditTarget {
    groups: VertexGroups,
    /// Index of the matching polygon point in the shape record, if any
    shape_point: Option<usize>,
}

pub struct EditSession {
    mode: Option<Mode>,
    /// Mesh handle of the extruded solid, if one exists
    solid: Option<MeshId>,
    drag: Option<DragState>,
    edit: Option<EditTarget>,
    pick_radius: f32,
    default_depth: f64,
}

impl EditSession {
    pub fn new(settings: &EditorSettings) -> Self {
        Self {
            mode: None,
            solid: None,
            drag: None,
            edit: None,
            pick_radius: settings.pick_radius,
            default_depth: settings.default_depth,
        }
    }

    pub fn mode(&self) -> Option<Mode> {
        self.mode
    }

    pub fn solid(&self) -> Option<&MeshId> {
        self.solid.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn drag_offset(&self) -> Option<Vec3> {
        self.drag.map(|d| d.offset)
    }

    pub fn has_selection(&self) -> bool {
        self.edit.is_some()
    }

    /// Switch modes. Cancels any in-flight gesture first; entering extrude
    /// mode is a one-shot action that rebuilds the solid from the current
    /// shape.
    pub fn set_mode(
        &mut self,
        mode: Option<Mode>,
        shapes: &mut ShapeModel,
        provider: &mut dyn GeometryProvider,
    ) -> GestureOutcome {
        self.cancel_gesture(provider);
        self.mode = mode;

        if mode == Some(Mode::Extrude) {
            return GestureOutcome::Extrude(self.rebuild_solid(shapes, provider));
        }
        GestureOutcome::Ignored
    }

    /// Drop all transient per-gesture state
    fn cancel_gesture(&mut self, provider: &mut dyn GeometryProvider) {
        self.drag = None;
        if self.edit.take().is_some() {
            provider.clear_marker();
        }
    }

    /// Dispose the previous solid (if any) and extrude the current shape.
    /// Idempotent per shape, never incremental.
    fn rebuild_solid(
        &mut self,
        shapes: &mut ShapeModel,
        provider: &mut dyn GeometryProvider,
    ) -> ExtrudeResult {
        let Some(shape) = shapes.current_shape() else {
            return ExtrudeResult::NoShape;
        };
        if shape.points.len() < 3 {
            return ExtrudeResult::NoShape;
        }
        let points = shape.points.clone();
        let depth = if shape.height > 0.0 { shape.height } else { self.default_depth };

        if let Some(old) = self.solid.take() {
            provider.dispose_mesh(&old);
        }

        match provider.extrude_solid(&points, depth) {
            Ok(mesh) => {
                tracing::info!("Extruded shape with {} points, depth {depth}", points.len());
                self.solid = Some(mesh.clone());
                ExtrudeResult::Extruded { mesh }
            }
            Err(e) => {
                tracing::warn!("Extrude failed: {e}");
                ExtrudeResult::NoShape
            }
        }
    }

    pub fn pointer_down(
        &mut self,
        button: PointerButton,
        screen: [f32; 2],
        shapes: &mut ShapeModel,
        provider: &mut dyn GeometryProvider,
    ) -> GestureOutcome {
        match self.mode {
            Some(Mode::Draw) => self.draw_down(button, screen, shapes, provider),
            Some(Mode::Move) if button == PointerButton::Primary => {
                self.move_down(screen, provider)
            }
            Some(Mode::Edit) if button == PointerButton::Primary => {
                self.edit_down(screen, shapes, provider)
            }
            _ => GestureOutcome::Ignored,
        }
    }

    pub fn pointer_move(
        &mut self,
        screen: [f32; 2],
        shapes: &mut ShapeModel,
        provider: &mut dyn GeometryProvider,
    ) -> GestureOutcome {
        match self.mode {
            Some(Mode::Move) => self.move_drag(screen, provider),
            Some(Mode::Edit) => self.edit_drag(screen, shapes, provider),
            _ => GestureOutcome::Ignored,
        }
    }

    pub fn pointer_up(
        &mut self,
        _button: PointerButton,
        shapes: &mut ShapeModel,
        provider: &mut dyn GeometryProvider,
    ) -> GestureOutcome {
        match self.mode {
            Some(Mode::Move) => {
                let Some(drag) = self.drag.take() else {
                    return GestureOutcome::Ignored;
                };
                // Mirror the net translation into the shape record
                if let (Some(index), Some(id)) = (shapes.current_index(), &self.solid) {
                    if let Some(position) = provider.position(id) {
                        let net = position - drag.start_position;
                        shapes.translate(index, [net.x as f64, net.y as f64, net.z as f64]);
                    }
                }
                GestureOutcome::Move(MoveResult::DragEnded)
            }
            Some(Mode::Edit) => {
                if self.edit.take().is_some() {
                    provider.clear_marker();
                    GestureOutcome::Edit(EditResult::SelectionCleared)
                } else {
                    GestureOutcome::Ignored
                }
            }
            _ => GestureOutcome::Ignored,
        }
    }

    // ── Draw ──────────────────────────────────────────────────

    fn draw_down(
        &mut self,
        button: PointerButton,
        screen: [f32; 2],
        shapes: &mut ShapeModel,
        provider: &mut dyn GeometryProvider,
    ) -> GestureOutcome {
        match button {
            PointerButton::Primary => {
                let Some(hit) = provider.pick(screen) else {
                    return GestureOutcome::Ignored;
                };
                shapes.add_point(Point3::new(
                    hit.point.x as f64,
                    hit.point.y as f64,
                    hit.point.z as f64,
                ));
                provider.create_polygon_outline(shapes.drawing_points(), false);
                GestureOutcome::Draw(DrawResult::PointAdded {
                    count: shapes.drawing_points().len(),
                })
            }
            PointerButton::Secondary => {
                let committed = shapes.finish_shape();
                if committed {
                    provider.create_polygon_outline(shapes.current_shape_points(), true);
                    tracing::info!(
                        "Committed shape with {} points",
                        shapes.current_shape_points().len()
                    );
                }
                GestureOutcome::Draw(DrawResult::Finished { committed })
            }
        }
    }

    // ── Move (translate-whole) ────────────────────────────────

    fn move_down(
        &mut self,
        screen: [f32; 2],
        provider: &mut dyn GeometryProvider,
    ) -> GestureOutcome {
        let Some(hit) = provider.pick(screen) else {
            return GestureOutcome::Ignored;
        };
        // Only a grab on the solid itself starts a drag
        if hit.mesh.is_none() || hit.mesh != self.solid {
            return GestureOutcome::Ignored;
        }
        let Some(id) = &self.solid else {
            return GestureOutcome::Ignored;
        };
        let Some(position) = provider.position(id) else {
            tracing::warn!("Move: solid {id} has no position");
            return GestureOutcome::Ignored;
        };

        let offset = position - hit.point;
        self.drag = Some(DragState { offset, start_position: position });
        GestureOutcome::Move(MoveResult::DragStarted { offset })
    }

    fn move_drag(
        &mut self,
        screen: [f32; 2],
        provider: &mut dyn GeometryProvider,
    ) -> GestureOutcome {
        let Some(drag) = self.drag else {
            return GestureOutcome::Ignored;
        };
        let Some(id) = self.solid.clone() else {
            return GestureOutcome::Ignored;
        };
        let Some(hit) = provider.pick(screen) else {
            return GestureOutcome::Ignored;
        };

        let position = hit.point + drag.offset;
        provider.set_position(&id, position);
        GestureOutcome::Move(MoveResult::Dragged { position })
    }

    // ── Edit (patch-vertices) ─────────────────────────────────

    fn edit_down(
        &mut self,
        screen: [f32; 2],
        shapes: &ShapeModel,
        provider: &mut dyn GeometryProvider,
    ) -> GestureOutcome {
        let Some(hit) = provider.pick(screen) else {
            return GestureOutcome::Ignored;
        };
        if hit.mesh.is_none() || hit.mesh != self.solid {
            return GestureOutcome::Ignored;
        }
        let (Some(id), Some(face)) = (self.solid.clone(), hit.face) else {
            return GestureOutcome::Ignored;
        };

        // Fresh read: groups must never be built from a stale buffer
        let Some(position) = provider.position(&id) else {
            tracing::warn!("Edit: solid {id} has no position");
            return GestureOutcome::Ignored;
        };
        let (Some(vertices), Some(indices)) =
            (provider.read_vertex_buffer(&id), provider.read_index_buffer(&id))
        else {
            tracing::warn!("Edit: vertex data unavailable for {id}");
            return GestureOutcome::Ignored;
        };

        let local_hit = hit.point - position;
        let Some(groups) =
            VertexGroups::for_face(&vertices, &indices, face, local_hit, self.pick_radius)
        else {
            return GestureOutcome::Ignored;
        };

        provider.place_marker(groups.anchor + position);
        let vertex_index = groups.vertex_index;
        let shape_point = matching_shape_point(shapes, groups.anchor + position);
        self.edit = Some(EditTarget { groups, shape_point });
        GestureOutcome::Edit(EditResult::VertexSelected { vertex_index })
    }

    fn edit_drag(
        &mut self,
        screen: [f32; 2],
        shapes: &mut ShapeModel,
        provider: &mut dyn GeometryProvider,
    ) -> GestureOutcome {
        let Some(target) = self.edit.take() else {
            return GestureOutcome::Ignored;
        };
        let Some(id) = self.solid.clone() else {
            return GestureOutcome::Ignored;
        };
        let Some(hit) = provider.pick(screen) else {
            self.edit = Some(target);
            return GestureOutcome::Ignored;
        };

        let Some(position) = provider.position(&id) else {
            tracing::warn!("Edit: solid {id} disappeared mid-gesture");
            provider.clear_marker();
            return GestureOutcome::Ignored;
        };
        let Some(mut vertices) = provider.read_vertex_buffer(&id) else {
            tracing::warn!("Edit: vertex data unavailable for {id}");
            provider.clear_marker();
            return GestureOutcome::Ignored;
        };

        let local = hit.point - position;
        if let Err(e) = target.groups.apply(&mut vertices, local) {
            // Invariant violation: reset the gesture, never write corrupt data
            tracing::warn!("Edit: {e}");
            provider.clear_marker();
            return GestureOutcome::Ignored;
        }
        if let Err(e) = provider.write_vertex_buffer(&id, vertices) {
            tracing::warn!("Edit: {e}");
            provider.clear_marker();
            return GestureOutcome::Ignored;
        }
        provider.refresh_bounds(&id);
        provider.place_marker(hit.point);

        if let (Some(index), Some(vertex)) = (shapes.current_index(), target.shape_point) {
            shapes.set_vertex(
                index,
                vertex,
                Point3::on_ground(hit.point.x as f64, hit.point.z as f64),
            );
        }

        self.edit = Some(target);
        GestureOutcome::Edit(EditResult::VertexMoved { position: hit.point })
    }
}

/// Find the polygon point of the current shape coincident (in x/z) with the
/// selected mesh vertex, so the 2D record can mirror the edit.
fn matching_shape_point(shapes: &ShapeModel, world: Vec3) -> Option<usize> {
    const EPS: f64 = 1e-3;
    shapes.current_shape_points().iter().position(|p| {
        (p.x - world.x as f64).abs() < EPS && (p.z - world.z as f64).abs() < EPS
    })
}
