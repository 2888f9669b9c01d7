//! Headless test harness for programmatic editing.
//!
//! Wires a `ShapeController` to a `SoftwareProvider` and exposes gestures in
//! world coordinates: pointer positions are synthesized by projecting world
//! points through the camera, so every gesture exercises the full screen-ray
//! pick path rather than bypassing it.

use glam::Vec3;
use shared::{MeshId, Point3, ShapeSetDescription};

use crate::controller::ShapeController;
use crate::provider::{GeometryProvider, SoftwareProvider};
use crate::state::{EditingContext, GestureOutcome, PointerButton};
use crate::validation::MeshValidator;
use crate::viewport::mesh::MeshData;

/// Headless harness — controller plus software provider
pub struct EditorHarness {
    pub provider: SoftwareProvider,
    pub controller: ShapeController,
}

impl EditorHarness {
    /// Create a new empty harness.
    pub fn new() -> Self {
        Self {
            provider: SoftwareProvider::new(),
            controller: ShapeController::new(EditingContext::default()),
        }
    }

    // ── Gestures ──────────────────────────────────────────────

    /// Screen position of a world point under the current camera.
    /// Panics when the point is behind the camera (a broken test setup).
    pub fn screen_of(&self, world: Vec3) -> [f32; 2] {
        match self.provider.camera.project(world, self.provider.viewport) {
            Some(screen) => screen,
            None => panic!("world point {world} is not visible"),
        }
    }

    pub fn set_operation(&mut self, name: &str) -> GestureOutcome {
        self.controller.set_operation(name, &mut self.provider)
    }

    /// Primary-button click at the screen position of a world point
    pub fn click_world(&mut self, world: Vec3) -> GestureOutcome {
        let screen = self.screen_of(world);
        let down = self
            .controller
            .pointer_down(PointerButton::Primary, screen, &mut self.provider);
        self.controller
            .pointer_up(PointerButton::Primary, &mut self.provider);
        down
    }

    /// Primary-button press, drag through the given world points, release
    pub fn drag_world(&mut self, from: Vec3, through: &[Vec3]) -> GestureOutcome {
        let screen = self.screen_of(from);
        self.controller
            .pointer_down(PointerButton::Primary, screen, &mut self.provider);
        for &point in through {
            let screen = self.screen_of(point);
            self.controller.pointer_move(screen, &mut self.provider);
        }
        self.controller
            .pointer_up(PointerButton::Primary, &mut self.provider)
    }

    /// Press without release, for mid-gesture assertions
    pub fn press_world(&mut self, world: Vec3) -> GestureOutcome {
        let screen = self.screen_of(world);
        self.controller
            .pointer_down(PointerButton::Primary, screen, &mut self.provider)
    }

    pub fn move_world(&mut self, world: Vec3) -> GestureOutcome {
        let screen = self.screen_of(world);
        self.controller.pointer_move(screen, &mut self.provider)
    }

    pub fn release(&mut self) -> GestureOutcome {
        self.controller
            .pointer_up(PointerButton::Primary, &mut self.provider)
    }

    /// Secondary-button click (finish drawing)
    pub fn right_click(&mut self) -> GestureOutcome {
        let center = [
            self.provider.viewport[0] / 2.0,
            self.provider.viewport[1] / 2.0,
        ];
        let down =
            self.controller
                .pointer_down(PointerButton::Secondary, center, &mut self.provider);
        self.controller
            .pointer_up(PointerButton::Secondary, &mut self.provider);
        down
    }

    /// Enter draw mode, click every corner, finish with a right click
    pub fn draw_polygon(&mut self, corners: &[Point3]) -> GestureOutcome {
        self.set_operation("draw");
        for p in corners {
            self.click_world(Vec3::new(p.x as f32, p.y as f32, p.z as f32));
        }
        self.right_click()
    }

    // ── Persistence ───────────────────────────────────────────

    /// Load a shape document from JSON, replacing the current shapes
    pub fn load_shapes_json(&mut self, json: &str) -> Result<(), String> {
        let description: ShapeSetDescription =
            serde_json::from_str(json).map_err(|e| format!("JSON parse error: {e}"))?;
        self.controller
            .context_mut()
            .shapes
            .load_description(description);
        Ok(())
    }

    /// Export the committed shapes as JSON
    pub fn export_shapes_json(&self) -> String {
        serde_json::to_string_pretty(&self.controller.context().shapes.to_description())
            .unwrap_or_default()
    }

    // ── Inspection ────────────────────────────────────────────

    /// Handle of the current extruded solid
    pub fn solid_id(&self) -> Option<&MeshId> {
        self.controller.context().session.solid()
    }

    /// Mesh data of the current extruded solid
    pub fn solid_mesh(&self) -> Option<&MeshData> {
        self.solid_id().and_then(|id| self.provider.mesh_data(id))
    }

    pub fn solid_position(&self) -> Option<Vec3> {
        self.solid_id().and_then(|id| self.provider.position(id))
    }

    /// Create a validator for the current solid's mesh
    pub fn validate_solid(&self) -> Option<MeshValidator> {
        self.solid_mesh().map(MeshValidator::new)
    }

    pub fn shape_count(&self) -> usize {
        self.controller.context().shapes.shape_count()
    }

    pub fn current_shape_points(&self) -> &[Point3] {
        self.controller.current_shape_points()
    }
}

impl Default for EditorHarness {
    fn default() -> Self {
        Self::new()
    }
}
