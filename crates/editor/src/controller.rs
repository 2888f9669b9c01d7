//! Thin façade between the input layer and the editing state.
//!
//! Pure sequencing: forwards pointer events to the session, drawing updates
//! to the shape model, and exposes the read surface the front end needs.
//! No geometry logic lives here.

use shared::Point3;

use crate::provider::GeometryProvider;
use crate::state::{EditingContext, GestureOutcome, Mode, PointerButton};

pub struct ShapeController {
    context: EditingContext,
}

impl ShapeController {
    pub fn new(context: EditingContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &EditingContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut EditingContext {
        &mut self.context
    }

    /// Mode-selection surface. Unknown or empty names deactivate all
    /// pointer handling.
    pub fn set_operation(
        &mut self,
        name: &str,
        provider: &mut dyn GeometryProvider,
    ) -> GestureOutcome {
        let mode = Mode::from_name(name);
        self.context
            .session
            .set_mode(mode, &mut self.context.shapes, provider)
    }

    pub fn pointer_down(
        &mut self,
        button: PointerButton,
        screen: [f32; 2],
        provider: &mut dyn GeometryProvider,
    ) -> GestureOutcome {
        self.context
            .session
            .pointer_down(button, screen, &mut self.context.shapes, provider)
    }

    pub fn pointer_move(
        &mut self,
        screen: [f32; 2],
        provider: &mut dyn GeometryProvider,
    ) -> GestureOutcome {
        self.context
            .session
            .pointer_move(screen, &mut self.context.shapes, provider)
    }

    pub fn pointer_up(
        &mut self,
        button: PointerButton,
        provider: &mut dyn GeometryProvider,
    ) -> GestureOutcome {
        self.context
            .session
            .pointer_up(button, &mut self.context.shapes, provider)
    }

    /// Append a drawing point directly, bypassing picking. Used by front
    /// ends that resolve the ground position themselves.
    pub fn update_shape_points(&mut self, point: Point3) {
        self.context.shapes.add_point(point);
    }

    /// Commit the in-progress sequence; returns whether a shape was made
    pub fn finish_drawing(&mut self) -> bool {
        self.context.shapes.finish_shape()
    }

    /// Points of the most recently committed shape, empty when none exists
    pub fn current_shape_points(&self) -> &[Point3] {
        self.context.shapes.current_shape_points()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::EditorSettings;

    #[test]
    fn test_update_and_finish() {
        let mut controller = ShapeController::new(EditingContext::default());
        controller.update_shape_points(Point3::on_ground(0.0, 0.0));
        controller.update_shape_points(Point3::on_ground(1.0, 0.0));
        assert!(!controller.finish_drawing());
        assert!(controller.current_shape_points().is_empty());

        controller.update_shape_points(Point3::on_ground(0.0, 0.0));
        controller.update_shape_points(Point3::on_ground(1.0, 0.0));
        controller.update_shape_points(Point3::on_ground(1.0, 1.0));
        assert!(controller.finish_drawing());
        assert_eq!(controller.current_shape_points().len(), 3);
    }

    #[test]
    fn test_context_access() {
        let controller = ShapeController::new(EditingContext::new(EditorSettings::default()));
        assert!(controller.context().session.mode().is_none());
        assert_eq!(controller.context().shapes.shape_count(), 0);
    }
}
