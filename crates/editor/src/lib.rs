// Library crate: exposes testable modules for integration tests and the
// headless CLI. Rendering front ends live outside this repository and drive
// the engine through `provider::GeometryProvider`.

pub mod controller;
pub mod extrude;
pub mod fixtures;
pub mod harness;
pub mod provider;
pub mod state;
pub mod validation;
pub mod vertex_groups;

/// Subset of viewport types the engine needs (mesh buffers, picking, camera).
/// The actual renderer stays outside the crate.
pub mod viewport {
    pub mod camera;
    pub mod mesh;
    pub mod picking;
}
