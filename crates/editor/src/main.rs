use shapex_editor_lib::provider::{GeometryProvider, SoftwareProvider};
use shapex_editor_lib::state::EditorSettings;
use shapex_editor_lib::validation::MeshValidator;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shapex_editor=info".into()),
        )
        .init();

    let Some(description) = parse_shapes_arg() else {
        tracing::info!("Usage: shapex-editor --shapes <path.json>");
        return;
    };

    let settings = EditorSettings::load();
    let mut provider = SoftwareProvider::new();
    provider.ground_extent = settings.ground_extent;
    provider.marker_size = settings.marker_size;

    for (i, shape) in description.shapes.iter().enumerate() {
        let depth = if shape.height > 0.0 {
            shape.height
        } else {
            settings.default_depth
        };
        match provider.extrude_solid(&shape.points, depth) {
            Ok(id) => {
                let Some(mesh) = provider.mesh_data(&id) else {
                    continue;
                };
                let validator = MeshValidator::new(mesh);
                let errors = validator.validate_all();
                tracing::info!(
                    "Shape {i}: {} points -> solid {id} ({} vertices, {} triangles)",
                    shape.points.len(),
                    validator.vertex_count(),
                    validator.triangle_count()
                );
                for error in errors {
                    tracing::warn!("Shape {i}: {error}");
                }
            }
            Err(e) => {
                tracing::error!("Shape {i}: extrusion failed: {e}");
            }
        }
    }
}

fn parse_shapes_arg() -> Option<shared::ShapeSetDescription> {
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        if args[i] == "--shapes" && i + 1 < args.len() {
            let path = &args[i + 1];
            match std::fs::read_to_string(path) {
                Ok(json) => match serde_json::from_str::<shared::ShapeSetDescription>(&json) {
                    Ok(description) => {
                        tracing::info!(
                            "Loaded {} shapes from {path}",
                            description.shapes.len()
                        );
                        return Some(description);
                    }
                    Err(e) => {
                        tracing::error!("Failed to parse shapes JSON from {path}: {e}");
                    }
                },
                Err(e) => {
                    tracing::error!("Failed to read shapes file {path}: {e}");
                }
            }
            break;
        }
        i += 1;
    }
    None
}
