//! Editor state: shape records, interaction session, settings.

pub mod session;
pub mod settings;
pub mod shapes;

pub use session::{
    DrawResult, EditResult, EditSession, ExtrudeResult, GestureOutcome, Mode, MoveResult,
    PointerButton,
};
pub use settings::EditorSettings;
pub use shapes::ShapeModel;

/// All mutable editor state in one place, passed explicitly where needed
pub struct EditingContext {
    pub shapes: ShapeModel,
    pub session: EditSession,
    pub settings: EditorSettings,
}

impl EditingContext {
    pub fn new(settings: EditorSettings) -> Self {
        Self {
            shapes: ShapeModel::new(),
            session: EditSession::new(&settings),
            settings,
        }
    }
}

impl Default for EditingContext {
    fn default() -> Self {
        Self::new(EditorSettings::default())
    }
}
