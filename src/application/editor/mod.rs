//! Usage component editing: the tier ladder, the component session, and the
//! registry of open sessions.

pub mod component_editor;
pub mod registry;
pub mod sweeper;
pub mod tier_editor;

pub use component_editor::ComponentEditor;
pub use registry::{EditorRegistry, EditorSession, SharedEditorRegistry};
pub use sweeper::start_session_sweeper;
pub use tier_editor::TierEditor;
