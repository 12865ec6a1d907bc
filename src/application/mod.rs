pub mod catalog;
pub mod editor;

pub use catalog::MetricSnapshot;
pub use editor::{
    start_session_sweeper, ComponentEditor, EditorRegistry, EditorSession, SharedEditorRegistry,
    TierEditor,
};
