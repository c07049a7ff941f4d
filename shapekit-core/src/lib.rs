pub mod editor;
pub mod id;
pub mod settings;
pub mod state;
pub mod units;
pub mod util;

pub use editor::{
    host::{Host, InMemoryHost},
    Editor,
};
pub use state::{EditError, EditorState, ShapeRef};
