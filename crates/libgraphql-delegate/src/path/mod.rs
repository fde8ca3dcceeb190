mod path_component;
mod selection_path;

pub use path_component::PathComponent;
pub use selection_path::SelectionPath;
pub use selection_path::SelectionPathParseError;
