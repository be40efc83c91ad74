// Application layer - Editing session and dependency wiring

pub mod container;
pub mod session;

pub use container::{AppContainer, DefaultAppContainer};
pub use session::{EditorSession, SourceMedia};
