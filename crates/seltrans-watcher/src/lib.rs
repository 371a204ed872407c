pub mod debounce;
pub mod headless;
pub mod layout;
pub mod state;
pub mod surface;
pub mod watcher;

pub use headless::{HeadlessPage, SharedPage};
pub use state::UiState;
pub use surface::{Surface, SurfaceError};
pub use watcher::Watcher;
