pub mod geometry;
pub mod message;
pub mod types;

pub use geometry::{Point, Rect, Size};
pub use message::{RuntimeMessage, TranslateResponse};
pub use types::{ControlKind, ElementId, HostEvent, Selection};
