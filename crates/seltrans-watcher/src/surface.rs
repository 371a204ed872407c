use seltrans_types::{ControlKind, ElementId, Point, Selection, Size};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    #[error("element {0} is not attached")]
    Detached(ElementId),
}

/// The page the watcher draws on.
///
/// Rectangles and points are viewport coordinates. Implementations own
/// node lifetime; the watcher only keeps ids.
pub trait Surface: Send {
    /// Current text selection, untrimmed. `None` when collapsed.
    fn selection(&self) -> Option<Selection>;

    fn viewport(&self) -> Size;

    /// Injects a control carrying `kind.class_name()` and returns its id
    fn mount(&mut self, kind: ControlKind, text: &str, at: Point) -> ElementId;

    fn move_to(&mut self, id: ElementId, at: Point) -> Result<(), SurfaceError>;

    fn remove(&mut self, id: ElementId) -> Result<(), SurfaceError>;
}
