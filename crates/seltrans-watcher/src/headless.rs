use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use seltrans_types::{ControlKind, ElementId, Point, Rect, Selection, Size};

use crate::surface::{Surface, SurfaceError};

#[derive(Debug, Clone, PartialEq)]
pub struct MountedElement {
    pub kind: ControlKind,
    pub text: String,
    pub position: Point,
}

impl MountedElement {
    pub fn class_name(&self) -> &'static str {
        self.kind.class_name()
    }
}

/// In-memory page: a scrollable document with one selection and the
/// nodes injected into it. Every mutation is logged as a render event.
#[derive(Debug)]
pub struct HeadlessPage {
    viewport: Size,
    scroll: Point,
    /// Selected text and its rect in document coordinates
    selection: Option<(String, Rect)>,
    elements: BTreeMap<ElementId, MountedElement>,
    next_id: u64,
}

impl HeadlessPage {
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport,
            scroll: Point::default(),
            selection: None,
            elements: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Selects `text` occupying `rect` in document coordinates
    pub fn select(&mut self, text: impl Into<String>, rect: Rect) {
        self.selection = Some((text.into(), rect));
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn scroll_by(&mut self, dx: f64, dy: f64) {
        self.scroll = Point::new(self.scroll.x + dx, self.scroll.y + dy);
        tracing::debug!(x = self.scroll.x, y = self.scroll.y, "page scrolled");
    }

    pub fn resize(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// First mounted control of the given kind
    pub fn find(&self, kind: ControlKind) -> Option<(ElementId, &MountedElement)> {
        self.elements
            .iter()
            .find(|(_, el)| el.kind == kind)
            .map(|(id, el)| (*id, el))
    }

    pub fn count(&self, kind: ControlKind) -> usize {
        self.elements.values().filter(|el| el.kind == kind).count()
    }
}

impl Surface for HeadlessPage {
    fn selection(&self) -> Option<Selection> {
        self.selection.as_ref().map(|(text, rect)| Selection {
            text: text.clone(),
            rect: rect.offset(-self.scroll.x, -self.scroll.y),
        })
    }

    fn viewport(&self) -> Size {
        self.viewport
    }

    fn mount(&mut self, kind: ControlKind, text: &str, at: Point) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;

        tracing::info!(
            element = %id,
            class = kind.class_name(),
            x = at.x,
            y = at.y,
            text,
            "render: mounted"
        );
        self.elements.insert(
            id,
            MountedElement {
                kind,
                text: text.to_string(),
                position: at,
            },
        );
        id
    }

    fn move_to(&mut self, id: ElementId, at: Point) -> Result<(), SurfaceError> {
        let element = self
            .elements
            .get_mut(&id)
            .ok_or(SurfaceError::Detached(id))?;
        element.position = at;
        tracing::info!(element = %id, x = at.x, y = at.y, "render: moved");
        Ok(())
    }

    fn remove(&mut self, id: ElementId) -> Result<(), SurfaceError> {
        let element = self.elements.remove(&id).ok_or(SurfaceError::Detached(id))?;
        tracing::info!(element = %id, class = element.class_name(), "render: removed");
        Ok(())
    }
}

/// A [`HeadlessPage`] shared between the watcher and whoever drives the page
#[derive(Debug, Clone)]
pub struct SharedPage(Arc<Mutex<HeadlessPage>>);

impl SharedPage {
    pub fn new(page: HeadlessPage) -> Self {
        Self(Arc::new(Mutex::new(page)))
    }

    pub fn lock(&self) -> MutexGuard<'_, HeadlessPage> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Surface for SharedPage {
    fn selection(&self) -> Option<Selection> {
        self.lock().selection()
    }

    fn viewport(&self) -> Size {
        self.lock().viewport()
    }

    fn mount(&mut self, kind: ControlKind, text: &str, at: Point) -> ElementId {
        self.lock().mount(kind, text, at)
    }

    fn move_to(&mut self, id: ElementId, at: Point) -> Result<(), SurfaceError> {
        self.lock().move_to(id, at)
    }

    fn remove(&mut self, id: ElementId) -> Result<(), SurfaceError> {
        self.lock().remove(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_rect_follows_scroll() {
        let mut page = HeadlessPage::new(Size::new(800.0, 600.0));
        page.select("hello", Rect::new(100.0, 900.0, 40.0, 16.0));
        page.scroll_by(0.0, 850.0);

        let selection = page.selection().unwrap();
        assert_eq!(selection.rect, Rect::new(100.0, 50.0, 40.0, 16.0));
    }

    #[test]
    fn removing_twice_reports_detached() {
        let mut page = HeadlessPage::new(Size::new(800.0, 600.0));
        let id = page.mount(ControlKind::Trigger, "翻译", Point::new(1.0, 2.0));

        assert_eq!(page.find(ControlKind::Trigger).unwrap().1.class_name(), "translation-button");
        assert_eq!(page.remove(id), Ok(()));
        assert_eq!(page.remove(id), Err(SurfaceError::Detached(id)));
        assert_eq!(page.count(ControlKind::Trigger), 0);
    }
}
