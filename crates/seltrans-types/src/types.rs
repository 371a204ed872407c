use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// Handle to a node mounted on the host surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The two transient controls the watcher manages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlKind {
    Trigger,
    Popup,
}

impl ControlKind {
    /// Styling hook on the injected node
    pub fn class_name(self) -> &'static str {
        match self {
            ControlKind::Trigger => "translation-button",
            ControlKind::Popup => "translation-popup",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Trimmed text content
    pub text: String,
    pub rect: Rect,
}

/// Raw pointer/scroll events delivered by the host page
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    PointerUp { target: Option<ElementId> },
    Click { target: Option<ElementId> },
    Scroll,
    Resize,
}
