use seltrans_types::{ElementId, Rect};
use tokio_util::sync::CancellationToken;

/// The live trigger and what it was created for
#[derive(Debug, Clone)]
pub struct TriggerState {
    pub id: ElementId,
    /// Selection text captured when the trigger was created
    pub text: String,
    pub rect: Rect,
    /// Single-flight flag for this trigger instance
    pub translating: bool,
}

/// UI state owned by one watcher.
///
/// Each interaction (a selection that produced a trigger) is one
/// generation. Moving to the next generation cancels whatever the
/// previous one still has in flight.
#[derive(Debug)]
pub struct UiState {
    pub trigger: Option<TriggerState>,
    pub popup: Option<ElementId>,
    generation: u64,
    cancel: CancellationToken,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            trigger: None,
            popup: None,
            generation: 0,
            cancel: CancellationToken::new(),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Token cancelled when the current generation ends
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn advance(&mut self) -> u64 {
        self.cancel.cancel();
        self.cancel = CancellationToken::new();
        self.generation += 1;
        self.generation
    }

    pub fn trigger_id(&self) -> Option<ElementId> {
        self.trigger.as_ref().map(|t| t.id)
    }

    /// Whether `target` is one of our own controls
    pub fn owns(&self, target: Option<ElementId>) -> bool {
        match target {
            Some(id) => self.trigger_id() == Some(id) || self.popup == Some(id),
            None => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.trigger.is_none() && self.popup.is_none()
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_cancels_previous_generation() {
        let mut state = UiState::new();
        let first = state.cancel_token();

        assert_eq!(state.advance(), 1);
        assert!(first.is_cancelled());
        assert!(!state.cancel_token().is_cancelled());
    }

    #[test]
    fn owns_only_live_controls() {
        let mut state = UiState::new();
        assert!(!state.owns(Some(ElementId(1))));
        assert!(!state.owns(None));

        state.trigger = Some(TriggerState {
            id: ElementId(1),
            text: "hello".into(),
            rect: Rect::default(),
            translating: false,
        });
        state.popup = Some(ElementId(2));

        assert!(state.owns(Some(ElementId(1))));
        assert!(state.owns(Some(ElementId(2))));
        assert!(!state.owns(Some(ElementId(3))));
    }
}
