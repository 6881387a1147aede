//! State of the bottom sheet and recenter button

use serde::{Deserialize, Serialize};

/// Bottom sheet positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BottomSheetState {
    Expanded,
    Collapsed,
    Dragging,
    Settling,
    Hidden,
}

/// Behavior attached to the summary bottom sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryBehavior {
    state: BottomSheetState,
    hideable: bool,
}

impl Default for SummaryBehavior {
    fn default() -> Self {
        Self {
            state: BottomSheetState::Expanded,
            hideable: false,
        }
    }
}

impl SummaryBehavior {
    pub fn state(&self) -> BottomSheetState {
        self.state
    }

    pub fn is_hideable(&self) -> bool {
        self.hideable
    }

    pub fn set_hideable(&mut self, hideable: bool) {
        self.hideable = hideable;
    }

    /// Apply `state` and report whether the sheet just became hidden.
    ///
    /// A non-hideable sheet refuses to hide.
    pub fn set_state(&mut self, state: BottomSheetState) -> bool {
        if state == BottomSheetState::Hidden && !self.hideable {
            tracing::debug!("ignoring hide request on non-hideable summary sheet");
            return false;
        }
        let was_hidden = self.state == BottomSheetState::Hidden;
        self.state = state;
        state == BottomSheetState::Hidden && !was_hidden
    }
}

/// Recenter button visibility
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecenterButton {
    visible: bool,
}

impl RecenterButton {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_hideable_sheet_stays_visible() {
        let mut behavior = SummaryBehavior::default();
        assert!(!behavior.set_state(BottomSheetState::Hidden));
        assert_eq!(behavior.state(), BottomSheetState::Expanded);
    }

    #[test]
    fn test_hidden_transition_reported_once() {
        let mut behavior = SummaryBehavior::default();
        behavior.set_hideable(true);
        assert!(behavior.set_state(BottomSheetState::Hidden));
        assert!(!behavior.set_state(BottomSheetState::Hidden));
        assert!(!behavior.set_state(BottomSheetState::Expanded));
    }
}
