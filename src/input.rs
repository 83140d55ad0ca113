//! Logical input actions and double-tap gesture detection
//!
//! The engine never sees key codes. The embedding layer merges however many
//! sources it has (keyboard, virtual pad) into one [`ButtonSnapshot`] of
//! button levels per tick; press edges are derived by comparing against the
//! previous tick's snapshot.

use crate::consts::DOUBLE_TAP_WINDOW_TICKS;

/// Logical input actions, decoupled from physical key identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Left,
    Right,
    Jump,
    Down,
}

/// All actions, in the fixed order press edges are processed.
pub const ACTIONS: [Action; 4] = [Action::Left, Action::Right, Action::Jump, Action::Down];

/// Merged button levels for a single tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonSnapshot {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub down: bool,
}

impl ButtonSnapshot {
    /// Whether the given action's button is held this tick.
    pub fn is_down(&self, action: Action) -> bool {
        match action {
            Action::Left => self.left,
            Action::Right => self.right,
            Action::Jump => self.jump,
            Action::Down => self.down,
        }
    }

    /// Actions newly pressed relative to the previous snapshot.
    pub fn edges(self, prev: ButtonSnapshot) -> impl Iterator<Item = Action> {
        ACTIONS
            .into_iter()
            .filter(move |&a| self.is_down(a) && !prev.is_down(a))
    }
}

/// Double-tap detector: two presses of the same action within the window.
///
/// Every press updates the stored `(action, tick)` pair unconditionally, so
/// a third rapid press pairs with the second and fires again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TapDetector {
    last_action: Option<Action>,
    last_press_tick: u64,
}

impl TapDetector {
    /// Feed one press edge; returns true when it completes a double tap.
    pub fn press(&mut self, action: Action, now: u64) -> bool {
        let double = self.last_action == Some(action)
            && now.saturating_sub(self.last_press_tick) < u64::from(DOUBLE_TAP_WINDOW_TICKS);
        self.last_action = Some(action);
        self.last_press_tick = now;
        double
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_double_tap_inside_window() {
        let mut taps = TapDetector::default();
        assert!(!taps.press(Action::Right, 100));
        assert!(taps.press(Action::Right, 110));
    }

    #[test]
    fn test_double_tap_rejected_at_window_edge() {
        // 300 ms is 18 ticks at 60 Hz; a gap of exactly 18 must not fire.
        let mut taps = TapDetector::default();
        assert!(!taps.press(Action::Jump, 100));
        assert!(!taps.press(Action::Jump, 118));
        assert!(taps.press(Action::Jump, 119 + 16));
    }

    #[test]
    fn test_other_action_breaks_the_pair() {
        let mut taps = TapDetector::default();
        assert!(!taps.press(Action::Right, 100));
        assert!(!taps.press(Action::Jump, 105));
        // The jump press replaced the stored action.
        assert!(!taps.press(Action::Right, 108));
        assert!(taps.press(Action::Right, 110));
    }

    #[test]
    fn test_fires_once_per_pair() {
        let mut taps = TapDetector::default();
        let fired: Vec<bool> = (0..4).map(|i| taps.press(Action::Down, 100 + i * 5)).collect();
        // Each press pairs with its predecessor; the first has none.
        assert_eq!(fired, vec![false, true, true, true]);
    }

    #[test]
    fn test_edges_reports_new_presses_only() {
        let prev = ButtonSnapshot { right: true, ..Default::default() };
        let now = ButtonSnapshot { right: true, jump: true, ..Default::default() };
        let edges: Vec<Action> = now.edges(prev).collect();
        assert_eq!(edges, vec![Action::Jump]);
    }

    proptest! {
        #[test]
        fn prop_window_boundary_is_exact(gap in 1u64..60) {
            let mut taps = TapDetector::default();
            taps.press(Action::Left, 1_000);
            let fired = taps.press(Action::Left, 1_000 + gap);
            prop_assert_eq!(fired, gap < 18);
        }
    }
}
