// Pinch-driven dive state with hysteresis between two thresholds.

use crate::config::InteractionConfig;
use crate::model::{DiveState, FeedbackEvent};

#[derive(Debug, Clone)]
pub struct DiveStateMachine {
    state: DiveState,
    enter_above: f64,
    exit_below: f64,
}

impl DiveStateMachine {
    pub fn new(cfg: &InteractionConfig) -> Self {
        Self { state: DiveState::Browsing, enter_above: cfg.dive_enter, exit_below: cfg.dive_exit }
    }

    pub fn state(&self) -> DiveState {
        self.state
    }

    /// Apply a new pinch scale. Returns the edge event when a threshold is crossed.
    pub fn update(&mut self, scale: f64) -> Option<FeedbackEvent> {
        match self.state {
            DiveState::Browsing if scale > self.enter_above => {
                self.state = DiveState::Diving;
                Some(FeedbackEvent::DiveEnter)
            }
            DiveState::Diving if scale < self.exit_below => self.leave(),
            _ => None,
        }
    }

    /// Leave the detail view without a pinch (close control).
    pub fn leave(&mut self) -> Option<FeedbackEvent> {
        if self.state == DiveState::Browsing {
            return None;
        }
        self.state = DiveState::Browsing;
        Some(FeedbackEvent::DiveExit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine() -> DiveStateMachine {
        DiveStateMachine::new(&InteractionConfig::default())
    }

    fn run(m: &mut DiveStateMachine, scales: &[f64]) -> Vec<FeedbackEvent> {
        scales.iter().filter_map(|&s| m.update(s)).collect()
    }

    #[test]
    fn dead_zone_never_transitions() {
        let mut m = machine();
        assert!(run(&mut m, &[1.2, 1.5, 2.0, 2.2, 1.9, 1.21, 2.19]).is_empty());
        assert_eq!(m.state(), DiveState::Browsing);

        m.update(2.5);
        assert!(run(&mut m, &[2.2, 1.5, 1.2, 2.0, 1.21]).is_empty());
        assert_eq!(m.state(), DiveState::Diving);
    }

    #[test]
    fn enter_fires_once_per_crossing() {
        let mut m = machine();
        let events = run(&mut m, &[2.0, 2.3, 2.0, 2.3, 2.9, 3.0]);
        assert_eq!(events, vec![FeedbackEvent::DiveEnter]);
    }

    #[test]
    fn single_threshold_behaviour_is_rejected() {
        // A one-threshold machine at 2.2 would exit at 2.0 and re-enter at 2.3.
        let mut m = machine();
        let events = run(&mut m, &[2.3, 2.0, 2.3, 2.0, 2.3]);
        assert_eq!(events, vec![FeedbackEvent::DiveEnter]);
        assert_eq!(m.state(), DiveState::Diving);
    }

    #[test]
    fn full_cycle() {
        let mut m = machine();
        let events = run(&mut m, &[1.0, 2.21, 2.5, 1.19, 1.0, 0.8, 2.3]);
        assert_eq!(
            events,
            vec![FeedbackEvent::DiveEnter, FeedbackEvent::DiveExit, FeedbackEvent::DiveEnter]
        );
    }

    #[test]
    fn thresholds_are_strict() {
        let mut m = machine();
        assert_eq!(m.update(2.2), None);
        m.update(2.3);
        assert_eq!(m.update(1.2), None);
        assert_eq!(m.update(1.1999), Some(FeedbackEvent::DiveExit));
    }

    #[test]
    fn leave_is_idempotent() {
        let mut m = machine();
        assert_eq!(m.leave(), None);
        m.update(3.0);
        assert_eq!(m.leave(), Some(FeedbackEvent::DiveExit));
        assert_eq!(m.leave(), None);
    }
}
