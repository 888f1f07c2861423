// Tactile and audio feedback.
//
// Events raised during one input cycle are dispatched as a batch: repeats
// collapse, distinct patterns are chained into a single vibration sequence
// and at most one click is synthesised. Actuator failures are logged and
// dropped; navigation never waits on feedback.

use crate::error::EngineError;
use crate::model::{FeedbackEvent, VibrationPattern};

/// Pause inserted between two chained patterns.
const CHAIN_GAP_MS: u32 = 12;

pub trait Haptics {
    fn vibrate(&self, pattern: &VibrationPattern) -> Result<(), EngineError>;
}

pub trait ClickSynth {
    /// Short descending sine sweep, built fresh per call.
    fn play_click(&self) -> Result<(), EngineError>;
}

#[derive(Debug)]
pub struct FeedbackDispatcher<H, C> {
    haptics: H,
    synth: C,
}

impl<H: Haptics, C: ClickSynth> FeedbackDispatcher<H, C> {
    pub fn new(haptics: H, synth: C) -> Self {
        Self { haptics, synth }
    }

    pub fn dispatch_cycle(&self, events: &[FeedbackEvent]) {
        let Some((pattern, click)) = combine(events) else {
            return;
        };
        if let Some(pattern) = pattern {
            if let Err(e) = self.haptics.vibrate(&pattern) {
                log::debug!("vibration skipped: {e}");
            }
        }
        if click {
            if let Err(e) = self.synth.play_click() {
                log::debug!("click skipped: {e}");
            }
        }
    }

    pub fn haptics(&self) -> &H {
        &self.haptics
    }

    pub fn synth(&self) -> &C {
        &self.synth
    }
}

/// Merge one cycle's events into a single vibration request and click flag.
/// `None` when there is nothing to do.
fn combine(events: &[FeedbackEvent]) -> Option<(Option<VibrationPattern>, bool)> {
    if events.is_empty() {
        return None;
    }
    let mut seq: Vec<u32> = Vec::new();
    let mut click = false;
    let mut prev = None;
    for &ev in events {
        if prev == Some(ev) {
            continue;
        }
        prev = Some(ev);
        click |= ev.clicks();
        let Some(pattern) = ev.pattern() else { continue };
        // Odd length means the sequence ends on a buzz and needs a pause first.
        if seq.len() % 2 == 1 {
            seq.push(CHAIN_GAP_MS);
        }
        seq.extend(pattern.as_millis());
    }
    let pattern = match seq.len() {
        0 => None,
        1 => Some(VibrationPattern::Pulse(seq[0])),
        _ => Some(VibrationPattern::Sequence(seq)),
    };
    Some((pattern, click))
}

/// Frame-driven schedule for the detail-view reminder pulse: a one-shot
/// nudge after `delay_ms` plus an independent cadence every `period_ms`,
/// both counted from entry.
///
/// Exists only while the detail view is open; dropping it is the cancel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReminderSchedule {
    first_due_ms: Option<f64>,
    next_periodic_ms: f64,
    period_ms: f64,
}

impl ReminderSchedule {
    pub fn start(now_ms: f64, delay_ms: f64, period_ms: f64) -> Self {
        Self {
            first_due_ms: Some(now_ms + delay_ms),
            next_periodic_ms: now_ms + period_ms,
            period_ms,
        }
    }

    /// True when a reminder is due at `now_ms`. Deadlines that fall due in
    /// the same frame, or were missed during a stall, fold into one pulse.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        let mut due = false;
        if self.first_due_ms.is_some_and(|at| now_ms >= at) {
            self.first_due_ms = None;
            due = true;
        }
        if now_ms >= self.next_periodic_ms {
            while self.next_periodic_ms <= now_ms {
                self.next_periodic_ms += self.period_ms;
            }
            due = true;
        }
        due
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    pub struct Recorder {
        pub patterns: Rc<RefCell<Vec<VibrationPattern>>>,
        pub clicks: Rc<RefCell<usize>>,
        pub broken: bool,
    }

    impl Haptics for Recorder {
        fn vibrate(&self, pattern: &VibrationPattern) -> Result<(), EngineError> {
            if self.broken {
                return Err(EngineError::ActuatorUnavailable("no vibrator".into()));
            }
            self.patterns.borrow_mut().push(pattern.clone());
            Ok(())
        }
    }

    impl ClickSynth for Recorder {
        fn play_click(&self) -> Result<(), EngineError> {
            if self.broken {
                return Err(EngineError::ActuatorUnavailable("audio blocked".into()));
            }
            *self.clicks.borrow_mut() += 1;
            Ok(())
        }
    }

    fn dispatcher() -> (FeedbackDispatcher<Recorder, Recorder>, Recorder) {
        let rec = Recorder::default();
        (FeedbackDispatcher::new(rec.clone(), rec.clone()), rec)
    }

    #[test]
    fn single_event_maps_to_table() {
        let (d, rec) = dispatcher();
        d.dispatch_cycle(&[FeedbackEvent::Tick]);
        d.dispatch_cycle(&[FeedbackEvent::DiveEnter]);
        assert_eq!(
            *rec.patterns.borrow(),
            vec![VibrationPattern::Pulse(5), VibrationPattern::Pulse(50)]
        );
        assert_eq!(*rec.clicks.borrow(), 1);
    }

    #[test]
    fn repeated_ticks_collapse() {
        let (d, rec) = dispatcher();
        d.dispatch_cycle(&[FeedbackEvent::Tick; 3]);
        assert_eq!(*rec.patterns.borrow(), vec![VibrationPattern::Pulse(5)]);
        assert_eq!(*rec.clicks.borrow(), 1);
    }

    #[test]
    fn distinct_events_chain_without_overlap() {
        let (d, rec) = dispatcher();
        d.dispatch_cycle(&[FeedbackEvent::Catch, FeedbackEvent::Engage]);
        assert_eq!(
            *rec.patterns.borrow(),
            vec![VibrationPattern::Sequence(vec![8, 12, 10, 4, 10])]
        );
        assert_eq!(*rec.clicks.borrow(), 1);
    }

    #[test]
    fn even_pattern_chains_directly() {
        let (d, rec) = dispatcher();
        d.dispatch_cycle(&[FeedbackEvent::Reminder, FeedbackEvent::DiveExit]);
        assert_eq!(*rec.patterns.borrow(), vec![VibrationPattern::Sequence(vec![5, 5, 30])]);
        assert_eq!(*rec.clicks.borrow(), 0);
    }

    #[test]
    fn silent_events_do_nothing() {
        let (d, rec) = dispatcher();
        d.dispatch_cycle(&[]);
        d.dispatch_cycle(&[FeedbackEvent::ExpandEnd]);
        assert!(rec.patterns.borrow().is_empty());
        assert_eq!(*rec.clicks.borrow(), 0);
    }

    #[test]
    fn actuator_failures_are_swallowed() {
        let rec = Recorder { broken: true, ..Default::default() };
        let d = FeedbackDispatcher::new(rec.clone(), rec);
        d.dispatch_cycle(&[FeedbackEvent::Tap, FeedbackEvent::DiveEnter]);
    }

    #[test]
    fn reminder_schedule() {
        let mut r = ReminderSchedule::start(1000.0, 800.0, 3500.0);
        assert!(!r.poll(1799.0));
        assert!(r.poll(1800.0));
        assert!(!r.poll(1900.0));
        // The cadence counts from entry, not from the first nudge.
        assert!(!r.poll(4499.0));
        assert!(r.poll(4500.0));
        assert!(!r.poll(7999.0));
        assert!(r.poll(8000.0));
        // A long stall yields one pulse, then the cadence resumes.
        assert!(r.poll(20_000.0));
        assert!(!r.poll(20_100.0));
        assert!(r.poll(22_000.0));
    }

    #[test]
    fn reminder_deadlines_in_one_frame_pulse_once() {
        let mut r = ReminderSchedule::start(0.0, 800.0, 3500.0);
        assert!(r.poll(4000.0));
        assert!(!r.poll(4100.0));
        assert!(r.poll(7000.0));
    }
}
