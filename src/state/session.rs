// The interaction session: owns every engine component, routes input to
// them and drains their events once per input cycle.
//
// All entry points run synchronously on the UI thread. Each one mutates
// state, queues events, then flushes: feedback goes to the dispatcher as a
// single batch and notifications go to subscribers in queue order.

use std::collections::VecDeque;

use crate::config::InteractionConfig;
use crate::error::{EngineError, EngineResult};
use crate::model::{
    CarouselState, DiveState, FeedbackEvent, GesturePhase, GestureSample, Notification,
    TiltState,
};
use crate::state::carousel::CarouselEngine;
use crate::state::dive::DiveStateMachine;
use crate::state::feedback::{ClickSynth, FeedbackDispatcher, Haptics, ReminderSchedule};
use crate::state::gesture::{DragUpdate, GestureTracker};
use crate::state::orientation::{OrientationSampler, SensorStatus};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SessionEvent {
    Feedback(FeedbackEvent),
    Notify(Notification),
}

pub type EventQueue = VecDeque<SessionEvent>;

type Subscriber = Box<dyn FnMut(&Notification)>;

pub struct InteractionSession<H, C> {
    config: InteractionConfig,
    tracker: GestureTracker,
    dive: DiveStateMachine,
    carousel: CarouselEngine,
    orientation: OrientationSampler,
    feedback: FeedbackDispatcher<H, C>,
    reminder: Option<ReminderSchedule>,
    hub_expanded: bool,
    last_frame_ms: Option<f64>,
    queue: EventQueue,
    subscribers: Vec<Subscriber>,
}

impl<H: Haptics, C: ClickSynth> InteractionSession<H, C> {
    pub fn new(
        config: InteractionConfig,
        item_count: usize,
        haptics: H,
        synth: C,
    ) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self {
            tracker: GestureTracker::new(&config),
            dive: DiveStateMachine::new(&config),
            carousel: CarouselEngine::new(item_count, &config)?,
            orientation: OrientationSampler::new(config.tilt_full_scale_deg),
            feedback: FeedbackDispatcher::new(haptics, synth),
            reminder: None,
            hub_expanded: false,
            last_frame_ms: None,
            queue: EventQueue::new(),
            subscribers: Vec::new(),
            config,
        })
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&Notification) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn active_index(&self) -> usize {
        self.carousel.active_index()
    }

    pub fn dive_state(&self) -> DiveState {
        self.dive.state()
    }

    pub fn carousel(&self) -> CarouselState {
        self.carousel.state()
    }

    pub fn scale(&self) -> f64 {
        self.tracker.scale()
    }

    pub fn tilt(&self) -> TiltState {
        self.orientation.tilt()
    }

    pub fn tilt_intensity(&self) -> f64 {
        self.orientation.tilt_intensity()
    }

    pub fn sensor_status(&self) -> SensorStatus {
        self.orientation.status()
    }

    pub fn reminder_active(&self) -> bool {
        self.reminder.is_some()
    }

    pub fn feedback(&self) -> &FeedbackDispatcher<H, C> {
        &self.feedback
    }

    pub fn on_drag(&mut self, sample: GestureSample) {
        // The carousel is hidden while diving; only an already-live drag may finish.
        if self.dive.state() == DiveState::Diving && !self.tracker.is_dragging() {
            return;
        }
        let carousel = &mut self.carousel;
        match self.tracker.drag(sample, || carousel.begin_gesture()) {
            Some(DragUpdate::Moved(pos)) => carousel.drag_to(pos, &mut self.queue),
            Some(DragUpdate::Released(pos)) => carousel.release(pos, &mut self.queue),
            None => {}
        }
        self.flush();
    }

    pub fn on_pinch(&mut self, sample: GestureSample, now_ms: f64) {
        if sample.phase == GesturePhase::Start && self.tracker.end_drag() {
            let pos = self.carousel.position();
            self.carousel.release(pos, &mut self.queue);
        }
        if let Some(pinch) = self.tracker.pinch(sample) {
            self.queue.push_back(SessionEvent::Notify(Notification::ScaleChanged(pinch.scale)));
            if let Some(edge) = self.dive.update(pinch.scale) {
                self.dive_edge(edge, now_ms);
            }
        }
        self.flush();
    }

    /// Leave the detail view through its close control.
    pub fn close_detail(&mut self, now_ms: f64) {
        if let Some(edge) = self.dive.leave() {
            self.tracker.reset_scale();
            self.queue.push_back(SessionEvent::Notify(Notification::ScaleChanged(1.0)));
            self.dive_edge(edge, now_ms);
        }
        self.flush();
    }

    /// Tap-to-select. An out-of-range index is a caller bug and is returned
    /// unchanged as `InvalidIndex`, leaving any live drag in place.
    pub fn on_tap(&mut self, index: usize) -> EngineResult<()> {
        if self.dive.state() == DiveState::Diving {
            return Ok(());
        }
        let count = self.carousel.state().item_count;
        if index >= count {
            let e = EngineError::InvalidIndex { index, count };
            log::warn!("select rejected: {e}");
            return Err(e);
        }
        // A tap interrupting a drag settles it first, so a no-op select
        // still leaves the track on a slot.
        if self.tracker.end_drag() {
            let pos = self.carousel.position();
            self.carousel.release(pos, &mut self.queue);
        }
        let result = self.carousel.select(index, &mut self.queue);
        self.flush();
        result
    }

    pub fn on_hub_press(&mut self) {
        if !self.hub_expanded {
            self.hub_expanded = true;
            self.queue.push_back(SessionEvent::Feedback(FeedbackEvent::ExpandStart));
            self.queue.push_back(SessionEvent::Notify(Notification::HubExpanded(true)));
        }
        self.flush();
    }

    pub fn on_hub_release(&mut self) {
        if self.hub_expanded {
            self.hub_expanded = false;
            self.queue.push_back(SessionEvent::Feedback(FeedbackEvent::ExpandEnd));
            self.queue.push_back(SessionEvent::Notify(Notification::HubExpanded(false)));
        }
        self.flush();
    }

    pub fn on_sensor_granted(&mut self) {
        self.orientation.activate();
    }

    pub fn on_sensor_unavailable(&mut self, reason: EngineError) {
        log::info!("tilt disabled: {reason}");
        self.orientation.degrade();
        self.queue.push_back(SessionEvent::Notify(Notification::TiltChanged(TiltState::default())));
        self.flush();
    }

    pub fn on_orientation(&mut self, beta: Option<f64>, gamma: Option<f64>) {
        if let Some(tilt) = self.orientation.on_reading(beta, gamma) {
            self.queue.push_back(SessionEvent::Notify(Notification::TiltChanged(tilt)));
            self.flush();
        }
    }

    /// One animation frame at wall-clock `now_ms`.
    pub fn on_frame(&mut self, now_ms: f64) {
        let dt = self.last_frame_ms.map_or(0.0, |last| ((now_ms - last) / 1000.0).max(0.0));
        self.last_frame_ms = Some(now_ms);
        self.carousel.tick(dt, &mut self.queue);
        if let Some(reminder) = self.reminder.as_mut() {
            if reminder.poll(now_ms) {
                self.queue.push_back(SessionEvent::Feedback(FeedbackEvent::Reminder));
            }
        }
        self.flush();
    }

    fn dive_edge(&mut self, edge: FeedbackEvent, now_ms: f64) {
        let state = self.dive.state();
        log::info!("dive state -> {state:?}");
        self.queue.push_back(SessionEvent::Feedback(edge));
        self.queue.push_back(SessionEvent::Notify(Notification::DiveChanged(state)));
        self.reminder = match state {
            DiveState::Diving => Some(ReminderSchedule::start(
                now_ms,
                self.config.reminder_delay_ms,
                self.config.reminder_period_ms,
            )),
            DiveState::Browsing => None,
        };
    }

    fn flush(&mut self) {
        let mut cycle = Vec::new();
        while let Some(event) = self.queue.pop_front() {
            match event {
                SessionEvent::Feedback(f) => cycle.push(f),
                SessionEvent::Notify(n) => {
                    for subscriber in self.subscribers.iter_mut() {
                        subscriber(&n);
                    }
                }
            }
        }
        self.feedback.dispatch_cycle(&cycle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::VibrationPattern;
    use crate::state::feedback::tests::Recorder;
    use std::cell::RefCell;
    use std::rc::Rc;

    type TestSession = InteractionSession<Recorder, Recorder>;

    fn session() -> (TestSession, Recorder, Rc<RefCell<Vec<Notification>>>) {
        session_with(InteractionConfig::default())
    }

    fn session_with(
        cfg: InteractionConfig,
    ) -> (TestSession, Recorder, Rc<RefCell<Vec<Notification>>>) {
        let rec = Recorder::default();
        let mut s = InteractionSession::new(cfg, 5, rec.clone(), rec.clone()).unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        s.subscribe(move |n| sink.borrow_mut().push(*n));
        (s, rec, seen)
    }

    fn sample(phase: GesturePhase, delta: f64) -> GestureSample {
        GestureSample::new(phase, delta)
    }

    /// Run frames every 16 ms from `from` up to `to` inclusive.
    fn frames(s: &mut TestSession, from: f64, to: f64) {
        let mut t = from;
        while t <= to {
            s.on_frame(t);
            t += 16.0;
        }
    }

    fn dive(s: &mut TestSession, now: f64) {
        s.on_pinch(sample(GesturePhase::Start, 0.0), now);
        s.on_pinch(sample(GesturePhase::Move, 300.0), now);
        s.on_pinch(sample(GesturePhase::End, 300.0), now);
    }

    #[test]
    fn drag_release_settle_end_to_end() {
        let (mut s, rec, seen) = session();
        s.on_drag(sample(GesturePhase::Start, 0.0));
        s.on_drag(sample(GesturePhase::Move, -50.0));
        s.on_drag(sample(GesturePhase::Move, -100.0));
        s.on_drag(sample(GesturePhase::End, -100.0));
        assert_eq!(s.active_index(), 1);
        assert_eq!(
            *rec.patterns.borrow(),
            vec![VibrationPattern::Pulse(5), VibrationPattern::Pulse(8)]
        );

        frames(&mut s, 0.0, 5000.0);
        assert_eq!(s.carousel().position, -150.0);
        assert_eq!(
            rec.patterns.borrow().last(),
            Some(&VibrationPattern::Sequence(vec![10, 4, 10]))
        );
        assert_eq!(*rec.clicks.borrow(), 3);
        assert!(seen.borrow().contains(&Notification::IndexChanged(1)));
        assert_eq!(seen.borrow().last(), Some(&Notification::PositionChanged(-150.0)));
    }

    #[test]
    fn five_item_scenario_rounds_half_up() {
        // Sensitivity 1.5 keeps the release position exactly on -375.
        let cfg = InteractionConfig { drag_sensitivity: 1.5, ..Default::default() };
        let (mut s, _, _) = session_with(cfg);
        s.on_drag(sample(GesturePhase::Start, 0.0));
        s.on_drag(sample(GesturePhase::End, -250.0));
        frames(&mut s, 0.0, 5000.0);
        assert_eq!(s.active_index(), 3);
        assert_eq!(s.carousel().position, -450.0);
    }

    #[test]
    fn pinch_dives_and_reminds_until_exit() {
        let (mut s, rec, seen) = session();
        dive(&mut s, 0.0);
        assert_eq!(s.dive_state(), DiveState::Diving);
        assert!(s.reminder_active());
        assert!(seen.borrow().contains(&Notification::DiveChanged(DiveState::Diving)));

        let reminder = VibrationPattern::Sequence(vec![5, 5]);
        let reminders = |rec: &Recorder| {
            rec.patterns.borrow().iter().filter(|p| **p == reminder).count()
        };
        frames(&mut s, 0.0, 784.0);
        assert_eq!(reminders(&rec), 0);
        s.on_frame(800.0);
        assert_eq!(reminders(&rec), 1);
        // The periodic pulse keeps its own clock from entry: 3500, 7000.
        frames(&mut s, 816.0, 3488.0);
        assert_eq!(reminders(&rec), 1);
        s.on_frame(3500.0);
        assert_eq!(reminders(&rec), 2);
        frames(&mut s, 3516.0, 6988.0);
        assert_eq!(reminders(&rec), 2);
        s.on_frame(7000.0);
        assert_eq!(reminders(&rec), 3);
        assert_eq!(rec.patterns.borrow()[0], VibrationPattern::Pulse(50));

        s.on_pinch(sample(GesturePhase::Start, 0.0), 7100.0);
        s.on_pinch(sample(GesturePhase::Move, -280.0), 7100.0);
        assert_eq!(s.dive_state(), DiveState::Browsing);
        assert!(!s.reminder_active());
        let before = rec.patterns.borrow().len();
        frames(&mut s, 7100.0, 20_000.0);
        assert_eq!(rec.patterns.borrow().len(), before);
        assert_eq!(rec.patterns.borrow().last(), Some(&VibrationPattern::Pulse(30)));
    }

    #[test]
    fn dead_zone_pinch_sequence_dives_once() {
        let (mut s, rec, _) = session();
        s.on_pinch(sample(GesturePhase::Start, 0.0), 0.0);
        for d in [200.0, 260.0, 200.0, 260.0, 200.0] {
            s.on_pinch(sample(GesturePhase::Move, d), 0.0);
        }
        assert_eq!(*rec.patterns.borrow(), vec![VibrationPattern::Pulse(50)]);
    }

    #[test]
    fn close_control_exits_and_resets_scale() {
        let (mut s, rec, seen) = session();
        dive(&mut s, 0.0);
        s.close_detail(100.0);
        assert_eq!(s.dive_state(), DiveState::Browsing);
        assert!(!s.reminder_active());
        assert_eq!(s.scale(), 1.0);
        assert_eq!(rec.patterns.borrow().last(), Some(&VibrationPattern::Pulse(30)));
        assert!(seen.borrow().contains(&Notification::ScaleChanged(1.0)));

        s.on_pinch(sample(GesturePhase::Start, 0.0), 200.0);
        s.on_pinch(sample(GesturePhase::Move, 10.0), 200.0);
        assert_eq!(s.dive_state(), DiveState::Browsing);

        // Closing again is a no-op.
        let before = rec.patterns.borrow().len();
        s.close_detail(300.0);
        assert_eq!(rec.patterns.borrow().len(), before);
    }

    #[test]
    fn carousel_input_ignored_while_diving() {
        let (mut s, rec, _) = session();
        dive(&mut s, 0.0);
        let before = rec.patterns.borrow().len();
        s.on_drag(sample(GesturePhase::Start, 0.0));
        s.on_drag(sample(GesturePhase::Move, -400.0));
        assert_eq!(s.on_tap(3), Ok(()));
        assert_eq!(s.active_index(), 0);
        assert_eq!(rec.patterns.borrow().len(), before);
    }

    #[test]
    fn pinch_start_settles_a_live_drag() {
        let (mut s, _, _) = session();
        s.on_drag(sample(GesturePhase::Start, 0.0));
        s.on_drag(sample(GesturePhase::Move, -100.0));
        s.on_pinch(sample(GesturePhase::Start, 0.0), 0.0);
        assert!(s.carousel().settle_target.is_some());
        s.on_drag(sample(GesturePhase::Move, -400.0));
        assert_eq!(s.carousel().settle_target, Some(-150.0));
    }

    #[test]
    fn tap_selects_and_rejects() {
        let (mut s, rec, seen) = session();
        assert_eq!(s.on_tap(0), Ok(()));
        assert!(rec.patterns.borrow().is_empty());

        assert_eq!(s.on_tap(2), Ok(()));
        assert_eq!(s.active_index(), 2);
        assert_eq!(*rec.patterns.borrow(), vec![VibrationPattern::Sequence(vec![10, 5, 10])]);
        assert!(seen.borrow().contains(&Notification::IndexChanged(2)));

        assert_eq!(s.on_tap(7), Err(EngineError::InvalidIndex { index: 7, count: 5 }));
        assert_eq!(s.active_index(), 2);
        assert_eq!(rec.patterns.borrow().len(), 1);
    }

    #[test]
    fn tap_on_current_item_mid_drag_still_settles() {
        let (mut s, rec, _) = session();
        s.on_drag(sample(GesturePhase::Start, 0.0));
        s.on_drag(sample(GesturePhase::Move, -55.0));
        assert!((s.carousel().position + 99.0).abs() < 1e-9);
        assert_eq!(s.active_index(), 1);

        assert_eq!(s.on_tap(1), Ok(()));
        // The lift after the tap finds no live drag.
        s.on_drag(sample(GesturePhase::End, -55.0));
        frames(&mut s, 0.0, 6400.0);
        assert_eq!(s.carousel().position, -150.0);
        assert_eq!(s.carousel().settle_target, None);
        assert_eq!(s.active_index(), 1);
        assert_eq!(
            rec.patterns.borrow().last(),
            Some(&VibrationPattern::Sequence(vec![10, 4, 10]))
        );
    }

    #[test]
    fn invalid_tap_mid_drag_leaves_drag_live() {
        let (mut s, _, _) = session();
        s.on_drag(sample(GesturePhase::Start, 0.0));
        s.on_drag(sample(GesturePhase::Move, -55.0));

        assert_eq!(s.on_tap(9), Err(EngineError::InvalidIndex { index: 9, count: 5 }));
        assert!((s.carousel().position + 99.0).abs() < 1e-9);

        s.on_drag(sample(GesturePhase::End, -55.0));
        assert_eq!(s.carousel().settle_target, Some(-150.0));
        frames(&mut s, 0.0, 6400.0);
        assert_eq!(s.carousel().position, -150.0);
        assert_eq!(s.active_index(), 1);
    }

    #[test]
    fn drag_mid_select_starts_from_live_position() {
        let (mut s, _, _) = session();
        s.on_tap(3).unwrap();
        frames(&mut s, 0.0, 160.0);
        let live = s.carousel().position;
        assert!(live < 0.0 && live > -450.0);
        s.on_drag(sample(GesturePhase::Start, 0.0));
        assert_eq!(s.carousel().position, live);
        assert_eq!(s.carousel().settle_target, None);
    }

    #[test]
    fn hub_press_is_edge_triggered() {
        let (mut s, rec, seen) = session();
        s.on_hub_press();
        s.on_hub_press();
        s.on_hub_release();
        s.on_hub_release();
        assert_eq!(*rec.patterns.borrow(), vec![VibrationPattern::Pulse(20)]);
        assert_eq!(
            *seen.borrow(),
            vec![Notification::HubExpanded(true), Notification::HubExpanded(false)]
        );
    }

    #[test]
    fn sensor_loss_degrades_to_zero_tilt() {
        let (mut s, _, seen) = session();
        s.on_orientation(Some(20.0), Some(-25.0));
        assert_eq!(s.tilt_intensity(), 1.0);
        s.on_sensor_unavailable(EngineError::SensorUnavailable("denied".into()));
        assert_eq!(s.tilt(), TiltState::default());
        s.on_orientation(Some(10.0), Some(10.0));
        assert_eq!(s.tilt_intensity(), 0.0);
        assert_eq!(s.sensor_status(), SensorStatus::Unavailable);
        assert_eq!(seen.borrow().last(), Some(&Notification::TiltChanged(TiltState::default())));
    }

    #[test]
    fn navigation_survives_broken_actuators() {
        let rec = Recorder { broken: true, ..Default::default() };
        let mut s =
            InteractionSession::new(InteractionConfig::default(), 5, rec.clone(), rec).unwrap();
        s.on_drag(sample(GesturePhase::Start, 0.0));
        s.on_drag(sample(GesturePhase::End, -250.0));
        frames(&mut s, 0.0, 5000.0);
        assert_eq!(s.active_index(), 3);
        dive(&mut s, 5000.0);
        assert_eq!(s.dive_state(), DiveState::Diving);
    }

    #[test]
    fn invalid_config_is_refused() {
        let cfg = InteractionConfig { item_spacing: 0.0, ..Default::default() };
        let rec = Recorder::default();
        assert!(InteractionSession::new(cfg, 5, rec.clone(), rec).is_err());
    }
}
