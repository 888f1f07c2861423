// Core data model for the pillar navigator.
// Gesture samples, view states, feedback events and the reducer the
// presentation layer subscribes to.

use serde::{Deserialize, Serialize};
use std::rc::Rc;
use yew::Reducible;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GesturePhase {
    Start,
    Move,
    End,
}

/// One raw sample of a live gesture, deltas relative to the gesture origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureSample {
    pub delta_primary: f64,
    pub delta_secondary: f64,
    pub phase: GesturePhase,
}

impl GestureSample {
    pub fn new(phase: GesturePhase, delta_primary: f64) -> Self {
        Self { delta_primary, delta_secondary: 0.0, phase }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PinchState {
    pub scale: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DiveState {
    #[default]
    Browsing,
    Diving,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CarouselState {
    pub position: f64,
    pub active_index: usize,
    pub item_count: usize,
    pub item_spacing: f64,
    /// Slot position of an in-flight settle or select, `None` when quiescent.
    pub settle_target: Option<f64>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TiltState {
    pub beta_deg: f64,
    pub gamma_deg: f64,
}

/// Vibration request: a single buzz or an on/off sequence in milliseconds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VibrationPattern {
    Pulse(u32),
    Sequence(Vec<u32>),
}

impl VibrationPattern {
    pub fn as_millis(&self) -> Vec<u32> {
        match self {
            VibrationPattern::Pulse(ms) => vec![*ms],
            VibrationPattern::Sequence(seq) => seq.clone(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FeedbackEvent {
    /// Drag crossed a slot boundary.
    Tick,
    /// Drag released, settle begins.
    Catch,
    /// Settle came to rest on a slot.
    Engage,
    /// Programmatic select.
    Tap,
    ExpandStart,
    ExpandEnd,
    DiveEnter,
    DiveExit,
    /// Periodic nudge while the detail view is open.
    Reminder,
}

impl FeedbackEvent {
    pub fn pattern(self) -> Option<VibrationPattern> {
        use FeedbackEvent::*;
        match self {
            Tick => Some(VibrationPattern::Pulse(5)),
            Catch => Some(VibrationPattern::Pulse(8)),
            Engage => Some(VibrationPattern::Sequence(vec![10, 4, 10])),
            Tap => Some(VibrationPattern::Sequence(vec![10, 5, 10])),
            ExpandStart => Some(VibrationPattern::Pulse(20)),
            ExpandEnd => None,
            DiveEnter => Some(VibrationPattern::Pulse(50)),
            DiveExit => Some(VibrationPattern::Pulse(30)),
            Reminder => Some(VibrationPattern::Sequence(vec![5, 5])),
        }
    }

    /// Whether the event is accompanied by a synthesized click.
    pub fn clicks(self) -> bool {
        matches!(
            self,
            FeedbackEvent::Tick | FeedbackEvent::Catch | FeedbackEvent::Engage | FeedbackEvent::Tap
        )
    }
}

/// A navigable entry of the static catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub title: String,
    pub category: String,
    pub image: String,
    #[serde(default)]
    pub description: String,
}

/// State changes pushed to presentation subscribers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Notification {
    IndexChanged(usize),
    DiveChanged(DiveState),
    TiltChanged(TiltState),
    PositionChanged(f64),
    ScaleChanged(f64),
    HubExpanded(bool),
}

// ---------------- Presentation reducer -----------------

#[derive(Clone, Debug, PartialEq)]
pub struct ViewState {
    pub active_index: usize,
    pub dive: DiveState,
    pub tilt: TiltState,
    pub position: f64,
    pub scale: f64,
    pub hub_expanded: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            active_index: 0,
            dive: DiveState::Browsing,
            tilt: TiltState::default(),
            position: 0.0,
            scale: 1.0,
            hub_expanded: false,
        }
    }
}

impl ViewState {
    /// Normalised tilt magnitude in `[0, 1]`, `full_scale_deg` maps to 1.
    pub fn tilt_intensity(&self, full_scale_deg: f64) -> f64 {
        crate::state::orientation::tilt_intensity(self.tilt, full_scale_deg)
    }
}

impl Reducible for ViewState {
    type Action = Notification;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        use Notification::*;
        let mut new = (*self).clone();
        match action {
            IndexChanged(idx) => new.active_index = idx,
            DiveChanged(dive) => new.dive = dive,
            TiltChanged(tilt) => new.tilt = tilt,
            PositionChanged(pos) => new.position = pos,
            ScaleChanged(scale) => new.scale = scale,
            HubExpanded(open) => new.hub_expanded = open,
        }
        // Unchanged state keeps the same Rc so subscribers skip the re-render.
        if new == *self { self } else { Rc::new(new) }
    }
}
