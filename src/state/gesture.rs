// Gesture tracking: raw drag/pinch samples in, normalised output out.
//
// Each live gesture carries an explicit `GestureSession` holding the
// baseline captured when it began. Between gestures the tracker is inert
// and every `Move`/`End` sample without a session is dropped.

use crate::config::InteractionConfig;
use crate::model::{GesturePhase, GestureSample, PinchState};

/// Baseline captured at the moment a gesture begins.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureSession {
    pub baseline: f64,
}

/// Output of a drag sample, as an absolute track position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragUpdate {
    Moved(f64),
    Released(f64),
}

#[derive(Debug, Clone)]
pub struct GestureTracker {
    drag: Option<GestureSession>,
    pinch: Option<GestureSession>,
    scale: f64,
    sensitivity: f64,
    pinch_divisor: f64,
    scale_min: f64,
    scale_max: f64,
}

impl GestureTracker {
    pub fn new(cfg: &InteractionConfig) -> Self {
        Self {
            drag: None,
            pinch: None,
            scale: 1.0,
            sensitivity: cfg.drag_sensitivity,
            pinch_divisor: cfg.pinch_distance_divisor,
            scale_min: cfg.scale_min,
            scale_max: cfg.scale_max,
        }
    }

    /// Feed a drag sample. `live_position` is only consulted on `Start`, and
    /// must be the carousel's current (possibly mid-animation) position.
    pub fn drag(
        &mut self,
        sample: GestureSample,
        live_position: impl FnOnce() -> f64,
    ) -> Option<DragUpdate> {
        if !sample.delta_primary.is_finite() {
            return None;
        }
        let session = match sample.phase {
            GesturePhase::Start => {
                let session = GestureSession { baseline: live_position() };
                self.drag = Some(session);
                session
            }
            GesturePhase::Move => self.drag?,
            GesturePhase::End => self.drag.take()?,
        };
        let position = session.baseline + sample.delta_primary * self.sensitivity;
        Some(match sample.phase {
            GesturePhase::End => DragUpdate::Released(position),
            _ => DragUpdate::Moved(position),
        })
    }

    /// Feed a pinch sample whose primary delta is the change in finger
    /// distance since the pinch began.
    pub fn pinch(&mut self, sample: GestureSample) -> Option<PinchState> {
        let session = match sample.phase {
            GesturePhase::Start => {
                // Resume from the live scale rather than from 1.0.
                let session = GestureSession { baseline: (self.scale - 1.0) * self.pinch_divisor };
                self.pinch = Some(session);
                session
            }
            GesturePhase::Move => self.pinch?,
            GesturePhase::End => self.pinch.take()?,
        };
        let cumulative = session.baseline + sample.delta_primary;
        self.scale = (1.0 + cumulative / self.pinch_divisor).clamp(self.scale_min, self.scale_max);
        Some(PinchState { scale: self.scale })
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Drop a live drag without a release sample. Returns whether one was live.
    pub fn end_drag(&mut self) -> bool {
        self.drag.take().is_some()
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn reset_scale(&mut self) {
        self.pinch = None;
        self.scale = 1.0;
    }
}
