// Circular carousel: continuous track position, wrapped active index,
// drag updates and spring settling.
//
// Slot numbers are unwrapped (`round_half_up(-position / spacing)`) so
// boundary crossings can be counted across the wrap seam; the active index
// is the slot wrapped onto `0..item_count`.
//
// `position` has one writer at a time. Any drag sample or select replaces
// the in-flight animation, and the animation's last value is already in
// `position`, so the hand-over never jumps.

use crate::config::{InteractionConfig, SpringParams};
use crate::error::{EngineError, EngineResult};
use crate::model::{CarouselState, FeedbackEvent, Notification};
use crate::state::session::{EventQueue, SessionEvent};
use crate::state::spring::Spring;
use crate::util::{round_half_up, wrap_index};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AnimationKind {
    Settle,
    Select,
}

#[derive(Debug, Clone)]
struct Animation {
    spring: Spring,
    kind: AnimationKind,
}

#[derive(Debug, Clone)]
pub struct CarouselEngine {
    state: CarouselState,
    slot: i64,
    animation: Option<Animation>,
    settle_spring: SpringParams,
    select_spring: SpringParams,
    rest_delta: f64,
    rest_speed: f64,
    max_step: f64,
}

impl CarouselEngine {
    pub fn new(item_count: usize, cfg: &InteractionConfig) -> EngineResult<Self> {
        if item_count == 0 {
            return Err(EngineError::EmptyCatalog);
        }
        Ok(Self {
            state: CarouselState {
                position: 0.0,
                active_index: 0,
                item_count,
                item_spacing: cfg.item_spacing,
                settle_target: None,
            },
            slot: 0,
            animation: None,
            settle_spring: cfg.settle_spring,
            select_spring: cfg.select_spring,
            rest_delta: cfg.rest_delta,
            rest_speed: cfg.rest_speed,
            max_step: cfg.max_frame_step,
        })
    }

    pub fn state(&self) -> CarouselState {
        CarouselState {
            settle_target: self.animation.as_ref().map(|a| a.spring.target()),
            ..self.state
        }
    }

    pub fn position(&self) -> f64 {
        self.state.position
    }

    pub fn active_index(&self) -> usize {
        self.state.active_index
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Unwrapped slot number nearest to `position`.
    pub fn slot_of(&self, position: f64) -> i64 {
        round_half_up(-position / self.state.item_spacing) as i64
    }

    /// Resting position of the slot nearest to `position`.
    pub fn settle_target(&self, position: f64) -> f64 {
        -(self.slot_of(position) as f64) * self.state.item_spacing
    }

    /// A new gesture takes over: cancel any animation and hand back the live
    /// position as the gesture baseline.
    pub fn begin_gesture(&mut self) -> f64 {
        self.animation = None;
        self.slot = self.slot_of(self.state.position);
        self.state.position
    }

    /// Move the track under a live drag. Queues one `Tick` per slot boundary
    /// crossed since the previous sample.
    pub fn drag_to(&mut self, position: f64, queue: &mut EventQueue) {
        self.animation = None;
        self.set_position(position, queue);
        let slot = self.slot_of(position);
        let crossed = slot.saturating_sub(self.slot).unsigned_abs();
        for _ in 0..crossed.min(self.state.item_count as u64) {
            queue.push_back(SessionEvent::Feedback(FeedbackEvent::Tick));
        }
        self.slot = slot;
        self.set_active(wrap_index(slot, self.state.item_count), queue);
    }

    /// Drag released at `position`: grip, then settle onto the nearest slot.
    pub fn release(&mut self, position: f64, queue: &mut EventQueue) {
        self.drag_to(position, queue);
        queue.push_back(SessionEvent::Feedback(FeedbackEvent::Catch));
        let target = -(self.slot as f64) * self.state.item_spacing;
        let spring = Spring::new(position, target, 0.0, self.settle_spring)
            .with_rest(self.rest_delta, self.rest_speed);
        if spring.at_rest() {
            self.finish(target, AnimationKind::Settle, queue);
        } else {
            self.animation = Some(Animation { spring, kind: AnimationKind::Settle });
        }
    }

    /// Programmatic select. The index change is immediate; the track follows
    /// on the softer select spring.
    pub fn select(&mut self, index: usize, queue: &mut EventQueue) -> EngineResult<()> {
        if index >= self.state.item_count {
            return Err(EngineError::InvalidIndex { index, count: self.state.item_count });
        }
        if index == self.state.active_index {
            return Ok(());
        }
        let velocity = self.animation.take().map_or(0.0, |a| a.spring.velocity());
        let target = index as f64 * -self.state.item_spacing;
        queue.push_back(SessionEvent::Feedback(FeedbackEvent::Tap));
        self.animation = Some(Animation {
            spring: Spring::new(self.state.position, target, velocity, self.select_spring)
                .with_rest(self.rest_delta, self.rest_speed),
            kind: AnimationKind::Select,
        });
        self.slot = index as i64;
        self.set_active(index, queue);
        Ok(())
    }

    /// Advance any in-flight animation by one frame. Returns whether the
    /// track is still moving afterwards.
    pub fn tick(&mut self, dt: f64, queue: &mut EventQueue) -> bool {
        let Some(anim) = self.animation.as_mut() else {
            return false;
        };
        let done = anim.spring.step(dt, self.max_step);
        let value = anim.spring.value();
        if !done {
            self.set_position(value, queue);
            return true;
        }
        let (target, kind) = (anim.spring.target(), anim.kind);
        self.animation = None;
        self.finish(target, kind, queue);
        false
    }

    fn finish(&mut self, target: f64, kind: AnimationKind, queue: &mut EventQueue) {
        self.set_position(target, queue);
        self.slot = self.slot_of(target);
        self.set_active(wrap_index(self.slot, self.state.item_count), queue);
        if kind == AnimationKind::Settle {
            queue.push_back(SessionEvent::Feedback(FeedbackEvent::Engage));
        }
    }

    fn set_position(&mut self, position: f64, queue: &mut EventQueue) {
        if position != self.state.position {
            self.state.position = position;
            queue.push_back(SessionEvent::Notify(Notification::PositionChanged(position)));
        }
    }

    fn set_active(&mut self, index: usize, queue: &mut EventQueue) {
        if index != self.state.active_index {
            self.state.active_index = index;
            queue.push_back(SessionEvent::Notify(Notification::IndexChanged(index)));
        }
    }
}
