// Raw touch points -> drag/pinch gesture samples.
//
// One finger becomes a drag only after leaving the tap slop, so plain taps
// reach the item click handler untouched. A second finger hands a live drag
// over to a pinch. After a pinch the gesture stays spent until every finger
// is lifted.

use crate::model::{GesturePhase, GestureSample};

pub type Point = (f64, f64);

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TouchInput {
    Drag(GestureSample),
    Pinch(GestureSample),
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
enum Mode {
    #[default]
    Idle,
    Pressed { origin: Point },
    Drag { origin_y: f64, last: f64 },
    Pinch { origin_dist: f64, last: f64 },
    Spent,
}

#[derive(Debug, Clone, Default)]
pub struct TouchState {
    mode: Mode,
    slop: f64,
}

fn distance(a: Point, b: Point) -> f64 {
    ((b.0 - a.0).powi(2) + (b.1 - a.1).powi(2)).sqrt()
}

impl TouchState {
    pub fn new(slop: f64) -> Self {
        Self { mode: Mode::Idle, slop }
    }

    pub fn is_idle(&self) -> bool {
        self.mode == Mode::Idle
    }

    /// Feed the full list of touches currently on the surface (after a
    /// touchstart, touchmove, touchend or touchcancel).
    pub fn update(&mut self, points: &[Point]) -> Vec<TouchInput> {
        let mut out = Vec::new();
        let drag = |phase, d| TouchInput::Drag(GestureSample::new(phase, d));
        let pinch = |phase, d| TouchInput::Pinch(GestureSample::new(phase, d));
        self.mode = match (self.mode, points) {
            (_, []) => {
                match self.mode {
                    Mode::Drag { last, .. } => out.push(drag(GesturePhase::End, last)),
                    Mode::Pinch { last, .. } => out.push(pinch(GesturePhase::End, last)),
                    _ => {}
                }
                Mode::Idle
            }
            (Mode::Pinch { origin_dist, .. }, [a, b, ..]) => {
                let last = distance(*a, *b) - origin_dist;
                out.push(pinch(GesturePhase::Move, last));
                Mode::Pinch { origin_dist, last }
            }
            (Mode::Pinch { last, .. }, [_]) => {
                out.push(pinch(GesturePhase::End, last));
                Mode::Spent
            }
            (Mode::Spent, _) => Mode::Spent,
            (mode, [a, b, ..]) => {
                if let Mode::Drag { last, .. } = mode {
                    out.push(drag(GesturePhase::End, last));
                }
                out.push(pinch(GesturePhase::Start, 0.0));
                Mode::Pinch { origin_dist: distance(*a, *b), last: 0.0 }
            }
            (Mode::Idle, [p]) => Mode::Pressed { origin: *p },
            (Mode::Pressed { origin }, [p]) => {
                if distance(origin, *p) > self.slop {
                    let dy = p.1 - origin.1;
                    out.push(drag(GesturePhase::Start, 0.0));
                    out.push(drag(GesturePhase::Move, dy));
                    Mode::Drag { origin_y: origin.1, last: dy }
                } else {
                    Mode::Pressed { origin }
                }
            }
            (Mode::Drag { origin_y, .. }, [p]) => {
                let last = p.1 - origin_y;
                out.push(drag(GesturePhase::Move, last));
                Mode::Drag { origin_y, last }
            }
        };
        out
    }
}
