// Damped spring integrator for slot animations.
//
// Semi-implicit Euler over fixed sub-steps: F = -k*x - c*v, a = F / m.
// Frame steps are clamped so a stalled tab cannot launch the value.

use crate::config::SpringParams;

const SUBSTEP: f64 = 1.0 / 240.0;

#[derive(Debug, Clone)]
pub struct Spring {
    value: f64,
    velocity: f64,
    target: f64,
    params: SpringParams,
    rest_delta: f64,
    rest_speed: f64,
}

impl Spring {
    pub fn new(from: f64, to: f64, velocity: f64, params: SpringParams) -> Self {
        Self { value: from, velocity, target: to, params, rest_delta: 0.01, rest_speed: 0.01 }
    }

    pub fn with_rest(mut self, rest_delta: f64, rest_speed: f64) -> Self {
        self.rest_delta = rest_delta;
        self.rest_speed = rest_speed;
        self
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn at_rest(&self) -> bool {
        (self.value - self.target).abs() < self.rest_delta && self.velocity.abs() < self.rest_speed
    }

    /// Advance by `dt` seconds (clamped to `max_step`). Returns true once at
    /// rest, at which point the value sits exactly on the target.
    pub fn step(&mut self, dt: f64, max_step: f64) -> bool {
        let dt = dt.clamp(0.0, max_step);
        let steps = (dt / SUBSTEP).ceil().max(1.0) as usize;
        let h = dt / steps as f64;
        let SpringParams { stiffness, damping, mass } = self.params;
        for _ in 0..steps {
            let force = -stiffness * (self.value - self.target) - damping * self.velocity;
            self.velocity += force / mass * h;
            self.value += self.velocity * h;
        }
        if self.at_rest() {
            self.value = self.target;
            self.velocity = 0.0;
            return true;
        }
        false
    }
}
