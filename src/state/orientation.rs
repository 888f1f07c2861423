// Device tilt sampling with a permanent zero-tilt fallback.

use crate::model::TiltState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SensorStatus {
    /// Waiting on the platform permission prompt.
    Pending,
    Active,
    /// Denied or absent. Tilt stays at zero for the rest of the session.
    Unavailable,
}

#[derive(Debug, Clone)]
pub struct OrientationSampler {
    tilt: TiltState,
    status: SensorStatus,
    full_scale_deg: f64,
}

impl OrientationSampler {
    pub fn new(full_scale_deg: f64) -> Self {
        Self { tilt: TiltState::default(), status: SensorStatus::Pending, full_scale_deg }
    }

    pub fn status(&self) -> SensorStatus {
        self.status
    }

    pub fn tilt(&self) -> TiltState {
        self.tilt
    }

    pub fn tilt_intensity(&self) -> f64 {
        tilt_intensity(self.tilt, self.full_scale_deg)
    }

    pub fn activate(&mut self) {
        if self.status == SensorStatus::Pending {
            self.status = SensorStatus::Active;
        }
    }

    pub fn degrade(&mut self) {
        self.status = SensorStatus::Unavailable;
        self.tilt = TiltState::default();
    }

    /// Overwrite the tilt from one sensor callback. Missing angles read as 0.
    /// Returns the new tilt if it differs from the previous one.
    pub fn on_reading(&mut self, beta: Option<f64>, gamma: Option<f64>) -> Option<TiltState> {
        match self.status {
            SensorStatus::Unavailable => return None,
            // A reading is proof the sensor works even without an explicit grant.
            SensorStatus::Pending => self.status = SensorStatus::Active,
            SensorStatus::Active => {}
        }
        let next = TiltState { beta_deg: beta.unwrap_or(0.0), gamma_deg: gamma.unwrap_or(0.0) };
        if next == self.tilt {
            return None;
        }
        self.tilt = next;
        Some(next)
    }
}

pub fn tilt_intensity(tilt: TiltState, full_scale_deg: f64) -> f64 {
    ((tilt.beta_deg.abs() + tilt.gamma_deg.abs()) / full_scale_deg).clamp(0.0, 1.0)
}
