// Tuning constants for gestures, springs and feedback timing.
//
// Defaults reproduce the shipped feel. A partial JSON override can be
// supplied through `localStorage` for on-device tuning; it is read once at
// startup and never written back.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

const TUNING_KEY: &str = "kinetic_pillar_tuning";

/// Mass-spring-damper parameters for one animation style.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpringParams {
    pub stiffness: f64,
    pub damping: f64,
    pub mass: f64,
}

impl SpringParams {
    /// Release-to-slot settle: heavy and well damped.
    pub const SETTLE: Self = Self { stiffness: 180.0, damping: 24.0, mass: 2.2 };
    /// Tap-to-select travel: softer and lighter.
    pub const SELECT: Self = Self { stiffness: 140.0, damping: 20.0, mass: 1.5 };

    fn is_valid(&self) -> bool {
        self.stiffness > 0.0 && self.damping > 0.0 && self.mass > 0.0
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Track distance between neighbouring slots.
    pub item_spacing: f64,
    /// Multiplier applied to raw drag movement.
    pub drag_sensitivity: f64,
    /// Pixels of finger spread per unit of pinch scale.
    pub pinch_distance_divisor: f64,
    pub scale_min: f64,
    pub scale_max: f64,
    /// Browsing -> Diving once scale rises above this.
    pub dive_enter: f64,
    /// Diving -> Browsing once scale falls below this.
    pub dive_exit: f64,
    pub settle_spring: SpringParams,
    pub select_spring: SpringParams,
    /// Spring is at rest when both position error and speed are below these.
    pub rest_delta: f64,
    pub rest_speed: f64,
    /// Largest frame step (seconds) the integrator accepts.
    pub max_frame_step: f64,
    /// Combined |beta| + |gamma| that maps to full tilt intensity.
    pub tilt_full_scale_deg: f64,
    pub reminder_delay_ms: f64,
    pub reminder_period_ms: f64,
    /// Movement a single finger may make before a touch becomes a drag.
    pub tap_slop_px: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            item_spacing: 150.0,
            drag_sensitivity: 1.8,
            pinch_distance_divisor: 200.0,
            scale_min: 0.8,
            scale_max: 3.0,
            dive_enter: 2.2,
            dive_exit: 1.2,
            settle_spring: SpringParams::SETTLE,
            select_spring: SpringParams::SELECT,
            rest_delta: 0.01,
            rest_speed: 0.01,
            max_frame_step: 1.0 / 20.0,
            tilt_full_scale_deg: 45.0,
            reminder_delay_ms: 800.0,
            reminder_period_ms: 3500.0,
            tap_slop_px: 8.0,
        }
    }
}

impl InteractionConfig {
    /// Parse a (possibly partial) JSON override on top of the defaults.
    pub fn from_json(raw: &str) -> EngineResult<Self> {
        let cfg: Self =
            serde_json::from_str(raw).map_err(|e| EngineError::InvalidConfig(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> EngineResult<()> {
        if !(self.item_spacing > 0.0) {
            return Err(EngineError::InvalidConfig("item_spacing must be positive".into()));
        }
        if !(self.pinch_distance_divisor > 0.0) {
            return Err(EngineError::InvalidConfig(
                "pinch_distance_divisor must be positive".into(),
            ));
        }
        if !(self.scale_min < self.scale_max) {
            return Err(EngineError::InvalidConfig("scale_min must be below scale_max".into()));
        }
        if !(self.dive_exit < self.dive_enter) {
            return Err(EngineError::InvalidConfig(format!(
                "dive_exit ({}) must be below dive_enter ({})",
                self.dive_exit, self.dive_enter
            )));
        }
        if !self.settle_spring.is_valid() || !self.select_spring.is_valid() {
            return Err(EngineError::InvalidConfig("spring parameters must be positive".into()));
        }
        if !(self.max_frame_step > 0.0) || !(self.reminder_period_ms > 0.0) {
            return Err(EngineError::InvalidConfig("time steps must be positive".into()));
        }
        Ok(())
    }
}

/// Defaults, overlaid with the tuning stored in `localStorage` if present and valid.
pub fn load_tuning() -> InteractionConfig {
    let raw = web_sys::window()
        .and_then(|win| win.local_storage().ok().flatten())
        .and_then(|store| store.get_item(TUNING_KEY).ok().flatten());
    match raw {
        Some(raw) => InteractionConfig::from_json(&raw).unwrap_or_else(|e| {
            log::warn!("ignoring stored tuning: {e}");
            InteractionConfig::default()
        }),
        None => InteractionConfig::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(InteractionConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let cfg = InteractionConfig::from_json(r#"{ "item_spacing": 120.0 }"#).unwrap();
        assert_eq!(cfg.item_spacing, 120.0);
        assert_eq!(cfg.settle_spring, SpringParams::SETTLE);
        assert_eq!(cfg.dive_enter, 2.2);
    }

    #[test]
    fn inverted_dive_thresholds_rejected() {
        let err = InteractionConfig::from_json(r#"{ "dive_enter": 1.0, "dive_exit": 1.5 }"#)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));
    }

    #[test]
    fn malformed_json_rejected() {
        assert!(InteractionConfig::from_json("{ item_spacing: ").is_err());
    }

    #[test]
    fn zero_mass_rejected() {
        let raw = r#"{ "select_spring": { "stiffness": 140.0, "damping": 20.0, "mass": 0.0 } }"#;
        assert!(InteractionConfig::from_json(raw).is_err());
    }
}
