// Browser bindings for the engine: vibration, synthesized clicks, device
// orientation and the animation frame loop.
//
// Listener and frame handles are guards; dropping one detaches it.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{AudioContext, DeviceOrientationEvent, OscillatorType, Window};

use crate::error::{EngineError, EngineResult};
use crate::model::VibrationPattern;
use crate::state::{ClickSynth, Haptics};

const ORIENTATION_EVENT: &str = "deviceorientation";

pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

fn unavailable(what: &str) -> EngineError {
    EngineError::ActuatorUnavailable(what.to_string())
}

fn js_err(e: JsValue) -> EngineError {
    EngineError::ActuatorUnavailable(e.as_string().unwrap_or_else(|| format!("{e:?}")))
}

/// `navigator.vibrate`, where the browser has it.
#[derive(Debug, Clone, Copy, Default)]
pub struct NavigatorHaptics;

impl Haptics for NavigatorHaptics {
    fn vibrate(&self, pattern: &VibrationPattern) -> EngineResult<()> {
        let navigator = web_sys::window().ok_or_else(|| unavailable("no window"))?.navigator();
        if !js_sys::Reflect::has(&navigator, &JsValue::from_str("vibrate")).unwrap_or(false) {
            return Err(unavailable("vibration api missing"));
        }
        let accepted = match pattern {
            VibrationPattern::Pulse(ms) => navigator.vibrate_with_duration(*ms),
            VibrationPattern::Sequence(seq) => {
                let arr: js_sys::Array = seq.iter().map(|ms| JsValue::from(*ms)).collect();
                navigator.vibrate_with_pattern(&arr)
            }
        };
        if accepted { Ok(()) } else { Err(unavailable("vibration refused")) }
    }
}

/// Descending sine click on a throwaway `AudioContext`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebClickSynth;

impl WebClickSynth {
    const START_HZ: f32 = 600.0;
    const END_HZ: f32 = 50.0;
    const START_GAIN: f32 = 0.12;
    const END_GAIN: f32 = 0.001;
    const SWEEP_S: f64 = 0.06;
    const STOP_S: f64 = 0.07;
    const CLOSE_AFTER_MS: i32 = 150;
}

impl ClickSynth for WebClickSynth {
    fn play_click(&self) -> EngineResult<()> {
        let window = web_sys::window().ok_or_else(|| unavailable("no window"))?;
        let ctx = AudioContext::new().map_err(js_err)?;
        let osc = ctx.create_oscillator().map_err(js_err)?;
        let gain = ctx.create_gain().map_err(js_err)?;
        let t = ctx.current_time();

        osc.set_type(OscillatorType::Sine);
        osc.frequency().set_value_at_time(Self::START_HZ, t).map_err(js_err)?;
        osc.frequency()
            .exponential_ramp_to_value_at_time(Self::END_HZ, t + Self::SWEEP_S)
            .map_err(js_err)?;
        gain.gain().set_value_at_time(Self::START_GAIN, t).map_err(js_err)?;
        gain.gain()
            .exponential_ramp_to_value_at_time(Self::END_GAIN, t + Self::SWEEP_S)
            .map_err(js_err)?;

        osc.connect_with_audio_node(&gain).map_err(js_err)?;
        gain.connect_with_audio_node(&ctx.destination()).map_err(js_err)?;
        osc.start().map_err(js_err)?;
        osc.stop_with_when(t + Self::STOP_S).map_err(js_err)?;

        // Release the context once the voice has finished.
        let close = Closure::once_into_js(move || {
            let _ = ctx.close();
        });
        window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                close.unchecked_ref(),
                Self::CLOSE_AFTER_MS,
            )
            .map_err(js_err)?;
        Ok(())
    }
}

type OrientationHandler = Closure<dyn FnMut(DeviceOrientationEvent)>;

/// Subscription to `deviceorientation`, including the permission prompt
/// some platforms require first.
pub struct OrientationListener {
    window: Window,
    handler: Rc<OrientationHandler>,
    alive: Rc<Cell<bool>>,
}

impl OrientationListener {
    /// `on_status` receives `Ok` once readings are flowing, or the reason
    /// they never will.
    pub fn start(
        mut on_reading: impl FnMut(Option<f64>, Option<f64>) + 'static,
        on_status: impl Fn(EngineResult<()>) + 'static,
    ) -> Option<Self> {
        let Some(window) = web_sys::window() else {
            on_status(Err(EngineError::SensorUnavailable("no window".into())));
            return None;
        };
        let ctor = js_sys::Reflect::get(&window, &JsValue::from_str("DeviceOrientationEvent"))
            .unwrap_or(JsValue::UNDEFINED);
        if ctor.is_undefined() {
            on_status(Err(EngineError::SensorUnavailable("no orientation api".into())));
            return None;
        }

        let handler: Rc<OrientationHandler> =
            Rc::new(Closure::wrap(Box::new(move |e: DeviceOrientationEvent| {
                on_reading(e.beta(), e.gamma())
            }) as Box<dyn FnMut(_)>));
        let listener = Self {
            window: window.clone(),
            handler: handler.clone(),
            alive: Rc::new(Cell::new(true)),
        };

        let request = js_sys::Reflect::get(&ctor, &JsValue::from_str("requestPermission"))
            .ok()
            .and_then(|f| f.dyn_into::<js_sys::Function>().ok());
        let Some(request) = request else {
            on_status(attach(&window, &handler));
            return Some(listener);
        };

        let promise = request.call0(&ctor).ok().and_then(|p| p.dyn_into::<js_sys::Promise>().ok());
        let Some(promise) = promise else {
            on_status(Err(EngineError::SensorUnavailable("permission request failed".into())));
            return Some(listener);
        };
        let alive = listener.alive.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let answer = wasm_bindgen_futures::JsFuture::from(promise).await;
            if !alive.get() {
                return;
            }
            match answer.ok().and_then(|v| v.as_string()).as_deref() {
                Some("granted") => on_status(attach(&window, &handler)),
                other => on_status(Err(EngineError::SensorUnavailable(format!(
                    "permission {}",
                    other.unwrap_or("rejected")
                )))),
            }
        });
        Some(listener)
    }
}

fn attach(window: &Window, handler: &OrientationHandler) -> EngineResult<()> {
    window
        .add_event_listener_with_callback(ORIENTATION_EVENT, handler.as_ref().unchecked_ref())
        .map_err(|e| EngineError::SensorUnavailable(format!("{e:?}")))
}

impl Drop for OrientationListener {
    fn drop(&mut self) {
        self.alive.set(false);
        let _ = self.window.remove_event_listener_with_callback(
            ORIENTATION_EVENT,
            (*self.handler).as_ref().unchecked_ref(),
        );
    }
}

type FrameCallback = Closure<dyn FnMut(f64)>;

/// `requestAnimationFrame` loop calling `on_frame` with wall-clock milliseconds.
pub struct FrameLoop {
    window: Window,
    raf_id: Rc<Cell<Option<i32>>>,
    callback: Rc<RefCell<Option<FrameCallback>>>,
}

impl FrameLoop {
    pub fn start(mut on_frame: impl FnMut(f64) + 'static) -> Option<Self> {
        let window = web_sys::window()?;
        let raf_id = Rc::new(Cell::new(None));
        let callback: Rc<RefCell<Option<FrameCallback>>> = Rc::new(RefCell::new(None));
        {
            let window_loop = window.clone();
            let raf_id_loop = raf_id.clone();
            let callback_loop = callback.clone();
            *callback.borrow_mut() = Some(Closure::wrap(Box::new(move |_ts: f64| {
                on_frame(now_ms());
                if let Some(cb) = callback_loop.borrow().as_ref() {
                    if let Ok(id) = window_loop.request_animation_frame(cb.as_ref().unchecked_ref()) {
                        raf_id_loop.set(Some(id));
                    }
                }
            }) as Box<dyn FnMut(f64)>));
        }
        if let Some(cb) = callback.borrow().as_ref() {
            raf_id.set(window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
        }
        Some(Self { window, raf_id, callback })
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        if let Some(id) = self.raf_id.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
        // Breaks the closure's reference to its own cell.
        self.callback.borrow_mut().take();
    }
}
