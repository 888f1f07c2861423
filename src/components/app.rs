use std::cell::RefCell;
use std::rc::Rc;

use web_sys::TouchEvent;
use yew::prelude::*;

use super::{detail_view::DetailView, pillar::Pillar, radial_hub::RadialHub};
use crate::config::InteractionConfig;
use crate::model::{DiveState, Item, ViewState};
use crate::platform::web::{FrameLoop, NavigatorHaptics, OrientationListener, WebClickSynth, now_ms};
use crate::state::touch::Point;
use crate::state::{InteractionSession, TouchInput, TouchState};

pub type WebSession = InteractionSession<NavigatorHaptics, WebClickSynth>;
type SessionRef = Rc<RefCell<Option<WebSession>>>;

#[derive(Properties, PartialEq)]
pub struct AppProps {
    pub items: Rc<Vec<Item>>,
    pub config: InteractionConfig,
}

fn touch_points(e: &TouchEvent) -> Vec<Point> {
    let touches = e.touches();
    (0..touches.length())
        .filter_map(|i| touches.item(i))
        .map(|t| (t.client_x() as f64, t.client_y() as f64))
        .collect()
}

/// Run `f` against the live session, if there is one.
fn with_session(session: &SessionRef, f: impl FnOnce(&mut WebSession)) {
    if let Some(s) = session.borrow_mut().as_mut() {
        f(s);
    }
}

#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
    let view = use_reducer(ViewState::default);
    let session: SessionRef = use_mut_ref(|| None);
    let touch = use_mut_ref(|| TouchState::new(props.config.tap_slop_px));

    // Session lifecycle: build, subscribe the view, start frame loop and tilt sensor.
    {
        let session = session.clone();
        let view = view.clone();
        let config = props.config.clone();
        let item_count = props.items.len();
        use_effect_with((), move |_| {
            match InteractionSession::new(config, item_count, NavigatorHaptics, WebClickSynth) {
                Ok(mut s) => {
                    s.subscribe(move |n| view.dispatch(*n));
                    *session.borrow_mut() = Some(s);
                }
                Err(e) => log::error!("interaction session not started: {e}"),
            }
            let frames = {
                let session = session.clone();
                FrameLoop::start(move |now| with_session(&session, |s| s.on_frame(now)))
            };
            let tilt = {
                let readings = session.clone();
                let status = session.clone();
                OrientationListener::start(
                    move |beta, gamma| with_session(&readings, |s| s.on_orientation(beta, gamma)),
                    move |result| {
                        with_session(&status, |s| match result {
                            Ok(()) => s.on_sensor_granted(),
                            Err(e) => s.on_sensor_unavailable(e),
                        })
                    },
                )
            };
            move || {
                drop(tilt);
                drop(frames);
                // Dropping the session also drops any reminder schedule.
                session.borrow_mut().take();
            }
        });
    }

    let on_touch = {
        let session = session.clone();
        let touch = touch.clone();
        Callback::from(move |e: TouchEvent| {
            let inputs = touch.borrow_mut().update(&touch_points(&e));
            with_session(&session, |s| {
                for input in inputs {
                    match input {
                        TouchInput::Drag(sample) => s.on_drag(sample),
                        TouchInput::Pinch(sample) => s.on_pinch(sample, now_ms()),
                    }
                }
            });
        })
    };
    let on_select = {
        let session = session.clone();
        Callback::from(move |idx: usize| {
            // Rejections are logged by the session.
            with_session(&session, |s| {
                let _ = s.on_tap(idx);
            });
        })
    };
    let on_close = {
        let session = session.clone();
        Callback::from(move |_| with_session(&session, |s| s.close_detail(now_ms())))
    };
    let on_hub_press = {
        let session = session.clone();
        Callback::from(move |_| with_session(&session, |s| s.on_hub_press()))
    };
    let on_hub_release = {
        let session = session.clone();
        Callback::from(move |_| with_session(&session, |s| s.on_hub_release()))
    };

    let tilt = view.tilt;
    let intensity = view.tilt_intensity(props.config.tilt_full_scale_deg);
    let glow = format!(
        "position:fixed; inset:0; pointer-events:none; opacity:0.4; filter:blur(100px); \
         background:radial-gradient(circle at {:.1}% {:.1}%, #22d3ee 0%, transparent 60%); \
         transform:translate({:.1}px, {:.1}px);",
        50.0 + tilt.gamma_deg,
        50.0 + tilt.beta_deg,
        tilt.gamma_deg * 2.0,
        tilt.beta_deg * 2.0
    );
    let diving = view.dive == DiveState::Diving;
    let content = if diving {
        let item = props.items.get(view.active_index).cloned();
        match item {
            Some(item) => html! { <DetailView {item} on_close={on_close} /> },
            None => html! {},
        }
    } else {
        html! { <Pillar
            items={props.items.clone()}
            active_index={view.active_index}
            position={view.position}
            spacing={props.config.item_spacing}
            gamma={tilt.gamma_deg}
            {intensity}
            on_select={on_select}
        /> }
    };

    html! {
        <div
            style="position:relative; width:100vw; height:100vh; overflow:hidden; background:#000; color:#fff; touch-action:none;"
            ontouchstart={on_touch.clone()}
            ontouchmove={on_touch.clone()}
            ontouchend={on_touch.clone()}
            ontouchcancel={on_touch}
        >
            <div style={glow} />
            { content }
            <RadialHub
                active_index={view.active_index}
                total={props.items.len()}
                expanded={view.hub_expanded}
                diving={diving}
                on_press={on_hub_press}
                on_release={on_hub_release}
            />
            <div style="position:fixed; top:32px; right:32px; text-align:right; font-family:monospace; font-size:12px; pointer-events:none;">
                <div style="font-size:10px; letter-spacing:0.4em; color:#22d3ee; opacity:0.6;">{"COORDINATES"}</div>
                { format!("{:.1}° X / {:.1}° Y", tilt.gamma_deg, tilt.beta_deg) }
            </div>
        </div>
    }
}
