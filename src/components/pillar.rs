use std::rc::Rc;

use yew::prelude::*;

use crate::model::Item;

const RADIUS_PX: f64 = 350.0;

#[derive(Properties, PartialEq)]
pub struct PillarProps {
    pub items: Rc<Vec<Item>>,
    pub active_index: usize,
    /// Live carousel position; the pillar follows it continuously.
    pub position: f64,
    pub spacing: f64,
    pub gamma: f64,
    pub intensity: f64,
    pub on_select: Callback<usize>,
}

/// Rotation of item `idx` around the pillar axis, wrapped to `[-180, 180)`.
pub fn item_angle(idx: usize, position: f64, spacing: f64, count: usize) -> f64 {
    if count == 0 || spacing <= 0.0 {
        return 0.0;
    }
    let slots = idx as f64 + position / spacing;
    let deg = slots * 360.0 / count as f64;
    (deg + 180.0).rem_euclid(360.0) - 180.0
}

#[function_component(Pillar)]
pub fn pillar(props: &PillarProps) -> Html {
    let n = props.items.len();
    let blur = 4.0 + props.intensity * 24.0;
    let cards = props.items.iter().enumerate().map(|(idx, item)| {
        let angle = item_angle(idx, props.position, props.spacing, n);
        let active = idx == props.active_index;
        let look = if active {
            "opacity:1; box-shadow:0 0 80px rgba(34,211,238,0.7); outline:2px solid rgba(34,211,238,0.6); z-index:30;"
        } else {
            "opacity:0.1; filter:blur(8px) grayscale(100%); z-index:10;"
        };
        let style = format!(
            "position:absolute; width:288px; height:192px; border-radius:16px; overflow:hidden; \
             display:flex; flex-direction:column; justify-content:flex-end; padding:24px; cursor:pointer; \
             backface-visibility:hidden; transform-style:preserve-3d; \
             transform:rotateX({:.2}deg) translateZ({RADIUS_PX}px) scale({}); {look}",
            -angle,
            if active { 1.05 } else { 0.75 },
        );
        let backdrop = format!(
            "position:absolute; inset:-250px; opacity:0.9; pointer-events:none; \
             background:url({}) center/cover; filter:blur({blur:.1}px) brightness({:.2});",
            item.image,
            1.0 - props.intensity * 0.45,
        );
        let onclick = {
            let on_select = props.on_select.clone();
            Callback::from(move |_: MouseEvent| on_select.emit(idx))
        };
        html! {
            <div key={item.id.clone()} {style} {onclick}>
                <div style={backdrop} />
                <div style="position:relative; z-index:20; background:rgba(0,0,0,0.5); padding:16px; margin:-16px; border-radius:16px; pointer-events:none;">
                    <span style="font-size:10px; letter-spacing:0.7em; color:#22d3ee; font-weight:bold;">{ format!("PROJECT {:02}", idx + 1) }</span>
                    <h3 style="font-size:24px; margin:4px 0;">{ &item.title }</h3>
                    <p style="font-size:12px; letter-spacing:0.45em; text-transform:uppercase; margin:0;">{ &item.category }</p>
                </div>
            </div>
        }
    });

    html! {
        <div style="width:100%; height:60vh; position:relative; display:flex; align-items:center; justify-content:center; perspective:1500px;">
            <div style={format!(
                "position:relative; width:100%; height:100%; display:flex; align-items:center; justify-content:center; \
                 transform-style:preserve-3d; transform:rotateY({:.2}deg);",
                props.gamma * 0.3
            )}>
                { for cards }
            </div>
        </div>
    }
}
