use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct RadialHubProps {
    pub active_index: usize,
    pub total: usize,
    pub expanded: bool,
    pub diving: bool,
    pub on_press: Callback<()>,
    pub on_release: Callback<()>,
}

/// Press-and-hold hub revealing one indicator bar per item.
#[function_component(RadialHub)]
pub fn radial_hub(props: &RadialHubProps) -> Html {
    // The hub's touches must not feed the carousel gesture on the root.
    let touch_start = {
        let cb = props.on_press.clone();
        Callback::from(move |e: TouchEvent| {
            e.stop_propagation();
            cb.emit(());
        })
    };
    let touch_end = {
        let cb = props.on_release.clone();
        Callback::from(move |e: TouchEvent| {
            e.stop_propagation();
            cb.emit(());
        })
    };
    let mouse_down = {
        let cb = props.on_press.clone();
        Callback::from(move |_: MouseEvent| cb.emit(()))
    };
    let mouse_up = {
        let cb = props.on_release.clone();
        Callback::from(move |_: MouseEvent| cb.emit(()))
    };

    let ring = format!(
        "position:absolute; inset:0; border-radius:50%; background:rgba(34,211,238,0.2); \
         border:1px solid rgba(34,211,238,0.3); transition:all 0.2s; transform:scale({}); opacity:{};",
        if props.expanded { 1.4 } else { 1.0 },
        if props.expanded { 0.8 } else { 0.4 },
    );
    let bars = (0..props.total).map(|i| {
        let style = if i == props.active_index {
            "width:4px; height:24px; background:#22d3ee; transform:scaleY(1.5); transition:all 0.3s;"
        } else {
            "width:4px; height:24px; background:rgba(255,255,255,0.2); transition:all 0.3s;"
        };
        html! { <div key={i} {style} /> }
    });

    html! {
        <div style="position:fixed; bottom:0; left:0; right:0; display:flex; justify-content:center; align-items:flex-end; padding-bottom:48px;">
            <div
                style="position:relative; z-index:50; width:80px; height:80px; border-radius:50%; display:flex; align-items:center; justify-content:center; cursor:pointer;"
                ontouchstart={touch_start}
                ontouchend={touch_end.clone()}
                ontouchcancel={touch_end}
                onmousedown={mouse_down}
                onmouseup={mouse_up.clone()}
                onmouseleave={mouse_up}
            >
                <div style={ring} />
                <div style="width:8px; height:8px; border-radius:50%; background:#fff; box-shadow:0 0 15px rgba(255,255,255,0.8);" />
            </div>
            <div style={format!(
                "position:absolute; bottom:128px; display:flex; gap:16px; transition:all 0.3s; opacity:{}; transform:translateY({}px);",
                if props.expanded { 1 } else { 0 },
                if props.expanded { 0 } else { 20 },
            )}>
                { for bars }
            </div>
            <div style={format!(
                "position:absolute; bottom:16px; left:0; right:0; text-align:center; pointer-events:none; transition:opacity 0.3s; opacity:{};",
                if props.diving { 0 } else { 1 },
            )}>
                <span style="font-size:8px; letter-spacing:0.6em; color:rgba(255,255,255,0.4);">{"HOLD TO REVEAL AURA"}</span>
            </div>
        </div>
    }
}
