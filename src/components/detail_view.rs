use yew::prelude::*;

use crate::model::Item;

#[derive(Properties, PartialEq)]
pub struct DetailViewProps {
    pub item: Item,
    pub on_close: Callback<()>,
}

#[function_component(DetailView)]
pub fn detail_view(props: &DetailViewProps) -> Html {
    let item = &props.item;
    let on_click_close = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };
    // Keep the close tap from starting a gesture on the root surface.
    let stop_touch = Callback::from(|e: TouchEvent| e.stop_propagation());

    html! {
        <div style="position:fixed; inset:0; z-index:50; background:#000; overflow-y:auto; overflow-x:hidden;">
            <div style="width:100%; height:100vh; position:relative;">
                <img src={item.image.clone()} alt={item.title.clone()}
                    style="width:100%; height:100%; object-fit:cover; opacity:0.6;" />
                <div style="position:absolute; inset:0; background:linear-gradient(to bottom, rgba(0,0,0,0.2), transparent, #000);" />
                <div style="position:absolute; bottom:80px; left:32px; right:32px;">
                    <span style="font-size:12px; font-weight:bold; letter-spacing:0.5em; color:#22d3ee; display:block; margin-bottom:8px;">{"DEEP DIVE SEQUENCE"}</span>
                    <h1 style="font-size:36px; margin:0 0 16px;">{ &item.title }</h1>
                    <p style="font-size:14px; color:rgba(255,255,255,0.7); max-width:24rem; line-height:1.6;">{ &item.description }</p>
                </div>
            </div>
            <button
                style="position:fixed; top:32px; right:32px; width:48px; height:48px; border-radius:50%; border:none; \
                       background:rgba(255,255,255,0.1); color:#fff; font-size:20px; z-index:60; cursor:pointer;"
                onclick={on_click_close}
                ontouchstart={stop_touch}
            >{"✕"}</button>
            <div style="position:fixed; bottom:32px; left:50%; transform:translateX(-50%); text-align:center; pointer-events:none;">
                <span style="font-size:8px; letter-spacing:0.4em; font-weight:bold; color:#22d3ee;">{"PINCH TO EXIT"}</span>
            </div>
        </div>
    }
}
