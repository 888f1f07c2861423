use std::rc::Rc;

use log::LevelFilter;

mod catalog;
mod components;
mod config;
mod error;
mod model;
mod platform;
mod state;
mod util;

use components::app::{App, AppProps};

fn main() {
    util::init_logging(LevelFilter::Info);
    let config = config::load_tuning();
    match catalog::load() {
        Ok(items) => {
            log::info!("pillar starting with {} items", items.len());
            yew::Renderer::<App>::with_props(AppProps { items: Rc::new(items), config }).render();
        }
        Err(e) => log::error!("catalog unusable: {e}"),
    }
}
