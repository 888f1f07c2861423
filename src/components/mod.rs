pub mod app;
pub mod detail_view;
pub mod pillar;
pub mod radial_hub;
