use wasm_bindgen::prelude::*;

mod app;
mod bodies;

use app::SolarSystem;

orrery_web::export_visualizer!(SolarSystem, "solar-system");
