#![forbid(unsafe_code)]

mod rendering;

pub use rendering::{init_tracing, render_roads_to_png, RenderConfig, RoadStyle};
