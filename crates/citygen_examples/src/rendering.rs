//! PNG rendering of generated road networks for the demos.
use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use citygen::prelude::*;
use glam::Vec2;
use image::{Rgb, RgbImage};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Installs a formatting subscriber honouring `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Stroke of one road category.
#[derive(Clone, Copy, Debug)]
pub struct RoadStyle {
    pub color: [u8; 3],
    /// Stroke width in pixels.
    pub width: u32,
}

#[derive(Clone, Debug)]
pub struct RenderConfig {
    pub image_size: (u32, u32),
    /// World region mapped onto the image.
    pub viewport: Aabb,
    pub background: [u8; 3],
    pub joining_color: [u8; 3],
    pub styles: BTreeMap<RoadType, RoadStyle>,
}

impl RenderConfig {
    pub fn new(image_size: (u32, u32), viewport: Aabb) -> Self {
        let styles = BTreeMap::from([
            (RoadType::Main, RoadStyle { color: [250, 200, 90], width: 5 }),
            (RoadType::HighStreet, RoadStyle { color: [255, 255, 255], width: 3 }),
            (RoadType::SideStreet, RoadStyle { color: [200, 200, 200], width: 1 }),
        ]);
        Self {
            image_size,
            viewport,
            background: [40, 44, 52],
            joining_color: [230, 80, 80],
            styles,
        }
    }

    pub fn with_background(mut self, background: [u8; 3]) -> Self {
        self.background = background;
        self
    }

    pub fn set_road_style(&mut self, road_type: RoadType, style: RoadStyle) -> &mut Self {
        self.styles.insert(road_type, style);
        self
    }

    fn to_pixel(&self, p: Vec2) -> Vec2 {
        let vp = self.viewport;
        let (w, h) = self.image_size;
        let u = (p.x as f64 - vp.min.x) / vp.width();
        let v = (p.y as f64 - vp.min.y) / vp.height();
        Vec2::new((u * w as f64) as f32, (v * h as f64) as f32)
    }
}

/// Draws every road of `generator` into a PNG at `path`.
///
/// Categories are drawn from the narrowest to the widest so main roads end up on top.
pub fn render_roads_to_png(
    generator: &RoadGenerator,
    config: &RenderConfig,
    path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let (w, h) = config.image_size;
    let mut img = RgbImage::from_pixel(w, h, Rgb(config.background));

    let mut drawn = 0;
    for &road_type in generator.get_road_types().iter().rev() {
        let Some(style) = config.styles.get(&road_type) else {
            continue;
        };
        for ef in Eigenfield::ALL {
            for index in 0..generator.road_count(road_type, ef) {
                let handle = RoadHandle { index, road_type, eigenfield: ef };
                let color = if generator.is_connective_road(handle) {
                    config.joining_color
                } else {
                    style.color
                };
                let points = generator.get_road_points(handle);
                for seg in points.windows(2) {
                    draw_segment(
                        &mut img,
                        config.to_pixel(seg[0]),
                        config.to_pixel(seg[1]),
                        style.width,
                        color,
                    );
                }
                drawn += 1;
            }
        }
    }

    let path = path.as_ref();
    img.save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!("Rendered {} roads to {}.", drawn, path.display());
    Ok(())
}

fn draw_segment(img: &mut RgbImage, a: Vec2, b: Vec2, width: u32, color: [u8; 3]) {
    let steps = a.distance(b).ceil().max(1.0) as u32;
    for i in 0..=steps {
        let p = a.lerp(b, i as f32 / steps as f32);
        stamp(img, p, width, color);
    }
}

fn stamp(img: &mut RgbImage, centre: Vec2, width: u32, color: [u8; 3]) {
    let r = (width as f32 / 2.0).max(0.5);
    let (w, h) = img.dimensions();
    let x0 = (centre.x - r).floor().max(0.0) as u32;
    let y0 = (centre.y - r).floor().max(0.0) as u32;
    let x1 = ((centre.x + r).ceil().max(0.0) as u32).min(w);
    let y1 = ((centre.y + r).ceil().max(0.0) as u32).min(h);
    for y in y0..y1 {
        for x in x0..x1 {
            let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - centre;
            if d.length_squared() <= r * r {
                img.put_pixel(x, y, Rgb(color));
            }
        }
    }
}
