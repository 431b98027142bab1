use citygen::prelude::*;
use citygen_examples::{init_tracing, render_roads_to_png, RenderConfig};
use glam::DVec2;

fn main() -> anyhow::Result<()> {
    init_tracing();
    let viewport = Aabb::new(DVec2::ZERO, DVec2::new(1920.0, 1080.0));

    // Two districts with differently rotated grids.
    let field = TensorField::new()
        .with_basis(BasisField::grid_with_falloff(0.1, DVec2::new(500.0, 500.0), 1200.0, 1.0))
        .with_basis(BasisField::grid_with_falloff(0.9, DVec2::new(1500.0, 600.0), 1000.0, 1.0));

    let mut generator = RoadGenerator::try_new(
        Box::new(ThreeTapIntegrator::new(field)),
        default_parameters(),
        viewport,
    )?
    .with_seed(7);
    generator.generate();

    let config = RenderConfig::new((1920, 1080), viewport);
    render_roads_to_png(&generator, &config, "grid-city.png")?;
    Ok(())
}
