use citygen::prelude::*;
use citygen_examples::{init_tracing, render_roads_to_png, RenderConfig};
use glam::DVec2;

fn main() -> anyhow::Result<()> {
    init_tracing();
    let viewport = Aabb::new(DVec2::ZERO, DVec2::new(1920.0, 1080.0));

    let field = TensorField::new()
        .with_basis(BasisField::grid_with_falloff(0.3, DVec2::new(400.0, 300.0), 900.0, 1.0))
        .with_basis(BasisField::grid_with_falloff(1.2, DVec2::new(1600.0, 800.0), 900.0, 1.0))
        .with_basis(BasisField::radial_with_falloff(DVec2::new(960.0, 540.0), 400.0, 2.0));

    let mut generator = RoadGenerator::try_new(
        Box::new(ThreeTapIntegrator::new(field)),
        default_parameters(),
        viewport,
    )?;

    let summary = generator.generate();
    let joins = generator.connect_all();
    tracing::info!(
        "{} roads ({} discarded), {} joining roads.",
        summary.total_accepted(),
        summary.total_discarded(),
        joins
    );

    // Move the centre and regenerate on the same random stream.
    generator.field_mut().set_centre(2, DVec2::new(700.0, 500.0));
    generator.reset(viewport);
    generator.generate();
    generator.connect_all();

    let config = RenderConfig::new((1920, 1080), viewport);
    render_roads_to_png(&generator, &config, "town-with-joins.png")?;
    Ok(())
}
