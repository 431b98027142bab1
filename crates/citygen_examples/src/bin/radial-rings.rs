use std::collections::BTreeMap;

use citygen::prelude::*;
use citygen_examples::{init_tracing, render_roads_to_png, RenderConfig, RoadStyle};
use glam::DVec2;

fn main() -> anyhow::Result<()> {
    init_tracing();
    let viewport = Aabb::new(DVec2::ZERO, DVec2::new(1000.0, 1000.0));

    let field = TensorField::new().with_basis(BasisField::radial_with_falloff(
        viewport.centre(),
        480.0,
        1.0,
    ));

    // Ring roads and spokes only.
    let params: ParameterTable = BTreeMap::from([(
        RoadType::HighStreet,
        default_parameters()[&RoadType::HighStreet]
            .clone()
            .with_d_sep(60.0)
            .with_d_circle(15.0),
    )]);

    let mut generator =
        RoadGenerator::try_new(Box::new(ThreeTapIntegrator::new(field)), params, viewport)?;
    let summary = generator.generate();
    if let Some(rings) = summary.category(RoadType::HighStreet) {
        tracing::info!("{} closed rings.", rings.closed_loops);
    }

    let mut config = RenderConfig::new((1000, 1000), viewport).with_background([15, 20, 30]);
    config.set_road_style(RoadType::HighStreet, RoadStyle { color: [120, 200, 255], width: 2 });
    render_roads_to_png(&generator, &config, "radial-rings.png")?;
    Ok(())
}
