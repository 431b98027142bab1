#![allow(dead_code)]

use std::time::Duration;

use citygen::prelude::*;
use criterion::{Criterion, Throughput};
use glam::DVec2;
use rand::RngCore;

pub const SAMPLE_SIZE: usize = 20;
pub const WARM_UP: Duration = Duration::from_secs(1);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(2);

pub const VIEWPORT_SIZE: DVec2 = DVec2::new(1920.0, 1080.0);

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

pub fn elements_throughput(elements: usize) -> Throughput {
    Throughput::Elements(elements.max(1) as u64)
}

pub fn viewport() -> Aabb {
    Aabb::new(DVec2::ZERO, VIEWPORT_SIZE)
}

/// Two rotated grids blended with a radial centre, roughly a small town.
pub fn town_field() -> TensorField {
    TensorField::new()
        .with_basis(BasisField::grid_with_falloff(0.2, DVec2::new(500.0, 400.0), 900.0, 1.0))
        .with_basis(BasisField::grid_with_falloff(1.1, DVec2::new(1500.0, 700.0), 900.0, 1.0))
        .with_basis(BasisField::radial_with_falloff(DVec2::new(960.0, 540.0), 350.0, 2.0))
}

pub fn random_point(rng: &mut impl RngCore, extent: DVec2) -> DVec2 {
    let unit = |v: u64| (v >> 11) as f64 / (1u64 << 53) as f64;
    DVec2::new(unit(rng.next_u64()) * extent.x, unit(rng.next_u64()) * extent.y)
}
