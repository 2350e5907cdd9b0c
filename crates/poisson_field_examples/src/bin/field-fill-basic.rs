use glam::Vec2;
use poisson_field::prelude::*;
use poisson_field_examples::{init_tracing, render_points_to_png, PointStyle, RenderConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let mut rng = StdRng::seed_from_u64(42);
    let mut field = PoissonField::new(SamplingSpace::new(100.0, 100.0, 4.0));
    let placements = field.fill_disc(&mut rng);
    println!("accepted {} points", placements.len());

    let points: Vec<Vec2> = placements.iter().map(|p| p.position).collect();
    let config =
        RenderConfig::new((1000, 1000), Vec2::new(100.0, 100.0)).with_background([220, 220, 220]);

    render_points_to_png(
        &[(
            points.as_slice(),
            PointStyle {
                color: [31, 119, 180],
                radius: 5,
            },
        )],
        &config,
        "field-fill-basic.png",
    )
}
