use glam::Vec2;
use poisson_field::prelude::*;
use poisson_field_examples::{init_tracing, render_points_to_png, PointStyle, RenderConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;

const STEPS_PER_FRAME: usize = 8;

/// Drives generation through `next()` as a cooperative caller would,
/// budgeting a few committed points per frame instead of one blocking fill.
fn main() -> anyhow::Result<()> {
    init_tracing();

    let mut rng = StdRng::seed_from_u64(1);
    let mut field = PoissonField::new(SamplingSpace::new(100.0, 100.0, 4.0));

    let mut points: Vec<Vec2> = Vec::new();
    let mut frames = 0;
    'frames: loop {
        frames += 1;
        for _ in 0..STEPS_PER_FRAME {
            match field.next(&mut rng) {
                Some(placement) => points.push(placement.position),
                None => break 'frames,
            }
        }
    }
    println!("committed {} points over {frames} frames", points.len());

    let config =
        RenderConfig::new((1000, 1000), Vec2::new(100.0, 100.0)).with_background([220, 220, 220]);

    render_points_to_png(
        &[(
            points.as_slice(),
            PointStyle {
                color: [44, 160, 44],
                radius: 5,
            },
        )],
        &config,
        "field-stepping.png",
    )
}
