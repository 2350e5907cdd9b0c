use glam::Vec2;
use poisson_field::prelude::*;
use poisson_field_examples::{init_tracing, render_points_to_png, PointStyle, RenderConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let mut rng = StdRng::seed_from_u64(7);
    let mut field = PoissonField::new(SamplingSpace::new(100.0, 100.0, 4.0));
    field.fill_disc(&mut rng);

    // Evict everything within 20 units of the center.
    let center = Vec2::new(50.0, 50.0);
    let doomed: Vec<usize> = field
        .grid()
        .iter()
        .filter(|(_, point)| (*point - center).length() < 20.0)
        .map(|(index, _)| index)
        .collect();
    for index in doomed {
        field.remove_at_index(index);
    }
    println!("evicted {} points", field.removed_len());

    let survivors: Vec<Vec2> = field.grid().iter().map(|(_, p)| p).collect();
    let patches: Vec<Vec2> = field
        .fill_hole(&mut rng)
        .iter()
        .map(|p| p.position)
        .collect();
    println!("patched with {} points", patches.len());

    let config =
        RenderConfig::new((1000, 1000), Vec2::new(100.0, 100.0)).with_background([220, 220, 220]);

    render_points_to_png(
        &[
            (
                survivors.as_slice(),
                PointStyle {
                    color: [120, 120, 120],
                    radius: 5,
                },
            ),
            (
                patches.as_slice(),
                PointStyle {
                    color: [214, 39, 40],
                    radius: 5,
                },
            ),
        ],
        &config,
        "field-remove-and-heal.png",
    )
}
