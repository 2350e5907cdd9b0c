//! PNG rendering helpers shared by the example binaries.
use std::path::Path;

use anyhow::Result;
use glam::Vec2;
use image::{Rgb, RgbImage};
use tracing_subscriber::EnvFilter;

/// Installs a stdout tracing subscriber honoring `RUST_LOG`, defaulting to
/// `info`.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Output image size, rendered domain, and background color.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub image_size: (u32, u32),
    pub domain_extent: Vec2,
    pub background: [u8; 3],
}

impl RenderConfig {
    pub fn new(image_size: (u32, u32), domain_extent: Vec2) -> Self {
        Self {
            image_size,
            domain_extent,
            background: [255, 255, 255],
        }
    }

    pub fn with_background(mut self, background: [u8; 3]) -> Self {
        self.background = background;
        self
    }
}

/// Disc color and pixel radius for one layer of points.
#[derive(Debug, Clone, Copy)]
pub struct PointStyle {
    pub color: [u8; 3],
    pub radius: u32,
}

/// Renders point layers as filled discs into a PNG at `path`.
///
/// Domain coordinates map linearly onto the image; points outside the
/// configured domain are clipped.
pub fn render_points_to_png(
    layers: &[(&[Vec2], PointStyle)],
    config: &RenderConfig,
    path: impl AsRef<Path>,
) -> Result<()> {
    let (width, height) = config.image_size;
    let mut image = RgbImage::from_pixel(width, height, Rgb(config.background));

    for (points, style) in layers {
        for point in *points {
            let x = (point.x / config.domain_extent.x * width as f32) as i64;
            let y = (point.y / config.domain_extent.y * height as f32) as i64;
            draw_disc(&mut image, x, y, style.radius as i64, style.color);
        }
    }

    image.save(path.as_ref())?;
    Ok(())
}

fn draw_disc(image: &mut RgbImage, center_x: i64, center_y: i64, radius: i64, color: [u8; 3]) {
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy > radius * radius {
                continue;
            }
            let x = center_x + dx;
            let y = center_y + dy;
            if x < 0 || y < 0 || x >= i64::from(image.width()) || y >= i64::from(image.height()) {
                continue;
            }
            image.put_pixel(x as u32, y as u32, Rgb(color));
        }
    }
}
