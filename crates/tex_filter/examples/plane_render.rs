//! Example: Render a textured ground plane in perspective.
//!
//! Run with: cargo run --release --example plane_render -- checker.png 4 ewa minQuadWidth

use std::env;

use anyhow::{Context, Result};
use tex_core::io::{load_image, save_image};
use tex_filter::{
    filter_batch_into, FilterMethod, FilterRequest, Footprint, Image, LevelMethod, TextureConfig,
    TextureMap, Vec2,
};

const WIDTH: usize = 640;
const HEIGHT: usize = 360;

/// Pinhole camera above an infinite ground plane, looking at the horizon.
struct PlaneCamera {
    /// Focal length in pixels
    focal: f32,
    /// Camera height above the plane
    height: f32,
    /// Screen row of the horizon
    horizon: f32,
    /// Plane area mapped to the unit texture square
    plane_width: f32,
    plane_depth: f32,
    near: f32,
}

impl PlaneCamera {
    /// Texture coordinates seen through screen position `(x, y)`, if the
    /// ray hits the plane.
    fn to_texture(&self, x: f32, y: f32) -> Option<Vec2> {
        let down = (y - self.horizon) / self.focal;
        if down <= 0.0 {
            return None;
        }
        let depth = self.height / down;
        let side = (x - WIDTH as f32 / 2.0) / self.focal * depth;
        Some(Vec2::new(
            0.5 + side / self.plane_width,
            (depth - self.near) / self.plane_depth,
        ))
    }

    /// Backward map of the pixel's four corners.
    fn footprint(&self, px: usize, py: usize) -> Option<Footprint> {
        let (x, y) = (px as f32, py as f32);
        let corners = [
            self.to_texture(x, y + 1.0)?,
            self.to_texture(x + 1.0, y + 1.0)?,
            self.to_texture(x + 1.0, y)?,
            self.to_texture(x, y)?,
        ];
        Some(Footprint::new(corners))
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        println!("Usage: plane_render <texture> [kernel-width] [method] [level-method] [output]");
        println!("\nMethods: trilinear, quadAf, ewa");
        println!("Level methods: minSideLen, minQuadWidth, minDiag, trilinear, level0");
        return Ok(());
    }

    let kernel_width: f32 = match args.get(2) {
        Some(w) => w.parse().with_context(|| format!("invalid kernel width {:?}", w))?,
        None => 4.0,
    };
    let method: FilterMethod = match args.get(3) {
        Some(m) => m.parse()?,
        None => FilterMethod::Ewa,
    };
    let level_method: LevelMethod = match args.get(4) {
        Some(m) => m.parse()?,
        None => LevelMethod::default(),
    };
    let output = args.get(5).map(String::as_str).unwrap_or("plane.png");

    let image = load_image(&args[1]).with_context(|| format!("loading {}", args[1]))?;
    println!(
        "Loaded {} ({}x{}, {} channels)",
        args[1],
        image.width(),
        image.height(),
        image.channels()
    );

    let start = std::time::Instant::now();
    let config = TextureConfig::default()
        .with_kernel_width(kernel_width)
        .with_level_method(level_method)
        .with_quad_samples(32);
    let map = TextureMap::new(&image, config)?;
    println!("Built {} levels in {:?}", map.num_levels(), start.elapsed());

    let camera = PlaneCamera {
        focal: WIDTH as f32 * 0.8,
        height: 1.0,
        horizon: HEIGHT as f32 * 0.3,
        plane_width: 8.0,
        plane_depth: 40.0,
        near: 1.0,
    };

    // Pixels that see the sky or fall off the texture stay black
    let mut visible = Vec::new();
    let mut footprints = Vec::new();
    for py in 0..HEIGHT {
        for px in 0..WIDTH {
            if let Some(fp) = camera.footprint(px, py) {
                visible.push(py * WIDTH + px);
                footprints.push(fp);
            }
        }
    }

    println!("Filtering {} footprints with {} / {}...", footprints.len(), method, level_method);
    let start = std::time::Instant::now();
    let channels = map.channels();
    let mut samples = vec![0.0; footprints.len() * channels];
    filter_batch_into(&map, method, &footprints, &FilterRequest::default(), 0, &mut samples)?;
    println!("Filtered in {:?}", start.elapsed());

    let mut pixels = vec![0.0; WIDTH * HEIGHT * channels];
    for (value, &index) in samples.chunks(channels).zip(&visible) {
        pixels[index * channels..(index + 1) * channels].copy_from_slice(value);
    }

    let rendered = Image::new(WIDTH, HEIGHT, channels, pixels)?;
    save_image(&rendered, output)?;
    println!("Saved to {}", output);

    Ok(())
}
