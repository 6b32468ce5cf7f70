#![allow(dead_code)]

use multiscale_transform::Image;

/// Diagonal ramp normalised to `[0, 1]`.
pub fn ramp_f32(width: usize, height: usize) -> Image<f32> {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    let denom = (width + height - 2).max(1) as f32;
    Image::from_fn(width, height, |x, y| (x + y) as f32 / denom)
}

/// High-contrast checkerboard with 8-bit samples.
pub fn checkerboard_u8(width: usize, height: usize, cell: usize) -> Image<u8> {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    assert!(cell > 0, "cell size must be positive");
    Image::from_fn(width, height, |x, y| {
        if ((x / cell) + (y / cell)) & 1 == 0 {
            32u8
        } else {
            220u8
        }
    })
}

/// Smooth background with a few point sources and deterministic texture.
/// Values stay in `[0, 1]`.
pub fn star_field(width: usize, height: usize) -> Vec<f64> {
    let stars = [(0.2, 0.3, 1.5), (0.7, 0.6, 2.5), (0.45, 0.85, 1.0)];
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let (xf, yf) = (x as f64 / width as f64, y as f64 / height as f64);
            let mut v = 0.1 + 0.05 * xf + 0.02 * ((x * 31 + y * 17) % 7) as f64;
            for &(sx, sy, sigma) in &stars {
                let dx = (xf - sx) * width as f64;
                let dy = (yf - sy) * height as f64;
                v += 0.6 * (-(dx * dx + dy * dy) / (2.0 * sigma * sigma)).exp();
            }
            data.push(v.min(1.0));
        }
    }
    data
}

pub fn star_field_f32(width: usize, height: usize) -> Image<f32> {
    let data = star_field(width, height)
        .into_iter()
        .map(|v| v as f32)
        .collect();
    Image::from_vec(width, height, data).expect("consistent dimensions")
}

pub fn star_field_f64(width: usize, height: usize) -> Image<f64> {
    Image::from_vec(width, height, star_field(width, height)).expect("consistent dimensions")
}

/// Largest absolute difference between two equally sized `f32` images.
pub fn max_abs_diff_f32(a: &Image<f32>, b: &Image<f32>) -> f32 {
    assert_eq!(a.data().len(), b.data().len(), "image sizes differ");
    a.data()
        .iter()
        .zip(b.data())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f32::max)
}
