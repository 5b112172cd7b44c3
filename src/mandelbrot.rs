//! CPU reference implementation of the escape-time iteration the shader
//! renders, kept around for checking shader output against a known-good
//! result.

use num_complex::Complex64;

/// Bailout radius used by the renderer.
const BAILOUT: f64 = 3.0;

/// Whether `c` stays bounded through `limit` iterations of `r = r^2 + c`.
pub fn in_set(c: Complex64, limit: u32) -> bool {
  let mut r = Complex64::new(0.0, 0.0);
  for i in 0..limit {
    r = if i == 0 { c } else { r * r + c };
    if r.norm() > BAILOUT {
      return false;
    }
  }
  true
}

/// Map a render-target pixel coordinate to its point on the complex plane.
///
/// Scales the low-resolution pixel back up to window coordinates, recentres
/// on the window midpoint, then divides by the zoom factor.
pub fn pixel_to_plane(
  pixel: Complex64,
  window_width: f64,
  window_height: f64,
  resolution_scale: f64,
  zoom: f64,
) -> Complex64 {
  (pixel * (1.0 / resolution_scale) - Complex64::new(window_width / 2.0, window_height / 2.0))
    / zoom
}
