//! Shader-side scene state: root markers, pan/zoom, and viewport sizing.
//!
//! The fragment shader receives the placed roots as a fixed-length uniform
//! array, so [`RootSet::pack`] always produces exactly [`MAX_ROOTS`] entries
//! and fills the unused tail with a sentinel far outside any reachable
//! screen coordinate.

use glam::Vec2;

/// Capacity of the `roots` uniform array in the shader.
pub const MAX_ROOTS: usize = 100;

/// Marks an unused slot in the packed uniform array.
pub const EMPTY_SLOT: Vec2 = Vec2::new(-999_999_999.0, -999_999_999.0);

/// Screen-space root markers placed by the user.
#[derive(Debug, Clone, Default)]
pub struct RootSet {
  roots: Vec<Vec2>,
}

impl RootSet {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.roots.len()
  }

  pub fn is_empty(&self) -> bool {
    self.roots.is_empty()
  }

  /// Place a root at `point`.
  pub fn add(&mut self, point: Vec2) {
    self.roots.push(point);
  }

  /// Index of the root nearest to `point`, if any roots exist.
  pub fn find_closest(&self, point: Vec2) -> Option<usize> {
    let mut best = f32::MAX;
    let mut id = None;
    for (i, root) in self.roots.iter().enumerate() {
      let distance = root.distance(point);
      if distance < best {
        best = distance;
        id = Some(i);
      }
    }
    id
  }

  /// Remove the root nearest to `point`, returning it if one existed.
  pub fn remove_closest(&mut self, point: Vec2) -> Option<Vec2> {
    let id = self.find_closest(point)?;
    Some(self.roots.remove(id))
  }

  /// Drag the root nearest to `point` to a new position.
  pub fn move_closest(&mut self, point: Vec2, to: Vec2) {
    if let Some(id) = self.find_closest(point) {
      self.roots[id] = to;
    }
  }

  /// Number of live entries the shader should read, capped at the uniform
  /// capacity.
  pub fn valid(&self) -> usize {
    self.roots.len().min(MAX_ROOTS)
  }

  /// Pack the roots into the fixed-size uniform layout.
  pub fn pack(&self) -> [Vec2; MAX_ROOTS] {
    let mut list = [EMPTY_SLOT; MAX_ROOTS];
    for (slot, root) in list.iter_mut().zip(self.roots.iter()) {
      *slot = *root;
    }
    list
  }
}

/// Pan/zoom state driving the tiling shader's `offset` and `zoomFactor`
/// uniforms.
#[derive(Debug, Clone)]
pub struct PanZoom {
  pub offset: Vec2,
  pub zoom: f32,
  pub speed: f32,
}

impl PanZoom {
  pub fn new(zoom: f32, speed: f32) -> Self {
    Self {
      offset: Vec2::ZERO,
      zoom,
      speed,
    }
  }

  /// Advance the offset along `direction` for a frame lasting `delta`
  /// seconds. The step grows as the view zooms out so panning feels uniform
  /// on screen.
  pub fn pan(&mut self, direction: Vec2, delta: f32) {
    self.offset += direction.normalize_or_zero() * delta / self.zoom * self.speed;
  }
}

/// Render-target sizing derived from the window size and a resolution scale.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
  pub width: u32,
  pub height: u32,
  pub resolution_scale: f32,
}

impl Viewport {
  pub fn new(window_width: f32, window_height: f32, resolution_scale: f32) -> Self {
    Self {
      width: (window_width * resolution_scale) as u32,
      height: (window_height * resolution_scale) as u32,
      resolution_scale,
    }
  }

  /// Scale applied to the sprite so the reduced-resolution texture still
  /// fills the window.
  pub fn sprite_scale(&self) -> Vec2 {
    Vec2::splat(1.0 / self.resolution_scale)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn find_closest_picks_the_nearest_root() {
    let mut roots = RootSet::new();
    roots.add(Vec2::new(0.0, 0.0));
    roots.add(Vec2::new(100.0, 0.0));
    roots.add(Vec2::new(0.0, 100.0));
    assert_eq!(roots.find_closest(Vec2::new(90.0, 5.0)), Some(1));
  }

  #[test]
  fn find_closest_on_an_empty_set_is_none() {
    assert_eq!(RootSet::new().find_closest(Vec2::ZERO), None);
  }

  #[test]
  fn remove_closest_drops_exactly_one_root() {
    let mut roots = RootSet::new();
    roots.add(Vec2::new(0.0, 0.0));
    roots.add(Vec2::new(100.0, 0.0));
    let removed = roots.remove_closest(Vec2::new(99.0, 1.0));
    assert_eq!(removed, Some(Vec2::new(100.0, 0.0)));
    assert_eq!(roots.len(), 1);
  }

  #[test]
  fn move_closest_repositions_in_place() {
    let mut roots = RootSet::new();
    roots.add(Vec2::new(0.0, 0.0));
    roots.add(Vec2::new(100.0, 0.0));
    roots.move_closest(Vec2::new(99.0, 0.0), Vec2::new(50.0, 50.0));
    assert_eq!(roots.len(), 2);
    assert_eq!(roots.find_closest(Vec2::new(50.0, 50.0)), Some(1));
  }

  #[test]
  fn pack_fills_the_tail_with_the_sentinel() {
    let mut roots = RootSet::new();
    roots.add(Vec2::new(1.0, 2.0));
    let packed = roots.pack();
    assert_eq!(packed.len(), MAX_ROOTS);
    assert_eq!(packed[0], Vec2::new(1.0, 2.0));
    assert_eq!(packed[1], EMPTY_SLOT);
    assert_eq!(packed[MAX_ROOTS - 1], EMPTY_SLOT);
  }

  #[test]
  fn valid_is_capped_at_the_uniform_capacity() {
    let mut roots = RootSet::new();
    for i in 0..(MAX_ROOTS + 5) {
      roots.add(Vec2::new(i as f32, 0.0));
    }
    assert_eq!(roots.valid(), MAX_ROOTS);
    // Packing silently drops the overflow.
    assert_eq!(roots.pack()[MAX_ROOTS - 1], Vec2::new(99.0, 0.0));
  }

  #[test]
  fn pan_scales_with_delta_and_inverse_zoom() {
    let mut view = PanZoom::new(0.1, 100.0);
    view.pan(Vec2::new(1.0, 0.0), 0.016);
    assert!((view.offset.x - 0.016 / 0.1 * 100.0).abs() < 1e-4);
    assert_eq!(view.offset.y, 0.0);
  }

  #[test]
  fn pan_with_no_direction_stays_put() {
    let mut view = PanZoom::new(0.1, 100.0);
    view.pan(Vec2::ZERO, 0.016);
    assert_eq!(view.offset, Vec2::ZERO);
  }

  #[test]
  fn viewport_scales_pixel_dimensions() {
    let view = Viewport::new(1920.0, 1080.0, 0.25);
    assert_eq!((view.width, view.height), (480, 270));
    assert_eq!(view.sprite_scale(), Vec2::splat(4.0));
  }
}
