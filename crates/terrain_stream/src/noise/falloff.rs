//! Square falloff mask for island maps.
//!
//! Zero in the middle, rising steeply towards 1 at the edges. Height map
//! building subtracts the mask from the noise before the height curve.

use crate::constants::{FALLOFF_SHIFT, FALLOFF_STEEPNESS};

/// Row-major `size x size` falloff mask.
pub fn generate(size: usize) -> Vec<f32> {
  let mut values = Vec::with_capacity(size * size);
  for j in 0..size {
    for i in 0..size {
      let x = i as f32 / size as f32 * 2.0 - 1.0;
      let y = j as f32 / size as f32 * 2.0 - 1.0;
      values.push(evaluate(x.abs().max(y.abs())));
    }
  }
  values
}

/// Falloff weight for a normalized distance from the centre in `[0, 1]`.
///
/// `v^a / (v^a + (b - b*v)^a)`
#[inline]
pub fn evaluate(v: f32) -> f32 {
  let a = FALLOFF_STEEPNESS;
  let b = FALLOFF_SHIFT;
  let inner = v.powf(a);
  inner / (inner + (b - b * v).powf(a))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_centre_and_edge() {
    assert_eq!(evaluate(0.0), 0.0);
    assert_eq!(evaluate(1.0), 1.0);
  }

  #[test]
  fn test_monotonic() {
    let mut prev = evaluate(0.0);
    for step in 1..=100 {
      let v = evaluate(step as f32 / 100.0);
      assert!(v >= prev, "falloff must not decrease ({} < {})", v, prev);
      prev = v;
    }
  }

  #[test]
  fn test_mask_shape() {
    let size = 10;
    let mask = generate(size);
    assert_eq!(mask.len(), 100);
    // Corner (0, 0) maps to v = 1
    assert_eq!(mask[0], 1.0);
    // Cell 5 maps to x = 0
    assert_eq!(mask[5 * size + 5], 0.0);
    assert!(mask.iter().all(|&v| (0.0..=1.0).contains(&v)));
  }

  #[test]
  fn test_symmetric_about_centre_line() {
    let size = 8;
    let mask = generate(size);
    for j in 0..size {
      for i in 0..size {
        assert_eq!(mask[j * size + i], mask[i * size + j], "mask must be symmetric");
      }
    }
  }
}
