//! Keyframed response curve applied to normalized noise.
//!
//! Segments between keys are cubic Hermite splines driven by each key's
//! outgoing and the next key's incoming tangent, the same shape an
//! animation curve editor produces. Outside the key range the curve holds
//! the first/last value.

use serde::{Deserialize, Serialize};

/// One curve control point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
  pub time: f32,
  pub value: f32,
  #[serde(default)]
  pub in_tangent: f32,
  #[serde(default)]
  pub out_tangent: f32,
}

impl Keyframe {
  pub const fn new(time: f32, value: f32, in_tangent: f32, out_tangent: f32) -> Self {
    Self {
      time,
      value,
      in_tangent,
      out_tangent,
    }
  }

  /// Key with zero tangents.
  pub const fn flat(time: f32, value: f32) -> Self {
    Self::new(time, value, 0.0, 0.0)
  }
}

/// Height response curve, evaluated per sample on worker threads.
///
/// Pure and immutable after construction; cloned into each request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Keyframe>", into = "Vec<Keyframe>")]
pub struct HeightCurve {
  keys: Vec<Keyframe>,
}

impl HeightCurve {
  /// Curve through `keys`, sorted by time.
  pub fn from_keys(mut keys: Vec<Keyframe>) -> Self {
    keys.sort_by(|a, b| a.time.total_cmp(&b.time));
    Self { keys }
  }

  /// Identity on `[0, 1]`.
  pub fn linear() -> Self {
    Self::from_keys(vec![
      Keyframe::new(0.0, 0.0, 1.0, 1.0),
      Keyframe::new(1.0, 1.0, 1.0, 1.0),
    ])
  }

  /// Smoothstep from 0 to 1.
  pub fn ease_in_out() -> Self {
    Self::from_keys(vec![Keyframe::flat(0.0, 0.0), Keyframe::flat(1.0, 1.0)])
  }

  pub fn constant(value: f32) -> Self {
    Self::from_keys(vec![Keyframe::flat(0.0, value)])
  }

  pub fn keys(&self) -> &[Keyframe] {
    &self.keys
  }

  /// Evaluate the curve at `t`.
  ///
  /// An empty curve passes `t` through unchanged.
  pub fn evaluate(&self, t: f32) -> f32 {
    let (first, last) = match (self.keys.first(), self.keys.last()) {
      (Some(first), Some(last)) => (first, last),
      _ => return t,
    };

    if t <= first.time {
      return first.value;
    }
    if t >= last.time {
      return last.value;
    }

    // First key strictly after t; t > first.time so this is at least 1
    let next = self.keys.partition_point(|k| k.time <= t);
    hermite(&self.keys[next - 1], &self.keys[next], t)
  }
}

impl Default for HeightCurve {
  fn default() -> Self {
    Self::linear()
  }
}

impl From<Vec<Keyframe>> for HeightCurve {
  fn from(keys: Vec<Keyframe>) -> Self {
    Self::from_keys(keys)
  }
}

impl From<HeightCurve> for Vec<Keyframe> {
  fn from(curve: HeightCurve) -> Self {
    curve.keys
  }
}

#[inline]
fn hermite(k0: &Keyframe, k1: &Keyframe, t: f32) -> f32 {
  let dt = k1.time - k0.time;
  if dt <= 0.0 {
    return k1.value;
  }

  let s = (t - k0.time) / dt;
  let s2 = s * s;
  let s3 = s2 * s;

  let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
  let h10 = s3 - 2.0 * s2 + s;
  let h01 = -2.0 * s3 + 3.0 * s2;
  let h11 = s3 - s2;

  h00 * k0.value + h10 * dt * k0.out_tangent + h01 * k1.value + h11 * dt * k1.in_tangent
}

#[cfg(test)]
#[path = "curve_test.rs"]
mod curve_test;
