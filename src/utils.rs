use std::{
    cmp::Ordering,
    hash::{Hash, Hasher},
};

use ordered_float::OrderedFloat;
use three_d::{Srgba, Vec3};

/// Height of an equilateral triangle whose sides have length `scale`.  This is
/// `sqrt(scale^2 - (scale/2)^2)`, factored so that `scale^2` is never computed.
pub fn equilateral_height(scale: f32) -> f32 {
    scale * f32::sqrt(0.75)
}

/// Twice the signed area of the triangle `(a, b, c)` projected onto the XY plane.  Positive
/// when the corners run anti-clockwise when viewed from `+z`.
pub fn signed_area_xy(a: Vec3, b: Vec3, c: Vec3) -> f32 {
    let d1 = b - a;
    let d2 = c - a;
    d1.x * d2.y - d1.y * d2.x
}

/// Return `c` with its alpha channel forced to fully opaque
pub fn opaque(c: Srgba) -> Srgba {
    Srgba { a: 255, ..c }
}

/// The RGB channels of `c` as floats in `0.0..=1.0`
pub fn srgba_to_rgb_f32(c: Srgba) -> [f32; 3] {
    [c.r, c.g, c.b].map(|v| v as f32 / 255.0)
}

/// A vertex position which can be hashed and totally ordered, so that coincident vertices can
/// be found with a `HashSet`.
#[derive(Debug, Clone, Copy)]
pub struct OrderedPos(pub Vec3);

impl OrderedPos {
    fn as_ordered_floats(self) -> [OrderedFloat<f32>; 3] {
        [self.0.x, self.0.y, self.0.z].map(OrderedFloat)
    }
}

impl PartialEq for OrderedPos {
    fn eq(&self, other: &Self) -> bool {
        self.as_ordered_floats() == other.as_ordered_floats()
    }
}

impl Eq for OrderedPos {}

impl Hash for OrderedPos {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_ordered_floats().hash(state)
    }
}

impl PartialOrd for OrderedPos {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedPos {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_ordered_floats().cmp(&other.as_ordered_floats())
    }
}
