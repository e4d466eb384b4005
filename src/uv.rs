//! Per-corner UV coordinates for the strip.
//!
//! Triangles never share UV points, so a UV layer holds three points per triangle, flattened in
//! triangle order.  Each triangle is pulled towards a unit equilateral triangle with its base
//! along `(0, 0)..(1, 0)` by moving its third corner to the apex.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use three_d::{vec2, Vec2};

use crate::strip::Strip;

/// Where the UV points start before the apex correction is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum UvSeed {
    /// Each triangle starts with the corners of the unit square: `(0, 0)`, `(1, 0)`, `(1, 1)`.
    /// After correction every UV triangle is exactly equilateral.
    #[default]
    FaceCorners,
    /// Each corner starts at its vertex position, scaled so the whole strip fills the unit
    /// square.  After correction only the apexes are moved, so triangles stay skewed.
    Planar,
}

/// Apex of the unit equilateral triangle whose base runs from `(0, 0)` to `(1, 0)`
pub fn apex() -> Vec2 {
    vec2(0.5, f32::sqrt(0.75))
}

/// Build a corrected UV layer for `triangle_count` triangles, starting from the default
/// per-face layout.
pub fn build_equilateral_uv(triangle_count: usize) -> Vec<Vec2> {
    let mut uvs = face_corner_uvs(triangle_count);
    correct_apexes(&mut uvs);
    uvs
}

/// Build a corrected UV layer for `strip` from the given `seed`
pub fn build_uv(strip: &Strip, seed: UvSeed) -> Vec<Vec2> {
    match seed {
        UvSeed::FaceCorners => build_equilateral_uv(strip.face_count()),
        UvSeed::Planar => {
            let mut uvs = planar_uvs(strip);
            correct_apexes(&mut uvs);
            uvs
        }
    }
}

/// Move every third UV point onto the equilateral [`apex`].  The other two corners of each
/// triangle are left where they are.
pub fn correct_apexes(uvs: &mut [Vec2]) {
    debug_assert_eq!(uvs.len() % 3, 0, "UV layers have three points per triangle");
    let apex = apex();
    for (i, uv) in uvs.iter_mut().enumerate() {
        if (i + 1) % 3 == 0 {
            *uv = apex;
        }
    }
}

fn face_corner_uvs(triangle_count: usize) -> Vec<Vec2> {
    let corners = [vec2(0.0, 0.0), vec2(1.0, 0.0), vec2(1.0, 1.0)];
    corners
        .into_iter()
        .cycle()
        .take(triangle_count * 3)
        .collect()
}

fn planar_uvs(strip: &Strip) -> Vec<Vec2> {
    let width = strip.width();
    let height = strip.height();
    let mut uvs = Vec::with_capacity(strip.face_count() * 3);
    for face in strip.faces() {
        for pos in face.vert_positions(strip) {
            uvs.push(vec2(pos.x / width, (pos.y + height) / (2.0 * height)));
        }
    }
    uvs
}
