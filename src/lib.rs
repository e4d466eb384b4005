//! Procedural geometry for hexaflexagons.
//!
//! Given an edge length and a number of sides, this builds the flat, double-sided paper strip
//! which folds into a flexagon, works out which physical side every triangle ends up on, and
//! lays out a UV point for every triangle corner.  Generation is pure: the same parameters
//! always produce the same [`Flexagon`].
//!
//! ```no_run
//! let flexagon = flexagon::generate(1.0, 3)?;
//! assert_eq!(flexagon.strip().face_count(), 18);
//! # Ok::<(), flexagon::FlexError>(())
//! ```

mod error;
pub mod export;
mod flexagon;
mod params;
mod sides;
mod strip;
mod utils;
mod uv;
mod validate;

pub use error::{FlexError, FlexResult};
pub use flexagon::Flexagon;
pub use params::{FlexagonParams, MAX_SCALE, MIN_SCALE, SUPPORTED_SIDES};
pub use sides::{
    assign_sides, create_materials, face_order_table, Material, SideAssignment, SideSlot,
    MAX_SIDES,
};
pub use strip::{
    build_strip, column_count, triangle_count, vertex_count, Edge, EdgeId, Face, FaceIdx, Layer,
    Strip, VertIdx, Vertex,
};
pub use uv::{apex, build_equilateral_uv, build_uv, correct_apexes, UvSeed};
pub use validate::{validate, ValidationReport};

/// Generate a flexagon with the default UV layout
pub fn generate(scale: f32, sides: usize) -> FlexResult<Flexagon> {
    Flexagon::generate(&FlexagonParams::new(scale, sides)?)
}
