//! The parameters which fully determine a generated flexagon.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    error::{FlexError, FlexResult},
    strip,
    uv::UvSeed,
};

/// The orders of flexagon which have a fold-order table
pub const SUPPORTED_SIDES: [usize; 2] = [3, 6];

/// Smallest edge length which can be built.  Below this, vertex positions lose their precision.
pub const MIN_SCALE: f32 = f32::MIN_POSITIVE;
/// Largest edge length which can be built.  The far end of a hexahexaflexagon strip sits
/// `9.5 * scale` along the x axis, which must stay finite.
pub const MAX_SCALE: f32 = 1e36;

/// Parameters for generating a flexagon.  Generation is a pure function of these values.
///
/// Parameters can be read from TOML:
/// ```toml
/// scale = 2.0
/// sides = 6
/// uv_seed = "planar"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FlexagonParams {
    /// Edge length of every triangle
    pub scale: f32,
    /// Number of sides of the folded flexagon
    pub sides: usize,
    /// How the UV layer is seeded before correction
    pub uv_seed: UvSeed,
}

impl Default for FlexagonParams {
    fn default() -> Self {
        Self {
            scale: 1.0,
            sides: 3,
            uv_seed: UvSeed::default(),
        }
    }
}

impl FlexagonParams {
    /// Create a validated set of parameters
    pub fn new(scale: f32, sides: usize) -> FlexResult<Self> {
        let params = Self {
            scale,
            sides,
            ..Self::default()
        };
        params.validate()?;
        Ok(params)
    }

    pub fn with_uv_seed(self, uv_seed: UvSeed) -> Self {
        Self { uv_seed, ..self }
    }

    /// Check that these parameters describe a flexagon which can be built
    pub fn validate(&self) -> FlexResult<()> {
        if !(MIN_SCALE..=MAX_SCALE).contains(&self.scale) {
            return Err(FlexError::invalid_scale(self.scale));
        }
        if !SUPPORTED_SIDES.contains(&self.sides) {
            return Err(FlexError::unsupported_sides(self.sides));
        }
        Ok(())
    }

    /// Parse and validate parameters from a TOML document.  Missing fields take their default
    /// values.
    pub fn from_toml_str(s: &str) -> FlexResult<Self> {
        let params: Self = toml::from_str(s)?;
        params.validate()?;
        Ok(params)
    }

    /// Load and validate parameters from a TOML file
    pub fn load(path: impl AsRef<Path>) -> FlexResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn column_count(&self) -> usize {
        strip::column_count(self.sides)
    }

    pub fn vertex_count(&self) -> usize {
        strip::vertex_count(self.sides)
    }

    pub fn triangle_count(&self) -> usize {
        strip::triangle_count(self.sides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_operator_defaults() {
        let params = FlexagonParams::default();
        assert_eq!(params.scale, 1.0);
        assert_eq!(params.sides, 3);
        assert_eq!(params.uv_seed, UvSeed::FaceCorners);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn derived_counts() {
        let params = FlexagonParams::new(1.0, 3).unwrap();
        assert_eq!(params.column_count(), 11);
        assert_eq!(params.vertex_count(), 17);
        assert_eq!(params.triangle_count(), 18);
        let params = FlexagonParams::new(2.0, 6).unwrap();
        assert_eq!(params.vertex_count(), 30);
        assert_eq!(params.triangle_count(), 36);
    }

    #[test]
    fn rejects_bad_scale() {
        for scale in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(
                FlexagonParams::new(scale, 3),
                Err(FlexError::InvalidParameter { name: "scale", .. })
            ));
        }
    }

    #[test]
    fn accepts_extreme_scales() {
        for scale in [MIN_SCALE, 1e-25, 1e-20, 1e19, 2e19, 1e30, MAX_SCALE] {
            assert!(FlexagonParams::new(scale, 6).is_ok(), "scale {scale}");
        }
        for scale in [MIN_SCALE / 2.0, MAX_SCALE * 10.0, f32::MAX] {
            assert!(matches!(
                FlexagonParams::new(scale, 3),
                Err(FlexError::InvalidParameter { name: "scale", .. })
            ));
        }
    }

    #[test]
    fn rejects_unsupported_sides() {
        for sides in [0, 2, 4, 5, 7, 12] {
            assert!(matches!(
                FlexagonParams::new(1.0, sides),
                Err(FlexError::InvalidParameter { name: "sides", .. })
            ));
        }
    }

    #[test]
    fn parse_toml() {
        let params = FlexagonParams::from_toml_str(
            r#"
            scale = 2.5
            sides = 6
            uv_seed = "planar"
            "#,
        )
        .unwrap();
        assert_eq!(params.scale, 2.5);
        assert_eq!(params.sides, 6);
        assert_eq!(params.uv_seed, UvSeed::Planar);

        let partial = FlexagonParams::from_toml_str("sides = 6").unwrap();
        assert_eq!(partial.scale, 1.0);
        assert_eq!(partial.uv_seed, UvSeed::FaceCorners);
    }

    #[test]
    fn parse_toml_errors() {
        assert!(matches!(
            FlexagonParams::from_toml_str("colour = 3"),
            Err(FlexError::Config(_))
        ));
        assert!(matches!(
            FlexagonParams::from_toml_str("sides = 5"),
            Err(FlexError::InvalidParameter { name: "sides", .. })
        ));
        assert!(matches!(
            FlexagonParams::from_toml_str("scale = -2.0"),
            Err(FlexError::InvalidParameter { name: "scale", .. })
        ));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flexagon.toml");
        std::fs::write(&path, "scale = 3.0\nsides = 6\n").unwrap();
        let params = FlexagonParams::load(&path).unwrap();
        assert_eq!(params, FlexagonParams::new(3.0, 6).unwrap());

        let missing = FlexagonParams::load(dir.path().join("missing.toml"));
        assert!(matches!(missing, Err(FlexError::Io(_))));
    }
}
