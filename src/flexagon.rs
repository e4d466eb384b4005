use itertools::Itertools;
use three_d::{CpuMaterial, CpuMesh, Indices, Positions, Srgba, Vec2, Vec3};
use tracing::{debug, info};

use crate::{
    error::FlexResult,
    params::FlexagonParams,
    sides::{assign_sides, Material, SideAssignment},
    strip::{FaceIdx, Strip},
    utils::opaque,
    uv::build_uv,
};

/// A fully generated flexagon: the unfolded strip, which side each triangle belongs to, and
/// the UV layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Flexagon {
    params: FlexagonParams,
    strip: Strip,
    sides: SideAssignment,
    /// Three UV points per face of `strip`, in face order
    uvs: Vec<Vec2>,
}

impl Flexagon {
    /// Generate the flexagon described by `params`
    pub fn generate(params: &FlexagonParams) -> FlexResult<Self> {
        params.validate()?;

        let strip = Strip::build(params.scale, params.sides);
        strip.check()?;
        let sides = assign_sides(strip.face_count(), params.sides)?;
        let uvs = build_uv(&strip, params.uv_seed);
        debug_assert_eq!(uvs.len(), strip.face_count() * 3);

        info!(
            scale = params.scale,
            sides = params.sides,
            vertices = strip.vert_count(),
            triangles = strip.face_count(),
            "Generated flexagon"
        );
        Ok(Self {
            params: *params,
            strip,
            sides,
            uvs,
        })
    }

    pub fn params(&self) -> &FlexagonParams {
        &self.params
    }

    pub fn strip(&self) -> &Strip {
        &self.strip
    }

    pub fn sides(&self) -> &SideAssignment {
        &self.sides
    }

    pub fn materials(&self) -> &[Material] {
        self.sides.materials()
    }

    pub fn uvs(&self) -> &[Vec2] {
        &self.uvs
    }

    /// The three UV points of the given `face`
    pub fn face_uvs(&self, face: FaceIdx) -> [Vec2; 3] {
        let first = face.index() * 3;
        [self.uvs[first], self.uvs[first + 1], self.uvs[first + 2]]
    }
}

///////////////
// RENDERING //
///////////////

impl Flexagon {
    /// Convert this flexagon into a [`CpuMesh`] which can be handed to a `three-d` renderer.
    ///
    /// Faces don't share UV points, so every face gets its own copy of its three vertices.
    /// Each vertex is colored with its face's material.  Every face is flat and anti-clockwise,
    /// so every normal is `+z`.
    pub fn cpu_mesh(&self) -> CpuMesh {
        let (verts, colors, tri_indices) = self.triangulate();
        debug!(vertices = verts.len(), "Built CPU mesh");

        let converted_colors = colors.into_iter().map(opaque).collect_vec();
        let normals = vec![Vec3::unit_z(); verts.len()];
        CpuMesh {
            positions: Positions::F32(verts),
            colors: Some(converted_colors),
            normals: Some(normals),
            uvs: Some(self.uvs.clone()),
            indices: Indices::U32(tri_indices),
            ..Default::default()
        }
    }

    /// One [`CpuMaterial`] per side, in slot order
    pub fn cpu_materials(&self) -> Vec<CpuMaterial> {
        self.materials()
            .iter()
            .map(|m| CpuMaterial {
                name: m.name.clone(),
                albedo: opaque(m.color),
                roughness: 0.7,
                metallic: 0.0,
                ..Default::default()
            })
            .collect_vec()
    }

    fn triangulate(&self) -> (Vec<Vec3>, Vec<Srgba>, Vec<u32>) {
        let mut verts = Vec::with_capacity(self.strip.face_count() * 3);
        let mut colors = Vec::with_capacity(self.strip.face_count() * 3);
        let mut tri_indices = Vec::with_capacity(self.strip.face_count() * 3);

        for (face_idx, face) in self.strip.faces_enumerated() {
            let first_vert_idx = verts.len() as u32;
            verts.extend_from_slice(&face.vert_positions(&self.strip));
            let color = self.sides.material(face_idx).color;
            colors.extend(std::iter::repeat(color).take(3));
            tri_indices.extend_from_slice(&[
                first_vert_idx,
                first_vert_idx + 1,
                first_vert_idx + 2,
            ]);
        }
        (verts, colors, tri_indices)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use three_d::vec3;

    use super::*;
    use crate::{
        error::FlexError,
        params::{MAX_SCALE, MIN_SCALE},
        uv::apex,
    };

    #[test]
    fn generate_trihexaflexagon() {
        let flexagon = Flexagon::generate(&FlexagonParams::new(1.0, 3).unwrap()).unwrap();
        assert_eq!(flexagon.strip().vert_count(), 17);
        assert_eq!(flexagon.strip().face_count(), 18);
        assert_eq!(flexagon.sides().slots().len(), 18);
        assert_eq!(flexagon.materials().len(), 3);
        assert_eq!(flexagon.uvs().len(), 54);
    }

    #[test]
    fn generate_rejects_invalid_params() {
        let params = FlexagonParams {
            scale: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            Flexagon::generate(&params),
            Err(FlexError::InvalidParameter { name: "scale", .. })
        ));
        let params = FlexagonParams {
            sides: 4,
            ..Default::default()
        };
        assert!(matches!(
            Flexagon::generate(&params),
            Err(FlexError::InvalidParameter { name: "sides", .. })
        ));
    }

    #[test]
    fn face_uvs_end_at_apex() {
        let flexagon = Flexagon::generate(&FlexagonParams::new(2.0, 6).unwrap()).unwrap();
        for face in 0..flexagon.strip().face_count() {
            let [_, _, c] = flexagon.face_uvs(FaceIdx::new(face));
            assert_eq!(c, apex());
        }
    }

    #[test]
    fn cpu_mesh_duplicates_vertices_per_face() {
        let flexagon = Flexagon::generate(&FlexagonParams::default()).unwrap();
        let mesh = flexagon.cpu_mesh();
        assert_eq!(mesh.positions.len(), 54);
        assert_eq!(mesh.uvs.as_ref().map(Vec::len), Some(54));

        let Positions::F32(positions) = &mesh.positions else {
            panic!("Expected f32 positions");
        };
        let first_face = flexagon.strip().get_face(FaceIdx::new(0));
        assert_eq!(
            positions[..3],
            first_face.vert_positions(flexagon.strip())
        );

        // Colors are opaque versions of the material colors
        let colors = mesh.colors.as_ref().unwrap();
        let first_material = flexagon.sides().material(FaceIdx::new(0));
        assert_eq!(colors[0], opaque(first_material.color));
        assert_eq!(colors[0].a, 255);

        // All normals point up out of the flat strip
        for normal in mesh.normals.as_ref().unwrap() {
            assert_relative_eq!(*normal, vec3(0.0, 0.0, 1.0), epsilon = 1e-5);
        }
    }

    #[test]
    fn cpu_mesh_normals_at_extreme_scales() {
        for scale in [MIN_SCALE, 1e30, MAX_SCALE] {
            let flexagon = Flexagon::generate(&FlexagonParams::new(scale, 6).unwrap()).unwrap();
            let mesh = flexagon.cpu_mesh();
            let Positions::F32(positions) = &mesh.positions else {
                panic!("Expected f32 positions");
            };
            assert!(positions.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
            for normal in mesh.normals.as_ref().unwrap() {
                assert_eq!(*normal, Vec3::unit_z());
            }
        }
    }

    #[test]
    fn cpu_materials_follow_palette() {
        let flexagon = Flexagon::generate(&FlexagonParams::new(1.0, 6).unwrap()).unwrap();
        let materials = flexagon.cpu_materials();
        assert_eq!(materials.len(), 6);
        assert_eq!(materials[3].name, "Side 4 (Yellow)");
        assert_eq!(
            (materials[3].albedo.r, materials[3].albedo.g, materials[3].albedo.b),
            (255, 255, 0)
        );
    }
}
