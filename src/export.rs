//! Writing generated flexagons to files which other 3D tools can import.
//!
//! Wavefront OBJ keeps the per-face material assignment (one `usemtl` group per side) and the
//! per-corner UV layer (one `vt` per face corner), with the colors in a companion MTL file.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use serde::Serialize;
use tracing::info;

use crate::{
    error::FlexResult,
    flexagon::Flexagon,
    params::FlexagonParams,
    sides::SideSlot,
    strip::FaceIdx,
    utils::srgba_to_rgb_f32,
};

/// Write `<name>.obj` and `<name>.mtl` into `dir`, returning the paths of both files
pub fn write_obj(flexagon: &Flexagon, dir: &Path, name: &str) -> FlexResult<(PathBuf, PathBuf)> {
    let obj_path = dir.join(format!("{name}.obj"));
    let mtl_path = dir.join(format!("{name}.mtl"));

    let mut obj = BufWriter::new(File::create(&obj_path)?);
    write_obj_to(flexagon, &mut obj, name, &format!("{name}.mtl"))?;
    obj.flush()?;
    let mut mtl = BufWriter::new(File::create(&mtl_path)?);
    write_mtl_to(flexagon, &mut mtl)?;
    mtl.flush()?;

    info!(obj = %obj_path.display(), mtl = %mtl_path.display(), "Wrote OBJ");
    Ok((obj_path, mtl_path))
}

/// Write the OBJ geometry of `flexagon`, referring to materials in `mtl_file`
pub fn write_obj_to<W: Write>(
    flexagon: &Flexagon,
    writer: &mut W,
    name: &str,
    mtl_file: &str,
) -> FlexResult<()> {
    let strip = flexagon.strip();
    let params = flexagon.params();
    writeln!(
        writer,
        "# Hexaflexagon with {} sides, scale {}",
        params.sides, params.scale
    )?;
    writeln!(writer, "mtllib {mtl_file}")?;
    writeln!(writer, "o {name}")?;

    for v in strip.verts() {
        let pos = v.pos();
        writeln!(writer, "v {:.6} {:.6} {:.6}", pos.x, pos.y, pos.z)?;
    }
    for uv in flexagon.uvs() {
        writeln!(writer, "vt {:.6} {:.6}", uv.x, uv.y)?;
    }
    writeln!(writer, "vn 0 0 1")?;

    // Group the faces by side so that each material is only switched to once
    let mut faces_by_side = IndexMap::<SideSlot, Vec<FaceIdx>>::new();
    for m in flexagon.materials() {
        faces_by_side.insert(m.slot, Vec::new());
    }
    for (face_idx, _face) in strip.faces_enumerated() {
        let slot = flexagon.sides().slot(face_idx);
        faces_by_side.entry(slot).or_default().push(face_idx);
    }

    for (slot, faces) in &faces_by_side {
        let material = &flexagon.materials()[slot.material_index()];
        writeln!(writer, "usemtl {}", mtl_name(&material.name))?;
        for &face_idx in faces {
            let verts = strip.get_face(face_idx).verts();
            // OBJ indices are 1-based, and every face corner has its own UV point
            let first_uv = face_idx.index() * 3 + 1;
            writeln!(
                writer,
                "f {}/{}/1 {}/{}/1 {}/{}/1",
                verts[0].index() + 1,
                first_uv,
                verts[1].index() + 1,
                first_uv + 1,
                verts[2].index() + 1,
                first_uv + 2,
            )?;
        }
    }
    Ok(())
}

/// Write one MTL material per side of `flexagon`
pub fn write_mtl_to<W: Write>(flexagon: &Flexagon, writer: &mut W) -> FlexResult<()> {
    writeln!(writer, "# {} materials", flexagon.materials().len())?;
    for m in flexagon.materials() {
        let [r, g, b] = srgba_to_rgb_f32(m.color);
        writeln!(writer)?;
        writeln!(writer, "newmtl {}", mtl_name(&m.name))?;
        writeln!(writer, "Kd {r:.6} {g:.6} {b:.6}")?;
        writeln!(writer, "d 1.0")?;
        writeln!(writer, "illum 1")?;
    }
    Ok(())
}

/// MTL names can't contain whitespace
fn mtl_name(name: &str) -> String {
    name.split_whitespace()
        .map(|w| w.trim_matches(|c: char| c == '(' || c == ')'))
        .collect::<Vec<_>>()
        .join("_")
}

/// The generated output of a flexagon in a host-independent, serializable form
#[derive(Debug, Clone, Serialize)]
pub struct FlexagonDocument {
    pub params: FlexagonParams,
    pub vertices: Vec<[f32; 3]>,
    pub triangles: Vec<[usize; 3]>,
    /// 0-based index into `materials` for every triangle
    pub material_indices: Vec<usize>,
    pub materials: Vec<MaterialDocument>,
    /// Three UV points per triangle
    pub uvs: Vec<[f32; 2]>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MaterialDocument {
    pub slot: SideSlot,
    pub name: String,
    /// RGBA, with the alpha channel unused
    pub color: [f32; 4],
}

impl FlexagonDocument {
    pub fn new(flexagon: &Flexagon) -> Self {
        let strip = flexagon.strip();
        Self {
            params: *flexagon.params(),
            vertices: strip.verts().iter().map(|v| v.pos().into()).collect(),
            triangles: strip
                .faces()
                .map(|f| f.verts().map(|v| v.index()))
                .collect(),
            material_indices: flexagon.sides().material_indices(),
            materials: flexagon
                .materials()
                .iter()
                .map(|m| {
                    let [r, g, b] = srgba_to_rgb_f32(m.color);
                    MaterialDocument {
                        slot: m.slot,
                        name: m.name.clone(),
                        color: [r, g, b, m.color.a as f32 / 255.0],
                    }
                })
                .collect(),
            uvs: flexagon.uvs().iter().map(|&uv| uv.into()).collect(),
        }
    }
}

/// Serialize `flexagon` as pretty-printed JSON
pub fn to_json(flexagon: &Flexagon) -> FlexResult<String> {
    Ok(serde_json::to_string_pretty(&FlexagonDocument::new(flexagon))?)
}

/// Write `<name>.json` into `dir`, returning its path
pub fn write_json(flexagon: &Flexagon, dir: &Path, name: &str) -> FlexResult<PathBuf> {
    let path = dir.join(format!("{name}.json"));
    std::fs::write(&path, to_json(flexagon)?)?;
    info!(json = %path.display(), "Wrote JSON");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;

    fn trihexaflexagon() -> Flexagon {
        Flexagon::generate(&FlexagonParams::default()).unwrap()
    }

    fn obj_string(flexagon: &Flexagon) -> String {
        let mut buf = Vec::new();
        write_obj_to(flexagon, &mut buf, "flexagon", "flexagon.mtl").unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn obj_has_every_element() {
        let obj = obj_string(&trihexaflexagon());
        let count = |prefix: &str| obj.lines().filter(|l| l.starts_with(prefix)).count();
        assert_eq!(count("v "), 17);
        assert_eq!(count("vt "), 54);
        assert_eq!(count("f "), 18);
        assert_eq!(count("usemtl "), 3);
        assert!(obj.contains("mtllib flexagon.mtl"));
    }

    #[test]
    fn obj_faces_are_grouped_by_side() {
        let obj = obj_string(&trihexaflexagon());
        let groups = obj
            .lines()
            .skip_while(|l| !l.starts_with("usemtl"))
            .collect_vec();
        assert_eq!(groups[0], "usemtl Side_1_Red");
        // Side 1 holds faces 3, 4, 9, 10, 15 and 16 (0-based), which use UVs from 10 onwards
        assert!(groups[1].starts_with("f ") && groups[1].contains("/10/1"));
        assert_eq!(groups[7], "usemtl Side_2_Green");
    }

    #[test]
    fn mtl_lists_palette() {
        let mut buf = Vec::new();
        write_mtl_to(&trihexaflexagon(), &mut buf).unwrap();
        let mtl = String::from_utf8(buf).unwrap();
        assert!(mtl.contains("newmtl Side_1_Red\nKd 1.000000 0.000000 0.000000"));
        assert!(mtl.contains("newmtl Side_3_Blue\nKd 0.000000 0.000000 1.000000"));
        assert_eq!(mtl.matches("newmtl").count(), 3);
    }

    #[test]
    fn json_document() {
        let flexagon = Flexagon::generate(&FlexagonParams::new(2.0, 6).unwrap()).unwrap();
        let json = to_json(&flexagon).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["params"]["sides"], 6);
        assert_eq!(value["params"]["uv_seed"], "face-corners");
        assert_eq!(value["vertices"].as_array().unwrap().len(), 30);
        assert_eq!(value["triangles"].as_array().unwrap().len(), 36);
        assert_eq!(value["material_indices"].as_array().unwrap().len(), 36);
        assert_eq!(value["uvs"].as_array().unwrap().len(), 108);
        assert_eq!(value["materials"][5]["slot"], 6);
        assert_eq!(value["materials"][5]["color"][3], 0.0);
    }

    #[test]
    fn write_files() {
        let dir = tempfile::tempdir().unwrap();
        let flexagon = trihexaflexagon();
        let (obj, mtl) = write_obj(&flexagon, dir.path(), "tri").unwrap();
        assert!(obj.ends_with("tri.obj"));
        assert!(std::fs::read_to_string(&obj).unwrap().contains("mtllib tri.mtl"));
        assert!(std::fs::read_to_string(&mtl).unwrap().contains("newmtl"));

        let json = write_json(&flexagon, dir.path(), "tri").unwrap();
        assert!(std::fs::read_to_string(json).unwrap().contains("\"triangles\""));
    }
}
