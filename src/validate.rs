//! Integrity checks for generated strips.
//!
//! A strip that fails these checks points at a bug in the builder rather than bad input, so
//! [`Strip::check`] turns the first problem into a [`FlexError::MeshValidationFailure`].

use std::{
    collections::{HashMap, HashSet},
    fmt,
};

use itertools::Itertools;
use three_d::{InnerSpace, Vec3};
use tracing::debug;

use crate::{
    error::{FlexError, FlexResult},
    strip::{EdgeId, Strip, VertIdx},
    utils::OrderedPos,
};

/// Faces whose area, measured in edge lengths squared, is at most this count as degenerate
const MIN_UNIT_AREA: f32 = 1e-6;

/// Report of strip validation results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub vertex_count: usize,
    pub face_count: usize,
    pub edge_count: usize,
    /// Edges with only one adjacent face.  Every strip has these, so they are not an issue.
    pub boundary_edge_count: usize,

    /// Face corners which refer to a vertex that doesn't exist
    pub dangling_index_count: usize,
    /// Faces with (near-)zero area, i.e. with colinear or repeated corners
    pub degenerate_face_count: usize,
    /// Faces which don't lie flat in the XY plane
    pub non_planar_face_count: usize,
    /// Vertices which sit exactly on top of an earlier vertex
    pub coincident_vertex_count: usize,
    /// Faces which use the same three vertices as an earlier face
    pub duplicate_face_count: usize,
    /// Edges shared by more than two faces
    pub non_manifold_edge_count: usize,
    /// Shared edges whose two faces traverse them in the same direction
    pub inconsistent_edge_count: usize,
}

impl ValidationReport {
    pub fn has_issues(&self) -> bool {
        self.issue_count() > 0
    }

    pub fn issue_count(&self) -> usize {
        self.dangling_index_count
            + self.degenerate_face_count
            + self.non_planar_face_count
            + self.coincident_vertex_count
            + self.duplicate_face_count
            + self.non_manifold_edge_count
            + self.inconsistent_edge_count
    }

    /// Description of the most severe problem, if any
    pub fn first_problem(&self) -> Option<String> {
        let problems = [
            (self.dangling_index_count, "dangling vertex indices"),
            (self.degenerate_face_count, "degenerate faces"),
            (self.non_planar_face_count, "non-planar faces"),
            (self.coincident_vertex_count, "coincident vertices"),
            (self.duplicate_face_count, "duplicate faces"),
            (self.non_manifold_edge_count, "non-manifold edges"),
            (self.inconsistent_edge_count, "inconsistently oriented edges"),
        ];
        problems
            .into_iter()
            .find(|(count, _)| *count > 0)
            .map(|(count, name)| format!("{count} {name}"))
    }

    pub fn into_result(self) -> FlexResult<Self> {
        match self.first_problem() {
            Some(reason) => Err(FlexError::MeshValidationFailure { reason }),
            None => Ok(self),
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Strip report:")?;
        writeln!(f, "  Vertices: {}", self.vertex_count)?;
        writeln!(f, "  Faces: {}", self.face_count)?;
        writeln!(
            f,
            "  Edges: {} ({} boundary)",
            self.edge_count, self.boundary_edge_count
        )?;
        if !self.has_issues() {
            return write!(f, "  No issues found");
        }
        writeln!(f, "  Issues:")?;
        let issues = [
            ("Dangling indices", self.dangling_index_count),
            ("Degenerate faces", self.degenerate_face_count),
            ("Non-planar faces", self.non_planar_face_count),
            ("Coincident vertices", self.coincident_vertex_count),
            ("Duplicate faces", self.duplicate_face_count),
            ("Non-manifold edges", self.non_manifold_edge_count),
            ("Inconsistent edges", self.inconsistent_edge_count),
        ];
        let lines = issues
            .iter()
            .filter(|(_, count)| *count > 0)
            .map(|(name, count)| format!("    {name}: {count}"))
            .join("\n");
        write!(f, "{lines}")
    }
}

/// Check `strip` for problems which would make it unusable as a paper model
pub fn validate(strip: &Strip) -> ValidationReport {
    let mut report = ValidationReport {
        vertex_count: strip.vert_count(),
        face_count: strip.face_count(),
        ..Default::default()
    };

    let mut seen_positions = HashSet::new();
    for v in strip.verts() {
        if !seen_positions.insert(OrderedPos(v.pos())) {
            report.coincident_vertex_count += 1;
        }
    }

    let is_valid_idx = |idx: VertIdx| idx.index() < strip.vert_count();
    let mut seen_faces = HashSet::new();
    // Maps each directed half-edge to the number of faces which traverse it
    let mut half_edges = HashMap::<(VertIdx, VertIdx), usize>::new();
    for face in strip.faces() {
        let verts = face.verts();
        let dangling = verts.iter().filter(|v| !is_valid_idx(**v)).count();
        if dangling > 0 {
            report.dangling_index_count += dangling;
            continue; // Geometry can't be checked without all the corners
        }

        if face.unit_area(strip) <= MIN_UNIT_AREA || !verts.iter().all_unique() {
            report.degenerate_face_count += 1;
        }
        if face
            .vert_positions(strip)
            .iter()
            .any(|v| v.dot(Vec3::unit_z()) != 0.0)
        {
            report.non_planar_face_count += 1;
        }
        if !seen_faces.insert(verts.iter().copied().sorted().collect_vec()) {
            report.duplicate_face_count += 1;
        }
        for (&a, &b) in verts.iter().circular_tuple_windows() {
            *half_edges.entry((a, b)).or_default() += 1;
        }
    }

    // Count the faces around each undirected edge
    let mut edge_faces = HashMap::<EdgeId, usize>::new();
    for (&(a, b), &count) in &half_edges {
        *edge_faces.entry(EdgeId::new(a, b)).or_default() += count;
        if count > 1 {
            report.inconsistent_edge_count += 1;
        }
    }
    report.edge_count = edge_faces.len();
    report.boundary_edge_count = edge_faces.values().filter(|&&n| n == 1).count();
    report.non_manifold_edge_count = edge_faces.values().filter(|&&n| n > 2).count();

    report
}

impl Strip {
    /// Validate `self`, failing on the first problem found
    pub fn check(&self) -> FlexResult<ValidationReport> {
        let report = validate(self);
        debug!("{report}");
        report.into_result()
    }
}

#[cfg(test)]
mod tests {
    use three_d::vec3;

    use super::*;

    fn unit_triangle_verts() -> Vec<Vec3> {
        vec![
            vec3(0.0, 0.0, 0.0),
            vec3(1.0, 0.0, 0.0),
            vec3(0.5, f32::sqrt(0.75), 0.0),
            vec3(1.5, f32::sqrt(0.75), 0.0),
        ]
    }

    #[test]
    fn generated_strips_are_clean() {
        for sides in [3, 6] {
            for scale in [f32::MIN_POSITIVE, 1e-25, 0.01, 1.0, 2.0, 150.0, 2e19, 1e30, 1e36] {
                let strip = Strip::build(scale, sides);
                let report = strip.check().unwrap();
                assert_eq!(report.issue_count(), 0, "{report}");
                assert_eq!(report.vertex_count, strip.vert_count());
                assert_eq!(report.face_count, strip.face_count());
                assert_eq!(report.edge_count, strip.edges().len());
            }
        }
    }

    #[test]
    fn boundary_edges_are_counted() {
        let strip = Strip::build(1.0, 3);
        let report = validate(&strip);
        let boundary = strip.edges().iter().filter(|e| e.is_boundary()).count();
        assert_eq!(report.boundary_edge_count, boundary);
        assert!(!report.has_issues());
    }

    #[test]
    fn dangling_index() {
        let strip = Strip::new(1.0, unit_triangle_verts(), [[0, 1, 2], [1, 3, 9]]);
        let report = validate(&strip);
        assert_eq!(report.dangling_index_count, 1);
        assert!(matches!(
            strip.check(),
            Err(FlexError::MeshValidationFailure { reason }) if reason.contains("dangling")
        ));
    }

    #[test]
    fn degenerate_faces() {
        let mut verts = unit_triangle_verts();
        verts.push(vec3(2.0, 0.0, 0.0));
        // Colinear corners, and a repeated corner
        let strip = Strip::new(1.0, verts, [[0, 1, 4], [0, 1, 1]]);
        assert_eq!(validate(&strip).degenerate_face_count, 2);
    }

    #[test]
    fn inconsistent_winding() {
        // Both faces traverse the edge 1 -> 2
        let strip = Strip::new(1.0, unit_triangle_verts(), [[0, 1, 2], [1, 2, 3]]);
        let report = validate(&strip);
        assert_eq!(report.inconsistent_edge_count, 1);
        assert_eq!(report.edge_count, 5);
        assert_eq!(
            report.first_problem().as_deref(),
            Some("1 inconsistently oriented edges")
        );

        let fixed = Strip::new(1.0, unit_triangle_verts(), [[0, 1, 2], [2, 1, 3]]);
        assert!(!validate(&fixed).has_issues());
    }

    #[test]
    fn duplicate_and_non_manifold() {
        let mut verts = unit_triangle_verts();
        verts.push(vec3(0.5, -1.0, 0.0));
        let strip = Strip::new(1.0, verts, [[0, 1, 2], [1, 0, 2], [1, 0, 4]]);
        let report = validate(&strip);
        assert_eq!(report.duplicate_face_count, 1);
        assert_eq!(report.non_manifold_edge_count, 1);
    }

    #[test]
    fn coincident_and_non_planar_vertices() {
        let mut verts = unit_triangle_verts();
        verts.push(vec3(0.0, 0.0, 0.0));
        verts.push(vec3(1.0, 1.0, 0.5));
        let strip = Strip::new(1.0, verts, [[0, 1, 2], [1, 5, 2]]);
        let report = validate(&strip);
        assert_eq!(report.coincident_vertex_count, 1);
        assert_eq!(report.non_planar_face_count, 1);
    }

    #[test]
    fn report_display() {
        let report = validate(&Strip::build(1.0, 3));
        let text = report.to_string();
        assert!(text.contains("Vertices: 17"));
        assert!(text.contains("Faces: 18"));
        assert!(text.contains("No issues found"));

        let broken = Strip::new(1.0, unit_triangle_verts(), [[0, 1, 7]]);
        let text = validate(&broken).to_string();
        assert!(text.contains("Dangling indices: 1"));
    }
}
