//! Solid cube geometry in parametric space.
//!
//! Two tessellations are offered. [`GeometryStrategy::Triangulated`] is the
//! plain non-indexed box: two triangles per face, corners only.
//! [`GeometryStrategy::Indexed`] adds edge midpoints and face centres and fans
//! eight triangles around each centre, which keeps faces closer to the true
//! (curved) trilinear surface when the cube is twisted.

use std::fmt;
use std::str::FromStr;

use glam::Vec3;

use crate::control_points::unit_corner;
use crate::error::DeformError;

/// Cube faces as corner indices, counter-clockwise seen from outside.
///
/// Order: +X, -X, +Y, -Y, +Z, -Z.
pub const FACES: [[usize; 4]; 6] = [
    [5, 1, 3, 7],
    [0, 4, 6, 2],
    [6, 7, 3, 2],
    [0, 1, 5, 4],
    [4, 5, 7, 6],
    [1, 0, 2, 3],
];

/// How the solid cube is tessellated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GeometryStrategy {
    /// 36 vertices, no index buffer.
    #[default]
    Triangulated,
    /// 26 shared vertices, 48 indexed triangles.
    Indexed,
}

impl GeometryStrategy {
    /// Short name used on the command line and in the inspector.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Triangulated => "triangulated",
            Self::Indexed => "indexed",
        }
    }

    /// Builds the undeformed solid for this strategy.
    #[must_use]
    pub fn build(self) -> SolidMesh {
        match self {
            Self::Triangulated => SolidMesh::triangulated(),
            Self::Indexed => SolidMesh::indexed(),
        }
    }
}

impl fmt::Display for GeometryStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GeometryStrategy {
    type Err = DeformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "triangulated" | "non-indexed" => Ok(Self::Triangulated),
            "indexed" => Ok(Self::Indexed),
            _ => Err(DeformError::UnknownGeometry(s.to_string())),
        }
    }
}

/// Undeformed cube surface, positions in `[0,1]^3`.
#[derive(Debug, Clone, PartialEq)]
pub struct SolidMesh {
    /// Vertex positions in parametric space.
    pub positions: Vec<Vec3>,
    /// Triangle list indices, or `None` when every three positions form a
    /// triangle.
    pub indices: Option<Vec<u16>>,
}

impl SolidMesh {
    /// Two triangles per face, 36 vertices.
    #[must_use]
    pub fn triangulated() -> Self {
        let mut positions = Vec::with_capacity(36);
        for [a, b, c, d] in FACES {
            for index in [a, b, c, a, c, d] {
                positions.push(unit_corner(index));
            }
        }
        Self {
            positions,
            indices: None,
        }
    }

    /// Eight triangles per face fanned around the face centre.
    ///
    /// Vertices live on the half-step lattice `{0, 0.5, 1}^3` minus the cube
    /// centre, which gives 8 corners, 12 edge midpoints and 6 face centres.
    #[must_use]
    pub fn indexed() -> Self {
        let positions = (0..27)
            .filter(|&slot| slot != CENTRE_SLOT)
            .map(|slot| half_step_position(lattice_of_slot(slot)))
            .collect();

        let mut indices = Vec::with_capacity(FACES.len() * 8 * 3);
        for face in FACES {
            let corners = face.map(|index| lattice_of_corner(index));
            let centre = corners.iter().fold([0; 3], |acc, c| {
                [acc[0] + c[0], acc[1] + c[1], acc[2] + c[2]]
            });
            let centre = centre.map(|v| v / 4);

            let mut ring = [[0; 3]; 8];
            for (k, corner) in corners.iter().enumerate() {
                let next = corners[(k + 1) % 4];
                ring[2 * k] = *corner;
                ring[2 * k + 1] = [
                    (corner[0] + next[0]) / 2,
                    (corner[1] + next[1]) / 2,
                    (corner[2] + next[2]) / 2,
                ];
            }

            for k in 0..ring.len() {
                indices.push(vertex_of_lattice(centre));
                indices.push(vertex_of_lattice(ring[k]));
                indices.push(vertex_of_lattice(ring[(k + 1) % ring.len()]));
            }
        }

        Self {
            positions,
            indices: Some(indices),
        }
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices
            .as_ref()
            .map_or(self.positions.len(), Vec::len)
            / 3
    }

    /// Triangles as vertex index triples into `positions`.
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        let count = self.triangle_count();
        (0..count).map(move |t| match &self.indices {
            Some(indices) => [
                usize::from(indices[3 * t]),
                usize::from(indices[3 * t + 1]),
                usize::from(indices[3 * t + 2]),
            ],
            None => [3 * t, 3 * t + 1, 3 * t + 2],
        })
    }
}

/// Whether every triangle of `mesh`, placed at `positions`, faces away from
/// the centroid of those positions.
///
/// `positions` is normally the deformed copy of `mesh.positions`. Holds for
/// the undeformed cube and for any convex, non-self-intersecting placement of
/// the control points.
#[must_use]
pub fn outward_winding(mesh: &SolidMesh, positions: &[Vec3]) -> bool {
    if positions.len() != mesh.positions.len() || positions.is_empty() {
        return false;
    }
    #[allow(clippy::cast_precision_loss)]
    let centroid = positions.iter().copied().sum::<Vec3>() / positions.len() as f32;

    mesh.triangles().all(|[a, b, c]| {
        let (a, b, c) = (positions[a], positions[b], positions[c]);
        let normal = (b - a).cross(c - a);
        let middle = (a + b + c) / 3.0;
        normal.dot(middle - centroid) > 0.0
    })
}

/// Lattice slot of the cube centre, which is not a surface vertex.
const CENTRE_SLOT: usize = 13;

/// Half-step lattice coordinates (each 0, 1 or 2) of slot `0..27`.
fn lattice_of_slot(slot: usize) -> [usize; 3] {
    [slot % 3, slot / 3 % 3, slot / 9]
}

fn lattice_of_corner(index: usize) -> [usize; 3] {
    [
        (index & 1) * 2,
        ((index >> 1) & 1) * 2,
        ((index >> 2) & 1) * 2,
    ]
}

#[allow(clippy::cast_precision_loss)]
fn half_step_position(lattice: [usize; 3]) -> Vec3 {
    Vec3::new(lattice[0] as f32, lattice[1] as f32, lattice[2] as f32) * 0.5
}

/// Vertex index of a surface lattice point in [`SolidMesh::indexed`].
fn vertex_of_lattice(lattice: [usize; 3]) -> u16 {
    let slot = lattice[0] + lattice[1] * 3 + lattice[2] * 9;
    let vertex = if slot > CENTRE_SLOT { slot - 1 } else { slot };
    u16::try_from(vertex).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_triangulated_counts() {
        let mesh = SolidMesh::triangulated();
        assert_eq!(mesh.positions.len(), 36);
        assert!(mesh.indices.is_none());
        assert_eq!(mesh.triangle_count(), 12);
    }

    #[test]
    fn test_indexed_counts() {
        let mesh = SolidMesh::indexed();
        assert_eq!(mesh.positions.len(), 26);
        assert_eq!(mesh.triangle_count(), 48);

        let unique: HashSet<[u32; 3]> = mesh
            .positions
            .iter()
            .map(|p| p.to_array().map(f32::to_bits))
            .collect();
        assert_eq!(unique.len(), 26);
        assert!(!mesh.positions.contains(&Vec3::splat(0.5)));
    }

    #[test]
    fn test_indexed_uses_every_vertex() {
        let mesh = SolidMesh::indexed();
        let used: HashSet<usize> = mesh.triangles().flatten().collect();
        assert_eq!(used.len(), 26);
    }

    #[test]
    fn test_positions_in_unit_cube() {
        for strategy in [GeometryStrategy::Triangulated, GeometryStrategy::Indexed] {
            let mesh = strategy.build();
            assert!(
                mesh.positions
                    .iter()
                    .all(|p| p.cmpge(Vec3::ZERO).all() && p.cmple(Vec3::ONE).all())
            );
        }
    }

    #[test]
    fn test_faces_wind_outward() {
        for face in FACES {
            let [a, b, c, _] = face.map(unit_corner);
            let normal = (b - a).cross(c - a);
            let middle = face.map(unit_corner).iter().copied().sum::<Vec3>() / 4.0;
            assert!(normal.dot(middle - Vec3::splat(0.5)) > 0.0, "face {face:?}");
        }
    }

    #[test]
    fn test_undeformed_winding() {
        for strategy in [GeometryStrategy::Triangulated, GeometryStrategy::Indexed] {
            let mesh = strategy.build();
            assert!(outward_winding(&mesh, &mesh.positions), "{strategy}");
        }
    }

    #[test]
    fn test_inverted_winding_detected() {
        let mesh = SolidMesh::triangulated();
        let mirrored: Vec<Vec3> = mesh
            .positions
            .iter()
            .map(|p| Vec3::new(-p.x, p.y, p.z))
            .collect();
        assert!(!outward_winding(&mesh, &mirrored));
    }

    #[test]
    fn test_every_face_covered() {
        // Each face contributes area 1 to the surface of the unit cube.
        for strategy in [GeometryStrategy::Triangulated, GeometryStrategy::Indexed] {
            let mesh = strategy.build();
            let area: f32 = mesh
                .triangles()
                .map(|[a, b, c]| {
                    let (a, b, c) = (mesh.positions[a], mesh.positions[b], mesh.positions[c]);
                    (b - a).cross(c - a).length() / 2.0
                })
                .sum();
            assert!((area - 6.0).abs() < 1e-5, "{strategy}: {area}");
        }
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("indexed".parse(), Ok(GeometryStrategy::Indexed));
        assert_eq!("Triangulated".parse(), Ok(GeometryStrategy::Triangulated));
        assert!("quads".parse::<GeometryStrategy>().is_err());
    }
}
