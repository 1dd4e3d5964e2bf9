//! The twelve cube edges as disjoint segments.

use glam::Vec3;

use crate::control_points::unit_corner;

/// Number of cube edges.
pub const EDGE_COUNT: usize = 12;

/// Corners of the bottom face (y = 0), walked around the ring.
const BOTTOM_RING: [usize; 4] = [0, 1, 5, 4];
/// Corners of the top face (y = 1), each above its [`BOTTOM_RING`] entry.
const TOP_RING: [usize; 4] = [2, 3, 7, 6];

/// Edges as corner index pairs: bottom, top and vertical edge for each ring
/// position in turn.
pub const EDGES: [[usize; 2]; EDGE_COUNT] = build_edges();

const fn build_edges() -> [[usize; 2]; EDGE_COUNT] {
    let mut edges = [[0; 2]; EDGE_COUNT];
    let mut i = 0;
    while i < 4 {
        let next = (i + 1) % 4;
        edges[3 * i] = [BOTTOM_RING[i], BOTTOM_RING[next]];
        edges[3 * i + 1] = [TOP_RING[i], TOP_RING[next]];
        edges[3 * i + 2] = [BOTTOM_RING[i], TOP_RING[i]];
        i += 1;
    }
    edges
}

/// Undeformed cube edges in parametric space.
///
/// Every edge owns its two vertices, so consecutive pairs of `positions` are
/// segments and nothing is shared at the corners. Dashing then restarts on
/// each edge instead of running on around a corner.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeWireframe {
    /// Segment endpoints, two per edge.
    pub positions: Vec<Vec3>,
}

impl Default for EdgeWireframe {
    fn default() -> Self {
        Self::new()
    }
}

impl EdgeWireframe {
    /// Builds the 24-vertex segment list from [`EDGES`].
    #[must_use]
    pub fn new() -> Self {
        let positions = EDGES
            .iter()
            .flat_map(|&[a, b]| [unit_corner(a), unit_corner(b)])
            .collect();
        Self { positions }
    }

    /// Number of segments.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.positions.len() / 2
    }

    /// Segments as endpoint pairs.
    pub fn segments(&self) -> impl Iterator<Item = [Vec3; 2]> + '_ {
        segments_of(&self.positions)
    }
}

/// Pairs up a segment-list buffer. A trailing odd vertex is ignored.
pub fn segments_of(positions: &[Vec3]) -> impl Iterator<Item = [Vec3; 2]> + '_ {
    positions.chunks_exact(2).map(|pair| [pair[0], pair[1]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_edge_counts() {
        let wireframe = EdgeWireframe::new();
        assert_eq!(wireframe.positions.len(), 24);
        assert_eq!(wireframe.segment_count(), EDGE_COUNT);
    }

    #[test]
    fn test_edges_are_distinct_cube_edges() {
        let mut seen = HashSet::new();
        for [a, b] in EDGES {
            // Cube edges join corners differing in exactly one axis bit.
            assert_eq!((a ^ b).count_ones(), 1, "{a}-{b}");
            assert!(seen.insert((a.min(b), a.max(b))), "duplicate {a}-{b}");
        }
        assert_eq!(seen.len(), 12);
    }

    #[test]
    fn test_edge_groups() {
        // Bottom and top edges stay in their y plane, vertical edges span y.
        for (k, [a, b]) in EDGES.iter().enumerate() {
            let (pa, pb) = (unit_corner(*a), unit_corner(*b));
            match k % 3 {
                0 => assert!(pa.y == 0.0 && pb.y == 0.0),
                1 => assert!(pa.y == 1.0 && pb.y == 1.0),
                _ => assert!(pa.y == 0.0 && pb.y == 1.0),
            }
        }
    }
}
