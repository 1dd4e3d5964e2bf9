//! Edge-visibility overlay.
//!
//! The deformed wireframe is drawn twice. The hidden pass is dashed and
//! ignores the depth buffer, so every edge shows through the solid. The
//! visible pass is solid black and depth tested, so only edges facing the
//! viewer stay on top of the dashes.

use glam::Vec3;

use crate::CORNER_COUNT;
use crate::dash::DashPattern;
use crate::trilinear;
use crate::wireframe::{EdgeWireframe, segments_of};

/// Polygon offset in the usual `factor * slope + units * r` form.
///
/// Positive values push fragments away from the viewer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthBias {
    /// Slope-scaled term.
    pub factor: f32,
    /// Constant term in depth-buffer units.
    pub units: f32,
}

impl DepthBias {
    /// One unit of slope and constant offset.
    pub const UNIT: Self = Self {
        factor: 1.0,
        units: 1.0,
    };
}

/// The three things drawn every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Drawable {
    /// The deformed solid cube.
    Solid,
    /// Dashed edges, drawn regardless of occlusion.
    HiddenEdges,
    /// Opaque edges, occluded by the solid.
    VisibleEdges,
}

impl Drawable {
    /// All drawables in draw order.
    pub const ALL: [Self; 3] = [Self::Solid, Self::HiddenEdges, Self::VisibleEdges];

    /// Render state for this drawable.
    #[must_use]
    pub fn style(self, dash: DashPattern) -> DrawStyle {
        match self {
            Self::Solid => DrawStyle {
                color: 0x00cc_cccc,
                depth_test: true,
                depth_write: true,
                depth_bias: DepthBias::UNIT,
                double_sided: true,
                dash: None,
            },
            Self::HiddenEdges => DrawStyle {
                color: 0x0088_8888,
                depth_test: false,
                depth_write: false,
                depth_bias: DepthBias::UNIT,
                double_sided: true,
                dash: Some(dash),
            },
            Self::VisibleEdges => DrawStyle {
                color: 0x0000_0000,
                depth_test: true,
                depth_write: true,
                depth_bias: DepthBias::UNIT,
                double_sided: true,
                dash: None,
            },
        }
    }
}

/// Fixed-function state and color of one drawable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawStyle {
    /// `0xRRGGBB`.
    pub color: u32,
    /// Whether fragments behind the depth buffer are discarded.
    pub depth_test: bool,
    /// Whether fragments write the depth buffer.
    pub depth_write: bool,
    /// Offset applied to filled polygons against coplanar lines.
    pub depth_bias: DepthBias,
    /// Whether back faces are drawn.
    pub double_sided: bool,
    /// Dash pattern for line drawables.
    pub dash: Option<DashPattern>,
}

impl DrawStyle {
    /// Color as `[r, g, b]` in `0.0..=1.0` (sRGB).
    #[must_use]
    pub fn rgb(&self) -> [f32; 3] {
        let [_, r, g, b] = self.color.to_be_bytes();
        [r, g, b].map(|channel| f32::from(channel) / 255.0)
    }
}

/// One frame's worth of deformed edge geometry for both passes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeOverlay {
    /// Deformed segment endpoints, two per edge (visible pass).
    pub edges: Vec<Vec3>,
    /// Dash sub-segments of the deformed edges (hidden pass).
    pub dashes: Vec<[Vec3; 2]>,
}

impl EdgeOverlay {
    /// Deforms `wireframe` and dashes the result.
    #[must_use]
    pub fn build(
        points: &[Vec3; CORNER_COUNT],
        wireframe: &EdgeWireframe,
        pattern: DashPattern,
    ) -> Self {
        let mut overlay = Self::default();
        overlay.rebuild(points, wireframe, pattern);
        overlay
    }

    /// Rebuilds in place, keeping allocations.
    ///
    /// A cube edge varies along a single parametric axis, so its image is a
    /// straight segment and dashing the deformed endpoints measures true arc
    /// length.
    pub fn rebuild(
        &mut self,
        points: &[Vec3; CORNER_COUNT],
        wireframe: &EdgeWireframe,
        pattern: DashPattern,
    ) {
        trilinear::deform_into(points, &wireframe.positions, &mut self.edges);
        self.dashes.clear();
        for [start, end] in segments_of(&self.edges) {
            pattern.split_into(start, end, &mut self.dashes);
        }
    }

    /// Deformed edges as endpoint pairs.
    pub fn segments(&self) -> impl Iterator<Item = [Vec3; 2]> + '_ {
        segments_of(&self.edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dash::MAX_DASHES_PER_SEGMENT;
    use crate::{ControlPointSet, CornerConvention, EDGE_COUNT};

    #[test]
    fn test_pass_styles() {
        let dash = DashPattern::default();
        let hidden = Drawable::HiddenEdges.style(dash);
        assert!(!hidden.depth_test);
        assert!(!hidden.depth_write);
        assert_eq!(hidden.dash, Some(dash));

        let visible = Drawable::VisibleEdges.style(dash);
        assert!(visible.depth_test);
        assert!(visible.depth_write);
        assert_eq!(visible.dash, None);

        for drawable in Drawable::ALL {
            let bias = drawable.style(dash).depth_bias;
            assert!(bias.factor > 0.0 && bias.units > 0.0);
        }
    }

    #[test]
    fn test_rgb() {
        let style = Drawable::HiddenEdges.style(DashPattern::default());
        let [r, g, b] = style.rgb();
        assert!((r - 136.0 / 255.0).abs() < 1e-6);
        assert_eq!(r, g);
        assert_eq!(g, b);
        assert_eq!(
            Drawable::VisibleEdges.style(DashPattern::default()).rgb(),
            [0.0; 3]
        );
    }

    #[test]
    fn test_overlay_edge_count_survives_deformation() {
        let mut set = ControlPointSet::new(CornerConvention::Symmetric);
        set.set(6, Vec3::new(-3.0, 2.5, 0.4)).unwrap();
        let overlay = EdgeOverlay::build(
            set.positions(),
            &EdgeWireframe::new(),
            DashPattern::default(),
        );
        assert_eq!(overlay.edges.len(), 24);
        assert_eq!(overlay.segments().count(), EDGE_COUNT);
    }

    #[test]
    fn test_dashes_follow_deformed_length() {
        // Symmetric corners double every edge, so each edge gets 16 dashes.
        let set = ControlPointSet::new(CornerConvention::Symmetric);
        let overlay = EdgeOverlay::build(
            set.positions(),
            &EdgeWireframe::new(),
            DashPattern::default(),
        );
        assert_eq!(overlay.dashes.len(), 12 * 16);
    }

    #[test]
    fn test_far_corner_keeps_dashes_bounded() {
        let wireframe = EdgeWireframe::new();
        for far in [1.0e3, 1.0e4, 1.0e5] {
            let mut set = ControlPointSet::new(CornerConvention::Symmetric);
            set.set(7, Vec3::splat(far)).unwrap();
            let overlay = EdgeOverlay::build(set.positions(), &wireframe, DashPattern::default());
            assert!(overlay.dashes.len() <= EDGE_COUNT * MAX_DASHES_PER_SEGMENT);
            // The three edges meeting corner 7 are drawn solid.
            assert!(overlay.dashes.contains(&[Vec3::new(1.0, 1.0, -1.0), Vec3::splat(far)]));
        }
    }

    #[test]
    fn test_dashes_stay_on_their_edge() {
        let mut set = ControlPointSet::new(CornerConvention::Unit);
        set.set(7, Vec3::new(1.4, 1.3, 1.6)).unwrap();
        let overlay = EdgeOverlay::build(
            set.positions(),
            &EdgeWireframe::new(),
            DashPattern::default(),
        );

        for [a, b] in &overlay.dashes {
            let on_some_edge = overlay.segments().any(|[start, end]| {
                let axis = (end - start).normalize();
                let off_a = (*a - start).reject_from_normalized(axis).length();
                let off_b = (*b - start).reject_from_normalized(axis).length();
                off_a < 1e-5 && off_b < 1e-5
            });
            assert!(on_some_edge, "{a} {b}");
        }
    }
}
