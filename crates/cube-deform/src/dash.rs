//! Dash placement along segments.

use glam::Vec3;

use crate::error::{DeformError, DeformResult};

/// Dash length used by the hidden-edge pass, in world units.
pub const DEFAULT_DASH: f32 = 0.1;
/// Gap length used by the hidden-edge pass, in world units.
pub const DEFAULT_GAP: f32 = 0.03;
/// Most dashes emitted for one segment. Longer segments are drawn solid.
pub const MAX_DASHES_PER_SEGMENT: usize = 512;

/// Alternating dash and gap lengths in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashPattern {
    dash: f32,
    gap: f32,
}

impl Default for DashPattern {
    fn default() -> Self {
        Self {
            dash: DEFAULT_DASH,
            gap: DEFAULT_GAP,
        }
    }
}

impl DashPattern {
    /// Creates a pattern. Both lengths must be positive and finite.
    pub fn new(dash: f32, gap: f32) -> DeformResult<Self> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !valid(dash) || !valid(gap) {
            return Err(DeformError::InvalidDashPattern { dash, gap });
        }
        Ok(Self { dash, gap })
    }

    /// Dash length.
    #[must_use]
    pub const fn dash(&self) -> f32 {
        self.dash
    }

    /// Gap length.
    #[must_use]
    pub const fn gap(&self) -> f32 {
        self.gap
    }

    /// Length of one dash plus one gap.
    #[must_use]
    pub fn period(&self) -> f32 {
        self.dash + self.gap
    }

    /// Dashes covering the segment from `start` to `end`.
    ///
    /// The first dash begins at `start`; the last one is clipped at `end`.
    /// A segment needing more than [`MAX_DASHES_PER_SEGMENT`] dashes comes
    /// back as a single dash spanning it.
    #[must_use]
    pub fn split(&self, start: Vec3, end: Vec3) -> Vec<[Vec3; 2]> {
        let mut dashes = Vec::new();
        self.split_into(start, end, &mut dashes);
        dashes
    }

    /// Like [`Self::split`], appending to `out`.
    pub fn split_into(&self, start: Vec3, end: Vec3, out: &mut Vec<[Vec3; 2]>) {
        let length = start.distance(end);
        if !length.is_finite() || length <= f32::EPSILON {
            return;
        }
        let period = self.period();
        let periods = (length / period).ceil();

        #[allow(clippy::cast_precision_loss)]
        let cap = MAX_DASHES_PER_SEGMENT as f32;
        if periods > cap {
            out.push([start, end]);
            return;
        }
        let direction = (end - start) / length;

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let count = periods as usize;

        for k in 0..count {
            #[allow(clippy::cast_precision_loss)]
            let from = k as f32 * period;
            if from >= length {
                break;
            }
            let to = (from + self.dash).min(length);
            out.push([start + direction * from, start + direction * to]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_lengths() {
        assert!(DashPattern::new(0.0, 0.1).is_err());
        assert!(DashPattern::new(0.1, -1.0).is_err());
        assert!(DashPattern::new(f32::NAN, 0.1).is_err());
        assert!(DashPattern::new(0.1, f32::INFINITY).is_err());
        assert!(DashPattern::new(0.1, 0.03).is_ok());
    }

    #[test]
    fn test_split_exact_periods() {
        let pattern = DashPattern::new(1.0, 1.0).unwrap();
        let dashes = pattern.split(Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0));
        assert_eq!(
            dashes,
            vec![
                [Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0)],
                [Vec3::new(2.0, 0.0, 0.0), Vec3::new(3.0, 0.0, 0.0)],
            ]
        );
    }

    #[test]
    fn test_split_clips_last_dash() {
        let pattern = DashPattern::new(1.0, 0.5).unwrap();
        let dashes = pattern.split(Vec3::ZERO, Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(dashes.len(), 2);
        assert_eq!(dashes[1], [Vec3::new(0.0, 1.5, 0.0), Vec3::new(0.0, 2.0, 0.0)]);
    }

    #[test]
    fn test_split_degenerate_segment() {
        let pattern = DashPattern::default();
        assert!(pattern.split(Vec3::ONE, Vec3::ONE).is_empty());
    }

    #[test]
    fn test_default_dash_count_on_unit_edge() {
        // 1.0 / 0.13 rounds up to 8 dashes, the last one clipped to 0.09.
        let dashes = DashPattern::default().split(Vec3::ZERO, Vec3::X);
        assert_eq!(dashes.len(), 8);
        let drawn: f32 = dashes.iter().map(|[a, b]| a.distance(*b)).sum();
        assert!((drawn - 0.79).abs() < 1e-5, "{drawn}");
    }

    #[test]
    fn test_dash_count_at_cap() {
        let pattern = DashPattern::new(1.0, 1.0).unwrap();
        let end = Vec3::new(2.0 * MAX_DASHES_PER_SEGMENT as f32, 0.0, 0.0);
        assert_eq!(pattern.split(Vec3::ZERO, end).len(), MAX_DASHES_PER_SEGMENT);
    }

    #[test]
    fn test_long_segment_drawn_solid() {
        let end = Vec3::new(1.0e6, -2.0e5, 3.0e5);
        let dashes = DashPattern::default().split(Vec3::ZERO, end);
        assert_eq!(dashes, vec![[Vec3::ZERO, end]]);
    }
}
