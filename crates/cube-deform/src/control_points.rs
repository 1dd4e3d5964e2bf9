//! The eight control points driving the deformation.
//!
//! Index bit 0 selects the X side of the cube, bit 1 the Y side and bit 2 the
//! Z side, so pairs `(0,1)`, `(2,3)`, `(4,5)`, `(6,7)` are the X-axis edges
//! that [`crate::deform`] interpolates first.

use std::fmt;
use std::str::FromStr;

use glam::Vec3;

use crate::error::{DeformError, DeformResult};
use crate::trilinear;

/// Number of control points (one per cube corner).
pub const CORNER_COUNT: usize = 8;

/// Parametric position of cube corner `index` in `[0,1]^3`.
///
/// Indices above 7 wrap onto their low three bits.
#[must_use]
pub fn unit_corner(index: usize) -> Vec3 {
    let bit = |shift: usize| if (index >> shift) & 1 == 1 { 1.0 } else { 0.0 };
    Vec3::new(bit(0), bit(1), bit(2))
}

/// Where the control points sit before the user moves them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CornerConvention {
    /// Corners at `(±1, ±1, ±1)`: the deformed cube spans `[-1,1]^3`.
    #[default]
    Symmetric,
    /// Corners at `{0,1}^3`: the deformation starts as the identity map.
    Unit,
}

impl CornerConvention {
    /// Resting position of corner `index` under this convention.
    #[must_use]
    pub fn corner(self, index: usize) -> Vec3 {
        let unit = unit_corner(index);
        match self {
            Self::Symmetric => unit * 2.0 - Vec3::ONE,
            Self::Unit => unit,
        }
    }

    /// All eight resting positions in index order.
    #[must_use]
    pub fn corners(self) -> [Vec3; CORNER_COUNT] {
        std::array::from_fn(|index| self.corner(index))
    }

    /// Short name used on the command line and in the inspector.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Symmetric => "symmetric",
            Self::Unit => "unit",
        }
    }
}

impl fmt::Display for CornerConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CornerConvention {
    type Err = DeformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "symmetric" => Ok(Self::Symmetric),
            "unit" => Ok(Self::Unit),
            _ => Err(DeformError::UnknownConvention(s.to_string())),
        }
    }
}

/// Live positions of the eight control points.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlPointSet {
    convention: CornerConvention,
    positions: [Vec3; CORNER_COUNT],
}

impl Default for ControlPointSet {
    fn default() -> Self {
        Self::new(CornerConvention::default())
    }
}

impl ControlPointSet {
    /// Creates a set with every point at its resting corner.
    #[must_use]
    pub fn new(convention: CornerConvention) -> Self {
        Self {
            convention,
            positions: convention.corners(),
        }
    }

    /// Creates a set from explicit positions, in corner index order.
    pub fn from_slice(convention: CornerConvention, positions: &[Vec3]) -> DeformResult<Self> {
        let positions: [Vec3; CORNER_COUNT] = positions
            .try_into()
            .map_err(|_| DeformError::WrongPointCount(positions.len()))?;
        Ok(Self {
            convention,
            positions,
        })
    }

    /// The convention the set resets to.
    #[must_use]
    pub const fn convention(&self) -> CornerConvention {
        self.convention
    }

    /// Positions in corner index order.
    #[must_use]
    pub const fn positions(&self) -> &[Vec3; CORNER_COUNT] {
        &self.positions
    }

    /// Position of point `index`, if it exists.
    #[must_use]
    pub fn position(&self, index: usize) -> Option<Vec3> {
        self.positions.get(index).copied()
    }

    /// Moves point `index` to `position`.
    pub fn set(&mut self, index: usize, position: Vec3) -> DeformResult<()> {
        let slot = self
            .positions
            .get_mut(index)
            .ok_or(DeformError::IndexOutOfRange(index))?;
        *slot = position;
        Ok(())
    }

    /// Restores every point to its resting corner.
    pub fn reset(&mut self) {
        self.positions = self.convention.corners();
    }

    /// Whether every point sits exactly on its resting corner.
    #[must_use]
    pub fn is_resting(&self) -> bool {
        self.positions == self.convention.corners()
    }

    /// Mean of the eight positions.
    #[must_use]
    pub fn centroid(&self) -> Vec3 {
        self.positions.iter().copied().sum::<Vec3>() / 8.0
    }

    /// Deformed image of parametric point `p`.
    #[must_use]
    pub fn deform(&self, p: Vec3) -> Vec3 {
        trilinear::deform(&self.positions, p)
    }
}
