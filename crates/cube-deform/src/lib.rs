//! Trilinear control-point deformation of a unit cube.
//!
//! This crate holds everything about the deformable cube that does not need a
//! renderer: the eight control points, the deformation itself, the undeformed
//! solid and edge geometry, the dashed/solid edge overlay, and the pointer
//! drag state machine. It is synchronous and engine-free, so the same code
//! runs natively and in WASM and is tested without a GPU.
//!
//! # Key items
//!
//! - [`ControlPointSet`]: live positions of the eight corners
//! - [`deform`]: the trilinear map from parametric space to world space
//! - [`SolidMesh`] / [`GeometryStrategy`]: the cube surface, triangulated or
//!   indexed
//! - [`EdgeWireframe`]: twelve disjoint edge segments
//! - [`EdgeOverlay`] / [`Drawable`]: per-frame edge geometry and pass styles
//! - [`InteractionState`]: drag start/move/end and the orbit enable flag

mod error;

pub mod control_points;
pub mod dash;
pub mod interaction;
pub mod overlay;
pub mod solid;
pub mod trilinear;
pub mod wireframe;

pub use control_points::{CORNER_COUNT, ControlPointSet, CornerConvention, unit_corner};
pub use dash::{DEFAULT_DASH, DEFAULT_GAP, DashPattern, MAX_DASHES_PER_SEGMENT};
pub use error::{DeformError, DeformResult};
pub use interaction::{DragPlane, Grab, InteractionState, Ray, pick};
pub use overlay::{DepthBias, DrawStyle, Drawable, EdgeOverlay};
pub use solid::{FACES, GeometryStrategy, SolidMesh, outward_winding};
pub use trilinear::{deform, deform_into, deform_positions, lerp};
pub use wireframe::{EDGE_COUNT, EDGES, EdgeWireframe, segments_of};
