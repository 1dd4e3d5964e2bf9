//! Pointer drag of control points and its interplay with orbit control.
//!
//! Engine-independent: the viewer turns cursor positions into [`Ray`]s and
//! forwards button presses here. A grab disables orbiting until it ends, so a
//! single pointer gesture never both rotates the view and moves a point.

use glam::Vec3;

use crate::control_points::ControlPointSet;

/// A half-line with a unit-length direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start of the ray.
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
}

impl Ray {
    /// Creates a ray, normalizing `direction`. Returns `None` for a zero or
    /// non-finite direction.
    #[must_use]
    pub fn new(origin: Vec3, direction: Vec3) -> Option<Self> {
        let direction = direction.try_normalize()?;
        Some(Self { origin, direction })
    }

    /// Point at distance `t` along the ray.
    #[must_use]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Distance to the nearest hit on an axis-aligned cube of half size
    /// `half_extent` centred on `center` (slab test).
    #[must_use]
    pub fn hit_cube(&self, center: Vec3, half_extent: f32) -> Option<f32> {
        let min = center - Vec3::splat(half_extent);
        let max = center + Vec3::splat(half_extent);
        let inverse = self.direction.recip();

        let t1 = (min - self.origin) * inverse;
        let t2 = (max - self.origin) * inverse;
        let near = t1.min(t2).max_element();
        let far = t1.max(t2).min_element();

        if far < near.max(0.0) {
            return None;
        }
        Some(near.max(0.0))
    }
}

/// Plane a grabbed point slides in: through the point, facing the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragPlane {
    /// A point on the plane.
    pub point: Vec3,
    /// Unit normal.
    pub normal: Vec3,
}

impl DragPlane {
    /// Where `ray` crosses the plane, if it does so in front of its origin.
    #[must_use]
    pub fn intersect(&self, ray: &Ray) -> Option<Vec3> {
        let denominator = self.normal.dot(ray.direction);
        if denominator.abs() <= f32::EPSILON {
            return None;
        }
        let t = self.normal.dot(self.point - ray.origin) / denominator;
        (t >= 0.0).then(|| ray.at(t))
    }
}

/// Index of the handle nearest along `ray`, among cubes of half size
/// `half_extent` centred on `points`.
#[must_use]
pub fn pick(ray: &Ray, points: &[Vec3], half_extent: f32) -> Option<usize> {
    points
        .iter()
        .enumerate()
        .filter_map(|(index, &point)| ray.hit_cube(point, half_extent).map(|t| (index, t)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(index, _)| index)
}

/// The point being dragged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grab {
    /// Control point index.
    pub index: usize,
    /// Plane the point moves in.
    pub plane: DragPlane,
    /// Offset from the point to where the cursor ray first hit the plane.
    pub offset: Vec3,
}

/// Drag state shared by the drag handler and the orbit controller.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionState {
    orbit_enabled: bool,
    grab: Option<Grab>,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self {
            orbit_enabled: true,
            grab: None,
        }
    }
}

impl InteractionState {
    /// Whether the orbit controller may respond to input.
    #[must_use]
    pub const fn orbit_enabled(&self) -> bool {
        self.orbit_enabled
    }

    /// The active grab, if any.
    #[must_use]
    pub const fn grab(&self) -> Option<&Grab> {
        self.grab.as_ref()
    }

    /// Index of the grabbed point, if any.
    #[must_use]
    pub fn grabbed(&self) -> Option<usize> {
        self.grab.map(|grab| grab.index)
    }

    /// Tries to grab a handle under `ray`.
    ///
    /// `view_direction` is the camera's forward vector; the drag plane faces
    /// it. On success orbit control is disabled and the grabbed index is
    /// returned. Does nothing while another grab is active.
    pub fn drag_start(
        &mut self,
        ray: &Ray,
        view_direction: Vec3,
        points: &ControlPointSet,
        half_extent: f32,
    ) -> Option<usize> {
        if self.grab.is_some() {
            return None;
        }
        let index = pick(ray, points.positions(), half_extent)?;
        let point = points.positions()[index];
        let normal = view_direction.try_normalize().unwrap_or(-ray.direction);
        let plane = DragPlane { point, normal };
        let offset = plane.intersect(ray).map_or(Vec3::ZERO, |hit| hit - point);

        self.grab = Some(Grab {
            index,
            plane,
            offset,
        });
        self.orbit_enabled = false;
        Some(index)
    }

    /// Moves the grabbed point to follow `ray`.
    ///
    /// Returns the new position, or `None` when nothing is grabbed or the ray
    /// misses the drag plane (the point then stays where it was).
    pub fn drag_to(&mut self, ray: &Ray, points: &mut ControlPointSet) -> Option<Vec3> {
        let grab = self.grab?;
        let position = grab.plane.intersect(ray)? - grab.offset;
        points.set(grab.index, position).ok()?;
        Some(position)
    }

    /// Releases the grab and re-enables orbit control.
    pub fn drag_end(&mut self) -> Option<usize> {
        self.orbit_enabled = true;
        self.grab.take().map(|grab| grab.index)
    }
}
