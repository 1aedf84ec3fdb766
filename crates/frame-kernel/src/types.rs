use frame_types::{Point2, Rect2};
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Opaque handle to a solid body in the kernel.
/// Valid only for the kernel session that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyHandle(pub(crate) u64);

impl BodyHandle {
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Opaque handle to a 2D sketch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SketchHandle(pub(crate) u64);

/// Kernel entity identifier for faces, profiles, planes and features.
///
/// Issued from one creation sequence, so ordering two ids is a stable,
/// deterministic tie-break within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KernelId(pub u64);

/// Coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    pub fn unit(self) -> Vector3<f64> {
        match self {
            Axis::X => Vector3::x(),
            Axis::Y => Vector3::y(),
            Axis::Z => Vector3::z(),
        }
    }

    /// World axes mapped to the plane's local (u, v) coordinates.
    ///
    /// XY maps to (x, y), YZ to (z, y) so "horizontal" stays constant-y,
    /// XZ to (x, z).
    pub fn local_axes(self) -> (Axis, Axis) {
        match self {
            Axis::Z => (Axis::X, Axis::Y),
            Axis::X => (Axis::Z, Axis::Y),
            Axis::Y => (Axis::X, Axis::Z),
        }
    }
}

/// An axis-aligned plane: every point whose `normal` coordinate equals `offset`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub normal: Axis,
    pub offset: f64,
}

impl Plane {
    pub fn xy() -> Self {
        Self {
            normal: Axis::Z,
            offset: 0.0,
        }
    }

    pub fn yz() -> Self {
        Self {
            normal: Axis::X,
            offset: 0.0,
        }
    }

    pub fn xz() -> Self {
        Self {
            normal: Axis::Y,
            offset: 0.0,
        }
    }

    /// Copy of this plane moved along its normal.
    pub fn offset_by(self, distance: f64) -> Self {
        Self {
            normal: self.normal,
            offset: self.offset + distance,
        }
    }

    pub fn to_world(&self, p: Point2) -> Point3<f64> {
        let (u, v) = self.normal.local_axes();
        let mut world = Point3::origin();
        world[self.normal.index()] = self.offset;
        world[u.index()] = p.x;
        world[v.index()] = p.y;
        world
    }

    /// Orthographic projection into local coordinates.
    pub fn to_local(&self, p: &Point3<f64>) -> Point2 {
        let (u, v) = self.normal.local_axes();
        Point2::new(p[u.index()], p[v.index()])
    }
}

/// Axis-aligned 3D bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox3 {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl BoundingBox3 {
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self { min, max }
    }

    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }

    /// Closed-interval overlap test: boxes that only touch intersect.
    pub fn intersects(&self, other: &BoundingBox3) -> bool {
        (0..3).all(|i| self.min[i] <= other.max[i] && other.min[i] <= self.max[i])
    }

    pub fn union(&self, other: &BoundingBox3) -> BoundingBox3 {
        BoundingBox3 {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// Shortest distance between the two boxes; zero when they touch or overlap.
    pub fn distance(&self, other: &BoundingBox3) -> f64 {
        let gap = Vector3::from_fn(|i, _| {
            (other.min[i] - self.max[i])
                .max(self.min[i] - other.max[i])
                .max(0.0)
        });
        gap.norm()
    }
}

/// Surface classification of a face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurfaceKind {
    Planar,
    NonPlanar,
}

/// Everything the analysis passes need to know about one face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceInfo {
    pub id: KernelId,
    pub body: BodyHandle,
    pub surface: SurfaceKind,
    pub bbox: BoundingBox3,
    /// A point guaranteed to lie on the face.
    pub point: Point3<f64>,
    /// Outward unit normal. Only set for planar faces.
    pub normal: Option<Vector3<f64>>,
    pub area: f64,
}

/// A straight 2D segment in sketch coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment2 {
    pub start: Point2,
    pub end: Point2,
}

impl Segment2 {
    pub fn midpoint(&self) -> Point2 {
        self.start.midpoint(self.end)
    }
}

/// A straight 3D edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment3 {
    pub start: Point3<f64>,
    pub end: Point3<f64>,
}

/// A bounded region of a sketch available for extrusion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileInfo {
    pub id: KernelId,
    pub bounds: Rect2,
}

/// What an extrusion does with the swept region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExtrudeOperation {
    NewBody,
    Cut,
    Join,
}

/// Boolean combination of whole bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombineOperation {
    Cut,
    Join,
}

/// Region source for an extrusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProfileRef {
    /// A sketch profile, swept along its sketch plane normal.
    Sketch(KernelId),
    /// A planar body face, swept along its outward normal.
    Face(KernelId),
}

/// Input to [`crate::Kernel::extrude`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtrudeInput {
    pub profiles: Vec<ProfileRef>,
    /// Signed sweep distance along the profile normal.
    pub distance: f64,
    pub operation: ExtrudeOperation,
    /// Bodies a Cut or Join may touch. `None` means every body.
    pub participants: Option<Vec<BodyHandle>>,
}

impl ExtrudeInput {
    pub fn new(profiles: Vec<ProfileRef>, distance: f64, operation: ExtrudeOperation) -> Self {
        Self {
            profiles,
            distance,
            operation,
            participants: None,
        }
    }

    pub fn with_participants(mut self, bodies: Vec<BodyHandle>) -> Self {
        self.participants = Some(bodies);
        self
    }
}

/// Errors from kernel operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KernelError {
    #[error("entity not found: {id:?}")]
    EntityNotFound { id: KernelId },

    #[error("body not found: {body:?}")]
    BodyNotFound { body: BodyHandle },

    #[error("sketch not found: {sketch:?}")]
    SketchNotFound { sketch: SketchHandle },

    #[error("degenerate geometry: {reason}")]
    Degenerate { reason: String },

    #[error("projection failed: {reason}")]
    ProjectionFailed { reason: String },

    #[error("no participant body touched by the {operation:?} region")]
    NoTargetBody { operation: ExtrudeOperation },

    #[error("operation not supported: {operation}")]
    NotSupported { operation: String },
}
