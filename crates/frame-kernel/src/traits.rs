use frame_types::Rect2;
use nalgebra::{Point3, Vector3};

use crate::types::*;

/// Mutating half of the solid-modeling interface.
///
/// Every call completes before it returns; later calls may read the
/// geometry earlier ones produced.
pub trait Kernel {
    /// Record a construction plane. The plane itself is a plain value;
    /// the returned id only tracks it in the session.
    fn add_construction_plane(&mut self, plane: Plane) -> Result<KernelId, KernelError>;

    /// Create an empty sketch on a plane.
    fn create_sketch(&mut self, plane: Plane) -> Result<SketchHandle, KernelError>;

    /// Draw a rectangle in sketch-local coordinates. Returns the profile id
    /// of the region it bounds.
    fn add_rectangle(&mut self, sketch: SketchHandle, rect: Rect2) -> Result<KernelId, KernelError>;

    /// Project a 3D edge orthographically onto a sketch plane.
    fn project_edge(
        &mut self,
        sketch: SketchHandle,
        edge: &Segment3,
    ) -> Result<Segment2, KernelError>;

    /// Sweep a set of profiles by a signed distance.
    ///
    /// Returns the created bodies for NewBody and the modified bodies for
    /// Cut and Join.
    fn extrude(&mut self, input: &ExtrudeInput) -> Result<Vec<BodyHandle>, KernelError>;

    /// Combine whole tool bodies into a target body.
    fn combine(
        &mut self,
        target: BodyHandle,
        tools: &[BodyHandle],
        operation: CombineOperation,
        keep_tools: bool,
    ) -> Result<(), KernelError>;

    /// Move a body rigidly.
    fn translate_body(&mut self, body: BodyHandle, offset: Vector3<f64>) -> Result<(), KernelError>;

    fn set_body_name(&mut self, body: BodyHandle, name: &str) -> Result<(), KernelError>;

    fn set_appearance(&mut self, body: BodyHandle, appearance: &str) -> Result<(), KernelError>;
}

/// Read-only queries on kernel geometry.
pub trait KernelIntrospect {
    /// All live bodies, in creation order.
    fn bodies(&self) -> Vec<BodyHandle>;

    fn body_name(&self, body: BodyHandle) -> Result<String, KernelError>;

    fn body_appearance(&self, body: BodyHandle) -> Result<Option<String>, KernelError>;

    fn body_bbox(&self, body: BodyHandle) -> Result<BoundingBox3, KernelError>;

    fn body_volume(&self, body: BodyHandle) -> Result<f64, KernelError>;

    /// Planar and non-planar faces of a body.
    fn body_faces(&self, body: BodyHandle) -> Result<Vec<FaceInfo>, KernelError>;

    fn face(&self, face: KernelId) -> Result<FaceInfo, KernelError>;

    /// Boundary edges of a face.
    fn face_edges(&self, face: KernelId) -> Result<Vec<Segment3>, KernelError>;

    fn face_contains_point(&self, face: KernelId, point: &Point3<f64>) -> Result<bool, KernelError>;

    fn min_distance_face_face(&self, a: KernelId, b: KernelId) -> Result<f64, KernelError>;

    fn min_distance_face_body(&self, face: KernelId, body: BodyHandle) -> Result<f64, KernelError>;

    /// Bounded regions of a sketch with their local bounding boxes.
    fn profiles(&self, sketch: SketchHandle) -> Result<Vec<ProfileInfo>, KernelError>;

    /// First name in `candidates` the material library knows.
    fn find_appearance(&self, candidates: &[&str]) -> Option<String>;
}
