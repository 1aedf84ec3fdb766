//! BoxKernel: a deterministic kernel whose solids are unions of axis-aligned cuboids.
//!
//! Exact for rectilinear work: every sketch lies on an axis-aligned plane,
//! every profile is a rectangle and every sweep runs along a coordinate
//! axis. Faces are rebuilt after each mutation and receive fresh ids from a
//! single creation sequence; a face whose patch survives a rebuild unchanged
//! keeps its id.

use std::collections::{BTreeMap, HashMap};

use frame_types::Rect2;
use nalgebra::{Point3, Vector3};
use tracing::debug;

use crate::cuboid::{boundary_patches, subtract_all, Cuboid, Patch, EPS};
use crate::traits::{Kernel, KernelIntrospect};
use crate::types::*;

/// Point-on-face tolerance.
const ON_FACE_TOL: f64 = 1e-6;

/// Appearances the built-in material library offers.
const DEFAULT_LIBRARY: &[&str] = &[
    "Pine",
    "Oak",
    "Paint - Enamel Glossy (White)",
    "Plastic - Matte (White)",
];

#[derive(Debug, Clone)]
struct BoxFace {
    id: KernelId,
    patch: Patch,
}

#[derive(Debug, Clone)]
struct BoxBody {
    name: String,
    appearance: Option<String>,
    cells: Vec<Cuboid>,
    faces: Vec<BoxFace>,
}

#[derive(Debug, Clone)]
struct BoxSketch {
    plane: Plane,
    profiles: Vec<(KernelId, Rect2)>,
    projected: Vec<Segment2>,
}

/// Cuboid-union solid modeling kernel.
pub struct BoxKernel {
    next_id: u64,
    next_handle: u64,
    bodies: BTreeMap<u64, BoxBody>,
    sketches: HashMap<u64, BoxSketch>,
    planes: Vec<(KernelId, Plane)>,
    library: Vec<String>,
}

impl BoxKernel {
    pub fn new() -> Self {
        Self::with_library(DEFAULT_LIBRARY.iter().copied())
    }

    /// Kernel whose material library holds exactly `names`.
    pub fn with_library<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            next_id: 1,
            next_handle: 1,
            bodies: BTreeMap::new(),
            sketches: HashMap::new(),
            planes: Vec::new(),
            library: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Construction planes recorded so far, in creation order.
    pub fn construction_planes(&self) -> &[(KernelId, Plane)] {
        &self.planes
    }

    /// Lines projected into a sketch so far.
    pub fn projected_lines(&self, sketch: SketchHandle) -> Result<&[Segment2], KernelError> {
        self.sketches
            .get(&sketch.0)
            .map(|s| s.projected.as_slice())
            .ok_or(KernelError::SketchNotFound { sketch })
    }

    /// Volume shared by two bodies. Cells within a body never overlap, so
    /// the pairwise sum is exact.
    pub fn overlap_volume(&self, a: BodyHandle, b: BodyHandle) -> Result<f64, KernelError> {
        let (a, b) = (self.body(a)?, self.body(b)?);
        Ok(a.cells
            .iter()
            .flat_map(|ca| b.cells.iter().map(move |cb| ca.intersection_volume(cb)))
            .sum())
    }

    /// Insert a box body directly, bypassing sketches.
    pub fn add_box(&mut self, min: [f64; 3], max: [f64; 3], name: &str) -> BodyHandle {
        let cell = Cuboid::from_corners(Point3::from(min), Point3::from(max));
        self.insert_body(name.to_string(), vec![cell])
    }

    fn alloc_id(&mut self) -> KernelId {
        let id = KernelId(self.next_id);
        self.next_id += 1;
        id
    }

    fn alloc_handle(&mut self) -> u64 {
        let h = self.next_handle;
        self.next_handle += 1;
        h
    }

    fn insert_body(&mut self, name: String, cells: Vec<Cuboid>) -> BodyHandle {
        let handle = self.alloc_handle();
        self.bodies.insert(
            handle,
            BoxBody {
                name,
                appearance: None,
                cells,
                faces: Vec::new(),
            },
        );
        self.rebuild_faces(handle);
        BodyHandle(handle)
    }

    /// Recompute the boundary of a body. Patches that did not change keep
    /// their ids; everything else gets a fresh one.
    fn rebuild_faces(&mut self, handle: u64) {
        let (patches, previous) = match self.bodies.get(&handle) {
            Some(body) => (boundary_patches(&body.cells), body.faces.clone()),
            None => return,
        };
        let faces: Vec<BoxFace> = patches
            .into_iter()
            .map(|patch| {
                let kept = previous
                    .iter()
                    .find(|old| old.patch.same_patch(&patch))
                    .map(|old| old.id);
                BoxFace {
                    id: kept.unwrap_or_else(|| self.alloc_id()),
                    patch,
                }
            })
            .collect();
        if let Some(body) = self.bodies.get_mut(&handle) {
            body.faces = faces;
        }
    }

    fn body(&self, body: BodyHandle) -> Result<&BoxBody, KernelError> {
        self.bodies
            .get(&body.0)
            .ok_or(KernelError::BodyNotFound { body })
    }

    fn find_face(&self, face: KernelId) -> Result<(BodyHandle, &BoxFace), KernelError> {
        self.bodies
            .iter()
            .find_map(|(&h, body)| {
                body.faces
                    .iter()
                    .find(|f| f.id == face)
                    .map(|f| (BodyHandle(h), f))
            })
            .ok_or(KernelError::EntityNotFound { id: face })
    }

    fn find_profile(&self, profile: KernelId) -> Result<(Plane, Rect2), KernelError> {
        self.sketches
            .values()
            .find_map(|sketch| {
                sketch
                    .profiles
                    .iter()
                    .find(|(id, _)| *id == profile)
                    .map(|(_, rect)| (sketch.plane, *rect))
            })
            .ok_or(KernelError::EntityNotFound { id: profile })
    }

    /// The solid region a profile sweeps through.
    fn region(&self, profile: &ProfileRef, distance: f64) -> Result<Cuboid, KernelError> {
        let region = match profile {
            ProfileRef::Sketch(id) => {
                let (plane, rect) = self.find_profile(*id)?;
                Cuboid::swept(&plane, &rect, distance)
            }
            ProfileRef::Face(id) => {
                let (_, face) = self.find_face(*id)?;
                let signed = if face.patch.positive {
                    distance
                } else {
                    -distance
                };
                Cuboid::swept(&face.patch.plane(), &face.patch.rect, signed)
            }
        };
        if region.is_degenerate() {
            return Err(KernelError::Degenerate {
                reason: format!("{profile:?} swept by {distance} has no volume"),
            });
        }
        Ok(region)
    }

    fn targets(&self, participants: &Option<Vec<BodyHandle>>) -> Vec<BodyHandle> {
        match participants {
            Some(list) => list
                .iter()
                .copied()
                .filter(|b| self.bodies.contains_key(&b.0))
                .collect(),
            None => self.bodies.keys().map(|&h| BodyHandle(h)).collect(),
        }
    }

    fn new_bodies(&mut self, regions: Vec<Cuboid>) -> Vec<BodyHandle> {
        // Union-find over touching regions: each connected group is one body.
        let mut group: Vec<usize> = (0..regions.len()).collect();
        fn root(group: &mut [usize], mut i: usize) -> usize {
            while group[i] != i {
                group[i] = group[group[i]];
                i = group[i];
            }
            i
        }
        for i in 0..regions.len() {
            for j in (i + 1)..regions.len() {
                if regions[i].touches(&regions[j]) {
                    let (ri, rj) = (root(&mut group, i), root(&mut group, j));
                    group[ri.max(rj)] = ri.min(rj);
                }
            }
        }

        let mut members: BTreeMap<usize, Vec<Cuboid>> = BTreeMap::new();
        for (i, region) in regions.iter().enumerate() {
            let r = root(&mut group, i);
            let cells = members.entry(r).or_default();
            let fresh = subtract_all(&[*region], cells);
            cells.extend(fresh);
        }

        members
            .into_values()
            .map(|cells| {
                let name = format!("Body{}", self.bodies.len() + 1);
                self.insert_body(name, cells)
            })
            .collect()
    }

    fn cut_bodies(&mut self, targets: &[BodyHandle], tools: &[Cuboid]) -> Vec<BodyHandle> {
        let mut modified = Vec::new();
        for &target in targets {
            let Some(body) = self.bodies.get_mut(&target.0) else {
                continue;
            };
            let hit = body
                .cells
                .iter()
                .any(|cell| tools.iter().any(|tool| cell.overlaps(tool)));
            if !hit {
                continue;
            }
            body.cells = subtract_all(&body.cells, tools);
            if body.cells.is_empty() {
                debug!(body = target.0, "cut consumed the whole body");
                self.bodies.remove(&target.0);
            } else {
                self.rebuild_faces(target.0);
            }
            modified.push(target);
        }
        modified
    }

    fn join_regions(
        &mut self,
        targets: &[BodyHandle],
        regions: &[Cuboid],
    ) -> Result<Vec<BodyHandle>, KernelError> {
        let mut modified: Vec<BodyHandle> = Vec::new();
        for region in regions {
            let target = targets.iter().copied().find(|t| {
                self.bodies
                    .get(&t.0)
                    .is_some_and(|b| b.cells.iter().any(|c| c.touches(region)))
            });
            let Some(target) = target else {
                debug!(?region, "join region touches no participant, skipped");
                continue;
            };
            if let Some(body) = self.bodies.get_mut(&target.0) {
                let fresh = subtract_all(&[*region], &body.cells);
                body.cells.extend(fresh);
            }
            if !modified.contains(&target) {
                modified.push(target);
            }
        }
        if modified.is_empty() {
            return Err(KernelError::NoTargetBody {
                operation: ExtrudeOperation::Join,
            });
        }
        for body in &modified {
            self.rebuild_faces(body.0);
        }
        Ok(modified)
    }
}

impl Default for BoxKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl Kernel for BoxKernel {
    fn add_construction_plane(&mut self, plane: Plane) -> Result<KernelId, KernelError> {
        let id = self.alloc_id();
        self.planes.push((id, plane));
        Ok(id)
    }

    fn create_sketch(&mut self, plane: Plane) -> Result<SketchHandle, KernelError> {
        let handle = self.alloc_handle();
        self.sketches.insert(
            handle,
            BoxSketch {
                plane,
                profiles: Vec::new(),
                projected: Vec::new(),
            },
        );
        Ok(SketchHandle(handle))
    }

    fn add_rectangle(&mut self, sketch: SketchHandle, rect: Rect2) -> Result<KernelId, KernelError> {
        if rect.width() <= EPS || rect.height() <= EPS {
            return Err(KernelError::Degenerate {
                reason: format!("rectangle {rect:?} has no area"),
            });
        }
        if !self.sketches.contains_key(&sketch.0) {
            return Err(KernelError::SketchNotFound { sketch });
        }
        let id = self.alloc_id();
        if let Some(s) = self.sketches.get_mut(&sketch.0) {
            s.profiles.push((id, rect));
        }
        Ok(id)
    }

    fn project_edge(
        &mut self,
        sketch: SketchHandle,
        edge: &Segment3,
    ) -> Result<Segment2, KernelError> {
        let s = self
            .sketches
            .get_mut(&sketch.0)
            .ok_or(KernelError::SketchNotFound { sketch })?;
        let projected = Segment2 {
            start: s.plane.to_local(&edge.start),
            end: s.plane.to_local(&edge.end),
        };
        let length = (projected.end.x - projected.start.x).hypot(projected.end.y - projected.start.y);
        if length <= EPS {
            return Err(KernelError::ProjectionFailed {
                reason: "edge runs along the sketch normal".to_string(),
            });
        }
        s.projected.push(projected);
        Ok(projected)
    }

    fn extrude(&mut self, input: &ExtrudeInput) -> Result<Vec<BodyHandle>, KernelError> {
        if input.profiles.is_empty() {
            return Err(KernelError::Degenerate {
                reason: "empty profile set".to_string(),
            });
        }
        let regions = input
            .profiles
            .iter()
            .map(|p| self.region(p, input.distance))
            .collect::<Result<Vec<_>, _>>()?;

        match input.operation {
            ExtrudeOperation::NewBody => Ok(self.new_bodies(regions)),
            ExtrudeOperation::Cut => {
                let targets = self.targets(&input.participants);
                Ok(self.cut_bodies(&targets, &regions))
            }
            ExtrudeOperation::Join => {
                let targets = self.targets(&input.participants);
                self.join_regions(&targets, &regions)
            }
        }
    }

    fn combine(
        &mut self,
        target: BodyHandle,
        tools: &[BodyHandle],
        operation: CombineOperation,
        keep_tools: bool,
    ) -> Result<(), KernelError> {
        self.body(target)?;
        let mut tool_cells = Vec::new();
        for &tool in tools.iter().filter(|&&t| t != target) {
            tool_cells.extend(self.body(tool)?.cells.iter().copied());
        }

        match operation {
            CombineOperation::Cut => {
                self.cut_bodies(&[target], &tool_cells);
            }
            CombineOperation::Join => {
                if let Some(body) = self.bodies.get_mut(&target.0) {
                    for cell in &tool_cells {
                        let fresh = subtract_all(&[*cell], &body.cells);
                        body.cells.extend(fresh);
                    }
                }
                self.rebuild_faces(target.0);
            }
        }

        if !keep_tools {
            for tool in tools.iter().filter(|&&t| t != target) {
                self.bodies.remove(&tool.0);
            }
        }
        Ok(())
    }

    fn translate_body(&mut self, body: BodyHandle, offset: Vector3<f64>) -> Result<(), KernelError> {
        let b = self
            .bodies
            .get_mut(&body.0)
            .ok_or(KernelError::BodyNotFound { body })?;
        for cell in &mut b.cells {
            *cell = cell.translated(&offset);
        }
        for face in &mut b.faces {
            face.patch = face.patch.translated(&offset);
        }
        Ok(())
    }

    fn set_body_name(&mut self, body: BodyHandle, name: &str) -> Result<(), KernelError> {
        let b = self
            .bodies
            .get_mut(&body.0)
            .ok_or(KernelError::BodyNotFound { body })?;
        b.name = name.to_string();
        Ok(())
    }

    fn set_appearance(&mut self, body: BodyHandle, appearance: &str) -> Result<(), KernelError> {
        if !self.library.iter().any(|a| a == appearance) {
            return Err(KernelError::NotSupported {
                operation: format!("appearance {appearance:?} is not in the library"),
            });
        }
        let b = self
            .bodies
            .get_mut(&body.0)
            .ok_or(KernelError::BodyNotFound { body })?;
        b.appearance = Some(appearance.to_string());
        Ok(())
    }
}

impl KernelIntrospect for BoxKernel {
    fn bodies(&self) -> Vec<BodyHandle> {
        self.bodies.keys().map(|&h| BodyHandle(h)).collect()
    }

    fn body_name(&self, body: BodyHandle) -> Result<String, KernelError> {
        Ok(self.body(body)?.name.clone())
    }

    fn body_appearance(&self, body: BodyHandle) -> Result<Option<String>, KernelError> {
        Ok(self.body(body)?.appearance.clone())
    }

    fn body_bbox(&self, body: BodyHandle) -> Result<BoundingBox3, KernelError> {
        let b = self.body(body)?;
        b.cells
            .iter()
            .map(Cuboid::bbox)
            .reduce(|acc, bb| acc.union(&bb))
            .ok_or(KernelError::Degenerate {
                reason: format!("body {} has no cells", b.name),
            })
    }

    fn body_volume(&self, body: BodyHandle) -> Result<f64, KernelError> {
        Ok(self.body(body)?.cells.iter().map(Cuboid::volume).sum())
    }

    fn body_faces(&self, body: BodyHandle) -> Result<Vec<FaceInfo>, KernelError> {
        let b = self.body(body)?;
        Ok(b.faces.iter().map(|f| face_info(body, f)).collect())
    }

    fn face(&self, face: KernelId) -> Result<FaceInfo, KernelError> {
        let (body, f) = self.find_face(face)?;
        Ok(face_info(body, f))
    }

    fn face_edges(&self, face: KernelId) -> Result<Vec<Segment3>, KernelError> {
        let (_, f) = self.find_face(face)?;
        Ok(f.patch.edges())
    }

    fn face_contains_point(&self, face: KernelId, point: &Point3<f64>) -> Result<bool, KernelError> {
        let (_, f) = self.find_face(face)?;
        Ok(f.patch.contains(point, ON_FACE_TOL))
    }

    fn min_distance_face_face(&self, a: KernelId, b: KernelId) -> Result<f64, KernelError> {
        let (_, fa) = self.find_face(a)?;
        let (_, fb) = self.find_face(b)?;
        Ok(fa.patch.bbox().distance(&fb.patch.bbox()))
    }

    fn min_distance_face_body(&self, face: KernelId, body: BodyHandle) -> Result<f64, KernelError> {
        let (_, f) = self.find_face(face)?;
        let face_box = f.patch.bbox();
        self.body(body)?
            .cells
            .iter()
            .map(|cell| face_box.distance(&cell.bbox()))
            .reduce(f64::min)
            .ok_or(KernelError::Degenerate {
                reason: "body has no cells".to_string(),
            })
    }

    fn profiles(&self, sketch: SketchHandle) -> Result<Vec<ProfileInfo>, KernelError> {
        let s = self
            .sketches
            .get(&sketch.0)
            .ok_or(KernelError::SketchNotFound { sketch })?;
        Ok(s.profiles
            .iter()
            .map(|&(id, bounds)| ProfileInfo { id, bounds })
            .collect())
    }

    fn find_appearance(&self, candidates: &[&str]) -> Option<String> {
        candidates
            .iter()
            .find(|name| self.library.iter().any(|a| a == *name))
            .map(|name| name.to_string())
    }
}

fn face_info(body: BodyHandle, face: &BoxFace) -> FaceInfo {
    FaceInfo {
        id: face.id,
        body,
        surface: SurfaceKind::Planar,
        bbox: face.patch.bbox(),
        point: face.patch.center(),
        normal: Some(face.patch.normal()),
        area: face.patch.rect.area(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sketch_rect(kernel: &mut BoxKernel, plane: Plane, rect: Rect2) -> KernelId {
        let sketch = kernel.create_sketch(plane).unwrap();
        kernel.add_rectangle(sketch, rect).unwrap()
    }

    #[test]
    fn new_body_extrude_makes_six_faced_box() {
        let mut kernel = BoxKernel::new();
        let profile = sketch_rect(&mut kernel, Plane::xy(), Rect2::new(0.0, 0.0, 2.0, 3.0));
        let bodies = kernel
            .extrude(&ExtrudeInput::new(
                vec![ProfileRef::Sketch(profile)],
                4.0,
                ExtrudeOperation::NewBody,
            ))
            .unwrap();

        assert_eq!(bodies.len(), 1);
        assert_relative_eq!(kernel.body_volume(bodies[0]).unwrap(), 24.0);
        assert_eq!(kernel.body_faces(bodies[0]).unwrap().len(), 6);
        let bbox = kernel.body_bbox(bodies[0]).unwrap();
        assert_relative_eq!(bbox.max.z, 4.0);
        assert_eq!(kernel.body_name(bodies[0]).unwrap(), "Body1");
    }

    #[test]
    fn disjoint_profiles_become_separate_bodies() {
        let mut kernel = BoxKernel::new();
        let sketch = kernel.create_sketch(Plane::xy()).unwrap();
        let a = kernel.add_rectangle(sketch, Rect2::new(0.0, 0.0, 1.0, 1.0)).unwrap();
        let b = kernel.add_rectangle(sketch, Rect2::new(5.0, 0.0, 6.0, 1.0)).unwrap();
        let bodies = kernel
            .extrude(&ExtrudeInput::new(
                vec![ProfileRef::Sketch(a), ProfileRef::Sketch(b)],
                1.0,
                ExtrudeOperation::NewBody,
            ))
            .unwrap();
        assert_eq!(bodies.len(), 2);
        assert_eq!(kernel.body_name(bodies[1]).unwrap(), "Body2");
    }

    #[test]
    fn touching_profiles_fuse_into_one_body() {
        let mut kernel = BoxKernel::new();
        let sketch = kernel.create_sketch(Plane::xy()).unwrap();
        let a = kernel.add_rectangle(sketch, Rect2::new(0.0, 0.0, 1.0, 1.0)).unwrap();
        let b = kernel.add_rectangle(sketch, Rect2::new(1.0, 0.0, 2.0, 1.0)).unwrap();
        let bodies = kernel
            .extrude(&ExtrudeInput::new(
                vec![ProfileRef::Sketch(a), ProfileRef::Sketch(b)],
                1.0,
                ExtrudeOperation::NewBody,
            ))
            .unwrap();
        assert_eq!(bodies.len(), 1);
        assert_relative_eq!(kernel.body_volume(bodies[0]).unwrap(), 2.0);
        assert_eq!(kernel.body_faces(bodies[0]).unwrap().len(), 6);
    }

    #[test]
    fn cut_limited_to_participants() {
        let mut kernel = BoxKernel::new();
        let a = kernel.add_box([0.0; 3], [2.0, 2.0, 2.0], "A");
        let b = kernel.add_box([0.0, 0.0, 3.0], [2.0, 2.0, 5.0], "B");
        let tool = sketch_rect(&mut kernel, Plane::xy().offset_by(-1.0), Rect2::new(0.5, 0.5, 1.5, 1.5));

        let modified = kernel
            .extrude(
                &ExtrudeInput::new(vec![ProfileRef::Sketch(tool)], 10.0, ExtrudeOperation::Cut)
                    .with_participants(vec![a]),
            )
            .unwrap();

        assert_eq!(modified, vec![a]);
        assert_relative_eq!(kernel.body_volume(a).unwrap(), 8.0 - 2.0);
        assert_relative_eq!(kernel.body_volume(b).unwrap(), 8.0);
    }

    #[test]
    fn join_without_touching_participant_fails() {
        let mut kernel = BoxKernel::new();
        let a = kernel.add_box([0.0; 3], [1.0; 3], "A");
        let far = sketch_rect(&mut kernel, Plane::xy(), Rect2::new(5.0, 5.0, 6.0, 6.0));
        let err = kernel
            .extrude(
                &ExtrudeInput::new(vec![ProfileRef::Sketch(far)], 1.0, ExtrudeOperation::Join)
                    .with_participants(vec![a]),
            )
            .unwrap_err();
        assert!(matches!(err, KernelError::NoTargetBody { .. }));
    }

    #[test]
    fn face_extrude_follows_outward_normal() {
        let mut kernel = BoxKernel::new();
        let body = kernel.add_box([0.0; 3], [1.0, 1.0, 1.0], "A");
        let faces = kernel.body_faces(body).unwrap();
        let top = faces.iter().find(|f| f.normal == Some(Vector3::z())).unwrap().clone();
        let bottom = faces.iter().find(|f| f.normal == Some(-Vector3::z())).unwrap().clone();

        kernel
            .extrude(
                &ExtrudeInput::new(vec![ProfileRef::Face(top.id)], -0.25, ExtrudeOperation::Cut)
                    .with_participants(vec![body]),
            )
            .unwrap();

        let bbox = kernel.body_bbox(body).unwrap();
        assert_relative_eq!(bbox.max.z, 0.75);
        // The moved top face is a new face; the untouched bottom keeps its id.
        assert!(kernel.face(top.id).is_err());
        assert!(kernel.face(bottom.id).is_ok());
    }

    #[test]
    fn zero_distance_is_degenerate() {
        let mut kernel = BoxKernel::new();
        let profile = sketch_rect(&mut kernel, Plane::xy(), Rect2::new(0.0, 0.0, 1.0, 1.0));
        let err = kernel
            .extrude(&ExtrudeInput::new(
                vec![ProfileRef::Sketch(profile)],
                0.0,
                ExtrudeOperation::NewBody,
            ))
            .unwrap_err();
        assert!(matches!(err, KernelError::Degenerate { .. }));
    }

    #[test]
    fn combine_join_merges_and_removes_tools() {
        let mut kernel = BoxKernel::new();
        let a = kernel.add_box([0.0; 3], [1.0; 3], "A");
        let b = kernel.add_box([1.0, 0.0, 0.0], [2.0, 1.0, 1.0], "B");
        kernel.combine(a, &[b], CombineOperation::Join, false).unwrap();
        assert_eq!(kernel.bodies(), vec![a]);
        assert_relative_eq!(kernel.body_volume(a).unwrap(), 2.0);
    }

    #[test]
    fn overlap_volume_ignores_touching() {
        let mut kernel = BoxKernel::new();
        let a = kernel.add_box([0.0; 3], [2.0; 3], "A");
        let b = kernel.add_box([1.0, 1.0, 1.0], [3.0, 3.0, 3.0], "B");
        let c = kernel.add_box([2.0, 0.0, 0.0], [4.0, 1.0, 1.0], "C");
        assert_relative_eq!(kernel.overlap_volume(a, b).unwrap(), 1.0);
        assert_relative_eq!(kernel.overlap_volume(a, c).unwrap(), 0.0);
    }

    #[test]
    fn translate_keeps_face_ids() {
        let mut kernel = BoxKernel::new();
        let body = kernel.add_box([0.0; 3], [1.0; 3], "A");
        let before: Vec<KernelId> = kernel.body_faces(body).unwrap().iter().map(|f| f.id).collect();
        kernel.translate_body(body, Vector3::new(10.0, 0.0, 0.0)).unwrap();
        let after = kernel.body_faces(body).unwrap();
        assert_eq!(before, after.iter().map(|f| f.id).collect::<Vec<_>>());
        assert_relative_eq!(kernel.body_bbox(body).unwrap().min.x, 10.0);
    }

    #[test]
    fn projection_onto_side_plane() {
        let mut kernel = BoxKernel::new();
        let sketch = kernel.create_sketch(Plane::yz()).unwrap();
        let edge = Segment3 {
            start: Point3::new(3.0, 2.0, 0.0),
            end: Point3::new(3.0, 2.0, 8.0),
        };
        let seg = kernel.project_edge(sketch, &edge).unwrap();
        assert_relative_eq!(seg.start.y, 2.0);
        assert_relative_eq!(seg.end.x, 8.0);

        let along_normal = Segment3 {
            start: Point3::new(0.0, 1.0, 1.0),
            end: Point3::new(5.0, 1.0, 1.0),
        };
        assert!(matches!(
            kernel.project_edge(sketch, &along_normal),
            Err(KernelError::ProjectionFailed { .. })
        ));
    }

    #[test]
    fn appearance_must_come_from_library() {
        let mut kernel = BoxKernel::with_library(["Pine"]);
        let body = kernel.add_box([0.0; 3], [1.0; 3], "A");
        assert_eq!(kernel.find_appearance(&["Walnut", "Pine"]), Some("Pine".to_string()));
        assert!(kernel.set_appearance(body, "Walnut").is_err());
        kernel.set_appearance(body, "Pine").unwrap();
        assert_eq!(kernel.body_appearance(body).unwrap().as_deref(), Some("Pine"));
    }

    #[test]
    fn face_distances_use_gaps() {
        let mut kernel = BoxKernel::new();
        let a = kernel.add_box([0.0; 3], [1.0; 3], "A");
        let b = kernel.add_box([1.5, 0.0, 0.0], [2.5, 1.0, 1.0], "B");
        let right = kernel
            .body_faces(a)
            .unwrap()
            .into_iter()
            .find(|f| f.normal == Some(Vector3::x()))
            .unwrap();
        assert_relative_eq!(kernel.min_distance_face_body(right.id, b).unwrap(), 0.5);
        assert!(kernel
            .face_contains_point(right.id, &Point3::new(1.0, 0.5, 0.5))
            .unwrap());
    }
}
