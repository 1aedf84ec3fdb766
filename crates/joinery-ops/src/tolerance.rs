//! Tolerance pass: find touching faces between frame bodies and decide
//! which side of each interface gives up material.
//!
//! Faces that define the frame's overall size are never cut: X-facing ends
//! keep the width, exterior Z faces keep the depth and the main surfaces of
//! a plate keep its thickness. For every other face the first touching
//! partner decides; the yielding face becomes a [`CutDirective`].

use frame_kernel::{
    BodyHandle, BoundingBox3, ExtrudeInput, ExtrudeOperation, FaceInfo, KernelId,
    KernelIntrospect, ProfileRef, SurfaceKind,
};
use frame_types::BodyTag;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::kernel_ext::KernelBundle;
use crate::types::{FeatureKind, FeatureRecord, OpResult};

/// Faces closer than this touch.
pub const TOUCH_TOLERANCE: f64 = 0.005;
/// How close a face must sit to its body's extreme to count as exterior.
pub const FACE_POSITION_TOLERANCE: f64 = 0.01;
/// |n_a · n_b| above this means parallel.
pub const PARALLEL_THRESHOLD: f64 = 0.99;
/// A normal component above this marks the face as facing that axis.
pub const AXIS_DOMINANCE: f64 = 0.9;
/// Area differences within this are a tie.
pub const AREA_EPSILON: f64 = 1e-4;

/// Timeline group the tolerance cuts are filed under.
pub const TOLERANCE_GROUP: &str = "Tolerance Cuts";

/// A face to push inward by the tolerance gap, and the body that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CutDirective {
    pub face: KernelId,
    pub body: BodyHandle,
}

/// How the analyzer treats a face before looking at neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceClass {
    /// Not planar; never cut.
    NonPlanar,
    /// Normal mostly along X.
    XFacing,
    /// Z-facing face on the body's front or back.
    ExteriorZ,
    /// Y-facing face on a plate's top or bottom.
    PlateMainSurface,
    Candidate,
}

impl FaceClass {
    pub fn is_candidate(self) -> bool {
        self == FaceClass::Candidate
    }
}

/// Classify one face of a body with the given bounding box and tag.
pub fn classify_face(face: &FaceInfo, body_bbox: &BoundingBox3, tag: Option<BodyTag>) -> FaceClass {
    let Some(normal) = face.normal.filter(|_| face.surface == SurfaceKind::Planar) else {
        return FaceClass::NonPlanar;
    };
    if normal.x.abs() > AXIS_DOMINANCE {
        return FaceClass::XFacing;
    }
    let at_extreme = |axis: usize| {
        let center = (face.bbox.min[axis] + face.bbox.max[axis]) / 2.0;
        (center - body_bbox.min[axis]).abs() < FACE_POSITION_TOLERANCE
            || (center - body_bbox.max[axis]).abs() < FACE_POSITION_TOLERANCE
    };
    if normal.z.abs() >= AXIS_DOMINANCE && at_extreme(2) {
        return FaceClass::ExteriorZ;
    }
    if tag == Some(BodyTag::Plate) && normal.y.abs() >= AXIS_DOMINANCE && at_extreme(1) {
        return FaceClass::PlateMainSurface;
    }
    FaceClass::Candidate
}

/// Whether face `a` yields to touching face `b`.
///
/// Plates yield to stiles and stiles to rails. Any other pairing gives way
/// by area, smaller first, with ties going to the lower face id.
pub fn yields(tag_a: Option<BodyTag>, a: &FaceInfo, tag_b: Option<BodyTag>, b: &FaceInfo) -> bool {
    use BodyTag::{Plate, Rail, Stile};
    match (tag_a, tag_b) {
        (Some(Plate), Some(Stile)) => true,
        (Some(Stile), Some(Plate)) => false,
        (Some(Stile), Some(Rail)) => true,
        (Some(Rail), Some(Stile)) => false,
        _ => {
            let diff = a.area - b.area;
            if diff < -AREA_EPSILON {
                true
            } else if diff.abs() <= AREA_EPSILON {
                a.id < b.id
            } else {
                false
            }
        }
    }
}

fn parallel(a: &FaceInfo, b: &FaceInfo) -> bool {
    match (a.normal, b.normal) {
        (Some(na), Some(nb)) => na.dot(&nb).abs() > PARALLEL_THRESHOLD,
        _ => false,
    }
}

fn overlapping(kernel: &dyn KernelIntrospect, a: &FaceInfo, b: &FaceInfo) -> bool {
    kernel.face_contains_point(b.id, &a.point).unwrap_or(false)
        || kernel.face_contains_point(a.id, &b.point).unwrap_or(false)
        || a.bbox.intersects(&b.bbox)
}

/// First face of `body_b` touching `face_a`, if any.
///
/// A failing probe counts as no contact.
fn touching_face(
    kernel: &dyn KernelIntrospect,
    face_a: &FaceInfo,
    faces_b: &[FaceInfo],
) -> Option<FaceInfo> {
    faces_b
        .iter()
        .filter(|face_b| face_a.bbox.intersects(&face_b.bbox))
        .find(|face_b| {
            match kernel.min_distance_face_face(face_a.id, face_b.id) {
                Ok(d) if d <= TOUCH_TOLERANCE => {}
                Ok(_) => return false,
                Err(e) => {
                    debug!(%e, a = ?face_a.id, b = ?face_b.id, "face probe failed");
                    return false;
                }
            }
            match face_b.surface {
                SurfaceKind::Planar => parallel(face_a, face_b) && overlapping(kernel, face_a, face_b),
                SurfaceKind::NonPlanar => overlapping(kernel, face_a, face_b),
            }
        })
        .cloned()
}

struct BodyView {
    handle: BodyHandle,
    tag: Option<BodyTag>,
    bbox: BoundingBox3,
    faces: Vec<FaceInfo>,
}

/// Decide which faces of `bodies` must be cut to open the tolerance gap.
///
/// Deterministic for a given kernel state: bodies and faces are visited in
/// the order given and ties fall to the lower face id.
#[instrument(skip_all, fields(bodies = bodies.len()))]
pub fn analyze_tolerance(kernel: &dyn KernelIntrospect, bodies: &[BodyHandle]) -> Vec<CutDirective> {
    let views: Vec<BodyView> = bodies
        .iter()
        .filter_map(|&handle| {
            let probe = || -> Result<BodyView, frame_kernel::KernelError> {
                Ok(BodyView {
                    handle,
                    tag: BodyTag::from_name(&kernel.body_name(handle)?),
                    bbox: kernel.body_bbox(handle)?,
                    faces: kernel.body_faces(handle)?,
                })
            };
            probe()
                .map_err(|e| debug!(%e, ?handle, "body skipped by tolerance analysis"))
                .ok()
        })
        .collect();

    let mut cuts = Vec::new();
    for view_a in &views {
        for face_a in &view_a.faces {
            if !classify_face(face_a, &view_a.bbox, view_a.tag).is_candidate() {
                continue;
            }

            let mut should_cut = false;
            for view_b in views.iter().filter(|v| v.handle != view_a.handle) {
                if !face_a.bbox.intersects(&view_b.bbox) {
                    continue;
                }
                match kernel.min_distance_face_body(face_a.id, view_b.handle) {
                    Ok(d) if d <= TOUCH_TOLERANCE => {}
                    Ok(_) => continue,
                    Err(e) => {
                        debug!(%e, face = ?face_a.id, "body probe failed");
                        continue;
                    }
                }
                let Some(face_b) = touching_face(kernel, face_a, &view_b.faces) else {
                    continue;
                };
                should_cut = yields(view_a.tag, face_a, view_b.tag, &face_b);
                if should_cut {
                    break;
                }
            }

            if should_cut {
                cuts.push(CutDirective {
                    face: face_a.id,
                    body: view_a.handle,
                });
            }
        }
    }
    debug!(cuts = cuts.len(), "tolerance analysis done");
    cuts
}

/// Push each directive's face inward by `gap`, cutting only its own body.
///
/// Directive faces are captured before the first cut. A face renamed by an
/// earlier cut on the same body is found again by plane and position; a
/// directive that still cannot be applied is skipped with a warning. A zero
/// gap cuts nothing.
#[instrument(skip_all, fields(directives = directives.len(), gap))]
pub fn apply_tolerance_cuts(
    kb: &mut dyn KernelBundle,
    directives: &[CutDirective],
    gap: f64,
) -> OpResult {
    let mut result = OpResult::default();
    if gap <= 0.0 {
        debug!("zero tolerance gap, no cuts");
        return result;
    }
    let snapshots: Vec<(CutDirective, Option<FaceInfo>)> = directives
        .iter()
        .map(|d| (*d, kb.as_introspect().face(d.face).ok()))
        .collect();

    for (directive, snapshot) in snapshots {
        let Some(face) = resolve_face(kb.as_introspect(), &directive, snapshot.as_ref()) else {
            debug!(?directive, "tolerance face no longer exists");
            result.warn(format!(
                "tolerance cut on face {} skipped: face not found",
                directive.face.0
            ));
            continue;
        };
        let input = ExtrudeInput::new(vec![ProfileRef::Face(face)], -gap, ExtrudeOperation::Cut)
            .with_participants(vec![directive.body]);
        let name = format!("Tolerance Cut {}", result.features.len() + 1);
        match kb.extrude(&input) {
            Ok(bodies) => result.push(FeatureRecord {
                bodies,
                profile_count: 1,
                group: Some(TOLERANCE_GROUP.to_string()),
                ..FeatureRecord::new(name, FeatureKind::CUT)
            }),
            Err(e) => {
                warn!(%e, ?directive, "tolerance cut skipped");
                result.warn(format!("{name} skipped: {e}"));
            }
        }
    }
    result
}

fn resolve_face(
    kernel: &dyn KernelIntrospect,
    directive: &CutDirective,
    snapshot: Option<&FaceInfo>,
) -> Option<KernelId> {
    if kernel.face(directive.face).is_ok() {
        return Some(directive.face);
    }
    let original = snapshot?;
    let normal = original.normal?;
    kernel
        .body_faces(directive.body)
        .ok()?
        .into_iter()
        .find(|f| {
            f.normal.is_some_and(|n| n.dot(&normal) > PARALLEL_THRESHOLD)
                && kernel.face_contains_point(f.id, &original.point).unwrap_or(false)
        })
        .map(|f| f.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use frame_kernel::BoxKernel;
    use nalgebra::Vector3;

    fn face_facing(kernel: &BoxKernel, body: BodyHandle, normal: Vector3<f64>) -> FaceInfo {
        kernel
            .body_faces(body)
            .unwrap()
            .into_iter()
            .find(|f| f.normal.is_some_and(|n| n.dot(&normal) > PARALLEL_THRESHOLD))
            .unwrap()
    }

    fn with_area(face: &FaceInfo, area: f64) -> FaceInfo {
        FaceInfo { area, ..face.clone() }
    }

    #[test]
    fn equal_rails_cut_lower_face_id_once() {
        let mut kernel = BoxKernel::new();
        let lower = kernel.add_box([0.0, 0.0, 0.0], [1.0, 1.0, 3.0], "Rail");
        let upper = kernel.add_box([0.0, 1.0, 0.0], [1.0, 2.0, 3.0], "Rail");
        let top = face_facing(&kernel, lower, Vector3::y());
        let bottom = face_facing(&kernel, upper, -Vector3::y());
        assert_relative_eq!(top.area, bottom.area);

        let cuts = analyze_tolerance(&kernel, &[lower, upper]);
        assert_eq!(cuts.len(), 1);
        let (face, body) = if top.id < bottom.id {
            (top.id, lower)
        } else {
            (bottom.id, upper)
        };
        assert_eq!(cuts[0], CutDirective { face, body });
    }

    #[test]
    fn smaller_face_yields_to_larger() {
        let mut kernel = BoxKernel::new();
        let wide = kernel.add_box([0.0, 0.0, 0.0], [4.0, 1.0, 3.0], "Rail");
        let narrow = kernel.add_box([0.0, 1.0, 0.0], [1.0, 2.0, 3.0], "Rail");
        let bottom = face_facing(&kernel, narrow, -Vector3::y());

        let cuts = analyze_tolerance(&kernel, &[wide, narrow]);
        assert_eq!(cuts, vec![CutDirective { face: bottom.id, body: narrow }]);
    }

    #[test]
    fn role_order_beats_area() {
        let mut kernel = BoxKernel::new();
        let a = kernel.add_box([0.0, 0.0, 0.0], [4.0, 1.0, 3.0], "Body");
        let b = kernel.add_box([0.0, 1.0, 0.0], [1.0, 2.0, 3.0], "Body");
        let big = with_area(&face_facing(&kernel, a, Vector3::y()), 12.0);
        let small = with_area(&face_facing(&kernel, b, -Vector3::y()), 3.0);
        let (plate, stile, rail) = (Some(BodyTag::Plate), Some(BodyTag::Stile), Some(BodyTag::Rail));

        assert!(yields(plate, &big, stile, &small));
        assert!(!yields(stile, &small, plate, &big));
        assert!(yields(stile, &big, rail, &small));
        assert!(!yields(rail, &small, stile, &big));
    }

    #[test]
    fn untagged_faces_yield_by_area_then_id() {
        let mut kernel = BoxKernel::new();
        let a = kernel.add_box([0.0, 0.0, 0.0], [4.0, 1.0, 3.0], "Body");
        let b = kernel.add_box([0.0, 1.0, 0.0], [1.0, 2.0, 3.0], "Body");
        let big = face_facing(&kernel, a, Vector3::y());
        let small = face_facing(&kernel, b, -Vector3::y());

        assert!(yields(None, &small, None, &big));
        assert!(!yields(None, &big, None, &small));
        assert!(!yields(Some(BodyTag::Panel), &big, Some(BodyTag::Rail), &small));

        let tied = with_area(&small, big.area + AREA_EPSILON / 2.0);
        assert_eq!(yields(None, &big, None, &tied), big.id < tied.id);
        assert_eq!(yields(None, &tied, None, &big), tied.id < big.id);
    }

    #[test]
    fn zero_gap_leaves_bodies_alone() {
        let mut kernel = BoxKernel::new();
        let lower = kernel.add_box([0.0, 0.0, 0.0], [1.0, 1.0, 3.0], "Rail");
        let upper = kernel.add_box([0.0, 1.0, 0.0], [1.0, 2.0, 3.0], "Rail");
        let cuts = analyze_tolerance(&kernel, &[lower, upper]);
        assert!(!cuts.is_empty());

        let result = apply_tolerance_cuts(&mut kernel, &cuts, 0.0);
        assert!(result.features.is_empty());
        assert!(result.diagnostics.warnings.is_empty());
        assert_relative_eq!(kernel.body_volume(lower).unwrap(), 3.0);
        assert_relative_eq!(kernel.body_volume(upper).unwrap(), 3.0);
    }

    #[test]
    fn gap_cut_removes_one_slab() {
        let mut kernel = BoxKernel::new();
        let lower = kernel.add_box([0.0, 0.0, 0.0], [1.0, 1.0, 3.0], "Rail");
        let upper = kernel.add_box([0.0, 1.0, 0.0], [1.0, 2.0, 3.0], "Rail");
        let cuts = analyze_tolerance(&kernel, &[lower, upper]);

        let result = apply_tolerance_cuts(&mut kernel, &cuts, 0.01);
        assert_eq!(result.features.len(), 1);
        assert_eq!(result.features[0].group.as_deref(), Some(TOLERANCE_GROUP));
        let total = kernel.body_volume(lower).unwrap() + kernel.body_volume(upper).unwrap();
        assert_relative_eq!(total, 6.0 - 0.03, epsilon = 1e-9);
    }

    #[test]
    fn unresolvable_directive_becomes_warning() {
        let mut kernel = BoxKernel::new();
        let body = kernel.add_box([0.0, 0.0, 0.0], [1.0, 1.0, 3.0], "Rail");
        let stale = CutDirective {
            face: KernelId(9999),
            body,
        };

        let result = apply_tolerance_cuts(&mut kernel, &[stale], 0.01);
        assert!(result.features.is_empty());
        assert_eq!(result.diagnostics.warnings.len(), 1);
        assert!(result.diagnostics.warnings[0].contains("9999"));
        assert_relative_eq!(kernel.body_volume(body).unwrap(), 3.0);
    }
}
