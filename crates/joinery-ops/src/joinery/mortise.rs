use frame_kernel::{BodyHandle, ExtrudeOperation, Plane, Segment2, SketchHandle, SurfaceKind};
use frame_types::{ParameterSet, Rect2};
use tracing::{debug, instrument};

use super::{issue, plane_failed, side_offsets};
use crate::extrude::FrameBodies;
use crate::kernel_ext::KernelBundle;
use crate::layout::FrameLayout;
use crate::profile::{draw_profiles, open_cut_sketch, side_rect, JoineryCut, SketchedCut};
use crate::types::{OpError, OpResult};

/// Projected lines whose end heights differ by less than this are horizontal.
const HORIZONTAL_EPS: f64 = 1e-4;
/// How far a rail face may sit from the sketch plane and still be projected.
const FACE_POSITION_TOL: f64 = 0.01;
/// Minimum |normal.x| for a face to count as a rail end face.
const AXIS_DOMINANCE: f64 = 0.9;

/// Z band a tenon occupies: the middle third of the frame depth.
pub fn tenon_band(depth: f64) -> (f64, f64) {
    let width = depth / 3.0;
    (depth / 2.0 - width / 2.0, depth / 2.0 + width / 2.0)
}

/// A rail end face projected onto a side sketch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedRail {
    /// Center height of the rail body's bounding box.
    pub center_y: f64,
    pub top: Segment2,
    pub bottom: Segment2,
}

/// Cut a mortise into the stiles and join a tenon onto each rail, on both
/// side planes.
#[instrument(skip_all, fields(rails = layout.rail_centers.len()))]
pub fn cut_mortise_tenons(
    kb: &mut dyn KernelBundle,
    params: &ParameterSet,
    layout: &FrameLayout,
    bodies: &FrameBodies,
) -> OpResult {
    let mut result = OpResult::default();
    for (offset, sign) in side_offsets(params) {
        let context = format!("Mortise & Tenon plane x={offset}");
        if let Err(error) = tenon_plane(
            kb,
            params,
            &layout.rail_centers,
            offset,
            sign,
            bodies,
            &mut result,
            &context,
        ) {
            plane_failed(&mut result, &context, error);
        }
    }
    result
}

#[allow(clippy::too_many_arguments)]
fn tenon_plane(
    kb: &mut dyn KernelBundle,
    params: &ParameterSet,
    rail_centers: &[f64],
    offset: f64,
    sign: f64,
    bodies: &FrameBodies,
    result: &mut OpResult,
    context: &str,
) -> Result<(), OpError> {
    let plane = Plane::yz().offset_by(offset);
    let (plane_id, sketch) = open_cut_sketch(kb, plane)?;
    let (z_min, z_max) = tenon_band(params.depth);
    let projected = project_rails(kb, sketch, offset, &bodies.horizontal);

    let mut cut = JoineryCut::new(plane, params.ply * sign);
    for &cy in rail_centers {
        let nominal = side_rect(&plane, cy, params.ply, z_min, z_max);
        let rect = match nearest_rail(&projected, cy) {
            Some(rail) => align_tenon(&nominal, rail),
            None => {
                debug!(cy, "no projected rail near tenon, left at nominal position");
                result.warn(format!("{context}: tenon at y={cy} not aligned to a rail"));
                nominal
            }
        };
        cut.rects.push(rect);
    }

    let profiles = draw_profiles(kb, sketch, &cut.rects, context)?;
    let sketched = SketchedCut {
        plane: plane_id,
        sketch,
        profiles,
    };
    issue(
        kb,
        result,
        "Mortise",
        &sketched,
        cut.distance,
        ExtrudeOperation::Cut,
        &bodies.stiles,
    );
    issue(
        kb,
        result,
        "Tenon",
        &sketched,
        cut.distance,
        ExtrudeOperation::Join,
        &bodies.horizontal,
    );
    Ok(())
}

/// Project the end face of every rail lying on the sketch plane.
///
/// Rails without such a face, or whose projection lacks a top and bottom
/// line, are left out.
pub fn project_rails(
    kb: &mut dyn KernelBundle,
    sketch: SketchHandle,
    offset: f64,
    rails: &[BodyHandle],
) -> Vec<ProjectedRail> {
    let mut projected = Vec::new();
    for &rail in rails {
        let Ok(faces) = kb.as_introspect().body_faces(rail) else {
            continue;
        };
        let Some(face) = faces.into_iter().find(|f| {
            f.surface == SurfaceKind::Planar
                && f.normal.is_some_and(|n| n.x.abs() >= AXIS_DOMINANCE)
                && (f.point.x - offset).abs() <= FACE_POSITION_TOL
        }) else {
            continue;
        };
        let Ok(edges) = kb.as_introspect().face_edges(face.id) else {
            continue;
        };

        let mut lines = Vec::new();
        for edge in &edges {
            match kb.project_edge(sketch, edge) {
                Ok(line) => lines.push(line),
                Err(e) => debug!(%e, "edge projection skipped"),
            }
        }

        let (Some(top), Some(bottom)) = top_and_bottom(&lines) else {
            continue;
        };
        let Ok(bbox) = kb.as_introspect().body_bbox(rail) else {
            continue;
        };
        projected.push(ProjectedRail {
            center_y: (bbox.min.y + bbox.max.y) / 2.0,
            top,
            bottom,
        });
    }
    projected
}

/// Highest and lowest horizontal lines.
fn top_and_bottom(lines: &[Segment2]) -> (Option<Segment2>, Option<Segment2>) {
    let horizontal: Vec<Segment2> = lines
        .iter()
        .filter(|l| (l.start.y - l.end.y).abs() < HORIZONTAL_EPS)
        .copied()
        .collect();
    let top = horizontal
        .iter()
        .max_by(|a, b| a.midpoint().y.total_cmp(&b.midpoint().y))
        .copied();
    let bottom = horizontal
        .iter()
        .min_by(|a, b| a.midpoint().y.total_cmp(&b.midpoint().y))
        .copied();
    (top, bottom)
}

/// Projected rail whose center is closest to `cy`.
pub fn nearest_rail(projected: &[ProjectedRail], cy: f64) -> Option<&ProjectedRail> {
    projected
        .iter()
        .min_by(|a, b| (a.center_y - cy).abs().total_cmp(&(b.center_y - cy).abs()))
}

/// Move a tenon so its top and bottom lie on the rail's projected top and
/// bottom lines and its top midpoint coincides with the rail's.
pub fn align_tenon(tenon: &Rect2, rail: &ProjectedRail) -> Rect2 {
    let half = tenon.width() / 2.0;
    let center = rail.top.midpoint().x;
    Rect2::new(
        center - half,
        rail.bottom.midpoint().y,
        center + half,
        rail.top.midpoint().y,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use frame_types::Point2;

    fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> Segment2 {
        Segment2 {
            start: Point2::new(x1, y1),
            end: Point2::new(x2, y2),
        }
    }

    #[test]
    fn tenon_band_is_middle_third() {
        let (lo, hi) = tenon_band(9.0);
        assert_relative_eq!(lo, 3.0);
        assert_relative_eq!(hi, 6.0);
    }

    #[test]
    fn tenon_snaps_to_projected_rail() {
        let rail = ProjectedRail {
            center_y: 20.0,
            top: line(0.0, 20.4, 8.0, 20.4),
            bottom: line(8.0, 19.6, 0.0, 19.6),
        };
        let nominal = Rect2::new(2.0, 19.0, 4.0, 20.0);
        let aligned = align_tenon(&nominal, &rail);
        assert_relative_eq!(aligned.min.y, 19.6);
        assert_relative_eq!(aligned.max.y, 20.4);
        assert_relative_eq!(aligned.center().x, 4.0);
        assert_relative_eq!(aligned.width(), 2.0);
    }

    #[test]
    fn nearest_rail_by_center() {
        let make = |cy: f64| ProjectedRail {
            center_y: cy,
            top: line(0.0, cy + 0.5, 1.0, cy + 0.5),
            bottom: line(0.0, cy - 0.5, 1.0, cy - 0.5),
        };
        let rails = [make(10.0), make(30.0), make(50.0)];
        assert_eq!(nearest_rail(&rails, 33.0).map(|r| r.center_y), Some(30.0));
        assert!(nearest_rail(&[], 33.0).is_none());
    }

    #[test]
    fn vertical_lines_are_not_top_or_bottom() {
        let lines = [
            line(0.0, 0.0, 0.0, 1.0),
            line(0.0, 1.0, 4.0, 1.0),
            line(4.0, 0.0, 0.0, 0.0),
        ];
        let (top, bottom) = top_and_bottom(&lines);
        assert_relative_eq!(top.unwrap().start.y, 1.0);
        assert_relative_eq!(bottom.unwrap().start.y, 0.0);
    }
}
