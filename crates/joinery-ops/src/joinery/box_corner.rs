use frame_kernel::{ExtrudeOperation, Plane};
use frame_types::{ParameterSet, Rect2};
use tracing::instrument;

use super::{issue, plane_failed, side_offsets};
use crate::extrude::FrameBodies;
use crate::kernel_ext::KernelBundle;
use crate::profile::{side_rect, sketch_cut, JoineryCut};
use crate::types::OpResult;

/// Z bands of the fingers: every even-indexed band when the depth is split
/// into `finger_count` equal bands.
pub fn finger_bands(depth: f64, finger_count: u32) -> Vec<(f64, f64)> {
    let finger_w = depth / f64::from(finger_count);
    (0..finger_count)
        .filter(|i| i % 2 == 0)
        .map(|i| (f64::from(i) * finger_w, f64::from(i + 1) * finger_w))
        .collect()
}

/// Finger rectangles of one side plane: both corner bands, bottom first.
pub fn finger_rects(plane: &Plane, params: &ParameterSet) -> Vec<Rect2> {
    let corner_centers = [params.ply / 2.0, params.height - params.ply / 2.0];
    let bands = finger_bands(params.depth, params.finger_count);
    corner_centers
        .iter()
        .flat_map(|&cy| {
            bands
                .iter()
                .map(move |&(z_min, z_max)| side_rect(plane, cy, params.ply, z_min, z_max))
        })
        .collect()
}

/// Interleave fingers at all four corners: the finger volume is joined to
/// the stiles and cut from the plates.
#[instrument(skip_all, fields(fingers = params.finger_count))]
pub fn cut_box_corners(
    kb: &mut dyn KernelBundle,
    params: &ParameterSet,
    bodies: &FrameBodies,
) -> OpResult {
    let mut result = OpResult::default();
    for (offset, sign) in side_offsets(params) {
        let context = format!("Box corners plane x={offset}");
        let plane = Plane::yz().offset_by(offset);
        let cut = JoineryCut {
            rects: finger_rects(&plane, params),
            ..JoineryCut::new(plane, params.ply * sign)
        };
        let sketched = match sketch_cut(kb, &cut, &context) {
            Ok(sketched) => sketched,
            Err(error) => {
                plane_failed(&mut result, &context, error);
                continue;
            }
        };
        issue(
            kb,
            &mut result,
            "Box Fingers",
            &sketched,
            cut.distance,
            ExtrudeOperation::Join,
            &bodies.stiles,
        );
        issue(
            kb,
            &mut result,
            "Box Sockets",
            &sketched,
            cut.distance,
            ExtrudeOperation::Cut,
            &bodies.horizontal,
        );
    }
    result
}
