//! Rectangle profiles for frame members and joint cuts.

use frame_kernel::{KernelId, Plane, SketchHandle};
use frame_types::{Rect2, Rectangle};
use nalgebra::Point3;
use tracing::debug;

use crate::kernel_ext::KernelBundle;
use crate::types::OpError;

/// Draw a rectangle into a sketch and return the id of the profile it bounds.
pub fn draw_rectangle(
    kb: &mut dyn KernelBundle,
    sketch: SketchHandle,
    rect: &Rectangle,
) -> Result<KernelId, OpError> {
    Ok(kb.add_rectangle(sketch, rect.bounds())?)
}

/// Local rectangle on a side (YZ) plane for a tab centered at `y_center`.
///
/// The corners are given in model space and mapped into the sketch, so the
/// result is correct for any plane offset.
pub fn side_rect(plane: &Plane, y_center: f64, t_height: f64, z_min: f64, z_max: f64) -> Rect2 {
    let y_min = y_center - t_height / 2.0;
    let y_max = y_center + t_height / 2.0;
    let a = plane.to_local(&Point3::new(plane.offset, y_min, z_min));
    let b = plane.to_local(&Point3::new(plane.offset, y_max, z_max));
    Rect2::from_corners(a, b)
}

/// A transient joint description: tab or slot rectangles on one offset
/// plane, swept by a signed distance.
#[derive(Debug, Clone, PartialEq)]
pub struct JoineryCut {
    pub plane: Plane,
    pub rects: Vec<Rect2>,
    pub distance: f64,
}

impl JoineryCut {
    pub fn new(plane: Plane, distance: f64) -> Self {
        Self {
            plane,
            rects: Vec::new(),
            distance,
        }
    }
}

/// A drawn joint sketch ready for extrusion.
#[derive(Debug, Clone)]
pub struct SketchedCut {
    pub plane: KernelId,
    pub sketch: SketchHandle,
    pub profiles: Vec<KernelId>,
}

/// Record the construction plane and open a sketch on it.
pub fn open_cut_sketch(
    kb: &mut dyn KernelBundle,
    plane: Plane,
) -> Result<(KernelId, SketchHandle), OpError> {
    let plane_id = kb.add_construction_plane(plane)?;
    let sketch = kb.create_sketch(plane)?;
    Ok((plane_id, sketch))
}

/// Draw every rectangle and collect the sketch's profiles.
///
/// A rectangle the kernel rejects is skipped. No profile at all is a
/// structural failure for the sketch.
pub fn draw_profiles(
    kb: &mut dyn KernelBundle,
    sketch: SketchHandle,
    rects: &[Rect2],
    context: &str,
) -> Result<Vec<KernelId>, OpError> {
    for rect in rects {
        if let Err(e) = kb.add_rectangle(sketch, *rect) {
            debug!(%e, ?rect, context, "rectangle skipped");
        }
    }
    let profiles: Vec<KernelId> = kb
        .as_introspect()
        .profiles(sketch)?
        .into_iter()
        .map(|p| p.id)
        .collect();
    if profiles.is_empty() {
        return Err(OpError::NoProfiles {
            context: context.to_string(),
        });
    }
    Ok(profiles)
}

/// Plane, sketch and profiles of a [`JoineryCut`] in one go.
pub fn sketch_cut(
    kb: &mut dyn KernelBundle,
    cut: &JoineryCut,
    context: &str,
) -> Result<SketchedCut, OpError> {
    let (plane, sketch) = open_cut_sketch(kb, cut.plane)?;
    let profiles = draw_profiles(kb, sketch, &cut.rects, context)?;
    Ok(SketchedCut {
        plane,
        sketch,
        profiles,
    })
}
