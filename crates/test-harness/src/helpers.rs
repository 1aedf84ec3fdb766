//! Helper functions: error type and body measurements.

use frame_kernel::{BodyHandle, BoundingBox3, KernelIntrospect};
use frame_types::ParameterSet;
use nalgebra::{Point3, Vector3};

/// Unified error type for the test harness.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("generation failed: {0}")]
    Engine(#[from] frame_engine::EngineError),

    #[error("preset error: {0}")]
    Preset(#[from] frame_config::LoadError),

    #[error("kernel error: {0}")]
    Kernel(#[from] frame_kernel::KernelError),

    #[error("member not found: {role}")]
    MemberNotFound { role: String },

    #[error("oracle failure ({oracle}): {detail}")]
    OracleFailure { oracle: String, detail: String },
}

/// Union of the bounding boxes of `bodies`, or `None` for an empty list.
pub fn combined_bbox(
    kernel: &dyn KernelIntrospect,
    bodies: &[BodyHandle],
) -> Result<Option<BoundingBox3>, HarnessError> {
    let mut combined: Option<BoundingBox3> = None;
    for &body in bodies {
        let bbox = kernel.body_bbox(body)?;
        combined = Some(match combined {
            Some(acc) => acc.union(&bbox),
            None => bbox,
        });
    }
    Ok(combined)
}

/// The box a frame with these parameters should fill: width by height by
/// depth, grown by the enabled cover panels, then moved by `placement`.
pub fn expected_extents(params: &ParameterSet, placement: Vector3<f64>) -> BoundingBox3 {
    let z_min = if params.has_back {
        -params.panel_thickness
    } else {
        0.0
    };
    let z_max = if params.has_front {
        params.depth + params.panel_thickness
    } else {
        params.depth
    };
    BoundingBox3::new(
        Point3::new(0.0, 0.0, z_min) + placement,
        Point3::new(params.width, params.height, z_max) + placement,
    )
}

/// Total volume of `bodies`.
pub fn total_volume(kernel: &dyn KernelIntrospect, bodies: &[BodyHandle]) -> Result<f64, HarnessError> {
    bodies
        .iter()
        .map(|&b| kernel.body_volume(b).map_err(HarnessError::from))
        .sum()
}
