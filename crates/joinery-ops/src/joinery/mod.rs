//! Joinery synthesis over extruded frame bodies.
//!
//! The three rail joints are mutually exclusive; box corners are an
//! independent toggle applied after them. Every step is best-effort: a
//! failing cut or join is skipped with a warning, and a plane that yields
//! no profile is abandoned without aborting the run.

pub mod box_corner;
pub mod dado;
pub mod mortise;

use frame_kernel::{BodyHandle, ExtrudeInput, ExtrudeOperation, ProfileRef};
use frame_types::{JointType, ParameterSet};
use tracing::{instrument, warn};

use crate::extrude::FrameBodies;
use crate::kernel_ext::KernelBundle;
use crate::layout::FrameLayout;
use crate::profile::SketchedCut;
use crate::types::{FeatureKind, FeatureRecord, OpError, OpResult};

pub use box_corner::{cut_box_corners, finger_bands};
pub use dado::cut_dados;
pub use mortise::cut_mortise_tenons;

/// The two side planes joints are drawn on: x = ply sweeping toward -X and
/// x = width - ply sweeping toward +X.
pub fn side_offsets(params: &ParameterSet) -> [(f64, f64); 2] {
    [(params.ply, -1.0), (params.width - params.ply, 1.0)]
}

/// Apply the selected rail joint and, when enabled, box corners.
#[instrument(skip_all, fields(joint = ?params.joint_type, box_corners = params.use_box_corners))]
pub fn synthesize_joinery(
    kb: &mut dyn KernelBundle,
    params: &ParameterSet,
    layout: &FrameLayout,
    bodies: &FrameBodies,
) -> OpResult {
    let mut result = OpResult::default();

    match params.joint_type {
        JointType::Butt => {}
        JointType::Dado if params.rail_count > 0 => result.absorb(cut_dados(kb, bodies)),
        JointType::MortiseTenon if params.rail_count > 0 => {
            result.absorb(cut_mortise_tenons(kb, params, layout, bodies))
        }
        JointType::Dado | JointType::MortiseTenon => {}
    }

    if params.use_box_corners {
        result.absorb(cut_box_corners(kb, params, bodies));
    }

    result
}

/// Record a plane-level failure as a warning and carry on.
pub(crate) fn plane_failed(result: &mut OpResult, context: &str, error: OpError) {
    warn!(%error, context, "joint plane abandoned");
    result.warn(format!("{context}: {error}"));
}

/// Sweep a sketched cut into `participants` as a Cut or Join.
///
/// Nothing is issued without participants; a kernel failure skips the
/// feature with a warning.
pub(crate) fn issue(
    kb: &mut dyn KernelBundle,
    result: &mut OpResult,
    name: &str,
    sketched: &SketchedCut,
    distance: f64,
    operation: ExtrudeOperation,
    participants: &[BodyHandle],
) {
    if participants.is_empty() {
        return;
    }
    let input = ExtrudeInput::new(
        sketched.profiles.iter().copied().map(ProfileRef::Sketch).collect(),
        distance,
        operation,
    )
    .with_participants(participants.to_vec());

    match kb.extrude(&input) {
        Ok(bodies) => result.push(FeatureRecord {
            bodies,
            plane: Some(sketched.plane),
            profile_count: sketched.profiles.len(),
            ..FeatureRecord::new(name, FeatureKind::Extrude { operation })
        }),
        Err(error) => {
            warn!(%error, name, "joint feature skipped");
            result.warn(format!("{name}: {error}"));
        }
    }
}
