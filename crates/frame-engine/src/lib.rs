//! Frame generation entry point.
//!
//! [`generate`] runs the whole pipeline once: validate, lay out, extrude,
//! join, relieve tolerances, add panels, paint and place. Nothing is kept
//! between runs.

pub mod types;

use frame_kernel::KernelId;
use frame_types::ParameterSet;
use joinery_ops::{
    add_cover_panels, analyze_tolerance, apply_tolerance_cuts, assign_appearances, extrude_frame,
    place_bodies, plan_frame, synthesize_joinery, KernelBundle, OpResult,
};
use nalgebra::Vector3;
use tracing::{info, instrument, warn};
use uuid::Uuid;

pub use crate::types::{Assembly, AssemblyMember, EngineError, Stage, ASSEMBLY_NAME};

/// Generate a plywood frame assembly in `kb`.
///
/// Parameters are validated before the kernel is touched. A failure after
/// that point returns the failing stage and leaves the partial build in the
/// kernel.
#[instrument(skip(kb), fields(joint = ?params.joint_type, rails = params.rail_count))]
pub fn generate(
    params: &ParameterSet,
    placement: Vector3<f64>,
    kb: &mut dyn KernelBundle,
) -> Result<Assembly, EngineError> {
    params.validate()?;

    let layout = plan_frame(params);
    let (bodies, mut ops) =
        extrude_frame(kb, &layout, params).map_err(EngineError::at(Stage::Extrude))?;

    ops.absorb(synthesize_joinery(kb, params, &layout, &bodies));

    let mut tolerance_cuts = 0;
    if params.apply_tolerance {
        let frame = bodies.all();
        if frame.len() >= 2 {
            let directives = analyze_tolerance(kb.as_introspect(), &frame);
            let cuts = apply_tolerance_cuts(kb, &directives, params.tol_gap);
            tolerance_cuts = cuts.features.len();
            ops.absorb(cuts);
        }
    }

    let (panels, panel_ops) =
        add_cover_panels(kb, params).map_err(EngineError::at(Stage::Panels))?;
    ops.absorb(panel_ops);

    let mut all = bodies.all();
    all.extend(&panels);
    let appearances = assign_appearances(kb, &all);
    place_bodies(kb, &all, placement).map_err(EngineError::at(Stage::Placement))?;

    let members = bodies
        .members
        .iter()
        .map(|&(role, body)| AssemblyMember {
            role,
            tag: role.body_tag(),
            body,
        })
        .collect();
    let construction_planes = planes_of(&ops);
    for warning in &ops.diagnostics.warnings {
        warn!(warning, "generation step skipped");
    }
    info!(
        bodies = all.len(),
        features = ops.features.len(),
        tolerance_cuts,
        "frame generated"
    );

    Ok(Assembly {
        id: Uuid::new_v4(),
        name: ASSEMBLY_NAME.to_string(),
        placement,
        parameters: params.clone(),
        layout,
        members,
        panels,
        features: ops.features,
        construction_planes,
        tolerance_cuts,
        appearances,
        warnings: ops.diagnostics.warnings,
    })
}

/// Distinct construction planes referenced by the features, in first-use order.
fn planes_of(ops: &OpResult) -> Vec<KernelId> {
    let mut planes: Vec<KernelId> = Vec::new();
    for plane in ops.features.iter().filter_map(|f| f.plane) {
        if !planes.contains(&plane) {
            planes.push(plane);
        }
    }
    planes
}
