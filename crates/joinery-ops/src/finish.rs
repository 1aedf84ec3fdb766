//! Finishing: cover panels, appearances and placement.

use frame_kernel::{BodyHandle, ExtrudeInput, ExtrudeOperation, Plane, ProfileRef};
use frame_types::{BodyTag, ParameterSet, Rect2};
use nalgebra::Vector3;
use tracing::{debug, instrument};

use crate::kernel_ext::KernelBundle;
use crate::types::{FeatureKind, FeatureRecord, OpError, OpResult};

/// Appearances tried, in order, for cover panels.
pub const PANEL_APPEARANCES: &[&str] = &[
    "Paint - Enamel Glossy (White)",
    "Plastic - Matte (White)",
    "Opaque - White",
    "White",
];

/// Appearances tried, in order, for frame members.
pub const FRAME_APPEARANCES: &[&str] = &["Pine", "Pine - Natural", "Wood - Pine"];

/// Which face of the frame a cover panel sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelSide {
    Back,
    Front,
}

impl PanelSide {
    pub fn name(self) -> &'static str {
        match self {
            PanelSide::Back => "Back Panel",
            PanelSide::Front => "Front Panel",
        }
    }
}

/// Extrude one full-size cover panel: the back from z = 0 toward -Z, the
/// front from z = depth toward +Z.
pub fn create_cover_panel(
    kb: &mut dyn KernelBundle,
    params: &ParameterSet,
    side: PanelSide,
) -> Result<(BodyHandle, FeatureRecord), OpError> {
    let (plane, distance) = match side {
        PanelSide::Back => (Plane::xy(), -params.panel_thickness),
        PanelSide::Front => (Plane::xy().offset_by(params.depth), params.panel_thickness),
    };
    let sketch = kb.create_sketch(plane)?;
    let profile = kb.add_rectangle(sketch, Rect2::new(0.0, 0.0, params.width, params.height))?;
    let created = kb.extrude(&ExtrudeInput::new(
        vec![ProfileRef::Sketch(profile)],
        distance,
        ExtrudeOperation::NewBody,
    ))?;
    let body = created.first().copied().ok_or_else(|| OpError::NoProfiles {
        context: side.name().to_string(),
    })?;
    kb.set_body_name(body, side.name())?;
    Ok((
        body,
        FeatureRecord {
            bodies: created,
            profile_count: 1,
            ..FeatureRecord::new(side.name(), FeatureKind::NEW_BODY)
        },
    ))
}

/// Back then front panel, as enabled.
#[instrument(skip_all, fields(back = params.has_back, front = params.has_front))]
pub fn add_cover_panels(
    kb: &mut dyn KernelBundle,
    params: &ParameterSet,
) -> Result<(Vec<BodyHandle>, OpResult), OpError> {
    let mut panels = Vec::new();
    let mut result = OpResult::default();
    let sides = [
        (params.has_back, PanelSide::Back),
        (params.has_front, PanelSide::Front),
    ];
    for (enabled, side) in sides {
        if !enabled {
            continue;
        }
        let (body, feature) = create_cover_panel(kb, params, side)?;
        panels.push(body);
        result.push(feature);
    }
    Ok((panels, result))
}

/// Paint panels white and everything else pine, with whatever the material
/// library has. Returns how many bodies received an appearance.
pub fn assign_appearances(kb: &mut dyn KernelBundle, bodies: &[BodyHandle]) -> usize {
    let pine = kb.as_introspect().find_appearance(FRAME_APPEARANCES);
    let white = kb.as_introspect().find_appearance(PANEL_APPEARANCES);
    let mut assigned = 0;
    for &body in bodies {
        let is_panel = kb.body_tag(body) == Some(BodyTag::Panel);
        let appearance = if is_panel { &white } else { &pine };
        let Some(appearance) = appearance else {
            continue;
        };
        match kb.set_appearance(body, appearance) {
            Ok(()) => assigned += 1,
            Err(e) => debug!(%e, ?body, "appearance skipped"),
        }
    }
    assigned
}

/// Move every body by `offset`. A zero offset is a no-op.
pub fn place_bodies(
    kb: &mut dyn KernelBundle,
    bodies: &[BodyHandle],
    offset: Vector3<f64>,
) -> Result<(), OpError> {
    if offset == Vector3::zeros() {
        return Ok(());
    }
    for &body in bodies {
        kb.translate_body(body, offset)?;
    }
    Ok(())
}
