//! Frame extrusion: sketch every member rectangle, sort the profiles into
//! horizontal and vertical parts, sweep them to depth and tag the bodies.

use frame_kernel::{
    BodyHandle, ExtrudeInput, ExtrudeOperation, KernelId, Plane, ProfileInfo, ProfileRef,
};
use frame_types::{BodyTag, MemberRole, ParameterSet, Point2};
use tracing::{debug, instrument};

use crate::kernel_ext::KernelBundle;
use crate::layout::FrameLayout;
use crate::profile::draw_rectangle;
use crate::types::{FeatureKind, FeatureRecord, OpError, OpResult};

/// Profile dimensions within this distance of ply count as ply thick.
pub const CLASSIFY_TOLERANCE: f64 = 0.01;

/// Frame bodies after extrusion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameBodies {
    /// Plates and middle rails, in extrusion order.
    pub horizontal: Vec<BodyHandle>,
    pub stiles: Vec<BodyHandle>,
    /// Member role of each body that could be matched to a layout member.
    pub members: Vec<(MemberRole, BodyHandle)>,
}

impl FrameBodies {
    pub fn all(&self) -> Vec<BodyHandle> {
        self.horizontal.iter().chain(&self.stiles).copied().collect()
    }

    pub fn body(&self, role: MemberRole) -> Option<BodyHandle> {
        self.members
            .iter()
            .find(|(r, _)| *r == role)
            .map(|&(_, body)| body)
    }
}

/// Split profiles into (horizontal, vertical) by which side is ply thick.
///
/// A profile matching neither is left out.
pub fn classify_profiles(profiles: &[ProfileInfo], ply: f64) -> (Vec<KernelId>, Vec<KernelId>) {
    let mut horizontal = Vec::new();
    let mut vertical = Vec::new();
    for profile in profiles {
        let h = profile.bounds.height();
        let w = profile.bounds.width();
        if (h - ply).abs() < CLASSIFY_TOLERANCE {
            horizontal.push(profile.id);
        } else if (w - ply).abs() < CLASSIFY_TOLERANCE {
            vertical.push(profile.id);
        } else {
            debug!(id = ?profile.id, w, h, "profile is neither horizontal nor vertical");
        }
    }
    (horizontal, vertical)
}

/// Tag name for a horizontal body from its vertical position.
fn horizontal_tag(min_y: f64, max_y: f64, params: &ParameterSet) -> BodyTag {
    if min_y < params.ply * 2.0 || max_y > params.height - params.ply * 2.0 {
        BodyTag::Plate
    } else {
        BodyTag::Rail
    }
}

/// Draw the layout on the XY plane and extrude it into tagged frame bodies.
///
/// Issues "Horizontal Parts" then "Vertical Stiles". Fails when no profile
/// could be classified.
#[instrument(skip_all, fields(members = layout.members.len()))]
pub fn extrude_frame(
    kb: &mut dyn KernelBundle,
    layout: &FrameLayout,
    params: &ParameterSet,
) -> Result<(FrameBodies, OpResult), OpError> {
    let sketch = kb.create_sketch(Plane::xy())?;
    for member in &layout.members {
        draw_rectangle(kb, sketch, &member.rect)?;
    }

    let profiles = kb.as_introspect().profiles(sketch)?;
    let (horizontal, vertical) = classify_profiles(&profiles, params.ply);
    if horizontal.is_empty() && vertical.is_empty() {
        return Err(OpError::NoProfiles {
            context: "frame sketch".to_string(),
        });
    }

    let mut bodies = FrameBodies::default();
    let mut result = OpResult::default();

    if !horizontal.is_empty() {
        let count = horizontal.len();
        let created = kb.extrude(&ExtrudeInput::new(
            horizontal.into_iter().map(ProfileRef::Sketch).collect(),
            params.depth,
            ExtrudeOperation::NewBody,
        ))?;
        for &body in &created {
            let bbox = kb.as_introspect().body_bbox(body)?;
            let tag = horizontal_tag(bbox.min.y, bbox.max.y, params);
            kb.set_body_name(body, tag.as_str())?;
        }
        result.push(FeatureRecord {
            bodies: created.clone(),
            profile_count: count,
            ..FeatureRecord::new("Horizontal Parts", FeatureKind::NEW_BODY)
        });
        bodies.horizontal = created;
    }

    if !vertical.is_empty() {
        let count = vertical.len();
        let created = kb.extrude(&ExtrudeInput::new(
            vertical.into_iter().map(ProfileRef::Sketch).collect(),
            params.depth,
            ExtrudeOperation::NewBody,
        ))?;
        for &body in &created {
            kb.set_body_name(body, BodyTag::Stile.as_str())?;
        }
        result.push(FeatureRecord {
            bodies: created.clone(),
            profile_count: count,
            ..FeatureRecord::new("Vertical Stiles", FeatureKind::NEW_BODY)
        });
        bodies.stiles = created;
    }

    bodies.members = match_members(kb, layout, &bodies)?;
    debug!(
        horizontal = bodies.horizontal.len(),
        stiles = bodies.stiles.len(),
        "frame extruded"
    );
    Ok((bodies, result))
}

/// Pair each layout member with the body whose footprint holds the center
/// of its rectangle, searching the body group its shape belongs to.
fn match_members(
    kb: &dyn KernelBundle,
    layout: &FrameLayout,
    bodies: &FrameBodies,
) -> Result<Vec<(MemberRole, BodyHandle)>, OpError> {
    let mut matched = Vec::new();
    for member in &layout.members {
        let center = member.rect.bounds().center();
        let group = match member.role.body_tag() {
            BodyTag::Stile => &bodies.stiles,
            _ => &bodies.horizontal,
        };
        for &body in group {
            let bbox = kb.as_introspect().body_bbox(body)?;
            let footprint_holds = |p: Point2| {
                p.x >= bbox.min.x && p.x <= bbox.max.x && p.y >= bbox.min.y && p.y <= bbox.max.y
            };
            if footprint_holds(center) {
                matched.push((member.role, body));
                break;
            }
        }
    }
    Ok(matched)
}
