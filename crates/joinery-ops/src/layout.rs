//! Frame layout: where every member sits in the frame's XY sketch.

use frame_types::{JointType, MemberRole, ParameterSet, Rectangle};
use serde::{Deserialize, Serialize};

/// Depth a dado joint seats each rail into the stiles.
///
/// A fixed length, independent of ply thickness.
pub const DADO_DEPTH: f64 = 0.05 * 2.54;

/// One member rectangle in frame-local coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameMember {
    pub role: MemberRole,
    pub rect: Rectangle,
}

/// Planned positions of all frame members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameLayout {
    /// Bottom plate, top plate, left stile, right stile, then middle rails
    /// bottom to top.
    pub members: Vec<FrameMember>,
    pub rail_centers: Vec<f64>,
    /// Horizontal extent shared by every middle rail.
    pub rail_span: (f64, f64),
}

impl FrameLayout {
    pub fn member(&self, role: MemberRole) -> Option<&FrameMember> {
        self.members.iter().find(|m| m.role == role)
    }

    pub fn rails(&self) -> impl Iterator<Item = &FrameMember> {
        self.members
            .iter()
            .filter(|m| matches!(m.role, MemberRole::MiddleRail { .. }))
    }

    /// Open vertical clearances up the frame's center line: bottom plate to
    /// first rail, rail to rail, last rail to top plate.
    ///
    /// Empty when there are no rails.
    pub fn clearances(&self) -> Vec<f64> {
        let mut edges: Vec<(f64, f64)> = Vec::new();
        if let Some(bottom) = self.member(MemberRole::BottomPlate) {
            let b = bottom.rect.bounds();
            edges.push((b.min.y, b.max.y));
        }
        edges.extend(self.rails().map(|r| {
            let b = r.rect.bounds();
            (b.min.y, b.max.y)
        }));
        if let Some(top) = self.member(MemberRole::TopPlate) {
            let b = top.rect.bounds();
            edges.push((b.min.y, b.max.y));
        }
        if edges.len() <= 2 {
            return Vec::new();
        }
        edges.windows(2).map(|w| w[1].0 - w[0].1).collect()
    }
}

/// Horizontal span of a middle rail: the stiles' inner span, widened by the
/// dado depth on both sides for dado joints.
pub fn rail_span(width: f64, ply: f64, joint: JointType) -> (f64, f64) {
    match joint {
        JointType::Dado => (ply - DADO_DEPTH, width - ply + DADO_DEPTH),
        JointType::Butt | JointType::MortiseTenon => (ply, width - ply),
    }
}

/// Vertical spacing between rail centers when `rail_count` rails split the interior.
pub fn rail_section(height: f64, ply: f64, rail_count: u32) -> f64 {
    (height - 2.0 * ply) / (f64::from(rail_count) + 1.0)
}

/// Center heights of `rail_count` rails spaced evenly between the plates.
pub fn rail_centers(height: f64, ply: f64, rail_count: u32) -> Vec<f64> {
    let section = rail_section(height, ply, rail_count);
    (1..=rail_count)
        .map(|i| ply + section * f64::from(i))
        .collect()
}

/// Lay out the four frame members and any middle rails.
///
/// Rails are not checked for collisions; on a frame too short for its rail
/// count they overlap each other or the plates.
pub fn plan_frame(params: &ParameterSet) -> FrameLayout {
    let (h, w, ply) = (params.height, params.width, params.ply);

    let mut members = vec![
        FrameMember {
            role: MemberRole::BottomPlate,
            rect: Rectangle::from_corners(0.0, 0.0, w, ply),
        },
        FrameMember {
            role: MemberRole::TopPlate,
            rect: Rectangle::from_corners(0.0, h - ply, w, h),
        },
        FrameMember {
            role: MemberRole::LeftStile,
            rect: Rectangle::from_corners(0.0, ply, ply, h - ply),
        },
        FrameMember {
            role: MemberRole::RightStile,
            rect: Rectangle::from_corners(w - ply, ply, w, h - ply),
        },
    ];

    let rail_span = rail_span(w, ply, params.joint_type);
    let rail_centers = rail_centers(h, ply, params.rail_count);
    members.extend(rail_centers.iter().enumerate().map(|(index, &cy)| FrameMember {
        role: MemberRole::MiddleRail { index },
        rect: Rectangle::from_corners(rail_span.0, cy - ply / 2.0, rail_span.1, cy + ply / 2.0),
    }));

    FrameLayout {
        members,
        rail_centers,
        rail_span,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_frame_has_five_members() {
        let layout = plan_frame(&ParameterSet::default());
        assert_eq!(layout.members.len(), 5);
        assert_relative_eq!(layout.rail_centers[0], 47.5);
    }

    #[test]
    fn rail_section_survives_max_rail_count() {
        let section = rail_section(96.0, 0.71, u32::MAX);
        assert!(section.is_finite());
        assert!(section > 0.0);
        assert_relative_eq!(rail_section(96.0, 1.0, 1), 47.0);
    }

    #[test]
    fn stiles_span_inner_height() {
        let params = ParameterSet::default();
        let layout = plan_frame(&params);
        let left = layout.member(MemberRole::LeftStile).unwrap().rect.bounds();
        assert_relative_eq!(left.min.y, params.ply);
        assert_relative_eq!(left.max.y, params.height - params.ply);
        assert_relative_eq!(left.width(), params.ply);
    }

    #[test]
    fn dado_rail_reaches_into_stiles() {
        let (start, end) = rail_span(47.0, 0.71, JointType::Dado);
        assert_relative_eq!(start, 0.71 - 0.127);
        assert_relative_eq!(end, 47.0 - 0.71 + 0.127);
    }

    #[test]
    fn no_rails_no_clearances() {
        let params = ParameterSet {
            rail_count: 0,
            ..ParameterSet::default()
        };
        let layout = plan_frame(&params);
        assert_eq!(layout.members.len(), 4);
        assert!(layout.rail_centers.is_empty());
        assert!(layout.clearances().is_empty());
    }

    #[test]
    fn clearances_sum_with_rails_to_inner_height() {
        let params = ParameterSet {
            rail_count: 3,
            ..ParameterSet::default()
        };
        let layout = plan_frame(&params);
        let gaps = layout.clearances();
        assert_eq!(gaps.len(), 4);
        let total: f64 = gaps.iter().sum::<f64>() + 3.0 * params.ply;
        assert_relative_eq!(total, params.inner_height(), epsilon = 1e-9);
    }
}
