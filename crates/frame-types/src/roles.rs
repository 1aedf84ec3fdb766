use serde::{Deserialize, Serialize};

/// Structural role of a frame member within the generated assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MemberRole {
    BottomPlate,
    TopPlate,
    LeftStile,
    RightStile,
    /// A middle rail, numbered bottom to top from 0.
    MiddleRail { index: usize },
}

impl MemberRole {
    /// Classification tag the member's body carries after extrusion.
    pub fn body_tag(self) -> BodyTag {
        match self {
            MemberRole::BottomPlate | MemberRole::TopPlate => BodyTag::Plate,
            MemberRole::LeftStile | MemberRole::RightStile => BodyTag::Stile,
            MemberRole::MiddleRail { .. } => BodyTag::Rail,
        }
    }
}

/// Classification metadata carried in a body's display name.
///
/// The tag is read back from the name by the tolerance pass; the kernel
/// itself attaches no meaning to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyTag {
    Plate,
    Rail,
    Stile,
    Panel,
}

impl BodyTag {
    pub fn as_str(self) -> &'static str {
        match self {
            BodyTag::Plate => "Plate",
            BodyTag::Rail => "Rail",
            BodyTag::Stile => "Stile",
            BodyTag::Panel => "Panel",
        }
    }

    /// Recover the tag from a display name by substring, so "Back Panel"
    /// reads as a panel.
    pub fn from_name(name: &str) -> Option<Self> {
        [BodyTag::Plate, BodyTag::Stile, BodyTag::Rail, BodyTag::Panel]
            .into_iter()
            .find(|tag| name.contains(tag.as_str()))
    }
}
