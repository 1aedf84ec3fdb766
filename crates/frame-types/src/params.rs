use serde::{Deserialize, Serialize};

/// Joint used where the middle rails meet the stiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum JointType {
    /// Members meet at shared rectangle edges. No cut or join is issued.
    #[default]
    Butt,
    /// Rails run into slots cut in the stiles.
    Dado,
    /// Tabs on the rail ends seat in sockets cut in the stiles.
    MortiseTenon,
}

impl JointType {
    /// Label shown for this joint in the host dialog.
    pub fn label(self) -> &'static str {
        match self {
            JointType::Butt => "Butt Joint",
            JointType::Dado => "Dado (0.05\")",
            JointType::MortiseTenon => "Mortise & Tenon",
        }
    }

    /// Parse a host dialog label back into a joint type.
    pub fn from_label(label: &str) -> Option<Self> {
        [JointType::Butt, JointType::Dado, JointType::MortiseTenon]
            .into_iter()
            .find(|joint| joint.label() == label)
    }
}

/// The full, caller-validated parameter set for one generation run.
///
/// All lengths share one unit. Missing fields deserialize to the host
/// dialog defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterSet {
    pub height: f64,
    pub width: f64,
    pub depth: f64,
    /// Sheet thickness of the frame members.
    pub ply: f64,
    /// Number of middle rails between the plates.
    pub rail_count: u32,
    pub joint_type: JointType,
    pub use_box_corners: bool,
    /// Finger count per corner band. Only checked when box corners are on.
    pub finger_count: u32,
    pub has_front: bool,
    pub has_back: bool,
    pub panel_thickness: f64,
    pub apply_tolerance: bool,
    /// Material removed from each yielding face by the tolerance pass.
    pub tol_gap: f64,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            height: 95.0,
            width: 47.0,
            depth: 8.0,
            ply: 0.71,
            rail_count: 1,
            joint_type: JointType::Butt,
            use_box_corners: false,
            finger_count: 5,
            has_front: false,
            has_back: false,
            panel_thickness: 0.25,
            apply_tolerance: false,
            tol_gap: 0.02,
        }
    }
}

impl ParameterSet {
    /// Check every invariant the generator relies on.
    ///
    /// Rail spacing is not checked: rails overlap when the frame is too
    /// short for the requested rail count.
    pub fn validate(&self) -> Result<(), ParamError> {
        for (name, value) in [
            ("height", self.height),
            ("width", self.width),
            ("depth", self.depth),
            ("ply", self.ply),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ParamError::NonPositiveLength { name, value });
            }
        }

        let limit = self.height.min(self.width) / 2.0;
        if self.ply >= limit {
            return Err(ParamError::PlyTooThick {
                ply: self.ply,
                limit,
            });
        }

        if self.use_box_corners && (self.finger_count < 3 || self.finger_count % 2 == 0) {
            return Err(ParamError::InvalidFingerCount {
                count: self.finger_count,
            });
        }

        if (self.has_front || self.has_back)
            && (!self.panel_thickness.is_finite() || self.panel_thickness <= 0.0)
        {
            return Err(ParamError::NonPositiveLength {
                name: "panel_thickness",
                value: self.panel_thickness,
            });
        }

        if !self.tol_gap.is_finite() || self.tol_gap < 0.0 {
            return Err(ParamError::NegativeGap { gap: self.tol_gap });
        }

        Ok(())
    }

    /// Height left between the two plates.
    pub fn inner_height(&self) -> f64 {
        self.height - 2.0 * self.ply
    }
}

/// Caller-supplied values that violate a parameter invariant.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParamError {
    #[error("{name} must be a positive length, got {value}")]
    NonPositiveLength { name: &'static str, value: f64 },

    #[error("ply thickness {ply} must be less than {limit} (half the smaller frame side)")]
    PlyTooThick { ply: f64, limit: f64 },

    #[error("finger count must be odd and at least 3, got {count}")]
    InvalidFingerCount { count: u32 },

    #[error("tolerance gap must not be negative, got {gap}")]
    NegativeGap { gap: f64 },
}
