use std::fmt;

use frame_kernel::{BodyHandle, KernelId};
use frame_types::{BodyTag, MemberRole, ParameterSet};
use joinery_ops::{FeatureKind, FeatureRecord, FrameLayout};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name given to every generated assembly.
pub const ASSEMBLY_NAME: &str = "Plywood Panel Frame";

/// The generated frame: member bodies, panels and the features that built them.
///
/// Body handles are only meaningful in the kernel session that produced them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assembly {
    pub id: Uuid,
    pub name: String,
    pub placement: Vector3<f64>,
    pub parameters: ParameterSet,
    pub layout: FrameLayout,
    pub members: Vec<AssemblyMember>,
    pub panels: Vec<BodyHandle>,
    /// Every feature in the order it was issued.
    pub features: Vec<FeatureRecord>,
    /// Side planes the joinery was drawn on.
    pub construction_planes: Vec<KernelId>,
    pub tolerance_cuts: usize,
    /// Bodies that received an appearance from the material library.
    pub appearances: usize,
    /// Best-effort steps that were skipped.
    pub warnings: Vec<String>,
}

impl Assembly {
    /// Frame member bodies, then panels.
    pub fn bodies(&self) -> Vec<BodyHandle> {
        self.members
            .iter()
            .map(|m| m.body)
            .chain(self.panels.iter().copied())
            .collect()
    }

    pub fn member(&self, role: MemberRole) -> Option<&AssemblyMember> {
        self.members.iter().find(|m| m.role == role)
    }

    pub fn feature_count(&self, kind: FeatureKind) -> usize {
        self.features.iter().filter(|f| f.kind == kind).count()
    }

    /// Features touching `body`, as a created or modified body.
    pub fn features_on(&self, body: BodyHandle) -> impl Iterator<Item = &FeatureRecord> {
        self.features.iter().filter(move |f| f.bodies.contains(&body))
    }
}

/// A frame member and the body that realizes it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssemblyMember {
    pub role: MemberRole,
    pub tag: BodyTag,
    pub body: BodyHandle,
}

/// Pipeline stage, used to say where a run failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Extrude,
    Panels,
    Placement,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Extrude => "frame extrusion",
            Stage::Panels => "cover panels",
            Stage::Placement => "placement",
        };
        f.write_str(name)
    }
}

/// Errors from the frame generator.
///
/// A stage failure leaves whatever the kernel built so far in place.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EngineError {
    #[error("invalid parameters: {0}")]
    InvalidParameters(#[from] frame_types::ParamError),

    #[error("{stage} failed: {source}")]
    StageFailed {
        stage: Stage,
        #[source]
        source: joinery_ops::OpError,
    },
}

impl EngineError {
    pub(crate) fn at(stage: Stage) -> impl FnOnce(joinery_ops::OpError) -> EngineError {
        move |source| EngineError::StageFailed { stage, source }
    }
}
