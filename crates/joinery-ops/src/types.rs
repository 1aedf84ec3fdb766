use frame_kernel::{BodyHandle, CombineOperation, ExtrudeOperation, KernelId};
use serde::{Deserialize, Serialize};

/// Result of one synthesis stage: every kernel feature it issued plus the
/// non-fatal problems it stepped over.
#[derive(Debug, Clone, Default)]
pub struct OpResult {
    pub features: Vec<FeatureRecord>,
    pub diagnostics: Diagnostics,
}

impl OpResult {
    pub fn push(&mut self, feature: FeatureRecord) {
        self.features.push(feature);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.diagnostics.warnings.push(message.into());
    }

    /// Append another stage's features and warnings.
    pub fn absorb(&mut self, other: OpResult) {
        self.features.extend(other.features);
        self.diagnostics.warnings.extend(other.diagnostics.warnings);
    }

    pub fn count(&self, kind: FeatureKind) -> usize {
        self.features.iter().filter(|f| f.kind == kind).count()
    }
}

/// Which kernel operation a feature issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FeatureKind {
    Extrude { operation: ExtrudeOperation },
    Combine { operation: CombineOperation },
}

impl FeatureKind {
    pub const NEW_BODY: FeatureKind = FeatureKind::Extrude {
        operation: ExtrudeOperation::NewBody,
    };
    pub const CUT: FeatureKind = FeatureKind::Extrude {
        operation: ExtrudeOperation::Cut,
    };
    pub const JOIN: FeatureKind = FeatureKind::Extrude {
        operation: ExtrudeOperation::Join,
    };
    pub const COMBINE_CUT: FeatureKind = FeatureKind::Combine {
        operation: CombineOperation::Cut,
    };
}

/// One modeling feature issued against the kernel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub name: String,
    pub kind: FeatureKind,
    /// Bodies created (NewBody) or modified (Cut, Join, Combine).
    pub bodies: Vec<BodyHandle>,
    /// Tool bodies of a combine. They survive the operation.
    pub tools: Vec<BodyHandle>,
    /// Construction plane the feature's sketch was drawn on, if any.
    pub plane: Option<KernelId>,
    pub profile_count: usize,
    /// Timeline group the feature belongs to, e.g. "Tolerance Cuts".
    pub group: Option<String>,
}

impl FeatureRecord {
    pub fn new(name: impl Into<String>, kind: FeatureKind) -> Self {
        Self {
            name: name.into(),
            kind,
            bodies: Vec::new(),
            tools: Vec::new(),
            plane: None,
            profile_count: 0,
            group: None,
        }
    }
}

/// Non-fatal diagnostics from an operation.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    /// Warning messages.
    pub warnings: Vec<String>,
}

/// Errors from modeling operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum OpError {
    #[error("kernel error: {0}")]
    Kernel(#[from] frame_kernel::KernelError),

    #[error("no profiles available for {context}")]
    NoProfiles { context: String },
}
