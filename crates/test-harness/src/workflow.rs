//! FrameBuilder: fluent API for setting up frame generation in tests.
//!
//! Drives the real `frame_engine::generate` path on a fresh `BoxKernel`.

use std::path::Path;

use frame_engine::{generate, Assembly};
use frame_kernel::{BodyHandle, BoxKernel, KernelIntrospect};
use frame_types::{JointType, MemberRole, ParameterSet};
use nalgebra::Vector3;

use crate::helpers::HarnessError;
use crate::oracle::{self, OracleVerdict};
use crate::report::ModelReport;

/// A fluent builder over a parameter set.
#[derive(Debug, Clone, Default)]
pub struct FrameBuilder {
    params: ParameterSet,
    placement: Vector3<f64>,
}

impl FrameBuilder {
    /// Start from the dialog defaults.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_params(params: ParameterSet) -> Self {
        Self {
            params,
            placement: Vector3::zeros(),
        }
    }

    /// Start from a saved preset.
    pub fn from_preset_file(path: &Path) -> Result<Self, HarnessError> {
        let (params, _) = frame_config::load_preset_file(path)?;
        Ok(Self::from_params(params))
    }

    pub fn size(mut self, height: f64, width: f64, depth: f64) -> Self {
        self.params.height = height;
        self.params.width = width;
        self.params.depth = depth;
        self
    }

    pub fn ply(mut self, ply: f64) -> Self {
        self.params.ply = ply;
        self
    }

    pub fn rails(mut self, count: u32) -> Self {
        self.params.rail_count = count;
        self
    }

    pub fn joint(mut self, joint: JointType) -> Self {
        self.params.joint_type = joint;
        self
    }

    /// Enable box corners with `fingers` per corner band.
    pub fn box_corners(mut self, fingers: u32) -> Self {
        self.params.use_box_corners = true;
        self.params.finger_count = fingers;
        self
    }

    pub fn panels(mut self, back: bool, front: bool) -> Self {
        self.params.has_back = back;
        self.params.has_front = front;
        self
    }

    /// Enable the tolerance pass with the given gap.
    pub fn tolerance(mut self, gap: f64) -> Self {
        self.params.apply_tolerance = true;
        self.params.tol_gap = gap;
        self
    }

    pub fn placement(mut self, offset: Vector3<f64>) -> Self {
        self.placement = offset;
        self
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    /// Generate on a fresh kernel.
    pub fn build(self) -> Result<BuiltFrame, HarnessError> {
        let mut kernel = BoxKernel::new();
        let assembly = generate(&self.params, self.placement, &mut kernel)?;
        Ok(BuiltFrame { kernel, assembly })
    }
}

/// A generated frame together with the kernel that holds its geometry.
pub struct BuiltFrame {
    pub kernel: BoxKernel,
    pub assembly: Assembly,
}

impl BuiltFrame {
    pub fn body(&self, role: MemberRole) -> Result<BodyHandle, HarnessError> {
        self.assembly
            .member(role)
            .map(|m| m.body)
            .ok_or_else(|| HarnessError::MemberNotFound {
                role: format!("{role:?}"),
            })
    }

    pub fn volume(&self, role: MemberRole) -> Result<f64, HarnessError> {
        Ok(self.kernel.body_volume(self.body(role)?)?)
    }

    /// Run the standard oracle battery.
    pub fn verify(&self) -> Vec<OracleVerdict> {
        oracle::standard_checks(&self.kernel, &self.assembly)
    }

    /// Like [`BuiltFrame::verify`], but fail on the first failing oracle.
    pub fn check_all(&self) -> Result<(), HarnessError> {
        match self.verify().into_iter().find(|v| !v.passed) {
            Some(v) => Err(HarnessError::OracleFailure {
                oracle: v.oracle_name,
                detail: v.detail,
            }),
            None => Ok(()),
        }
    }

    pub fn report(&self) -> Result<ModelReport, HarnessError> {
        ModelReport::build(&self.kernel, &self.assembly)
    }
}
