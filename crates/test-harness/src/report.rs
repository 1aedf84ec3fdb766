//! Structured text model reports.
//!
//! Reports are plain text so a frame can be inspected from a terminal or a
//! failing test's output without extra tooling.

use std::fmt;

use frame_engine::Assembly;
use frame_kernel::{
    BodyHandle, BoundingBox3, BoxKernel, CombineOperation, ExtrudeOperation, KernelIntrospect,
};
use joinery_ops::{FeatureKind, FeatureRecord};

use crate::helpers::{combined_bbox, HarnessError};
use crate::oracle::{standard_checks, OracleVerdict};

/// A complete model report with all sections.
pub struct ModelReport {
    pub title: String,
    pub parameters: String,
    pub body_entries: Vec<BodyEntry>,
    pub feature_entries: Vec<FeatureEntry>,
    pub bounding_box: Option<BoundingBox3>,
    pub oracle_results: Vec<OracleVerdict>,
    pub warnings: Vec<String>,
}

/// One body of the assembly.
pub struct BodyEntry {
    pub label: String,
    pub name: String,
    pub appearance: Option<String>,
    pub volume: f64,
    pub face_count: usize,
}

/// A single feature's report entry.
pub struct FeatureEntry {
    pub index: usize,
    pub name: String,
    pub op_type: String,
    pub group: Option<String>,
    pub detail: String,
}

impl ModelReport {
    /// Inspect an assembly in the kernel that generated it and run the
    /// standard oracle battery over it.
    pub fn build(kernel: &BoxKernel, assembly: &Assembly) -> Result<Self, HarnessError> {
        let mut body_entries = Vec::new();
        let labelled = assembly
            .members
            .iter()
            .map(|m| (format!("{:?}", m.role), m.body))
            .chain(assembly.panels.iter().map(|&p| ("Panel".to_string(), p)));
        for (label, body) in labelled {
            body_entries.push(body_entry(kernel, label, body)?);
        }

        let feature_entries = assembly
            .features
            .iter()
            .enumerate()
            .map(|(index, feature)| FeatureEntry {
                index,
                name: feature.name.clone(),
                op_type: op_type(feature.kind).to_string(),
                group: feature.group.clone(),
                detail: describe_feature(feature),
            })
            .collect();

        let p = &assembly.parameters;
        let parameters = format!(
            "{} x {} x {} | ply {} | {} rails | {} | box corners: {} | panels: back={} front={} | tolerance: {}",
            p.width,
            p.height,
            p.depth,
            p.ply,
            p.rail_count,
            p.joint_type.label(),
            if p.use_box_corners {
                format!("{} fingers", p.finger_count)
            } else {
                "off".to_string()
            },
            p.has_back,
            p.has_front,
            if p.apply_tolerance {
                format!("gap {}", p.tol_gap)
            } else {
                "off".to_string()
            },
        );

        Ok(ModelReport {
            title: assembly.name.clone(),
            parameters,
            body_entries,
            feature_entries,
            bounding_box: combined_bbox(kernel, &assembly.bodies())?,
            oracle_results: standard_checks(kernel, assembly),
            warnings: assembly.warnings.clone(),
        })
    }

    pub fn all_passed(&self) -> bool {
        self.oracle_results.iter().all(|v| v.passed)
    }

    /// Format the report as text.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("=== {} ===\n\n", self.title));
        out.push_str(&format!("Parameters: {}\n", self.parameters));

        out.push_str(&format!("\nBodies ({}):\n", self.body_entries.len()));
        for body in &self.body_entries {
            out.push_str(&format!(
                "  {} \"{}\": volume={:.4} faces={} appearance={}\n",
                body.label,
                body.name,
                body.volume,
                body.face_count,
                body.appearance.as_deref().unwrap_or("none"),
            ));
        }

        out.push_str(&format!("\nFeatures ({}):\n", self.feature_entries.len()));
        for entry in &self.feature_entries {
            let group = entry
                .group
                .as_ref()
                .map(|g| format!(" [{g}]"))
                .unwrap_or_default();
            out.push_str(&format!(
                "  [{}] {} \"{}\"{}\n",
                entry.index, entry.op_type, entry.name, group,
            ));
            if !entry.detail.is_empty() {
                out.push_str(&format!("      {}\n", entry.detail));
            }
        }

        if let Some(bbox) = self.bounding_box {
            out.push_str(&format!(
                "\nBounding Box: ({:.3}, {:.3}, {:.3}) -> ({:.3}, {:.3}, {:.3})\n",
                bbox.min.x, bbox.min.y, bbox.min.z, bbox.max.x, bbox.max.y, bbox.max.z,
            ));
        }

        if !self.oracle_results.is_empty() {
            out.push_str(&format!(
                "\nOracle Results ({} checks):\n",
                self.oracle_results.len()
            ));
            for v in &self.oracle_results {
                let status = if v.passed { "PASS" } else { "FAIL" };
                out.push_str(&format!("  [{}] {}: {}\n", status, v.oracle_name, v.detail));
            }
        }

        if self.warnings.is_empty() {
            out.push_str("\nWarnings: none\n");
        } else {
            out.push_str(&format!("\nWarnings ({}):\n", self.warnings.len()));
            for warning in &self.warnings {
                out.push_str(&format!("  {}\n", warning));
            }
        }

        out
    }
}

impl fmt::Display for ModelReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

fn body_entry(kernel: &BoxKernel, label: String, body: BodyHandle) -> Result<BodyEntry, HarnessError> {
    Ok(BodyEntry {
        label,
        name: kernel.body_name(body)?,
        appearance: kernel.body_appearance(body)?,
        volume: kernel.body_volume(body)?,
        face_count: kernel.body_faces(body)?.len(),
    })
}

fn op_type(kind: FeatureKind) -> &'static str {
    match kind {
        FeatureKind::Extrude { operation } => match operation {
            ExtrudeOperation::NewBody => "Extrude",
            ExtrudeOperation::Cut => "Extrude (cut)",
            ExtrudeOperation::Join => "Extrude (join)",
        },
        FeatureKind::Combine { operation } => match operation {
            CombineOperation::Cut => "Combine (cut)",
            CombineOperation::Join => "Combine (join)",
        },
    }
}

fn describe_feature(feature: &FeatureRecord) -> String {
    let mut parts = Vec::new();
    if feature.profile_count > 0 {
        parts.push(format!("{} profiles", feature.profile_count));
    }
    if let Some(plane) = feature.plane {
        parts.push(format!("plane #{}", plane.0));
    }
    if !feature.bodies.is_empty() {
        let ids: Vec<String> = feature.bodies.iter().map(|b| b.raw().to_string()).collect();
        parts.push(format!("bodies [{}]", ids.join(", ")));
    }
    if !feature.tools.is_empty() {
        let ids: Vec<String> = feature.tools.iter().map(|b| b.raw().to_string()).collect();
        parts.push(format!("tools kept [{}]", ids.join(", ")));
    }
    parts.join(" | ")
}
