//! Verification oracles: pure functions returning pass/fail verdicts.
//!
//! Each oracle returns an `OracleVerdict` with diagnostic detail instead of
//! panicking, so one pass can collect every failure.

use frame_engine::Assembly;
use frame_kernel::{BodyHandle, BoxKernel, KernelIntrospect};
use frame_types::BodyTag;
use joinery_ops::FeatureKind;

use crate::helpers::{combined_bbox, expected_extents};

/// Overlap below this volume counts as touching.
const OVERLAP_EPSILON: f64 = 1e-9;

/// The result of a single oracle check.
#[derive(Debug, Clone)]
pub struct OracleVerdict {
    pub oracle_name: String,
    pub passed: bool,
    pub detail: String,
    pub value: Option<f64>,
}

impl OracleVerdict {
    fn pass(name: &str, detail: String) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: true,
            detail,
            value: None,
        }
    }

    fn pass_val(name: &str, detail: String, value: f64) -> Self {
        Self {
            value: Some(value),
            ..Self::pass(name, detail)
        }
    }

    fn fail(name: &str, detail: String) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: false,
            detail,
            value: None,
        }
    }

    fn fail_val(name: &str, detail: String, value: f64) -> Self {
        Self {
            value: Some(value),
            ..Self::fail(name, detail)
        }
    }
}

// ── Assembly Oracles ────────────────────────────────────────────────────────

/// One body per layout member, all alive in the kernel, plus the panels.
pub fn check_body_count(kernel: &dyn KernelIntrospect, assembly: &Assembly) -> OracleVerdict {
    let expected = assembly.layout.members.len() + assembly.panels.len();
    let live = kernel.bodies();
    let missing: Vec<BodyHandle> = assembly
        .bodies()
        .into_iter()
        .filter(|b| !live.contains(b))
        .collect();

    if live.len() == expected && assembly.members.len() == assembly.layout.members.len() && missing.is_empty() {
        OracleVerdict::pass_val(
            "body_count",
            format!("{} bodies, one per member and panel", live.len()),
            live.len() as f64,
        )
    } else {
        OracleVerdict::fail_val(
            "body_count",
            format!(
                "expected {expected} bodies, kernel has {} ({} members matched, missing {:?})",
                live.len(),
                assembly.members.len(),
                missing,
            ),
            live.len() as f64,
        )
    }
}

/// No two bodies share volume. Touching along faces is fine.
pub fn check_no_overlap(kernel: &BoxKernel, bodies: &[BodyHandle]) -> OracleVerdict {
    let mut overlapping = Vec::new();
    let mut worst: f64 = 0.0;
    for (i, &a) in bodies.iter().enumerate() {
        for &b in &bodies[i + 1..] {
            match kernel.overlap_volume(a, b) {
                Ok(volume) if volume > OVERLAP_EPSILON => {
                    worst = worst.max(volume);
                    overlapping.push((a, b, volume));
                }
                Ok(_) => {}
                Err(e) => return OracleVerdict::fail("no_overlap", format!("{a:?}/{b:?}: {e}")),
            }
        }
    }

    if overlapping.is_empty() {
        OracleVerdict::pass("no_overlap", format!("{} bodies pairwise disjoint", bodies.len()))
    } else {
        OracleVerdict::fail_val(
            "no_overlap",
            format!(
                "{} overlapping pairs: {:?}",
                overlapping.len(),
                &overlapping[..overlapping.len().min(5)]
            ),
            worst,
        )
    }
}

/// The assembly fills exactly width by height by depth, plus panels, at
/// its placement.
pub fn check_extents(kernel: &dyn KernelIntrospect, assembly: &Assembly, tol: f64) -> OracleVerdict {
    let expected = expected_extents(&assembly.parameters, assembly.placement);
    let actual = match combined_bbox(kernel, &assembly.bodies()) {
        Ok(Some(bbox)) => bbox,
        Ok(None) => return OracleVerdict::fail("extents", "assembly has no bodies".to_string()),
        Err(e) => return OracleVerdict::fail("extents", e.to_string()),
    };

    let deviation = (actual.min - expected.min)
        .abs()
        .sup(&(actual.max - expected.max).abs())
        .max();
    let detail = format!(
        "({:.3}, {:.3}, {:.3}) -> ({:.3}, {:.3}, {:.3})",
        actual.min.x, actual.min.y, actual.min.z, actual.max.x, actual.max.y, actual.max.z,
    );
    if deviation <= tol {
        OracleVerdict::pass_val("extents", detail, deviation)
    } else {
        OracleVerdict::fail_val(
            "extents",
            format!(
                "{detail}, expected ({:.3}, {:.3}, {:.3}) -> ({:.3}, {:.3}, {:.3})",
                expected.min.x,
                expected.min.y,
                expected.min.z,
                expected.max.x,
                expected.max.y,
                expected.max.z,
            ),
            deviation,
        )
    }
}

/// Every member body's name carries the tag of its role.
pub fn check_member_tags(kernel: &dyn KernelIntrospect, assembly: &Assembly) -> OracleVerdict {
    let mut wrong = Vec::new();
    for member in &assembly.members {
        match kernel.body_name(member.body) {
            Ok(name) if BodyTag::from_name(&name) == Some(member.tag) => {}
            Ok(name) => wrong.push(format!("{:?} named {name:?}", member.role)),
            Err(e) => wrong.push(format!("{:?}: {e}", member.role)),
        }
    }

    if wrong.is_empty() {
        OracleVerdict::pass(
            "member_tags",
            format!("{} members carry their tag", assembly.members.len()),
        )
    } else {
        OracleVerdict::fail("member_tags", wrong.join("; "))
    }
}

/// Joinery adds and removes material between members but never creates
/// or destroys any overall. Only meaningful before the tolerance pass.
pub fn check_volume_conserved(
    kernel: &dyn KernelIntrospect,
    frame: &[BodyHandle],
    expected_volume: f64,
    tol: f64,
) -> OracleVerdict {
    let volume: f64 = frame
        .iter()
        .filter_map(|&b| kernel.body_volume(b).ok())
        .sum();
    let drift = (volume - expected_volume).abs();
    let detail = format!("frame volume {volume:.4}, expected {expected_volume:.4}");
    if drift <= tol {
        OracleVerdict::pass_val("volume_conserved", detail, drift)
    } else {
        OracleVerdict::fail_val("volume_conserved", detail, drift)
    }
}

/// Every body received an appearance.
pub fn check_appearances(kernel: &dyn KernelIntrospect, bodies: &[BodyHandle]) -> OracleVerdict {
    let bare: Vec<BodyHandle> = bodies
        .iter()
        .copied()
        .filter(|&b| !matches!(kernel.body_appearance(b), Ok(Some(_))))
        .collect();
    if bare.is_empty() {
        OracleVerdict::pass("appearances", format!("{} bodies painted", bodies.len()))
    } else {
        OracleVerdict::fail("appearances", format!("no appearance on {bare:?}"))
    }
}

/// Count the features of one kind and compare.
pub fn check_feature_count(assembly: &Assembly, kind: FeatureKind, expected: usize) -> OracleVerdict {
    let name = format!("feature_count[{kind:?}]");
    let actual = assembly.feature_count(kind);
    if actual == expected {
        OracleVerdict::pass_val(&name, format!("{actual} features"), actual as f64)
    } else {
        OracleVerdict::fail_val(
            &name,
            format!("expected {expected}, got {actual}"),
            actual as f64,
        )
    }
}

/// The standard battery run on every generated frame.
pub fn standard_checks(kernel: &BoxKernel, assembly: &Assembly) -> Vec<OracleVerdict> {
    let bodies = assembly.bodies();
    vec![
        check_body_count(kernel, assembly),
        check_member_tags(kernel, assembly),
        check_no_overlap(kernel, &bodies),
        check_extents(kernel, assembly, 1e-6),
        check_appearances(kernel, &bodies),
    ]
}

