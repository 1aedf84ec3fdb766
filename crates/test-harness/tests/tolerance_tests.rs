//! Tolerance pass behaviour over whole generated frames.

use frame_kernel::KernelIntrospect;
use frame_types::{BodyTag, JointType};
use joinery_ops::{analyze_tolerance, classify_face, FeatureKind, TOLERANCE_GROUP};
use proptest::prelude::*;
use test_harness::oracle::check_volume_conserved;
use test_harness::FrameBuilder;

#[test]
fn butt_frame_generates_no_tolerance_cuts() {
    let frame = FrameBuilder::new().tolerance(0.02).build().unwrap();
    assert_eq!(frame.assembly.tolerance_cuts, 0);
    assert!(frame
        .assembly
        .features
        .iter()
        .all(|f| f.group.as_deref() != Some(TOLERANCE_GROUP)));
}

#[test]
fn tolerance_cuts_are_grouped_cut_features() {
    let frame = FrameBuilder::new().box_corners(5).tolerance(0.02).build().unwrap();
    frame.check_all().unwrap();

    let grouped: Vec<_> = frame
        .assembly
        .features
        .iter()
        .filter(|f| f.group.as_deref() == Some(TOLERANCE_GROUP))
        .collect();
    assert_eq!(grouped.len(), frame.assembly.tolerance_cuts);
    assert_eq!(grouped.len(), 16);
    assert!(grouped.iter().all(|f| f.kind == FeatureKind::CUT));
    assert_eq!(grouped[0].name, "Tolerance Cut 1");
}

#[test]
fn tolerance_removes_exactly_the_gap_slabs() {
    let base = FrameBuilder::new().box_corners(5);
    let plain = base.clone().build().unwrap();
    let cut = base.tolerance(0.02).build().unwrap();

    let p = &plain.assembly.parameters;
    let before = test_harness::helpers::total_volume(&plain.kernel, &plain.assembly.bodies()).unwrap();
    let removed = 16.0 * p.ply * p.ply * 0.02;
    let verdict = check_volume_conserved(&cut.kernel, &cut.assembly.bodies(), before - removed, 1e-9);
    assert!(verdict.passed, "{}", verdict.detail);
}

#[test]
fn second_analysis_finds_nothing_left_touching() {
    let frame = FrameBuilder::new().box_corners(5).tolerance(0.02).build().unwrap();
    let frame_bodies: Vec<_> = frame.assembly.members.iter().map(|m| m.body).collect();
    assert!(analyze_tolerance(&frame.kernel, &frame_bodies).is_empty());
}

#[test]
fn generation_is_deterministic() {
    let builder = FrameBuilder::new()
        .rails(2)
        .joint(JointType::MortiseTenon)
        .box_corners(5)
        .tolerance(0.02);
    let a = builder.clone().build().unwrap();
    let b = builder.build().unwrap();

    assert_eq!(a.assembly.features, b.assembly.features);
    for (ma, mb) in a.assembly.members.iter().zip(&b.assembly.members) {
        assert_eq!(
            a.kernel.body_volume(ma.body).unwrap(),
            b.kernel.body_volume(mb.body).unwrap()
        );
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Faces skipped by classification never become directives.
    #[test]
    fn directives_only_name_candidate_faces(
        rails in 0u32..4,
        joint in prop_oneof![Just(JointType::Butt), Just(JointType::Dado), Just(JointType::MortiseTenon)],
        fingers in prop_oneof![Just(3u32), Just(5), Just(7)],
        corners in any::<bool>(),
    ) {
        let mut builder = FrameBuilder::new().size(60.0, 30.0, 6.0).rails(rails).joint(joint);
        if corners {
            builder = builder.box_corners(fingers);
        }
        let frame = builder.build().unwrap();
        let bodies: Vec<_> = frame.assembly.members.iter().map(|m| m.body).collect();

        for d in analyze_tolerance(&frame.kernel, &bodies) {
            let face = frame.kernel.face(d.face).unwrap();
            let bbox = frame.kernel.body_bbox(d.body).unwrap();
            let tag = BodyTag::from_name(&frame.kernel.body_name(d.body).unwrap());
            prop_assert!(classify_face(&face, &bbox, tag).is_candidate());
        }
    }
}
