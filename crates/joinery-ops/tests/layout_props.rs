//! Property-based tests for the frame layout planner.

use proptest::prelude::*;

use frame_types::{JointType, ParameterSet};
use joinery_ops::joinery::finger_bands;
use joinery_ops::layout::{plan_frame, rail_span, DADO_DEPTH};

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

/// Frame dimensions with a ply that passes validation.
fn arb_frame() -> impl Strategy<Value = (f64, f64, f64, u32)> {
    (10.0f64..200.0, 10.0f64..100.0, 0.1f64..2.0, 0u32..10)
}

fn params(height: f64, width: f64, ply: f64, rail_count: u32) -> ParameterSet {
    ParameterSet {
        height,
        width,
        ply,
        rail_count,
        ..ParameterSet::default()
    }
}

const TOL: f64 = 1e-9;

// ---------------------------------------------------------------------------
// 1. Four frame members plus one rectangle per rail
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn member_count((h, w, ply, n) in arb_frame()) {
        let layout = plan_frame(&params(h, w, ply, n));
        prop_assert_eq!(layout.members.len(), 4 + n as usize);
        prop_assert_eq!(layout.rail_centers.len(), n as usize);
    }
}

// ---------------------------------------------------------------------------
// 2. Rail centers are evenly spaced across the inner height
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn rail_centers_evenly_spaced((h, w, ply, n) in arb_frame()) {
        let layout = plan_frame(&params(h, w, ply, n));
        let section = (h - 2.0 * ply) / f64::from(n + 1);
        let mut previous = ply;
        for &c in &layout.rail_centers {
            prop_assert!((c - previous - section).abs() < TOL,
                "spacing {} != section {}", c - previous, section);
            previous = c;
        }
    }
}

// ---------------------------------------------------------------------------
// 3. No two member rectangles overlap when the frame is tall enough
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn members_do_not_overlap((h, w, ply, n) in arb_frame()) {
        let p = params(h, w, ply, n);
        prop_assume!(h >= ply * 2.0 * f64::from(n + 2));
        let layout = plan_frame(&p);
        for (i, a) in layout.members.iter().enumerate() {
            for b in &layout.members[i + 1..] {
                let shared = a.rect.bounds().overlap_area(&b.rect.bounds());
                prop_assert!(shared < TOL, "{:?} overlaps {:?} by {}", a.role, b.role, shared);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// 4. Dado widens every rail by twice the dado depth, whatever the ply
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn dado_widening_independent_of_ply((_, w, ply, _) in arb_frame()) {
        let (bs, be) = rail_span(w, ply, JointType::Butt);
        let (ds, de) = rail_span(w, ply, JointType::Dado);
        prop_assert!(((de - ds) - (be - bs) - 2.0 * DADO_DEPTH).abs() < TOL);
    }
}

// ---------------------------------------------------------------------------
// 5. An odd finger count F yields ceil(F / 2) fingers per corner band
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn finger_count_is_ceil_half(k in 1u32..8, depth in 1.0f64..20.0) {
        let f = 2 * k + 1;
        let bands = finger_bands(depth, f);
        prop_assert_eq!(bands.len() as u32, f.div_ceil(2));
        for (lo, hi) in bands {
            prop_assert!((hi - lo - depth / f64::from(f)).abs() < TOL);
        }
    }
}
