//! Property-based tests for BoxKernel boolean bookkeeping.

use proptest::prelude::*;

use frame_kernel::{
    BoxKernel, ExtrudeInput, ExtrudeOperation, Kernel, KernelIntrospect, Plane, ProfileRef,
};
use frame_types::Rect2;

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

/// A rectangle with positive extent inside a 20 x 20 window.
fn arb_rect() -> impl Strategy<Value = Rect2> {
    (0.0f64..15.0, 0.0f64..15.0, 0.5f64..5.0, 0.5f64..5.0)
        .prop_map(|(x, y, w, h)| Rect2::new(x, y, x + w, y + h))
}

const TOL: f64 = 1e-6;

// ---------------------------------------------------------------------------
// 1. A cut removes exactly the overlap volume
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn cut_removes_overlap_volume(base in arb_rect(), hole in arb_rect(), depth in 0.5f64..4.0) {
        let mut kernel = BoxKernel::new();
        let body = kernel.add_box(
            [base.min.x, base.min.y, 0.0],
            [base.max.x, base.max.y, depth],
            "Block",
        );
        let sketch = kernel.create_sketch(Plane::xy().offset_by(-1.0)).unwrap();
        let tool = kernel.add_rectangle(sketch, hole).unwrap();
        kernel
            .extrude(&ExtrudeInput::new(
                vec![ProfileRef::Sketch(tool)],
                depth + 2.0,
                ExtrudeOperation::Cut,
            ))
            .unwrap();

        let expected = (base.area() - base.overlap_area(&hole)) * depth;
        if expected <= TOL {
            prop_assert!(kernel.bodies().is_empty());
        } else {
            let volume = kernel.body_volume(body).unwrap();
            prop_assert!((volume - expected).abs() < TOL,
                "volume {} != expected {}", volume, expected);
        }
    }
}

// ---------------------------------------------------------------------------
// 2. Face areas add up to the surface area of a single swept box
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn swept_box_surface_area(rect in arb_rect(), depth in 0.5f64..4.0) {
        let mut kernel = BoxKernel::new();
        let sketch = kernel.create_sketch(Plane::xy()).unwrap();
        let profile = kernel.add_rectangle(sketch, rect).unwrap();
        let bodies = kernel
            .extrude(&ExtrudeInput::new(
                vec![ProfileRef::Sketch(profile)],
                depth,
                ExtrudeOperation::NewBody,
            ))
            .unwrap();

        let area: f64 = kernel.body_faces(bodies[0]).unwrap().iter().map(|f| f.area).sum();
        let (w, h) = (rect.width(), rect.height());
        let expected = 2.0 * (w * h + w * depth + h * depth);
        prop_assert!((area - expected).abs() < TOL);
    }
}
