use frame_kernel::{BodyHandle, CombineOperation};
use frame_types::BodyTag;
use tracing::{debug, warn};

use crate::extrude::FrameBodies;
use crate::kernel_ext::KernelBundle;
use crate::types::{FeatureKind, FeatureRecord, OpResult};

/// Cut every rail out of every stile, keeping the rails as tool bodies.
///
/// The rails were laid out reaching into the stiles by the dado depth, so
/// the cut leaves a slot in each stile that seats its rail.
pub fn cut_dados(kb: &mut dyn KernelBundle, bodies: &FrameBodies) -> OpResult {
    let mut result = OpResult::default();
    let rails: Vec<BodyHandle> = bodies
        .horizontal
        .iter()
        .copied()
        .filter(|&b| kb.body_tag(b) == Some(BodyTag::Rail))
        .collect();
    if rails.is_empty() {
        debug!("no rail bodies, no dados");
        return result;
    }

    for &stile in &bodies.stiles {
        match kb.combine(stile, &rails, CombineOperation::Cut, true) {
            Ok(()) => result.push(FeatureRecord {
                bodies: vec![stile],
                tools: rails.clone(),
                ..FeatureRecord::new("Dado", FeatureKind::COMBINE_CUT)
            }),
            Err(error) => {
                warn!(%error, ?stile, "dado cut skipped");
                result.warn(format!("Dado: {error}"));
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use frame_kernel::{BoxKernel, KernelIntrospect};

    #[test]
    fn rail_reaching_into_stile_leaves_slot() {
        let mut kernel = BoxKernel::new();
        let stile = kernel.add_box([0.0, 1.0, 0.0], [1.0, 9.0, 4.0], "Stile");
        let rail = kernel.add_box([0.8, 4.5, 0.0], [5.0, 5.5, 4.0], "Rail");
        let bodies = FrameBodies {
            horizontal: vec![rail],
            stiles: vec![stile],
            members: Vec::new(),
        };

        let result = cut_dados(&mut kernel, &bodies);

        assert_eq!(result.count(FeatureKind::COMBINE_CUT), 1);
        assert_eq!(result.features[0].tools, vec![rail]);
        let stile_volume = kernel.body_volume(stile).unwrap();
        assert!((stile_volume - (8.0 * 4.0 - 0.2 * 1.0 * 4.0)).abs() < 1e-9);
        assert!((kernel.body_volume(rail).unwrap() - 4.2 * 4.0).abs() < 1e-9);
    }
}
