use frame_kernel::{BodyHandle, Kernel, KernelIntrospect};
use frame_types::BodyTag;

/// A kernel the joinery passes can both mutate and query.
///
/// Stages take `&mut dyn KernelBundle` and reborrow the read side through
/// [`KernelBundle::as_introspect`] between mutations.
pub trait KernelBundle: Kernel + KernelIntrospect {
    fn as_introspect(&self) -> &dyn KernelIntrospect;

    /// Role tag carried in the body's display name. Unknown bodies and
    /// untagged names both read as `None`.
    fn body_tag(&self, body: BodyHandle) -> Option<BodyTag> {
        self.as_introspect()
            .body_name(body)
            .ok()
            .and_then(|name| BodyTag::from_name(&name))
    }
}

impl<T: Kernel + KernelIntrospect> KernelBundle for T {
    fn as_introspect(&self) -> &dyn KernelIntrospect {
        self
    }
}
