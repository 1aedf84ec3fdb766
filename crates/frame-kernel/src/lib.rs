pub mod box_kernel;
mod cuboid;
pub mod traits;
pub mod types;

pub use box_kernel::BoxKernel;
pub use traits::*;
pub use types::*;
