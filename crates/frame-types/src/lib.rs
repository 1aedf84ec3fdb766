pub mod params;
pub mod roles;
pub mod sketch;

pub use params::*;
pub use roles::*;
pub use sketch::*;
