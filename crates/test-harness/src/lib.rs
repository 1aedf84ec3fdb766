//! Test harness for frame generation.
//!
//! Builds frames on the cuboid kernel, checks them with geometric oracles
//! and renders a structured text report of the result.
//!
//! # Key Components
//!
//! - [`FrameBuilder`]: fluent parameter setup that generates on a fresh kernel
//! - [`oracle`]: verification functions returning pass/fail verdicts
//! - [`report`]: structured text model descriptions
//! - [`helpers`]: the harness error type and small measurement helpers

pub mod helpers;
pub mod oracle;
pub mod report;
pub mod workflow;

pub use helpers::HarnessError;
pub use oracle::OracleVerdict;
pub use report::ModelReport;
pub use workflow::{BuiltFrame, FrameBuilder};
