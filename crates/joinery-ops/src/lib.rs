pub mod extrude;
pub mod finish;
pub mod joinery;
pub mod kernel_ext;
pub mod layout;
pub mod profile;
pub mod tolerance;
pub mod types;

pub use extrude::{classify_profiles, extrude_frame, FrameBodies};
pub use finish::{add_cover_panels, assign_appearances, place_bodies, PanelSide};
pub use joinery::{cut_box_corners, cut_dados, cut_mortise_tenons, finger_bands, synthesize_joinery};
pub use kernel_ext::KernelBundle;
pub use layout::{
    plan_frame, rail_centers, rail_section, rail_span, FrameLayout, FrameMember, DADO_DEPTH,
};
pub use profile::{side_rect, JoineryCut};
pub use tolerance::{
    analyze_tolerance, apply_tolerance_cuts, classify_face, CutDirective, FaceClass, TOLERANCE_GROUP,
};
pub use types::*;
