// extensions/mod.rs
//
// Optional extension modules. Decoupled from the scene graph: a visualizer
// opts in by owning these systems.

pub mod easing;
pub mod transition;

pub use easing::{ease, ease_vec3, lerp, lerp_vec3, smoothstep, Easing};
pub use transition::{CameraPose, CameraTransition, TransitionController, TransitionStep};
