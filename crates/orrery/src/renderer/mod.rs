pub mod camera;
pub mod controls;
pub mod instance;

// Re-export key types for convenient access
pub use camera::{screen_to_ndc, CameraUniform, PerspectiveCamera};
pub use controls::OrbitControls;
pub use instance::{BodyInstance, InstanceBuffer};
