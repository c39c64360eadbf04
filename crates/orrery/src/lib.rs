pub mod api;
pub mod assets;
pub mod bridge;
pub mod core;
pub mod error;
pub mod extensions;
pub mod input;
pub mod renderer;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::app::{EngineConfig, EngineContext, Visualizer, ViewState};
pub use api::types::{BodyId, FrameEvent, NodeId};
pub use assets::manifest::{BodyDesc, BuiltSystem, CameraPreset, SystemManifest};
pub use bridge::protocol::{FrameHeader, ProtocolLayout};
pub use core::catalog::{BodyCatalog, BodyInfo, BodyKind};
pub use core::kinematics::{AngleWrap, AnimationState, KinematicsUpdater, OrbitalBody};
pub use core::scene::{SceneGraph, TransformNode};
pub use core::time::{Clock, FixedTimestep, FramePacing, ManualClock, SystemClock};
pub use error::{ManifestError, SceneError};
pub use input::picking::{intersect_sphere, pick, Pick, PickCandidate, Ray};
pub use input::queue::{InputEvent, InputQueue};
pub use input::selection::Selection;
pub use renderer::camera::{screen_to_ndc, CameraUniform, PerspectiveCamera};
pub use renderer::controls::OrbitControls;
pub use renderer::instance::{BodyInstance, InstanceBuffer};
pub use systems::info::describe;
pub use systems::render::build_instances;

// Extensions: decoupled optional systems
pub use extensions::{
    ease, ease_vec3, lerp, lerp_vec3, smoothstep, CameraPose, CameraTransition, Easing, TransitionController,
    TransitionStep,
};
