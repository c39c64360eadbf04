pub mod manifest;

pub use manifest::{BodyDesc, BuiltSystem, CameraPreset, SystemManifest};
