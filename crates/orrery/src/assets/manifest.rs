use std::collections::HashSet;

use glam::Vec3;
use log::info;
use serde::{Deserialize, Serialize};

use crate::core::catalog::{BodyCatalog, BodyInfo, BodyKind};
use crate::core::kinematics::{AngleWrap, KinematicsUpdater, OrbitalBody};
use crate::core::scene::{SceneGraph, TransformNode};
use crate::error::ManifestError;

/// System manifest describing every body and named camera preset.
/// Loaded from a JSON file at runtime or built in code.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemManifest {
    /// Bodies in build order. A parent must appear before its satellites.
    #[serde(default)]
    pub bodies: Vec<BodyDesc>,
    /// Named camera poses.
    #[serde(default)]
    pub presets: Vec<CameraPreset>,
}

/// Describes a single body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyDesc {
    pub name: String,
    #[serde(default)]
    pub kind: BodyKind,
    /// Sphere radius in scene units.
    pub radius: f32,
    /// Orbit radius around the parent (or the origin) in scene units.
    #[serde(default)]
    pub distance: f32,
    /// Distance from the sun in AU, for the info panel.
    #[serde(default)]
    pub distance_au: Option<f64>,
    /// Radians per frame around the parent.
    #[serde(default)]
    pub orbit_speed: f32,
    /// Radians per frame about the body's own axis.
    #[serde(default)]
    pub spin_speed: f32,
    /// Name of the body whose mesh this one orbits.
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default = "default_color")]
    pub color: [f32; 3],
    #[serde(default)]
    pub texture: Option<String>,
    #[serde(default)]
    pub info: Option<String>,
    #[serde(default = "default_selectable")]
    pub selectable: bool,
    /// Starting pivot angle in radians.
    #[serde(default)]
    pub initial_orbit_angle: f32,
    /// Offset of the mesh off the orbit plane, along Z before rotation.
    #[serde(default)]
    pub z_offset: f32,
}

/// A named camera pose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraPreset {
    pub name: String,
    pub position: Vec3,
    #[serde(default)]
    pub target: Vec3,
}

fn default_color() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

fn default_selectable() -> bool {
    true
}

impl BodyDesc {
    pub fn new(name: impl Into<String>, kind: BodyKind, radius: f32) -> Self {
        Self {
            name: name.into(),
            kind,
            radius,
            distance: 0.0,
            distance_au: None,
            orbit_speed: 0.0,
            spin_speed: 0.0,
            parent: None,
            color: default_color(),
            texture: None,
            info: None,
            selectable: default_selectable(),
            initial_orbit_angle: 0.0,
            z_offset: 0.0,
        }
    }
}

/// Everything a manifest assembles into.
#[derive(Debug)]
pub struct BuiltSystem {
    pub scene: SceneGraph,
    pub kinematics: KinematicsUpdater,
    pub catalog: BodyCatalog,
    pub presets: Vec<CameraPreset>,
}

impl SystemManifest {
    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn preset(&self, name: &str) -> Option<&CameraPreset> {
        self.presets.iter().find(|p| p.name == name)
    }

    /// Check names, parents, radii and that every number is finite.
    pub fn validate(&self) -> Result<(), ManifestError> {
        let mut seen: HashSet<&str> = HashSet::new();
        for body in &self.bodies {
            if let Some(parent) = &body.parent {
                if !seen.contains(parent.as_str()) {
                    return Err(ManifestError::UnknownParent {
                        body: body.name.clone(),
                        parent: parent.clone(),
                    });
                }
            }
            if !seen.insert(&body.name) {
                return Err(ManifestError::DuplicateBody(body.name.clone()));
            }
            if !(body.radius > 0.0) || !body.radius.is_finite() {
                return Err(ManifestError::InvalidRadius { body: body.name.clone() });
            }
            let fields = [
                ("orbit_speed", body.orbit_speed),
                ("spin_speed", body.spin_speed),
                ("distance", body.distance),
                ("initial_orbit_angle", body.initial_orbit_angle),
                ("z_offset", body.z_offset),
            ];
            if let Some(&(field, _)) = fields.iter().find(|(_, v)| !v.is_finite()) {
                return Err(ManifestError::NonFinite {
                    body: body.name.clone(),
                    field,
                });
            }
        }

        let mut presets: HashSet<&str> = HashSet::new();
        for preset in &self.presets {
            if !presets.insert(&preset.name) {
                return Err(ManifestError::DuplicatePreset(preset.name.clone()));
            }
        }
        Ok(())
    }

    /// Assemble the scene graph, kinematics registry and catalog.
    ///
    /// Each body gets a pivot node (under its parent's mesh, or at the root)
    /// and a mesh node offset by `distance` along the pivot's X axis.
    pub fn build(&self, wrap: AngleWrap) -> Result<BuiltSystem, ManifestError> {
        self.validate()?;

        let mut scene = SceneGraph::new();
        let mut kinematics = KinematicsUpdater::new(wrap);
        let mut catalog = BodyCatalog::new();

        for body in &self.bodies {
            let pivot_node = TransformNode::new().with_rotation_y(body.initial_orbit_angle);
            let pivot = match &body.parent {
                Some(parent) => {
                    let parent_id = kinematics.find(parent).ok_or_else(|| ManifestError::UnknownParent {
                        body: body.name.clone(),
                        parent: parent.clone(),
                    })?;
                    let Some(parent_body) = kinematics.get(parent_id) else {
                        return Err(ManifestError::UnknownParent {
                            body: body.name.clone(),
                            parent: parent.clone(),
                        });
                    };
                    scene.spawn_child(parent_body.mesh(), pivot_node)?
                }
                None => scene.spawn(pivot_node),
            };
            let mesh = scene.spawn_child(
                pivot,
                TransformNode::new().with_translation(Vec3::new(body.distance, 0.0, body.z_offset)),
            )?;

            kinematics.register(OrbitalBody::new(
                body.name.clone(),
                pivot,
                mesh,
                body.orbit_speed,
                body.spin_speed,
            ));
            catalog.push(BodyInfo {
                name: body.name.clone(),
                kind: body.kind,
                radius: body.radius,
                distance: body.distance,
                distance_au: body.distance_au,
                parent: body.parent.clone(),
                info: body.info.clone(),
                color: body.color,
                texture: body.texture.clone(),
                selectable: body.selectable,
            });
        }

        info!(
            "system built: {} bodies, {} scene nodes, {} camera presets",
            kinematics.len(),
            scene.len(),
            self.presets.len()
        );

        Ok(BuiltSystem {
            scene,
            kinematics,
            catalog,
            presets: self.presets.clone(),
        })
    }
}
