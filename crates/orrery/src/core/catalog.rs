//! Static per-body facts: what a body is, how big, what color, what to say about it.
//!
//! Indexed by the same `BodyId` the kinematics registry hands out.

use serde::{Deserialize, Serialize};

use crate::api::types::BodyId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyKind {
    Star,
    #[default]
    Planet,
    Moon,
    Asteroid,
}

/// Display and picking data for one body.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyInfo {
    pub name: String,
    pub kind: BodyKind,
    /// Sphere radius in scene units.
    pub radius: f32,
    /// Distance from the orbit center in scene units.
    pub distance: f32,
    /// Distance from the sun in astronomical units, if meaningful.
    pub distance_au: Option<f64>,
    /// Name of the body this one orbits, if any.
    pub parent: Option<String>,
    /// Free-form description line.
    pub info: Option<String>,
    /// Linear RGB.
    pub color: [f32; 3],
    /// Texture path for hosts that load one.
    pub texture: Option<String>,
    /// Whether pointer picking considers this body.
    pub selectable: bool,
}

impl BodyInfo {
    pub fn new(name: impl Into<String>, kind: BodyKind, radius: f32) -> Self {
        Self {
            name: name.into(),
            kind,
            radius,
            distance: 0.0,
            distance_au: None,
            parent: None,
            info: None,
            color: [1.0, 1.0, 1.0],
            texture: None,
            selectable: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BodyCatalog {
    entries: Vec<BodyInfo>,
}

impl BodyCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. Callers keep this in lockstep with kinematics
    /// registration so both hand out the same ids.
    pub fn push(&mut self, info: BodyInfo) -> BodyId {
        let id = BodyId(self.entries.len() as u32);
        self.entries.push(info);
        id
    }

    pub fn get(&self, id: BodyId) -> Option<&BodyInfo> {
        self.entries.get(id.index())
    }

    pub fn find(&self, name: &str) -> Option<BodyId> {
        self.entries
            .iter()
            .position(|e| e.name == name)
            .map(|i| BodyId(i as u32))
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyId, &BodyInfo)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| (BodyId(i as u32), e))
    }

    /// Orbit radii of planets circling the system center, in catalog order.
    pub fn orbit_rings(&self) -> Vec<f32> {
        self.entries
            .iter()
            .filter(|e| e.kind == BodyKind::Planet && e.parent.is_none() && e.distance > 0.0)
            .map(|e| e.distance)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
