//! Orbital kinematics: per-frame advance of orbit and spin angles.
//!
//! Every body owns two scene nodes: a pivot whose rotation carries the body
//! around its parent, and a mesh whose rotation is the body's own spin.
//! Speeds are fixed at construction; only the node angles change.

use std::f32::consts::TAU;

use log::{debug, warn};

use crate::api::types::{BodyId, NodeId};
use crate::core::scene::SceneGraph;

/// A body that orbits (pivot rotation) and spins (mesh rotation).
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitalBody {
    name: String,
    pivot: NodeId,
    mesh: NodeId,
    /// Radians per frame.
    orbit_speed: f32,
    /// Radians per frame.
    spin_speed: f32,
}

impl OrbitalBody {
    pub fn new(name: impl Into<String>, pivot: NodeId, mesh: NodeId, orbit_speed: f32, spin_speed: f32) -> Self {
        Self {
            name: name.into(),
            pivot,
            mesh,
            orbit_speed,
            spin_speed,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pivot(&self) -> NodeId {
        self.pivot
    }

    pub fn mesh(&self) -> NodeId {
        self.mesh
    }

    pub fn orbit_speed(&self) -> f32 {
        self.orbit_speed
    }

    pub fn spin_speed(&self) -> f32 {
        self.spin_speed
    }
}

/// What to do with accumulated angles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AngleWrap {
    /// Accumulate without bound. Trigonometric consumers are periodic, so
    /// this only costs precision over very long sessions.
    #[default]
    Unbounded,
    /// Keep angles in [0, 2π).
    Tau,
}

impl AngleWrap {
    #[inline]
    pub fn apply(self, angle: f32) -> f32 {
        match self {
            AngleWrap::Unbounded => angle,
            AngleWrap::Tau => {
                // rem_euclid rounds up to TAU for tiny negative angles
                let wrapped = angle.rem_euclid(TAU);
                if wrapped >= TAU {
                    0.0
                } else {
                    wrapped
                }
            }
        }
    }
}

/// Pause flag and speed multiplier, read once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationState {
    paused: bool,
    speed_multiplier: f32,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self {
            paused: false,
            speed_multiplier: 1.0,
        }
    }
}

impl AnimationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn toggle_paused(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }

    /// Set the multiplier. Non-positive or non-finite values are rejected
    /// and leave the state unchanged. Returns whether the value was taken.
    pub fn set_speed_multiplier(&mut self, multiplier: f32) -> bool {
        if multiplier.is_finite() && multiplier > 0.0 {
            self.speed_multiplier = multiplier;
            true
        } else {
            warn!("ignoring speed multiplier {multiplier}: must be positive and finite");
            false
        }
    }
}

/// Registry of orbital bodies and the per-frame angle update.
#[derive(Debug, Default)]
pub struct KinematicsUpdater {
    bodies: Vec<OrbitalBody>,
    wrap: AngleWrap,
}

impl KinematicsUpdater {
    pub fn new(wrap: AngleWrap) -> Self {
        Self {
            bodies: Vec::new(),
            wrap,
        }
    }

    pub fn register(&mut self, body: OrbitalBody) -> BodyId {
        let id = BodyId(self.bodies.len() as u32);
        self.bodies.push(body);
        id
    }

    pub fn get(&self, id: BodyId) -> Option<&OrbitalBody> {
        self.bodies.get(id.index())
    }

    pub fn find(&self, name: &str) -> Option<BodyId> {
        self.bodies
            .iter()
            .position(|b| b.name == name)
            .map(|i| BodyId(i as u32))
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyId, &OrbitalBody)> {
        self.bodies
            .iter()
            .enumerate()
            .map(|(i, b)| (BodyId(i as u32), b))
    }

    pub fn wrap(&self) -> AngleWrap {
        self.wrap
    }

    pub fn set_wrap(&mut self, wrap: AngleWrap) {
        self.wrap = wrap;
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Advance every body by one frame.
    ///
    /// Paused: nothing moves. Otherwise each pivot turns by
    /// `orbit_speed * multiplier` and each mesh by `spin_speed * multiplier`.
    /// Bodies whose nodes are missing from `scene` are skipped.
    pub fn update(&self, state: &AnimationState, scene: &mut SceneGraph) {
        if state.is_paused() {
            return;
        }
        let m = state.speed_multiplier();

        for body in &self.bodies {
            if !scene.contains(body.pivot) || !scene.contains(body.mesh) {
                debug!("kinematics: skipping `{}`, node missing from scene", body.name);
                continue;
            }

            if let Some(pivot) = scene.get_mut(body.pivot) {
                pivot.rotation_y = self.wrap.apply(pivot.rotation_y + body.orbit_speed * m);
            }
            if body.spin_speed != 0.0 {
                if let Some(mesh) = scene.get_mut(body.mesh) {
                    mesh.rotation_y = self.wrap.apply(mesh.rotation_y + body.spin_speed * m);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scene::TransformNode;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    fn one_body(scene: &mut SceneGraph, orbit: f32, spin: f32) -> (KinematicsUpdater, NodeId, NodeId) {
        let pivot = scene.spawn(TransformNode::new());
        let mesh = scene.spawn_child(pivot, TransformNode::new()).unwrap();
        let mut k = KinematicsUpdater::default();
        k.register(OrbitalBody::new("Earth", pivot, mesh, orbit, spin));
        (k, pivot, mesh)
    }

    fn angle(scene: &SceneGraph, id: NodeId) -> f32 {
        scene.get(id).unwrap().rotation_y
    }

    #[test]
    fn single_update_adds_speed_times_multiplier() {
        let mut scene = SceneGraph::new();
        let (k, pivot, mesh) = one_body(&mut scene, 0.015, 0.02);
        let mut state = AnimationState::new();
        state.set_speed_multiplier(2.0);

        k.update(&state, &mut scene);

        assert_eq!(angle(&scene, pivot), 0.015 * 2.0);
        assert_eq!(angle(&scene, mesh), 0.02 * 2.0);
    }

    #[test]
    fn two_hundred_frames_of_earth_is_one_radian() {
        let mut scene = SceneGraph::new();
        let (k, pivot, _) = one_body(&mut scene, 0.005, 0.007);
        let state = AnimationState::new();

        for _ in 0..200 {
            k.update(&state, &mut scene);
        }

        assert_abs_diff_eq!(angle(&scene, pivot), 1.0, epsilon = 1e-4);
    }

    #[test]
    fn zero_spin_leaves_mesh_alone() {
        let mut scene = SceneGraph::new();
        let (k, pivot, mesh) = one_body(&mut scene, 0.0005, 0.0);
        k.update(&AnimationState::new(), &mut scene);
        assert!(angle(&scene, pivot) > 0.0);
        assert_eq!(angle(&scene, mesh), 0.0);
    }

    #[test]
    fn missing_nodes_skip_only_that_body() {
        let mut scene = SceneGraph::new();
        let (mut k, pivot, _) = one_body(&mut scene, 0.01, 0.0);
        let ghost_pivot = scene.spawn(TransformNode::new());
        let ghost_mesh = scene.spawn_child(ghost_pivot, TransformNode::new()).unwrap();
        k.register(OrbitalBody::new("Ghost", ghost_pivot, ghost_mesh, 0.01, 0.01));
        k.register(OrbitalBody::new("Unbuilt", NodeId(500), NodeId(501), 0.01, 0.01));
        scene.remove(ghost_mesh);

        k.update(&AnimationState::new(), &mut scene);

        assert_eq!(angle(&scene, pivot), 0.01);
        assert_eq!(angle(&scene, ghost_pivot), 0.0);
    }

    #[test]
    fn tau_wrap_keeps_angles_bounded() {
        let mut scene = SceneGraph::new();
        let (mut k, pivot, _) = one_body(&mut scene, 1.0, 0.0);
        k.set_wrap(AngleWrap::Tau);
        for _ in 0..100 {
            k.update(&AnimationState::new(), &mut scene);
        }
        let a = angle(&scene, pivot);
        assert!((0.0..TAU).contains(&a), "angle = {a}");
        assert_abs_diff_eq!(a, 100.0_f32.rem_euclid(TAU), epsilon = 1e-3);
    }

    #[test]
    fn tau_wrap_retrograde_stays_below_tau() {
        let mut scene = SceneGraph::new();
        let (mut k, pivot, _) = one_body(&mut scene, -1e-9, 0.0);
        k.set_wrap(AngleWrap::Tau);
        k.update(&AnimationState::new(), &mut scene);
        let a = angle(&scene, pivot);
        assert!((0.0..TAU).contains(&a), "angle = {a}");
        assert!((0.0..TAU).contains(&AngleWrap::Tau.apply(-1e-9)));
        assert_abs_diff_eq!(AngleWrap::Tau.apply(-1.0), TAU - 1.0, epsilon = 1e-6);
    }

    #[test]
    fn rejects_bad_multipliers() {
        let mut state = AnimationState::new();
        assert!(!state.set_speed_multiplier(0.0));
        assert!(!state.set_speed_multiplier(-2.0));
        assert!(!state.set_speed_multiplier(f32::INFINITY));
        assert_eq!(state.speed_multiplier(), 1.0);
        assert!(state.toggle_paused());
        assert!(!state.toggle_paused());
    }

    #[test]
    fn find_by_name() {
        let mut scene = SceneGraph::new();
        let (k, _, _) = one_body(&mut scene, 0.01, 0.0);
        assert_eq!(k.find("Earth"), Some(BodyId(0)));
        assert_eq!(k.find("Pluto"), None);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Paused updates never move anything.
        #[test]
        fn prop_pause_is_idempotent(
            speeds in prop::collection::vec((0.0f32..0.1, 0.0f32..0.1), 1..8),
            frames in 1usize..50,
        ) {
            let mut scene = SceneGraph::new();
            let mut k = KinematicsUpdater::default();
            let mut nodes = Vec::new();
            for (i, (orbit, spin)) in speeds.iter().enumerate() {
                let pivot = scene.spawn(TransformNode::new().with_rotation_y(i as f32));
                let mesh = scene.spawn_child(pivot, TransformNode::new()).unwrap();
                k.register(OrbitalBody::new(format!("b{i}"), pivot, mesh, *orbit, *spin));
                nodes.push((pivot, mesh));
            }
            let before: Vec<_> = nodes.iter().map(|&(p, m)| (angle(&scene, p), angle(&scene, m))).collect();

            let mut state = AnimationState::new();
            state.set_paused(true);
            for _ in 0..frames {
                k.update(&state, &mut scene);
            }

            let after: Vec<_> = nodes.iter().map(|&(p, m)| (angle(&scene, p), angle(&scene, m))).collect();
            prop_assert_eq!(before, after);
        }

        /// Doubling the multiplier doubles every per-frame delta.
        #[test]
        fn prop_multiplier_scales_delta(
            orbit in 0.0001f32..0.1,
            spin in 0.0f32..0.1,
            m in 0.1f32..10.0,
        ) {
            let run = |mult: f32| {
                let mut scene = SceneGraph::new();
                let (k, pivot, mesh) = one_body(&mut scene, orbit, spin);
                let mut state = AnimationState::new();
                state.set_speed_multiplier(mult);
                k.update(&state, &mut scene);
                (angle(&scene, pivot), angle(&scene, mesh))
            };
            let (p1, s1) = run(m);
            let (p2, s2) = run(2.0 * m);
            prop_assert!((p2 - 2.0 * p1).abs() <= 1e-6 * p2.abs().max(1.0));
            prop_assert!((s2 - 2.0 * s1).abs() <= 1e-6 * s2.abs().max(1.0));
        }
    }
}
