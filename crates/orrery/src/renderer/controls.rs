use std::f32::consts::PI;

use glam::Vec3;

use super::camera::PerspectiveCamera;

/// Keeps the polar angle off the poles, where the Y-up basis degenerates.
const POLE_EPS: f32 = 1e-6;
const MOTION_EPS: f32 = 1e-6;

/// Orbit-around-a-target camera controls with damped inertia.
///
/// User input accumulates spherical deltas; each `update` applies a
/// `damping_factor` share of them and decays the rest, so the camera keeps
/// drifting briefly after the pointer stops.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    /// Point the camera orbits and looks at.
    pub target: Vec3,
    /// Share of the pending motion applied per update (0 = no damping).
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Pending azimuth change (radians).
    theta_delta: f32,
    /// Pending polar change (radians).
    phi_delta: f32,
    /// Pending radius factor.
    scale: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            theta_delta: 0.0,
            phi_delta: 0.0,
            scale: 1.0,
        }
    }
}

impl OrbitControls {
    pub fn new(damping_factor: f32) -> Self {
        Self {
            damping_factor: damping_factor.clamp(0.0, 1.0),
            ..Self::default()
        }
    }

    /// Queue an orbit: `left` turns around the Y axis, `up` toward the pole.
    pub fn rotate(&mut self, left: f32, up: f32) {
        self.theta_delta -= left * self.rotate_speed;
        self.phi_delta -= up * self.rotate_speed;
    }

    /// Queue a zoom from a wheel delta: negative moves closer.
    pub fn zoom(&mut self, delta: f32) {
        let step = 0.95_f32.powf(self.zoom_speed);
        if delta < 0.0 {
            self.scale *= step;
        } else if delta > 0.0 {
            self.scale /= step;
        }
    }

    /// Any motion still pending?
    pub fn has_motion(&self) -> bool {
        self.theta_delta.abs() > MOTION_EPS
            || self.phi_delta.abs() > MOTION_EPS
            || (self.scale - 1.0).abs() > MOTION_EPS
    }

    /// Discard pending motion.
    pub fn halt(&mut self) {
        self.theta_delta = 0.0;
        self.phi_delta = 0.0;
        self.scale = 1.0;
    }

    /// Apply pending motion to `camera`. Returns whether the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        if !self.has_motion() {
            self.halt();
            return false;
        }
        let offset = camera.position - self.target;
        let radius = offset.length();
        if !(radius > 0.0) {
            self.halt();
            return false;
        }

        let damped = self.damping_factor > 0.0;
        let share = if damped { self.damping_factor } else { 1.0 };

        let mut theta = offset.x.atan2(offset.z) + self.theta_delta * share;
        let phi = (offset.y / radius).clamp(-1.0, 1.0).acos() + self.phi_delta * share;
        let phi = phi.clamp(POLE_EPS, PI - POLE_EPS);
        if !theta.is_finite() {
            theta = 0.0;
        }
        let radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);

        let sin_phi = phi.sin();
        let next = Vec3::new(
            radius * sin_phi * theta.sin(),
            radius * phi.cos(),
            radius * sin_phi * theta.cos(),
        );
        camera.position = self.target + next;

        if damped {
            self.theta_delta *= 1.0 - self.damping_factor;
            self.phi_delta *= 1.0 - self.damping_factor;
        } else {
            self.theta_delta = 0.0;
            self.phi_delta = 0.0;
        }
        self.scale = 1.0;

        (next - offset).length_squared() > MOTION_EPS * MOTION_EPS
    }
}
