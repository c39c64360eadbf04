// extensions/transition.rs
//
// Eased camera flights between two poses. While a flight is active it owns
// the camera position and the controls target; free orbiting resumes once
// it lands.
//
// Usage:
//   transition.start(CameraPose::of(&camera, &controls), destination, 1200.0, now);
//   transition.apply(now, &mut camera, &mut controls);  // once per frame

use glam::Vec3;
use log::debug;

use super::easing::{lerp_vec3, Easing};
use crate::renderer::camera::PerspectiveCamera;
use crate::renderer::controls::OrbitControls;

/// Where the camera is and what it looks at.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
}

impl CameraPose {
    pub fn new(position: Vec3, target: Vec3) -> Self {
        Self { position, target }
    }

    /// Current pose of a camera and its controls.
    pub fn of(camera: &PerspectiveCamera, controls: &OrbitControls) -> Self {
        Self::new(camera.position, controls.target)
    }

    pub fn lerp(self, to: CameraPose, t: f32) -> Self {
        Self {
            position: lerp_vec3(self.position, to.position, t),
            target: lerp_vec3(self.target, to.target, t),
        }
    }
}

/// A single in-flight camera move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTransition {
    start_ms: f64,
    duration_ms: f64,
    from: CameraPose,
    to: CameraPose,
    easing: Easing,
}

impl CameraTransition {
    pub fn new(from: CameraPose, to: CameraPose, duration_ms: f64, start_ms: f64, easing: Easing) -> Self {
        Self {
            start_ms,
            duration_ms,
            from,
            to,
            easing,
        }
    }

    /// Elapsed fraction in [0, 1]. Non-positive or non-finite durations are
    /// complete immediately.
    pub fn progress(&self, now_ms: f64) -> f32 {
        if !(self.duration_ms > 0.0) || !self.duration_ms.is_finite() {
            return 1.0;
        }
        let t = (now_ms - self.start_ms) / self.duration_ms;
        if t.is_nan() {
            return 1.0;
        }
        t.clamp(0.0, 1.0) as f32
    }

    /// Pose at `now_ms`. At completion this is exactly the end pose.
    pub fn sample(&self, now_ms: f64) -> CameraPose {
        let t = self.progress(now_ms);
        if t >= 1.0 {
            return self.to;
        }
        self.from.lerp(self.to, self.easing.apply(t))
    }

    pub fn from(&self) -> CameraPose {
        self.from
    }

    pub fn to(&self) -> CameraPose {
        self.to
    }

    pub fn start_ms(&self) -> f64 {
        self.start_ms
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }
}

/// Outcome of one `TransitionController::apply`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionStep {
    /// No flight; the camera belongs to the controls.
    Idle,
    /// Camera moved; `eased` is the eased progress.
    InProgress { eased: f32 },
    /// Camera landed on the end pose this frame.
    Finished,
}

/// Holds at most one camera transition. Starting a new one replaces the old.
#[derive(Debug, Clone, Default)]
pub struct TransitionController {
    active: Option<CameraTransition>,
    easing: Easing,
}

impl TransitionController {
    pub fn new(easing: Easing) -> Self {
        Self { active: None, easing }
    }

    /// Begin a flight from `current` to `destination`. An in-flight
    /// transition is dropped; pass the camera's live pose as `current` so
    /// the new flight starts where the old one left off.
    pub fn start(&mut self, current: CameraPose, destination: CameraPose, duration_ms: f64, now_ms: f64) {
        if self.active.is_some() {
            debug!("camera transition replaced mid-flight");
        }
        self.active = Some(CameraTransition::new(current, destination, duration_ms, now_ms, self.easing));
    }

    /// Drive the camera for this frame.
    pub fn apply(&mut self, now_ms: f64, camera: &mut PerspectiveCamera, controls: &mut OrbitControls) -> TransitionStep {
        let Some(transition) = self.active else {
            return TransitionStep::Idle;
        };
        let t = transition.progress(now_ms);
        let pose = transition.sample(now_ms);
        camera.position = pose.position;
        controls.target = pose.target;
        controls.halt();

        if t >= 1.0 {
            self.active = None;
            TransitionStep::Finished
        } else {
            TransitionStep::InProgress {
                eased: self.easing.apply(t),
            }
        }
    }

    pub fn cancel(&mut self) {
        self.active = None;
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&CameraTransition> {
        self.active.as_ref()
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }
}
