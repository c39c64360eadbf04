use std::f32::consts::TAU;

use glam::{Vec2, Vec3};
use log::{debug, info, warn};

use crate::api::types::{BodyId, FrameEvent};
use crate::assets::manifest::{BuiltSystem, CameraPreset, SystemManifest};
use crate::bridge::protocol::FrameHeader;
use crate::core::catalog::BodyCatalog;
use crate::core::kinematics::{AngleWrap, AnimationState, KinematicsUpdater};
use crate::core::scene::SceneGraph;
use crate::core::time::FramePacing;
use crate::error::ManifestError;
use crate::extensions::easing::Easing;
use crate::extensions::transition::{CameraPose, TransitionController, TransitionStep};
use crate::input::picking::{pick, Pick, PickCandidate};
use crate::input::queue::{InputEvent, InputQueue};
use crate::input::selection::Selection;
use crate::renderer::camera::{screen_to_ndc, PerspectiveCamera};
use crate::renderer::controls::OrbitControls;
use crate::systems::info::{describe, DEFAULT_PROMPT};

/// Configuration for the engine, provided by the visualizer.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// How display refreshes map to kinematics updates (default: one per frame).
    pub pacing: FramePacing,
    /// Initial viewport size in pixels.
    pub viewport: [f32; 2],
    /// Maximum number of body instances (default: 512).
    pub max_instances: usize,
    /// Maximum number of frame events per frame (default: 32).
    pub max_events: usize,
    /// Angle accumulation mode (default: unbounded).
    pub angle_wrap: AngleWrap,
    /// Camera flight duration in milliseconds (default: 1200).
    pub transition_ms: f64,
    /// Camera flight easing (default: smoothstep).
    pub easing: Easing,
    /// Vertical field of view in degrees (default: 75).
    pub fov_y_deg: f32,
    pub near: f32,
    pub far: f32,
    /// Initial camera position (default: 20 units down +Z).
    pub camera_position: Vec3,
    /// Orbit controls damping (default: 0.05).
    pub damping_factor: f32,
    /// Focus distance as a multiple of the body radius (default: 6).
    pub focus_radii: f32,
    /// Focus distance floor, in scene units (default: 2).
    pub min_focus_distance: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pacing: FramePacing::PerFrame,
            viewport: [800.0, 600.0],
            max_instances: 512,
            max_events: 32,
            angle_wrap: AngleWrap::Unbounded,
            transition_ms: 1200.0,
            easing: Easing::SmoothStep,
            fov_y_deg: 75.0,
            near: 0.1,
            far: 1000.0,
            camera_position: Vec3::new(0.0, 0.0, 20.0),
            damping_factor: 0.05,
            focus_radii: 6.0,
            min_focus_distance: 2.0,
        }
    }
}

/// The contract every visualizer fulfills.
pub trait Visualizer {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> EngineConfig {
        EngineConfig::default()
    }

    /// Build the system, set up the camera, seed the view.
    fn init(&mut self, ctx: &mut EngineContext);

    /// Per-frame hook, after built-in pointer handling and before the
    /// kinematics step. Handle keys and custom UI events here.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue);
}

/// Interaction state shared by the frame loop and the UI handlers.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    animation: AnimationState,
    selection: Selection,
    transition: TransitionController,
}

impl ViewState {
    pub fn new(easing: Easing) -> Self {
        Self {
            animation: AnimationState::default(),
            selection: Selection::default(),
            transition: TransitionController::new(easing),
        }
    }

    pub fn animation(&self) -> &AnimationState {
        &self.animation
    }

    pub fn animation_mut(&mut self) -> &mut AnimationState {
        &mut self.animation
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    pub fn transition(&self) -> &TransitionController {
        &self.transition
    }

    pub fn transition_mut(&mut self) -> &mut TransitionController {
        &mut self.transition
    }

    pub fn is_transition_active(&self) -> bool {
        self.transition.is_active()
    }
}

/// Mutable access to engine state, passed to Visualizer::init and Visualizer::update.
pub struct EngineContext {
    pub scene: SceneGraph,
    pub kinematics: KinematicsUpdater,
    pub catalog: BodyCatalog,
    pub camera: PerspectiveCamera,
    pub controls: OrbitControls,
    pub view: ViewState,
    pub presets: Vec<CameraPreset>,
    /// Static backdrop points (xyz triples), e.g. a starfield.
    pub backdrop: Vec<f32>,
    /// Planet orbit radii, refreshed on every load.
    pub orbit_rings: Vec<f32>,
    pub events: Vec<FrameEvent>,
    /// Clock reading for the current frame.
    now_ms: f64,
    viewport: [f32; 2],
    transition_ms: f64,
    focus_radii: f32,
    min_focus_distance: f32,
    /// Last known pointer position in pixels.
    pointer: Option<Vec2>,
    /// Pointer position at the previous drag sample, while a button is down.
    drag_from: Option<Vec2>,
}

impl EngineContext {
    pub fn new(config: &EngineConfig) -> Self {
        let [w, h] = config.viewport;
        let aspect = if w > 0.0 && h > 0.0 { w / h } else { 1.0 };
        Self {
            scene: SceneGraph::new(),
            kinematics: KinematicsUpdater::new(config.angle_wrap),
            catalog: BodyCatalog::new(),
            camera: PerspectiveCamera::new(config.fov_y_deg, aspect, config.near, config.far)
                .with_position(config.camera_position),
            controls: OrbitControls::new(config.damping_factor),
            view: ViewState::new(config.easing),
            presets: Vec::new(),
            backdrop: Vec::new(),
            orbit_rings: Vec::new(),
            events: Vec::new(),
            now_ms: 0.0,
            viewport: config.viewport,
            transition_ms: config.transition_ms,
            focus_radii: config.focus_radii,
            min_focus_distance: config.min_focus_distance,
            pointer: None,
            drag_from: None,
        }
    }

    /// Replace the scene, bodies and presets with a built system.
    pub fn load_system(&mut self, system: BuiltSystem) {
        let wrap = self.kinematics.wrap();
        self.scene = system.scene;
        self.kinematics = system.kinematics;
        self.kinematics.set_wrap(wrap);
        self.catalog = system.catalog;
        self.orbit_rings = self.catalog.orbit_rings();
        self.presets = system.presets;
        self.view.selection_mut().clear();
    }

    /// Validate and build a manifest, then load it.
    pub fn load_manifest(&mut self, manifest: &SystemManifest) -> Result<(), ManifestError> {
        let system = manifest.build(self.kinematics.wrap())?;
        self.load_system(system);
        Ok(())
    }

    /// Emit a frame event to be forwarded to the host page.
    pub fn emit_event(&mut self, event: FrameEvent) {
        self.events.push(event);
    }

    /// Start a frame at `now_ms`: record the clock reading and clear
    /// per-frame transient data.
    pub fn begin_frame(&mut self, now_ms: f64) {
        self.now_ms = now_ms;
        self.events.clear();
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn viewport(&self) -> [f32; 2] {
        self.viewport
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.viewport = [width, height];
            self.camera.resize(width, height);
        }
    }

    /// Current camera position and look-at target.
    pub fn pose(&self) -> CameraPose {
        CameraPose::of(&self.camera, &self.controls)
    }

    /// Fly from the live pose to `destination` over the configured duration.
    pub fn start_transition(&mut self, destination: CameraPose, now_ms: f64) {
        let current = self.pose();
        let duration = self.transition_ms;
        self.view.transition_mut().start(current, destination, duration, now_ms);
    }

    /// Fly to a pose framing the body. Returns false if the body or its mesh
    /// is unknown.
    pub fn focus_body(&mut self, id: BodyId, now_ms: f64) -> bool {
        let Some(body) = self.kinematics.get(id) else {
            warn!("focus: unknown body {id}");
            return false;
        };
        let Some(center) = self.scene.world_position(body.mesh()) else {
            debug!("focus: `{}` has no mesh in the scene", body.name());
            return false;
        };
        let radius = self.catalog.get(id).map_or(1.0, |b| b.radius);
        let distance = (radius * self.focus_radii).max(self.min_focus_distance);
        let direction = Vec3::new(0.0, 0.35, 1.0).normalize();
        self.start_transition(CameraPose::new(center + direction * distance, center), now_ms);
        true
    }

    /// Fly to a named preset. Unknown names are ignored with a warning.
    pub fn apply_preset(&mut self, name: &str, now_ms: f64) -> bool {
        let Some(preset) = self.presets.iter().find(|p| p.name == name) else {
            warn!("unknown camera preset `{name}`");
            return false;
        };
        let destination = CameraPose::new(preset.position, preset.target);
        self.start_transition(destination, now_ms);
        true
    }

    /// Selectable bodies as world-space spheres.
    pub fn pick_candidates(&self) -> Vec<PickCandidate> {
        self.kinematics
            .iter()
            .filter_map(|(id, body)| {
                let info = self.catalog.get(id)?;
                if !info.selectable {
                    return None;
                }
                let center = self.scene.world_position(body.mesh())?;
                Some(PickCandidate {
                    body: id,
                    center,
                    radius: info.radius,
                })
            })
            .collect()
    }

    /// Nearest selectable body under a point in normalized device coordinates.
    pub fn pick_ndc(&self, ndc: Vec2) -> Option<Pick> {
        let ray = self.camera.ray_from_ndc(ndc, self.controls.target)?;
        pick(&ray, &self.pick_candidates())
    }

    /// Nearest selectable body under a pixel position.
    pub fn pick_screen(&self, x: f32, y: f32) -> Option<Pick> {
        let [w, h] = self.viewport;
        self.pick_ndc(screen_to_ndc(x, y, w, h))
    }

    /// Built-in pointer, wheel and resize handling. Keys and custom events
    /// are left to the visualizer.
    pub fn handle_input(&mut self, event: InputEvent, now_ms: f64) {
        match event {
            InputEvent::PointerMove { x, y } => {
                let at = Vec2::new(x, y);
                if let Some(from) = self.drag_from {
                    let height = self.viewport[1].max(1.0);
                    let delta = at - from;
                    self.controls.rotate(TAU * delta.x / height, TAU * delta.y / height);
                    self.drag_from = Some(at);
                }
                self.pointer = Some(at);
            }
            InputEvent::PointerDown { x, y } => {
                self.drag_from = Some(Vec2::new(x, y));
            }
            InputEvent::PointerUp { .. } => {
                self.drag_from = None;
            }
            InputEvent::Click { x, y } => {
                self.pointer = Some(Vec2::new(x, y));
                let hit = self.pick_screen(x, y);
                self.view.selection_mut().click(hit);
            }
            InputEvent::DoubleClick { x, y } => {
                let hit = self.pick_screen(x, y);
                if let Some(id) = self.view.selection_mut().double_click(hit) {
                    self.focus_body(id, now_ms);
                }
            }
            InputEvent::Wheel { delta } => self.controls.zoom(delta),
            InputEvent::Resize { width, height } => self.resize(width, height),
            InputEvent::KeyDown { .. } | InputEvent::KeyUp { .. } | InputEvent::Custom { .. } => {}
        }
    }

    /// Advance every body by one kinematics step.
    pub fn advance_bodies(&mut self) {
        self.kinematics.update(self.view.animation(), &mut self.scene);
    }

    /// Camera for this frame: free orbiting unless a flight is active, then
    /// the flight, then the hover pick under the last pointer position.
    pub fn update_camera(&mut self, now_ms: f64) -> TransitionStep {
        if !self.view.is_transition_active() {
            self.controls.update(&mut self.camera);
        }
        let step = self
            .view
            .transition
            .apply(now_ms, &mut self.camera, &mut self.controls);
        if step == TransitionStep::Finished {
            info!("camera transition finished");
        }

        let hover = self.pointer.and_then(|p| self.pick_screen(p.x, p.y));
        self.view.selection_mut().hover(hover);
        step
    }

    /// One full frame: kinematics, then camera.
    pub fn step_frame(&mut self, now_ms: f64) -> TransitionStep {
        self.advance_bodies();
        self.update_camera(now_ms)
    }

    /// Text for the selection panel.
    pub fn selection_text(&self) -> String {
        match self.view.selection().displayed().and_then(|id| self.catalog.get(id)) {
            Some(info) => describe(info),
            None => DEFAULT_PROMPT.to_string(),
        }
    }

    /// Scalar state for the shared buffer header.
    pub fn frame_header(&self, frame_counter: u32) -> FrameHeader {
        let selection = self.view.selection();
        FrameHeader {
            frame_counter,
            viewport: self.viewport,
            transition_active: self.view.is_transition_active(),
            paused: self.view.animation().is_paused(),
            speed_multiplier: self.view.animation().speed_multiplier(),
            displayed_body: selection.displayed().map(|id| id.0),
            selection_locked: selection.is_locked(),
            hovered_body: selection.hovered().map(|id| id.0),
        }
    }
}
