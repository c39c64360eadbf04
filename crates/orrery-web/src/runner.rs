use orrery::systems::render::build_instances;
use orrery::{
    BodyId, Clock, EngineConfig, EngineContext, FixedTimestep, FramePacing, InputEvent, InputQueue, InstanceBuffer,
    ProtocolLayout, SystemClock, SystemManifest, Visualizer,
};

/// Generic visualizer runner that wires up the frame loop.
///
/// Each concrete visualizer (e.g., `solar-system`) creates a `thread_local!`
/// AppRunner and exports free functions via `#[wasm_bindgen]`, because
/// wasm-bindgen cannot export generic structs directly.
pub struct AppRunner<V: Visualizer, C: Clock = SystemClock> {
    visualizer: V,
    ctx: EngineContext,
    input: InputQueue,
    instances: InstanceBuffer,
    /// Packed frame: header, instances, camera, events.
    frame: Vec<f32>,
    /// Present only for fixed-rate pacing.
    timestep: Option<FixedTimestep>,
    config: EngineConfig,
    layout: ProtocolLayout,
    clock: C,
    last_tick_ms: Option<f64>,
    frame_counter: u32,
    initialized: bool,
}

impl<V: Visualizer> AppRunner<V> {
    pub fn new(visualizer: V) -> Self {
        Self::with_clock(visualizer, SystemClock::new())
    }
}

impl<V: Visualizer, C: Clock> AppRunner<V, C> {
    pub fn with_clock(visualizer: V, clock: C) -> Self {
        let config = visualizer.config();
        let layout = ProtocolLayout::from_config(&config);

        Self {
            ctx: EngineContext::new(&config),
            input: InputQueue::new(),
            instances: InstanceBuffer::new(),
            frame: vec![0.0; layout.buffer_total_floats],
            timestep: timestep_for(config.pacing),
            visualizer,
            layout,
            config,
            clock,
            last_tick_ms: None,
            frame_counter: 0,
            initialized: false,
        }
    }

    /// Initialize the visualizer. Call once after construction.
    pub fn init(&mut self) {
        self.config = self.visualizer.config();
        self.layout = ProtocolLayout::from_config(&self.config);
        self.timestep = timestep_for(self.config.pacing);
        self.ctx = EngineContext::new(&self.config);
        self.visualizer.init(&mut self.ctx);
        self.initialized = true;
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Replace the system with one parsed from JSON. Errors are logged and
    /// leave the current system in place.
    pub fn load_manifest(&mut self, json: &str) -> bool {
        let loaded = SystemManifest::from_json(json).and_then(|m| self.ctx.load_manifest(&m));
        match loaded {
            Ok(()) => true,
            Err(err) => {
                log::error!("manifest rejected: {err}");
                false
            }
        }
    }

    /// Run one frame: input, visualizer hook, kinematics, camera, frame packing.
    pub fn tick(&mut self) {
        if !self.initialized {
            return;
        }
        let now = self.clock.now_ms();
        let frame_dt = self.last_tick_ms.map_or(0.0, |last| ((now - last) / 1000.0) as f32);
        self.last_tick_ms = Some(now);

        self.ctx.begin_frame(now);

        // Input is drained strictly before the frame update
        for event in self.input.iter() {
            self.ctx.handle_input(*event, now);
        }
        self.visualizer.update(&mut self.ctx, &self.input);
        self.input.clear();

        match self.timestep.as_mut() {
            None => self.ctx.advance_bodies(),
            Some(timestep) => {
                for _ in 0..timestep.accumulate(frame_dt) {
                    self.ctx.advance_bodies();
                }
            }
        }
        self.ctx.update_camera(now);

        build_instances(
            &self.ctx.scene,
            &self.ctx.kinematics,
            &self.ctx.catalog,
            self.layout.max_instances,
            &mut self.instances,
        );

        self.frame_counter = self.frame_counter.wrapping_add(1);
        let header = self.ctx.frame_header(self.frame_counter);
        let camera = self.ctx.camera.uniform(self.ctx.controls.target);
        self.layout
            .write_frame(&mut self.frame, &header, &self.instances.instances, &camera, &self.ctx.events);
    }

    // ---- Accessors for host reads ----

    pub fn frame_ptr(&self) -> *const f32 {
        self.frame.as_ptr()
    }

    pub fn frame(&self) -> &[f32] {
        &self.frame
    }

    pub fn backdrop_ptr(&self) -> *const f32 {
        self.ctx.backdrop.as_ptr()
    }

    pub fn backdrop_len(&self) -> u32 {
        self.ctx.backdrop.len() as u32
    }

    pub fn orbit_rings_ptr(&self) -> *const f32 {
        self.ctx.orbit_rings.as_ptr()
    }

    pub fn orbit_rings_len(&self) -> u32 {
        self.ctx.orbit_rings.len() as u32
    }

    pub fn body_count(&self) -> u32 {
        self.ctx.catalog.len() as u32
    }

    /// Body name by index, or empty if out of range.
    pub fn body_name(&self, index: u32) -> String {
        self.ctx
            .catalog
            .get(BodyId(index))
            .map(|b| b.name.clone())
            .unwrap_or_default()
    }

    /// Texture path by body index, or empty if the body has none.
    pub fn body_texture(&self, index: u32) -> String {
        self.ctx
            .catalog
            .get(BodyId(index))
            .and_then(|b| b.texture.clone())
            .unwrap_or_default()
    }

    pub fn selection_text(&self) -> String {
        self.ctx.selection_text()
    }

    pub fn is_transition_active(&self) -> bool {
        self.ctx.view.is_transition_active()
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    pub fn visualizer(&self) -> &V {
        &self.visualizer
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    // ---- Capacity accessors (read by TypeScript via wasm_bindgen exports) ----

    pub fn max_instances(&self) -> u32 {
        self.layout.max_instances as u32
    }

    pub fn max_events(&self) -> u32 {
        self.layout.max_events as u32
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }
}

fn timestep_for(pacing: FramePacing) -> Option<FixedTimestep> {
    match pacing {
        FramePacing::PerFrame => None,
        FramePacing::Fixed { dt } => Some(FixedTimestep::new(dt)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery::bridge::protocol::{HEADER_FRAME_COUNTER, HEADER_INSTANCE_COUNT, HEADER_PAUSED};
    use orrery::{BodyKind, FrameEvent, ManualClock};

    const SYSTEM: &str = r#"{
        "bodies": [
            { "name": "The Sun", "kind": "star", "radius": 1.5, "spin_speed": 0.001 },
            { "name": "Earth", "radius": 0.5, "distance": 8.0, "orbit_speed": 0.005,
              "texture": "textures/earth.jpg" }
        ]
    }"#;

    struct Probe {
        pacing: FramePacing,
    }

    impl Visualizer for Probe {
        fn config(&self) -> EngineConfig {
            EngineConfig {
                pacing: self.pacing,
                ..EngineConfig::default()
            }
        }

        fn init(&mut self, ctx: &mut EngineContext) {
            let manifest = SystemManifest::from_json(SYSTEM).unwrap();
            ctx.load_manifest(&manifest).unwrap();
        }

        fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
            for event in input.iter() {
                if let InputEvent::Custom { kind: 1, .. } = event {
                    let paused = ctx.view.animation_mut().toggle_paused();
                    ctx.emit_event(FrameEvent::new(1.0, if paused { 1.0 } else { 0.0 }, 0.0, 0.0));
                }
            }
        }
    }

    fn runner(pacing: FramePacing) -> AppRunner<Probe, ManualClock> {
        let mut r = AppRunner::with_clock(Probe { pacing }, ManualClock::new(0.0));
        r.init();
        r
    }

    fn earth_angle(r: &AppRunner<Probe, ManualClock>) -> f32 {
        let ctx = r.context();
        let pivot = ctx.kinematics.get(BodyId(1)).unwrap().pivot();
        ctx.scene.get(pivot).unwrap().rotation_y
    }

    #[test]
    fn tick_before_init_does_nothing() {
        let mut r = AppRunner::with_clock(Probe { pacing: FramePacing::PerFrame }, ManualClock::new(0.0));
        r.tick();
        assert!(r.frame().iter().all(|&f| f == 0.0));
    }

    #[test]
    fn per_frame_pacing_steps_once_per_tick() {
        let mut r = runner(FramePacing::PerFrame);
        for _ in 0..3 {
            r.clock().advance(16.0);
            r.tick();
        }
        assert!((earth_angle(&r) - 0.015).abs() < 1e-6);
        assert_eq!(r.frame()[HEADER_FRAME_COUNTER], 3.0);
        assert_eq!(r.frame()[HEADER_INSTANCE_COUNT], 2.0);
        assert_eq!(r.frame().len(), r.buffer_total_floats() as usize);
    }

    #[test]
    fn fixed_pacing_follows_wall_clock() {
        let mut r = runner(FramePacing::Fixed { dt: 0.01 });
        r.tick();
        r.clock().advance(35.0);
        r.tick();
        assert!((earth_angle(&r) - 0.015).abs() < 1e-6, "angle = {}", earth_angle(&r));
    }

    #[test]
    fn custom_event_reaches_visualizer() {
        let mut r = runner(FramePacing::PerFrame);
        r.push_input(InputEvent::Custom { kind: 1, a: 0.0, b: 0.0, c: 0.0 });
        r.tick();
        assert_eq!(r.frame()[HEADER_PAUSED], 1.0);
        assert_eq!(earth_angle(&r), 0.0);
        assert_eq!(r.context().events.len(), 1);
    }

    #[test]
    fn bad_manifest_keeps_current_system() {
        let mut r = runner(FramePacing::PerFrame);
        assert!(!r.load_manifest(r#"{ "bodies": [ { "name": "Moon", "radius": 1.0, "parent": "Earth" } ] }"#));
        assert_eq!(r.context().kinematics.len(), 2);
        assert_eq!(r.context().catalog.get(BodyId(0)).unwrap().kind, BodyKind::Star);
    }

    #[test]
    fn click_updates_selection_text() {
        let mut r = runner(FramePacing::PerFrame);
        r.push_input(InputEvent::Click { x: 400.0, y: 300.0 });
        r.tick();
        assert!(r.selection_text().starts_with("Selected: The Sun"));
    }

    #[test]
    fn host_reads_rings_and_body_assets() {
        let r = runner(FramePacing::PerFrame);
        assert_eq!(r.orbit_rings_len(), 1);
        assert_eq!(r.context().orbit_rings, vec![8.0]);
        assert_eq!(r.body_count(), 2);
        assert_eq!(r.body_name(1), "Earth");
        assert_eq!(r.body_texture(1), "textures/earth.jpg");
        assert_eq!(r.body_texture(0), "");
        assert_eq!(r.body_name(7), "");
    }
}
