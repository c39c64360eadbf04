//! Inner solar system orrery.
//!
//! Sun, Mercury, Venus, Earth with its Moon, and an asteroid belt, all on
//! circular orbits. Hover or click a body for its info panel, double-click to
//! fly the camera to it.

use log::{info, warn};
use orrery::{BodyId, EngineConfig, EngineContext, FrameEvent, InputEvent, InputQueue, Pick, Visualizer};

use crate::bodies;

// ── Custom event kinds from the page ────────────────────────────────

const CUSTOM_TOGGLE_PAUSE: u32 = 1;
const CUSTOM_SET_SPEED: u32 = 2;
/// `a` = index into `bodies::PRESETS`.
const CUSTOM_PRESET: u32 = 3;
/// `a` = body index.
const CUSTOM_FOCUS: u32 = 4;
const CUSTOM_CLEAR_SELECTION: u32 = 5;

const KEY_SPACE: u32 = 32;

// ── Frame event kinds to the page ───────────────────────────────────

/// a = displayed body (-1 for none), b = locked.
const EVENT_SELECTION: f32 = 1.0;
/// a = paused, b = speed multiplier.
const EVENT_ANIMATION: f32 = 2.0;
/// a = camera flight active.
const EVENT_TRANSITION: f32 = 3.0;

fn flag(on: bool) -> f32 {
    if on {
        1.0
    } else {
        0.0
    }
}

/// State last reported to the page.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Reported {
    displayed: Option<BodyId>,
    locked: bool,
    paused: bool,
    speed: f32,
    transition_active: bool,
}

impl Reported {
    fn of(ctx: &EngineContext) -> Self {
        let view = &ctx.view;
        Self {
            displayed: view.selection().displayed(),
            locked: view.selection().is_locked(),
            paused: view.animation().is_paused(),
            speed: view.animation().speed_multiplier(),
            transition_active: view.is_transition_active(),
        }
    }
}

pub struct SolarSystem {
    /// None until the first frame, so the page gets a full report.
    reported: Option<Reported>,
}

impl SolarSystem {
    pub fn new() -> Self {
        Self { reported: None }
    }

    fn handle_custom(&mut self, ctx: &mut EngineContext, kind: u32, a: f32) {
        let now = ctx.now_ms();
        match kind {
            CUSTOM_TOGGLE_PAUSE => {
                let paused = ctx.view.animation_mut().toggle_paused();
                info!("animation {}", if paused { "paused" } else { "resumed" });
            }
            CUSTOM_SET_SPEED => {
                ctx.view.animation_mut().set_speed_multiplier(a);
            }
            CUSTOM_PRESET => {
                // Negative and NaN indices saturate to 0 in the cast
                let preset = if a >= 0.0 { bodies::PRESETS.get(a as usize) } else { None };
                match preset {
                    Some(name) => {
                        ctx.apply_preset(name, now);
                    }
                    None => warn!("no camera preset at index {a}"),
                }
            }
            CUSTOM_FOCUS => {
                let id = BodyId(a as u32);
                if a >= 0.0 && ctx.focus_body(id, now) {
                    ctx.view.selection_mut().double_click(Some(Pick { body: id, distance: 0.0 }));
                }
            }
            CUSTOM_CLEAR_SELECTION => ctx.view.selection_mut().clear(),
            _ => {}
        }
    }

    /// Emit one frame event per state group that changed since the last report.
    fn report(&mut self, ctx: &mut EngineContext) {
        let current = Reported::of(ctx);
        let last = self.reported.replace(current);

        if last.map_or(true, |l| l.displayed != current.displayed || l.locked != current.locked) {
            let displayed = current.displayed.map_or(-1.0, |id| id.0 as f32);
            ctx.emit_event(FrameEvent::new(EVENT_SELECTION, displayed, flag(current.locked), 0.0));
        }
        if last.map_or(true, |l| l.paused != current.paused || l.speed != current.speed) {
            ctx.emit_event(FrameEvent::new(EVENT_ANIMATION, flag(current.paused), current.speed, 0.0));
        }
        if last.map_or(true, |l| l.transition_active != current.transition_active) {
            ctx.emit_event(FrameEvent::new(EVENT_TRANSITION, flag(current.transition_active), 0.0, 0.0));
        }
    }
}

impl Visualizer for SolarSystem {
    fn config(&self) -> EngineConfig {
        EngineConfig {
            max_instances: 256,
            ..EngineConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        match ctx.load_manifest(&bodies::system_manifest()) {
            Ok(()) => info!("loaded {} bodies", ctx.kinematics.len()),
            Err(err) => warn!("solar system rejected: {err}"),
        }
        ctx.backdrop = bodies::starfield(bodies::STAR_COUNT, bodies::STARFIELD_RADIUS);
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        for event in input.iter() {
            match *event {
                InputEvent::Custom { kind, a, .. } => self.handle_custom(ctx, kind, a),
                InputEvent::KeyDown { key_code: KEY_SPACE } => {
                    ctx.view.animation_mut().toggle_paused();
                }
                _ => {}
            }
        }
        self.report(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery::TransitionStep;

    fn started() -> (SolarSystem, EngineContext) {
        let mut app = SolarSystem::new();
        let mut ctx = EngineContext::new(&app.config());
        app.init(&mut ctx);
        (app, ctx)
    }

    fn send(app: &mut SolarSystem, ctx: &mut EngineContext, events: &[InputEvent]) {
        let mut input = InputQueue::new();
        for e in events {
            input.push(*e);
        }
        app.update(ctx, &input);
    }

    fn custom(kind: u32, a: f32) -> InputEvent {
        InputEvent::Custom { kind, a, b: 0.0, c: 0.0 }
    }

    #[test]
    fn init_loads_system_and_starfield() {
        let (_, ctx) = started();
        assert_eq!(ctx.kinematics.len(), 5 + bodies::ASTEROID_COUNT as usize);
        assert_eq!(ctx.backdrop.len(), bodies::STAR_COUNT as usize * 3);
        assert_eq!(ctx.presets.len(), bodies::PRESETS.len());
        assert_eq!(ctx.orbit_rings, vec![3.0, 5.0, 8.0]);
        let earth = ctx.kinematics.find(bodies::EARTH).unwrap();
        assert_eq!(ctx.catalog.get(earth).unwrap().texture.as_deref(), Some("textures/earth.jpg"));
    }

    #[test]
    fn first_frame_reports_everything() {
        let (mut app, mut ctx) = started();
        send(&mut app, &mut ctx, &[]);
        assert_eq!(ctx.events.len(), 3);
        assert_eq!(ctx.events[0], FrameEvent::new(EVENT_SELECTION, -1.0, 0.0, 0.0));

        ctx.begin_frame(16.0);
        send(&mut app, &mut ctx, &[]);
        assert!(ctx.events.is_empty());
    }

    #[test]
    fn pause_and_speed_events() {
        let (mut app, mut ctx) = started();
        send(&mut app, &mut ctx, &[]);

        ctx.begin_frame(16.0);
        send(&mut app, &mut ctx, &[custom(CUSTOM_TOGGLE_PAUSE, 0.0), custom(CUSTOM_SET_SPEED, 3.0)]);
        assert!(ctx.view.animation().is_paused());
        assert_eq!(ctx.events, vec![FrameEvent::new(EVENT_ANIMATION, 1.0, 3.0, 0.0)]);

        ctx.begin_frame(32.0);
        send(&mut app, &mut ctx, &[InputEvent::KeyDown { key_code: KEY_SPACE }]);
        assert!(!ctx.view.animation().is_paused());
    }

    #[test]
    fn bad_speed_is_ignored() {
        let (mut app, mut ctx) = started();
        send(&mut app, &mut ctx, &[custom(CUSTOM_SET_SPEED, -2.0)]);
        assert_eq!(ctx.view.animation().speed_multiplier(), 1.0);
    }

    #[test]
    fn preset_by_index_starts_flight() {
        let (mut app, mut ctx) = started();
        ctx.begin_frame(100.0);
        send(&mut app, &mut ctx, &[custom(CUSTOM_PRESET, 1.0)]);
        assert!(ctx.view.is_transition_active());
        assert!(ctx.events.contains(&FrameEvent::new(EVENT_TRANSITION, 1.0, 0.0, 0.0)));

        assert_eq!(ctx.update_camera(100.0 + 1200.0), TransitionStep::Finished);
        assert_eq!(ctx.camera.position, glam::Vec3::new(0.0, 40.0, 0.1));
    }

    #[test]
    fn unknown_preset_index_is_ignored() {
        let (mut app, mut ctx) = started();
        for index in [9.0, -1.0, -0.5, f32::NAN] {
            send(&mut app, &mut ctx, &[custom(CUSTOM_PRESET, index)]);
            assert!(!ctx.view.is_transition_active(), "index {index} started a flight");
        }
    }

    #[test]
    fn focus_by_index_and_clear() {
        let (mut app, mut ctx) = started();
        let earth = ctx.kinematics.find(bodies::EARTH).unwrap();
        send(&mut app, &mut ctx, &[custom(CUSTOM_FOCUS, earth.0 as f32)]);
        assert!(ctx.view.is_transition_active());
        assert_eq!(ctx.view.selection().locked(), Some(earth));

        ctx.begin_frame(16.0);
        send(&mut app, &mut ctx, &[custom(CUSTOM_CLEAR_SELECTION, 0.0)]);
        assert_eq!(ctx.view.selection().locked(), None);
        assert_eq!(ctx.events, vec![FrameEvent::new(EVENT_SELECTION, -1.0, 0.0, 0.0)]);
    }
}
