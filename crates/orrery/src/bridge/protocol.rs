//! Shared frame buffer layout.
//! Must stay in sync with TypeScript `protocol.ts`.
//!
//! Layout (all values in f32 / 4 bytes):
//! ```text
//! [Header: 16 floats]
//! [Instances: max_instances × 8 floats]
//! [Camera: 36 floats (view 4×4, projection 4×4, eye xyzw)]
//! [Events: max_events × 4 floats]
//! ```
//!
//! Capacities are written into the header every frame.
//! TypeScript reads them from the header to compute offsets dynamically.

use crate::api::app::EngineConfig;
use crate::api::types::FrameEvent;
use crate::renderer::camera::CameraUniform;
use crate::renderer::instance::BodyInstance;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 16;

/// Header field indices.
pub const HEADER_LOCK: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_MAX_INSTANCES: usize = 2;
pub const HEADER_INSTANCE_COUNT: usize = 3;
pub const HEADER_MAX_EVENTS: usize = 4;
pub const HEADER_EVENT_COUNT: usize = 5;
pub const HEADER_PROTOCOL_VERSION: usize = 6;
pub const HEADER_VIEWPORT_WIDTH: usize = 7;
pub const HEADER_VIEWPORT_HEIGHT: usize = 8;
pub const HEADER_TRANSITION_ACTIVE: usize = 9;
pub const HEADER_PAUSED: usize = 10;
pub const HEADER_SPEED_MULTIPLIER: usize = 11;
/// Index of the displayed body, or -1.
pub const HEADER_DISPLAYED_BODY: usize = 12;
pub const HEADER_SELECTION_LOCKED: usize = 13;
/// Index of the hovered body, or -1.
pub const HEADER_HOVERED_BODY: usize = 14;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per body instance.
pub const INSTANCE_FLOATS: usize = BodyInstance::FLOATS;

/// Floats in the camera block.
pub const CAMERA_FLOATS: usize = CameraUniform::FLOATS;

/// Floats per frame event: kind, a, b, c.
pub const EVENT_FLOATS: usize = FrameEvent::FLOATS;

/// Per-frame scalar state mirrored into the header.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameHeader {
    pub frame_counter: u32,
    pub viewport: [f32; 2],
    pub transition_active: bool,
    pub paused: bool,
    pub speed_multiplier: f32,
    pub displayed_body: Option<u32>,
    pub selection_locked: bool,
    pub hovered_body: Option<u32>,
}

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    /// Maximum body instances.
    pub max_instances: usize,
    /// Maximum frame events per frame.
    pub max_events: usize,

    /// Size of instance data section in floats.
    pub instance_data_floats: usize,
    /// Size of event data section in floats.
    pub event_data_floats: usize,

    /// Offset (in floats) where instance data begins.
    pub instance_data_offset: usize,
    /// Offset (in floats) where the camera block begins.
    pub camera_data_offset: usize,
    /// Offset (in floats) where event data begins.
    pub event_data_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    /// Compute layout from raw capacity values.
    pub fn new(max_instances: usize, max_events: usize) -> Self {
        let instance_data_floats = max_instances * INSTANCE_FLOATS;
        let event_data_floats = max_events * EVENT_FLOATS;

        let instance_data_offset = HEADER_FLOATS;
        let camera_data_offset = instance_data_offset + instance_data_floats;
        let event_data_offset = camera_data_offset + CAMERA_FLOATS;

        let buffer_total_floats = event_data_offset + event_data_floats;
        let buffer_total_bytes = buffer_total_floats * 4;

        Self {
            max_instances,
            max_events,
            instance_data_floats,
            event_data_floats,
            instance_data_offset,
            camera_data_offset,
            event_data_offset,
            buffer_total_floats,
            buffer_total_bytes,
        }
    }

    /// Compute layout from an EngineConfig.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.max_instances, config.max_events)
    }

    /// Pack one frame into `out`, which is resized to the full layout.
    /// Instances and events beyond capacity are dropped; the header counts
    /// reflect what was written.
    pub fn write_frame(
        &self,
        out: &mut Vec<f32>,
        header: &FrameHeader,
        instances: &[BodyInstance],
        camera: &CameraUniform,
        events: &[FrameEvent],
    ) {
        out.resize(self.buffer_total_floats, 0.0);

        let instances = &instances[..instances.len().min(self.max_instances)];
        let events = &events[..events.len().min(self.max_events)];

        let h = &mut out[..HEADER_FLOATS];
        h.fill(0.0);
        h[HEADER_FRAME_COUNTER] = header.frame_counter as f32;
        h[HEADER_MAX_INSTANCES] = self.max_instances as f32;
        h[HEADER_INSTANCE_COUNT] = instances.len() as f32;
        h[HEADER_MAX_EVENTS] = self.max_events as f32;
        h[HEADER_EVENT_COUNT] = events.len() as f32;
        h[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        h[HEADER_VIEWPORT_WIDTH] = header.viewport[0];
        h[HEADER_VIEWPORT_HEIGHT] = header.viewport[1];
        h[HEADER_TRANSITION_ACTIVE] = flag(header.transition_active);
        h[HEADER_PAUSED] = flag(header.paused);
        h[HEADER_SPEED_MULTIPLIER] = header.speed_multiplier;
        h[HEADER_DISPLAYED_BODY] = header.displayed_body.map_or(-1.0, |i| i as f32);
        h[HEADER_SELECTION_LOCKED] = flag(header.selection_locked);
        h[HEADER_HOVERED_BODY] = header.hovered_body.map_or(-1.0, |i| i as f32);

        let inst: &[f32] = bytemuck::cast_slice(instances);
        out[self.instance_data_offset..self.instance_data_offset + inst.len()].copy_from_slice(inst);

        let cam: &[f32] = bytemuck::cast_slice(std::slice::from_ref(camera));
        out[self.camera_data_offset..self.camera_data_offset + CAMERA_FLOATS].copy_from_slice(cam);

        let ev: &[f32] = bytemuck::cast_slice(events);
        out[self.event_data_offset..self.event_data_offset + ev.len()].copy_from_slice(ev);
    }
}

fn flag(on: bool) -> f32 {
    if on {
        1.0
    } else {
        0.0
    }
}
